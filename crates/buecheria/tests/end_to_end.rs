//! End-to-end tests through the facade: a file-backed session that
//! outlives the client that created it.

use buecheria::prelude::*;
use mockito::Server;

fn client_for(url: &str, path: &std::path::Path) -> Result<ApiClient<FileStore>, BuecheriaError> {
    let store = FileStore::open(path)?;
    let client = ApiClientBuilder::new()
        .base_url(&format!("{url}/api"))
        .build(store)?;
    Ok(client)
}

#[tokio::test]
async fn test_session_survives_restart_until_server_rejects_it() {
    let mut server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    server
        .mock("POST", "/api/login")
        .with_status(200)
        .with_body(r#"{"access_token":"abc123","username":"admin","role":"Admin"}"#)
        .create_async()
        .await;

    // First "process": log in and persist.
    {
        let client = client_for(&server.url(), &path).unwrap();
        let session = client.login("admin", "adminpassword").await.unwrap();
        client
            .set_session(&session.token, &session.username, session.role)
            .unwrap();
    }

    // Second "process": the session is still there.
    let client = client_for(&server.url(), &path).unwrap();
    assert!(client.is_authenticated().unwrap());
    let current = client.sessions().current().unwrap().unwrap();
    assert_eq!(current.username, "admin");
    assert_eq!(current.role, Role::Admin);

    server
        .mock("GET", "/api/protected")
        .match_header("authorization", "Bearer abc123")
        .with_status(401)
        .create_async()
        .await;
    let err: BuecheriaError = client.protected().await.unwrap_err().into();
    assert!(err.requires_login());

    // Third "process": the forced logout was persisted too.
    let client = client_for(&server.url(), &path).unwrap();
    assert_eq!(client.sessions().state().unwrap(), SessionState::Unauthenticated);
}

#[tokio::test]
async fn test_question_mark_converts_every_layer() {
    async fn run(url: &str) -> Result<usize, BuecheriaError> {
        let client = ApiClientBuilder::new()
            .base_url(&format!("{url}/api"))
            .build(MemoryStore::new())?;
        let books = client.books().list().await?;
        Ok(books.len())
    }

    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/books")
        .with_status(500)
        .with_body(r#"{"detail":"database offline"}"#)
        .create_async()
        .await;

    let err = run(&server.url()).await.unwrap_err();

    assert!(matches!(err, BuecheriaError::Api(ApiError::Request { status: 500, .. })));
    assert_eq!(err.to_string(), "database offline");
}
