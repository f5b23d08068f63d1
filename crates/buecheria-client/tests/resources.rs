//! Integration tests for the typed CRUD resources and dashboard counts.

use buecheria_client::{
    ApiClient, ApiClientBuilder, ApiError, AuthorDraft, AuthorId, BookDraft,
    BookId, BookPatch, CrudAuth, DashboardCounts, LoanDraft, LoanId,
    LoanPatch, MemberDraft, MemberId,
};
use buecheria_session::Role;
use buecheria_store::MemoryStore;
use chrono::NaiveDate;
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

// =========================================================================
// Helpers
// =========================================================================

async fn setup(mode: CrudAuth) -> (ServerGuard, ApiClient<MemoryStore>) {
    let server = Server::new_async().await;
    let client = ApiClientBuilder::new()
        .base_url(&format!("{}/api", server.url()))
        .crud_auth(mode)
        .build(MemoryStore::new())
        .expect("client should build");
    (server, client)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

const AUTHOR_JSON: &str =
    r#"{"AuthorID":3,"FirstName":"Thomas","LastName":"Mann","BirthDate":"1875-06-06"}"#;

fn book_draft() -> BookDraft {
    BookDraft {
        title: "Der Zauberberg".into(),
        author_id: AuthorId(3),
        isbn: "978-3-10-048186-3".into(),
        publication_date: date(1924, 11, 20),
        genre: "Novel".into(),
        available: true,
        cover_url: None,
    }
}

// =========================================================================
// Anonymous mode (default)
// =========================================================================

#[tokio::test]
async fn test_list_authors_sends_no_token() {
    let (mut server, client) = setup(CrudAuth::Anonymous).await;
    // Even with a session stored, anonymous mode doesn't attach it.
    client.set_session("abc123", "admin", Role::Admin).unwrap();
    let mock = server
        .mock("GET", "/api/authors")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(format!("[{AUTHOR_JSON}]"))
        .create_async()
        .await;

    let authors = client.authors().list().await.unwrap();

    mock.assert_async().await;
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0].full_name(), "Thomas Mann");
}

#[tokio::test]
async fn test_get_missing_book_returns_request_error_with_detail() {
    let (mut server, client) = setup(CrudAuth::Anonymous).await;
    server
        .mock("GET", "/api/books/42")
        .with_status(404)
        .with_body(r#"{"detail":"Book not found"}"#)
        .create_async()
        .await;

    let err = client.books().get(BookId(42)).await.unwrap_err();

    assert!(matches!(
        err,
        ApiError::Request { status: 404, ref message } if message == "Book not found"
    ));
}

#[tokio::test]
async fn test_list_failure_without_detail_reports_status() {
    let (mut server, client) = setup(CrudAuth::Anonymous).await;
    server
        .mock("GET", "/api/loans")
        .with_status(500)
        .with_body("{}")
        .create_async()
        .await;

    let err = client.loans().list().await.unwrap_err();

    assert_eq!(err.to_string(), "Failed to fetch loans: 500 Internal Server Error");
}

#[tokio::test]
async fn test_create_book_posts_draft_and_returns_record() {
    let (mut server, client) = setup(CrudAuth::Anonymous).await;
    let mock = server
        .mock("POST", "/api/books")
        .match_body(Matcher::Json(json!({
            "Title": "Der Zauberberg",
            "AuthorID": 3,
            "Isbn": "978-3-10-048186-3",
            "PublicationDate": "1924-11-20",
            "Genre": "Novel",
            "Available": true
        })))
        .with_status(200)
        .with_body(format!(
            r#"{{"BookID":11,"Title":"Der Zauberberg","AuthorID":3,"Isbn":"978-3-10-048186-3",
                "PublicationDate":"1924-11-20","Genre":"Novel","Available":true,"author":{AUTHOR_JSON}}}"#
        ))
        .create_async()
        .await;

    let book = client.books().create(&book_draft()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(book.id, BookId(11));
    assert_eq!(book.author.unwrap().id, AuthorId(3));
}

#[tokio::test]
async fn test_create_invalid_member_sends_nothing() {
    let (mut server, client) = setup(CrudAuth::Anonymous).await;
    let mock = server
        .mock("POST", "/api/members")
        .expect(0)
        .create_async()
        .await;
    let draft = MemberDraft {
        first_name: "Erika".into(),
        last_name: "Mustermann".into(),
        email: "not-an-email".into(),
        phone: "030".into(),
        address: "Berlin".into(),
        birth_date: date(1990, 1, 15),
        join_date: date(2024, 3, 1),
        membership_status: Role::Member,
    };

    let err = client.members().create(&draft).await.unwrap_err();

    assert!(matches!(err, ApiError::Validation(ref v) if v.field == "Email"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_update_book_sends_only_patched_fields() {
    let (mut server, client) = setup(CrudAuth::Anonymous).await;
    let mock = server
        .mock("PUT", "/api/books/11")
        .match_body(Matcher::Json(json!({"Available": false})))
        .with_status(200)
        .with_body(r#"{"BookID":11,"Available":false}"#)
        .create_async()
        .await;

    let patch = BookPatch {
        available: Some(false),
        ..BookPatch::default()
    };
    let book = client.books().update(BookId(11), &patch).await.unwrap();

    mock.assert_async().await;
    assert!(!book.is_available());
}

#[tokio::test]
async fn test_mark_loan_returned() {
    let (mut server, client) = setup(CrudAuth::Anonymous).await;
    server
        .mock("PUT", "/api/loans/5")
        .match_body(Matcher::Json(json!({"ReturnDate": "2026-10-18"})))
        .with_status(200)
        .with_body(
            r#"{"LoanID":5,"BookID":11,"MemberID":4,"LoanDate":"2026-10-01",
                "DueDate":"2026-10-15","ReturnDate":"2026-10-18"}"#,
        )
        .create_async()
        .await;

    let loan = client
        .loans()
        .update(LoanId(5), &LoanPatch::returned_on(date(2026, 10, 18)))
        .await
        .unwrap();

    assert!(loan.is_returned());
}

#[tokio::test]
async fn test_delete_author_returns_deleted_record() {
    let (mut server, client) = setup(CrudAuth::Anonymous).await;
    server
        .mock("DELETE", "/api/authors/3")
        .with_status(200)
        .with_body(AUTHOR_JSON)
        .create_async()
        .await;

    let deleted = client.authors().delete(AuthorId(3)).await.unwrap();

    assert_eq!(deleted.last_name, "Mann");
}

#[tokio::test]
async fn test_malformed_record_is_invalid_response() {
    let (mut server, client) = setup(CrudAuth::Anonymous).await;
    server
        .mock("GET", "/api/members/4")
        .with_status(200)
        .with_body(r#"{"MemberID":"four"}"#)
        .create_async()
        .await;

    let err = client.members().get(MemberId(4)).await.unwrap_err();

    assert!(matches!(err, ApiError::InvalidResponse { .. }));
}

// =========================================================================
// Bearer mode
// =========================================================================

#[tokio::test]
async fn test_bearer_mode_attaches_token() {
    let (mut server, client) = setup(CrudAuth::Bearer).await;
    client.set_session("abc123", "admin", Role::Admin).unwrap();
    let mock = server
        .mock("POST", "/api/authors")
        .match_header("authorization", "Bearer abc123")
        .with_status(200)
        .with_body(AUTHOR_JSON)
        .create_async()
        .await;

    let draft = AuthorDraft {
        first_name: "Thomas".into(),
        last_name: "Mann".into(),
        birth_date: date(1875, 6, 6),
    };
    client.authors().create(&draft).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_bearer_mode_without_session_sends_nothing() {
    let (mut server, client) = setup(CrudAuth::Bearer).await;
    let mock = server
        .mock("GET", "/api/books")
        .expect(0)
        .create_async()
        .await;

    let err = client.books().list().await.unwrap_err();

    assert!(matches!(err, ApiError::NotAuthenticated));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_bearer_mode_401_logs_out() {
    let (mut server, client) = setup(CrudAuth::Bearer).await;
    client.set_session("stale", "admin", Role::Admin).unwrap();
    server
        .mock("POST", "/api/loans")
        .with_status(401)
        .create_async()
        .await;

    let draft = LoanDraft {
        book_id: BookId(11),
        member_id: MemberId(4),
        loan_date: date(2026, 10, 1),
        due_date: date(2026, 10, 15),
        return_date: None,
    };
    let err = client.loans().create(&draft).await.unwrap_err();

    assert!(matches!(err, ApiError::AuthExpired));
    assert!(!client.is_authenticated().unwrap());
}

// =========================================================================
// dashboard_counts()
// =========================================================================

#[tokio::test]
async fn test_dashboard_counts_all_collections() {
    let (mut server, client) = setup(CrudAuth::Anonymous).await;
    server
        .mock("GET", "/api/books")
        .with_body(r#"[{"BookID":1},{"BookID":2},{"BookID":3}]"#)
        .create_async()
        .await;
    server
        .mock("GET", "/api/authors")
        .with_body(format!("[{AUTHOR_JSON}]"))
        .create_async()
        .await;
    server
        .mock("GET", "/api/members")
        .with_body("[]")
        .create_async()
        .await;
    server
        .mock("GET", "/api/loans")
        .with_body(
            r#"[{"LoanID":1,"BookID":1,"MemberID":1,"LoanDate":"2026-10-01","DueDate":"2026-10-15"},
                {"LoanID":2,"BookID":2,"MemberID":1,"LoanDate":"2026-10-02","DueDate":"2026-10-16"}]"#,
        )
        .create_async()
        .await;

    let counts = client.dashboard_counts().await.unwrap();

    assert_eq!(
        counts,
        DashboardCounts {
            books: 3,
            authors: 1,
            members: 0,
            loans: 2,
        }
    );
}

#[tokio::test]
async fn test_dashboard_counts_surfaces_first_failure() {
    let (mut server, client) = setup(CrudAuth::Anonymous).await;
    server.mock("GET", "/api/books").with_body("[]").create_async().await;
    server.mock("GET", "/api/authors").with_body("[]").create_async().await;
    server
        .mock("GET", "/api/members")
        .with_status(503)
        .with_body("maintenance")
        .create_async()
        .await;
    server.mock("GET", "/api/loans").with_body("[]").create_async().await;

    let err = client.dashboard_counts().await.unwrap_err();

    assert!(matches!(err, ApiError::Request { status: 503, ref message } if message == "maintenance"));
}
