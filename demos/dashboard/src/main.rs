use std::env;

use buecheria::prelude::*;
use chrono::NaiveDate;

const SESSION_FILE_ENV: &str = "BUECHERIA_SESSION_FILE";
const DEFAULT_SESSION_FILE: &str = "buecheria-session.json";

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

fn credential(name: &str) -> Result<String, BuecheriaError> {
    env::var(name).map_err(|_| ApiError::Config(format!("{name} must be set to log in")).into())
}

/// Reuses a stored session, or logs in with the credentials from the
/// environment and stores the new one.
async fn ensure_session(client: &ApiClient<FileStore>) -> Result<Session, BuecheriaError> {
    if let Some(session) = client.sessions().current()? {
        tracing::info!(username = %session.username, "reusing stored session");
        return Ok(session);
    }
    let username = credential("BUECHERIA_USERNAME")?;
    let password = credential("BUECHERIA_PASSWORD")?;
    let session = client.login(&username, &password).await?;
    client.set_session(&session.token, &session.username, session.role)?;
    Ok(session)
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

struct Summary {
    counts: DashboardCounts,
    overdue: usize,
}

/// Reads every collection once; counts and overdue loans both come from
/// those lists.
async fn load_summary<S: KeyValueStore>(
    client: &ApiClient<S>,
    today: NaiveDate,
) -> Result<Summary, ApiError> {
    let (books, authors, members, loans) =
        (client.books(), client.authors(), client.members(), client.loans());
    let (books, authors, members, loans) =
        tokio::try_join!(books.list(), authors.list(), members.list(), loans.list())?;

    Ok(Summary {
        counts: DashboardCounts {
            books: books.len(),
            authors: authors.len(),
            members: members.len(),
            loans: loans.len(),
        },
        overdue: loans.iter().filter(|loan| loan.is_overdue(today)).count(),
    })
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), BuecheriaError> {
    buecheria::init_logging();

    let config = ApiConfig::from_env()?;
    let session_file = env::var(SESSION_FILE_ENV).unwrap_or_else(|_| DEFAULT_SESSION_FILE.into());
    let client = ApiClientBuilder::from_config(config).build(FileStore::open(&session_file)?)?;

    let session = ensure_session(&client).await?;
    println!("Signed in as {} ({})", session.username, session.role);

    // A stale token shows up here as AuthExpired; the session file has
    // already been cleared, so the next run logs in again.
    if let Err(err) = client.protected().await {
        if err.requires_login() {
            eprintln!("{err}");
            return Ok(());
        }
        return Err(err.into());
    }

    let summary = load_summary(&client, chrono::Local::now().date_naive()).await?;
    println!("Books:   {}", summary.counts.books);
    println!("Authors: {}", summary.counts.authors);
    println!("Members: {}", summary.counts.members);
    println!("Loans:   {}", summary.counts.loans);
    if summary.overdue > 0 {
        println!("{} loan(s) overdue", summary.overdue);
    }

    if session.role.is_admin() {
        match client.admin_only().await {
            Ok(body) => println!("Admin check: {body}"),
            Err(err) => tracing::warn!(error = %err, "admin route refused"),
        }
    }

    Ok(())
}
