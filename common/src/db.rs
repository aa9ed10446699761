use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tracing::debug;

use crate::models::{Lead, LeadSubmission};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS leads (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    phone TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    company TEXT,
    linkedin TEXT,
    age TEXT NOT NULL,
    city TEXT NOT NULL,
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

/// Outcome of a lead insert attempt.
pub enum LeadInsert {
    Created(Lead),
    Duplicate,
}

pub async fn establish_connection(database_url: &str) -> anyhow::Result<Pool<Sqlite>> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    Ok(pool)
}

pub async fn init_schema(pool: &Pool<Sqlite>) -> anyhow::Result<()> {
    sqlx::query(SCHEMA).execute(pool).await?;
    Ok(())
}

/// Insert a lead unless one with the same email or phone already exists.
///
/// The duplicate pre-check and the insert share one transaction, and the
/// UNIQUE constraints on email/phone are the backstop: a constraint
/// violation on insert is reported as `Duplicate`, not as an error, so
/// two racing identical submissions can never both land.
pub async fn create_lead(
    pool: &Pool<Sqlite>,
    submission: &LeadSubmission,
) -> anyhow::Result<LeadInsert> {
    let mut tx = pool.begin().await?;

    let existing: Option<Lead> =
        sqlx::query_as("SELECT * FROM leads WHERE email = ? OR phone = ?")
            .bind(&submission.email)
            .bind(&submission.phone)
            .fetch_optional(&mut tx)
            .await?;

    if existing.is_some() {
        return Ok(LeadInsert::Duplicate);
    }

    let inserted: Result<Lead, sqlx::Error> = sqlx::query_as(
        "INSERT INTO leads (first_name, last_name, phone, email, company, linkedin, age, city)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING *",
    )
    .bind(&submission.first_name)
    .bind(&submission.last_name)
    .bind(&submission.phone)
    .bind(&submission.email)
    .bind(none_if_blank(&submission.company))
    .bind(none_if_blank(&submission.linkedin))
    .bind(&submission.age)
    .bind(&submission.city)
    .fetch_one(&mut tx)
    .await;

    let lead = match inserted {
        Ok(lead) => lead,
        Err(e) if is_unique_violation(&e) => {
            debug!("lead insert hit the unique constraint: {e}");
            return Ok(LeadInsert::Duplicate);
        }
        Err(e) => return Err(e.into()),
    };

    tx.commit().await?;
    Ok(LeadInsert::Created(lead))
}

/// Normalize an optional free-text field: absent or blank becomes NULL.
fn none_if_blank(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .map(|db_err| db_err.message().contains("UNIQUE constraint failed"))
        .unwrap_or(false)
}
