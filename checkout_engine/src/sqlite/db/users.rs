use chrono::Utc;
use log::debug;
use sqlx::SqliteConnection;

use super::is_unique_violation;
use crate::{
    db_types::{NewUser, User, UserId},
    traits::CheckoutDatabaseError,
};

/// Validates the user, assigns a fresh id and stores the record.
pub async fn insert_user(user: NewUser, conn: &mut SqliteConnection) -> Result<User, CheckoutDatabaseError> {
    let user = user.validated()?;
    let id = UserId::random();
    // RETURNING rows are drained with fetch_all so the INSERT has finished before the caller commits
    let result: Result<User, sqlx::Error> = sqlx::query_as(
        r#"
            INSERT INTO users (id, email, password_hash, discord_id, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
    )
    .bind(id.as_str())
    .bind(user.email.as_deref())
    .bind(user.password_hash.as_deref())
    .bind(user.discord_id.as_deref())
    .bind(Utc::now())
    .fetch_all(conn)
    .await
    .and_then(|rows| rows.into_iter().next().ok_or(sqlx::Error::RowNotFound));
    match result {
        Ok(user) => {
            debug!("🗃️ User {id} created");
            Ok(user)
        },
        Err(e) if is_unique_violation(&e) => Err(CheckoutDatabaseError::UserAlreadyExists(duplicate_field(&e))),
        Err(e) => Err(e.into()),
    }
}

fn duplicate_field(e: &sqlx::Error) -> String {
    let msg = e.to_string();
    if msg.contains("discord_id") {
        "discord id".to_string()
    } else {
        "email".to_string()
    }
}

pub async fn fetch_user_by_id(user_id: &UserId, conn: &mut SqliteConnection) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as("SELECT * FROM users WHERE id = $1").bind(user_id.as_str()).fetch_optional(conn).await?;
    Ok(user)
}

pub async fn fetch_user_by_email(email: &str, conn: &mut SqliteConnection) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(email.trim())
        .fetch_optional(conn)
        .await?;
    Ok(user)
}

pub async fn fetch_user_by_discord_id(
    discord_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<User>, sqlx::Error> {
    let user =
        sqlx::query_as("SELECT * FROM users WHERE discord_id = $1").bind(discord_id).fetch_optional(conn).await?;
    Ok(user)
}
