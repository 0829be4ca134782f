//! Session repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use common::error::{DatabaseError, DatabaseResult};

use super::parse_uuid;
use crate::models::Session;

/// Session repository
#[derive(Clone)]
pub struct SessionRepository {
    pool: SqlitePool,
}

impl SessionRepository {
    /// Create a new session repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist a freshly issued session.
    pub async fn insert(&self, session: &Session) -> DatabaseResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (id, user_id, expires_at, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&session.id)
        .bind(session.user_id.to_string())
        .bind(session.expires_at)
        .bind(session.created_at)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(())
    }

    /// Look up a session by its token.
    pub async fn find(&self, token: &str) -> DatabaseResult<Option<Session>> {
        let row = sqlx::query(
            "SELECT id, user_id, expires_at, created_at FROM sessions WHERE id = ?1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        match row {
            Some(row) => {
                let user_id: String = row.get("user_id");
                Ok(Some(Session {
                    id: row.get("id"),
                    user_id: parse_uuid("sessions.user_id", &user_id)?,
                    expires_at: row.get("expires_at"),
                    created_at: row.get("created_at"),
                }))
            }
            None => Ok(None),
        }
    }

    /// Move a session's expiry.
    pub async fn update_expiry(
        &self,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> DatabaseResult<()> {
        sqlx::query("UPDATE sessions SET expires_at = ?1 WHERE id = ?2")
            .bind(expires_at)
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        Ok(())
    }

    /// Delete a session by its token. Deleting an absent session is a no-op.
    pub async fn delete(&self, token: &str) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM sessions WHERE id = ?1")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        Ok(())
    }
}
