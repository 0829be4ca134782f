//! User repository for database operations

use chrono::Utc;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use tracing::info;
use uuid::Uuid;

use common::error::{DatabaseError, DatabaseResult};

use super::parse_uuid;
use crate::models::{NewUser, User, UserChanges};

const USER_COLUMNS: &str =
    "id, name, email, password_hash, location, phone, full_name, created_at, updated_at";

fn map_user(row: &SqliteRow) -> DatabaseResult<User> {
    let id: String = row.get("id");

    Ok(User {
        id: parse_uuid("users.id", &id)?,
        name: row.get("name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        location: row.get("location"),
        phone: row.get("phone"),
        full_name: row.get("full_name"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user. Name and email collisions surface as
    /// `UniqueViolation`.
    pub async fn create(&self, new_user: &NewUser) -> DatabaseResult<User> {
        info!("Creating new user: {}", new_user.name);

        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(id.to_string())
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(User {
            id,
            name: new_user.name.clone(),
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            location: None,
            phone: None,
            full_name: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Find a user by email
    pub async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        row.as_ref().map(map_user).transpose()
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        row.as_ref().map(map_user).transpose()
    }

    /// Apply a filtered credential patch. Columns set to `None` keep their
    /// current value.
    pub async fn update_credentials(
        &self,
        id: Uuid,
        changes: &UserChanges,
    ) -> DatabaseResult<()> {
        info!("Updating credentials for user: {}", id);

        sqlx::query(
            r#"
            UPDATE users
            SET name = COALESCE(?1, name),
                email = COALESCE(?2, email),
                location = COALESCE(?3, location),
                password_hash = COALESCE(?4, password_hash),
                updated_at = ?5
            WHERE id = ?6
            "#,
        )
        .bind(&changes.name)
        .bind(&changes.email)
        .bind(&changes.location)
        .bind(&changes.password_hash)
        .bind(Utc::now())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(())
    }
}
