//! PostgreSQL implementation of UserStore.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::users::User;
use crate::ports::{UserStore, VerifiedIdentity};

use super::rows::{map_db_error, UserRow};

pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str = "id, firebase_uid, name, email, role, created_at";

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn upsert_from_identity(
        &self,
        identity: &VerifiedIdentity,
    ) -> Result<User, DomainError> {
        // First verified token provisions the account; later tokens refresh
        // the role and backfill the provider uid.
        let row: UserRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO users (firebase_uid, name, email, role)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT ON CONSTRAINT users_email_key DO UPDATE
            SET role = EXCLUDED.role,
                firebase_uid = COALESCE(users.firebase_uid, EXCLUDED.firebase_uid)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&identity.subject)
        .bind(&identity.display_name)
        .bind(&identity.email)
        .bind(identity.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to upsert user"))?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to load user"))?;

        Ok(row.map(User::from))
    }
}
