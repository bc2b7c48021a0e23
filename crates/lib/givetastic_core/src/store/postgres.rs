//! PostgreSQL-backed stores.
//!
//! Table names come from [`CodeKind::table`] and [`RoleLink::table`], which
//! only ever return fixed identifiers, so they are formatted into the SQL
//! while all values are bound.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{AccessStore, IdentityError, IdentityStore, StoreError, StoreMode, normalize_email};
use crate::auth::password;
use crate::models::{AccessCode, CodeKind, Profile, Role, RoleLink, SignUpMetadata};
use crate::uuid::uuidv7;

/// Turn a unique violation into [`StoreError::Conflict`], anything else into
/// [`StoreError::Db`].
fn conflict_or_db(e: sqlx::Error, what: &str) -> StoreError {
    let err = StoreError::from(e);
    if err.is_conflict() {
        StoreError::Conflict(what.to_string())
    } else {
        err
    }
}

/// Access store over the `*_codes`, `profiles` and role-link tables.
#[derive(Debug, Clone)]
pub struct PgAccessStore {
    pool: PgPool,
}

impl PgAccessStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessStore for PgAccessStore {
    async fn find_code(
        &self,
        kind: CodeKind,
        value: &str,
    ) -> Result<Option<AccessCode>, StoreError> {
        let sql = format!(
            "SELECT code, is_active, created_at FROM {} WHERE code = $1",
            kind.table()
        );
        let row = sqlx::query_as::<_, (String, bool, DateTime<Utc>)>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(value, active, created_at)| AccessCode {
            value,
            kind,
            active,
            created_at,
        }))
    }

    async fn insert_codes(&self, kind: CodeKind, codes: &[AccessCode]) -> Result<(), StoreError> {
        let sql = format!(
            "INSERT INTO {} (id, code, is_active, created_at) VALUES ($1, $2, $3, $4)",
            kind.table()
        );
        let mut tx = self.pool.begin().await?;
        for code in codes {
            sqlx::query(&sql)
                .bind(uuidv7())
                .bind(&code.value)
                .bind(code.active)
                .bind(code.created_at)
                .execute(&mut *tx)
                .await
                .map_err(|e| conflict_or_db(e, &code.value))?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn set_code_active(
        &self,
        kind: CodeKind,
        value: &str,
        active: bool,
    ) -> Result<bool, StoreError> {
        let sql = format!("UPDATE {} SET is_active = $2 WHERE code = $1", kind.table());
        let result = sqlx::query(&sql)
            .bind(value)
            .bind(active)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO profiles (user_id, name, role, email) VALUES ($1::uuid, $2, $3, $4)",
        )
        .bind(&profile.user_id)
        .bind(&profile.name)
        .bind(profile.role.as_str())
        .bind(&profile.email)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or_db(e, &format!("profile for {}", profile.user_id)))?;
        Ok(())
    }

    async fn insert_role_link(&self, link: &RoleLink) -> Result<(), StoreError> {
        let sql = format!(
            "INSERT INTO {} (user_id, {}) VALUES ($1::uuid, $2)",
            link.table(),
            link.code_column()
        );
        sqlx::query(&sql)
            .bind(&link.user_id)
            .bind(&link.code)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_profile(&self, user_id: &str) -> Result<Option<Profile>, StoreError> {
        let row = sqlx::query_as::<_, (String, String, String, String)>(
            "SELECT user_id::text, name, role, email FROM profiles WHERE user_id = $1::uuid",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|(user_id, name, role, email)| -> Result<Profile, StoreError> {
            let role = role
                .parse::<Role>()
                .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
            Ok(Profile {
                user_id,
                name,
                role,
                email,
            })
        })
        .transpose()
    }

    fn mode(&self) -> StoreMode {
        StoreMode::Postgres
    }
}

/// Identity store over the `users` table.
#[derive(Debug, Clone)]
pub struct PgIdentityStore {
    pool: PgPool,
}

impl PgIdentityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: &SignUpMetadata,
    ) -> Result<String, IdentityError> {
        password::check_strength(password)?;
        let email = normalize_email(email);
        let password_hash = password::hash_password(password)?;

        let user_id = sqlx::query_scalar::<_, String>(
            "INSERT INTO users (id, email, password_hash, name, role, code) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id::text",
        )
        .bind(uuidv7())
        .bind(&email)
        .bind(&password_hash)
        .bind(&metadata.name)
        .bind(metadata.role.as_str())
        .bind(&metadata.code)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match conflict_or_db(e, &email) {
            StoreError::Conflict(_) => IdentityError::EmailTaken(email.clone()),
            other => IdentityError::Store(other),
        })?;
        Ok(user_id)
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<String, IdentityError> {
        let row = sqlx::query_as::<_, (String, String)>(
            "SELECT id::text, password_hash FROM users WHERE email = $1",
        )
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::from)?;

        let (user_id, hash) = row.ok_or(IdentityError::InvalidCredentials)?;
        if !password::verify_password(password, &hash)? {
            return Err(IdentityError::InvalidCredentials);
        }
        Ok(user_id)
    }
}
