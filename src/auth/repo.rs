use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo_types::{Credential, NewUser, User};
use crate::error::RepoResult;
use crate::pg::map_sqlx;

/// Persistence seam for user rows.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Looks up a non-deleted user by email.
    async fn find_active_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>>;

    /// Creates the user row and its credential row inside one transaction.
    /// The store's partial unique index on active emails is the authority on
    /// duplicates; a violation surfaces as [`crate::RepoError::UniqueViolation`].
    async fn create(&self, new_user: NewUser) -> RepoResult<User>;
}

/// Persistence seam for credential state: password digest, pending reset
/// token, last-login bookkeeping.
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    async fn find_by_user_id(&self, user_id: Uuid) -> RepoResult<Option<Credential>>;

    /// Installs a pending reset token, overwriting any previous one. Under
    /// concurrent requests the later write wins.
    async fn set_reset_token(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: OffsetDateTime,
    ) -> RepoResult<()>;

    /// Redeems a reset token in one conditional update: when `token` matches
    /// a credential whose expiry is after `now`, the password hash is
    /// replaced and both reset fields are cleared. Returns the owning user
    /// id when a row matched; `None` covers unknown, expired and
    /// already-consumed tokens alike.
    async fn consume_reset_token(
        &self,
        token: &str,
        new_hash: &str,
        now: OffsetDateTime,
    ) -> RepoResult<Option<Uuid>>;

    /// Last-login bookkeeping. Best-effort from the caller's point of view;
    /// concurrent touches are last-writer-wins.
    async fn touch_last_login(&self, user_id: Uuid, at: OffsetDateTime) -> RepoResult<()>;
}

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_active_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, role, email_verified, created_at, deleted_at
            FROM users
            WHERE email = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, role, email_verified, created_at, deleted_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn create(&self, new_user: NewUser) -> RepoResult<User> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, name, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, name, role, email_verified, created_at, deleted_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_user.email)
        .bind(&new_user.name)
        .bind(new_user.role)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx)?;

        sqlx::query(
            r#"
            INSERT INTO credentials (user_id, password_hash)
            VALUES ($1, $2)
            "#,
        )
        .bind(user.id)
        .bind(&new_user.password_hash)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx)?;

        tx.commit().await.map_err(map_sqlx)?;
        Ok(user)
    }
}

#[derive(Clone)]
pub struct PgCredentialRepository {
    pool: PgPool,
}

impl PgCredentialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialRepository for PgCredentialRepository {
    async fn find_by_user_id(&self, user_id: Uuid) -> RepoResult<Option<Credential>> {
        sqlx::query_as::<_, Credential>(
            r#"
            SELECT user_id, password_hash, last_login_at, reset_token, reset_token_expires_at
            FROM credentials
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn set_reset_token(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: OffsetDateTime,
    ) -> RepoResult<()> {
        sqlx::query(
            r#"
            UPDATE credentials
            SET reset_token = $2, reset_token_expires_at = $3
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(token)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }

    async fn consume_reset_token(
        &self,
        token: &str,
        new_hash: &str,
        now: OffsetDateTime,
    ) -> RepoResult<Option<Uuid>> {
        // Single conditional update: the WHERE clause is what makes the
        // token single-use under concurrent redemption.
        sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE credentials
            SET password_hash = $2, reset_token = NULL, reset_token_expires_at = NULL
            WHERE reset_token = $1 AND reset_token_expires_at > $3
            RETURNING user_id
            "#,
        )
        .bind(token)
        .bind(new_hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn touch_last_login(&self, user_id: Uuid, at: OffsetDateTime) -> RepoResult<()> {
        sqlx::query(
            r#"
            UPDATE credentials
            SET last_login_at = $2
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }
}
