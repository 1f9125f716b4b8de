//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use nid::Nanoid;
use sqlx::{PgExecutor, PgPool};
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::entity::{
    email_verification::EmailVerificationCode, oauth_account::OauthAccount,
    password_reset::PasswordResetToken, session::Session, user::User,
};
use crate::domain::repository::{
    EmailVerificationRepository, OauthAccountRepository, PasswordResetRepository,
    SessionRepository, UserRepository, UserWithProviderLink,
};
use crate::domain::value_object::{
    display_name::DisplayName, email::Email, oauth_provider::OauthProvider, public_id::PublicId,
    user_id::UserId, user_password::UserPassword,
};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Clean up expired verification codes and reset tokens
    ///
    /// Expiry is otherwise only enforced at read time; this is for a
    /// periodic sweep so abandoned rows do not accumulate.
    pub async fn cleanup_expired(&self) -> AuthResult<u64> {
        let codes = sqlx::query("DELETE FROM email_verification_tokens WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await?
            .rows_affected();

        let tokens = sqlx::query("DELETE FROM password_reset_tokens WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(
            codes_deleted = codes,
            tokens_deleted = tokens,
            "Cleaned up expired ephemeral tokens"
        );

        Ok(codes + tokens)
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        insert_user(&self.pool, user).await.map_err(unique_to_exists)
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                public_id,
                name,
                email,
                password_hash,
                avatar_url,
                email_verified,
                created_at,
                updated_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                public_id,
                name,
                email,
                password_hash,
                avatar_url,
                email_verified,
                created_at,
                updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)",
        )
        .bind(email.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn update_name(&self, user_id: &UserId, name: &DisplayName) -> AuthResult<()> {
        sqlx::query("UPDATE users SET name = $2, updated_at = NOW() WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .bind(name.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn update_password(&self, user_id: &UserId, password: &UserPassword) -> AuthResult<()> {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .bind(password.as_phc_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn mark_email_verified(&self, user_id: &UserId) -> AuthResult<()> {
        sqlx::query("UPDATE users SET email_verified = TRUE, updated_at = NOW() WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for PgAuthRepository {
    async fn create(&self, session: &Session) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (
                session_id,
                user_id,
                valid,
                client_ip,
                user_agent,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(session.session_id)
        .bind(session.user_id.as_uuid())
        .bind(session.valid)
        .bind(&session.client_ip)
        .bind(&session.user_agent)
        .bind(session.created_at)
        .bind(session.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, session_id: Uuid) -> AuthResult<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT
                session_id,
                user_id,
                valid,
                client_ip,
                user_agent,
                created_at,
                updated_at
            FROM sessions
            WHERE session_id = $1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_session()))
    }

    async fn delete(&self, session_id: Uuid) -> AuthResult<()> {
        sqlx::query("DELETE FROM sessions WHERE session_id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// ============================================================================
// OAuth Account Repository Implementation
// ============================================================================

impl OauthAccountRepository for PgAuthRepository {
    async fn find_user_with_link(
        &self,
        provider: &OauthProvider,
        email: &Email,
    ) -> AuthResult<Option<UserWithProviderLink>> {
        let row = sqlx::query_as::<_, UserWithLinkRow>(
            r#"
            SELECT
                u.user_id,
                u.public_id,
                u.name,
                u.email,
                u.password_hash,
                u.avatar_url,
                u.email_verified,
                u.created_at,
                u.updated_at,
                oa.provider AS link_provider,
                oa.provider_account_id AS link_account_id,
                oa.created_at AS link_created_at
            FROM users u
            LEFT JOIN oauth_accounts oa
                ON oa.user_id = u.user_id AND oa.provider = $2
            WHERE u.email = $1
            "#,
        )
        .bind(email.as_str())
        .bind(provider.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_lookup()).transpose()
    }

    async fn link_account(&self, link: &OauthAccount, avatar_url: Option<&str>) -> AuthResult<()> {
        let mut tx = self.pool.begin().await?;

        insert_link(&mut *tx, link).await?;

        // Backfill only; a user-chosen avatar is never overwritten
        if let Some(url) = avatar_url {
            sqlx::query(
                r#"
                UPDATE users SET avatar_url = $2, updated_at = NOW()
                WHERE user_id = $1 AND avatar_url IS NULL
                "#,
            )
            .bind(link.user_id.as_uuid())
            .bind(url)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    async fn create_user_with_link(&self, user: &User, link: &OauthAccount) -> AuthResult<()> {
        let mut tx = self.pool.begin().await?;

        insert_user(&mut *tx, user).await?;
        insert_link(&mut *tx, link).await?;

        tx.commit().await?;

        Ok(())
    }
}

// ============================================================================
// Email Verification Repository Implementation
// ============================================================================

impl EmailVerificationRepository for PgAuthRepository {
    async fn replace_code(&self, code: &EmailVerificationCode) -> AuthResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM email_verification_tokens WHERE user_id = $1")
            .bind(code.user_id.as_uuid())
            .execute(&mut *tx)
            .await?;

        // Opportunistic sweep of other users' dead rows
        sqlx::query("DELETE FROM email_verification_tokens WHERE expires_at <= NOW()")
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO email_verification_tokens (user_id, code, expires_at, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(code.user_id.as_uuid())
        .bind(&code.code)
        .bind(code.expires_at)
        .bind(code.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn consume_code(&self, email: &Email, code: &str) -> AuthResult<Option<UserId>> {
        let mut tx = self.pool.begin().await?;

        let user_id: Option<Uuid> = sqlx::query_scalar(
            r#"
            DELETE FROM email_verification_tokens t
            USING users u
            WHERE t.user_id = u.user_id
              AND u.email = $1
              AND t.code = $2
              AND t.expires_at > NOW()
            RETURNING t.user_id
            "#,
        )
        .bind(email.as_str())
        .bind(code)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(user_id) = user_id else {
            tx.rollback().await?;
            return Ok(None);
        };

        // A verified address needs no other outstanding codes
        sqlx::query("DELETE FROM email_verification_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(UserId::from_uuid(user_id)))
    }
}

// ============================================================================
// Password Reset Repository Implementation
// ============================================================================

impl PasswordResetRepository for PgAuthRepository {
    async fn replace_token(&self, token: &PasswordResetToken) -> AuthResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM password_reset_tokens WHERE user_id = $1")
            .bind(token.user_id.as_uuid())
            .execute(&mut *tx)
            .await?;

        // Opportunistic sweep of other users' dead rows
        sqlx::query("DELETE FROM password_reset_tokens WHERE expires_at <= NOW()")
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO password_reset_tokens (user_id, token_hash, expires_at, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(token.user_id.as_uuid())
        .bind(&token.token_hash)
        .bind(token.expires_at)
        .bind(token.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn consume_token(
        &self,
        token_hash: &str,
        new_password: &UserPassword,
    ) -> AuthResult<Option<UserId>> {
        let mut tx = self.pool.begin().await?;

        let user_id: Option<Uuid> = sqlx::query_scalar(
            r#"
            DELETE FROM password_reset_tokens
            WHERE token_hash = $1 AND expires_at > NOW()
            RETURNING user_id
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(user_id) = user_id else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE user_id = $1")
            .bind(user_id)
            .bind(new_password.as_phc_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(UserId::from_uuid(user_id)))
    }
}

// ============================================================================
// Shared statements
// ============================================================================

async fn insert_user<'c>(executor: impl PgExecutor<'c>, user: &User) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO users (
            user_id,
            public_id,
            name,
            email,
            password_hash,
            avatar_url,
            email_verified,
            created_at,
            updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(user.user_id.as_uuid())
    .bind(user.public_id.as_str())
    .bind(user.name.as_str())
    .bind(user.email.as_str())
    .bind(user.password_hash.as_ref().map(|p| p.as_phc_string()))
    .bind(&user.avatar_url)
    .bind(user.email_verified)
    .bind(user.created_at)
    .bind(user.updated_at)
    .execute(executor)
    .await?;

    Ok(())
}

async fn insert_link<'c>(
    executor: impl PgExecutor<'c>,
    link: &OauthAccount,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO oauth_accounts (user_id, provider, provider_account_id, created_at)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(link.user_id.as_uuid())
    .bind(link.provider.as_str())
    .bind(&link.provider_account_id)
    .bind(link.created_at)
    .execute(executor)
    .await?;

    Ok(())
}

/// Map a unique violation on `users.email` to the registration conflict
fn unique_to_exists(e: sqlx::Error) -> AuthError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return AuthError::AlreadyExists;
        }
    }
    AuthError::Database(e)
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    public_id: String,
    name: String,
    email: String,
    password_hash: Option<String>,
    avatar_url: Option<String>,
    email_verified: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let public_id = PublicId::from_nanoid(
            Nanoid::from_str(&self.public_id)
                .map_err(|e| AuthError::Internal(format!("Invalid public_id: {}", e)))?,
        );

        let password_hash = self
            .password_hash
            .map(UserPassword::from_phc_string)
            .transpose()
            .map_err(|_| AuthError::Internal("Invalid password hash in users row".to_string()))?;

        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            public_id,
            name: DisplayName::from_db(self.name),
            email: Email::from_db(self.email),
            password_hash,
            avatar_url: self.avatar_url,
            email_verified: self.email_verified,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    session_id: Uuid,
    user_id: Uuid,
    valid: bool,
    client_ip: Option<String>,
    user_agent: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self) -> Session {
        Session {
            session_id: self.session_id,
            user_id: UserId::from_uuid(self.user_id),
            valid: self.valid,
            client_ip: self.client_ip,
            user_agent: self.user_agent,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct UserWithLinkRow {
    #[sqlx(flatten)]
    user: UserRow,
    link_provider: Option<String>,
    link_account_id: Option<String>,
    link_created_at: Option<DateTime<Utc>>,
}

impl UserWithLinkRow {
    fn into_lookup(self) -> AuthResult<UserWithProviderLink> {
        let user = self.user.into_user()?;

        let link = match (self.link_provider, self.link_account_id, self.link_created_at) {
            (Some(provider), Some(account_id), Some(created_at)) => Some(OauthAccount {
                user_id: user.user_id,
                provider: OauthProvider::from_db(provider),
                provider_account_id: account_id,
                created_at,
            }),
            _ => None,
        };

        Ok(UserWithProviderLink { user, link })
    }
}
