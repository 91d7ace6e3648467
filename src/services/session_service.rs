use chrono::Utc;

use crate::{
    auth::{
        CurrentUser, Role,
        jwt::{SessionKeys, decode_session, encode_session, make_session_claims},
        password::{hash_password, verify_password},
    },
    config::AuthConfig,
    db::dao::{DaoBase, DaoLayerError, SessionDao, UserDao},
    db::entities::user,
    error::AppError,
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const INVALID_SESSION: &str = "Invalid or expired session";

/// A freshly opened session: the signed envelope handed to the client.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub max_age_secs: i64,
    pub user: CurrentUser,
}

/// Login, logout and per-request session resolution.
#[derive(Clone)]
pub struct SessionService {
    users: UserDao,
    sessions: SessionDao,
    keys: SessionKeys,
    ttl_hours: i64,
}

impl SessionService {
    pub fn new(users: UserDao, sessions: SessionDao, keys: SessionKeys, ttl_hours: i64) -> Self {
        Self {
            users,
            sessions,
            keys,
            ttl_hours,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedSession, AppError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::unauthorized(INVALID_CREDENTIALS))?;

        if !verify_password(password, &user.password_hash) {
            tracing::info!(user_id = %user.id, "login rejected: wrong password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let row = self.sessions.open_session(&user.id, self.ttl_hours).await?;
        let claims = make_session_claims(&row.token, &user.id, self.ttl_hours);
        let token = encode_session(&self.keys, &claims)?;

        let now = Utc::now().fixed_offset();
        self.users.set_last_login(&user.id, &now).await?;
        tracing::info!(user_id = %user.id, "session opened");

        Ok(IssuedSession {
            token,
            max_age_secs: self.ttl_hours * 3600,
            user: current_user(user, row.token),
        })
    }

    /// Deletes the row behind `envelope`. Unknown or expired sessions are a no-op.
    pub async fn logout(&self, envelope: &str) -> Result<(), AppError> {
        let Ok(claims) = decode_session(&self.keys, envelope) else {
            return Ok(());
        };
        let closed = self.sessions.close_session(&claims.sid).await?;
        tracing::debug!(closed, "session closed");
        Ok(())
    }

    /// Envelope first (no storage access on a bad token), then the live row.
    pub async fn resolve(&self, envelope: &str) -> Result<CurrentUser, AppError> {
        let claims = decode_session(&self.keys, envelope)?;

        let row = self
            .sessions
            .find_live(&claims.sid)
            .await?
            .ok_or_else(|| AppError::unauthorized(INVALID_SESSION))?;
        if row.user_id.to_string() != claims.sub {
            tracing::warn!(session_user = %row.user_id, "session envelope subject mismatch");
            return Err(AppError::unauthorized(INVALID_SESSION));
        }

        let user = match self.users.find_by_id(row.user_id).await {
            Ok(user) => user,
            Err(DaoLayerError::NotFound { .. }) => {
                return Err(AppError::unauthorized(INVALID_SESSION));
            }
            Err(err) => return Err(err.into()),
        };
        Ok(current_user(user, row.token))
    }

    pub async fn purge_expired(&self) -> Result<u64, AppError> {
        Ok(self.sessions.purge_expired().await?)
    }

    /// Creates the configured admin account when no user holds its email.
    pub async fn bootstrap_admin(&self, cfg: &AuthConfig) -> anyhow::Result<()> {
        if let Some(existing) = self
            .users
            .find_by_email(&cfg.admin_email)
            .await
            .map_err(|err| anyhow::anyhow!("{err}"))?
        {
            tracing::info!("admin user already present: {}", existing.email);
            return Ok(());
        }

        let hash = hash_password(&cfg.admin_password)
            .map_err(|err| anyhow::anyhow!("admin bootstrap hash error: {err}"))?;
        let user = self
            .users
            .create_user(&cfg.admin_name, &cfg.admin_email, &hash, Role::Admin)
            .await
            .map_err(|err| anyhow::anyhow!("{err}"))?;
        tracing::info!("bootstrapped admin user {}", user.email);
        Ok(())
    }
}

fn current_user(user: user::Model, session_token: String) -> CurrentUser {
    CurrentUser {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
        session_token,
    }
}
