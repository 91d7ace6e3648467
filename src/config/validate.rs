use anyhow::{Result, bail};

use super::{AppConfig, RateLimitBackend};

const MIN_SESSION_SECRET_LEN: usize = 16;

pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.general.host.trim().is_empty() {
        errors.push("general.host must not be empty".to_string());
    }

    if let Some(database) = cfg.database.as_ref() {
        if database.url.trim().is_empty() {
            errors.push("database.url must not be empty".to_string());
        }

        if database.min_idle > database.max_connections {
            errors.push(format!(
                "database.min_idle ({}) must be <= database.max_connections ({})",
                database.min_idle, database.max_connections
            ));
        }
    }

    if let Some(auth) = cfg.auth.as_ref() {
        if auth.admin_email.trim().is_empty() {
            errors.push("auth.admin_email must not be empty".to_string());
        }

        if auth.admin_password.len() < 8 {
            errors.push("auth.admin_password must be at least 8 characters".to_string());
        }

        if auth.session_secret.len() < MIN_SESSION_SECRET_LEN {
            errors.push(format!(
                "auth.session_secret must be at least {MIN_SESSION_SECRET_LEN} characters"
            ));
        }

        if auth.session_ttl_hours <= 0 {
            errors.push("auth.session_ttl_hours must be > 0".to_string());
        }
    }

    if let Some(rate_limit) = cfg.rate_limit.as_ref()
        && rate_limit.backend == RateLimitBackend::Upstash
    {
        let has_url = !rate_limit.url.trim().is_empty();
        let has_token = !rate_limit.token.trim().is_empty();
        if has_url != has_token {
            errors.push("rate_limit.url and rate_limit.token must be set together".to_string());
        }
        if has_url && !rate_limit.url.starts_with("http") {
            errors.push("rate_limit.url must be an http(s) URL".to_string());
        }
    }

    if let Some(email) = cfg.email.as_ref() {
        if email.from.trim().is_empty() {
            errors.push("email.from must not be empty".to_string());
        }
        if email.notify_to.trim().is_empty() {
            errors.push("email.notify_to must not be empty".to_string());
        }
    }

    if !cfg.site.public_url.starts_with("http") {
        errors.push("site.public_url must be an http(s) URL".to_string());
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}

#[cfg(test)]
mod tests {
    use super::validate;
    use crate::config::{AppConfig, AuthConfig, DatabaseConfig, RateLimitConfig};

    fn auth() -> AuthConfig {
        AuthConfig {
            session_secret: "0123456789abcdef".to_string(),
            session_ttl_hours: 24,
            admin_email: "admin@example.com".to_string(),
            admin_password: "adminpassword".to_string(),
            admin_name: "Admin".to_string(),
            secure_cookies: false,
        }
    }

    #[test]
    fn default_config_is_valid() {
        validate(&AppConfig::default()).expect("defaults should validate");
    }

    #[test]
    fn collects_every_problem_into_one_error() {
        let cfg = AppConfig {
            database: Some(DatabaseConfig {
                url: " ".to_string(),
                max_connections: 1,
                min_idle: 5,
            }),
            auth: Some(AuthConfig {
                session_secret: "short".to_string(),
                ..auth()
            }),
            ..Default::default()
        };

        let err = validate(&cfg).expect_err("config should be rejected").to_string();
        assert!(err.contains("database.url must not be empty"));
        assert!(err.contains("database.min_idle (5)"));
        assert!(err.contains("auth.session_secret"));
    }

    #[test]
    fn rate_limit_url_requires_token() {
        let cfg = AppConfig {
            auth: Some(auth()),
            rate_limit: Some(RateLimitConfig {
                url: "https://example.upstash.io".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };

        let err = validate(&cfg).expect_err("config should be rejected").to_string();
        assert!(err.contains("rate_limit.url and rate_limit.token must be set together"));
    }
}
