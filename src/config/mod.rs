pub mod configs;
pub mod defaults;
pub mod envconfig;
pub mod validate;

pub use configs::{
    AppConfig, AuthConfig, DatabaseConfig, EmailConfig, GeneralConfig, LoggingConfig,
    RateLimitBackend, RateLimitConfig, SiteConfig,
};
pub use envconfig::EnvConfig;
