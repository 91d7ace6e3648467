use std::path::{Path, PathBuf};

use ::config as config_rs;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Environment-first configuration loader.
///
/// Values come from `APP_*` variables (`APP_DATABASE__URL`, `APP_AUTH__ADMIN_EMAIL`, ...),
/// optionally layered over a TOML file named by `KITCHEN_CONFIG_FILE`. Environment always wins.
/// The file variable sits outside the `APP_` prefix so it never reaches the typed config.
pub trait EnvConfig: Sized + DeserializeOwned {
    const PREFIX: &'static str = "APP";
    const SEPARATOR: &'static str = "__";
    const FILE_VAR: &'static str = "KITCHEN_CONFIG_FILE";

    fn load_dotenv() {
        let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
        let _ = dotenvy::from_filename(manifest_dir.join(".env")).or_else(|_| dotenvy::dotenv());
    }

    fn config_file() -> Option<PathBuf> {
        std::env::var_os(Self::FILE_VAR)
            .map(PathBuf::from)
            .filter(|path| !path.as_os_str().is_empty())
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn from_env() -> Result<Self> {
        Self::load_dotenv();

        let mut builder = config_rs::Config::builder();
        if let Some(path) = Self::config_file() {
            tracing::debug!(path = %path.display(), "layering config file under environment");
            builder = builder.add_source(config_rs::File::from(path.clone()).required(true));
        }

        let settings = builder
            .add_source(
                config_rs::Environment::with_prefix(Self::PREFIX)
                    .prefix_separator("_")
                    .separator(Self::SEPARATOR)
                    .try_parsing(true),
            )
            .build()
            .context("failed to read configuration sources")?;

        let cfg = settings
            .try_deserialize::<Self>()
            .context("failed to deserialize configuration")?;

        cfg.validate()?;
        Ok(cfg)
    }
}
