//! Process configuration: an optional TOML file plus `FOODPRICE__*`
//! environment overrides, read once at startup.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use foodprice_loader::LoadOptions;
use foodprice_store_sqlite::StoreConfig;
use serde::Deserialize;

/// Shape of `foodprice.toml`.
///
/// ```toml
/// extract = "~/data/wfp_food_prices_ken.csv"
///
/// [store]
/// path = "~/data/foodprice.sqlite"
///
/// [load.region]
/// source = "admin1"
/// ```
#[derive(Deserialize)]
pub struct AppConfig {
  #[serde(default = "default_store")]
  pub store:   StoreConfig,
  /// Extract loaded when `--extract` is not given.
  #[serde(default)]
  pub extract: Option<PathBuf>,
  #[serde(default)]
  pub load:    LoadOptions,
}

fn default_store() -> StoreConfig { StoreConfig::new("foodprice.sqlite") }

impl AppConfig {
  pub fn load(path: &Path) -> anyhow::Result<Self> { Self::load_with_env(path, env()) }

  fn load_with_env(path: &Path, env: config::Environment) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(env)
      .build()
      .with_context(|| format!("config stage failed: cannot read {}", path.display()))?;

    let mut cfg: AppConfig = settings
      .try_deserialize()
      .context("config stage failed: invalid settings")?;

    cfg.store.path = expand_tilde(&cfg.store.path);
    cfg.extract = cfg.extract.as_deref().map(expand_tilde);
    Ok(cfg)
  }
}

/// `FOODPRICE__STORE__PATH=...` overrides `store.path`, and so on.
fn env() -> config::Environment {
  config::Environment::with_prefix("FOODPRICE").separator("__").try_parsing(true)
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
