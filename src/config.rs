use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct MinicommerceConfig {
    pub database: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Effective server settings after merging CLI flags, config file and defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub database: PathBuf,
    pub host: String,
    pub port: u16,
}

impl MinicommerceConfig {
    /// CLI values win over the file, the file wins over defaults
    pub fn resolve(
        &self,
        database: Option<PathBuf>,
        host: Option<String>,
        port: Option<u16>,
    ) -> ServerSettings {
        ServerSettings {
            database: database
                .or_else(|| self.database.as_ref().map(PathBuf::from))
                .unwrap_or_else(default_database_path),
            host: host
                .or_else(|| self.host.clone())
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: port.or(self.port).unwrap_or(DEFAULT_PORT),
        }
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("minicommerce.toml")
}

pub fn default_database_path() -> PathBuf {
    default_database_path_in(Path::new("."))
}

pub fn default_database_path_in(base: &Path) -> PathBuf {
    base.join(".minicommerce").join("minicommerce.db")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<MinicommerceConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: MinicommerceConfig = toml::from_str(&contents)?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &MinicommerceConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Fail unless a database file already exists at `db_path`
pub fn require_db_file(db_path: &Path) -> anyhow::Result<()> {
    if !db_path.is_file() {
        anyhow::bail!("no database at {} (run `minicommerce serve` to create one)", db_path.display());
    }
    Ok(())
}
