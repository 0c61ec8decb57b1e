use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub server: Option<ServerConfig>,
    pub summarizer: Option<SummarizerConfig>,
    pub api_keys: Option<ApiKeysConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: Option<String>,
    pub max_upload_mb: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummarizerConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiKeysConfig {
    pub cohere_api_key: Option<String>,
}

/// Platform config directory path: `<config_dir>/docudigest/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("docudigest").join("config.toml"))
}

/// Load config by cascading CWD `.docudigest.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".docudigest.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        server: Some(ServerConfig {
            bind: overlay
                .server
                .as_ref()
                .and_then(|s| s.bind.clone())
                .or_else(|| base.server.as_ref().and_then(|s| s.bind.clone())),
            max_upload_mb: overlay
                .server
                .as_ref()
                .and_then(|s| s.max_upload_mb)
                .or_else(|| base.server.as_ref().and_then(|s| s.max_upload_mb)),
        }),
        summarizer: Some(SummarizerConfig {
            base_url: overlay
                .summarizer
                .as_ref()
                .and_then(|s| s.base_url.clone())
                .or_else(|| base.summarizer.as_ref().and_then(|s| s.base_url.clone())),
            timeout_secs: overlay
                .summarizer
                .as_ref()
                .and_then(|s| s.timeout_secs)
                .or_else(|| base.summarizer.as_ref().and_then(|s| s.timeout_secs)),
        }),
        api_keys: Some(ApiKeysConfig {
            cohere_api_key: overlay
                .api_keys
                .as_ref()
                .and_then(|a| a.cohere_api_key.clone())
                .or_else(|| {
                    base.api_keys
                        .as_ref()
                        .and_then(|a| a.cohere_api_key.clone())
                }),
        }),
    }
}
