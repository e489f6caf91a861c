/// CLI configuration
use crate::error::{CliError, Result};
use playcard_client::{ClientConfig, FailurePolicy, IngestOptions, PollSettings, DEFAULT_API_URL};
use playcard_core::IconRef;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "playcard.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default = "default_api")]
    pub api: ApiSettings,

    #[serde(default = "default_upload")]
    pub upload: UploadSettings,

    #[serde(default)]
    pub playlist: PlaylistSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiSettings {
    #[serde(default = "default_api_url")]
    pub url: String,

    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadSettings {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_poll_attempts")]
    pub poll_attempts: u32,

    #[serde(default)]
    pub loudnorm: bool,

    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlaylistSettings {
    /// Icon for new chapters: a URL, a `yoto:#` reference or a bare media id
    #[serde(default)]
    pub default_icon: Option<String>,
}

impl CliConfig {
    /// Load configuration from file and environment.
    ///
    /// An explicit `path` must exist; otherwise `playcard.toml` is read when
    /// present. Variables such as `PLAYCARD_API__TOKEN` or
    /// `PLAYCARD_UPLOAD__CONCURRENCY` override the file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, environment())
    }

    fn load_with(path: Option<&Path>, env: config::Environment) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let config_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if config_path.exists() {
                    settings = settings.add_source(config::File::from(config_path));
                }
            }
        }

        settings = settings.add_source(env);

        let config = settings
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api.token.trim().is_empty() {
            return Err(CliError::Config(
                "API token is required (set PLAYCARD_API__TOKEN or pass --token)".to_string(),
            ));
        }

        if !self.api.url.starts_with("http://") && !self.api.url.starts_with("https://") {
            return Err(CliError::Config(format!(
                "API URL must start with http:// or https://, got {:?}",
                self.api.url
            )));
        }

        if self.upload.poll_interval_ms == 0 || self.upload.poll_attempts == 0 {
            return Err(CliError::Config(
                "Poll interval and attempts must be positive".to_string(),
            ));
        }

        if self.upload.concurrency == 0 {
            return Err(CliError::Config(
                "Upload concurrency must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::with_url(self.api.url.clone(), self.api.token.clone())
    }

    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions {
            poll: PollSettings {
                loudnorm: self.upload.loudnorm,
                ..PollSettings::new(
                    Duration::from_millis(self.upload.poll_interval_ms),
                    self.upload.poll_attempts,
                )
            },
            concurrency: self.upload.concurrency,
            failure_policy: self.upload.failure_policy,
        }
    }

    pub fn default_icon(&self) -> Option<IconRef> {
        self.playlist.default_icon.as_deref().and_then(IconRef::parse)
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("PLAYCARD")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

// Default values
fn default_api() -> ApiSettings {
    ApiSettings {
        url: default_api_url(),
        token: String::new(),
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_upload() -> UploadSettings {
    UploadSettings {
        poll_interval_ms: default_poll_interval_ms(),
        poll_attempts: default_poll_attempts(),
        loudnorm: false,
        concurrency: default_concurrency(),
        failure_policy: FailurePolicy::default(),
    }
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_poll_attempts() -> u32 {
    120
}

fn default_concurrency() -> usize {
    1
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            api: default_api(),
            upload: default_upload(),
            playlist: PlaylistSettings::default(),
        }
    }
}
