use std::path::PathBuf;

use cloud_storage::CloudStorageConfig;
use pipeline_state::PipelineStateConfig;
use service::settings::Settings;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable {0}")]
    Missing(&'static str),

    #[error("Failed to resolve default path: {0}")]
    Path(String),
}

/// Everything the binary reads from the environment (or a `.env` file) at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub cloud_storage: CloudStorageConfig,
    pub pipeline_state: PipelineStateConfig,
    pub temp_root_dir: PathBuf,
    pub legacy_audio_extension: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            database::get_database_url().map_err(|e| ConfigError::Path(e.to_string()))?;
        let temp_root_dir = match dotenvy::var("TEMP_ROOT_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => {
                file_system::get_temp_root_dir().map_err(|e| ConfigError::Path(e.to_string()))?
            }
        };

        Self::from_lookup(
            |name| dotenvy::var(name).ok(),
            database_url,
            temp_root_dir,
        )
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        database_url: String,
        temp_root_dir: PathBuf,
    ) -> Result<Self, ConfigError> {
        let required = |name: &'static str| lookup(name).ok_or(ConfigError::Missing(name));

        let cloud_storage = CloudStorageConfig {
            bucket: required("CLOUD_STORAGE_BUCKET")?,
            endpoint: required("CLOUD_STORAGE_ENDPOINT")?,
            region: lookup("CLOUD_STORAGE_REGION").unwrap_or_else(|| "auto".to_string()),
            bucket_uri_prefix: lookup("CLOUD_STORAGE_URI_PREFIX"),
        };

        let pipeline_state = match lookup("REDIS_URL") {
            Some(redis_url) => PipelineStateConfig { redis_url },
            None => PipelineStateConfig::default(),
        };

        Ok(Self {
            database_url,
            cloud_storage,
            pipeline_state,
            temp_root_dir,
            legacy_audio_extension: lookup("LEGACY_AUDIO_EXTENSION")
                .unwrap_or_else(|| "wav".to_string()),
        })
    }

    pub fn settings(&self) -> Settings {
        Settings {
            temp_root_dir: self.temp_root_dir.clone(),
            bucket_uri_prefix: self.cloud_storage.bucket_uri_prefix(),
            legacy_audio_extension: self.legacy_audio_extension.clone(),
        }
    }
}
