use std::path::PathBuf;

/// Settings injected into the deletion service once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Root of `{videos|audio|clips|thumbnails}/{identifier}` staging directories
    pub temp_root_dir: PathBuf,
    /// Prefix stored cloud urls carry in front of the object key, e.g. `gs://media/`
    pub bucket_uri_prefix: String,
    /// Extension of audio extracted before audio rows were recorded
    pub legacy_audio_extension: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            temp_root_dir: PathBuf::from("temp"),
            bucket_uri_prefix: String::new(),
            legacy_audio_extension: "wav".to_string(),
        }
    }
}
