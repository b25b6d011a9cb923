//! Last-used configuration storage

use crate::{Configuration, Result};

/// Persists the configuration between sessions
pub trait ConfigStore {
    /// Loads the last saved configuration, `None` if nothing was saved yet
    fn load(&self) -> Result<Option<Configuration>>;

    /// Saves the configuration as the new last-used one
    fn save(&mut self, config: &Configuration) -> Result<()>;
}

/// Loads the last-used configuration, falling back to the built-in defaults
/// when nothing was saved or the store cannot be read.
pub fn load_or_default(store: &dyn ConfigStore) -> Configuration {
    match store.load() {
        Ok(Some(config)) => config.normalized(),
        Ok(None) => Configuration::default(),
        Err(e) => {
            tracing::warn!("Failed to load saved configuration, using defaults: {e}");
            Configuration::default()
        }
    }
}

/// In-process store, shared by the sessions of one host
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    saved: Option<Configuration>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with a configuration
    pub fn with(config: Configuration) -> Self {
        Self {
            saved: Some(config),
        }
    }
}

impl ConfigStore for MemoryStore {
    fn load(&self) -> Result<Option<Configuration>> {
        Ok(self.saved.clone())
    }

    fn save(&mut self, config: &Configuration) -> Result<()> {
        self.saved = Some(config.clone());
        Ok(())
    }
}

#[cfg(feature = "serde")]
pub use json::JsonFileStore;

#[cfg(feature = "serde")]
mod json {
    use super::ConfigStore;
    use crate::{Configuration, Result};
    use std::fs;
    use std::io::{self, Write};
    use std::path::{Path, PathBuf};

    /// Store backed by a pretty-printed JSON file
    #[derive(Debug, Clone)]
    pub struct JsonFileStore {
        path: PathBuf,
    }

    impl JsonFileStore {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        /// Removes the saved file so the next load yields defaults
        pub fn clear(&mut self) -> Result<()> {
            match fs::remove_file(&self.path) {
                Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            }
        }
    }

    impl ConfigStore for JsonFileStore {
        fn load(&self) -> Result<Option<Configuration>> {
            let content = match fs::read_to_string(&self.path) {
                Ok(content) => content,
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
                Err(e) => return Err(e.into()),
            };
            let config: Configuration = serde_json::from_str(&content)?;
            tracing::debug!("Loaded configuration from {}", self.path.display());
            Ok(Some(config))
        }

        /// Writes to a temp file first, then renames over the target
        fn save(&mut self, config: &Configuration) -> Result<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }

            let content = serde_json::to_string_pretty(config)?;
            let tmp_path = self.path.with_extension("json.tmp");
            {
                let mut file = fs::File::create(&tmp_path)?;
                file.write_all(content.as_bytes())?;
                file.sync_all()?;
            }
            fs::rename(&tmp_path, &self.path)?;

            tracing::debug!("Saved configuration to {}", self.path.display());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, Location};

    struct BrokenStore;

    impl ConfigStore for BrokenStore {
        fn load(&self) -> Result<Option<Configuration>> {
            Err(Error::Io(std::io::Error::other("disk on fire")))
        }

        fn save(&mut self, _config: &Configuration) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert!(store.load().unwrap().is_none());

        let config = Configuration {
            location: Location::LowerLeft,
            ..Configuration::default()
        };
        store.save(&config).unwrap();
        assert_eq!(store.load().unwrap(), Some(config));
    }

    #[test]
    fn test_load_or_default() {
        assert_eq!(load_or_default(&BrokenStore), Configuration::default());
        assert_eq!(load_or_default(&MemoryStore::new()), Configuration::default());

        let tiny_font = Configuration {
            font_size: 1,
            ..Configuration::default()
        };
        assert_eq!(load_or_default(&MemoryStore::with(tiny_font)).font_size, 5);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_store() {
        use crate::{DurationTemplate, NamedColor};

        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("nested").join("timebar.json"));
        assert!(store.load().unwrap().is_none());

        let config = Configuration {
            background_color: Some(NamedColor::DarkGray),
            bar_color: None,
            duration_template: DurationTemplate::HoursToSeconds,
            location: Location::AtSelection,
            ..Configuration::default()
        };
        store.save(&config).unwrap();
        assert_eq!(store.load().unwrap(), Some(config));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_store_partial_and_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timebar.json");

        std::fs::write(&path, r#"{ "location": "lower-right", "font_size": 30 }"#).unwrap();
        let store = JsonFileStore::new(&path);
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.location, Location::LowerRight);
        assert_eq!(loaded.font_size, 30);
        assert_eq!(loaded.bar_thickness, 4);

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(store.load(), Err(Error::Json(_))));
        assert_eq!(load_or_default(&store), Configuration::default());
    }
}
