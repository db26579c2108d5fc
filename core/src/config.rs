//! Settings loaded from `settings.yaml` in the config directory.
//!
//! Every field has a default, so a partial or missing file is fine. Relative
//! paths are resolved against the config directory.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{EditorError, Result};
use crate::types::Seed;

/// Name of the settings file inside the config directory.
pub const SETTINGS_FILE: &str = "settings.yaml";


#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Write form state to `storage_file` on every change.
    pub persist: bool,
    pub storage_file: String,
    /// Optional JSON seed (`{"params": [...], "model": {...}}`).
    pub defaults_file: Option<String>,
    pub log_level: String,
    pub log_file: String,
    pub theme: String,
    /// Two label clicks within this window count as a double activation.
    pub double_click_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            persist: true,
            storage_file: "storage.json".into(),
            defaults_file: None,
            log_level: "info".into(),
            log_file: "param-editor.log".into(),
            theme: "dark".into(),
            double_click_ms: 400,
        }
    }
}

impl Settings {
    /// Load `settings.yaml` from `config_dir`, or defaults when absent.
    pub fn load(config_dir: &Path) -> Result<Self> {
        let path = config_dir.join(SETTINGS_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no settings file, using defaults");
                return Ok(Settings::default());
            }
            Err(e) => return Err(e.into()),
        };
        Self::parse(&content).map_err(|source| EditorError::Yaml { path, source })
    }

    /// Parse settings from YAML text. An empty document yields defaults.
    pub fn parse(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Settings::default());
        }
        serde_yaml::from_str(content)
    }

    pub fn storage_path(&self, config_dir: &Path) -> PathBuf {
        resolve(config_dir, &self.storage_file)
    }

    pub fn log_path(&self, config_dir: &Path) -> PathBuf {
        resolve(config_dir, &self.log_file)
    }

    /// Load the seed named by `defaults_file`, or the built-in sample.
    pub fn load_seed(&self, config_dir: &Path) -> Result<Seed> {
        match &self.defaults_file {
            Some(file) => {
                let content = std::fs::read_to_string(resolve(config_dir, file))?;
                Ok(serde_json::from_str(&content)?)
            }
            None => Ok(Seed::sample()),
        }
    }
}


fn resolve(config_dir: &Path, file: &str) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        config_dir.join(p)
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Param;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let s = Settings::load(dir.path()).unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let s = Settings::parse("theme: light\npersist: false\n").unwrap();
        assert_eq!(s.theme, "light");
        assert!(!s.persist);
        assert_eq!(s.double_click_ms, 400);
        assert_eq!(s.storage_file, "storage.json");
    }

    #[test]
    fn empty_yaml_gives_defaults() {
        assert_eq!(Settings::parse("  \n").unwrap(), Settings::default());
    }

    #[test]
    fn invalid_yaml_is_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "persist: [1, 2").unwrap();
        assert!(matches!(
            Settings::load(dir.path()),
            Err(EditorError::Yaml { .. })
        ));
    }

    #[test]
    fn load_reads_file_from_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "log_level: debug
").unwrap();
        let s = Settings::load(dir.path()).unwrap();
        assert_eq!(s.log_level, "debug");
        assert_eq!(s.theme, "dark");
    }

    #[test]
    fn relative_paths_resolve_against_config_dir() {
        let s = Settings::default();
        let dir = Path::new("/tmp/pe");
        assert_eq!(s.storage_path(dir), PathBuf::from("/tmp/pe/storage.json"));
        let mut abs = Settings::default();
        abs.log_file = "/var/log/pe.log".into();
        assert_eq!(abs.log_path(dir), PathBuf::from("/var/log/pe.log"));
    }

    #[test]
    fn seed_defaults_to_sample() {
        let dir = tempfile::tempdir().unwrap();
        let seed = Settings::default().load_seed(dir.path()).unwrap();
        assert_eq!(seed, Seed::sample());
    }

    #[test]
    fn seed_from_defaults_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("seed.json"),
            r#"{"params":[{"id":1,"name":"Sleeve","type":"string"}],
                "model":{"paramValues":[{"paramId":1,"value":"long"}]}}"#,
        )
        .unwrap();
        let mut s = Settings::default();
        s.defaults_file = Some("seed.json".into());
        let seed = s.load_seed(dir.path()).unwrap();
        assert_eq!(seed.params, vec![Param::new(1, "Sleeve")]);
        assert_eq!(seed.model.param_values[0].value, "long");
    }
}
