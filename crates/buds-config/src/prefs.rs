use anyhow::{Context, Result};
use buds_core::prefs::PrefsStore;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::info;

/// TOML-backed key-value store for the committed mapping and calibration.
///
/// The whole file is rewritten on every set; with a handful of keys that
/// change only on explicit user actions, that keeps the format trivial and
/// the file hand-editable.
#[derive(Debug)]
pub struct FilePrefs {
    path: PathBuf,
    values: BTreeMap<String, toml::Value>,
}

impl FilePrefs {
    /// Open the store at `path`, loading existing values. A missing file is
    /// a first run, not an error.
    pub fn open(path: PathBuf) -> Result<Self> {
        let values = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let values = parse_values(&contents)?;
            info!(?path, keys = values.len(), "Loaded saved state");
            values
        } else {
            info!("No saved state, starting fresh");
            BTreeMap::new()
        };
        Ok(Self { path, values })
    }

    fn write_back(&self) -> Result<()> {
        let contents = render_values(&self.values)?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

fn parse_values(contents: &str) -> Result<BTreeMap<String, toml::Value>> {
    Ok(toml::from_str(contents)?)
}

fn render_values(values: &BTreeMap<String, toml::Value>) -> Result<String> {
    Ok(toml::to_string_pretty(values)?)
}

impl PrefsStore for FilePrefs {
    fn get_int(&self, key: &str) -> Option<i64> {
        self.values.get(key).and_then(toml::Value::as_integer)
    }

    fn get_float(&self, key: &str) -> Option<f32> {
        let value = self.values.get(key)?;
        // Hand-edited integers still count as numbers.
        value
            .as_float()
            .or_else(|| value.as_integer().map(|v| v as f64))
            .map(|v| v as f32)
    }

    fn set_int(&mut self, key: &str, value: i64) -> Result<()> {
        self.values
            .insert(key.to_string(), toml::Value::Integer(value));
        self.write_back()
    }

    fn set_float(&mut self, key: &str, value: f32) -> Result<()> {
        self.values
            .insert(key.to_string(), toml::Value::Float(value as f64));
        self.write_back()
    }
}
