//! Persisted tool preferences.
//!
//! Settings are stored per tool name as JSON values, so each tool owns its
//! own schema and unknown tools survive a load/save cycle untouched.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::formats::heightmap::HeightmapOptions;
use crate::selection::config::MagneticConfig;

pub const MAGNETIC_SELECT_KEY: &str = "magnetic_select";
pub const HEIGHTMAP_KEY: &str = "heightmap";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    tools: BTreeMap<String, serde_json::Value>,
}

impl Preferences {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load preferences from `path`; a missing file gives empty preferences.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => Self::from_json(&text),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn contains(&self, tool: &str) -> bool {
        self.tools.contains_key(tool)
    }

    /// Typed settings for `tool`, or `T::default()` when none are stored.
    pub fn get<T>(&self, tool: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        match self.tools.get(tool) {
            Some(value) => Ok(T::deserialize(value)?),
            None => Ok(T::default()),
        }
    }

    pub fn set<T: Serialize>(&mut self, tool: &str, value: &T) -> Result<()> {
        self.tools.insert(tool.to_string(), serde_json::to_value(value)?);
        Ok(())
    }

    /// Stored magnetic selection settings, falling back to the defaults when
    /// the stored values are unreadable or out of range.
    pub fn magnetic_config(&self) -> MagneticConfig {
        let config = match self.get::<MagneticConfig>(MAGNETIC_SELECT_KEY) {
            Ok(config) => config,
            Err(err) => {
                warn!(%err, "unreadable magnetic selection settings, using defaults");
                return MagneticConfig::default();
            }
        };
        match config.validate() {
            Ok(()) => config,
            Err(err) => {
                warn!(%err, "stored magnetic selection settings rejected, using defaults");
                MagneticConfig::default()
            }
        }
    }

    pub fn set_magnetic_config(&mut self, config: &MagneticConfig) -> Result<()> {
        config.validate()?;
        self.set(MAGNETIC_SELECT_KEY, config)
    }

    pub fn heightmap_options(&self) -> Result<HeightmapOptions> {
        self.get(HEIGHTMAP_KEY)
    }

    pub fn set_heightmap_options(&mut self, options: &HeightmapOptions) -> Result<()> {
        self.set(HEIGHTMAP_KEY, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::heightmap::ByteOrder;
    use crate::selection::rasterize::FillRule;

    #[test]
    fn test_missing_tool_gives_default() {
        let prefs = Preferences::default();
        assert!(!prefs.contains(MAGNETIC_SELECT_KEY));
        assert_eq!(prefs.magnetic_config(), MagneticConfig::default());
        assert_eq!(prefs.heightmap_options().unwrap(), HeightmapOptions::default());
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let mut prefs = Preferences::default();
        let config = MagneticConfig {
            fill_rule: FillRule::EvenOdd,
            ..MagneticConfig::default().with_search_distance(45)
        };
        prefs.set_magnetic_config(&config).unwrap();
        prefs
            .set_heightmap_options(&HeightmapOptions::square(512, ByteOrder::LittleEndian))
            .unwrap();
        prefs.save(&path).unwrap();

        let loaded = Preferences::load(&path).unwrap();
        assert_eq!(loaded, prefs);
        assert_eq!(loaded.magnetic_config(), config);
        assert_eq!(loaded.heightmap_options().unwrap().byte_order, ByteOrder::LittleEndian);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Preferences::load(dir.path().join("none.json")).unwrap();
        assert_eq!(prefs, Preferences::default());
    }

    #[test]
    fn test_out_of_range_values_fall_back() {
        let prefs = Preferences::from_json(r#"{"tools": {"magnetic_select": {"search_distance": 200}}}"#).unwrap();
        assert_eq!(prefs.magnetic_config(), MagneticConfig::default());
    }

    #[test]
    fn test_unknown_tools_preserved() {
        let text = r#"{"tools": {"brush": {"size": 12}}}"#;
        let prefs = Preferences::from_json(text).unwrap();
        assert!(prefs.contains("brush"));
        let again = Preferences::from_json(&prefs.to_json().unwrap()).unwrap();
        assert_eq!(again, prefs);
    }

    #[test]
    fn test_set_rejects_invalid_config() {
        let mut prefs = Preferences::default();
        let bad = MagneticConfig {
            search_distance: 16,
            ..MagneticConfig::default()
        };
        assert!(prefs.set_magnetic_config(&bad).is_err());
        assert!(!prefs.contains(MAGNETIC_SELECT_KEY));
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(Preferences::from_json("{not json").is_err());
    }
}
