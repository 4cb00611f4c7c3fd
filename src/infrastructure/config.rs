//! Configuration management

use crate::domain::GeometryKind;
use crate::error::{ArchShapeError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default config file name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "archshape.toml";

/// Environment variable naming a config file explicitly
pub const CONFIG_ENV: &str = "ARCHSHAPE_CONFIG";

/// Name and attribute fields of one output layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSchema {
    pub name: String,
    pub description_field: String,
    pub tag_field: String,
}

impl LayerSchema {
    fn new(name: &str, description_field: &str) -> Self {
        LayerSchema {
            name: name.to_string(),
            description_field: description_field.to_string(),
            tag_field: "excCoord".to_string(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ArchShapeError::Config("Layer name cannot be empty".to_string()));
        }
        // The name becomes part of a file name inside the output directory
        if self.name.contains(|c: char| c == '/' || c == '\\') {
            return Err(ArchShapeError::Config(format!(
                "Layer name '{}' cannot contain a path separator",
                self.name
            )));
        }
        if self.description_field == self.tag_field {
            return Err(ArchShapeError::Config(format!(
                "Layer '{}' uses '{}' for both the description and the tag field",
                self.name, self.tag_field
            )));
        }
        Ok(())
    }
}

/// One schema per geometry kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerSchemas {
    pub point: LayerSchema,
    pub line: LayerSchema,
    pub polygon: LayerSchema,
}

impl Default for LayerSchemas {
    fn default() -> Self {
        LayerSchemas {
            point: LayerSchema::new("Location", "point type"),
            line: LayerSchema::new("Line", "line type"),
            polygon: LayerSchema::new("Polygon", "type"),
        }
    }
}

impl LayerSchemas {
    pub fn for_kind(&self, kind: GeometryKind) -> &LayerSchema {
        match kind {
            GeometryKind::Point => &self.point,
            GeometryKind::Line => &self.line,
            GeometryKind::Polygon => &self.polygon,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// CSV holding the datum row (latitude, longitude, label)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datum: Option<PathBuf>,
    /// CSV holding relational tags (ignored, tag, description)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<PathBuf>,
    /// Directory receiving the layers; defaults to the tag file's directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    pub overwrite: bool,
    pub skip_empty_layers: bool,
    pub layers: LayerSchemas,
}

impl Config {
    /// Starter config written by `init-config`
    pub fn template() -> Self {
        Config {
            datum: Some(PathBuf::from("datum.csv")),
            tags: Some(PathBuf::from("tags.csv")),
            ..Config::default()
        }
    }

    /// Load config from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ArchShapeError::Config(format!("Config file not found: {}", path.display()))
            } else {
                ArchShapeError::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            ArchShapeError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save config as TOML
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| ArchShapeError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Find the config for this run: an explicit path, then `ARCHSHAPE_CONFIG`, then
    /// `archshape.toml` in `dir`. Falls back to defaults when none exists.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::load_from_file(Path::new(&path));
        }
        let local = dir.join(CONFIG_FILE_NAME);
        if local.is_file() {
            return Self::load_from_file(&local);
        }
        Ok(Config::default())
    }

    pub fn validate(&self) -> Result<()> {
        self.layers.point.validate()?;
        self.layers.line.validate()?;
        self.layers.polygon.validate()?;

        let names = [
            &self.layers.point.name,
            &self.layers.line.name,
            &self.layers.polygon.name,
        ];
        if names[0] == names[1] || names[0] == names[2] || names[1] == names[2] {
            return Err(ArchShapeError::Config(
                "Layer names must be distinct".to_string(),
            ));
        }
        Ok(())
    }
}
