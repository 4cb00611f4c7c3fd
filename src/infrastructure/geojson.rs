//! GeoJSON layer output
//!
//! Each geometry kind is written to its own `FeatureCollection` file. A layer is
//! staged in a temporary file next to its destination and only moved into place on
//! commit, so a failed layer never leaves a partial file behind.

use crate::domain::{GeometryKind, ProjectedGeometry, SiteFeature};
use crate::error::{ArchShapeError, Result};
use crate::infrastructure::config::LayerSchema;
use geo_types::Coord;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Destination for resolved layers
pub trait LayerSink {
    /// Refuse the run before anything is written if a planned layer would clobber a
    /// file. `inputs` are the source files of the run.
    fn check_targets(&self, _schemas: &[&LayerSchema], _inputs: &[&Path]) -> Result<()> {
        Ok(())
    }

    /// Write all features of one kind as a single layer and return where it landed
    fn write_layer(
        &self,
        kind: GeometryKind,
        schema: &LayerSchema,
        features: &[&SiteFeature],
    ) -> Result<PathBuf>;
}

#[derive(Serialize)]
struct FeatureCollection<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    name: &'a str,
    features: Vec<Feature>,
}

#[derive(Serialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
    properties: Map<String, Value>,
    geometry: Geometry,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum Geometry {
    Point { coordinates: [f64; 2] },
    LineString { coordinates: Vec<[f64; 2]> },
    Polygon { coordinates: Vec<Vec<[f64; 2]>> },
}

fn position(c: Coord<f64>) -> [f64; 2] {
    [c.x, c.y]
}

impl From<&ProjectedGeometry> for Geometry {
    fn from(geometry: &ProjectedGeometry) -> Self {
        match geometry {
            ProjectedGeometry::Point(point) => Geometry::Point {
                coordinates: position(point.0),
            },
            ProjectedGeometry::Line(line) => Geometry::LineString {
                coordinates: line.0.iter().copied().map(position).collect(),
            },
            ProjectedGeometry::Polygon(polygon) => Geometry::Polygon {
                coordinates: vec![polygon.exterior().0.iter().copied().map(position).collect()],
            },
        }
    }
}

fn to_feature(schema: &LayerSchema, feature: &SiteFeature) -> Feature {
    let mut properties = Map::new();
    properties.insert(
        schema.description_field.clone(),
        Value::String(feature.description.clone()),
    );
    properties.insert(schema.tag_field.clone(), Value::String(feature.tag.clone()));
    Feature {
        kind: "Feature",
        properties,
        geometry: Geometry::from(&feature.geometry),
    }
}

/// A layer being written.
///
/// Commit moves the staged file onto the target. Rolling back, or dropping the
/// transaction without committing, deletes the staged file.
#[derive(Debug)]
pub struct LayerTransaction {
    layer: String,
    target: PathBuf,
    overwrite: bool,
    staged: NamedTempFile,
}

impl LayerTransaction {
    /// Stage a new layer file for `target`
    pub fn begin(layer: &str, target: PathBuf, overwrite: bool) -> Result<Self> {
        if !overwrite && target.exists() {
            return Err(ArchShapeError::OutputExists(target));
        }
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let staged = NamedTempFile::new_in(&dir)?;
        tracing::debug!(layer, staged = %staged.path().display(), "layer transaction started");
        Ok(LayerTransaction {
            layer: layer.to_string(),
            target,
            overwrite,
            staged,
        })
    }

    pub fn layer(&self) -> &str {
        &self.layer
    }

    /// Serialize the features of this layer into the staged file
    pub fn write_features(&mut self, schema: &LayerSchema, features: &[&SiteFeature]) -> Result<()> {
        let collection = FeatureCollection {
            kind: "FeatureCollection",
            name: &schema.name,
            features: features.iter().map(|f| to_feature(schema, f)).collect(),
        };
        let mut writer = BufWriter::new(&mut self.staged);
        serde_json::to_writer_pretty(&mut writer, &collection)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Move the staged file into place
    pub fn commit(self) -> Result<PathBuf> {
        let layer = self.layer;
        let target = self.target;
        self.staged
            .as_file()
            .sync_all()
            .map_err(|e| ArchShapeError::WriteTransaction {
                layer: layer.clone(),
                reason: e.to_string(),
            })?;

        // On failure the staged file comes back inside the error and is deleted on drop
        let persisted = if self.overwrite {
            self.staged.persist(&target)
        } else {
            self.staged.persist_noclobber(&target)
        };
        persisted.map_err(|e| ArchShapeError::WriteTransaction {
            layer: layer.clone(),
            reason: e.error.to_string(),
        })?;

        tracing::info!(layer = %layer, path = %target.display(), "layer committed");
        Ok(target)
    }

    /// Discard the staged file
    pub fn rollback(self) {
        tracing::warn!(layer = %self.layer, "layer rolled back");
    }
}

/// Writes layers as `<dir>/<stem><LayerName>.geojson`
#[derive(Debug, Clone)]
pub struct GeoJsonSink {
    output_dir: PathBuf,
    stem: String,
    overwrite: bool,
}

impl GeoJsonSink {
    pub fn new(output_dir: PathBuf, stem: impl Into<String>, overwrite: bool) -> Self {
        GeoJsonSink {
            output_dir,
            stem: stem.into(),
            overwrite,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn layer_path(&self, schema: &LayerSchema) -> PathBuf {
        self.output_dir
            .join(format!("{}{}.geojson", self.stem, schema.name))
    }
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

impl LayerSink for GeoJsonSink {
    fn check_targets(&self, schemas: &[&LayerSchema], inputs: &[&Path]) -> Result<()> {
        for schema in schemas {
            let target = self.layer_path(schema);
            // Inputs are never replaced, even with overwrite on
            if inputs.iter().any(|input| is_same_file(input, &target)) {
                return Err(ArchShapeError::ReplacesInput(target));
            }
            if !self.overwrite && target.exists() {
                return Err(ArchShapeError::OutputExists(target));
            }
        }
        Ok(())
    }

    fn write_layer(
        &self,
        kind: GeometryKind,
        schema: &LayerSchema,
        features: &[&SiteFeature],
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let mut transaction =
            LayerTransaction::begin(&schema.name, self.layer_path(schema), self.overwrite)?;

        if let Err(e) = transaction.write_features(schema, features) {
            let layer = transaction.layer().to_string();
            transaction.rollback();
            return Err(ArchShapeError::WriteTransaction {
                layer,
                reason: e.to_string(),
            });
        }

        tracing::debug!(%kind, layer = %schema.name, features = features.len(), "layer staged");
        transaction.commit()
    }
}
