//! Convert use case: datum + tag sources to vector layers

use crate::domain::{Datum, FeatureSet, GeometryKind, Site};
use crate::error::{ArchShapeError, Result};
use crate::infrastructure::{
    read_datum_records, read_tag_records, Config, DatumRecord, LayerSchema, LayerSchemas, LayerSink,
    TagRecord,
};
use std::path::{Path, PathBuf};

/// Values given on the command line; each one wins over the config file
#[derive(Debug, Clone, Default)]
pub struct ConvertOverrides {
    pub datum: Option<PathBuf>,
    pub tags: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub overwrite: bool,
    pub skip_empty_layers: bool,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub datum_path: PathBuf,
    pub tags_path: PathBuf,
    pub output_dir: PathBuf,
    pub overwrite: bool,
    pub skip_empty_layers: bool,
    pub layers: LayerSchemas,
}

impl RunOptions {
    pub fn resolve(config: Config, overrides: ConvertOverrides) -> Result<Self> {
        let datum_path = overrides.datum.or(config.datum).ok_or_else(|| {
            ArchShapeError::Config(
                "No datum file given. Pass --datum or set `datum` in archshape.toml".to_string(),
            )
        })?;
        let tags_path = overrides.tags.or(config.tags).ok_or_else(|| {
            ArchShapeError::Config(
                "No tag file given. Pass --tags or set `tags` in archshape.toml".to_string(),
            )
        })?;
        // Layers land next to the tag file unless told otherwise
        let output_dir = overrides
            .output_dir
            .or(config.output_dir)
            .unwrap_or_else(|| match tags_path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            });

        Ok(RunOptions {
            datum_path,
            tags_path,
            output_dir,
            overwrite: overrides.overwrite || config.overwrite,
            skip_empty_layers: overrides.skip_empty_layers || config.skip_empty_layers,
            layers: config.layers,
        })
    }

    /// Prefix for layer file names, taken from the tag file name
    pub fn layer_stem(&self) -> String {
        self.tags_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Outcome for one output layer
#[derive(Debug, Clone, PartialEq)]
pub struct LayerReport {
    pub kind: GeometryKind,
    pub name: String,
    pub features: usize,
    /// `None` when the layer was empty and skipped
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionReport {
    pub datum: Datum,
    pub layers: Vec<LayerReport>,
}

/// Build the site from the datum source, which must hold exactly one row
pub fn site_from_records(path: &Path, records: Vec<DatumRecord>) -> Result<Site> {
    let count = records.len();
    let mut rows = records.into_iter();
    match (rows.next(), count) {
        (None, _) => Err(ArchShapeError::MissingDatum(path.to_path_buf())),
        (Some(record), 1) => Ok(Site::new(Datum::new(
            record.longitude,
            record.latitude,
            record.label,
        ))),
        (Some(_), count) => Err(ArchShapeError::MultipleDatums {
            path: path.to_path_buf(),
            count,
        }),
    }
}

/// Resolve the datum feature followed by every tag record, stopping at the first bad tag
pub fn build_features(site: &Site, tags_path: &Path, records: &[TagRecord]) -> Result<FeatureSet> {
    let mut features = FeatureSet::new();
    features.push(site.datum_feature());

    for record in records {
        let feature = site
            .resolve(&record.tag, &record.description)
            .map_err(|e| e.at_row(tags_path, record.row))?;
        tracing::debug!(row = record.row, tag = %record.tag, kind = %feature.kind(), "resolved tag");
        features.push(feature);
    }

    Ok(features)
}

/// Service running a full conversion against a layer sink
pub struct ConvertService<S: LayerSink> {
    sink: S,
}

impl<S: LayerSink> ConvertService<S> {
    pub fn new(sink: S) -> Self {
        ConvertService { sink }
    }

    pub fn execute(&self, options: &RunOptions) -> Result<ConversionReport> {
        // 1. Fix the datum before any tag is read
        let datum_records = read_datum_records(&options.datum_path)?;
        let site = site_from_records(&options.datum_path, datum_records)?;
        tracing::info!(
            label = %site.datum().label,
            latitude = site.datum().latitude(),
            longitude = site.datum().longitude(),
            "datum loaded"
        );

        // 2. Resolve every tag; nothing is written if one fails
        let tag_records = read_tag_records(&options.tags_path)?;
        let features = build_features(&site, &options.tags_path, &tag_records)?;
        tracing::info!(features = features.len(), "tags resolved");

        // 3. Plan the layers and check every target before the first write
        let planned: Vec<_> = [GeometryKind::Point, GeometryKind::Line, GeometryKind::Polygon]
            .into_iter()
            .map(|kind| (kind, options.layers.for_kind(kind), features.of_kind(kind)))
            .collect();
        let targets: Vec<&LayerSchema> = planned
            .iter()
            .filter(|(_, _, members)| !(members.is_empty() && options.skip_empty_layers))
            .map(|(_, schema, _)| *schema)
            .collect();
        let inputs = [options.datum_path.as_path(), options.tags_path.as_path()];
        self.sink.check_targets(&targets, &inputs)?;

        // 4. One independent transaction per geometry kind
        let mut layers = Vec::new();
        for (kind, schema, members) in planned {
            let path = if members.is_empty() && options.skip_empty_layers {
                tracing::info!(layer = %schema.name, "skipping empty layer");
                None
            } else {
                Some(self.sink.write_layer(kind, schema, &members)?)
            };

            layers.push(LayerReport {
                kind,
                name: schema.name.clone(),
                features: members.len(),
                path,
            });
        }

        Ok(ConversionReport {
            datum: site.datum().clone(),
            layers,
        })
    }
}
