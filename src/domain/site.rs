//! Site context and resolved features

use super::projection::{Datum, DatumProjector, ProjectedGeometry};
use super::tag::{GeometryKind, TagParser};
use crate::error::Result;

/// Tag recorded for the datum itself, a zero offset
pub const DATUM_TAG: &str = "N0E0";

/// A recorded site feature with its resolved geometry
#[derive(Debug, Clone, PartialEq)]
pub struct SiteFeature {
    pub geometry: ProjectedGeometry,
    /// The relational tag as written in the input
    pub tag: String,
    pub description: String,
}

impl SiteFeature {
    pub fn kind(&self) -> GeometryKind {
        self.geometry.kind()
    }
}

/// Resolution context for one run: the datum and its projector.
///
/// Created once from the datum source and passed by reference to every
/// resolution, so all features of a run share the same datum.
#[derive(Debug, Clone)]
pub struct Site {
    datum: Datum,
    projector: DatumProjector,
}

impl Site {
    pub fn new(datum: Datum) -> Self {
        let projector = DatumProjector::new(datum.coord);
        Site { datum, projector }
    }

    pub fn datum(&self) -> &Datum {
        &self.datum
    }

    /// The datum as a feature of its own, tagged `N0E0`
    pub fn datum_feature(&self) -> SiteFeature {
        SiteFeature {
            geometry: ProjectedGeometry::Point(self.datum.coord.into()),
            tag: DATUM_TAG.to_string(),
            description: self.datum.label.clone(),
        }
    }

    /// Parse a relational tag and project it onto the datum
    pub fn resolve(&self, tag: &str, description: &str) -> Result<SiteFeature> {
        let parsed = TagParser::classify_and_extract(tag)?;
        Ok(SiteFeature {
            geometry: self.projector.assemble(&parsed),
            tag: tag.to_string(),
            description: description.to_string(),
        })
    }
}

/// All features of a run, in input order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureSet {
    features: Vec<SiteFeature>,
}

impl FeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, feature: SiteFeature) {
        self.features.push(feature);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SiteFeature> {
        self.features.iter()
    }

    /// Features of one kind, keeping input order
    pub fn of_kind(&self, kind: GeometryKind) -> Vec<&SiteFeature> {
        self.features.iter().filter(|f| f.kind() == kind).collect()
    }

    pub fn count(&self, kind: GeometryKind) -> usize {
        self.features.iter().filter(|f| f.kind() == kind).count()
    }
}
