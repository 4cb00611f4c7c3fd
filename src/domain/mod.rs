//! Domain layer - Tag parsing, projection and site features

pub mod projection;
pub mod site;
pub mod tag;

pub use projection::{project, Datum, DatumProjector, ProjectedGeometry, METERS_PER_DEGREE};
pub use site::{FeatureSet, Site, SiteFeature, DATUM_TAG};
pub use tag::{AxisExtents, GeometryKind, ParsedTag, TagParser};
