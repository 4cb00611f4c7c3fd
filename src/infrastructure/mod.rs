//! Infrastructure layer - External I/O and persistence

pub mod config;
pub mod csv_source;
pub mod geojson;
pub mod logging;

pub use config::{Config, LayerSchema, LayerSchemas};
pub use csv_source::{read_datum_records, read_tag_records, DatumRecord, TagRecord};
pub use geojson::{GeoJsonSink, LayerSink, LayerTransaction};
