//! archshape - Relational location tags to georeferenced vector layers
//!
//! Field crews record finds as offsets from a site datum, written as compact tags
//! such as `N12W4` (a point), `N2-4W4` (a line) or `N0-100E0-50` (a rectangle).
//! This crate parses those tags, projects them onto the datum with a flat-earth
//! approximation and writes point, line and polygon layers as GeoJSON.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::ArchShapeError;
