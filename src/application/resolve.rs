//! Resolve a single tag against a datum given on the command line

use crate::domain::{Datum, Site, SiteFeature};
use crate::error::{ArchShapeError, Result};

pub struct ResolveService {
    site: Site,
}

impl ResolveService {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(ArchShapeError::Config(format!(
                "Datum coordinates must be finite numbers, got latitude {} and longitude {}",
                latitude, longitude
            )));
        }
        Ok(ResolveService {
            site: Site::new(Datum::new(longitude, latitude, "datum")),
        })
    }

    pub fn execute(&self, tag: &str) -> Result<SiteFeature> {
        self.site.resolve(tag, "")
    }
}
