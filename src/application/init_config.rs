//! Write a starter configuration file

use crate::error::{ArchShapeError, Result};
use crate::infrastructure::Config;
use std::path::Path;

/// Write the starter config to `path`, refusing to replace an existing file unless `force`
pub fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(ArchShapeError::OutputExists(path.to_path_buf()));
    }
    Config::template().save_to_file(path)?;
    tracing::info!(path = %path.display(), "config written");
    Ok(())
}
