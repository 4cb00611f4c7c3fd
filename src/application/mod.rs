//! Application layer - Use cases and orchestration

pub mod convert;
pub mod init_config;
pub mod resolve;

pub use convert::{ConversionReport, ConvertOverrides, ConvertService, LayerReport, RunOptions};
pub use init_config::init_config;
pub use resolve::ResolveService;
