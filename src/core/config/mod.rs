pub mod config;

pub use config::{AtlasConfig, ExportConfig, SamplingConfig, SdfConfig, SearchConfig};
