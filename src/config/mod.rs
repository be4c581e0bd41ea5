pub mod settings;

pub use settings::{AppConfig, FallbackConfig, SourceKind};
