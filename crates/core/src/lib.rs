pub mod config;
pub mod config_loader;
pub mod traits;
pub mod window;

pub use config::{AnalysisConfig, AppConfig, ConfigError, DataConfig};
pub use config_loader::{ConfigLoader, DEFAULT_CONFIG_PATH};
pub use traits::{is_strictly_ascending, Dated};
pub use window::{DateWindow, WindowError};
