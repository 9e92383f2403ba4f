pub use dash_config::{Config, ConfigError, ConfigManager};

use crate::utils::paths::app_data_dir;

/// Manager rooted at the application data directory.
pub fn default_manager() -> Result<ConfigManager, ConfigError> {
    ConfigManager::with_base_dir(app_data_dir())
}
