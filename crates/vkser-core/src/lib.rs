pub mod codec;
pub mod config;
pub mod error;
pub mod registry;

pub use codec::Codec;
pub use config::{default_config_path, VkserConfig};
pub use error::CoreError;
pub use registry::ResourceRegistry;

/// Load the configuration at `path` (defaults if absent) and install
/// logging with its filter. Returns the loaded configuration.
pub fn init_from_config(path: &str) -> VkserConfig {
    let config = VkserConfig::load_or_default(path);
    vkser_common::init_logging_with_default(&config.logging.filter);
    config
}
