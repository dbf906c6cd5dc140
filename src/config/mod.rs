mod manager;

pub use manager::{
    ConfigFile, ConfigManager, DEFAULT_MODEL, ResolveOptions, ResolvedConfig, resolve_config,
    split_api_keys,
};
