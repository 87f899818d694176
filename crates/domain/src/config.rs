pub mod errors;
pub mod logging;
pub mod resolv_conf;
pub mod resolver;
pub mod root;

pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use resolver::ResolverConfig;
pub use root::Config;
