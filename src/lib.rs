//! Tunnel client configuration engine.
//!
//! Decodes legacy INI and modern TOML client configurations into one typed
//! model, prunes the fields each proxy's capabilities make inapplicable, and
//! writes the model back in either format.

pub mod config;
pub mod observability;

pub use config::{ClientConfig, ConfigError, Format, Proxy};
