//! Configuration engine for tunnel client configurations.
//!
//! # Data Flow
//! ```text
//! config file (INI or TOML)
//!     → codec (detect format, decode against the schema table)
//!     → completion, read mode (prune fields, start list → disabled flags)
//!     → ClientConfig (edited by the caller)
//!     → completion, write mode (prune fields, disabled flags → start list)
//!     → codec (encode in the recorded format)
//!     → config file
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs decodes the new file
//!     → the new model is sent to the subscriber
//! ```
//!
//! # Design Decisions
//! - One schema table (`fields.rs`) drives projection and both codecs
//! - All fields have defaults to allow minimal configs
//! - Validation is separate from decoding and never mutates

pub mod capability;
pub mod codec;
pub mod completion;
pub mod consts;
pub mod fields;
pub mod loader;
pub mod projection;
pub mod range;
pub mod schema;
pub mod validation;
pub mod value;
pub mod watcher;

pub use codec::Format;
pub use completion::Direction;
pub use loader::{decode, load_config, parse_config, save_config, ConfigError, Source};
pub use schema::{AuthSettings, AutoDelete, ClientCommon, ClientConfig, Proxy};
pub use validation::{validate_config, ValidationError};
