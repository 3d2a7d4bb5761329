//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! config engine and CLI produce:
//!     → tracing events with structured fields (path, format, section, key)
//!
//! Consumers:
//!     → logging.rs subscriber writing to stderr
//! ```
//!
//! # Design Decisions
//! - The library only emits events; installing a subscriber is up to the binary
//! - Log level configurable via `RUST_LOG`

pub mod logging;
