//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (the codecs handle syntactic)
//! - Proxy names are non-empty and unique
//! - Port ranges parse, and range proxies list as many remote ports as
//!   local ones
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - Decoding never validates; callers decide whether problems are fatal

use std::collections::HashSet;

use thiserror::Error;

use crate::config::range::{parse_range_numbers, RangeError};
use crate::config::schema::{ClientConfig, Proxy};

/// A semantic problem in an otherwise decodable configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("proxy #{index} has an empty name")]
    EmptyName { index: usize },

    #[error("duplicate proxy name `{0}`")]
    DuplicateName(String),

    #[error("proxy `{name}`: invalid {field}: {source}")]
    InvalidRange {
        name: String,
        field: &'static str,
        source: RangeError,
    },

    #[error("proxy `{name}`: {local} local ports but {remote} remote ports")]
    PortCountMismatch {
        name: String,
        local: usize,
        remote: usize,
    },
}

/// Checks the configuration, collecting every problem found.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (index, proxy) in config.proxies.iter().enumerate() {
        if proxy.name().is_empty() {
            errors.push(ValidationError::EmptyName { index });
        } else if !seen.insert(proxy.name()) {
            errors.push(ValidationError::DuplicateName(proxy.name().to_string()));
        }
        if proxy.is_range() {
            validate_range(proxy, &mut errors);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_range(proxy: &Proxy, errors: &mut Vec<ValidationError>) {
    let mut parse = |field: &'static str, ports: &str| {
        if ports.is_empty() {
            return None;
        }
        match parse_range_numbers(ports) {
            Ok(numbers) => Some(numbers.len()),
            Err(source) => {
                errors.push(ValidationError::InvalidRange {
                    name: proxy.name().to_string(),
                    field,
                    source,
                });
                None
            }
        }
    };
    let local = parse("local_port", &proxy.base.local_port);
    let remote = parse("remote_port", &proxy.remote_port);

    if let (Some(local), Some(remote)) = (local, remote) {
        if local != remote {
            errors.push(ValidationError::PortCountMismatch {
                name: proxy.name().to_string(),
                local,
                remote,
            });
        }
    }
}
