//! Port range expansion and proxy aliases.
//!
//! A tcp/udp proxy whose ports are written as `6000-6006,6007` stands for one
//! proxy per port. Each of them is addressed by an alias `{name}_{index}`,
//! numbered in the order the local ports are listed.

use thiserror::Error;

use crate::config::consts::proxy_type;
use crate::config::schema::Proxy;

/// Errors in a port range expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("empty range")]
    Empty,

    #[error("invalid number `{0}`")]
    InvalidNumber(String),

    #[error("invalid range format `{0}`")]
    Malformed(String),

    #[error("range start {start} is greater than end {end}")]
    Inverted { start: u16, end: u16 },
}

/// Expands `1000-1002,1004` into `[1000, 1001, 1002, 1004]`.
///
/// Order and duplicates are kept: the position in the output is the alias
/// index.
pub fn parse_range_numbers(range: &str) -> Result<Vec<u16>, RangeError> {
    let mut numbers = Vec::new();
    for token in range.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match token.split_once('-') {
            Some((start, end)) => {
                if end.contains('-') {
                    return Err(RangeError::Malformed(token.to_string()));
                }
                let start = parse_number(start)?;
                let end = parse_number(end)?;
                if start > end {
                    return Err(RangeError::Inverted { start, end });
                }
                numbers.extend(start..=end);
            }
            None => numbers.push(parse_number(token)?),
        }
    }
    if numbers.is_empty() {
        return Err(RangeError::Empty);
    }
    Ok(numbers)
}

fn parse_number(raw: &str) -> Result<u16, RangeError> {
    let raw = raw.trim();
    raw.parse()
        .map_err(|_| RangeError::InvalidNumber(raw.to_string()))
}

impl Proxy {
    /// A tcp or udp proxy whose ports list or span several values.
    pub fn is_range(&self) -> bool {
        matches!(self.base.proxy_type.as_str(), proxy_type::TCP | proxy_type::UDP)
            && self
                .base
                .local_port
                .chars()
                .chain(self.remote_port.chars())
                .any(|c| c == ',' || c == '-')
    }

    /// Names this proxy is started and reported under.
    ///
    /// Only the local ports are counted. An unparseable range falls back to
    /// the bare name so listing never fails.
    pub fn aliases(&self) -> Vec<String> {
        if !self.is_range() {
            return vec![self.base.name.clone()];
        }
        match parse_range_numbers(&self.base.local_port) {
            Ok(ports) => (0..ports.len())
                .map(|i| format!("{}_{}", self.base.name, i))
                .collect(),
            Err(e) => {
                tracing::debug!(proxy = %self.base.name, error = %e, "Unparseable port range, using bare alias");
                vec![self.base.name.clone()]
            }
        }
    }
}
