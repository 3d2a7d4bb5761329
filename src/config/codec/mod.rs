//! Dual-format codec.
//!
//! # Data Flow
//! ```text
//! text ──▶ detect_format ──▶ legacy::decode | modern::decode ──▶ ClientConfig
//! ClientConfig ──▶ legacy::encode | modern::encode ──▶ text
//! ```
//!
//! # Design Decisions
//! - Both formats walk the schema table. Encoding flattens a record into an
//!   ordered list of `(key, Scalar)` entries and decoding assigns such a list
//!   back, so the formats only differ in how entries become text.
//! - A key is omitted when its value equals the one a freshly decoded block
//!   would hold, unless the field is marked always-present.
//! - Side-maps are flattened into prefixed keys in both formats.
//! - Unknown keys are ignored with a debug log. When a key repeats within
//!   one block, the last occurrence wins.
//! - Proxy names key their block in both formats, so duplicates are
//!   rejected on encode.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::capability::{FieldSpec, Record, Walker};
use crate::config::consts::LEGACY_COMMON_SECTION;
use crate::config::loader::ConfigError;
use crate::config::schema::Proxy;
use crate::config::value::{FieldValue, Scalar};

pub mod legacy;
pub mod modern;

/// On-disk representation of a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// INI with a `[common]` section.
    Legacy,
    /// TOML with a `[client]` table.
    #[default]
    Modern,
}

impl Format {
    pub fn extension(self) -> &'static str {
        match self {
            Format::Legacy => ".ini",
            Format::Modern => ".toml",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Legacy => write!(f, "legacy"),
            Format::Modern => write!(f, "modern"),
        }
    }
}

/// Legacy iff some line is exactly the `[common]` section header.
pub fn detect_format(text: &str) -> Format {
    let marker = format!("[{}]", LEGACY_COMMON_SECTION);
    if text.lines().any(|line| line.trim() == marker) {
        Format::Legacy
    } else {
        Format::Modern
    }
}

/// Fails on the first proxy whose name was already used.
pub(crate) fn ensure_unique_names(proxies: &[Proxy]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for proxy in proxies {
        if !seen.insert(proxy.name()) {
            return Err(ConfigError::DuplicateProxy(proxy.name().to_string()));
        }
    }
    Ok(())
}

/// Ordered `(key, value)` pairs of one block.
pub(crate) type Entries = Vec<(String, Scalar)>;

/// Flattens `record` into entries, omitting values equal to `baseline`.
pub(crate) fn flatten<R: Record>(record: &R, baseline: &R, format: Format) -> Entries {
    let mut defaults = Defaults::default();
    baseline.clone().walk(&mut defaults);

    let mut flattener = Flattener {
        format,
        defaults: defaults.0,
        entries: Vec::new(),
    };
    record.clone().walk(&mut flattener);
    flattener.entries
}

/// Assigns decoded entries onto `record`, which holds the block defaults.
pub(crate) fn assign<R: Record>(
    record: &mut R,
    section: &str,
    entries: &[(String, Scalar)],
    format: Format,
) -> Result<(), ConfigError> {
    let mut assigner = Assigner {
        section,
        format,
        entries,
        consumed: vec![false; entries.len()],
        error: None,
    };
    record.walk(&mut assigner);

    if let Some(e) = assigner.error {
        return Err(e);
    }
    for ((key, _), consumed) in entries.iter().zip(&assigner.consumed) {
        if !consumed {
            tracing::debug!(section, key = %key, "Ignoring unknown key");
        }
    }
    Ok(())
}

#[derive(Default)]
struct Defaults(HashMap<&'static str, Scalar>);

impl Walker for Defaults {
    fn field<T: FieldValue>(&mut self, spec: &FieldSpec, value: &mut T) {
        self.0.insert(spec.key, value.to_scalar());
    }

    fn side_map(&mut self, _spec: &FieldSpec, _value: &mut BTreeMap<String, String>) {}
}

struct Flattener {
    format: Format,
    defaults: HashMap<&'static str, Scalar>,
    entries: Entries,
}

impl Flattener {
    fn expressible(&self, spec: &FieldSpec) -> bool {
        spec.legacy || self.format == Format::Modern
    }
}

impl Walker for Flattener {
    fn field<T: FieldValue>(&mut self, spec: &FieldSpec, value: &mut T) {
        if !self.expressible(spec) {
            return;
        }
        let scalar = value.to_scalar();
        if !spec.always && self.defaults.get(spec.key) == Some(&scalar) {
            return;
        }
        self.entries.push((spec.key.to_string(), scalar));
    }

    fn side_map(&mut self, spec: &FieldSpec, value: &mut BTreeMap<String, String>) {
        if !self.expressible(spec) {
            return;
        }
        // A bare prefix would not decode back into the map.
        for (k, v) in value.iter().filter(|(k, _)| !k.is_empty()) {
            self.entries
                .push((format!("{}{}", spec.key, k), Scalar::Text(v.clone())));
        }
    }
}

struct Assigner<'a> {
    section: &'a str,
    format: Format,
    entries: &'a [(String, Scalar)],
    consumed: Vec<bool>,
    error: Option<ConfigError>,
}

impl Assigner<'_> {
    fn expressible(&self, spec: &FieldSpec) -> bool {
        spec.legacy || self.format == Format::Modern
    }

    fn fail(&mut self, key: &str, reason: String) {
        if self.error.is_none() {
            self.error = Some(ConfigError::InvalidValue {
                section: self.section.to_string(),
                key: key.to_string(),
                reason,
            });
        }
    }
}

impl Walker for Assigner<'_> {
    fn field<T: FieldValue>(&mut self, spec: &FieldSpec, value: &mut T) {
        if !self.expressible(spec) {
            return;
        }
        let Some(index) = self.entries.iter().rposition(|(key, _)| key == spec.key) else {
            return;
        };
        for (consumed, (key, _)) in self.consumed.iter_mut().zip(self.entries) {
            if key == spec.key {
                *consumed = true;
            }
        }
        match T::from_scalar(&self.entries[index].1) {
            Ok(parsed) => *value = parsed,
            Err(reason) => self.fail(spec.key, reason),
        }
    }

    fn side_map(&mut self, spec: &FieldSpec, value: &mut BTreeMap<String, String>) {
        if !self.expressible(spec) {
            return;
        }
        let entries = self.entries;
        for (index, (key, scalar)) in entries.iter().enumerate() {
            let Some(suffix) = key.strip_prefix(spec.key) else {
                continue;
            };
            if suffix.is_empty() || self.consumed[index] {
                continue;
            }
            self.consumed[index] = true;
            value.insert(suffix.to_string(), scalar.to_text());
        }
    }
}
