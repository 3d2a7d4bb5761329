//! Capability schema vocabulary.
//!
//! Every configurable field is described by a [`FieldSpec`]: the key it is
//! persisted under, the formats able to express it, and for each grouping
//! (auth method, plugin kind, ...) the labels under which it is retained.
//!
//! Records expose their fields through [`Record::walk`], which hands each
//! field together with its spec to a [`Walker`]. Projection and both codecs
//! are walkers over the same table, so they cannot drift apart.
//!
//! # Design Decisions
//! - Groupings governing a sub-record (auth, auto-delete, plugin, health
//!   check) are *open*: a field without a declaration passes through. This
//!   keeps the selector field (e.g. the auth method itself) intact.
//! - Groupings governing a whole proxy (proxy type, visitor role) are
//!   *exhaustive*: a field without a declaration is reset. Completion restores
//!   the blocks it wants to keep afterwards.

use std::collections::BTreeMap;

use crate::config::value::FieldValue;

/// A capability dimension. The active label of a grouping decides which of
/// its fields survive completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grouping {
    Auth,
    AutoDelete,
    Plugin,
    HealthCheck,
    ProxyType,
    Visitor,
}

impl Grouping {
    /// Whether fields without a declaration are reset by a projection.
    pub fn is_exhaustive(self) -> bool {
        matches!(self, Grouping::ProxyType | Grouping::Visitor)
    }
}

/// Labels a field is retained under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accept {
    /// Retained whenever the grouping is active at all.
    Any,
    /// Retained only for the listed labels.
    Only(&'static [&'static str]),
}

impl Accept {
    pub fn accepts(&self, label: &str) -> bool {
        match self {
            Accept::Any => true,
            Accept::Only(labels) => labels.contains(&label),
        }
    }
}

/// One (grouping, accepted labels) declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cap(pub Grouping, pub Accept);

/// Static description of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Persisted key, or the key prefix for side-maps.
    pub key: &'static str,
    pub caps: &'static [Cap],
    /// Written even when equal to the default.
    pub always: bool,
    /// Expressible in the legacy key/value format.
    pub legacy: bool,
}

impl FieldSpec {
    pub const fn new(key: &'static str) -> Self {
        Self {
            key,
            caps: &[],
            always: false,
            legacy: true,
        }
    }

    pub const fn caps(self, caps: &'static [Cap]) -> Self {
        Self { caps, ..self }
    }

    pub const fn always(self) -> Self {
        Self {
            always: true,
            ..self
        }
    }

    pub const fn modern_only(self) -> Self {
        Self {
            legacy: false,
            ..self
        }
    }

    /// Declared acceptance for `label` under `grouping`, if any.
    pub fn accepts(&self, grouping: Grouping, label: &str) -> Option<bool> {
        self.caps
            .iter()
            .find(|cap| cap.0 == grouping)
            .map(|cap| cap.1.accepts(label))
    }

    /// Whether the field survives a projection onto `label`.
    pub fn retained(&self, grouping: Grouping, label: &str) -> bool {
        self.accepts(grouping, label)
            .unwrap_or(!grouping.is_exhaustive())
    }
}

/// Builds a `&'static [Cap]` table entry.
///
/// ```ignore
/// caps![ProxyType => [TCP, UDP], Visitor => *]
/// ```
macro_rules! caps {
    (@accept *) => {
        $crate::config::capability::Accept::Any
    };
    (@accept [$($label:expr),* $(,)?]) => {
        $crate::config::capability::Accept::Only(&[$($label),*])
    };
    ($($grouping:ident => $accept:tt),* $(,)?) => {
        &[$($crate::config::capability::Cap(
            $crate::config::capability::Grouping::$grouping,
            $crate::config::capability::caps!(@accept $accept),
        )),*]
    };
}

pub(crate) use caps;

/// Receives the fields of a record, one at a time.
pub trait Walker {
    /// A typed scalar field.
    fn field<T: FieldValue>(&mut self, spec: &FieldSpec, value: &mut T);

    /// A free-form map flattened under `spec.key` as a key prefix.
    fn side_map(&mut self, spec: &FieldSpec, value: &mut BTreeMap<String, String>);
}

/// A record whose fields are described by the schema table.
///
/// Nested records are walked in place, so a walker sees one flat sequence of
/// fields for the whole composition.
pub trait Record: Clone {
    fn walk<W: Walker>(&mut self, walker: &mut W);
}
