//! Legacy INI format.
//!
//! ```text
//! [common]
//! server_addr=example.com
//! token=123456
//!
//! [ssh]
//! type=tcp
//! local_port=22
//!
//! [range:game]
//! type=udp
//! local_port=7000-7010
//! ```
//!
//! Values are plain text with no escape processing, so Windows paths are
//! kept as written. Inline comments are not recognized. A key on a line of
//! its own is a boolean flag set to true. Values with surrounding
//! whitespace or a leading quote are written quoted.

use std::borrow::Cow;

use ini::{EscapePolicy, Ini, Properties, WriteOption};

use crate::config::codec::{assign, ensure_unique_names, flatten, Entries, Format};
use crate::config::consts::{LEGACY_COMMON_SECTION, RANGE_PREFIX};
use crate::config::loader::ConfigError;
use crate::config::schema::{ClientCommon, ClientConfig, Proxy};
use crate::config::value::Scalar;

/// Decodes a whole legacy document. Completion is left to the caller.
pub fn decode(text: &str) -> Result<ClientConfig, ConfigError> {
    let doc = Ini::load_from_str_noescape(&expand_bare_keys(text))?;
    let common = doc
        .section(Some(LEGACY_COMMON_SECTION))
        .ok_or(ConfigError::MissingSection(LEGACY_COMMON_SECTION))?;

    let mut config = ClientConfig::new();
    config.convert(Format::Legacy);
    assign(&mut config.common, LEGACY_COMMON_SECTION, &entries(common), Format::Legacy)?;

    for (name, section) in doc.iter() {
        match name {
            None | Some(LEGACY_COMMON_SECTION) => continue,
            Some(name) => config.proxies.push(decode_proxy(name, section)?),
        }
    }
    Ok(config)
}

/// Decodes a single proxy from a legacy fragment.
///
/// The first section other than `[common]` is used. Without one, keys
/// written before any section header form an unnamed proxy.
pub fn decode_proxy_fragment(text: &str) -> Result<Proxy, ConfigError> {
    let doc = Ini::load_from_str_noescape(&expand_bare_keys(text))?;
    let mut fallback = None;
    for (name, section) in doc.iter() {
        match name {
            Some(LEGACY_COMMON_SECTION) => continue,
            Some(name) => return decode_proxy(name, section),
            None => fallback = Some(section),
        }
    }
    match fallback {
        Some(section) if section.iter().next().is_some() => decode_proxy("", section),
        _ => Err(ConfigError::NoProxySection),
    }
}

/// Encodes the configuration, `[common]` first.
///
/// Two proxies with one name would merge into a single section, so
/// duplicate names are rejected.
pub fn encode(config: &ClientConfig) -> Result<String, ConfigError> {
    ensure_unique_names(&config.proxies)?;
    let mut doc = Ini::new();
    write_section(
        &mut doc,
        LEGACY_COMMON_SECTION,
        flatten(&config.common, &ClientCommon::default(), Format::Legacy),
    );

    let baseline = Proxy::new("");
    for proxy in &config.proxies {
        let name = if proxy.is_range() && !proxy.name().starts_with(RANGE_PREFIX) {
            format!("{}{}", RANGE_PREFIX, proxy.name())
        } else {
            proxy.name().to_string()
        };
        write_section(&mut doc, &name, flatten(proxy, &baseline, Format::Legacy));
    }

    let mut buf = Vec::new();
    doc.write_to_opt(
        &mut buf,
        WriteOption {
            escape_policy: EscapePolicy::Nothing,
            ..Default::default()
        },
    )?;
    Ok(String::from_utf8(buf)?)
}

fn decode_proxy(name: &str, section: &Properties) -> Result<Proxy, ConfigError> {
    let mut proxy = Proxy::new(name.strip_prefix(RANGE_PREFIX).unwrap_or(name));
    assign(&mut proxy, name, &entries(section), Format::Legacy)?;
    Ok(proxy)
}

fn entries(section: &Properties) -> Entries {
    section
        .iter()
        .map(|(key, value)| (key.to_string(), Scalar::Text(value.to_string())))
        .collect()
}

fn write_section(doc: &mut Ini, name: &str, entries: Entries) {
    let mut section = doc.with_section(Some(name));
    for (key, value) in entries {
        section.set(key, quote(value.to_text()));
    }
}

/// Rewrites lines holding only a key into `key=true`.
fn expand_bare_keys(text: &str) -> Cow<'_, str> {
    let is_bare = |line: &str| {
        let line = line.trim();
        !line.is_empty()
            && !line.starts_with(['[', ';', '#'])
            && !line.contains(['=', ':'])
    };
    if !text.lines().any(is_bare) {
        return Cow::Borrowed(text);
    }

    let mut expanded = String::with_capacity(text.len() + 16);
    for line in text.lines() {
        if is_bare(line) {
            expanded.push_str(line.trim());
            expanded.push_str("=true");
        } else {
            expanded.push_str(line);
        }
        expanded.push('\n');
    }
    Cow::Owned(expanded)
}

/// Wraps values the reader would trim or unquote.
///
/// A value holding both quote characters cannot be wrapped and is written
/// as is.
fn quote(value: String) -> String {
    let needs_quotes = value.trim() != value || value.starts_with(['"', '\'']);
    if !needs_quotes {
        return value;
    }
    if !value.contains('"') {
        format!("\"{}\"", value)
    } else if !value.contains('\'') {
        format!("'{}'", value)
    } else {
        tracing::debug!(value = %value, "Value cannot be quoted for the legacy format");
        value
    }
}
