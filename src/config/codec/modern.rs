//! Modern TOML format.
//!
//! ```text
//! [client]
//! server_addr = "example.com"
//! start = ["ssh"]
//!
//! [proxies.ssh]
//! type = "tcp"
//! local_port = "22"
//! ```
//!
//! Proxies are keyed by their bare name in list order. Values use native
//! TOML types.

use toml::{Table, Value};

use crate::config::codec::{assign, ensure_unique_names, flatten, Entries, Format};
use crate::config::consts::{MODERN_CLIENT_TABLE, MODERN_PROXIES_TABLE};
use crate::config::loader::ConfigError;
use crate::config::schema::{ClientCommon, ClientConfig, Proxy};
use crate::config::value::Scalar;

/// Decodes a whole modern document. Completion is left to the caller.
pub fn decode(text: &str) -> Result<ClientConfig, ConfigError> {
    let mut doc: Table = text.parse()?;

    let client = match doc.remove(MODERN_CLIENT_TABLE) {
        Some(Value::Table(table)) => table,
        Some(_) => return Err(not_a_table(MODERN_CLIENT_TABLE, MODERN_CLIENT_TABLE)),
        None => return Err(ConfigError::MissingSection(MODERN_CLIENT_TABLE)),
    };
    let mut config = ClientConfig::new();
    config.convert(Format::Modern);
    assign(
        &mut config.common,
        MODERN_CLIENT_TABLE,
        &entries(MODERN_CLIENT_TABLE, client)?,
        Format::Modern,
    )?;

    match doc.remove(MODERN_PROXIES_TABLE) {
        Some(Value::Table(proxies)) => {
            for (name, value) in proxies {
                let Value::Table(table) = value else {
                    return Err(not_a_table(MODERN_PROXIES_TABLE, &name));
                };
                let mut proxy = Proxy::new(name.as_str());
                assign(&mut proxy, &name, &entries(&name, table)?, Format::Modern)?;
                config.proxies.push(proxy);
            }
        }
        Some(_) => return Err(not_a_table(MODERN_PROXIES_TABLE, MODERN_PROXIES_TABLE)),
        None => {}
    }

    for key in doc.keys() {
        tracing::debug!(key = %key, "Ignoring unknown top-level key");
    }
    Ok(config)
}

/// Encodes the configuration.
///
/// Two proxies cannot share a table, so duplicate names are rejected.
pub fn encode(config: &ClientConfig) -> Result<String, ConfigError> {
    let mut doc = Table::new();
    doc.insert(
        MODERN_CLIENT_TABLE.to_string(),
        Value::Table(table(flatten(&config.common, &ClientCommon::default(), Format::Modern))),
    );

    ensure_unique_names(&config.proxies)?;
    if !config.proxies.is_empty() {
        let baseline = Proxy::new("");
        let mut proxies = Table::new();
        for proxy in &config.proxies {
            proxies.insert(
                proxy.name().to_string(),
                Value::Table(table(flatten(proxy, &baseline, Format::Modern))),
            );
        }
        doc.insert(MODERN_PROXIES_TABLE.to_string(), Value::Table(proxies));
    }

    Ok(toml::to_string(&doc)?)
}

fn table(entries: Entries) -> Table {
    entries
        .into_iter()
        .map(|(key, scalar)| (key, to_value(scalar)))
        .collect()
}

fn to_value(scalar: Scalar) -> Value {
    match scalar {
        Scalar::Text(s) => Value::String(s),
        Scalar::Bool(b) => Value::Boolean(b),
        Scalar::Int(i) => Value::Integer(i),
        Scalar::List(items) => Value::Array(items.into_iter().map(Value::String).collect()),
    }
}

fn entries(section: &str, table: Table) -> Result<Entries, ConfigError> {
    table
        .into_iter()
        .map(|(key, value)| match to_scalar(value) {
            Ok(scalar) => Ok((key, scalar)),
            Err(reason) => Err(ConfigError::InvalidValue {
                section: section.to_string(),
                key,
                reason,
            }),
        })
        .collect()
}

fn to_scalar(value: Value) -> Result<Scalar, String> {
    Ok(match value {
        Value::String(s) => Scalar::Text(s),
        Value::Boolean(b) => Scalar::Bool(b),
        Value::Integer(i) => Scalar::Int(i),
        Value::Float(f) => Scalar::Text(f.to_string()),
        Value::Datetime(d) => Scalar::Text(d.to_string()),
        Value::Array(items) => Scalar::List(
            items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s),
                    Value::Integer(i) => Ok(i.to_string()),
                    other => Err(format!("unsupported array item `{}`", other)),
                })
                .collect::<Result<_, _>>()?,
        ),
        Value::Table(_) => return Err("expected a value, found a table".to_string()),
    })
}

fn not_a_table(section: &str, key: &str) -> ConfigError {
    ConfigError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        reason: "expected a table".to_string(),
    }
}
