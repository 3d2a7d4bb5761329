//! Configuration loading from and saving to disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::codec::{detect_format, legacy, modern, Format};
use crate::config::completion::Direction;
use crate::config::schema::{ClientConfig, Proxy};
use crate::config::validation::ValidationError;

/// Error type for configuration loading and saving.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("parse error: {0}")]
    Legacy(#[from] ini::ParseError),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("missing [{0}] section")]
    MissingSection(&'static str),

    #[error("invalid value for `{key}` in [{section}]: {reason}")]
    InvalidValue {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no proxy section found")]
    NoProxySection,

    #[error("duplicate proxy name `{0}`")]
    DuplicateProxy(String),

    #[error(
        "validation failed: {}",
        .0.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
    )]
    Validation(Vec<ValidationError>),
}

/// Where a configuration is decoded from.
#[derive(Debug, Clone, Copy)]
pub enum Source<'a> {
    Path(&'a Path),
    Bytes(&'a [u8]),
}

/// Decodes and read-completes a configuration, detecting its format.
pub fn decode(source: Source<'_>) -> Result<ClientConfig, ConfigError> {
    match source {
        Source::Path(path) => load_config(path),
        Source::Bytes(bytes) => parse_config(&String::from_utf8(bytes.to_vec())?),
    }
}

/// Load a configuration file.
pub fn load_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    let bytes = fs::read(path)?;
    let config = parse_config(&String::from_utf8(bytes)?)?;
    tracing::debug!(
        path = %path.display(),
        format = %config.format(),
        proxies = config.proxies.len(),
        "Configuration loaded"
    );
    Ok(config)
}

/// Decodes configuration text, detecting its format.
pub fn parse_config(text: &str) -> Result<ClientConfig, ConfigError> {
    let mut config = match detect_format(text) {
        Format::Legacy => legacy::decode(text)?,
        Format::Modern => modern::decode(text)?,
    };
    config.complete(Direction::Read);
    Ok(config)
}

/// Decodes one proxy from a legacy fragment, e.g. a pasted section.
pub fn parse_proxy(text: &str) -> Result<Proxy, ConfigError> {
    legacy::decode_proxy_fragment(text)
}

/// Write-completes the configuration and renders it in its own format.
pub fn encode_config(config: &mut ClientConfig) -> Result<String, ConfigError> {
    config.complete(Direction::Write);
    match config.format() {
        Format::Legacy => legacy::encode(config),
        Format::Modern => modern::encode(config),
    }
}

/// Write-completes the configuration and saves it to `path`.
///
/// A failed write may leave a partial file behind.
pub fn save_config(config: &mut ClientConfig, path: &Path) -> Result<(), ConfigError> {
    let text = encode_config(config)?;
    fs::write(path, text)?;
    tracing::debug!(
        path = %path.display(),
        format = %config.format(),
        proxies = config.proxies.len(),
        "Configuration saved"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_from_bytes_detects_format() {
        let legacy = decode(Source::Bytes(b"[common]\nserver_addr = a\n")).unwrap();
        assert_eq!(legacy.format(), Format::Legacy);
        assert_eq!(legacy.common.server_addr, "a");

        let modern = decode(Source::Bytes(b"[client]\nserver_addr = \"b\"\n")).unwrap();
        assert_eq!(modern.format(), Format::Modern);
        assert_eq!(modern.common.server_addr, "b");
    }

    #[test]
    fn test_non_utf8_source() {
        let err = decode(Source::Bytes(&[0x5b, 0xff, 0xfe])).unwrap_err();
        assert!(matches!(err, ConfigError::Encoding(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = decode(Source::Path(Path::new("/nonexistent/frpc.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_encode_runs_write_completion() {
        let mut config = ClientConfig::new();
        config.common.auth.token = "t".into();
        config.add_proxy(Proxy::new("a"));
        let mut b = Proxy::new("b");
        b.base.disabled = true;
        config.add_proxy(b);

        let text = encode_config(&mut config).unwrap();
        assert_eq!(config.common.start, vec!["a"]);

        let decoded = parse_config(&text).unwrap();
        assert!(!decoded.proxies[0].base.disabled);
        assert!(decoded.proxies[1].base.disabled);
    }

    #[test]
    fn test_validation_error_lists_every_problem() {
        let err = ConfigError::Validation(vec![
            ValidationError::EmptyName { index: 0 },
            ValidationError::DuplicateName("web".into()),
        ]);
        assert_eq!(
            err.to_string(),
            "validation failed: proxy #0 has an empty name, duplicate proxy name `web`"
        );
    }
}
