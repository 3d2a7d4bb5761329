//! Configuration schema definitions.
//!
//! This module defines the in-memory model of a client configuration: the
//! connection-level settings and the ordered list of proxies. The field
//! table describing how each field is persisted and pruned lives in
//! [`crate::config::fields`].

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::codec::Format;
use crate::config::consts::{self, delete_method, proxy_type};

/// Root configuration: client-common settings plus proxies in display order.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    pub common: ClientCommon,
    pub proxies: Vec<Proxy>,
}

/// Connection-level settings shared by every proxy of a client.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientCommon {
    pub auth: AuthSettings,
    pub server_addr: String,
    pub server_port: u16,
    pub nat_hole_stun_server: String,
    pub dial_server_timeout: i64,
    pub dial_server_keepalive: i64,
    pub connect_server_local_ip: String,
    pub http_proxy: String,
    pub log_file: String,
    pub log_level: String,
    pub log_max_days: i64,
    pub admin_addr: String,
    pub admin_port: u16,
    pub admin_user: String,
    pub admin_pwd: String,
    pub assets_dir: String,
    pub pool_count: i64,
    pub dns_server: String,

    /// Transport protocol (tcp, kcp, quic, websocket, wss).
    pub protocol: String,
    pub quic_keepalive_period: i64,
    pub quic_max_idle_timeout: i64,
    pub quic_max_incoming_streams: i64,
    pub login_fail_exit: bool,
    pub user: String,
    pub heartbeat_interval: i64,
    pub heartbeat_timeout: i64,
    pub tcp_mux: bool,
    pub tcp_mux_keepalive_interval: i64,
    pub tls_enable: bool,
    pub tls_cert_file: String,
    pub tls_key_file: String,
    pub tls_trusted_ca_file: String,
    pub tls_server_name: String,
    pub udp_packet_size: i64,

    /// Explicit start list. Empty means every proxy is started.
    pub start: Vec<String>,
    pub pprof_enable: bool,
    pub disable_custom_tls_first_byte: bool,

    /// Display name of this configuration.
    pub name: String,
    /// Whether the configuration is kept out of the boot-time start set.
    pub manual_start: bool,
    pub auto_delete: AutoDelete,
    pub metas: BTreeMap<String, String>,

    format: Format,
}

impl Default for ClientCommon {
    fn default() -> Self {
        Self {
            auth: AuthSettings {
                method: consts::auth_method::TOKEN.to_string(),
                ..Default::default()
            },
            server_addr: String::new(),
            server_port: consts::DEFAULT_SERVER_PORT,
            nat_hole_stun_server: String::new(),
            dial_server_timeout: 0,
            dial_server_keepalive: 0,
            connect_server_local_ip: String::new(),
            http_proxy: String::new(),
            log_file: String::new(),
            log_level: consts::DEFAULT_LOG_LEVEL.to_string(),
            log_max_days: consts::DEFAULT_LOG_MAX_DAYS,
            admin_addr: String::new(),
            admin_port: 0,
            admin_user: String::new(),
            admin_pwd: String::new(),
            assets_dir: String::new(),
            pool_count: 0,
            dns_server: String::new(),
            protocol: String::new(),
            quic_keepalive_period: 0,
            quic_max_idle_timeout: 0,
            quic_max_incoming_streams: 0,
            login_fail_exit: false,
            user: String::new(),
            heartbeat_interval: 0,
            heartbeat_timeout: 0,
            tcp_mux: true,
            tcp_mux_keepalive_interval: 0,
            tls_enable: true,
            tls_cert_file: String::new(),
            tls_key_file: String::new(),
            tls_trusted_ca_file: String::new(),
            tls_server_name: String::new(),
            udp_packet_size: 0,
            start: Vec::new(),
            pprof_enable: false,
            disable_custom_tls_first_byte: true,
            name: String::new(),
            manual_start: false,
            auto_delete: AutoDelete {
                method: delete_method::RELATIVE.to_string(),
                ..Default::default()
            },
            metas: BTreeMap::new(),
            format: Format::Modern,
        }
    }
}

impl ClientCommon {
    /// On-disk format this configuration was loaded from or will be saved as.
    pub fn format(&self) -> Format {
        self.format
    }

    pub(crate) fn set_format(&mut self, format: Format) {
        self.format = format;
    }
}

/// Authentication method plus the method-specific settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AuthSettings {
    /// `token`, `oidc`, or empty for none.
    pub method: String,
    pub authenticate_heartbeats: bool,
    pub authenticate_new_work_conns: bool,
    pub token: String,
    /// Where the token is read from instead of `token` (e.g. `file`).
    pub token_source: String,
    pub token_source_file: String,
    pub oidc_client_id: String,
    pub oidc_client_secret: String,
    pub oidc_audience: String,
    pub oidc_scope: String,
    pub oidc_token_endpoint_url: String,
    pub oidc_additional_params: BTreeMap<String, String>,
}

/// Self-destruct schedule for temporary configurations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AutoDelete {
    /// `absolute`, `relative`, or empty for never.
    pub method: String,
    pub delete_after_days: i64,
    pub delete_after_date: Option<DateTime<Utc>>,
}

impl AutoDelete {
    /// Instant after which the configuration should be deleted.
    ///
    /// Relative schedules count days from `created`.
    pub fn expires_at(&self, created: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self.method.as_str() {
            delete_method::ABSOLUTE => self.delete_after_date,
            delete_method::RELATIVE if self.delete_after_days > 0 => {
                Duration::try_days(self.delete_after_days).and_then(|d| created.checked_add_signed(d))
            }
            _ => None,
        }
    }
}

/// Settings common to every proxy type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BaseProxyConf {
    pub name: String,
    /// tcp, udp, http, https, stcp, xtcp, sudp or tcpmux.
    #[serde(rename = "type")]
    pub proxy_type: String,
    pub use_encryption: bool,
    pub use_compression: bool,

    /// Load-balancing group and its shared key.
    pub group: String,
    pub group_key: String,
    pub proxy_protocol_version: String,
    pub bandwidth_limit: String,
    pub bandwidth_limit_mode: String,
    pub local_ip: String,
    pub local_port: String,

    /// Plugin kind. When set, `local_ip`/`local_port` are ignored.
    pub plugin: String,
    pub plugin_params: PluginParams,
    pub health_check_type: String,
    pub health_check: HealthCheckConf,
    pub metas: BTreeMap<String, String>,

    /// Excluded from the start set.
    pub disabled: bool,
}

/// Parameters passed to a proxy plugin.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PluginParams {
    pub local_addr: String,
    pub crt_path: String,
    pub key_path: String,
    pub host_header_rewrite: String,
    pub http_user: String,
    pub http_passwd: String,
    pub user: String,
    pub passwd: String,
    pub local_path: String,
    pub strip_prefix: String,
    pub unix_path: String,
    pub headers: BTreeMap<String, String>,
    pub enable_http2: bool,
}

/// Health checking of the local service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HealthCheckConf {
    pub timeout_s: i64,
    pub max_failed: i64,
    pub interval_s: i64,
    /// Probe path for `http` checks.
    pub url: String,
    pub headers: BTreeMap<String, String>,
}

/// One tunnel definition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Proxy {
    pub base: BaseProxyConf,
    pub remote_port: String,
    pub role: String,
    pub sk: String,
    pub allow_users: String,
    pub server_user: String,
    pub server_name: String,
    pub bind_addr: String,
    pub bind_port: u16,
    pub custom_domains: String,
    pub subdomain: String,
    pub locations: String,
    pub http_user: String,
    pub http_pwd: String,
    pub host_header_rewrite: String,
    pub headers: BTreeMap<String, String>,
    pub response_headers: BTreeMap<String, String>,
    pub multiplexer: String,
    pub route_by_http_user: String,

    /// NAT traversal protocol for xtcp visitors (`kcp` or `quic`).
    pub protocol: String,
    pub keep_tunnel_open: bool,
    pub max_retries_an_hour: i64,
    pub min_retry_interval: i64,
    pub fallback_to: String,
    pub fallback_timeout_ms: i64,
}

impl Proxy {
    /// A tcp proxy with the given name and nothing else set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: BaseProxyConf {
                name: name.into(),
                proxy_type: proxy_type::TCP.to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.base.name
    }

    /// Secret proxy types running in the visitor role.
    pub fn is_visitor(&self) -> bool {
        matches!(
            self.base.proxy_type.as_str(),
            proxy_type::XTCP | proxy_type::STCP | proxy_type::SUDP
        ) && self.role == consts::ROLE_VISITOR
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Display name of this configuration.
    pub fn name(&self) -> &str {
        &self.common.name
    }

    /// Whether this configuration should be started at boot.
    pub fn auto_start(&self) -> bool {
        !self.common.manual_start
    }

    pub fn format(&self) -> Format {
        self.common.format()
    }

    /// Switches the on-disk format used by the next save.
    pub fn convert(&mut self, format: Format) {
        self.common.set_format(format);
    }

    /// File extension implied by the format.
    pub fn ext(&self) -> &'static str {
        self.format().extension()
    }

    pub fn add_proxy(&mut self, proxy: Proxy) {
        self.proxies.push(proxy);
    }

    /// Removes and returns the proxy at `index`, if any.
    pub fn delete_proxy(&mut self, index: usize) -> Option<Proxy> {
        (index < self.proxies.len()).then(|| self.proxies.remove(index))
    }

    /// Moves the proxy at `from` to position `to`, shifting the others.
    pub fn move_proxy(&mut self, from: usize, to: usize) {
        if from >= self.proxies.len() || to >= self.proxies.len() {
            return;
        }
        let proxy = self.proxies.remove(from);
        self.proxies.insert(to, proxy);
    }

    pub fn proxy(&self, name: &str) -> Option<&Proxy> {
        self.proxies.iter().find(|p| p.name() == name)
    }

    /// Number of enabled proxies.
    pub fn count_start(&self) -> usize {
        self.proxies.iter().filter(|p| !p.base.disabled).count()
    }

    /// A new configuration sharing the common settings, optionally with the
    /// proxies. Two configurations never share a log file, so it is cleared.
    pub fn copy(&self, with_proxies: bool) -> ClientConfig {
        let mut common = self.common.clone();
        common.log_file.clear();
        ClientConfig {
            common,
            proxies: if with_proxies { self.proxies.clone() } else { Vec::new() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.common.server_port, 7000);
        assert_eq!(config.common.auth.method, "token");
        assert_eq!(config.common.auto_delete.method, "relative");
        assert!(config.common.tcp_mux);
        assert!(config.common.tls_enable);
        assert_eq!(config.format(), Format::Modern);
        assert!(config.auto_start());
    }

    #[test]
    fn test_visitor_role() {
        let mut proxy = Proxy::new("peer");
        proxy.role = "visitor".into();
        assert!(!proxy.is_visitor());
        proxy.base.proxy_type = "xtcp".into();
        assert!(proxy.is_visitor());
        proxy.role = "server".into();
        assert!(!proxy.is_visitor());
    }

    #[test]
    fn test_proxy_list_editing() {
        let mut config = ClientConfig::new();
        for name in ["a", "b", "c"] {
            config.add_proxy(Proxy::new(name));
        }
        config.move_proxy(0, 2);
        let names: Vec<_> = config.proxies.iter().map(|p| p.name()).collect();
        assert_eq!(names, ["b", "c", "a"]);

        assert_eq!(config.delete_proxy(1).map(|p| p.base.name), Some("c".to_string()));
        assert!(config.delete_proxy(5).is_none());
        assert_eq!(config.proxies.len(), 2);

        config.proxies[0].base.disabled = true;
        assert_eq!(config.count_start(), 1);
    }

    #[test]
    fn test_copy_drops_log_file() {
        let mut config = ClientConfig::new();
        config.common.log_file = "logs/a.log".into();
        config.add_proxy(Proxy::new("ssh"));

        let bare = config.copy(false);
        assert!(bare.common.log_file.is_empty());
        assert!(bare.proxies.is_empty());
        assert_eq!(config.copy(true).proxies.len(), 1);
    }

    #[test]
    fn test_auto_delete_expiry() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let relative = AutoDelete {
            method: "relative".into(),
            delete_after_days: 7,
            delete_after_date: None,
        };
        assert_eq!(
            relative.expires_at(created),
            Some(Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap())
        );

        let date = Utc.with_ymd_and_hms(2023, 3, 23, 0, 0, 0).unwrap();
        let absolute = AutoDelete {
            method: "absolute".into(),
            delete_after_days: 0,
            delete_after_date: Some(date),
        };
        assert_eq!(absolute.expires_at(created), Some(date));
        assert_eq!(AutoDelete::default().expires_at(created), None);
    }
}
