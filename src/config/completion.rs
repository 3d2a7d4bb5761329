//! Completion: the normalization pass run on every load and before every save.
//!
//! # Data Flow
//! ```text
//! decode ──▶ complete(Read)  ──▶ model        (start list ──▶ disabled flags)
//! model  ──▶ complete(Write) ──▶ encode       (disabled flags ──▶ start list)
//! ```
//!
//! Both directions prune the fields that the active auth method, auto-delete
//! method, transport settings, proxy type, plugin and health check make
//! inapplicable. Completion is idempotent in either direction.

use crate::config::capability::Grouping;
use crate::config::codec::Format;
use crate::config::consts::{self, auth_method};
use crate::config::projection::project;
use crate::config::schema::{
    AuthSettings, AutoDelete, BaseProxyConf, ClientCommon, ClientConfig, HealthCheckConf,
    PluginParams, Proxy,
};

/// Which side of the disk the model is crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Just decoded: derive disabled flags from the start list.
    Read,
    /// About to be encoded: regenerate the start list from disabled flags.
    Write,
}

impl ClientConfig {
    /// Prunes and reconciles the whole configuration in place.
    pub fn complete(&mut self, direction: Direction) {
        self.common.complete();

        let start = &self.common.start;
        for proxy in &mut self.proxies {
            proxy.complete();
            if direction == Direction::Read && !start.is_empty() {
                proxy.base.disabled = !proxy.aliases().iter().all(|alias| start.contains(alias));
            }
        }

        if direction == Direction::Write {
            self.common.start = self.gather_start();
        }
    }

    /// Aliases of the enabled proxies, or an empty list when all are enabled.
    pub fn gather_start(&self) -> Vec<String> {
        if self.proxies.iter().all(|p| !p.base.disabled) {
            return Vec::new();
        }
        self.proxies
            .iter()
            .filter(|p| !p.base.disabled)
            .flat_map(Proxy::aliases)
            .collect()
    }
}

impl ClientCommon {
    fn complete(&mut self) {
        if self.format() == Format::Legacy {
            self.auth.token_source.clear();
        }
        self.auth.complete();

        if self.admin_port == 0 {
            self.admin_user.clear();
            self.admin_pwd.clear();
            self.assets_dir.clear();
            self.pprof_enable = false;
        }

        self.auto_delete.complete();

        if !self.tcp_mux {
            self.tcp_mux_keepalive_interval = 0;
        }
        if !self.tls_enable {
            self.tls_server_name.clear();
            self.tls_cert_file.clear();
            self.tls_key_file.clear();
            self.tls_trusted_ca_file.clear();
        }
        if self.protocol == consts::PROTOCOL_QUIC {
            self.dial_server_timeout = 0;
            self.dial_server_keepalive = 0;
        } else {
            self.quic_max_idle_timeout = 0;
            self.quic_keepalive_period = 0;
            self.quic_max_incoming_streams = 0;
        }
    }
}

impl AuthSettings {
    fn complete(&mut self) {
        if self.method.is_empty() {
            *self = AuthSettings::default();
            return;
        }
        *self = project(self, Grouping::Auth, &self.method);

        if self.method == auth_method::TOKEN {
            if !self.token_source.is_empty() {
                self.token.clear();
            } else {
                self.token_source_file.clear();
                if self.token.is_empty() {
                    *self = AuthSettings::default();
                }
            }
        }
    }
}

impl AutoDelete {
    fn complete(&mut self) {
        if self.method.is_empty() {
            *self = AutoDelete::default();
        } else {
            *self = project(self, Grouping::AutoDelete, &self.method);
        }
    }
}

impl Proxy {
    /// Drops the fields the proxy's type, role, plugin and health check make
    /// inapplicable.
    pub fn complete(&mut self) {
        if self.is_visitor() {
            self.complete_visitor();
        } else {
            self.complete_listener();
        }
    }

    fn complete_visitor(&mut self) {
        let base = std::mem::take(&mut self.base);
        *self = project(self, Grouping::Visitor, &base.proxy_type);
        self.base = BaseProxyConf {
            name: base.name,
            proxy_type: base.proxy_type,
            use_encryption: base.use_encryption,
            use_compression: base.use_compression,
            disabled: base.disabled,
            ..Default::default()
        };

        if !self.keep_tunnel_open {
            self.max_retries_an_hour = 0;
            self.min_retry_interval = 0;
        }
        if self.fallback_to.is_empty() {
            self.fallback_timeout_ms = 0;
        }
    }

    fn complete_listener(&mut self) {
        let mut base = self.base.clone();
        if base.plugin.is_empty() {
            base.plugin_params = PluginParams::default();
        } else {
            base.local_ip.clear();
            base.local_port.clear();
            base.plugin_params = project(&base.plugin_params, Grouping::Plugin, &base.plugin);
        }
        if base.health_check_type.is_empty() {
            base.health_check = HealthCheckConf::default();
        } else {
            base.health_check = project(&base.health_check, Grouping::HealthCheck, &base.health_check_type);
        }

        *self = project(self, Grouping::ProxyType, &base.proxy_type);
        self.base = base;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(proxies: Vec<Proxy>) -> ClientConfig {
        let mut config = ClientConfig::new();
        config.common.auth.token = "secret".into();
        config.proxies = proxies;
        config
    }

    #[test]
    fn test_auth_token_without_value_clears_method() {
        let mut auth = AuthSettings {
            method: "token".into(),
            authenticate_heartbeats: true,
            oidc_client_id: "stale".into(),
            ..Default::default()
        };
        auth.complete();
        assert_eq!(auth, AuthSettings::default());
    }

    #[test]
    fn test_auth_token_source_supersedes_token() {
        let mut auth = AuthSettings {
            method: "token".into(),
            token: "literal".into(),
            token_source: "file".into(),
            token_source_file: "/etc/token".into(),
            ..Default::default()
        };
        auth.complete();
        assert!(auth.token.is_empty());
        assert_eq!(auth.token_source_file, "/etc/token");
        assert_eq!(auth.method, "token");
    }

    #[test]
    fn test_auth_oidc_keeps_oidc_fields_only() {
        let mut auth = AuthSettings {
            method: "oidc".into(),
            token: "literal".into(),
            oidc_client_id: "id".into(),
            authenticate_new_work_conns: true,
            ..Default::default()
        };
        auth.oidc_additional_params.insert("audience".into(), "x".into());
        auth.complete();
        assert!(auth.token.is_empty());
        assert_eq!(auth.oidc_client_id, "id");
        assert!(auth.authenticate_new_work_conns);
        assert_eq!(auth.oidc_additional_params.len(), 1);
    }

    #[test]
    fn test_legacy_format_drops_token_source() {
        let mut config = config_with(vec![]);
        config.common.auth.token_source = "file".into();
        config.convert(Format::Legacy);
        config.complete(Direction::Read);
        assert!(config.common.auth.token_source.is_empty());
        assert_eq!(config.common.auth.token, "secret");
    }

    #[test]
    fn test_common_transport_pruning() {
        let mut config = config_with(vec![]);
        config.common.admin_user = "admin".into();
        config.common.pprof_enable = true;
        config.common.tcp_mux = false;
        config.common.tcp_mux_keepalive_interval = 30;
        config.common.tls_enable = false;
        config.common.tls_server_name = "example.com".into();
        config.common.dial_server_timeout = 10;
        config.common.quic_max_idle_timeout = 30;
        config.complete(Direction::Read);

        assert!(config.common.admin_user.is_empty());
        assert!(!config.common.pprof_enable);
        assert_eq!(config.common.tcp_mux_keepalive_interval, 0);
        assert!(config.common.tls_server_name.is_empty());
        assert_eq!(config.common.dial_server_timeout, 10);
        assert_eq!(config.common.quic_max_idle_timeout, 0);

        config.common.protocol = "quic".into();
        config.common.quic_max_idle_timeout = 30;
        config.complete(Direction::Read);
        assert_eq!(config.common.dial_server_timeout, 0);
        assert_eq!(config.common.quic_max_idle_timeout, 30);
    }

    #[test]
    fn test_auto_delete_keeps_active_method_only() {
        let mut auto_delete = AutoDelete {
            method: "relative".into(),
            delete_after_days: 3,
            delete_after_date: Some(chrono::Utc::now()),
        };
        auto_delete.complete();
        assert_eq!(auto_delete.delete_after_days, 3);
        assert!(auto_delete.delete_after_date.is_none());
    }

    #[test]
    fn test_auto_delete_absolute_drops_days() {
        let date = chrono::Utc::now();
        let mut auto_delete = AutoDelete {
            method: "absolute".into(),
            delete_after_days: 5,
            delete_after_date: Some(date),
        };
        auto_delete.complete();
        assert_eq!(auto_delete.delete_after_days, 0);
        assert_eq!(auto_delete.delete_after_date, Some(date));
        assert_eq!(auto_delete.method, "absolute");
    }

    #[test]
    fn test_plugin_supersedes_local_address() {
        let mut proxy = Proxy::new("files");
        proxy.base.local_ip = "127.0.0.1".into();
        proxy.base.local_port = "80".into();
        proxy.base.plugin = "static_file".into();
        proxy.base.plugin_params.local_path = "/srv".into();
        proxy.base.plugin_params.crt_path = "server.crt".into();
        proxy.remote_port = "6000".into();
        proxy.custom_domains = "example.com".into();
        proxy.complete();

        assert!(proxy.base.local_ip.is_empty());
        assert!(proxy.base.local_port.is_empty());
        assert_eq!(proxy.base.plugin_params.local_path, "/srv");
        assert!(proxy.base.plugin_params.crt_path.is_empty());
        assert_eq!(proxy.remote_port, "6000");
        assert!(proxy.custom_domains.is_empty());
        assert_eq!(proxy.base.proxy_type, "tcp");
    }

    #[test]
    fn test_listener_without_plugin_or_health_check() {
        let mut proxy = Proxy::new("web");
        proxy.base.proxy_type = "http".into();
        proxy.base.plugin_params.user = "stale".into();
        proxy.base.health_check.url = "/health".into();
        proxy.base.group = "web".into();
        proxy.custom_domains = "example.com".into();
        proxy.remote_port = "80".into();
        proxy.complete();

        assert_eq!(proxy.base.plugin_params, PluginParams::default());
        assert_eq!(proxy.base.health_check, HealthCheckConf::default());
        assert_eq!(proxy.base.group, "web");
        assert_eq!(proxy.custom_domains, "example.com");
        assert!(proxy.remote_port.is_empty());
    }

    #[test]
    fn test_tcp_health_check_drops_url() {
        let mut proxy = Proxy::new("db");
        proxy.base.health_check_type = "tcp".into();
        proxy.base.health_check.interval_s = 10;
        proxy.base.health_check.url = "/status".into();
        proxy.complete();
        assert_eq!(proxy.base.health_check.interval_s, 10);
        assert!(proxy.base.health_check.url.is_empty());
    }

    #[test]
    fn test_xtcp_visitor_completion() {
        let mut proxy = Proxy::new("peer");
        proxy.base.proxy_type = "xtcp".into();
        proxy.base.use_encryption = true;
        proxy.base.local_port = "22".into();
        proxy.base.group = "g".into();
        proxy.base.disabled = true;
        proxy.role = "visitor".into();
        proxy.sk = "key".into();
        proxy.server_name = "ssh".into();
        proxy.bind_port = 6000;
        proxy.allow_users = "*".into();
        proxy.max_retries_an_hour = 8;
        proxy.fallback_timeout_ms = 500;
        proxy.complete();

        assert_eq!(proxy.name(), "peer");
        assert_eq!(proxy.base.proxy_type, "xtcp");
        assert!(proxy.base.use_encryption);
        assert!(proxy.base.disabled);
        assert!(proxy.base.local_port.is_empty());
        assert!(proxy.base.group.is_empty());
        assert_eq!(proxy.role, "visitor");
        assert_eq!(proxy.sk, "key");
        assert_eq!(proxy.server_name, "ssh");
        assert_eq!(proxy.bind_port, 6000);
        assert!(proxy.allow_users.is_empty());
        assert_eq!(proxy.max_retries_an_hour, 0);
        assert_eq!(proxy.fallback_timeout_ms, 0);
    }

    #[test]
    fn test_stcp_visitor_drops_xtcp_tuning() {
        let mut proxy = Proxy::new("peer");
        proxy.base.proxy_type = "stcp".into();
        proxy.role = "visitor".into();
        proxy.keep_tunnel_open = true;
        proxy.fallback_to = "other".into();
        proxy.complete();
        assert!(!proxy.keep_tunnel_open);
        assert!(proxy.fallback_to.is_empty());
    }

    #[test]
    fn test_start_list_symmetry() {
        let mut ranged = Proxy::new("game");
        ranged.base.local_port = "7000-7001".into();
        ranged.remote_port = "7000-7001".into();
        let mut disabled = Proxy::new("web");
        disabled.base.local_port = "80".into();
        disabled.base.disabled = true;
        let mut config = config_with(vec![Proxy::new("ssh"), ranged, disabled]);

        config.complete(Direction::Write);
        assert_eq!(config.common.start, vec!["ssh", "game_0", "game_1"]);

        for proxy in &mut config.proxies {
            proxy.base.disabled = false;
        }
        config.complete(Direction::Read);
        let flags: Vec<_> = config.proxies.iter().map(|p| p.base.disabled).collect();
        assert_eq!(flags, [false, false, true]);
    }

    #[test]
    fn test_all_enabled_writes_empty_start() {
        let mut config = config_with(vec![Proxy::new("a"), Proxy::new("b")]);
        config.common.start = vec!["a".into()];
        config.complete(Direction::Write);
        assert!(config.common.start.is_empty());
        assert_eq!(config.count_start(), 2);
    }

    #[test]
    fn test_range_proxy_partially_listed_is_disabled() {
        let mut ranged = Proxy::new("game");
        ranged.base.local_port = "7000-7001".into();
        let mut config = config_with(vec![ranged]);
        config.common.start = vec!["game_0".into()];
        config.complete(Direction::Read);
        assert!(config.proxies[0].base.disabled);
    }

    #[test]
    fn test_completion_is_idempotent() {
        let mut visitor = Proxy::new("peer");
        visitor.base.proxy_type = "xtcp".into();
        visitor.role = "visitor".into();
        visitor.keep_tunnel_open = true;
        visitor.max_retries_an_hour = 8;
        let mut plugin = Proxy::new("proxy");
        plugin.base.plugin = "http_proxy".into();
        plugin.base.plugin_params.http_user = "u".into();
        plugin.base.local_port = "1-3".into();
        let mut config = config_with(vec![visitor, plugin]);
        config.common.auth.authenticate_heartbeats = true;
        config.common.start = vec!["peer".into()];

        for direction in [Direction::Read, Direction::Write] {
            let mut once = config.clone();
            once.complete(direction);
            let mut twice = once.clone();
            twice.complete(direction);
            assert_eq!(once, twice, "{:?}", direction);
        }
    }
}
