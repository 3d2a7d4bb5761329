//! The schema table.
//!
//! One [`FieldSpec`] per persisted field, grouped by record, followed by the
//! [`Record`] implementations that bind each spec to its struct field. The
//! walk order is the order keys are written in.

use crate::config::capability::{caps, FieldSpec, Record, Walker};
use crate::config::consts::delete_method;
use crate::config::schema::{
    AuthSettings, AutoDelete, BaseProxyConf, ClientCommon, HealthCheckConf, PluginParams, Proxy,
};

pub mod auth {
    use super::*;

    use crate::config::consts::auth_method::{OIDC, TOKEN};

    pub const METHOD: FieldSpec = FieldSpec::new("authentication_method");
    pub const HEARTBEATS: FieldSpec =
        FieldSpec::new("authenticate_heartbeats").caps(caps![Auth => [TOKEN, OIDC]]);
    pub const NEW_WORK_CONNS: FieldSpec =
        FieldSpec::new("authenticate_new_work_conns").caps(caps![Auth => [TOKEN, OIDC]]);
    pub const TOKEN_VALUE: FieldSpec = FieldSpec::new("token").caps(caps![Auth => [TOKEN]]);
    pub const TOKEN_SOURCE: FieldSpec = FieldSpec::new("token_source")
        .caps(caps![Auth => [TOKEN]])
        .modern_only();
    pub const TOKEN_SOURCE_FILE: FieldSpec = FieldSpec::new("token_source_file")
        .caps(caps![Auth => [TOKEN]])
        .modern_only();
    pub const OIDC_CLIENT_ID: FieldSpec = FieldSpec::new("oidc_client_id").caps(caps![Auth => [OIDC]]);
    pub const OIDC_CLIENT_SECRET: FieldSpec =
        FieldSpec::new("oidc_client_secret").caps(caps![Auth => [OIDC]]);
    pub const OIDC_AUDIENCE: FieldSpec = FieldSpec::new("oidc_audience").caps(caps![Auth => [OIDC]]);
    pub const OIDC_SCOPE: FieldSpec = FieldSpec::new("oidc_scope").caps(caps![Auth => [OIDC]]);
    pub const OIDC_TOKEN_ENDPOINT: FieldSpec =
        FieldSpec::new("oidc_token_endpoint_url").caps(caps![Auth => [OIDC]]);
    pub const OIDC_ADDITIONAL: FieldSpec = FieldSpec::new("oidc_additional_").caps(caps![Auth => [OIDC]]);
}

impl Record for AuthSettings {
    fn walk<W: Walker>(&mut self, w: &mut W) {
        w.field(&auth::METHOD, &mut self.method);
        w.field(&auth::HEARTBEATS, &mut self.authenticate_heartbeats);
        w.field(&auth::NEW_WORK_CONNS, &mut self.authenticate_new_work_conns);
        w.field(&auth::TOKEN_VALUE, &mut self.token);
        w.field(&auth::TOKEN_SOURCE, &mut self.token_source);
        w.field(&auth::TOKEN_SOURCE_FILE, &mut self.token_source_file);
        w.field(&auth::OIDC_CLIENT_ID, &mut self.oidc_client_id);
        w.field(&auth::OIDC_CLIENT_SECRET, &mut self.oidc_client_secret);
        w.field(&auth::OIDC_AUDIENCE, &mut self.oidc_audience);
        w.field(&auth::OIDC_SCOPE, &mut self.oidc_scope);
        w.field(&auth::OIDC_TOKEN_ENDPOINT, &mut self.oidc_token_endpoint_url);
        w.side_map(&auth::OIDC_ADDITIONAL, &mut self.oidc_additional_params);
    }
}

pub mod auto_delete {
    use super::*;

    pub const METHOD: FieldSpec = FieldSpec::new("frpcgui_delete_method");
    pub const AFTER_DAYS: FieldSpec =
        FieldSpec::new("frpcgui_delete_after_days").caps(caps![AutoDelete => [delete_method::RELATIVE]]);
    pub const AFTER_DATE: FieldSpec =
        FieldSpec::new("frpcgui_delete_after_date").caps(caps![AutoDelete => [delete_method::ABSOLUTE]]);
}

impl Record for AutoDelete {
    fn walk<W: Walker>(&mut self, w: &mut W) {
        w.field(&auto_delete::METHOD, &mut self.method);
        w.field(&auto_delete::AFTER_DAYS, &mut self.delete_after_days);
        w.field(&auto_delete::AFTER_DATE, &mut self.delete_after_date);
    }
}

pub mod common {
    use super::*;

    pub const SERVER_ADDR: FieldSpec = FieldSpec::new("server_addr");
    pub const SERVER_PORT: FieldSpec = FieldSpec::new("server_port");
    pub const NAT_HOLE_STUN_SERVER: FieldSpec = FieldSpec::new("nat_hole_stun_server");
    pub const DIAL_SERVER_TIMEOUT: FieldSpec = FieldSpec::new("dial_server_timeout");
    pub const DIAL_SERVER_KEEPALIVE: FieldSpec = FieldSpec::new("dial_server_keepalive");
    pub const CONNECT_SERVER_LOCAL_IP: FieldSpec = FieldSpec::new("connect_server_local_ip");
    pub const HTTP_PROXY: FieldSpec = FieldSpec::new("http_proxy");
    pub const LOG_FILE: FieldSpec = FieldSpec::new("log_file");
    pub const LOG_LEVEL: FieldSpec = FieldSpec::new("log_level");
    pub const LOG_MAX_DAYS: FieldSpec = FieldSpec::new("log_max_days");
    pub const ADMIN_ADDR: FieldSpec = FieldSpec::new("admin_addr");
    pub const ADMIN_PORT: FieldSpec = FieldSpec::new("admin_port");
    pub const ADMIN_USER: FieldSpec = FieldSpec::new("admin_user");
    pub const ADMIN_PWD: FieldSpec = FieldSpec::new("admin_pwd");
    pub const ASSETS_DIR: FieldSpec = FieldSpec::new("assets_dir");
    pub const POOL_COUNT: FieldSpec = FieldSpec::new("pool_count");
    pub const DNS_SERVER: FieldSpec = FieldSpec::new("dns_server");
    pub const PROTOCOL: FieldSpec = FieldSpec::new("protocol");
    pub const QUIC_KEEPALIVE_PERIOD: FieldSpec = FieldSpec::new("quic_keepalive_period");
    pub const QUIC_MAX_IDLE_TIMEOUT: FieldSpec = FieldSpec::new("quic_max_idle_timeout");
    pub const QUIC_MAX_INCOMING_STREAMS: FieldSpec = FieldSpec::new("quic_max_incoming_streams");
    pub const LOGIN_FAIL_EXIT: FieldSpec = FieldSpec::new("login_fail_exit").always();
    pub const USER: FieldSpec = FieldSpec::new("user");
    pub const HEARTBEAT_INTERVAL: FieldSpec = FieldSpec::new("heartbeat_interval");
    pub const HEARTBEAT_TIMEOUT: FieldSpec = FieldSpec::new("heartbeat_timeout");
    pub const TCP_MUX: FieldSpec = FieldSpec::new("tcp_mux").always();
    pub const TCP_MUX_KEEPALIVE_INTERVAL: FieldSpec = FieldSpec::new("tcp_mux_keepalive_interval");
    pub const TLS_ENABLE: FieldSpec = FieldSpec::new("tls_enable").always();
    pub const TLS_CERT_FILE: FieldSpec = FieldSpec::new("tls_cert_file");
    pub const TLS_KEY_FILE: FieldSpec = FieldSpec::new("tls_key_file");
    pub const TLS_TRUSTED_CA_FILE: FieldSpec = FieldSpec::new("tls_trusted_ca_file");
    pub const TLS_SERVER_NAME: FieldSpec = FieldSpec::new("tls_server_name");
    pub const UDP_PACKET_SIZE: FieldSpec = FieldSpec::new("udp_packet_size");
    pub const START: FieldSpec = FieldSpec::new("start");
    pub const PPROF_ENABLE: FieldSpec = FieldSpec::new("pprof_enable");
    pub const DISABLE_CUSTOM_TLS_FIRST_BYTE: FieldSpec =
        FieldSpec::new("disable_custom_tls_first_byte").always();
    pub const NAME: FieldSpec = FieldSpec::new("frpcgui_name").always();
    pub const MANUAL_START: FieldSpec = FieldSpec::new("frpcgui_manual_start");
    pub const METAS: FieldSpec = FieldSpec::new("meta_");
}

impl Record for ClientCommon {
    fn walk<W: Walker>(&mut self, w: &mut W) {
        w.field(&common::SERVER_ADDR, &mut self.server_addr);
        w.field(&common::SERVER_PORT, &mut self.server_port);
        w.field(&common::USER, &mut self.user);
        self.auth.walk(w);
        w.field(&common::NAT_HOLE_STUN_SERVER, &mut self.nat_hole_stun_server);
        w.field(&common::DIAL_SERVER_TIMEOUT, &mut self.dial_server_timeout);
        w.field(&common::DIAL_SERVER_KEEPALIVE, &mut self.dial_server_keepalive);
        w.field(&common::CONNECT_SERVER_LOCAL_IP, &mut self.connect_server_local_ip);
        w.field(&common::HTTP_PROXY, &mut self.http_proxy);
        w.field(&common::LOG_FILE, &mut self.log_file);
        w.field(&common::LOG_LEVEL, &mut self.log_level);
        w.field(&common::LOG_MAX_DAYS, &mut self.log_max_days);
        w.field(&common::ADMIN_ADDR, &mut self.admin_addr);
        w.field(&common::ADMIN_PORT, &mut self.admin_port);
        w.field(&common::ADMIN_USER, &mut self.admin_user);
        w.field(&common::ADMIN_PWD, &mut self.admin_pwd);
        w.field(&common::ASSETS_DIR, &mut self.assets_dir);
        w.field(&common::POOL_COUNT, &mut self.pool_count);
        w.field(&common::DNS_SERVER, &mut self.dns_server);
        w.field(&common::PROTOCOL, &mut self.protocol);
        w.field(&common::QUIC_KEEPALIVE_PERIOD, &mut self.quic_keepalive_period);
        w.field(&common::QUIC_MAX_IDLE_TIMEOUT, &mut self.quic_max_idle_timeout);
        w.field(&common::QUIC_MAX_INCOMING_STREAMS, &mut self.quic_max_incoming_streams);
        w.field(&common::LOGIN_FAIL_EXIT, &mut self.login_fail_exit);
        w.field(&common::HEARTBEAT_INTERVAL, &mut self.heartbeat_interval);
        w.field(&common::HEARTBEAT_TIMEOUT, &mut self.heartbeat_timeout);
        w.field(&common::TCP_MUX, &mut self.tcp_mux);
        w.field(&common::TCP_MUX_KEEPALIVE_INTERVAL, &mut self.tcp_mux_keepalive_interval);
        w.field(&common::TLS_ENABLE, &mut self.tls_enable);
        w.field(&common::TLS_CERT_FILE, &mut self.tls_cert_file);
        w.field(&common::TLS_KEY_FILE, &mut self.tls_key_file);
        w.field(&common::TLS_TRUSTED_CA_FILE, &mut self.tls_trusted_ca_file);
        w.field(&common::TLS_SERVER_NAME, &mut self.tls_server_name);
        w.field(&common::UDP_PACKET_SIZE, &mut self.udp_packet_size);
        w.field(&common::START, &mut self.start);
        w.field(&common::PPROF_ENABLE, &mut self.pprof_enable);
        w.field(&common::DISABLE_CUSTOM_TLS_FIRST_BYTE, &mut self.disable_custom_tls_first_byte);
        w.field(&common::NAME, &mut self.name);
        w.field(&common::MANUAL_START, &mut self.manual_start);
        self.auto_delete.walk(w);
        w.side_map(&common::METAS, &mut self.metas);
    }
}

pub mod plugin_params {
    use super::*;

    use crate::config::consts::plugin::*;

    pub const LOCAL_ADDR: FieldSpec = FieldSpec::new("plugin_local_addr")
        .caps(caps![Plugin => [HTTP2HTTPS, HTTP2HTTP, HTTPS2HTTPS, HTTPS2HTTP, TLS2RAW]]);
    pub const CRT_PATH: FieldSpec =
        FieldSpec::new("plugin_crt_path").caps(caps![Plugin => [HTTPS2HTTPS, HTTPS2HTTP, TLS2RAW]]);
    pub const KEY_PATH: FieldSpec =
        FieldSpec::new("plugin_key_path").caps(caps![Plugin => [HTTPS2HTTPS, HTTPS2HTTP, TLS2RAW]]);
    pub const HOST_HEADER_REWRITE: FieldSpec = FieldSpec::new("plugin_host_header_rewrite")
        .caps(caps![Plugin => [HTTP2HTTPS, HTTP2HTTP, HTTPS2HTTPS, HTTPS2HTTP]]);
    pub const HTTP_USER: FieldSpec =
        FieldSpec::new("plugin_http_user").caps(caps![Plugin => [HTTP_PROXY, STATIC_FILE]]);
    pub const HTTP_PASSWD: FieldSpec =
        FieldSpec::new("plugin_http_passwd").caps(caps![Plugin => [HTTP_PROXY, STATIC_FILE]]);
    pub const USER: FieldSpec = FieldSpec::new("plugin_user").caps(caps![Plugin => [SOCKS5]]);
    pub const PASSWD: FieldSpec = FieldSpec::new("plugin_passwd").caps(caps![Plugin => [SOCKS5]]);
    pub const LOCAL_PATH: FieldSpec = FieldSpec::new("plugin_local_path").caps(caps![Plugin => [STATIC_FILE]]);
    pub const STRIP_PREFIX: FieldSpec =
        FieldSpec::new("plugin_strip_prefix").caps(caps![Plugin => [STATIC_FILE]]);
    pub const UNIX_PATH: FieldSpec =
        FieldSpec::new("plugin_unix_path").caps(caps![Plugin => [UNIX_DOMAIN_SOCKET]]);
    pub const HEADERS: FieldSpec = FieldSpec::new("plugin_header_")
        .caps(caps![Plugin => [HTTP2HTTPS, HTTP2HTTP, HTTPS2HTTPS, HTTPS2HTTP]]);
    pub const ENABLE_HTTP2: FieldSpec = FieldSpec::new("plugin_enable_http2")
        .caps(caps![Plugin => [HTTPS2HTTPS, HTTPS2HTTP]])
        .modern_only();
}

impl Record for PluginParams {
    fn walk<W: Walker>(&mut self, w: &mut W) {
        w.field(&plugin_params::LOCAL_ADDR, &mut self.local_addr);
        w.field(&plugin_params::CRT_PATH, &mut self.crt_path);
        w.field(&plugin_params::KEY_PATH, &mut self.key_path);
        w.field(&plugin_params::HOST_HEADER_REWRITE, &mut self.host_header_rewrite);
        w.field(&plugin_params::HTTP_USER, &mut self.http_user);
        w.field(&plugin_params::HTTP_PASSWD, &mut self.http_passwd);
        w.field(&plugin_params::USER, &mut self.user);
        w.field(&plugin_params::PASSWD, &mut self.passwd);
        w.field(&plugin_params::LOCAL_PATH, &mut self.local_path);
        w.field(&plugin_params::STRIP_PREFIX, &mut self.strip_prefix);
        w.field(&plugin_params::UNIX_PATH, &mut self.unix_path);
        w.side_map(&plugin_params::HEADERS, &mut self.headers);
        w.field(&plugin_params::ENABLE_HTTP2, &mut self.enable_http2);
    }
}

pub mod health {
    use super::*;

    use crate::config::consts::health_check::{HTTP, TCP};

    pub const TIMEOUT_S: FieldSpec = FieldSpec::new("health_check_timeout_s").caps(caps![HealthCheck => [TCP, HTTP]]);
    pub const MAX_FAILED: FieldSpec =
        FieldSpec::new("health_check_max_failed").caps(caps![HealthCheck => [TCP, HTTP]]);
    pub const INTERVAL_S: FieldSpec =
        FieldSpec::new("health_check_interval_s").caps(caps![HealthCheck => [TCP, HTTP]]);
    pub const URL: FieldSpec = FieldSpec::new("health_check_url").caps(caps![HealthCheck => [HTTP]]);
    pub const HEADERS: FieldSpec = FieldSpec::new("health_check_header_")
        .caps(caps![HealthCheck => [HTTP]])
        .modern_only();
}

impl Record for HealthCheckConf {
    fn walk<W: Walker>(&mut self, w: &mut W) {
        w.field(&health::TIMEOUT_S, &mut self.timeout_s);
        w.field(&health::MAX_FAILED, &mut self.max_failed);
        w.field(&health::INTERVAL_S, &mut self.interval_s);
        w.field(&health::URL, &mut self.url);
        w.side_map(&health::HEADERS, &mut self.headers);
    }
}

pub mod base {
    use super::*;

    pub const TYPE: FieldSpec = FieldSpec::new("type").always();
    pub const USE_ENCRYPTION: FieldSpec = FieldSpec::new("use_encryption");
    pub const USE_COMPRESSION: FieldSpec = FieldSpec::new("use_compression");
    pub const GROUP: FieldSpec = FieldSpec::new("group");
    pub const GROUP_KEY: FieldSpec = FieldSpec::new("group_key");
    pub const PROXY_PROTOCOL_VERSION: FieldSpec = FieldSpec::new("proxy_protocol_version");
    pub const BANDWIDTH_LIMIT: FieldSpec = FieldSpec::new("bandwidth_limit");
    pub const BANDWIDTH_LIMIT_MODE: FieldSpec = FieldSpec::new("bandwidth_limit_mode");
    pub const LOCAL_IP: FieldSpec = FieldSpec::new("local_ip");
    pub const LOCAL_PORT: FieldSpec = FieldSpec::new("local_port");
    pub const PLUGIN: FieldSpec = FieldSpec::new("plugin");
    pub const HEALTH_CHECK_TYPE: FieldSpec = FieldSpec::new("health_check_type");
    pub const METAS: FieldSpec = FieldSpec::new("meta_");
}

impl Record for BaseProxyConf {
    fn walk<W: Walker>(&mut self, w: &mut W) {
        w.field(&base::TYPE, &mut self.proxy_type);
        w.field(&base::USE_ENCRYPTION, &mut self.use_encryption);
        w.field(&base::USE_COMPRESSION, &mut self.use_compression);
        w.field(&base::GROUP, &mut self.group);
        w.field(&base::GROUP_KEY, &mut self.group_key);
        w.field(&base::PROXY_PROTOCOL_VERSION, &mut self.proxy_protocol_version);
        w.field(&base::BANDWIDTH_LIMIT, &mut self.bandwidth_limit);
        w.field(&base::BANDWIDTH_LIMIT_MODE, &mut self.bandwidth_limit_mode);
        w.field(&base::LOCAL_IP, &mut self.local_ip);
        w.field(&base::LOCAL_PORT, &mut self.local_port);
        w.field(&base::PLUGIN, &mut self.plugin);
        self.plugin_params.walk(w);
        w.field(&base::HEALTH_CHECK_TYPE, &mut self.health_check_type);
        self.health_check.walk(w);
        w.side_map(&base::METAS, &mut self.metas);
    }
}

pub mod proxy {
    use super::*;

    use crate::config::consts::proxy_type::*;

    pub const REMOTE_PORT: FieldSpec = FieldSpec::new("remote_port").caps(caps![ProxyType => [TCP, UDP]]);
    pub const ROLE: FieldSpec =
        FieldSpec::new("role").caps(caps![ProxyType => [STCP, XTCP, SUDP], Visitor => *]);
    pub const SK: FieldSpec = FieldSpec::new("sk").caps(caps![ProxyType => [STCP, XTCP, SUDP], Visitor => *]);
    pub const ALLOW_USERS: FieldSpec =
        FieldSpec::new("allow_users").caps(caps![ProxyType => [STCP, XTCP, SUDP]]);
    pub const SERVER_USER: FieldSpec = FieldSpec::new("server_user").caps(caps![Visitor => *]);
    pub const SERVER_NAME: FieldSpec = FieldSpec::new("server_name").caps(caps![Visitor => *]);
    pub const BIND_ADDR: FieldSpec = FieldSpec::new("bind_addr").caps(caps![Visitor => *]);
    pub const BIND_PORT: FieldSpec = FieldSpec::new("bind_port").caps(caps![Visitor => *]);
    pub const CUSTOM_DOMAINS: FieldSpec =
        FieldSpec::new("custom_domains").caps(caps![ProxyType => [HTTP, HTTPS, TCPMUX]]);
    pub const SUBDOMAIN: FieldSpec = FieldSpec::new("subdomain").caps(caps![ProxyType => [HTTP, HTTPS, TCPMUX]]);
    pub const LOCATIONS: FieldSpec = FieldSpec::new("locations").caps(caps![ProxyType => [HTTP]]);
    pub const HTTP_USER: FieldSpec = FieldSpec::new("http_user").caps(caps![ProxyType => [HTTP, TCPMUX]]);
    pub const HTTP_PWD: FieldSpec = FieldSpec::new("http_pwd").caps(caps![ProxyType => [HTTP, TCPMUX]]);
    pub const HOST_HEADER_REWRITE: FieldSpec =
        FieldSpec::new("host_header_rewrite").caps(caps![ProxyType => [HTTP]]);
    pub const HEADERS: FieldSpec = FieldSpec::new("header_").caps(caps![ProxyType => [HTTP]]);
    pub const RESPONSE_HEADERS: FieldSpec = FieldSpec::new("response_header_")
        .caps(caps![ProxyType => [HTTP]])
        .modern_only();
    pub const MULTIPLEXER: FieldSpec = FieldSpec::new("multiplexer").caps(caps![ProxyType => [TCPMUX]]);
    pub const ROUTE_BY_HTTP_USER: FieldSpec =
        FieldSpec::new("route_by_http_user").caps(caps![ProxyType => [HTTP, TCPMUX]]);
    pub const PROTOCOL: FieldSpec = FieldSpec::new("protocol").caps(caps![Visitor => [XTCP]]);
    pub const KEEP_TUNNEL_OPEN: FieldSpec = FieldSpec::new("keep_tunnel_open").caps(caps![Visitor => [XTCP]]);
    pub const MAX_RETRIES_AN_HOUR: FieldSpec =
        FieldSpec::new("max_retries_an_hour").caps(caps![Visitor => [XTCP]]);
    pub const MIN_RETRY_INTERVAL: FieldSpec =
        FieldSpec::new("min_retry_interval").caps(caps![Visitor => [XTCP]]);
    pub const FALLBACK_TO: FieldSpec = FieldSpec::new("fallback_to").caps(caps![Visitor => [XTCP]]);
    pub const FALLBACK_TIMEOUT_MS: FieldSpec =
        FieldSpec::new("fallback_timeout_ms").caps(caps![Visitor => [XTCP]]);
}

impl Record for Proxy {
    fn walk<W: Walker>(&mut self, w: &mut W) {
        self.base.walk(w);
        w.field(&proxy::REMOTE_PORT, &mut self.remote_port);
        w.field(&proxy::ROLE, &mut self.role);
        w.field(&proxy::SK, &mut self.sk);
        w.field(&proxy::ALLOW_USERS, &mut self.allow_users);
        w.field(&proxy::SERVER_USER, &mut self.server_user);
        w.field(&proxy::SERVER_NAME, &mut self.server_name);
        w.field(&proxy::BIND_ADDR, &mut self.bind_addr);
        w.field(&proxy::BIND_PORT, &mut self.bind_port);
        w.field(&proxy::CUSTOM_DOMAINS, &mut self.custom_domains);
        w.field(&proxy::SUBDOMAIN, &mut self.subdomain);
        w.field(&proxy::LOCATIONS, &mut self.locations);
        w.field(&proxy::HTTP_USER, &mut self.http_user);
        w.field(&proxy::HTTP_PWD, &mut self.http_pwd);
        w.field(&proxy::HOST_HEADER_REWRITE, &mut self.host_header_rewrite);
        w.side_map(&proxy::HEADERS, &mut self.headers);
        w.side_map(&proxy::RESPONSE_HEADERS, &mut self.response_headers);
        w.field(&proxy::MULTIPLEXER, &mut self.multiplexer);
        w.field(&proxy::ROUTE_BY_HTTP_USER, &mut self.route_by_http_user);
        w.field(&proxy::PROTOCOL, &mut self.protocol);
        w.field(&proxy::KEEP_TUNNEL_OPEN, &mut self.keep_tunnel_open);
        w.field(&proxy::MAX_RETRIES_AN_HOUR, &mut self.max_retries_an_hour);
        w.field(&proxy::MIN_RETRY_INTERVAL, &mut self.min_retry_interval);
        w.field(&proxy::FALLBACK_TO, &mut self.fallback_to);
        w.field(&proxy::FALLBACK_TIMEOUT_MS, &mut self.fallback_timeout_ms);
    }
}
