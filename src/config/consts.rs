//! Capability labels, reserved names and default values.

/// Proxy types.
pub mod proxy_type {
    pub const TCP: &str = "tcp";
    pub const UDP: &str = "udp";
    pub const XTCP: &str = "xtcp";
    pub const STCP: &str = "stcp";
    pub const SUDP: &str = "sudp";
    pub const TCPMUX: &str = "tcpmux";
    pub const HTTP: &str = "http";
    pub const HTTPS: &str = "https";
}

/// Authentication methods.
pub mod auth_method {
    pub const TOKEN: &str = "token";
    pub const OIDC: &str = "oidc";
}

/// Plugin kinds.
pub mod plugin {
    pub const HTTP2HTTPS: &str = "http2https";
    pub const HTTP2HTTP: &str = "http2http";
    pub const HTTPS2HTTPS: &str = "https2https";
    pub const HTTPS2HTTP: &str = "https2http";
    pub const TLS2RAW: &str = "tls2raw";
    pub const HTTP_PROXY: &str = "http_proxy";
    pub const STATIC_FILE: &str = "static_file";
    pub const SOCKS5: &str = "socks5";
    pub const UNIX_DOMAIN_SOCKET: &str = "unix_domain_socket";
}

/// Health check kinds.
pub mod health_check {
    pub const TCP: &str = "tcp";
    pub const HTTP: &str = "http";
}

/// Auto-delete methods.
pub mod delete_method {
    pub const ABSOLUTE: &str = "absolute";
    pub const RELATIVE: &str = "relative";
}

/// Role value that turns a secret proxy into a visitor.
pub const ROLE_VISITOR: &str = "visitor";

/// Transport protocol that swaps dial settings for QUIC settings.
pub const PROTOCOL_QUIC: &str = "quic";

/// Section-name marker for range proxies in the legacy format.
pub const RANGE_PREFIX: &str = "range:";

/// Legacy block holding client-common settings.
pub const LEGACY_COMMON_SECTION: &str = "common";

/// Modern table holding client-common settings.
pub const MODERN_CLIENT_TABLE: &str = "client";

/// Modern table holding one sub-table per proxy.
pub const MODERN_PROXIES_TABLE: &str = "proxies";

pub const DEFAULT_SERVER_PORT: u16 = 7000;
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOG_MAX_DAYS: i64 = 3;
