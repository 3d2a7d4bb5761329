//! Capability projection.
//!
//! # Responsibilities
//! - Keep the fields of a record that apply to one capability label
//! - Reset every other field of that grouping to its zero value
//!
//! # Design Decisions
//! - Pure: the input is never modified, the output is a fresh record
//! - Total: an unknown label is not an error, it simply retains nothing
//!   that the grouping declares
//! - Nested records are projected field by field through [`Record::walk`]

use std::collections::BTreeMap;

use crate::config::capability::{FieldSpec, Grouping, Record, Walker};
use crate::config::value::FieldValue;

/// Returns a copy of `record` holding only the fields retained under `label`.
pub fn project<R: Record>(record: &R, grouping: Grouping, label: &str) -> R {
    let mut projected = record.clone();
    projected.walk(&mut Projector { grouping, label });
    projected
}

struct Projector<'a> {
    grouping: Grouping,
    label: &'a str,
}

impl Walker for Projector<'_> {
    fn field<T: FieldValue>(&mut self, spec: &FieldSpec, value: &mut T) {
        if !spec.retained(self.grouping, self.label) {
            *value = T::default();
        }
    }

    fn side_map(&mut self, spec: &FieldSpec, value: &mut BTreeMap<String, String>) {
        if !spec.retained(self.grouping, self.label) {
            value.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{AuthSettings, PluginParams, Proxy};

    fn full_plugin_params() -> PluginParams {
        PluginParams {
            local_addr: "127.0.0.1:80".into(),
            crt_path: "server.crt".into(),
            key_path: "server.key".into(),
            host_header_rewrite: "example.com".into(),
            http_user: "admin".into(),
            http_passwd: "secret".into(),
            user: "socks".into(),
            passwd: "socks-secret".into(),
            local_path: "/srv".into(),
            strip_prefix: "static".into(),
            unix_path: "/var/run/app.sock".into(),
            headers: BTreeMap::from([("X-From".to_string(), "tunnel".to_string())]),
            enable_http2: true,
        }
    }

    #[test]
    fn test_plugin_projection_keeps_tagged_fields() {
        let params = full_plugin_params();
        let socks = project(&params, Grouping::Plugin, "socks5");
        assert_eq!(
            socks,
            PluginParams {
                user: "socks".into(),
                passwd: "socks-secret".into(),
                ..Default::default()
            }
        );

        let https = project(&params, Grouping::Plugin, "https2http");
        assert_eq!(https.local_addr, "127.0.0.1:80");
        assert_eq!(https.crt_path, "server.crt");
        assert!(https.enable_http2);
        assert_eq!(https.headers.len(), 1);
        assert!(https.user.is_empty());
        assert!(https.local_path.is_empty());
    }

    #[test]
    fn test_projection_does_not_touch_input() {
        let params = full_plugin_params();
        let _ = project(&params, Grouping::Plugin, "socks5");
        assert_eq!(params, full_plugin_params());
    }

    #[test]
    fn test_unknown_label_retains_nothing_declared() {
        let auth = AuthSettings {
            method: "kerberos".into(),
            token: "123".into(),
            oidc_client_id: "client".into(),
            authenticate_heartbeats: true,
            ..Default::default()
        };
        let projected = project(&auth, Grouping::Auth, "kerberos");
        assert_eq!(
            projected,
            AuthSettings {
                method: "kerberos".into(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_projection_is_idempotent() {
        let params = full_plugin_params();
        let once = project(&params, Grouping::Plugin, "static_file");
        let twice = project(&once, Grouping::Plugin, "static_file");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_groupings_are_independent() {
        let auth = AuthSettings {
            method: "oidc".into(),
            token: "123".into(),
            oidc_scope: "profile".into(),
            ..Default::default()
        };
        // A grouping that declares nothing on the record leaves it intact.
        let through_plugin = project(&auth, Grouping::Plugin, "socks5");
        assert_eq!(through_plugin, auth);
        assert_eq!(
            project(&through_plugin, Grouping::Auth, "oidc"),
            project(&auth, Grouping::Auth, "oidc")
        );
    }

    #[test]
    fn test_exhaustive_grouping_resets_undeclared_fields() {
        let mut proxy = Proxy::new("web");
        proxy.base.local_port = "8080".into();
        proxy.remote_port = "80".into();
        proxy.custom_domains = "example.com".into();
        proxy.server_name = "peer".into();

        let http = project(&proxy, Grouping::ProxyType, "http");
        assert_eq!(http.custom_domains, "example.com");
        assert!(http.remote_port.is_empty());
        assert!(http.server_name.is_empty());
        assert!(http.base.local_port.is_empty());
        assert!(http.base.proxy_type.is_empty());
    }
}
