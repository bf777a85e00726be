use serde::Serialize;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};

/// Network identity attached to annotations: the service that recorded them
/// and the address it was serving on.
#[derive(TypedBuilder, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    #[builder(setter(strip_option, into), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    service_name: Option<String>,
    #[builder(setter(strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    ipv4: Option<Ipv4Addr>,
    #[builder(setter(strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    ipv6: Option<Ipv6Addr>,
    #[builder(setter(strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    port: Option<u16>,
}

impl Endpoint {
    /// Build an endpoint for `service_name`, filling the address fields from
    /// `socket_addr` when one is known.
    pub fn new(service_name: String, socket_addr: Option<SocketAddr>) -> Self {
        match socket_addr {
            Some(SocketAddr::V4(v4)) => Endpoint::builder()
                .service_name(service_name)
                .ipv4(*v4.ip())
                .port(v4.port())
                .build(),
            Some(SocketAddr::V6(v6)) => Endpoint::builder()
                .service_name(service_name)
                .ipv6(*v6.ip())
                .port(v6.port())
                .build(),
            None => Endpoint::builder().service_name(service_name).build(),
        }
    }

    /// Service name, if one was set.
    pub fn service_name(&self) -> Option<&str> {
        self.service_name.as_deref()
    }

    /// Listen port, if one was set.
    pub fn port(&self) -> Option<u16> {
        self.port
    }
}

#[cfg(test)]
mod tests {
    use super::Endpoint;
    use std::net::Ipv4Addr;

    #[test]
    fn test_empty() {
        test_json_serialization(Endpoint::builder().build(), "{}");
    }

    #[test]
    fn test_ipv4() {
        test_json_serialization(
            Endpoint::builder()
                .service_name("frontend")
                .ipv4(Ipv4Addr::new(127, 0, 0, 1))
                .port(8080)
                .build(),
            "{\"serviceName\":\"frontend\",\"ipv4\":\"127.0.0.1\",\"port\":8080}",
        );
    }

    #[test]
    fn test_from_socket_addr() {
        let endpoint = Endpoint::new("frontend".to_string(), Some("192.168.0.1:9000".parse().unwrap()));
        assert_eq!(endpoint.service_name(), Some("frontend"));
        assert_eq!(endpoint.port(), Some(9000));
        test_json_serialization(
            endpoint,
            "{\"serviceName\":\"frontend\",\"ipv4\":\"192.168.0.1\",\"port\":9000}",
        );
    }

    fn test_json_serialization(endpoint: Endpoint, desired: &str) {
        let result = serde_json::to_string(&endpoint).unwrap();
        assert_eq!(result, desired.to_owned());
    }
}
