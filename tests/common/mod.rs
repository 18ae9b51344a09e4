// File: common/mod.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

#![allow(dead_code)]

use nodepulse::config::{ConfigParameter, Endpoints};
use serde_json::{json, Map, Value};
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Config pointed at `server` and `data_dir`, with millisecond backoff.
pub fn test_config(server: &MockServer, data_dir: &Path) -> ConfigParameter {
    let mut config = ConfigParameter::new();
    config.set_endpoints(Endpoints::with_base(&server.uri()));
    config.set_data_dir(data_dir.to_path_buf());
    config.set_backoff_base_ms(1);
    config.set_timeout(2);
    config
}

pub fn create_json_response(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(data.to_string())
        .append_header("content-type", "application/json")
}

/// A Bitnodes payload with `total` peers; every `tor_every`th peer is a Tor peer
/// and every odd peer has an IPv6 address.
pub fn bitnodes_payload(total: usize, tor_every: usize) -> Value {
    let mut nodes = Map::new();
    for i in 0..total {
        let user_agent = if tor_every > 0 && i % tor_every == 0 {
            "/Satoshi:26.0.0(tor)/"
        } else {
            "/Satoshi:27.0.0/"
        };
        let address = if i % 2 == 0 {
            format!("10.{}.{}.{}:8333", i / 65536, (i / 256) % 256, i % 256)
        } else {
            format!("[2001:db8::{:x}]:8333", i)
        };
        nodes.insert(
            address,
            json!([70016, user_agent, 1718000000, 1033, 850000, "host", "city", "DE"]),
        );
    }

    json!({
        "timestamp": 1718000000,
        "total_nodes": total,
        "latest_height": 850000,
        "nodes": Value::Object(nodes),
    })
}

pub async fn mount_bitnodes(server: &MockServer, payload: Value) {
    Mock::given(method("GET"))
        .and(path("/bitnodes/snapshots/latest/"))
        .respond_with(create_json_response(payload))
        .mount(server)
        .await;
}

pub async fn mount_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_server_setup() {
        let server = setup_mock_server().await;
        assert!(!server.uri().is_empty());
    }

    #[test]
    fn test_bitnodes_payload_shape() {
        let payload = bitnodes_payload(4, 2);
        assert_eq!(payload["nodes"].as_object().unwrap().len(), 4);
        assert_eq!(payload["total_nodes"], 4);
    }
}
