// File: analysis.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

static TOR_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)tor|onion").unwrap());
static SATOSHI_VERSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"Satoshi:([^/]*)").unwrap());

pub const UNKNOWN_VERSION: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeType {
    Tor,
    #[serde(rename = "IPv4")]
    Ipv4,
    #[serde(rename = "IPv6")]
    Ipv6,
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeType::Tor => write!(f, "Tor"),
            NodeType::Ipv4 => write!(f, "IPv4"),
            NodeType::Ipv6 => write!(f, "IPv6"),
        }
    }
}

/// One entry of the upstream `nodes` map.
#[derive(Debug, Clone, Copy)]
pub struct Peer<'a> {
    pub address: &'a str,
    pub details: &'a Value,
}

impl<'a> Peer<'a> {
    /// The second element of the peer's detail array. Entries that are not an
    /// array of at least two elements have no user agent.
    pub fn user_agent(&self) -> Option<String> {
        match self.details.as_array() {
            Some(fields) if fields.len() >= 2 => Some(match &fields[1] {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            }),
            _ => None,
        }
    }

    pub fn is_tor(&self) -> bool {
        self.user_agent().is_some_and(|ua| is_tor_user_agent(&ua))
    }
}

/// The first `sample_size` peers in upstream document order.
pub fn sample_peers(
    nodes: &Map<String, Value>,
    sample_size: usize,
) -> impl Iterator<Item = Peer<'_>> {
    nodes.iter().take(sample_size).map(|(address, details)| Peer {
        address: address.as_str(),
        details,
    })
}

pub fn is_tor_user_agent(user_agent: &str) -> bool {
    TOR_MARKER.is_match(user_agent)
}

/// `address` is a `host:port` peer key; IPv6 hosts are bracketed.
pub fn classify_transport(address: &str, user_agent: &str) -> NodeType {
    let host = address.rsplit_once(':').map_or(address, |(host, _)| host);
    if is_tor_user_agent(user_agent) {
        NodeType::Tor
    } else if host.contains(':') {
        NodeType::Ipv6
    } else {
        NodeType::Ipv4
    }
}

pub fn client_version(user_agent: &str) -> String {
    SATOSHI_VERSION
        .captures(user_agent)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN_VERSION.to_string())
}

/// Classification counts over a bounded peer sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeAnalysis {
    pub total_nodes: usize,
    #[serde(default)]
    pub node_types: BTreeMap<NodeType, u64>,
    #[serde(default)]
    pub versions: BTreeMap<String, u64>,
    #[serde(default)]
    pub user_agents: BTreeMap<String, u64>,
}

impl NodeAnalysis {
    /// `None` for an empty peer map.
    pub fn from_peers(nodes: &Map<String, Value>, sample_size: usize) -> Option<Self> {
        if nodes.is_empty() {
            return None;
        }

        let mut analysis = NodeAnalysis::default();
        for peer in sample_peers(nodes, sample_size) {
            analysis.total_nodes += 1;

            let user_agent = peer.user_agent();
            let ua = user_agent.as_deref().unwrap_or("");

            *analysis
                .node_types
                .entry(classify_transport(peer.address, ua))
                .or_insert(0) += 1;
            *analysis.versions.entry(client_version(ua)).or_insert(0) += 1;

            if let Some(ua) = user_agent {
                *analysis.user_agents.entry(ua).or_insert(0) += 1;
            }
        }

        Some(analysis)
    }

    pub fn count(&self, node_type: NodeType) -> u64 {
        self.node_types.get(&node_type).copied().unwrap_or(0)
    }

    /// Percentage of the sample classified as `node_type`.
    pub fn share(&self, node_type: NodeType) -> f64 {
        if self.total_nodes == 0 {
            return 0.0;
        }
        self.count(node_type) as f64 / self.total_nodes as f64 * 100.0
    }

    /// Most common client versions, highest count first, ties by version string.
    pub fn top_versions(&self, n: usize) -> Vec<(&str, u64)> {
        let mut versions: Vec<(&str, u64)> = self
            .versions
            .iter()
            .map(|(v, c)| (v.as_str(), *c))
            .collect();
        versions.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        versions.truncate(n);
        versions
    }
}
