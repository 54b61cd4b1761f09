use k8s_openapi::api::networking::v1::{
    NetworkPolicyEgressRule as EgressRule, NetworkPolicyIngressRule as IngressRule,
};
use serde_json::Value;

use crate::{
    Options, Result,
    form::{self, keys},
    map_all, peer, port,
    rules::Direction,
    wire,
};

/// Empty peer or port lists are omitted rather than emitted as `[]`.
pub fn to_wire(rule: &form::Rule, direction: Direction, path: &str) -> Result<Value> {
    let peers = if rule.peers.is_empty() {
        None
    } else {
        Some(map_all(&rule.peers, |_, p| peer::to_wire(p))?)
    };

    let ports: Option<Vec<_>> = if rule.ports.is_empty() {
        None
    } else {
        Some(rule.ports.iter().map(port::to_wire).collect())
    };

    match direction {
        Direction::Ingress => wire::encode(&IngressRule { from: peers, ports }, path),
        Direction::Egress => wire::encode(&EgressRule { to: peers, ports }, path),
    }
}

pub fn from_wire(
    rule: &Value,
    direction: Direction,
    path: &str,
    opts: &Options,
) -> Result<form::Rule> {
    wire::object(rule, path)?;

    let mut converted = form::Rule {
        key: keys::unique(keys::RULE),
        peers: Vec::new(),
        ports: Vec::new(),
    };

    if let Some(ports) = wire::field(rule, "ports") {
        let ports = wire::array(ports, format!("{path}.ports"))?;
        converted.ports = map_all(ports, |i, p| {
            port::from_wire(p, &format!("{path}.ports[{i}]"), opts)
        })?;
    }

    // the peers key counts even when null
    let peers_key = direction.peers_key();
    if let Some(peers) = rule.get(peers_key) {
        let peers = wire::array(peers, format!("{path}.{peers_key}"))?;
        converted.peers = map_all(peers, |i, p| {
            peer::from_wire(p, &format!("{path}.{peers_key}[{i}]"), opts)
        })?;
    }

    Ok(converted)
}
