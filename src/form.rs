//! Form-side policy model: flat, always valid-shaped, edited by value.
//!
//! Every list entry carries an opaque `key` used only for list identity in
//! editors. Keys are never emitted to the wire and never compared by the
//! conversion code.

use serde::{Deserialize, Serialize};

pub mod keys;

/// Ordered label pairs. Pairs with an empty key are placeholders.
pub type Pairs = Vec<(String, String)>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub pod_selector: Pairs,
    #[serde(default)]
    pub ingress: Rules,
    #[serde(default)]
    pub egress: Rules,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rules {
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub deny_all: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default = "rule_key")]
    pub key: String,
    #[serde(default)]
    pub peers: Vec<Peer>,
    #[serde(default)]
    pub ports: Vec<Port>,
}

/// One allowed peer. Either `ip_block`, or one or both selectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Peer {
    #[serde(default = "peer_key")]
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_selector: Option<Pairs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace_selector: Option<Pairs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_block: Option<IpBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpBlock {
    #[serde(default)]
    pub cidr: String,
    /// `None` when the resource has no `except` field at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub except: Option<Vec<Except>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Except {
    #[serde(default = "exception_key")]
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    #[serde(default = "port_key")]
    pub key: String,
    #[serde(default = "default_protocol")]
    pub protocol: String,
    /// numeric or named port
    #[serde(default)]
    pub port: String,
}

fn rule_key() -> String {
    keys::unique(keys::RULE)
}
fn peer_key() -> String {
    keys::unique(keys::PEER)
}
fn exception_key() -> String {
    keys::unique(keys::EXCEPTION)
}
fn port_key() -> String {
    keys::unique(keys::PORT)
}
pub fn default_protocol() -> String {
    "TCP".into()
}

impl Policy {
    /// A new policy as an editor starts it: one placeholder selector pair and
    /// neither direction restricted.
    pub fn empty(namespace: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            namespace: namespace.into(),
            pod_selector: vec![(String::new(), String::new())],
            ingress: Rules::default(),
            egress: Rules::default(),
        }
    }

    /// Structural equality, ignoring list-identity keys.
    pub fn same_as(&self, other: &Policy) -> bool {
        self.unkeyed() == other.unkeyed()
    }

    fn unkeyed(&self) -> Self {
        Self {
            ingress: self.ingress.unkeyed(),
            egress: self.egress.unkeyed(),
            ..self.clone()
        }
    }
}

impl Rules {
    pub fn deny_all() -> Self {
        Self {
            rules: Vec::new(),
            deny_all: true,
        }
    }

    fn unkeyed(&self) -> Self {
        Self {
            rules: self.rules.iter().map(Rule::unkeyed).collect(),
            deny_all: self.deny_all,
        }
    }
}

impl Rule {
    pub fn new(peers: Vec<Peer>, ports: Vec<Port>) -> Self {
        Self {
            key: rule_key(),
            peers,
            ports,
        }
    }

    fn unkeyed(&self) -> Self {
        Self {
            key: String::new(),
            peers: self.peers.iter().map(Peer::unkeyed).collect(),
            ports: (self.ports.iter())
                .map(|p| Port {
                    key: String::new(),
                    ..p.clone()
                })
                .collect(),
        }
    }
}

impl Peer {
    fn blank() -> Self {
        Self {
            key: peer_key(),
            pod_selector: None,
            namespace_selector: None,
            ip_block: None,
        }
    }

    pub fn pods(pod_selector: Pairs) -> Self {
        Self {
            pod_selector: Some(pod_selector),
            ..Self::blank()
        }
    }

    pub fn namespaces(namespace_selector: Pairs) -> Self {
        Self {
            namespace_selector: Some(namespace_selector),
            ..Self::blank()
        }
    }

    pub fn ip_block(ip_block: IpBlock) -> Self {
        Self {
            ip_block: Some(ip_block),
            ..Self::blank()
        }
    }

    pub fn with_namespaces(mut self, namespace_selector: Pairs) -> Self {
        self.namespace_selector = Some(namespace_selector);
        self
    }

    /// A peer must select something.
    pub fn is_empty(&self) -> bool {
        self.ip_block.is_none() && self.pod_selector.is_none() && self.namespace_selector.is_none()
    }

    fn unkeyed(&self) -> Self {
        Self {
            key: String::new(),
            ip_block: self.ip_block.as_ref().map(|ib| IpBlock {
                cidr: ib.cidr.clone(),
                except: (ib.except.as_ref()).map(|except| {
                    (except.iter())
                        .map(|e| Except {
                            key: String::new(),
                            value: e.value.clone(),
                        })
                        .collect()
                }),
            }),
            ..self.clone()
        }
    }
}

impl IpBlock {
    pub fn new(cidr: impl Into<String>, except: Option<Vec<String>>) -> Self {
        Self {
            cidr: cidr.into(),
            except: except.map(|values| values.into_iter().map(Except::new).collect()),
        }
    }
}

impl Except {
    pub fn new(value: String) -> Self {
        Self {
            key: exception_key(),
            value,
        }
    }
}

impl Port {
    pub fn new(protocol: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            key: port_key(),
            protocol: protocol.into(),
            port: port.into(),
        }
    }
}

#[cfg(test)]
pub(crate) fn pairs<const N: usize>(pairs: [(&str, &str); N]) -> Pairs {
    (pairs.into_iter())
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
