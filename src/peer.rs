use k8s_openapi::{
    api::networking::v1::{IPBlock, NetworkPolicyPeer},
    apimachinery::pkg::apis::meta::v1::LabelSelector,
};
use serde_json::Value;

use crate::{
    Error, Options, Result,
    form::{self, keys},
    selector, wire,
};

/// An IP block wins over selectors.
pub fn to_wire(peer: &form::Peer) -> Result<NetworkPolicyPeer> {
    if let Some(ref ip_block) = peer.ip_block {
        return Ok(NetworkPolicyPeer {
            ip_block: Some(ip_block_to_wire(ip_block)),
            ..Default::default()
        });
    }

    let select_all = || Some(LabelSelector::default());

    let pod_selector = match peer.pod_selector {
        Some(ref pairs) => selector::to_wire(pairs, select_all())?,
        None => None,
    };
    let namespace_selector = match peer.namespace_selector {
        Some(ref pairs) => selector::to_wire(pairs, select_all())?,
        None => None,
    };

    Ok(NetworkPolicyPeer {
        pod_selector,
        namespace_selector,
        ip_block: None,
    })
}

fn ip_block_to_wire(ip_block: &form::IpBlock) -> IPBlock {
    IPBlock {
        cidr: ip_block.cidr.clone(),
        except: (ip_block.except.as_ref())
            .map(|except| except.iter().map(|e| e.value.clone()).collect()),
    }
}

pub fn from_wire(peer: &Value, path: &str, opts: &Options) -> Result<form::Peer> {
    wire::object(peer, path)?;

    let mut out = form::Peer {
        key: keys::unique(keys::PEER),
        pod_selector: None,
        namespace_selector: None,
        ip_block: None,
    };

    if let Some(ip_block) = wire::field(peer, "ipBlock") {
        out.ip_block = Some(ip_block_from_wire(ip_block, &format!("{path}.ipBlock"))?);
    } else {
        if let Some(sel) = wire::field(peer, "podSelector") {
            let path = format!("{path}.podSelector");
            out.pod_selector = Some(selector::from_wire(sel, &path, opts)?);
        }
        if let Some(sel) = wire::field(peer, "namespaceSelector") {
            let path = format!("{path}.namespaceSelector");
            out.namespace_selector = Some(selector::from_wire(sel, &path, opts)?);
        }
    }

    if out.is_empty() {
        return Err(Error::EmptyPeer(path.into()));
    }
    Ok(out)
}

fn ip_block_from_wire(ip_block: &Value, path: &str) -> Result<form::IpBlock> {
    wire::object(ip_block, path)?;

    let cidr = match wire::field(ip_block, "cidr") {
        None => String::new(),
        Some(v) => wire::decode(v, &format!("{path}.cidr"))?,
    };

    let except = match ip_block.get("except") {
        None => None,
        Some(except) => {
            let except = wire::array(except, format!("{path}.except"))?;
            let values = crate::map_all(except, |i, v| {
                wire::decode::<String>(v, &format!("{path}.except[{i}]"))
            })?;
            Some(values.into_iter().map(form::Except::new).collect())
        }
    };

    Ok(form::IpBlock { cidr, except })
}
