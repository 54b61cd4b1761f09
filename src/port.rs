use k8s_openapi::{
    api::networking::v1::NetworkPolicyPort,
    apimachinery::pkg::util::intstr::IntOrString,
};
use log::debug;
use serde_json::Value;

use crate::{
    Error, Options, Result,
    form::{self, keys},
    wire,
};

/// Numeric ports go out as integers, anything else as a named port.
pub fn to_wire(port: &form::Port) -> NetworkPolicyPort {
    let value = match port.port.parse::<i32>() {
        Ok(n) => IntOrString::Int(n),
        Err(_) => IntOrString::String(port.port.clone()),
    };
    NetworkPolicyPort {
        protocol: Some(port.protocol.clone()),
        port: Some(value),
        end_port: None,
    }
}

pub fn from_wire(port: &Value, path: &str, opts: &Options) -> Result<form::Port> {
    let port: NetworkPolicyPort = wire::decode(port, path)?;

    if port.end_port.is_some() {
        let path = format!("{path}.endPort");
        if opts.strict {
            return Err(Error::Unsupported(path));
        }
        debug!("{path}: dropped");
    }

    Ok(form::Port {
        key: keys::unique(keys::PORT),
        protocol: (port.protocol)
            .filter(|p| !p.is_empty())
            .unwrap_or_else(form::default_protocol),
        port: match port.port {
            None => String::new(),
            Some(IntOrString::Int(n)) => n.to_string(),
            Some(IntOrString::String(s)) => s,
        },
    })
}
