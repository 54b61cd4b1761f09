//! Whole NetworkPolicy resources.

use serde_json::{Map, Value, json};

use crate::{
    Error, Options, Result, form,
    rules::{self, Affects, Direction},
    selector, wire,
};


pub fn to_wire(policy: &form::Policy) -> Result<Value> {
    let pod_selector = selector::to_wire(&policy.pod_selector, None)?;

    let mut policy_types = Vec::new();
    let ingress = rules::to_wire(&policy.ingress, Direction::Ingress, &mut policy_types)?;
    let egress = rules::to_wire(&policy.egress, Direction::Egress, &mut policy_types)?;

    let mut spec = Map::new();
    spec.insert(
        "podSelector".into(),
        wire::encode(&pod_selector, "Spec.podSelector")?,
    );
    spec.insert("policyTypes".into(), policy_types.into());
    if let Some(ingress) = ingress {
        spec.insert(Direction::Ingress.field().into(), ingress.into());
    }
    if let Some(egress) = egress {
        spec.insert(Direction::Egress.field().into(), egress.into());
    }

    Ok(json!({
        "kind": wire::KIND,
        "apiVersion": wire::API_VERSION,
        "metadata": {
            "name": policy.name,
            "namespace": policy.namespace,
        },
        "spec": spec,
    }))
}

pub fn from_wire(resource: &Value, opts: &Options) -> Result<form::Policy> {
    let Some(metadata) = wire::field(resource, "metadata") else {
        return Err(Error::Missing("Metadata".into()));
    };
    let Some(spec) = wire::field(resource, "spec") else {
        return Err(Error::Missing("Spec".into()));
    };
    // podSelector may be null, but the key is required
    let Some(pod_selector) = spec.get("podSelector") else {
        return Err(Error::Missing("Spec.podSelector".into()));
    };

    let pod_selector = selector::from_wire(pod_selector, "Spec.podSelector", opts)?;

    if let Some(types) = wire::field(spec, "policyTypes") {
        wire::array(types, "Spec.policyTypes")?;
    }
    let affects = Affects::from_spec(spec);

    let block = |direction: Direction| {
        rules::from_wire(
            wire::field(spec, direction.field()),
            direction,
            affects.get(direction),
            opts,
        )
    };
    let ingress = block(Direction::Ingress)?;
    let egress = block(Direction::Egress)?;

    Ok(form::Policy {
        name: text(metadata, "name"),
        namespace: text(metadata, "namespace"),
        pod_selector,
        ingress,
        egress,
    })
}

/// Rewrites equivalent wire shapes to a single canonical one.
///
/// A `{}` pod selector becomes `null`; null blocks are dropped; implicit
/// `policyTypes` are made explicit; an affected ingress without rules gets an
/// explicit empty list.
pub fn normalize(resource: &Value) -> Value {
    let mut resource = resource.clone();

    let Some(spec) = resource.get_mut("spec").and_then(Value::as_object_mut) else {
        return resource;
    };

    if spec.get("podSelector").is_some_and(is_empty_object) {
        spec.insert("podSelector".into(), Value::Null);
    }

    for key in ["policyTypes", "ingress", "egress"] {
        if spec.get(key).is_some_and(Value::is_null) {
            spec.remove(key);
        }
    }

    if !spec.contains_key("policyTypes") {
        let defaults = Affects::from_spec(&Value::Object(spec.clone()));
        spec.insert("policyTypes".into(), defaults.policy_types().into());
    }

    let ingress = Direction::Ingress;
    let lists_ingress = (spec.get("policyTypes").and_then(Value::as_array))
        .is_some_and(|types| types.iter().any(|t| t.as_str() == Some(ingress.policy_type())));
    if lists_ingress && !spec.contains_key(ingress.field()) {
        spec.insert(ingress.field().into(), Value::Array(Vec::new()));
    }

    resource
}

/// Non-string values read as empty.
fn text(v: &Value, key: &str) -> String {
    (wire::field(v, key).and_then(Value::as_str))
        .unwrap_or_default()
        .to_string()
}

fn is_empty_object(v: &Value) -> bool {
    v.as_object().is_some_and(Map::is_empty)
}
