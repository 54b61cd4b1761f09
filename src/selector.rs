use itertools::Itertools;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use log::debug;
use serde_json::Value;
use std::collections::BTreeMap as Map;

use crate::{Error, Options, Result, form::Pairs, wire};

/// Builds a `matchLabels` selector from the pairs with a non-empty key.
///
/// When no such pair remains, `empty` is returned: `None` for a policy's pod
/// selector (serialized as `null`), `Some({})` for a peer's selectors.
pub fn to_wire(pairs: &Pairs, empty: Option<LabelSelector>) -> Result<Option<LabelSelector>> {
    let filtered: Vec<_> = pairs.iter().filter(|(k, _)| !k.is_empty()).collect();
    if filtered.is_empty() {
        return Ok(empty);
    }

    let labels: Map<String, String> = (filtered.iter())
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    if labels.len() != filtered.len() {
        let key = (filtered.iter().map(|(k, _)| k))
            .duplicates()
            .next()
            .cloned()
            .unwrap_or_default();
        return Err(Error::DuplicateKey(key));
    }

    Ok(Some(LabelSelector {
        match_labels: Some(labels),
        ..Default::default()
    }))
}

/// Lists a selector's `matchLabels` in key order. `null` selects everything.
pub fn from_wire(selector: &Value, path: &str, opts: &Options) -> Result<Pairs> {
    if selector.is_null() {
        return Ok(Pairs::new());
    }

    let selector: LabelSelector = wire::decode(selector, path)?;

    if selector.match_expressions.as_ref().is_some_and(|e| !e.is_empty()) {
        let path = format!("{path}.matchExpressions");
        if opts.strict {
            return Err(Error::Unsupported(path));
        }
        debug!("{path}: dropped");
    }

    Ok(selector.match_labels.unwrap_or_default().into_iter().collect())
}
