//! Loading wire resources into the form while detecting what the form drops.

use log::debug;
use serde_json::Value;

use crate::{Options, Result, form, resource};

#[derive(Debug, Clone)]
pub struct Loaded {
    pub policy: form::Policy,
    /// Converting back to the wire doesn't reproduce the (normalized) input:
    /// saving the form would silently drop something.
    pub lossy: bool,
}

pub fn load(resource: &Value, opts: &Options) -> Result<Loaded> {
    let normalized = resource::normalize(resource);
    let policy = resource::from_wire(&normalized, opts)?;
    let reconverted = resource::to_wire(&policy)?;

    let lossy = reconverted != normalized;
    if lossy {
        debug!("round-trip mismatch:\n  in:  {normalized}\n  out: {reconverted}");
    }

    Ok(Loaded { policy, lossy })
}

/// Parses YAML (or JSON) text and loads it.
pub fn load_yaml(text: &str, opts: &Options) -> Result<Loaded> {
    let resource: Value = serde_yaml::from_str(text)?;
    load(&resource, opts)
}

pub fn to_yaml(policy: &form::Policy) -> Result<String> {
    Ok(serde_yaml::to_string(&resource::to_wire(policy)?)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{Error, Kind, form::pairs};
    use serde_json::json;

    const ALLOW_DB: &str = r#"
apiVersion: networking.k8s.io/v1
kind: NetworkPolicy
metadata:
  name: allow-db
  namespace: prod
spec:
  podSelector:
    matchLabels:
      app: db
  ingress:
    - from:
        - podSelector:
            matchLabels:
              role: api
        - ipBlock:
            cidr: 172.17.0.0/16
            except:
              - 172.17.1.0/24
      ports:
        - protocol: TCP
          port: 5432
"#;

    #[test]
    fn test_load_yaml() {
        let loaded = load_yaml(ALLOW_DB, &Options::default()).unwrap();
        assert!(!loaded.lossy);

        let policy = loaded.policy;
        assert_eq!(policy.name, "allow-db");
        assert_eq!(policy.namespace, "prod");
        assert_eq!(policy.pod_selector, pairs([("app", "db")]));
        assert!(policy.egress.rules.is_empty() && !policy.egress.deny_all);

        let rule = &policy.ingress.rules[0];
        assert_eq!(rule.peers[0].pod_selector, Some(pairs([("role", "api")])));
        let ip_block = rule.peers[1].ip_block.as_ref().unwrap();
        assert_eq!(ip_block.cidr, "172.17.0.0/16");
        assert_eq!(ip_block.except.as_ref().unwrap()[0].value, "172.17.1.0/24");
        assert_eq!(rule.ports[0].port, "5432");
    }

    #[test]
    fn test_to_yaml_round_trip() {
        let policy = load_yaml(ALLOW_DB, &Options::default()).unwrap().policy;
        let text = to_yaml(&policy).unwrap();
        let again = load_yaml(&text, &Options::default()).unwrap();
        assert!(!again.lossy);
        assert!(again.policy.same_as(&policy));
    }

    fn resource(spec: Value) -> Value {
        json!({
            "kind": "NetworkPolicy",
            "apiVersion": "networking.k8s.io/v1",
            "metadata": {"name": "np", "namespace": "default"},
            "spec": spec,
        })
    }

    #[test]
    fn test_lossy() {
        let mut labelled = resource(json!({"podSelector": null}));
        labelled["metadata"]["labels"] = json!({"a": "b"});

        let resources = [
            // labels are not part of the form
            labelled,
            resource(json!({"podSelector": {
                "matchExpressions": [{"key": "app", "operator": "Exists"}],
            }})),
            resource(json!({
                "podSelector": null,
                "ingress": [{"ports": [{"port": 1, "endPort": 9}]}],
            })),
            // an empty peers list reads as no peers
            resource(json!({"podSelector": null, "ingress": [{"from": []}]})),
            resource(json!({"podSelector": null, "policyTypes": ["Egress", "Ingress"]})),
        ];
        for resource in resources {
            let loaded = load(&resource, &Options::default()).unwrap();
            assert!(loaded.lossy, "{resource}");
        }

        let plain = resource(json!({
            "podSelector": null,
            "ingress": [{"ports": [{"protocol": "TCP", "port": 1}]}],
        }));
        assert!(!load(&plain, &Options::default()).unwrap().lossy);
    }

    #[test]
    fn test_not_lossy() {
        let resource = json!({
            "kind": "NetworkPolicy",
            "apiVersion": "networking.k8s.io/v1",
            "metadata": {"name": "deny-all", "namespace": "default"},
            "spec": {"podSelector": {}},
        });
        let loaded = load(&resource, &Options::default()).unwrap();
        assert!(!loaded.lossy);
        assert_eq!(loaded.policy.ingress, form::Rules::deny_all());
    }

    #[test]
    fn test_errors() {
        let err = load_yaml("spec: [", &Options::default()).unwrap_err();
        assert!(matches!(err, Error::Yaml(_)));
        assert_eq!(err.kind(), Kind::Invalid);

        let err = load_yaml("metadata: {}\nspec: {}\n", &Options::default()).unwrap_err();
        assert_eq!(err, Error::Missing("Spec.podSelector".into()));

        let text = r#"
metadata: {}
spec:
  podSelector:
    matchExpressions: [{key: a, operator: Exists}]
"#;
        let err = load_yaml(text, &Options { strict: true }).unwrap_err();
        assert_eq!(err.kind(), Kind::Unsupported);

        let text = r#"
metadata: {}
spec:
  podSelector: null
  ingress:
    - from: null
"#;
        let err = load_yaml(text, &Options::default()).unwrap_err();
        assert_eq!(err, Error::NotAnArray("Spec.ingress[0].from".into()));
    }
}
