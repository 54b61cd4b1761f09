//! Ingress and egress blocks, and which directions a policy affects.

use serde_json::Value;

use crate::{
    Options, Result,
    form::{self, Rules},
    map_all, rule, wire,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ingress,
    Egress,
}

impl Direction {
    /// Name used in `spec.policyTypes`.
    pub fn policy_type(self) -> &'static str {
        match self {
            Self::Ingress => "Ingress",
            Self::Egress => "Egress",
        }
    }

    /// Name of the block in `spec`.
    pub fn field(self) -> &'static str {
        match self {
            Self::Ingress => "ingress",
            Self::Egress => "egress",
        }
    }

    pub fn peers_key(self) -> &'static str {
        match self {
            Self::Ingress => "from",
            Self::Egress => "to",
        }
    }

    pub fn path(self) -> String {
        format!("Spec.{}", self.field())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Affects {
    pub ingress: bool,
    pub egress: bool,
}

impl Affects {
    /// Directions restricted by a NetworkPolicy spec.
    ///
    /// With explicit `policyTypes`, a direction is affected iff it is listed.
    /// Otherwise ingress is always affected, and egress only when there is
    /// an `egress` section.
    pub fn from_spec(spec: &Value) -> Self {
        match wire::field(spec, "policyTypes") {
            Some(types) => {
                let listed = |d: Direction| {
                    (types.as_array().into_iter().flatten())
                        .any(|t| t.as_str() == Some(d.policy_type()))
                };
                Self {
                    ingress: listed(Direction::Ingress),
                    egress: listed(Direction::Egress),
                }
            }
            None => Self {
                ingress: true,
                egress: wire::field(spec, "egress").is_some(),
            },
        }
    }

    pub fn get(&self, direction: Direction) -> bool {
        match direction {
            Direction::Ingress => self.ingress,
            Direction::Egress => self.egress,
        }
    }

    /// The explicit `policyTypes` equivalent to these defaults.
    pub fn policy_types(&self) -> Vec<Value> {
        [Direction::Ingress, Direction::Egress]
            .into_iter()
            .filter(|d| self.get(*d))
            .map(|d| d.policy_type().into())
            .collect()
    }
}

/// Returns the wire block, if any, registering the direction in `policy_types`
/// when the block restricts traffic.
pub fn to_wire(
    block: &Rules,
    direction: Direction,
    policy_types: &mut Vec<String>,
) -> Result<Option<Vec<Value>>> {
    if block.deny_all {
        policy_types.push(direction.policy_type().into());
        return Ok(Some(Vec::new()));
    }
    if block.rules.is_empty() {
        return Ok(None);
    }

    policy_types.push(direction.policy_type().into());
    let path = direction.path();
    let rules = map_all(&block.rules, |i, r| {
        rule::to_wire(r, direction, &format!("{path}[{i}]"))
    })?;
    Ok(Some(rules))
}

pub fn from_wire(
    rules: Option<&Value>,
    direction: Direction,
    affected: bool,
    opts: &Options,
) -> Result<form::Rules> {
    if !affected {
        return Ok(Rules::default());
    }

    // an affected direction without rules allows no traffic
    let Some(rules) = rules else {
        return Ok(Rules::deny_all());
    };

    let path = direction.path();
    let rules = wire::array(rules, &path)?;
    if rules.is_empty() {
        return Ok(Rules::deny_all());
    }

    let rules = map_all(rules, |i, r| {
        rule::from_wire(r, direction, &format!("{path}[{i}]"), opts)
    })?;

    Ok(Rules {
        rules,
        deny_all: false,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{Error, form::pairs};
    use serde_json::json;

    #[test]
    fn test_affects() {
        let affects = |spec| Affects::from_spec(&spec);

        assert_eq!(affects(json!({})), Affects { ingress: true, egress: false });
        assert_eq!(affects(json!({"egress": []})), Affects { ingress: true, egress: true });
        assert_eq!(affects(json!({"egress": null})), Affects { ingress: true, egress: false });
        assert_eq!(
            affects(json!({"policyTypes": ["Egress"], "ingress": [{}]})),
            Affects { ingress: false, egress: true }
        );
        assert_eq!(
            affects(json!({"policyTypes": [], "egress": []})),
            Affects { ingress: false, egress: false }
        );
        assert_eq!(
            affects(json!({"policyTypes": "Ingress"})),
            Affects { ingress: false, egress: false }
        );
    }

    #[test]
    fn test_affects_policy_types() {
        let all = Affects { ingress: true, egress: true };
        assert_eq!(all.policy_types(), vec![json!("Ingress"), json!("Egress")]);
        let egress = Affects { ingress: false, egress: true };
        assert_eq!(egress.policy_types(), vec![json!("Egress")]);
    }

    #[test]
    fn test_to_wire() {
        let mut types = Vec::new();
        assert_eq!(to_wire(&Rules::default(), Direction::Ingress, &mut types).unwrap(), None);
        assert!(types.is_empty());

        assert_eq!(
            to_wire(&Rules::deny_all(), Direction::Egress, &mut types).unwrap(),
            Some(Vec::<Value>::new())
        );
        assert_eq!(types, vec!["Egress".to_string()]);

        let mut types = Vec::new();
        let block = Rules {
            rules: vec![form::Rule::new(vec![], vec![form::Port::new("TCP", "80")])],
            deny_all: false,
        };
        assert_eq!(
            to_wire(&block, Direction::Ingress, &mut types).unwrap(),
            Some(vec![json!({"ports": [{"protocol": "TCP", "port": 80}]})])
        );
        assert_eq!(types, vec!["Ingress".to_string()]);
    }

    #[test]
    fn test_to_wire_deny_all_wins() {
        let mut types = Vec::new();
        let block = Rules {
            rules: vec![form::Rule::new(vec![], vec![])],
            deny_all: true,
        };
        assert_eq!(
            to_wire(&block, Direction::Ingress, &mut types).unwrap(),
            Some(Vec::<Value>::new())
        );
    }

    #[test]
    fn test_to_wire_error() {
        let mut types = Vec::new();
        let block = Rules {
            rules: vec![form::Rule::new(
                vec![form::Peer::pods(pairs([("k", "1"), ("k", "2")]))],
                vec![],
            )],
            deny_all: false,
        };
        assert_eq!(
            to_wire(&block, Direction::Ingress, &mut types),
            Err(Error::DuplicateKey("k".into()))
        );
    }

    #[test]
    fn test_from_wire() {
        let opts = Options::default();
        let d = Direction::Ingress;

        assert_eq!(from_wire(None, d, false, &opts).unwrap(), Rules::default());
        assert_eq!(from_wire(Some(&json!("junk")), d, false, &opts).unwrap(), Rules::default());
        assert_eq!(from_wire(None, d, true, &opts).unwrap(), Rules::deny_all());
        assert_eq!(from_wire(Some(&json!([])), d, true, &opts).unwrap(), Rules::deny_all());

        let rules = json!([{}, {"ports": [{"port": 80}]}]);
        let block = from_wire(Some(&rules), d, true, &opts).unwrap();
        assert!(!block.deny_all);
        assert_eq!(block.rules.len(), 2);
        assert_eq!(block.rules[1].ports[0].port, "80");
    }

    #[test]
    fn test_from_wire_errors() {
        let opts = Options::default();

        let err = from_wire(Some(&json!({"from": []})), Direction::Egress, true, &opts);
        let err = err.unwrap_err();
        assert_eq!(err, Error::NotAnArray("Spec.egress".into()));

        let err = from_wire(
            Some(&json!([{}, {"to": [{"ipBlock": {"cidr": "1.1.1.1/32"}}, {}]}])),
            Direction::Egress,
            true,
            &opts,
        )
        .unwrap_err();
        assert_eq!(err, Error::EmptyPeer("Spec.egress[1].to[1]".into()));
    }
}
