use serde::Serialize;
use std::fmt::Display;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// What the caller can do about an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// The input itself is malformed.
    Invalid,
    /// The input is well-formed but uses something the form can't represent.
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("{0} is missing.")]
    Missing(String),

    #[error("{0} should be an Array.")]
    NotAnArray(String),

    #[error("{0} should not be empty.")]
    EmptyPeer(String),

    #[error("Duplicate key {0:?} found in label selector.")]
    DuplicateKey(String),

    #[error("{path} is invalid: {reason}")]
    Malformed { path: String, reason: String },

    #[error("{0} found in resource, but is not supported in form.")]
    Unsupported(String),

    #[error("invalid YAML: {0}")]
    Yaml(String),
}

impl Error {
    pub fn kind(&self) -> Kind {
        match self {
            Self::Unsupported(_) => Kind::Unsupported,
            _ => Kind::Invalid,
        }
    }

    pub fn malformed(path: impl Into<String>, reason: impl Display) -> Self {
        Self::Malformed {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Yaml(e.to_string())
    }
}

/// Converts every item in order, stopping at the first failure.
pub fn map_all<T, U>(items: &[T], mut f: impl FnMut(usize, &T) -> Result<U>) -> Result<Vec<U>> {
    items.iter().enumerate().map(|(i, item)| f(i, item)).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(Error::Missing("Spec".into()).kind(), Kind::Invalid);
        assert_eq!(Error::DuplicateKey("a".into()).kind(), Kind::Invalid);
        assert_eq!(
            Error::Unsupported("Spec.podSelector.matchExpressions".into()).kind(),
            Kind::Unsupported
        );
        assert_eq!(serde_json::to_value(Kind::Unsupported).unwrap(), "unsupported");
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            Error::NotAnArray("Spec.ingress[0].ports".into()).to_string(),
            "Spec.ingress[0].ports should be an Array."
        );
        assert_eq!(
            Error::EmptyPeer("Spec.egress[1].to[0]".into()).to_string(),
            "Spec.egress[1].to[0] should not be empty."
        );
    }

    #[test]
    fn test_map_all_first_error_wins() {
        let mut seen = Vec::new();
        let res = map_all(&[1, 2, 3, 4], |i, v| {
            seen.push(*v);
            if *v >= 2 {
                Err(Error::EmptyPeer(format!("item[{i}]")))
            } else {
                Ok(*v)
            }
        });
        assert_eq!(res, Err(Error::EmptyPeer("item[1]".into())));
        assert_eq!(seen, vec![1, 2]);

        assert_eq!(map_all(&[1, 2], |_, v| Ok(v * 10)), Ok(vec![10, 20]));
    }
}
