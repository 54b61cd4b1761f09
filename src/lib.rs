//! Conversion between Kubernetes NetworkPolicy resources and a flat,
//! form-editable policy model.
//!
//! `resource::to_wire` and `resource::from_wire` are the two directions;
//! `check::load` combines them with `resource::normalize` to tell when the
//! form can't represent everything a resource says.

pub mod check;
pub mod error;
pub mod form;
pub mod peer;
pub mod port;
pub mod resource;
pub mod rule;
pub mod rules;
pub mod selector;
pub mod wire;

pub use check::{Loaded, load, load_yaml, to_yaml};
pub use error::{Error, Kind, Result, map_all};

/// Conversion options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Options {
    /// Fail with an unsupported error on constructs the form can't represent
    /// (selector `matchExpressions`, port `endPort`) instead of dropping them.
    #[serde(default)]
    pub strict: bool,
}
