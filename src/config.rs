use netpol_form::Options;

#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
pub struct Config {
    /// Reject constructs the form can't represent instead of dropping them.
    #[serde(default)]
    pub strict: bool,

    /// Format of emitted NetworkPolicy resources.
    #[serde(default)]
    pub output: Output,
}

#[derive(Debug, Default, Clone, Copy, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Output {
    #[default]
    Yaml,
    Json,
}

impl Config {
    pub fn options(&self) -> Options {
        Options {
            strict: self.strict,
        }
    }
}
