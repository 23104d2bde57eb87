//! Decoder options
//!
//! Read from the optional `decoder:` section of a manifest:
//!
//! ```yaml
//! decoder:
//!   mode: all-or-nothing
//! ```

use serde::{Deserialize, Serialize};

/// How `bind` treats members already applied when a later member fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BindMode {
    /// Members bound before the failure stay bound
    #[default]
    BestEffort,
    /// Bind into a copy and commit only when every member succeeded
    AllOrNothing,
}

/// Tunables for a [`Decoder`](crate::Decoder)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecoderOptions {
    pub mode: BindMode,
}

impl DecoderOptions {
    pub fn with_mode(mut self, mode: BindMode) -> Self {
        self.mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_best_effort() {
        assert_eq!(DecoderOptions::default().mode, BindMode::BestEffort);
    }

    #[test]
    fn parse_from_yaml() {
        let opts: DecoderOptions = serde_yaml::from_str("mode: all-or-nothing").unwrap();
        assert_eq!(opts.mode, BindMode::AllOrNothing);

        let opts: DecoderOptions = serde_yaml::from_str("{}").unwrap();
        assert_eq!(opts, DecoderOptions::default());
    }

    #[test]
    fn unknown_fields_rejected() {
        assert!(serde_yaml::from_str::<DecoderOptions>("strict: true").is_err());
    }
}
