//! Tuning knobs for scalar multiplication and signature verification.

use curve::Affine;
use serde::{Deserialize, Serialize};

use crate::point::Point;

/// What a multi-scalar multiplication proves about its result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MsmMode {
    /// The result is not the neutral element.
    AssertNonZero,
    /// The result is the neutral element; the constant zero point is returned.
    AssertZero,
}

/// Per-point table settings.
///
/// A window of `w` bits costs a table of `2^w` multiples and one lookup per
/// `w` bits of scalar. Constant points get their table for free.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    pub window_size: usize,
    /// Precomputed `[0, P, 2P, …]`, used instead of building the table.
    #[serde(skip)]
    pub multiples: Option<Vec<Point>>,
}

impl TableConfig {
    pub fn new(window_size: usize) -> Self {
        TableConfig {
            window_size,
            multiples: None,
        }
    }

    #[must_use]
    pub fn with_multiples(mut self, multiples: Vec<Point>) -> Self {
        self.multiples = Some(multiples);
        self
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        TableConfig::new(1)
    }
}

/// Settings for [`crate::ecdsa::verify`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EcdsaConfig {
    /// Table for the generator, which is always a constant.
    pub g: TableConfig,
    /// Table for the public key.
    pub p: TableConfig,
    /// Initial aggregator; derived from the curve when absent.
    pub ia: Option<Affine>,
}

impl Default for EcdsaConfig {
    fn default() -> Self {
        EcdsaConfig {
            g: TableConfig::new(4),
            p: TableConfig::new(3),
            ia: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_serializes_kebab_case() {
        let json = serde_json::to_string(&MsmMode::AssertNonZero).unwrap();
        assert_eq!(json, "\"assert-non-zero\"");
        let mode: MsmMode = serde_json::from_str("\"assert-zero\"").unwrap();
        assert_eq!(mode, MsmMode::AssertZero);
    }

    #[test]
    fn test_ecdsa_config_from_json() {
        let config: EcdsaConfig = serde_json::from_str(
            r#"{ "g": { "window_size": 5 }, "p": { "window_size": 2 }, "ia": null }"#,
        )
        .unwrap();
        assert_eq!(config.g.window_size, 5);
        assert_eq!(config.p, TableConfig::new(2));
        assert!(config.ia.is_none());

        let default = EcdsaConfig::default();
        assert_eq!((default.g.window_size, default.p.window_size), (4, 3));
        let round = serde_json::to_string(&default).unwrap();
        assert_eq!(serde_json::from_str::<EcdsaConfig>(&round).unwrap(), default);
    }
}
