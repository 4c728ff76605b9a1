//! Engine and animation settings.
//!
//! Defaults reproduce the original visualization. A [`Config`] can also be
//! loaded from JSON; missing fields fall back to their defaults.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::matrix::{DISPLAY_DECIMALS, MAX_DECIMALS};

/// Which matrix products inside a pipeline stage are rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoundingPolicy {
    /// Every `multiply` rounds, including the intermediate product that is
    /// multiplied again.
    #[default]
    PerMultiply,
    /// Intermediate products keep full precision; only the stage result rounds.
    StageOutput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub rounding: RoundingPolicy,
    /// Rounding precision, at most [`MAX_DECIMALS`].
    #[serde(deserialize_with = "decimals_in_range")]
    pub decimals: u32,
}

fn decimals_in_range<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let decimals = u32::deserialize(deserializer)?;
    if decimals > MAX_DECIMALS {
        return Err(serde::de::Error::custom(format!(
            "decimals {} out of range (max {})",
            decimals, MAX_DECIMALS
        )));
    }
    Ok(decimals)
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            rounding: RoundingPolicy::PerMultiply,
            decimals: DISPLAY_DECIMALS,
        }
    }
}

/// Frame cadence for each kind of animation, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub transform_ms: u64,
    pub elementwise_ms: u64,
    pub convolution_ms: u64,
}

impl AnimationConfig {
    pub fn transform_interval(&self) -> Duration {
        Duration::from_millis(self.transform_ms)
    }

    pub fn elementwise_interval(&self) -> Duration {
        Duration::from_millis(self.elementwise_ms)
    }

    pub fn convolution_interval(&self) -> Duration {
        Duration::from_millis(self.convolution_ms)
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        AnimationConfig {
            transform_ms: 500,
            elementwise_ms: 300,
            convolution_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub animation: AnimationConfig,
}

impl Config {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_visualization() {
        let cfg = Config::default();
        assert_eq!(cfg.engine.decimals, 3);
        assert_eq!(cfg.engine.rounding, RoundingPolicy::PerMultiply);
        assert_eq!(cfg.animation.transform_interval(), Duration::from_millis(500));
        assert_eq!(cfg.animation.elementwise_interval(), Duration::from_millis(300));
        assert_eq!(cfg.animation.convolution_interval(), Duration::from_millis(1000));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = Config::from_json(r#"{"engine": {"rounding": "stage-output"}}"#).unwrap();
        assert_eq!(cfg.engine.rounding, RoundingPolicy::StageOutput);
        assert_eq!(cfg.engine.decimals, 3);
        assert_eq!(cfg.animation, AnimationConfig::default());
    }

    #[test]
    fn decimals_out_of_range_rejected() {
        for text in [
            r#"{"engine": {"decimals": 16}}"#,
            r#"{"engine": {"decimals": 400}}"#,
            r#"{"engine": {"decimals": 4294967295}}"#,
        ] {
            let err = Config::from_json(text).unwrap_err();
            assert!(err.to_string().contains("out of range"), "{}", err);
        }
        let cfg = Config::from_json(r#"{"engine": {"decimals": 15}}"#).unwrap();
        assert_eq!(cfg.engine.decimals, MAX_DECIMALS);
    }

    #[test]
    fn unknown_policy_rejected() {
        assert!(Config::from_json(r#"{"engine": {"rounding": "never"}}"#).is_err());
    }
}
