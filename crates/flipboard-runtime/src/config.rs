#![forbid(unsafe_code)]

//! Board configuration as data.
//!
//! Captures every tunable of a board as a single [`BoardConfig`] that can be
//! loaded from TOML or JSON at startup.
//!
//! ```toml
//! roster = ["Salus", "Fides", "Veritas", "Pax"]
//! sentinel = "?"
//! initial_order = { mode = "shuffled" }
//!
//! [animation]
//! duration_ms = 800
//! easing = [0.25, 1.0, 0.5, 1.0]
//! settle_margin_ms = 250
//!
//! [entries]
//! query = { kind = "recent", count = 8 }
//! ```
//!
//! # Defaults
//!
//! `BoardConfig::default()` reproduces the stock four-house board: 800 ms
//! `cubic-bezier(0.25, 1, 0.5, 1)` reorder, 250 ms settle margin, `?` as
//! the sentinel, and the eight most recent entries.

use std::path::Path;
use std::time::Duration;

use flipboard_core::entries::{EntryQuery, HouseFilter};
use flipboard_core::{CubicBezier, InitialOrder, Roster, Transition};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_ROSTER: [&str; 4] = ["SALUS", "FIDES", "VERITAS", "PAX"];

/// Top-level board configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Fixed identities, one card each.
    pub roster: Vec<String>,
    /// Token marking an undetermined score.
    pub sentinel: String,
    /// Card text before the first payload arrives.
    pub loading_text: String,
    /// Arrangement at mount.
    pub initial_order: InitialOrder,
    pub animation: AnimationConfig,
    pub summary: SummaryConfig,
    pub entries: EntriesConfig,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            roster: DEFAULT_ROSTER.iter().map(|s| (*s).to_owned()).collect(),
            sentinel: flipboard_core::DEFAULT_SENTINEL.to_owned(),
            loading_text: "...".to_owned(),
            initial_order: InitialOrder::default(),
            animation: AnimationConfig::default(),
            summary: SummaryConfig::default(),
            entries: EntriesConfig::default(),
        }
    }
}

/// Reorder animation timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub duration_ms: u64,
    /// `cubic-bezier` control points `[x1, y1, x2, y2]`.
    pub easing: [f64; 4],
    /// Extra wait after the animation before interaction is restored.
    pub settle_margin_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration_ms: 800,
            easing: CubicBezier::EASE_OUT_QUART.points(),
            settle_margin_ms: 250,
        }
    }
}

impl AnimationConfig {
    pub fn transition(&self) -> Transition {
        let [x1, y1, x2, y2] = self.easing;
        Transition::new(
            Duration::from_millis(self.duration_ms),
            CubicBezier::new(x1, y1, x2, y2),
        )
    }

    #[inline]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    #[inline]
    pub fn settle_margin(&self) -> Duration {
        Duration::from_millis(self.settle_margin_ms)
    }
}

/// Summary (score card) view settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub failure_text: String,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            failure_text: "Failed to load house points.".to_owned(),
        }
    }
}

/// Historical entries view settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EntriesConfig {
    pub query: EntryQuery,
    /// Keep only entries whose house contains this text.
    pub house_filter: Option<String>,
    /// Overrides the per-query default failure text.
    pub failure_text: Option<String>,
}

impl EntriesConfig {
    pub fn failure_text(&self) -> &str {
        match (&self.failure_text, self.query) {
            (Some(text), _) => text,
            (None, EntryQuery::Recent { .. }) => "Failed to load recent points.",
            (None, EntryQuery::All) => "Failed to load entries.",
        }
    }

    pub fn filter(&self) -> Option<HouseFilter> {
        self.house_filter.as_deref().and_then(HouseFilter::new)
    }
}

/// Errors loading or validating a [`BoardConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}

impl BoardConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters.
    ///
    /// Returns a list of problems; empty means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if let Err(e) = Roster::new(&self.roster) {
            errors.push(format!("roster: {e}"));
        }
        if self.sentinel.is_empty() {
            errors.push("sentinel must not be empty".to_owned());
        }

        let [x1, y1, x2, y2] = self.animation.easing;
        if !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
            errors.push(format!(
                "animation.easing x control points must be in [0, 1], got {x1} and {x2}"
            ));
        }
        if !(y1.is_finite() && y2.is_finite()) {
            errors.push("animation.easing y control points must be finite".to_owned());
        }

        if let EntryQuery::Recent { count: 0 } = self.entries.query {
            errors.push("entries.query.count must be > 0".to_owned());
        }

        errors
    }

    /// Validate and build the roster.
    pub fn roster(&self) -> Result<Roster, ConfigError> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors));
        }
        Roster::new(&self.roster).map_err(|e| ConfigError::Validation(vec![e.to_string()]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_stock_board() {
        let config = BoardConfig::default();
        assert!(config.validate().is_empty());
        assert_eq!(config.roster.len(), 4);
        assert_eq!(config.animation.transition(), Transition::default());
        assert_eq!(
            config.animation.duration() + config.animation.settle_margin(),
            Duration::from_millis(1050)
        );
        assert_eq!(config.entries.failure_text(), "Failed to load recent points.");
    }

    #[test]
    fn toml_overrides_merge_with_defaults() {
        let config = BoardConfig::from_toml_str(
            r#"
            roster = ["Red", "Blue"]
            initial_order = { mode = "shuffled", seed = 42 }

            [animation]
            duration_ms = 300

            [entries]
            query = { kind = "all" }
            house_filter = "red"
            "#,
        )
        .unwrap();
        assert_eq!(config.roster, vec!["Red", "Blue"]);
        assert_eq!(config.initial_order, InitialOrder::Shuffled { seed: Some(42) });
        assert_eq!(config.animation.duration_ms, 300);
        assert_eq!(config.animation.settle_margin_ms, 250);
        assert_eq!(config.entries.query, EntryQuery::All);
        assert_eq!(config.entries.failure_text(), "Failed to load entries.");
        assert!(config.entries.filter().is_some());
    }

    #[test]
    fn json_round_trip() {
        let config = BoardConfig {
            initial_order: InitialOrder::Declared,
            ..BoardConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(BoardConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn validation_reports_every_problem() {
        let config = BoardConfig {
            roster: vec!["a".into(), "A".into()],
            sentinel: String::new(),
            animation: AnimationConfig {
                easing: [1.5, 0.0, 0.5, 1.0],
                ..AnimationConfig::default()
            },
            entries: EntriesConfig {
                query: EntryQuery::Recent { count: 0 },
                ..EntriesConfig::default()
            },
            ..BoardConfig::default()
        };
        assert_eq!(config.validate().len(), 4);
        assert!(matches!(config.roster(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn empty_roster_is_invalid() {
        let config = BoardConfig {
            roster: Vec::new(),
            ..BoardConfig::default()
        };
        assert_eq!(config.validate().len(), 1);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "sentinel = \"TBD\"").unwrap();
        let config = BoardConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.sentinel, "TBD");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = BoardConfig::from_json_file("/nonexistent/flipboard.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
