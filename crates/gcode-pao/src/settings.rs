//! Pass settings and their TOML representation.
//!
//! Every field has a default, so an empty or partial file is valid:
//!
//! ```toml
//! [optimize]
//! feedrate_ceiling = 1200.0
//!
//! [analysis]
//! zero_feedrate = "fail"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GcodeError, Result};

/// Default linear-motion mnemonic.
pub const LINEAR_MOVE: &str = "G1";

/// Default wall feedrate ceiling.
pub const WALL_FEEDRATE_CEILING: f64 = 1000.0;

/// What to do with a line that has no tokens after comment stripping.
///
/// The parser only reaches this case for a line that is non-blank and
/// does not start with `;`, and such a line always keeps at least one
/// token before its first `;`. No input currently triggers it, so `Fail`
/// never fires in practice; the policy guards the parser against a
/// future change to its skip rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedLinePolicy {
    /// Record the line and continue.
    #[default]
    Skip,
    /// Abort the parse with [`GcodeError::MalformedLine`].
    Fail,
}

/// What to do with a motion command whose feedrate is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedratePolicy {
    /// Drop the command's time contribution and count it.
    #[default]
    Skip,
    /// Abort the pass with [`GcodeError::DivisionByZero`].
    Fail,
}

/// Parser settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseSettings {
    /// Malformed-line recovery policy.
    pub malformed: MalformedLinePolicy,
}

/// Analyzer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Mnemonic of the linear-motion command.
    pub linear_move: String,
    /// Zero-feedrate policy.
    pub zero_feedrate: FeedratePolicy,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            linear_move: LINEAR_MOVE.into(),
            zero_feedrate: FeedratePolicy::Skip,
        }
    }
}

/// Speed limit applied to horizontal ("outer wall") moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallSpeedPolicy {
    /// Mnemonic of the linear-motion command.
    pub linear_move: String,
    /// Highest feedrate a wall move may keep.
    pub feedrate_ceiling: f64,
    /// Feedrate assumed when a wall move carries none.
    pub default_feedrate: f64,
}

impl Default for WallSpeedPolicy {
    fn default() -> Self {
        Self {
            linear_move: LINEAR_MOVE.into(),
            feedrate_ceiling: WALL_FEEDRATE_CEILING,
            default_feedrate: WALL_FEEDRATE_CEILING,
        }
    }
}

impl WallSpeedPolicy {
    /// Validate the policy.
    pub fn validate(&self) -> Result<()> {
        if self.linear_move.trim().is_empty() {
            return Err(GcodeError::InvalidSettings(
                "optimize.linear_move must not be empty".into(),
            ));
        }
        if !self.feedrate_ceiling.is_finite() || self.feedrate_ceiling <= 0.0 {
            return Err(GcodeError::InvalidSettings(
                "optimize.feedrate_ceiling must be a positive number".into(),
            ));
        }
        if !self.default_feedrate.is_finite() || self.default_feedrate <= 0.0 {
            return Err(GcodeError::InvalidSettings(
                "optimize.default_feedrate must be a positive number".into(),
            ));
        }
        Ok(())
    }
}

/// All pass settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Parser settings.
    pub parse: ParseSettings,
    /// Analyzer settings.
    pub analysis: AnalysisSettings,
    /// Optimizer policy.
    pub optimize: WallSpeedPolicy,
}

impl Settings {
    /// Decode and validate settings from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(GcodeError::FileNotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if self.analysis.linear_move.trim().is_empty() {
            return Err(GcodeError::InvalidSettings(
                "analysis.linear_move must not be empty".into(),
            ));
        }
        self.optimize.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.optimize.feedrate_ceiling, 1000.0);
        assert_eq!(settings.analysis.linear_move, "G1");
    }

    #[test]
    fn test_partial_toml() {
        let settings = Settings::from_toml_str(
            "[optimize]\nfeedrate_ceiling = 1200.0\n\n[analysis]\nzero_feedrate = \"fail\"\n",
        )
        .unwrap();
        assert_eq!(settings.optimize.feedrate_ceiling, 1200.0);
        assert_eq!(settings.optimize.default_feedrate, 1000.0);
        assert_eq!(settings.analysis.zero_feedrate, FeedratePolicy::Fail);
        assert_eq!(settings.parse.malformed, MalformedLinePolicy::Skip);
    }

    #[test]
    fn test_invalid_ceiling() {
        let err = Settings::from_toml_str("[optimize]\nfeedrate_ceiling = 0.0\n").unwrap_err();
        assert!(matches!(err, GcodeError::InvalidSettings(_)));
    }

    #[test]
    fn test_bad_toml() {
        let err = Settings::from_toml_str("[optimize\n").unwrap_err();
        assert!(matches!(err, GcodeError::Config(_)));
    }
}
