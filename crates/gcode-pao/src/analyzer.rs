//! Print-time and filament estimation.
//!
//! Only linear-motion commands contribute. Moves are treated as
//! constant-velocity line segments: no acceleration or jerk.
//!
//! The distance of a move is the magnitude of the axis values present on
//! its own line, with absent axes counted as zero. This is not the true
//! displacement from the previous position; it is a known approximation
//! and is kept as is.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::command::{Command, AXES, E, F};
use crate::error::{GcodeError, Result};
use crate::settings::{AnalysisSettings, FeedratePolicy};

/// Aggregate metrics for a command sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Sum of distance / feedrate over timed moves.
    pub total_time: f64,
    /// Sum of absolute extruder values.
    pub total_filament: f64,
    /// Linear-motion commands seen.
    pub moves: usize,
    /// Moves whose time contribution was dropped (zero, negative or
    /// non-numeric feedrate, or a non-numeric axis value).
    pub skipped_moves: usize,
    /// Moves whose extruder value was not numeric.
    pub skipped_extrusions: usize,
}

enum MoveTime {
    /// No feedrate or no axis on the line.
    Untimed,
    Time(f64),
    ZeroFeed,
    Unusable(&'static str),
}

fn move_time(cmd: &Command) -> MoveTime {
    let params = cmd.params();
    let Some(feed) = params.get(F) else {
        return MoveTime::Untimed;
    };
    if !params.contains_any(&AXES) {
        return MoveTime::Untimed;
    }
    let Some(feed) = feed.as_f64() else {
        return MoveTime::Unusable("non-numeric feedrate");
    };

    let mut sum_sq = 0.0;
    for axis in AXES {
        if let Some(value) = params.get(axis) {
            match value.as_f64() {
                Some(d) => sum_sq += d * d,
                None => return MoveTime::Unusable("non-numeric axis value"),
            }
        }
    }

    if feed == 0.0 {
        return MoveTime::ZeroFeed;
    }
    if feed < 0.0 || !feed.is_finite() {
        return MoveTime::Unusable("feedrate is not a positive number");
    }

    let time = sum_sq.sqrt() / feed;
    if time.is_finite() {
        MoveTime::Time(time)
    } else {
        MoveTime::Unusable("move time is not finite")
    }
}

/// Single pass over the commands. Returns the metrics and the index of
/// the first zero-feedrate move, if any.
fn tally(commands: &[Command], linear_move: &str) -> (Analysis, Option<usize>) {
    let mut analysis = Analysis::default();
    let mut first_zero_feed = None;

    for (index, cmd) in commands.iter().enumerate() {
        if !cmd.is(linear_move) {
            continue;
        }
        analysis.moves += 1;

        match move_time(cmd) {
            MoveTime::Untimed => {}
            MoveTime::Time(t) => analysis.total_time += t,
            MoveTime::ZeroFeed => {
                warn!("command #{index}: zero feedrate, move time skipped");
                if first_zero_feed.is_none() {
                    first_zero_feed = Some(index);
                }
                analysis.skipped_moves += 1;
            }
            MoveTime::Unusable(reason) => {
                warn!("command #{index}: {reason}, move time skipped");
                analysis.skipped_moves += 1;
            }
        }

        if let Some(value) = cmd.params().get(E) {
            match value.as_f64().filter(|e| e.is_finite()) {
                Some(e) => analysis.total_filament += e.abs(),
                None => {
                    warn!("command #{index}: non-numeric extruder value {value:?} skipped");
                    analysis.skipped_extrusions += 1;
                }
            }
        }
    }

    debug!(
        "analyzed {} moves: time={:.4}, filament={:.4}, skipped={}",
        analysis.moves, analysis.total_time, analysis.total_filament, analysis.skipped_moves
    );
    (analysis, first_zero_feed)
}

/// Analyze commands with default settings.
///
/// Zero-feedrate moves are skipped and counted in
/// [`Analysis::skipped_moves`].
pub fn analyze(commands: &[Command]) -> Analysis {
    tally(commands, &AnalysisSettings::default().linear_move).0
}

/// Configurable analyzer.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    settings: AnalysisSettings,
}

impl Analyzer {
    /// Create an analyzer with the given settings.
    pub fn new(settings: AnalysisSettings) -> Self {
        Self { settings }
    }

    /// Analyze commands. Fails under [`FeedratePolicy::Fail`] if any timed
    /// move has a zero feedrate.
    pub fn run(&self, commands: &[Command]) -> Result<Analysis> {
        let (analysis, first_zero_feed) = tally(commands, &self.settings.linear_move);
        match (self.settings.zero_feedrate, first_zero_feed) {
            (FeedratePolicy::Fail, Some(index)) => Err(GcodeError::DivisionByZero { index }),
            _ => Ok(analysis),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty() {
        let analysis = analyze(&[]);
        assert_eq!(analysis.total_time, 0.0);
        assert_eq!(analysis.total_filament, 0.0);
        assert_eq!(analysis.moves, 0);
    }

    #[test]
    fn test_single_move() {
        let analysis = analyze(&parse("G1 X10 Y20 F1500"));
        assert_relative_eq!(analysis.total_time, 500f64.sqrt() / 1500.0);
        assert_relative_eq!(analysis.total_time, 0.01491, epsilon = 1e-5);
        assert_eq!(analysis.total_filament, 0.0);
    }

    #[test]
    fn test_extrusion_only() {
        let analysis = analyze(&parse("G1 E5.5"));
        assert_eq!(analysis.total_time, 0.0);
        assert_relative_eq!(analysis.total_filament, 5.5);
    }

    #[test]
    fn test_retraction_counts_absolute() {
        let analysis = analyze(&parse("G1 E-2 F2700\nG1 X3 Y4 E1.5 F60\n"));
        assert_relative_eq!(analysis.total_filament, 3.5);
        assert_relative_eq!(analysis.total_time, 5.0 / 60.0);
    }

    #[test]
    fn test_other_mnemonics_ignored() {
        let analysis = analyze(&parse("G0 X100 F100\nG92 E50\nM104 S200\n"));
        assert_eq!(analysis.total_time, 0.0);
        assert_eq!(analysis.total_filament, 0.0);
        assert_eq!(analysis.moves, 0);
    }

    #[test]
    fn test_move_without_feedrate_is_untimed() {
        let analysis = analyze(&parse("G1 X10 Y10\n"));
        assert_eq!(analysis.total_time, 0.0);
        assert_eq!(analysis.moves, 1);
        assert_eq!(analysis.skipped_moves, 0);
    }

    #[test]
    fn test_feedrate_without_axis_is_untimed() {
        let analysis = analyze(&parse("G1 F0\nG1 E1 F1200\n"));
        assert_eq!(analysis.total_time, 0.0);
        assert_eq!(analysis.skipped_moves, 0);
        assert_relative_eq!(analysis.total_filament, 1.0);
    }

    #[test]
    fn test_zero_feedrate_skipped() {
        let analysis = analyze(&parse("G1 X10 F0 E1\nG1 X3 Y4 F1\n"));
        assert_relative_eq!(analysis.total_time, 5.0);
        assert_eq!(analysis.skipped_moves, 1);
        assert_relative_eq!(analysis.total_filament, 1.0);
        assert!(analysis.total_time.is_finite());
    }

    #[test]
    fn test_zero_feedrate_fail_policy() {
        let analyzer = Analyzer::new(AnalysisSettings {
            zero_feedrate: FeedratePolicy::Fail,
            ..Default::default()
        });
        let commands = parse("G1 X1 F10\nM400\nG1 X10 F0.0\n");
        let err = analyzer.run(&commands).unwrap_err();
        assert!(matches!(err, GcodeError::DivisionByZero { index: 2 }));
    }

    #[test]
    fn test_negative_and_text_feedrate_skipped() {
        let analysis = analyze(&parse("G1 X10 F-5\nG1 X10 Fabc\nG1 Xfoo F10\n"));
        assert_eq!(analysis.total_time, 0.0);
        assert_eq!(analysis.skipped_moves, 3);
    }

    #[test]
    fn test_text_extrusion_skipped() {
        let analysis = analyze(&parse("G1 E? X1 F1\n"));
        assert_eq!(analysis.total_filament, 0.0);
        assert_eq!(analysis.skipped_extrusions, 1);
        assert_relative_eq!(analysis.total_time, 1.0);
    }

    #[test]
    fn test_custom_linear_move() {
        let analyzer = Analyzer::new(AnalysisSettings {
            linear_move: "G01".into(),
            ..Default::default()
        });
        let analysis = analyzer.run(&parse("G01 X6 Y8 F2\nG1 X100 F1\n")).unwrap();
        assert_relative_eq!(analysis.total_time, 5.0);
        assert_eq!(analysis.moves, 1);
    }

    #[test]
    fn test_totals_non_decreasing() {
        let commands = parse("G1 X1 F10 E1\nG1 X-5 Y-5 F20 E-1\nG1 Z0.2 F5\nG1 X0 F0\n");
        let mut last = Analysis::default();
        for n in 1..=commands.len() {
            let a = analyze(&commands[..n]);
            assert!(a.total_time >= last.total_time);
            assert!(a.total_filament >= last.total_filament);
            last = a;
        }
    }
}
