//! Wall-speed optimization.
//!
//! Any linear move with an X or Y parameter is treated as an outer-wall
//! move and has its feedrate clamped to the policy ceiling. Z-only moves
//! do not qualify. Sequence length and order never change.

use log::debug;

use crate::command::{Command, Value, F, X, Y};
use crate::settings::WallSpeedPolicy;

const WALL_AXES: [char; 2] = [X, Y];

impl WallSpeedPolicy {
    /// Does this command qualify as a wall move?
    pub fn applies_to(&self, cmd: &Command) -> bool {
        cmd.is(&self.linear_move) && cmd.params().contains_any(&WALL_AXES)
    }

    /// Feedrate a wall move should carry, or `None` if its current value
    /// already satisfies the policy.
    fn clamp(&self, current: Option<&Value>) -> Option<Value> {
        let ceiling = Value::from_number(self.feedrate_ceiling);
        match current {
            None if self.default_feedrate <= self.feedrate_ceiling => {
                Some(Value::from_number(self.default_feedrate))
            }
            None => Some(ceiling),
            Some(value) => match value.as_f64() {
                Some(feed) if feed <= self.feedrate_ceiling => None,
                // Above the ceiling, NaN, or text.
                _ => Some(ceiling),
            },
        }
    }
}

/// Clamp wall-move feedrates in place. Returns the number of commands
/// whose feedrate was written.
pub fn optimize_in_place(commands: &mut [Command], policy: &WallSpeedPolicy) -> usize {
    let mut changed = 0;
    for cmd in commands.iter_mut() {
        if !policy.applies_to(cmd) {
            continue;
        }
        if let Some(feed) = policy.clamp(cmd.params().get(F)) {
            cmd.params_mut().insert(F, feed);
            changed += 1;
        }
    }
    debug!(
        "clamped {changed} of {} commands to F{}",
        commands.len(),
        policy.feedrate_ceiling
    );
    changed
}

/// Clamp wall-move feedrates, consuming and returning the sequence.
pub fn optimize(mut commands: Vec<Command>, policy: &WallSpeedPolicy) -> Vec<Command> {
    optimize_in_place(&mut commands, policy);
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn optimize_one(line: &str) -> Command {
        let mut out = optimize(parse(line), &WallSpeedPolicy::default());
        out.remove(0)
    }

    #[test]
    fn test_fast_wall_clamped() {
        let cmd = optimize_one("G1 X10 F2000");
        assert_eq!(cmd.params().get(F), Some(&Value::Integer(1000)));
    }

    #[test]
    fn test_z_only_untouched() {
        let cmd = optimize_one("G1 Z5 F2000");
        assert_eq!(cmd.params().get(F), Some(&Value::Integer(2000)));
    }

    #[test]
    fn test_slow_wall_kept_with_type() {
        let cmd = optimize_one("G1 Y3 F800.5");
        assert_eq!(cmd.params().get(F), Some(&Value::Float(800.5)));
    }

    #[test]
    fn test_missing_feedrate_appended() {
        let cmd = optimize_one("G1 X1 Y2 E0.1");
        let keys: Vec<char> = cmd.params().iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!['X', 'Y', 'E', 'F']);
        assert_eq!(cmd.params().get(F), Some(&Value::Integer(1000)));
    }

    #[test]
    fn test_feedrate_position_kept() {
        let cmd = optimize_one("G1 F3000 X1 E2");
        let keys: Vec<char> = cmd.params().iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!['F', 'X', 'E']);
    }

    #[test]
    fn test_text_feedrate_replaced() {
        let cmd = optimize_one("G1 X1 Ffast");
        assert_eq!(cmd.params().get(F), Some(&Value::Integer(1000)));
    }

    #[test]
    fn test_non_motion_untouched() {
        let commands = parse("G0 X10 F9000\nM203 X5000 F9000\n");
        let out = optimize(commands.clone(), &WallSpeedPolicy::default());
        assert_eq!(out, commands);
    }

    #[test]
    fn test_custom_ceiling() {
        let policy = WallSpeedPolicy {
            feedrate_ceiling: 1500.0,
            default_feedrate: 1200.0,
            ..Default::default()
        };
        let out = optimize(parse("G1 X1 F2400\nG1 X2\nG1 X3 F600\n"), &policy);
        assert_eq!(out[0].params().get(F), Some(&Value::Integer(1500)));
        assert_eq!(out[1].params().get(F), Some(&Value::Integer(1200)));
        assert_eq!(out[2].params().get(F), Some(&Value::Integer(600)));
    }

    #[test]
    fn test_fractional_ceiling() {
        let policy = WallSpeedPolicy {
            feedrate_ceiling: 750.5,
            ..Default::default()
        };
        let out = optimize(parse("G1 X1 F2000\nG1 Y1\n"), &policy);
        assert_eq!(out[0].params().get(F), Some(&Value::Float(750.5)));
        assert_eq!(out[1].params().get(F), Some(&Value::Float(750.5)));
    }

    #[test]
    fn test_length_order_and_ceiling() {
        let commands = parse(
            "G28\nG1 Z0.2 F9000\nG1 X10 Y10 F6000 E1\nM106 S255\nG1 X20 F100\nG1 Y5\n",
        );
        let before = commands.clone();
        let mut out = commands;
        let changed = optimize_in_place(&mut out, &WallSpeedPolicy::default());

        assert_eq!(changed, 2);
        assert_eq!(out.len(), before.len());
        for (a, b) in out.iter().zip(&before) {
            assert_eq!(a.mnemonic(), b.mnemonic());
        }
        for cmd in out.iter().filter(|c| WallSpeedPolicy::default().applies_to(c)) {
            assert!(cmd.number(F).unwrap() <= 1000.0);
        }
        assert_eq!(out[1], before[1]);
        assert_eq!(out[3], before[3]);
        assert_eq!(out[4], before[4]);
    }
}
