//! Command sequence to G-code text.
//!
//! Each command becomes `MNEMONIC KEYvalue KEYvalue...` followed by a
//! newline. Only the parsed structure survives: comments, blank lines and
//! the original spacing are not reproduced. A command with no parameters
//! is still followed by the separator space (`"G28 \n"`).

use std::fmt::Write as _;
use std::io::Write;

use crate::command::Command;
use crate::error::Result;

fn push_command(out: &mut String, cmd: &Command) {
    out.push_str(cmd.mnemonic());
    out.push(' ');
    for (i, (key, value)) in cmd.params().iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        // Writing into a String cannot fail.
        let _ = write!(out, "{key}{value}");
    }
    out.push('\n');
}

/// Format one command as a G-code line, including the trailing newline.
pub fn format_command(cmd: &Command) -> String {
    let mut line = String::new();
    push_command(&mut line, cmd);
    line
}

/// Serialize commands to G-code text.
pub fn serialize(commands: &[Command]) -> String {
    let mut out = String::with_capacity(commands.len() * 24);
    for cmd in commands {
        push_command(&mut out, cmd);
    }
    out
}

/// Write commands as G-code to `dest`.
pub fn write<W: Write>(commands: &[Command], mut dest: W) -> Result<()> {
    let mut line = String::new();
    for cmd in commands {
        line.clear();
        push_command(&mut line, cmd);
        dest.write_all(line.as_bytes())?;
    }
    dest.flush()?;
    Ok(())
}
