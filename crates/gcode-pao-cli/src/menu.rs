//! Interactive menu loop.

use std::path::PathBuf;

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::session::{Session, NOT_OPTIMIZED};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    Load,
    Analyze,
    Optimize,
    Save,
    Exit,
}

impl MenuChoice {
    fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::Load),
            "2" => Some(Self::Analyze),
            "3" => Some(Self::Optimize),
            "4" => Some(Self::Save),
            "5" => Some(Self::Exit),
            _ => None,
        }
    }
}

fn print_menu() {
    println!();
    println!("=== G-code Parser, Analyzer, and Optimizer ===");
    println!("1. Load G-code file");
    println!("2. Analyze G-code");
    println!("3. Optimize G-code");
    println!("4. Save optimized G-code");
    println!("5. Exit");
}

/// Read one line. `None` on Ctrl-C / Ctrl-D.
fn prompt(rl: &mut DefaultEditor, text: &str) -> Result<Option<String>> {
    match rl.readline(text) {
        Ok(line) => {
            if !line.trim().is_empty() {
                rl.add_history_entry(line.as_str())?;
            }
            Ok(Some(line.trim().to_owned()))
        }
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn report(result: Result<String>) {
    match result {
        Ok(msg) => println!("{msg}"),
        Err(e) => println!("Error: {e:#}"),
    }
}

/// Run the menu until the user exits.
pub fn run(session: &mut Session) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    loop {
        print_menu();
        let Some(choice) = prompt(&mut rl, "Enter your choice: ")? else {
            break;
        };

        match MenuChoice::parse(&choice) {
            Some(MenuChoice::Load) => {
                let Some(path) = prompt(&mut rl, "Enter the path to the G-code file: ")? else {
                    break;
                };
                report(session.load(&PathBuf::from(path)));
            }
            Some(MenuChoice::Analyze) => {
                if session.has_loaded() {
                    println!();
                }
                report(session.analyze());
            }
            Some(MenuChoice::Optimize) => println!("{}", session.optimize()),
            Some(MenuChoice::Save) => {
                if !session.has_optimized() {
                    println!("{NOT_OPTIMIZED}");
                    continue;
                }
                let Some(path) =
                    prompt(&mut rl, "Enter the path to save the optimized G-code: ")?
                else {
                    break;
                };
                report(session.save(&PathBuf::from(path)));
            }
            Some(MenuChoice::Exit) => break,
            None => println!("Invalid choice. Please try again."),
        }
    }

    println!("Exiting the program. Goodbye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_choice() {
        assert_eq!(MenuChoice::parse("1"), Some(MenuChoice::Load));
        assert_eq!(MenuChoice::parse(" 4 "), Some(MenuChoice::Save));
        assert_eq!(MenuChoice::parse("5"), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::parse("6"), None);
        assert_eq!(MenuChoice::parse("load"), None);
    }
}
