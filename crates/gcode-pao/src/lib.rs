#![warn(missing_docs)]

//! G-code parsing, analysis and optimization for 3D printing.
//!
//! This crate reads G-code toolpaths into a simple command model,
//! estimates print time and filament usage, clamps the feedrate of wall
//! moves, and writes the result back out as G-code.
//!
//! # Example
//!
//! ```no_run
//! use gcode_pao::{analyze, load, optimize, save, WallSpeedPolicy};
//!
//! let commands = load("part.gcode")?;
//!
//! let stats = analyze(&commands);
//! println!("Estimated print time: {:.2}", stats.total_time);
//! println!("Filament used: {:.2} mm", stats.total_filament);
//!
//! let optimized = optimize(commands, &WallSpeedPolicy::default());
//! save(&optimized, "part.optimized.gcode")?;
//! # Ok::<(), gcode_pao::GcodeError>(())
//! ```

pub mod analyzer;
pub mod command;
pub mod error;
pub mod file;
pub mod optimizer;
pub mod parser;
pub mod serializer;
pub mod settings;

pub use analyzer::{analyze, Analysis, Analyzer};
pub use command::{Command, Params, Value};
pub use error::{GcodeError, Result};
pub use file::{load, load_with, save};
pub use optimizer::{optimize, optimize_in_place};
pub use parser::{parse, MalformedLine, ParseOutput, Parser};
pub use serializer::{serialize, write};
pub use settings::{
    AnalysisSettings, FeedratePolicy, MalformedLinePolicy, ParseSettings, Settings,
    WallSpeedPolicy,
};
