//! State held between menu actions.

use std::path::Path;

use anyhow::Result;
use gcode_pao::{
    load_with, optimize_in_place, save, Analysis, Analyzer, Command, GcodeError, Settings,
};

pub const NOT_LOADED: &str = "No G-code file loaded. Please load a file first.";
pub const NOT_OPTIMIZED: &str = "No optimized G-code available. Please optimize first.";
pub const FILE_NOT_FOUND: &str = "File not found. Please try again.";

/// The currently loaded and currently optimized command sequences.
pub struct Session {
    settings: Settings,
    loaded: Option<Vec<Command>>,
    optimized: Option<Vec<Command>>,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            loaded: None,
            optimized: None,
        }
    }

    pub fn has_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn has_optimized(&self) -> bool {
        self.optimized.is_some()
    }

    /// Load a file, replacing any previously loaded sequence.
    pub fn load(&mut self, path: &Path) -> Result<String> {
        let output = match load_with(path, &self.settings.parse) {
            Ok(output) => output,
            Err(GcodeError::FileNotFound(_)) => return Ok(FILE_NOT_FOUND.into()),
            Err(e) => return Err(e.into()),
        };

        let mut msg = format!(
            "G-code file loaded successfully with {} commands.",
            output.commands.len()
        );
        if !output.malformed.is_empty() {
            msg.push_str(&format!(" ({} malformed lines skipped)", output.malformed.len()));
        }
        self.loaded = Some(output.commands);
        self.optimized = None;
        Ok(msg)
    }

    /// Analyze the loaded sequence.
    pub fn analyze(&self) -> Result<String> {
        let Some(commands) = &self.loaded else {
            return Ok(NOT_LOADED.into());
        };
        let analysis = Analyzer::new(self.settings.analysis.clone()).run(commands)?;
        Ok(format_analysis(&analysis))
    }

    /// Optimize a copy of the loaded sequence.
    pub fn optimize(&mut self) -> String {
        let Some(commands) = &self.loaded else {
            return NOT_LOADED.into();
        };
        let mut optimized = commands.clone();
        let clamped = optimize_in_place(&mut optimized, &self.settings.optimize);
        self.optimized = Some(optimized);
        format!("G-code optimized successfully ({clamped} feedrates limited).")
    }

    /// Save the optimized sequence.
    pub fn save(&self, path: &Path) -> Result<String> {
        let Some(commands) = &self.optimized else {
            return Ok(NOT_OPTIMIZED.into());
        };
        save(commands, path)?;
        Ok(format!("Optimized G-code saved to {}.", path.display()))
    }
}

pub fn format_analysis(analysis: &Analysis) -> String {
    let mut out = format!(
        "Analysis Results:\n\
         Estimated Print Time: {:.2} seconds\n\
         Estimated Filament Used: {:.2} mm",
        analysis.total_time, analysis.total_filament
    );
    if analysis.skipped_moves > 0 {
        out.push_str(&format!(
            "\nMoves skipped for timing: {}",
            analysis.skipped_moves
        ));
    }
    if analysis.skipped_extrusions > 0 {
        out.push_str(&format!(
            "\nExtrusions skipped: {}",
            analysis.skipped_extrusions
        ));
    }
    out
}
