//! Loading and saving G-code files.

use std::io::BufWriter;
use std::path::Path;

use log::info;
use tempfile::Builder;

use crate::command::Command;
use crate::error::{GcodeError, Result};
use crate::parser::{ParseOutput, Parser};
use crate::serializer;
use crate::settings::ParseSettings;

/// Load and parse a G-code file, skipping malformed lines.
///
/// Returns [`GcodeError::FileNotFound`] before any read is attempted if
/// the path does not exist.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<Command>> {
    Ok(load_with(path, &ParseSettings::default())?.commands)
}

/// Load and parse a G-code file with explicit parser settings.
pub fn load_with(path: impl AsRef<Path>, settings: &ParseSettings) -> Result<ParseOutput> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(GcodeError::FileNotFound(path.to_path_buf()));
    }

    let text = std::fs::read_to_string(path)?;
    let output = Parser::new(settings.clone()).parse(&text)?;
    info!(
        "loaded {} commands from {}",
        output.commands.len(),
        path.display()
    );
    Ok(output)
}

/// Save commands as G-code.
///
/// The file is written to a temporary sibling and renamed over `path`
/// only once fully written, so a failed save leaves no partial output.
/// An existing file keeps its permissions; a new one gets the same mode a
/// plain create would (`0o666` less the umask on unix).
pub fn save(commands: &[Command], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::fs::Permissions;
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(Permissions::from_mode(0o666));
    }
    let mut tmp = builder.tempfile_in(dir)?;

    serializer::write(commands, BufWriter::new(tmp.as_file_mut()))?;
    if let Ok(existing) = std::fs::metadata(path) {
        tmp.as_file().set_permissions(existing.permissions())?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    info!("saved {} commands to {}", commands.len(), path.display());
    Ok(())
}
