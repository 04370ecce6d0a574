//! Saved games: a single FEN line in a text file. Move history is not part of
//! the format.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::chess::position::Position;
use crate::error::GameError;

/// Writes the position to `path`, replacing the previous save.
///
/// # Errors
///
/// [`GameError::Persistence`] if the file can not be written.
pub fn save(path: &Path, position: &Position) -> Result<(), GameError> {
    fs::write(path, format!("{position}\n")).map_err(|source| GameError::Persistence {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), fen = %position, "game saved");
    Ok(())
}

/// Reads the position saved in `path`. Only the first line is considered.
///
/// # Errors
///
/// [`GameError::Persistence`] if the file can not be read and
/// [`GameError::InvalidSave`] if it does not start with a valid position.
pub fn load(path: &Path) -> Result<Position, GameError> {
    let contents = fs::read_to_string(path).map_err(|source| GameError::Persistence {
        path: path.to_path_buf(),
        source,
    })?;
    let line = contents.lines().next().unwrap_or_default();
    let position = Position::try_from(line).map_err(|e| GameError::InvalidSave {
        path: path.to_path_buf(),
        reason: format!("{e:#}"),
    })?;
    info!(path = %path.display(), fen = %position, "game loaded");
    Ok(position)
}
