use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::ConfigError;

/// Seed the process environment from a `.env` file in the working directory
/// or one of its parents. Variables already set are left untouched.
///
/// A missing file is normal; a malformed one is logged and skipped.
pub fn load_dotenv() -> Option<PathBuf> {
    match dotenv::dotenv() {
        Ok(path) => {
            debug!(path = %path.display(), "loaded environment from .env");
            Some(path)
        }
        Err(err) if err.not_found() => {
            debug!("no .env file found");
            None
        }
        Err(err) => {
            warn!(error = %err, "ignoring unreadable .env file");
            None
        }
    }
}

/// Seed the process environment from a specific file.
pub fn load_dotenv_from(path: &Path) -> Result<(), ConfigError> {
    dotenv::from_path(path)
        .map_err(|e| ConfigError::EnvFile(format!("{}: {}", path.display(), e)))?;
    debug!(path = %path.display(), "loaded environment file");
    Ok(())
}
