//! Access-token lookup.
//!
//! An explicitly supplied token wins. Otherwise the token persisted in the
//! configured token file is used. A session with neither proceeds
//! anonymously.

use std::io;
use std::path::Path;

use tracing::{debug, warn};

/// Pick the token for a session.
pub fn resolve_token(explicit: Option<String>, token_file: Option<&Path>) -> Option<String> {
    if let Some(token) = explicit.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) {
        return Some(token);
    }

    let path = token_file?;
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let token = contents.trim();
            if token.is_empty() {
                debug!(path = %path.display(), "token file is empty");
                None
            } else {
                Some(token.to_string())
            }
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read token file");
            None
        }
    }
}

/// Persist `token` to `path`, creating parent directories as needed.
pub fn save_token(path: &Path, token: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, format!("{}\n", token.trim()))
}
