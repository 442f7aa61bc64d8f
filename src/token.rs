//! Credential resolution and storage in a shell rc file.
//!
//! The token is stored as an `export DISCORD_TOKEN="..."` line inside a
//! marker-delimited block, so re-running `set-token` replaces it in place.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Start of the managed block in the rc file
pub const MARKER_START: &str = "# >>> ripcord token >>>";
/// End of the managed block in the rc file
pub const MARKER_END: &str = "# <<< ripcord token <<<";

/// Environment variables consulted after the command-line flag, in order.
pub const TOKEN_ENV_VARS: [&str; 2] = ["DISCORD_TOKEN", "DISCORD_AUTH_TOKEN"];

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token cannot be empty")]
    Empty,

    #[error("token contains characters that cannot be stored in a shell file")]
    UnsafeCharacters,

    #[error("could not determine home directory")]
    NoHome,

    #[error("failed to update {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Pick the first non-blank token from the flag, then the environment.
///
/// `env` is the variable lookup, usually `|name| std::env::var(name).ok()`.
pub fn resolve_token<F>(flag: Option<&str>, env: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(token) = flag.map(str::trim).filter(|t| !t.is_empty()) {
        return Some(token.to_string());
    }
    TOKEN_ENV_VARS
        .iter()
        .filter_map(|name| env(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

/// Default rc file (~/.bashrc)
pub fn default_rc_file() -> Result<PathBuf, TokenError> {
    dirs::home_dir()
        .map(|home| home.join(".bashrc"))
        .ok_or(TokenError::NoHome)
}

fn validate(token: &str) -> Result<&str, TokenError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(TokenError::Empty);
    }
    if token
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '"' | '\\' | '$' | '`'))
    {
        return Err(TokenError::UnsafeCharacters);
    }
    Ok(token)
}

fn block(token: &str) -> String {
    format!("{MARKER_START}\nexport DISCORD_TOKEN=\"{token}\"\n{MARKER_END}\n")
}

/// Return `content` with the managed block set to `token`.
///
/// An existing block is replaced where it stands; otherwise the block is
/// appended. Lines outside the block are preserved.
pub fn upsert_token_block(content: &str, token: &str) -> Result<String, TokenError> {
    let token = validate(token)?;
    let mut out = String::with_capacity(content.len() + 64);
    let mut in_block = false;
    let mut replaced = false;

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed == MARKER_START {
            if !replaced {
                out.push_str(&block(token));
                replaced = true;
            }
            in_block = true;
            continue;
        }
        if trimmed == MARKER_END {
            in_block = false;
            continue;
        }
        if !in_block {
            out.push_str(line);
            out.push('\n');
        }
    }

    if !replaced {
        out.push_str(&block(token));
    }
    Ok(out)
}

/// Write `token` into the managed block of `rc_file`, creating the file if needed.
pub fn store_token(rc_file: &Path, token: &str) -> Result<(), TokenError> {
    let io_err = |source| TokenError::Io {
        path: rc_file.to_path_buf(),
        source,
    };

    let content = match fs::read_to_string(rc_file) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(io_err(e)),
    };

    let updated = upsert_token_block(&content, token)?;
    fs::write(rc_file, updated).map_err(io_err)
}
