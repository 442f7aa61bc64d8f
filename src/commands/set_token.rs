//! Set-token command handler

use std::path::PathBuf;

use anyhow::Result;

use ripcord::token::{default_rc_file, store_token};

/// Store `token` in `rc_file` (default ~/.bashrc).
#[cfg(not(tarpaulin_include))]
pub fn handle(token: &str, rc_file: Option<PathBuf>) -> Result<()> {
    let rc_file = match rc_file {
        Some(path) => path,
        None => default_rc_file()?,
    };

    store_token(&rc_file, token)?;

    println!("Stored DISCORD_TOKEN in {}", rc_file.display());
    println!("Run 'source {}' or open a new shell to use it.", rc_file.display());
    Ok(())
}
