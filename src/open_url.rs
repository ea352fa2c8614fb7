use anyhow::{Context, Result};
use std::process::Command;

/// Open `url` in the user's browser: configured command first, then the
/// system default, then a firefox fallback.
pub fn open_url(url: &str, open_command: Option<&str>) -> Result<()> {
    if let Some(cmd) = open_command {
        Command::new(cmd)
            .arg(url)
            .spawn()
            .with_context(|| format!("failed to run open command '{}'", cmd))?;
        return Ok(());
    }
    if open::that(url).is_ok() {
        return Ok(());
    }
    let _ = Command::new("firefox").arg(url).spawn();
    Ok(())
}
