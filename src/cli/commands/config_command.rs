//! Config command feature.
//!
//! This module owns and handles the "billtime config" command behavior.

use crate::config::Config;
use crate::theme::Theme;

pub(crate) fn handle_config(show: bool, reset: bool, path: bool) -> anyhow::Result<()> {
    if reset {
        Config::reset()?;
        println!("{} Configuration reset to defaults", Theme::success("Done."));
        return Ok(());
    }

    if path {
        println!("{}", Config::config_path()?.display());
        return Ok(());
    }

    let config = Config::load_or_create();
    println!("{}", Theme::muted(&format!("# {}", Config::config_path()?.display())));
    print!("{}", config.to_toml()?);

    if !show {
        println!();
        println!(
            "Edit the file above, or run {} to restore defaults.",
            Theme::command("billtime config --reset")
        );
    }
    Ok(())
}
