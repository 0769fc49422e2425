//! Configuration display and toggling.

use crate::config;

/// Print the effective configuration, saving it first if a toggle was given
pub fn cmd_config(enable_artwork: bool, disable_artwork: bool) -> anyhow::Result<()> {
    let mut config = config::load();

    if enable_artwork || disable_artwork {
        config.artwork.enabled = enable_artwork;
        let path = config::save(&config)?;
        let state = if enable_artwork {
            "enabled"
        } else {
            "disabled"
        };
        println!("Artwork {} (saved to {})", state, path.display());
        println!();
    }

    match config::config_path() {
        Some(path) => println!("# {}", path.display()),
        None => println!("# (no config directory)"),
    }

    // Never echo the key itself
    if config.lastfm.api_key.is_some() {
        config.lastfm.api_key = Some("********".to_string());
    }
    print!("{}", toml::to_string_pretty(&config)?);

    Ok(())
}
