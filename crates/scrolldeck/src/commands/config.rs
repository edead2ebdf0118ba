use anyhow::Result;
use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::{Config, DEFAULT_ENDPOINT};

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => set(&key, &value),
        ConfigCommands::Path => {
            println!("{}", Config::path()?.display());
            Ok(())
        }
    }
}

fn show() -> Result<()> {
    let path = Config::path()?;
    let config = if path.exists() {
        Config::load_from(&path)?
    } else {
        println!(
            "{}",
            format!("No config file at {} (showing defaults)", path.display()).dimmed()
        );
        Config::default()
    };

    let timings = config.timings();
    let endpoint = config.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT);

    println!("{}", "Source".bold());
    println!("  endpoint              {endpoint}");
    println!("{}", "Defaults".bold());
    println!("  defaults.theme        {}", config.theme_name());
    println!(
        "  defaults.start_slide  {}",
        config
            .start_slide()
            .map_or_else(|| "1".to_string(), |n| n.to_string())
    );
    println!("{}", "Timing".bold());
    println!("  timing.settle_ms      {}", timings.settle_ms);
    println!("  timing.debounce_ms    {}", timings.debounce_ms);
    Ok(())
}

fn set(key: &str, value: &str) -> Result<()> {
    let path = Config::path()?;
    let mut config = if path.exists() {
        Config::load_from(&path)?
    } else {
        Config::default()
    };
    config.set(key, value)?;
    let saved = config.save()?;
    println!(
        "{} {key} = {value} ({})",
        "Saved".green().bold(),
        saved.display()
    );
    Ok(())
}
