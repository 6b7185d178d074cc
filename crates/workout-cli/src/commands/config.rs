use clap::Subcommand;
use serde_json::Map;
use workout_core::Config;

use super::{print_json, CliResult, Context};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Dot-separated key (e.g. "calendar.week_start")
        key: String,
    },
    /// Set a config value and save it
    Set {
        /// Dot-separated key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
}

pub fn run(ctx: &Context, action: ConfigAction) -> CliResult {
    match action {
        ConfigAction::Get { key } => {
            let config = ctx.config()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = ctx.config()?;
            config.set(&key, &value)?;
            config.save_to(&ctx.data_dir)?;
            println!("ok");
        }
        ConfigAction::List => {
            let config = ctx.config()?;
            let mut flat = Map::new();
            for key in config.keys() {
                if let Some(value) = config.get(&key) {
                    flat.insert(key, value.into());
                }
            }
            print_json(&flat)?;
        }
        ConfigAction::Reset => {
            Config::default().save_to(&ctx.data_dir)?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
