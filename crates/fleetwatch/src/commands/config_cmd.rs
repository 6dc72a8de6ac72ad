//! `fleetwatch config` -- config file inspection and initialization.

use fleetwatch_config::{Config, Vendor};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            println!("{}", fleetwatch_config::config_path().display());
            Ok(())
        }

        ConfigCommand::Show => {
            let mut config = crate::setup::effective_config(global)?;
            if config.password.is_some() {
                config.password = Some("<redacted>".to_owned());
            }
            let rendered = toml::to_string_pretty(&config).map_err(|err| CliError::Config {
                message: err.to_string(),
            })?;
            print!("{rendered}");
            Ok(())
        }

        ConfigCommand::Init => {
            let path = fleetwatch_config::config_path();
            if path.exists() {
                return Err(CliError::Config {
                    message: format!("config file already exists at {}", path.display()),
                });
            }
            let starter = Config {
                vendor: Vendor::Tracking,
                username: Some("you@example.com".to_owned()),
                password: None,
                ..Config::default()
            };
            fleetwatch_config::save_config(&starter)?;
            if !global.quiet {
                println!("Wrote starter config to {}", path.display());
                println!("Set the password via FLEETWATCH_PASSWORD or edit the file.");
            }
            Ok(())
        }
    }
}
