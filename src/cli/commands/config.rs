//! Config command - show or locate configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager};
use crate::error::KitbagResult;

/// Execute the config command
pub async fn execute(
    args: ConfigArgs,
    manager: &ConfigManager,
    config: &Config,
) -> KitbagResult<()> {
    match args.action {
        ConfigAction::Show => {
            // Resolved view: file plus environment and flag layers
            print!("{}", toml::to_string_pretty(config)?);
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", manager.path().display());
            Ok(())
        }
    }
}
