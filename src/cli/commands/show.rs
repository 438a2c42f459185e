//! Show command - print a cached text entry

use crate::cache::CacheBinding;
use crate::cli::args::ShowArgs;
use crate::config::Config;
use crate::error::{KitbagError, KitbagResult};
use crate::ui::Reporter;
use std::io::{self, Write};

/// Execute the show command
pub async fn execute(args: ShowArgs, config: &Config, reporter: &Reporter) -> KitbagResult<()> {
    let binding = CacheBinding::from_config(config, "kitbag", reporter)?;

    let Some(text) = binding.store().read(&args.path).await else {
        return Err(KitbagError::User(format!(
            "no readable cache entry at {:?} (run with -vv for details)",
            args.path
        )));
    };

    // Entries need not end with a newline; write verbatim
    io::stdout()
        .write_all(text.as_bytes())
        .map_err(|e| KitbagError::io("writing to stdout", e))?;
    Ok(())
}
