//! Purge command - delete cache entries

use crate::cache::CacheBinding;
use crate::cli::args::PurgeArgs;
use crate::config::Config;
use crate::error::KitbagResult;
use crate::ui::Reporter;

/// Execute the purge command. Deleting an absent entry succeeds quietly.
pub async fn execute(args: PurgeArgs, config: &Config, reporter: &Reporter) -> KitbagResult<()> {
    let binding = CacheBinding::from_config(config, "kitbag", reporter)?;

    binding.store().purge(&args.path).await?;
    reporter.info(format!("purged {}", args.path));
    Ok(())
}
