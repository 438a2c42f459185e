//! Fetch command - cache-or-download an artifact

use crate::cache::{CacheBinding, GetOptions, RequestOptions};
use crate::cli::args::FetchArgs;
use crate::config::Config;
use crate::error::{KitbagError, KitbagResult};
use crate::ui::Reporter;

/// Execute the fetch command. Prints the final on-disk path on success.
pub async fn execute(args: FetchArgs, config: &Config, reporter: &Reporter) -> KitbagResult<()> {
    let binding = CacheBinding::from_config(config, "kitbag", reporter)?;

    let request = parse_headers(&args.headers)?;
    let path = binding
        .store()
        .get(
            &args.url,
            &args.entry,
            GetOptions {
                force: args.force,
                raw: args.raw,
                request,
            },
        )
        .await?;

    println!("{}", path.display());
    Ok(())
}

/// Parse repeated `KEY=VALUE` header flags
fn parse_headers(raw: &[String]) -> KitbagResult<Option<RequestOptions>> {
    if raw.is_empty() {
        return Ok(None);
    }

    let mut options = RequestOptions::default();
    for header in raw {
        let (key, value) = header.split_once('=').ok_or_else(|| {
            KitbagError::User(format!("invalid header {header:?}, expected KEY=VALUE"))
        })?;
        options
            .headers
            .insert(key.trim().to_string(), value.trim().to_string());
    }
    Ok(Some(options))
}
