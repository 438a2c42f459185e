//! UI module for consistent CLI diagnostics
//!
//! All diagnostic output goes through a [`Reporter`], an explicit context
//! object constructed once in `main` and handed to each component at
//! construction time. There is no process-global log-level state; verbosity
//! travels with the reporter.
//!
//! # Example
//!
//! ```rust,ignore
//! use kitbag::ui::{Reporter, Verbosity};
//!
//! let reporter = Reporter::new(Verbosity::Verbose);
//! reporter.info("fetching pkg");
//! reporter.debug("cache hit at /home/u/.cache/tool/cache/pkg");
//! ```

mod reporter;

pub use reporter::{Reporter, Verbosity};
