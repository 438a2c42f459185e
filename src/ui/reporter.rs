//! Leveled diagnostics reporter

use console::style;
use std::error::Error;

/// Ordered output verbosity for a [`Reporter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Errors only
    Quiet,
    /// Errors, warnings and progress messages
    Standard,
    /// Adds per-step detail
    Verbose,
    /// Everything, including cache hit/miss traces and error cause chains
    Debug,
}

impl Verbosity {
    /// Map a `-q` flag and a `-v` occurrence count to a level
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            Self::Quiet
        } else {
            match verbose {
                0 => Self::Standard,
                1 => Self::Verbose,
                _ => Self::Debug,
            }
        }
    }
}

/// Diagnostics context passed into each component at construction.
///
/// Messages are written to stderr so that command output on stdout stays
/// machine-consumable. Reporting never influences control flow.
#[derive(Debug, Clone)]
pub struct Reporter {
    level: Verbosity,
}

impl Reporter {
    pub fn new(level: Verbosity) -> Self {
        Self { level }
    }

    /// Reporter that only prints errors (useful in tests)
    pub fn quiet() -> Self {
        Self::new(Verbosity::Quiet)
    }

    pub fn level(&self) -> Verbosity {
        self.level
    }

    /// Unrecoverable failure; always printed
    pub fn error(&self, message: impl AsRef<str>) {
        eprintln!("{} {}", style("error:").red().bold(), message.as_ref());
    }

    /// Something suspicious but survivable
    pub fn warn(&self, message: impl AsRef<str>) {
        if self.level >= Verbosity::Standard {
            eprintln!("{} {}", style("warning:").yellow().bold(), message.as_ref());
        }
    }

    /// Normal progress output
    pub fn info(&self, message: impl AsRef<str>) {
        if self.level >= Verbosity::Standard {
            eprintln!("{}", message.as_ref());
        }
    }

    /// Per-step detail, shown with `-v`
    pub fn verbose(&self, message: impl AsRef<str>) {
        if self.level >= Verbosity::Verbose {
            eprintln!("{}", style(message.as_ref()).dim());
        }
    }

    /// Internal traces, shown with `-vv`
    pub fn debug(&self, message: impl AsRef<str>) {
        if self.level >= Verbosity::Debug {
            eprintln!("{} {}", style("debug:").cyan(), message.as_ref());
        }
    }

    /// Dump an error and its source chain at debug level
    pub fn dump_err(&self, err: &dyn Error) {
        if self.level < Verbosity::Debug {
            return;
        }
        eprintln!("{} {}", style("debug:").cyan(), err);
        let mut source = err.source();
        while let Some(cause) = source {
            eprintln!("{}   caused by: {}", style("debug:").cyan(), cause);
            source = cause.source();
        }
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(Verbosity::Standard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(true, 0), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(true, 2), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, 0), Verbosity::Standard);
        assert_eq!(Verbosity::from_flags(false, 1), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(false, 2), Verbosity::Debug);
        assert_eq!(Verbosity::from_flags(false, 7), Verbosity::Debug);
    }

    #[test]
    fn verbosity_is_ordered() {
        assert!(Verbosity::Quiet < Verbosity::Standard);
        assert!(Verbosity::Standard < Verbosity::Verbose);
        assert!(Verbosity::Verbose < Verbosity::Debug);
    }

    #[test]
    fn reporter_level_accessor() {
        assert_eq!(Reporter::quiet().level(), Verbosity::Quiet);
        assert_eq!(Reporter::default().level(), Verbosity::Standard);
    }
}
