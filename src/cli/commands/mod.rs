//! CLI command implementations

pub mod config;
pub mod fetch;
pub mod purge;
pub mod show;
pub mod stat;

pub use config::execute as config;
pub use fetch::execute as fetch;
pub use purge::execute as purge;
pub use show::execute as show;
pub use stat::execute as stat;
