//! CLI subcommand implementations.

pub mod add;
pub mod events;
pub mod recent;
pub mod status;
pub mod summary;
pub mod top;
pub mod util;
