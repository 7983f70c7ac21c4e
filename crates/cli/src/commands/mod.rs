//! CLI subcommand implementations.

pub mod geocode;
pub mod migrate;
