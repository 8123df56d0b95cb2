//! CLI subcommand implementations for the gleaner binary.

pub mod doctor;
pub mod output;
pub mod scrape_cmd;
