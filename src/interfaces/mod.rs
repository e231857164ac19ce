//! Inbound interfaces: batch request reading for the CLI.

pub mod json;
