//! The host binary's support library: argument parsing, the XML and
//! plain-text loaders, the interactive REPL, and exit-code plumbing around
//! the `ippvm` engine crate.

pub mod commands;
pub mod common;
pub mod report;
pub mod repl;
pub mod text_loader;
pub mod xml_loader;
