//! goscribe - Extract Go package documentation as JSON
//!
//! Parses the Go source files of one package directory, groups
//! declarations by type the way `go doc` does, mines doc comments for
//! `@annotations` and note keywords, and serializes the result as JSON.

pub mod cli;
pub mod config;
pub mod doc;
pub mod error;
pub mod output;
pub mod parser;

// Re-export main types
pub use config::Config;
pub use doc::{assemble, CommentMiner, Extractor, Node, NodeKind, Package, TypeNode};
pub use error::{Error, Result};
pub use output::{to_json, write_json};
pub use parser::{GoSourceParser, SourceParser, SourcePackage};
