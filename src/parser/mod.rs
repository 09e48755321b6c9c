// Parser module for reading declarations out of Go package directories

pub mod ast;
mod comments;
mod go;
mod group;
mod package;

pub use ast::*;
pub use go::GoParser;
pub use package::GoSourceParser;

use crate::error::Result;
use std::path::Path;

/// Produces the declaration groups of one source package.
///
/// Implementations report a missing directory, a directory without source
/// files, or a directory mixing packages as errors; the documentation engine
/// passes those through unchanged.
pub trait SourceParser {
    fn load(&self, dir: &Path) -> Result<SourcePackage>;
}
