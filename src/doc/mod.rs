// Documentation engine: comment mining, normalization and package assembly

mod assemble;
mod miner;
mod model;
mod normalize;

pub use assemble::assemble;
pub use miner::CommentMiner;
pub use model::{FuncInfo, Node, NodeKind, Note, Package, TypeNode};
pub use normalize::{normalize_all, normalize_decl, normalize_type};

use crate::config::Config;
use crate::error::Result;
use crate::parser::{GoSourceParser, SourceParser};
use std::path::Path;

/// Extracts package documentation from a directory
pub struct Extractor<P = GoSourceParser> {
    parser: P,
    miner: CommentMiner,
}

impl Extractor<GoSourceParser> {
    /// Create an extractor reading Go sources with the given configuration
    pub fn new(config: &Config) -> Result<Self> {
        let parser = GoSourceParser::new(&config.source)?;
        Self::with_parser(parser, config)
    }
}

impl<P: SourceParser> Extractor<P> {
    /// Create an extractor around any source parser
    pub fn with_parser(parser: P, config: &Config) -> Result<Self> {
        Ok(Self {
            parser,
            miner: CommentMiner::new(&config.mining)?,
        })
    }

    /// Parse the package in `dir` and assemble its documentation
    pub fn extract(&self, dir: &Path) -> Result<Package> {
        let source = self.parser.load(dir)?;
        let package = assemble(&source, &self.miner)?;

        log::info!(
            "Extracted {} declarations from package {}",
            package.declarations().len(),
            package.name
        );
        Ok(package)
    }
}
