// Loading a Go package directory

use crate::config::SourceConfig;
use crate::error::{Error, Result};
use crate::parser::ast::{ParsedFile, SourcePackage};
use crate::parser::go::GoParser;
use crate::parser::group::group_package;
use crate::parser::SourceParser;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Import path used when neither an import comment nor a go.mod applies
const FALLBACK_IMPORT_PATH: &str = ".";

/// Source parser for a directory of Go files
#[derive(Debug, Clone, Default)]
pub struct GoSourceParser {
    exclude: Vec<glob::Pattern>,
}

impl GoSourceParser {
    /// Create a parser honoring the configured exclude globs
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let exclude = config
            .exclude
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self { exclude })
    }

    /// Go files that make up the package, sorted by name
    fn discover_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| Error::unreadable(dir, e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if !self.is_package_file(&name) {
                log::debug!("Skipping {}", entry.path().display());
                continue;
            }

            files.push(entry.path().to_path_buf());
        }

        Ok(files)
    }

    /// Whether a file name belongs to the package proper
    fn is_package_file(&self, name: &str) -> bool {
        name.ends_with(".go")
            && !name.ends_with("_test.go")
            && !name.starts_with('_')
            && !name.starts_with('.')
            && !self.exclude.iter().any(|p| p.matches(name))
    }
}

impl SourceParser for GoSourceParser {
    fn load(&self, dir: &Path) -> Result<SourcePackage> {
        if !dir.is_dir() {
            return Err(Error::SourceNotFound(dir.to_path_buf()));
        }

        let files = self.discover_files(dir)?;
        if files.is_empty() {
            return Err(Error::NoSourceFiles(dir.to_path_buf()));
        }
        log::debug!("Parsing {} Go files in {}", files.len(), dir.display());

        // one tree-sitter parser per worker; collect keeps file order
        let parsed = files
            .par_iter()
            .map_init(GoParser::new, |parser, path| match parser {
                Ok(parser) => parser.parse_file(path),
                Err(e) => Err(Error::parser(e.to_string())),
            })
            .collect::<Result<Vec<ParsedFile>>>()?;

        let parsed: Vec<ParsedFile> = parsed
            .into_iter()
            .filter(|f| {
                if f.build_ignored {
                    log::debug!("Skipping {} (go:build ignore)", f.path.display());
                }
                !f.build_ignored
            })
            .collect();
        if parsed.is_empty() {
            return Err(Error::NoSourceFiles(dir.to_path_buf()));
        }

        let name = package_name(dir, &parsed)?;
        let import_path = import_path(dir, &parsed);
        log::debug!("Package {} ({})", name, import_path);

        Ok(group_package(&name, &import_path, parsed))
    }
}

/// The single package name shared by all files
fn package_name(dir: &Path, files: &[ParsedFile]) -> Result<String> {
    let first = files
        .first()
        .ok_or_else(|| Error::NoSourceFiles(dir.to_path_buf()))?;

    if let Some(other) = files.iter().find(|f| f.package != first.package) {
        return Err(Error::AmbiguousPackage {
            dir: dir.to_path_buf(),
            first: first.package.clone(),
            first_file: first.file_name(),
            second: other.package.clone(),
            second_file: other.file_name(),
        });
    }

    Ok(first.package.clone())
}

/// Import comment, else go.mod module path plus relative directory, else "."
fn import_path(dir: &Path, files: &[ParsedFile]) -> String {
    files
        .iter()
        .find_map(|f| f.import_comment.clone())
        .or_else(|| module_import_path(dir))
        .unwrap_or_else(|| FALLBACK_IMPORT_PATH.to_string())
}

fn module_import_path(dir: &Path) -> Option<String> {
    let dir = dir.canonicalize().ok()?;

    for ancestor in dir.ancestors() {
        let go_mod = ancestor.join("go.mod");
        if !go_mod.is_file() {
            continue;
        }

        let contents = std::fs::read_to_string(&go_mod).ok()?;
        let mut path = module_directive(&contents)?;
        let relative = dir.strip_prefix(ancestor).ok()?;
        for component in relative.components() {
            path.push('/');
            path.push_str(&component.as_os_str().to_string_lossy());
        }
        return Some(path);
    }

    None
}

/// Module path from a go.mod `module` line
fn module_directive(contents: &str) -> Option<String> {
    contents.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let value = rest.split("//").next()?.trim().trim_matches('"');
        (!value.is_empty()).then(|| value.to_string())
    })
}
