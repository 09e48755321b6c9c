// Declaration records produced by the source parser
//
// The package-level records (`SourcePackage` and friends) are the interface the
// documentation engine consumes. The per-file records (`ParsedFile` and friends)
// are the raw material the Go parser extracts from one file before members are
// grouped under their types.

use crate::doc::NodeKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A parsed package, ready for normalization
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SourcePackage {
    /// Package name from the package clause
    pub name: String,
    /// Logical import path
    pub import_path: String,
    /// Package-level constant declarations, in source order
    pub consts: Vec<Declaration>,
    /// Package-level variable declarations, in source order
    pub vars: Vec<Declaration>,
    /// Free functions (and methods of undeclared types), in source order
    pub funcs: Vec<Declaration>,
    /// Type declarations with their attributed members
    pub types: Vec<TypeDeclaration>,
    /// `MARKER(uid): body` notes keyed by marker
    pub notes: BTreeMap<String, Vec<SourceNote>>,
}

impl SourcePackage {
    pub fn new(name: &str, import_path: &str) -> Self {
        Self {
            name: name.to_string(),
            import_path: import_path.to_string(),
            ..Self::default()
        }
    }

    /// Every declaration as `(first name, kind)`, types before their members
    pub fn declarations(&self) -> Vec<(String, NodeKind)> {
        fn first(decl: &Declaration) -> (String, NodeKind) {
            (decl.names.first().cloned().unwrap_or_default(), decl.kind)
        }

        let mut out: Vec<(String, NodeKind)> = Vec::new();
        out.extend(self.consts.iter().map(first));
        out.extend(self.vars.iter().map(first));
        out.extend(self.funcs.iter().map(first));
        for typ in &self.types {
            out.push((typ.name.clone(), NodeKind::Type));
            out.extend(typ.consts.iter().map(first));
            out.extend(typ.vars.iter().map(first));
            out.extend(typ.funcs.iter().map(first));
        }
        out
    }
}

/// One const, var, or func declaration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Declaration {
    pub kind: NodeKind,
    /// Names bound by the declaration; a const/var block lists all of them
    pub names: Vec<String>,
    /// Doc comment text
    pub doc: String,
    /// Receiver type as it applies to the owning type (`T` or `*T`)
    pub receiver: String,
    /// Function header as written
    pub signature: String,
    /// Embedding depth of a promoted method
    pub level: usize,
    /// Line of the declaration in its file
    pub line: usize,
}

impl Declaration {
    /// Create a const or var declaration
    pub fn value(kind: NodeKind, names: Vec<String>, doc: &str) -> Self {
        Self {
            kind,
            names,
            doc: doc.to_string(),
            receiver: String::new(),
            signature: String::new(),
            level: 0,
            line: 0,
        }
    }

    /// Create a func declaration without receiver
    pub fn func(name: &str, doc: &str, signature: &str) -> Self {
        Self {
            kind: NodeKind::Func,
            names: vec![name.to_string()],
            doc: doc.to_string(),
            receiver: String::new(),
            signature: signature.to_string(),
            level: 0,
            line: 0,
        }
    }

    pub fn with_receiver(mut self, receiver: &str) -> Self {
        self.receiver = receiver.to_string();
        self
    }

    pub fn with_level(mut self, level: usize) -> Self {
        self.level = level;
        self
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }
}

/// A type declaration and the members attributed to it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypeDeclaration {
    pub name: String,
    pub doc: String,
    /// Constants typed with this type
    pub consts: Vec<Declaration>,
    /// Variables typed with this type
    pub vars: Vec<Declaration>,
    /// Constructors and methods, then promoted methods
    pub funcs: Vec<Declaration>,
    pub line: usize,
}

impl TypeDeclaration {
    pub fn new(name: &str, doc: &str) -> Self {
        Self {
            name: name.to_string(),
            doc: doc.to_string(),
            consts: Vec::new(),
            vars: Vec::new(),
            funcs: Vec::new(),
            line: 0,
        }
    }
}

/// A marked `MARKER(uid): body` comment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceNote {
    pub uid: String,
    pub body: String,
}

/// Declarations extracted from a single Go file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParsedFile {
    pub path: PathBuf,
    /// Package name from the package clause
    pub package: String,
    /// Path from a `// import "path"` comment on the package clause
    pub import_comment: Option<String>,
    /// Marked `//go:build ignore` above the package clause
    pub build_ignored: bool,
    pub values: Vec<ValueGroup>,
    pub funcs: Vec<FuncDecl>,
    pub types: Vec<TypeSpec>,
    /// Notes in file order, tagged with their marker
    pub notes: Vec<(String, SourceNote)>,
}

impl ParsedFile {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            package: String::new(),
            import_comment: None,
            build_ignored: false,
            values: Vec::new(),
            funcs: Vec::new(),
            types: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// File name for messages
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// A `const` or `var` declaration (single spec or parenthesized block)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValueGroup {
    pub kind: NodeKind,
    pub names: Vec<String>,
    pub doc: String,
    /// Named local type shared by (nearly) all specs, if any
    pub type_name: Option<String>,
    pub line: usize,
}

/// A function or method declaration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FuncDecl {
    pub name: String,
    pub doc: String,
    /// Header as written, up to the body
    pub signature: String,
    pub receiver: Option<Receiver>,
    /// Base type name of each result field, `None` for unnamed or imported types
    pub results: Vec<Option<String>>,
    /// Names of the function's own type parameters
    pub type_params: Vec<String>,
    pub line: usize,
}

/// A method receiver
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Receiver {
    /// Receiver type as written (`*List[T]`)
    pub text: String,
    /// Base type name (`List`)
    pub base: String,
    pub pointer: bool,
}

/// A type spec inside a `type` declaration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypeSpec {
    pub name: String,
    pub doc: String,
    /// Embedded struct fields naming local types
    pub embedded: Vec<EmbeddedField>,
    pub line: usize,
}

/// An embedded (anonymous) struct field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddedField {
    pub name: String,
    pub pointer: bool,
}
