// Documentation model emitted by the engine
//
// Field names serialize in lowerCamelCase and every sequence is always
// present, so the JSON shape does not depend on what a package contains.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Kind of a documented declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Const,
    Var,
    Func,
    Type,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Const => "const",
            NodeKind::Var => "var",
            NodeKind::Func => "func",
            NodeKind::Type => "type",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A documented declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    /// Raw doc comment text
    pub doc: String,
    /// Present only on func nodes
    #[serde(flatten)]
    pub func: Option<FuncInfo>,
    /// `@token` annotations in order of appearance
    pub annotations: Vec<String>,
    /// Note keywords found in the doc
    pub notes: Vec<String>,
}

/// Function-only fields of a node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuncInfo {
    /// Receiver type; empty for free functions and constructors
    pub receiver: String,
    /// Header as written in the source
    pub original_signature: String,
    /// 0 for direct declarations, n for methods promoted through n embeddings
    pub embedding_level: usize,
}

/// A documented type with its attributed members
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeNode {
    #[serde(flatten)]
    pub node: Node,
    pub consts: Vec<Node>,
    pub vars: Vec<Node>,
    pub funcs: Vec<Node>,
}

/// A `MARKER(uid): body` comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub uid: String,
    pub body: String,
}

/// Documentation of a whole package
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub name: String,
    pub import_path: String,
    pub notes: BTreeMap<String, Vec<Note>>,
    pub consts: Vec<Node>,
    pub vars: Vec<Node>,
    pub funcs: Vec<Node>,
    pub types: Vec<TypeNode>,
}

impl Package {
    /// Every node as `(name, kind)`, types before their members
    pub fn declarations(&self) -> Vec<(String, NodeKind)> {
        let entry = |n: &Node| (n.name.clone(), n.kind);

        let mut out: Vec<(String, NodeKind)> = Vec::new();
        out.extend(self.consts.iter().map(entry));
        out.extend(self.vars.iter().map(entry));
        out.extend(self.funcs.iter().map(entry));
        for typ in &self.types {
            out.push(entry(&typ.node));
            out.extend(typ.consts.iter().map(entry));
            out.extend(typ.vars.iter().map(entry));
            out.extend(typ.funcs.iter().map(entry));
        }
        out
    }
}
