// Declaration normalization and type grouping

use crate::doc::miner::CommentMiner;
use crate::doc::model::{FuncInfo, Node, NodeKind, TypeNode};
use crate::error::{Error, Result};
use crate::parser::{Declaration, TypeDeclaration};

/// Normalize one const, var, or func declaration.
///
/// The node is named after the first bound name; a declaration without names
/// is a broken parser contract and fails with `MalformedDeclaration`.
pub fn normalize_decl(decl: &Declaration, miner: &CommentMiner) -> Result<Node> {
    let name = match decl.names.first() {
        Some(name) if !name.is_empty() => name,
        _ => {
            return Err(Error::malformed(format!(
                "{} declaration at line {} has no name",
                decl.kind, decl.line
            )))
        }
    };

    let func = (decl.kind == NodeKind::Func).then(|| FuncInfo {
        receiver: decl.receiver.clone(),
        original_signature: decl.signature.clone(),
        embedding_level: decl.level,
    });

    Ok(mined_node(name, decl.kind, &decl.doc, func, miner))
}

/// Normalize a type and every member attributed to it, in input order.
/// One malformed member fails the whole type.
pub fn normalize_type(decl: &TypeDeclaration, miner: &CommentMiner) -> Result<TypeNode> {
    if decl.name.is_empty() {
        return Err(Error::malformed(format!(
            "type declaration at line {} has no name",
            decl.line
        )));
    }

    Ok(TypeNode {
        node: mined_node(&decl.name, NodeKind::Type, &decl.doc, None, miner),
        consts: normalize_all(&decl.consts, miner)?,
        vars: normalize_all(&decl.vars, miner)?,
        funcs: normalize_all(&decl.funcs, miner)?,
    })
}

/// Normalize a declaration list, preserving order
pub fn normalize_all(decls: &[Declaration], miner: &CommentMiner) -> Result<Vec<Node>> {
    decls.iter().map(|d| normalize_decl(d, miner)).collect()
}

fn mined_node(
    name: &str,
    kind: NodeKind,
    doc: &str,
    func: Option<FuncInfo>,
    miner: &CommentMiner,
) -> Node {
    Node {
        name: name.to_string(),
        kind,
        doc: doc.to_string(),
        func,
        annotations: miner.annotations(doc),
        notes: miner.notes(doc),
    }
}
