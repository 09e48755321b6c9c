// Package assembly

use crate::doc::miner::CommentMiner;
use crate::doc::model::{Note, Package, TypeNode};
use crate::doc::normalize::{normalize_all, normalize_type};
use crate::error::Result;
use crate::parser::SourcePackage;

/// Assemble the documentation of a parsed package.
///
/// Lists keep the parser's order. The `MARKER(uid)` note map is copied as is;
/// it is unrelated to the keyword notes mined into each node. Any failure
/// aborts assembly and no partial package is returned.
pub fn assemble(source: &SourcePackage, miner: &CommentMiner) -> Result<Package> {
    let consts = normalize_all(&source.consts, miner)?;
    let vars = normalize_all(&source.vars, miner)?;
    let funcs = normalize_all(&source.funcs, miner)?;
    let types = source
        .types
        .iter()
        .map(|t| normalize_type(t, miner))
        .collect::<Result<Vec<TypeNode>>>()?;

    let notes = source
        .notes
        .iter()
        .map(|(marker, list)| {
            let list = list
                .iter()
                .map(|n| Note {
                    uid: n.uid.clone(),
                    body: n.body.clone(),
                })
                .collect();
            (marker.clone(), list)
        })
        .collect();

    log::debug!(
        "Assembled {}: {} consts, {} vars, {} funcs, {} types",
        source.name,
        consts.len(),
        vars.len(),
        funcs.len(),
        types.len()
    );

    Ok(Package {
        name: source.name.clone(),
        import_path: source.import_path.clone(),
        notes,
        consts,
        vars,
        funcs,
        types,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::model::NodeKind;
    use crate::error::Error;
    use crate::parser::{Declaration, SourceNote, TypeDeclaration};

    #[test]
    fn test_empty_package() {
        let source = SourcePackage::new("empty", "example.com/empty");
        let pkg = assemble(&source, &CommentMiner::default()).unwrap();
        assert_eq!(pkg.name, "empty");
        assert_eq!(pkg.import_path, "example.com/empty");
        assert!(pkg.notes.is_empty());
        assert!(pkg.consts.is_empty());
        assert!(pkg.vars.is_empty());
        assert!(pkg.funcs.is_empty());
        assert!(pkg.types.is_empty());
    }

    #[test]
    fn test_pi_and_add() {
        let mut source = SourcePackage::new("calc", ".");
        source
            .consts
            .push(Declaration::value(NodeKind::Const, vec!["Pi".into()], "@math\n"));
        source
            .funcs
            .push(Declaration::func("Add", "", "func Add(a, b int) int"));

        let pkg = assemble(&source, &CommentMiner::default()).unwrap();
        assert_eq!(pkg.consts.len(), 1);
        assert_eq!(pkg.consts[0].name, "Pi");
        assert_eq!(pkg.consts[0].kind, NodeKind::Const);
        assert_eq!(pkg.consts[0].annotations, vec!["@math"]);
        assert_eq!(pkg.funcs.len(), 1);
        assert_eq!(pkg.funcs[0].name, "Add");
        assert_eq!(pkg.funcs[0].kind, NodeKind::Func);
        assert!(pkg.types.is_empty());
    }

    #[test]
    fn test_order_preserved() {
        let mut source = SourcePackage::new("p", ".");
        for name in ["Zeta", "Alpha", "Mid"] {
            source.funcs.push(Declaration::func(name, "", ""));
        }
        for name in ["Y", "B"] {
            source.types.push(TypeDeclaration::new(name, ""));
        }

        let pkg = assemble(&source, &CommentMiner::default()).unwrap();
        let funcs: Vec<&str> = pkg.funcs.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(funcs, vec!["Zeta", "Alpha", "Mid"]);
        let types: Vec<&str> = pkg.types.iter().map(|t| t.node.name.as_str()).collect();
        assert_eq!(types, vec!["Y", "B"]);
        for typ in &pkg.types {
            assert!(typ.node.annotations.is_empty());
            assert!(typ.node.notes.is_empty());
        }
    }

    #[test]
    fn test_notes_transcribed_separately() {
        let mut source = SourcePackage::new("p", ".");
        source.notes.insert(
            "BUG".to_string(),
            vec![SourceNote {
                uid: "alice".to_string(),
                body: "off by one\n".to_string(),
            }],
        );
        source
            .funcs
            .push(Declaration::func("Run", "Runs. BUG: none known\n", ""));

        let pkg = assemble(&source, &CommentMiner::default()).unwrap();
        assert_eq!(
            pkg.notes["BUG"],
            vec![Note {
                uid: "alice".to_string(),
                body: "off by one\n".to_string()
            }]
        );
        assert_eq!(pkg.funcs[0].notes, vec!["BUG"]);
    }

    #[test]
    fn test_declarations_round_trip() {
        let mut source = SourcePackage::new("p", ".");
        source
            .vars
            .push(Declaration::value(NodeKind::Var, vec!["Default".into()], ""));
        let mut typ = TypeDeclaration::new("Point", "");
        typ.funcs.push(Declaration::func("NewPoint", "", ""));
        typ.consts
            .push(Declaration::value(NodeKind::Const, vec!["Origin".into()], ""));
        source.types.push(typ);

        let pkg = assemble(&source, &CommentMiner::default()).unwrap();
        let mut expected = source.declarations();
        let mut actual = pkg.declarations();
        expected.sort_by(|a, b| a.0.cmp(&b.0));
        actual.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_malformed_declaration_aborts() {
        let mut source = SourcePackage::new("p", ".");
        source.funcs.push(Declaration::func("Ok", "", ""));
        source
            .consts
            .push(Declaration::value(NodeKind::Const, vec![], ""));

        let result = assemble(&source, &CommentMiner::default());
        assert!(matches!(result, Err(Error::MalformedDeclaration(_))));
    }

    #[test]
    fn test_malformed_type_member_aborts() {
        let mut source = SourcePackage::new("p", ".");
        let mut typ = TypeDeclaration::new("Point", "");
        typ.vars.push(Declaration::value(NodeKind::Var, vec![], ""));
        source.types.push(typ);

        let result = assemble(&source, &CommentMiner::default());
        assert!(matches!(result, Err(Error::MalformedDeclaration(_))));
    }
}
