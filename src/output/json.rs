//! JSON serialization of package documentation

use crate::doc::Package;
use crate::error::Result;
use std::io::Write;

/// Render a package as a JSON document, compact unless `pretty`
pub fn to_json(package: &Package, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(package)?
    } else {
        serde_json::to_string(package)?
    };
    Ok(json)
}

/// Write the JSON document followed by a newline
pub fn write_json<W: Write>(package: &Package, writer: &mut W, pretty: bool) -> Result<()> {
    let json = to_json(package, pretty)?;
    writer.write_all(json.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::{FuncInfo, Node, NodeKind, Note, TypeNode};

    fn sample() -> Package {
        let mut package = Package {
            name: "geo".to_string(),
            import_path: "example.com/geo".to_string(),
            ..Default::default()
        };
        package.consts.push(Node {
            name: "Pi".to_string(),
            kind: NodeKind::Const,
            doc: "@math\n".to_string(),
            func: None,
            annotations: vec!["@math".to_string()],
            notes: vec![],
        });
        package.types.push(TypeNode {
            node: Node {
                name: "Point".to_string(),
                kind: NodeKind::Type,
                doc: String::new(),
                func: None,
                annotations: vec![],
                notes: vec![],
            },
            consts: vec![],
            vars: vec![],
            funcs: vec![Node {
                name: "Move".to_string(),
                kind: NodeKind::Func,
                doc: String::new(),
                func: Some(FuncInfo {
                    receiver: "*Point".to_string(),
                    original_signature: "func (p *Point) Move()".to_string(),
                    embedding_level: 0,
                }),
                annotations: vec![],
                notes: vec![],
            }],
        });
        package.notes.insert(
            "BUG".to_string(),
            vec![Note {
                uid: "bob".to_string(),
                body: "wrong\n".to_string(),
            }],
        );
        package
    }

    #[test]
    fn test_compact_is_single_line() {
        let json = to_json(&sample(), false).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.starts_with(r#"{"name":"geo","importPath":"example.com/geo","notes":{"BUG""#));
    }

    #[test]
    fn test_pretty_is_indented() {
        let json = to_json(&sample(), true).unwrap();
        assert!(json.contains("\n  \"name\": \"geo\""));
    }

    #[test]
    fn test_field_names() {
        let value: serde_json::Value =
            serde_json::from_str(&to_json(&sample(), false).unwrap()).unwrap();
        let point = &value["types"][0];
        assert_eq!(point["name"], "Point");
        assert_eq!(point["kind"], "type");
        assert!(point["consts"].as_array().unwrap().is_empty());

        let method = &point["funcs"][0];
        assert_eq!(method["receiver"], "*Point");
        assert_eq!(method["originalSignature"], "func (p *Point) Move()");
        assert_eq!(method["embeddingLevel"], 0);

        let pi = &value["consts"][0];
        assert_eq!(pi["annotations"][0], "@math");
        assert!(pi.get("receiver").is_none());
        assert_eq!(value["notes"]["BUG"][0]["uid"], "bob");
    }

    #[test]
    fn test_write_appends_newline() {
        let mut buf = Vec::new();
        write_json(&sample(), &mut buf, false).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with("}\n"));
        assert_eq!(text.matches('\n').count(), 1);
    }
}
