// Go parser using tree-sitter

use crate::doc::NodeKind;
use crate::error::{Error, Result};
use crate::parser::ast::{EmbeddedField, FuncDecl, ParsedFile, Receiver, TypeSpec, ValueGroup};
use crate::parser::comments::{collect_notes, comment_text};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tree_sitter::{Node, Parser};

/// `// import "path"` or `/* import "path" */` after a package clause
static IMPORT_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^(?://|/\*)\s*import\s+"([^"]+)""#).unwrap());

/// Share of specs that must carry a type for a value group to belong to it
const TYPED_SPEC_THRESHOLD: f64 = 0.75;

/// Parser for Go source files
pub struct GoParser {
    parser: Parser,
}

impl GoParser {
    /// Create a new Go parser
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let language = tree_sitter_go::language();
        parser
            .set_language(&language)
            .map_err(|e| Error::Parser(format!("Failed to set Go language: {}", e)))?;

        Ok(Self { parser })
    }

    /// Parse a Go file
    pub fn parse_file(&mut self, path: &Path) -> Result<ParsedFile> {
        let bytes = std::fs::read(path).map_err(|e| Error::unreadable(path, e.to_string()))?;
        let source = String::from_utf8(bytes)
            .map_err(|_| Error::unreadable(path, "file is not valid UTF-8"))?;

        self.parse_source(&source, path)
    }

    /// Parse Go source code
    pub fn parse_source(&mut self, source: &str, path: &Path) -> Result<ParsedFile> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| Error::parser("Failed to parse Go source"))?;

        let root = tree.root_node();
        if root.has_error() {
            let line = first_error_line(root).unwrap_or(1);
            return Err(Error::unreadable(path, format!("syntax error at line {}", line)));
        }

        let mut file = ParsedFile::new(path.to_path_buf());

        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            match child.kind() {
                "comment" if file.package.is_empty() => {
                    if is_ignore_constraint(text(&child, source)) {
                        file.build_ignored = true;
                    }
                }
                "package_clause" => {
                    // The package name is a child node, not a field
                    let mut pkg_cursor = child.walk();
                    for pkg_child in child.children(&mut pkg_cursor) {
                        if pkg_child.kind() == "package_identifier" {
                            file.package = text(&pkg_child, source).to_string();
                        }
                    }
                    file.import_comment = import_comment(&child, source);
                }
                "type_declaration" => {
                    file.types.extend(parse_type_declaration(&child, source));
                }
                "function_declaration" | "method_declaration" => {
                    if let Some(func) = parse_function(&child, source) {
                        file.funcs.push(func);
                    } else {
                        log::warn!(
                            "{}:{}: skipping function without usable name or receiver",
                            path.display(),
                            child.start_position().row + 1
                        );
                    }
                }
                "const_declaration" => {
                    file.values.extend(parse_value_declaration(&child, source, NodeKind::Const));
                }
                "var_declaration" => {
                    file.values.extend(parse_value_declaration(&child, source, NodeKind::Var));
                }
                _ => {}
            }
        }

        if file.package.is_empty() {
            return Err(Error::unreadable(path, "missing package clause"));
        }

        file.notes = collect_notes(&comment_groups(root, source));

        Ok(file)
    }
}

fn text<'a>(node: &Node, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

/// Line of the first error or missing node
fn first_error_line(node: Node) -> Option<usize> {
    if node.is_error() || node.is_missing() {
        return Some(node.start_position().row + 1);
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() || child.is_missing() {
            if let Some(line) = first_error_line(child) {
                return Some(line);
            }
        }
    }
    None
}

/// Import path from a comment trailing the package clause
fn import_comment(node: &Node, source: &str) -> Option<String> {
    let next = node.next_named_sibling()?;
    if next.kind() != "comment" || next.start_position().row != node.end_position().row {
        return None;
    }
    IMPORT_COMMENT
        .captures(text(&next, source))
        .map(|caps| caps[1].to_string())
}

/// Doc comment: the comment group ending on the line directly above the node
fn doc_comment(node: &Node, source: &str) -> String {
    let mut group = Vec::new();
    let mut expected_row = node.start_position().row;
    let mut prev = node.prev_named_sibling();

    while let Some(comment) = prev {
        if comment.kind() != "comment" || comment.end_position().row + 1 != expected_row {
            break;
        }
        // a trailing comment of earlier code is not part of this doc
        if trails_code(&comment) {
            break;
        }
        group.push(text(&comment, source));
        expected_row = comment.start_position().row;
        prev = comment.prev_named_sibling();
    }

    group.reverse();
    comment_text(&group)
}

/// `//go:build ignore` or the older `// +build ignore`
fn is_ignore_constraint(comment: &str) -> bool {
    let comment = comment.trim_end();
    if let Some(expr) = comment.strip_prefix("//go:build ") {
        return expr.trim() == "ignore";
    }
    comment
        .strip_prefix("//")
        .and_then(|rest| rest.trim_start().strip_prefix("+build "))
        .is_some_and(|tags| tags.trim() == "ignore")
}

/// Whether a comment starts on the line where preceding code ends
fn trails_code(comment: &Node) -> bool {
    comment.prev_named_sibling().is_some_and(|before| {
        before.kind() != "comment" && before.end_position().row == comment.start_position().row
    })
}

/// Line comment on the same line as the end of the node
fn trailing_comment(node: &Node, source: &str) -> Option<String> {
    let next = node.next_named_sibling()?;
    if next.kind() == "comment" && next.start_position().row == node.end_position().row {
        Some(comment_text(&[text(&next, source)]))
    } else {
        None
    }
}

/// All comments, grouped by adjacency
fn comment_groups<'a>(root: Node, source: &'a str) -> Vec<Vec<&'a str>> {
    let mut comments = Vec::new();
    collect_comments(root, &mut comments);

    let mut groups: Vec<Vec<&'a str>> = Vec::new();
    let mut last: Option<Node> = None;
    for comment in comments {
        // a trailing comment closes its group on its own line
        let joins = last.map_or(false, |prev| {
            comment.start_position().row <= prev.end_position().row + 1
                && comment.prev_named_sibling().map(|s| s.id()) == Some(prev.id())
                && !trails_code(&prev)
        });
        let body = text(&comment, source);
        match groups.last_mut() {
            Some(group) if joins => group.push(body),
            _ => groups.push(vec![body]),
        }
        last = Some(comment);
    }

    groups
}

fn collect_comments<'t>(node: Node<'t>, out: &mut Vec<Node<'t>>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "comment" {
            out.push(child);
        } else if child.child_count() > 0 {
            collect_comments(child, out);
        }
    }
}

/// Name of a locally declared type behind pointers, parentheses and type
/// arguments. Qualified (imported) and composite types have none.
fn base_type_name(node: &Node, source: &str) -> Option<String> {
    match node.kind() {
        "type_identifier" => Some(text(node, source).to_string()),
        "pointer_type" | "parenthesized_type" => {
            let inner = node.named_child(0)?;
            base_type_name(&inner, source)
        }
        "generic_type" => {
            let inner = node
                .child_by_field_name("type")
                .or_else(|| node.named_child(0))?;
            base_type_name(&inner, source)
        }
        _ => None,
    }
}

/// Result type name, looking through one slice or array level
fn result_type_name(node: &Node, source: &str) -> Option<String> {
    match node.kind() {
        "slice_type" | "array_type" => {
            let element = node.child_by_field_name("element")?;
            base_type_name(&element, source)
        }
        _ => base_type_name(node, source),
    }
}

/// Parse const or var declarations; an empty `const ()` block yields nothing
fn parse_value_declaration(node: &Node, source: &str, kind: NodeKind) -> Option<ValueGroup> {
    let specs = value_specs(node);
    if specs.is_empty() {
        return None;
    }

    let mut names = vec![];
    let mut spec_types: Vec<Option<String>> = vec![];
    let mut prev: Option<String> = None;

    for spec in &specs {
        // Can have multiple names
        let mut spec_cursor = spec.walk();
        for spec_child in spec.children(&mut spec_cursor) {
            if spec_child.kind() == "identifier" {
                names.push(text(&spec_child, source).to_string());
            }
        }

        let type_name = match spec.child_by_field_name("type") {
            Some(type_node) => base_type_name(&type_node, source),
            // iota-style continuation repeats the previous spec
            None if kind == NodeKind::Const && spec.child_by_field_name("value").is_none() => {
                prev.clone()
            }
            None => None,
        };
        spec_types.push(type_name.clone());
        prev = type_name;
    }

    let mut doc = doc_comment(node, source);
    if doc.is_empty() && specs.len() == 1 {
        doc = doc_comment(&specs[0], source);
        if doc.is_empty() {
            doc = trailing_comment(&specs[0], source)
                .or_else(|| trailing_comment(node, source))
                .unwrap_or_default();
        }
    }

    if names.is_empty() {
        return None;
    }

    Some(ValueGroup {
        kind,
        names,
        doc,
        type_name: dominant_type(&spec_types),
        line: node.start_position().row + 1,
    })
}

fn value_specs<'t>(node: &Node<'t>) -> Vec<Node<'t>> {
    let mut specs = vec![];
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "const_spec" | "var_spec" => specs.push(child),
            "var_spec_list" => specs.extend(value_specs(&child)),
            _ => {}
        }
    }
    specs
}

/// The one named type carried by enough specs, if no other type competes
fn dominant_type(spec_types: &[Option<String>]) -> Option<String> {
    let mut dominant: Option<&str> = None;
    let mut frequency = 0;

    for name in spec_types.iter().flatten() {
        match dominant {
            Some(d) if d != name => return None,
            _ => {
                dominant = Some(name);
                frequency += 1;
            }
        }
    }

    let threshold = (spec_types.len() as f64 * TYPED_SPEC_THRESHOLD) as usize;
    dominant
        .filter(|_| frequency >= threshold)
        .map(str::to_string)
}

/// Parse type declaration (one spec or a parenthesized block)
fn parse_type_declaration(node: &Node, source: &str) -> Vec<TypeSpec> {
    let decl_doc = doc_comment(node, source);
    let mut specs = vec![];

    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    let grouped = children.iter().any(|c| c.kind() == "(");

    for child in children {
        if child.kind() != "type_spec" && child.kind() != "type_alias" {
            continue;
        }
        let name = match child.child_by_field_name("name") {
            Some(n) => text(&n, source).to_string(),
            None => continue,
        };

        let doc = if grouped {
            let own = doc_comment(&child, source);
            if own.is_empty() {
                decl_doc.clone()
            } else {
                own
            }
        } else {
            decl_doc.clone()
        };

        let embedded = match child.child_by_field_name("type") {
            Some(t) if t.kind() == "struct_type" => embedded_fields(&t, source),
            _ => vec![],
        };

        specs.push(TypeSpec {
            name,
            doc,
            embedded,
            line: child.start_position().row + 1,
        });
    }

    specs
}

/// Anonymous fields of a struct type that name local types
fn embedded_fields(struct_node: &Node, source: &str) -> Vec<EmbeddedField> {
    let mut fields = vec![];
    let mut cursor = struct_node.walk();

    for list in struct_node.children(&mut cursor) {
        if list.kind() != "field_declaration_list" {
            continue;
        }
        let mut list_cursor = list.walk();
        for field in list.children(&mut list_cursor) {
            if field.kind() != "field_declaration" || field.child_by_field_name("name").is_some() {
                continue;
            }
            let Some(type_node) = field.child_by_field_name("type") else {
                continue;
            };
            if let Some(name) = base_type_name(&type_node, source) {
                fields.push(EmbeddedField {
                    name,
                    pointer: text(&field, source).trim_start().starts_with('*'),
                });
            }
        }
    }

    fields
}

/// Parse function or method declaration
fn parse_function(node: &Node, source: &str) -> Option<FuncDecl> {
    let name = text(&node.child_by_field_name("name")?, source).to_string();

    let receiver = if node.kind() == "method_declaration" {
        Some(parse_receiver(&node.child_by_field_name("receiver")?, source)?)
    } else {
        None
    };

    // Header as written: everything before the body
    let header_end = node
        .child_by_field_name("body")
        .map(|b| b.start_byte())
        .unwrap_or_else(|| node.end_byte());
    let signature = source[node.start_byte()..header_end].trim_end().to_string();

    let results = match node.child_by_field_name("result") {
        Some(result) if result.kind() == "parameter_list" => {
            let mut fields = vec![];
            let mut cursor = result.walk();
            for param in result.children(&mut cursor) {
                if param.kind() == "parameter_declaration" {
                    fields.push(
                        param
                            .child_by_field_name("type")
                            .and_then(|t| result_type_name(&t, source)),
                    );
                }
            }
            fields
        }
        Some(result) => vec![result_type_name(&result, source)],
        None => vec![],
    };

    let mut type_params = vec![];
    if let Some(params) = node.child_by_field_name("type_parameters") {
        let mut cursor = params.walk();
        for param in params.children(&mut cursor) {
            let mut name_cursor = param.walk();
            for name_node in param.children(&mut name_cursor) {
                if name_node.kind() == "identifier" {
                    type_params.push(text(&name_node, source).to_string());
                }
            }
        }
    }

    Some(FuncDecl {
        name,
        doc: doc_comment(node, source),
        signature,
        receiver,
        results,
        type_params,
        line: node.start_position().row + 1,
    })
}

/// Receiver type of a method: `(p *Point)`, `(Point)`, `(l *List[T])`
fn parse_receiver(node: &Node, source: &str) -> Option<Receiver> {
    let mut cursor = node.walk();
    let param = node
        .children(&mut cursor)
        .find(|c| c.kind() == "parameter_declaration")?;
    let type_text = text(&param.child_by_field_name("type")?, source).trim();

    let pointer = type_text.starts_with('*');
    let base = type_text
        .trim_start_matches('*')
        .trim_start_matches('(')
        .split('[')
        .next()
        .unwrap_or("")
        .trim()
        .to_string();
    if base.is_empty() {
        return None;
    }

    Some(Receiver {
        text: type_text.to_string(),
        base,
        pointer,
    })
}
