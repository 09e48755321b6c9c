// Attribution of package members to the types they belong to

use crate::doc::NodeKind;
use crate::parser::ast::{
    Declaration, FuncDecl, ParsedFile, SourcePackage, TypeDeclaration, TypeSpec,
};
use std::collections::{BTreeMap, HashMap, HashSet};

/// A declared type while members are being attached
struct TypeEntry {
    spec: TypeSpec,
    decl: TypeDeclaration,
    /// Direct methods, kept for promotion into embedding types
    methods: Vec<FuncDecl>,
}

/// Build a package from parsed files, attaching values, constructors and
/// methods to the types declared in the package.
///
/// Files are consumed in the given order and declarations keep their source
/// order within each list.
pub fn group_package(name: &str, import_path: &str, files: Vec<ParsedFile>) -> SourcePackage {
    let mut pkg = SourcePackage::new(name, import_path);

    let mut types: Vec<TypeEntry> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for file in &files {
        for spec in &file.types {
            index.insert(spec.name.clone(), types.len());
            let mut decl = TypeDeclaration::new(&spec.name, &spec.doc);
            decl.line = spec.line;
            types.push(TypeEntry {
                spec: spec.clone(),
                decl,
                methods: Vec::new(),
            });
        }
    }

    let mut notes: BTreeMap<String, Vec<_>> = BTreeMap::new();

    for file in files {
        for group in file.values {
            let decl =
                Declaration::value(group.kind, group.names, &group.doc).at_line(group.line);
            let owner = group.type_name.as_ref().and_then(|t| index.get(t).copied());
            let target = match (owner, decl.kind) {
                (Some(i), NodeKind::Const) => &mut types[i].decl.consts,
                (Some(i), _) => &mut types[i].decl.vars,
                (None, NodeKind::Const) => &mut pkg.consts,
                (None, _) => &mut pkg.vars,
            };
            target.push(decl);
        }

        for func in file.funcs {
            let mut decl = Declaration::func(&func.name, &func.doc, &func.signature).at_line(func.line);

            if let Some(recv) = func.receiver.clone() {
                decl = decl.with_receiver(&recv.text);
                match index.get(&recv.base) {
                    Some(&i) => {
                        types[i].decl.funcs.push(decl);
                        types[i].methods.push(func);
                    }
                    None => {
                        log::debug!(
                            "method {}.{} has no local type; listing it with package funcs",
                            recv.base,
                            func.name
                        );
                        pkg.funcs.push(decl);
                    }
                }
            } else if let Some(i) = constructed_type(&func, &index) {
                types[i].decl.funcs.push(decl);
            } else {
                pkg.funcs.push(decl);
            }
        }

        for (marker, note) in file.notes {
            notes.entry(marker).or_default().push(note);
        }
    }

    let promoted: Vec<Vec<Declaration>> =
        (0..types.len()).map(|t| promoted_methods(&types, &index, t)).collect();
    for (entry, extra) in types.iter_mut().zip(promoted) {
        entry.decl.funcs.extend(extra);
    }

    pkg.types = types.into_iter().map(|t| t.decl).collect();
    pkg.notes = notes;
    pkg
}

/// The local type a function constructs: exactly one result field names a
/// declared type that is not one of the function's type parameters.
fn constructed_type(func: &FuncDecl, index: &HashMap<String, usize>) -> Option<usize> {
    let mut found = None;
    let mut count = 0;

    for name in func.results.iter().flatten() {
        if func.type_params.contains(name) {
            continue;
        }
        if let Some(&i) = index.get(name) {
            if found.is_some_and(|f| f != i) {
                return None;
            }
            found = Some(i);
            count += 1;
        }
    }

    if count == 1 {
        found
    } else {
        None
    }
}

/// Candidate method names with the shallowest embedding depth seen so far.
/// An entry without a declaration is either a direct method or a conflict
/// between two promotions at the same depth.
#[derive(Default)]
struct MethodSet {
    entries: Vec<(usize, Option<Declaration>)>,
    by_name: HashMap<String, usize>,
}

impl MethodSet {
    fn add(&mut self, name: &str, level: usize, decl: Option<Declaration>) {
        match self.by_name.get(name) {
            None => {
                self.by_name.insert(name.to_string(), self.entries.len());
                self.entries.push((level, decl));
            }
            Some(&i) => {
                let entry = &mut self.entries[i];
                if level < entry.0 {
                    *entry = (level, decl);
                } else if level == entry.0 {
                    entry.1 = None;
                }
            }
        }
    }

    fn into_promoted(self) -> Vec<Declaration> {
        self.entries
            .into_iter()
            .filter(|(level, _)| *level > 0)
            .filter_map(|(_, decl)| decl)
            .collect()
    }
}

/// Methods a struct type gains through its embedded fields
fn promoted_methods(types: &[TypeEntry], index: &HashMap<String, usize>, t: usize) -> Vec<Declaration> {
    if types[t].spec.embedded.is_empty() {
        return Vec::new();
    }

    let mut set = MethodSet::default();
    for method in &types[t].methods {
        set.add(&method.name, 0, None);
    }

    let mut visited = HashSet::new();
    collect_embedded(types, index, &mut set, t, &types[t].spec.name, false, 1, &mut visited);
    set.into_promoted()
}

#[allow(clippy::too_many_arguments)]
fn collect_embedded(
    types: &[TypeEntry],
    index: &HashMap<String, usize>,
    set: &mut MethodSet,
    typ: usize,
    recv_name: &str,
    embedded_is_ptr: bool,
    level: usize,
    visited: &mut HashSet<usize>,
) {
    visited.insert(typ);

    for field in &types[typ].spec.embedded {
        let Some(&embedded) = index.get(&field.name) else {
            continue;
        };
        // once embedded through a pointer, the whole chain below counts as pointer
        let is_ptr = embedded_is_ptr || field.pointer;

        for method in &types[embedded].methods {
            let orig_is_ptr = method.receiver.as_ref().is_some_and(|r| r.pointer);
            let receiver = if !is_ptr && orig_is_ptr {
                format!("*{}", recv_name)
            } else {
                recv_name.to_string()
            };
            let decl = Declaration::func(&method.name, &method.doc, &method.signature)
                .with_receiver(&receiver)
                .with_level(level)
                .at_line(method.line);
            set.add(&method.name, level, Some(decl));
        }

        if !visited.contains(&embedded) {
            collect_embedded(types, index, set, embedded, recv_name, is_ptr, level + 1, visited);
        }
    }

    visited.remove(&typ);
}
