//! List what a Rust module declares: submodules, types and functions.

use crate::core::error::PxError;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use syn::{Block, File, ImplItem, Item, Visibility};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    Struct,
    Enum,
    Union,
    Trait,
    Alias,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TypeKind::Struct => "struct",
            TypeKind::Enum => "enum",
            TypeKind::Union => "union",
            TypeKind::Trait => "trait",
            TypeKind::Alias => "type",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeEntry {
    pub kind: TypeKind,
    pub name: String,
    pub public: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionEntry {
    /// `None` for free functions, the `impl` target for methods
    pub owner: Option<String>,
    pub signature: String,
}

#[derive(Debug, Clone, Default)]
pub struct ModuleListing {
    pub path: PathBuf,
    pub submodules: Vec<String>,
    pub types: Vec<TypeEntry>,
    pub functions: Vec<FunctionEntry>,
}

impl fmt::Display for ModuleListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "module: {}", self.path.display())?;

        writeln!(f, "\nsubmodules:")?;
        for name in &self.submodules {
            writeln!(f, "  {}", name)?;
        }

        writeln!(f, "\ntypes:")?;
        for entry in &self.types {
            let vis = if entry.public { "pub " } else { "" };
            writeln!(f, "  {}{} {}", vis, entry.kind, entry.name)?;
        }

        writeln!(f, "\nfunctions:")?;
        for func in &self.functions {
            match &func.owner {
                Some(owner) => writeln!(f, "  {}::{}", owner, func.signature)?,
                None => writeln!(f, "  {}", func.signature)?,
            }
        }
        Ok(())
    }
}

/// Resolve `target` to a source file: `foo.rs`, `foo` (the `.rs` suffix is
/// optional) or a directory with `mod.rs`, `lib.rs` or `main.rs`.
pub fn resolve_module_path(target: &Path) -> Result<PathBuf, PxError> {
    if target.is_file() {
        return Ok(target.to_path_buf());
    }
    if target.is_dir() {
        for entry in ["mod.rs", "lib.rs", "main.rs"] {
            let candidate = target.join(entry);
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
    }
    let with_ext = target.with_extension("rs");
    if with_ext.is_file() {
        return Ok(with_ext);
    }
    Err(PxError::Input(format!(
        "no Rust module found at {}",
        target.display()
    )))
}

/// Parse the module at `target` and list its contents in source order.
pub fn list_module_contents(target: &Path) -> Result<ModuleListing, PxError> {
    let path = resolve_module_path(target)?;
    let source = fs::read_to_string(&path)?;
    let mut listing = list_source(&source)?;
    listing.path = path;
    Ok(listing)
}

pub fn list_source(source: &str) -> Result<ModuleListing, PxError> {
    let file = syn::parse_file(source)?;
    let mut listing = ModuleListing::default();

    for item in file.items {
        match item {
            Item::Mod(m) => listing.submodules.push(m.ident.to_string()),
            Item::Struct(s) => listing.types.push(type_entry(TypeKind::Struct, &s.ident, &s.vis)),
            Item::Enum(e) => listing.types.push(type_entry(TypeKind::Enum, &e.ident, &e.vis)),
            Item::Union(u) => listing.types.push(type_entry(TypeKind::Union, &u.ident, &u.vis)),
            Item::Trait(t) => listing.types.push(type_entry(TypeKind::Trait, &t.ident, &t.vis)),
            Item::Type(t) => listing.types.push(type_entry(TypeKind::Alias, &t.ident, &t.vis)),
            Item::Fn(mut f) => {
                f.attrs.clear();
                *f.block = empty_block();
                listing.functions.push(FunctionEntry {
                    owner: None,
                    signature: render_signature(Item::Fn(f)),
                });
            }
            Item::Impl(imp) => {
                let owner = self_type_name(&imp.self_ty);
                for impl_item in imp.items {
                    if let ImplItem::Fn(method) = impl_item {
                        let sig = syn::ItemFn {
                            attrs: Vec::new(),
                            vis: method.vis,
                            sig: method.sig,
                            block: Box::new(empty_block()),
                        };
                        listing.functions.push(FunctionEntry {
                            owner: Some(owner.clone()),
                            signature: render_signature(Item::Fn(sig)),
                        });
                    }
                }
            }
            _ => {}
        }
    }
    Ok(listing)
}

fn type_entry(kind: TypeKind, ident: &syn::Ident, vis: &Visibility) -> TypeEntry {
    TypeEntry {
        kind,
        name: ident.to_string(),
        public: matches!(vis, Visibility::Public(_)),
    }
}

fn empty_block() -> Block {
    Block {
        brace_token: Default::default(),
        stmts: Vec::new(),
    }
}

fn self_type_name(ty: &syn::Type) -> String {
    match ty {
        syn::Type::Path(p) => p
            .path
            .segments
            .last()
            .map(|s| s.ident.to_string())
            .unwrap_or_else(|| "?".to_string()),
        _ => "?".to_string(),
    }
}

// prettyplease prints the empty body as ` {}`; keep only the signature line(s)
fn render_signature(item: Item) -> String {
    let file = File {
        shebang: None,
        attrs: Vec::new(),
        items: vec![item],
    };
    let text = prettyplease::unparse(&file);
    let text = text.trim_end();
    let text = text.strip_suffix("{}").unwrap_or(text).trim_end();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"
//! A sample module.
mod inner;
pub mod nested { pub fn hidden() {} }

/// A point.
pub struct Point { x: i32, y: i32 }
enum Mode { A, B }
pub trait Shape { fn area(&self) -> f64; }
type Id = u64;

/// Adds things.
pub fn add(a: i32, b: i32) -> i32 { a + b }

async fn fetch(url: &str) -> Result<String, ()> { Ok(url.to_string()) }

impl Point {
    pub fn new(x: i32, y: i32) -> Self { Point { x, y } }
    fn norm(&self) -> f64 { 0.0 }
}
"#;

    #[test]
    fn lists_submodules_types_and_functions() {
        let listing = list_source(SOURCE).unwrap();

        assert_eq!(listing.submodules, vec!["inner", "nested"]);

        let types: Vec<(String, bool)> = listing
            .types
            .iter()
            .map(|t| (format!("{} {}", t.kind, t.name), t.public))
            .collect();
        assert_eq!(
            types,
            vec![
                ("struct Point".to_string(), true),
                ("enum Mode".to_string(), false),
                ("trait Shape".to_string(), true),
                ("type Id".to_string(), false),
            ]
        );

        let sigs: Vec<String> = listing
            .functions
            .iter()
            .map(|f| match &f.owner {
                Some(o) => format!("{}::{}", o, f.signature),
                None => f.signature.clone(),
            })
            .collect();
        assert_eq!(
            sigs,
            vec![
                "pub fn add(a: i32, b: i32) -> i32",
                "async fn fetch(url: &str) -> Result<String, ()>",
                "Point::pub fn new(x: i32, y: i32) -> Self",
                "Point::fn norm(&self) -> f64",
            ]
        );
    }

    #[test]
    fn invalid_source_is_a_parse_error() {
        assert!(matches!(list_source("fn ("), Err(PxError::Parse(_))));
    }

    #[test]
    fn resolves_with_or_without_extension_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("website.rs"), "pub fn home() {}").unwrap();
        fs::create_dir(dir.path().join("utils")).unwrap();
        fs::write(dir.path().join("utils").join("mod.rs"), "pub mod text;").unwrap();

        let by_stem = list_module_contents(&dir.path().join("website")).unwrap();
        assert_eq!(by_stem.path, dir.path().join("website.rs"));
        assert_eq!(by_stem.functions[0].signature, "pub fn home()");

        let by_dir = list_module_contents(&dir.path().join("utils")).unwrap();
        assert_eq!(by_dir.submodules, vec!["text"]);

        assert!(matches!(
            list_module_contents(&dir.path().join("missing")),
            Err(PxError::Input(_))
        ));
    }

    #[test]
    fn display_groups_sections() {
        let listing = list_source("pub struct A; fn b() {}").unwrap();
        let text = listing.to_string();
        assert!(text.contains("types:\n  pub struct A\n"));
        assert!(text.contains("functions:\n  fn b()\n"));
    }
}
