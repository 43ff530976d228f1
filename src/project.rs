//! Project-wide file registry.
//!
//! `Project` is the explicit parse cache: modules are parsed lazily, once,
//! keyed by lexically-normalized path. A `Project` lives for exactly one
//! generation run; dropping it is the cache invalidation rule.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::rc::Rc;

use indexmap::IndexMap;

use crate::ast::{Expr, Module, TyExpr, TyMember};
use crate::error::GenError;
use crate::parser;

/// One entry of a file's Import Map: the imported declaration plus the
/// file it originates from.
#[derive(Debug, Clone)]
pub struct ImportedDecl {
    pub initializer: Expr,
    pub module: Rc<Module>,
}

/// Imported name → originating declaration, for one file.
pub type ImportMap = IndexMap<String, ImportedDecl>;

/// A named type declaration found in some module.
#[derive(Debug, Clone)]
pub enum TypeDef {
    Interface(Vec<TyMember>),
    Alias(TyExpr),
}

#[derive(Default)]
pub struct Project {
    modules: RefCell<HashMap<PathBuf, Rc<Module>>>,
    import_maps: RefCell<HashMap<PathBuf, Rc<ImportMap>>>,
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse-or-fetch the module at `path`.
    pub fn module(&self, path: &Path) -> Result<Rc<Module>, GenError> {
        let key = normalize(path);
        if let Some(found) = self.modules.borrow().get(&key) {
            return Ok(Rc::clone(found));
        }
        let source = std::fs::read_to_string(&key)
            .map_err(|e| GenError::Io { path: key.clone(), source: e })?;
        let module = Rc::new(parser::parse_module(&key, &source)?);
        self.modules
            .borrow_mut()
            .insert(key, Rc::clone(&module));
        Ok(module)
    }

    /// Register a module from in-memory source (tests and tooling).
    pub fn add_source(&self, path: &Path, source: &str) -> Result<Rc<Module>, GenError> {
        let key = normalize(path);
        let module = Rc::new(parser::parse_module(&key, source)?);
        self.modules
            .borrow_mut()
            .insert(key, Rc::clone(&module));
        Ok(module)
    }

    /// Import Map for `module`. Only relative specifiers resolve against the
    /// file system; package imports (`'zod'`) never appear in the map, so
    /// their names behave as intrinsic references downstream.
    pub fn import_map(&self, module: &Module) -> Result<Rc<ImportMap>, GenError> {
        let key = normalize(&module.path);
        if let Some(found) = self.import_maps.borrow().get(&key) {
            return Ok(Rc::clone(found));
        }
        let mut map = ImportMap::new();
        for import in &module.imports {
            let Some(target) = resolve_specifier(&module.path, &import.specifier) else {
                continue;
            };
            let origin = self.module(&target)?;
            for name in &import.names {
                if let Some(init) = origin.const_decl(name) {
                    map.insert(
                        name.clone(),
                        ImportedDecl {
                            initializer: init.clone(),
                            module: Rc::clone(&origin),
                        },
                    );
                }
            }
        }
        let map = Rc::new(map);
        self.import_maps.borrow_mut().insert(key, Rc::clone(&map));
        Ok(map)
    }

    /// Resolve a named type reference: local interface or alias first, then
    /// one import hop into the originating file.
    pub fn resolve_type(
        &self,
        module: &Rc<Module>,
        name: &str,
    ) -> Result<Option<(Rc<Module>, TypeDef)>, GenError> {
        if let Some(members) = module.interfaces.get(name) {
            return Ok(Some((Rc::clone(module), TypeDef::Interface(members.clone()))));
        }
        if let Some(ty) = module.aliases.get(name) {
            return Ok(Some((Rc::clone(module), TypeDef::Alias(ty.clone()))));
        }
        if let Some(import) = module.import_binding(name) {
            if let Some(target) = resolve_specifier(&module.path, &import.specifier) {
                let origin = self.module(&target)?;
                if let Some(members) = origin.interfaces.get(name) {
                    return Ok(Some((Rc::clone(&origin), TypeDef::Interface(members.clone()))));
                }
                if let Some(ty) = origin.aliases.get(name) {
                    return Ok(Some((Rc::clone(&origin), TypeDef::Alias(ty.clone()))));
                }
            }
        }
        Ok(None)
    }
}

/// `'./user.schema'` relative to the importing file, with the `.ts`
/// extension implied. Non-relative specifiers are package imports and
/// resolve to nothing.
fn resolve_specifier(from: &Path, specifier: &str) -> Option<PathBuf> {
    if !specifier.starts_with("./") && !specifier.starts_with("../") {
        return None;
    }
    let with_ext = if specifier.ends_with(".ts") {
        specifier.to_string()
    } else {
        format!("{specifier}.ts")
    };
    let dir = from.parent().unwrap_or_else(|| Path::new(""));
    Some(normalize(&dir.join(with_ext)))
}

/// Lexical normalization (no filesystem access): drops `.`, folds `..`.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

// ------------------------------- Tests ------------------------------------ //
