//! Schema flattener.
//!
//! Rewrites a schema-builder expression so that every reference to a
//! locally- or externally-defined fragment is replaced by its full
//! definition, producing one self-contained expression. Rewriting is
//! structural: trees are rebuilt child by child and printed once at the
//! end, so two subtrees with identical source text can never capture each
//! other's substitutions, and each subtree is visited exactly once.

use std::path::PathBuf;

use indexmap::IndexMap;

use crate::ast::{Expr, Module, Property};
use crate::error::GenError;
use crate::project::Project;

/// The schema-builder namespace. Calls whose chain root is this identifier
/// are primitives/combinators of the builder library and are never inlined.
pub const SCHEMA_NAMESPACE: &str = "z";

pub struct Flattener<'p> {
    project: &'p Project,
    /// Bare factory callees that must be imported into the generated file,
    /// mapped to the specifier binding them at their use site (if any).
    needed_imports: IndexMap<String, Option<String>>,
    /// (defining file, const name) pairs currently being inlined. A revisit
    /// means a cyclic definition; the identifier is left in place.
    in_flight: Vec<(PathBuf, String)>,
}

impl<'p> Flattener<'p> {
    pub fn new(project: &'p Project) -> Self {
        Flattener {
            project,
            needed_imports: IndexMap::new(),
            in_flight: Vec::new(),
        }
    }

    pub fn needed_imports(&self) -> &IndexMap<String, Option<String>> {
        &self.needed_imports
    }

    pub fn into_needed_imports(self) -> IndexMap<String, Option<String>> {
        self.needed_imports
    }

    /// Flatten `expr` as it appears in `module`. Identifiers that resolve
    /// nowhere are left untouched (namespace or intrinsic references);
    /// failing to load a module referenced by an import is a hard error.
    pub fn flatten(&mut self, expr: &Expr, module: &Module) -> Result<Expr, GenError> {
        match expr {
            Expr::Ident(name) => self.flatten_ident(name, module),
            Expr::Object(props) => {
                let props = props
                    .iter()
                    .map(|prop| {
                        Ok(Property {
                            key: prop.key.clone(),
                            value: self.flatten(&prop.value, module)?,
                        })
                    })
                    .collect::<Result<Vec<_>, GenError>>()?;
                Ok(Expr::Object(props))
            }
            Expr::Array(elems) => {
                let elems = elems
                    .iter()
                    .map(|elem| self.flatten(elem, module))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Expr::Array(elems))
            }
            Expr::Call { callee, args } => self.flatten_call(callee, args, module),
            Expr::Member { base, name } => Ok(Expr::Member {
                base: Box::new(self.flatten(base, module)?),
                name: name.clone(),
            }),
            // literals and opaque leaves
            other => Ok(other.clone()),
        }
    }

    fn flatten_ident(&mut self, name: &str, module: &Module) -> Result<Expr, GenError> {
        if let Some(init) = module.const_decl(name) {
            let key = (module.path.clone(), name.to_string());
            if self.in_flight.contains(&key) {
                return Ok(Expr::Ident(name.to_string()));
            }
            self.in_flight.push(key);
            let result = self.flatten(init, module);
            self.in_flight.pop();
            return result;
        }
        let imports = self.project.import_map(module)?;
        if let Some(imported) = imports.get(name) {
            let key = (imported.module.path.clone(), name.to_string());
            if self.in_flight.contains(&key) {
                return Ok(Expr::Ident(name.to_string()));
            }
            self.in_flight.push(key);
            let result = self.flatten(&imported.initializer, &imported.module);
            self.in_flight.pop();
            return result;
        }
        Ok(Expr::Ident(name.to_string()))
    }

    fn flatten_call(
        &mut self,
        callee: &Expr,
        args: &[Expr],
        module: &Module,
    ) -> Result<Expr, GenError> {
        let callee = match callee {
            // A member callee keeps its member name; only the base is
            // rewritten (`userColumns.shape.name` → inlined base `.name`).
            Expr::Member { base, name } => Expr::Member {
                base: Box::new(self.flatten(base, module)?),
                name: name.clone(),
            },
            // A bare callee outside the builder namespace is an external
            // factory: preserved verbatim, with its import recorded for the
            // generated file.
            other => {
                if chain_root(other) != Some(SCHEMA_NAMESPACE) {
                    self.register_factory_import(other, module);
                }
                other.clone()
            }
        };
        let args = args
            .iter()
            .map(|arg| self.flatten(arg, module))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Expr::Call { callee: Box::new(callee), args })
    }

    fn register_factory_import(&mut self, callee: &Expr, module: &Module) {
        let Some(root) = chain_root(callee) else { return };
        let specifier = module
            .import_binding(root)
            .map(|import| import.specifier.clone());
        self.needed_imports
            .entry(root.to_string())
            .or_insert(specifier);
    }
}

/// Left-most identifier of an identifier/member/call chain:
/// `z.object(...).optional` → `z`, `wrapPaginated(x)` → `wrapPaginated`.
pub fn chain_root(expr: &Expr) -> Option<&str> {
    match expr {
        Expr::Ident(name) => Some(name),
        Expr::Member { base, .. } => chain_root(base),
        Expr::Call { callee, .. } => chain_root(callee),
        _ => None,
    }
}

// ------------------------------- Tests ------------------------------------ //
