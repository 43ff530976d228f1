//! Lowering: parsed type annotations → `ir::Ty` descriptors.
//!
//! Named references are resolved through the project (local declarations
//! first, then one import hop). Anything unresolved or outside the
//! taxonomy lowers to `Ty::Unknown` rather than failing.

use std::path::PathBuf;
use std::rc::Rc;

use once_cell::sync::Lazy;

use crate::ast::{Module, TyExpr, TyMember};
use crate::error::GenError;
use crate::ir::{Lit, Prop, Ty};
use crate::project::{Project, TypeDef};

static PRIMITIVES: Lazy<Vec<(&'static str, Ty)>> = Lazy::new(|| {
    vec![
        ("string", Ty::String),
        ("boolean", Ty::Boolean),
        ("number", Ty::Number),
        ("null", Ty::Null),
        ("undefined", Ty::Undefined),
        ("void", Ty::Void),
    ]
});

pub fn lower_to_ir(
    annotation: &TyExpr,
    module: &Rc<Module>,
    project: &Project,
) -> Result<Ty, GenError> {
    lower_inner(annotation, module, project, &mut Vec::new())
}

fn lower_inner(
    annotation: &TyExpr,
    module: &Rc<Module>,
    project: &Project,
    seen: &mut Vec<(PathBuf, String)>,
) -> Result<Ty, GenError> {
    match annotation {
        TyExpr::Name(name) => {
            if let Some((_, ty)) = PRIMITIVES.iter().find(|(kw, _)| kw == name) {
                return Ok(ty.clone());
            }
            lower_named(name, module, project, seen)
        }
        TyExpr::Generic { name, args } => match (name.as_str(), args.as_slice()) {
            ("Promise", [inner]) => Ok(Ty::Promise(Box::new(lower_inner(
                inner, module, project, seen,
            )?))),
            ("Array", [inner]) => Ok(Ty::Array(Box::new(lower_inner(
                inner, module, project, seen,
            )?))),
            // other generics are outside the taxonomy
            _ => Ok(Ty::Unknown),
        },
        TyExpr::Array(inner) => Ok(Ty::Array(Box::new(lower_inner(
            inner, module, project, seen,
        )?))),
        TyExpr::StrLit(s) => Ok(Ty::Literal(Lit::Str(s.clone()))),
        TyExpr::NumLit(n) => Ok(Ty::Literal(Lit::Num((*n).into()))),
        TyExpr::BoolLit(b) => Ok(Ty::Literal(Lit::Bool(*b))),
        TyExpr::Object(members) => lower_object(members, module, project, seen),
        TyExpr::Union(members) => {
            let members = members
                .iter()
                .map(|m| lower_inner(m, module, project, seen))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Ty::Union(members))
        }
        TyExpr::Intersection(members) => {
            let members = members
                .iter()
                .map(|m| lower_inner(m, module, project, seen))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Ty::Intersection(members))
        }
        TyExpr::Func => Ok(Ty::Function),
    }
}

fn lower_object(
    members: &[TyMember],
    module: &Rc<Module>,
    project: &Project,
    seen: &mut Vec<(PathBuf, String)>,
) -> Result<Ty, GenError> {
    let mut props = Vec::with_capacity(members.len());
    for member in members {
        let ty = lower_inner(&member.ty, module, project, seen)?;
        // `a?: T` is presented as `T | undefined`; optional methods stay
        // plain callables so they are still skipped during synthesis.
        let ty = if member.optional && ty != Ty::Function {
            Ty::Union(vec![ty, Ty::Undefined])
        } else {
            ty
        };
        props.push(Prop { name: member.name.clone(), ty });
    }
    Ok(Ty::Object { props })
}

fn lower_named(
    name: &str,
    module: &Rc<Module>,
    project: &Project,
    seen: &mut Vec<(PathBuf, String)>,
) -> Result<Ty, GenError> {
    match project.resolve_type(module, name)? {
        Some((origin, def)) => {
            let key = (origin.path.clone(), name.to_string());
            if seen.contains(&key) {
                // recursive type; cannot be expressed as a finite expression
                return Ok(Ty::Unknown);
            }
            seen.push(key);
            let result = match def {
                TypeDef::Interface(members) => lower_object(&members, &origin, project, seen),
                TypeDef::Alias(ty) => lower_inner(&ty, &origin, project, seen),
            };
            seen.pop();
            result
        }
        None => Ok(Ty::Unknown),
    }
}

// ------------------------------- Tests ------------------------------------ //
