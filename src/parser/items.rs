//! Item builders: pest pairs → `ast::Module` and its declaration tables.

use std::path::Path;

use pest::iterators::Pair;

use super::expr::{build_expr, invalid, string_value};
use super::types::{build_ty_member, build_type_expr};
use super::Rule;
use crate::ast::{ClassDecl, DecoratorNode, ImportStmt, MethodDecl, Module};
use crate::error::GenError;

pub(super) fn build_module(path: &Path, module_pair: Pair<Rule>) -> Result<Module, GenError> {
    let mut module = Module::new(path);
    for item in module_pair.into_inner() {
        match item.as_rule() {
            Rule::import_stmt => module.imports.push(build_import(item)?),
            Rule::const_decl => {
                let (name, init) = build_const(item)?;
                module.consts.insert(name, init);
            }
            Rule::type_alias => {
                let mut name = String::new();
                let mut ty = None;
                for part in item.into_inner() {
                    match part.as_rule() {
                        Rule::ident => name = part.as_str().to_string(),
                        Rule::type_expr => ty = Some(build_type_expr(part)?),
                        _ => {}
                    }
                }
                let ty = ty.ok_or_else(|| invalid(format!("type alias {name} without a body")))?;
                module.aliases.insert(name, ty);
            }
            Rule::interface_decl => {
                let mut name = String::new();
                let mut members = Vec::new();
                for part in item.into_inner() {
                    match part.as_rule() {
                        Rule::ident if name.is_empty() => name = part.as_str().to_string(),
                        Rule::prop_sig | Rule::method_sig => members.push(build_ty_member(part)?),
                        // extends clauses are recorded nowhere: base members are
                        // not folded in, matching a shallow property walk.
                        _ => {}
                    }
                }
                module.interfaces.insert(name, members);
            }
            Rule::class_decl => {
                let class = build_class(item)?;
                module.classes.insert(class.name.clone(), class);
            }
            Rule::EOI => {}
            other => return Err(invalid(format!("unexpected top-level item {other:?}"))),
        }
    }
    Ok(module)
}

fn build_import(pair: Pair<Rule>) -> Result<ImportStmt, GenError> {
    let mut names = Vec::new();
    let mut specifier = None;
    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::ident => names.push(part.as_str().to_string()),
            Rule::string => specifier = Some(string_value(part)?),
            _ => {}
        }
    }
    let specifier = specifier.ok_or_else(|| invalid("import without a specifier"))?;
    Ok(ImportStmt { names, specifier })
}

fn build_const(pair: Pair<Rule>) -> Result<(String, crate::ast::Expr), GenError> {
    let mut name = String::new();
    let mut init = None;
    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::ident => name = part.as_str().to_string(),
            Rule::expr => init = Some(build_expr(part)?),
            // the declared-type annotation is irrelevant to flattening
            _ => {}
        }
    }
    let init = init.ok_or_else(|| invalid(format!("const {name} without an initializer")))?;
    Ok((name, init))
}

fn build_class(pair: Pair<Rule>) -> Result<ClassDecl, GenError> {
    let mut name = String::new();
    let mut decorators = Vec::new();
    let mut methods = indexmap::IndexMap::new();
    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::decorator => decorators.push(build_decorator(part)?),
            Rule::ident if name.is_empty() => name = part.as_str().to_string(),
            Rule::method_decl => {
                let method = build_method(part)?;
                methods.insert(method.name.clone(), method);
            }
            // plain fields carry no procedure metadata
            Rule::class_prop => {}
            _ => {}
        }
    }
    Ok(ClassDecl { name, decorators, methods })
}

fn build_method(pair: Pair<Rule>) -> Result<MethodDecl, GenError> {
    let mut name = String::new();
    let mut decorators = Vec::new();
    let mut return_ty = None;
    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::decorator => decorators.push(build_decorator(part)?),
            Rule::ident if name.is_empty() => name = part.as_str().to_string(),
            Rule::type_expr => return_ty = Some(build_type_expr(part)?),
            // parameters and the body are skipped
            _ => {}
        }
    }
    Ok(MethodDecl { name, decorators, return_ty })
}

fn build_decorator(pair: Pair<Rule>) -> Result<DecoratorNode, GenError> {
    let mut inner = pair.into_inner();
    let name = inner
        .next()
        .ok_or_else(|| invalid("decorator without a name"))?
        .as_str()
        .to_string();
    let args = match inner.next() {
        Some(args_pair) => args_pair
            .into_inner()
            .map(build_expr)
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };
    Ok(DecoratorNode { name, args })
}

// ------------------------------- Tests ------------------------------------ //
