//! Type-annotation builders: pest pairs → `ast::TyExpr`.

use pest::iterators::Pair;

use super::expr::{invalid, string_value};
use super::Rule;
use crate::ast::{TyExpr, TyMember};
use crate::error::GenError;

pub(crate) fn build_type_expr(pair: Pair<Rule>) -> Result<TyExpr, GenError> {
    match pair.as_rule() {
        Rule::type_expr => {
            let members = pair
                .into_inner()
                .map(build_type_expr)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(collapse(members, TyExpr::Union))
        }
        Rule::ty_intersection => {
            let members = pair
                .into_inner()
                .map(build_type_expr)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(collapse(members, TyExpr::Intersection))
        }
        Rule::ty_postfix => {
            let mut inner = pair.into_inner();
            let head = inner
                .next()
                .ok_or_else(|| invalid("type without a primary"))?;
            let mut ty = build_type_expr(head)?;
            for suffix in inner {
                match suffix.as_rule() {
                    Rule::ty_array_suffix => ty = TyExpr::Array(Box::new(ty)),
                    other => return Err(invalid(format!("unexpected type suffix {other:?}"))),
                }
            }
            Ok(ty)
        }
        Rule::ty_ref => {
            let mut inner = pair.into_inner();
            let name = inner
                .next()
                .ok_or_else(|| invalid("type reference without a name"))?
                .as_str()
                .to_string();
            match inner.next() {
                Some(args_pair) => {
                    let args = args_pair
                        .into_inner()
                        .map(build_type_expr)
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(TyExpr::Generic { name, args })
                }
                None => Ok(TyExpr::Name(name)),
            }
        }
        Rule::ty_object => {
            let members = pair
                .into_inner()
                .map(build_ty_member)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(TyExpr::Object(members))
        }
        Rule::ty_func => Ok(TyExpr::Func),
        Rule::ty_paren => {
            let inner = pair
                .into_inner()
                .next()
                .ok_or_else(|| invalid("empty parenthesized type"))?;
            build_type_expr(inner)
        }
        Rule::string => Ok(TyExpr::StrLit(string_value(pair)?)),
        Rule::number => {
            let text = pair.as_str();
            let value: f64 = text
                .parse()
                .map_err(|_| invalid(format!("bad numeric literal type {text:?}")))?;
            Ok(TyExpr::NumLit(value))
        }
        Rule::boolean => Ok(TyExpr::BoolLit(pair.as_str() == "true")),
        other => Err(invalid(format!("expected type, got {other:?}"))),
    }
}

/// Interface / inline-object member: property signature or method signature.
pub(crate) fn build_ty_member(pair: Pair<Rule>) -> Result<TyMember, GenError> {
    match pair.as_rule() {
        Rule::prop_sig => {
            let mut name = String::new();
            let mut optional = false;
            let mut ty = None;
            for part in pair.into_inner() {
                match part.as_rule() {
                    Rule::ident => name = part.as_str().to_string(),
                    Rule::string => name = string_value(part)?,
                    Rule::optional_mark => optional = true,
                    Rule::type_expr => ty = Some(build_type_expr(part)?),
                    _ => {}
                }
            }
            let ty = ty.ok_or_else(|| invalid(format!("property {name} without a type")))?;
            Ok(TyMember { name, ty, optional })
        }
        // A method member is a callable property; its signature details are
        // irrelevant to schema synthesis.
        Rule::method_sig => {
            let mut name = String::new();
            let mut optional = false;
            for part in pair.into_inner() {
                match part.as_rule() {
                    Rule::ident if name.is_empty() => name = part.as_str().to_string(),
                    Rule::optional_mark => optional = true,
                    _ => {}
                }
            }
            Ok(TyMember { name, ty: TyExpr::Func, optional })
        }
        other => Err(invalid(format!("unexpected interface member {other:?}"))),
    }
}

fn collapse(mut members: Vec<TyExpr>, wrap: fn(Vec<TyExpr>) -> TyExpr) -> TyExpr {
    if members.len() == 1 {
        members.remove(0)
    } else {
        wrap(members)
    }
}

// ------------------------------- Tests ------------------------------------ //
