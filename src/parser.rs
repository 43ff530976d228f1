//! Pest front end for the TypeScript subset the generator consumes.
//!
//! Three entry points: whole modules, bare expressions, bare type
//! annotations. The latter two exist for tests and the `flatten` debug
//! command; generation itself always goes through [`parse_module`].

pub mod expr;
pub mod items;
pub mod types;

use std::path::Path;

use pest::Parser;

use crate::ast::{Expr, Module, TyExpr};
use crate::error::GenError;

#[derive(pest_derive::Parser)]
#[grammar = "routegen.pest"]
pub struct SubsetParser;

pub fn parse_module(path: &Path, source: &str) -> Result<Module, GenError> {
    let mut pairs = SubsetParser::parse(Rule::module, source)
        .map_err(|e| parse_error(path, e.to_string()))?;
    let module_pair = pairs
        .next()
        .ok_or_else(|| parse_error(path, "empty parse".to_string()))?;
    items::build_module(path, module_pair)
}

/// Parse a single expression. Trailing input is rejected.
pub fn parse_expression(source: &str) -> Result<Expr, GenError> {
    let pair = parse_single(Rule::expr, source)?;
    expr::build_expr(pair)
}

/// Parse a single type annotation. Trailing input is rejected.
pub fn parse_type_expression(source: &str) -> Result<TyExpr, GenError> {
    let pair = parse_single(Rule::type_expr, source)?;
    types::build_type_expr(pair)
}

fn parse_single(rule: Rule, source: &str) -> Result<pest::iterators::Pair<'_, Rule>, GenError> {
    let snippet = Path::new("<input>");
    let mut pairs =
        SubsetParser::parse(rule, source).map_err(|e| parse_error(snippet, e.to_string()))?;
    let pair = pairs
        .next()
        .ok_or_else(|| parse_error(snippet, "empty parse".to_string()))?;
    let consumed = pair.as_span().end();
    if source[consumed..].trim().is_empty() {
        Ok(pair)
    } else {
        Err(parse_error(
            snippet,
            format!("trailing input after expression: {:?}", &source[consumed..]),
        ))
    }
}

fn parse_error(path: &Path, message: String) -> GenError {
    GenError::Parse { path: path.to_path_buf(), message }
}
