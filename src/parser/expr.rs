//! Expression builders: pest pairs → `ast::Expr`.

use pest::iterators::Pair;

use super::Rule;
use crate::ast::{Expr, Property};
use crate::error::GenError;

pub(super) fn invalid(message: impl Into<String>) -> GenError {
    GenError::Parse { path: "<ast>".into(), message: message.into() }
}

pub(crate) fn build_expr(pair: Pair<Rule>) -> Result<Expr, GenError> {
    match pair.as_rule() {
        Rule::expr => {
            let mut inner = pair.into_inner();
            let head = inner
                .next()
                .ok_or_else(|| invalid("expression without a primary"))?;
            let mut acc = build_primary(head)?;
            for op in inner {
                match op.as_rule() {
                    Rule::call_args => {
                        let args = op
                            .into_inner()
                            .map(build_expr)
                            .collect::<Result<Vec<_>, _>>()?;
                        acc = Expr::Call { callee: Box::new(acc), args };
                    }
                    Rule::member_access => {
                        let name = op
                            .into_inner()
                            .next()
                            .ok_or_else(|| invalid("member access without a name"))?
                            .as_str()
                            .to_string();
                        acc = Expr::Member { base: Box::new(acc), name };
                    }
                    other => return Err(invalid(format!("unexpected postfix {other:?}"))),
                }
            }
            Ok(acc)
        }
        other => Err(invalid(format!("expected expression, got {other:?}"))),
    }
}

fn build_primary(pair: Pair<Rule>) -> Result<Expr, GenError> {
    match pair.as_rule() {
        Rule::ident => Ok(Expr::Ident(pair.as_str().to_string())),
        Rule::string => Ok(Expr::Str(string_value(pair)?)),
        Rule::number => {
            let text = pair.as_str();
            let value: f64 = text
                .parse()
                .map_err(|_| invalid(format!("bad number literal {text:?}")))?;
            Ok(Expr::Num(value))
        }
        Rule::boolean => Ok(Expr::Bool(pair.as_str() == "true")),
        Rule::null_lit => Ok(Expr::Null),
        Rule::undefined_lit => Ok(Expr::Undefined),
        Rule::template | Rule::arrow_fn => Ok(Expr::Raw(pair.as_str().to_string())),
        Rule::paren_expr => {
            let inner = pair
                .into_inner()
                .next()
                .ok_or_else(|| invalid("empty parenthesized expression"))?;
            build_expr(inner)
        }
        Rule::object_lit => {
            let props = pair
                .into_inner()
                .map(build_obj_prop)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Expr::Object(props))
        }
        Rule::array_lit => {
            let elems = pair
                .into_inner()
                .map(build_expr)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Expr::Array(elems))
        }
        other => Err(invalid(format!("unexpected primary {other:?}"))),
    }
}

fn build_obj_prop(pair: Pair<Rule>) -> Result<Property, GenError> {
    let mut inner = pair.into_inner();
    let key_pair = inner
        .next()
        .ok_or_else(|| invalid("object property without a key"))?;
    let key = match key_pair.as_rule() {
        Rule::ident => key_pair.as_str().to_string(),
        Rule::string => string_value(key_pair)?,
        other => return Err(invalid(format!("unexpected property key {other:?}"))),
    };
    let value_pair = inner
        .next()
        .ok_or_else(|| invalid("object property without a value"))?;
    Ok(Property { key, value: build_expr(value_pair)? })
}

/// Unescaped content of a `string` pair.
pub(crate) fn string_value(pair: Pair<Rule>) -> Result<String, GenError> {
    let inner = pair
        .into_inner()
        .next()
        .ok_or_else(|| invalid("string literal without inner content"))?;
    Ok(unescape(inner.as_str()))
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use crate::ast::Expr;
    use crate::parser::parse_expression;

    #[test]
    fn parses_a_builder_chain() {
        let expr = parse_expression("z.array(z.object({ example: z.string() })).optional()")
            .expect("parse");
        assert_eq!(
            expr.to_string(),
            "z.array(z.object({ example: z.string() })).optional()"
        );
    }

    #[test]
    fn parses_literals() {
        assert_eq!(parse_expression("'hi'").expect("parse"), Expr::Str("hi".into()));
        assert_eq!(parse_expression("-2.5").expect("parse"), Expr::Num(-2.5));
        assert_eq!(parse_expression("true").expect("parse"), Expr::Bool(true));
        assert_eq!(parse_expression("null").expect("parse"), Expr::Null);
    }

    #[test]
    fn arrow_functions_are_opaque_leaves() {
        let expr = parse_expression("z.string().refine((v) => v)").expect("parse");
        let Expr::Call { args, .. } = expr else { panic!("expected call") };
        assert_eq!(args[0], Expr::Raw("(v) => v".into()));
    }

    #[test]
    fn rejects_trailing_garbage() {
        assert!(parse_expression("z.string() %%%").is_err());
    }
}
