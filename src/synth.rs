//! Type-directed schema synthesis: `ir::Ty` → a schema-builder fragment.

use crate::ir::{Lit, Ty};

/// Emit the schema fragment for `ty`.
///
/// Fragments end with a trailing `,` so they concatenate safely inside an
/// enclosing object enumeration; the one exception is the empty fragment
/// produced for callable shapes, which contributes nothing at all.
pub fn synthesize(ty: &Ty) -> String {
    let body = synth_expr(ty);
    if body.is_empty() { body } else { format!("{body},") }
}

// Dispatch order matters: promise-unwrapping precedes every structural
// check, literals precede their primitive kinds, and callable detection
// precedes generic object handling.
fn synth_expr(ty: &Ty) -> String {
    match ty {
        // 1) async return types are ubiquitous; the wrapper is invisible
        Ty::Promise(inner) => synth_expr(inner),
        // 2) a function cannot be validated at runtime
        Ty::Function => String::new(),
        // 3) a literal type is also its primitive kind; match it first
        Ty::Literal(lit) => format!("z.literal({lit})"),
        // 4) primitives
        Ty::String => "z.string()".to_string(),
        Ty::Boolean => "z.boolean()".to_string(),
        Ty::Null => "z.null()".to_string(),
        Ty::Number => "z.number()".to_string(),
        Ty::Undefined => "z.undefined()".to_string(),
        // 5) composites
        Ty::Array(elem) => format!("z.array({})", synth_expr(elem)),
        Ty::Object { props } => {
            let mut out = String::from("z.object({");
            for prop in props {
                if prop.ty == Ty::Function {
                    continue; // methods are not serializable; omitted silently
                }
                out.push_str(&prop.name);
                out.push_str(": ");
                out.push_str(&synth_expr(&prop.ty));
                out.push(',');
            }
            out.push_str("})");
            out
        }
        Ty::Union(members) => {
            let inner: Vec<String> = members.iter().map(synth_expr).collect();
            format!("z.union([{}])", inner.join(", "))
        }
        Ty::Intersection(members) => {
            let mut iter = members.iter();
            let mut out = iter.next().map(synth_expr).unwrap_or_default();
            for member in iter {
                out.push_str(".and(");
                out.push_str(&synth_expr(member));
                out.push(')');
            }
            out
        }
        Ty::Void => "z.void()".to_string(),
        // 6) everything else accepts anything
        Ty::Unknown => "z.any()".to_string(),
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use ordered_float::OrderedFloat;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ir::{Lit, Prop, Ty};

    fn obj(props: &[(&str, Ty)]) -> Ty {
        Ty::Object {
            props: props
                .iter()
                .map(|(name, ty)| Prop { name: name.to_string(), ty: ty.clone() })
                .collect(),
        }
    }

    #[test]
    fn primitives_end_with_the_separator() {
        assert_eq!(synthesize(&Ty::String), "z.string(),");
        assert_eq!(synthesize(&Ty::Boolean), "z.boolean(),");
        assert_eq!(synthesize(&Ty::Null), "z.null(),");
        assert_eq!(synthesize(&Ty::Number), "z.number(),");
        assert_eq!(synthesize(&Ty::Undefined), "z.undefined(),");
        assert_eq!(synthesize(&Ty::Void), "z.void(),");
        assert_eq!(synthesize(&Ty::Unknown), "z.any(),");
    }

    #[test]
    fn literals_embed_their_value() {
        assert_eq!(
            synthesize(&Ty::Literal(Lit::Str("active".into()))),
            "z.literal('active'),"
        );
        assert_eq!(
            synthesize(&Ty::Literal(Lit::Num(OrderedFloat(42.0)))),
            "z.literal(42),"
        );
        assert_eq!(synthesize(&Ty::Literal(Lit::Bool(true))), "z.literal(true),");
    }

    #[test]
    fn arrays_wrap_their_element() {
        assert_eq!(
            synthesize(&Ty::Array(Box::new(Ty::String))),
            "z.array(z.string()),"
        );
    }

    #[test]
    fn promise_wrappers_are_invisible() {
        assert_eq!(synthesize(&Ty::Promise(Box::new(Ty::Number))), "z.number(),");
        assert_eq!(
            synthesize(&Ty::Promise(Box::new(Ty::Array(Box::new(Ty::Boolean))))),
            "z.array(z.boolean()),"
        );
    }

    #[test]
    fn objects_enumerate_properties_in_declared_order() {
        let ty = obj(&[("a", Ty::String), ("b", Ty::Number)]);
        assert_eq!(synthesize(&ty), "z.object({a: z.string(),b: z.number(),}),");
    }

    #[test]
    fn callable_properties_are_omitted_entirely() {
        let ty = obj(&[("id", Ty::String), ("greet", Ty::Function)]);
        assert_eq!(synthesize(&ty), "z.object({id: z.string(),}),");
    }

    #[test]
    fn callable_shapes_yield_an_empty_fragment() {
        assert_eq!(synthesize(&Ty::Function), "");
    }

    #[test]
    fn unions_list_members_in_declared_order() {
        let ty = Ty::Union(vec![Ty::String, Ty::Number]);
        assert_eq!(synthesize(&ty), "z.union([z.string(), z.number()]),");
    }

    #[test]
    fn intersections_chain_with_and() {
        let ty = Ty::Intersection(vec![
            obj(&[("a", Ty::String)]),
            obj(&[("b", Ty::Number)]),
        ]);
        assert_eq!(
            synthesize(&ty),
            "z.object({a: z.string(),}).and(z.object({b: z.number(),})),"
        );
    }
}
