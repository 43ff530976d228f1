// Strongly-typed descriptor of a declared type, after resolution. This is
// what the synthesizer walks; no annotation syntax survives past lowering.

use std::fmt;

use ordered_float::OrderedFloat;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ty {
    String,
    Boolean,
    Number,
    Null,
    Undefined,
    Void,
    Literal(Lit),
    Array(Box<Ty>),
    Object {
        props: Vec<Prop>, // declaration order, preserved for deterministic output
    },
    Union(Vec<Ty>),
    Intersection(Vec<Ty>),
    /// `Promise<T>`; invisible in synthesized output.
    Promise(Box<Ty>),
    /// A callable shape. Not serializable at runtime.
    Function,
    /// Anything the taxonomy does not cover (unknown, symbol, unresolved
    /// references); degrades to the accept-anything wrapper.
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prop {
    pub name: String,
    pub ty: Ty,
}

/// The value embedded in a literal type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lit {
    Str(String),
    Num(OrderedFloat<f64>),
    Bool(bool),
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // quoted, so the emitted expression stays well-formed
            Lit::Str(s) => write!(f, "'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
            Lit::Num(n) => write!(f, "{n}"),
            Lit::Bool(b) => write!(f, "{b}"),
        }
    }
}
