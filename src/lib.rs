//! routegen — derives runtime-validation schema expressions for tRPC
//! endpoints from decorated router sources.
//!
//! Hand-written schemas are flattened into self-contained expressions
//! (every local or imported reference inlined); procedures without an
//! explicit output schema can have one synthesized from the method's
//! declared return type. The result is the source text of a generated
//! route-table module.

pub mod ast;
pub mod cli;
pub mod error;
pub mod flatten;
pub mod ir;
pub mod lower;
pub mod meta;
pub mod parser;
pub mod path_de;
pub mod project;
pub mod render;
pub mod synth;
