// Strongly-typed AST for the TypeScript subset the generator consumes.
// One variant per syntax kind; rewriting happens on these trees, and text
// is produced exactly once, through `Display`.

use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

// ————————————————————————————————————————————————————————————————————————————
// EXPRESSIONS
// ————————————————————————————————————————————————————————————————————————————

/// A schema-builder expression (or any expression appearing in a `const`
/// initializer or decorator argument).
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(String),
    Str(String),
    Num(f64),
    Bool(bool),
    Null,
    Undefined,
    /// Unparsed leaf (arrow function, template literal). Preserved verbatim;
    /// the flattener never descends into it.
    Raw(String),
    Object(Vec<Property>),
    Array(Vec<Expr>),
    Call { callee: Box<Expr>, args: Vec<Expr> },
    Member { base: Box<Expr>, name: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: String,
    pub value: Expr,
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Ident(name) => f.write_str(name),
            Expr::Str(s) => write!(f, "'{}'", escape_single_quoted(s)),
            Expr::Num(n) => write!(f, "{n}"),
            Expr::Bool(b) => write!(f, "{b}"),
            Expr::Null => f.write_str("null"),
            Expr::Undefined => f.write_str("undefined"),
            Expr::Raw(src) => f.write_str(src),
            Expr::Object(props) => {
                if props.is_empty() {
                    return f.write_str("{}");
                }
                f.write_str("{ ")?;
                for (i, prop) in props.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    if is_ident_name(&prop.key) {
                        write!(f, "{}: {}", prop.key, prop.value)?;
                    } else {
                        write!(f, "'{}': {}", escape_single_quoted(&prop.key), prop.value)?;
                    }
                }
                f.write_str(" }")
            }
            Expr::Array(elems) => {
                f.write_str("[")?;
                for (i, elem) in elems.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{elem}")?;
                }
                f.write_str("]")
            }
            Expr::Call { callee, args } => {
                write!(f, "{callee}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            Expr::Member { base, name } => write!(f, "{base}.{name}"),
        }
    }
}

fn escape_single_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

pub fn is_ident_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

// ————————————————————————————————————————————————————————————————————————————
// TYPE ANNOTATIONS
// ————————————————————————————————————————————————————————————————————————————

/// A parsed type annotation, before resolution against the project.
#[derive(Debug, Clone, PartialEq)]
pub enum TyExpr {
    /// Bare name: a primitive keyword or a reference to a named declaration.
    Name(String),
    /// `Name<arg, ...>` — `Promise<T>`, `Array<T>`, or an unsupported generic.
    Generic { name: String, args: Vec<TyExpr> },
    /// `T[]`
    Array(Box<TyExpr>),
    StrLit(String),
    NumLit(f64),
    BoolLit(bool),
    /// Inline object type: `{ a: string; b(): void }`
    Object(Vec<TyMember>),
    Union(Vec<TyExpr>),
    Intersection(Vec<TyExpr>),
    /// Function type: `(...) => T`. Not serializable at runtime.
    Func,
}

/// One member of an interface or inline object type.
#[derive(Debug, Clone, PartialEq)]
pub struct TyMember {
    pub name: String,
    pub ty: TyExpr,
    pub optional: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// MODULES & DECLARATIONS
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq)]
pub struct ImportStmt {
    pub names: Vec<String>,
    /// The module specifier as written (`'./user.schema'`, `'zod'`).
    pub specifier: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecoratorNode {
    pub name: String,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub name: String,
    pub decorators: Vec<DecoratorNode>,
    pub return_ty: Option<TyExpr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: String,
    pub decorators: Vec<DecoratorNode>,
    pub methods: IndexMap<String, MethodDecl>,
}

/// One parsed source file. Owns every node parsed from it; all tables keep
/// declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub path: PathBuf,
    pub imports: Vec<ImportStmt>,
    pub consts: IndexMap<String, Expr>,
    pub interfaces: IndexMap<String, Vec<TyMember>>,
    pub aliases: IndexMap<String, TyExpr>,
    pub classes: IndexMap<String, ClassDecl>,
}

impl Module {
    pub fn new(path: &Path) -> Self {
        Module {
            path: path.to_path_buf(),
            imports: Vec::new(),
            consts: IndexMap::new(),
            interfaces: IndexMap::new(),
            aliases: IndexMap::new(),
            classes: IndexMap::new(),
        }
    }

    /// Local `const` declaration initializer, if any.
    pub fn const_decl(&self, name: &str) -> Option<&Expr> {
        self.consts.get(name)
    }

    pub fn class(&self, name: &str) -> Option<&ClassDecl> {
        self.classes.get(name)
    }

    /// The import statement that binds `name` in this file, if any.
    pub fn import_binding(&self, name: &str) -> Option<&ImportStmt> {
        self.imports
            .iter()
            .find(|import| import.names.iter().any(|n| n == name))
    }
}

// ------------------------------- Tests ------------------------------------ //
