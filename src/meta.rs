//! Generator metadata: router descriptors as reported by the metadata
//! provider, and the serialized shapes the renderer consumes.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The two procedure-kind marker decorators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcedureKind {
    Query,
    Mutation,
}

impl ProcedureKind {
    pub fn from_decorator(name: &str) -> Option<Self> {
        match name {
            "Query" => Some(ProcedureKind::Query),
            "Mutation" => Some(ProcedureKind::Mutation),
            _ => None,
        }
    }

    /// Lower-cased builder method name.
    pub fn keyword(self) -> &'static str {
        match self {
            ProcedureKind::Query => "query",
            ProcedureKind::Mutation => "mutation",
        }
    }
}

/// One router as reported by the metadata provider: where to find the live
/// declaration, and which methods are procedures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterMeta {
    pub name: String,
    /// Overrides the name-derived router key when present.
    #[serde(default)]
    pub alias: Option<String>,
    pub path: PathBuf,
    pub procedures: Vec<String>,
}

/// Serialized decorator: argument name → textual expression. Arguments keep
/// their stored order and each key is unique per decorator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecoratorMeta {
    pub name: String,
    #[serde(default)]
    pub arguments: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcedureGenMeta {
    pub name: String,
    pub decorators: Vec<DecoratorMeta>,
}

impl ProcedureGenMeta {
    /// The query/mutation marker decorator, if any.
    pub fn kind_decorator(&self) -> Option<(&DecoratorMeta, ProcedureKind)> {
        self.decorators
            .iter()
            .find_map(|d| ProcedureKind::from_decorator(&d.name).map(|kind| (d, kind)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterGenMeta {
    pub name: String,
    pub alias: Option<String>,
    pub procedures: Vec<ProcedureGenMeta>,
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn router_metadata_deserializes_without_alias() {
        let routers: Vec<RouterMeta> = serde_json::from_str(
            r#"[{"name": "UserRouter", "path": "app/user.router.ts", "procedures": ["getUser"]}]"#,
        )
        .expect("deserialize");
        assert_eq!(routers[0].alias, None);
        assert_eq!(routers[0].procedures, vec!["getUser".to_string()]);
    }

    #[test]
    fn kind_decorator_picks_the_first_marker() {
        let procedure = ProcedureGenMeta {
            name: "getUser".into(),
            decorators: vec![
                DecoratorMeta { name: "UseMiddlewares".into(), arguments: IndexMap::new() },
                DecoratorMeta { name: "Query".into(), arguments: IndexMap::new() },
            ],
        };
        let (_, kind) = procedure.kind_decorator().expect("marker");
        assert_eq!(kind, ProcedureKind::Query);
        assert_eq!(kind.keyword(), "query");
    }
}
