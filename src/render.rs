//! Procedure/router serialization and generated-module assembly.
//!
//! Thin orchestration: locate declarations, extract decorator metadata,
//! flatten explicit schemas, synthesize missing output schemas, and join
//! the resulting fragments. All lookups fail fast; a missing router or
//! method aborts the whole run so the emitted route table stays internally
//! consistent.

use std::rc::Rc;

use heck::ToLowerCamelCase;
use indexmap::IndexMap;

use crate::ast::{DecoratorNode, Expr, MethodDecl, Module};
use crate::error::GenError;
use crate::flatten::Flattener;
use crate::ir::Ty;
use crate::lower;
use crate::meta::{DecoratorMeta, ProcedureGenMeta, ProcedureKind, RouterGenMeta, RouterMeta};
use crate::project::Project;
use crate::synth;

/// Names the generated file must import, mapped to the specifier that bound
/// them at their original use site (when known).
pub type ImportRequests = IndexMap<String, Option<String>>;

pub struct Serializer<'p> {
    project: &'p Project,
    /// When set, a query/mutation decorator lacking an `output` argument
    /// gets one synthesized from the method's declared return type.
    auto_output: bool,
}

impl<'p> Serializer<'p> {
    pub fn new(project: &'p Project, auto_output: bool) -> Self {
        Serializer { project, auto_output }
    }

    /// Serialize every router, in order. Returns the serialized metadata
    /// plus the imports the generated file will need.
    pub fn serialize_routers(
        &self,
        routers: &[RouterMeta],
    ) -> Result<(Vec<RouterGenMeta>, ImportRequests), GenError> {
        let mut flattener = Flattener::new(self.project);
        let mut out = Vec::with_capacity(routers.len());
        for router in routers {
            let module = self.project.module(&router.path)?;
            let class = module
                .class(&router.name)
                .ok_or_else(|| GenError::RouterNotFound(router.name.clone()))?;
            let mut procedures = Vec::with_capacity(router.procedures.len());
            for proc_name in &router.procedures {
                let method = class.methods.get(proc_name).ok_or_else(|| {
                    GenError::MethodNotFound {
                        router: router.name.clone(),
                        method: proc_name.clone(),
                    }
                })?;
                procedures.push(self.serialize_procedure(&mut flattener, &module, method)?);
            }
            out.push(RouterGenMeta {
                name: router.name.clone(),
                alias: router.alias.clone(),
                procedures,
            });
        }
        Ok((out, flattener.into_needed_imports()))
    }

    fn serialize_procedure(
        &self,
        flattener: &mut Flattener,
        module: &Rc<Module>,
        method: &MethodDecl,
    ) -> Result<ProcedureGenMeta, GenError> {
        if method.decorators.is_empty() {
            return Err(GenError::MissingDecorators(method.name.clone()));
        }
        let mut decorators = Vec::with_capacity(method.decorators.len());
        for node in &method.decorators {
            let mut meta = serialize_decorator(flattener, module, node)?;
            if self.auto_output
                && ProcedureKind::from_decorator(&meta.name).is_some()
                && !meta.arguments.contains_key("output")
            {
                meta = self.with_auto_output(meta, method, module)?;
            }
            decorators.push(meta);
        }
        Ok(ProcedureGenMeta { name: method.name.clone(), decorators })
    }

    /// Pure: consumes the descriptor and returns a new one with `output`
    /// appended. A method without a return annotation synthesizes from
    /// `Unknown` and accepts anything.
    fn with_auto_output(
        &self,
        mut meta: DecoratorMeta,
        method: &MethodDecl,
        module: &Rc<Module>,
    ) -> Result<DecoratorMeta, GenError> {
        let ty = match &method.return_ty {
            Some(annotation) => lower::lower_to_ir(annotation, module, self.project)?,
            None => Ty::Unknown,
        };
        meta.arguments
            .insert("output".to_string(), synth::synthesize(&ty));
        Ok(meta)
    }
}

/// Decorator arguments are carried by a single object-literal argument;
/// each property becomes one named argument, its value flattened to a
/// self-contained expression.
fn serialize_decorator(
    flattener: &mut Flattener,
    module: &Rc<Module>,
    node: &DecoratorNode,
) -> Result<DecoratorMeta, GenError> {
    let mut arguments = IndexMap::new();
    if let Some(Expr::Object(props)) = node.args.first() {
        for prop in props {
            let flattened = flattener.flatten(&prop.value, module)?;
            arguments.insert(prop.key.clone(), flattened.to_string());
        }
    }
    Ok(DecoratorMeta { name: node.name.clone(), arguments })
}

/// One procedure fragment. A procedure with no query/mutation decorator
/// renders to the empty string and contributes nothing.
pub fn render_procedure(procedure: &ProcedureGenMeta) -> String {
    let Some((decorator, kind)) = procedure.kind_decorator() else {
        return String::new();
    };
    let chained: String = decorator
        .arguments
        .iter()
        .map(|(key, value)| format!(".{key}({value})"))
        .collect();
    format!(
        "{}: publicProcedure{}.{}(async () => \"PLACEHOLDER_DO_NOT_REMOVE\" as any )",
        procedure.name,
        chained,
        kind.keyword()
    )
}

pub fn render_routers(routers: &[RouterGenMeta]) -> String {
    routers
        .iter()
        .map(render_router)
        .collect::<Vec<_>>()
        .join(",\n")
}

fn render_router(router: &RouterGenMeta) -> String {
    let key = router
        .alias
        .clone()
        .unwrap_or_else(|| router.name.to_lower_camel_case());
    let fragments: Vec<String> = router
        .procedures
        .iter()
        .map(render_procedure)
        .filter(|fragment| !fragment.is_empty())
        .collect();
    format!("{}: t.router({{ {} }})", key, fragments.join(",\n"))
}

/// Assemble the generated route-table module around the router fragments.
pub fn render_module(routers: &[RouterGenMeta], imports: &ImportRequests) -> String {
    let mut out = String::new();
    out.push_str("// @generated by routegen — do not edit\n");
    out.push_str("import { initTRPC } from '@trpc/server';\n");
    out.push_str("import { z } from 'zod';\n");
    out.push_str(&render_imports(imports));
    out.push('\n');
    out.push_str("const t = initTRPC.create();\n");
    out.push_str("const publicProcedure = t.procedure;\n\n");
    out.push_str("const appRouter = t.router({\n");
    out.push_str(&render_routers(routers));
    out.push_str("\n});\n\nexport type AppRouter = typeof appRouter;\n");
    out
}

/// Injected schema imports, grouped by specifier. Names with no known
/// binding are dropped; the emitted file cannot guess where they live.
fn render_imports(imports: &ImportRequests) -> String {
    let mut by_specifier: IndexMap<&str, Vec<&str>> = IndexMap::new();
    for (name, specifier) in imports {
        if let Some(spec) = specifier {
            by_specifier.entry(spec.as_str()).or_default().push(name.as_str());
        }
    }
    let mut out = String::new();
    for (specifier, names) in by_specifier {
        out.push_str(&format!(
            "import {{ {} }} from '{}';\n",
            names.join(", "),
            specifier
        ));
    }
    out
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::meta::DecoratorMeta;

    fn procedure(name: &str, decorators: Vec<DecoratorMeta>) -> ProcedureGenMeta {
        ProcedureGenMeta { name: name.to_string(), decorators }
    }

    fn decorator(name: &str, args: &[(&str, &str)]) -> DecoratorMeta {
        DecoratorMeta {
            name: name.to_string(),
            arguments: args
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn bare_query_renders_the_placeholder_body() {
        let p = procedure("testQuery", vec![decorator("Query", &[])]);
        assert_eq!(
            render_procedure(&p),
            "testQuery: publicProcedure.query(async () => \"PLACEHOLDER_DO_NOT_REMOVE\" as any )"
        );
    }

    #[test]
    fn bare_mutation_renders_the_placeholder_body() {
        let p = procedure("testMutation", vec![decorator("Mutation", &[])]);
        assert_eq!(
            render_procedure(&p),
            "testMutation: publicProcedure.mutation(async () => \"PLACEHOLDER_DO_NOT_REMOVE\" as any )"
        );
    }

    #[test]
    fn procedures_without_a_kind_decorator_render_nothing() {
        let p = procedure("helper", vec![decorator("UseMiddlewares", &[])]);
        assert_eq!(render_procedure(&p), "");
    }

    #[test]
    fn arguments_chain_in_stored_order() {
        let p = procedure(
            "getUser",
            vec![decorator(
                "Query",
                &[("input", "z.string(),"), ("output", "z.number(),")],
            )],
        );
        assert_eq!(
            render_procedure(&p),
            "getUser: publicProcedure.input(z.string(),).output(z.number(),).query(async () => \"PLACEHOLDER_DO_NOT_REMOVE\" as any )"
        );
    }

    #[test]
    fn router_keys_default_to_lower_camel_case() {
        let router = RouterGenMeta {
            name: "UserRouter".into(),
            alias: None,
            procedures: vec![procedure("testQuery", vec![decorator("Query", &[])])],
        };
        assert_eq!(
            render_routers(&[router]),
            "userRouter: t.router({ testQuery: publicProcedure.query(async () => \"PLACEHOLDER_DO_NOT_REMOVE\" as any ) })"
        );
    }

    #[test]
    fn aliases_override_the_derived_key_verbatim() {
        let router = RouterGenMeta {
            name: "UserRouter".into(),
            alias: Some("users".into()),
            procedures: vec![],
        };
        assert_eq!(render_routers(&[router]), "users: t.router({  })");
    }

    #[test]
    fn empty_fragments_are_filtered_from_the_router_body() {
        let router = RouterGenMeta {
            name: "MixedRouter".into(),
            alias: None,
            procedures: vec![
                procedure("plain", vec![decorator("UseMiddlewares", &[])]),
                procedure("testQuery", vec![decorator("Query", &[])]),
            ],
        };
        let rendered = render_routers(&[router]);
        assert!(!rendered.contains(",\n,"));
        assert!(rendered.contains("testQuery"));
    }

    #[test]
    fn injected_imports_group_by_specifier() {
        let mut imports: ImportRequests = IndexMap::new();
        imports.insert("wrapPaginated".into(), Some("shared/pagination".into()));
        imports.insert("wrapCursor".into(), Some("shared/pagination".into()));
        imports.insert("localOnly".into(), None);
        let rendered = render_imports(&imports);
        assert_eq!(
            rendered,
            "import { wrapPaginated, wrapCursor } from 'shared/pagination';\n"
        );
    }
}
