//! End-to-end generation over the on-disk fixture project.

use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;

use routegen::error::GenError;
use routegen::meta::RouterMeta;
use routegen::path_de;
use routegen::project::Project;
use routegen::render::{self, Serializer};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn user_router_meta() -> RouterMeta {
    RouterMeta {
        name: "UserRouter".into(),
        alias: Some("users".into()),
        path: fixture("user.router.ts"),
        procedures: vec![
            "getUserById".into(),
            "listUsers".into(),
            "createUser".into(),
        ],
    }
}

fn post_router_meta() -> RouterMeta {
    RouterMeta {
        name: "PostRouter".into(),
        alias: None,
        path: fixture("post.router.ts"),
        procedures: vec!["listPosts".into(), "archivePosts".into()],
    }
}

#[test]
fn explicit_schemas_are_flattened_across_files() {
    let project = Project::new();
    let serializer = Serializer::new(&project, false);
    let (routers, _) = serializer
        .serialize_routers(&[user_router_meta()])
        .expect("serialize");

    let query = &routers[0].procedures[0];
    assert_eq!(
        query.decorators[0].arguments["input"],
        "z.object({ userId: z.string() })"
    );
    // `userSchema` lives in another file and itself references a private
    // `emailSchema`; both hops must be inlined.
    assert_eq!(
        query.decorators[0].arguments["output"],
        "z.object({ name: z.string(), email: z.string().email() })"
    );
}

#[test]
fn factory_calls_keep_the_factory_and_register_its_import() {
    let project = Project::new();
    let serializer = Serializer::new(&project, false);
    let (routers, imports) = serializer
        .serialize_routers(&[user_router_meta()])
        .expect("serialize");

    let list = &routers[0].procedures[1];
    assert_eq!(
        list.decorators[0].arguments["output"],
        "wrapPaginated(z.object({ name: z.string(), email: z.string().email() }))"
    );
    assert_eq!(
        imports.get("wrapPaginated"),
        Some(&Some("./helpers".to_string()))
    );
}

#[test]
fn auto_output_synthesizes_from_the_declared_return_type() {
    let project = Project::new();
    let serializer = Serializer::new(&project, true);
    let (routers, _) = serializer
        .serialize_routers(&[user_router_meta(), post_router_meta()])
        .expect("serialize");

    // Promise<User> resolves through ./user.types; the callable `greet`
    // member is dropped, the nested Address interface is expanded.
    let create = &routers[0].procedures[2];
    assert_eq!(
        create.decorators[0].arguments["output"],
        "z.object({id: z.string(),name: z.string(),address: z.object({street: z.string(),city: z.string(),}),}),"
    );

    // Promise<void> synthesizes the void wrapper.
    let archive = &routers[1].procedures[1];
    assert_eq!(archive.decorators[0].arguments["output"], "z.void(),");
}

#[test]
fn without_auto_output_missing_schemas_stay_missing() {
    let project = Project::new();
    let serializer = Serializer::new(&project, false);
    let (routers, _) = serializer
        .serialize_routers(&[user_router_meta()])
        .expect("serialize");

    let create = &routers[0].procedures[2];
    assert!(create.decorators[0].arguments.is_empty());
    assert_eq!(
        render::render_procedure(create),
        "createUser: publicProcedure.mutation(async () => \"PLACEHOLDER_DO_NOT_REMOVE\" as any )"
    );
}

#[test]
fn generated_module_assembles_routers_and_injected_imports() {
    let project = Project::new();
    let serializer = Serializer::new(&project, true);
    let (routers, imports) = serializer
        .serialize_routers(&[user_router_meta(), post_router_meta()])
        .expect("serialize");

    let module = render::render_module(&routers, &imports);
    assert!(module.contains("import { initTRPC } from '@trpc/server';"));
    assert!(module.contains("import { wrapPaginated } from './helpers';"));
    // alias verbatim, derived key lower-camel-cased
    assert!(module.contains("users: t.router({"));
    assert!(module.contains("postRouter: t.router({"));
    assert!(module.contains(
        "listPosts: publicProcedure.output(z.array(z.object({ title: z.string(), tags: z.array(z.string()) })).optional()).query"
    ));
    assert!(module.ends_with("export type AppRouter = typeof appRouter;\n"));
}

#[test]
fn metadata_files_drive_the_same_pipeline() {
    let source = std::fs::read_to_string(fixture("routers.json")).expect("metadata file");
    let mut routers: Vec<RouterMeta> =
        path_de::metadata_from_str(&source, &fixture("routers.json")).expect("deserialize");
    // metadata paths are project-relative; rebase them for the test cwd
    for router in &mut routers {
        router.path = Path::new(env!("CARGO_MANIFEST_DIR")).join(&router.path);
    }

    let project = Project::new();
    let serializer = Serializer::new(&project, true);
    let (serialized, _) = serializer.serialize_routers(&routers).expect("serialize");
    assert_eq!(serialized.len(), 2);
    assert_eq!(serialized[0].alias.as_deref(), Some("users"));
    assert_eq!(serialized[1].procedures.len(), 2);
}

#[test]
fn missing_router_class_is_fatal() {
    let project = Project::new();
    let serializer = Serializer::new(&project, false);
    let mut meta = user_router_meta();
    meta.name = "MissingRouter".into();
    let err = serializer
        .serialize_routers(&[meta])
        .expect_err("should fail");
    assert!(matches!(err, GenError::RouterNotFound(name) if name == "MissingRouter"));
}

#[test]
fn missing_method_is_fatal() {
    let project = Project::new();
    let serializer = Serializer::new(&project, false);
    let mut meta = user_router_meta();
    meta.procedures = vec!["doesNotExist".into()];
    let err = serializer
        .serialize_routers(&[meta])
        .expect_err("should fail");
    assert!(matches!(
        err,
        GenError::MethodNotFound { method, .. } if method == "doesNotExist"
    ));
}

#[test]
fn undecorated_methods_are_fatal_when_listed_as_procedures() {
    let project = Project::new();
    let serializer = Serializer::new(&project, false);
    let mut meta = user_router_meta();
    meta.procedures = vec!["helper".into()];
    let err = serializer
        .serialize_routers(&[meta])
        .expect_err("should fail");
    assert!(matches!(err, GenError::MissingDecorators(name) if name == "helper"));
}
