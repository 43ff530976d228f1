//! Minimal CLI: generate → route-table module | flatten → one schema
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use crate::flatten::Flattener;
use crate::meta::RouterMeta;
use crate::path_de;
use crate::project::Project;
use crate::render::{self, Serializer};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate a tRPC route-table module from decorated router sources
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// serialize routers and emit the generated route-table module
    Generate(GenerateOut),
    /// flatten one named schema declaration to a self-contained expression
    Flatten(FlattenOut),
}

#[derive(Args, Debug)]
struct GenerateOut {
    /// router metadata JSON files. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    metadata: Vec<String>,

    /// synthesize missing output schemas from declared return types
    #[arg(long, default_value_t = false)]
    auto_output: bool,

    /// output .ts file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(Args, Debug)]
struct FlattenOut {
    /// source file containing the declaration
    #[arg(long, short)]
    file: PathBuf,

    /// name of the const declaration to flatten
    #[arg(long, short)]
    name: String,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) {
        let result = match &self.cmd {
            Command::Generate(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return;
                }
                run_generate(target)
            }
            Command::Flatten(target) => {
                if target.no_op {
                    eprintln!("{self:#?}");
                    return;
                }
                run_flatten(target)
            }
        };
        if let Err(error) = result {
            eprintln!("{} {error:#}", "error:".red().bold());
            std::process::exit(1);
        }
    }
}

fn run_generate(target: &GenerateOut) -> anyhow::Result<()> {
    // 1) collect router metadata
    let metadata_paths = resolve_file_path_patterns(&target.metadata)?;
    let mut routers: Vec<RouterMeta> = Vec::new();
    for path in metadata_paths {
        let source = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("failed to read metadata file {}: {e}", path.display()))?;
        let batch: Vec<RouterMeta> = path_de::metadata_from_str(&source, &path)?;
        routers.extend(batch);
    }

    // 2) serialize routers against a fresh project (one run = one cache)
    let project = Project::new();
    let serializer = Serializer::new(&project, target.auto_output);
    let (serialized, imports) = serializer.serialize_routers(&routers)?;

    // 3) assemble & write
    let module_src = render::render_module(&serialized, &imports);
    write_output(target.out.as_deref(), &module_src)
}

fn run_flatten(target: &FlattenOut) -> anyhow::Result<()> {
    let project = Project::new();
    let module = project.module(&target.file)?;
    let Some(init) = module.const_decl(&target.name) else {
        anyhow::bail!(
            "no const declaration named {} in {}",
            target.name,
            target.file.display()
        );
    };
    let mut flattener = Flattener::new(&project);
    let flattened = flattener.flatten(init, &module)?;
    write_output(target.out.as_deref(), &format!("{flattened}\n"))
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn write_output(out: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, text)?;
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn resolve_file_path_patterns<I>(patterns: I) -> anyhow::Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                matched_any = true;
                out.push(entry?);
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                anyhow::bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            // Treat as a literal path
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
