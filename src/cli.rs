//! CLI: schema → (resolved schema view | visitor-pattern source units)
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;

use crate::codegen::{self, Backend, Java, Rust, Unit};
use crate::source::{SchemaDocument, Selection};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate visitor-pattern AST node types from a declarative schema
#[derive(Parser, Debug)]
#[command(name = "ast-gen", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// generate one source unit per base type
    Generate(GenerateOut),
    /// resolve the schema and print it as JSON
    Schema(SchemaOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// use a schema that ships with ast-gen instead of reading files
    #[arg(long, value_enum, conflicts_with = "input")]
    builtin: Option<Builtin>,

    /// JSON Pointer to select the schema inside each document (e.g. /tools/ast)
    #[arg(long)]
    json_pointer: Option<String>,

    /// jq filter applied to each document; every output is a schema document
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more schema documents. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required_unless_present = "builtin")]
    input: Vec<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Builtin {
    /// the Lox interpreter's Expr and Stmt trees
    Lox,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Lang {
    /// abstract class + nested Visitor interface + static class per variant
    Java,
    /// enum + struct per variant + Visitor trait
    Rust,
}

#[derive(clap::Parser, Debug)]
struct GenerateOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// target language
    #[arg(long, value_enum, default_value_t = Lang::Java)]
    lang: Lang,

    /// output directory (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// package declaration for Java units; overrides the schema's
    #[arg(long)]
    package: Option<String>,

    /// extra import/use path; repeatable
    #[arg(long = "import")]
    imports: Vec<String>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct SchemaOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load(&self) -> Result<SchemaDocument> {
        if let Some(Builtin::Lox) = self.builtin {
            return Ok(crate::lox::document());
        }
        let selection = Selection {
            json_pointer: self.json_pointer.clone(),
            jq_expr: self.jq_expr.clone(),
        };
        let paths = crate::source::resolve_file_path_patterns(&self.input)?;
        let mut document = SchemaDocument::default();
        for path in paths {
            tracing::debug!(path = %path.display(), "loading schema document");
            document.merge(crate::source::load_document(&path, &selection)?);
        }
        Ok(document)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Schema(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }
                let document = target.input_settings.load()?;
                let schema = crate::lower::lower(&document.types).context("invalid schema")?;
                let schema_src = serde_json::to_string_pretty(&schema)?;
                match target.out.as_ref() {
                    Some(out) => {
                        if let Some(parent) = out.parent() {
                            std::fs::create_dir_all(parent)
                                .with_context(|| format!("failed to create {}", parent.display()))?;
                        }
                        std::fs::write(out, &schema_src)
                            .with_context(|| format!("failed to write {}", out.display()))?;
                    }
                    None => println!("{schema_src}"),
                }
                Ok(())
            }
            Command::Generate(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }
                let document = target.input_settings.load()?;
                let schema = crate::lower::lower(&document.types).context("invalid schema")?;

                let mut imports = document.imports.clone();
                imports.extend(target.imports.iter().cloned());
                let units = match target.lang {
                    Lang::Java => {
                        let package = target.package.clone().or(document.package);
                        generate_with(&schema, &Java::new(package, imports))?
                    }
                    Lang::Rust => generate_with(&schema, &Rust::new(imports))?,
                };

                match target.out.as_ref() {
                    Some(out) => {
                        for path in crate::writer::write_units(out, &units)? {
                            eprintln!("{} {}", "wrote".green().bold(), path.display());
                        }
                    }
                    None => print!("{}", crate::writer::render_listing(&units)),
                }
                Ok(())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn generate_with<B: Backend>(schema: &crate::schema::Schema, backend: &B) -> Result<Vec<Unit>> {
    codegen::generate(schema, backend)
        .with_context(|| format!("{} generation aborted", backend.name()))
}
