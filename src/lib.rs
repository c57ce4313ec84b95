//! Generate visitor-pattern AST node types from a declarative schema.
//!
//! The pipeline is linear: a [`source::SchemaSource`] (literal data or a JSON
//! document) is resolved by [`lower::lower`] into a validated
//! [`schema::Schema`], and [`codegen::generate`] turns that into one
//! [`codegen::Unit`] per base type for the chosen [`codegen::Backend`].
//!
//! ```no_run
//! use ast_gen::codegen::{generate, Java};
//!
//! let schema = ast_gen::lower::lower(&ast_gen::lox::schema_source())?;
//! for unit in generate(&schema, &Java::default())? {
//!     println!("{}:\n{}", unit.file_name, unit.source);
//! }
//! # Ok::<(), ast_gen::error::SchemaError>(())
//! ```
pub mod cli;
pub mod codegen;
pub mod error;
pub mod jq_exec;
pub mod lower;
pub mod lox;
pub mod naming;
pub mod schema;
pub mod source;
pub mod writer;
