//! Tagged-union output.
//!
//! Each base type becomes a module holding `pub enum Base` with one tuple
//! variant per node shape, a struct per shape, and a `Visitor<R>` trait with
//! one `visit_<variant>_<base>` method per shape. Both the enum and every
//! struct have an `accept` that lands on exactly one trait method.
//!
//! Units are meant to sit side by side as sibling modules named after the
//! snake-cased base type (`expr.rs`, `stmt.rs`), so a reference to another
//! base type is written `super::stmt::Stmt`. Keyword module names are raw
//! (`super::r#type::Type`, file `type.rs`).
use indexmap::IndexMap;

use super::{check_reserved, Backend, Emitter, UnitCx};
use crate::error::SchemaError;
use crate::naming::{dispatch_method_name, rust_ident, rust_module_file, rust_module_name, snake_case};
use crate::schema::{BaseType, Schema, TypeRef, Variant};

const ACCEPT_GENERICS: &str = "<R, V: Visitor<R> + ?Sized>";

// Names the generated code uses unqualified.
const RESERVED: &[&str] = &["Visitor", "R", "V", "Box", "Vec", "Option", "Self", "Sized"];

#[derive(Debug, Clone, Default)]
pub struct Rust {
    /// Paths brought in with `use`, e.g. `crate::token::Token`.
    pub imports: Vec<String>,
}

impl Rust {
    pub fn new(imports: Vec<String>) -> Self {
        Self { imports }
    }
}

/// Rust spelling of a field type as seen from inside the `own` base's module.
///
/// Direct references to node types are boxed so recursive shapes have a
/// finite size; sequences already provide the indirection.
pub fn render_type(ty: &TypeRef, own: &str) -> String {
    fn render(ty: &TypeRef, own: &str, boxed: bool) -> String {
        let node = |path: String| if boxed { format!("Box<{path}>") } else { path };
        match ty {
            TypeRef::Scalar { name } => name.clone(),
            TypeRef::Base { name } => node(qualify(name, name, own)),
            TypeRef::Variant { base, variant } => node(qualify(base, variant, own)),
            TypeRef::List { item } => format!("Vec<{}>", render(item, own, false)),
            TypeRef::Optional { inner } => format!("Option<{}>", render(inner, own, boxed)),
        }
    }
    render(ty, own, true)
}

// Distinct schema names must stay distinct once converted.
fn check_distinct<'a>(
    names: impl IntoIterator<Item = &'a str>,
    convert: impl Fn(&str) -> String,
    context: &str,
) -> Result<(), SchemaError> {
    let mut seen: IndexMap<String, &str> = IndexMap::new();
    for name in names {
        let emitted = convert(name);
        if let Some(first) = seen.get(&emitted) {
            return Err(SchemaError::NameCollision {
                first: first.to_string(),
                second: name.to_string(),
                emitted,
                backend: "rust",
                context: context.to_string(),
            });
        }
        seen.insert(emitted, name);
    }
    Ok(())
}

fn qualify(base: &str, item: &str, own: &str) -> String {
    if base == own {
        item.to_string()
    } else {
        format!("super::{}::{item}", rust_module_name(base))
    }
}

impl Backend for Rust {
    fn name(&self) -> &'static str {
        "rust"
    }

    fn file_name(&self, base: &BaseType) -> String {
        rust_module_file(&base.name)
    }

    fn reserved_names(&self) -> &'static [&'static str] {
        RESERVED
    }

    fn check(&self, schema: &Schema) -> Result<(), SchemaError> {
        check_reserved(self.name(), self.reserved_names(), schema)?;
        let bases = schema.base_types.iter().map(|b| b.name.as_str());
        check_distinct(bases, rust_module_name, "module names")?;
        for base in &schema.base_types {
            let variants = base.variants.iter().map(|v| v.name.as_str());
            check_distinct(variants, |v| snake_case(&dispatch_method_name(v, &base.name)), &base.name)?;
            for variant in &base.variants {
                let fields = variant.fields.iter().map(|f| f.name.as_str());
                let context = format!("{}.{}", base.name, variant.name);
                check_distinct(fields, rust_ident, &context)?;
            }
        }
        Ok(())
    }

    fn emit_dispatch_interface(&self, cx: UnitCx<'_>, out: &mut Emitter) {
        let param = rust_ident(&cx.base.name);
        out.block("pub trait Visitor<R> {", "}", |out| {
            for variant in &cx.base.variants {
                let method = snake_case(&dispatch_method_name(&variant.name, &cx.base.name));
                out.line(format!("fn {method}(&mut self, {param}: &{}) -> R;", variant.name));
            }
        });
    }

    fn emit_variant(&self, cx: UnitCx<'_>, variant: &Variant, out: &mut Emitter) {
        let own = cx.base.name.as_str();
        let fields: Vec<(String, String)> = variant
            .fields
            .iter()
            .map(|f| (rust_ident(&f.name), render_type(&f.ty, own)))
            .collect();

        out.block(format!("pub struct {} {{", variant.name), "}", |out| {
            for (name, ty) in &fields {
                out.line(format!("pub {name}: {ty},"));
            }
        });
        out.blank();

        let params = fields
            .iter()
            .map(|(name, ty)| format!("{name}: {ty}"))
            .collect::<Vec<_>>()
            .join(", ");
        let names = fields.iter().map(|(name, _)| name.as_str()).collect::<Vec<_>>();
        let init = if names.is_empty() {
            "Self {}".to_string()
        } else {
            format!("Self {{ {} }}", names.join(", "))
        };
        let method = snake_case(&dispatch_method_name(&variant.name, own));

        out.block(format!("impl {} {{", variant.name), "}", |out| {
            out.block(format!("pub fn new({params}) -> Self {{"), "}", |out| out.line(&init));
            out.blank();
            out.block(
                format!("pub fn accept{ACCEPT_GENERICS}(&self, visitor: &mut V) -> R {{"),
                "}",
                |out| out.line(format!("visitor.{method}(self)")),
            );
        });
    }

    fn assemble(&self, cx: UnitCx<'_>) -> String {
        let base = cx.base.name.as_str();
        let mut out = Emitter::new("    ");
        out.line(format!("// @generated by ast-gen from the `{base}` schema. Do not edit."));
        out.line("#![allow(clippy::new_without_default, clippy::too_many_arguments)]");
        out.blank();
        if !self.imports.is_empty() {
            for import in &self.imports {
                out.line(format!("use {import};"));
            }
            out.blank();
        }

        out.block(format!("pub enum {base} {{"), "}", |out| {
            for variant in &cx.base.variants {
                out.line(format!("{0}({0}),", variant.name));
            }
        });
        out.blank();

        out.block(format!("impl {base} {{"), "}", |out| {
            if cx.base.variants.is_empty() {
                out.block(
                    format!("pub fn accept{ACCEPT_GENERICS}(&self, _visitor: &mut V) -> R {{"),
                    "}",
                    |out| out.line("match *self {}"),
                );
            } else {
                out.block(
                    format!("pub fn accept{ACCEPT_GENERICS}(&self, visitor: &mut V) -> R {{"),
                    "}",
                    |out| {
                        out.block("match self {", "}", |out| {
                            for variant in &cx.base.variants {
                                out.line(format!("Self::{}(node) => node.accept(visitor),", variant.name));
                            }
                        });
                    },
                );
            }
        });
        out.blank();

        self.emit_dispatch_interface(cx, &mut out);
        for variant in &cx.base.variants {
            out.blank();
            self.emit_variant(cx, variant, &mut out);
        }
        out.into_string()
    }
}
