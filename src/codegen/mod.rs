//! Source emission.
//!
//! A [`Backend`] knows how to render one base type for one target language:
//! the dispatch interface, one node type per variant, and the umbrella unit
//! that holds them. [`generate`] validates the schema once and then asks the
//! backend for one [`Unit`] per base type.
pub mod java;
pub mod rust;

use rayon::prelude::*;
use serde::Serialize;

use crate::error::SchemaError;
use crate::schema::{BaseType, Schema, Variant};

pub use java::Java;
pub use rust::Rust;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// One generated source file, ready for a writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unit {
    pub base_name: String,
    pub file_name: String,
    pub source: String,
}

/// Everything a backend may look at while rendering one base type.
#[derive(Debug, Clone, Copy)]
pub struct UnitCx<'a> {
    pub schema: &'a Schema,
    pub base: &'a BaseType,
}

pub trait Backend: Sync {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    fn file_name(&self, base: &BaseType) -> String;

    /// Type names the backend itself places next to the variant types.
    fn reserved_names(&self) -> &'static [&'static str] {
        &[]
    }

    /// Backend-specific rejections, run after schema validation.
    fn check(&self, schema: &Schema) -> Result<(), SchemaError> {
        check_reserved(self.name(), self.reserved_names(), schema)
    }

    /// One method per variant, in declaration order, and nothing else.
    fn emit_dispatch_interface(&self, cx: UnitCx<'_>, out: &mut Emitter);

    /// Members, initializer and dispatch operation for one variant.
    fn emit_variant(&self, cx: UnitCx<'_>, variant: &Variant, out: &mut Emitter);

    /// The whole unit: umbrella type, dispatch interface, every variant.
    fn assemble(&self, cx: UnitCx<'_>) -> String;
}

/// Generate one unit per base type, in declaration order.
///
/// Fails before producing anything if the schema is invalid; there is no
/// partial output.
pub fn generate<B>(schema: &Schema, backend: &B) -> Result<Vec<Unit>, SchemaError>
where
    B: Backend + ?Sized,
{
    schema.validate()?;
    backend.check(schema)?;

    let units = schema
        .base_types
        .par_iter()
        .map(|base| {
            let cx = UnitCx { schema, base };
            let unit = Unit {
                base_name: base.name.clone(),
                file_name: backend.file_name(base),
                source: backend.assemble(cx),
            };
            tracing::debug!(
                backend = backend.name(),
                base = %base.name,
                variants = base.variants.len(),
                bytes = unit.source.len(),
                "assembled unit"
            );
            unit
        })
        .collect::<Vec<_>>();
    Ok(units)
}

/// Reject base or variant names that would shadow a name the backend emits
/// itself (its dispatch interface, the result type parameter, library types).
pub fn check_reserved(
    backend: &'static str,
    reserved: &[&str],
    schema: &Schema,
) -> Result<(), SchemaError> {
    let rejected = |name: &str, context: &str| SchemaError::ReservedName {
        name: name.to_string(),
        backend,
        context: context.to_string(),
    };
    for base in &schema.base_types {
        if reserved.contains(&base.name.as_str()) {
            return Err(rejected(&base.name, "base type list"));
        }
        for variant in &base.variants {
            if reserved.contains(&variant.name.as_str()) {
                return Err(rejected(&variant.name, &base.name));
            }
        }
    }
    Ok(())
}

// ————————————————————————————————————————————————————————————————————————————
// EMITTER
// ————————————————————————————————————————————————————————————————————————————

/// Line-oriented text buffer with a fixed indent unit.
#[derive(Debug, Clone)]
pub struct Emitter {
    buf: String,
    depth: usize,
    indent: &'static str,
}

impl Emitter {
    pub fn new(indent: &'static str) -> Self {
        Self { buf: String::new(), depth: 0, indent }
    }

    /// Write one line at the current depth. Empty text gives a bare newline.
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.buf.push_str(self.indent);
            }
            self.buf.push_str(text);
        }
        self.buf.push('\n');
    }

    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    /// Run `body` one level deeper.
    pub fn indented(&mut self, body: impl FnOnce(&mut Self)) {
        self.depth += 1;
        body(self);
        self.depth -= 1;
    }

    /// `open`, the indented body, then `close`.
    pub fn block(&mut self, open: impl AsRef<str>, close: &str, body: impl FnOnce(&mut Self)) {
        self.line(open);
        self.indented(body);
        self.line(close);
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}
