//! Unresolved schema input.
//!
//! A [`SchemaSource`] is the literal data an entry point hands to the
//! generator: base types, their variants and `(field, type text)` pairs, all
//! in declaration order. Type text is classified later by [`crate::lower`],
//! once every base type name is known.
//!
//! Schema documents are JSON objects whose key order is significant:
//!
//! ```json
//! {
//!   "package": "com.craftinginterpreters.lox",
//!   "types": {
//!     "Expr": { "Binary": { "left": "Expr", "operator": "Token", "right": "Expr" } }
//!   }
//! }
//! ```
use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use serde::de::{Deserialize, DeserializeOwned, Deserializer, MapAccess, Visitor};
use serde_json::Value;

use crate::error::SourceError;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaSource {
    pub base_types: Vec<BaseTypeSource>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseTypeSource {
    pub name: String,
    pub variants: Vec<VariantSource>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantSource {
    pub name: String,
    pub fields: Vec<FieldSource>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSource {
    pub name: String,
    pub ty: String,
}

/// A schema plus the emission hints that travel with it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaDocument {
    pub package: Option<String>,
    pub imports: Vec<String>,
    pub types: SchemaSource,
}

/// How to find the schema inside a JSON document.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub json_pointer: Option<String>,
    pub jq_expr: Option<String>,
}

/// JSON object entries in document order, duplicates included.
///
/// Deserializing into a map type would silently keep only one of two equal
/// keys; keeping them all lets validation reject the duplicate instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedEntries<T>(pub Vec<(String, T)>);

impl<T> Default for OrderedEntries<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDocument {
    #[serde(default)]
    package: Option<String>,
    #[serde(default)]
    imports: Vec<String>,
    #[serde(default)]
    types: OrderedEntries<OrderedEntries<OrderedEntries<String>>>,
}

// ————————————————————————————————————————————————————————————————————————————
// BUILDERS
// ————————————————————————————————————————————————————————————————————————————

impl SchemaSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, base: BaseTypeSource) -> Self {
        self.base_types.push(base);
        self
    }

    /// Append another source's base types after this one's.
    pub fn merge(&mut self, other: SchemaSource) {
        self.base_types.extend(other.base_types);
    }
}

impl BaseTypeSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), variants: Vec::new() }
    }

    pub fn variant<'a>(
        mut self,
        name: impl Into<String>,
        fields: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let fields = fields
            .into_iter()
            .map(|(name, ty)| FieldSource { name: name.to_string(), ty: ty.to_string() })
            .collect();
        self.variants.push(VariantSource { name: name.into(), fields });
        self
    }
}

impl SchemaDocument {
    /// Fold `other` into `self`: base types are appended, the first package
    /// wins and imports are unioned in first-seen order.
    pub fn merge(&mut self, other: SchemaDocument) {
        if self.package.is_none() {
            self.package = other.package;
        }
        let mut imports: IndexSet<String> = self.imports.drain(..).collect();
        imports.extend(other.imports);
        self.imports = imports.into_iter().collect();
        self.types.merge(other.types);
    }
}

impl RawDocument {
    fn into_document(self) -> SchemaDocument {
        let base_types = self
            .types
            .0
            .into_iter()
            .map(|(name, variants)| BaseTypeSource {
                name,
                variants: variants
                    .0
                    .into_iter()
                    .map(|(name, fields)| VariantSource {
                        name,
                        fields: fields
                            .0
                            .into_iter()
                            .map(|(name, ty)| FieldSource { name, ty })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();
        SchemaDocument {
            package: self.package,
            imports: self.imports,
            types: SchemaSource { base_types },
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// LOADING
// ————————————————————————————————————————————————————————————————————————————

/// Parse one schema document from JSON text.
pub fn parse_document(src: &str) -> Result<SchemaDocument, String> {
    from_str_with_path::<RawDocument>(src).map(RawDocument::into_document)
}

/// Read a schema file, optionally narrowing it with a JSON pointer and/or a
/// jq filter first. A jq filter may yield several documents; they are merged.
pub fn load_document(path: &Path, selection: &Selection) -> Result<SchemaDocument, SourceError> {
    let text = std::fs::read_to_string(path).map_err(|source| SourceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parse_error = |message: String| SourceError::Parse { path: path.to_path_buf(), message };

    if selection.json_pointer.is_none() && selection.jq_expr.is_none() {
        // straight from text, so duplicate keys reach validation
        return parse_document(&text).map_err(parse_error);
    }

    let mut value: Value = serde_json::from_str(&text).map_err(|e| parse_error(e.to_string()))?;
    if let Some(pointer) = selection.json_pointer.as_deref() {
        value = value
            .pointer(pointer)
            .cloned()
            .ok_or_else(|| SourceError::Pointer { pointer: pointer.to_string(), path: path.to_path_buf() })?;
    }

    let values = match selection.jq_expr.as_deref() {
        None => vec![value],
        Some(expr) => crate::jq_exec::run_jq(expr, &value)
            .map_err(|message| SourceError::Jq { path: path.to_path_buf(), message })?,
    };

    let mut document = SchemaDocument::default();
    for value in values {
        let next = from_value_with_path::<RawDocument>(value).map_err(parse_error)?;
        document.merge(next.into_document());
    }
    Ok(document)
}

/// Expand literal paths and glob patterns, in argument order.
pub fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>, SourceError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();
    for raw in patterns {
        let pattern = raw.as_ref();
        if !has_glob_chars(pattern) {
            out.push(PathBuf::from(pattern));
            continue;
        }
        let pattern_error = |message: String| SourceError::Pattern {
            pattern: pattern.to_string(),
            message,
        };
        let mut matched_any = false;
        for entry in glob::glob(pattern).map_err(|e| pattern_error(e.to_string()))? {
            let path = entry.map_err(|e| pattern_error(e.to_string()))?;
            matched_any = true;
            out.push(path);
        }
        if !matched_any {
            return Err(pattern_error("glob pattern matched no files".to_string()));
        }
    }
    Ok(out)
}

/// Deserialize with JSON-path context in error messages.
fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, String> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(describe_path_error)
}

fn from_value_with_path<T: DeserializeOwned>(value: Value) -> Result<T, String> {
    serde_path_to_error::deserialize::<_, T>(value).map_err(describe_path_error)
}

fn describe_path_error<E: fmt::Display>(err: serde_path_to_error::Error<E>) -> String {
    let path = err.path().to_string();
    format!("at JSON path {path} → {}", err.into_inner())
}

// ————————————————————————————————————————————————————————————————————————————
// SERDE
// ————————————————————————————————————————————————————————————————————————————

impl<'de, T: Deserialize<'de>> Deserialize<'de> for OrderedEntries<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for EntriesVisitor<T> {
            type Value = OrderedEntries<T>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, T>()? {
                    entries.push((key, value));
                }
                Ok(OrderedEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builder_keeps_declaration_order() {
        let source = SchemaSource::new().with(
            BaseTypeSource::new("Expr")
                .variant("Binary", [("left", "Expr"), ("operator", "Token"), ("right", "Expr")])
                .variant("Grouping", [("expression", "Expr")]),
        );
        let binary = &source.base_types[0].variants[0];
        let names: Vec<_> = binary.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["left", "operator", "right"]);
        assert_eq!(source.base_types[0].variants[1].name, "Grouping");
    }

    #[test]
    fn document_preserves_key_order() {
        let doc = parse_document(
            r#"{
                "package": "lox",
                "types": {
                    "Stmt": { "While": { "condition": "Expr", "body": "Stmt" }, "Var": { "name": "Token" } },
                    "Expr": {}
                }
            }"#,
        )
        .unwrap();
        assert_eq!(doc.package.as_deref(), Some("lox"));
        let bases: Vec<_> = doc.types.base_types.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(bases, ["Stmt", "Expr"]);
        let stmt = &doc.types.base_types[0];
        assert_eq!(stmt.variants[0].name, "While");
        assert_eq!(
            stmt.variants[0].fields,
            vec![
                FieldSource { name: "condition".into(), ty: "Expr".into() },
                FieldSource { name: "body".into(), ty: "Stmt".into() },
            ]
        );
    }

    #[test]
    fn duplicate_keys_survive_parsing() {
        let doc = parse_document(r#"{ "types": { "Expr": { "Unary": { "right": "Expr", "right": "Token" } } } }"#)
            .unwrap();
        assert_eq!(doc.types.base_types[0].variants[0].fields.len(), 2);
    }

    #[test]
    fn parse_errors_carry_the_json_path() {
        let err = parse_document(r#"{ "types": { "Expr": { "Unary": { "right": 3 } } } }"#).unwrap_err();
        assert!(err.contains("types.Expr.Unary.right"), "{err}");
    }

    #[test]
    fn unknown_top_level_keys_are_rejected() {
        assert!(parse_document(r#"{ "typez": {} }"#).is_err());
    }

    #[test]
    fn merge_appends_types_and_unions_imports() {
        let mut a = parse_document(r#"{ "package": "a", "imports": ["x"], "types": { "Expr": {} } }"#).unwrap();
        let b = parse_document(r#"{ "package": "b", "imports": ["x", "y"], "types": { "Stmt": {} } }"#).unwrap();
        a.merge(b);
        assert_eq!(a.package.as_deref(), Some("a"));
        assert_eq!(a.imports, ["x", "y"]);
        let bases: Vec<_> = a.types.base_types.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(bases, ["Expr", "Stmt"]);
    }

    #[test]
    fn json_pointer_selects_a_subdocument() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "tools": { "ast": { "types": { "Expr": { "Literal": { "value": "Object" } } } } } }"#)
            .unwrap();
        let selection = Selection { json_pointer: Some("/tools/ast".into()), jq_expr: None };
        let doc = load_document(&path, &selection).unwrap();
        assert_eq!(doc.types.base_types[0].variants[0].name, "Literal");

        let missing = Selection { json_pointer: Some("/nope".into()), jq_expr: None };
        assert!(matches!(load_document(&path, &missing), Err(SourceError::Pointer { .. })));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_document(&dir.path().join("absent.json"), &Selection::default());
        assert!(matches!(result, Err(SourceError::Read { .. })));
    }

    #[test]
    fn literal_paths_pass_through_pattern_resolution() {
        let paths = resolve_file_path_patterns(["a.json", "b/c.json"]).unwrap();
        assert_eq!(paths, [PathBuf::from("a.json"), PathBuf::from("b/c.json")]);
    }
}
