use indexmap::IndexMap;

use crate::error::SchemaError;
use crate::schema::{BaseType, Field, Schema, TypeRef, Variant};
use crate::source::{BaseTypeSource, SchemaSource};

/// Resolve every field's type text against the whole source, then validate.
///
/// Resolution is purely by name, so a variant may refer to its own base type
/// or to one declared further down.
pub fn lower(source: &SchemaSource) -> Result<Schema, SchemaError> {
    let mut bases: IndexMap<&str, &BaseTypeSource> = IndexMap::new();
    for base in &source.base_types {
        if bases.insert(base.name.as_str(), base).is_some() {
            return Err(SchemaError::DuplicateBaseType { name: base.name.clone() });
        }
    }

    let mut base_types = Vec::with_capacity(source.base_types.len());
    for base in &source.base_types {
        let mut variants = Vec::with_capacity(base.variants.len());
        for variant in &base.variants {
            let mut fields = Vec::with_capacity(variant.fields.len());
            for field in &variant.fields {
                let context = format!("{}.{}.{}", base.name, variant.name, field.name);
                let ty = parse_type_expr(&field.ty, &bases, &context)?;
                fields.push(Field { name: field.name.clone(), ty });
            }
            variants.push(Variant { name: variant.name.clone(), fields });
        }
        base_types.push(BaseType { name: base.name.clone(), variants });
    }

    let schema = Schema { base_types };
    schema.validate()?;
    Ok(schema)
}

/// Classify one type expression.
///
/// ```text
/// type  := inner '?'?
/// inner := 'List' '<' type '>' | Name '.' Name | Name
/// ```
///
/// Any other balanced generic (`Map<String, Object>`) is an opaque scalar.
pub fn parse_type_expr(
    text: &str,
    bases: &IndexMap<&str, &BaseTypeSource>,
    context: &str,
) -> Result<TypeRef, SchemaError> {
    let malformed = || SchemaError::MalformedType {
        text: text.to_string(),
        context: context.to_string(),
    };
    let text = text.trim();
    if text.is_empty() {
        return Err(malformed());
    }

    if let Some(inner) = text.strip_suffix('?') {
        if inner.trim_end().ends_with('?') {
            return Err(malformed());
        }
        return parse_type_expr(inner, bases, context).map(TypeRef::optional);
    }

    if let Some(rest) = text.strip_prefix("List") {
        let rest = rest.trim_start();
        if rest.starts_with('<') {
            let item = rest
                .strip_prefix('<')
                .and_then(|r| r.strip_suffix('>'))
                .ok_or_else(malformed)?;
            return parse_type_expr(item, bases, context).map(TypeRef::list);
        }
    }

    if text.contains(['<', '>']) {
        return if brackets_balance(text) { Ok(TypeRef::scalar(text)) } else { Err(malformed()) };
    }

    if let Some((head, tail)) = text.split_once('.') {
        if let Some(base) = bases.get(head) {
            if !base.variants.iter().any(|v| v.name == tail) {
                return Err(SchemaError::UnknownVariant {
                    base: head.to_string(),
                    variant: tail.to_string(),
                    context: context.to_string(),
                });
            }
            return Ok(TypeRef::variant(head, tail));
        }
        // a qualified host-language type
        return Ok(TypeRef::scalar(text));
    }

    if bases.contains_key(text) {
        Ok(TypeRef::base(text))
    } else {
        Ok(TypeRef::scalar(text))
    }
}

fn brackets_balance(text: &str) -> bool {
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '<' => depth += 1,
            '>' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}
