// Resolved schema model. Every type reference here is already classified;
// no raw type text survives past `lower`.
use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::SchemaError;

static IDENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
});

pub fn is_identifier(name: &str) -> bool {
    IDENT.is_match(name)
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Schema {
    pub base_types: Vec<BaseType>,       // declaration order = unit order
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaseType {
    pub name: String,
    pub variants: Vec<Variant>,          // declaration order = dispatch method order
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variant {
    pub name: String,
    pub fields: Vec<Field>,              // declaration order = member and parameter order
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeRef {
    Scalar { name: String },                 // opaque, emitted verbatim
    Base { name: String },                   // may be the declaring base type itself
    Variant { base: String, variant: String },
    List { item: Box<TypeRef> },
    Optional { inner: Box<TypeRef> },
}

impl TypeRef {
    pub fn scalar(name: impl Into<String>) -> Self {
        Self::Scalar { name: name.into() }
    }
    pub fn base(name: impl Into<String>) -> Self {
        Self::Base { name: name.into() }
    }
    pub fn variant(base: impl Into<String>, variant: impl Into<String>) -> Self {
        Self::Variant { base: base.into(), variant: variant.into() }
    }
    pub fn list(item: TypeRef) -> Self {
        Self::List { item: Box::new(item) }
    }
    pub fn optional(inner: TypeRef) -> Self {
        Self::Optional { inner: Box::new(inner) }
    }

    /// True if a sequence appears anywhere in this reference.
    pub fn uses_list(&self) -> bool {
        match self {
            Self::List { .. } => true,
            Self::Optional { inner } => inner.uses_list(),
            Self::Scalar { .. } | Self::Base { .. } | Self::Variant { .. } => false,
        }
    }
}

impl Schema {
    pub fn base_type(&self, name: &str) -> Option<&BaseType> {
        self.base_types.iter().find(|b| b.name == name)
    }

    /// Check the invariants generation relies on. Names are unique at every
    /// level, identifiers are well formed, and every base or variant
    /// reference points at something declared in this schema.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut base_names = IndexSet::new();
        for base in &self.base_types {
            check_ident(&base.name, || "base type list".to_string())?;
            if !base_names.insert(base.name.as_str()) {
                return Err(SchemaError::DuplicateBaseType { name: base.name.clone() });
            }
        }

        for base in &self.base_types {
            let mut variant_names = IndexSet::new();
            for variant in &base.variants {
                check_ident(&variant.name, || base.name.clone())?;
                if !variant_names.insert(variant.name.as_str()) {
                    return Err(SchemaError::DuplicateVariant {
                        base: base.name.clone(),
                        variant: variant.name.clone(),
                    });
                }
                if base_names.contains(variant.name.as_str()) {
                    return Err(SchemaError::VariantShadowsBase {
                        base: base.name.clone(),
                        variant: variant.name.clone(),
                    });
                }

                let mut field_names = IndexSet::new();
                for field in &variant.fields {
                    let context = || format!("{}.{}", base.name, variant.name);
                    check_ident(&field.name, context)?;
                    if !field_names.insert(field.name.as_str()) {
                        return Err(SchemaError::DuplicateField {
                            base: base.name.clone(),
                            variant: variant.name.clone(),
                            field: field.name.clone(),
                        });
                    }
                    let context = format!("{}.{}.{}", base.name, variant.name, field.name);
                    self.check_ref(&field.ty, &context)?;
                }
            }
        }
        Ok(())
    }

    fn check_ref(&self, ty: &TypeRef, context: &str) -> Result<(), SchemaError> {
        match ty {
            TypeRef::Scalar { name } if name.trim().is_empty() => Err(SchemaError::MalformedType {
                text: name.clone(),
                context: context.to_string(),
            }),
            TypeRef::Scalar { .. } => Ok(()),
            TypeRef::Base { name } => match self.base_type(name) {
                Some(_) => Ok(()),
                None => Err(SchemaError::UnknownBaseType {
                    name: name.clone(),
                    context: context.to_string(),
                }),
            },
            TypeRef::Variant { base, variant } => {
                let Some(target) = self.base_type(base) else {
                    return Err(SchemaError::UnknownBaseType {
                        name: base.clone(),
                        context: context.to_string(),
                    });
                };
                if target.variant(variant).is_none() {
                    return Err(SchemaError::UnknownVariant {
                        base: base.clone(),
                        variant: variant.clone(),
                        context: context.to_string(),
                    });
                }
                Ok(())
            }
            TypeRef::List { item } => self.check_ref(item, context),
            TypeRef::Optional { inner } => self.check_ref(inner, context),
        }
    }
}

impl BaseType {
    pub fn variant(&self, name: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.name == name)
    }
}

fn check_ident(name: &str, context: impl FnOnce() -> String) -> Result<(), SchemaError> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(SchemaError::InvalidIdentifier { name: name.to_string(), context: context() })
    }
}
