//! Class-hierarchy output: an abstract umbrella class with a nested
//! `Visitor<R>` interface and one nested static class per variant.
use indexmap::IndexSet;

use super::{check_reserved, Backend, Emitter, UnitCx};
use crate::error::SchemaError;
use crate::naming::{dispatch_method_name, is_java_keyword};
use crate::schema::{BaseType, Schema, TypeRef, Variant};

const LIST_IMPORT: &str = "java.util.List";

// `List` is imported, `Override` annotates every `accept`.
const RESERVED: &[&str] = &["Visitor", "R", "List", "Override"];

fn visitor_param(base: &str) -> String {
    base.to_lowercase()
}

#[derive(Debug, Clone, Default)]
pub struct Java {
    pub package: Option<String>,
    /// Emitted before the automatic `java.util.List` import.
    pub imports: Vec<String>,
}

impl Java {
    pub fn new(package: Option<String>, imports: Vec<String>) -> Self {
        Self { package, imports }
    }

    fn imports_for(&self, base: &BaseType) -> Vec<String> {
        let mut imports: IndexSet<String> = self.imports.iter().cloned().collect();
        let uses_list = base
            .variants
            .iter()
            .flat_map(|v| &v.fields)
            .any(|f| f.ty.uses_list());
        if uses_list {
            imports.insert(LIST_IMPORT.to_string());
        }
        imports.into_iter().collect()
    }
}

pub fn render_type(ty: &TypeRef) -> String {
    match ty {
        TypeRef::Scalar { name } | TypeRef::Base { name } => name.clone(),
        TypeRef::Variant { base, variant } => format!("{base}.{variant}"),
        TypeRef::List { item } => format!("List<{}>", render_type(item)),
        // references are nullable already
        TypeRef::Optional { inner } => render_type(inner),
    }
}

impl Backend for Java {
    fn name(&self) -> &'static str {
        "java"
    }

    fn file_name(&self, base: &BaseType) -> String {
        format!("{}.java", base.name)
    }

    fn reserved_names(&self) -> &'static [&'static str] {
        RESERVED
    }

    fn check(&self, schema: &Schema) -> Result<(), SchemaError> {
        check_reserved(self.name(), self.reserved_names(), schema)?;
        let keyword = |name: &str, context: &str| {
            if is_java_keyword(name) {
                Err(SchemaError::ReservedName {
                    name: name.to_string(),
                    backend: "java",
                    context: context.to_string(),
                })
            } else {
                Ok(())
            }
        };
        for base in &schema.base_types {
            keyword(&base.name, "base type list")?;
            // also the visitor parameter name
            keyword(&visitor_param(&base.name), &base.name)?;
            for variant in &base.variants {
                keyword(&variant.name, &base.name)?;
                let context = format!("{}.{}", base.name, variant.name);
                for field in &variant.fields {
                    keyword(&field.name, &context)?;
                }
            }
        }
        Ok(())
    }

    fn emit_dispatch_interface(&self, cx: UnitCx<'_>, out: &mut Emitter) {
        let param = visitor_param(&cx.base.name);
        out.block("interface Visitor<R> {", "}", |out| {
            for variant in &cx.base.variants {
                let method = dispatch_method_name(&variant.name, &cx.base.name);
                out.line(format!("R {method}({} {param});", variant.name));
            }
        });
    }

    fn emit_variant(&self, cx: UnitCx<'_>, variant: &Variant, out: &mut Emitter) {
        let header = format!("static class {} extends {} {{", variant.name, cx.base.name);
        out.block(header, "}", |out| {
            for field in &variant.fields {
                out.line(format!("final {} {};", render_type(&field.ty), field.name));
            }
            if !variant.fields.is_empty() {
                out.blank();
            }

            let params = variant
                .fields
                .iter()
                .map(|f| format!("{} {}", render_type(&f.ty), f.name))
                .collect::<Vec<_>>()
                .join(", ");
            out.block(format!("{}({params}) {{", variant.name), "}", |out| {
                for field in &variant.fields {
                    out.line(format!("this.{0} = {0};", field.name));
                }
            });
            out.blank();

            let method = dispatch_method_name(&variant.name, &cx.base.name);
            out.line("@Override");
            out.block("<R> R accept(Visitor<R> visitor) {", "}", |out| {
                out.line(format!("return visitor.{method}(this);"));
            });
        });
    }

    fn assemble(&self, cx: UnitCx<'_>) -> String {
        let mut out = Emitter::new("\t");
        out.line(format!("// Generated by ast-gen from the `{}` schema. Do not edit.", cx.base.name));
        out.blank();
        if let Some(package) = &self.package {
            out.line(format!("package {package};"));
            out.blank();
        }
        let imports = self.imports_for(cx.base);
        if !imports.is_empty() {
            for import in &imports {
                out.line(format!("import {import};"));
            }
            out.blank();
        }

        out.block(format!("abstract class {} {{", cx.base.name), "}", |out| {
            self.emit_dispatch_interface(cx, out);
            out.blank();
            out.line("abstract <R> R accept(Visitor<R> visitor);");
            for variant in &cx.base.variants {
                out.blank();
                self.emit_variant(cx, variant, out);
            }
        });
        out.into_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::generate;
    use crate::lower::lower;
    use crate::source::{BaseTypeSource, SchemaSource};
    use pretty_assertions::assert_eq;

    fn unit_for(source: SchemaSource, backend: &Java) -> String {
        let schema = lower(&source).unwrap();
        let cx = UnitCx { schema: &schema, base: &schema.base_types[0] };
        backend.assemble(cx)
    }

    #[test]
    fn binary_expr_unit() {
        let source = SchemaSource::new().with(
            BaseTypeSource::new("Expr").variant("Binary", [("left", "Expr"), ("operator", "Token"), ("right", "Expr")]),
        );
        let java = Java::new(Some("com.craftinginterpreters.lox".into()), vec![]);
        let expected = "\
// Generated by ast-gen from the `Expr` schema. Do not edit.

package com.craftinginterpreters.lox;

abstract class Expr {
\tinterface Visitor<R> {
\t\tR visitBinaryExpr(Binary expr);
\t}

\tabstract <R> R accept(Visitor<R> visitor);

\tstatic class Binary extends Expr {
\t\tfinal Expr left;
\t\tfinal Token operator;
\t\tfinal Expr right;

\t\tBinary(Expr left, Token operator, Expr right) {
\t\t\tthis.left = left;
\t\t\tthis.operator = operator;
\t\t\tthis.right = right;
\t\t}

\t\t@Override
\t\t<R> R accept(Visitor<R> visitor) {
\t\t\treturn visitor.visitBinaryExpr(this);
\t\t}
\t}
}
";
        assert_eq!(unit_for(source, &java), expected);
    }

    #[test]
    fn lists_pull_in_the_list_import_once() {
        let source = SchemaSource::new().with(
            BaseTypeSource::new("Stmt")
                .variant("Block", [("statements", "List<Stmt>")])
                .variant("Class", [("name", "Token"), ("methods", "List<Stmt.Function>")])
                .variant("Function", [("name", "Token"), ("params", "List<Token>"), ("body", "List<Stmt>")]),
        );
        let java = Java::new(None, vec!["java.util.List".into(), "lox.Token".into()]);
        let unit = unit_for(source, &java);
        assert_eq!(unit.matches("import java.util.List;").count(), 1);
        assert!(unit.contains("import lox.Token;"));
        assert!(unit.contains("\t\tfinal List<Stmt.Function> methods;\n"));
        assert!(unit.contains("\t\tClass(Token name, List<Stmt.Function> methods) {\n"));
        assert!(!unit.contains("package"));
    }

    #[test]
    fn optional_fields_render_as_plain_references() {
        let source = SchemaSource::new().with(
            BaseTypeSource::new("Stmt").variant("If", [("condition", "Expr"), ("thenBranch", "Stmt"), ("elseBranch", "Stmt?")]),
        );
        let unit = unit_for(source, &Java::default());
        assert!(unit.contains("\t\tIf(Expr condition, Stmt thenBranch, Stmt elseBranch) {\n"));
        assert!(unit.contains("R visitIfStmt(If stmt);"));
    }

    #[test]
    fn fieldless_variant_and_empty_base() {
        let source = SchemaSource::new().with(BaseTypeSource::new("Expr").variant("Nil", []));
        let unit = unit_for(source, &Java::default());
        assert!(unit.contains("\tstatic class Nil extends Expr {\n\t\tNil() {\n\t\t}\n\n\t\t@Override\n"));

        let source = SchemaSource::new().with(BaseTypeSource::new("Decl"));
        let unit = unit_for(source, &Java::default());
        assert!(unit.ends_with(
            "abstract class Decl {\n\tinterface Visitor<R> {\n\t}\n\n\tabstract <R> R accept(Visitor<R> visitor);\n}\n"
        ));
    }

    #[test]
    fn java_keywords_are_rejected() {
        let cases = [
            (BaseTypeSource::new("Class").variant("Decl", [("name", "Token")]), "class", "Class"),
            (BaseTypeSource::new("Expr").variant("Cast", [("int", "Token")]), "int", "Expr.Cast"),
            (BaseTypeSource::new("Expr").variant("New", [("class", "Token")]), "class", "Expr.New"),
        ];
        for (base, name, context) in cases {
            let schema = lower(&SchemaSource::new().with(base)).unwrap();
            assert_eq!(
                generate(&schema, &Java::default()),
                Err(SchemaError::ReservedName { name: name.into(), backend: "java", context: context.into() })
            );
        }
    }

    #[test]
    fn shadowing_variant_names_are_rejected() {
        for variant in ["R", "List", "Override"] {
            let source = SchemaSource::new().with(BaseTypeSource::new("Expr").variant(variant, [("value", "Token")]));
            let schema = lower(&source).unwrap();
            assert_eq!(
                generate(&schema, &Java::default()),
                Err(SchemaError::ReservedName { name: variant.into(), backend: "java", context: "Expr".into() })
            );
        }
    }
}
