//! Built-in schema for the Lox tree-walking interpreter.
//!
//! Optional markers (`?`) mean nothing to the Java backend, where every
//! reference may be null, but let the Rust backend emit `Option`.
use crate::source::{BaseTypeSource, SchemaDocument, SchemaSource};

pub const PACKAGE: &str = "com.craftinginterpreters.lox";

pub fn document() -> SchemaDocument {
    SchemaDocument {
        package: Some(PACKAGE.to_string()),
        imports: Vec::new(),
        types: schema_source(),
    }
}

pub fn schema_source() -> SchemaSource {
    SchemaSource::new().with(expr()).with(stmt())
}

fn expr() -> BaseTypeSource {
    BaseTypeSource::new("Expr")
        .variant("Binary", [("left", "Expr"), ("operator", "Token"), ("right", "Expr")])
        .variant("Logical", [("left", "Expr"), ("operator", "Token"), ("right", "Expr")])
        .variant("Grouping", [("expression", "Expr")])
        .variant("Literal", [("value", "Object")])
        .variant("Unary", [("operator", "Token"), ("right", "Expr")])
        .variant("Variable", [("name", "Token")])
        .variant("Assign", [("name", "Token"), ("value", "Expr")])
        .variant("Call", [("callee", "Expr"), ("paren", "Token"), ("arguments", "List<Expr>")])
        .variant("Get", [("object", "Expr"), ("name", "Token")])
        .variant("Set", [("object", "Expr"), ("name", "Token"), ("value", "Expr")])
        .variant("This", [("keyword", "Token")])
        .variant("Super", [("keyword", "Token"), ("method", "Token")])
}

fn stmt() -> BaseTypeSource {
    BaseTypeSource::new("Stmt")
        .variant("Block", [("statements", "List<Stmt>")])
        .variant("Expression", [("expression", "Expr")])
        .variant("Print", [("expression", "Expr")])
        .variant("Var", [("name", "Token"), ("initializer", "Expr?")])
        .variant("If", [("condition", "Expr"), ("thenBranch", "Stmt"), ("elseBranch", "Stmt?")])
        .variant("While", [("condition", "Expr"), ("body", "Stmt")])
        .variant("Function", [("name", "Token"), ("params", "List<Token>"), ("body", "List<Stmt>")])
        .variant("Return", [("keyword", "Token"), ("value", "Expr?")])
        .variant("Class", [("name", "Token"), ("super_", "Expr.Variable?"), ("methods", "List<Stmt.Function>")])
}
