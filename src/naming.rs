//! Deterministic names shared by every backend.

/// Name of the dispatch method for `variant` of `base`: `visit` + variant + base.
///
/// Distinct variants of one base type always get distinct names, since the
/// base suffix is fixed and variant names are unique within it.
pub fn dispatch_method_name(variant: &str, base: &str) -> String {
    format!("visit{variant}{base}")
}

/// `visitBinaryExpr` → `visit_binary_expr`, `HTTPRequest` → `http_request`.
pub fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            let prev = i.checked_sub(1).map(|j| chars[j]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                None | Some('_') => false,
                Some(p) if p.is_ascii_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_ascii_uppercase() => next.is_some_and(|n| n.is_ascii_lowercase()),
                Some(_) => false,
            };
            if boundary {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

// strict + reserved keywords, 2024 edition
const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "static", "struct", "trait", "true", "type", "unsafe",
    "use", "where", "while", "abstract", "become", "box", "do", "final", "macro", "override",
    "priv", "try", "typeof", "unsized", "virtual", "yield",
];

// cannot be raw identifiers
const RUST_PATH_KEYWORDS: &[&str] = &["self", "Self", "super", "crate", "_"];

/// Snake-cased Rust identifier for a schema field or parameter name.
pub fn rust_ident(name: &str) -> String {
    let snake = snake_case(name);
    if RUST_PATH_KEYWORDS.contains(&snake.as_str()) {
        format!("{snake}_")
    } else if RUST_KEYWORDS.contains(&snake.as_str()) {
        format!("r#{snake}")
    } else {
        snake
    }
}

/// Module path segment for a base type's unit: `Type` → `r#type`, `Super` → `super_`.
pub fn rust_module_name(base: &str) -> String {
    rust_ident(base)
}

/// File holding the module from [`rust_module_name`]; raw identifiers map to
/// their bare spelling (`r#type` lives in `type.rs`).
pub fn rust_module_file(base: &str) -> String {
    let module = rust_module_name(base);
    format!("{}.rs", module.trim_start_matches("r#"))
}

// keywords plus the literals and contextual names that cannot name a type or variable
const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class",
    "const", "continue", "default", "do", "double", "else", "enum", "extends", "final",
    "finally", "float", "for", "goto", "if", "implements", "import", "instanceof", "int",
    "interface", "long", "native", "new", "package", "private", "protected", "public",
    "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this",
    "throw", "throws", "transient", "try", "void", "volatile", "while", "true", "false",
    "null", "var", "yield", "record", "_",
];

pub fn is_java_keyword(name: &str) -> bool {
    JAVA_KEYWORDS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_name_is_plain_concatenation() {
        assert_eq!(dispatch_method_name("Binary", "Expr"), "visitBinaryExpr");
        assert_eq!(dispatch_method_name("Var", "Stmt"), "visitVarStmt");
    }

    #[test]
    fn snake_case_handles_camel_and_acronyms() {
        assert_eq!(snake_case("visitBinaryExpr"), "visit_binary_expr");
        assert_eq!(snake_case("thenBranch"), "then_branch");
        assert_eq!(snake_case("HTTPRequest"), "http_request");
        assert_eq!(snake_case("Expr"), "expr");
        assert_eq!(snake_case("super_"), "super_");
        assert_eq!(snake_case("already_snake"), "already_snake");
        assert_eq!(snake_case("Vec3D"), "vec3_d");
    }

    #[test]
    fn rust_ident_escapes_keywords() {
        assert_eq!(rust_ident("type"), "r#type");
        assert_eq!(rust_ident("Loop"), "r#loop");
        assert_eq!(rust_ident("self"), "self_");
        assert_eq!(rust_ident("elseBranch"), "else_branch");
    }

    #[test]
    fn module_names_and_files_for_keyword_bases() {
        assert_eq!(rust_module_name("Expr"), "expr");
        assert_eq!(rust_module_name("Type"), "r#type");
        assert_eq!(rust_module_file("Type"), "type.rs");
        assert_eq!(rust_module_name("Super"), "super_");
        assert_eq!(rust_module_file("Super"), "super_.rs");
        assert_eq!(rust_module_file("TypeExpr"), "type_expr.rs");
    }

    #[test]
    fn java_keywords() {
        assert!(is_java_keyword("class"));
        assert!(is_java_keyword("int"));
        assert!(!is_java_keyword("Class"));
        assert!(!is_java_keyword("operator"));
    }
}
