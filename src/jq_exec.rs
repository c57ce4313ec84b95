use jaq_core::{load, Compiler, Ctx, RcIter};
use jaq_json::Val;
use serde_json::Value;

/// Run a jq filter over `input`; every output becomes one JSON value.
///
/// Failures come back as the message carried by `SourceError::Jq`.
pub fn run_jq(filter_src: &str, input: &Value) -> Result<Vec<Value>, String> {
    let loader = load::Loader::new(jaq_std::defs().chain(jaq_json::defs()));
    let arena = load::Arena::default();
    let program = load::File { code: filter_src, path: () };

    let modules = loader.load(&arena, program).map_err(|errs| {
        let problems = errs.into_iter().map(|(_, err)| format!("parse error: {err:?}"));
        failure(filter_src, problems)
    })?;

    let filter = Compiler::default()
        .with_funs(jaq_std::funs().chain(jaq_json::funs()))
        .compile(modules)
        .map_err(|errs| {
            let problems = errs
                .into_iter()
                .flat_map(|(_, list)| list)
                .map(|(name, undef)| format!("undefined `{name}`: {undef:?}"));
            failure(filter_src, problems)
        })?;

    let inputs = RcIter::new(core::iter::empty());
    let outputs = filter.run((Ctx::new([], &inputs), Val::from(input.clone())));

    let mut out = Vec::new();
    for item in outputs {
        let val = item.map_err(|e| failure(filter_src, [format!("runtime error: {e:?}")]))?;
        // Val's Display is JSON text
        let text = val.to_string();
        let value = serde_json::from_str::<Value>(&text)
            .map_err(|e| failure(filter_src, [format!("output is not JSON ({e}): {text}")]))?;
        out.push(value);
    }
    Ok(out)
}

fn failure(filter_src: &str, problems: impl IntoIterator<Item = String>) -> String {
    let problems = problems.into_iter().collect::<Vec<_>>().join("; ");
    format!("{problems} in `{filter_src}`")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn selects_nested_schema() {
        let input = json!({ "tools": [{ "ast": { "types": { "Expr": {} } } }] });
        let out = run_jq(".tools[0].ast", &input).unwrap();
        assert_eq!(out, vec![json!({ "types": { "Expr": {} } })]);
    }

    #[test]
    fn bad_filters_name_the_filter() {
        let err = run_jq(".[", &json!({})).unwrap_err();
        assert!(err.starts_with("parse error: "), "{err}");
        assert!(err.ends_with(" in `.[`"), "{err}");
    }

    #[test]
    fn undefined_functions_are_reported() {
        let err = run_jq("no_such_fn", &json!({})).unwrap_err();
        assert!(err.contains("undefined `no_such_fn`"), "{err}");
    }
}
