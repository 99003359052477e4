use confq::{
    Environment, EvalError, Evaluator, Value, parse,
    ast::{Expr, Statement},
};
use indexmap::IndexMap;
use pretty_assertions::assert_eq;

fn run(source: &str) -> Result<Vec<Value>, String> {
    let program = parse(source).map_err(|e| e.to_string())?;
    let mut emitted = Vec::new();
    Evaluator::new()
        .run(&program, &mut emitted)
        .map_err(|e| e.to_string())?;
    Ok(emitted)
}

/// Runs `source`, returning what was emitted before any evaluation error.
fn run_partial(source: &str) -> (Vec<Value>, Option<EvalError>) {
    let program = parse(source).unwrap();
    let mut emitted = Vec::new();
    let err = Evaluator::new().run(&program, &mut emitted).err();
    (emitted, err)
}

fn dict(pairs: Vec<(&str, Value)>) -> Value {
    let mut map = IndexMap::new();
    for (k, v) in pairs {
        map.insert(k.to_string(), v);
    }
    Value::Dict(map)
}

fn keys(value: &Value) -> Vec<&str> {
    value
        .as_dict()
        .expect("dict value")
        .keys()
        .map(String::as_str)
        .collect()
}

// ============================================================================
// Directives and bindings
// ============================================================================

#[test]
fn test_query_literals() {
    assert_eq!(run("q(1)").unwrap(), vec![Value::Number(1)]);
    assert_eq!(run("q(\"hi\")").unwrap(), vec![Value::String("hi".into())]);
    assert_eq!(run("q({})").unwrap(), vec![dict(vec![])]);
}

#[test]
fn test_sequential_rebinding() {
    let result = run("let x = 1\nq($[x])\nlet x = 2\nq($[x])").unwrap();
    assert_eq!(result, vec![Value::Number(1), Value::Number(2)]);
}

#[test]
fn test_binding_captures_value_not_reference() {
    let result = run("let a = 1\nlet b = {v => $[a]}\nlet a = 2\nq($[b])\nq($[a])").unwrap();
    assert_eq!(
        result,
        vec![dict(vec![("v", Value::Number(1))]), Value::Number(2)]
    );
}

#[test]
fn test_nested_variable_resolution() {
    let result = run("let x = 5\nq({k => $[x]})").unwrap();
    assert_eq!(result, vec![dict(vec![("k", Value::Number(5))])]);
}

#[test]
fn test_deeply_nested_resolution() {
    let source = r#"
        let host = "localhost"
        let port = 8080
        let server = {host => $[host], port => $[port]}
        q({app => {server => $[server], name => "api"}})
    "#;
    let result = run(source).unwrap();
    assert_eq!(
        result,
        vec![dict(vec![(
            "app",
            dict(vec![
                (
                    "server",
                    dict(vec![
                        ("host", Value::String("localhost".into())),
                        ("port", Value::Number(8080)),
                    ])
                ),
                ("name", Value::String("api".into())),
            ])
        )])]
    );
}

#[test]
fn test_dict_order_preserved() {
    let result = run("q({b => 1, a => 2})").unwrap();
    assert_eq!(keys(&result[0]), vec!["b", "a"]);
}

#[test]
fn test_duplicate_key_keeps_first_position_last_value() {
    let result = run("q({a => 1, b => 2, a => 3})").unwrap();
    assert_eq!(keys(&result[0]), vec!["a", "b"]);
    assert_eq!(result[0].as_dict().unwrap()["a"], Value::Number(3));
}

#[test]
fn test_duplicate_key_discarded_value_is_never_resolved() {
    let result = run("q({a => $[missing], a => 1})").unwrap();
    assert_eq!(result, vec![dict(vec![("a", Value::Number(1))])]);
}

#[test]
fn test_string_escape_passthrough() {
    let result = run(r#"q("a\"b")"#).unwrap();
    assert_eq!(result[0].as_str(), Some(r#"a\"b"#));
}

#[test]
fn test_let_produces_no_output() {
    assert_eq!(run("let x = {a => 1}").unwrap(), vec![]);
}

#[test]
fn test_bare_statements_produce_no_output() {
    assert_eq!(run("let x = 1\n1\n\"s\"\n{a => $[x]}\n$[x]").unwrap(), vec![]);
}

#[test]
fn test_output_order_matches_directive_order() {
    let result = run("q(3) q(1) q(2)").unwrap();
    assert_eq!(
        result,
        vec![Value::Number(3), Value::Number(1), Value::Number(2)]
    );
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_undefined_variable() {
    let (emitted, err) = run_partial("q($[y])");
    assert!(emitted.is_empty());
    assert!(matches!(err, Some(EvalError::UndefinedVariable(name)) if name == "y"));
}

#[test]
fn test_undefined_variable_message() {
    assert_eq!(run("q($[y])").unwrap_err(), "variable 'y' is not defined");
}

#[test]
fn test_bare_undefined_reference_fails() {
    let (_, err) = run_partial("$[nope]");
    assert!(matches!(err, Some(EvalError::UndefinedVariable(name)) if name == "nope"));
}

#[test]
fn test_undefined_inside_dict_fails() {
    let (_, err) = run_partial("let x = {a => {b => $[c]}}");
    assert!(matches!(err, Some(EvalError::UndefinedVariable(name)) if name == "c"));
}

#[test]
fn test_use_before_binding_fails() {
    let (emitted, err) = run_partial("q($[x])\nlet x = 1");
    assert!(emitted.is_empty());
    assert!(err.is_some());
}

#[test]
fn test_output_before_failure_is_kept() {
    let (emitted, err) = run_partial("q(1)\nq($[missing])\nq(3)");
    assert_eq!(emitted, vec![Value::Number(1)]);
    assert!(matches!(err, Some(EvalError::UndefinedVariable(_))));
}

#[test]
fn test_syntax_error_prevents_all_evaluation() {
    let err = run("q(1)\nbadtoken").unwrap_err();
    assert!(err.starts_with("line 2, column 1:"));
}

#[test]
fn test_determinism() {
    let source = "let a = {z => 1, y => \"two\"}\nq($[a])\nq({x => $[a]})";
    assert_eq!(run(source).unwrap(), run(source).unwrap());
}

// ============================================================================
// Evaluator API
// ============================================================================

#[test]
fn test_eval_statement_returns_emitted_value() {
    let mut evaluator = Evaluator::new();
    let emitted = evaluator
        .eval_statement(&Statement::Query(Expr::Number(9)))
        .unwrap();
    assert_eq!(emitted, Some(Value::Number(9)));

    let bound = evaluator
        .eval_statement(&Statement::Let {
            name: "n".into(),
            value: Expr::Number(9),
        })
        .unwrap();
    assert_eq!(bound, None);
    assert_eq!(evaluator.environment().get("n"), Some(&Value::Number(9)));
}

#[test]
fn test_evaluator_with_existing_environment() {
    let mut env = Environment::new();
    assert_eq!(env.bind("region", Value::String("eu".into())), None);

    let evaluator = Evaluator::with_environment(env);
    let value = evaluator.resolve(&Expr::VarRef("region".into())).unwrap();
    assert_eq!(value, Value::String("eu".into()));
}

#[test]
fn test_environment_last_binding_wins() {
    let program = parse("let a = 1\nlet b = 2\nlet a = 3").unwrap();
    let mut evaluator = Evaluator::new();
    evaluator.run(&program, &mut Vec::<Value>::new()).unwrap();

    let env = evaluator.into_environment();
    assert_eq!(env.len(), 2);
    assert!(env.contains("b"));
    assert_eq!(env.get("a"), Some(&Value::Number(3)));
}

#[test]
fn test_resolve_is_identity_for_literals() {
    let evaluator = Evaluator::new();
    assert_eq!(
        evaluator.resolve(&Expr::String(r"x\n".into())).unwrap(),
        Value::String(r"x\n".into())
    );
    assert_eq!(evaluator.resolve(&Expr::Number(0)).unwrap(), Value::Number(0));
    assert!(evaluator.environment().is_empty());
}
