use ruleexpr::{Environment, Expr, LiteralKind, Operator, RuleError, Scalar, parse};

/// Helper function to parse a rule and evaluate it as a native integer
fn eval_int(input: &str, env: &Environment) -> Result<isize, RuleError> {
    parse(input)?.eval_int(env)
}

/// Helper function to parse a rule and evaluate it as a boolean
fn eval_bool(input: &str, env: &Environment) -> Result<bool, RuleError> {
    parse(input)?.eval_bool(env)
}

#[test]
fn test_nested_arithmetic() {
    let env = Environment::new().with("id", 10);
    assert_eq!(eval_int("(+ (- id 1) 2 (+ 3 4))", &env).unwrap(), 18);
    assert_eq!(eval_int("(+  (- id 1) 2 (+ 3 4))", &env).unwrap(), 18);
    assert_eq!(eval_int("(* (+ 1 2) (- 5 2))", &env).unwrap(), 9);
}

#[test]
fn test_dotted_identifiers() {
    let env = Environment::new().with("sale.Shop.ShopID", 3);
    let rule = parse("(if (>= sale.Shop.ShopID 1) 10.1 0)").unwrap();
    assert_eq!(rule.eval_float(&env).unwrap(), 10.1);
    assert_eq!(rule.eval_int(&env).unwrap(), 10);

    let env = Environment::new().with("sale.Shop.ShopID", 0);
    assert_eq!(rule.eval_float(&env).unwrap(), 0.0);
}

#[test]
fn test_comparison_coerces_to_float() {
    let env = Environment::new().with("a", 3).with("b", 3.0);
    assert_eq!(env.get("a"), Some(Scalar::Int(3)));
    assert_eq!(env.get("b"), Some(Scalar::Float(3.0)));
    assert!(eval_bool("(== a b)", &env).unwrap());
    assert!(!eval_bool("(!= a b)", &env).unwrap());
}

#[test]
fn test_short_circuit_hides_lookup_faults() {
    let env = Environment::new();
    assert_eq!(eval_bool("(and 0 missing.value)", &env), Ok(false));
    assert_eq!(eval_bool("(or 1 missing.value)", &env), Ok(true));
    assert_eq!(
        eval_bool("(and 1 missing.value)", &env),
        Err(RuleError::UnboundVariable("missing.value".to_string()))
    );
}

#[test]
fn test_in_operator() {
    let env = Environment::new().with("x", 5);
    assert!(eval_bool("(in x 1 5 9)", &env).unwrap());
    assert!(!eval_bool("(in x 2 3)", &env).unwrap());
}

#[test]
fn test_rule_is_reusable() {
    let rule = parse("(if (> price 100) (* price 0.9) price)").unwrap();
    let cheap = Environment::new().with("price", 50.0);
    let expensive = Environment::new().with("price", 200.0);

    assert_eq!(rule.eval_float(&cheap).unwrap(), 50.0);
    assert_eq!(rule.eval_float(&expensive).unwrap(), 180.0);
    // Evaluating again gives the same answers
    assert_eq!(rule.eval_float(&cheap).unwrap(), 50.0);
    assert_eq!(rule.eval_int64(&cheap).unwrap(), 50);
}

#[test]
fn test_rule_is_shareable_across_threads() {
    let rule = parse("(+ (* base 2) bonus)").unwrap();
    let results: Vec<i64> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4i64)
            .map(|i| {
                let rule = &rule;
                scope.spawn(move || {
                    let env = Environment::new().with("base", i).with("bonus", 1);
                    rule.eval_int64(&env).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(results, vec![1, 3, 5, 7]);
}

#[test]
fn test_literal_type_consistency() {
    let env = Environment::new();
    for text in ["0", "7", "-42", "123456789"] {
        let literal = Expr::Literal {
            kind: LiteralKind::Int,
            text: text.to_string(),
        };
        let int = literal.eval_int(&env).unwrap();
        let int64 = literal.eval_int64(&env).unwrap();
        let float = literal.eval_float(&env).unwrap();
        assert_eq!(int as i64, int64, "literal {}", text);
        assert_eq!(float as i64, int64, "literal {}", text);
    }

    for text in ["0.0", "10.1", "-2.75", "3.999", "1e3"] {
        let literal = Expr::float(text);
        let expected: f64 = text.parse().unwrap();
        assert_eq!(literal.eval_float(&env).unwrap(), expected);
        assert_eq!(literal.eval_int(&env).unwrap(), expected.trunc() as isize);
        assert_eq!(literal.eval_int64(&env).unwrap(), expected.trunc() as i64);
    }
}

#[test]
fn test_hand_built_minimum_arity() {
    let env = Environment::new();
    let empty = |op| Expr::operation(op, vec![]);
    assert_eq!(empty(Operator::Add).eval_int(&env).unwrap(), 0);
    assert_eq!(empty(Operator::Mul).eval_int(&env).unwrap(), 1);
    assert!(empty(Operator::And).eval_bool(&env).unwrap());
    assert!(!empty(Operator::Or).eval_bool(&env).unwrap());

    let one = |op| Expr::operation(op, vec![Expr::int("8")]);
    assert_eq!(one(Operator::Sub).eval_int(&env).unwrap(), 8);
    assert_eq!(one(Operator::Div).eval_int(&env).unwrap(), 8);

    let ternary = Expr::operation(
        Operator::If,
        vec![Expr::int("0"), Expr::int("1"), Expr::int("2")],
    );
    assert_eq!(ternary.eval_int(&env).unwrap(), 2);
}

#[test]
fn test_errors_are_recoverable() {
    let env = Environment::new();

    let parse_errors = ["(+ 1 2", "(= 1 1)", "(foo 1)", "(+ 1 $)", "+ 1 2"];
    for input in parse_errors {
        let err = parse(input).unwrap_err();
        assert!(err.is_parse_error(), "input {}: {}", input, err);
    }

    let eval_errors = ["(if 1 2)", "(/ 1 0)", "(+ x 1)", "(> 1 2)", "(+ 1e30)", "(+ 1e400)"];
    for input in eval_errors {
        let err = eval_int(input, &env).unwrap_err();
        assert!(!err.is_parse_error(), "input {}: {}", input, err);
    }
}

#[test]
fn test_error_messages() {
    let env = Environment::new();
    assert_eq!(
        eval_int("(+ x 1)", &env).unwrap_err().to_string(),
        "Unbound variable: x"
    );
    assert_eq!(
        eval_int("(< 1 2)", &env).unwrap_err().to_string(),
        "Type error: '<' cannot be evaluated as int"
    );
    assert_eq!(
        parse("(+ 1 2").unwrap_err().to_string(),
        "Parse error: missing closing parenthesis for '+' group"
    );
    assert_eq!(
        eval_int("(* 2 1e30)", &env).unwrap_err().to_string(),
        "Evaluation error: 1e30 is out of range for int"
    );
}

#[test]
fn test_integer_projections_never_saturate() {
    let env = Environment::new()
        .with("nan", f64::NAN)
        .with("wide", i64::MAX)
        .with("tiny", 1e-300);

    // A fault, never a clamped MAX / MIN / 0
    assert!(eval_int("(+ 1e30)", &env).is_err());
    assert!(parse("(- 0 1e19)").unwrap().eval_int64(&env).is_err());
    assert!(parse("(+ 1e400)").unwrap().eval_float(&env).is_err());
    assert!(parse("(+ 1e400)").unwrap().eval_int64(&env).is_err());
    assert!(eval_int("(+ nan)", &env).is_err());

    // In-range values still truncate toward zero
    assert_eq!(eval_int("(+ tiny)", &env), Ok(0));
    assert_eq!(parse("(+ 9.2e18)").unwrap().eval_int64(&env), Ok(9_200_000_000_000_000_000));
    assert_eq!(parse("(+ wide)").unwrap().eval_int64(&env), Ok(i64::MAX));
}

#[test]
fn test_repl_dependencies_are_feature_gated() {
    let manifest = include_str!("../Cargo.toml");
    for dependency in ["env_logger", "rustyline"] {
        let line = manifest
            .lines()
            .find(|line| line.starts_with(&format!("{} =", dependency)))
            .unwrap();
        assert!(line.contains("optional = true"), "{}", line);
        assert!(manifest.contains(&format!("\"dep:{}\"", dependency)));
    }
    let bin = manifest.split("[[bin]]").nth(1).unwrap();
    let bin = bin.split("[[").next().unwrap();
    assert!(bin.contains("required-features = [\"repl\"]"));
}

#[cfg(feature = "json")]
mod flattened_environment {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    #[allow(non_snake_case)]
    struct Shop {
        ShopID: i32,
    }

    #[derive(Serialize)]
    #[allow(non_snake_case)]
    struct Sale {
        SaleID: i64,
        SalePrice: f64,
        Shop: Option<Box<Shop>>,
    }

    #[test]
    fn test_rules_over_flattened_struct() {
        let sale = Sale {
            SaleID: 1,
            SalePrice: 2.2,
            Shop: Some(Box::new(Shop { ShopID: 3 })),
        };
        let env = Environment::from_serialize(&sale, "sale").unwrap();

        let rule = parse("(if (>= sale.SaleID 1) 10.1 0)").unwrap();
        assert_eq!(rule.eval_float(&env).unwrap(), 10.1);

        assert!(
            eval_bool("(and (== sale.Shop.ShopID 3) (> sale.SalePrice 2))", &env).unwrap()
        );
        assert_eq!(eval_int("(if (== sale.Shop.ShopID 2.3) 5 0)", &env).unwrap(), 0);
    }

    #[test]
    fn test_missing_reference_field() {
        let sale = Sale {
            SaleID: 1,
            SalePrice: 2.2,
            Shop: None,
        };
        let env = Environment::from_serialize(&sale, "sale").unwrap();
        assert_eq!(
            eval_bool("(> sale.Shop.ShopID 0)", &env),
            Err(RuleError::UnboundVariable("sale.Shop.ShopID".to_string()))
        );
    }
}
