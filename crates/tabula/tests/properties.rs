//! Property tests for parsing and operator associativity

use proptest::prelude::*;
use tabula::prelude::*;
use tabula::{parse, tokenize};

fn engine() -> FormulaEngine {
    let _ = env_logger::builder().is_test(true).try_init();
    FormulaEngine::new()
}

fn number(value: Value) -> f64 {
    match value {
        Value::Number(n) => n,
        other => panic!("Expected number, got {:?}", other),
    }
}

/// Arbitrary well-formed formulas over a few variables
fn formula() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        (0u32..1000).prop_map(|n| n.to_string()),
        prop::sample::select(vec!["a", "b", "c", "true", "false", "\"s\""])
            .prop_map(str::to_string),
    ];
    leaf.prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            (
                inner.clone(),
                prop::sample::select(vec![
                    "+", "-", "*", "/", "=", "!=", ">", ">=", "<", "<=", "&", "|",
                ]),
                inner.clone()
            )
                .prop_map(|(l, op, r)| format!("{} {} {}", l, op, r)),
            inner.clone().prop_map(|e| format!("({})", e)),
            inner.clone().prop_map(|e| format!("-{}", e)),
            prop::collection::vec(inner, 0..3)
                .prop_map(|args| format!("sum({})", args.join(", "))),
        ]
    })
}

proptest! {
    #[test]
    fn parse_is_deterministic(f in formula()) {
        let tokens = tokenize(&f).unwrap();
        prop_assert_eq!(tokenize(&f).unwrap(), tokens.clone());
        prop_assert_eq!(parse(&tokens).unwrap(), parse(&tokens).unwrap());
    }

    #[test]
    fn dependencies_are_unique(f in formula()) {
        let deps = engine().get_dependencies(&f).unwrap();
        let mut unique = deps.clone();
        unique.sort();
        unique.dedup();
        prop_assert_eq!(unique.len(), deps.len());
        prop_assert!(deps.iter().all(|d| ["a", "b", "c"].contains(&d.as_str())));
    }

    #[test]
    fn subtraction_is_left_associative(
        a in -1000i32..1000,
        b in -1000i32..1000,
        c in -1000i32..1000
    ) {
        let local = Context::new().with("a", a).with("b", b).with("c", c);
        let result = number(engine().evaluate("a - b - c", &local).unwrap());
        prop_assert_eq!(result, (a - b - c) as f64);
    }

    #[test]
    fn division_is_left_associative(a in 1i32..1000, b in 1i32..100, c in 1i32..100) {
        let local = Context::new().with("a", a).with("b", b).with("c", c);
        let result = number(engine().evaluate("a / b / c", &local).unwrap());
        prop_assert_eq!(result, a as f64 / b as f64 / c as f64);
    }

    #[test]
    fn multiplication_binds_tighter(a in -100i32..100, b in -100i32..100, c in -100i32..100) {
        let local = Context::new().with("a", a).with("b", b).with("c", c);
        let result = number(engine().evaluate("a + b * c", &local).unwrap());
        prop_assert_eq!(result, (a + b * c) as f64);
    }
}
