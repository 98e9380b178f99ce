//! Property tests over randomly generated expressions.

use exprcc::{Config, compile, generate_assembly, vm};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Expr {
  Num(u16),
  Neg(Box<Expr>),
  Bin(&'static str, Box<Expr>, Box<Expr>),
}

const OPS: [&str; 10] = ["+", "-", "*", "/", "==", "!=", "<", "<=", ">", ">="];

impl Expr {
  /// Fully parenthesised source text.
  fn source(&self) -> String {
    match self {
      Expr::Num(n) => n.to_string(),
      Expr::Neg(e) => format!("-({})", e.source()),
      Expr::Bin(op, l, r) => format!("({} {op} {})", l.source(), r.source()),
    }
  }

  /// Direct evaluation with the target's semantics. `None` where the
  /// hardware would fault.
  fn value(&self) -> Option<i64> {
    Some(match self {
      Expr::Num(n) => i64::from(*n),
      Expr::Neg(e) => 0i64.wrapping_sub(e.value()?),
      Expr::Bin(op, l, r) => {
        let (a, b) = (l.value()?, r.value()?);
        match *op {
          "+" => a.wrapping_add(b),
          "-" => a.wrapping_sub(b),
          "*" => a.wrapping_mul(b),
          "/" => a.checked_div(b)?,
          "==" => i64::from(a == b),
          "!=" => i64::from(a != b),
          "<" => i64::from(a < b),
          "<=" => i64::from(a <= b),
          ">" => i64::from(a > b),
          ">=" => i64::from(a >= b),
          _ => unreachable!("unknown operator {op}"),
        }
      }
    })
  }
}

fn expr() -> impl Strategy<Value = Expr> {
  let leaf = (0u16..1000).prop_map(Expr::Num);
  leaf.prop_recursive(6, 48, 2, |inner| {
    prop_oneof![
      inner.clone().prop_map(|e| Expr::Neg(Box::new(e))),
      (prop::sample::select(OPS.to_vec()), inner.clone(), inner)
        .prop_map(|(op, l, r)| Expr::Bin(op, Box::new(l), Box::new(r))),
    ]
  })
}

proptest! {
  #[test]
  fn compiled_code_matches_direct_evaluation(e in expr()) {
    let expected = e.value();
    prop_assume!(expected.is_some());
    let program = compile(&e.source()).unwrap();
    prop_assert_eq!(vm::run(&program).ok(), expected);
  }

  #[test]
  fn programs_leave_stack_balanced(e in expr()) {
    let program = compile(&e.source()).unwrap();
    prop_assert_eq!(program.final_depth(), 0);
    prop_assert!(program.max_depth() >= 1);
  }

  #[test]
  fn assembly_is_deterministic(e in expr()) {
    let src = e.source();
    let config = Config::default();
    prop_assert_eq!(
      generate_assembly(&src, &config).unwrap(),
      generate_assembly(&src, &config).unwrap()
    );
  }

  #[test]
  fn greater_than_matches_swapped_less_than(a in 0u16..1000, b in 0u16..1000) {
    prop_assert_eq!(
      compile(&format!("{a}>{b}")).unwrap(),
      compile(&format!("{b}<{a}")).unwrap()
    );
    prop_assert_eq!(
      compile(&format!("{a}>={b}")).unwrap(),
      compile(&format!("{b}<={a}")).unwrap()
    );
  }
}
