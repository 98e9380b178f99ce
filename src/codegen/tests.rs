use super::*;

fn num(value: i32) -> AstNode {
  AstNode::number(value)
}

#[test]
fn literal_pushes_immediate() {
  assert_eq!(generate_expr(&num(7)), vec![Inst::Push(7)]);
}

#[test]
fn binary_evaluates_lhs_before_rhs() {
  let code = generate_expr(&AstNode::binary(BinaryOp::Sub, num(5), num(3)));
  assert_eq!(
    code,
    vec![
      Inst::Push(5),
      Inst::Push(3),
      Inst::Pop(Reg::Rdi),
      Inst::Pop(Reg::Rax),
      Inst::Sub,
      Inst::PushReg(Reg::Rax),
    ]
  );
}

#[test]
fn division_sign_extends_first() {
  let code = generate_expr(&AstNode::binary(BinaryOp::Div, num(9), num(2)));
  assert_eq!(&code[4..], &[Inst::Cqo, Inst::Idiv, Inst::PushReg(Reg::Rax)]);
}

#[test]
fn comparisons_zero_extend_flag() {
  for (op, cond) in [
    (BinaryOp::Eq, Cond::Eq),
    (BinaryOp::Ne, Cond::Ne),
    (BinaryOp::Lt, Cond::Lt),
    (BinaryOp::Le, Cond::Le),
  ] {
    let code = generate_expr(&AstNode::binary(op, num(1), num(2)));
    assert_eq!(
      &code[4..],
      &[Inst::Cmp, Inst::Set(cond), Inst::Movzb, Inst::PushReg(Reg::Rax)],
      "{op:?}"
    );
  }
}

#[test]
fn program_ends_with_pop_and_ret() {
  let program = generate(&num(3));
  assert_eq!(program.entry, "main");
  assert_eq!(
    program.body,
    vec![Inst::Push(3), Inst::Pop(Reg::Rax), Inst::Ret]
  );
  assert_eq!(program.final_depth(), 0);
}

#[test]
fn nested_expression_stays_balanced() {
  // (1 + 2) * (3 - 4)
  let tree = AstNode::binary(
    BinaryOp::Mul,
    AstNode::binary(BinaryOp::Add, num(1), num(2)),
    AstNode::binary(BinaryOp::Sub, num(3), num(4)),
  );
  let code = generate_expr(&tree);
  let depth: isize = code.iter().map(|inst| inst.stack_delta()).sum();
  assert_eq!(depth, 1);

  let program = generate(&tree);
  assert_eq!(program.final_depth(), 0);
  assert_eq!(program.max_depth(), 3);
}

#[test]
fn right_leaning_tree_grows_stack() {
  // 1 + (2 + (3 + 4))
  let tree = AstNode::binary(
    BinaryOp::Add,
    num(1),
    AstNode::binary(BinaryOp::Add, num(2), AstNode::binary(BinaryOp::Add, num(3), num(4))),
  );
  assert_eq!(generate(&tree).max_depth(), 4);
}
