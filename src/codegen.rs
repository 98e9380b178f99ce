//! Code generation: lower the parsed AST into a stack-machine instruction list.
//!
//! Every expression leaves a single value on the stack. Binary operators pop
//! the right operand into `rdi`, the left into `rax`, compute into `rax` and
//! push it back. Text is produced separately by [`crate::asm`].

use crate::parser::{AstNode, BinaryOp};

/// Name of the emitted entry point.
pub const ENTRY_POINT: &str = "main";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reg {
  Rax,
  Rdi,
}

/// Condition tested by a `set` instruction after `cmp rax, rdi`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cond {
  Eq,
  Ne,
  Lt,
  Le,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inst {
  /// Push a sign-extended 32-bit immediate.
  Push(i32),
  PushReg(Reg),
  Pop(Reg),
  /// `rax += rdi`
  Add,
  /// `rax -= rdi`
  Sub,
  /// `rax *= rdi`
  Imul,
  /// Sign-extend `rax` into `rdx:rax`.
  Cqo,
  /// `rax = rdx:rax / rdi`, remainder dropped.
  Idiv,
  /// Compare `rax` against `rdi`.
  Cmp,
  /// Set `al` to 0 or 1 from the last comparison.
  Set(Cond),
  /// Zero-extend `al` into `rax`.
  Movzb,
  Ret,
}

impl Inst {
  /// Net change in stack depth, in words.
  pub fn stack_delta(self) -> isize {
    match self {
      Inst::Push(_) | Inst::PushReg(_) => 1,
      Inst::Pop(_) => -1,
      _ => 0,
    }
  }
}

/// A whole compiled program: one entry point and a straight-line body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
  pub entry: &'static str,
  pub body: Vec<Inst>,
}

impl Program {
  /// Deepest stack the body reaches, in words.
  pub fn max_depth(&self) -> usize {
    let mut depth: isize = 0;
    let mut max = 0;
    for inst in &self.body {
      depth += inst.stack_delta();
      max = max.max(depth);
    }
    max as usize
  }

  /// Stack depth once the whole body has run. Zero for a well-formed program.
  pub fn final_depth(&self) -> isize {
    self.body.iter().map(|inst| inst.stack_delta()).sum()
  }
}

/// Generate the program for an expression: evaluate it, then return the
/// value left on top of the stack.
#[tracing::instrument(level = "debug", skip_all)]
pub fn generate(node: &AstNode) -> Program {
  let mut body = generate_expr(node);
  body.push(Inst::Pop(Reg::Rax));
  body.push(Inst::Ret);

  let program = Program {
    entry: ENTRY_POINT,
    body,
  };
  tracing::debug!(
    instructions = program.body.len(),
    max_depth = program.max_depth(),
    "generated program"
  );
  program
}

/// Instructions that push the value of `node`, without any epilogue.
pub fn generate_expr(node: &AstNode) -> Vec<Inst> {
  let mut out = Vec::new();
  emit_expr(node, &mut out);
  out
}

/// Emit stack-based code for a single expression node.
fn emit_expr(node: &AstNode, out: &mut Vec<Inst>) {
  match node {
    AstNode::Num { value } => out.push(Inst::Push(*value)),
    AstNode::Binary { op, lhs, rhs } => {
      emit_expr(lhs, out);
      emit_expr(rhs, out);
      out.push(Inst::Pop(Reg::Rdi));
      out.push(Inst::Pop(Reg::Rax));
      match op {
        BinaryOp::Add => out.push(Inst::Add),
        BinaryOp::Sub => out.push(Inst::Sub),
        BinaryOp::Mul => out.push(Inst::Imul),
        BinaryOp::Div => out.extend([Inst::Cqo, Inst::Idiv]),
        BinaryOp::Eq => emit_compare(Cond::Eq, out),
        BinaryOp::Ne => emit_compare(Cond::Ne, out),
        BinaryOp::Lt => emit_compare(Cond::Lt, out),
        BinaryOp::Le => emit_compare(Cond::Le, out),
      }
      out.push(Inst::PushReg(Reg::Rax));
    }
  }
}

fn emit_compare(cond: Cond, out: &mut Vec<Inst>) {
  out.extend([Inst::Cmp, Inst::Set(cond), Inst::Movzb]);
}

#[cfg(test)]
mod tests;
