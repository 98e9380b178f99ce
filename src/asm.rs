//! Serialise a [`Program`] into GNU assembler text.
//!
//! Both Intel (the dialect the chibicc book uses) and AT&T
//! operand orders are supported; the instruction stream is identical.

use std::fmt::Write as _;

use crate::codegen::{Cond, Inst, Program, Reg};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Syntax {
  #[default]
  Intel,
  Att,
}

impl Syntax {
  fn directive(self) -> &'static str {
    match self {
      Syntax::Intel => ".intel_syntax noprefix",
      Syntax::Att => ".att_syntax prefix",
    }
  }

  fn reg(self, reg: Reg) -> &'static str {
    match (self, reg) {
      (Syntax::Intel, Reg::Rax) => "rax",
      (Syntax::Intel, Reg::Rdi) => "rdi",
      (Syntax::Att, Reg::Rax) => "%rax",
      (Syntax::Att, Reg::Rdi) => "%rdi",
    }
  }

  /// Two-operand form: Intel is `dst, src`, AT&T is `src, dst`.
  fn operands(self, dst: &str, src: &str) -> String {
    match self {
      Syntax::Intel => format!("{dst}, {src}"),
      Syntax::Att => format!("{src}, {dst}"),
    }
  }
}

fn set_mnemonic(cond: Cond) -> &'static str {
  match cond {
    Cond::Eq => "sete",
    Cond::Ne => "setne",
    Cond::Lt => "setl",
    Cond::Le => "setle",
  }
}

/// Render a single instruction without indentation or newline.
pub fn render_inst(inst: Inst, syntax: Syntax) -> String {
  let rax = syntax.reg(Reg::Rax);
  let rdi = syntax.reg(Reg::Rdi);
  let al = match syntax {
    Syntax::Intel => "al",
    Syntax::Att => "%al",
  };

  match inst {
    Inst::Push(value) => match syntax {
      Syntax::Intel => format!("push {value}"),
      Syntax::Att => format!("push ${value}"),
    },
    Inst::PushReg(reg) => format!("push {}", syntax.reg(reg)),
    Inst::Pop(reg) => format!("pop {}", syntax.reg(reg)),
    Inst::Add => format!("add {}", syntax.operands(rax, rdi)),
    Inst::Sub => format!("sub {}", syntax.operands(rax, rdi)),
    Inst::Imul => format!("imul {}", syntax.operands(rax, rdi)),
    Inst::Cqo => "cqo".to_string(),
    Inst::Idiv => format!("idiv {rdi}"),
    Inst::Cmp => format!("cmp {}", syntax.operands(rax, rdi)),
    Inst::Set(cond) => format!("{} {al}", set_mnemonic(cond)),
    Inst::Movzb => match syntax {
      Syntax::Intel => format!("movzb {rax}, {al}"),
      Syntax::Att => format!("movzbq {al}, {rax}"),
    },
    Inst::Ret => "ret".to_string(),
  }
}

/// Emit assembly for a whole program.
pub fn render(program: &Program, syntax: Syntax) -> String {
  let mut asm = String::new();
  asm.push_str(syntax.directive());
  asm.push('\n');
  let _ = writeln!(asm, ".global {}", program.entry);
  let _ = writeln!(asm, "{}:", program.entry);

  for inst in &program.body {
    let _ = writeln!(asm, "    {}", render_inst(*inst, syntax));
  }

  asm
}
