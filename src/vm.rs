//! Reference stack machine for [`Program`]s.
//!
//! Models just enough of x86-64 to run what the code generator emits: two
//! 64-bit registers, the comparison flags, and a word stack. Arithmetic wraps
//! like the hardware does; `idiv` faults where the CPU would raise `#DE`.

use snafu::{OptionExt, Snafu, ensure};

use crate::codegen::{Cond, Inst, Program, Reg};

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum VmError {
  #[snafu(display("division by zero at instruction {index}"))]
  DivisionByZero { index: usize },

  #[snafu(display("division overflow at instruction {index}"))]
  DivisionOverflow { index: usize },

  #[snafu(display("pop from empty stack at instruction {index}"))]
  StackUnderflow { index: usize },

  #[snafu(display("idiv without sign-extended rdx at instruction {index}"))]
  UnextendedDividend { index: usize },

  #[snafu(display("set without preceding cmp at instruction {index}"))]
  FlagsUnset { index: usize },

  #[snafu(display("returned with {depth} value(s) still on the stack"))]
  UnbalancedStack { depth: usize },

  #[snafu(display("program fell off the end without ret"))]
  MissingReturn,
}

#[derive(Debug, Default)]
struct Machine {
  rax: i64,
  rdi: i64,
  rdx: i64,
  /// Operands of the last `cmp`.
  flags: Option<(i64, i64)>,
  stack: Vec<i64>,
}

impl Machine {
  fn reg_mut(&mut self, reg: Reg) -> &mut i64 {
    match reg {
      Reg::Rax => &mut self.rax,
      Reg::Rdi => &mut self.rdi,
    }
  }

  fn reg(&self, reg: Reg) -> i64 {
    match reg {
      Reg::Rax => self.rax,
      Reg::Rdi => self.rdi,
    }
  }
}

/// Run `program` and return the value in `rax` at `ret`.
pub fn run(program: &Program) -> Result<i64, VmError> {
  let mut m = Machine::default();

  for (index, inst) in program.body.iter().enumerate() {
    match *inst {
      Inst::Push(value) => m.stack.push(i64::from(value)),
      Inst::PushReg(reg) => {
        let value = m.reg(reg);
        m.stack.push(value);
      }
      Inst::Pop(reg) => {
        let value = m.stack.pop().context(StackUnderflowSnafu { index })?;
        *m.reg_mut(reg) = value;
      }
      Inst::Add => m.rax = m.rax.wrapping_add(m.rdi),
      Inst::Sub => m.rax = m.rax.wrapping_sub(m.rdi),
      Inst::Imul => m.rax = m.rax.wrapping_mul(m.rdi),
      Inst::Cqo => m.rdx = if m.rax < 0 { -1 } else { 0 },
      Inst::Idiv => {
        // Only the rdx:rax pairs produced by cqo are modelled.
        ensure!(
          m.rdx == if m.rax < 0 { -1 } else { 0 },
          UnextendedDividendSnafu { index }
        );
        ensure!(m.rdi != 0, DivisionByZeroSnafu { index });
        ensure!(
          !(m.rax == i64::MIN && m.rdi == -1),
          DivisionOverflowSnafu { index }
        );
        m.rdx = m.rax % m.rdi;
        m.rax /= m.rdi;
      }
      Inst::Cmp => m.flags = Some((m.rax, m.rdi)),
      Inst::Set(cond) => {
        let (lhs, rhs) = m.flags.context(FlagsUnsetSnafu { index })?;
        let bit = match cond {
          Cond::Eq => lhs == rhs,
          Cond::Ne => lhs != rhs,
          Cond::Lt => lhs < rhs,
          Cond::Le => lhs <= rhs,
        };
        m.rax = (m.rax & !0xff) | i64::from(bit);
      }
      Inst::Movzb => m.rax &= 0xff,
      Inst::Ret => {
        ensure!(
          m.stack.is_empty(),
          UnbalancedStackSnafu {
            depth: m.stack.len()
          }
        );
        return Ok(m.rax);
      }
    }
  }

  MissingReturnSnafu.fail()
}
