//! Shared error utilities used across the compilation pipeline.
//!
//! Both error kinds carry the byte offset where the input stopped making
//! sense. Rendering back into a caret diagnostic is left to the caller via
//! [`CompileError::render`], since only the caller knows the source text.

use snafu::Snafu;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum CompileError {
  /// A character that starts no token, or a literal that does not fit.
  #[snafu(display("lexical error at offset {offset}: {message}"))]
  Lexical { offset: usize, message: String },

  /// An expected token was missing at the cursor.
  #[snafu(display("syntax error at offset {offset}: {message}"))]
  Syntax { offset: usize, message: String },
}

impl CompileError {
  pub fn lexical(offset: usize, message: impl Into<String>) -> Self {
    LexicalSnafu {
      offset,
      message: message.into(),
    }
    .build()
  }

  pub fn syntax(offset: usize, message: impl Into<String>) -> Self {
    SyntaxSnafu {
      offset,
      message: message.into(),
    }
    .build()
  }

  /// Byte offset into the source the error is anchored at.
  pub fn offset(&self) -> usize {
    match self {
      Self::Lexical { offset, .. } | Self::Syntax { offset, .. } => *offset,
    }
  }

  pub fn message(&self) -> &str {
    match self {
      Self::Lexical { message, .. } | Self::Syntax { message, .. } => message,
    }
  }

  /// Format the error in chibicc style: the source line holding the
  /// offset, then a caret under the offending character followed by the
  /// message. Columns count characters within that line.
  pub fn render(&self, source: &str) -> String {
    let mut loc = self.offset().min(source.len());
    while !source.is_char_boundary(loc) {
      loc -= 1;
    }

    let (before, after) = source.split_at(loc);
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let line_end = after.find('\n').map_or(source.len(), |i| loc + i);
    let line = source[line_start..line_end].trim_end_matches('\r');
    let column = before[line_start..].chars().count();

    format!("{line}\n{}^ {}", " ".repeat(column), self.message())
  }
}
