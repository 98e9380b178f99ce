//! Recursive-descent parser producing an expression AST.
//!
//! The parser mirrors the classic chibicc structure: one helper per
//! precedence level, each looping to fold same-level operators to the left.
//!
//! ```text
//! expr       = equality
//! equality   = relational ("==" relational | "!=" relational)*
//! relational = add ("<" add | "<=" add | ">" add | ">=" add)*
//! add        = mul ("+" mul | "-" mul)*
//! mul        = unary ("*" unary | "/" unary)*
//! unary      = ("+" | "-")? unary | primary
//! primary    = "(" expr ")" | num
//! ```

use std::fmt;

use crate::error::{CompileError, CompileResult};
use crate::tokenizer::{Token, TokenKind, describe_token, token_text};

/// Deepest chain of unresolved `unary` calls (parentheses and prefix signs).
pub const MAX_NESTING: usize = 256;

/// Tallest expression tree the code generator is handed.
pub const MAX_HEIGHT: usize = 1000;

/// Binary operators recognised by the language.
///
/// `>` and `>=` have no variant of their own: the parser rewrites them into
/// `Lt`/`Le` with the operands swapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
  Add,
  Sub,
  Mul,
  Div,
  Eq,
  Ne,
  Lt,
  Le,
}

impl BinaryOp {
  pub fn symbol(self) -> &'static str {
    match self {
      BinaryOp::Add => "+",
      BinaryOp::Sub => "-",
      BinaryOp::Mul => "*",
      BinaryOp::Div => "/",
      BinaryOp::Eq => "==",
      BinaryOp::Ne => "!=",
      BinaryOp::Lt => "<",
      BinaryOp::Le => "<=",
    }
  }
}

/// Expression tree produced by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AstNode {
  Num {
    value: i32,
  },
  Binary {
    op: BinaryOp,
    lhs: Box<AstNode>,
    rhs: Box<AstNode>,
  },
}

impl AstNode {
  pub fn number(value: i32) -> Self {
    Self::Num { value }
  }

  pub fn binary(op: BinaryOp, lhs: AstNode, rhs: AstNode) -> Self {
    Self::Binary {
      op,
      lhs: Box::new(lhs),
      rhs: Box::new(rhs),
    }
  }
}

/// Prefix notation, e.g. `(- 0 (* 2 3))`. Handy in tests and trace logs.
impl fmt::Display for AstNode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      AstNode::Num { value } => write!(f, "{value}"),
      AstNode::Binary { op, lhs, rhs } => write!(f, "({} {lhs} {rhs})", op.symbol()),
    }
  }
}

/// Parse a complete expression; every token up to `Eof` must be consumed.
#[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len()))]
pub fn parse(tokens: Vec<Token>, source: &str) -> CompileResult<AstNode> {
  let mut stream = TokenStream::new(tokens, source);

  let parsed = parse_expr(&mut stream)?;

  if !stream.is_eof() {
    let (loc, got) = stream.describe_current();
    return Err(CompileError::syntax(
      loc,
      format!("unexpected token \"{got}\""),
    ));
  }

  tracing::trace!(tree = %parsed.node, height = parsed.height, "parsed expression");
  Ok(parsed.node)
}

/// A subtree together with its height; leaves have height 0.
struct Parsed {
  node: AstNode,
  height: usize,
}

impl Parsed {
  fn leaf(node: AstNode) -> Self {
    Self { node, height: 0 }
  }
}

fn parse_expr(stream: &mut TokenStream) -> CompileResult<Parsed> {
  parse_equality(stream)
}

fn parse_equality(stream: &mut TokenStream) -> CompileResult<Parsed> {
  let mut node = parse_relational(stream)?;

  loop {
    let op = match stream.peek_punct() {
      Some("==") => BinaryOp::Eq,
      Some("!=") => BinaryOp::Ne,
      _ => break,
    };

    let loc = stream.advance();
    let rhs = parse_relational(stream)?;
    node = fold(op, node, rhs, loc)?;
  }

  Ok(node)
}

fn parse_relational(stream: &mut TokenStream) -> CompileResult<Parsed> {
  let mut node = parse_add(stream)?;

  loop {
    // `a > b` becomes `b < a`, `a >= b` becomes `b <= a`.
    let (op, swapped) = match stream.peek_punct() {
      Some("<") => (BinaryOp::Lt, false),
      Some("<=") => (BinaryOp::Le, false),
      Some(">") => (BinaryOp::Lt, true),
      Some(">=") => (BinaryOp::Le, true),
      _ => break,
    };

    let loc = stream.advance();
    let rhs = parse_add(stream)?;
    node = if swapped {
      fold(op, rhs, node, loc)?
    } else {
      fold(op, node, rhs, loc)?
    };
  }

  Ok(node)
}

fn parse_add(stream: &mut TokenStream) -> CompileResult<Parsed> {
  let mut node = parse_mul(stream)?;

  loop {
    let op = match stream.peek_punct() {
      Some("+") => BinaryOp::Add,
      Some("-") => BinaryOp::Sub,
      _ => break,
    };

    let loc = stream.advance();
    let rhs = parse_mul(stream)?;
    node = fold(op, node, rhs, loc)?;
  }

  Ok(node)
}

fn parse_mul(stream: &mut TokenStream) -> CompileResult<Parsed> {
  let mut node = parse_unary(stream)?;

  loop {
    let op = match stream.peek_punct() {
      Some("*") => BinaryOp::Mul,
      Some("/") => BinaryOp::Div,
      _ => break,
    };

    let loc = stream.advance();
    let rhs = parse_unary(stream)?;
    node = fold(op, node, rhs, loc)?;
  }

  Ok(node)
}

fn parse_unary(stream: &mut TokenStream) -> CompileResult<Parsed> {
  stream.descend()?;
  let result = parse_unary_operand(stream);
  stream.ascend();
  result
}

fn parse_unary_operand(stream: &mut TokenStream) -> CompileResult<Parsed> {
  if stream.equal("+") {
    return parse_unary(stream);
  }

  // No negation node: `-x` is lowered to `0 - x`.
  let loc = stream.current().loc;
  if stream.equal("-") {
    let operand = parse_unary(stream)?;
    return fold(
      BinaryOp::Sub,
      Parsed::leaf(AstNode::number(0)),
      operand,
      loc,
    );
  }

  parse_primary(stream)
}

fn parse_primary(stream: &mut TokenStream) -> CompileResult<Parsed> {
  if stream.equal("(") {
    let node = parse_expr(stream)?;
    stream.skip(")")?;
    return Ok(node);
  }

  let value = stream.get_number()?;
  Ok(Parsed::leaf(AstNode::number(value)))
}

/// Combine two subtrees under `op`, rejecting trees too tall to lower.
/// `loc` is the operator's offset.
fn fold(op: BinaryOp, lhs: Parsed, rhs: Parsed, loc: usize) -> CompileResult<Parsed> {
  let height = lhs.height.max(rhs.height) + 1;
  if height > MAX_HEIGHT {
    return Err(CompileError::syntax(loc, "expression nested too deeply"));
  }
  Ok(Parsed {
    node: AstNode::binary(op, lhs.node, rhs.node),
    height,
  })
}

/// Lightweight cursor over the token vector.
///
/// The vector always ends in an `Eof` token, which is never consumed, so
/// `pos` always indexes a token.
struct TokenStream<'a> {
  tokens: Vec<Token>,
  source: &'a str,
  pos: usize,
  depth: usize,
}

impl<'a> TokenStream<'a> {
  /// Take ownership of the token stream; the parser will advance `pos` as it consumes input.
  fn new(mut tokens: Vec<Token>, source: &'a str) -> Self {
    if tokens.last().map(|token| token.kind) != Some(TokenKind::Eof) {
      tokens.push(Token::new(TokenKind::Eof, source.len(), 0, None));
    }
    Self {
      tokens,
      source,
      pos: 0,
      depth: 0,
    }
  }

  fn current(&self) -> &Token {
    &self.tokens[self.pos]
  }

  /// Text of the current token if it is a punctuator.
  fn peek_punct(&self) -> Option<&'a str> {
    let token = self.current();
    (token.kind == TokenKind::Punctuator).then(|| token_text(token, self.source))
  }

  /// Step past the current token and return its offset. Stays put on `Eof`.
  fn advance(&mut self) -> usize {
    let loc = self.current().loc;
    if !self.is_eof() {
      self.pos += 1;
    }
    loc
  }

  /// Consume the current token if it matches the provided punctuator.
  fn equal(&mut self, op: &str) -> bool {
    if self.peek_punct() == Some(op) {
      self.pos += 1;
      return true;
    }
    false
  }

  fn skip(&mut self, s: &str) -> CompileResult<()> {
    if self.equal(s) {
      Ok(())
    } else {
      let (loc, got) = self.describe_current();
      Err(CompileError::syntax(
        loc,
        format!("expected \"{s}\", but got \"{got}\""),
      ))
    }
  }

  /// Consume the current token as an integer literal and return its value.
  fn get_number(&mut self) -> CompileResult<i32> {
    let token = self.current();
    if token.kind == TokenKind::Num {
      let value = token.value.ok_or_else(|| {
        CompileError::syntax(token.loc, "internal error: numeric token missing value")
      })?;
      self.pos += 1;
      return Ok(value);
    }

    let (loc, got) = self.describe_current();
    Err(CompileError::syntax(
      loc,
      format!("expected a number, but got \"{got}\""),
    ))
  }

  /// Enter one more level of `unary`, failing past [`MAX_NESTING`].
  fn descend(&mut self) -> CompileResult<()> {
    if self.depth >= MAX_NESTING {
      return Err(CompileError::syntax(
        self.current().loc,
        "expression nested too deeply",
      ));
    }
    self.depth += 1;
    Ok(())
  }

  fn ascend(&mut self) {
    self.depth -= 1;
  }

  fn describe_current(&self) -> (usize, String) {
    let token = self.current();
    (token.loc, describe_token(token, self.source))
  }

  fn is_eof(&self) -> bool {
    self.current().kind == TokenKind::Eof
  }
}
