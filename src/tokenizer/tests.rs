use super::*;

fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
  tokens.iter().map(|t| t.kind).collect()
}

fn texts<'a>(tokens: &[Token], source: &'a str) -> Vec<&'a str> {
  tokens.iter().map(|t| token_text(t, source)).collect()
}

#[test]
fn empty_input_yields_only_eof() {
  let tokens = tokenize("").unwrap();
  assert_eq!(tokens, vec![Token::new(TokenKind::Eof, 0, 0, None)]);
}

#[test]
fn whitespace_is_skipped() {
  let src = "  1 \t+\n 2 ";
  let tokens = tokenize(src).unwrap();
  assert_eq!(
    kinds(&tokens),
    vec![TokenKind::Num, TokenKind::Punctuator, TokenKind::Num, TokenKind::Eof]
  );
  assert_eq!(tokens[0].loc, 2);
  assert_eq!(tokens[1].loc, 5);
  assert_eq!(tokens[2].loc, 8);
  assert_eq!(tokens[3].loc, src.len());
}

#[test]
fn number_records_value_and_width() {
  let tokens = tokenize("12345").unwrap();
  assert_eq!(tokens[0], Token::new(TokenKind::Num, 0, 5, Some(12345)));
}

#[test]
fn two_char_operators_are_not_split() {
  let src = "1<=2>=3==4!=5";
  let tokens = tokenize(src).unwrap();
  assert_eq!(
    texts(&tokens, src),
    vec!["1", "<=", "2", ">=", "3", "==", "4", "!=", "5", ""]
  );
  assert!(tokens[1..8].iter().step_by(2).all(|t| t.len == 2));
}

#[test]
fn single_char_punctuators() {
  let src = "+-*/()<>";
  let tokens = tokenize(src).unwrap();
  assert_eq!(texts(&tokens, src), vec!["+", "-", "*", "/", "(", ")", "<", ">", ""]);
  assert!(tokens[..8].iter().all(|t| t.kind == TokenKind::Punctuator && t.len == 1));
}

#[test]
fn lone_bang_or_equals_is_rejected() {
  let err = tokenize("1=2").unwrap_err();
  assert_eq!(err, CompileError::lexical(1, "invalid token: '='"));

  let err = tokenize("!1").unwrap_err();
  assert_eq!(err.offset(), 0);
}

#[test]
fn invalid_char_reports_offset() {
  let err = tokenize("1@2").unwrap_err();
  assert!(matches!(err, CompileError::Lexical { offset: 1, .. }));
  assert_eq!(err.message(), "invalid token: '@'");
}

#[test]
fn non_ascii_char_is_reported_whole() {
  let err = tokenize("1+λ").unwrap_err();
  assert_eq!(err, CompileError::lexical(2, "invalid token: 'λ'"));
}

#[test]
fn max_literal_accepted() {
  let tokens = tokenize("2147483647").unwrap();
  assert_eq!(tokens[0].value, Some(i32::MAX));
}

#[test]
fn oversized_literal_is_lexical_error() {
  let err = tokenize("1+2147483648").unwrap_err();
  assert_eq!(
    err,
    CompileError::lexical(2, "integer literal 2147483648 does not fit in 32 bits")
  );
}

#[test]
fn describe_token_names_eof() {
  let src = "7";
  let tokens = tokenize(src).unwrap();
  assert_eq!(describe_token(&tokens[0], src), "7");
  assert_eq!(describe_token(&tokens[1], src), "EOF");
}
