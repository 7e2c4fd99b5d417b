//! Line parser for statement files.
//!
//! Accepts the subset of N-Quads that [`super::TripleEncoder`] writes plus
//! what other writers commonly add:
//!
//! - blank lines and `#` comment lines are skipped
//! - an optional fourth graph term before the terminating `.` is ignored
//! - literals may carry a `@lang` tag or `^^<datatype>`, both ignored
//! - blank nodes (`_:b0`) are kept verbatim as identifiers
//!
//! `%XX` escapes inside IRIs are decoded, undoing the encoder's escaping.
//! Relative IRIs (no scheme) are then resolved against a base namespace by
//! prefixing it; absolute IRIs are returned unchanged.

use super::{Statement, Term};
use crate::error::ErrorCode;

/// What is wrong with a single line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unterminated IRI")]
    UnterminatedIri,
    #[error("unterminated literal")]
    UnterminatedLiteral,
    #[error("invalid escape sequence '\\{0}' in literal")]
    InvalidEscape(char),
    #[error("literal not allowed as {0}")]
    LiteralPosition(&'static str),
    #[error("expected a term, found '{0}'")]
    UnexpectedChar(char),
    #[error("missing {0}")]
    MissingTerm(&'static str),
    #[error("missing terminating '.'")]
    MissingTerminator,
    #[error("unexpected content after '.': '{0}'")]
    TrailingContent(String),
}

/// A [`ParseError`] located at a 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {error}")]
pub struct StatementError {
    pub line: usize,
    #[source]
    pub error: ParseError,
}

impl StatementError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        ErrorCode::StatementParseError
    }
}

/// Parse a whole statement file.
///
/// # Errors
///
/// Returns the first malformed line with its line number.
pub fn parse_statements(content: &str, base: &str) -> Result<Vec<Statement>, StatementError> {
    let mut statements = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        match parse_line(line, base) {
            Ok(Some(statement)) => statements.push(statement),
            Ok(None) => {}
            Err(error) => {
                return Err(StatementError {
                    line: idx + 1,
                    error,
                });
            }
        }
    }
    Ok(statements)
}

/// Parse one line; `Ok(None)` for blank and comment lines.
///
/// # Errors
///
/// Returns a [`ParseError`] describing the first problem on the line.
pub fn parse_line(line: &str, base: &str) -> Result<Option<Statement>, ParseError> {
    let mut cursor = Cursor::new(line);
    cursor.skip_ws();
    if cursor.at_end() || cursor.peek() == Some('#') {
        return Ok(None);
    }

    let subject = cursor.term(base)?.ok_or(ParseError::MissingTerm("subject"))?;
    if subject.is_literal() {
        return Err(ParseError::LiteralPosition("subject"));
    }
    let predicate = cursor.term(base)?.ok_or(ParseError::MissingTerm("predicate"))?;
    if predicate.is_literal() {
        return Err(ParseError::LiteralPosition("predicate"));
    }
    let object = cursor.term(base)?.ok_or(ParseError::MissingTerm("object"))?;

    if let Some(graph) = cursor.term(base)?
        && graph.is_literal()
    {
        return Err(ParseError::LiteralPosition("graph"));
    }

    cursor.skip_ws();
    if cursor.peek() != Some('.') {
        return Err(ParseError::MissingTerminator);
    }
    cursor.bump();
    cursor.skip_ws();
    let rest = cursor.rest();
    if !rest.is_empty() && !rest.starts_with('#') {
        return Err(ParseError::TrailingContent(rest.to_string()));
    }

    Ok(Some(Statement::new(subject, predicate, object)))
}

/// Resolve `iri` against `base` unless it already has a scheme.
#[must_use]
pub fn resolve_iri(iri: &str, base: &str) -> String {
    if has_scheme(iri) || iri.starts_with("_:") {
        iri.to_string()
    } else {
        format!("{base}{iri}")
    }
}

/// Decode `%XX` escapes. A `%` not followed by two hex digits is kept as is,
/// and so is the whole IRI if the decoded bytes are not UTF-8.
fn percent_decode(iri: &str) -> String {
    if !iri.contains('%') {
        return iri.to_string();
    }
    let bytes = iri.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && let Some(hex) = bytes.get(i + 1..i + 3)
            && let Ok(hex) = std::str::from_utf8(hex)
            && let Ok(byte) = u8::from_str_radix(hex, 16)
        {
            decoded.push(byte);
            i += 3;
        } else {
            decoded.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(decoded).unwrap_or_else(|_| iri.to_string())
}

fn has_scheme(iri: &str) -> bool {
    let Some((scheme, _)) = iri.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    const fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    /// Next term, or `None` when the next token is the terminator.
    fn term(&mut self, base: &str) -> Result<Option<Term>, ParseError> {
        self.skip_ws();
        match self.peek() {
            None | Some('.') => Ok(None),
            Some('<') => {
                self.bump();
                let rest = self.rest();
                let end = rest.find('>').ok_or(ParseError::UnterminatedIri)?;
                let iri = percent_decode(&rest[..end]);
                self.pos += end + 1;
                Ok(Some(Term::Iri(resolve_iri(&iri, base))))
            }
            Some('"') => {
                self.bump();
                let text = self.literal_body()?;
                self.literal_suffix()?;
                Ok(Some(Term::Literal(text)))
            }
            Some('_') if self.rest().starts_with("_:") => {
                let rest = self.rest();
                let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
                self.pos += end;
                Ok(Some(Term::Iri(rest[..end].to_string())))
            }
            Some(other) => Err(ParseError::UnexpectedChar(other)),
        }
    }

    fn literal_body(&mut self) -> Result<String, ParseError> {
        let mut text = String::new();
        loop {
            match self.bump() {
                None => return Err(ParseError::UnterminatedLiteral),
                Some('"') => return Ok(text),
                Some('\\') => {
                    let escaped = self.bump().ok_or(ParseError::UnterminatedLiteral)?;
                    text.push(match escaped {
                        '"' => '"',
                        '\\' => '\\',
                        '\'' => '\'',
                        'n' => '\n',
                        'r' => '\r',
                        't' => '\t',
                        other => return Err(ParseError::InvalidEscape(other)),
                    });
                }
                Some(ch) => text.push(ch),
            }
        }
    }

    fn literal_suffix(&mut self) -> Result<(), ParseError> {
        if self.peek() == Some('@') {
            while self
                .peek()
                .is_some_and(|c| c == '@' || c == '-' || c.is_ascii_alphanumeric())
            {
                self.bump();
            }
        } else if self.rest().starts_with("^^") {
            self.pos += 2;
            if self.peek() != Some('<') {
                return Err(ParseError::UnexpectedChar(self.peek().unwrap_or(' ')));
            }
            let end = self.rest().find('>').ok_or(ParseError::UnterminatedIri)?;
            self.pos += end + 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "/prefix/";

    #[test]
    fn parses_link_and_label_lines() {
        let link = parse_line("<pkg-a> <depends_prod> <lodash/4.17.21> .", BASE)
            .expect("parses")
            .expect("statement");
        assert_eq!(link.subject, Term::iri("/prefix/pkg-a"));
        assert_eq!(link.predicate, Term::iri("/prefix/depends_prod"));
        assert_eq!(link.object, Term::iri("/prefix/lodash/4.17.21"));

        let label = parse_line(r#"<lodash/4.17.21> <name> "4.17.21" ."#, BASE)
            .expect("parses")
            .expect("statement");
        assert_eq!(label.object, Term::literal("4.17.21"));
    }

    #[test]
    fn absolute_iris_are_not_resolved() {
        let statement = parse_line(
            "<lodash/4.17.21> <lives_in> <https://github.com/lodash/lodash.git> .",
            BASE,
        )
        .expect("parses")
        .expect("statement");
        assert_eq!(
            statement.object,
            Term::iri("https://github.com/lodash/lodash.git")
        );
        assert_eq!(resolve_iri("@scope/pkg/1.0.0", BASE), "/prefix/@scope/pkg/1.0.0");
    }

    #[test]
    fn literal_escapes_round_trip_with_encoder_output() {
        let original = Statement::label("a/1.0.0", "keyword", "say \"hi\"\\\n");
        let parsed = parse_line(&original.to_string(), "")
            .expect("parses")
            .expect("statement");
        assert_eq!(parsed, original);
    }

    #[test]
    fn escaped_iris_round_trip_with_encoder_output() {
        let original = Statement::link("a/1.0.0", "lives_in", "https://host/my repo/100%<x>");
        let line = original.to_string();
        assert!(line.contains("<https://host/my%20repo/100%25%3Cx%3E>"));
        let parsed = parse_line(&line, "").expect("parses").expect("statement");
        assert_eq!(parsed, original);
    }

    #[test]
    fn stray_percent_signs_are_kept() {
        let statement = parse_line("<a> <lives_in> <https://host/50%/%zz/%E9> .", BASE)
            .expect("parses")
            .expect("statement");
        assert_eq!(statement.object, Term::iri("https://host/50%/%zz/%E9"));
    }

    #[test]
    fn skips_blank_and_comment_lines_and_graph_terms() {
        let content = "\n# header\n<a> <name> \"a\"@en <graph> .\n  \n<a> <x> \"1\"^^<http://www.w3.org/2001/XMLSchema#int> . # trailing\n";
        let statements = parse_statements(content, BASE).expect("parses");
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[1].object, Term::literal("1"));
    }

    #[test]
    fn reports_line_numbers() {
        let content = "<a> <name> \"a\" .\n<a> <name> \"unterminated .\n";
        let err = parse_statements(content, BASE).expect_err("must fail");
        assert_eq!(err.line, 2);
        assert_eq!(err.error, ParseError::UnterminatedLiteral);
    }

    #[test]
    fn rejects_malformed_lines() {
        assert_eq!(
            parse_line("\"lit\" <p> <o> .", BASE),
            Err(ParseError::LiteralPosition("subject"))
        );
        assert_eq!(
            parse_line("<s> <p> <o>", BASE),
            Err(ParseError::MissingTerminator)
        );
        assert_eq!(
            parse_line("<s> <p> .", BASE),
            Err(ParseError::MissingTerm("object"))
        );
        assert_eq!(
            parse_line("<s> <p> <o> . extra", BASE),
            Err(ParseError::TrailingContent("extra".into()))
        );
        assert_eq!(
            parse_line("<s> <p> <o .", BASE),
            Err(ParseError::UnterminatedIri)
        );
        assert_eq!(
            parse_line("<s> <p> \"bad \\q\" .", BASE),
            Err(ParseError::InvalidEscape('q'))
        );
    }
}
