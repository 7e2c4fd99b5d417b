//! Subject–predicate–object statements and their line-oriented text form.
//!
//! Each statement is written on its own line:
//!
//! ```text
//! <subject> <predicate> <object> .
//! <subject> <predicate> "literal" .
//! ```
//!
//! IRIs are written relative (`<lodash/4.17.21>`) and resolve against the
//! namespace the reader supplies. Characters that cannot appear inside an
//! IRI are percent-encoded; quotes, backslashes and line breaks inside
//! literals are backslash-escaped.

pub mod encode;
pub mod parser;

use std::fmt::{self, Write as _};
use std::io::{self, Write};

pub use encode::TripleEncoder;
pub use parser::{ParseError, StatementError, parse_statements};

/// Predicate and object vocabulary of the dependency graph.
pub mod vocab {
    pub const NAME: &str = "name";
    pub const HAS_VERSION: &str = "has_version";
    pub const LICENSE: &str = "license";
    pub const DESCRIPTION: &str = "description";
    pub const LIVES_IN: &str = "lives_in";
    pub const KEYWORD: &str = "keyword";
    pub const HAS_ROLE: &str = "has_role";
    pub const HAS_VISIBILITY: &str = "has_visibility";

    pub const ROLE_DEPENDENCY: &str = "dependency";
    pub const ROLE_PRIMARY: &str = "primary";
    pub const ROLE_PACKAGE: &str = "package";

    pub const PUBLIC: &str = "public";
    pub const PRIVATE: &str = "private";
}

/// A statement term: a resource identifier or a literal value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Iri(String),
    Literal(String),
}

impl Term {
    #[must_use]
    pub fn iri(value: impl Into<String>) -> Self {
        Self::Iri(value.into())
    }

    #[must_use]
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => {
                f.write_char('<')?;
                for ch in iri.chars() {
                    if needs_percent_encoding(ch) {
                        let mut buf = [0u8; 4];
                        for byte in ch.encode_utf8(&mut buf).bytes() {
                            write!(f, "%{byte:02X}")?;
                        }
                    } else {
                        f.write_char(ch)?;
                    }
                }
                f.write_char('>')
            }
            Self::Literal(text) => {
                f.write_char('"')?;
                for ch in text.chars() {
                    match ch {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\r' => f.write_str("\\r")?,
                        '\t' => f.write_str("\\t")?,
                        _ => f.write_char(ch)?,
                    }
                }
                f.write_char('"')
            }
        }
    }
}

fn needs_percent_encoding(ch: char) -> bool {
    matches!(ch, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\' | '%')
        || ch.is_whitespace()
        || ch.is_control()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl Statement {
    #[must_use]
    pub const fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// Statement whose object is a resource.
    #[must_use]
    pub fn link(subject: &str, predicate: &str, object: &str) -> Self {
        Self::new(Term::iri(subject), Term::iri(predicate), Term::iri(object))
    }

    /// Statement whose object is a literal.
    #[must_use]
    pub fn label(subject: &str, predicate: &str, text: &str) -> Self {
        Self::new(Term::iri(subject), Term::iri(predicate), Term::literal(text))
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

/// Write statements one per line, returning how many were written.
///
/// # Errors
///
/// Propagates write errors from `w`.
pub fn write_statements<'a, W, I>(w: &mut W, statements: I) -> io::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a Statement>,
{
    let mut count = 0;
    for statement in statements {
        writeln!(w, "{statement}")?;
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_links_and_labels() {
        assert_eq!(
            Statement::link("pkg-a", "has_role", "primary").to_string(),
            "<pkg-a> <has_role> <primary> ."
        );
        assert_eq!(
            Statement::label("lodash/4.17.21", "name", "4.17.21").to_string(),
            "<lodash/4.17.21> <name> \"4.17.21\" ."
        );
    }

    #[test]
    fn escapes_literal_quotes_and_iri_spaces() {
        assert_eq!(
            Term::literal(r#"say "hi" \ bye"#).to_string(),
            r#""say \"hi\" \\ bye""#
        );
        assert_eq!(
            Term::iri("https://host/a b>c").to_string(),
            "<https://host/a%20b%3Ec>"
        );
    }

    #[test]
    fn write_statements_counts_lines() {
        let statements = vec![
            Statement::link("a", "depends_prod", "b/1.0.0"),
            Statement::label("a", "name", "a"),
        ];
        let mut out = Vec::new();
        let written = write_statements(&mut out, &statements).expect("write");
        assert_eq!(written, 2);
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "<a> <depends_prod> <b/1.0.0> .\n<a> <name> \"a\" .\n"
        );
    }
}
