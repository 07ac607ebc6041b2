//! Placeholder pattern parsing and substitution
//!
//! A pattern is a query string with embedded `<name>` placeholders, e.g.
//! `https://cht.sh/rust/<entry>`. Parsing splits it into alternating literal
//! segments and parameter names; building interleaves supplied values back
//! between the literals.

use thiserror::Error;

/// Errors produced while parsing or building a pattern
#[derive(Debug, Error)]
pub enum PatternError {
    /// A `<` opened a placeholder that is never closed with `>`
    #[error("missing '>' in '{0}'")]
    MissingClose(String),

    /// The number of supplied values does not match the placeholder count
    #[error("expected {expected} parameter(s), got {got} for '{pattern}'")]
    Arity {
        expected: usize,
        got: usize,
        pattern: String,
    },
}

/// A compiled query pattern
///
/// Holds `N+1` literal segments and `N` parameter names, so that
/// `literals[0] + value[0] + literals[1] + … + literals[N]` reconstructs a
/// concrete query. Literal `<` or `>` characters cannot be escaped; patterns
/// that need them cannot be expressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    /// The original pattern text, kept for error messages and listings
    source: String,
    /// Literal segments surrounding the placeholders
    literals: Vec<String>,
    /// Placeholder names in order of appearance
    params: Vec<String>,
}

impl Pattern {
    /// Parses a pattern string into literal segments and parameter names.
    ///
    /// # Errors
    /// Returns [`PatternError::MissingClose`] if a `<` is not followed by a
    /// matching `>` in the same chunk.
    pub fn parse(source: &str) -> Result<Self, PatternError> {
        let mut chunks = source.split('<');
        // split always yields at least one chunk
        let mut literals = vec![chunks.next().unwrap_or_default().to_string()];
        let mut params = Vec::new();

        for chunk in chunks {
            let (name, rest) = chunk
                .split_once('>')
                .ok_or_else(|| PatternError::MissingClose(source.to_string()))?;
            params.push(name.to_string());
            literals.push(rest.to_string());
        }

        Ok(Self {
            source: source.to_string(),
            literals,
            params,
        })
    }

    /// Builds a concrete query by interleaving `values` between the literal
    /// segments.
    ///
    /// # Errors
    /// Returns [`PatternError::Arity`] unless exactly one value is supplied
    /// per placeholder (zero placeholders require zero values).
    pub fn build(&self, values: &[String]) -> Result<String, PatternError> {
        if values.len() != self.params.len() {
            return Err(PatternError::Arity {
                expected: self.params.len(),
                got: values.len(),
                pattern: self.source.clone(),
            });
        }

        let mut out = String::new();
        for (literal, value) in self.literals.iter().zip(values) {
            out.push_str(literal);
            out.push_str(value);
        }
        out.push_str(self.literals.last().map(String::as_str).unwrap_or(""));
        Ok(out)
    }

    /// Placeholder names in order of appearance
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Number of placeholders the pattern expects
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// The original pattern text
    pub fn source(&self) -> &str {
        &self.source
    }
}
