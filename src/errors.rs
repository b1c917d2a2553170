use thiserror::Error;

/// The result type for the `lexgen` crate.
pub type Result<T> = std::result::Result<T, LexGenError>;

/// The error type for the `lexgen` crate.
#[derive(Error, Debug)]
pub struct LexGenError {
    /// The source of the error.
    pub source: Box<LexGenErrorKind>,
}

impl LexGenError {
    /// Create a new `LexGenError`.
    pub fn new(kind: LexGenErrorKind) -> Self {
        LexGenError {
            source: Box::new(kind),
        }
    }

    /// Get the kind of the error.
    pub fn kind(&self) -> &LexGenErrorKind {
        &self.source
    }

    /// Attach the position and the name of the token definition this error originated from.
    pub(crate) fn in_definition(self, index: usize, name: &str) -> Self {
        LexGenError::new(LexGenErrorKind::InvalidTokenDefinition {
            index,
            name: name.to_string(),
            source: self.source,
        })
    }
}

impl std::fmt::Display for LexGenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl From<LexGenErrorKind> for LexGenError {
    fn from(kind: LexGenErrorKind) -> Self {
        LexGenError::new(kind)
    }
}

/// The error kind type.
#[derive(Error, Debug)]
pub enum LexGenErrorKind {
    /// Parentheses in the regex are not balanced.
    /// The position is the byte offset of the parenthesis that has no partner.
    #[error("Mismatched parentheses at position {position}")]
    MismatchedParentheses {
        /// Byte offset into the infix regex.
        position: usize,
    },

    /// The postfix regex did not reduce to exactly one NFA fragment.
    #[error("Malformed regex: {0}")]
    MalformedRegex(String),

    /// The regex contains a character that is neither an operand nor an operator.
    #[error("Unsupported character '{}' at position {position}", .character.escape_default())]
    UnsupportedCharacter {
        /// The offending character.
        character: char,
        /// Byte offset into the infix regex.
        position: usize,
    },

    /// A literal of the regex is not part of the configured fixed alphabet.
    #[error("Symbol '{}' is not part of the alphabet", .symbol.escape_default())]
    SymbolNotInAlphabet {
        /// The literal that is missing from the alphabet.
        symbol: char,
    },

    /// A token definition could not be compiled.
    #[error("Error in token definition #{index} '{name}': {source}")]
    InvalidTokenDefinition {
        /// The position of the definition in the definition list.
        index: usize,
        /// The name of the token.
        name: String,
        /// The error that made the definition unusable.
        source: Box<LexGenErrorKind>,
    },

    /// No token matched at the given position of the input.
    #[error("Unmatched symbol '{}' at position {position}", .character.escape_default())]
    UnmatchedSymbol {
        /// The character no token could start with.
        character: char,
        /// Byte offset into the scanned input.
        position: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = LexGenError::new(LexGenErrorKind::MismatchedParentheses { position: 3 });
        assert_eq!(error.to_string(), "Mismatched parentheses at position 3");
    }

    #[test]
    fn test_error_in_definition() {
        let error = LexGenError::new(LexGenErrorKind::MalformedRegex(
            "missing operand".to_string(),
        ))
        .in_definition(2, "NUM");
        assert!(matches!(
            error.kind(),
            LexGenErrorKind::InvalidTokenDefinition { index: 2, name, .. } if name == "NUM"
        ));
        assert_eq!(
            error.to_string(),
            "Error in token definition #2 'NUM': Malformed regex: missing operand"
        );
    }
}
