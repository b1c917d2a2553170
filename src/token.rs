/// The name of the token that is emitted for a character no token definition matches.
pub const ERROR_TOKEN_NAME: &str = "ERROR";

/// A named token category and the infix regex that describes its lexemes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDefinition {
    /// The name of the token.
    pub name: String,
    /// The regex in infix notation.
    pub regex: String,
}

impl TokenDefinition {
    /// Create a new token definition.
    pub fn new<N, R>(name: N, regex: R) -> Self
    where
        N: Into<String>,
        R: Into<String>,
    {
        TokenDefinition {
            name: name.into(),
            regex: regex.into(),
        }
    }
}

impl<N, R> From<(N, R)> for TokenDefinition
where
    N: Into<String>,
    R: Into<String>,
{
    fn from((name, regex): (N, R)) -> Self {
        TokenDefinition::new(name, regex)
    }
}

/// A span in the scanned input.
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub struct Span {
    /// The start offset of the span, inclusive.
    pub start: usize,
    /// The end offset of the span, exclusive.
    pub end: usize,
}

impl Span {
    /// Create a new span.
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Check if the span is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Get the length of the span.
    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }
}

/// A token found in the input.
/// The lexeme borrows from the scanned input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'h> {
    name: &'h str,
    lexeme: &'h str,
    span: Span,
}

impl<'h> Token<'h> {
    pub(crate) fn new(name: &'h str, lexeme: &'h str, span: Span) -> Self {
        Token { name, lexeme, span }
    }

    /// The name of the token definition, or `ERROR`.
    pub fn name(&self) -> &'h str {
        self.name
    }

    /// The matched text.
    pub fn lexeme(&self) -> &'h str {
        self.lexeme
    }

    /// The byte range of the lexeme in the input.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Returns true if no token definition matched this character.
    pub fn is_error(&self) -> bool {
        self.name == ERROR_TOKEN_NAME
    }

    /// The `(name, lexeme)` pair.
    pub fn as_pair(&self) -> (&'h str, &'h str) {
        (self.name, self.lexeme)
    }
}

/// Renders the token as `name , "lexeme"`.
impl std::fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} , \"{}\"", self.name, self.lexeme)
    }
}
