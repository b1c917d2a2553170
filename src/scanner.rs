//! This module contains the scanning driver.
//! At every position all DFAs are advanced in parallel from their start states. The token whose
//! DFA accepted the longest lexeme wins, ties go to the token declared first. A character no DFA
//! can start a lexeme with becomes an `ERROR` token.

use log::{debug, trace};

use crate::{
    compile_with_alphabet, AlphabetPolicy, CompiledToken, Dfa, DfaStateID, LexGenError,
    LexGenErrorKind, Result, Span, Token, TokenDefinition, ERROR_TOKEN_NAME,
};

/// The per-DFA state of one scan attempt.
/// Only the cursor changes during scanning, the DFA itself is never modified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ScanCursor {
    // The current DFA state, None if the last symbol had no transition.
    state: Option<DfaStateID>,
    // The end of the longest non-empty lexeme accepted so far.
    accepted_end: Option<usize>,
}

impl ScanCursor {
    /// Put the cursor back to the start state of the DFA.
    pub(crate) fn reset(&mut self, dfa: &Dfa) {
        self.state = Some(dfa.start_state());
        self.accepted_end = None;
    }

    /// Advance the cursor by the character `c` found at byte offset `c_pos`.
    pub(crate) fn advance(&mut self, dfa: &Dfa, c_pos: usize, c: char) {
        if let Some(state) = self.state {
            self.state = dfa.next_state(state, c);
            if let Some(next_state) = self.state {
                if dfa.is_accepting(next_state) {
                    self.accepted_end = Some(c_pos + c.len_utf8());
                }
            }
        }
    }

    /// Returns true if the DFA can still consume input.
    pub(crate) fn is_active(&self) -> bool {
        self.state.is_some()
    }

    /// The end of the longest lexeme accepted so far.
    pub(crate) fn accepted_end(&self) -> Option<usize> {
        self.accepted_end
    }
}

/// A lexer holds the compiled DFAs of an ordered list of token definitions.
/// It is immutable and can run any number of tokenization passes.
#[derive(Debug, Clone)]
pub struct Lexer {
    tokens: Vec<CompiledToken>,
}

impl Lexer {
    /// Create a lexer from compiled tokens. Their order is the tie-break order.
    pub fn new(tokens: Vec<CompiledToken>) -> Self {
        Lexer { tokens }
    }

    /// Compile the token definitions with an inferred alphabet and create a lexer.
    pub fn compile<I, D>(definitions: I) -> Result<Self>
    where
        I: IntoIterator<Item = D>,
        D: Into<TokenDefinition>,
    {
        LexerBuilder::new().add_tokens(definitions).build()
    }

    /// The compiled tokens in declaration order.
    pub fn compiled_tokens(&self) -> &[CompiledToken] {
        &self.tokens
    }

    /// Returns an iterator over the tokens of the input.
    /// Whitespace separates tokens and is never part of a lexeme.
    pub fn tokens<'a>(&'a self, input: &'a str) -> Tokens<'a> {
        Tokens::new(self, input)
    }

    /// Tokenize the whole input. Unmatched characters become `ERROR` tokens.
    pub fn tokenize<'a>(&'a self, input: &'a str) -> Vec<Token<'a>> {
        self.tokens(input).collect()
    }

    /// Tokenize the whole input and fail on the first character no token matches.
    pub fn try_tokenize<'a>(&'a self, input: &'a str) -> Result<Vec<Token<'a>>> {
        self.tokens(input)
            .map(|token| {
                if token.is_error() {
                    Err(LexGenError::new(LexGenErrorKind::UnmatchedSymbol {
                        character: token.lexeme().chars().next().unwrap_or_default(),
                        position: token.span().start,
                    }))
                } else {
                    Ok(token)
                }
            })
            .collect()
    }

    /// Runs all DFAs from `start` and returns the index of the winning token and the end of
    /// its lexeme.
    fn longest_match(
        &self,
        cursors: &mut [ScanCursor],
        input: &str,
        start: usize,
    ) -> Option<(usize, usize)> {
        for (cursor, token) in cursors.iter_mut().zip(&self.tokens) {
            cursor.reset(token.dfa());
        }

        for (i, c) in input[start..].char_indices() {
            let mut any_active = false;
            for (cursor, token) in cursors.iter_mut().zip(&self.tokens) {
                cursor.advance(token.dfa(), start + i, c);
                any_active |= cursor.is_active();
            }
            if !any_active {
                break;
            }
        }

        // Only a strictly longer lexeme replaces the current winner, so the earlier declared
        // token wins on equal length.
        let mut winner: Option<(usize, usize)> = None;
        for (index, cursor) in cursors.iter().enumerate() {
            if let Some(end) = cursor.accepted_end() {
                if winner.map_or(true, |(_, winner_end)| end > winner_end) {
                    winner = Some((index, end));
                }
            }
        }
        winner
    }
}

/// An iterator over the tokens of an input.
///
/// The iterator yields a [`Token`] until the whole input is consumed.
/// It is created with the [`Lexer::tokens`] method.
#[derive(Debug)]
pub struct Tokens<'a> {
    lexer: &'a Lexer,
    input: &'a str,
    position: usize,
    cursors: Vec<ScanCursor>,
}

impl<'a> Tokens<'a> {
    fn new(lexer: &'a Lexer, input: &'a str) -> Self {
        Tokens {
            lexer,
            input,
            position: 0,
            cursors: vec![ScanCursor::default(); lexer.tokens.len()],
        }
    }

    // Move the position past any whitespace.
    fn skip_whitespace(&mut self) {
        let rest = &self.input[self.position..];
        self.position += rest.len() - rest.trim_start().len();
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_whitespace();
        let (lexer, input) = (self.lexer, self.input);
        let start = self.position;
        let c = input[start..].chars().next()?;

        let token = match lexer.longest_match(&mut self.cursors, input, start) {
            Some((index, end)) => {
                let name = lexer.tokens[index].name();
                trace!("Token {} '{}' at {}..{}", name, &input[start..end], start, end);
                Token::new(name, &input[start..end], Span::new(start, end))
            }
            None => {
                let end = start + c.len_utf8();
                debug!("Unmatched symbol '{}' at {}", c.escape_default(), start);
                Token::new(ERROR_TOKEN_NAME, &input[start..end], Span::new(start, end))
            }
        };
        self.position = token.span().end;
        Some(token)
    }
}

/// A lexer builder collects token definitions and the alphabet policy.
#[derive(Debug, Default)]
pub struct LexerBuilder {
    definitions: Vec<TokenDefinition>,
    alphabet: AlphabetPolicy,
}

impl LexerBuilder {
    /// Creates a new lexer builder.
    pub fn new() -> Self {
        LexerBuilder::default()
    }

    /// Sets the alphabet policy used for all token definitions.
    pub fn alphabet(mut self, policy: AlphabetPolicy) -> Self {
        self.alphabet = policy;
        self
    }

    /// Appends a token definition.
    pub fn add_token<N, R>(mut self, name: N, regex: R) -> Self
    where
        N: Into<String>,
        R: Into<String>,
    {
        self.definitions.push(TokenDefinition::new(name, regex));
        self
    }

    /// Appends several token definitions in order.
    pub fn add_tokens<I, D>(mut self, definitions: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<TokenDefinition>,
    {
        self.definitions.extend(definitions.into_iter().map(Into::<TokenDefinition>::into));
        self
    }

    /// Compiles the token definitions and builds the lexer.
    pub fn build(self) -> Result<Lexer> {
        let tokens = compile_with_alphabet(self.definitions, &self.alphabet)?;
        Ok(Lexer::new(tokens))
    }
}
