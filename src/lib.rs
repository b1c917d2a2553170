#![forbid(missing_docs)]
//! The `lexgen` crate is a lexical-analyzer generator.
//! Named token definitions written as infix regular expressions are compiled into DFAs, which
//! then tokenize an input by longest-match scanning.
//!
//! ```
//! use lexgen::Lexer;
//!
//! let lexer = Lexer::compile([("NUM", "(0|1)(0|1)*"), ("ID", "a(b)*")]).unwrap();
//! let tokens: Vec<_> = lexer.tokenize("101 abb").iter().map(|t| t.as_pair()).collect();
//! assert_eq!(tokens, vec![("NUM", "101"), ("ID", "abb")]);
//! ```

/// Module with error definitions
mod errors;
pub use errors::{LexGenError, LexGenErrorKind, Result};

/// Module that provides the id types for states and tokens.
mod ids;
pub use ids::{DfaStateID, NfaStateID, TokenID};

/// Module that provides the alphabet of the subset construction and its configuration.
mod alphabet;
pub use alphabet::{Alphabet, AlphabetPolicy};

/// The postfix module converts infix regexes into postfix notation.
mod postfix;
pub use postfix::{to_postfix, Postfix, RegexSymbol};

/// The nfa module contains the NFA implementation and Thompson's construction.
mod nfa;
pub use nfa::{Nfa, NfaState};

/// The dfa module contains the DFA implementation and the subset construction.
mod dfa;
pub use dfa::{Dfa, DfaState};

/// Module that provides token definitions and the tokens found in the input.
mod token;
pub use token::{Span, Token, TokenDefinition, ERROR_TOKEN_NAME};

/// The compiler module turns token definitions into DFAs.
mod compiler;
pub use compiler::{compile, compile_with_alphabet, CompiledToken};

/// The scanner module contains the longest-match scanning driver.
mod scanner;
pub use scanner::{Lexer, LexerBuilder, Tokens};

/// Module with conversion to graphviz dot format
#[cfg(feature = "dot")]
mod dot;
#[cfg(feature = "dot")]
pub use dot::{dfa_render, nfa_render};
