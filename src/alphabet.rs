//! The alphabet is the set of input symbols the subset construction iterates over.
//! All token definitions that are compiled together share one alphabet, otherwise the
//! longest-match comparison between their DFAs would not be meaningful.

use std::collections::BTreeSet;

use itertools::Itertools;

use crate::{LexGenError, LexGenErrorKind, Result};

/// A set of input symbols.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alphabet(BTreeSet<char>);

impl Alphabet {
    /// Create an empty alphabet.
    pub fn new() -> Self {
        Alphabet::default()
    }

    /// The ASCII letters and digits, i.e. every symbol a regex operand can be.
    pub fn ascii_alphanumeric() -> Self {
        ('0'..='9').chain('A'..='Z').chain('a'..='z').collect()
    }

    /// Add a symbol to the alphabet.
    pub fn insert(&mut self, symbol: char) -> bool {
        self.0.insert(symbol)
    }

    /// Returns true if the symbol is part of the alphabet.
    pub fn contains(&self, symbol: char) -> bool {
        self.0.contains(&symbol)
    }

    /// The number of symbols in the alphabet.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the alphabet has no symbols.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the symbols in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.0.iter().copied()
    }

    /// Add all symbols of the other alphabet.
    pub fn extend_from(&mut self, other: &Alphabet) {
        self.0.extend(other.iter());
    }

    /// Fails with the first symbol of `symbols` that is not part of this alphabet.
    pub(crate) fn check_covers(&self, symbols: &Alphabet) -> Result<()> {
        match symbols.iter().find(|symbol| !self.contains(*symbol)) {
            Some(symbol) => Err(LexGenError::new(LexGenErrorKind::SymbolNotInAlphabet {
                symbol,
            })),
            None => Ok(()),
        }
    }
}

impl FromIterator<char> for Alphabet {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        Alphabet(iter.into_iter().collect())
    }
}

impl std::fmt::Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.0.iter().join(", "))
    }
}

/// Decides which alphabet the subset construction uses for a set of token definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AlphabetPolicy {
    /// The alphabet is the union of the literals of all token definitions compiled together.
    #[default]
    Inferred,
    /// A declared alphabet. Every literal of every token definition must be part of it.
    Fixed(Alphabet),
}
