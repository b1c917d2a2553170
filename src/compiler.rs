//! This module contains the compilation of token definitions into DFAs.
//! Each definition runs through the pipeline infix regex -> postfix -> NFA -> DFA.
//! Every compilation owns its own state arena, so no state is shared between definitions.

use std::time::Instant;

use log::{debug, trace};

use crate::{
    to_postfix, Alphabet, AlphabetPolicy, Dfa, Nfa, Postfix, Result, TokenDefinition, TokenID,
};

/// A token definition together with its compiled DFA.
/// The DFA is read-only and can be shared by any number of scanning passes.
#[derive(Debug, Clone)]
pub struct CompiledToken {
    id: TokenID,
    name: String,
    regex: String,
    postfix: Postfix,
    dfa: Dfa,
}

impl CompiledToken {
    /// The position of the definition in declaration order.
    pub fn id(&self) -> TokenID {
        self.id
    }

    /// The name of the token.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The infix regex of the definition.
    pub fn regex(&self) -> &str {
        &self.regex
    }

    /// The regex in postfix notation.
    pub fn postfix(&self) -> &Postfix {
        &self.postfix
    }

    /// The DFA that recognizes the lexemes of this token.
    pub fn dfa(&self) -> &Dfa {
        &self.dfa
    }
}

/// Compile the token definitions with an alphabet inferred from all their literals.
///
/// # Errors
/// The first definition that can't be compiled is reported as `InvalidTokenDefinition`
/// with its index and name.
pub fn compile<I, D>(definitions: I) -> Result<Vec<CompiledToken>>
where
    I: IntoIterator<Item = D>,
    D: Into<TokenDefinition>,
{
    compile_with_alphabet(definitions, &AlphabetPolicy::Inferred)
}

/// Compile the token definitions with the given alphabet policy.
/// One alphabet is resolved for all definitions and used for every subset construction.
pub fn compile_with_alphabet<I, D>(
    definitions: I,
    policy: &AlphabetPolicy,
) -> Result<Vec<CompiledToken>>
where
    I: IntoIterator<Item = D>,
    D: Into<TokenDefinition>,
{
    let now = Instant::now();

    let front_end = definitions
        .into_iter()
        .map(Into::<TokenDefinition>::into)
        .enumerate()
        .map(|(index, definition)| match compile_to_nfa(&definition) {
            Ok((postfix, nfa)) => Ok((definition, postfix, nfa)),
            Err(e) => Err(e.in_definition(index, &definition.name)),
        })
        .collect::<Result<Vec<_>>>()?;

    let alphabet = match policy {
        AlphabetPolicy::Inferred => {
            front_end
                .iter()
                .fold(Alphabet::new(), |mut alphabet, (_, postfix, _)| {
                    alphabet.extend_from(&postfix.literals());
                    alphabet
                })
        }
        AlphabetPolicy::Fixed(alphabet) => {
            for (index, (definition, postfix, _)) in front_end.iter().enumerate() {
                alphabet
                    .check_covers(&postfix.literals())
                    .map_err(|e| e.in_definition(index, &definition.name))?;
            }
            alphabet.clone()
        }
    };
    trace!("Alphabet: {}", alphabet);

    let compiled_tokens = front_end
        .into_iter()
        .enumerate()
        .map(|(index, (definition, postfix, nfa))| {
            let dfa = Dfa::from_nfa(&nfa, &alphabet);
            debug!(
                "Token #{} '{}' = '{}': postfix '{}', {} NFA states, {} DFA states",
                index,
                definition.name,
                definition.regex,
                postfix,
                nfa.states().len(),
                dfa.states().len()
            );
            CompiledToken {
                id: TokenID::new(index),
                name: definition.name,
                regex: definition.regex,
                postfix,
                dfa,
            }
        })
        .collect::<Vec<_>>();

    debug!(
        "Compiling {} token definitions took {} milliseconds.",
        compiled_tokens.len(),
        now.elapsed().as_millis()
    );
    Ok(compiled_tokens)
}

fn compile_to_nfa(definition: &TokenDefinition) -> Result<(Postfix, Nfa)> {
    let postfix = to_postfix(&definition.regex)?;
    let nfa = Nfa::try_from(&postfix)?;
    Ok((postfix, nfa))
}
