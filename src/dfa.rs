//! This module contains the DFA implementation.
//! The DFA is generated from the NFA using the subset construction algorithm.
//! No minimization is performed, every reachable subset of NFA states becomes one DFA state.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use itertools::Itertools;
use log::trace;

use crate::{Alphabet, DfaStateID, Nfa, NfaStateID};

/// A DFA state. It is identified by the set of NFA states it represents.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DfaState {
    id: DfaStateID,
    // The ids of the NFA states that constitute this DFA state.
    nfa_states: BTreeSet<NfaStateID>,
}

impl DfaState {
    fn new(id: DfaStateID, nfa_states: BTreeSet<NfaStateID>) -> Self {
        DfaState { id, nfa_states }
    }

    /// Get the id of the DFA state.
    pub fn id(&self) -> DfaStateID {
        self.id
    }

    /// Get the NFA states that constitute the DFA state.
    pub fn nfa_states(&self) -> &BTreeSet<NfaStateID> {
        &self.nfa_states
    }
}

/// A deterministic finite automaton.
/// The start state is always the first state, i.e. state 0.
/// A missing transition means the input is rejected from that state.
#[derive(Debug, Clone, Default)]
pub struct Dfa {
    states: Vec<DfaState>,
    accepting_states: BTreeSet<DfaStateID>,
    transitions: BTreeMap<DfaStateID, BTreeMap<char, DfaStateID>>,
    alphabet: Alphabet,
}

impl Dfa {
    /// Create a DFA from an NFA with the subset construction algorithm.
    /// Only the states reachable from the epsilon closure of the NFA start state are created.
    /// The alphabet decides which symbols are tried from each state.
    pub fn from_nfa(nfa: &Nfa, alphabet: &Alphabet) -> Self {
        let mut dfa = Dfa {
            alphabet: alphabet.clone(),
            ..Default::default()
        };
        // Lookup from NFA state sets to the DFA state already created for them.
        let mut known: BTreeMap<BTreeSet<NfaStateID>, DfaStateID> = BTreeMap::new();

        let start_state = dfa.add_state(nfa, nfa.epsilon_closure([nfa.start_state()]), &mut known);
        let mut work_list: VecDeque<DfaStateID> = VecDeque::from([start_state]);

        while let Some(state_id) = work_list.pop_front() {
            for symbol in alphabet.iter() {
                let target_states =
                    nfa.epsilon_closure(nfa.move_set(&dfa.states[state_id].nfa_states, symbol));
                if target_states.is_empty() {
                    continue;
                }
                let target_state = match known.get(&target_states) {
                    Some(target_state) => *target_state,
                    None => {
                        let target_state = dfa.add_state(nfa, target_states, &mut known);
                        work_list.push_back(target_state);
                        target_state
                    }
                };
                dfa.transitions
                    .entry(state_id)
                    .or_default()
                    .insert(symbol, target_state);
            }
        }

        trace!(
            "DFA has {} states, {} accepting",
            dfa.states.len(),
            dfa.accepting_states.len()
        );
        dfa
    }

    /// Add a new state for a set of NFA states that has not been seen before.
    fn add_state(
        &mut self,
        nfa: &Nfa,
        nfa_states: BTreeSet<NfaStateID>,
        known: &mut BTreeMap<BTreeSet<NfaStateID>, DfaStateID>,
    ) -> DfaStateID {
        let state_id = DfaStateID::new(self.states.len());
        if nfa.contains_accept_state(&nfa_states) {
            self.accepting_states.insert(state_id);
        }
        known.insert(nfa_states.clone(), state_id);
        self.states.push(DfaState::new(state_id, nfa_states));
        state_id
    }

    /// The start state.
    pub fn start_state(&self) -> DfaStateID {
        DfaStateID::default()
    }

    /// Get the states of the DFA.
    pub fn states(&self) -> &[DfaState] {
        &self.states
    }

    /// Get the accepting states of the DFA.
    pub fn accepting_states(&self) -> &BTreeSet<DfaStateID> {
        &self.accepting_states
    }

    /// Get the transitions of the DFA.
    pub fn transitions(&self) -> &BTreeMap<DfaStateID, BTreeMap<char, DfaStateID>> {
        &self.transitions
    }

    /// Get the alphabet the DFA was constructed over.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Returns true if the given state is an accepting state.
    #[inline]
    pub fn is_accepting(&self, state: DfaStateID) -> bool {
        self.accepting_states.contains(&state)
    }

    /// The unique successor of `state` on `symbol`, if any.
    #[inline]
    pub fn next_state(&self, state: DfaStateID, symbol: char) -> Option<DfaStateID> {
        self.transitions
            .get(&state)
            .and_then(|targets| targets.get(&symbol))
            .copied()
    }

    /// Returns true if the DFA accepts the whole input.
    pub fn accepts(&self, input: &str) -> bool {
        input
            .chars()
            .try_fold(self.start_state(), |state, c| self.next_state(state, c))
            .is_some_and(|state| self.is_accepting(state))
    }

    /// The byte length of the longest prefix of `input` the DFA accepts.
    /// `Some(0)` means only the empty prefix is accepted.
    pub fn longest_prefix(&self, input: &str) -> Option<usize> {
        let mut state = self.start_state();
        let mut longest = self.is_accepting(state).then_some(0);
        for (i, c) in input.char_indices() {
            match self.next_state(state, c) {
                Some(next_state) => state = next_state,
                None => break,
            }
            if self.is_accepting(state) {
                longest = Some(i + c.len_utf8());
            }
        }
        longest
    }
}

impl std::fmt::Display for Dfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "DFA")?;
        writeln!(f, "States:")?;
        for state in &self.states {
            writeln!(
                f,
                "{}{}: {{{}}}",
                state.id,
                if self.is_accepting(state.id) { "*" } else { "" },
                state.nfa_states.iter().join(", ")
            )?;
        }
        writeln!(f, "Alphabet: {}", self.alphabet)?;
        writeln!(f, "Transitions:")?;
        for (source_id, targets) in &self.transitions {
            writeln!(
                f,
                "{} -> {}",
                source_id,
                targets
                    .iter()
                    .map(|(symbol, target_id)| format!("{}:{}", symbol, target_id))
                    .join(" ")
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Initialize the logger for the tests
    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn dfa_of(regex: &str) -> Dfa {
        let nfa = Nfa::from_regex(regex).unwrap();
        Dfa::from_nfa(&nfa, &nfa.alphabet())
    }

    // All strings over `symbols` up to length `max_len`, including the empty one.
    fn all_strings(symbols: &str, max_len: usize) -> Vec<String> {
        let mut result = vec![String::new()];
        let mut layer = vec![String::new()];
        for _ in 0..max_len {
            layer = layer
                .iter()
                .flat_map(|prefix| symbols.chars().map(move |c| format!("{}{}", prefix, c)))
                .collect();
            result.extend(layer.iter().cloned());
        }
        result
    }

    #[test]
    fn test_dfa_dragon() {
        init();
        let dfa = dfa_of("(a|b)*abb");
        assert_eq!(dfa.states().len(), 5);
        assert_eq!(dfa.accepting_states().len(), 1);
        assert_eq!(dfa.alphabet().len(), 2);
        assert!(dfa.accepts("abb"));
        assert!(dfa.accepts("aababb"));
        assert!(!dfa.accepts("abba"));
    }

    #[test]
    fn test_dfa_start_state() {
        let nfa = Nfa::from_regex("a(b|c)*").unwrap();
        let dfa = Dfa::from_nfa(&nfa, &nfa.alphabet());
        assert_eq!(
            dfa.states()[0].nfa_states(),
            &nfa.epsilon_closure([nfa.start_state()])
        );
        assert!(!dfa.is_accepting(dfa.start_state()));
        assert!(dfa.next_state(dfa.start_state(), 'b').is_none());
    }

    #[test]
    fn test_dfa_agrees_with_nfa() {
        init();
        for regex in ["a(b|c)*", "(a|b)*abb", "a*b*", "(ab|a)*", "a|b|c", "(a*)*"] {
            let nfa = Nfa::from_regex(regex).unwrap();
            let dfa = Dfa::from_nfa(&nfa, &nfa.alphabet());
            for input in all_strings("abc", 5) {
                assert_eq!(
                    dfa.accepts(&input),
                    nfa.accepts(&input),
                    "{} on '{}'",
                    regex,
                    input
                );
            }
        }
    }

    #[test]
    fn test_dfa_agrees_with_regex_crate() {
        for pattern in ["a(b|c)*", "(0|1)*1", "ab|c*", "((a|b)(a|b))*", "x(yz)*|xy"] {
            let oracle = regex::Regex::new(&format!("^(?:{})$", pattern)).unwrap();
            let dfa = dfa_of(pattern);
            for input in all_strings("abcxyz01", 3) {
                assert_eq!(
                    dfa.accepts(&input),
                    oracle.is_match(&input),
                    "{} on '{}'",
                    pattern,
                    input
                );
            }
        }
    }

    #[test]
    fn test_dfa_is_deterministic() {
        let dfa = dfa_of("(a|ab|abc)*(b|c)");
        // Every state has at most one successor per symbol and every target state exists.
        for targets in dfa.transitions().values() {
            for target in targets.values() {
                assert!(target.as_usize() < dfa.states().len());
            }
        }
        // No two DFA states share the same set of NFA states.
        let distinct: BTreeSet<_> = dfa.states().iter().map(|s| s.nfa_states()).collect();
        assert_eq!(distinct.len(), dfa.states().len());
    }

    #[test]
    fn test_wider_alphabet_gives_same_language() {
        let nfa = Nfa::from_regex("a(b|c)*").unwrap();
        let narrow = Dfa::from_nfa(&nfa, &nfa.alphabet());
        let wide = Dfa::from_nfa(&nfa, &Alphabet::ascii_alphanumeric());
        assert_eq!(narrow.states().len(), wide.states().len());
        for input in all_strings("abcd", 4) {
            assert_eq!(narrow.accepts(&input), wide.accepts(&input), "'{}'", input);
        }
    }

    #[test]
    fn test_idempotent_compilation() {
        let first = dfa_of("(ab|a)*b");
        let second = dfa_of("(ab|a)*b");
        for input in all_strings("ab", 6) {
            assert_eq!(first.accepts(&input), second.accepts(&input));
        }
    }

    #[test]
    fn test_longest_prefix() {
        let dfa = dfa_of("a(b|c)*");
        assert_eq!(dfa.longest_prefix("abcbx"), Some(4));
        assert_eq!(dfa.longest_prefix("a"), Some(1));
        assert_eq!(dfa.longest_prefix("ba"), None);
        assert_eq!(dfa.longest_prefix(""), None);

        let dfa = dfa_of("a*");
        assert_eq!(dfa.longest_prefix("b"), Some(0));
        assert_eq!(dfa.longest_prefix("aab"), Some(2));
    }

    #[test]
    fn test_display() {
        let dfa = dfa_of("ab");
        assert_eq!(
            dfa.to_string(),
            "DFA\nStates:\n0: {0}\n1: {1, 2}\n2*: {3}\nAlphabet: {a, b}\nTransitions:\n0 -> a:1\n1 -> b:2\n"
        );
    }
}
