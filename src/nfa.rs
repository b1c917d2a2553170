//! This module contains the NFA (Non-deterministic Finite Automaton) implementation.
//! The NFA is built from a postfix regex with Thompson's construction and is later converted
//! to a DFA (Deterministic Finite Automaton) for scanning.
//!
//! All states live in an arena that is indexed by [`NfaStateID`]. Transitions only store ids,
//! so the cycles introduced by Kleene star back edges need no shared ownership.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use log::trace;

use crate::{Alphabet, LexGenError, LexGenErrorKind, NfaStateID, Postfix, RegexSymbol, Result};

/// A state of the NFA together with its outgoing transitions.
#[derive(Debug, Clone, Default)]
pub struct NfaState {
    id: NfaStateID,
    epsilon_transitions: BTreeSet<NfaStateID>,
    transitions: BTreeMap<char, BTreeSet<NfaStateID>>,
}

impl NfaState {
    fn new(id: NfaStateID) -> Self {
        Self {
            id,
            epsilon_transitions: BTreeSet::new(),
            transitions: BTreeMap::new(),
        }
    }

    /// The id of the state.
    pub fn id(&self) -> NfaStateID {
        self.id
    }

    /// The targets reachable without consuming input.
    pub fn epsilon_transitions(&self) -> &BTreeSet<NfaStateID> {
        &self.epsilon_transitions
    }

    /// The targets per input symbol.
    pub fn transitions(&self) -> &BTreeMap<char, BTreeSet<NfaStateID>> {
        &self.transitions
    }
}

/// A non-deterministic finite automaton with one start state and a set of accept states.
#[derive(Debug, Clone)]
pub struct Nfa {
    states: Vec<NfaState>,
    start_state: NfaStateID,
    accept_states: BTreeSet<NfaStateID>,
}

impl Nfa {
    /// Build the NFA of an infix regex.
    pub fn from_regex(regex: &str) -> Result<Self> {
        Nfa::try_from(&crate::to_postfix(regex)?)
    }

    /// The start state.
    pub fn start_state(&self) -> NfaStateID {
        self.start_state
    }

    /// The accept states. Thompson's construction always yields exactly one.
    pub fn accept_states(&self) -> &BTreeSet<NfaStateID> {
        &self.accept_states
    }

    /// All states, indexable by their id.
    pub fn states(&self) -> &[NfaState] {
        &self.states
    }

    /// Returns true if any of the given states is an accept state.
    pub fn contains_accept_state(&self, states: &BTreeSet<NfaStateID>) -> bool {
        !self.accept_states.is_disjoint(states)
    }

    /// The symbols that label at least one transition.
    pub fn alphabet(&self) -> Alphabet {
        self.states
            .iter()
            .flat_map(|state| state.transitions.keys().copied())
            .collect()
    }

    /// The smallest superset of `states` that is closed under epsilon transitions.
    pub fn epsilon_closure<I>(&self, states: I) -> BTreeSet<NfaStateID>
    where
        I: IntoIterator<Item = NfaStateID>,
    {
        let mut closure: BTreeSet<NfaStateID> = BTreeSet::new();
        let mut queue: VecDeque<NfaStateID> = VecDeque::new();
        for state in states {
            if closure.insert(state) {
                queue.push_back(state);
            }
        }
        while let Some(state) = queue.pop_front() {
            for target in &self.states[state].epsilon_transitions {
                if closure.insert(*target) {
                    queue.push_back(*target);
                }
            }
        }
        closure
    }

    /// The union of the successors of `states` on `symbol`, without epsilon closure.
    pub fn move_set(&self, states: &BTreeSet<NfaStateID>, symbol: char) -> BTreeSet<NfaStateID> {
        states
            .iter()
            .filter_map(|state| self.states[*state].transitions.get(&symbol))
            .flatten()
            .copied()
            .collect()
    }

    /// Returns true if the NFA accepts the whole input.
    pub fn accepts(&self, input: &str) -> bool {
        let mut current = self.epsilon_closure([self.start_state]);
        for c in input.chars() {
            current = self.epsilon_closure(self.move_set(&current, c));
            if current.is_empty() {
                return false;
            }
        }
        self.contains_accept_state(&current)
    }
}

impl TryFrom<&Postfix> for Nfa {
    type Error = LexGenError;

    /// Thompson's construction over the postfix symbols using a stack of fragments.
    fn try_from(postfix: &Postfix) -> Result<Self> {
        let mut builder = ThompsonBuilder::new();
        let mut stack: Vec<Fragment> = Vec::new();

        for symbol in postfix.symbols() {
            let fragment = match symbol {
                RegexSymbol::Literal(c) => builder.literal(*c),
                RegexSymbol::Concat => {
                    let (a, b) = pop_two(&mut stack, symbol)?;
                    builder.concat(a, b)
                }
                RegexSymbol::Union => {
                    let (a, b) = pop_two(&mut stack, symbol)?;
                    builder.union(a, b)
                }
                RegexSymbol::Star => {
                    let a = stack.pop().ok_or_else(|| missing_operand(symbol))?;
                    builder.star(a)
                }
                RegexSymbol::LeftParen | RegexSymbol::RightParen => {
                    return Err(LexGenError::new(LexGenErrorKind::MalformedRegex(
                        "parenthesis in postfix regex".to_string(),
                    )))
                }
            };
            stack.push(fragment);
        }

        match (stack.pop(), stack.is_empty()) {
            (Some(fragment), true) => {
                let nfa = builder.finish(fragment);
                trace!(
                    "NFA of '{}' has {} states, start state {}",
                    postfix,
                    nfa.states.len(),
                    nfa.start_state
                );
                Ok(nfa)
            }
            (None, _) => Err(LexGenError::new(LexGenErrorKind::MalformedRegex(
                "empty regex".to_string(),
            ))),
            (Some(_), false) => Err(LexGenError::new(LexGenErrorKind::MalformedRegex(format!(
                "'{}' leaves {} fragments, missing operator",
                postfix,
                stack.len() + 1
            )))),
        }
    }
}

fn missing_operand(symbol: &RegexSymbol) -> LexGenError {
    LexGenError::new(LexGenErrorKind::MalformedRegex(format!(
        "missing operand for '{}'",
        symbol
    )))
}

// Pops the right operand first, then the left one.
fn pop_two(stack: &mut Vec<Fragment>, symbol: &RegexSymbol) -> Result<(Fragment, Fragment)> {
    let b = stack.pop().ok_or_else(|| missing_operand(symbol))?;
    let a = stack.pop().ok_or_else(|| missing_operand(symbol))?;
    Ok((a, b))
}

/// A partial automaton during construction.
/// Its states are owned by the builder's arena.
#[derive(Debug, Clone)]
struct Fragment {
    start_state: NfaStateID,
    accept_states: BTreeSet<NfaStateID>,
}

/// Owns the state arena for one regex. The arena length is the state id counter, so ids are
/// handed out in increasing order and never reused.
#[derive(Debug, Default)]
struct ThompsonBuilder {
    states: Vec<NfaState>,
}

impl ThompsonBuilder {
    fn new() -> Self {
        ThompsonBuilder::default()
    }

    fn new_state(&mut self) -> NfaStateID {
        let id = NfaStateID::new(self.states.len());
        self.states.push(NfaState::new(id));
        id
    }

    fn add_transition(&mut self, from: NfaStateID, symbol: char, to: NfaStateID) {
        self.states[from]
            .transitions
            .entry(symbol)
            .or_default()
            .insert(to);
    }

    fn add_epsilon_transition(&mut self, from: NfaStateID, to: NfaStateID) {
        self.states[from].epsilon_transitions.insert(to);
    }

    fn literal(&mut self, c: char) -> Fragment {
        let start_state = self.new_state();
        let accept_state = self.new_state();
        self.add_transition(start_state, c, accept_state);
        Fragment {
            start_state,
            accept_states: BTreeSet::from([accept_state]),
        }
    }

    fn concat(&mut self, a: Fragment, b: Fragment) -> Fragment {
        for accept_state in &a.accept_states {
            self.add_epsilon_transition(*accept_state, b.start_state);
        }
        Fragment {
            start_state: a.start_state,
            accept_states: b.accept_states,
        }
    }

    fn union(&mut self, a: Fragment, b: Fragment) -> Fragment {
        let start_state = self.new_state();
        let accept_state = self.new_state();
        self.add_epsilon_transition(start_state, a.start_state);
        self.add_epsilon_transition(start_state, b.start_state);
        for state in a.accept_states.iter().chain(b.accept_states.iter()) {
            self.add_epsilon_transition(*state, accept_state);
        }
        Fragment {
            start_state,
            accept_states: BTreeSet::from([accept_state]),
        }
    }

    fn star(&mut self, a: Fragment) -> Fragment {
        let start_state = self.new_state();
        let accept_state = self.new_state();
        self.add_epsilon_transition(start_state, a.start_state);
        self.add_epsilon_transition(start_state, accept_state);
        for state in &a.accept_states {
            self.add_epsilon_transition(*state, a.start_state);
            self.add_epsilon_transition(*state, accept_state);
        }
        Fragment {
            start_state,
            accept_states: BTreeSet::from([accept_state]),
        }
    }

    fn finish(self, fragment: Fragment) -> Nfa {
        Nfa {
            states: self.states,
            start_state: fragment.start_state,
            accept_states: fragment.accept_states,
        }
    }
}

impl std::fmt::Display for Nfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "NFA")?;
        writeln!(f, "Start state: {}", self.start_state)?;
        write!(f, "Accept states:")?;
        for state in &self.accept_states {
            write!(f, " {}", state)?;
        }
        writeln!(f)?;
        writeln!(f, "Transitions:")?;
        for state in &self.states {
            for target in &state.epsilon_transitions {
                writeln!(f, "{} --ε--> {}", state.id, target)?;
            }
            for (symbol, targets) in &state.transitions {
                for target in targets {
                    writeln!(f, "{} --{}--> {}", state.id, symbol, target)?;
                }
            }
        }
        Ok(())
    }
}
