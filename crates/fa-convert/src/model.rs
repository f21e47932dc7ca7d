use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Display};

use crate::closure::{epsilon_closure, move_on};
use crate::error::AutomatonError;

/// A single input symbol. Never empty: the empty string is reserved on the
/// wire for epsilon, which the typed model spells as `None`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(symbol: impl Into<String>) -> Result<Symbol, AutomatonError> {
        let symbol = symbol.into();
        if symbol.is_empty() {
            Err(AutomatonError::MalformedAutomaton(
                "alphabet symbols must be non-empty".to_string(),
            ))
        } else {
            Ok(Symbol(symbol))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Symbol {
    type Error = AutomatonError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Symbol::new(value)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque state label, unique within one automaton.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(String);

impl StateId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for StateId {
    fn from(value: &str) -> Self {
        StateId(value.to_string())
    }
}

impl From<String> for StateId {
    fn from(value: String) -> Self {
        StateId(value)
    }
}

impl AsRef<str> for StateId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// `None` labels are epsilon moves
pub type NfaTransitions<S> = BTreeMap<S, BTreeMap<Option<Symbol>, BTreeSet<S>>>;
pub type DfaTransitions<S> = BTreeMap<S, BTreeMap<Symbol, S>>;

/// Nondeterministic automaton. There is no state list: the universe is
/// whatever the transitions, start and accept sets mention.
///
/// `states` is only filled in by [`crate::nfa_projection`], which passes the
/// DFA's explicit list through so it survives a round trip. Nothing in this
/// crate reads it to decide which states exist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Nfa<S = StateId> {
    pub alphabet: BTreeSet<Symbol>,
    pub transitions: NfaTransitions<S>,
    pub start: S,
    pub accept: BTreeSet<S>,
    pub states: Option<Vec<S>>,
}

impl<S: Ord + Clone> Nfa<S> {
    pub fn new(alphabet: BTreeSet<Symbol>, start: S) -> Nfa<S> {
        Nfa {
            alphabet,
            transitions: BTreeMap::new(),
            start,
            accept: BTreeSet::new(),
            states: None,
        }
    }

    pub fn add_transition(&mut self, from: S, label: Option<Symbol>, to: S) {
        self.transitions
            .entry(from)
            .or_default()
            .entry(label)
            .or_default()
            .insert(to);
    }

    pub fn add_accept(&mut self, state: S) {
        self.accept.insert(state);
    }

    /// Every state mentioned as a source, target, start or accept state.
    pub fn state_universe(&self) -> BTreeSet<S> {
        let mut universe: BTreeSet<S> = BTreeSet::new();
        universe.insert(self.start.clone());
        universe.extend(self.accept.iter().cloned());
        for (from, row) in &self.transitions {
            universe.insert(from.clone());
            for targets in row.values() {
                universe.extend(targets.iter().cloned());
            }
        }
        universe
    }

    pub fn has_epsilon_transitions(&self) -> bool {
        self.transitions
            .values()
            .any(|row| row.get(&None).is_some_and(|targets| !targets.is_empty()))
    }

    pub fn epsilon_closure<I>(&self, states: I) -> BTreeSet<S>
    where
        I: IntoIterator<Item = S>,
    {
        epsilon_closure(&self.transitions, states)
    }

    pub fn accepts(&self, word: &[Symbol]) -> bool {
        let mut current = self.epsilon_closure([self.start.clone()]);
        for symbol in word {
            let next = move_on(&self.transitions, &current, symbol);
            current = self.epsilon_closure(next);
            if current.is_empty() {
                return false;
            }
        }

        current.iter().any(|state| self.accept.contains(state))
    }
}

/// Deterministic automaton with an explicit state list.
///
/// `accept` is a sequence rather than a set so the compatibility accept
/// policy can reproduce repeated entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dfa<S = StateId> {
    pub states: Vec<S>,
    pub alphabet: BTreeSet<Symbol>,
    pub transitions: DfaTransitions<S>,
    pub start: S,
    pub accept: Vec<S>,
}

impl<S: Ord + Clone> Dfa<S> {
    pub fn step(&self, state: &S, symbol: &Symbol) -> Option<&S> {
        self.transitions.get(state)?.get(symbol)
    }

    pub fn is_accepting(&self, state: &S) -> bool {
        self.accept.contains(state)
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.values().map(|row| row.len()).sum()
    }

    pub fn accepts(&self, word: &[Symbol]) -> bool {
        let mut state = &self.start;
        for symbol in word {
            match self.step(state, symbol) {
                Some(next) => state = next,
                None => return false,
            }
        }

        self.is_accepting(state)
    }

    /// Relabels every state, keeping the structure.
    pub fn map_states<T, F>(&self, mut f: F) -> Dfa<T>
    where
        T: Ord + Clone,
        F: FnMut(&S) -> T,
    {
        let transitions: DfaTransitions<T> = self
            .transitions
            .iter()
            .map(|(from, row)| {
                let row: BTreeMap<Symbol, T> = row
                    .iter()
                    .map(|(symbol, to)| (symbol.clone(), f(to)))
                    .collect();
                (f(from), row)
            })
            .collect();

        Dfa {
            states: self.states.iter().map(&mut f).collect(),
            alphabet: self.alphabet.clone(),
            transitions,
            start: f(&self.start),
            accept: self.accept.iter().map(&mut f).collect(),
        }
    }
}
