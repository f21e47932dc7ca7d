// Loosely typed request/response shapes, as they travel over the wire, and the
// validation that turns them into the typed model. Every field is optional here
// so a missing one is reported as a malformed automaton naming that field,
// instead of a generic decoding error.

use std::collections::{BTreeMap, BTreeSet};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::composite::CompositeState;
use crate::error::AutomatonError;
use crate::model::{Dfa, Nfa, StateId, Symbol};
use crate::options::Validation;

// the empty key in an NFA row is an epsilon move
const EPSILON: &str = "";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNfa {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub states: Option<Vec<String>>,
    pub alphabet: Option<Vec<String>>,
    pub transitions: Option<BTreeMap<String, BTreeMap<String, Vec<String>>>>,
    #[serde(alias = "start")]
    pub start_state: Option<String>,
    #[serde(alias = "accept")]
    pub accept_states: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDfa {
    pub states: Option<Vec<String>>,
    pub alphabet: Option<Vec<String>>,
    pub transitions: Option<BTreeMap<String, BTreeMap<String, String>>>,
    #[serde(alias = "start")]
    pub start_state: Option<String>,
    #[serde(alias = "accept")]
    pub accept_states: Option<Vec<String>>,
}

/// Request body: `{"nfa": …}` asks for a DFA, `{"dfa": …}` for an NFA.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nfa: Option<RawNfa>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dfa: Option<RawDfa>,
}

impl ConvertRequest {
    pub fn into_nfa(self) -> Result<RawNfa, AutomatonError> {
        self.nfa.ok_or_else(|| AutomatonError::missing_field("nfa"))
    }

    pub fn into_dfa(self) -> Result<RawDfa, AutomatonError> {
        self.dfa.ok_or_else(|| AutomatonError::missing_field("dfa"))
    }
}

fn required<T>(field: Option<T>, name: &str) -> Result<T, AutomatonError> {
    field.ok_or_else(|| AutomatonError::missing_field(name))
}

fn parse_alphabet(alphabet: Vec<String>) -> Result<BTreeSet<Symbol>, AutomatonError> {
    alphabet.into_iter().map(Symbol::new).collect()
}

fn declared_symbol(
    alphabet: &BTreeSet<Symbol>,
    state: &str,
    symbol: String,
) -> Result<Symbol, AutomatonError> {
    let unknown = || AutomatonError::UnknownSymbolReference {
        state: state.to_string(),
        symbol: symbol.clone(),
    };

    let symbol = Symbol::new(symbol.clone()).map_err(|_| unknown())?;
    if alphabet.contains(&symbol) {
        Ok(symbol)
    } else {
        Err(unknown())
    }
}

fn check_declared<'a, I>(declared: &[StateId], referenced: I) -> Result<(), AutomatonError>
where
    I: IntoIterator<Item = &'a StateId>,
{
    let declared: BTreeSet<&StateId> = declared.iter().collect();
    match referenced.into_iter().find(|state| !declared.contains(state)) {
        Some(state) => Err(AutomatonError::InvalidStateReference {
            state: state.to_string(),
        }),
        None => Ok(()),
    }
}

impl RawNfa {
    /// Validates the whole structure. States never need declaring unless
    /// `validation` is strict and the NFA carries a `states` list.
    pub fn into_nfa(self, validation: Validation) -> Result<Nfa, AutomatonError> {
        let alphabet = parse_alphabet(required(self.alphabet, "alphabet")?)?;
        let raw_transitions = required(self.transitions, "transitions")?;
        let start = required(self.start_state, "start_state")?;
        let accept_states = required(self.accept_states, "accept_states")?;

        let mut nfa: Nfa = Nfa::new(alphabet, StateId::from(start));
        for (from, row) in raw_transitions {
            let mut typed_row = BTreeMap::new();
            for (label, targets) in row {
                let label = if label == EPSILON {
                    None
                } else {
                    Some(declared_symbol(&nfa.alphabet, &from, label)?)
                };

                let targets: BTreeSet<StateId> = targets.into_iter().map(StateId::from).collect();
                typed_row.insert(label, targets);
            }
            nfa.transitions.insert(StateId::from(from), typed_row);
        }

        nfa.accept = accept_states.into_iter().map(StateId::from).collect();
        nfa.states = self
            .states
            .map(|states| states.into_iter().map(StateId::from).collect());

        if validation == Validation::Strict {
            if let Some(declared) = &nfa.states {
                check_declared(declared, &nfa.state_universe())?;
            }
        }

        Ok(nfa)
    }
}

impl RawDfa {
    /// Validates the whole structure. A DFA row may not use the epsilon key.
    pub fn into_dfa(self, validation: Validation) -> Result<Dfa, AutomatonError> {
        let states: Vec<StateId> = required(self.states, "states")?
            .into_iter()
            .map(StateId::from)
            .collect();
        let alphabet = parse_alphabet(required(self.alphabet, "alphabet")?)?;
        let raw_transitions = required(self.transitions, "transitions")?;
        let start = StateId::from(required(self.start_state, "start_state")?);
        let accept: Vec<StateId> = required(self.accept_states, "accept_states")?
            .into_iter()
            .map(StateId::from)
            .collect();

        let mut transitions = BTreeMap::new();
        for (from, row) in raw_transitions {
            let mut typed_row = BTreeMap::new();
            for (symbol, to) in row {
                if symbol == EPSILON {
                    return Err(AutomatonError::MalformedAutomaton(format!(
                        "DFA state '{}' has an epsilon transition",
                        from
                    )));
                }

                let symbol = declared_symbol(&alphabet, &from, symbol)?;
                typed_row.insert(symbol, StateId::from(to));
            }
            transitions.insert(StateId::from(from), typed_row);
        }

        let dfa = Dfa {
            states,
            alphabet,
            transitions,
            start,
            accept,
        };

        if validation == Validation::Strict {
            let referenced = dfa
                .transitions
                .iter()
                .flat_map(|(from, row)| std::iter::once(from).chain(row.values()))
                .chain(std::iter::once(&dfa.start))
                .chain(dfa.accept.iter());
            check_declared(&dfa.states, referenced)?;
        }

        Ok(dfa)
    }
}

/// Names every composite by joining its members with `separator`.
///
/// Distinct composites can end up with the same name (a label containing the
/// separator, or an empty label next to the dead state). Such output merges
/// rows on the wire, so it is logged.
pub(crate) fn name_composites<S>(dfa: &Dfa<CompositeState<S>>, separator: &str) -> Dfa<String>
where
    S: AsRef<str> + Ord + Clone,
{
    if let Some(composite) = dfa.states.iter().find(|c| c.collides_with(separator)) {
        warn!(
            "state '{}' has a label that is empty or contains the separator '{}', composite names may collide",
            composite.canonical_id(separator),
            separator
        );
    }

    let named = dfa.map_states(|composite| composite.canonical_id(separator));
    if let Some(name) = shared_name(&named.states) {
        warn!(
            "several DFA states are named '{}', their transitions are merged in the output",
            name
        );
    }
    named
}

fn shared_name(names: &[String]) -> Option<&str> {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    names
        .iter()
        .map(String::as_str)
        .find(|name| !seen.insert(*name))
}

fn alphabet_strings(alphabet: &BTreeSet<Symbol>) -> Vec<String> {
    alphabet.iter().map(|s| s.to_string()).collect()
}

impl<S: AsRef<str>> From<&Dfa<S>> for RawDfa {
    fn from(dfa: &Dfa<S>) -> Self {
        let name = |state: &S| state.as_ref().to_string();

        let transitions: BTreeMap<String, BTreeMap<String, String>> = dfa
            .transitions
            .iter()
            .map(|(from, row)| {
                let row: BTreeMap<String, String> = row
                    .iter()
                    .map(|(symbol, to)| (symbol.to_string(), name(to)))
                    .collect();
                (name(from), row)
            })
            .collect();

        RawDfa {
            states: Some(dfa.states.iter().map(name).collect()),
            alphabet: Some(alphabet_strings(&dfa.alphabet)),
            transitions: Some(transitions),
            start_state: Some(name(&dfa.start)),
            accept_states: Some(dfa.accept.iter().map(name).collect()),
        }
    }
}

impl<S: AsRef<str>> From<&Nfa<S>> for RawNfa {
    fn from(nfa: &Nfa<S>) -> Self {
        let name = |state: &S| state.as_ref().to_string();

        let transitions: BTreeMap<String, BTreeMap<String, Vec<String>>> = nfa
            .transitions
            .iter()
            .map(|(from, row)| {
                let row: BTreeMap<String, Vec<String>> = row
                    .iter()
                    .map(|(label, targets)| {
                        let label = label
                            .as_ref()
                            .map_or_else(|| EPSILON.to_string(), |symbol| symbol.to_string());
                        (label, targets.iter().map(name).collect())
                    })
                    .collect();
                (name(from), row)
            })
            .collect();

        RawNfa {
            states: nfa
                .states
                .as_ref()
                .map(|states| states.iter().map(name).collect()),
            alphabet: Some(alphabet_strings(&nfa.alphabet)),
            transitions: Some(transitions),
            start_state: Some(name(&nfa.start)),
            accept_states: Some(nfa.accept.iter().map(name).collect()),
        }
    }
}
