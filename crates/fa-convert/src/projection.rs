use std::collections::{BTreeMap, BTreeSet};

use crate::model::{Dfa, Nfa, NfaTransitions};

/// Reads a DFA as the NFA it already is: every target becomes a singleton
/// set and no epsilon moves are introduced.
///
/// The DFA's explicit `states` list is copied into [`Nfa::states`] untouched,
/// including states no transition mentions. Accept entries land in a set, so
/// repeated entries collapse.
pub fn nfa_projection<S: Ord + Clone>(dfa: &Dfa<S>) -> Nfa<S> {
    let transitions: NfaTransitions<S> = dfa
        .transitions
        .iter()
        .map(|(from, row)| {
            let row: BTreeMap<_, _> = row
                .iter()
                .map(|(symbol, to)| (Some(symbol.clone()), BTreeSet::from([to.clone()])))
                .collect();
            (from.clone(), row)
        })
        .collect();

    Nfa {
        alphabet: dfa.alphabet.clone(),
        transitions,
        start: dfa.start.clone(),
        accept: dfa.accept.iter().cloned().collect(),
        states: Some(dfa.states.clone()),
    }
}
