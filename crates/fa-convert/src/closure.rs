use std::collections::BTreeSet;

use crate::model::{NfaTransitions, Symbol};

/// Smallest superset of `states` that is closed under epsilon moves.
///
/// A state with no row in `transitions`, or a row without an epsilon entry,
/// simply contributes itself. Only epsilon entries are looked at, so a call
/// costs O(states + epsilon edges) on top of the map lookups.
pub fn epsilon_closure<S, I>(transitions: &NfaTransitions<S>, states: I) -> BTreeSet<S>
where
    S: Ord + Clone,
    I: IntoIterator<Item = S>,
{
    let mut visited: BTreeSet<S> = states.into_iter().collect();
    let mut stack: Vec<S> = visited.iter().cloned().collect();

    while let Some(state) = stack.pop() {
        if let Some(targets) = transitions.get(&state).and_then(|row| row.get(&None)) {
            for target in targets {
                if visited.insert(target.clone()) {
                    stack.push(target.clone());
                }
            }
        }
    }

    visited
}

/// Union of the `symbol` targets of every state in `states`, without closing
/// over epsilon.
pub fn move_on<S: Ord + Clone>(
    transitions: &NfaTransitions<S>,
    states: &BTreeSet<S>,
    symbol: &Symbol,
) -> BTreeSet<S> {
    let label = Some(symbol.clone());
    let mut result: BTreeSet<S> = BTreeSet::new();

    for state in states {
        if let Some(targets) = transitions.get(state).and_then(|row| row.get(&label)) {
            result.extend(targets.iter().cloned());
        }
    }

    result
}
