use std::collections::BTreeSet;

use bit_set::BitSet;

use crate::composite::CompositeState;
use crate::model::{NfaTransitions, Symbol};

// label-keyed maps are awkward to walk repeatedly, so compile them down to indices.
// states are numbered in sorted label order, which makes bit set iteration order
// the canonical member order of a composite
#[derive(Debug, Clone)]
pub(crate) struct FaNode {
    // (symbol index or None for epsilon, target state index)
    pub(crate) transitions: Vec<(Option<usize>, usize)>,
}

#[derive(Debug)]
pub(crate) struct FaTable<'a, S> {
    states: Vec<&'a S>,
    symbols: Vec<&'a Symbol>,
    nodes: Vec<FaNode>,
}

impl<'a, S: Ord + Clone> FaTable<'a, S> {
    // `extra_states` covers states that may never appear in a transition (start, accept,
    // closure seeds). Symbols outside `alphabet` are dropped, validation rejects them
    // before we get here
    pub(crate) fn new<I>(
        transitions: &'a NfaTransitions<S>,
        alphabet: &'a BTreeSet<Symbol>,
        extra_states: I,
    ) -> FaTable<'a, S>
    where
        I: IntoIterator<Item = &'a S>,
    {
        let mut universe: BTreeSet<&'a S> = extra_states.into_iter().collect();
        for (from, row) in transitions {
            universe.insert(from);
            for targets in row.values() {
                universe.extend(targets.iter());
            }
        }

        let states: Vec<&'a S> = universe.into_iter().collect();
        let symbols: Vec<&'a Symbol> = alphabet.iter().collect();

        let mut nodes: Vec<FaNode> = Vec::with_capacity(states.len());
        nodes.resize(states.len(), FaNode { transitions: Vec::new() });

        for (from, row) in transitions {
            let from = Self::position(&states, from);
            for (label, targets) in row {
                let label = match label {
                    None => None,
                    Some(symbol) => match symbols.binary_search_by(|probe| (*probe).cmp(symbol)) {
                        Ok(i) => Some(i),
                        Err(_) => continue,
                    },
                };

                for to in targets {
                    let to = Self::position(&states, to);
                    nodes[from].transitions.push((label, to));
                }
            }
        }

        FaTable {
            states,
            symbols,
            nodes,
        }
    }

    fn position(states: &[&'a S], state: &S) -> usize {
        states
            .binary_search_by(|probe| (*probe).cmp(state))
            .expect("every state was added to the universe before numbering")
    }

    pub(crate) fn state_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn symbols(&self) -> &[&'a Symbol] {
        &self.symbols
    }

    pub(crate) fn set_of<'b, I>(&self, states: I) -> BitSet
    where
        I: IntoIterator<Item = &'b S>,
        S: 'b,
    {
        let mut set = BitSet::with_capacity(self.state_count());
        for state in states {
            set.insert(Self::position(&self.states, state));
        }
        set
    }

    // depth-first with an explicit stack; `set` is both the seed and the visited set
    pub(crate) fn epsilon_closure(&self, set: &mut BitSet) {
        let mut stack: Vec<usize> = set.iter().collect();

        while let Some(i) = stack.pop() {
            for (label, next) in &self.nodes[i].transitions {
                if label.is_none() && set.insert(*next) {
                    stack.push(*next);
                }
            }
        }
    }

    pub(crate) fn delta(&self, set: &BitSet, symbol: usize) -> BitSet {
        let mut result = BitSet::with_capacity(self.state_count());

        for i in set.iter() {
            for (label, next) in &self.nodes[i].transitions {
                if *label == Some(symbol) {
                    result.insert(*next);
                }
            }
        }

        result
    }

    pub(crate) fn composite(&self, set: &BitSet) -> CompositeState<S> {
        CompositeState::from_sorted(set.iter().map(|i| self.states[i].clone()).collect())
    }
}
