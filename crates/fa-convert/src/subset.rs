use std::collections::{BTreeMap, HashMap, VecDeque};
use std::iter;

use bit_set::BitSet;
use fa_convert_util::make_type_idx;
use log::{debug, trace};

use crate::composite::CompositeState;
use crate::error::AutomatonError;
use crate::model::{Dfa, DfaTransitions, Nfa};
use crate::options::{AcceptList, ConvertOptions, DeadState, StateOrder};
use crate::table::FaTable;

make_type_idx!(CompositeIdx);

// configuration -> id, plus the per-composite rows being filled in
struct Registry {
    subsets: HashMap<BitSet, CompositeIdx>,
    configurations: Vec<BitSet>,
    rows: Vec<BTreeMap<usize, CompositeIdx>>,
    limit: Option<usize>,
}

impl Registry {
    fn new(limit: Option<usize>) -> Registry {
        Registry {
            subsets: HashMap::new(),
            configurations: Vec::new(),
            rows: Vec::new(),
            limit,
        }
    }

    // returns the id and whether the configuration was new
    fn intern(&mut self, configuration: BitSet) -> Result<(CompositeIdx, bool), AutomatonError> {
        if let Some(id) = self.subsets.get(&configuration) {
            return Ok((*id, false));
        }

        if let Some(limit) = self.limit {
            if self.configurations.len() >= limit {
                return Err(AutomatonError::StateLimitExceeded { limit });
            }
        }

        let id = CompositeIdx::from_push(&mut self.configurations, configuration.clone());
        self.rows.push(BTreeMap::new());
        self.subsets.insert(configuration, id);
        Ok((id, true))
    }
}

/// Builds a DFA for the same language as `nfa` using subset construction.
///
/// Only composites reachable from the closure of the start state are
/// produced. There can be at most 2^n of them for an NFA with n states, and
/// each is expanded exactly once, so this always terminates; `max_dfa_states`
/// just lets callers give up earlier. The start composite counts toward that
/// limit, so a limit of 0 fails before anything is explored.
pub fn subset_construction<S: Ord + Clone>(
    nfa: &Nfa<S>,
    options: &ConvertOptions,
) -> Result<Dfa<CompositeState<S>>, AutomatonError> {
    let table = FaTable::new(
        &nfa.transitions,
        &nfa.alphabet,
        iter::once(&nfa.start).chain(nfa.accept.iter()),
    );
    let accepting_states: BitSet = table.set_of(nfa.accept.iter());

    let mut initial_configuration = table.set_of([&nfa.start]);
    table.epsilon_closure(&mut initial_configuration);

    let mut registry = Registry::new(options.max_dfa_states);
    let (start, _) = registry.intern(initial_configuration)?;

    // every time a transition lands in an accepting composite, for AcceptList::PerTransition
    let mut accept_hits: Vec<CompositeIdx> = Vec::new();

    let mut work_queue: VecDeque<CompositeIdx> = VecDeque::new();
    work_queue.push_back(start);

    while let Some(q) = work_queue.pop_front() {
        for symbol in 0..table.symbols().len() {
            let mut t = table.delta(&registry.configurations[q], symbol);
            if t.is_empty() && options.dead_state == DeadState::Omit {
                continue;
            }

            table.epsilon_closure(&mut t);
            let accepting = !t.is_disjoint(&accepting_states);

            let (next, is_new) = registry.intern(t)?;
            if is_new {
                trace!(
                    "composite #{} discovered from #{} on '{}'",
                    next.index(),
                    q.index(),
                    table.symbols()[symbol]
                );
                work_queue.push_back(next);
            }

            registry.rows[q].insert(symbol, next);
            if accepting {
                accept_hits.push(next);
            }
        }
    }

    let composites: Vec<CompositeState<S>> = registry
        .configurations
        .iter()
        .map(|configuration| table.composite(configuration))
        .collect();

    let transitions: DfaTransitions<CompositeState<S>> = composites
        .iter()
        .zip(&registry.rows)
        .map(|(from, row)| {
            let row: BTreeMap<_, _> = row
                .iter()
                .map(|(symbol, to)| (table.symbols()[*symbol].clone(), composites[*to].clone()))
                .collect();
            (from.clone(), row)
        })
        .collect();

    let mut states = composites.clone();
    if options.state_order == StateOrder::Sorted {
        states.sort();
    }

    let accept: Vec<CompositeState<S>> = match options.accept_list {
        AcceptList::Deduplicated => states
            .iter()
            .filter(|composite| composite.members().iter().any(|m| nfa.accept.contains(m)))
            .cloned()
            .collect(),
        AcceptList::PerTransition => accept_hits
            .iter()
            .map(|id| composites[*id].clone())
            .collect(),
    };

    let dfa = Dfa {
        states,
        alphabet: nfa.alphabet.clone(),
        transitions,
        start: composites[start].clone(),
        accept,
    };

    debug!(
        "subset construction: {} NFA states -> {} DFA states, {} transitions, {} accept entries",
        table.state_count(),
        dfa.states.len(),
        dfa.transition_count(),
        dfa.accept.len()
    );

    Ok(dfa)
}
