use std::collections::{BTreeMap, BTreeSet};

use fa_convert::{
    epsilon_closure, nfa_projection, subset_construction, CompositeState, ConvertOptions,
    DeadState, Dfa, Nfa, StateId, StateOrder, Symbol,
};
use quickcheck_macros::quickcheck;

fn sym(s: &str) -> Symbol {
    Symbol::new(s).expect("test symbols are non-empty")
}

// one symbol per character
fn word(s: &str) -> Vec<Symbol> {
    s.chars().map(|c| sym(&c.to_string())).collect()
}

// an empty label is an epsilon move
fn build_nfa(alphabet: &[&str], edges: &[(&str, &str, &str)], start: &str, accept: &[&str]) -> Nfa {
    let mut nfa: Nfa = Nfa::new(alphabet.iter().map(|s| sym(s)).collect(), start.into());
    for (from, label, to) in edges {
        let label = if label.is_empty() { None } else { Some(sym(label)) };
        nfa.add_transition((*from).into(), label, (*to).into());
    }
    for state in accept {
        nfa.add_accept((*state).into());
    }
    nfa
}

fn compile(nfa: &Nfa, options: &ConvertOptions) -> Dfa<CompositeState> {
    subset_construction(nfa, options).expect("nfa should convert")
}

fn name(composite: &CompositeState) -> String {
    composite.canonical_id("_")
}

fn composite(members: &[&str]) -> CompositeState {
    members.iter().map(|m| StateId::from(*m)).collect()
}

fn all_words(alphabet: &[Symbol], max_len: usize) -> Vec<Vec<Symbol>> {
    let mut words: Vec<Vec<Symbol>> = vec![vec![]];
    let mut frontier: Vec<Vec<Symbol>> = vec![vec![]];
    for _ in 0..max_len {
        frontier = frontier
            .iter()
            .flat_map(|w| {
                alphabet.iter().map(move |s| {
                    let mut w = w.clone();
                    w.push(s.clone());
                    w
                })
            })
            .collect();
        words.extend(frontier.iter().cloned());
    }
    words
}

fn run_vectors(tests: &[(&str, bool)], dfa: &Dfa<CompositeState>, description: &str) {
    for (test, expected_result) in tests {
        let result = dfa.accepts(&word(test));
        assert_eq!(
            result, *expected_result,
            "'{}' failed on input '{}', expect match: {}, actual match: {}",
            description, test, expected_result, result
        );
    }
}

#[test]
fn self_loop_with_fork() {
    let nfa = build_nfa(&["a"], &[("S0", "a", "S0"), ("S0", "a", "S1")], "S0", &["S1"]);
    let dfa = compile(&nfa, &ConvertOptions::default());

    let states: Vec<String> = dfa.states.iter().map(name).collect();
    assert_eq!(states, vec!["S0", "S0_S1"]);
    assert_eq!(name(&dfa.start), "S0");

    let s0 = composite(&["S0"]);
    let s0_s1 = composite(&["S1", "S0"]);
    assert_eq!(dfa.step(&s0, &sym("a")), Some(&s0_s1));
    assert_eq!(dfa.step(&s0_s1, &sym("a")), Some(&s0_s1));
    assert!(dfa.accept.contains(&s0_s1));
    assert!(!dfa.is_accepting(&s0));
}

#[test]
fn epsilon_from_start() {
    let nfa = build_nfa(&["a"], &[("S0", "", "S1"), ("S1", "a", "S2")], "S0", &["S2"]);

    assert_eq!(
        nfa.epsilon_closure([StateId::from("S0")]),
        BTreeSet::from([StateId::from("S0"), StateId::from("S1")])
    );

    let dfa = compile(&nfa, &ConvertOptions::default());
    assert_eq!(name(&dfa.start), "S0_S1");

    let next = dfa.step(&dfa.start, &sym("a")).expect("start moves on a");
    assert!(next.contains(&StateId::from("S2")));
    assert!(dfa.is_accepting(next));
    assert!(dfa.accepts(&word("a")));
    assert!(!dfa.accepts(&word("")));
    assert!(!dfa.accepts(&word("aa")));
}

#[test]
fn empty_alphabet_single_state() {
    let nfa = build_nfa(&[], &[("q0", "", "q1")], "q0", &["q1"]);
    let dfa = compile(&nfa, &ConvertOptions::default());

    assert_eq!(dfa.states.len(), 1);
    assert_eq!(dfa.transition_count(), 0);
    assert_eq!(name(&dfa.start), "q0_q1");
    assert!(dfa.accepts(&[]));
}

#[test]
fn stuck_start() {
    let nfa = build_nfa(&["a", "b"], &[], "q0", &["q1"]);

    let partial = compile(&nfa, &ConvertOptions::default().with_dead_state(DeadState::Omit));
    assert_eq!(partial.states.len(), 1);
    assert_eq!(partial.transition_count(), 0);
    assert!(partial.accept.is_empty());

    // the dead state absorbs every symbol
    let total = compile(&nfa, &ConvertOptions::default());
    let states: Vec<String> = total.states.iter().map(name).collect();
    assert_eq!(states, vec!["q0", ""]);
    assert_eq!(total.transition_count(), 4);
    assert!(total.accept.is_empty());
}

#[test]
fn unreachable_states_absent() {
    let nfa = build_nfa(
        &["a"],
        &[("q0", "a", "q1"), ("q9", "a", "q1"), ("q9", "", "q0")],
        "q0",
        &["q1", "q8"],
    );
    let dfa = compile(&nfa, &ConvertOptions::default());

    for state in &dfa.states {
        assert!(!state.contains(&StateId::from("q9")));
        assert!(!state.contains(&StateId::from("q8")));
    }
}

#[test]
fn total_dfa_is_deterministic() {
    let nfa = build_nfa(
        &["0", "1"],
        &[
            ("s", "0", "s"),
            ("s", "1", "s"),
            ("s", "1", "t"),
            ("t", "0", "u"),
            ("t", "1", "u"),
        ],
        "s",
        &["u"],
    );
    let dfa = compile(&nfa, &ConvertOptions::default());

    // second to last symbol is a 1
    for state in &dfa.states {
        let row = dfa.transitions.get(state).expect("every composite has a row");
        assert_eq!(row.len(), dfa.alphabet.len());
    }
    assert!(dfa.states.len() <= 1 << 3);

    run_vectors(
        &[("10", true), ("11", true), ("01", false), ("0110", true), ("1", false), ("", false)],
        &dfa,
        "second to last is 1",
    );
}

#[test]
fn sorted_state_order() {
    let nfa = build_nfa(
        &["a", "b"],
        &[("z", "a", "y"), ("y", "b", "x"), ("x", "a", "z")],
        "z",
        &["x"],
    );

    let dfa = compile(&nfa, &ConvertOptions::default().with_state_order(StateOrder::Sorted));
    let states: Vec<String> = dfa.states.iter().map(name).collect();
    assert_eq!(states, vec!["", "x", "y", "z"]);
    assert_eq!(name(&dfa.start), "z");

    let accept: Vec<String> = dfa.accept.iter().map(name).collect();
    assert_eq!(accept, vec!["x"]);
}

#[test]
fn alternation_under_star() {
    // a(b|c)* with silent hops in and out of the loop
    let nfa = build_nfa(
        &["a", "b", "c"],
        &[
            ("q0", "a", "q1"),
            ("q1", "", "q2"),
            ("q2", "b", "q3"),
            ("q2", "c", "q3"),
            ("q3", "", "q2"),
        ],
        "q0",
        &["q2"],
    );
    let dfa = compile(&nfa, &ConvertOptions::default());

    let test_vectors = vec![
        ("a", true),
        ("b", false),
        ("x", false),
        ("ab", true),
        ("ac", true),
        ("abcbc", true),
        ("acbcb", true),
        ("bcbc", false),
        ("abbbbbbbbbb", true),
    ];

    run_vectors(&test_vectors, &dfa, "a(b|c)*");
}

#[test]
fn projection_keeps_structure() {
    let mut transitions: BTreeMap<StateId, BTreeMap<Symbol, StateId>> = BTreeMap::new();
    transitions.entry("even".into()).or_default().insert(sym("a"), "odd".into());
    transitions.entry("even".into()).or_default().insert(sym("b"), "even".into());
    transitions.entry("odd".into()).or_default().insert(sym("a"), "even".into());
    transitions.entry("odd".into()).or_default().insert(sym("b"), "odd".into());

    let dfa: Dfa = Dfa {
        states: vec!["even".into(), "odd".into()],
        alphabet: [sym("a"), sym("b")].into(),
        transitions,
        start: "even".into(),
        accept: vec!["even".into()],
    };

    let nfa = nfa_projection(&dfa);
    assert_eq!(nfa.alphabet, dfa.alphabet);
    assert_eq!(nfa.start, dfa.start);
    assert_eq!(nfa.states.as_ref(), Some(&dfa.states));
    for (from, row) in &dfa.transitions {
        for (symbol, to) in row {
            let targets = &nfa.transitions[from][&Some(symbol.clone())];
            assert_eq!(targets, &BTreeSet::from([to.clone()]));
        }
    }

    // back again: same language, composite names instead of the originals
    let back = compile(&nfa, &ConvertOptions::default());
    let alphabet: Vec<Symbol> = dfa.alphabet.iter().cloned().collect();
    for w in all_words(&alphabet, 6) {
        assert_eq!(dfa.accepts(&w), back.accepts(&w), "disagree on {:?}", w);
    }
    assert_eq!(back.states.len(), 2);
}

// small random NFAs: labels 0 = epsilon, 1 = a, 2 = b; states q0..q3
fn random_nfa(edges: &[(u8, u8, u8)], accept: &[u8]) -> Nfa {
    let labels = ["", "a", "b"];
    let mut nfa: Nfa = Nfa::new([sym("a"), sym("b")].into(), "q0".into());
    for (from, label, to) in edges {
        let label = labels[(*label % 3) as usize];
        let label = if label.is_empty() { None } else { Some(sym(label)) };
        nfa.add_transition(
            format!("q{}", from % 4).into(),
            label,
            format!("q{}", to % 4).into(),
        );
    }
    for state in accept {
        nfa.add_accept(format!("q{}", state % 4).into());
    }
    nfa
}

#[quickcheck]
fn subset_construction_preserves_language(edges: Vec<(u8, u8, u8)>, accept: Vec<u8>) -> bool {
    let nfa = random_nfa(&edges, &accept);
    let dfa = compile(&nfa, &ConvertOptions::default());

    let alphabet: Vec<Symbol> = nfa.alphabet.iter().cloned().collect();
    all_words(&alphabet, 4)
        .iter()
        .all(|w| nfa.accepts(w) == dfa.accepts(w))
}

#[quickcheck]
fn composites_bounded_by_powerset(edges: Vec<(u8, u8, u8)>, accept: Vec<u8>) -> bool {
    let nfa = random_nfa(&edges, &accept);
    let dfa = compile(&nfa, &ConvertOptions::default());

    let n = nfa.state_universe().len();
    let distinct: BTreeSet<&CompositeState> = dfa.states.iter().collect();
    distinct.len() == dfa.states.len() && dfa.states.len() <= 1 << n
}

#[quickcheck]
fn start_is_closure_of_nfa_start(edges: Vec<(u8, u8, u8)>) -> bool {
    let nfa = random_nfa(&edges, &[]);
    let dfa = compile(&nfa, &ConvertOptions::default());

    let closure = epsilon_closure(&nfa.transitions, [nfa.start.clone()]);
    dfa.start == closure.into_iter().collect::<CompositeState>()
}

// random partial DFAs over d0..d3 and {a, b}; later edges overwrite earlier ones
fn random_dfa(edges: &[(u8, u8, u8)], accept: &[u8]) -> Dfa {
    let symbols = [sym("a"), sym("b")];
    let mut transitions: BTreeMap<StateId, BTreeMap<Symbol, StateId>> = BTreeMap::new();
    for (from, symbol, to) in edges {
        transitions
            .entry(format!("d{}", from % 4).into())
            .or_default()
            .insert(symbols[(*symbol % 2) as usize].clone(), format!("d{}", to % 4).into());
    }

    Dfa {
        states: (0..4).map(|i| format!("d{}", i).into()).collect(),
        alphabet: symbols.iter().cloned().collect(),
        transitions,
        start: "d0".into(),
        accept: accept.iter().map(|i| format!("d{}", i % 4).into()).collect(),
    }
}

#[quickcheck]
fn projection_round_trip_preserves_language(edges: Vec<(u8, u8, u8)>, accept: Vec<u8>) -> bool {
    let dfa = random_dfa(&edges, &accept);
    let back = compile(&nfa_projection(&dfa), &ConvertOptions::default());

    let alphabet: Vec<Symbol> = dfa.alphabet.iter().cloned().collect();
    all_words(&alphabet, 5)
        .iter()
        .all(|w| dfa.accepts(w) == back.accepts(w))
}
