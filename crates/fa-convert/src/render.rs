// Human-facing views of an automaton: a Graphviz digraph and a plain-text
// transition table. Both are `Display` adapters, so `to_string()` or `{}` does
// the rendering.

use std::collections::BTreeSet;
use std::fmt::{self, Display};

use crate::model::{Dfa, Nfa, Symbol};

const START_NODE: &str = "__start__";
const EPSILON_LABEL: &str = "ε";
const NO_TARGET: &str = "-";

/// Graphviz rendering: an invisible node pointing at the start state,
/// accepting states drawn as double circles, one labelled edge per target.
pub struct Dot<'a, A> {
    automaton: &'a A,
    name: &'a str,
}

/// Transition table with one row per state and one column per symbol. The
/// start state is marked `->` and accepting states `*`.
pub struct Table<'a, A> {
    automaton: &'a A,
}

impl<S: AsRef<str> + Ord + Clone> Nfa<S> {
    pub fn dot<'a>(&'a self, name: &'a str) -> Dot<'a, Nfa<S>> {
        Dot {
            automaton: self,
            name,
        }
    }

    pub fn table(&self) -> Table<'_, Nfa<S>> {
        Table { automaton: self }
    }
}

impl<S: AsRef<str> + Ord + Clone> Dfa<S> {
    pub fn dot<'a>(&'a self, name: &'a str) -> Dot<'a, Dfa<S>> {
        Dot {
            automaton: self,
            name,
        }
    }

    pub fn table(&self) -> Table<'_, Dfa<S>> {
        Table { automaton: self }
    }
}

fn quoted(id: &str) -> String {
    format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\""))
}

fn write_header<'s, I>(f: &mut fmt::Formatter<'_>, name: &str, start: &str, accept: I) -> fmt::Result
where
    I: IntoIterator<Item = &'s str>,
{
    writeln!(f, "digraph {} {{", quoted(name))?;
    writeln!(f, "  rankdir=LR;")?;
    writeln!(f, "  node [shape=circle, fontsize=16, fontname=\"Arial\"];")?;
    writeln!(f, "  {} [shape=none, label=\"\"];", quoted(START_NODE))?;
    writeln!(f, "  {} -> {};", quoted(START_NODE), quoted(start))?;

    // the compatibility accept list may repeat states
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for state in accept {
        if seen.insert(state) {
            writeln!(f, "  {} [shape=doublecircle];", quoted(state))?;
        }
    }
    Ok(())
}

fn write_edge(f: &mut fmt::Formatter<'_>, from: &str, to: &str, label: &str) -> fmt::Result {
    writeln!(f, "  {} -> {} [label={}];", quoted(from), quoted(to), quoted(label))
}

impl<S: AsRef<str> + Ord + Clone> Display for Dot<'_, Nfa<S>> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nfa = self.automaton;
        write_header(
            f,
            self.name,
            nfa.start.as_ref(),
            nfa.accept.iter().map(|s| s.as_ref()),
        )?;

        for (from, row) in &nfa.transitions {
            for (label, targets) in row {
                let label = label.as_ref().map_or(EPSILON_LABEL, |symbol| symbol.as_str());
                for to in targets {
                    write_edge(f, from.as_ref(), to.as_ref(), label)?;
                }
            }
        }
        write!(f, "}}")
    }
}

impl<S: AsRef<str> + Ord + Clone> Display for Dot<'_, Dfa<S>> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dfa = self.automaton;
        write_header(
            f,
            self.name,
            dfa.start.as_ref(),
            dfa.accept.iter().map(|s| s.as_ref()),
        )?;

        for (from, row) in &dfa.transitions {
            for (symbol, to) in row {
                write_edge(f, from.as_ref(), to.as_ref(), symbol.as_str())?;
            }
        }
        write!(f, "}}")
    }
}

// the dead state's name is empty, which would leave a blank cell
fn cell(name: &str) -> String {
    if name.is_empty() {
        "\"\"".to_string()
    } else {
        name.to_string()
    }
}

fn row_label(name: &str, start: bool, accepting: bool) -> String {
    format!(
        "{}{}{}",
        if start { "->" } else { "" },
        cell(name),
        if accepting { "*" } else { "" }
    )
}

fn write_rows(f: &mut fmt::Formatter<'_>, rows: &[Vec<String>]) -> fmt::Result {
    let columns = rows.iter().map(|row| row.len()).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|i| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|text| text.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    for (n, row) in rows.iter().enumerate() {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(text, width)| format!("{:<width$}", text, width = width))
            .collect();
        if n > 0 {
            writeln!(f)?;
        }
        write!(f, "{}", line.join("  ").trim_end())?;
    }
    Ok(())
}

impl<S: AsRef<str> + Ord + Clone> Display for Table<'_, Dfa<S>> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dfa = self.automaton;

        let mut rows: Vec<Vec<String>> = Vec::with_capacity(dfa.states.len() + 1);
        rows.push(
            std::iter::once("State".to_string())
                .chain(dfa.alphabet.iter().map(|s| s.to_string()))
                .collect(),
        );

        for state in &dfa.states {
            let mut row = vec![row_label(
                state.as_ref(),
                *state == dfa.start,
                dfa.is_accepting(state),
            )];
            for symbol in &dfa.alphabet {
                row.push(
                    dfa.step(state, symbol)
                        .map_or_else(|| NO_TARGET.to_string(), |to| cell(to.as_ref())),
                );
            }
            rows.push(row);
        }

        write_rows(f, &rows)
    }
}

impl<S: AsRef<str> + Ord + Clone> Display for Table<'_, Nfa<S>> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nfa = self.automaton;

        let mut labels: Vec<Option<&Symbol>> = Vec::new();
        if nfa.has_epsilon_transitions() {
            labels.push(None);
        }
        labels.extend(nfa.alphabet.iter().map(Some));

        let states: Vec<S> = match &nfa.states {
            Some(states) => states.clone(),
            None => nfa.state_universe().into_iter().collect(),
        };

        let mut rows: Vec<Vec<String>> = Vec::with_capacity(states.len() + 1);
        rows.push(
            std::iter::once("State".to_string())
                .chain(
                    labels
                        .iter()
                        .map(|label| label.map_or(EPSILON_LABEL.to_string(), |s| s.to_string())),
                )
                .collect(),
        );

        for state in &states {
            let mut row = vec![row_label(
                state.as_ref(),
                *state == nfa.start,
                nfa.accept.contains(state),
            )];
            for label in &labels {
                let targets = nfa
                    .transitions
                    .get(state)
                    .and_then(|row| row.get(&label.cloned()))
                    .filter(|targets| !targets.is_empty());
                row.push(match targets {
                    Some(targets) => {
                        let names: Vec<String> = targets.iter().map(|t| cell(t.as_ref())).collect();
                        format!("{{{}}}", names.join(","))
                    }
                    None => NO_TARGET.to_string(),
                });
            }
            rows.push(row);
        }

        write_rows(f, &rows)
    }
}
