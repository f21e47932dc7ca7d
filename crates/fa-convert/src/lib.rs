mod closure;
mod composite;
mod error;
mod model;
mod options;
mod projection;
mod render;
mod subset;
mod table;
mod wire;

pub use closure::{epsilon_closure, move_on};
pub use composite::{CompositeState, DEFAULT_SEPARATOR};
pub use error::AutomatonError;
pub use model::{Dfa, DfaTransitions, Nfa, NfaTransitions, StateId, Symbol};
pub use options::{AcceptList, ConvertOptions, DeadState, StateOrder, Validation};
pub use projection::nfa_projection;
pub use render::{Dot, Table};
pub use subset::subset_construction;
pub use wire::{ConvertRequest, RawDfa, RawNfa};

/// Validates a wire NFA and runs subset construction, naming each composite by
/// its members joined with `options.separator`. Nothing runs on input that
/// fails validation.
pub fn nfa_to_dfa(nfa: RawNfa, options: &ConvertOptions) -> Result<Dfa<String>, AutomatonError> {
    options.validate()?;
    let nfa = nfa.into_nfa(options.validation)?;
    let dfa = subset_construction(&nfa, options)?;
    Ok(wire::name_composites(&dfa, &options.separator))
}

/// Validates a wire DFA and projects it to an NFA, keeping its `states` list.
pub fn dfa_to_nfa(dfa: RawDfa, options: &ConvertOptions) -> Result<Nfa, AutomatonError> {
    let dfa = dfa.into_dfa(options.validation)?;
    Ok(nfa_projection(&dfa))
}

/// [`nfa_to_dfa`], rendered back into the wire shape.
pub fn convert_nfa_to_dfa(nfa: RawNfa, options: &ConvertOptions) -> Result<RawDfa, AutomatonError> {
    nfa_to_dfa(nfa, options).map(|dfa| RawDfa::from(&dfa))
}

/// [`dfa_to_nfa`], rendered back into the wire shape.
pub fn convert_dfa_to_nfa(dfa: RawDfa, options: &ConvertOptions) -> Result<RawNfa, AutomatonError> {
    dfa_to_nfa(dfa, options).map(|nfa| RawNfa::from(&nfa))
}
