use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AutomatonError {
    #[error("Malformed automaton: {0}")]
    MalformedAutomaton(String),
    #[error("Transition from state '{state}' uses symbol '{symbol}', which is not in the alphabet")]
    UnknownSymbolReference { state: String, symbol: String },
    #[error("State '{state}' is referenced but not declared in the states list")]
    InvalidStateReference { state: String },
    #[error("Subset construction exceeded the limit of {limit} DFA states")]
    StateLimitExceeded { limit: usize },
}

impl AutomatonError {
    pub(crate) fn missing_field(field: &str) -> AutomatonError {
        AutomatonError::MalformedAutomaton(format!("missing required field '{}'", field))
    }
}
