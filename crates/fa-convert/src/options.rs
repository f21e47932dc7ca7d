use crate::composite::DEFAULT_SEPARATOR;
use crate::error::AutomatonError;

/// How accepting composites are listed in the produced DFA.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AcceptList {
    /// Each accepting composite once, in `states` order.
    #[default]
    Deduplicated,
    /// One entry per transition whose destination accepts, as the legacy
    /// converter emitted them. Repeats are expected, and an accepting start
    /// state only shows up if some transition leads back into it.
    PerTransition,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StateOrder {
    /// Whatever order the worklist discovered composites in.
    #[default]
    Discovery,
    /// Composites sorted by their member lists, for reproducible output.
    Sorted,
}

/// What to do with the empty composite reached when no NFA state can move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeadState {
    /// Keep it, giving a total DFA.
    #[default]
    Keep,
    /// Drop it and every transition into it, giving a partial DFA.
    Omit,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Validation {
    /// States never have to be declared.
    #[default]
    Lenient,
    /// Every referenced state must be in the declared `states` list.
    Strict,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConvertOptions {
    pub accept_list: AcceptList,
    pub state_order: StateOrder,
    pub dead_state: DeadState,
    pub validation: Validation,
    /// Joins member labels when a composite is rendered for the wire.
    pub separator: String,
    /// Abort subset construction once this many composites exist. The start
    /// composite counts, so `Some(0)` rejects every NFA.
    pub max_dfa_states: Option<usize>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            accept_list: AcceptList::default(),
            state_order: StateOrder::default(),
            dead_state: DeadState::default(),
            validation: Validation::default(),
            separator: DEFAULT_SEPARATOR.to_string(),
            max_dfa_states: None,
        }
    }
}

impl ConvertOptions {
    /// Reproduces the legacy converter's output: duplicated accept list,
    /// dead state kept, discovery order.
    pub fn compatible() -> ConvertOptions {
        ConvertOptions {
            accept_list: AcceptList::PerTransition,
            ..ConvertOptions::default()
        }
    }

    /// Checks the options that can make rendered output ambiguous.
    pub fn validate(&self) -> Result<(), AutomatonError> {
        if self.separator.is_empty() {
            return Err(AutomatonError::MalformedAutomaton(
                "the state name separator must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_accept_list(mut self, accept_list: AcceptList) -> Self {
        self.accept_list = accept_list;
        self
    }

    pub fn with_state_order(mut self, state_order: StateOrder) -> Self {
        self.state_order = state_order;
        self
    }

    pub fn with_dead_state(mut self, dead_state: DeadState) -> Self {
        self.dead_state = dead_state;
        self
    }

    pub fn with_validation(mut self, validation: Validation) -> Self {
        self.validation = validation;
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_max_dfa_states(mut self, limit: usize) -> Self {
        self.max_dfa_states = Some(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_separator_is_invalid() {
        assert_eq!(ConvertOptions::default().validate(), Ok(()));
        assert_eq!(ConvertOptions::default().with_separator("|").validate(), Ok(()));
        assert!(matches!(
            ConvertOptions::default().with_separator("").validate(),
            Err(AutomatonError::MalformedAutomaton(_))
        ));
    }
}
