use std::fmt::{self, Display};

use crate::model::StateId;

pub const DEFAULT_SEPARATOR: &str = "_";

/// A DFA state standing for a set of NFA states.
///
/// Members are kept sorted and de-duplicated, so two set-equal composites are
/// equal (and hash equally) no matter which order their states were found in.
/// Identity is structural; the joined string form from [`Self::canonical_id`]
/// is only produced at the wire boundary.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompositeState<S = StateId>(Vec<S>);

impl<S: Ord> CompositeState<S> {
    // caller guarantees members are strictly increasing
    pub(crate) fn from_sorted(members: Vec<S>) -> CompositeState<S> {
        debug_assert!(members.windows(2).all(|w| w[0] < w[1]));
        CompositeState(members)
    }

    pub fn members(&self) -> &[S] {
        &self.0
    }

    pub fn contains(&self, state: &S) -> bool {
        self.0.binary_search(state).is_ok()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The empty composite is the dead state: no NFA state is alive.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Ord> FromIterator<S> for CompositeState<S> {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut members: Vec<S> = iter.into_iter().collect();
        members.sort();
        members.dedup();
        CompositeState(members)
    }
}

impl<S: AsRef<str>> CompositeState<S> {
    /// Sorted member labels joined by `separator`. Labels that themselves
    /// contain the separator can make distinct composites render identically;
    /// see [`Self::collides_with`].
    pub fn canonical_id(&self, separator: &str) -> String {
        self.0
            .iter()
            .map(|member| member.as_ref())
            .collect::<Vec<&str>>()
            .join(separator)
    }

    /// Whether this composite's name may be shared with a different composite.
    ///
    /// That happens when a member label contains `separator` (always true for
    /// an empty separator), and when a member label is empty, since `""` alone
    /// is also the name of the dead state.
    pub fn collides_with(&self, separator: &str) -> bool {
        self.0.iter().any(|member| {
            let member = member.as_ref();
            member.is_empty() || member.contains(separator)
        })
    }
}

impl<S: AsRef<str>> Display for CompositeState<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_id(DEFAULT_SEPARATOR))
    }
}
