use std::hash::Hash;

use derive_more::Display;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Marker of the empty production.
pub const EPSILON: &str = "λ";

/// Marker following the derivation of the start symbol.
pub const END_OF_INPUT: &str = "$";

#[derive(
    Debug, Display, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(s: impl Into<String>) -> Self {
        let s = s.into();
        debug_assert!(!s.is_empty());
        Symbol(s)
    }

    pub fn epsilon() -> Self {
        Symbol(EPSILON.to_owned())
    }

    pub fn end_of_input() -> Self {
        Symbol(END_OF_INPUT.to_owned())
    }

    pub fn is_epsilon(&self) -> bool {
        self.0 == EPSILON
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Symbol::new(s)
    }
}

/// Every element of `a`, followed by the elements of `b` that `a` lacks.
pub fn union<T: Clone + Eq + Hash>(a: &IndexSet<T>, b: &IndexSet<T>) -> IndexSet<T> {
    a.union(b).cloned().collect()
}

pub fn remove_element<T: Clone + Eq + Hash>(set: &IndexSet<T>, value: &T) -> IndexSet<T> {
    set.iter().filter(|v| *v != value).cloned().collect()
}

/// Whether `word` is one of the whitespace separated tokens of `production`.
pub fn contains_word(production: &str, word: &str) -> bool {
    production.split_whitespace().any(|token| token == word)
}

#[cfg(test)]
mod tests {
    use indexmap::indexset;

    use super::*;

    #[test]
    fn union_keeps_first_seen_order() {
        let a = indexset! {"b", "a"};
        let b = indexset! {"c", "a", "d"};

        let result = union(&a, &b);

        assert_eq!(result.into_iter().collect::<Vec<_>>(), ["b", "a", "c", "d"]);
    }

    #[test]
    fn remove_element_drops_only_the_value() {
        let set = indexset! {Symbol::from("+"), Symbol::epsilon(), Symbol::from("id")};

        let result = remove_element(&set, &Symbol::epsilon());

        assert_eq!(result, indexset! {Symbol::from("id"), Symbol::from("+")});
    }

    #[test]
    fn contains_word_matches_whole_tokens() {
        assert!(contains_word("T E'", "T"));
        assert!(contains_word("+ T E'", "E'"));
        assert!(!contains_word("T E'", "E"));
        assert!(!contains_word("AB c", "A"));
    }
}
