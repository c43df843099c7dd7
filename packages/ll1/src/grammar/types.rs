use derive_more::Display;
use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::GrammarError,
    grammar::Grammar,
    language::{Symbol, EPSILON},
};

#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Terminal(pub Symbol);

#[derive(
    Debug, Display, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NonTerminal(pub Symbol);

impl NonTerminal {
    pub fn new(name: impl Into<String>) -> Self {
        NonTerminal(Symbol::new(name))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for NonTerminal {
    fn from(name: &str) -> Self {
        NonTerminal::new(name)
    }
}

#[derive(Debug, Display, Clone, PartialEq, Eq, Hash)]
pub enum ProductionSymbol {
    Terminal(Terminal),
    NonTerminal(NonTerminal),
}

/// A sequence of symbols. The empty word is the empty production.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Word<S>(pub Vec<S>);

impl<S> Word<S> {
    pub fn new(symbols: impl IntoIterator<Item = S>) -> Self {
        Word(symbols.into_iter().collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: std::fmt::Display> std::fmt::Display for Word<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            write!(f, "{EPSILON}")
        } else {
            write!(f, "{}", self.0.iter().join(" "))
        }
    }
}

/// A [`Grammar`] whose symbols have been classified once, up front.
#[derive(Debug, Clone)]
pub struct ResolvedGrammar {
    order: Vec<NonTerminal>,
    productions: IndexMap<NonTerminal, Vec<Word<ProductionSymbol>>>,
}

impl ResolvedGrammar {
    pub fn resolve(grammar: &Grammar) -> Result<Self, GrammarError> {
        if let Some(missing) = grammar
            .order()
            .iter()
            .find(|nt| grammar.productions_of(nt).is_none())
        {
            return Err(GrammarError::ProductionsSetNotFound(missing.clone()));
        }

        let mut productions = IndexMap::with_capacity(grammar.productions().len());

        for name in grammar.non_terminals() {
            let Some(rhs) = grammar.productions_of(name) else {
                continue;
            };

            let words = rhs
                .iter()
                .map(|production| {
                    let tokens = production.split_whitespace().collect::<Vec<_>>();
                    if tokens.is_empty() {
                        return Err(GrammarError::EmptyProduction {
                            non_terminal: name.to_owned(),
                        });
                    }

                    // λ is the unit of concatenation, so it only matters alone.
                    Ok(Word::new(tokens.into_iter().filter(|t| *t != EPSILON).map(
                        |token| {
                            if grammar.is_non_terminal(token) {
                                ProductionSymbol::NonTerminal(NonTerminal::new(token))
                            } else {
                                ProductionSymbol::Terminal(Terminal(Symbol::new(token)))
                            }
                        },
                    )))
                })
                .collect::<Result<Vec<_>, _>>()?;

            productions.insert(NonTerminal::new(name), words);
        }

        debug!(
            non_terminals = productions.len(),
            "resolved grammar symbols"
        );

        Ok(Self {
            order: grammar.order().iter().map(NonTerminal::new).collect(),
            productions,
        })
    }

    pub fn start_symbol(&self) -> Option<&NonTerminal> {
        self.order.first()
    }

    pub fn order(&self) -> &[NonTerminal] {
        &self.order
    }

    pub fn productions(&self) -> &IndexMap<NonTerminal, Vec<Word<ProductionSymbol>>> {
        &self.productions
    }

    pub fn productions_of(&self, non_terminal: &NonTerminal) -> &[Word<ProductionSymbol>] {
        self.productions
            .get(non_terminal)
            .map_or(&[][..], Vec::as_slice)
    }
}
