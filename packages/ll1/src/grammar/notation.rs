use std::str::FromStr;

use itertools::Itertools;
use winnow::{
    combinator::{alt, separated, terminated},
    error::{StrContext, StrContextValue},
    token::{take_till, take_until},
    ModalResult, Parser,
};

use crate::{error::GrammarError, grammar::Grammar};

impl Grammar {
    /// Reads rules written one per line as `A -> α | β` (`→` works too).
    /// Blank lines and lines starting with `#` are skipped, and a repeated
    /// left-hand side adds to the alternatives it already has.
    pub fn from_notation(text: &str) -> Result<Self, GrammarError> {
        Self::from_productions(&text.lines().collect::<Vec<_>>())
    }

    pub fn from_productions(rules: &[impl AsRef<str>]) -> Result<Self, GrammarError> {
        let mut grammar = Grammar::new();

        for (index, rule) in rules.iter().enumerate() {
            let line = rule.as_ref();
            let rule = line.trim();
            if rule.is_empty() || rule.starts_with('#') {
                continue;
            }
            let indent = line.len() - line.trim_start().len();

            let (non_terminal, productions) =
                rule_definition
                    .parse(rule)
                    .map_err(|error| GrammarError::InvalidNotation {
                        line: index + 1,
                        column: indent + error.offset() + 1,
                        message: error.inner().to_string(),
                    })?;

            grammar.add_production_group(&non_terminal, productions);
        }

        Ok(grammar)
    }
}

impl FromStr for Grammar {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Grammar::from_notation(s)
    }
}

fn rule_definition(input: &mut &str) -> ModalResult<(String, Vec<String>)> {
    (left_hand_side, alternatives).parse_next(input)
}

fn left_hand_side(input: &mut &str) -> ModalResult<String> {
    alt((
        terminated(take_until(1.., "->"), "->"),
        terminated(take_until(1.., "→"), "→"),
    ))
    .map(str::trim)
    .verify(|name: &str| !name.is_empty() && !name.contains(char::is_whitespace))
    .map(str::to_owned)
    .context(StrContext::Label("non-terminal"))
    .context(StrContext::Expected(StrContextValue::StringLiteral("->")))
    .parse_next(input)
}

fn alternatives(input: &mut &str) -> ModalResult<Vec<String>> {
    separated(1.., production, '|').parse_next(input)
}

fn production(input: &mut &str) -> ModalResult<String> {
    take_till(1.., '|')
        .map(|production: &str| production.split_whitespace().join(" "))
        .verify(|production: &String| !production.is_empty())
        .context(StrContext::Label("production"))
        .parse_next(input)
}
