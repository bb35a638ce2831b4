use std::{fmt::Display, str::FromStr};

use itertools::Itertools;

use crate::error::{SpecificationError, TermError};

/// One position of a [`Term`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Zero,
    One,
    /// "Don't care", matches both values
    Wildcard,
}

impl Symbol {
    /// Required value, `None` for a wildcard.
    pub const fn required(self) -> Option<bool> {
        match self {
            Symbol::Zero => Some(false),
            Symbol::One => Some(true),
            Symbol::Wildcard => None,
        }
    }

    pub const fn admits(self, bit: bool) -> bool {
        match self {
            Symbol::Zero => !bit,
            Symbol::One => bit,
            Symbol::Wildcard => true,
        }
    }
}

impl TryFrom<char> for Symbol {
    type Error = char;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '0' => Ok(Symbol::Zero),
            '1' => Ok(Symbol::One),
            'x' => Ok(Symbol::Wildcard),
            other => Err(other),
        }
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::Zero => f.write_str("0"),
            Symbol::One => f.write_str("1"),
            Symbol::Wildcard => f.write_str("x"),
        }
    }
}

/// Constraint pattern over `n` variables, e.g. `0x1` means `!X0 & X2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Term {
    symbols: Vec<Symbol>,
}

impl Term {
    pub fn new(symbols: Vec<Symbol>) -> Self {
        Self { symbols }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Column index and required value of every non-wildcard position, in column order.
    pub fn fixed_positions(&self) -> impl Iterator<Item = (usize, bool)> + '_ {
        self.symbols
            .iter()
            .enumerate()
            .filter_map(|(idx, symbol)| symbol.required().map(|bit| (idx, bit)))
    }

    pub fn is_wildcard_only(&self) -> bool {
        self.symbols.iter().all(|s| *s == Symbol::Wildcard)
    }

    /// Check the term against an assignment of the same length.
    pub fn matches(&self, assignment: &[bool]) -> Result<bool, TermError> {
        if assignment.len() != self.symbols.len() {
            return Err(TermError::LengthMismatch {
                term: self.to_string(),
                term_len: self.symbols.len(),
                assignment_len: assignment.len(),
            });
        }
        Ok(self.admits(assignment))
    }

    /// Unchecked form of [`Term::matches`], caller guarantees equal lengths.
    pub(crate) fn admits(&self, assignment: &[bool]) -> bool {
        debug_assert_eq!(self.symbols.len(), assignment.len());
        self.symbols
            .iter()
            .zip(assignment)
            .all(|(symbol, bit)| symbol.admits(*bit))
    }
}

impl FromStr for Term {
    type Err = SpecificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbols = s
            .chars()
            .enumerate()
            .map(|(position, ch)| {
                Symbol::try_from(ch)
                    .map_err(|symbol| SpecificationError::UnknownSymbol { symbol, position })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { symbols })
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.symbols.iter().join(""))
    }
}
