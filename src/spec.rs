use serde::Deserialize;

use crate::{error::SpecificationError, term::Term};

/// Validated system specification: `function_count` terms over `variable_count` variables.
///
/// Terms are associated with function oracles by position, term `i` belongs to oracle `F{i+1}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawSpecification")]
pub struct Specification {
    variable_count: usize,
    function_count: usize,
    terms: Vec<Term>,
}

impl Specification {
    pub fn new(
        variable_count: usize,
        function_count: usize,
        terms: Vec<Term>,
    ) -> Result<Self, SpecificationError> {
        if variable_count == 0 {
            return Err(SpecificationError::NoVariables);
        }
        if function_count == 0 {
            return Err(SpecificationError::NoFunctions);
        }
        if terms.len() != function_count {
            return Err(SpecificationError::TermCount {
                expected: function_count,
                actual: terms.len(),
            });
        }
        if let Some((index, term)) = terms
            .iter()
            .enumerate()
            .find(|(_, term)| term.len() != variable_count)
        {
            return Err(SpecificationError::TermLength {
                index,
                expected: variable_count,
                actual: term.len(),
            });
        }

        Ok(Self {
            variable_count,
            function_count,
            terms,
        })
    }

    /// Parse terms written in `0/1/x` notation.
    pub fn parse<S: AsRef<str>>(
        variable_count: usize,
        function_count: usize,
        terms: &[S],
    ) -> Result<Self, SpecificationError> {
        let terms = terms
            .iter()
            .map(|t| t.as_ref().parse())
            .collect::<Result<Vec<Term>, _>>()?;
        Self::new(variable_count, function_count, terms)
    }

    /// One function per term.
    pub fn from_terms<S: AsRef<str>>(
        variable_count: usize,
        terms: &[S],
    ) -> Result<Self, SpecificationError> {
        Self::parse(variable_count, terms.len(), terms)
    }

    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    pub fn function_count(&self) -> usize {
        self.function_count
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// `F1 = !X0 X2`, `F2 = !X0 !X1`, satisfied by `001`.
    pub fn consistent_example() -> Self {
        Self::reference(3, &["0x1", "00x"])
    }

    /// Five functions over five variables, satisfied only by `00111`.
    pub fn consistent_example_wide() -> Self {
        Self::reference(5, &["0x1x1", "x01x1", "00xxx", "0x11x", "xx1x1"])
    }

    /// `F1 = X0 !X2`, `F2 = !X0 !X1`, contradict on `X0`.
    pub fn inconsistent_example() -> Self {
        Self::reference(3, &["1x0", "00x"])
    }

    /// `F1 = !X0 X1 X2`, `F2 = !X0 !X1`, contradict on `X1`.
    pub fn inconsistent_example_full() -> Self {
        Self::reference(3, &["011", "00x"])
    }

    fn reference(variable_count: usize, terms: &[&str]) -> Self {
        let terms: Vec<Term> = terms
            .iter()
            .map(|t| Term::new(t.chars().filter_map(|c| c.try_into().ok()).collect()))
            .collect();
        Self {
            variable_count,
            function_count: terms.len(),
            terms,
        }
    }
}

/// Field names follow the dictionaries the reference systems are written as.
#[derive(Deserialize)]
struct RawSpecification {
    terms: Vec<String>,
    var_count: usize,
    function_count: Option<usize>,
}

impl TryFrom<RawSpecification> for Specification {
    type Error = SpecificationError;

    fn try_from(raw: RawSpecification) -> Result<Self, Self::Error> {
        let function_count = raw.function_count.unwrap_or(raw.terms.len());
        Self::parse(raw.var_count, function_count, &raw.terms)
    }
}
