//! Portfolio weights and normalization.
//!
//! A [`WeightVector`] holds the raw weights exactly as the portfolio loader
//! produced them. [`WeightVector::normalize`] turns them into fractions that
//! sum to one, rejecting inputs that would make the evaluation meaningless.

use crate::domain::error::EvalError;

/// Controls which raw weights are accepted during normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeightPolicy {
    /// Accept negative weights as short positions.
    pub allow_short: bool,
}

/// One raw allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Holding {
    pub symbol: String,
    pub weight: f64,
}

/// Ordered symbol -> raw weight mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightVector {
    holdings: Vec<Holding>,
}

impl WeightVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(symbol, weight)` pairs. Fails on duplicate symbols.
    pub fn from_pairs<S: Into<String>>(
        pairs: impl IntoIterator<Item = (S, f64)>,
    ) -> Result<Self, EvalError> {
        let mut vector = Self::new();
        for (symbol, weight) in pairs {
            vector.push(symbol, weight)?;
        }
        Ok(vector)
    }

    pub fn push(&mut self, symbol: impl Into<String>, weight: f64) -> Result<(), EvalError> {
        let symbol = symbol.into();
        if self.holdings.iter().any(|h| h.symbol == symbol) {
            return Err(EvalError::invalid_weights(format!(
                "duplicate symbol {symbol}"
            )));
        }
        self.holdings.push(Holding { symbol, weight });
        Ok(())
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.holdings.iter().map(|h| h.symbol.as_str())
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    /// Divide each weight by the total.
    pub fn normalize(&self, policy: WeightPolicy) -> Result<NormalizedWeights, EvalError> {
        if self.holdings.is_empty() {
            return Err(EvalError::invalid_weights("portfolio has no holdings"));
        }

        for h in &self.holdings {
            if !h.weight.is_finite() {
                return Err(EvalError::invalid_weights(format!(
                    "weight for {} is not a finite number",
                    h.symbol
                )));
            }
            if h.weight < 0.0 && !policy.allow_short {
                return Err(EvalError::invalid_weights(format!(
                    "negative weight {} for {} (short positions are disabled)",
                    h.weight, h.symbol
                )));
            }
        }

        let total: f64 = self.holdings.iter().map(|h| h.weight).sum();
        if total == 0.0 || !total.is_finite() {
            return Err(EvalError::invalid_weights(format!(
                "weights sum to {total}"
            )));
        }

        Ok(NormalizedWeights {
            holdings: self
                .holdings
                .iter()
                .map(|h| Holding {
                    symbol: h.symbol.clone(),
                    weight: h.weight / total,
                })
                .collect(),
        })
    }
}

/// Weights that sum to one. Only constructible through [`WeightVector::normalize`].
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedWeights {
    holdings: Vec<Holding>,
}

impl NormalizedWeights {
    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    pub fn symbols(&self) -> Vec<String> {
        self.holdings.iter().map(|h| h.symbol.clone()).collect()
    }

    pub fn weight(&self, symbol: &str) -> Option<f64> {
        self.holdings
            .iter()
            .find(|h| h.symbol == symbol)
            .map(|h| h.weight)
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.holdings.iter().map(|h| h.weight).sum()
    }
}
