//! Scalar type inference for unannotated wire tokens
//!
//! Tokens are classified by trying a fixed list of parse rules in order and
//! falling back to opaque text. The default order reproduces the historical
//! behaviour where a successful single-precision parse wins over double, so
//! `"5.5"` infers to `Float`.

use crate::types::*;

/// Ordered parse rules tried before the `Str` fallback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceOrder {
    rules: Vec<ScalarType>,
}

impl Default for InferenceOrder {
    fn default() -> Self {
        Self {
            rules: vec![
                ScalarType::Int,
                ScalarType::Float,
                ScalarType::Double,
                ScalarType::Char,
            ],
        }
    }
}

impl InferenceOrder {
    /// Custom order. `Str` entries are dropped since text is always the
    /// fallback, and repeated rules are kept once.
    pub fn new(rules: impl IntoIterator<Item = ScalarType>) -> Self {
        let mut kept = Vec::new();
        for rule in rules {
            if rule != ScalarType::Str && !kept.contains(&rule) {
                kept.push(rule);
            }
        }
        Self { rules: kept }
    }

    /// Int, Float, Double, Char (same as default)
    pub fn fidelity() -> Self {
        Self::default()
    }

    /// Int, Double, Char: decimals keep double precision
    pub fn precise() -> Self {
        Self::new([ScalarType::Int, ScalarType::Double, ScalarType::Char])
    }

    pub fn rules(&self) -> &[ScalarType] {
        &self.rules
    }
}

/// Infer a token with the default order
pub fn infer(token: &str) -> InferredValue {
    infer_with(token, &InferenceOrder::default())
}

/// Infer a token with a custom order
pub fn infer_with(token: &str, order: &InferenceOrder) -> InferredValue {
    let raw = strip_quotes(token);
    for rule in order.rules() {
        if let Some(value) = parse_as(raw, *rule) {
            return InferredValue::new(raw, value);
        }
    }
    InferredValue::new(raw, Scalar::Str(raw.to_string()))
}

/// Parse text as exactly the given scalar type
pub fn parse_as(text: &str, ty: ScalarType) -> Option<Scalar> {
    match ty {
        ScalarType::Int => text.parse::<i32>().ok().map(Scalar::Int),
        ScalarType::Float => text
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Scalar::Float),
        ScalarType::Double => text
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Scalar::Double),
        ScalarType::Char => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Scalar::Char(c)),
                _ => None,
            }
        }
        ScalarType::Str => Some(Scalar::Str(text.to_string())),
    }
}

/// Remove one pair of delimiting quotes; a lone `"` is left alone
fn strip_quotes(token: &str) -> &str {
    if token.len() >= 2 && token.starts_with('"') && token.ends_with('"') {
        &token[1..token.len() - 1]
    } else {
        token
    }
}
