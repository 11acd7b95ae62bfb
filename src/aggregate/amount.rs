use super::error::AggregateError;

/// Planck per DOT
pub const PLANCK_PER_DOT: f64 = 1e10;

/// Scale a fixed-point planck string (e.g. `"10000000000"`) to DOT
pub fn planck_to_dot(raw: &str) -> Result<f64, AggregateError> {
    let planck: u128 = raw
        .trim()
        .parse()
        .map_err(|_| AggregateError::Amount(raw.to_string()))?;

    Ok(planck as f64 / PLANCK_PER_DOT)
}
