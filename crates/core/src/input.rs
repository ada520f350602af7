use crate::error::{AlgovizError, AlgovizResult};

/// Parse a list of integers separated by commas and/or whitespace.
///
/// Empty input yields an empty list.
pub fn parse_values(raw: &str) -> AlgovizResult<Vec<i64>> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<i64>()
                .map_err(|e| AlgovizError::InvalidInput(format!("'{}': {}", token, e)))
        })
        .collect()
}
