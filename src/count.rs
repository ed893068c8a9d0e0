use crate::error::ParseError;

/// Convert a listing count such as `(4,532)`, `(1.2K)` or `(3M)` into an
/// approximate story count.
///
/// The suffix letters become extra factors (`1.2K` is read as `1.2 1000`),
/// every factor is parsed as a float, and the product is truncated.
pub fn parse_rough_count(raw: &str) -> Result<u64, ParseError> {
    let invalid = || ParseError::InvalidCount(raw.to_owned());

    let inner = raw
        .trim()
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(invalid)?;

    let expanded = inner
        .replace(',', "")
        .replace('K', " 1000")
        .replace('M', " 1000000");

    let mut product = 1.0_f64;
    let mut factors = 0_usize;
    for token in expanded.split_whitespace() {
        let factor: f64 = token.parse().map_err(|_| invalid())?;
        product *= factor;
        factors += 1;
    }

    if factors == 0 || !product.is_finite() || product < 0.0 {
        return Err(invalid());
    }

    Ok(product.trunc() as u64)
}
