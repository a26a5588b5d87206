use alloy_primitives::{utils::format_units, U256};

use common_constants::{BASE_CURRENCY_DECIMALS, BPS};
use common_errors::{InteractError, InteractResult};

/// `10^exp`, `None` past `10^77`.
pub fn pow10(exp: u8) -> Option<U256> {
    U256::from(10u64).checked_pow(U256::from(exp))
}

/// `a * b / d` rounded down. `None` on overflow or a zero divisor.
pub fn mul_div_floor(a: U256, b: U256, d: U256) -> Option<U256> {
    if d.is_zero() {
        return None;
    }
    a.checked_mul(b).map(|product| product / d)
}

/// `a * b / d` rounded half-up.
pub fn mul_div_half_up(a: U256, b: U256, d: U256) -> Option<U256> {
    if d.is_zero() {
        return None;
    }
    let product = a.checked_mul(b)?;
    let half = d / U256::from(2u64);
    product.checked_add(half).map(|rounded| rounded / d)
}

/// Takes `bps` basis points of `amount`, rounded down.
pub fn apply_bps(amount: U256, bps: u64) -> Option<U256> {
    mul_div_floor(amount, U256::from(bps), U256::from(BPS))
}

/// Converts a base-currency (ETH wei) amount into token base units.
///
/// `answer` is the feed price of one whole token in ETH, scaled by `feed_decimals`.
/// The result is rounded down so it never values more than `eth_wei`.
pub fn eth_to_token_units(
    eth_wei: U256,
    answer: U256,
    feed_decimals: u8,
    token_decimals: u8,
) -> Option<U256> {
    let numerator = eth_wei
        .checked_mul(pow10(feed_decimals)?)?
        .checked_mul(pow10(token_decimals)?)?;
    let denominator = answer.checked_mul(pow10(BASE_CURRENCY_DECIMALS)?)?;
    if denominator.is_zero() {
        return None;
    }
    Some(numerator / denominator)
}

/// Values `amount` token base units in ETH wei, rounded half-up.
pub fn token_units_to_eth(
    amount: U256,
    answer: U256,
    feed_decimals: u8,
    token_decimals: u8,
) -> Option<U256> {
    let denominator = pow10(feed_decimals)?.checked_mul(pow10(token_decimals)?)?;
    mul_div_half_up(
        amount.checked_mul(answer)?,
        pow10(BASE_CURRENCY_DECIMALS)?,
        denominator,
    )
}

/// Amount of the borrowed token to request: `ratio_bps` of the available borrows,
/// priced with the feed answer.
pub fn borrow_amount(
    available_borrows_eth: U256,
    answer: U256,
    feed_decimals: u8,
    token_decimals: u8,
    ratio_bps: u64,
) -> InteractResult<U256> {
    let capped = apply_bps(available_borrows_eth, ratio_bps)
        .ok_or(InteractError::Overflow("borrow ratio"))?;
    let amount = eth_to_token_units(capped, answer, feed_decimals, token_decimals)
        .ok_or(InteractError::Overflow("price conversion"))?;
    if amount.is_zero() {
        return Err(InteractError::ZeroBorrowAmount);
    }
    Ok(amount)
}

/// Largest rounding error, in ETH wei, that `eth_to_token_units` followed by
/// `token_units_to_eth` can introduce: one token base unit valued at `answer`.
pub fn conversion_tolerance(answer: U256, feed_decimals: u8, token_decimals: u8) -> U256 {
    token_units_to_eth(U256::from(1u64), answer, feed_decimals, token_decimals)
        .unwrap_or(U256::MAX)
        .max(U256::from(1u64))
}

/// `amount` base units as a decimal string without trailing zeros, `2.5` rather than
/// `2.500000000000000000`.
pub fn format_token_amount(amount: U256, decimals: u8) -> String {
    match format_units(amount, decimals) {
        Ok(formatted) if formatted.contains('.') => formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string(),
        Ok(formatted) => formatted,
        Err(_) => amount.to_string(),
    }
}
