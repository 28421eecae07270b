use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;

/// The smallest permitted transaction amount.
pub const MINIMUM_TRANSFER_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

/// Number of fractional digits amounts and balances are stored with.
pub const FRACTIONAL_DIGITS: u32 = 2;

/// Largest number of integer digits a stored value may carry.
///
/// `Decimal` holds ~28 significant digits; 26 integer digits is the widest
/// bound that can still be rescaled to two fractional digits without
/// overflowing.
pub const MAX_INTEGER_DIGITS: usize = 26;

/// Validates a transaction amount and normalizes it to the stored scale.
///
/// Rejects amounts below [`MINIMUM_TRANSFER_RATE`], with more than
/// [`FRACTIONAL_DIGITS`] decimal places, or wider than [`MAX_INTEGER_DIGITS`].
pub fn validate_amount(amount: Decimal) -> Result<Decimal> {
    let normalized = amount.normalize();
    if normalized.scale() > FRACTIONAL_DIGITS || integer_digits(normalized) > MAX_INTEGER_DIGITS {
        return Err(LedgerError::InvalidAmount);
    }
    if normalized < MINIMUM_TRANSFER_RATE {
        return Err(LedgerError::InvalidAmount);
    }
    Ok(to_stored_scale(normalized))
}

/// Validates a balance value against the wallet invariants: non-negative,
/// stored scale, bounded width. Invoked at every mutation boundary.
pub fn validate_balance(balance: Decimal) -> Result<()> {
    if balance < Decimal::ZERO {
        return Err(LedgerError::InvalidBalance);
    }
    let normalized = balance.normalize();
    if normalized.scale() > FRACTIONAL_DIGITS || integer_digits(normalized) > MAX_INTEGER_DIGITS {
        return Err(LedgerError::InvalidBalance);
    }
    Ok(())
}

/// Rescales a value to exactly [`FRACTIONAL_DIGITS`] decimal places.
pub fn to_stored_scale(mut value: Decimal) -> Decimal {
    value.rescale(FRACTIONAL_DIGITS);
    value
}

fn integer_digits(value: Decimal) -> usize {
    value.abs().trunc().to_string().len()
}
