//! Native-unit to USD conversion.
//!
//! ```text
//! usd = floor(wei * answer / 10^decimals)      (USD, 18-decimal fixed point)
//! ```
//!
//! The product is never formed directly. Writing `wei = q·10^d + r` and
//! `answer = a·10^d + b` gives
//!
//! ```text
//! usd = q·answer + r·a + floor(r·b / 10^d)
//! ```
//!
//! Every term is bounded by the result except `r·b`, and `r, b < 10^d ≤ 10^18`
//! keeps that below `10^36`. The conversion is exact and only fails when the
//! result itself does not fit in a `u128`.

use chrono::{DateTime, Utc};
use fundme_types::{constants, FundMeError, PriceData, Result, Wei};
use rust_decimal::Decimal;

/// Reject answers that cannot be used for conversion.
///
/// # Errors
/// [`FundMeError::OracleUnavailable`] if the round is incomplete, the answer
/// is not positive, the precision is unsupported, or the answer is older
/// than `max_age_secs`.
pub fn validate_price(
    price: &PriceData,
    now: DateTime<Utc>,
    max_age_secs: Option<u64>,
) -> Result<()> {
    if price.round_id == 0 {
        return Err(FundMeError::OracleUnavailable {
            reason: "incomplete round".into(),
        });
    }
    if price.answer <= 0 {
        return Err(FundMeError::OracleUnavailable {
            reason: format!("non-positive answer {}", price.answer),
        });
    }
    if price.decimals > constants::MAX_FEED_DECIMALS {
        return Err(FundMeError::OracleUnavailable {
            reason: format!("unsupported precision {} decimals", price.decimals),
        });
    }
    if let Some(max_age) = max_age_secs {
        let age = price.age_secs(now);
        if age > max_age {
            return Err(FundMeError::OracleUnavailable {
                reason: format!("stale answer: {age}s old, limit {max_age}s"),
            });
        }
    }
    Ok(())
}

/// USD value of `amount` at `price`, 18-decimal fixed point.
///
/// Callers are expected to have run [`validate_price`] first; a
/// non-positive answer is still rejected here rather than wrapped.
///
/// # Errors
/// - [`FundMeError::OracleUnavailable`] for a non-positive answer or
///   precision above 18 decimals
/// - [`FundMeError::ArithmeticOverflow`] if the USD value does not fit
pub fn usd_value(amount: Wei, price: &PriceData) -> Result<Wei> {
    let answer = u128::try_from(price.answer)
        .ok()
        .filter(|a| *a > 0)
        .ok_or_else(|| FundMeError::OracleUnavailable {
            reason: format!("non-positive answer {}", price.answer),
        })?;
    if price.decimals > constants::MAX_FEED_DECIMALS {
        return Err(FundMeError::OracleUnavailable {
            reason: format!("unsupported precision {} decimals", price.decimals),
        });
    }
    let scale = 10u128.pow(u32::from(price.decimals));

    let (whole, rest) = (amount.as_u128() / scale, amount.as_u128() % scale);
    let (answer_whole, answer_rest) = (answer / scale, answer % scale);

    // rest, answer_rest < 10^18: this product cannot overflow.
    let fraction = rest * answer_rest / scale;

    whole
        .checked_mul(answer)
        .and_then(|high| rest.checked_mul(answer_whole)?.checked_add(high))
        .and_then(|sum| sum.checked_add(fraction))
        .map(Wei)
        .ok_or(FundMeError::ArithmeticOverflow)
}

/// Human-readable USD for logs and errors. Saturates at [`Decimal::MAX`].
#[must_use]
pub fn usd_to_decimal(usd: Wei) -> Decimal {
    usd.to_decimal().unwrap_or(Decimal::MAX)
}
