use super::policy::RushPolicy;
use super::{PricingConstraint, PricingError, PricingResult};
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// Currency rounding: two places, half away from zero, always carrying scale 2.
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Shared tail of every quote: tax, rush determination, and the grand total,
/// all derived from an already-rounded subtotal.
pub(crate) fn price_subtotal(
    subtotal: Decimal,
    tax_rate: Decimal,
    delivery_at: Option<DateTime<Utc>>,
    reference_now: DateTime<Utc>,
    rush: &RushPolicy,
) -> Result<PricingResult, PricingError> {
    let subtotal = round_money(subtotal);
    let tax_amount = round_money(checked_amount(subtotal.checked_mul(tax_rate))?);

    let is_rush_order = delivery_at
        .map(|delivery| rush.is_rush(delivery.signed_duration_since(reference_now)))
        .unwrap_or(false);

    let rush_surcharge = if is_rush_order {
        round_money(checked_amount(subtotal.checked_mul(rush.surcharge_rate))?)
    } else {
        round_money(Decimal::ZERO)
    };

    let total = checked_amount(
        subtotal
            .checked_add(tax_amount)
            .and_then(|sum| sum.checked_add(rush_surcharge)),
    )?;

    Ok(PricingResult {
        subtotal,
        tax_amount,
        rush_surcharge,
        total,
        is_rush_order,
    })
}

/// Lifts a checked `Decimal` operation into the pricing error space.
pub(crate) fn checked_amount(value: Option<Decimal>) -> Result<Decimal, PricingError> {
    value.ok_or(PricingError::InvalidInput(PricingConstraint::AmountOutOfRange))
}
