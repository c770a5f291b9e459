//! Order pricing: subtotal, tax, rush surcharge, and total.
//!
//! The calculator is a pure function of its inputs. It never reads a clock;
//! callers pass the reference instant along with the delivery instant, and the
//! rush threshold and multiplier arrive as a [`RushPolicy`].

mod policy;
mod rules;

pub use policy::RushPolicy;
pub use rules::round_money;
pub(crate) use rules::{checked_amount, price_subtotal};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Validated inputs for a single quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingInput {
    unit_price_per_person: Decimal,
    people_count: i64,
    tax_rate: Decimal,
    delivery_at: Option<DateTime<Utc>>,
    reference_now: DateTime<Utc>,
}

impl PricingInput {
    /// Tax rates outside `[0, 1]` are accepted as given; keeping them sane is
    /// the caller's responsibility.
    pub fn new(
        unit_price_per_person: Decimal,
        people_count: i64,
        tax_rate: Decimal,
        delivery_at: Option<DateTime<Utc>>,
        reference_now: DateTime<Utc>,
    ) -> Result<Self, PricingError> {
        if unit_price_per_person < Decimal::ZERO {
            return Err(PricingError::InvalidInput(
                PricingConstraint::NegativeUnitPrice(unit_price_per_person),
            ));
        }
        if people_count < 1 {
            return Err(PricingError::InvalidInput(
                PricingConstraint::NonPositivePeopleCount(people_count),
            ));
        }

        Ok(Self {
            unit_price_per_person,
            people_count,
            tax_rate,
            delivery_at,
            reference_now,
        })
    }

    pub fn unit_price_per_person(&self) -> Decimal {
        self.unit_price_per_person
    }

    pub fn people_count(&self) -> i64 {
        self.people_count
    }

    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    pub fn delivery_at(&self) -> Option<DateTime<Utc>> {
        self.delivery_at
    }

    pub fn reference_now(&self) -> DateTime<Utc> {
        self.reference_now
    }

    /// Fails only when an amount leaves the range `Decimal` can represent.
    pub fn compute(&self, rush: &RushPolicy) -> Result<PricingResult, PricingError> {
        let subtotal = checked_amount(
            self.unit_price_per_person
                .checked_mul(Decimal::from(self.people_count)),
        )?;
        price_subtotal(
            subtotal,
            self.tax_rate,
            self.delivery_at,
            self.reference_now,
            rush,
        )
    }
}

/// Derived quote. `total` is always the exact sum of the three rounded parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingResult {
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub rush_surcharge: Decimal,
    pub total: Decimal,
    pub is_rush_order: bool,
}

/// Pricing rejects inputs only for these constraints.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    #[error("invalid pricing input: {0}")]
    InvalidInput(PricingConstraint),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingConstraint {
    #[error("unit price per person must not be negative (got {0})")]
    NegativeUnitPrice(Decimal),
    #[error("people count must be at least 1 (got {0})")]
    NonPositivePeopleCount(i64),
    #[error("amount is too large to price")]
    AmountOutOfRange,
}

pub fn compute_pricing(
    unit_price_per_person: Decimal,
    people_count: i64,
    tax_rate: Decimal,
    delivery_at: Option<DateTime<Utc>>,
    reference_now: DateTime<Utc>,
    rush: &RushPolicy,
) -> Result<PricingResult, PricingError> {
    let input = PricingInput::new(
        unit_price_per_person,
        people_count,
        tax_rate,
        delivery_at,
        reference_now,
    )?;
    input.compute(rush)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 15, 30, 0)
            .single()
            .expect("valid reference instant")
    }

    fn rush() -> RushPolicy {
        RushPolicy::new(72, dec!(0.25))
    }

    #[test]
    fn standard_lead_time_has_no_surcharge() {
        let result = compute_pricing(
            dec!(49.00),
            60,
            dec!(0.0875),
            Some(now() + Duration::hours(200)),
            now(),
            &rush(),
        )
        .expect("valid input");

        assert_eq!(result.subtotal, dec!(2940.00));
        assert_eq!(result.tax_amount, dec!(257.25));
        assert_eq!(result.rush_surcharge, dec!(0.00));
        assert_eq!(result.total, dec!(3197.25));
        assert!(!result.is_rush_order);
    }

    #[test]
    fn short_lead_time_adds_quarter_of_subtotal() {
        let result = compute_pricing(
            dec!(49.00),
            60,
            dec!(0.0875),
            Some(now() + Duration::hours(24)),
            now(),
            &rush(),
        )
        .expect("valid input");

        assert_eq!(result.rush_surcharge, dec!(735.00));
        assert_eq!(result.total, dec!(3932.25));
        assert!(result.is_rush_order);
    }

    #[test]
    fn free_bundle_prices_to_zero() {
        let result = compute_pricing(
            Decimal::ZERO,
            5,
            dec!(0.0875),
            Some(now() + Duration::hours(1000)),
            now(),
            &rush(),
        )
        .expect("zero price is valid");

        assert_eq!(result.subtotal, Decimal::ZERO);
        assert_eq!(result.tax_amount, Decimal::ZERO);
        assert_eq!(result.rush_surcharge, Decimal::ZERO);
        assert_eq!(result.total, Decimal::ZERO);
        assert!(!result.is_rush_order);
    }

    #[test]
    fn missing_delivery_skips_rush_check() {
        let result = compute_pricing(dec!(30.00), 10, dec!(0.0875), None, now(), &rush())
            .expect("valid input");
        assert!(!result.is_rush_order);
        assert_eq!(result.rush_surcharge, Decimal::ZERO);
        assert_eq!(result.total, dec!(326.25));
    }

    #[test]
    fn rejects_negative_price_and_empty_headcount() {
        assert_eq!(
            compute_pricing(dec!(-1), 10, dec!(0.0875), None, now(), &rush()),
            Err(PricingError::InvalidInput(
                PricingConstraint::NegativeUnitPrice(dec!(-1))
            ))
        );
        assert_eq!(
            compute_pricing(dec!(10), 0, dec!(0.0875), None, now(), &rush()),
            Err(PricingError::InvalidInput(
                PricingConstraint::NonPositivePeopleCount(0)
            ))
        );
        assert!(compute_pricing(dec!(10), -4, dec!(0.0875), None, now(), &rush()).is_err());
    }

    #[test]
    fn out_of_range_tax_rate_is_applied_verbatim() {
        let result = compute_pricing(dec!(10.00), 10, dec!(1.5), None, now(), &rush())
            .expect("tax rate is a caller contract");
        assert_eq!(result.tax_amount, dec!(150.00));
        assert_eq!(result.total, dec!(250.00));
    }

    #[test]
    fn oversized_amounts_are_rejected_instead_of_overflowing() {
        assert_eq!(
            compute_pricing(Decimal::MAX, 2, dec!(0.0875), None, now(), &rush()),
            Err(PricingError::InvalidInput(
                PricingConstraint::AmountOutOfRange
            ))
        );
        assert_eq!(
            compute_pricing(
                Decimal::MAX,
                1,
                dec!(0.0875),
                Some(now() + Duration::hours(1)),
                now(),
                &rush(),
            ),
            Err(PricingError::InvalidInput(
                PricingConstraint::AmountOutOfRange
            ))
        );
    }

    #[test]
    fn rounding_is_applied_per_component() {
        // 36.67 * 7 = 256.69; tax 22.460375 -> 22.46; rush 64.1725 -> 64.17
        let result = compute_pricing(
            dec!(36.67),
            7,
            dec!(0.0875),
            Some(now() + Duration::hours(5)),
            now(),
            &rush(),
        )
        .expect("valid input");

        assert_eq!(result.subtotal, dec!(256.69));
        assert_eq!(result.tax_amount, dec!(22.46));
        assert_eq!(result.rush_surcharge, dec!(64.17));
        assert_eq!(result.total, dec!(343.32));
        assert_eq!(
            result.total,
            result.subtotal + result.tax_amount + result.rush_surcharge
        );
    }
}
