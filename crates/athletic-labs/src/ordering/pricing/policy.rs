use chrono::Duration;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Rush-order rule supplied by the caller: deliveries closer than the
/// threshold pay a surcharge proportional to the subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RushPolicy {
    pub threshold_hours: i64,
    pub surcharge_rate: Decimal,
}

impl RushPolicy {
    pub fn new(threshold_hours: i64, surcharge_rate: Decimal) -> Self {
        Self {
            threshold_hours,
            surcharge_rate,
        }
    }

    /// Thresholds beyond what `Duration` can hold saturate at its bounds.
    pub fn threshold(&self) -> Duration {
        Duration::try_hours(self.threshold_hours).unwrap_or(if self.threshold_hours < 0 {
            Duration::MIN
        } else {
            Duration::MAX
        })
    }

    /// Strictly less than the threshold is rush; landing exactly on it is not.
    pub fn is_rush(&self, lead_time: Duration) -> bool {
        lead_time < self.threshold()
    }
}
