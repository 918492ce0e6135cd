use serde::{Deserialize, Serialize};

use crate::error::{PosError, Result};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    Percentage,
    Fixed,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    #[serde(rename = "type")]
    pub kind: DiscountKind,
    pub value: f64,
    pub reason: String,
}

impl Discount {
    /// Build a cashier-entered discount.
    ///
    /// Rejects a non-positive value or a blank reason, then clamps the value
    /// to 100 for percentages and to `subtotal` for fixed amounts.
    pub fn custom(kind: DiscountKind, value: f64, reason: &str, subtotal: f64) -> Result<Self> {
        let reason = reason.trim();
        if value.is_nan() || value <= 0.0 {
            return Err(PosError::validation("Discount value must be greater than zero"));
        }
        if reason.is_empty() {
            return Err(PosError::validation("Discount reason is required"));
        }

        let max = match kind {
            DiscountKind::Percentage => 100.0,
            DiscountKind::Fixed => subtotal.max(0.0),
        };

        Ok(Discount {
            kind,
            value: value.clamp(0.0, max),
            reason: reason.to_string(),
        })
    }

    /// Amount taken off `subtotal`; never more than the subtotal itself.
    pub fn amount(&self, subtotal: f64) -> f64 {
        let subtotal = subtotal.max(0.0);
        let raw = match self.kind {
            DiscountKind::Percentage => subtotal * self.value.min(100.0) / 100.0,
            DiscountKind::Fixed => self.value,
        };
        raw.clamp(0.0, subtotal)
    }
}

/// Quick-pick discounts offered at the till.
pub fn presets() -> Vec<Discount> {
    vec![
        Discount {
            kind: DiscountKind::Percentage,
            value: 5.0,
            reason: "Regular member (5%)".to_string(),
        },
        Discount {
            kind: DiscountKind::Percentage,
            value: 10.0,
            reason: "VIP member (10%)".to_string(),
        },
        Discount {
            kind: DiscountKind::Percentage,
            value: 15.0,
            reason: "Promo of the day (15%)".to_string(),
        },
        Discount {
            kind: DiscountKind::Fixed,
            value: 5000.0,
            reason: "First purchase discount".to_string(),
        },
        Discount {
            kind: DiscountKind::Fixed,
            value: 10000.0,
            reason: "Voucher Rp 10.000".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_amount() {
        let d = Discount::custom(DiscountKind::Percentage, 10.0, "VIP", 50000.0).unwrap();
        assert!((d.amount(50000.0) - 5000.0).abs() < 1e-9);
    }

    #[test]
    fn test_percentage_clamped_to_hundred() {
        let d = Discount::custom(DiscountKind::Percentage, 150.0, "Oops", 20000.0).unwrap();
        assert!((d.value - 100.0).abs() < 1e-9);
        assert!((d.amount(20000.0) - 20000.0).abs() < 1e-9);
    }

    #[test]
    fn test_fixed_never_exceeds_subtotal() {
        let voucher = presets().into_iter().find(|d| d.value == 10000.0).unwrap();
        assert!((voucher.amount(7000.0) - 7000.0).abs() < 1e-9);
        assert!((voucher.amount(30000.0) - 10000.0).abs() < 1e-9);

        let custom = Discount::custom(DiscountKind::Fixed, 99999.0, "Big", 15000.0).unwrap();
        assert!((custom.value - 15000.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_invalid_custom_discount() {
        assert!(Discount::custom(DiscountKind::Fixed, 0.0, "Zero", 100.0).is_err());
        assert!(Discount::custom(DiscountKind::Fixed, -5.0, "Negative", 100.0).is_err());
        assert!(Discount::custom(DiscountKind::Percentage, 5.0, "   ", 100.0).is_err());
        assert!(Discount::custom(DiscountKind::Percentage, f64::NAN, "NaN", 100.0).is_err());
    }

    #[test]
    fn test_empty_subtotal_yields_zero() {
        let d = presets().remove(0);
        assert_eq!(d.amount(0.0), 0.0);
    }
}
