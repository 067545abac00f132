//! GST rate splits and per-amount component calculation

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// Combined GST rate and its split across the three components, in percent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GstRate {
    pub total_rate: BigDecimal,
    pub cgst_rate: BigDecimal,
    pub sgst_rate: BigDecimal,
    pub igst_rate: BigDecimal,
}

impl GstRate {
    /// Supply within one state: the rate is halved into CGST and SGST
    pub fn intra_state(total_rate: BigDecimal) -> Self {
        let half = &total_rate / BigDecimal::from(2);
        Self {
            cgst_rate: half.clone(),
            sgst_rate: half,
            igst_rate: BigDecimal::from(0),
            total_rate,
        }
    }

    /// Supply across states: the whole rate is IGST
    pub fn inter_state(total_rate: BigDecimal) -> Self {
        Self {
            cgst_rate: BigDecimal::from(0),
            sgst_rate: BigDecimal::from(0),
            igst_rate: total_rate.clone(),
            total_rate,
        }
    }

    /// Check the component split against the total rate
    pub fn validate(&self) -> Result<(), GstError> {
        let zero = BigDecimal::from(0);
        if self.cgst_rate < zero || self.sgst_rate < zero || self.igst_rate < zero {
            return Err(GstError::InvalidRate(
                "GST component rates cannot be negative".to_string(),
            ));
        }

        let calculated_total = &self.cgst_rate + &self.sgst_rate + &self.igst_rate;
        if calculated_total != self.total_rate {
            return Err(GstError::InvalidRate(format!(
                "GST components sum to {} but the total rate is {}",
                calculated_total, self.total_rate
            )));
        }

        if self.igst_rate == zero && self.cgst_rate != self.sgst_rate {
            return Err(GstError::InvalidRate(
                "CGST and SGST must be equal on an intra-state rate".to_string(),
            ));
        }

        if self.igst_rate > zero && (self.cgst_rate > zero || self.sgst_rate > zero) {
            return Err(GstError::InvalidRate(
                "An inter-state rate carries IGST only".to_string(),
            ));
        }

        Ok(())
    }
}

/// GST component amounts for one base amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GstCalculation {
    pub base_amount: Money,
    pub gst_rate: GstRate,
    pub cgst_amount: Money,
    pub sgst_amount: Money,
    pub igst_amount: Money,
    pub total_gst_amount: Money,
    pub total_amount: Money,
}

impl GstCalculation {
    /// Calculate GST amounts from base amount and GST rate, each component
    /// rounded to paise
    pub fn calculate(base_amount: Money, gst_rate: GstRate) -> Result<Self, GstError> {
        gst_rate.validate()?;

        let component = |rate: &BigDecimal| {
            base_amount.percent(rate).ok_or_else(|| {
                GstError::Calculation(format!("{rate}% of {base_amount} is out of range"))
            })
        };
        let cgst_amount = component(&gst_rate.cgst_rate)?;
        let sgst_amount = component(&gst_rate.sgst_rate)?;
        let igst_amount = component(&gst_rate.igst_rate)?;

        let total_gst_amount = cgst_amount + sgst_amount + igst_amount;
        let total_amount = base_amount + total_gst_amount;

        Ok(Self {
            base_amount,
            gst_rate,
            cgst_amount,
            sgst_amount,
            igst_amount,
            total_gst_amount,
            total_amount,
        })
    }
}

/// Standard GST rates for different categories of goods and services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GstCategory {
    /// Essential items (food, medicines, etc.) - 0%
    Essential,
    /// Reduced rate items - 5%
    Reduced,
    /// Standard rate items - 12%
    Standard,
    /// Higher rate items - 18%
    Higher,
    /// Luxury/Sin goods - 28%
    Luxury,
}

impl GstCategory {
    /// Get the standard GST rate for this category
    pub fn rate(&self) -> BigDecimal {
        match self {
            GstCategory::Essential => BigDecimal::from(0),
            GstCategory::Reduced => BigDecimal::from(5),
            GstCategory::Standard => BigDecimal::from(12),
            GstCategory::Higher => BigDecimal::from(18),
            GstCategory::Luxury => BigDecimal::from(28),
        }
    }

    pub fn intra_state_rate(&self) -> GstRate {
        GstRate::intra_state(self.rate())
    }

    pub fn inter_state_rate(&self) -> GstRate {
        GstRate::inter_state(self.rate())
    }
}

/// Check the shape of a GSTIN: 2-digit state code, 10-character PAN, entity
/// number, the letter `Z` and a check character
pub fn is_valid_gstin(gstin: &str) -> bool {
    let bytes = gstin.as_bytes();
    bytes.len() == 15
        && bytes[..2].iter().all(u8::is_ascii_digit)
        && bytes[2..7].iter().all(u8::is_ascii_uppercase)
        && bytes[7..11].iter().all(u8::is_ascii_digit)
        && bytes[11].is_ascii_uppercase()
        && bytes[12].is_ascii_alphanumeric()
        && bytes[13] == b'Z'
        && bytes[14].is_ascii_alphanumeric()
}

/// GST-related errors
#[derive(Debug, thiserror::Error)]
pub enum GstError {
    #[error("Invalid GST rate: {0}")]
    InvalidRate(String),
    #[error("Calculation error: {0}")]
    Calculation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_gst_rate_intra_state() {
        let rate = GstRate::intra_state(BigDecimal::from(18));
        assert_eq!(rate.cgst_rate, BigDecimal::from(9));
        assert_eq!(rate.sgst_rate, BigDecimal::from(9));
        assert_eq!(rate.igst_rate, BigDecimal::from(0));
        assert!(rate.validate().is_ok());
    }

    #[test]
    fn test_gst_rate_inter_state() {
        let rate = GstRate::inter_state(BigDecimal::from(18));
        assert_eq!(rate.cgst_rate, BigDecimal::from(0));
        assert_eq!(rate.igst_rate, BigDecimal::from(18));
        assert!(rate.validate().is_ok());
    }

    #[test]
    fn test_mixed_rate_rejected() {
        let rate = GstRate {
            total_rate: BigDecimal::from(36),
            cgst_rate: BigDecimal::from(9),
            sgst_rate: BigDecimal::from(9),
            igst_rate: BigDecimal::from(18),
        };
        assert!(matches!(rate.validate(), Err(GstError::InvalidRate(_))));
    }

    #[test]
    fn test_gst_calculation() {
        let calculation = GstCalculation::calculate(
            Money::from_major(1000),
            GstRate::intra_state(BigDecimal::from(18)),
        )
        .unwrap();

        assert_eq!(calculation.cgst_amount, Money::from_major(90));
        assert_eq!(calculation.sgst_amount, Money::from_major(90));
        assert_eq!(calculation.total_gst_amount, Money::from_major(180));
        assert_eq!(calculation.total_amount, Money::from_major(1180));
    }

    #[test]
    fn test_gst_calculation_rounds_components() {
        // 2.5% of 99.99 = 2.49975 -> 2.50 per component
        let calculation = GstCalculation::calculate(
            Money::from_minor(9999),
            GstRate::intra_state(BigDecimal::from_str("5").unwrap()),
        )
        .unwrap();
        assert_eq!(calculation.cgst_amount, Money::from_minor(250));
        assert_eq!(calculation.total_amount, Money::from_minor(10499));
    }

    #[test]
    fn test_gstin_shape() {
        assert!(is_valid_gstin("27AAPFU0939F1ZV"));
        assert!(!is_valid_gstin("27AAPFU0939F1V"));
        assert!(!is_valid_gstin("27aapfu0939f1zv"));
    }
}
