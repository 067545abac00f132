//! Validation utilities

use std::collections::HashSet;

use crate::tax::gst::is_valid_gstin;
use crate::traits::*;
use crate::types::*;

/// Validate that a record ID is valid
pub fn validate_record_id(kind: &str, id: &str) -> Result<(), String> {
    if id.trim().is_empty() {
        return Err(format!("{kind} ID cannot be empty"));
    }

    if id.len() > 50 {
        return Err(format!("{kind} ID cannot exceed 50 characters"));
    }

    // alphanumeric, dashes, underscores
    if !id.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
        return Err(format!(
            "{kind} ID can only contain alphanumeric characters, dashes, and underscores"
        ));
    }

    Ok(())
}

/// Validate that a group or ledger name is valid
pub fn validate_name(kind: &str, name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err(format!("{kind} name cannot be empty"));
    }

    if name.len() > 100 {
        return Err(format!("{kind} name cannot exceed 100 characters"));
    }

    Ok(())
}

/// Validate a voucher number
pub fn validate_voucher_number(number: &str) -> Result<(), String> {
    if number.trim().is_empty() {
        return Err("Voucher number cannot be empty".to_string());
    }

    if number.len() > 30 {
        return Err("Voucher number cannot exceed 30 characters".to_string());
    }

    Ok(())
}

/// Enhanced voucher validator with detailed checks
pub struct EnhancedVoucherValidator;

impl VoucherValidator for EnhancedVoucherValidator {
    fn validate_voucher(&self, voucher: &Voucher) -> Result<(), VoucherError> {
        voucher.validate()?;

        let invalid = |reason: String| VoucherError::Invalid {
            voucher_id: voucher.id.clone(),
            reason,
        };

        validate_record_id("Voucher", &voucher.id).map_err(invalid)?;
        validate_voucher_number(&voucher.number).map_err(invalid)?;

        let mut line_ids = HashSet::new();
        for line in &voucher.entries {
            if !line_ids.insert(line.id.as_str()) {
                return Err(invalid(format!("line ID '{}' is used twice", line.id)));
            }

            // item lines must still post to a ledger to reach the statements
            if line.item_id.is_some() && line.ledger_id.is_none() {
                return Err(invalid(format!(
                    "item line '{}' does not name a ledger",
                    line.id
                )));
            }
        }

        Ok(())
    }
}

/// Enhanced chart validator with detailed checks
pub struct EnhancedChartValidator;

impl ChartValidator for EnhancedChartValidator {
    fn validate_group(&self, group: &LedgerGroup) -> Result<(), ChartError> {
        validate_record_id("Group", &group.id).map_err(ChartError::Validation)?;
        validate_name("Group", &group.name).map_err(ChartError::Validation)?;

        if group.parent_group_id.as_deref() == Some(group.id.as_str()) {
            return Err(ChartError::Cycle(group.id.clone()));
        }

        Ok(())
    }

    fn validate_ledger(&self, ledger: &Ledger) -> Result<(), ChartError> {
        DefaultChartValidator.validate_ledger(ledger)?;
        validate_record_id("Ledger", &ledger.id).map_err(ChartError::Validation)?;
        validate_name("Ledger", &ledger.name).map_err(ChartError::Validation)?;

        if let Some(gstin) = &ledger.gst_number {
            if !is_valid_gstin(gstin) {
                return Err(ChartError::Validation(format!(
                    "Ledger '{}' has an invalid GSTIN '{}'",
                    ledger.id, gstin
                )));
            }
        }

        Ok(())
    }
}
