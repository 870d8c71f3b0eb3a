//! Validation utilities

use crate::traits::*;
use crate::types::*;
use bigdecimal::BigDecimal;

/// Validate that an amount is not negative
pub fn validate_non_negative_amount(amount: &BigDecimal) -> ClinicResult<()> {
    if *amount < BigDecimal::from(0) {
        Err(ClinicError::Validation(
            "Amount cannot be negative".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Validate that a description is usable
pub fn validate_description(description: &str) -> ClinicResult<()> {
    if description.trim().is_empty() {
        return Err(ClinicError::Validation(
            "Description cannot be empty".to_string(),
        ));
    }

    if description.len() > 500 {
        return Err(ClinicError::Validation(
            "Description cannot exceed 500 characters".to_string(),
        ));
    }

    Ok(())
}

/// Entry validator with stricter rules than the default
///
/// Additionally rejects zero amounts and oversized notes.
pub struct StrictEntryValidator;

impl EntryValidator for StrictEntryValidator {
    fn validate_entry(&self, entry: &LedgerEntry) -> ClinicResult<()> {
        DefaultEntryValidator.validate_entry(entry)?;
        validate_description(&entry.description)?;

        if entry.amount == BigDecimal::from(0) {
            return Err(ClinicError::Validation(
                "Entry amount must be greater than zero".to_string(),
            ));
        }

        if let Some(notes) = &entry.notes {
            if notes.len() > 2000 {
                return Err(ClinicError::Validation(
                    "Notes cannot exceed 2000 characters".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_strict_validator_rejects_zero_amount() {
        let entry = LedgerEntry::new(
            EntryKind::Expense,
            Frequency::Occasional,
            "zero".to_string(),
            BigDecimal::from(0),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            EntrySource::Other,
        );

        assert!(DefaultEntryValidator.validate_entry(&entry).is_ok());
        assert!(StrictEntryValidator.validate_entry(&entry).is_err());
    }
}
