//! Pure validation functions for path parameters and entity payloads.

use chrono::DateTime;
use uuid::Uuid;

use super::error::ValidationError;
use super::{Contract, HourlyTariff, Provider, Tariff};

const MAX_TARIFF_NAME_LEN: usize = 64;

/// Validates that `value` is a hyphenated UUID version 4.
pub fn validate_uuid_v4(field: &str, value: &str) -> Result<(), ValidationError> {
    let uuid = Uuid::parse_str(value)
        .map_err(|_| ValidationError::invalid(field, format!("'{value}' is not a UUID")))?;
    if uuid.get_version_num() != 4 {
        return Err(ValidationError::invalid(
            field,
            format!("'{value}' is not a version 4 UUID"),
        ));
    }
    Ok(())
}

/// Validates a tariff before creation or update.
pub fn validate_tariff(tariff: &Tariff) -> Result<(), ValidationError> {
    if tariff.name.trim().is_empty() {
        return Err(ValidationError::invalid("name", "is required"));
    }
    if tariff.name.chars().count() > MAX_TARIFF_NAME_LEN {
        return Err(ValidationError::invalid(
            "name",
            format!("must be at most {MAX_TARIFF_NAME_LEN} characters"),
        ));
    }
    if !is_currency_code(&tariff.currency) {
        return Err(ValidationError::invalid(
            "currency",
            "must be a three letter ISO 4217 code",
        ));
    }
    require_timestamp("validFrom", &tariff.valid_from)?;
    require_timestamp("validTo", &tariff.valid_to)?;
    require_price(
        "fixedTariff.pricePerUnit",
        tariff.fixed_tariff.price_per_unit,
    )?;

    for (idx, hourly) in tariff.dynamic_tariff.hourly_tariffs.iter().enumerate() {
        validate_hourly(idx, hourly)?;
    }

    Ok(())
}

fn validate_hourly(idx: usize, hourly: &HourlyTariff) -> Result<(), ValidationError> {
    let field = |name: &str| format!("dynamicTariff.hourlyTariffs[{idx}].{name}");

    require_timestamp(&field("startTime"), &hourly.start_time)?;

    if hourly.valid_days.is_empty() || hourly.valid_days.len() > 7 {
        return Err(ValidationError::invalid(
            field("validDays"),
            "must contain between 1 and 7 days",
        ));
    }
    if let Some(day) = hourly.valid_days.iter().find(|d| !(1..=7).contains(*d)) {
        return Err(ValidationError::invalid(
            field("validDays"),
            format!("{day} is not a weekday (1-7)"),
        ));
    }

    require_price(&field("pricePerUnit"), hourly.price_per_unit)
}

/// Validates a contract before creation or update.
pub fn validate_contract(contract: &Contract) -> Result<(), ValidationError> {
    if contract.name.trim().is_empty() {
        return Err(ValidationError::invalid("name", "is required"));
    }
    optional_timestamp("startDate", &contract.start_date)?;
    optional_timestamp("endDate", &contract.end_date)?;
    Ok(())
}

/// Validates a provider before creation or update.
pub fn validate_provider(provider: &Provider) -> Result<(), ValidationError> {
    if provider.name.trim().is_empty() {
        return Err(ValidationError::invalid("name", "is required"));
    }
    if !provider.email.is_empty() && !provider.email.contains('@') {
        return Err(ValidationError::invalid(
            "email",
            "must be an email address",
        ));
    }
    Ok(())
}

fn is_currency_code(value: &str) -> bool {
    value.len() == 3 && value.chars().all(|c| c.is_ascii_uppercase())
}

fn require_timestamp(field: &str, value: &str) -> Result<(), ValidationError> {
    DateTime::parse_from_rfc3339(value)
        .map(|_| ())
        .map_err(|_| ValidationError::invalid(field, "must be an RFC 3339 timestamp"))
}

fn optional_timestamp(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Ok(());
    }
    require_timestamp(field, value)
}

fn require_price(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::invalid(field, "must be zero or greater"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TariffType;

    fn valid_tariff() -> Tariff {
        Tariff {
            currency: "EUR".to_string(),
            valid_from: "2024-01-01T00:00:00Z".to_string(),
            valid_to: "2024-12-31T23:59:59+01:00".to_string(),
            ..Tariff::new("t-1", "Standard", TariffType::Gas)
        }
        .with_fixed_price(0.3)
        .with_hourly(HourlyTariff {
            start_time: "2024-01-01T06:00:00Z".to_string(),
            valid_days: vec![1, 2, 3, 4, 5],
            price_per_unit: 0.25,
        })
    }

    #[test]
    fn test_uuid_v4_accepted() {
        assert!(validate_uuid_v4("partitionId", "8eb474f4-3bf9-483c-8c4d-6193a7217fa3").is_ok());
    }

    #[test]
    fn test_uuid_rejects_garbage() {
        let err = validate_uuid_v4("partitionId", "not-a-uuid").unwrap_err();
        assert_eq!(err.field(), "partitionId");
    }

    #[test]
    fn test_uuid_rejects_other_versions() {
        // Version 1 UUID
        let result = validate_uuid_v4("id", "c232ab00-9414-11ec-b3c8-9f6bdeced846");
        assert!(result.is_err());
    }

    #[test]
    fn test_valid_tariff_passes() {
        assert_eq!(validate_tariff(&valid_tariff()), Ok(()));
    }

    #[test]
    fn test_tariff_name_too_long() {
        let tariff = Tariff {
            name: "x".repeat(65),
            ..valid_tariff()
        };
        assert_eq!(validate_tariff(&tariff).unwrap_err().field(), "name");
    }

    #[test]
    fn test_tariff_currency_shape() {
        for currency in ["", "eur", "EURO", "E1R"] {
            let tariff = Tariff {
                currency: currency.to_string(),
                ..valid_tariff()
            };
            assert_eq!(validate_tariff(&tariff).unwrap_err().field(), "currency");
        }
    }

    #[test]
    fn test_tariff_requires_rfc3339_dates() {
        let tariff = Tariff {
            valid_to: "2024-12-31".to_string(),
            ..valid_tariff()
        };
        assert_eq!(validate_tariff(&tariff).unwrap_err().field(), "validTo");
    }

    #[test]
    fn test_tariff_negative_price_rejected() {
        let tariff = valid_tariff().with_fixed_price(-1.0);
        assert_eq!(
            validate_tariff(&tariff).unwrap_err().field(),
            "fixedTariff.pricePerUnit"
        );
    }

    #[test]
    fn test_hourly_days_out_of_range() {
        let mut tariff = valid_tariff();
        tariff.dynamic_tariff.hourly_tariffs[0].valid_days = vec![0, 8];
        assert_eq!(
            validate_tariff(&tariff).unwrap_err().field(),
            "dynamicTariff.hourlyTariffs[0].validDays"
        );
    }

    #[test]
    fn test_hourly_days_empty() {
        let mut tariff = valid_tariff();
        tariff.dynamic_tariff.hourly_tariffs[0].valid_days.clear();
        assert!(validate_tariff(&tariff).is_err());
    }

    #[test]
    fn test_contract_dates_optional() {
        assert!(validate_contract(&Contract::new("c-1", "Home")).is_ok());

        let contract = Contract {
            start_date: "yesterday".to_string(),
            ..Contract::new("c-1", "Home")
        };
        assert_eq!(validate_contract(&contract).unwrap_err().field(), "startDate");
    }

    #[test]
    fn test_provider_email() {
        let provider = Provider::new("p-1", "Utility Co").with_email("billing.example.com");
        assert_eq!(validate_provider(&provider).unwrap_err().field(), "email");

        let provider = Provider::new("p-1", "Utility Co").with_email("billing@example.com");
        assert!(validate_provider(&provider).is_ok());
    }

    #[test]
    fn test_provider_name_required() {
        assert!(validate_provider(&Provider::default()).is_err());
    }
}
