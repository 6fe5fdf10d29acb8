mod contract;
mod error;
mod provider;
mod tariff;
mod validation;

pub use contract::Contract;
pub use error::ValidationError;
pub use provider::{Address, Provider};
pub use tariff::{DynamicTariff, FixedTariff, HourlyTariff, Tariff, TariffType};
pub use validation::{validate_contract, validate_provider, validate_tariff, validate_uuid_v4};
