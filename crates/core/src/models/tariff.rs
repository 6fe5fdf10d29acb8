use serde::{Deserialize, Serialize};

/// The commodity a tariff prices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TariffType {
    #[default]
    Electricity,
    Water,
    Gas,
    Biogas,
    Oil,
}

impl TariffType {
    /// Returns the display name of this tariff type.
    pub fn as_str(&self) -> &'static str {
        match self {
            TariffType::Electricity => "Electricity",
            TariffType::Water => "Water",
            TariffType::Gas => "Gas",
            TariffType::Biogas => "Biogas",
            TariffType::Oil => "Oil",
        }
    }
}

impl std::fmt::Display for TariffType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A price definition for one commodity over a validity window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tariff {
    pub id: String,
    pub name: String,
    /// ISO 4217 currency code.
    pub currency: String,
    /// RFC 3339 timestamp.
    pub valid_from: String,
    /// RFC 3339 timestamp.
    pub valid_to: String,
    pub tariff_type: TariffType,
    pub fixed_tariff: FixedTariff,
    pub dynamic_tariff: DynamicTariff,
}

/// Flat price per unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FixedTariff {
    pub price_per_unit: f64,
}

/// Time-of-use prices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DynamicTariff {
    pub hourly_tariffs: Vec<HourlyTariff>,
}

/// A price that applies from `start_time` on the given weekdays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HourlyTariff {
    /// RFC 3339 timestamp.
    pub start_time: String,
    /// ISO weekdays, 1 (Monday) through 7 (Sunday).
    pub valid_days: Vec<u8>,
    pub price_per_unit: f64,
}

impl Tariff {
    /// Creates a tariff with the given id, name and type.
    pub fn new(id: impl Into<String>, name: impl Into<String>, tariff_type: TariffType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tariff_type,
            ..Self::default()
        }
    }

    /// Sets the fixed price per unit.
    pub fn with_fixed_price(mut self, price_per_unit: f64) -> Self {
        self.fixed_tariff = FixedTariff { price_per_unit };
        self
    }

    /// Appends an hourly price to the dynamic tariff.
    pub fn with_hourly(mut self, hourly: HourlyTariff) -> Self {
        self.dynamic_tariff.hourly_tariffs.push(hourly);
        self
    }
}
