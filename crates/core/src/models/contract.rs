use serde::{Deserialize, Serialize};

/// A supply contract between a partition owner and a provider.
///
/// The provider and tariffs are referenced by id only; they are looked up
/// separately and never embedded or cascaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contract {
    pub id: String,
    pub name: String,
    pub description: String,
    /// RFC 3339 timestamp.
    pub start_date: String,
    /// RFC 3339 timestamp.
    pub end_date: String,
    /// Id of the referenced provider.
    pub provider: String,
    /// Ids of the referenced tariffs.
    pub tariffs: Vec<String>,
}

impl Contract {
    /// Creates a contract with the given id and name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the referenced provider id.
    pub fn with_provider(mut self, provider_id: impl Into<String>) -> Self {
        self.provider = provider_id.into();
        self
    }

    /// Adds a referenced tariff id.
    pub fn with_tariff(mut self, tariff_id: impl Into<String>) -> Self {
        self.tariffs.push(tariff_id.into());
        self
    }
}
