//! Sort key generation for the single-table design.
//!
//! Every entity of a partition lives under the same partition key; the sort
//! key is `<type prefix><entity id>` so that one `begins_with` range scan
//! returns all entities of one type.

// ============================================================================
// Key prefixes
// ============================================================================

pub const CONTRACT_PREFIX: &str = "contract#";
pub const TARIFF_PREFIX: &str = "tariff#";
pub const PROVIDER_PREFIX: &str = "provider#";

/// All sort key prefixes in use. No entry may be a prefix of another.
pub const ALL_PREFIXES: [&str; 3] = [CONTRACT_PREFIX, TARIFF_PREFIX, PROVIDER_PREFIX];

/// Generate the sort key for an entity.
///
/// Pattern: `<prefix><id>`
pub fn sort_key(prefix: &str, id: &str) -> String {
    format!("{prefix}{id}")
}
