mod error;
mod http_mapping;
pub mod keys;
mod traits;
mod types;

pub use error::{RepositoryError, Result, StoreError};
pub use http_mapping::repository_error_to_status_code;
pub use traits::Repository;
pub use types::{CompositeKey, Envelope, StoredEntity};
