mod error;
mod field;
mod field_schema;
mod schema_cache;
mod state_blob;
mod value;

pub use error::{SchemaError, StateBlobError};
pub use field::{ExclusionReason, FieldAccess, FieldDescriptor};
pub use field_schema::FieldSchema;
pub use schema_cache::SchemaCache;
pub use state_blob::StateBlob;
pub use value::{FromValue, Value, ValueKind};
