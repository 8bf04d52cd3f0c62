mod error;
mod fragment_store;
mod owner_data;
mod owner_snapshot;

pub use error::StoreError;
pub use fragment_store::FragmentStore;
pub use owner_data::{ApplyOutcome, OwnerData};
pub use owner_snapshot::OwnerSnapshot;
