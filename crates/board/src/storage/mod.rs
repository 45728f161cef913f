//! Storage layer: persistence trait, file backend, and the proof blob store.

mod blob;
mod file;
mod traits;

pub use blob::{default_allowed_types, BlobStore, DEFAULT_MAX_PROOF_BYTES};
pub use file::FileStorage;
pub use traits::Storage;
