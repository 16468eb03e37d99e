//! Playlist loading, resetting, saving, and assignment write-back.

mod store;

pub use store::{PlaylistStore, StoreError, StoreResult};
