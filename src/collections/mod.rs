//! In-memory containers: the chained [`KeyedStore`] and the linked [`Sequence`].
//!
//! # Module Organization
//!
//! - [`hash`]: djb2 over the raw bytes of a key
//! - [`instrument`]: optional per-operation accounting injected into stores
//! - `keyed_store`: fixed-bucket hash table that owns its values
//! - `sequence`: singly linked list of non-owning payloads

pub mod hash;
pub mod instrument;
mod keyed_store;
mod sequence;

pub use hash::RawKey;
pub use instrument::{Instrument, NoInstrument, OpCounters, OpTally, StoreOp};
pub use keyed_store::{bucket_count_for, Iter as StoreIter, KeyedStore};
pub use sequence::{Iter as SequenceIter, Sequence};
