//! Cache-aside coherence layer.
//!
//! Reads consult the cache first and fall back to the document store on a
//! miss or any cache failure. Writes go to the store first; only after the
//! store acknowledges does the cache get updated or invalidated. The store
//! is the source of truth and the cache is disposable.
//!
//! A per-key write generation prevents a reader that fetched the
//! pre-mutation value from writing it back after a writer already applied
//! its cache step.

mod coordinator;
mod generations;

pub use coordinator::CacheAside;
