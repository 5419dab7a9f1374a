//! perhash: a string-interning slot allocator with dense, slot-indexed maps.
//!
//! Strings are mapped to small integer slots that stay stable while any
//! reference to the string is live. Released slots are recycled before new
//! ones are issued, so the live slot space stays packed from 0 upward and a
//! `DenseMap` can store values in a plain `Vec` indexed by slot.
//!
//! ```
//! use perhash::{DenseMap, SlotContext};
//!
//! let ctx = SlotContext::new();
//! let mut scores = DenseMap::new(&ctx);
//!
//! let mut key = ctx.intern("Key");
//! assert_eq!(key.slot(), Some(0));
//! scores.set(&key, 1337).unwrap();
//! assert_eq!(scores.get(&key), Ok(&1337));
//!
//! // The last reference frees slot 0 and the next new string reuses it.
//! key.dispose(&ctx).unwrap();
//! assert_eq!(ctx.intern("Other").slot(), Some(0));
//! ```
//!
//! Internal Design:
//!
//! Layers
//! - StringInterner: append-only `hash -> String` table. The empty string
//!   hashes to 0. Collisions are logged, not resolved.
//! - SlotAllocator: `hash -> slot` registry with its reverse map, per-hash
//!   reference counts, a LIFO free list and the shared growth hint.
//! - SlotContext: `Rc` handle owning one interner and one allocator. Every
//!   handle and map of one slot space works against the same context.
//! - KeyHandle: `Copy` value holding a hash and its slot. Disposal is
//!   explicit; `ScopedKey` wraps a handle and releases it on drop.
//! - DenseMap<V>: `Vec<Option<V>>` indexed by slot.
//!
//! Growth hint
//! - Every newly issued slot adds one to the hint; every map resize
//!   publishes `ceil(size * (1 + expand_ratio))` as the new hint.
//! - A new map starts at `ceil(hint + requested)` slots, so maps created late
//!   do not replay the resizes of earlier ones.
//!
//! Constraints
//! - Single-threaded: `SlotContext` is `!Send`/`!Sync` (`Rc` + `RefCell`).
//! - Indices are not stable across processes and interned strings are never
//!   evicted; only slots are recycled.
//! - Reference-count overflow is not checked.
//!
//! Release policy
//! - Releasing a hash with no outstanding reference is an error under
//!   `ReleasePolicy::Strict` (default) and a logged no-op under
//!   `ReleasePolicy::Permissive`. Neither changes allocator state.
//! - Only the last reference frees a slot; disposing one handle leaves other
//!   handles for the same string valid.

pub mod allocator;
pub mod config;
pub mod context;
pub mod dense_map;
pub mod error;
pub mod guard;
pub mod interner;
pub mod key;

// Public surface
pub use allocator::{Release, SlotAllocator, SlotStats};
pub use config::{ReleasePolicy, SlotConfig, DEFAULT_EXPAND_RATIO};
pub use context::SlotContext;
pub use dense_map::DenseMap;
pub use error::{Result, SlotError};
pub use guard::ScopedKey;
pub use interner::{StringInterner, EMPTY_HASH, UNKNOWN};
pub use key::KeyHandle;
