//! SlotContext: the shared state every handle and map of one slot space
//! works against.
//!
//! A context owns one `StringInterner` and one `SlotAllocator`. It is a cheap
//! `Rc` clone, so each `DenseMap` keeps its own copy to read and publish the
//! growth hint. Independent contexts never share slots, strings or hints.

use crate::allocator::{Release, SlotAllocator, SlotStats};
use crate::config::SlotConfig;
use crate::error::Result;
use crate::guard::ScopedKey;
use crate::interner::StringInterner;
use crate::key::KeyHandle;
use core::cell::{Ref, RefCell};
use core::fmt;
use core::hash::BuildHasher;
use std::collections::hash_map::RandomState;
use std::rc::Rc;

struct Inner<S> {
    interner: RefCell<StringInterner<S>>,
    allocator: RefCell<SlotAllocator>,
    config: SlotConfig,
}

pub struct SlotContext<S = RandomState> {
    inner: Rc<Inner<S>>,
}

impl SlotContext {
    pub fn new() -> Self {
        Self::build(RandomState::new(), SlotConfig::default())
    }

    pub fn with_config(config: SlotConfig) -> Result<Self> {
        Self::with_hasher(RandomState::new(), config)
    }
}

impl Default for SlotContext {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for SlotContext<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: BuildHasher> SlotContext<S> {
    pub fn with_hasher(hasher: S, config: SlotConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(hasher, config))
    }

    fn build(hasher: S, config: SlotConfig) -> Self {
        Self {
            inner: Rc::new(Inner {
                interner: RefCell::new(StringInterner::with_hasher(hasher)),
                allocator: RefCell::new(SlotAllocator::with_policy(config.release_policy)),
                config,
            }),
        }
    }

    pub fn config(&self) -> &SlotConfig {
        &self.inner.config
    }

    /// Borrow the interner.
    ///
    /// The guard holds the interner's `RefCell`; `intern`, `record` and
    /// `update` on this context panic while it is alive.
    pub fn interner(&self) -> Ref<'_, StringInterner<S>> {
        self.inner.interner.borrow()
    }

    /// Borrow the allocator.
    ///
    /// The guard holds the allocator's `RefCell`; `acquire`, `release`,
    /// `intern` and `DenseMap` growth panic while it is alive.
    pub fn allocator(&self) -> Ref<'_, SlotAllocator> {
        self.inner.allocator.borrow()
    }

    pub fn hash_of(&self, s: &str) -> u64 {
        self.interner().hash_of(s)
    }

    pub fn record(&self, s: &str) -> u64 {
        self.inner.interner.borrow_mut().record(s)
    }

    /// Interned string for `hash`, or `interner::UNKNOWN`.
    pub fn resolve(&self, hash: u64) -> String {
        self.interner().resolve(hash).to_owned()
    }

    /// Raw reference acquisition; pair every call with `release`.
    pub fn acquire(&self, hash: u64) -> usize {
        self.inner.allocator.borrow_mut().acquire(hash)
    }

    pub fn release(&self, hash: u64) -> Result<Release> {
        self.inner.allocator.borrow_mut().release(hash)
    }

    /// Shorthand for `KeyHandle::intern(self, s)`.
    pub fn intern(&self, s: &str) -> KeyHandle {
        KeyHandle::intern(self, s)
    }

    /// Intern `s` behind a guard that releases the reference on drop.
    pub fn scoped(&self, s: &str) -> ScopedKey<S> {
        ScopedKey::new(self, s)
    }

    /// True when `key`'s slot is currently owned by its hash.
    pub fn is_live(&self, key: &KeyHandle) -> bool {
        match key.slot() {
            Some(slot) => self.allocator().hash_at(slot) == Some(key.hash()),
            None => false,
        }
    }

    pub fn growth_hint(&self) -> f64 {
        self.allocator().growth_hint()
    }

    pub(crate) fn publish_growth_hint(&self, hint: f64) {
        self.inner.allocator.borrow_mut().set_growth_hint(hint);
    }

    pub fn stats(&self) -> SlotStats {
        self.allocator().stats()
    }

    /// Whether both values refer to the same context.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<S> fmt::Debug for SlotContext<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let allocator = self.inner.allocator.borrow();
        f.debug_struct("SlotContext")
            .field("live", &allocator.len())
            .field("free", &allocator.free_slots().len())
            .field("growth_hint", &allocator.growth_hint())
            .field("strings", &self.inner.interner.borrow().len())
            .finish()
    }
}
