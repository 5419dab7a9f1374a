//! SlotAllocator: hash → dense slot registry with per-hash reference counts
//! and a LIFO free list of released slots.

use crate::config::ReleasePolicy;
use crate::error::{Result, SlotError};
use hashbrown::HashMap;

/// Outcome of a successful `release`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Release {
    /// References remain; carries the new count.
    Live(usize),
    /// The last reference went away and the slot is on the free list.
    Freed(usize),
    /// Permissive release of a hash with no outstanding reference.
    Ignored,
}

/// Point-in-time counters for an allocator.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SlotStats {
    pub live: usize,
    pub free: usize,
    pub total_refs: usize,
    pub growth_hint: f64,
}

#[derive(Debug, Default)]
pub struct SlotAllocator {
    registry: HashMap<u64, usize>,
    registry_reverse: HashMap<usize, u64>,
    registry_refs: HashMap<u64, usize>,
    free_list: Vec<usize>,
    next_hint: f64,
    policy: ReleasePolicy,
}

impl SlotAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: ReleasePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> ReleasePolicy {
        self.policy
    }

    /// Take one reference on `hash` and return its slot.
    ///
    /// A live hash keeps its slot. Otherwise the most recently freed slot is
    /// reused; only with an empty free list is a new slot issued, which also
    /// bumps the growth hint by one.
    pub fn acquire(&mut self, hash: u64) -> usize {
        if let Some(&slot) = self.registry.get(&hash) {
            let refs = self.registry_refs.entry(hash).or_insert(0);
            *refs += 1;
            tracing::trace!(hash, slot, refs = *refs, "slot shared");
            return slot;
        }

        let slot = match self.free_list.pop() {
            Some(slot) => {
                tracing::trace!(hash, slot, "slot reused");
                slot
            }
            None => {
                let slot = self.registry.len();
                self.next_hint += 1.0;
                tracing::trace!(hash, slot, "slot issued");
                slot
            }
        };
        self.registry.insert(hash, slot);
        self.registry_reverse.insert(slot, hash);
        self.registry_refs.insert(hash, 1);
        slot
    }

    /// Drop one reference on `hash`; the last one frees its slot.
    pub fn release(&mut self, hash: u64) -> Result<Release> {
        let Some(refs) = self.registry_refs.get_mut(&hash) else {
            return self.unreferenced(hash);
        };

        if *refs > 1 {
            *refs -= 1;
            tracing::trace!(hash, refs = *refs, "reference released");
            return Ok(Release::Live(*refs));
        }

        self.registry_refs.remove(&hash);
        let slot = self
            .registry
            .remove(&hash)
            .expect("counted hash must have a registered slot");
        self.registry_reverse.remove(&slot);
        self.free_list.push(slot);
        tracing::trace!(hash, slot, "slot freed");
        Ok(Release::Freed(slot))
    }

    /// Apply the release policy to a release that holds no reference.
    pub(crate) fn unreferenced(&self, hash: u64) -> Result<Release> {
        match self.policy {
            ReleasePolicy::Strict => Err(SlotError::DoubleRelease { hash }),
            ReleasePolicy::Permissive => {
                tracing::warn!(hash, "release of unreferenced hash ignored");
                Ok(Release::Ignored)
            }
        }
    }

    pub fn slot_of(&self, hash: u64) -> Option<usize> {
        self.registry.get(&hash).copied()
    }

    pub fn hash_at(&self, slot: usize) -> Option<u64> {
        self.registry_reverse.get(&slot).copied()
    }

    /// Outstanding references on `hash`; 0 when not live.
    pub fn ref_count(&self, hash: u64) -> usize {
        self.registry_refs.get(&hash).copied().unwrap_or(0)
    }

    /// Number of live hashes.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Released slots awaiting reuse; the last element is handed out next.
    pub fn free_slots(&self) -> &[usize] {
        &self.free_list
    }

    pub fn growth_hint(&self) -> f64 {
        self.next_hint
    }

    pub fn set_growth_hint(&mut self, hint: f64) {
        self.next_hint = hint;
    }

    pub fn stats(&self) -> SlotStats {
        SlotStats {
            live: self.registry.len(),
            free: self.free_list.len(),
            total_refs: self.registry_refs.values().sum(),
            growth_hint: self.next_hint,
        }
    }

    /// Panics if the registry, its reverse map and the counts disagree.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert_eq!(self.registry.len(), self.registry_reverse.len());
        assert_eq!(self.registry.len(), self.registry_refs.len());
        for (&hash, &slot) in &self.registry {
            assert_eq!(self.registry_reverse.get(&slot), Some(&hash));
            assert!(self.registry_refs[&hash] > 0);
            assert!(!self.free_list.contains(&slot));
        }
    }
}
