//! DenseMap: values stored directly at a key's slot index.
//!
//! Storage is a `Vec` addressed by slot, so lookups never hash or search a table.
//! Growth is coordinated through the context's growth hint: each resize
//! publishes its target size, and maps built afterwards start at least that
//! large. Maps sharing a context therefore converge on one size instead of
//! each growing step by step.

use crate::config::validate_expand_ratio;
use crate::context::SlotContext;
use crate::error::{Result, SlotError};
use crate::key::KeyHandle;
use core::fmt;
use core::hash::BuildHasher;
use std::collections::hash_map::RandomState;

pub struct DenseMap<V, S = RandomState> {
    ctx: SlotContext<S>,
    data: Vec<Option<V>>,
    occupied: usize,
    expand_ratio: f64,
}

/// Iterator over stored `(slot, &value)` pairs in slot order.
pub struct Iter<'a, V> {
    it: core::iter::Enumerate<core::slice::Iter<'a, Option<V>>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (usize, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it
            .by_ref()
            .find_map(|(slot, v)| v.as_ref().map(|v| (slot, v)))
    }
}

/// Iterator over stored `(slot, &mut value)` pairs in slot order.
pub struct IterMut<'a, V> {
    it: core::iter::Enumerate<core::slice::IterMut<'a, Option<V>>>,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = (usize, &'a mut V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it
            .by_ref()
            .find_map(|(slot, v)| v.as_mut().map(|v| (slot, v)))
    }
}

impl<V, S: BuildHasher> DenseMap<V, S> {
    /// Map pre-sized from the context's growth hint.
    pub fn new(ctx: &SlotContext<S>) -> Self {
        Self::with_capacity(ctx, 0)
    }

    /// Map sized to `ceil(growth hint + capacity)`.
    pub fn with_capacity(ctx: &SlotContext<S>, capacity: usize) -> Self {
        let ratio = ctx.config().expand_ratio;
        Self::build(ctx, capacity, ratio)
    }

    pub fn with_expand_ratio(ctx: &SlotContext<S>, capacity: usize, ratio: f64) -> Result<Self> {
        validate_expand_ratio(ratio)?;
        Ok(Self::build(ctx, capacity, ratio))
    }

    fn build(ctx: &SlotContext<S>, capacity: usize, expand_ratio: f64) -> Self {
        let size = (ctx.growth_hint() + capacity as f64).ceil() as usize;
        let mut data = Vec::new();
        data.resize_with(size, || None);
        Self {
            ctx: ctx.clone(),
            data,
            occupied: 0,
            expand_ratio,
        }
    }

    fn slot_for(&self, key: &KeyHandle) -> Result<usize> {
        let slot = key.slot().ok_or(SlotError::Unassigned)?;
        if self.ctx.config().check_liveness && !self.ctx.is_live(key) {
            return Err(SlotError::Stale {
                slot,
                hash: key.hash(),
            });
        }
        Ok(slot)
    }

    pub fn get(&self, key: &KeyHandle) -> Result<&V> {
        let slot = self.slot_for(key)?;
        self.get_slot(slot)
    }

    pub fn get_mut(&mut self, key: &KeyHandle) -> Result<&mut V> {
        let slot = self.slot_for(key)?;
        let size = self.data.len();
        match self.data.get_mut(slot) {
            None => Err(SlotError::OutOfRange { slot, size }),
            Some(None) => Err(SlotError::Vacant { slot }),
            Some(Some(v)) => Ok(v),
        }
    }

    /// Bounds-checked access by raw slot index.
    pub fn get_slot(&self, slot: usize) -> Result<&V> {
        match self.data.get(slot) {
            None => Err(SlotError::OutOfRange {
                slot,
                size: self.data.len(),
            }),
            Some(None) => Err(SlotError::Vacant { slot }),
            Some(Some(v)) => Ok(v),
        }
    }

    pub fn contains(&self, key: &KeyHandle) -> bool {
        self.get(key).is_ok()
    }

    /// Store `value` at the key's slot, growing first if needed. Returns the
    /// value previously stored there.
    ///
    /// A slot too large to allocate fails with `OutOfRange` and leaves the map
    /// and the growth hint untouched.
    pub fn set(&mut self, key: &KeyHandle, value: V) -> Result<Option<V>> {
        let slot = self.slot_for(key)?;
        if slot >= self.data.len() {
            self.grow_for(slot)?;
        }
        let prev = self.data[slot].replace(value);
        if prev.is_none() {
            self.occupied += 1;
        }
        Ok(prev)
    }

    pub fn remove(&mut self, key: &KeyHandle) -> Result<Option<V>> {
        let slot = self.slot_for(key)?;
        let prev = self.data.get_mut(slot).and_then(Option::take);
        if prev.is_some() {
            self.occupied -= 1;
        }
        Ok(prev)
    }

    fn grow_for(&mut self, slot: usize) -> Result<()> {
        let size = self.data.len();
        let out_of_range = SlotError::OutOfRange { slot, size };
        let next = (size as f64 * (1.0 + self.expand_ratio)).ceil();
        let Some(needed) = slot.checked_add(1) else {
            return Err(out_of_range);
        };
        let new_size = ((next + 1.0).round() as usize).max(needed);
        if self.data.try_reserve_exact(new_size - size).is_err() {
            tracing::warn!(from = size, to = new_size, slot, "dense map growth refused");
            return Err(out_of_range);
        }
        self.ctx.publish_growth_hint(next);
        tracing::debug!(from = size, to = new_size, slot, hint = next, "dense map grown");
        self.data.resize_with(new_size, || None);
        Ok(())
    }
}

impl<V, S> DenseMap<V, S> {
    /// Addressable slots.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Allocated backing capacity.
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.occupied
    }

    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    pub fn expand_ratio(&self) -> f64 {
        self.expand_ratio
    }

    pub fn context(&self) -> &SlotContext<S> {
        &self.ctx
    }

    /// Set the addressable size; shrinking drops values past the new end.
    pub fn resize(&mut self, size: usize) {
        if size < self.data.len() {
            let dropped = self.data[size..].iter().filter(|v| v.is_some()).count();
            self.occupied -= dropped;
        }
        self.data.resize_with(size, || None);
    }

    /// Drop every value and release the backing storage.
    pub fn clear(&mut self) {
        self.data = Vec::new();
        self.occupied = 0;
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            it: self.data.iter().enumerate(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            it: self.data.iter_mut().enumerate(),
        }
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }
}

impl<'a, V, S> IntoIterator for &'a DenseMap<V, S> {
    type Item = (usize, &'a V);
    type IntoIter = Iter<'a, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V: fmt::Debug, S> fmt::Debug for DenseMap<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
