//! KeyHandle: one reference to an interned string plus its assigned slot.
//!
//! Handles are plain `Copy` values. Copying does not take a reference, and
//! nothing is released when a handle goes out of scope; call `dispose`
//! explicitly or use `ScopedKey` for a managed lifetime.

use crate::allocator::Release;
use crate::context::SlotContext;
use crate::error::Result;
use crate::interner::EMPTY_HASH;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{BuildHasher, Hash, Hasher};

#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyHandle {
    hash: u64,
    slot: Option<usize>,
}

impl Default for KeyHandle {
    /// Unassigned handle for the empty string.
    fn default() -> Self {
        Self {
            hash: EMPTY_HASH,
            slot: None,
        }
    }
}

impl KeyHandle {
    /// Record `s` in the context and take one reference on its slot.
    pub fn intern<S: BuildHasher>(ctx: &SlotContext<S>, s: &str) -> Self {
        let hash = ctx.record(s);
        let slot = ctx.acquire(hash);
        Self {
            hash,
            slot: Some(slot),
        }
    }

    /// Describe an already known `(hash, slot)` pair.
    ///
    /// No reference is taken; the caller vouches that `slot` belongs to
    /// `hash` in whatever context the handle is later used with.
    pub fn from_raw(hash: u64, slot: usize) -> Self {
        Self {
            hash,
            slot: Some(slot),
        }
    }

    /// Re-point the handle at `s` and take a reference on its slot.
    ///
    /// The reference held for the previous string is not released; call
    /// `dispose` first to swap identities cleanly.
    pub fn update<S: BuildHasher>(&mut self, ctx: &SlotContext<S>, s: &str) {
        *self = Self::intern(ctx, s);
    }

    /// Release this handle's reference. The handle becomes unassigned.
    ///
    /// Only the last outstanding reference frees the slot; other handles for
    /// the same string stay valid. An unassigned handle holds no reference,
    /// so disposing it is a double release under the context's policy and
    /// never touches the counts.
    pub fn dispose<S: BuildHasher>(&mut self, ctx: &SlotContext<S>) -> Result<Release> {
        if self.slot.take().is_none() {
            return ctx.allocator().unreferenced(self.hash);
        }
        ctx.release(self.hash)
    }

    pub fn hash(&self) -> u64 {
        self.hash
    }

    pub fn slot(&self) -> Option<usize> {
        self.slot
    }

    pub fn is_assigned(&self) -> bool {
        self.slot.is_some()
    }

    /// Interned string, or `interner::UNKNOWN` when the hash was never recorded.
    pub fn name<S: BuildHasher>(&self, ctx: &SlotContext<S>) -> String {
        ctx.resolve(self.hash)
    }

    /// `Display` adapter that resolves the string through `ctx`.
    pub fn display<'c, S: BuildHasher>(&self, ctx: &'c SlotContext<S>) -> Display<'c, S> {
        Display { key: *self, ctx }
    }
}

impl PartialEq for KeyHandle {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for KeyHandle {}

impl PartialOrd for KeyHandle {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for KeyHandle {
    fn cmp(&self, other: &Self) -> Ordering {
        self.hash.cmp(&other.hash)
    }
}

impl Hash for KeyHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}

pub struct Display<'c, S> {
    key: KeyHandle,
    ctx: &'c SlotContext<S>,
}

impl<S: BuildHasher> fmt::Display for Display<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ctx.interner().resolve(self.key.hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SlotError;
    use crate::interner::UNKNOWN;

    #[test]
    fn name_round_trip() {
        let ctx = SlotContext::new();
        let k = KeyHandle::intern(&ctx, "abc");
        assert_eq!(k.name(&ctx), "abc");
        assert_eq!(k.display(&ctx).to_string(), "abc");
    }

    #[test]
    fn same_string_same_slot() {
        let ctx = SlotContext::new();
        let a = KeyHandle::intern(&ctx, "dup");
        let b = KeyHandle::intern(&ctx, "dup");
        assert_eq!(a.slot(), b.slot());
        assert_eq!(a, b);
        assert_eq!(ctx.allocator().ref_count(a.hash()), 2);
    }

    #[test]
    fn from_raw_leaves_allocator_untouched() {
        let ctx = SlotContext::new();
        let k = KeyHandle::from_raw(1234, 7);
        assert_eq!(k.slot(), Some(7));
        assert!(ctx.allocator().is_empty());
        assert_eq!(k.name(&ctx), UNKNOWN);
    }

    #[test]
    fn equality_ignores_slot() {
        let a = KeyHandle::from_raw(1, 0);
        let b = KeyHandle::from_raw(1, 9);
        let c = KeyHandle::from_raw(2, 0);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a < c);
    }

    #[test]
    fn dispose_unassigns_and_frees_last_reference() {
        let ctx = SlotContext::new();
        let mut a = ctx.intern("k");
        let mut b = ctx.intern("k");
        assert_eq!(a.dispose(&ctx), Ok(Release::Live(1)));
        assert!(!a.is_assigned());
        assert!(ctx.is_live(&b));
        assert_eq!(b.dispose(&ctx), Ok(Release::Freed(0)));
        assert_eq!(b.dispose(&ctx), Err(SlotError::DoubleRelease { hash: b.hash() }));
    }

    /// Disposing the same handle twice must not eat another handle's reference.
    #[test]
    fn repeated_dispose_keeps_other_handles_live() {
        let ctx = SlotContext::new();
        let mut map = crate::DenseMap::new(&ctx);
        let mut a = ctx.intern("k");
        let b = ctx.intern("k");
        map.set(&b, "b-value").unwrap();

        assert_eq!(a.dispose(&ctx), Ok(Release::Live(1)));
        assert_eq!(a.dispose(&ctx), Err(SlotError::DoubleRelease { hash: a.hash() }));
        assert_eq!(ctx.allocator().ref_count(b.hash()), 1);
        assert!(ctx.is_live(&b));

        let z = ctx.intern("z");
        assert_eq!(z.slot(), Some(1));
        assert_eq!(map.get(&b), Ok(&"b-value"));
    }

    #[test]
    fn repeated_dispose_is_ignored_when_permissive() {
        let ctx = SlotContext::with_config(
            crate::SlotConfig::default().release_policy(crate::ReleasePolicy::Permissive),
        )
        .unwrap();
        let mut a = ctx.intern("k");
        let b = ctx.intern("k");
        a.dispose(&ctx).unwrap();
        assert_eq!(a.dispose(&ctx), Ok(Release::Ignored));
        assert_eq!(ctx.allocator().ref_count(b.hash()), 1);
    }

    /// The default handle never acquired the empty string's reference.
    #[test]
    fn disposing_default_handle_leaves_empty_string_alone() {
        let ctx = SlotContext::new();
        let empty = ctx.intern("");
        let mut d = KeyHandle::default();
        assert_eq!(d.dispose(&ctx), Err(SlotError::DoubleRelease { hash: EMPTY_HASH }));
        assert_eq!(ctx.allocator().ref_count(empty.hash()), 1);
        assert!(ctx.is_live(&empty));
    }

    #[test]
    fn held_name_does_not_block_interning() {
        let ctx = SlotContext::new();
        let k = ctx.intern("first");
        let name = k.name(&ctx);
        let other = ctx.intern("other");
        assert_eq!(name, "first");
        assert_eq!(other.slot(), Some(1));
    }

    /// `update` keeps the old reference alive.
    #[test]
    fn update_does_not_release_previous() {
        let ctx = SlotContext::new();
        let mut k = ctx.intern("old");
        let old = k;
        k.update(&ctx, "new");
        assert_eq!(k.name(&ctx), "new");
        assert_eq!(k.slot(), Some(1));
        assert_eq!(ctx.allocator().ref_count(old.hash()), 1);
    }

    #[test]
    fn default_is_unassigned_empty() {
        let k = KeyHandle::default();
        assert_eq!(k.hash(), EMPTY_HASH);
        assert!(!k.is_assigned());
    }
}
