//! ScopedKey: a KeyHandle whose reference is released on every exit path.

use crate::context::SlotContext;
use crate::key::KeyHandle;
use core::hash::BuildHasher;
use core::ops::Deref;

/// Owns one reference on an interned string; dropping it calls `release`.
///
/// Clone takes a further reference, mirroring `Rc`.
pub struct ScopedKey<S: BuildHasher> {
    // None only after `into_inner`.
    ctx: Option<SlotContext<S>>,
    key: KeyHandle,
}

impl<S: BuildHasher> ScopedKey<S> {
    pub fn new(ctx: &SlotContext<S>, s: &str) -> Self {
        Self {
            ctx: Some(ctx.clone()),
            key: KeyHandle::intern(ctx, s),
        }
    }

    pub fn key(&self) -> KeyHandle {
        self.key
    }

    pub fn context(&self) -> &SlotContext<S> {
        self.ctx
            .as_ref()
            .expect("context is held until into_inner")
    }

    /// Give up the guard without releasing; the caller now owns the reference.
    pub fn into_inner(mut self) -> KeyHandle {
        self.ctx = None;
        self.key
    }
}

impl<S: BuildHasher> Deref for ScopedKey<S> {
    type Target = KeyHandle;
    fn deref(&self) -> &KeyHandle {
        &self.key
    }
}

impl<S: BuildHasher> Clone for ScopedKey<S> {
    fn clone(&self) -> Self {
        let ctx = self.context().clone();
        let slot = ctx.acquire(self.key.hash());
        Self {
            ctx: Some(ctx),
            key: KeyHandle::from_raw(self.key.hash(), slot),
        }
    }
}

impl<S: BuildHasher> Drop for ScopedKey<S> {
    fn drop(&mut self) {
        let Some(ctx) = self.ctx.take() else {
            return;
        };
        if let Err(e) = self.key.dispose(&ctx) {
            tracing::warn!(error = %e, "scoped key release failed");
        }
    }
}
