//! Delivery of update batches to the bound view.
//!
//! The dispatcher holds the bound view weakly. While a batch is being applied
//! it raises an in-flight flag; adapters check the flag before mutating so a
//! view that calls back into the adapter from `apply` gets
//! [`DataSourceError::BatchInProgress`] instead of a torn batch.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use horizon_datasource_core::logging::{span_names, targets};
use horizon_datasource_core::{DataSourceError, Result};

use super::update::{RowAnimation, UpdateBatch, UpdateOp, UpdateTarget};

/// Sends update batches to a weakly held [`UpdateTarget`].
pub struct UpdateDispatcher {
    target: RwLock<Option<Weak<dyn UpdateTarget>>>,
    animation: RwLock<RowAnimation>,
    in_flight: AtomicBool,
}

impl Default for UpdateDispatcher {
    fn default() -> Self {
        Self::new(RowAnimation::default())
    }
}

impl std::fmt::Debug for UpdateDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateDispatcher")
            .field("bound", &self.is_bound())
            .field("animation", &self.animation())
            .field("in_flight", &self.is_dispatching())
            .finish()
    }
}

struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl UpdateDispatcher {
    /// Creates an unbound dispatcher using `animation` for every batch.
    pub fn new(animation: RowAnimation) -> Self {
        Self {
            target: RwLock::new(None),
            animation: RwLock::new(animation),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Binds `target`, replacing any previous view.
    pub fn bind<U: UpdateTarget + 'static>(&self, target: &Arc<U>) {
        let weak: Weak<U> = Arc::downgrade(target);
        let weak: Weak<dyn UpdateTarget> = weak;
        *self.target.write() = Some(weak);
        tracing::debug!(target: targets::DISPATCH, "view bound");
    }

    /// Forgets the bound view.
    pub fn unbind(&self) {
        if self.target.write().take().is_some() {
            tracing::debug!(target: targets::DISPATCH, "view unbound");
        }
    }

    /// Returns `true` if a live view is bound.
    pub fn is_bound(&self) -> bool {
        self.target
            .read()
            .as_ref()
            .is_some_and(|weak| weak.strong_count() > 0)
    }

    /// Returns the animation attached to batches.
    pub fn animation(&self) -> RowAnimation {
        *self.animation.read()
    }

    /// Sets the animation attached to later batches.
    pub fn set_animation(&self, animation: RowAnimation) {
        *self.animation.write() = animation;
    }

    /// Returns `true` while a batch is being applied.
    pub fn is_dispatching(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Fails with `BatchInProgress` while a batch is being applied.
    pub fn ensure_idle(&self) -> Result<()> {
        if self.is_dispatching() {
            return Err(DataSourceError::BatchInProgress);
        }
        Ok(())
    }

    /// Packs `ops` into a batch and applies it to the bound view.
    ///
    /// Returns the batch, which is empty when every operation was empty. With
    /// no live view the batch is still returned but nothing is applied.
    #[tracing::instrument(
        name = "dispatch",
        skip_all,
        target = "horizon_datasource::dispatch",
        level = "debug",
        fields(ops = ops.len())
    )]
    pub fn dispatch(&self, ops: Vec<UpdateOp>) -> UpdateBatch {
        let batch = UpdateBatch::new(ops, self.animation());
        if batch.is_empty() {
            return batch;
        }

        let Some(target) = self.live_target() else {
            return batch;
        };

        let _span = tracing::debug_span!(target: targets::DISPATCH, "apply", name = span_names::DISPATCH)
            .entered();
        self.in_flight.store(true, Ordering::Release);
        let _guard = InFlight(&self.in_flight);

        target.begin_updates();
        for op in batch.ops() {
            tracing::trace!(target: targets::DISPATCH, op = op.name(), "applying");
            target.apply(op, batch.animation());
        }
        target.end_updates();

        tracing::debug!(
            target: targets::DISPATCH,
            ops = batch.len(),
            animation = ?batch.animation(),
            "batch applied"
        );
        batch
    }

    fn live_target(&self) -> Option<Arc<dyn UpdateTarget>> {
        let mut slot = self.target.write();
        match slot.as_ref().map(Weak::upgrade) {
            Some(Some(target)) => Some(target),
            Some(None) => {
                tracing::warn!(target: targets::DISPATCH, "bound view was dropped; unbinding");
                *slot = None;
                None
            }
            None => {
                tracing::trace!(target: targets::DISPATCH, "no view bound; batch not applied");
                None
            }
        }
    }
}
