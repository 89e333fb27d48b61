//! Shared helpers for the adapter integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Weak};

use horizon_datasource::model::{DataSource, RowAnimation, UpdateOp, UpdateTarget};
use parking_lot::Mutex;

/// Installs a test subscriber once; filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

type Counts = Arc<dyn Fn() -> Vec<usize> + Send + Sync>;

/// A view that keeps its own per-section row counts by replaying batches,
/// the way a table view does, and checks them against the data source when
/// each batch ends.
pub struct MirrorView {
    source: Counts,
    counts: Mutex<Vec<usize>>,
    batches: Mutex<Vec<Vec<UpdateOp>>>,
    animations: Mutex<Vec<RowAnimation>>,
    mismatches: Mutex<Vec<String>>,
}

impl MirrorView {
    /// Creates a view mirroring `source`'s current counts.
    pub fn watching<D: DataSource + 'static>(source: &Arc<D>) -> Arc<Self> {
        let weak: Weak<D> = Arc::downgrade(source);
        let counts: Counts = Arc::new(move || match weak.upgrade() {
            Some(source) => (0..source.section_count())
                .map(|section| source.item_count(section))
                .collect(),
            None => Vec::new(),
        });
        Arc::new(Self {
            counts: Mutex::new(counts()),
            source: counts,
            batches: Mutex::new(Vec::new()),
            animations: Mutex::new(Vec::new()),
            mismatches: Mutex::new(Vec::new()),
        })
    }

    pub fn batches(&self) -> Vec<Vec<UpdateOp>> {
        self.batches.lock().clone()
    }

    pub fn last_batch(&self) -> Option<Vec<UpdateOp>> {
        self.batches.lock().last().cloned()
    }

    pub fn animations(&self) -> Vec<RowAnimation> {
        self.animations.lock().clone()
    }

    pub fn counts(&self) -> Vec<usize> {
        self.counts.lock().clone()
    }

    pub fn mismatches(&self) -> Vec<String> {
        self.mismatches.lock().clone()
    }
}

impl UpdateTarget for MirrorView {
    fn begin_updates(&self) {
        self.batches.lock().push(Vec::new());
    }

    fn apply(&self, op: &UpdateOp, animation: RowAnimation) {
        if let Some(batch) = self.batches.lock().last_mut() {
            batch.push(op.clone());
        }
        self.animations.lock().push(animation);
    }

    // Replays the batch like a table view: deletions against pre-batch
    // indices first, then insertions against post-batch indices.
    fn end_updates(&self) {
        let batch = self.last_batch().unwrap_or_default();
        let source = (self.source)();
        let mut counts = self.counts.lock();

        if batch.contains(&UpdateOp::ReloadAll) {
            *counts = source;
            return;
        }

        for op in &batch {
            match op {
                UpdateOp::DeleteRows(locations) => {
                    for location in locations {
                        counts[location.section()] -= 1;
                    }
                }
                UpdateOp::MoveRow { from, .. } => counts[from.section()] -= 1,
                _ => {}
            }
        }
        for op in &batch {
            if let UpdateOp::DeleteSections(sections) = op {
                for &section in sections.iter().rev() {
                    counts.remove(section);
                }
            }
        }
        for op in &batch {
            if let UpdateOp::InsertSections(sections) = op {
                for &section in sections {
                    counts.insert(section, source.get(section).copied().unwrap_or(0));
                }
            }
        }
        for op in &batch {
            match op {
                UpdateOp::InsertRows(locations) => {
                    for location in locations {
                        counts[location.section()] += 1;
                    }
                }
                UpdateOp::MoveRow { to, .. } => counts[to.section()] += 1,
                _ => {}
            }
        }

        if *counts != source {
            self.mismatches
                .lock()
                .push(format!("view has {:?}, source has {source:?}", *counts));
        }
    }
}
