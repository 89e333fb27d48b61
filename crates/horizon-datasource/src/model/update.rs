//! Update operations sent from a data source to its bound view.
//!
//! Every structural mutation of an adapter produces an [`UpdateBatch`]: an
//! ordered list of [`UpdateOp`]s plus the [`RowAnimation`] the view should
//! use. The bound view receives the batch through [`UpdateTarget`], wrapped in
//! a `begin_updates` / `end_updates` scope so it can apply and animate all
//! operations together.
//!
//! Within one batch, delete and move sources refer to positions before the
//! batch, inserts and move destinations to positions after it, which is the
//! convention table and collection views use for batched updates.

use serde::{Deserialize, Serialize};

use super::location::Location;

/// Animation style requested for row and section updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowAnimation {
    /// Apply without animation.
    None,
    /// Cross-fade rows in and out.
    Fade,
    /// Slide rows in from, or out to, the right.
    Right,
    /// Slide rows in from, or out to, the left.
    Left,
    /// Slide rows in from, or out to, the top.
    Top,
    /// Slide rows in from, or out to, the bottom.
    Bottom,
    /// Keep rows centered while the surrounding space changes.
    Middle,
    /// Let the view pick an appropriate style.
    #[default]
    Automatic,
}

/// A single structural change the bound view must apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOp {
    /// New rows exist at these (post-batch) locations.
    InsertRows(Vec<Location>),
    /// Rows at these (pre-batch) locations are gone.
    DeleteRows(Vec<Location>),
    /// Content at these locations changed in place.
    ReloadRows(Vec<Location>),
    /// One row moved from `from` (pre-batch) to `to` (post-batch).
    MoveRow {
        /// The row's location before the batch.
        from: Location,
        /// The row's location after the batch.
        to: Location,
    },
    /// New sections exist at these indices.
    InsertSections(Vec<usize>),
    /// Sections at these indices are gone.
    DeleteSections(Vec<usize>),
    /// Everything changed; re-query all counts and content.
    ReloadAll,
}

impl UpdateOp {
    /// Returns a short name for the operation, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::InsertRows(_) => "insert_rows",
            Self::DeleteRows(_) => "delete_rows",
            Self::ReloadRows(_) => "reload_rows",
            Self::MoveRow { .. } => "move_row",
            Self::InsertSections(_) => "insert_sections",
            Self::DeleteSections(_) => "delete_sections",
            Self::ReloadAll => "reload_all",
        }
    }

    /// Returns `true` if the operation changes nothing.
    ///
    /// Row and section operations with empty location lists are empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::InsertRows(l) | Self::DeleteRows(l) | Self::ReloadRows(l) => l.is_empty(),
            Self::InsertSections(s) | Self::DeleteSections(s) => s.is_empty(),
            Self::MoveRow { .. } | Self::ReloadAll => false,
        }
    }
}

/// An ordered list of update operations applied as one unit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateBatch {
    ops: Vec<UpdateOp>,
    animation: RowAnimation,
}

impl UpdateBatch {
    /// Creates a batch from operations, dropping empty ones.
    pub fn new(ops: Vec<UpdateOp>, animation: RowAnimation) -> Self {
        Self {
            ops: ops.into_iter().filter(|op| !op.is_empty()).collect(),
            animation,
        }
    }

    /// Returns the operations in application order.
    pub fn ops(&self) -> &[UpdateOp] {
        &self.ops
    }

    /// Returns the requested animation.
    pub fn animation(&self) -> RowAnimation {
        self.animation
    }

    /// Returns `true` if there is nothing to apply.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Returns the number of operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }
}

/// A view that applies update batches: the table or collection view bound
/// to an adapter.
///
/// The adapter calls `begin_updates`, then `apply` once per operation in
/// order, then `end_updates`. The view should apply the whole scope
/// atomically. Calls arrive synchronously on the thread mutating the adapter,
/// and the adapter holds no locks while calling, so the view may query the
/// adapter's counts and items from inside these methods.
pub trait UpdateTarget: Send + Sync {
    /// Opens an update scope.
    fn begin_updates(&self) {}

    /// Applies one operation.
    fn apply(&self, op: &UpdateOp, animation: RowAnimation);

    /// Closes the update scope, committing every operation applied in it.
    fn end_updates(&self) {}
}
