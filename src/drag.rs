//! Drag-and-drop assignment of catalog images to albums.
//!
//! Modelled as a small state machine, independent of whatever input source
//! drives it (pointer events, native drag events, touch gestures):
//!
//! ```text
//! Idle ──begin(path)──▶ Dragging(path) ──drop_on(album)──▶ Idle
//!                              │
//!                              └──cancel / drop_outside──▶ Idle
//! ```
//!
//! Dropping on an album is `add_image(album, path)`. Whatever the outcome of
//! that call, the controller is back in `Idle` afterwards, so a failed drop
//! can never leave a stale drag that blocks the next one.

use crate::album::{AddOutcome, AlbumError, AlbumId, AlbumStore, PersistencePort};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        path: String,
    },
}

#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Start dragging `path`. An unfinished drag is discarded.
    pub fn begin(&mut self, path: impl Into<String>) {
        let path = path.into();
        if let DragState::Dragging { path: stale } = &self.state {
            debug!("discarding unfinished drag of {stale}");
        }
        self.state = DragState::Dragging { path };
    }

    /// Drop over `album_id`, adding the dragged image to it.
    ///
    /// Returns `Ok(None)` when nothing was being dragged.
    pub fn drop_on<P: PersistencePort>(
        &mut self,
        store: &mut AlbumStore<P>,
        album_id: AlbumId,
    ) -> Result<Option<AddOutcome>, AlbumError> {
        match std::mem::take(&mut self.state) {
            DragState::Idle => Ok(None),
            DragState::Dragging { path } => store.add_image(album_id, &path).map(Some),
        }
    }

    /// Drop outside any album.
    pub fn drop_outside(&mut self) {
        self.cancel();
    }

    /// Abandon the drag (escape key, interrupted gesture, navigation).
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}
