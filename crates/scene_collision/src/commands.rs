//! Editor command notifications
//!
//! The undo/redo stack notifies systems after commands execute. Only the
//! commands that change collision-relevant state are modeled; everything
//! else is ignored by the collision system.

use crate::scene::{EmitterInstanceId, EntityId, Selectable};

/// Notification that an editor command executed or was undone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandNotification {
    /// The landscape heightmap samples changed
    HeightmapModified,
    /// The landscape was switched to a different heightmap file
    HeightmapPathChanged,
    /// A plane LOD was generated for an entity
    PlaneLodCreated(EntityId),
    /// A LOD level was deleted from an entity
    LodDeleted(EntityId),
    /// A render batch was deleted from an entity
    RenderBatchDeleted(EntityId),
    /// An entity's render object was converted to a billboard
    ConvertedToBillboard(EntityId),
    /// An object was moved, rotated or scaled
    Transformed(Selectable),
    /// A particle emitter was removed; `is_redo` is false when the removal
    /// was undone and the emitter is back
    EmitterRemoved {
        /// The emitter instance the command targets
        instance: EmitterInstanceId,
        /// True when the command executed, false when it was undone
        is_redo: bool,
    },
}
