//! Headless outputs: the recording surface, frame dumps and scene stats.

mod recording;
mod stats;

pub use recording::RecordingSurface;
pub use stats::SceneStats;

use aquarium_frame::FrameRecord;
use std::path::Path;

use crate::error::AquariumError;

/// Writes a frame record as pretty JSON.
pub fn write_frame(record: &FrameRecord, path: &Path) -> Result<(), AquariumError> {
    let json = serde_json::to_string_pretty(record)?;
    std::fs::write(path, json).map_err(|source| AquariumError::Output {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(
        "Wrote frame {} ({} commands) to {:?}",
        record.tick,
        record.commands.len(),
        path
    );
    Ok(())
}
