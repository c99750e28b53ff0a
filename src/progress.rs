use std::time::Duration;

/// Spinner frames, advanced one per tick.
pub const FRAMES: [char; 4] = ['-', '\\', '|', '/'];

/// How long each frame is held before the next poll.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// Maps a tick counter to its spinner frame. Pure; the caller owns the
/// counter and the rendering.
pub fn frame(tick: u64) -> char {
    FRAMES[(tick % FRAMES.len() as u64) as usize]
}
