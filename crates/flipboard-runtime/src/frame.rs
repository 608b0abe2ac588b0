#![forbid(unsafe_code)]

//! Explicit one-frame deferral.
//!
//! [`FrameScheduler`] is the runtime's equivalent of "run this on the next
//! animation frame". The host calls [`FrameScheduler::begin_frame`] at each
//! paint opportunity and runs the returned tasks.
//!
//! # Invariants
//!
//! 1. A task requested during frame `n` (or between frames `n-1` and `n`)
//!    runs in frame `n + 1`'s batch at the earliest, never in the batch that
//!    is currently executing.
//! 2. Tasks run in request order.
//! 3. A task runs exactly once.

/// Tasks scheduled for the next frame.
#[derive(Debug)]
pub struct FrameScheduler<T> {
    pending: Vec<T>,
    frames: u64,
}

/// Tasks released for one frame.
#[derive(Debug)]
pub struct FrameBatch<T> {
    /// Frame number, starting at 1.
    pub frame: u64,
    pub tasks: Vec<T>,
}

impl<T> FrameScheduler<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: Vec::new(),
            frames: 0,
        }
    }

    /// Defer `task` to the next frame.
    pub fn request(&mut self, task: T) {
        self.pending.push(task);
    }

    /// Whether anything is waiting for a frame.
    #[inline]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Number of frames begun so far.
    #[inline]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Start a frame, taking every task requested before this call.
    ///
    /// Tasks requested while the batch executes land in the next frame.
    pub fn begin_frame(&mut self) -> FrameBatch<T> {
        self.frames += 1;
        FrameBatch {
            frame: self.frames,
            tasks: std::mem::take(&mut self.pending),
        }
    }
}

impl<T> Default for FrameScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_runs_before_a_frame() {
        let mut frames = FrameScheduler::new();
        frames.request("play");
        assert!(frames.has_pending());
        assert_eq!(frames.frames(), 0);
    }

    #[test]
    fn batch_holds_tasks_in_request_order() {
        let mut frames = FrameScheduler::new();
        frames.request(1);
        frames.request(2);
        let batch = frames.begin_frame();
        assert_eq!(batch.frame, 1);
        assert_eq!(batch.tasks, vec![1, 2]);
        assert!(!frames.has_pending());
    }

    #[test]
    fn requests_during_a_frame_defer_to_the_next() {
        let mut frames = FrameScheduler::new();
        frames.request("a");
        let batch = frames.begin_frame();
        for _ in batch.tasks {
            frames.request("b");
        }
        assert_eq!(frames.pending(), 1);
        let next = frames.begin_frame();
        assert_eq!(next.frame, 2);
        assert_eq!(next.tasks, vec!["b"]);
    }

    #[test]
    fn empty_frames_still_count() {
        let mut frames: FrameScheduler<()> = FrameScheduler::default();
        assert!(frames.begin_frame().tasks.is_empty());
        assert_eq!(frames.frames(), 1);
    }
}
