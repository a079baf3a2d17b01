//! Cooperative animation scheduler.
//!
//! Animations never own a loop or a timer. The scheduler asks them to advance
//! one tick at a time and hands every frame to an injected renderer, so the
//! same animation runs against a terminal, a test recorder, or nothing.

use std::time::Duration;

/// Result of advancing an animation by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Continue,
    Finished,
}

/// Something that advances in discrete steps and can describe its current frame.
pub trait Animation {
    type Frame;

    /// Advance one step.
    fn tick(&mut self) -> Tick;

    /// Snapshot of the current state for rendering.
    fn frame(&self) -> Self::Frame;

    /// Delay the scheduler should leave between ticks.
    fn interval(&self) -> Duration;
}

/// Drawing capability for animation frames.
pub trait Render<F> {
    fn render(&mut self, frame: &F);
}

/// Renderer that keeps every frame, for tests and replays.
#[derive(Debug, Default)]
pub struct Recorder<F> {
    pub frames: Vec<F>,
}

impl<F: Clone> Render<F> for Recorder<F> {
    fn render(&mut self, frame: &F) {
        self.frames.push(frame.clone());
    }
}

/// Drives an animation until it finishes or a frame limit is reached.
#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    max_frames: Option<usize>,
    realtime: bool,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self {
            max_frames: None,
            realtime: true,
        }
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop after rendering `frames` frames even if the animation continues.
    #[must_use]
    pub fn max_frames(mut self, frames: usize) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Skip the delay between ticks.
    #[must_use]
    pub fn immediate(mut self) -> Self {
        self.realtime = false;
        self
    }

    /// Run to completion, returning the number of frames rendered.
    ///
    /// The first frame is the animation's initial state; each tick that
    /// continues or finishes produces one more frame.
    pub async fn run<A, R>(&self, animation: &mut A, renderer: &mut R) -> usize
    where
        A: Animation,
        R: Render<A::Frame>,
    {
        let mut rendered = 0;
        renderer.render(&animation.frame());
        rendered += 1;

        loop {
            if self.max_frames.is_some_and(|max| rendered >= max) {
                break;
            }
            if self.realtime {
                tokio::time::sleep(animation.interval()).await;
            }
            let tick = animation.tick();
            renderer.render(&animation.frame());
            rendered += 1;
            if tick == Tick::Finished {
                break;
            }
        }

        tracing::debug!(frames = rendered, "Animation stopped");
        rendered
    }
}
