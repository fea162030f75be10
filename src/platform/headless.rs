//! Host without a window
//!
//! Produces fixed-length frames from a scripted input source and records
//! what the game presented and played. Drives tests and the native demo.

use crate::audio::SoundEffect;
use crate::consts::TARGET_FRAME_MS;
use crate::renderer::DrawList;
use crate::scenes::{Frame, Host, SceneKind};
use crate::sim::{Tick, TickInput};
use crate::stage::Stage;

type InputScript = Box<dyn FnMut(u64) -> TickInput>;

pub struct HeadlessHost {
    max_frames: u64,
    frame_ms: f64,
    frames: u64,
    presented: u64,
    input: Option<InputScript>,
    resize: Option<(f32, f32)>,
    /// Frames to keep running once an outcome scene is shown
    linger: Option<u64>,
    remaining: Option<u64>,
    sounds: Vec<SoundEffect>,
    scenes: Vec<SceneKind>,
    last_draw: Option<DrawList>,
}

impl HeadlessHost {
    /// Host that stops after `max_frames` frames
    pub fn new(max_frames: u64) -> Self {
        Self {
            max_frames,
            frame_ms: TARGET_FRAME_MS,
            frames: 0,
            presented: 0,
            input: None,
            resize: None,
            linger: None,
            remaining: None,
            sounds: Vec::new(),
            scenes: Vec::new(),
            last_draw: None,
        }
    }

    pub fn with_frame_ms(mut self, frame_ms: f64) -> Self {
        self.frame_ms = frame_ms;
        self
    }

    /// Input for each frame, by frame number (starting at 0)
    pub fn with_input(mut self, script: impl FnMut(u64) -> TickInput + 'static) -> Self {
        self.input = Some(Box::new(script));
        self
    }

    /// Report a viewport of this size on the first frame
    pub fn with_viewport(mut self, width: f32, height: f32) -> Self {
        self.resize = Some((width, height));
        self
    }

    /// Stop `frames` frames after a win or game over screen appears
    pub fn stop_after_outcome(mut self, frames: u64) -> Self {
        self.linger = Some(frames);
        self
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn presented(&self) -> u64 {
        self.presented
    }

    pub fn sounds(&self) -> &[SoundEffect] {
        &self.sounds
    }

    /// Scenes that became active, in order
    pub fn scenes(&self) -> &[SceneKind] {
        &self.scenes
    }

    pub fn last_draw(&self) -> Option<&DrawList> {
        self.last_draw.as_ref()
    }
}

impl Host for HeadlessHost {
    async fn next_frame(&mut self) -> Option<Frame> {
        if self.frames >= self.max_frames || self.remaining == Some(0) {
            return None;
        }
        if let Some(remaining) = &mut self.remaining {
            *remaining -= 1;
        }

        let input = match &mut self.input {
            Some(script) => script(self.frames),
            None => TickInput::default(),
        };
        self.frames += 1;

        Some(Frame {
            tick: Tick::from_elapsed_ms(self.frame_ms),
            input,
            resize: self.resize.take(),
        })
    }

    fn present(&mut self, stage: &Stage) {
        self.presented += 1;
        let viewport = stage.viewport();
        self.last_draw = Some(DrawList::build(stage, viewport / 2.0));
    }

    fn play_sound(&mut self, effect: SoundEffect) {
        self.sounds.push(effect);
    }

    fn scene_changed(&mut self, kind: SceneKind) {
        self.scenes.push(kind);
        if matches!(kind, SceneKind::Win | SceneKind::GameOver) && self.remaining.is_none() {
            self.remaining = self.linger;
        }
    }
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new(u64::MAX)
    }
}
