//! Browser host
//!
//! Frames come from `requestAnimationFrame`; keyboard and resize events are
//! collected by DOM listeners between frames.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlCanvasElement, KeyboardEvent};

use crate::audio::{AudioManager, SoundEffect};
use crate::config::GameConfig;
use crate::consts::TARGET_FRAME_MS;
use crate::renderer::{CanvasPresenter, DrawList, stage_origin};
use crate::scenes::{Frame, Host, SceneKind};
use crate::settings::Settings;
use crate::sim::{Tick, TickInput};
use crate::stage::Stage;

#[derive(Debug, Default)]
struct Controls {
    left: bool,
    right: bool,
    /// Space releases not yet turned into shots
    queued_shots: u32,
    /// M was released since the last frame
    toggle_mute: bool,
    resize: Option<(f32, f32)>,
}

pub struct WebHost {
    config: GameConfig,
    presenter: CanvasPresenter,
    audio: AudioManager,
    settings: Settings,
    controls: Rc<RefCell<Controls>>,
    last_time: Option<f64>,
}

impl WebHost {
    pub fn new(canvas: HtmlCanvasElement, config: GameConfig, settings: &Settings) -> Result<Self, JsValue> {
        let presenter = CanvasPresenter::new(canvas, config.clone())?;
        let mut audio = AudioManager::new();
        audio.apply_settings(settings);

        let controls = Rc::new(RefCell::new(Controls::default()));
        setup_keyboard(controls.clone())?;
        setup_resize(controls.clone())?;

        // Report the initial window size on the first frame
        if let Some(size) = window_size() {
            controls.borrow_mut().resize = Some(size);
        }

        Ok(Self {
            config,
            presenter,
            audio,
            settings: settings.clone(),
            controls,
            last_time: None,
        })
    }

    pub fn presenter_mut(&mut self) -> &mut CanvasPresenter {
        &mut self.presenter
    }
}

impl Host for WebHost {
    async fn next_frame(&mut self) -> Option<Frame> {
        let time = animation_frame().await?;
        let elapsed = match self.last_time {
            Some(last) => time - last,
            None => TARGET_FRAME_MS,
        };
        self.last_time = Some(time);

        let mut controls = self.controls.borrow_mut();
        let fire = controls.queued_shots > 0;
        if fire {
            controls.queued_shots -= 1;
        }
        let resize = controls.resize.take();
        let toggle_mute = std::mem::take(&mut controls.toggle_mute);
        let input = TickInput {
            left: controls.left,
            right: controls.right,
            fire,
        };
        drop(controls);

        if toggle_mute {
            let muted = self.settings.toggle_mute();
            self.audio.apply_settings(&self.settings);
            log::info!("Sound {}", if muted { "muted" } else { "on" });
        }

        if let Some((width, height)) = resize {
            self.presenter.resize(width as u32, height as u32);
        }

        Some(Frame {
            tick: Tick::from_elapsed_ms(elapsed),
            input,
            resize,
        })
    }

    fn present(&mut self, stage: &Stage) {
        let list = DrawList::build(stage, stage_origin(&self.config, stage));
        self.presenter.draw(&list);
    }

    fn play_sound(&mut self, effect: SoundEffect) {
        self.audio.play(effect);
    }

    fn scene_changed(&mut self, kind: SceneKind) {
        if kind == SceneKind::Level {
            // Keyboard input has usually unlocked audio by now
            self.audio.resume();
        }
    }
}

/// Resolve on the next animation frame with its timestamp
async fn animation_frame() -> Option<f64> {
    let window = web_sys::window()?;
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        if let Err(e) = window.request_animation_frame(&resolve) {
            log::warn!("requestAnimationFrame failed: {:?}", e);
        }
    });
    JsFuture::from(promise).await.ok()?.as_f64()
}

fn window_size() -> Option<(f32, f32)> {
    let window = web_sys::window()?;
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Some((width as f32, height as f32))
}

fn setup_keyboard(controls: Rc<RefCell<Controls>>) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

    {
        let controls = controls.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut c = controls.borrow_mut();
            match event.code().as_str() {
                "ArrowLeft" => c.left = true,
                "ArrowRight" => c.right = true,
                "Space" => event.prevent_default(),
                _ => {}
            }
        });
        window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut c = controls.borrow_mut();
            match event.code().as_str() {
                "ArrowLeft" => c.left = false,
                "ArrowRight" => c.right = false,
                "Space" => c.queued_shots += 1,
                "KeyM" => c.toggle_mute = true,
                _ => {}
            }
        });
        window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(())
}

fn setup_resize(controls: Rc<RefCell<Controls>>) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
        if let Some(size) = window_size() {
            controls.borrow_mut().resize = Some(size);
        }
    });
    window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}
