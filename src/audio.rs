//! Sound effects
//!
//! Level events map to a small set of effects. In the browser they are
//! synthesised with Web Audio oscillators, so no sound files are needed.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player shot
    Fire,
    /// Enemy hit by a projectile
    EnemyExplode,
    /// Player hit or overrun
    PlayerExplode,
    /// Formation cleared
    Win,
    GameOver,
}

impl SoundEffect {
    pub fn for_event(event: GameEvent) -> Self {
        match event {
            GameEvent::ProjectileFired => SoundEffect::Fire,
            GameEvent::EnemyDestroyed => SoundEffect::EnemyExplode,
            GameEvent::PlayerDestroyed => SoundEffect::PlayerExplode,
            GameEvent::Won => SoundEffect::Win,
            GameEvent::Lost => SoundEffect::GameOver,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::SoundEffect;
    use crate::settings::Settings;

    /// Web Audio synthesiser
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        settings: Settings,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                settings: Settings::default(),
            }
        }

        pub fn apply_settings(&mut self, settings: &Settings) {
            self.settings = settings.clone();
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        pub fn play(&self, effect: SoundEffect) {
            let vol = self.settings.effective_volume();
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Fire => self.play_fire(ctx, vol),
                SoundEffect::EnemyExplode => self.play_explosion(ctx, vol, 0.3),
                SoundEffect::PlayerExplode => self.play_explosion(ctx, vol, 0.6),
                SoundEffect::Win => self.play_jingle(ctx, vol, &[500.0, 600.0, 800.0, 1000.0]),
                SoundEffect::GameOver => self.play_jingle(ctx, vol, &[400.0, 350.0, 300.0, 200.0]),
            }
        }

        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Short descending zap
        fn play_fire(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 900.0, OscillatorType::Square) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.15, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                .ok();
            osc.frequency().set_value_at_time(900.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(200.0, t + 0.12)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }

        /// Low sawtooth boom; `length` in seconds
        fn play_explosion(&self, ctx: &AudioContext, vol: f32, length: f64) {
            let Some((osc, gain)) = self.create_osc(ctx, 100.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.4, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + length)
                .ok();
            osc.frequency().set_value_at_time(100.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(30.0, t + length)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + length + 0.1).ok();
        }

        /// Notes played one after another
        fn play_jingle(&self, ctx: &AudioContext, vol: f32, notes: &[f32]) {
            for (i, freq) in notes.iter().enumerate() {
                let delay = i as f64 * 0.15;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.25, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.3).ok();
                }
            }
        }
    }
}
