//! Sound effects
//!
//! The simulation only names effects; hosts decide how to play them. On
//! wasm32 the `AudioManager` synthesizes them procedurally with the Web Audio
//! API - no external files needed!

use serde::Serialize;

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SoundEffect {
    /// Player fired
    Shoot,
    /// Bullet hit a mushroom
    HitMushroom,
    /// Bullet hit a centipede segment
    HitSegment { head: bool },
    /// Spider shot down
    BonusSpider,
    /// Life lost
    Lose,
    /// Level cleared
    LevelUp,
}

impl SoundEffect {
    /// Effect for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Shot => Some(SoundEffect::Shoot),
            GameEvent::MushroomHit { .. } => Some(SoundEffect::HitMushroom),
            GameEvent::SegmentHit { head, .. } => Some(SoundEffect::HitSegment { head: *head }),
            GameEvent::SpiderDestroyed => Some(SoundEffect::BonusSpider),
            GameEvent::LifeLost { .. } => Some(SoundEffect::Lose),
            GameEvent::LevelUp { .. } => Some(SoundEffect::LevelUp),
            GameEvent::GameOver { .. }
            | GameEvent::GameStarted
            | GameEvent::Paused
            | GameEvent::Resumed => None,
        }
    }
}

/// One channel of white noise in `[-1, 1)`, `duration` seconds long
pub fn noise_samples(sample_rate: f32, duration: f64) -> Vec<f32> {
    let len = (sample_rate as f64 * duration).floor().max(0.0) as usize;
    (0..len)
        .map(|_| rand::random::<f32>() * 2.0 - 1.0)
        .collect()
}

#[cfg(target_arch = "wasm32")]
pub use web_audio::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web_audio {
    use web_sys::{AudioContext, BiquadFilterType, GainNode, OscillatorType};

    use super::SoundEffect;
    use crate::platform::AudioSink;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        master: Option<GainNode>,
        volume: f32,
        muted: bool,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            let master = ctx.as_ref().and_then(|ctx| {
                let gain = ctx.create_gain().ok()?;
                gain.connect_with_audio_node(&ctx.destination()).ok()?;
                Some(gain)
            });
            let mut manager = Self {
                ctx,
                master,
                volume: 0.12,
                muted: false,
            };
            manager.apply_volume();
            manager
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        pub fn set_volume(&mut self, vol: f32) {
            self.volume = vol.clamp(0.0, 1.0);
            self.apply_volume();
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
            self.apply_volume();
        }

        fn apply_volume(&mut self) {
            if let Some(master) = &self.master {
                let vol = if self.muted { 0.0 } else { self.volume };
                master.gain().set_value(vol);
            }
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            if self.muted {
                return;
            }
            let (Some(ctx), Some(master)) = (&self.ctx, &self.master) else {
                return;
            };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            use OscillatorType::{Sawtooth, Square, Triangle};
            match effect {
                SoundEffect::Shoot => self.beep(ctx, master, 880.0, 0.06, Square, None, 0.0),
                SoundEffect::HitMushroom => {
                    self.beep(ctx, master, 220.0, 0.04, Triangle, None, 0.0)
                }
                SoundEffect::HitSegment { head: true } => {
                    self.beep(ctx, master, 660.0, 0.08, Sawtooth, None, 0.0)
                }
                SoundEffect::HitSegment { head: false } => {
                    self.beep(ctx, master, 520.0, 0.06, Sawtooth, None, 0.0)
                }
                SoundEffect::BonusSpider => {
                    self.beep(ctx, master, 900.0, 0.06, Square, None, 0.0);
                    self.beep(ctx, master, 1200.0, 0.08, Square, None, 0.06);
                }
                SoundEffect::Lose => {
                    self.noise(ctx, master, 0.22, 500.0);
                    self.beep(ctx, master, 180.0, 0.2, Triangle, Some(0.4), 0.0);
                }
                SoundEffect::LevelUp => {
                    self.beep(ctx, master, 600.0, 0.08, Square, None, 0.0);
                    self.beep(ctx, master, 760.0, 0.08, Square, None, 0.08);
                    self.beep(ctx, master, 920.0, 0.1, Square, None, 0.16);
                }
            }
        }

        /// One oscillator with an exponential decay, optionally sliding in pitch
        #[allow(clippy::too_many_arguments)]
        fn beep(
            &self,
            ctx: &AudioContext,
            master: &GainNode,
            freq: f32,
            duration: f64,
            wave: OscillatorType,
            slide: Option<f32>,
            delay: f64,
        ) {
            let Ok(osc) = ctx.create_oscillator() else { return };
            let Ok(gain) = ctx.create_gain() else { return };
            let start = ctx.current_time() + delay;

            osc.set_type(wave);
            let _ = osc.frequency().set_value_at_time(freq, start);
            if let Some(slide) = slide {
                let _ = osc
                    .frequency()
                    .exponential_ramp_to_value_at_time((freq * slide).max(40.0), start + duration);
            }
            let _ = gain.gain().set_value_at_time(0.85, start);
            let _ = gain
                .gain()
                .exponential_ramp_to_value_at_time(0.0001, start + duration - 0.002);

            let _ = osc.connect_with_audio_node(&gain);
            let _ = gain.connect_with_audio_node(master);
            let _ = osc.start_with_when(start);
            let _ = osc.stop_with_when(start + duration);
        }

        /// White noise burst through a band-pass filter centred on `band` Hz
        fn noise(&self, ctx: &AudioContext, master: &GainNode, duration: f64, band: f32) {
            let rate = ctx.sample_rate();
            let mut samples = super::noise_samples(rate, duration);
            if samples.is_empty() {
                return;
            }
            let Ok(buffer) = ctx.create_buffer(1, samples.len() as u32, rate) else { return };
            let _ = buffer.copy_to_channel(&mut samples, 0);

            let Ok(src) = ctx.create_buffer_source() else { return };
            let Ok(filter) = ctx.create_biquad_filter() else { return };
            let Ok(gain) = ctx.create_gain() else { return };
            src.set_buffer(Some(&buffer));
            filter.set_type(BiquadFilterType::Bandpass);
            filter.frequency().set_value(band);
            filter.q().set_value(0.5);
            gain.gain().set_value(0.25);

            let _ = src.connect_with_audio_node(&filter);
            let _ = filter.connect_with_audio_node(&gain);
            let _ = gain.connect_with_audio_node(master);
            let start = ctx.current_time();
            let _ = src.start_with_when(start);
            let _ = src.stop_with_when(start + duration);
        }
    }

    impl AudioSink for AudioManager {
        fn play(&mut self, effect: SoundEffect) {
            AudioManager::play(self, effect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Cell;

    #[test]
    fn test_every_audible_event_maps() {
        let cell = Cell::new(1, 1);
        assert_eq!(
            SoundEffect::for_event(&GameEvent::SegmentHit { cell, head: true }),
            Some(SoundEffect::HitSegment { head: true })
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::LifeLost { lives_left: 0 }),
            Some(SoundEffect::Lose)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::LevelUp { level: 4 }),
            Some(SoundEffect::LevelUp)
        );
        assert_eq!(SoundEffect::for_event(&GameEvent::Paused), None);
    }

    #[test]
    fn test_noise_burst_length_and_range() {
        let samples = noise_samples(44_100.0, 0.25);
        assert_eq!(samples.len(), 11_025);
        assert!(samples.iter().all(|s| (-1.0..1.0).contains(s)));
        // Not a constant buffer
        assert!(samples.iter().any(|s| *s != samples[0]));
        assert!(noise_samples(44_100.0, 0.0).is_empty());
    }
}
