//! Sound output boundary
//!
//! The simulation never plays sound itself. It raises events, the scheduler
//! maps them to [`SoundEffect`]s and hands them to an [`AudioSink`]. On the
//! web the sink synthesizes everything with Web Audio oscillators.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Menu button pressed
    Button,
    /// Timer bubble collected
    Pickup,
    /// Spike hit, run over
    Hit,
}

/// Independent volume channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Music,
    Effects,
}

/// Where sound effects go
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
    /// Volume in 0.0 - 1.0
    fn set_volume(&mut self, channel: Channel, volume: f32);
}

/// Sink for headless runs: remembers volumes and logs what would play
#[derive(Debug, Default)]
pub struct SilentAudio {
    pub music_volume: f32,
    pub fx_volume: f32,
    played: usize,
}

impl SilentAudio {
    /// Number of effects requested so far
    pub fn played(&self) -> usize {
        self.played
    }
}

impl AudioSink for SilentAudio {
    fn play(&mut self, effect: SoundEffect) {
        self.played += 1;
        log::trace!("Sound: {effect:?} at volume {:.2}", self.fx_volume);
    }

    fn set_volume(&mut self, channel: Channel, volume: f32) {
        let volume = volume.clamp(0.0, 1.0);
        match channel {
            Channel::Music => self.music_volume = volume,
            Channel::Effects => self.fx_volume = volume,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web_audio::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web_audio {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, Channel, SoundEffect};

    /// Procedural Web Audio output
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        music_volume: f32,
        fx_volume: f32,
        /// Background pad, started lazily after the first user gesture
        pad: Option<(OscillatorNode, GainNode)>,
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudio {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                music_volume: 0.7,
                fx_volume: 0.7,
                pad: None,
            }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
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

        fn ensure_pad(&mut self, ctx: &AudioContext) {
            if self.pad.is_some() {
                return;
            }
            if let Some((osc, gain)) = Self::create_osc(ctx, 110.0, OscillatorType::Sine) {
                gain.gain().set_value(self.music_volume * 0.05);
                osc.start().ok();
                self.pad = Some((osc, gain));
            }
        }

        /// Short soft click
        fn play_button(ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = Self::create_osc(ctx, 520.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();
            gain.gain().set_value_at_time(vol * 0.25, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.06)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.08).ok();
        }

        /// Rising three-note ding
        fn play_pickup(ctx: &AudioContext, vol: f32) {
            for (i, freq) in [600.0, 800.0, 1000.0].iter().enumerate() {
                let delay = i as f64 * 0.08;
                if let Some((osc, gain)) = Self::create_osc(ctx, *freq, OscillatorType::Sine) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.25, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.2).ok();
                }
            }
        }

        /// Pop and a falling tail
        fn play_hit(ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = Self::create_osc(ctx, 300.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();
            gain.gain().set_value_at_time(vol * 0.4, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.5)
                .ok();
            osc.frequency().set_value_at_time(300.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(40.0, t + 0.5)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.6).ok();
        }
    }

    impl AudioSink for WebAudio {
        fn play(&mut self, effect: SoundEffect) {
            let Some(ctx) = self.ctx.clone() else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            self.ensure_pad(&ctx);

            let vol = self.fx_volume;
            if vol <= 0.0 {
                return;
            }
            match effect {
                SoundEffect::Button => Self::play_button(&ctx, vol),
                SoundEffect::Pickup => Self::play_pickup(&ctx, vol),
                SoundEffect::Hit => Self::play_hit(&ctx, vol),
            }
        }

        fn set_volume(&mut self, channel: Channel, volume: f32) {
            let volume = volume.clamp(0.0, 1.0);
            match channel {
                Channel::Music => {
                    self.music_volume = volume;
                    if let Some((_, gain)) = &self.pad {
                        gain.gain().set_value(volume * 0.05);
                    }
                }
                Channel::Effects => self.fx_volume = volume,
            }
        }
    }
}
