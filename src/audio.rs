//! Sound cues
//!
//! The gameplay core only fires cues through [`AudioCues`] and never waits on
//! or branches on the result. On the web the cues are procedurally generated
//! with the Web Audio API; anywhere audio is unavailable they are silent.

#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Dice knocked around by a hard shake
    Hit,
    /// Winning roll
    Success,
}

/// Fire-and-forget cue sink
pub trait AudioCues {
    fn play(&self, effect: SoundEffect);

    fn play_hit(&self) {
        self.play(SoundEffect::Hit);
    }

    fn play_success(&self) {
        self.play(SoundEffect::Success);
    }
}

/// Silent sink for native runs and devices without audio
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioCues for NullAudio {
    fn play(&self, _effect: SoundEffect) {}
}

/// Counts cues so tests can check what fired
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingAudio {
    hits: std::cell::Cell<u32>,
    successes: std::cell::Cell<u32>,
}

#[cfg(test)]
impl RecordingAudio {
    pub fn hits(&self) -> u32 {
        self.hits.get()
    }

    pub fn successes(&self) -> u32 {
        self.successes.get()
    }
}

#[cfg(test)]
impl AudioCues for RecordingAudio {
    fn play(&self, effect: SoundEffect) {
        match effect {
            SoundEffect::Hit => self.hits.set(self.hits.get() + 1),
            SoundEffect::Success => self.successes.set(self.successes.get() + 1),
        }
    }
}

/// Web Audio cue player
#[cfg(target_arch = "wasm32")]
pub struct AudioManager {
    ctx: Option<AudioContext>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

#[cfg(target_arch = "wasm32")]
impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl AudioManager {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Pick up volume and mute from saved settings
    pub fn apply_settings(&mut self, settings: &crate::Settings) {
        self.master_volume = settings.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        self.muted = settings.muted;
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Create an oscillator with gain envelope
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

    /// Dice knock - short woody thump
    fn play_knock(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 180.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.5, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.08)
            .ok();
        osc.frequency().set_value_at_time(180.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(70.0, t + 0.08)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.1).ok();
    }

    /// Win - rising chime
    fn play_chime(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [523.0, 659.0, 784.0, 1047.0].iter().enumerate() {
            let delay = i as f64 * 0.09;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.35)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.4).ok();
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl AudioCues for AudioManager {
    fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Hit => self.play_knock(ctx, vol),
            SoundEffect::Success => self.play_chime(ctx, vol),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_methods_route_to_play() {
        let audio = RecordingAudio::default();
        audio.play_hit();
        audio.play_hit();
        audio.play_success();
        assert_eq!(audio.hits(), 2);
        assert_eq!(audio.successes(), 1);
    }

    #[test]
    fn test_null_audio_is_silent() {
        let audio: &dyn AudioCues = &NullAudio;
        audio.play_success();
    }
}
