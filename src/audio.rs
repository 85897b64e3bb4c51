//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::sim::{GameEvent, ObjectKind};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Target tapped
    Catch,
    /// Decoy tapped
    Blunder,
    /// Decoy landed
    Splash,
    /// Target landed
    Miss,
    /// Session started
    Start,
    /// Game over
    GameOver,
    /// New high score
    HighScore,
}

impl SoundEffect {
    /// Sound for a gameplay event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Started { .. } => Some(SoundEffect::Start),
            GameEvent::Caught { .. } => Some(SoundEffect::Catch),
            GameEvent::Blunder { .. } => Some(SoundEffect::Blunder),
            GameEvent::Splashed {
                kind: ObjectKind::Target,
                ..
            } => Some(SoundEffect::Miss),
            GameEvent::Splashed {
                kind: ObjectKind::Decoy,
                ..
            } => Some(SoundEffect::Splash),
            GameEvent::GameOver { new_high: true, .. } => Some(SoundEffect::HighScore),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            GameEvent::Spawned { .. } | GameEvent::LifeLost { .. } => None,
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
}

impl AudioManager {
    pub fn new(volume: f32) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: volume.clamp(0.0, 1.0),
        }
    }

    /// Play the sounds for a batch of events
    pub fn play_events(&self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.play(effect);
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        if self.volume <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let vol = self.volume;
        match effect {
            SoundEffect::Catch => {
                self.sweep(ctx, vol * 0.4, 520.0, 1040.0, 0.12, OscillatorType::Sine)
            }
            SoundEffect::Blunder => {
                self.sweep(ctx, vol * 0.4, 180.0, 90.0, 0.25, OscillatorType::Sawtooth)
            }
            SoundEffect::Splash => {
                self.sweep(ctx, vol * 0.15, 300.0, 200.0, 0.08, OscillatorType::Triangle)
            }
            SoundEffect::Miss => {
                self.sweep(ctx, vol * 0.35, 240.0, 120.0, 0.2, OscillatorType::Square)
            }
            SoundEffect::Start => self.arpeggio(ctx, vol * 0.3, &[392.0, 523.25, 659.25]),
            SoundEffect::GameOver => self.arpeggio(ctx, vol * 0.3, &[392.0, 329.63, 261.63]),
            SoundEffect::HighScore => {
                self.arpeggio(ctx, vol * 0.3, &[523.25, 659.25, 783.99, 1046.5])
            }
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

    /// Single tone gliding from `from` to `to` Hz
    fn sweep(
        &self,
        ctx: &AudioContext,
        vol: f32,
        from: f32,
        to: f32,
        secs: f64,
        osc_type: OscillatorType,
    ) {
        let Some((osc, gain)) = self.create_osc(ctx, from, osc_type) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + secs)
            .ok();
        osc.frequency().set_value_at_time(from, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(to, t + secs)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + secs + 0.05).ok();
    }

    /// Short rising or falling note sequence
    fn arpeggio(&self, ctx: &AudioContext, vol: f32, notes: &[f32]) {
        let t0 = ctx.current_time();
        for (i, &freq) in notes.iter().enumerate() {
            let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Triangle) else {
                continue;
            };
            let t = t0 + i as f64 * 0.09;
            gain.gain().set_value_at_time(0.0, t0).ok();
            gain.gain().set_value_at_time(vol, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.25).ok();
        }
    }
}
