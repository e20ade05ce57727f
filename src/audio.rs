//! Note output.
//!
//! The board only knows [`NoteSink`]: a strum hands over a note name such as
//! `"F#4"` and a duration token such as `"8n"`. [`WebAudioSink`] turns that into
//! a short triangle-wave voice on a shared `AudioContext`.

use web_sys::{AudioContext, AudioContextState, OscillatorType};

use crate::error::{Result, SpaghettiError};
use crate::scale::NoteLetter;

/// Tempo used to turn duration tokens into seconds.
pub const BPM: f64 = 120.0;
/// Frequency of `A4`.
pub const CONCERT_PITCH: f64 = 440.0;

// Envelope, in seconds and linear gain.
const ATTACK: f64 = 0.005;
const DECAY: f64 = 0.1;
const SUSTAIN: f32 = 0.3;
const RELEASE: f64 = 1.0;
const PEAK_GAIN: f32 = 0.25;
const SILENCE: f32 = 0.0001;

pub trait NoteSink {
    fn trigger(&mut self, note: &str, duration: &str);

    /// Called from a user gesture; browsers only start audio output then.
    fn wake(&mut self) {}
}

/// Swallows every note.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl NoteSink for NullSink {
    fn trigger(&mut self, _note: &str, _duration: &str) {}
}

/// Equal-tempered frequency of a note name (`"C4"`, `"Eb2"`, `"F##3"`).
pub fn note_frequency(note: &str) -> Option<f64> {
    let note = note.trim();
    let letter: NoteLetter = note.get(..1)?.parse().ok()?;
    let rest = &note[1..];
    let octave_at = rest.find(|c: char| c == '-' || c.is_ascii_digit())?;
    let (accidentals, octave) = rest.split_at(octave_at);
    let mut shift = 0;
    for c in accidentals.chars() {
        match c {
            '#' => shift += 1,
            'b' => shift -= 1,
            _ => return None,
        }
    }
    let octave: i32 = octave.parse().ok()?;
    let midi = (octave + 1) * 12 + letter.semitone() + shift;
    Some(CONCERT_PITCH * 2f64.powf(f64::from(midi - 69) / 12.0))
}

/// Length in seconds of a duration token (`"4n"` is a quarter note).
/// Unknown tokens are a quarter note.
pub fn duration_seconds(token: &str, bpm: f64) -> f64 {
    let quarter = 60.0 / bpm;
    let division = token
        .trim()
        .strip_suffix('n')
        .and_then(|d| d.parse::<u32>().ok())
        .filter(|d| matches!(d, 1 | 2 | 4 | 8 | 16 | 32));
    match division {
        Some(d) => quarter * 4.0 / f64::from(d),
        None => quarter,
    }
}

/// Browser output. The context is created on the first wake, since browsers
/// refuse to start one outside a user gesture.
#[derive(Debug, Default)]
pub struct WebAudioSink {
    context: Option<AudioContext>,
}

impl WebAudioSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn play(&self, context: &AudioContext, frequency: f64, seconds: f64) -> Result<()> {
        let oscillator = context.create_oscillator().map_err(SpaghettiError::audio)?;
        oscillator.set_type(OscillatorType::Triangle);
        oscillator.frequency().set_value(frequency as f32);

        let gain = context.create_gain().map_err(SpaghettiError::audio)?;
        let level = gain.gain();
        let now = context.current_time();
        let held_until = now + seconds.max(ATTACK + DECAY);
        let silent_at = held_until + RELEASE;
        level.set_value_at_time(0.0, now).map_err(SpaghettiError::audio)?;
        level
            .linear_ramp_to_value_at_time(PEAK_GAIN, now + ATTACK)
            .map_err(SpaghettiError::audio)?;
        level
            .linear_ramp_to_value_at_time(PEAK_GAIN * SUSTAIN, now + ATTACK + DECAY)
            .map_err(SpaghettiError::audio)?;
        level
            .set_value_at_time(PEAK_GAIN * SUSTAIN, held_until)
            .map_err(SpaghettiError::audio)?;
        level
            .exponential_ramp_to_value_at_time(SILENCE, silent_at)
            .map_err(SpaghettiError::audio)?;

        oscillator.connect_with_audio_node(&gain).map_err(SpaghettiError::audio)?;
        gain.connect_with_audio_node(&context.destination())
            .map_err(SpaghettiError::audio)?;
        oscillator.start_with_when(now).map_err(SpaghettiError::audio)?;
        oscillator.stop_with_when(silent_at).map_err(SpaghettiError::audio)?;
        Ok(())
    }
}

impl NoteSink for WebAudioSink {
    fn wake(&mut self) {
        if self.context.is_none() {
            match AudioContext::new() {
                Ok(context) => self.context = Some(context),
                Err(err) => {
                    log::warn!("{}", SpaghettiError::audio(err));
                    return;
                }
            }
        }
        if let Some(context) = &self.context {
            if context.state() == AudioContextState::Suspended {
                let _ = context.resume();
            }
        }
    }

    fn trigger(&mut self, note: &str, duration: &str) {
        let Some(context) = &self.context else {
            return;
        };
        let Some(frequency) = note_frequency(note) else {
            log::warn!("spaghetti audio: cannot play '{}'", note);
            return;
        };
        if let Err(err) = self.play(context, frequency, duration_seconds(duration, BPM)) {
            log::warn!("{}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn concert_pitch_and_octaves() {
        assert!(close(note_frequency("A4").unwrap(), 440.0));
        assert!(close(note_frequency("A5").unwrap(), 880.0));
        assert!(close(note_frequency("A2").unwrap(), 110.0));
        assert!(close(note_frequency("C4").unwrap(), 261.625_565));
    }

    #[test]
    fn accidentals_shift_by_semitones() {
        assert!(close(note_frequency("C#4").unwrap(), note_frequency("Db4").unwrap()));
        assert!(close(note_frequency("F##3").unwrap(), note_frequency("G3").unwrap()));
        assert!(close(note_frequency("Cb4").unwrap(), note_frequency("B3").unwrap()));
    }

    #[test]
    fn unparseable_notes() {
        for note in ["", "H4", "C", "Cx4", "4", "C#"] {
            assert_eq!(note_frequency(note), None, "{}", note);
        }
    }

    #[test]
    fn durations_at_120_bpm() {
        assert!(close(duration_seconds("1n", BPM), 2.0));
        assert!(close(duration_seconds("4n", BPM), 0.5));
        assert!(close(duration_seconds("8n", BPM), 0.25));
        assert!(close(duration_seconds("32n", BPM), 0.0625));
        assert!(close(duration_seconds("3n", BPM), 0.5));
        assert!(close(duration_seconds("soon", BPM), 0.5));
    }

    #[test]
    fn sink_without_context_is_silent() {
        let mut sink = WebAudioSink::new();
        sink.trigger("A4", "8n");
        NullSink.trigger("A4", "8n");
    }
}
