//! Runtime configuration: defaults merged with JSON overrides, validated once
//! and then only read.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpaghettiError};
use crate::scale::{get_keyboard, NoteLetter, Scale};
use crate::vertex::Physics;

/// Window of string lengths (px) mapped onto the keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HiRange {
    pub start: f64,
    pub end: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Vertices per string including both anchors; at least 3.
    pub total_points: usize,
    /// How slowly a displaced vertex is pulled back; higher is stickier.
    pub viscosity: f64,
    /// Fraction of velocity lost per frame.
    pub damping: f64,
    /// Width of the interactive band across a string.
    #[serde(alias = "mouseDist")]
    pub hitbox_size: f64,
    /// Drags shorter than this (px) do not create a string.
    pub min_string_length: f64,
    pub spaghetti_color: String,
    pub spaghetti_width: f64,
    pub hi_range: HiRange,
    /// Draw hitboxes, control points and vertex readouts.
    pub debug: bool,
    pub with_local_storage: bool,
    pub local_storage_key: String,
    pub with_clear_button: bool,
    pub with_mute_button: bool,
    /// Id of an element to size and host the canvas; the window otherwise.
    pub wrapper: Option<String>,
    pub tonic: String,
    pub scale: String,
    pub low_pitch: i32,
    pub high_pitch: i32,
    /// Duration token passed to the note sink with every strum.
    pub note_duration: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            total_points: 5,
            viscosity: 10.0,
            damping: 0.1,
            hitbox_size: 50.0,
            min_string_length: 30.0,
            spaghetti_color: "#f76c6c".to_string(),
            spaghetti_width: 4.0,
            hi_range: HiRange { start: 0.0, end: 600.0 },
            debug: false,
            with_local_storage: false,
            local_storage_key: "spaghetti".to_string(),
            with_clear_button: false,
            with_mute_button: false,
            wrapper: None,
            tonic: "C".to_string(),
            scale: "major pentatonic".to_string(),
            low_pitch: 2,
            high_pitch: 5,
            note_duration: "8n".to_string(),
        }
    }
}

impl Settings {
    /// Parses a JSON object of overrides; blank input yields the defaults.
    pub fn from_json(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Settings = serde_json::from_str(raw)?;
        settings.validate()
    }

    pub fn validate(self) -> Result<Self> {
        if self.total_points < 3 {
            return Err(SpaghettiError::invalid("totalPoints", "must be at least 3"));
        }
        if !(self.damping > 0.0 && self.damping < 1.0) {
            return Err(SpaghettiError::invalid("damping", "must lie strictly between 0 and 1"));
        }
        let floor = Physics::viscosity_floor(self.damping);
        if !(self.viscosity > floor) {
            return Err(SpaghettiError::invalid(
                "viscosity",
                format!("must be greater than {:.3} at damping {}", floor, self.damping),
            ));
        }
        if !(self.hitbox_size > 0.0) {
            return Err(SpaghettiError::invalid("hitboxSize", "must be greater than 0"));
        }
        if !(self.min_string_length >= 0.0) {
            return Err(SpaghettiError::invalid("minStringLength", "must not be negative"));
        }
        if !(self.hi_range.end > self.hi_range.start) {
            return Err(SpaghettiError::invalid("hiRange", "end must be greater than start"));
        }
        if self.low_pitch > self.high_pitch {
            return Err(SpaghettiError::invalid("lowPitch", "must not exceed highPitch"));
        }
        self.tonic_letter()?;
        self.scale_kind()?;
        Ok(self)
    }

    pub fn physics(&self) -> Physics {
        Physics { damping: self.damping, viscosity: self.viscosity }
    }

    fn tonic_letter(&self) -> Result<NoteLetter> {
        self.tonic.parse().map_err(|reason: String| SpaghettiError::invalid("tonic", reason))
    }

    fn scale_kind(&self) -> Result<Scale> {
        self.scale.parse().map_err(|reason: String| SpaghettiError::invalid("scale", reason))
    }

    /// Notes available to strings, highest first so short strings sound high.
    pub fn keyboard(&self) -> Result<Vec<String>> {
        let mut keyboard =
            get_keyboard(self.tonic_letter()?, self.scale_kind()?, self.low_pitch, self.high_pitch);
        keyboard.reverse();
        Ok(keyboard)
    }
}
