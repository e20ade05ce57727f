//! Scale and keyboard lookup tables.
//!
//! Scales are written as numbered degrees (`"1 2 b3 4 5"`) relative to the
//! tonic; a keyboard is that scale repeated over a range of octaves with the
//! octave number appended (`"Eb4"`).

use std::fmt;
use std::str::FromStr;

const LETTERS: [NoteLetter; 7] = [
    NoteLetter::C,
    NoteLetter::D,
    NoteLetter::E,
    NoteLetter::F,
    NoteLetter::G,
    NoteLetter::A,
    NoteLetter::B,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoteLetter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

const NATURAL_SEMITONES: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];

impl NoteLetter {
    fn index(self) -> usize {
        LETTERS.iter().position(|&l| l == self).unwrap_or(0)
    }

    /// Semitones above C.
    pub fn semitone(self) -> i32 {
        NATURAL_SEMITONES[self.index()]
    }
}

impl fmt::Display for NoteLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NoteLetter::C => "C",
            NoteLetter::D => "D",
            NoteLetter::E => "E",
            NoteLetter::F => "F",
            NoteLetter::G => "G",
            NoteLetter::A => "A",
            NoteLetter::B => "B",
        };
        f.write_str(s)
    }
}

impl FromStr for NoteLetter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "C" => Ok(NoteLetter::C),
            "D" => Ok(NoteLetter::D),
            "E" => Ok(NoteLetter::E),
            "F" => Ok(NoteLetter::F),
            "G" => Ok(NoteLetter::G),
            "A" => Ok(NoteLetter::A),
            "B" => Ok(NoteLetter::B),
            other => Err(format!("unknown note letter '{}'", other)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scale {
    Major,
    Minor,
    MajorPentatonic,
    MinorPentatonic,
    Blues,
    Dorian,
    Mixolydian,
    HarmonicMinor,
}

impl Scale {
    pub const ALL: [Scale; 8] = [
        Scale::Major,
        Scale::Minor,
        Scale::MajorPentatonic,
        Scale::MinorPentatonic,
        Scale::Blues,
        Scale::Dorian,
        Scale::Mixolydian,
        Scale::HarmonicMinor,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Scale::Major => "major",
            Scale::Minor => "minor",
            Scale::MajorPentatonic => "major pentatonic",
            Scale::MinorPentatonic => "minor pentatonic",
            Scale::Blues => "blues",
            Scale::Dorian => "dorian",
            Scale::Mixolydian => "mixolydian",
            Scale::HarmonicMinor => "harmonic minor",
        }
    }

    fn degrees(self) -> &'static str {
        match self {
            Scale::Major => "1 2 3 4 5 6 7",
            Scale::Minor => "1 2 b3 4 5 b6 b7",
            Scale::MajorPentatonic => "1 2 3 5 6",
            Scale::MinorPentatonic => "1 b3 4 5 b7",
            Scale::Blues => "1 b3 4 #4 5 b7",
            Scale::Dorian => "1 2 b3 4 5 6 b7",
            Scale::Mixolydian => "1 2 3 4 5 6 b7",
            Scale::HarmonicMinor => "1 2 b3 4 5 b6 7",
        }
    }
}

impl FromStr for Scale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Scale::ALL
            .into_iter()
            .find(|scale| scale.name() == wanted)
            .ok_or_else(|| format!("unknown scale '{}'", s))
    }
}

/// Note names of `scale` built on `tonic`, accidentals after the letter (`"Eb"`, `"F#"`).
/// Each degree keeps its own letter, so spellings follow the key.
pub fn get_scale(tonic: NoteLetter, scale: Scale) -> Vec<String> {
    let start = tonic.index();
    scale
        .degrees()
        .split_whitespace()
        .map(|degree| {
            let shift: i32 = degree
                .chars()
                .map(|c| match c {
                    'b' => -1,
                    '#' => 1,
                    _ => 0,
                })
                .sum();
            let number: usize = degree
                .trim_start_matches(['b', '#'])
                .parse()
                .unwrap_or(1);
            let step = number.saturating_sub(1) % LETTERS.len();
            let letter = LETTERS[(start + step) % LETTERS.len()];
            let target = tonic.semitone() + NATURAL_SEMITONES[step] + shift;
            // Smallest signed distance from the natural letter, within an octave.
            let offset = (target - letter.semitone() + 6).rem_euclid(12) - 6;
            let accidental = match offset {
                o if o < 0 => "b".repeat(o.unsigned_abs() as usize),
                o => "#".repeat(o as usize),
            };
            format!("{}{}", letter, accidental)
        })
        .collect()
}

/// The scale repeated for every octave in `low_pitch..=high_pitch`, lowest first.
pub fn get_keyboard(tonic: NoteLetter, scale: Scale, low_pitch: i32, high_pitch: i32) -> Vec<String> {
    let notes = get_scale(tonic, scale);
    (low_pitch..=high_pitch)
        .flat_map(|octave| notes.iter().map(move |note| format!("{}{}", note, octave)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn c_major_pentatonic() {
        assert_eq!(get_scale(NoteLetter::C, Scale::MajorPentatonic), ["C", "D", "E", "G", "A"]);
    }

    #[test]
    fn scale_rotates_to_tonic_and_keeps_accidentals() {
        assert_eq!(get_scale(NoteLetter::A, Scale::Minor), ["A", "B", "C", "D", "E", "F", "G"]);
        assert_eq!(get_scale(NoteLetter::G, Scale::Blues), ["G", "Bb", "C", "C#", "D", "F"]);
        assert_eq!(get_scale(NoteLetter::D, Scale::Major), ["D", "E", "F#", "G", "A", "B", "C#"]);
        assert_eq!(get_scale(NoteLetter::C, Scale::Minor), ["C", "D", "Eb", "F", "G", "Ab", "Bb"]);
    }

    #[test]
    fn keyboard_spans_octaves_in_order() {
        let keyboard = get_keyboard(NoteLetter::C, Scale::MajorPentatonic, 2, 5);
        assert_eq!(keyboard.len(), 20);
        assert_eq!(keyboard.first().map(String::as_str), Some("C2"));
        assert_eq!(keyboard.last().map(String::as_str), Some("A5"));
        assert_eq!(keyboard[5], "C3");
    }

    #[test]
    fn empty_range_gives_empty_keyboard() {
        assert!(get_keyboard(NoteLetter::C, Scale::Major, 5, 2).is_empty());
    }

    #[test]
    fn parse_names() {
        assert_eq!("Major Pentatonic".parse::<Scale>(), Ok(Scale::MajorPentatonic));
        assert!("lydian dominant".parse::<Scale>().is_err());
        assert_eq!("g".parse::<NoteLetter>(), Ok(NoteLetter::G));
        assert!("H".parse::<NoteLetter>().is_err());
    }
}
