use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of questions per round-one pass: one per concert key.
pub const QUIZ_LENGTH: usize = ConcertKey::ALL.len();

/// Error type for parsing a key name from a string token.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unrecognized key name: {raw}")]
pub struct ParseKeyError {
    raw: String,
}

/// A concert-pitch key the trainer quizzes on.
///
/// These are the four flat concert pitches common in band literature; the set
/// is fixed and `ALL` is its canonical ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConcertKey {
    F,
    BFlat,
    AFlat,
    EFlat,
}

impl ConcertKey {
    /// Canonical set of concert keys, in table order.
    pub const ALL: [ConcertKey; 4] = [
        ConcertKey::F,
        ConcertKey::BFlat,
        ConcertKey::AFlat,
        ConcertKey::EFlat,
    ];
}

/// A sounding key as written for a specific instrument's part.
///
/// Covers every key the signature table knows: C plus the six sharp keys and
/// the six flat keys around the circle of fifths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    C,
    G,
    D,
    A,
    E,
    B,
    FSharp,
    F,
    BFlat,
    EFlat,
    AFlat,
    DFlat,
    GFlat,
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for ConcertKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConcertKey::F => "F",
            ConcertKey::BFlat => "B♭",
            ConcertKey::AFlat => "A♭",
            ConcertKey::EFlat => "E♭",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Key::C => "C",
            Key::G => "G",
            Key::D => "D",
            Key::A => "A",
            Key::E => "E",
            Key::B => "B",
            Key::FSharp => "F♯",
            Key::F => "F",
            Key::BFlat => "B♭",
            Key::EFlat => "E♭",
            Key::AFlat => "A♭",
            Key::DFlat => "D♭",
            Key::GFlat => "G♭",
        };
        write!(f, "{name}")
    }
}

// ─── FromStr Implementations ───────────────────────────────────────────────────

// Tokens accept the glyph spelling ("B♭") and an ASCII fallback ("Bb").

impl FromStr for ConcertKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "F" => Ok(ConcertKey::F),
            "B♭" | "Bb" => Ok(ConcertKey::BFlat),
            "A♭" | "Ab" => Ok(ConcertKey::AFlat),
            "E♭" | "Eb" => Ok(ConcertKey::EFlat),
            other => Err(ParseKeyError {
                raw: other.to_string(),
            }),
        }
    }
}

impl FromStr for Key {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "C" => Ok(Key::C),
            "G" => Ok(Key::G),
            "D" => Ok(Key::D),
            "A" => Ok(Key::A),
            "E" => Ok(Key::E),
            "B" => Ok(Key::B),
            "F♯" | "F#" => Ok(Key::FSharp),
            "F" => Ok(Key::F),
            "B♭" | "Bb" => Ok(Key::BFlat),
            "E♭" | "Eb" => Ok(Key::EFlat),
            "A♭" | "Ab" => Ok(Key::AFlat),
            "D♭" | "Db" => Ok(Key::DFlat),
            "G♭" | "Gb" => Ok(Key::GFlat),
            other => Err(ParseKeyError {
                raw: other.to_string(),
            }),
        }
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
