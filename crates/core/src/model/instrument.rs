use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::keys::{ConcertKey, Key};

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors for instrument selection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InstrumentError {
    #[error("unknown instrument: {0}")]
    Unknown(String),
}

//
// ─── INSTRUMENT ───────────────────────────────────────────────────────────────
//

/// An instrument the user can practice transposition for.
///
/// Each variant selects a fixed mapping from concert key to the sounding key
/// of that instrument's written part. The identifiers are the trainer's
/// instrument tokens, not real instrument names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instrument {
    /// Sounds a major second below written pitch (concert F is written G).
    Bravo,
    /// Non-transposing: the written part matches concert pitch.
    Charlie,
    /// Sounds a fifth below written pitch (concert F is written C).
    Foxtrot,
    /// Sounds a major sixth below written pitch (concert F is written D).
    Echo,
}

impl Instrument {
    /// Every selectable instrument.
    pub const ALL: [Instrument; 4] = [
        Instrument::Bravo,
        Instrument::Charlie,
        Instrument::Foxtrot,
        Instrument::Echo,
    ];

    /// Maps a concert key to this instrument's sounding key.
    ///
    /// This is the transposition table; it is total over both enums, so every
    /// reachable question has a defined sounding key.
    #[must_use]
    pub fn transpose(self, concert: ConcertKey) -> Key {
        match self {
            Instrument::Bravo => match concert {
                ConcertKey::F => Key::G,
                ConcertKey::BFlat => Key::C,
                ConcertKey::AFlat => Key::BFlat,
                ConcertKey::EFlat => Key::F,
            },
            Instrument::Charlie => match concert {
                ConcertKey::F => Key::F,
                ConcertKey::BFlat => Key::BFlat,
                ConcertKey::AFlat => Key::AFlat,
                ConcertKey::EFlat => Key::EFlat,
            },
            Instrument::Foxtrot => match concert {
                ConcertKey::F => Key::C,
                ConcertKey::BFlat => Key::F,
                ConcertKey::AFlat => Key::EFlat,
                ConcertKey::EFlat => Key::BFlat,
            },
            Instrument::Echo => match concert {
                ConcertKey::F => Key::D,
                ConcertKey::BFlat => Key::G,
                ConcertKey::AFlat => Key::F,
                ConcertKey::EFlat => Key::C,
            },
        }
    }

    /// The lowercase token used to select this instrument.
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            Instrument::Bravo => "bravo",
            Instrument::Charlie => "charlie",
            Instrument::Foxtrot => "foxtrot",
            Instrument::Echo => "echo",
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl FromStr for Instrument {
    type Err = InstrumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bravo" => Ok(Instrument::Bravo),
            "charlie" => Ok(Instrument::Charlie),
            "foxtrot" => Ok(Instrument::Foxtrot),
            "echo" => Ok(Instrument::Echo),
            other => Err(InstrumentError::Unknown(other.to_string())),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
