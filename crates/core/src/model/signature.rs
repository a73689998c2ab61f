use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::keys::Key;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Error type for parsing an accidental or answer choice from a token.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unrecognized accidental choice: {raw}")]
pub struct ParseChoiceError {
    raw: String,
}

//
// ─── ACCIDENTAL ───────────────────────────────────────────────────────────────
//

/// A single sharp or flat mark as it appears in a key signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Accidental {
    FSharp,
    CSharp,
    GSharp,
    DSharp,
    ASharp,
    ESharp,
    BFlat,
    EFlat,
    AFlat,
    DFlat,
    GFlat,
    CFlat,
}

impl Accidental {
    /// Sharps in canonical signature order (F♯ C♯ G♯ D♯ A♯ E♯).
    pub const SHARP_ORDER: [Accidental; 6] = [
        Accidental::FSharp,
        Accidental::CSharp,
        Accidental::GSharp,
        Accidental::DSharp,
        Accidental::ASharp,
        Accidental::ESharp,
    ];

    /// Flats in canonical signature order (B♭ E♭ A♭ D♭ G♭ C♭).
    pub const FLAT_ORDER: [Accidental; 6] = [
        Accidental::BFlat,
        Accidental::EFlat,
        Accidental::AFlat,
        Accidental::DFlat,
        Accidental::GFlat,
        Accidental::CFlat,
    ];
}

impl fmt::Display for Accidental {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Accidental::FSharp => "F♯",
            Accidental::CSharp => "C♯",
            Accidental::GSharp => "G♯",
            Accidental::DSharp => "D♯",
            Accidental::ASharp => "A♯",
            Accidental::ESharp => "E♯",
            Accidental::BFlat => "B♭",
            Accidental::EFlat => "E♭",
            Accidental::AFlat => "A♭",
            Accidental::DFlat => "D♭",
            Accidental::GFlat => "G♭",
            Accidental::CFlat => "C♭",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Accidental {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "F♯" | "F#" => Ok(Accidental::FSharp),
            "C♯" | "C#" => Ok(Accidental::CSharp),
            "G♯" | "G#" => Ok(Accidental::GSharp),
            "D♯" | "D#" => Ok(Accidental::DSharp),
            "A♯" | "A#" => Ok(Accidental::ASharp),
            "E♯" | "E#" => Ok(Accidental::ESharp),
            "B♭" | "Bb" => Ok(Accidental::BFlat),
            "E♭" | "Eb" => Ok(Accidental::EFlat),
            "A♭" | "Ab" => Ok(Accidental::AFlat),
            "D♭" | "Db" => Ok(Accidental::DFlat),
            "G♭" | "Gb" => Ok(Accidental::GFlat),
            "C♭" | "Cb" => Ok(Accidental::CFlat),
            other => Err(ParseChoiceError {
                raw: other.to_string(),
            }),
        }
    }
}

//
// ─── KEY SIGNATURE ────────────────────────────────────────────────────────────
//

/// The key signature of a sounding key.
///
/// Either the explicit "All Natural" signature of C, or an ordered sequence of
/// accidentals. Order is significant: signatures follow the canonical
/// circle-of-fifths ordering, and answer comparison is sequence equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeySignature {
    AllNatural,
    Marks(Vec<Accidental>),
}

impl KeySignature {
    /// Signature with no marks at all.
    ///
    /// Distinct from [`KeySignature::AllNatural`]: an empty draft finalizes to
    /// this, and it matches no key's canonical signature.
    #[must_use]
    pub fn empty() -> Self {
        KeySignature::Marks(Vec::new())
    }

    /// The first `count` sharps in canonical order.
    ///
    /// # Panics
    ///
    /// Panics if `count` exceeds 6.
    #[must_use]
    pub fn sharps(count: usize) -> Self {
        KeySignature::Marks(Accidental::SHARP_ORDER[..count].to_vec())
    }

    /// The first `count` flats in canonical order.
    ///
    /// # Panics
    ///
    /// Panics if `count` exceeds 6.
    #[must_use]
    pub fn flats(count: usize) -> Self {
        KeySignature::Marks(Accidental::FLAT_ORDER[..count].to_vec())
    }

    /// The accidental marks, empty for the all-natural signature.
    #[must_use]
    pub fn marks(&self) -> &[Accidental] {
        match self {
            KeySignature::AllNatural => &[],
            KeySignature::Marks(marks) => marks,
        }
    }
}

impl fmt::Display for KeySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySignature::AllNatural => write!(f, "All Natural"),
            KeySignature::Marks(marks) => {
                let mut first = true;
                for mark in marks {
                    if !first {
                        write!(f, " ")?;
                    }
                    write!(f, "{mark}")?;
                    first = false;
                }
                Ok(())
            }
        }
    }
}

impl Key {
    /// The canonical key signature of this key.
    ///
    /// The table is total: every [`Key`] variant has a signature, so the
    /// lookup cannot miss.
    #[must_use]
    pub fn signature(self) -> KeySignature {
        match self {
            Key::C => KeySignature::AllNatural,
            Key::G => KeySignature::sharps(1),
            Key::D => KeySignature::sharps(2),
            Key::A => KeySignature::sharps(3),
            Key::E => KeySignature::sharps(4),
            Key::B => KeySignature::sharps(5),
            Key::FSharp => KeySignature::sharps(6),
            Key::F => KeySignature::flats(1),
            Key::BFlat => KeySignature::flats(2),
            Key::EFlat => KeySignature::flats(3),
            Key::AFlat => KeySignature::flats(4),
            Key::DFlat => KeySignature::flats(5),
            Key::GFlat => KeySignature::flats(6),
        }
    }
}

//
// ─── ANSWER CHOICE ────────────────────────────────────────────────────────────
//

/// One press of an answer button: an accidental or the "All Natural" choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerChoice {
    AllNatural,
    Accidental(Accidental),
}

impl FromStr for AnswerChoice {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if token.eq_ignore_ascii_case("All Natural") || token.eq_ignore_ascii_case("natural") {
            return Ok(AnswerChoice::AllNatural);
        }
        token.parse().map(AnswerChoice::Accidental)
    }
}

//
// ─── ANSWER DRAFT ─────────────────────────────────────────────────────────────
//

/// The user's in-progress answer for the current question.
///
/// Selection rules:
/// - choosing "All Natural" collapses the draft to exactly that, discarding
///   prior accidentals; repeating the choice changes nothing;
/// - accidentals are ignored while the draft is "All Natural" (a natural
///   signature cannot be augmented);
/// - otherwise an accidental is appended once, keeping insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerDraft {
    all_natural: bool,
    marks: Vec<Accidental>,
}

impl AnswerDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one answer-button choice to the draft.
    pub fn choose(&mut self, choice: AnswerChoice) {
        match choice {
            AnswerChoice::AllNatural => {
                self.marks.clear();
                self.all_natural = true;
            }
            AnswerChoice::Accidental(mark) => {
                if self.all_natural {
                    return;
                }
                if !self.marks.contains(&mark) {
                    self.marks.push(mark);
                }
            }
        }
    }

    /// Reset the draft to no selection.
    pub fn clear(&mut self) {
        self.all_natural = false;
        self.marks.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.all_natural && self.marks.is_empty()
    }

    /// Finalize the draft into a signature for comparison.
    #[must_use]
    pub fn signature(&self) -> KeySignature {
        if self.all_natural {
            KeySignature::AllNatural
        } else {
            KeySignature::Marks(self.marks.clone())
        }
    }
}

impl fmt::Display for AnswerDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.signature())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
