//! Theme colour palettes
//!
//! A theme supplies an ordered list of 3 to 7 distinct bubble colours. The
//! engine only ever sees indices into this list.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::BubbleColor;

/// Fewest colours a theme may use
pub const MIN_COLORS: usize = 3;
/// Most colours a theme may use
pub const MAX_COLORS: usize = 7;

/// Rejected palettes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("palette needs at least 3 colors, got {0}")]
    TooFewColors(usize),
    #[error("palette allows at most 7 colors, got {0}")]
    TooManyColors(usize),
    #[error("color label {0:?} appears more than once")]
    DuplicateLabel(String),
}

/// One bubble colour of a theme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub label: String,
    /// CSS hex colour, e.g. `#ef4444`
    pub hex: String,
}

/// Ordered, validated list of colours
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PaletteEntry>", into = "Vec<PaletteEntry>")]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    pub fn new(entries: Vec<PaletteEntry>) -> Result<Self, PaletteError> {
        if entries.len() < MIN_COLORS {
            return Err(PaletteError::TooFewColors(entries.len()));
        }
        if entries.len() > MAX_COLORS {
            return Err(PaletteError::TooManyColors(entries.len()));
        }
        for (i, e) in entries.iter().enumerate() {
            if entries[..i].iter().any(|o| o.label == e.label) {
                return Err(PaletteError::DuplicateLabel(e.label.clone()));
            }
        }
        Ok(Self { entries })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a validated palette
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, color: BubbleColor) -> Option<&PaletteEntry> {
        self.entries.get(color.0 as usize)
    }

    pub fn label(&self, color: BubbleColor) -> Option<&str> {
        self.get(color).map(|e| e.label.as_str())
    }

    /// Colour index for a label
    pub fn color_of(&self, label: &str) -> Option<BubbleColor> {
        self.entries
            .iter()
            .position(|e| e.label == label)
            .map(|i| BubbleColor(i as u8))
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }
}

/// The classic five-colour theme
impl Default for Palette {
    fn default() -> Self {
        let entries = [
            ("Red", "#ef4444"),
            ("Yellow", "#eab308"),
            ("Green", "#22c55e"),
            ("Blue", "#3b82f6"),
            ("Purple", "#a855f7"),
        ]
        .into_iter()
        .map(|(label, hex)| PaletteEntry {
            label: label.to_string(),
            hex: hex.to_string(),
        })
        .collect();
        Self { entries }
    }
}

impl TryFrom<Vec<PaletteEntry>> for Palette {
    type Error = PaletteError;

    fn try_from(entries: Vec<PaletteEntry>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<Palette> for Vec<PaletteEntry> {
    fn from(palette: Palette) -> Self {
        palette.entries
    }
}
