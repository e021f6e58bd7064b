//! Palette index assignment for indexed encodes.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::dib::{PALETTE_LEN, PaletteEntry};

/// Where an encode pass starts its palette from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PaletteMode {
    /// Seed with the palette of the original container. Unchanged colors
    /// then map back to their original indices.
    #[default]
    Reuse,
    /// Start empty and collect colors in first-seen order.
    Fresh,
}

/// Assigns palette indices to colors during one encode pass.
///
/// Lookup order: exact match in the current list (first wins), append
/// while fewer than 256 entries, then the nearest entry by Euclidean
/// B,G,R distance, memoized per color.
#[derive(Clone, Debug, Default)]
pub struct PaletteBuilder {
    entries: Vec<PaletteEntry>,
    nearest: BTreeMap<[u8; 3], u8>,
    quantized: usize,
}

impl PaletteBuilder {
    /// An empty palette.
    pub fn new() -> Self {
        Self::default()
    }

    /// A palette seeded from `palette`, keeping at most 256 entries.
    pub fn seeded(palette: &[PaletteEntry]) -> Self {
        Self {
            entries: palette.iter().take(PALETTE_LEN).copied().collect(),
            ..Self::default()
        }
    }

    pub fn with_mode(mode: PaletteMode, original: &[PaletteEntry]) -> Self {
        match mode {
            PaletteMode::Reuse => Self::seeded(original),
            PaletteMode::Fresh => Self::new(),
        }
    }

    /// Index for `color`; only its blue, green and red channels are compared.
    pub fn assign(&mut self, color: PaletteEntry) -> u8 {
        if let Some(index) = self.entries.iter().position(|e| e.same_color(&color)) {
            return index as u8;
        }
        if self.entries.len() < PALETTE_LEN {
            self.entries.push(PaletteEntry::new(color.blue, color.green, color.red));
            return (self.entries.len() - 1) as u8;
        }

        let key = [color.blue, color.green, color.red];
        if let Some(&index) = self.nearest.get(&key) {
            return index;
        }
        let index = self.find_nearest(&color);
        self.nearest.insert(key, index);
        self.quantized += 1;
        index
    }

    /// Squared distance orders exactly like the Euclidean distance; the
    /// strict comparison keeps the first entry on ties.
    fn find_nearest(&self, color: &PaletteEntry) -> u8 {
        let mut best = (u32::MAX, 0usize);
        for (i, e) in self.entries.iter().enumerate() {
            let db = i32::from(e.blue) - i32::from(color.blue);
            let dg = i32::from(e.green) - i32::from(color.green);
            let dr = i32::from(e.red) - i32::from(color.red);
            let d = (db * db + dg * dg + dr * dr) as u32;
            if d < best.0 {
                best = (d, i);
            }
        }
        best.1 as u8
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    /// Distinct colors that had to be mapped to a nearest entry.
    pub fn quantized_colors(&self) -> usize {
        self.quantized
    }

    /// The final palette, zero-padded to exactly 256 entries.
    pub fn finish(mut self) -> Vec<PaletteEntry> {
        if self.quantized > 0 {
            log::debug!(
                "palette full: {} colors mapped to nearest entries",
                self.quantized
            );
        }
        self.entries.resize(PALETTE_LEN, PaletteEntry::default());
        self.entries
    }
}
