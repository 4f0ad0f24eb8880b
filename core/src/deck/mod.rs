use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::*;
pub use random::*;

mod random;

pub trait DeckGenerator {
    fn generate<I: Clone + PartialEq>(self, config: GameConfig, faces: &[I]) -> Result<Deck<I>>;
}

/// One card's worth of a deck: the pair key and the face drawn for it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeckEntry<I> {
    pub identity: Identity,
    pub image: I,
}

impl<I> DeckEntry<I> {
    pub fn new(identity: Identity, image: I) -> Self {
        Self { identity, image }
    }
}

/// Entries in row-major grid order, every identity present exactly twice.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Deck<I> {
    config: GameConfig,
    entries: Vec<DeckEntry<I>>,
}

impl<I> Deck<I> {
    pub fn from_entries(config: GameConfig, entries: Vec<DeckEntry<I>>) -> Result<Self> {
        if entries.len() != usize::from(config.total_cells()) {
            return Err(GameError::InvalidBoardShape);
        }

        let mut counts: HashMap<Identity, u8> = HashMap::with_capacity(entries.len() / 2);
        for entry in &entries {
            let count = counts.entry(entry.identity).or_default();
            *count = count.saturating_add(1);
        }
        if let Some((&identity, _)) = counts.iter().find(|&(_, &count)| count != 2) {
            return Err(GameError::UnpairedIdentity(identity));
        }

        Ok(Self { config, entries })
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn entries(&self) -> &[DeckEntry<I>] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<DeckEntry<I>> {
        self.entries
    }
}

/// First `needed` distinct faces in supply order; repeats are skipped rather than counted.
pub fn select_faces<I: Clone + PartialEq>(faces: &[I], needed: usize) -> Result<Vec<I>> {
    let mut selected: Vec<I> = Vec::with_capacity(needed);
    for face in faces {
        if selected.len() == needed {
            break;
        }
        if !selected.contains(face) {
            selected.push(face.clone());
        }
    }

    if selected.len() < needed {
        return Err(GameError::InsufficientAssets {
            needed,
            available: selected.len(),
        });
    }
    Ok(selected)
}

/// Face `k` becomes identity `k`, twice, in order.
fn paired_entries<I: Clone>(faces: Vec<I>) -> Vec<DeckEntry<I>> {
    let mut entries = Vec::with_capacity(faces.len() * 2);
    for (identity, image) in (0..).zip(faces) {
        entries.push(DeckEntry::new(identity, image.clone()));
        entries.push(DeckEntry::new(identity, image));
    }
    entries
}
