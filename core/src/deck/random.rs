use super::*;

/// Deals the first distinct faces as pairs in a uniformly shuffled order.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomDeckGenerator {
    seed: u64,
}

impl RandomDeckGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl DeckGenerator for RandomDeckGenerator {
    fn generate<I: Clone + PartialEq>(self, config: GameConfig, faces: &[I]) -> Result<Deck<I>> {
        use rand::prelude::*;

        let needed = usize::from(config.total_pairs());
        let selected = select_faces(faces, needed)?;
        if faces.len() > needed {
            log::debug!(
                "Using {} of {} supplied face images",
                needed,
                faces.len()
            );
        }

        let mut entries = paired_entries(selected);
        let mut rng = SmallRng::seed_from_u64(self.seed);
        entries.shuffle(&mut rng);
        log::debug!(
            "Dealt {} cards for a {}x{} board, seed: {}",
            entries.len(),
            config.rows(),
            config.cols(),
            self.seed
        );

        Deck::from_entries(config, entries)
    }
}
