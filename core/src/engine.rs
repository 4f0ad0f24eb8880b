use core::fmt;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use web_time::Instant;

use crate::*;

/// Cards currently picked this turn and waiting to be compared or hidden.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    #[default]
    Empty,
    One(Coord2),
    Two(Coord2, Coord2),
}

/// The single deadline that blocks input. Both kinds are never armed together.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PendingTimer {
    #[default]
    None,
    MismatchHide(Instant),
    HintReveal(Instant),
}

impl PendingTimer {
    pub const fn is_armed(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Derived view of the board's state machine.
///
/// Valid transitions:
/// - Idle -> OneSelected (click)
/// - Idle -> PendingHintHide (hint)
/// - OneSelected -> PendingHintHide (hint)
/// - OneSelected -> Idle (match)
/// - OneSelected -> Finished (last match)
/// - OneSelected -> PendingMismatchHide (mismatch)
/// - PendingMismatchHide -> Idle (deadline)
/// - PendingHintHide -> Idle (deadline)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardState {
    Idle,
    OneSelected,
    PendingMismatchHide,
    PendingHintHide,
    Finished,
}

pub struct Board<I> {
    rules: Rules,
    layout: Layout,
    cards: Array2<Card<I>>,
    back: I,
    selection: Selection,
    pending: PendingTimer,
    matched_pairs: CellCount,
    total_pairs: CellCount,
    hints_remaining: u8,
    sound: Box<dyn SoundSink>,
}

impl<I> Board<I> {
    /// Lays the deck out row-major on the grid, every card face-down.
    pub fn new(
        deck: Deck<I>,
        back: I,
        layout: Layout,
        rules: Rules,
        sound: Box<dyn SoundSink>,
    ) -> Result<Self> {
        let config = deck.config();
        let (rows, cols) = config.size;
        if layout.card_side() == 0 {
            let canvas = layout.canvas();
            return Err(GameError::CanvasTooSmall {
                width: canvas.width,
                height: canvas.height,
                rows,
                cols,
            });
        }
        let cells = (0..rows).flat_map(|row| (0..cols).map(move |col| (row, col)));
        let cards: Vec<_> = cells
            .zip(deck.into_entries())
            .map(|(coords, entry)| {
                Card::new(layout.cell_rect(coords), entry.identity, entry.image)
            })
            .collect();
        let cards = Array2::from_shape_vec((rows.into(), cols.into()), cards)
            .map_err(|_| GameError::InvalidBoardShape)?;

        Ok(Self {
            rules,
            layout,
            cards,
            back,
            selection: Selection::Empty,
            pending: PendingTimer::None,
            matched_pairs: 0,
            total_pairs: config.total_pairs(),
            hints_remaining: rules.hint_budget,
            sound,
        })
    }

    /// Deals a fresh board from an asset provider.
    pub fn from_assets<A, G>(
        config: GameConfig,
        assets: &A,
        generator: G,
        canvas: Size,
        rules: Rules,
        sound: Box<dyn SoundSink>,
    ) -> Result<Self>
    where
        A: AssetProvider<Image = I>,
        G: DeckGenerator,
        I: Clone + PartialEq,
    {
        let deck = generator.generate(config, assets.faces())?;
        let layout = Layout::new(canvas, config.size);
        Self::new(deck, assets.back().clone(), layout, rules, sound)
    }

    pub fn state(&self) -> BoardState {
        if self.is_finished() {
            return BoardState::Finished;
        }
        match (self.pending, self.selection) {
            (PendingTimer::MismatchHide(_), _) => BoardState::PendingMismatchHide,
            (PendingTimer::HintReveal(_), _) => BoardState::PendingHintHide,
            (PendingTimer::None, Selection::Empty) => BoardState::Idle,
            // a second pick always resolves immediately or arms the mismatch timer
            (PendingTimer::None, _) => BoardState::OneSelected,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.matched_pairs == self.total_pairs
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cards.dim();
        (
            rows.try_into().unwrap_or(Coord::MAX),
            cols.try_into().unwrap_or(Coord::MAX),
        )
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn pending(&self) -> PendingTimer {
        self.pending
    }

    pub fn matched_pairs(&self) -> CellCount {
        self.matched_pairs
    }

    pub fn total_pairs(&self) -> CellCount {
        self.total_pairs
    }

    pub fn hints_remaining(&self) -> u8 {
        self.hints_remaining
    }

    pub fn card(&self, coords: Coord2) -> Result<&Card<I>> {
        self.cards
            .get(coords.to_nd_index())
            .ok_or(GameError::InvalidCoords)
    }

    /// All cards in storage (row-major) order with their coordinates.
    pub fn cards(&self) -> impl Iterator<Item = (Coord2, &Card<I>)> {
        self.cards
            .indexed_iter()
            .map(|((row, col), card)| ((row as Coord, col as Coord), card))
    }

    /// First card in storage order whose rect contains `point`.
    pub fn card_at(&self, point: Point) -> Option<Coord2> {
        self.cards()
            .find(|(_, card)| card.rect().contains(point))
            .map(|(coords, _)| coords)
    }

    /// Image the renderer should draw for `card` right now.
    pub fn image_for<'a>(&'a self, card: &'a Card<I>) -> &'a I {
        match card.render_face() {
            CardFace::Front => card.image(),
            CardFace::Back => &self.back,
        }
    }

    pub fn handle_click(&mut self, point: Point, now: Instant) -> ClickOutcome {
        if self.pending.is_armed() {
            log::trace!("Click at {:?} ignored, timer pending", point);
            return ClickOutcome::Ignored;
        }
        match self.card_at(point) {
            Some(coords) => self.pick(coords, now),
            None => {
                log::trace!("Click at {:?} hit no card", point);
                ClickOutcome::Ignored
            }
        }
    }

    /// Same as clicking the card at `coords`.
    pub fn reveal_at(&mut self, coords: Coord2, now: Instant) -> Result<ClickOutcome> {
        self.card(coords)?;
        if self.pending.is_armed() {
            log::trace!("Reveal at {:?} ignored, timer pending", coords);
            return Ok(ClickOutcome::Ignored);
        }
        Ok(self.pick(coords, now))
    }

    fn pick(&mut self, coords: Coord2, now: Instant) -> ClickOutcome {
        let card = &mut self.cards[coords.to_nd_index()];
        if card.is_matched() || card.is_flipped() {
            log::trace!("Card at {:?} already face-up", coords);
            return ClickOutcome::Ignored;
        }

        card.reveal();
        self.sound.play(SoundEvent::Flip);
        log::debug!("Revealed card at {:?}, identity: {}", coords, card.identity());

        match self.selection {
            Selection::Empty => {
                self.selection = Selection::One(coords);
                ClickOutcome::Selected
            }
            Selection::One(first) => {
                self.selection = Selection::Two(first, coords);
                self.check_match(first, coords, now)
            }
            // unreachable while the mismatch timer gates input
            Selection::Two(..) => {
                log::warn!("Pick at {:?} with two cards already selected", coords);
                ClickOutcome::Ignored
            }
        }
    }

    fn check_match(&mut self, first: Coord2, second: Coord2, now: Instant) -> ClickOutcome {
        let first_identity = self.cards[first.to_nd_index()].identity();
        let second_identity = self.cards[second.to_nd_index()].identity();

        if first_identity != second_identity {
            let deadline = deadline_after(now, self.rules.mismatch_delay);
            self.pending = PendingTimer::MismatchHide(deadline);
            log::debug!(
                "Mismatch {:?} / {:?}, hiding after {:?}",
                first,
                second,
                self.rules.mismatch_delay
            );
            return ClickOutcome::Mismatched;
        }

        self.cards[first.to_nd_index()].mark_matched();
        self.cards[second.to_nd_index()].mark_matched();
        self.matched_pairs += 1;
        self.selection = Selection::Empty;
        self.sound.play(SoundEvent::Match);
        log::debug!(
            "Matched identity {}, {}/{} pairs",
            first_identity,
            self.matched_pairs,
            self.total_pairs
        );

        if self.is_finished() {
            self.sound.play(SoundEvent::Win);
            log::debug!("Board finished");
            ClickOutcome::Won
        } else {
            ClickOutcome::Matched
        }
    }

    /// Fires the pending timer if its deadline has passed.
    pub fn resolve_timers(&mut self, now: Instant) -> TimerOutcome {
        match self.pending {
            PendingTimer::MismatchHide(deadline) if now >= deadline => {
                if let Selection::Two(first, second) = self.selection {
                    self.cards[first.to_nd_index()].conceal();
                    self.cards[second.to_nd_index()].conceal();
                }
                self.selection = Selection::Empty;
                self.pending = PendingTimer::None;
                log::debug!("Mismatched cards hidden");
                TimerOutcome::MismatchHidden
            }
            PendingTimer::HintReveal(deadline) if now >= deadline => {
                for card in self.cards.iter_mut() {
                    card.conceal();
                }
                // a lone pick went face-down with the rest, so the turn starts over
                if let Selection::One(coords) = self.selection {
                    log::debug!("Dropping selection at {:?} after hint", coords);
                    self.selection = Selection::Empty;
                }
                self.pending = PendingTimer::None;
                log::debug!("Hint expired");
                TimerOutcome::HintExpired
            }
            _ => TimerOutcome::NoChange,
        }
    }

    /// Reveals every unmatched card for the configured hint duration.
    pub fn request_hint(&mut self, now: Instant) -> HintOutcome {
        self.request_hint_for(self.rules.hint_duration, now)
    }

    pub fn request_hint_for(&mut self, duration: Duration, now: Instant) -> HintOutcome {
        if self.hints_remaining == 0 {
            log::trace!("Hint ignored, none left");
            return HintOutcome::NoChange;
        }
        if self.pending.is_armed() {
            log::trace!("Hint ignored, timer pending");
            return HintOutcome::NoChange;
        }

        for card in self.cards.iter_mut() {
            card.reveal();
        }
        self.hints_remaining -= 1;
        self.pending = PendingTimer::HintReveal(deadline_after(now, duration));
        log::debug!("Hint shown for {:?}, {} left", duration, self.hints_remaining);
        HintOutcome::Revealed
    }
}

/// Deadlines past what `Instant` can hold are pulled in to this horizon.
const FAR_FUTURE: Duration = Duration::from_secs(60 * 60 * 24 * 365 * 30);

fn deadline_after(now: Instant, delay: Duration) -> Instant {
    now.checked_add(delay)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

impl<I: fmt::Debug> fmt::Debug for Board<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("rules", &self.rules)
            .field("layout", &self.layout)
            .field("cards", &self.cards)
            .field("back", &self.back)
            .field("selection", &self.selection)
            .field("pending", &self.pending)
            .field("matched_pairs", &self.matched_pairs)
            .field("total_pairs", &self.total_pairs)
            .field("hints_remaining", &self.hints_remaining)
            .finish_non_exhaustive()
    }
}
