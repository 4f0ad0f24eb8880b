use web_time::Instant;

use crate::*;

/// Input the session understands; everything else is the frontend's business.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Click(Point),
    Hint,
}

/// Formats seconds as `mm:ss`, minutes keep growing past an hour.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Values the renderer shows around the grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Hud {
    pub moves: u32,
    pub elapsed_secs: u64,
    pub hints_remaining: u8,
    pub best: BestScores,
    pub finished: bool,
}

impl Hud {
    pub fn elapsed_label(&self) -> String {
        format_clock(self.elapsed_secs)
    }

    pub fn best_time_label(&self) -> Option<String> {
        self.best.best_time.map(format_clock)
    }
}

/// What a single tick did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub hud: Hud,
    pub moves_made: u32,
    pub hint_shown: bool,
    pub timers: TimerOutcome,
    /// The board became finished on this tick.
    pub won: bool,
}

impl Step {
    pub const fn has_update(&self) -> bool {
        self.moves_made > 0 || self.hint_shown || self.timers.has_update() || self.won
    }
}

/// One play-through: owns the board and drives it one tick at a time.
#[derive(Debug)]
pub struct Session<I, C, S> {
    board: Board<I>,
    clock: C,
    scores: S,
    best: BestScores,
    moves: u32,
    started_at: Instant,
    finished_at: Option<Instant>,
}

impl<I, C: Clock, S: ScoreStore> Session<I, C, S> {
    /// Starts the elapsed timer and reads the best-score record once.
    pub fn new(board: Board<I>, clock: C, scores: S) -> Self {
        let best = scores.load().unwrap_or_else(|err| {
            log::warn!("Could not load scores, starting without a best: {}", err);
            BestScores::default()
        });
        log::debug!("Loaded best scores: {:?}", best);
        let started_at = clock.now();

        Self {
            board,
            clock,
            scores,
            best,
            moves: 0,
            started_at,
            finished_at: None,
        }
    }

    pub fn board(&self) -> &Board<I> {
        &self.board
    }

    pub fn scores(&self) -> &S {
        &self.scores
    }

    pub fn best(&self) -> BestScores {
        self.best
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn is_finished(&self) -> bool {
        self.board.is_finished()
    }

    /// Applies `events` in order, then resolves timers and a fresh win against one clock reading.
    pub fn step(&mut self, events: impl IntoIterator<Item = InputEvent>) -> Step {
        let now = self.clock.now();
        let mut moves_made = 0;
        let mut hint_shown = false;

        for event in events {
            match event {
                InputEvent::Click(point) => {
                    if self.board.handle_click(point, now).is_move() {
                        moves_made += 1;
                    }
                }
                InputEvent::Hint => {
                    hint_shown |= self.board.request_hint(now).has_update();
                }
            }
        }
        self.moves = self.moves.saturating_add(moves_made);

        let timers = self.board.resolve_timers(now);

        let won = self.board.is_finished() && self.finished_at.is_none();
        if won {
            self.record_win(now);
        }

        Step {
            hud: self.hud_at(now),
            moves_made,
            hint_shown,
            timers,
            won,
        }
    }

    pub fn hud(&self) -> Hud {
        self.hud_at(self.clock.now())
    }

    fn hud_at(&self, now: Instant) -> Hud {
        Hud {
            moves: self.moves,
            elapsed_secs: self.elapsed_secs(now),
            hints_remaining: self.board.hints_remaining(),
            best: self.best,
            finished: self.board.is_finished(),
        }
    }

    /// Whole seconds since the session started, frozen once the board is finished.
    fn elapsed_secs(&self, now: Instant) -> u64 {
        self.finished_at
            .unwrap_or(now)
            .saturating_duration_since(self.started_at)
            .as_secs()
    }

    fn record_win(&mut self, now: Instant) {
        self.finished_at = Some(now);
        let secs = self.elapsed_secs(now);
        log::info!("Finished in {} moves, {}", self.moves, format_clock(secs));

        if !self.best.improve(self.moves, secs) {
            log::debug!("No new best, record untouched");
            return;
        }
        log::debug!("New best scores: {:?}", self.best);
        if let Err(err) = self.scores.save(&self.best) {
            log::error!("Could not save scores: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    /// A B / A B
    fn abab() -> Board<char> {
        let config = GameConfig::new(2, 2).unwrap();
        let entries = [0, 1, 0, 1]
            .into_iter()
            .map(|identity| DeckEntry::new(identity, if identity == 0 { 'A' } else { 'B' }))
            .collect();
        let deck = Deck::from_entries(config, entries).unwrap();
        let layout = Layout::new(Size::new(900, 700), config.size);
        Board::new(deck, '#', layout, Rules::default(), Box::new(Silent)).unwrap()
    }

    fn session_with(
        scores: InMemoryScores,
    ) -> (Session<char, ManualClock, InMemoryScores>, ManualClock) {
        let clock = ManualClock::default();
        (Session::new(abab(), clock.clone(), scores), clock)
    }

    fn click<S: ScoreStore>(
        session: &Session<char, ManualClock, S>,
        coords: Coord2,
    ) -> InputEvent {
        InputEvent::Click(session.board().layout().cell_rect(coords).center())
    }

    struct BrokenStore;

    impl ScoreStore for BrokenStore {
        fn load(&self) -> core::result::Result<BestScores, ScoreError> {
            Err(std::io::Error::other("disk on fire").into())
        }

        fn save(&mut self, _: &BestScores) -> core::result::Result<(), ScoreError> {
            Err(std::io::Error::other("disk on fire").into())
        }
    }

    #[test]
    fn format_clock_pads_minutes_and_seconds() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(3600), "60:00");
    }

    #[test]
    fn only_consumed_clicks_count_as_moves() {
        let (mut session, _) = session_with(InMemoryScores::default());
        let first = click(&session, (0, 0));

        let step = session.step([first, first, InputEvent::Click(Point::new(-1, -1))]);

        assert_eq!(step.moves_made, 1);
        assert_eq!(session.moves(), 1);
        assert_eq!(step.hud.moves, 1);
    }

    #[test]
    fn timers_resolve_after_input_on_same_tick() {
        let (mut session, clock) = session_with(InMemoryScores::default());
        let a0 = click(&session, (0, 0));
        let b0 = click(&session, (0, 1));
        let a1 = click(&session, (1, 0));

        let step = session.step([a0, b0]);
        assert_eq!(step.timers, TimerOutcome::NoChange);
        assert_eq!(session.board().state(), BoardState::PendingMismatchHide);

        clock.advance(Duration::from_millis(300));
        let step = session.step([a1]);
        assert_eq!(step.moves_made, 0);
        assert_eq!(step.timers, TimerOutcome::NoChange);

        clock.advance(Duration::from_millis(400));
        let step = session.step([a1]);
        // input is handled before the deadline check, so this click is still blocked
        assert_eq!(step.moves_made, 0);
        assert_eq!(step.timers, TimerOutcome::MismatchHidden);
        assert_eq!(session.board().state(), BoardState::Idle);

        let step = session.step([a1]);
        assert_eq!(step.moves_made, 1);
        assert_eq!(session.moves(), 3);
    }

    #[test]
    fn hint_event_spends_a_hint() {
        let (mut session, clock) = session_with(InMemoryScores::default());

        let step = session.step([InputEvent::Hint, InputEvent::Hint]);
        assert!(step.hint_shown);
        assert_eq!(step.hud.hints_remaining, 2);
        assert_eq!(session.board().state(), BoardState::PendingHintHide);

        clock.advance(Duration::from_secs(2));
        let step = session.step([]);
        assert_eq!(step.timers, TimerOutcome::HintExpired);
        assert!(step.has_update());
    }

    #[test]
    fn win_records_best_once() {
        let (mut session, clock) = session_with(InMemoryScores::default());
        let clicks = [(0, 0), (1, 0), (0, 1), (1, 1)].map(|coords| click(&session, coords));

        clock.advance(Duration::from_secs(75));
        let step = session.step(clicks);

        assert!(step.won);
        assert!(step.hud.finished);
        assert_eq!(step.hud.elapsed_label(), "01:15");
        assert_eq!(
            session.scores().scores(),
            BestScores {
                best_moves: Some(4),
                best_time: Some(75)
            }
        );
        assert_eq!(session.scores().saves(), 1);
        assert_eq!(step.hud.best_time_label().as_deref(), Some("01:15"));

        clock.advance(Duration::from_secs(30));
        let step = session.step([]);
        assert!(!step.won);
        assert_eq!(step.hud.elapsed_secs, 75);
        assert_eq!(session.scores().saves(), 1);
    }

    #[test]
    fn win_without_improvement_does_not_save() {
        let best = BestScores {
            best_moves: Some(4),
            best_time: Some(10),
        };
        let (mut session, clock) = session_with(InMemoryScores::new(best));
        let clicks = [(0, 0), (1, 0), (0, 1), (1, 1)].map(|coords| click(&session, coords));

        clock.advance(Duration::from_secs(20));
        let step = session.step(clicks);

        assert!(step.won);
        assert_eq!(session.scores().saves(), 0);
        assert_eq!(session.best(), best);
    }

    #[test]
    fn win_improving_one_field_saves_both() {
        let best = BestScores {
            best_moves: Some(2),
            best_time: Some(500),
        };
        let (mut session, clock) = session_with(InMemoryScores::new(best));
        let clicks = [(0, 0), (1, 0), (0, 1), (1, 1)].map(|coords| click(&session, coords));

        clock.advance(Duration::from_secs(20));
        session.step(clicks);

        assert_eq!(session.scores().saves(), 1);
        assert_eq!(
            session.scores().scores(),
            BestScores {
                best_moves: Some(2),
                best_time: Some(20)
            }
        );
    }

    #[test]
    fn broken_store_never_interrupts_play() {
        let clock = ManualClock::default();
        let mut session = Session::new(abab(), clock.clone(), BrokenStore);
        assert_eq!(session.best(), BestScores::default());

        let clicks = [(0, 0), (1, 0), (0, 1), (1, 1)].map(|coords| click(&session, coords));
        clock.advance(Duration::from_secs(3));
        let step = session.step(clicks);

        assert!(step.won);
        assert_eq!(step.hud.best.best_moves, Some(4));
        assert!(session.is_finished());
    }

    #[test]
    fn elapsed_counts_from_construction() {
        let (session, clock) = session_with(InMemoryScores::default());

        clock.advance(Duration::from_millis(61_900));

        assert_eq!(session.hud().elapsed_secs, 61);
        assert_eq!(session.hud().elapsed_label(), "01:01");
        assert_eq!(session.hud().best_time_label(), None);
    }
}
