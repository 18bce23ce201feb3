use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Symbol pool the decks draw from; a level uses the first `8 + level`
/// entries (capped at the pool size).
pub const SYMBOLS: [&str; 10] = ["🚀", "🌟", "🌈", "🎮", "🍕", "🎯", "🎨", "🔮", "🎸", "🎭"];

/// How long level 1 shows the whole deck face up.
pub const INITIAL_REVEAL_MS: u32 = 1500;
/// The reveal window never shrinks below this.
pub const MIN_REVEAL_MS: u32 = 500;
/// How much each completed level shortens the reveal window.
pub const REVEAL_STEP_MS: u32 = 300;
pub const MAX_LEVEL: u8 = 3;

pub fn pairs_for_level(level: u8) -> usize {
    (8 + level as usize).min(SYMBOLS.len())
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum Phase {
    /// No deck dealt yet.
    Idle,
    /// Whole deck face up; the UI conceals it after the reveal window.
    Revealing,
    Playing,
    /// Deck cleared; waiting for next level or restart.
    Complete,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemoryState {
    pub level: u8,
    pub reveal_ms: u32,
    pub moves: u32,
    pub phase: Phase,
    /// Card symbols by cell index.
    pub cards: Vec<String>,
    /// Face-up, not-yet-matched cells (at most two).
    pub flipped: Vec<usize>,
    pub matched: Vec<[usize; 2]>,
}

impl MemoryState {
    fn fresh() -> Self {
        Self {
            level: 1,
            reveal_ms: INITIAL_REVEAL_MS,
            moves: 0,
            phase: Phase::Idle,
            cards: Vec::new(),
            flipped: Vec::new(),
            matched: Vec::new(),
        }
    }

    pub fn is_matched(&self, index: usize) -> bool {
        self.matched.iter().any(|pair| pair.contains(&index))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum MemoryEvent {
    CardFlipped { index: usize },
    PairMatched { indices: [usize; 2] },
    PairMissed { indices: [usize; 2] },
    LevelComplete { level: u8, moves: u32 },
    AllLevelsComplete { moves: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum MemoryError {
    NotStarted,
    RevealInProgress,
    AwaitingFlipBack,
    CardFaceUp { index: usize },
    IndexOutOfRange { index: usize },
}

/// Timed pair-matching puzzle. All timers live in the UI: it conceals the
/// deck after the reveal window and calls [`flip_back`](MemoryEngine::flip_back)
/// a beat after a mismatch.
pub struct MemoryEngine {
    state: MemoryState,
    rng: SmallRng,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self {
            state: MemoryState::fresh(),
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            state: MemoryState::fresh(),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn state(&self) -> &MemoryState {
        &self.state
    }

    /// Deal a shuffled deck for the current level and enter the reveal phase.
    pub fn start(&mut self) {
        let pairs = pairs_for_level(self.state.level);
        let mut deck: Vec<String> = SYMBOLS[..pairs]
            .iter()
            .flat_map(|symbol| [symbol.to_string(), symbol.to_string()])
            .collect();
        deck.shuffle(&mut self.rng);

        self.state.cards = deck;
        self.state.flipped.clear();
        self.state.matched.clear();
        self.state.moves = 0;
        self.state.phase = Phase::Revealing;
    }

    /// End the reveal window and let play begin.
    pub fn conceal(&mut self) {
        if self.state.phase == Phase::Revealing {
            self.state.phase = Phase::Playing;
        }
    }

    /// Turn a card face up. The second card of a pair settles the attempt.
    pub fn flip(&mut self, index: usize) -> Result<Vec<MemoryEvent>, MemoryError> {
        match self.state.phase {
            Phase::Idle | Phase::Complete => return Err(MemoryError::NotStarted),
            Phase::Revealing => return Err(MemoryError::RevealInProgress),
            Phase::Playing => {}
        }
        if index >= self.state.cards.len() {
            return Err(MemoryError::IndexOutOfRange { index });
        }
        if self.state.flipped.len() == 2 {
            return Err(MemoryError::AwaitingFlipBack);
        }
        if self.state.flipped.contains(&index) || self.state.is_matched(index) {
            return Err(MemoryError::CardFaceUp { index });
        }

        self.state.flipped.push(index);
        let mut events = vec![MemoryEvent::CardFlipped { index }];

        if self.state.flipped.len() == 2 {
            let pair = [self.state.flipped[0], self.state.flipped[1]];
            self.state.moves += 1;
            if self.state.cards[pair[0]] == self.state.cards[pair[1]] {
                self.state.matched.push(pair);
                self.state.flipped.clear();
                events.push(MemoryEvent::PairMatched { indices: pair });
                events.extend(self.check_complete());
            } else {
                // Left face up until the UI's mismatch delay calls flip_back.
                events.push(MemoryEvent::PairMissed { indices: pair });
            }
        }

        Ok(events)
    }

    /// Turn a mismatched pair face down again.
    pub fn flip_back(&mut self) {
        if self.state.flipped.len() == 2 {
            self.state.flipped.clear();
        }
    }

    /// Deal the next level after a win. No-op unless a level was just
    /// completed.
    pub fn next_level(&mut self) {
        if self.state.phase == Phase::Complete {
            self.start();
        }
    }

    /// Back to level 1 with the full reveal window.
    pub fn restart(&mut self) {
        self.state = MemoryState::fresh();
        self.start();
    }

    fn check_complete(&mut self) -> Vec<MemoryEvent> {
        if self.state.matched.len() < self.state.cards.len() / 2 {
            return Vec::new();
        }

        self.state.phase = Phase::Complete;
        let finished = self.state.level;
        let moves = self.state.moves;
        if finished < MAX_LEVEL {
            self.state.level = finished + 1;
            self.state.reveal_ms =
                (self.state.reveal_ms.saturating_sub(REVEAL_STEP_MS)).max(MIN_REVEAL_MS);
            vec![MemoryEvent::LevelComplete {
                level: finished,
                moves,
            }]
        } else {
            vec![MemoryEvent::AllLevelsComplete { moves }]
        }
    }
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find_pair(state: &MemoryState, skip: &[usize]) -> (usize, usize) {
        for a in 0..state.cards.len() {
            if skip.contains(&a) {
                continue;
            }
            for b in (a + 1)..state.cards.len() {
                if !skip.contains(&b) && state.cards[a] == state.cards[b] {
                    return (a, b);
                }
            }
        }
        panic!("deck must contain a pair");
    }

    fn find_mismatch(state: &MemoryState) -> (usize, usize) {
        for a in 0..state.cards.len() {
            for b in (a + 1)..state.cards.len() {
                if state.cards[a] != state.cards[b] {
                    return (a, b);
                }
            }
        }
        panic!("deck must contain a mismatch");
    }

    fn clear_level(engine: &mut MemoryEngine) {
        engine.conceal();
        while engine.state().phase == Phase::Playing {
            let done: Vec<usize> = engine.state().matched.iter().flatten().copied().collect();
            let (a, b) = find_pair(engine.state(), &done);
            engine.flip(a).unwrap();
            engine.flip(b).unwrap();
        }
    }

    #[test]
    fn deck_size_grows_with_level_and_caps() {
        assert_eq!(pairs_for_level(1), 9);
        assert_eq!(pairs_for_level(2), 10);
        assert_eq!(pairs_for_level(3), 10);

        let mut engine = MemoryEngine::with_seed(1);
        engine.start();
        assert_eq!(engine.state().cards.len(), 18);
    }

    #[test]
    fn deck_holds_every_symbol_exactly_twice() {
        let mut engine = MemoryEngine::with_seed(2);
        engine.start();
        for symbol in &SYMBOLS[..9] {
            let copies = engine
                .state()
                .cards
                .iter()
                .filter(|card| card.as_str() == *symbol)
                .count();
            assert_eq!(copies, 2, "symbol {symbol} must appear twice");
        }
    }

    #[test]
    fn same_seed_deals_the_same_deck() {
        let mut first = MemoryEngine::with_seed(42);
        let mut second = MemoryEngine::with_seed(42);
        first.start();
        second.start();
        assert_eq!(first.state().cards, second.state().cards);
    }

    #[test]
    fn flips_are_rejected_until_play_begins() {
        let mut engine = MemoryEngine::with_seed(1);
        assert_eq!(engine.flip(0), Err(MemoryError::NotStarted));

        engine.start();
        assert_eq!(engine.state().phase, Phase::Revealing);
        assert_eq!(engine.flip(0), Err(MemoryError::RevealInProgress));

        engine.conceal();
        assert!(engine.flip(0).is_ok());
    }

    #[test]
    fn matching_pair_is_kept_and_counted_as_one_move() {
        let mut engine = MemoryEngine::with_seed(3);
        engine.start();
        engine.conceal();
        let (a, b) = find_pair(engine.state(), &[]);

        let events = engine.flip(a).unwrap();
        assert_eq!(events, vec![MemoryEvent::CardFlipped { index: a }]);
        assert_eq!(engine.state().moves, 0);

        let events = engine.flip(b).unwrap();
        assert!(events.contains(&MemoryEvent::PairMatched { indices: [a, b] }));
        assert_eq!(engine.state().moves, 1);
        assert!(engine.state().is_matched(a));
        assert!(engine.state().flipped.is_empty());
        // A matched card stays face up and cannot be flipped again.
        assert_eq!(engine.flip(a), Err(MemoryError::CardFaceUp { index: a }));
    }

    #[test]
    fn mismatched_pair_waits_for_flip_back() {
        let mut engine = MemoryEngine::with_seed(4);
        engine.start();
        engine.conceal();
        let (a, b) = find_mismatch(engine.state());

        engine.flip(a).unwrap();
        let events = engine.flip(b).unwrap();
        assert!(events.contains(&MemoryEvent::PairMissed { indices: [a, b] }));
        assert_eq!(engine.state().flipped, vec![a, b]);

        // Third flip is blocked until the UI flips the pair back.
        let other = (0..engine.state().cards.len())
            .find(|i| *i != a && *i != b)
            .unwrap();
        assert_eq!(engine.flip(other), Err(MemoryError::AwaitingFlipBack));

        engine.flip_back();
        assert!(engine.state().flipped.is_empty());
        assert!(engine.flip(other).is_ok());
    }

    #[test]
    fn double_flipping_the_same_card_is_rejected() {
        let mut engine = MemoryEngine::with_seed(5);
        engine.start();
        engine.conceal();
        engine.flip(0).unwrap();
        assert_eq!(engine.flip(0), Err(MemoryError::CardFaceUp { index: 0 }));
        assert_eq!(
            engine.flip(99),
            Err(MemoryError::IndexOutOfRange { index: 99 })
        );
    }

    #[test]
    fn completing_a_level_advances_and_shrinks_the_reveal() {
        let mut engine = MemoryEngine::with_seed(6);
        engine.start();
        clear_level(&mut engine);

        let state = engine.state();
        assert_eq!(state.phase, Phase::Complete);
        assert_eq!(state.level, 2);
        assert_eq!(state.reveal_ms, INITIAL_REVEAL_MS - REVEAL_STEP_MS);

        engine.next_level();
        assert_eq!(engine.state().phase, Phase::Revealing);
        assert_eq!(engine.state().cards.len(), 20);
        assert_eq!(engine.state().moves, 0);
    }

    #[test]
    fn clearing_all_levels_signals_completion() {
        let mut engine = MemoryEngine::with_seed(7);
        engine.start();
        clear_level(&mut engine);
        engine.next_level();
        clear_level(&mut engine);
        engine.next_level();

        engine.conceal();
        let mut last_events = Vec::new();
        while engine.state().phase == Phase::Playing {
            let done: Vec<usize> = engine.state().matched.iter().flatten().copied().collect();
            let (a, b) = find_pair(engine.state(), &done);
            engine.flip(a).unwrap();
            last_events = engine.flip(b).unwrap();
        }
        assert!(last_events
            .iter()
            .any(|event| matches!(event, MemoryEvent::AllLevelsComplete { .. })));
        assert_eq!(engine.state().level, MAX_LEVEL);
        // Reveal window shrank twice: 1500 → 1200 → 900.
        assert_eq!(engine.state().reveal_ms, 900);
    }

    #[test]
    fn restart_returns_to_level_one() {
        let mut engine = MemoryEngine::with_seed(8);
        engine.start();
        clear_level(&mut engine);
        engine.restart();

        let state = engine.state();
        assert_eq!(state.level, 1);
        assert_eq!(state.reveal_ms, INITIAL_REVEAL_MS);
        assert_eq!(state.phase, Phase::Revealing);
        assert_eq!(state.cards.len(), 18);
    }
}
