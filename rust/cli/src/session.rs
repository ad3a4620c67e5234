//! Match orchestration on top of the stateless engine.
//!
//! A [`GameSession`] owns the current [`RoundState`] of a two-seat match,
//! sequences `play_move` and `deal_if_needed`, keeps running totals across
//! rounds and decides the match winner. Round `n` (1-based) is dealt with
//! seed `seed + n`; AI choices in that round draw from the same seed, on a
//! ChaCha stream numbered by the ply, so a restored session keeps making
//! the same choices.
//!
//! [`SharedSession`] puts a session behind a mutex for callers that accept
//! moves from more than one thread.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use scopa_ai::{AIOpponent, AiError};
use scopa_engine::cards::{Card, CardId};
use scopa_engine::deck::{DeckRegistry, load_deck};
use scopa_engine::engine::{deal_if_needed, is_round_over, play_move, score_round, start_round};
use scopa_engine::errors::{DeckError, GameError, StateViolation};
use scopa_engine::game::{PublicView, RoundConfig, RoundState};
use scopa_engine::logger::{MoveRecord, RoundRecord};
use scopa_engine::player::{Move, PlayerId};
use scopa_engine::rules::enumerate_captures;
use scopa_engine::scoring::ScoreBreakdown;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error(transparent)]
    Deck(#[from] DeckError),
    #[error(transparent)]
    Ai(#[from] AiError),
    #[error("Round {0} is still in progress")]
    RoundInProgress(u32),
    #[error("Snapshot rejected: {0}")]
    Snapshot(String),
}

impl From<StateViolation> for SessionError {
    fn from(v: StateViolation) -> Self {
        SessionError::Game(v.into())
    }
}

/// Outcome of one finished round, as archived in the session history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round_number: u32,
    pub seed: u64,
    pub scores: BTreeMap<PlayerId, u32>,
    /// Match totals after this round
    pub totals: BTreeMap<PlayerId, u32>,
    pub breakdown: ScoreBreakdown,
    pub moves: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    players: [PlayerId; 2],
    deck_name: String,
    deck: Vec<Card>,
    config: RoundConfig,
    seed: u64,
    target_score: u32,
    round_number: u32,
    state: Option<RoundState>,
    moves: Vec<MoveRecord>,
    totals: BTreeMap<PlayerId, u32>,
    history: Vec<RoundSummary>,
}

impl GameSession {
    /// Creates a session for `players` in seat order. No round is dealt
    /// until [`GameSession::start_round`].
    pub fn new(
        registry: &DeckRegistry,
        deck_name: &str,
        players: [PlayerId; 2],
        config: RoundConfig,
        seed: u64,
        target_score: u32,
    ) -> Result<Self, SessionError> {
        if players[0] == players[1] {
            return Err(StateViolation::DuplicatePlayer(players[0].clone()).into());
        }
        config.validate()?;
        let deck = load_deck(registry, deck_name)?;
        let totals = players.iter().map(|p| (p.clone(), 0)).collect();
        Ok(Self {
            players,
            deck_name: deck_name.to_string(),
            deck,
            config,
            seed,
            target_score,
            round_number: 0,
            state: None,
            moves: Vec::new(),
            totals,
            history: Vec::new(),
        })
    }

    pub fn players(&self) -> &[PlayerId; 2] {
        &self.players
    }

    pub fn deck_name(&self) -> &str {
        &self.deck_name
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn target_score(&self) -> u32 {
        self.target_score
    }

    /// Rounds started so far; 0 before the first deal.
    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn round_seed(&self) -> u64 {
        self.seed.wrapping_add(u64::from(self.round_number))
    }

    pub fn state(&self) -> Option<&RoundState> {
        self.state.as_ref()
    }

    pub fn totals(&self) -> &BTreeMap<PlayerId, u32> {
        &self.totals
    }

    pub fn history(&self) -> &[RoundSummary] {
        &self.history
    }

    /// Moves applied in the current round, in order.
    pub fn moves(&self) -> &[MoveRecord] {
        &self.moves
    }

    fn active(&self) -> Result<&RoundState, SessionError> {
        self.state
            .as_ref()
            .ok_or_else(|| StateViolation::NoActiveRound.into())
    }

    /// Deals the next round.
    ///
    /// # Errors
    ///
    /// [`SessionError::RoundInProgress`] while the previous round has not
    /// been finished with [`GameSession::finish_round`].
    pub fn start_round(&mut self) -> Result<&RoundState, SessionError> {
        if self.history.len() < self.round_number as usize {
            return Err(SessionError::RoundInProgress(self.round_number));
        }
        let round = self.round_number + 1;
        let seed = self.seed.wrapping_add(u64::from(round));
        let state = start_round(&self.deck, &self.players, self.config.clone(), seed)?;
        self.round_number = round;
        self.moves.clear();
        info!(
            round,
            seed,
            deck = %self.deck_name,
            first = %state.current_player().id(),
            "round started"
        );
        Ok(&*self.state.insert(state))
    }

    /// Applies `mv` for `player`, then deals if both hands ran out.
    ///
    /// A rejected move leaves the session untouched.
    pub fn submit_move(&mut self, player: &PlayerId, mv: &Move) -> Result<&RoundState, SessionError> {
        let state = self.active()?;
        let before = state.player(player).map(|p| p.scopas()).unwrap_or_default();
        let next = match play_move(state, player, &mv.card_id, &mv.capture_ids) {
            Ok(next) => next,
            Err(e) => {
                warn!(
                    round = self.round_number,
                    player = %player,
                    card = %mv.card_id,
                    error = %e,
                    "move rejected"
                );
                return Err(e.into());
            }
        };
        let scopa = next.player(player).map(|p| p.scopas()).unwrap_or_default() > before;
        debug!(
            round = self.round_number,
            player = %player,
            card = %mv.card_id,
            captured = mv.capture_ids.len(),
            scopa,
            "move applied"
        );
        self.moves.push(MoveRecord {
            player_id: player.clone(),
            card_id: mv.card_id.clone(),
            capture_ids: mv.capture_ids.clone(),
            scopa,
        });
        Ok(&*self.state.insert(deal_if_needed(&next)))
    }

    /// Lets `ai` choose and play for whoever is on turn.
    pub fn play_ai_turn(&mut self, ai: &dyn AIOpponent) -> Result<Move, SessionError> {
        let state = self.active()?;
        let actor = state.current_player().id().clone();
        let mut rng = ChaCha20Rng::seed_from_u64(self.round_seed());
        rng.set_stream(self.moves.len() as u64);
        let mv = ai.choose_move(state, &actor, &mut rng)?;
        self.submit_move(&actor, &mv)?;
        Ok(mv)
    }

    /// Capture options for one of `player`'s hand cards, as table card ids.
    /// An empty list means the card can only be discarded.
    pub fn legal_captures(&self, player: &PlayerId, card_id: &CardId) -> Result<Vec<Vec<CardId>>, SessionError> {
        let state = self.active()?;
        let seat = state
            .player(player)
            .ok_or_else(|| StateViolation::UnknownPlayer(player.clone()))?;
        let card = seat.holds(card_id).ok_or_else(|| GameError::CardNotInHand {
            card_id: card_id.clone(),
            player_id: player.clone(),
        })?;
        Ok(enumerate_captures(card.rank(), state.table())
            .into_iter()
            .map(|option| option.iter().map(|c| c.id().clone()).collect())
            .collect())
    }

    pub fn is_round_over(&self) -> bool {
        self.state.as_ref().is_some_and(is_round_over)
    }

    /// Scores the current round, adds it to the match totals and archives it.
    pub fn finish_round(&mut self) -> Result<RoundSummary, SessionError> {
        let scored = score_round(self.active()?)?;
        for (player, points) in scored.scores() {
            *self.totals.entry(player.clone()).or_insert(0) += points;
        }
        let summary = RoundSummary {
            round_number: self.round_number,
            seed: self.round_seed(),
            scores: scored.scores().clone(),
            totals: self.totals.clone(),
            breakdown: ScoreBreakdown::for_state(&scored),
            moves: self.moves.len(),
        };
        info!(
            round = summary.round_number,
            scores = ?summary.scores,
            totals = ?summary.totals,
            "round finished"
        );
        self.history.push(summary.clone());
        self.state = Some(scored);
        Ok(summary)
    }

    pub fn public_view(&self, viewer: &PlayerId) -> Result<PublicView, SessionError> {
        Ok(self.active()?.public_view(viewer)?)
    }

    /// The seat that has reached the target score with a strict lead.
    pub fn winner(&self) -> Option<&PlayerId> {
        let [a, b] = &self.players;
        let sa = self.totals.get(a).copied().unwrap_or_default();
        let sb = self.totals.get(b).copied().unwrap_or_default();
        match sa.max(sb) {
            top if top < self.target_score || sa == sb => None,
            _ if sa > sb => Some(a),
            _ => Some(b),
        }
    }

    /// History record of the last finished round.
    pub fn round_record(&self, round_id: String) -> Option<RoundRecord> {
        let summary = self.history.last()?;
        if summary.round_number != self.round_number {
            return None;
        }
        Some(RoundRecord {
            round_id,
            deck: self.deck_name.clone(),
            seed: summary.seed,
            players: self.players.to_vec(),
            config: self.config.clone(),
            moves: self.moves.clone(),
            scores: summary.scores.clone(),
            breakdown: Some(summary.breakdown.clone()),
            ts: None,
            meta: None,
        })
    }

    /// Serializes the whole session, current round included.
    pub fn export(&self) -> Result<String, SessionError> {
        serde_json::to_string(self).map_err(|e| SessionError::Snapshot(e.to_string()))
    }

    /// Rebuilds a session from [`GameSession::export`] output.
    ///
    /// The round snapshot is validated by the engine on the way in; the
    /// session fields around it are checked for consistency here.
    pub fn restore(json: &str) -> Result<Self, SessionError> {
        let session: GameSession =
            serde_json::from_str(json).map_err(|e| SessionError::Snapshot(e.to_string()))?;
        session.check()?;
        Ok(session)
    }

    fn check(&self) -> Result<(), SessionError> {
        let bad = |msg: String| Err(SessionError::Snapshot(msg));
        if self.players[0] == self.players[1] {
            return bad(format!("duplicate player {}", self.players[0]));
        }
        if self.totals.keys().any(|k| !self.players.contains(k)) {
            return bad("totals name an unknown player".into());
        }
        let ids: HashSet<&CardId> = self.deck.iter().map(Card::id).collect();
        if ids.len() != self.deck.len() {
            return bad("deck holds duplicate cards".into());
        }
        if self.history.len() > self.round_number as usize {
            return bad(format!(
                "{} rounds archived but only {} started",
                self.history.len(),
                self.round_number
            ));
        }
        if let Some(state) = &self.state {
            let seated: Vec<&PlayerId> = state.players().iter().map(|p| p.id()).collect();
            if seated != self.players.iter().collect::<Vec<_>>() {
                return bad("round seats differ from session seats".into());
            }
            if state.all_cards().any(|c| !ids.contains(c.id())) {
                return bad("round holds cards outside the session deck".into());
            }
        }
        self.config.validate()?;
        Ok(())
    }
}

/// A [`GameSession`] shared between threads.
///
/// Each submission takes the lock, validates against the current state and
/// applies in one step, so of two submissions racing on the same position
/// only the first can succeed; the second is judged against the position
/// the first produced.
#[derive(Debug, Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<GameSession>>,
}

impl SharedSession {
    pub fn new(session: GameSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Runs `f` with exclusive access to the session.
    pub fn with<R>(&self, f: impl FnOnce(&mut GameSession) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    pub fn submit_move(&self, player: &PlayerId, mv: &Move) -> Result<RoundState, SessionError> {
        self.with(|s| s.submit_move(player, mv).cloned())
    }

    pub fn snapshot(&self) -> Option<RoundState> {
        self.with(|s| s.state().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::TestLogSubscriber;
    use scopa_ai::create_ai;
    use scopa_engine::deck::NAPOLITANE;
    use scopa_engine::game::Phase;
    use tracing::Level;
    use tracing_subscriber::Registry;
    use tracing_subscriber::layer::SubscriberExt;

    fn session(seed: u64) -> GameSession {
        GameSession::new(
            &DeckRegistry::with_builtin(),
            NAPOLITANE,
            ["human".into(), "cpu".into()],
            RoundConfig::default(),
            seed,
            11,
        )
        .unwrap()
    }

    fn play_out(s: &mut GameSession) {
        let ai = create_ai("greedy").unwrap();
        while !s.is_round_over() {
            s.play_ai_turn(ai.as_ref()).unwrap();
        }
    }

    #[test]
    fn round_n_is_dealt_with_seed_plus_n() {
        let mut s = session(100);
        s.start_round().unwrap();
        let deck = load_deck(&DeckRegistry::with_builtin(), NAPOLITANE).unwrap();
        let expected = start_round(&deck, s.players(), RoundConfig::default(), 101).unwrap();
        assert_eq!(s.state(), Some(&expected));
        assert_eq!(s.round_seed(), 101);
    }

    #[test]
    fn actions_before_a_deal_are_rejected() {
        let mut s = session(1);
        let mv = Move::discard("napolitane::oro::1".into());
        let err = s.submit_move(&"human".into(), &mv).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Game(GameError::InvalidState(StateViolation::NoActiveRound))
        ));
        assert!(s.public_view(&"human".into()).is_err());
        assert!(!s.is_round_over());
    }

    #[test]
    fn duplicate_seats_are_rejected() {
        let err = GameSession::new(
            &DeckRegistry::with_builtin(),
            NAPOLITANE,
            ["same".into(), "same".into()],
            RoundConfig::default(),
            0,
            11,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Game(GameError::InvalidState(StateViolation::DuplicatePlayer(_)))
        ));
    }

    #[test]
    fn cannot_redeal_mid_round() {
        let mut s = session(5);
        s.start_round().unwrap();
        assert!(matches!(s.start_round(), Err(SessionError::RoundInProgress(1))));
    }

    #[test]
    fn rejected_move_leaves_state_alone() {
        let mut s = session(9);
        s.start_round().unwrap();
        let before = s.state().cloned();
        let mover = s.state().unwrap().current_player().id().clone();
        let other: PlayerId = if mover.as_str() == "human" { "cpu".into() } else { "human".into() };
        let card = s.state().unwrap().player(&other).unwrap().hand()[0].id().clone();
        assert!(s.submit_move(&other, &Move::discard(card)).is_err());
        assert_eq!(s.state().cloned(), before);
        assert!(s.moves().is_empty());
    }

    #[test]
    fn full_round_accumulates_totals() {
        let mut s = session(21);
        s.start_round().unwrap();
        play_out(&mut s);
        assert_eq!(s.moves().len(), 36);
        let summary = s.finish_round().unwrap();
        assert_eq!(summary.round_number, 1);
        assert_eq!(summary.totals, summary.scores);
        assert_eq!(s.state().unwrap().phase(), Phase::Finished);
        assert_eq!(summary.breakdown.totals, summary.scores);

        // finishing twice is refused and does not double count
        assert!(s.finish_round().is_err());
        assert_eq!(s.totals(), &summary.totals);

        s.start_round().unwrap();
        play_out(&mut s);
        let second = s.finish_round().unwrap();
        for p in s.players() {
            assert_eq!(second.totals[p], summary.scores[p] + second.scores[p]);
        }
        assert_eq!(s.history().len(), 2);
    }

    #[test]
    fn legal_captures_lists_table_ids() {
        let mut s = session(3);
        s.start_round().unwrap();
        let state = s.state().unwrap().clone();
        let me = state.current_player().id().clone();
        for card in state.current_player().hand() {
            let options = s.legal_captures(&me, card.id()).unwrap();
            for option in options {
                assert!(option.iter().all(|id| state.table().iter().any(|c| c.id() == id)));
            }
        }
        let err = s.legal_captures(&me, &"napolitane::nowhere::1".into()).unwrap_err();
        assert!(matches!(err, SessionError::Game(GameError::CardNotInHand { .. })));
    }

    #[test]
    fn winner_needs_target_and_strict_lead() {
        let mut s = session(0);
        s.totals.insert("human".into(), 11);
        s.totals.insert("cpu".into(), 11);
        assert_eq!(s.winner(), None);
        s.totals.insert("cpu".into(), 12);
        assert_eq!(s.winner(), Some(&"cpu".into()));
        s.totals.insert("cpu".into(), 9);
        s.totals.insert("human".into(), 10);
        assert_eq!(s.winner(), None);
    }

    #[test]
    fn export_and_restore_resume_identically() {
        let ai = create_ai("random").unwrap();
        let mut s = session(77);
        s.start_round().unwrap();
        for _ in 0..7 {
            s.play_ai_turn(ai.as_ref()).unwrap();
        }
        let json = s.export().unwrap();
        let mut back = GameSession::restore(&json).unwrap();
        assert_eq!(back, s);

        let a = s.play_ai_turn(ai.as_ref()).unwrap();
        let b = back.play_ai_turn(ai.as_ref()).unwrap();
        assert_eq!(a, b);
        assert_eq!(s.state(), back.state());
    }

    #[test]
    fn finished_discard_only_round_survives_export() {
        let mut s = session(1);
        s.start_round().unwrap();
        while !s.is_round_over() {
            let state = s.state().unwrap();
            let actor = state.current_player().id().clone();
            let card = state.current_player().hand()[0].id().clone();
            s.submit_move(&actor, &Move::discard(card)).unwrap();
        }
        s.finish_round().unwrap();
        assert_eq!(s.state().unwrap().all_cards().count(), 0);

        let back = GameSession::restore(&s.export().unwrap()).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn restore_rejects_mismatched_seats() {
        let mut s = session(4);
        s.start_round().unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&s.export().unwrap()).unwrap();
        value["players"] = serde_json::json!(["human", "intruder"]);
        let err = GameSession::restore(&value.to_string()).unwrap_err();
        assert!(matches!(err, SessionError::Snapshot(_)));
    }

    #[test]
    fn round_record_replays_the_round() {
        let mut s = session(12);
        s.start_round().unwrap();
        assert!(s.round_record("x".into()).is_none());
        play_out(&mut s);
        let summary = s.finish_round().unwrap();
        let record = s.round_record("20260101-000001".into()).unwrap();
        assert_eq!(record.seed, 13);
        assert_eq!(record.moves.len(), summary.moves);
        assert_eq!(record.scores, summary.scores);
    }

    #[test]
    fn concurrent_submissions_only_one_wins() {
        let mut s = session(31);
        s.start_round().unwrap();
        let state = s.state().unwrap().clone();
        let actor = state.current_player().id().clone();
        let mv = state.legal_moves(&actor).remove(0);
        let shared = SharedSession::new(s);

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let shared = shared.clone();
                let actor = actor.clone();
                let mv = mv.clone();
                std::thread::spawn(move || shared.submit_move(&actor, &mv).is_ok())
            })
            .collect();
        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(wins, 1);
        assert_eq!(shared.with(|s| s.moves().len()), 1);
        assert_ne!(shared.snapshot(), Some(state));
    }

    #[test]
    fn logs_round_lifecycle_and_rejections() {
        let logs = TestLogSubscriber::new();
        let registry = Registry::default().with(logs.clone().into_layer());
        tracing::subscriber::with_default(registry, || {
            let mut s = session(8);
            s.start_round().unwrap();
            let mover = s.state().unwrap().current_player().id().clone();
            let _ = s.submit_move(&mover, &Move::discard("napolitane::nowhere::1".into()));
            play_out(&mut s);
            s.finish_round().unwrap();
        });

        let entries = logs.entries();
        let started = entries.iter().find(|e| e.message == "round started").unwrap();
        assert_eq!(started.level, Level::INFO);
        assert_eq!(started.field("round"), Some("1"));
        let rejected = entries.iter().find(|e| e.message == "move rejected").unwrap();
        assert_eq!(rejected.level, Level::WARN);
        assert!(rejected.field("error").is_some());
        assert!(entries.iter().any(|e| e.message == "move applied"));
        assert!(entries.iter().any(|e| e.message == "round finished"));
    }
}
