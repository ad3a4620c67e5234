use rand::seq::IndexedRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::collections::BTreeSet;

use scopa_engine::cards::{Card, CardId};
use scopa_engine::deck::{load_deck, DeckRegistry, NAPOLITANE};
use scopa_engine::engine::{deal_if_needed, is_round_over, play_move, score_round, start_round};
use scopa_engine::game::{Phase, RoundConfig, RoundState};
use scopa_engine::player::PlayerId;

fn full_deck() -> Vec<Card> {
    load_deck(&DeckRegistry::with_builtin(), NAPOLITANE).unwrap()
}

fn assert_conserved(state: &RoundState, original: &BTreeSet<CardId>) {
    let ids: Vec<CardId> = state.all_cards().map(|c| c.id().clone()).collect();
    let unique: BTreeSet<CardId> = ids.iter().cloned().collect();
    assert_eq!(ids.len(), unique.len(), "duplicate card in state");
    assert_eq!(&unique, original, "cards lost or invented");
}

/// Plays a whole round picking uniformly among listed moves.
fn play_out(seed: u64) -> (RoundState, BTreeSet<CardId>) {
    let deck = full_deck();
    let original: BTreeSet<CardId> = deck.iter().map(|c| c.id().clone()).collect();
    let seats: [PlayerId; 2] = ["a".into(), "b".into()];
    let mut rng = ChaCha20Rng::seed_from_u64(seed ^ 0x5eed);
    let mut state = start_round(&deck, &seats, RoundConfig::default(), seed).unwrap();
    assert_conserved(&state, &original);

    let mut moves = 0;
    while !is_round_over(&state) {
        let actor = state.current_player().id().clone();
        let options = state.legal_moves(&actor);
        let mv = options.choose(&mut rng).unwrap();
        state = play_move(&state, &actor, &mv.card_id, &mv.capture_ids).unwrap();
        assert_conserved(&state, &original);
        state = deal_if_needed(&state);
        assert_conserved(&state, &original);
        moves += 1;
    }
    assert_eq!(moves, 36, "every dealt card is played exactly once");
    (state, original)
}

#[test]
fn cards_are_conserved_across_seeds() {
    for seed in 0..200 {
        play_out(seed);
    }
}

#[test]
fn terminal_state_after_scoring() {
    for seed in 0..200 {
        let (state, original) = play_out(seed);
        let scored = score_round(&state).unwrap();
        assert_eq!(scored.phase(), Phase::Finished);
        assert!(scored.table().is_empty());
        assert!(scored.deck().is_empty());
        let captured: usize = scored.players().iter().map(|p| p.captured().len()).sum();
        // someone always captures in a full round, so nothing is dropped
        if state.last_capture_player_id().is_some() {
            assert_eq!(captured, 40);
            assert_conserved(&scored, &original);
        }
    }
}

#[test]
fn scores_are_bounded() {
    for seed in 0..100 {
        let (state, _) = play_out(seed);
        let scored = score_round(&state).unwrap();
        let scopas: u32 = scored.players().iter().map(|p| p.scopas()).sum();
        let total: u32 = scored.scores().values().sum();
        // four category points at most, plus sweeps
        assert!(total <= 4 + scopas);
        if state.last_capture_player_id().is_some() {
            assert!(total > scopas, "settebello always goes to someone");
        }
    }
}
