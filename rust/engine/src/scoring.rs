use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::cards::{Card, Suit, SETTEBELLO_RANK};
use crate::engine::is_round_over;
use crate::errors::{GameError, StateViolation};
use crate::game::{Phase, PrimieraTable, RoundConfig, RoundState};
use crate::player::{PlayerId, PlayerState};

/// How a finished round's points were earned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Category winners; `None` when the category was tied
    pub most_cards: Option<PlayerId>,
    pub most_coins: Option<PlayerId>,
    pub settebello: Option<PlayerId>,
    pub primiera: Option<PlayerId>,
    pub captured_counts: BTreeMap<PlayerId, u32>,
    pub coin_counts: BTreeMap<PlayerId, u32>,
    pub primiera_totals: BTreeMap<PlayerId, u32>,
    pub scopas: BTreeMap<PlayerId, u32>,
    pub totals: BTreeMap<PlayerId, u32>,
}

impl ScoreBreakdown {
    /// Scores the captured piles of `players` as they stand.
    pub fn compute<'a>(players: impl IntoIterator<Item = &'a PlayerState>, config: &RoundConfig) -> Self {
        let players: Vec<&PlayerState> = players.into_iter().collect();

        let captured_counts = per_player(&players, |p| p.captured().len() as u32);
        let coin_counts = per_player(&players, |p| {
            p.captured().iter().filter(|c| c.suit() == config.coins_suit).count() as u32
        });
        let primiera_totals = per_player(&players, |p| primiera_total(p.captured(), &config.primiera));
        let scopas = per_player(&players, PlayerState::scopas);

        let settebello = players
            .iter()
            .find(|p| {
                p.captured()
                    .iter()
                    .any(|c| c.suit() == config.coins_suit && c.rank() == SETTEBELLO_RANK)
            })
            .map(|p| p.id().clone());

        let most_cards = award_most(&captured_counts);
        let most_coins = award_most(&coin_counts);
        let primiera = award_most(&primiera_totals);

        let mut totals = scopas.clone();
        for winner in [&most_cards, &most_coins, &settebello, &primiera].into_iter().flatten() {
            *totals.entry(winner.clone()).or_insert(0) += 1;
        }

        Self {
            most_cards,
            most_coins,
            settebello,
            primiera,
            captured_counts,
            coin_counts,
            primiera_totals,
            scopas,
            totals,
        }
    }

    /// Breakdown of a state's piles. For a finished round this reproduces
    /// the scores `score_round` wrote.
    pub fn for_state(state: &RoundState) -> Self {
        Self::compute(state.players(), state.config())
    }
}

fn per_player(players: &[&PlayerState], f: impl Fn(&PlayerState) -> u32) -> BTreeMap<PlayerId, u32> {
    players.iter().map(|&p| (p.id().clone(), f(p))).collect()
}

/// Returns the player with the strictly highest count. A tie for the top
/// spot awards nobody.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use scopa_engine::player::PlayerId;
/// use scopa_engine::scoring::award_most;
///
/// let mut counts = BTreeMap::new();
/// counts.insert(PlayerId::from("a"), 21);
/// counts.insert(PlayerId::from("b"), 19);
/// assert_eq!(award_most(&counts), Some(PlayerId::from("a")));
///
/// counts.insert(PlayerId::from("b"), 21);
/// assert_eq!(award_most(&counts), None);
/// ```
pub fn award_most(counts: &BTreeMap<PlayerId, u32>) -> Option<PlayerId> {
    let max = counts.values().copied().max()?;
    let mut leaders = counts.iter().filter(|(_, v)| **v == max);
    let (leader, _) = leaders.next()?;
    if leaders.next().is_some() {
        return None;
    }
    Some(leader.clone())
}

/// Sum over the four suits of the best primiera value held in each suit.
/// A suit with no cards contributes 0.
pub fn primiera_total<'a>(cards: impl IntoIterator<Item = &'a Card>, table: &PrimieraTable) -> u32 {
    let mut best: BTreeMap<Suit, u32> = BTreeMap::new();
    for card in cards {
        let v = table.value(card.rank());
        let slot = best.entry(card.suit()).or_insert(0);
        *slot = (*slot).max(v);
    }
    best.values().sum()
}

/// Closes a round: hands the leftover table to the last capturer, scores
/// the four categories plus sweeps, and moves the state to
/// [`Phase::Finished`].
///
/// # Errors
///
/// - [`StateViolation::AlreadyScored`] if the state is already finished
/// - [`StateViolation::RoundNotOver`] while cards remain in deck or hands
pub fn score_round(state: &RoundState) -> Result<RoundState, GameError> {
    if state.phase() == Phase::Finished {
        return Err(StateViolation::AlreadyScored.into());
    }
    if !is_round_over(state) {
        return Err(StateViolation::RoundNotOver.into());
    }

    let mut next = state.clone();
    next.phase = Phase::Scoring;

    let leftover = std::mem::take(&mut next.table);
    if !leftover.is_empty() {
        let seat = next
            .last_capture_player_id
            .as_ref()
            .and_then(|id| next.seat_of(id));
        // With no capturer in the whole round the leftover is dropped.
        if let Some(seat) = seat {
            if let Some(p) = next.players.get_mut(seat) {
                p.bank(leftover);
            }
        }
    }

    let breakdown = ScoreBreakdown::compute(next.players.iter(), &next.config);
    next.scores = breakdown.totals;
    next.phase = Phase::Finished;
    Ok(next)
}
