use crate::cards::{rank_sum, Card, CardId};
use crate::errors::{CaptureFault, GameError};

/// Enumerates every legal capture for a card of `rank` against `table`.
///
/// When one or more table cards have exactly `rank`, only those single
/// cards are offered and no sum combination is ever returned. Otherwise
/// every subset of two or more cards whose ranks sum to `rank` is returned,
/// shortest first and in table order within the same size. An empty result
/// means the played card can only be discarded.
///
/// # Examples
///
/// ```
/// use scopa_engine::cards::{Card, Suit};
/// use scopa_engine::rules::enumerate_captures;
///
/// let table = vec![
///     Card::new(Suit::Oro, 4, "o4").unwrap(),
///     Card::new(Suit::Oro, 3, "o3").unwrap(),
///     Card::new(Suit::Spade, 7, "s7").unwrap(),
/// ];
///
/// // An exact match hides the 4 + 3 combination.
/// let options = enumerate_captures(7, &table);
/// assert_eq!(options.len(), 1);
/// assert_eq!(options[0][0].id().as_str(), "s7");
///
/// // Without the 7 the sum is the only option.
/// let options = enumerate_captures(7, &table[..2]);
/// assert_eq!(options.len(), 1);
/// assert_eq!(options[0].len(), 2);
/// ```
pub fn enumerate_captures<'a>(rank: u8, table: impl IntoIterator<Item = &'a Card>) -> Vec<Vec<Card>> {
    let table: Vec<&Card> = table.into_iter().collect();

    let exact: Vec<Vec<Card>> = table
        .iter()
        .filter(|c| c.rank() == rank)
        .map(|c| vec![(*c).clone()])
        .collect();
    if !exact.is_empty() {
        return exact;
    }

    let mut found: Vec<Vec<usize>> = Vec::new();
    let mut current = Vec::with_capacity(table.len());
    collect_sums(&table, 0, u32::from(rank), &mut current, &mut found);
    // stable: keeps table order within each size
    found.sort_by_key(Vec::len);

    found
        .into_iter()
        .map(|idxs| idxs.into_iter().map(|i| table[i].clone()).collect())
        .collect()
}

fn collect_sums(
    table: &[&Card],
    start: usize,
    remaining: u32,
    current: &mut Vec<usize>,
    found: &mut Vec<Vec<usize>>,
) {
    for i in start..table.len() {
        let r = u32::from(table[i].rank());
        if r > remaining {
            continue;
        }
        current.push(i);
        if r == remaining {
            if current.len() >= 2 {
                found.push(current.clone());
            }
        } else {
            collect_sums(table, i + 1, remaining - r, current, found);
        }
        current.pop();
    }
}

/// Resolves and checks a proposed capture for a card of `rank`.
///
/// An empty `proposed` is always accepted and means "discard". Otherwise
/// the ids must name distinct cards currently on `table`, their ranks must
/// add up to `rank`, and a multi-card set is refused whenever a single table
/// card already matches `rank`. The priority check runs here as well as in
/// [`enumerate_captures`], since callers are free to propose captures
/// without consulting the enumeration.
///
/// Returns the captured cards in the order they were proposed.
///
/// # Errors
///
/// - [`GameError::InvalidCapture`] with [`CaptureFault::NotOnTable`],
///   [`CaptureFault::DuplicateId`] or [`CaptureFault::WrongSum`]
/// - [`GameError::EqualValuePriority`] naming the card that must be taken
///
/// # Examples
///
/// ```
/// use scopa_engine::cards::{Card, CardId, Suit};
/// use scopa_engine::errors::GameError;
/// use scopa_engine::rules::validate_capture;
///
/// let table = vec![
///     Card::new(Suit::Coppe, 2, "c2").unwrap(),
///     Card::new(Suit::Coppe, 3, "c3").unwrap(),
///     Card::new(Suit::Spade, 5, "s5").unwrap(),
/// ];
///
/// let taken = validate_capture(5, &[CardId::from("s5")], &table).unwrap();
/// assert_eq!(taken.len(), 1);
///
/// let err = validate_capture(5, &["c2".into(), "c3".into()], &table).unwrap_err();
/// assert!(matches!(err, GameError::EqualValuePriority { rank: 5, .. }));
///
/// assert!(validate_capture(5, &[], &table).unwrap().is_empty());
/// ```
pub fn validate_capture<'a>(
    rank: u8,
    proposed: &[CardId],
    table: impl IntoIterator<Item = &'a Card>,
) -> Result<Vec<Card>, GameError> {
    if proposed.is_empty() {
        return Ok(Vec::new());
    }
    let table: Vec<&Card> = table.into_iter().collect();
    let fail = |reason: CaptureFault| GameError::InvalidCapture {
        rank,
        capture_ids: proposed.to_vec(),
        reason,
    };

    for (i, id) in proposed.iter().enumerate() {
        if proposed[..i].contains(id) {
            return Err(fail(CaptureFault::DuplicateId { id: id.clone() }));
        }
    }

    let missing: Vec<CardId> = proposed
        .iter()
        .filter(|id| !table.iter().any(|c| c.id() == *id))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(fail(CaptureFault::NotOnTable { missing }));
    }

    let captured: Vec<Card> = proposed
        .iter()
        .filter_map(|id| table.iter().find(|c| c.id() == id))
        .map(|c| (*c).clone())
        .collect();

    let actual = rank_sum(&captured);
    if actual != u32::from(rank) {
        return Err(fail(CaptureFault::WrongSum {
            expected: u32::from(rank),
            actual,
        }));
    }

    if captured.len() > 1 {
        if let Some(exact) = table.iter().find(|c| c.rank() == rank) {
            return Err(GameError::EqualValuePriority {
                rank,
                matching_id: exact.id().clone(),
            });
        }
    }

    Ok(captured)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Suit;

    fn c(suit: Suit, rank: u8) -> Card {
        Card::new(suit, rank, format!("{suit}{rank}")).unwrap()
    }

    fn ids(options: &[Vec<Card>]) -> Vec<Vec<&str>> {
        options
            .iter()
            .map(|o| o.iter().map(|c| c.id().as_str()).collect())
            .collect()
    }

    #[test]
    fn multiple_exact_matches_are_each_offered() {
        let table = vec![c(Suit::Oro, 6), c(Suit::Spade, 6), c(Suit::Coppe, 2), c(Suit::Coppe, 4)];
        assert_eq!(ids(&enumerate_captures(6, &table)), vec![vec!["oro6"], vec!["spade6"]]);
    }

    #[test]
    fn sums_are_ordered_by_size_then_table_order() {
        let table = vec![
            c(Suit::Oro, 1),
            c(Suit::Oro, 2),
            c(Suit::Coppe, 3),
            c(Suit::Spade, 4),
            c(Suit::Bastoni, 5),
        ];
        let caps = enumerate_captures(6, &table);
        let got = ids(&caps);
        assert_eq!(
            got,
            vec![
                vec!["oro1", "bastoni5"],
                vec!["oro2", "spade4"],
                vec!["oro1", "oro2", "coppe3"],
            ]
        );
    }

    #[test]
    fn equal_rank_cards_give_distinct_options() {
        let table = vec![c(Suit::Oro, 2), c(Suit::Spade, 2), c(Suit::Coppe, 3)];
        let caps = enumerate_captures(5, &table);
        let got = ids(&caps);
        assert_eq!(got, vec![vec!["oro2", "coppe3"], vec!["spade2", "coppe3"]]);
    }

    #[test]
    fn nothing_to_take_yields_empty() {
        let table = vec![c(Suit::Oro, 8), c(Suit::Spade, 9)];
        assert!(enumerate_captures(3, &table).is_empty());
        assert!(enumerate_captures(3, &[]).is_empty());
    }

    #[test]
    fn validate_rejects_duplicates_before_lookup() {
        let table = vec![c(Suit::Oro, 2), c(Suit::Spade, 3)];
        let err = validate_capture(4, &["oro2".into(), "oro2".into()], &table).unwrap_err();
        assert!(matches!(
            err,
            GameError::InvalidCapture {
                reason: CaptureFault::DuplicateId { .. },
                ..
            }
        ));
    }

    #[test]
    fn validate_reports_all_missing_ids() {
        let table = vec![c(Suit::Oro, 2)];
        let err = validate_capture(9, &["x".into(), "oro2".into(), "y".into()], &table).unwrap_err();
        match err {
            GameError::InvalidCapture {
                reason: CaptureFault::NotOnTable { missing },
                capture_ids,
                rank,
            } => {
                assert_eq!(rank, 9);
                assert_eq!(capture_ids.len(), 3);
                assert_eq!(missing, vec![CardId::from("x"), CardId::from("y")]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn validate_checks_sum() {
        let table = vec![c(Suit::Oro, 2), c(Suit::Spade, 3)];
        let err = validate_capture(6, &["oro2".into(), "spade3".into()], &table).unwrap_err();
        assert!(matches!(
            err,
            GameError::InvalidCapture {
                reason: CaptureFault::WrongSum { expected: 6, actual: 5 },
                ..
            }
        ));
        let single = validate_capture(2, &["spade3".into()], &table).unwrap_err();
        assert!(matches!(single, GameError::InvalidCapture { .. }));
    }

    #[test]
    fn validate_keeps_proposal_order() {
        let table = vec![c(Suit::Oro, 2), c(Suit::Spade, 3), c(Suit::Coppe, 1)];
        let got = validate_capture(6, &["coppe1".into(), "spade3".into(), "oro2".into()], &table).unwrap();
        let got: Vec<_> = got.iter().map(|c| c.id().as_str()).collect();
        assert_eq!(got, vec!["coppe1", "spade3", "oro2"]);
    }
}
