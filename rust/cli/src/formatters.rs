//! Card, table and score formatters for terminal display.
//!
//! ```rust
//! use scopa_engine::cards::{Card, Suit};
//! use scopa_cli::formatters::{format_card, format_cards};
//!
//! let seven = Card::new(Suit::Oro, 7, "napolitane::oro::7").unwrap();
//! assert_eq!(format_card(&seven), "7 Sette di Oro");
//! assert_eq!(format_cards(std::slice::from_ref(&seven)), "[7 Sette di Oro]");
//! ```

use scopa_engine::cards::{Card, CardId, Suit};
use scopa_engine::player::PlayerId;
use scopa_engine::scoring::ScoreBreakdown;

/// Italian name of a card rank.
pub fn rank_name(rank: u8) -> &'static str {
    match rank {
        1 => "Asso",
        2 => "Due",
        3 => "Tre",
        4 => "Quattro",
        5 => "Cinque",
        6 => "Sei",
        7 => "Sette",
        8 => "Fante",
        9 => "Cavallo",
        10 => "Re",
        _ => "?",
    }
}

pub fn format_suit(suit: Suit) -> &'static str {
    match suit {
        Suit::Bastoni => "Bastoni",
        Suit::Coppe => "Coppe",
        Suit::Oro => "Oro",
        Suit::Spade => "Spade",
    }
}

pub fn format_card(card: &Card) -> String {
    format!("{} {} di {}", card.rank(), rank_name(card.rank()), format_suit(card.suit()))
}

pub fn format_cards(cards: &[Card]) -> String {
    let labels: Vec<String> = cards.iter().map(format_card).collect();
    format!("[{}]", labels.join(", "))
}

/// Label for a card known only by id (`deck::suit::rank`), such as a card
/// the opponent just played. Unparseable ids are shown verbatim.
pub fn format_card_id(id: &CardId) -> String {
    let mut parts = id.as_str().split("::").skip(1);
    let (Some(suit), Some(rank), None) = (parts.next(), parts.next(), parts.next()) else {
        return id.to_string();
    };
    let Some(suit) = Suit::ALL.iter().find(|s| s.as_str() == suit) else {
        return id.to_string();
    };
    match rank.parse::<u8>() {
        Ok(r) => format!("{} {} di {}", r, rank_name(r), format_suit(*suit)),
        Err(_) => id.to_string(),
    }
}

fn winner_label(winner: &Option<PlayerId>) -> String {
    match winner {
        Some(p) => p.to_string(),
        None => "tie".to_string(),
    }
}

/// Multi-line per-category report of a scored round.
pub fn format_breakdown(b: &ScoreBreakdown) -> String {
    let mut lines = vec![
        format!("  Most cards : {}", winner_label(&b.most_cards)),
        format!("  Most coins : {}", winner_label(&b.most_coins)),
        format!("  Settebello : {}", winner_label(&b.settebello)),
        format!("  Primiera   : {}", winner_label(&b.primiera)),
    ];
    for (player, total) in &b.totals {
        lines.push(format!(
            "  {}: {} pts (cards {}, coins {}, primiera {}, scopas {})",
            player,
            total,
            b.captured_counts.get(player).copied().unwrap_or_default(),
            b.coin_counts.get(player).copied().unwrap_or_default(),
            b.primiera_totals.get(player).copied().unwrap_or_default(),
            b.scopas.get(player).copied().unwrap_or_default(),
        ));
    }
    lines.join("\n")
}
