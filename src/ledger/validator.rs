//! # Deck Validator
//!
//! Constructed-deck legality. The rule is a size bound on the ledger total;
//! the per-card copy cap is enforced upstream by the ledger itself.
//!
//! The result is persisted on the deck as `is_valid` after every structural
//! mutation (add, remove, bulk replace, create). The flag is a cache of
//! this pure function and is never computed lazily at read time.

/// Minimum legal deck size.
pub const DECK_MIN_CARDS: i64 = 30;

/// Maximum legal deck size.
pub const DECK_MAX_CARDS: i64 = 60;

/// A deck is legal iff its total card count is within [30, 60].
pub fn deck_size_is_legal(total_cards: i64) -> bool {
    (DECK_MIN_CARDS..=DECK_MAX_CARDS).contains(&total_cards)
}

/// User-facing explanation for an invalid deck.
pub fn legality_message(is_valid: bool) -> &'static str {
    if is_valid {
        "Deck is valid"
    } else {
        "Deck must contain between 30 and 60 cards"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legality_boundaries() {
        assert!(!deck_size_is_legal(0));
        assert!(!deck_size_is_legal(29));
        assert!(deck_size_is_legal(30));
        assert!(deck_size_is_legal(45));
        assert!(deck_size_is_legal(60));
        assert!(!deck_size_is_legal(61));
    }
}
