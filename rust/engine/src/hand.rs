use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::cards::Card;

/// Hand categories ordered from weakest to strongest.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Category {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
    /// Ace-high straight flush. Named separately, ranked like any straight flush would be.
    RoyalFlush = 9,
}

impl Category {
    pub fn name(self) -> &'static str {
        match self {
            Category::HighCard => "High Card",
            Category::OnePair => "Pair",
            Category::TwoPair => "Two Pair",
            Category::ThreeOfAKind => "Three of a Kind",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::FullHouse => "Full House",
            Category::FourOfAKind => "Four of a Kind",
            Category::StraightFlush => "Straight Flush",
            Category::RoyalFlush => "Royal Flush",
        }
    }

    fn tiebreak_len(self) -> usize {
        match self {
            Category::HighCard | Category::Flush => 5,
            Category::OnePair => 4,
            Category::TwoPair | Category::ThreeOfAKind => 3,
            Category::FullHouse | Category::FourOfAKind => 2,
            Category::Straight | Category::StraightFlush | Category::RoyalFlush => 1,
        }
    }
}

/// Strength of a five-card hand.
///
/// The derived ordering is the poker ordering: category first, then the
/// kicker ranks lexicographically (most significant first). Two evaluations
/// compare equal exactly when the hands split a pot.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct HandEvaluation {
    pub category: Category,
    // ordered high -> low, zero padded past the category's tiebreak length
    pub kickers: [u8; 5],
}

impl HandEvaluation {
    /// Significant tiebreak ranks for this category, e.g. `[trips, pair]` for a full house.
    pub fn tiebreak(&self) -> &[u8] {
        let n = self.category.tiebreak_len();
        let used = self.kickers.iter().take_while(|&&k| k != 0).count();
        &self.kickers[..n.min(used)]
    }
}

/// Evaluates exactly five cards.
///
/// ```
/// use pokerbench_engine::cards::{Card, Rank, Suit};
/// use pokerbench_engine::hand::{evaluate, Category};
///
/// let wheel = [
///     Card::new(Rank::Ace, Suit::Clubs),
///     Card::new(Rank::Two, Suit::Hearts),
///     Card::new(Rank::Three, Suit::Spades),
///     Card::new(Rank::Four, Suit::Clubs),
///     Card::new(Rank::Five, Suit::Diamonds),
/// ];
/// let e = evaluate(&wheel);
/// assert_eq!(e.category, Category::Straight);
/// assert_eq!(e.tiebreak(), &[5]);
/// ```
pub fn evaluate(cards: &[Card; 5]) -> HandEvaluation {
    classify(cards)
}

/// Best five-card hand from two hole cards plus whatever community cards are showing.
///
/// With seven cards this is the maximum over all 21 five-card subsets. With
/// fewer than five cards in total only rank multiplicity is scored.
pub fn best_hand(hole: &[Card; 2], board: &[Card]) -> HandEvaluation {
    let mut cards = Vec::with_capacity(2 + board.len());
    cards.extend_from_slice(hole);
    cards.extend_from_slice(board);
    best_of(&cards)
}

pub fn best_of(cards: &[Card]) -> HandEvaluation {
    if cards.len() <= 5 {
        return classify(cards);
    }
    five_card_subsets(cards)
        .iter()
        .map(evaluate)
        .max()
        .unwrap_or_else(|| classify(&[]))
}

pub fn compare_hands(a: &HandEvaluation, b: &HandEvaluation) -> Ordering {
    a.cmp(b)
}

/// Every five-card combination of `cards`, in index order.
pub fn five_card_subsets(cards: &[Card]) -> Vec<[Card; 5]> {
    let n = cards.len();
    let mut out = Vec::new();
    for a in 0..n {
        for b in a + 1..n {
            for c in b + 1..n {
                for d in c + 1..n {
                    for e in d + 1..n {
                        out.push([cards[a], cards[b], cards[c], cards[d], cards[e]]);
                    }
                }
            }
        }
    }
    out
}

fn classify(cards: &[Card]) -> HandEvaluation {
    let mut rank_counts = [0u8; 15]; // 2..14 used
    let mut rank_mask: u16 = 0;
    for c in cards {
        let r = c.rank.value();
        rank_counts[r as usize] += 1;
        rank_mask |= 1u16 << r;
    }

    let five = cards.len() == 5;
    let flush = five && cards.iter().all(|c| c.suit == cards[0].suit);
    let straight = if five {
        straight_high_from_mask(rank_mask)
    } else {
        None
    };

    if let (Some(high), true) = (straight, flush) {
        let category = if high == 14 {
            Category::RoyalFlush
        } else {
            Category::StraightFlush
        };
        return HandEvaluation {
            category,
            kickers: [high, 0, 0, 0, 0],
        };
    }

    let groups = rank_groups(&rank_counts);
    let mut kickers = [0u8; 5];
    for (slot, &(_, rank)) in kickers.iter_mut().zip(groups.iter()) {
        *slot = rank;
    }

    // five distinct ranks: neither flush nor straight can hold quads or a full house
    if flush {
        return HandEvaluation {
            category: Category::Flush,
            kickers,
        };
    }
    if let Some(high) = straight {
        return HandEvaluation {
            category: Category::Straight,
            kickers: [high, 0, 0, 0, 0],
        };
    }

    let top = groups.first().map(|g| g.0).unwrap_or(0);
    let second = groups.get(1).map(|g| g.0).unwrap_or(0);
    let category = match (top, second) {
        (4, _) => Category::FourOfAKind,
        (3, 2) => Category::FullHouse,
        (3, _) => Category::ThreeOfAKind,
        (2, 2) => Category::TwoPair,
        (2, _) => Category::OnePair,
        _ => Category::HighCard,
    };
    HandEvaluation { category, kickers }
}

// (count, rank) pairs, larger groups first, higher ranks first within a group size
fn rank_groups(rank_counts: &[u8; 15]) -> Vec<(u8, u8)> {
    let mut groups: Vec<(u8, u8)> = (2..=14u8)
        .rev()
        .filter(|&r| rank_counts[r as usize] > 0)
        .map(|r| (rank_counts[r as usize], r))
        .collect();
    groups.sort_by(|a, b| b.0.cmp(&a.0));
    groups
}

fn straight_high_from_mask(mask: u16) -> Option<u8> {
    // Ace doubles as rank 1 for the wheel
    let mut m = mask;
    if (m & (1 << 14)) != 0 {
        m |= 1 << 1;
    }
    for high in (5..=14u16).rev() {
        let window = 0b1_1111u16 << (high - 4);
        if (m & window) == window {
            return Some(high as u8);
        }
    }
    None
}
