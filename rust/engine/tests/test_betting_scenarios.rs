use pokerbench_engine::cards::{Card, Rank as R, Suit as S};
use pokerbench_engine::deck::Deck;
use pokerbench_engine::errors::GameError;
use pokerbench_engine::player::PlayerAction as A;
use pokerbench_engine::rules::Blinds;
use pokerbench_engine::table::{Payout, Phase, StreetAdvance, Table};

fn c(r: R, s: S) -> Card {
    Card::new(r, s)
}

fn stacks(entries: &[(&str, u32)]) -> Vec<(String, u32)> {
    entries.iter().map(|(n, s)| (n.to_string(), *s)).collect()
}

/// Checks or calls every decision until the hand ends.
fn check_down(t: &mut Table) -> Vec<Payout> {
    loop {
        while let Some(seat) = t.next_to_act() {
            let owed = t.view_for(seat).unwrap().to_call;
            let action = if owed > 0 { A::Call } else { A::Check };
            t.apply_action(seat, action).unwrap();
            t.check_conservation().unwrap();
        }
        if t.is_hand_over() {
            return t.resolve_showdown().unwrap();
        }
        if let StreetAdvance::Showdown(payouts) = t.advance_street().unwrap() {
            return payouts;
        }
    }
}

#[test]
fn heads_up_button_posts_small_blind() {
    let mut t = Table::new(["A", "B"], 100, Blinds::new(5, 10), 11).unwrap();
    assert_eq!(t.dealer(), 0);
    let view = t.start_hand().unwrap();
    assert_eq!(view.pot, 15);
    assert_eq!(view.current_bet, 10);
    assert_eq!(t.player(0).unwrap().street_contribution(), 5);
    assert_eq!(t.player(1).unwrap().street_contribution(), 10);
    assert_eq!(t.view_for(0).unwrap().to_call, 5);
    assert_eq!(t.next_to_act(), Some(0));
    assert_eq!(t.phase(), Phase::PreflopOpen);
}

#[test]
fn short_stack_calls_all_in_for_less() {
    let mut t = Table::with_stacks(stacks(&[("A", 100), ("B", 100), ("C", 7)]), Blinds::new(5, 10), 2)
        .unwrap();
    t.set_dealer(2).unwrap();
    t.start_hand().unwrap();
    // A small blind, B big blind, C first to act
    assert_eq!(t.next_to_act(), Some(2));
    let out = t.apply_action(2, A::Call).unwrap();
    assert_eq!(out.chips, 7);
    assert!(out.all_in);
    assert!(!out.reopened);
    assert!(!t.needs_to_act(2));
    assert!(t.player(2).unwrap().is_live());

    assert_eq!(t.next_to_act(), Some(0));
    t.apply_action(0, A::Call).unwrap();
    assert_eq!(t.next_to_act(), None);
    assert_eq!(t.pot(), 27);
    t.check_conservation().unwrap();
}

#[test]
fn raise_reopens_the_round() {
    let mut t = Table::new(["A", "B", "C"], 200, Blinds::new(5, 10), 4).unwrap();
    t.start_hand().unwrap();
    // dealer 0, sb 1, bb 2; A acts first and calls
    t.apply_action(0, A::Call).unwrap();
    t.apply_action(1, A::Call).unwrap();
    assert_eq!(t.next_to_act(), None);

    t.advance_street().unwrap();
    assert_eq!(t.next_to_act(), Some(1));
    t.apply_action(1, A::Check).unwrap();
    let out = t.apply_action(2, A::Raise(30)).unwrap();
    assert!(out.reopened);
    assert_eq!(t.current_bet(), 30);
    assert_eq!(t.next_to_act(), Some(0));
    t.apply_action(0, A::Call).unwrap();
    // B already checked but faces a new bet
    assert_eq!(t.next_to_act(), Some(1));
    t.apply_action(1, A::Fold).unwrap();
    assert_eq!(t.next_to_act(), None);
    t.check_conservation().unwrap();
}

#[test]
fn capped_raise_does_not_reopen() {
    let mut t = Table::with_stacks(stacks(&[("A", 100), ("B", 100), ("C", 100)]), Blinds::new(5, 10), 4)
        .unwrap();
    t.start_hand().unwrap();
    // a "raise" of 4 on top of nothing is below the bet to match
    let out = t.apply_action(0, A::Raise(4)).unwrap();
    assert_eq!(out.chips, 4);
    assert!(!out.reopened);
    assert!(t.needs_to_act(0));
}

#[test]
fn illegal_check_leaves_state_untouched() {
    let mut t = Table::new(["A", "B"], 100, Blinds::new(5, 10), 5).unwrap();
    t.start_hand().unwrap();
    let before = t.view_for(0).unwrap();
    let err = t.apply_action(0, A::Check).unwrap_err();
    assert_eq!(err, GameError::IllegalCheck { owed: 5 });
    assert_eq!(t.view_for(0).unwrap(), before);
    assert!(!t.player(0).unwrap().has_acted());
    assert_eq!(t.next_to_act(), Some(0));
}

#[test]
fn fold_ends_hand_without_showdown() {
    let mut t = Table::new(["A", "B"], 100, Blinds::new(5, 10), 6).unwrap();
    t.start_hand().unwrap();
    t.apply_action(0, A::Fold).unwrap();
    assert!(t.is_hand_over());
    assert_eq!(t.next_to_act(), None);
    let payouts = t.resolve_showdown().unwrap();
    assert_eq!(
        payouts,
        vec![Payout {
            seat: 1,
            player: "B".into(),
            amount: 15
        }]
    );
    assert!(t.last_showdown().is_none());
    assert_eq!(t.phase(), Phase::HandComplete);
    assert_eq!(t.player(0).unwrap().stack(), 95);
    assert_eq!(t.player(1).unwrap().stack(), 105);
}

#[test]
fn equal_hands_split_the_pot() {
    let mut t = Table::new(["A", "B"], 100, Blinds::new(5, 10), 7).unwrap();
    let deck = Deck::stacked(vec![
        c(R::Two, S::Clubs),
        c(R::Three, S::Diamonds),
        c(R::Two, S::Hearts),
        c(R::Three, S::Spades),
        c(R::Ace, S::Spades),
        c(R::King, S::Diamonds),
        c(R::Queen, S::Clubs),
        c(R::Jack, S::Hearts),
        c(R::Nine, S::Spades),
    ]);
    t.start_hand_with_deck(deck).unwrap();
    let payouts = check_down(&mut t);
    assert_eq!(payouts.len(), 2);
    assert!(payouts.iter().all(|p| p.amount == 10));
    assert_eq!(t.player(0).unwrap().stack(), 100);
    assert_eq!(t.player(1).unwrap().stack(), 100);
    let info = t.last_showdown().unwrap();
    assert_eq!(info.winners.len(), 2);
    assert_eq!(info.hands.len(), 2);
}

#[test]
fn odd_chip_goes_to_first_winner_left_of_button() {
    let mut t = Table::new(["A", "B", "C"], 100, Blinds::new(5, 11), 8).unwrap();
    let deck = Deck::stacked(vec![
        c(R::Nine, S::Clubs),
        c(R::Eight, S::Diamonds),
        c(R::Nine, S::Hearts),
        c(R::Eight, S::Spades),
        c(R::Six, S::Clubs),
        c(R::Four, S::Diamonds),
        c(R::Ace, S::Spades),
        c(R::King, S::Diamonds),
        c(R::Queen, S::Clubs),
        c(R::Seven, S::Hearts),
        c(R::Two, S::Spades),
    ]);
    t.start_hand_with_deck(deck).unwrap();
    let payouts = check_down(&mut t);
    assert_eq!(t.pot(), 0);
    // pot 33 split between B and A; B sits first after the button
    assert_eq!(
        payouts,
        vec![
            Payout {
                seat: 1,
                player: "B".into(),
                amount: 17
            },
            Payout {
                seat: 0,
                player: "A".into(),
                amount: 16
            },
        ]
    );
    t.check_conservation().unwrap();
}

#[test]
fn busted_players_sit_out() {
    let mut t = Table::with_stacks(stacks(&[("A", 100), ("B", 0), ("C", 100)]), Blinds::new(5, 10), 9)
        .unwrap();
    t.start_hand().unwrap();
    assert!(!t.player(1).unwrap().is_in_hand());
    assert_eq!(
        t.apply_action(1, A::Call).unwrap_err(),
        GameError::NotInHand { seat: 1 }
    );
    assert_eq!(t.view_for(1).unwrap().hole_cards, None);
    check_down(&mut t);
    assert_eq!(t.advance_dealer().unwrap(), 2);
}

#[test]
fn actions_are_rejected_between_hands() {
    let mut t = Table::new(["A", "B"], 100, Blinds::default(), 1).unwrap();
    assert!(matches!(
        t.apply_action(0, A::Call),
        Err(GameError::BettingClosed { .. })
    ));
    assert_eq!(t.resolve_showdown().unwrap_err(), GameError::NoHandInProgress);
    assert_eq!(t.advance_street().unwrap_err(), GameError::NoHandInProgress);
}

#[test]
fn chips_are_conserved_over_many_hands() {
    let mut t = Table::new(["A", "B", "C", "D"], 100, Blinds::new(5, 10), 2024).unwrap();
    let mut hands = 0;
    while hands < 200 && t.start_hand().is_ok() {
        hands += 1;
        loop {
            let mut street_actions = 0;
            while let Some(seat) = t.next_to_act() {
                let owed = t.view_for(seat).unwrap().to_call;
                let action = match (seat + hands + street_actions) % 4 {
                    0 if street_actions < 4 => A::Raise(owed + 15),
                    1 if owed > 20 => A::Fold,
                    _ if owed > 0 => A::Call,
                    _ => A::Check,
                };
                t.apply_action(seat, action).unwrap();
                t.check_conservation().unwrap();
                street_actions += 1;
            }
            if t.is_hand_over() {
                t.resolve_showdown().unwrap();
                break;
            }
            if let StreetAdvance::Showdown(_) = t.advance_street().unwrap() {
                break;
            }
        }
        t.check_conservation().unwrap();
        t.advance_dealer().unwrap();
    }
    assert!(hands > 0);
    let total: u32 = t.players().iter().map(|p| p.stack()).sum();
    assert_eq!(total, 400);
}
