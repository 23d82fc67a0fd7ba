// tests/tournament_hand_completion_tests.rs
//
// Обработка завершённой раздачи: стеки, вылеты, места, уровни, финал.
//
// Проверяем:
//  1) уровень растёт только когда ВСЕ активные столы сыграли норму раздач;
//  2) вылет получает место players_remaining + 1;
//  3) одновременные вылеты: меньший стартовый стек -> худшее место, потом id;
//  4) неизвестный стол -> ошибка, завершённый турнир -> тот же снимок;
//  5) последний живой игрок становится чемпионом, места 1..N без дыр;
//  6) "грязные" стеки (минус, NaN, дробные) нормализуются.

use std::collections::BTreeSet;

use badugi_mtt::domain::{
    BlindLevel, BlindStructure, Chips, Entrant, HandSummary, PayoutStructure, SeatResult,
    TournamentConfig, TournamentError, TournamentState,
};
use badugi_mtt::tournament::{
    create_tournament_state, on_table_hand_completed, on_table_hand_completed_observed, EventLog,
    TournamentEvent,
};

fn entrants(n: usize) -> Vec<Entrant> {
    (1..=n)
        .map(|i| Entrant::new(format!("p{i:02}"), format!("Player {i}")))
        .collect()
}

fn two_level_structure(hands: u32) -> BlindStructure {
    BlindStructure::new(vec![
        BlindLevel::new(1, Chips::new(5), Chips::new(10), Chips::ZERO, hands),
        BlindLevel::new(2, Chips::new(10), Chips::new(20), Chips::new(1), hands),
    ])
}

fn config(tables: u32, seats: u8, levels: BlindStructure) -> TournamentConfig {
    TournamentConfig {
        id: "t-hands".into(),
        name: "Hands".into(),
        tables,
        seats_per_table: seats,
        starting_stack: Chips::new(500),
        levels,
        payouts: PayoutStructure::top_three(),
    }
}

/// Итог раздачи, в котором `player_id` проиграл всё.
fn bust_summary(state: &TournamentState, player_id: &str) -> (String, HandSummary) {
    let player = state.player(player_id).unwrap();
    let table_id = player.table_id.clone().unwrap();
    let summary = HandSummary::new(
        None,
        vec![SeatResult::new(
            player.seat_index.unwrap(),
            player_id,
            Chips::ZERO,
        )],
    );
    (table_id, summary)
}

fn bust(state: &TournamentState, player_id: &str) -> TournamentState {
    let (table_id, summary) = bust_summary(state, player_id);
    on_table_hand_completed(state, &table_id, &summary).unwrap()
}

#[test]
fn level_advances_only_after_every_active_table_plays() {
    let state = create_tournament_state(config(3, 6, two_level_structure(2)), &entrants(18)).unwrap();
    let table_ids: Vec<String> = state.tables.iter().map(|t| t.table_id.clone()).collect();
    let empty = HandSummary::empty();

    let mut state = state;
    let mut calls = 0;
    for _round in 0..2 {
        for table_id in &table_ids {
            calls += 1;
            state = on_table_hand_completed(&state, table_id, &empty).unwrap();
            if calls < 6 {
                assert_eq!(state.level_index, 0, "advanced too early after {calls} calls");
            }
        }
    }

    assert_eq!(state.level_index, 1);
    assert!(state.tables.iter().all(|t| t.hands_played_at_this_level == 0));
    assert_eq!(state.players_remaining, 18);
}

#[test]
fn level_advances_one_step_and_holds_at_last() {
    let levels = BlindStructure::new(vec![
        BlindLevel::new(1, Chips::new(5), Chips::new(10), Chips::ZERO, 1),
        BlindLevel::new(2, Chips::new(10), Chips::new(20), Chips::ZERO, 1),
        BlindLevel::new(3, Chips::new(20), Chips::new(40), Chips::ZERO, 1),
    ]);
    let mut state = create_tournament_state(config(1, 6, levels), &entrants(4)).unwrap();
    let empty = HandSummary::empty();

    let mut seen = Vec::new();
    for _ in 0..4 {
        state = on_table_hand_completed(&state, "table-1", &empty).unwrap();
        seen.push(state.level_index);
        // Счётчики сбрасываются и на последнем уровне.
        assert_eq!(state.tables[0].hands_played_at_this_level, 0);
    }
    assert_eq!(seen, vec![1, 2, 2, 2]);
}

#[test]
fn zero_hands_level_never_ends() {
    let levels = BlindStructure::new(vec![
        BlindLevel::new(1, Chips::new(5), Chips::new(10), Chips::ZERO, 0),
        BlindLevel::new(2, Chips::new(10), Chips::new(20), Chips::ZERO, 1),
    ]);
    let mut state = create_tournament_state(config(1, 6, levels), &entrants(3)).unwrap();
    for _ in 0..10 {
        state = on_table_hand_completed(&state, "table-1", &HandSummary::empty()).unwrap();
    }
    assert_eq!(state.level_index, 0);
    assert_eq!(state.tables[0].hands_played_at_this_level, 10);
}

#[test]
fn broken_tables_do_not_gate_levels() {
    let state = create_tournament_state(config(2, 6, two_level_structure(2)), &entrants(12)).unwrap();

    // Весь второй стол вылетает в одной раздаче: остаётся 6 игроков и один стол.
    let results: Vec<SeatResult> = state.tables[1]
        .seats
        .iter()
        .map(|s| SeatResult::new(s.seat_index, s.player_id.clone().unwrap(), Chips::ZERO))
        .collect();
    let state =
        on_table_hand_completed(&state, "table-2", &HandSummary::new(Some(1), results)).unwrap();
    assert_eq!(state.players_remaining, 6);
    assert_eq!(state.active_table_count(), 1);
    assert!(!state.tables[1].is_active);

    let state = on_table_hand_completed(&state, "table-1", &HandSummary::empty()).unwrap();
    assert_eq!(state.level_index, 0);
    let state = on_table_hand_completed(&state, "table-1", &HandSummary::empty()).unwrap();
    assert_eq!(state.level_index, 1);
}

#[test]
fn single_bust_gets_last_place() {
    let state = create_tournament_state(config(1, 6, two_level_structure(5)), &entrants(6)).unwrap();
    let summary = HandSummary::new(Some(7), vec![SeatResult::new(0, "p01", Chips::ZERO)]);

    let next = on_table_hand_completed(&state, "table-1", &summary).unwrap();

    let p1 = next.player("p01").unwrap();
    assert!(p1.busted);
    assert_eq!(p1.finish_place, Some(6));
    assert_eq!(p1.bust_hand_index, Some(7));
    assert_eq!(p1.table_id, None);
    assert_eq!(p1.seat_index, None);
    assert_eq!(next.players_remaining, 5);
    assert_eq!(next.finish_order, vec!["p01".to_string()]);
    assert_eq!(next.tables[0].seated_count(), 5);

    // Исходный снимок не тронут.
    assert_eq!(state.players_remaining, 6);
    assert!(!state.player("p01").unwrap().busted);
}

#[test]
fn simultaneous_busts_order_by_starting_stack() {
    let mut state =
        create_tournament_state(config(1, 6, two_level_structure(5)), &entrants(6)).unwrap();
    state.players.get_mut("p01").unwrap().stack = Chips::new(400);
    state.players.get_mut("p02").unwrap().stack = Chips::new(250);
    state.players.get_mut("p03").unwrap().stack = Chips::new(100);

    // Стартовые стеки не переданы: берутся стеки игроков до раздачи.
    let summary = HandSummary::new(
        Some(1),
        vec![
            SeatResult::new(0, "p01", Chips::ZERO),
            SeatResult::new(1, "p02", Chips::ZERO),
            SeatResult::new(2, "p03", Chips::ZERO),
        ],
    );
    let next = on_table_hand_completed(&state, "table-1", &summary).unwrap();

    assert_eq!(next.player("p03").unwrap().finish_place, Some(6));
    assert_eq!(next.player("p02").unwrap().finish_place, Some(5));
    assert_eq!(next.player("p01").unwrap().finish_place, Some(4));
    assert_eq!(next.finish_order, vec!["p03", "p02", "p01"]);
    assert_eq!(next.players_remaining, 3);
}

#[test]
fn reported_starting_stacks_win_over_current_stacks() {
    let state = create_tournament_state(config(1, 6, two_level_structure(5)), &entrants(6)).unwrap();
    let summary = HandSummary::new(
        None,
        vec![
            SeatResult::new(0, "p01", Chips::ZERO).with_starting_stack(Chips::new(50)),
            SeatResult::new(1, "p02", Chips::ZERO).with_starting_stack(Chips::new(20)),
        ],
    );
    let next = on_table_hand_completed(&state, "table-1", &summary).unwrap();
    assert_eq!(next.player("p02").unwrap().finish_place, Some(6));
    assert_eq!(next.player("p01").unwrap().finish_place, Some(5));
}

#[test]
fn equal_starting_stacks_break_ties_by_id() {
    let state = create_tournament_state(config(1, 6, two_level_structure(5)), &entrants(6)).unwrap();
    let summary = HandSummary::new(
        None,
        vec![
            SeatResult::new(4, "p05", Chips::ZERO),
            SeatResult::new(1, "p02", Chips::ZERO),
        ],
    );
    let next = on_table_hand_completed(&state, "table-1", &summary).unwrap();
    // Меньший id обрабатывается первым и получает худшее место.
    assert_eq!(next.player("p02").unwrap().finish_place, Some(6));
    assert_eq!(next.player("p05").unwrap().finish_place, Some(5));
}

#[test]
fn unknown_table_is_an_error() {
    let state = create_tournament_state(config(1, 6, two_level_structure(5)), &entrants(6)).unwrap();
    let mut log = EventLog::new();
    let err = on_table_hand_completed_observed(
        &state,
        "table-9",
        &HandSummary::new(None, vec![SeatResult::new(0, "p01", Chips::ZERO)]),
        &mut log,
    )
    .unwrap_err();

    assert_eq!(
        err,
        TournamentError::UnknownTable {
            table_id: "table-9".into()
        }
    );
    assert_eq!(err.to_string(), "Unknown tableId table-9");
    assert!(log.is_empty());
}

#[test]
fn reported_stacks_are_normalized() {
    let state = create_tournament_state(config(1, 6, two_level_structure(5)), &entrants(6)).unwrap();
    let summary = HandSummary::new(
        None,
        vec![
            SeatResult {
                seat_index: 0,
                player_id: "p01".into(),
                stack: -50.0,
                starting_stack: None,
            },
            SeatResult {
                seat_index: 1,
                player_id: "p02".into(),
                stack: f64::NAN,
                starting_stack: None,
            },
            SeatResult {
                seat_index: 2,
                player_id: "p03".into(),
                stack: 123.9,
                starting_stack: None,
            },
            SeatResult {
                seat_index: 3,
                player_id: "p04".into(),
                stack: f64::INFINITY,
                starting_stack: Some(f64::NAN),
            },
        ],
    );
    let next = on_table_hand_completed(&state, "table-1", &summary).unwrap();

    assert!(next.player("p01").unwrap().busted);
    assert!(next.player("p02").unwrap().busted);
    assert!(next.player("p04").unwrap().busted);
    assert_eq!(next.player("p03").unwrap().stack, Chips::new(123));
    assert!(!next.player("p03").unwrap().busted);
    assert_eq!(next.players_remaining, 3);
}

#[test]
fn unknown_and_busted_players_are_ignored() {
    let state = create_tournament_state(config(1, 6, two_level_structure(5)), &entrants(6)).unwrap();
    let state = bust(&state, "p01");

    let summary = HandSummary::new(
        None,
        vec![
            SeatResult::new(0, "p01", Chips::new(900)),
            SeatResult::new(5, "ghost", Chips::ZERO),
            SeatResult::new(1, "p02", Chips::new(640)),
        ],
    );
    let next = on_table_hand_completed(&state, "table-1", &summary).unwrap();

    let p1 = next.player("p01").unwrap();
    assert!(p1.busted);
    assert_eq!(p1.stack, Chips::ZERO);
    assert_eq!(p1.finish_place, Some(6));
    assert!(next.player("ghost").is_none());
    assert_eq!(next.player("p02").unwrap().stack, Chips::new(640));
    assert_eq!(next.players_remaining, 5);
}

#[test]
fn last_survivor_becomes_champion() {
    let mut state =
        create_tournament_state(config(3, 6, two_level_structure(5)), &entrants(18)).unwrap();
    let order: Vec<String> = (2..=18).map(|i| format!("p{i:02}")).collect();

    for (n, id) in order.iter().enumerate() {
        state = bust(&state, id);
        assert_eq!(state.players_remaining, 17 - n as u32);
        assert!(
            state.active_table_count() <= 3,
            "never more tables than configured"
        );
    }

    assert!(state.is_finished);
    assert_eq!(state.players_remaining, 1);
    assert_eq!(state.champion_id.as_deref(), Some("p01"));
    assert_eq!(state.player("p01").unwrap().finish_place, Some(1));
    assert_eq!(state.finish_order.len(), 17);

    let places: BTreeSet<u32> = state.players.values().filter_map(|p| p.finish_place).collect();
    assert_eq!(places, (1..=18).collect::<BTreeSet<u32>>());

    // Призовые считаются автоматически: 9000 * 50% / 30% / 20%.
    assert_eq!(state.player("p01").unwrap().payout, Some(Chips::new(4500)));
    assert_eq!(state.player("p18").unwrap().payout, Some(Chips::new(2700)));
    assert_eq!(state.player("p17").unwrap().payout, Some(Chips::new(1800)));
    assert_eq!(state.player("p02").unwrap().payout, Some(Chips::ZERO));
}

#[test]
fn finished_tournament_ignores_further_hands() {
    let state = create_tournament_state(config(1, 6, two_level_structure(5)), &entrants(2)).unwrap();
    let state = bust(&state, "p02");
    assert!(state.is_finished);

    let mut log = EventLog::new();
    let again = on_table_hand_completed_observed(
        &state,
        "table-1",
        &HandSummary::new(None, vec![SeatResult::new(0, "p01", Chips::ZERO)]),
        &mut log,
    )
    .unwrap();
    assert_eq!(again, state);
    assert!(log.is_empty());

    // Даже неизвестный стол после финиша не ошибка.
    assert!(on_table_hand_completed(&state, "nope", &HandSummary::empty()).is_ok());
}

#[test]
fn whole_field_busting_at_once_leaves_no_champion() {
    let state = create_tournament_state(config(1, 6, two_level_structure(5)), &entrants(2)).unwrap();
    let summary = HandSummary::new(
        None,
        vec![
            SeatResult::new(0, "p01", Chips::ZERO).with_starting_stack(Chips::new(700)),
            SeatResult::new(1, "p02", Chips::ZERO).with_starting_stack(Chips::new(300)),
        ],
    );
    let next = on_table_hand_completed(&state, "table-1", &summary).unwrap();

    assert!(next.is_finished);
    assert_eq!(next.champion_id, None);
    assert_eq!(next.players_remaining, 0);
    assert_eq!(next.player("p02").unwrap().finish_place, Some(2));
    assert_eq!(next.player("p01").unwrap().finish_place, Some(1));
}

#[test_log::test]
fn bust_hand_emits_events_in_order() {
    let state = create_tournament_state(config(1, 6, two_level_structure(5)), &entrants(3)).unwrap();
    let summary = HandSummary::new(
        Some(3),
        vec![
            SeatResult::new(1, "p02", Chips::ZERO),
            SeatResult::new(2, "p03", Chips::ZERO).with_starting_stack(Chips::new(100)),
            SeatResult::new(0, "p01", Chips::new(1500)),
        ],
    );

    let mut log = EventLog::new();
    let next = on_table_hand_completed_observed(&state, "table-1", &summary, &mut log).unwrap();
    assert!(next.is_finished);

    let kinds: Vec<&str> = log
        .events
        .iter()
        .map(|e| match e {
            TournamentEvent::HandCompleted { .. } => "hand",
            TournamentEvent::PlayerBusted { .. } => "bust",
            TournamentEvent::TablesRebalanced { .. } => "rebalance",
            TournamentEvent::TournamentFinished { .. } => "finished",
            _ => "other",
        })
        .collect();
    // p01 уже сидит на месте 0 за единственным столом: пересадки нет.
    assert_eq!(kinds, vec!["hand", "bust", "bust", "finished"]);
    assert_eq!(log.busts().count(), 2);

    match log.events.last().unwrap() {
        TournamentEvent::TournamentFinished {
            champion_id,
            finish_order,
            placements,
        } => {
            assert_eq!(champion_id.as_deref(), Some("p01"));
            assert_eq!(finish_order, &vec!["p03".to_string(), "p02".to_string()]);
            assert_eq!(placements.len(), 3);
            assert_eq!(placements[0].player_id, "p01");
            assert_eq!(placements[0].payout, Chips::new(750));
        }
        other => panic!("unexpected last event {other:?}"),
    }
}
