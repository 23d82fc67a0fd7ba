// src/tournament/background.rs

use std::collections::HashSet;

use tracing::debug;

use crate::domain::chips::Chips;
use crate::domain::hand::{HandSource, HandSummary, SeatResult};
use crate::domain::tournament::{TournamentError, TournamentState};
use crate::domain::{PlayerId, SeatIndex, TableId};
use crate::tournament::events::{flush, NullObserver, TournamentEvent, TournamentObserver};
use crate::tournament::hand_completion::complete_hand;

/// Минимальный взнос в синтетической раздаче.
const MIN_BASE_CONTRIBUTION: u64 = 10;
/// Верхняя граница раздач на стол за один вызов.
const MAX_HANDS_PER_TABLE: u32 = 3;

/// Настройки фоновой симуляции.
#[derive(Clone, Debug)]
pub struct BackgroundOptions {
    /// Сколько синтетических раздач сыграть на каждом столе (прижимается к 1..=3).
    pub max_hands_per_table: u32,
    /// Столы, которые не трогаем (кроме стола героя).
    pub exclude_table_ids: Vec<TableId>,
}

impl Default for BackgroundOptions {
    fn default() -> Self {
        Self {
            max_hands_per_table: 1,
            exclude_table_ids: Vec::new(),
        }
    }
}

impl BackgroundOptions {
    pub fn with_hands(max_hands_per_table: u32) -> Self {
        Self {
            max_hands_per_table,
            ..Self::default()
        }
    }

    fn hands_per_table(&self) -> u32 {
        self.max_hands_per_table.clamp(1, MAX_HANDS_PER_TABLE)
    }
}

/// Прогнать фоновые столы (все, кроме стола героя и исключённых).
///
/// Каждая синтетическая раздача идёт через тот же `complete_hand`,
/// что и раздачи героя: вылеты, места, уровни и ломка столов работают одинаково.
pub fn simulate_background_tables(
    state: &TournamentState,
    hero_table_id: Option<&str>,
    options: &BackgroundOptions,
) -> Result<TournamentState, TournamentError> {
    simulate_background_tables_observed(state, hero_table_id, options, &mut NullObserver)
}

pub fn simulate_background_tables_observed(
    state: &TournamentState,
    hero_table_id: Option<&str>,
    options: &BackgroundOptions,
    observer: &mut dyn TournamentObserver,
) -> Result<TournamentState, TournamentError> {
    if state.is_finished {
        return Ok(state.clone());
    }

    let mut excluded: HashSet<&str> = options
        .exclude_table_ids
        .iter()
        .map(String::as_str)
        .collect();
    if let Some(hero) = hero_table_id {
        excluded.insert(hero);
    }

    // Список столов фиксируем на старте: ломка столов по ходу его не меняет.
    let schedule: Vec<(TableId, bool)> = state
        .tables
        .iter()
        .map(|t| (t.table_id.clone(), t.is_active))
        .collect();

    let mut next = state.clone();
    let mut events = Vec::new();
    let hands = options.hands_per_table();

    for (table_id, was_active) in &schedule {
        if !*was_active || excluded.contains(table_id.as_str()) {
            continue;
        }
        for _ in 0..hands {
            if next.is_finished {
                break;
            }
            run_abstract_hand(&mut next, table_id, &mut events)?;
        }
        if next.is_finished {
            break;
        }
    }

    flush(events, observer);
    Ok(next)
}

/// Взнос игрока в синтетическую раздачу: 2% стартового стека (не меньше 10).
fn base_contribution(starting_stack: Chips) -> u64 {
    // round(x * 0.02) в целых числах
    let two_percent = (starting_stack.0.saturating_mul(2) + 50) / 100;
    two_percent.max(MIN_BASE_CONTRIBUTION)
}

/// Синтетический исход: самый большой стек забирает взносы остальных.
///
/// Проигравший отдаёт max(base, 25% своего стека), но не больше стека.
/// Победитель тоже "платит" base и получает всё обратно вместе с банком.
fn synthesize_hand(
    participants: &[(PlayerId, SeatIndex, Chips)],
    base: u64,
) -> Option<(usize, Vec<u64>)> {
    let winner = participants
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.2.cmp(&b.2).then_with(|| b.0.cmp(&a.0)))
        .map(|(idx, _)| idx)?;

    let losses = participants
        .iter()
        .enumerate()
        .map(|(idx, (_, _, stack))| {
            let pressure = if idx == winner {
                base
            } else {
                // round(stack * 0.25)
                base.max((stack.0 + 2) / 4)
            };
            pressure.min(stack.0)
        })
        .collect();

    Some((winner, losses))
}

fn run_abstract_hand(
    state: &mut TournamentState,
    table_id: &str,
    events: &mut Vec<TournamentEvent>,
) -> Result<(), TournamentError> {
    let participants: Vec<(PlayerId, SeatIndex, Chips)> = state
        .live_players_at(table_id)
        .into_iter()
        .map(|p| (p.id.clone(), p.seat_index.unwrap_or(0), p.stack))
        .collect();
    if participants.len() <= 1 {
        return Ok(());
    }

    let base = base_contribution(state.config.starting_stack);
    let Some((winner, losses)) = synthesize_hand(&participants, base) else {
        return Ok(());
    };

    state.abstract_hand_counter += 1;
    let hand_index = state.abstract_hand_counter;
    let total_winnings: u64 = losses.iter().sum();

    let seat_results: Vec<SeatResult> = participants
        .iter()
        .zip(&losses)
        .enumerate()
        .map(|(idx, ((player_id, seat_index, stack), loss))| {
            let mut resulting = stack.0 - loss;
            if idx == winner {
                resulting += total_winnings;
            }
            SeatResult::new(*seat_index, player_id.clone(), Chips(resulting))
                .with_starting_stack(*stack)
        })
        .collect();

    let summary = HandSummary {
        hand_index: Some(hand_index),
        hand_id: Some(format!("cpu-{table_id}-{hand_index}")),
        source: HandSource::Cpu,
        seat_results,
    };

    let winner_id = participants[winner].0.clone();
    debug!(
        table_id,
        hand_index,
        winner_id = %winner_id,
        total_winnings,
        "background hand simulated"
    );
    events.push(TournamentEvent::HandSimulated {
        table_id: table_id.to_string(),
        summary: summary.clone(),
        winner_id,
        total_winnings: Chips(total_winnings),
    });

    complete_hand(state, table_id, &summary, events)
}
