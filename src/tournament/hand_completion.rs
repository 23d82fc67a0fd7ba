// src/tournament/hand_completion.rs

use tracing::{debug, info};

use crate::domain::chips::Chips;
use crate::domain::hand::HandSummary;
use crate::domain::tournament::{TournamentError, TournamentState};
use crate::domain::{HandIndex, PlayerId};
use crate::tournament::events::{flush, NullObserver, TournamentEvent, TournamentObserver};
use crate::tournament::payouts::apply_payouts;
use crate::tournament::rebalance::apply_rebalance;

/// Игрок с нулевым стеком, ожидающий вылета в этой раздаче.
#[derive(Clone, Debug)]
struct PendingBust {
    player_id: PlayerId,
    starting_stack: Chips,
}

/// Применить итог раздачи за столом `table_id`.
///
/// Порядок:
///   1) стеки из `summary` перезаписывают стеки игроков (это снимок, не дельта);
///   2) все игроки с нулём вылетают разом, от меньшего стартового стека к большему;
///   3) счётчик раздач стола +1, проверка перехода уровня;
///   4) ребалансировка столов;
///   5) если остался один игрок, турнир завершается и считаются призовые.
///
/// Если турнир уже завершён, возвращается то же состояние.
pub fn on_table_hand_completed(
    state: &TournamentState,
    table_id: &str,
    summary: &HandSummary,
) -> Result<TournamentState, TournamentError> {
    on_table_hand_completed_observed(state, table_id, summary, &mut NullObserver)
}

pub fn on_table_hand_completed_observed(
    state: &TournamentState,
    table_id: &str,
    summary: &HandSummary,
    observer: &mut dyn TournamentObserver,
) -> Result<TournamentState, TournamentError> {
    if state.is_finished {
        return Ok(state.clone());
    }
    let mut next = state.clone();
    let mut events = Vec::new();
    complete_hand(&mut next, table_id, summary, &mut events)?;
    flush(events, observer);
    Ok(next)
}

/// Рабочая часть перехода: меняет копию состояния, события копит в `events`.
pub(crate) fn complete_hand(
    state: &mut TournamentState,
    table_id: &str,
    summary: &HandSummary,
    events: &mut Vec<TournamentEvent>,
) -> Result<(), TournamentError> {
    if state.is_finished {
        return Ok(());
    }
    let table_pos = state
        .table_position(table_id)
        .ok_or_else(|| TournamentError::UnknownTable {
            table_id: table_id.to_string(),
        })?;

    events.push(TournamentEvent::HandCompleted {
        table_id: table_id.to_string(),
        summary: summary.clone(),
    });

    let mut bust_queue: Vec<PendingBust> = Vec::new();
    for result in &summary.seat_results {
        let Some(player) = state.players.get_mut(&result.player_id) else {
            continue;
        };
        if player.busted {
            continue;
        }
        let starting_stack = result.reported_starting_stack().unwrap_or(player.stack);
        player.stack = result.resulting_stack();
        if player.stack.is_zero() {
            bust_queue.push(PendingBust {
                player_id: player.id.clone(),
                starting_stack,
            });
        }
    }

    // Меньший стартовый стек вылетает первым (худшее место), при равенстве по id.
    bust_queue.sort_by(|a, b| {
        a.starting_stack
            .cmp(&b.starting_stack)
            .then_with(|| a.player_id.cmp(&b.player_id))
    });

    for pending in &bust_queue {
        mark_player_busted(state, &pending.player_id, table_id, summary.hand_index, events);
    }

    state.tables[table_pos].hands_played_at_this_level += 1;

    maybe_advance_level(state, events);
    apply_rebalance(state, events)?;
    maybe_finalize_tournament(state, events);
    Ok(())
}

fn mark_player_busted(
    state: &mut TournamentState,
    player_id: &str,
    table_id: &str,
    hand_index: Option<HandIndex>,
    events: &mut Vec<TournamentEvent>,
) {
    let Some(player) = state.players.get_mut(player_id) else {
        return;
    };
    if player.busted {
        return;
    }

    state.players_remaining = state.players_remaining.saturating_sub(1);
    let finish_place = state.players_remaining + 1;

    player.busted = true;
    player.bust_hand_index = hand_index;
    player.finish_place = Some(finish_place);
    state.finish_order.push(player.id.clone());

    // Освобождаем текущее место игрока.
    if let Some((seat_table, seat_index)) = player.table_id.take().zip(player.seat_index.take()) {
        let seat = state
            .tables
            .iter_mut()
            .find(|t| t.table_id == seat_table)
            .and_then(|t| t.seats.get_mut(seat_index as usize));
        if let Some(seat) = seat {
            if seat.player_id.as_deref() == Some(player_id) {
                seat.player_id = None;
            }
        }
    }

    debug!(
        player_id,
        finish_place,
        players_remaining = state.players_remaining,
        "player busted"
    );
    events.push(TournamentEvent::PlayerBusted {
        player_id: player_id.to_string(),
        table_id: table_id.to_string(),
        finish_place,
        players_remaining: state.players_remaining,
        hand_index,
    });
}

/// Переход уровня: все активные столы сыграли норму раздач.
///
/// За один вызов уровень растёт максимум на один шаг.
/// На последнем уровне уровень держится, а счётчики всё равно обнуляются.
fn maybe_advance_level(state: &mut TournamentState, events: &mut Vec<TournamentEvent>) {
    let required = match state.current_level() {
        Some(level) if level.hands_this_level > 0 => level.hands_this_level,
        _ => return,
    };

    let mut active = state.tables.iter().filter(|t| t.is_active).peekable();
    if active.peek().is_none() {
        return;
    }
    if !active.all(|t| t.hands_played_at_this_level >= required) {
        return;
    }

    if !state.config.levels.is_last(state.level_index) {
        let from = state.level_index;
        state.level_index += 1;
        if let Some(level) = state.current_level().cloned() {
            debug!(
                level = level.level_index,
                players_remaining = state.players_remaining,
                "level advanced"
            );
            events.push(TournamentEvent::LevelAdvanced {
                from,
                to: state.level_index,
                level,
            });
        }
    }

    for table in &mut state.tables {
        table.hands_played_at_this_level = 0;
    }
}

fn maybe_finalize_tournament(state: &mut TournamentState, events: &mut Vec<TournamentEvent>) {
    if state.is_finished || state.players_remaining > 1 {
        return;
    }

    let champion_id = state.alive_players().next().map(|p| p.id.clone());
    if let Some(player) = champion_id.as_ref().and_then(|id| state.players.get_mut(id)) {
        player.finish_place = Some(1);
    }
    state.champion_id = champion_id.clone();
    state.is_finished = true;
    apply_payouts(state);

    info!(
        champion = champion_id.as_deref().unwrap_or("-"),
        entrants = state.total_players,
        "tournament finished"
    );
    events.push(TournamentEvent::TournamentFinished {
        champion_id,
        finish_order: state.finish_order.clone(),
        placements: state.placements(),
    });
}
