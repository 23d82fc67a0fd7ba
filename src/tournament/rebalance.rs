use serde::Serialize;
use tracing::{debug, trace};

use crate::domain::player::TournamentPlayer;
use crate::domain::table::{table_id_for, TournamentTable};
use crate::domain::tournament::{TournamentError, TournamentState};
use crate::domain::{PlayerId, SeatIndex, TableId};
use crate::tournament::events::{flush, NullObserver, TournamentEvent, TournamentObserver};

/// Перемещение одного игрока при ребалансировке.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RebalanceMove {
    pub player_id: PlayerId,
    pub from_table: Option<TableId>,
    pub from_seat: Option<SeatIndex>,
    pub to_table: TableId,
    pub to_seat: SeatIndex,
}

/// Снимок одного стола после ребалансировки: кто за ним сидит, по местам.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableOccupancy {
    pub table_id: TableId,
    pub is_active: bool,
    pub players: Vec<PlayerId>,
}

/// Полный план ребалансировки:
///   - сколько столов должно остаться активными,
///   - итоговая рассадка (место = индекс в `seats`),
///   - список перемещений относительно текущей рассадки.
#[derive(Clone, Debug)]
pub struct RebalancePlan {
    pub target_tables: usize,
    pub tables: Vec<TournamentTable>,
    pub moves: Vec<RebalanceMove>,
}

impl RebalancePlan {
    pub fn occupancy(&self) -> Vec<TableOccupancy> {
        self.tables
            .iter()
            .map(|t| TableOccupancy {
                table_id: t.table_id.clone(),
                is_active: t.is_active,
                players: t.occupants().cloned().collect(),
            })
            .collect()
    }
}

/// Сколько столов нужно для `players_remaining` игроков.
///
/// Столы только ломаются: больше, чем было в конфиге, не бывает,
/// и минимум один стол остаётся всегда.
pub fn target_table_count(
    players_remaining: u32,
    configured_tables: usize,
    seats_per_table: usize,
) -> usize {
    let remaining = players_remaining.max(1) as usize;
    let needed = remaining.div_ceil(seats_per_table.max(1));
    needed.min(configured_tables).max(1)
}

/// Посчитать новую рассадку, не трогая состояние.
///
/// Живые игроки сортируются по (место, позиция стола, id) и раздаются
/// по кругу: игрок `k` идёт за стол `k % target`, на место `k / target`.
/// Такой порядок повторяет индекс круговой рассадки, поэтому повторный
/// вызов без вылетов ничего не двигает.
///
/// Порядок "сначала стол, потом место" здесь не используется: с ним
/// повторная пересадка снова перемешивает игроков. Потребители реплея
/// не должны ждать ходов в табличном порядке.
pub fn plan_rebalance(state: &TournamentState) -> Result<RebalancePlan, TournamentError> {
    let configured = state.config.table_count();
    let seats_per_table = state.config.seats_per_table();
    let target = target_table_count(state.players_remaining, configured, seats_per_table);

    let mut alive: Vec<&TournamentPlayer> = state.alive_players().collect();
    alive.sort_by(|a, b| {
        let key_a = (a.seat_index, a.table_id.as_deref().and_then(|t| state.table_position(t)));
        let key_b = (b.seat_index, b.table_id.as_deref().and_then(|t| state.table_position(t)));
        key_a.cmp(&key_b).then_with(|| a.id.cmp(&b.id))
    });

    if alive.len() > target * seats_per_table {
        return Err(TournamentError::RebalanceOverflow {
            players: alive.len(),
            tables: target,
            seats_per_table,
        });
    }

    let mut tables: Vec<TournamentTable> = (0..configured)
        .map(|idx| {
            let mut table = TournamentTable::new(table_id_for(idx), seats_per_table);
            table.is_active = idx < target;
            table.hands_played_at_this_level = if table.is_active {
                state
                    .tables
                    .get(idx)
                    .map(|t| t.hands_played_at_this_level)
                    .unwrap_or(0)
            } else {
                0
            };
            table
        })
        .collect();

    let mut moves = Vec::new();
    for (idx, player) in alive.iter().enumerate() {
        let table = &mut tables[idx % target];
        let seat_index = (idx / target) as SeatIndex;
        table.seats[seat_index as usize].player_id = Some(player.id.clone());

        let unchanged =
            player.is_seated_at(&table.table_id) && player.seat_index == Some(seat_index);
        if !unchanged {
            moves.push(RebalanceMove {
                player_id: player.id.clone(),
                from_table: player.table_id.clone(),
                from_seat: player.seat_index,
                to_table: table.table_id.clone(),
                to_seat: seat_index,
            });
        }
    }

    Ok(RebalancePlan {
        target_tables: target,
        tables,
        moves,
    })
}

/// Ребалансировка столов по числу оставшихся игроков.
pub fn rebalance_tables(state: &TournamentState) -> Result<TournamentState, TournamentError> {
    rebalance_tables_observed(state, &mut NullObserver)
}

pub fn rebalance_tables_observed(
    state: &TournamentState,
    observer: &mut dyn TournamentObserver,
) -> Result<TournamentState, TournamentError> {
    let mut next = state.clone();
    let mut events = Vec::new();
    apply_rebalance(&mut next, &mut events)?;
    flush(events, observer);
    Ok(next)
}

/// Применить план к рабочей копии состояния.
pub(crate) fn apply_rebalance(
    state: &mut TournamentState,
    events: &mut Vec<TournamentEvent>,
) -> Result<(), TournamentError> {
    let plan = plan_rebalance(state)?;
    let active_before = state.active_table_count();

    for table in &plan.tables {
        for seat in &table.seats {
            if let Some(player) = seat
                .player_id
                .as_ref()
                .and_then(|id| state.players.get_mut(id))
            {
                player.table_id = Some(table.table_id.clone());
                player.seat_index = Some(seat.seat_index);
            }
        }
    }
    state.tables = plan.tables;

    let active_after = state.active_table_count();
    if plan.moves.is_empty() && active_before == active_after {
        trace!(players_remaining = state.players_remaining, "seating unchanged");
        return Ok(());
    }

    debug!(
        players_remaining = state.players_remaining,
        active_tables = active_after,
        target_tables = plan.target_tables,
        moves = plan.moves.len(),
        "tables rebalanced"
    );
    events.push(TournamentEvent::TablesRebalanced {
        players_remaining: state.players_remaining,
        active_tables: active_after,
        target_tables: plan.target_tables,
        moves: plan.moves,
    });
    Ok(())
}
