use serde::{Deserialize, Serialize};

use crate::domain::blinds::BlindLevel;
use crate::domain::chips::Chips;
use crate::domain::table::TournamentTable;
use crate::domain::tournament::TournamentState;
use crate::domain::{PlayerId, TableId};

use super::dto::{
    BlindsDto, PayoutLineDto, SeatViewDto, StandingDto, TableViewDto, TournamentHudDto,
    TournamentViewDto,
};
use super::errors::ApiError;

/// Сколько строк призовых показывает HUD.
const HUD_PAYOUT_LINES: usize = 3;

/// Запросы "только чтение".
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Query {
    /// Данные для HUD героя.
    #[serde(rename_all = "camelCase")]
    GetHud {
        hero_player_id: Option<PlayerId>,
        hero_table_id: Option<TableId>,
    },

    /// Получить состояние стола.
    #[serde(rename_all = "camelCase")]
    GetTable { table_id: TableId },

    /// Все столы (включая сломанные).
    ListTables,

    /// Таблица результатов.
    GetStandings,

    /// Минимальная инфа о турнире.
    GetTournament,
}

/// Результат запроса "только чтение".
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum QueryResponse {
    Hud(TournamentHudDto),
    Table(TableViewDto),
    Tables(Vec<TableViewDto>),
    Standings(Vec<StandingDto>),
    TournamentInfo(TournamentViewDto),
}

pub fn handle_query(state: &TournamentState, query: &Query) -> Result<QueryResponse, ApiError> {
    match query {
        Query::GetHud {
            hero_player_id,
            hero_table_id,
        } => {
            if let Some(id) = hero_player_id {
                if state.player(id).is_none() {
                    return Err(ApiError::PlayerNotFound(id.clone()));
                }
            }
            Ok(QueryResponse::Hud(build_hud_payload(
                state,
                hero_player_id.as_deref(),
                hero_table_id.as_deref(),
            )))
        }
        Query::GetTable { table_id } => state
            .table(table_id)
            .map(|t| QueryResponse::Table(build_table_view(state, t)))
            .ok_or_else(|| ApiError::TableNotFound(table_id.clone())),
        Query::ListTables => Ok(QueryResponse::Tables(build_table_views(state))),
        Query::GetStandings => Ok(QueryResponse::Standings(build_standings(state))),
        Query::GetTournament => Ok(QueryResponse::TournamentInfo(build_tournament_view(state))),
    }
}

fn blinds_of(level: &BlindLevel) -> BlindsDto {
    BlindsDto {
        sb: level.small_blind,
        bb: level.big_blind,
        ante: level.ante,
    }
}

/// Номер стола для подписи: "table-2" → "2".
fn table_label(table_id: &str) -> &str {
    table_id.split('-').nth(1).unwrap_or(table_id)
}

/// Собрать HUD героя.
///
/// `hero_table_id` задаёт стол, по которому считаем раздачи на уровне;
/// если его нет, берём стол героя, потом первый активный.
pub fn build_hud_payload(
    state: &TournamentState,
    hero_player_id: Option<&str>,
    hero_table_id: Option<&str>,
) -> TournamentHudDto {
    let config = &state.config;
    let level = state.current_level();
    let level_number = level
        .map(|l| l.level_index)
        .unwrap_or(state.level_index as u32 + 1);
    let level_label = level
        .map(BlindLevel::label)
        .unwrap_or_else(|| format!("Level {level_number}"));

    let tables_active = state.active_table_count();
    let hero = hero_player_id.and_then(|id| state.player(id));

    let hero_seat = hero
        .and_then(|p| p.seat_index)
        .map(|s| (s as u32 + 1).to_string())
        .unwrap_or_else(|| "-".into());
    let hero_table = if tables_active <= 1 {
        "Final".to_string()
    } else {
        hero.and_then(|p| p.table_id.as_deref())
            .map(|id| table_label(id).to_string())
            .unwrap_or_else(|| "-".into())
    };

    let seats_per_table = config.seats_per_table() as u32;
    let total_entrants = state.total_players.max(config.total_seats() as u32);

    let alive = state.alive_players().count() as u32;
    let players_remaining = if alive > 0 { alive } else { state.players_remaining };
    let average_stack = (players_remaining > 0)
        .then(|| Chips(state.chips_in_play().0 / u64::from(players_remaining)));

    let prize_pool_total =
        Chips(u64::from(total_entrants).saturating_mul(config.starting_stack.0));

    let mut payout_breakdown: Vec<PayoutLineDto> = config
        .payouts
        .rules
        .iter()
        .take(HUD_PAYOUT_LINES)
        .map(|rule| PayoutLineDto {
            place: rule.place,
            percent: Some(rule.percent),
            amount: Some(Chips(
                (prize_pool_total.0 as f64 * rule.percent / 100.0).floor() as u64,
            )),
        })
        .collect();
    while payout_breakdown.len() < HUD_PAYOUT_LINES {
        payout_breakdown.push(PayoutLineDto {
            place: payout_breakdown.len() as u32 + 1,
            percent: None,
            amount: None,
        });
    }

    let lookup_table = hero_table_id.or_else(|| hero.and_then(|p| p.table_id.as_deref()));
    let reference_table = lookup_table
        .and_then(|id| state.table(id))
        .or_else(|| state.active_tables().next())
        .or_else(|| state.tables.first());

    let paid_places = config.payouts.len();

    TournamentHudDto {
        tournament_name: if config.name.is_empty() {
            "Store Tournament".into()
        } else {
            config.name.clone()
        },
        level_label,
        current_level_number: level_number,
        current_blinds: level.map(blinds_of),
        next_level_blinds: state.next_level().map(blinds_of),
        players_remaining_text: format!(
            "Players Remaining: {players_remaining} / {total_entrants}"
        ),
        tables_active_text: if tables_active <= 1 {
            "Tables: Final".into()
        } else {
            format!("Tables: {tables_active}")
        },
        hero_position_text: format!("Table {hero_table}  Seat {hero_seat}"),
        payout_summary_text: (paid_places > 0).then(|| format!("Top {paid_places} paid")),
        is_final_table: tables_active <= 1 && players_remaining <= seats_per_table.max(1),
        players_remaining,
        total_entrants,
        average_stack,
        prize_pool_total,
        payout_breakdown,
        hands_played_this_level: reference_table
            .map(|t| t.hands_played_at_this_level)
            .unwrap_or(0),
        hands_this_level: level.map(|l| l.hands_this_level),
    }
}

/// Сформировать DTO стола.
pub fn build_table_view(state: &TournamentState, table: &TournamentTable) -> TableViewDto {
    let seats = table
        .seats
        .iter()
        .map(|seat| {
            let player = seat.player_id.as_deref().and_then(|id| state.player(id));
            SeatViewDto {
                seat_index: seat.seat_index,
                player_id: seat.player_id.clone(),
                display_name: player.map(|p| p.name.clone()),
                stack: player.map(|p| p.stack),
            }
        })
        .collect();

    TableViewDto {
        table_id: table.table_id.clone(),
        is_active: table.is_active,
        hands_played_at_this_level: table.hands_played_at_this_level,
        seated_count: table.seated_count(),
        seats,
    }
}

pub fn build_table_views(state: &TournamentState) -> Vec<TableViewDto> {
    state
        .tables
        .iter()
        .map(|t| build_table_view(state, t))
        .collect()
}

/// Результаты: сначала живые по убыванию стека, потом вылетевшие по местам.
pub fn build_standings(state: &TournamentState) -> Vec<StandingDto> {
    let mut rows: Vec<StandingDto> = state
        .players
        .values()
        .map(|p| StandingDto {
            player_id: p.id.clone(),
            display_name: p.name.clone(),
            stack: p.stack,
            busted: p.busted,
            finish_place: p.finish_place,
            payout: p.payout,
            table_id: p.table_id.clone(),
            seat_index: p.seat_index,
        })
        .collect();

    rows.sort_by(|a, b| match (a.finish_place, b.finish_place) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Greater,
        (None, Some(_)) => std::cmp::Ordering::Less,
        (None, None) => b.stack.cmp(&a.stack).then_with(|| a.player_id.cmp(&b.player_id)),
    });
    rows
}

pub fn build_tournament_view(state: &TournamentState) -> TournamentViewDto {
    TournamentViewDto {
        tournament_id: state.config.id.clone(),
        name: state.config.name.clone(),
        current_level: state
            .current_level()
            .map(|l| l.level_index)
            .unwrap_or(state.level_index as u32 + 1),
        players_remaining: state.players_remaining,
        total_players: state.total_players,
        tables_running: state.active_table_count() as u32,
        is_finished: state.is_finished,
        champion_id: state.champion_id.clone(),
    }
}
