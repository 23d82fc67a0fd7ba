use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::{PlayerId, SeatIndex, TableId};

/// Блайнды уровня для HUD.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlindsDto {
    pub sb: Chips,
    pub bb: Chips,
    pub ante: Chips,
}

/// Одна строка призовых в HUD.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PayoutLineDto {
    pub place: u32,
    /// None: для этого места правила нет (строка-заглушка).
    pub percent: Option<f64>,
    pub amount: Option<Chips>,
}

/// Всё, что рисует турнирный HUD.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TournamentHudDto {
    pub tournament_name: String,
    pub level_label: String,
    pub current_level_number: u32,
    pub current_blinds: Option<BlindsDto>,
    pub next_level_blinds: Option<BlindsDto>,
    pub players_remaining_text: String,
    pub tables_active_text: String,
    pub hero_position_text: String,
    pub payout_summary_text: Option<String>,
    pub is_final_table: bool,
    pub players_remaining: u32,
    pub total_entrants: u32,
    pub average_stack: Option<Chips>,
    pub prize_pool_total: Chips,
    /// Всегда три строки.
    pub payout_breakdown: Vec<PayoutLineDto>,
    pub hands_played_this_level: u32,
    pub hands_this_level: Option<u32>,
}

/// Место за столом.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SeatViewDto {
    pub seat_index: SeatIndex,
    pub player_id: Option<PlayerId>,
    pub display_name: Option<String>,
    pub stack: Option<Chips>,
}

/// DTO турнирного стола.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TableViewDto {
    pub table_id: TableId,
    pub is_active: bool,
    pub hands_played_at_this_level: u32,
    pub seated_count: usize,
    pub seats: Vec<SeatViewDto>,
}

/// Строка таблицы результатов.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StandingDto {
    pub player_id: PlayerId,
    pub display_name: String,
    pub stack: Chips,
    pub busted: bool,
    pub finish_place: Option<u32>,
    pub payout: Option<Chips>,
    pub table_id: Option<TableId>,
    pub seat_index: Option<SeatIndex>,
}

/// Минимальное представление турнира (для лобби).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TournamentViewDto {
    pub tournament_id: String,
    pub name: String,
    pub current_level: u32,
    pub players_remaining: u32,
    pub total_players: u32,
    pub tables_running: u32,
    pub is_finished: bool,
    pub champion_id: Option<PlayerId>,
}
