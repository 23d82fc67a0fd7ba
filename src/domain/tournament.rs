// src/domain/tournament.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::domain::blinds::{BlindLevel, BlindStructure};
use crate::domain::chips::Chips;
use crate::domain::payouts::PayoutStructure;
use crate::domain::player::TournamentPlayer;
use crate::domain::table::TournamentTable;
use crate::domain::{PlayerId, TableId};

pub const DEFAULT_SEATS_PER_TABLE: u8 = 6;
pub const DEFAULT_TABLE_COUNT: u32 = 1;
pub const DEFAULT_STARTING_STACK: Chips = Chips(1);

fn default_tables() -> u32 {
    DEFAULT_TABLE_COUNT
}

fn default_seats_per_table() -> u8 {
    DEFAULT_SEATS_PER_TABLE
}

fn default_starting_stack() -> Chips {
    DEFAULT_STARTING_STACK
}

/// Размер из клиентского JSON: число или строка с числом.
/// Дробная часть отбрасывается, сверху значение упирается в `max`.
/// Всё, что меньше 1, не число или не конечно, даёт `None`.
fn lenient_size(value: serde_json::Value, max: u64) -> Option<u64> {
    let raw = match value {
        serde_json::Value::Number(n) => n.as_f64()?,
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !raw.is_finite() || raw < 1.0 {
        return None;
    }
    let floored = raw.floor();
    if floored >= max as f64 {
        Some(max)
    } else {
        Some(floored as u64)
    }
}

fn lenient_tables<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(lenient_size(value, u64::from(u32::MAX))
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(DEFAULT_TABLE_COUNT))
}

fn lenient_seats<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(lenient_size(value, u64::from(u8::MAX))
        .and_then(|n| u8::try_from(n).ok())
        .unwrap_or(DEFAULT_SEATS_PER_TABLE))
}

fn lenient_stack<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Chips, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(lenient_size(value, u64::MAX).map_or(DEFAULT_STARTING_STACK, Chips))
}

/// Конфигурация турнира.
/// Формат полей совпадает с JSON-конфигом клиента (camelCase).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TournamentConfig {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Сколько столов в начале турнира. Больше этого числа столов не бывает никогда.
    /// Размеры и стек из JSON принимаются мягко: отрицательные, дробные
    /// и нечисловые значения приводятся к целому >= 1.
    #[serde(default = "default_tables", deserialize_with = "lenient_tables")]
    pub tables: u32,
    #[serde(
        default = "default_seats_per_table",
        deserialize_with = "lenient_seats"
    )]
    pub seats_per_table: u8,
    #[serde(
        default = "default_starting_stack",
        deserialize_with = "lenient_stack"
    )]
    pub starting_stack: Chips,
    #[serde(default)]
    pub levels: BlindStructure,
    #[serde(default)]
    pub payouts: PayoutStructure,
}

impl TournamentConfig {
    /// "Магазинный" турнир: 3 стола по 6 мест, стек 500, призовые 50/30/20.
    pub fn store_default() -> Self {
        Self {
            id: "store-mtt".into(),
            name: "Store Tournament".into(),
            tables: 3,
            seats_per_table: 6,
            starting_stack: Chips::new(500),
            levels: BlindStructure::store_default(),
            payouts: PayoutStructure::top_three(),
        }
    }

    /// Разбор конфига из JSON. `null` означает отсутствующий конфиг.
    pub fn from_json(raw: &str) -> Result<Self, TournamentError> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| TournamentError::Json(e.to_string()))?;
        if value.is_null() {
            return Err(TournamentError::MissingConfig);
        }
        serde_json::from_value(value).map_err(|e| TournamentError::Json(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, TournamentError> {
        serde_json::to_string_pretty(self).map_err(|e| TournamentError::Json(e.to_string()))
    }

    /// Нули заменяются значениями по умолчанию: все размеры >= 1.
    pub fn normalized(mut self) -> Self {
        if self.tables == 0 {
            self.tables = DEFAULT_TABLE_COUNT;
        }
        if self.seats_per_table == 0 {
            self.seats_per_table = DEFAULT_SEATS_PER_TABLE;
        }
        if self.starting_stack.is_zero() {
            self.starting_stack = DEFAULT_STARTING_STACK;
        }
        self
    }

    pub fn validate(&self) -> Result<(), TournamentError> {
        self.payouts
            .validate()
            .map_err(TournamentError::InvalidConfig)
    }

    pub fn table_count(&self) -> usize {
        self.tables as usize
    }

    pub fn seats_per_table(&self) -> usize {
        self.seats_per_table as usize
    }

    pub fn total_seats(&self) -> usize {
        self.table_count() * self.seats_per_table()
    }
}

/// Итоговое место игрока (для реплея / экрана результатов).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub player_id: PlayerId,
    pub place: u32,
    pub payout: Chips,
}

/// Состояние турнира целиком.
///
/// Переходы никогда не меняют состояние на месте: каждый возвращает
/// новый снимок, а вызывающий обязан заменить им старый.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TournamentState {
    pub config: TournamentConfig,
    /// 0-based указатель в `config.levels`.
    pub level_index: usize,
    pub tables: Vec<TournamentTable>,
    pub players: BTreeMap<PlayerId, TournamentPlayer>,
    pub total_players: u32,
    pub players_remaining: u32,
    pub is_finished: bool,
    pub champion_id: Option<PlayerId>,
    /// Id игроков в порядке вылета.
    pub finish_order: Vec<PlayerId>,
    /// Счётчик синтетических раздач фоновых столов.
    pub abstract_hand_counter: u64,
}

impl TournamentState {
    /// Текущий уровень блайндов.
    pub fn current_level(&self) -> Option<&BlindLevel> {
        self.config.levels.level_at(self.level_index)
    }

    pub fn next_level(&self) -> Option<&BlindLevel> {
        self.config.levels.next_after(self.level_index)
    }

    pub fn table(&self, table_id: &str) -> Option<&TournamentTable> {
        self.tables.iter().find(|t| t.table_id == table_id)
    }

    pub(crate) fn table_position(&self, table_id: &str) -> Option<usize> {
        self.tables.iter().position(|t| t.table_id == table_id)
    }

    pub fn active_tables(&self) -> impl Iterator<Item = &TournamentTable> {
        self.tables.iter().filter(|t| t.is_active)
    }

    pub fn active_table_count(&self) -> usize {
        self.active_tables().count()
    }

    pub fn player(&self, player_id: &str) -> Option<&TournamentPlayer> {
        self.players.get(player_id)
    }

    /// Невылетевшие игроки (в порядке id).
    pub fn alive_players(&self) -> impl Iterator<Item = &TournamentPlayer> {
        self.players.values().filter(|p| p.is_alive())
    }

    /// Живые игроки за конкретным столом, в порядке мест.
    pub fn live_players_at(&self, table_id: &str) -> Vec<&TournamentPlayer> {
        self.table(table_id)
            .map(|table| {
                table
                    .occupants()
                    .filter_map(|id| self.players.get(id))
                    .filter(|p| p.is_alive())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Фишки в игре у живых игроков.
    pub fn chips_in_play(&self) -> Chips {
        self.alive_players().map(|p| p.stack).sum()
    }

    /// Призовой фонд: каждый участник "заплатил" один стартовый стек.
    pub fn prize_pool(&self) -> Chips {
        Chips(u64::from(self.total_players).saturating_mul(self.config.starting_stack.0))
    }

    /// Итоговые места в порядке 1, 2, 3, ...
    /// Игроки без места (турнир не закончен) не попадают в список.
    pub fn placements(&self) -> Vec<Placement> {
        let mut res: Vec<Placement> = self
            .players
            .values()
            .filter_map(|p| {
                p.finish_place.map(|place| Placement {
                    player_id: p.id.clone(),
                    place,
                    payout: p.payout.unwrap_or(Chips::ZERO),
                })
            })
            .collect();
        res.sort_by(|a, b| a.place.cmp(&b.place).then_with(|| a.player_id.cmp(&b.player_id)));
        res
    }
}

/// Ошибки турнира. Все фатальные: переход либо применяется целиком,
/// либо возвращает ошибку и старое состояние остаётся как было.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TournamentError {
    #[error("Tournament config is required")]
    MissingConfig,

    #[error("Invalid tournament config: {0}")]
    InvalidConfig(String),

    #[error("Not enough seats to place all entrants: {entrants} entrants, {seats} seats")]
    NotEnoughSeats { entrants: usize, seats: usize },

    #[error(
        "Not enough seats per table during rebalance: {players} players, {tables} tables x {seats_per_table} seats"
    )]
    RebalanceOverflow {
        players: usize,
        tables: usize,
        seats_per_table: usize,
    },

    #[error("Unknown tableId {table_id}")]
    UnknownTable { table_id: TableId },

    #[error("JSON error: {0}")]
    Json(String),
}
