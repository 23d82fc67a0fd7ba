use serde::{Deserialize, Serialize};

use crate::domain::hand::HandSummary;
use crate::domain::tournament::TournamentState;
use crate::domain::TableId;
use crate::tournament::{
    compute_payouts, on_table_hand_completed_observed, rebalance_tables_observed,
    simulate_background_tables_observed, BackgroundOptions, TournamentObserver,
};

use super::errors::ApiError;

/// Команда верхнего уровня: всё, что меняет состояние турнира.
///
/// Команды приходят от клиента (стол героя, фоновый таймер)
/// строго по одной; каждая возвращает новый снимок турнира.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Command {
    /// Раздача за столом завершилась.
    #[serde(rename_all = "camelCase")]
    HandCompleted {
        table_id: TableId,
        summary: HandSummary,
    },

    /// Прогнать фоновые столы.
    #[serde(rename_all = "camelCase")]
    SimulateBackground {
        hero_table_id: Option<TableId>,
        #[serde(default = "default_hands")]
        max_hands_per_table: u32,
        #[serde(default)]
        exclude_table_ids: Vec<TableId>,
    },

    /// Принудительная ребалансировка (обычно не нужна: идёт после каждой раздачи).
    Rebalance,

    /// Пересчитать выплаты.
    ComputePayouts,
}

fn default_hands() -> u32 {
    1
}

impl Command {
    pub fn from_json(raw: &str) -> Result<Self, ApiError> {
        serde_json::from_str(raw).map_err(|e| ApiError::BadRequest(e.to_string()))
    }
}

/// Применить команду к снимку турнира.
pub fn apply_command(
    state: &TournamentState,
    command: &Command,
    observer: &mut dyn TournamentObserver,
) -> Result<TournamentState, ApiError> {
    let next = match command {
        Command::HandCompleted { table_id, summary } => {
            on_table_hand_completed_observed(state, table_id, summary, observer)?
        }
        Command::SimulateBackground {
            hero_table_id,
            max_hands_per_table,
            exclude_table_ids,
        } => {
            let options = BackgroundOptions {
                max_hands_per_table: *max_hands_per_table,
                exclude_table_ids: exclude_table_ids.clone(),
            };
            simulate_background_tables_observed(
                state,
                hero_table_id.as_deref(),
                &options,
                observer,
            )?
        }
        Command::Rebalance => rebalance_tables_observed(state, observer)?,
        Command::ComputePayouts => compute_payouts(state),
    };
    Ok(next)
}
