use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::hand::{HandSource, HandSummary, SeatResult};
use crate::domain::tournament::{Placement, TournamentConfig, TournamentError, TournamentState};
use crate::domain::{HandIndex, PlayerId, SeatIndex, TableId};
use crate::tournament::events::{TournamentEvent, TournamentObserver};

/// Строка результата места в реплее.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReplaySeatResult {
    pub player_id: PlayerId,
    pub seat_index: SeatIndex,
    pub start_stack: Chips,
    pub end_stack: Chips,
    /// Был стек, стал ноль.
    pub busted_this_hand: bool,
}

impl From<&SeatResult> for ReplaySeatResult {
    fn from(result: &SeatResult) -> Self {
        // Без стартового стека реплей считает его нулём.
        let start_stack = result.reported_starting_stack().unwrap_or(Chips::ZERO);
        let end_stack = result.resulting_stack();
        Self {
            player_id: result.player_id.clone(),
            seat_index: result.seat_index,
            start_stack,
            end_stack,
            busted_this_hand: !start_stack.is_zero() && end_stack.is_zero(),
        }
    }
}

/// Одна записанная раздача.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReplayHand {
    pub hand_id: Option<String>,
    pub table_id: TableId,
    pub source: HandSource,
    pub hand_index: Option<HandIndex>,
    pub seat_results: Vec<ReplaySeatResult>,
}

impl ReplayHand {
    fn from_summary(table_id: &str, summary: &HandSummary) -> Self {
        Self {
            hand_id: summary.hand_id.clone(),
            table_id: table_id.to_string(),
            source: summary.source,
            hand_index: summary.hand_index,
            seat_results: summary.seat_results.iter().map(ReplaySeatResult::from).collect(),
        }
    }
}

/// Финал турнира в реплее.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReplayFinalState {
    pub champion_id: Option<PlayerId>,
    pub players_remaining: u32,
    pub placements: Vec<Placement>,
}

/// Запись всего турнира: конфиг, каждая раздача, итоговые места.
///
/// Подключается как наблюдатель ко всем переходам турнира.
/// Сам турнир ничего не пишет на диск: сохранение остаётся за вызывающим.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TournamentReplay {
    pub config: TournamentConfig,
    pub hands: Vec<ReplayHand>,
    pub final_state: Option<ReplayFinalState>,
}

impl TournamentReplay {
    pub fn new(config: &TournamentConfig) -> Self {
        Self {
            config: config.clone(),
            hands: Vec::new(),
            final_state: None,
        }
    }

    pub fn record_hand(&mut self, table_id: &str, summary: &HandSummary) {
        self.hands.push(ReplayHand::from_summary(table_id, summary));
    }

    /// Зафиксировать финал по состоянию турнира.
    pub fn finalize(&mut self, state: &TournamentState) {
        self.final_state = Some(ReplayFinalState {
            champion_id: state.champion_id.clone(),
            players_remaining: state.players_remaining,
            placements: state.placements(),
        });
    }

    pub fn is_finalized(&self) -> bool {
        self.final_state.is_some()
    }

    pub fn hands_from(&self, source: HandSource) -> impl Iterator<Item = &ReplayHand> {
        self.hands.iter().filter(move |h| h.source == source)
    }

    pub fn to_json(&self) -> Result<String, TournamentError> {
        serde_json::to_string(self).map_err(|e| TournamentError::Json(e.to_string()))
    }

    pub fn from_json(raw: &str) -> Result<Self, TournamentError> {
        serde_json::from_str(raw).map_err(|e| TournamentError::Json(e.to_string()))
    }
}

impl TournamentObserver for TournamentReplay {
    fn on_event(&mut self, event: &TournamentEvent) {
        match event {
            TournamentEvent::HandCompleted { table_id, summary } => {
                self.record_hand(table_id, summary);
            }
            TournamentEvent::TournamentFinished {
                champion_id,
                placements,
                ..
            } => {
                let players_remaining = u32::from(champion_id.is_some());
                self.final_state = Some(ReplayFinalState {
                    champion_id: champion_id.clone(),
                    players_remaining,
                    placements: placements.clone(),
                });
            }
            _ => {}
        }
    }
}
