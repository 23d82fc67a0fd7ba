use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::{HandIndex, PlayerId, SeatIndex};

/// Откуда пришла раздача.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HandSource {
    /// Стол героя: настоящая раздача из движка стола.
    #[default]
    Hero,
    /// Фоновый стол: синтетический исход.
    Cpu,
}

/// Результат одного места после раздачи.
///
/// Стеки приходят "как есть" от движка стола и нормализуются
/// уже внутри турнира (минус/NaN → 0, дробная часть отбрасывается).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeatResult {
    pub seat_index: SeatIndex,
    pub player_id: PlayerId,
    /// Стек после раздачи (снимок, не дельта).
    pub stack: f64,
    /// Стек на начало раздачи. Если нет, берётся текущий стек игрока.
    #[serde(default)]
    pub starting_stack: Option<f64>,
}

impl SeatResult {
    pub fn new(seat_index: SeatIndex, player_id: impl Into<PlayerId>, stack: Chips) -> Self {
        Self {
            seat_index,
            player_id: player_id.into(),
            stack: stack.0 as f64,
            starting_stack: None,
        }
    }

    pub fn with_starting_stack(mut self, starting_stack: Chips) -> Self {
        self.starting_stack = Some(starting_stack.0 as f64);
        self
    }

    pub fn resulting_stack(&self) -> Chips {
        Chips::from_reported(self.stack)
    }

    /// Стартовый стек, если он был передан и это конечное число.
    pub fn reported_starting_stack(&self) -> Option<Chips> {
        self.starting_stack
            .filter(|raw| raw.is_finite())
            .map(Chips::from_reported)
    }
}

/// Итог раздачи за одним столом.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HandSummary {
    #[serde(default)]
    pub hand_index: Option<HandIndex>,
    #[serde(default)]
    pub hand_id: Option<String>,
    #[serde(default)]
    pub source: HandSource,
    #[serde(default)]
    pub seat_results: Vec<SeatResult>,
}

impl HandSummary {
    pub fn new(hand_index: Option<HandIndex>, seat_results: Vec<SeatResult>) -> Self {
        Self {
            hand_index,
            hand_id: None,
            source: HandSource::Hero,
            seat_results,
        }
    }

    /// Раздача без изменений стеков (только счётчик раздач).
    pub fn empty() -> Self {
        Self::default()
    }
}
