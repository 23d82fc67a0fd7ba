use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::{HandIndex, PlayerId, SeatIndex, TableId};

/// Участник из лобби/регистрации: только внешний id и имя.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entrant {
    pub id: PlayerId,
    pub name: String,
}

impl Entrant {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Игрок внутри турнира.
///
/// Меняется только через переходы состояния турнира.
/// `busted` монотонен: после вылета стек и флаг больше не трогаются.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TournamentPlayer {
    pub id: PlayerId,
    pub name: String,
    pub starting_stack: Chips,
    /// Текущий стек.
    pub stack: Chips,
    pub busted: bool,
    /// Номер раздачи, в которой игрок вылетел.
    pub bust_hand_index: Option<HandIndex>,
    /// Итоговое место (1 = победитель, N = первый вылет).
    pub finish_place: Option<u32>,
    /// Выплата; `None`, пока призовые не считались.
    pub payout: Option<Chips>,
    /// Где сидит сейчас (None после вылета).
    pub table_id: Option<TableId>,
    pub seat_index: Option<SeatIndex>,
}

impl TournamentPlayer {
    pub fn new(entrant: &Entrant, starting_stack: Chips) -> Self {
        Self {
            id: entrant.id.clone(),
            name: entrant.name.clone(),
            starting_stack,
            stack: starting_stack,
            busted: false,
            bust_hand_index: None,
            finish_place: None,
            payout: None,
            table_id: None,
            seat_index: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.busted
    }

    pub fn is_seated_at(&self, table_id: &str) -> bool {
        self.table_id.as_deref() == Some(table_id)
    }
}
