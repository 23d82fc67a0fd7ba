use serde::{Deserialize, Serialize};

use crate::domain::{PlayerId, SeatIndex, TableId};

/// Префикс идентификаторов столов: "table-1", "table-2", ...
pub const TABLE_ID_PREFIX: &str = "table";

/// Идентификатор стола по его позиции (0-based).
pub fn table_id_for(position: usize) -> TableId {
    format!("{}-{}", TABLE_ID_PREFIX, position + 1)
}

/// Место за столом.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub seat_index: SeatIndex,
    /// None: место пустое.
    pub player_id: Option<PlayerId>,
}

/// Турнирный стол: фиксированное число мест.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TournamentTable {
    pub table_id: TableId,
    /// Места за столом: индекс вектора = SeatIndex.
    pub seats: Vec<Seat>,
    /// false: стол сломан и пуст.
    pub is_active: bool,
    /// Сколько раздач стол сыграл на текущем уровне.
    pub hands_played_at_this_level: u32,
}

impl TournamentTable {
    /// Создать пустой активный стол.
    pub fn new(table_id: TableId, seats_per_table: usize) -> Self {
        let seats = (0..seats_per_table)
            .map(|idx| Seat {
                seat_index: idx as SeatIndex,
                player_id: None,
            })
            .collect();
        Self {
            table_id,
            seats,
            is_active: true,
            hands_played_at_this_level: 0,
        }
    }

    pub fn max_seats(&self) -> usize {
        self.seats.len()
    }

    pub fn seated_count(&self) -> usize {
        self.seats.iter().filter(|s| s.player_id.is_some()).count()
    }

    pub fn is_seat_empty(&self, index: SeatIndex) -> bool {
        self.seats
            .get(index as usize)
            .map(|s| s.player_id.is_none())
            .unwrap_or(true)
    }

    pub fn occupant(&self, index: SeatIndex) -> Option<&PlayerId> {
        self.seats
            .get(index as usize)
            .and_then(|s| s.player_id.as_ref())
    }

    pub fn first_open_seat(&self) -> Option<SeatIndex> {
        self.seats
            .iter()
            .find(|s| s.player_id.is_none())
            .map(|s| s.seat_index)
    }

    /// Id игроков в порядке мест.
    pub fn occupants(&self) -> impl Iterator<Item = &PlayerId> {
        self.seats.iter().filter_map(|s| s.player_id.as_ref())
    }
}
