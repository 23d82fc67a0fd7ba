use serde::Serialize;

use crate::domain::blinds::BlindLevel;
use crate::domain::chips::Chips;
use crate::domain::hand::HandSummary;
use crate::domain::tournament::Placement;
use crate::domain::{HandIndex, PlayerId, TableId};
use crate::tournament::rebalance::RebalanceMove;

/// Что произошло в турнире за один переход состояния.
///
/// События копятся внутри перехода и отдаются наблюдателю
/// только если переход завершился успешно.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TournamentEvent {
    /// Турнир создан и все участники рассажены.
    Seated { players: usize, tables: usize },

    /// Итог раздачи, который пришёл в турнир (с любого стола).
    HandCompleted {
        table_id: TableId,
        summary: HandSummary,
    },

    /// Игрок вылетел и получил место.
    PlayerBusted {
        player_id: PlayerId,
        table_id: TableId,
        finish_place: u32,
        players_remaining: u32,
        hand_index: Option<HandIndex>,
    },

    LevelAdvanced {
        from: usize,
        to: usize,
        level: BlindLevel,
    },

    /// Пересадка после раздачи (столы могли сломаться).
    TablesRebalanced {
        players_remaining: u32,
        active_tables: usize,
        target_tables: usize,
        moves: Vec<RebalanceMove>,
    },

    /// Синтетическая раздача фонового стола, до её применения.
    HandSimulated {
        table_id: TableId,
        summary: HandSummary,
        winner_id: PlayerId,
        total_winnings: Chips,
    },

    TournamentFinished {
        champion_id: Option<PlayerId>,
        finish_order: Vec<PlayerId>,
        placements: Vec<Placement>,
    },
}

/// Наблюдатель за турниром: логи, реплей, HUD-анимации.
pub trait TournamentObserver {
    fn on_event(&mut self, event: &TournamentEvent);
}

/// Наблюдатель, который всё выбрасывает.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl TournamentObserver for NullObserver {
    fn on_event(&mut self, _event: &TournamentEvent) {}
}

/// Наблюдатель, который просто складывает события в список.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    pub events: Vec<TournamentEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn busts(&self) -> impl Iterator<Item = &TournamentEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, TournamentEvent::PlayerBusted { .. }))
    }
}

impl TournamentObserver for EventLog {
    fn on_event(&mut self, event: &TournamentEvent) {
        self.events.push(event.clone());
    }
}

/// Отдать накопленные события наблюдателю.
pub(crate) fn flush(events: Vec<TournamentEvent>, observer: &mut dyn TournamentObserver) {
    for event in &events {
        observer.on_event(event);
    }
}
