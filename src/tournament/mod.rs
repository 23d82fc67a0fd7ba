// src/tournament/mod.rs

pub mod background;
pub mod events;
pub mod hand_completion;
pub mod payouts;
pub mod rebalance;
pub mod replay;
pub mod seating;

pub use background::{
    simulate_background_tables, simulate_background_tables_observed, BackgroundOptions,
};
pub use events::{EventLog, NullObserver, TournamentEvent, TournamentObserver};
pub use hand_completion::{on_table_hand_completed, on_table_hand_completed_observed};
pub use payouts::compute_payouts;
pub use rebalance::{
    plan_rebalance, rebalance_tables, rebalance_tables_observed, target_table_count,
    RebalanceMove, RebalancePlan, TableOccupancy,
};
pub use replay::{ReplayFinalState, ReplayHand, ReplaySeatResult, TournamentReplay};
pub use seating::{create_tournament_state, create_tournament_state_observed};

use crate::domain::blinds::BlindLevel;
use crate::domain::tournament::TournamentState;

/// Текущий уровень блайндов (None, если уровней нет).
pub fn get_current_level(state: &TournamentState) -> Option<&BlindLevel> {
    state.current_level()
}
