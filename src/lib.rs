//! Движок мультистольного турнира (MTT) по бадуги.
//!
//! Здесь только чистые переходы состояния турнира:
//! рассадка, обработка завершённых раздач, вылеты и места,
//! уровни блайндов, ломка столов, призовые и фоновая симуляция
//! столов, за которыми не сидит герой.
//!
//! Раздача на одном столе (ставки, обмен карт, шоудаун) живёт снаружи
//! и приходит сюда только в виде `HandSummary`.

pub mod api;
pub mod domain;
pub mod infra;
pub mod tournament;

pub use domain::{
    BlindLevel, Chips, Entrant, HandSummary, PayoutRule, SeatResult, TournamentConfig,
    TournamentError, TournamentPlayer, TournamentState, TournamentTable,
};
pub use tournament::{
    compute_payouts, create_tournament_state, get_current_level, on_table_hand_completed,
    rebalance_tables, simulate_background_tables, BackgroundOptions, TournamentEvent,
    TournamentObserver,
};
