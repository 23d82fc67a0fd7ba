//! Доменная модель турнира: фишки, уровни, выплаты, игроки, столы, итоги раздач.

pub mod blinds;
pub mod chips;
pub mod hand;
pub mod payouts;
pub mod player;
pub mod table;
pub mod tournament;

// Внешние id строковые: tie-break везде лексикографический.
pub type PlayerId = String;
pub type TableId = String;
pub type SeatIndex = u8;
pub type HandIndex = u64;

pub use blinds::*;
pub use chips::*;
pub use hand::*;
pub use payouts::*;
pub use player::*;
pub use table::*;
pub use tournament::*;
