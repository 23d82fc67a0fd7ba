use serde::{Deserialize, Serialize};

use crate::domain::tournament::TournamentError;
use crate::domain::{PlayerId, TableId};

/// Ошибки внешнего API (то, что отдаём фронту / клиенту).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ApiError {
    /// Неправильные входные данные (например, битый JSON).
    BadRequest(String),

    /// Стол не найден.
    TableNotFound(TableId),

    /// Игрок не найден в турнире.
    PlayerNotFound(PlayerId),

    /// Ошибка турнирного движка.
    TournamentError(String),
}

impl From<TournamentError> for ApiError {
    fn from(err: TournamentError) -> Self {
        match err {
            TournamentError::UnknownTable { table_id } => ApiError::TableNotFound(table_id),
            TournamentError::Json(msg) => ApiError::BadRequest(msg),
            other => ApiError::TournamentError(other.to_string()),
        }
    }
}
