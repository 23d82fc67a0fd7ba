use crate::domain::player::Entrant;
use crate::domain::tournament::TournamentConfig;
use crate::domain::PlayerId;

/// Id героя в турнире.
pub const HERO_PLAYER_ID: &str = "hero-player";

/// Id CPU-соперника по номеру (1-based): "cpu-1", "cpu-2", ...
pub fn cpu_player_id(n: usize) -> PlayerId {
    format!("cpu-{n}")
}

/// Собрать состав турнира: герой + CPU на все оставшиеся места.
///
/// Всего участников = tables * seats_per_table (после нормализации конфига).
pub fn build_entrants(config: &TournamentConfig, hero_name: Option<&str>) -> Vec<Entrant> {
    let total = config.clone().normalized().total_seats();
    (0..total)
        .map(|idx| {
            if idx == 0 {
                Entrant::new(HERO_PLAYER_ID, hero_name.unwrap_or("You"))
            } else {
                Entrant::new(cpu_player_id(idx), format!("CPU {}", idx + 1))
            }
        })
        .collect()
}
