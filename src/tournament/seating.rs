// src/tournament/seating.rs

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::domain::player::{Entrant, TournamentPlayer};
use crate::domain::table::{table_id_for, TournamentTable};
use crate::domain::tournament::{TournamentConfig, TournamentError, TournamentState};
use crate::domain::{PlayerId, SeatIndex};
use crate::tournament::events::{flush, NullObserver, TournamentEvent, TournamentObserver};

/// Создать турнир и рассадить участников.
///
/// Рассадка по кругу: участник `i` идёт за стол `i % tables`,
/// на место `(i / tables) % seats_per_table`. Если место вдруг занято,
/// берём первое свободное место за этим столом.
pub fn create_tournament_state(
    config: TournamentConfig,
    entrants: &[Entrant],
) -> Result<TournamentState, TournamentError> {
    create_tournament_state_observed(config, entrants, &mut NullObserver)
}

pub fn create_tournament_state_observed(
    config: TournamentConfig,
    entrants: &[Entrant],
    observer: &mut dyn TournamentObserver,
) -> Result<TournamentState, TournamentError> {
    let config = config.normalized();
    config.validate()?;

    let table_count = config.table_count();
    let seats_per_table = config.seats_per_table();

    if entrants.len() > config.total_seats() {
        return Err(TournamentError::NotEnoughSeats {
            entrants: entrants.len(),
            seats: config.total_seats(),
        });
    }

    let mut tables: Vec<TournamentTable> = (0..table_count)
        .map(|idx| TournamentTable::new(table_id_for(idx), seats_per_table))
        .collect();
    let mut players: BTreeMap<PlayerId, TournamentPlayer> = BTreeMap::new();

    for (idx, entrant) in entrants.iter().enumerate() {
        let entrant = normalize_entrant(entrant, idx);
        if players.contains_key(&entrant.id) {
            return Err(TournamentError::InvalidConfig(format!(
                "duplicate entrant id {}",
                entrant.id
            )));
        }

        let mut player = TournamentPlayer::new(&entrant, config.starting_stack);
        let table = &mut tables[idx % table_count];
        let nominal = ((idx / table_count) % seats_per_table) as SeatIndex;

        let seat_index = if table.is_seat_empty(nominal) {
            nominal
        } else {
            table
                .first_open_seat()
                .ok_or(TournamentError::NotEnoughSeats {
                    entrants: entrants.len(),
                    seats: table_count * seats_per_table,
                })?
        };

        table.seats[seat_index as usize].player_id = Some(player.id.clone());
        player.table_id = Some(table.table_id.clone());
        player.seat_index = Some(seat_index);

        trace!(
            player_id = %player.id,
            table_id = %table.table_id,
            seat_index,
            "entrant seated"
        );
        players.insert(player.id.clone(), player);
    }

    let total = entrants.len() as u32;
    debug!(
        tournament = %config.id,
        entrants = total,
        tables = table_count,
        seats_per_table,
        "tournament created"
    );

    let state = TournamentState {
        config,
        level_index: 0,
        tables,
        players,
        total_players: total,
        players_remaining: total,
        is_finished: false,
        champion_id: None,
        finish_order: Vec::new(),
        abstract_hand_counter: 0,
    };

    flush(
        vec![TournamentEvent::Seated {
            players: entrants.len(),
            tables: table_count,
        }],
        observer,
    );
    Ok(state)
}

/// Пустой id → "player-{n}", пустое имя → id.
fn normalize_entrant(entrant: &Entrant, idx: usize) -> Entrant {
    let id = if entrant.id.trim().is_empty() {
        format!("player-{}", idx + 1)
    } else {
        entrant.id.clone()
    };
    let name = if entrant.name.trim().is_empty() {
        id.clone()
    } else {
        entrant.name.clone()
    };
    Entrant { id, name }
}
