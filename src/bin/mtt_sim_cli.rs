// src/bin/mtt_sim_cli.rs

use std::env;
use std::fs;
use std::process::ExitCode;

use badugi_mtt::api::{build_hud_payload, build_standings};
use badugi_mtt::domain::TournamentConfig;
use badugi_mtt::infra::{build_entrants, seat_draw, DeterministicRng, HERO_PLAYER_ID};
use badugi_mtt::tournament::{
    create_tournament_state, simulate_background_tables_observed, BackgroundOptions,
    TournamentEvent, TournamentObserver, TournamentReplay,
};

/// Сколько раз максимум гоняем фоновые столы, прежде чем сдаться.
const MAX_ROUNDS: usize = 10_000;

/// Печатает ключевые события турнира в консоль и пишет реплей.
struct ConsoleObserver {
    replay: TournamentReplay,
}

impl TournamentObserver for ConsoleObserver {
    fn on_event(&mut self, event: &TournamentEvent) {
        match event {
            TournamentEvent::PlayerBusted {
                player_id,
                finish_place,
                players_remaining,
                ..
            } => {
                println!(
                    "  BUST   {player_id:<12} place {finish_place:>3}  (remaining {players_remaining})"
                );
            }
            TournamentEvent::LevelAdvanced { level, .. } => {
                println!("  LEVEL  {}", level.label());
            }
            TournamentEvent::TablesRebalanced {
                active_tables,
                moves,
                ..
            } => {
                println!("  BREAK  {active_tables} table(s) active, {} move(s)", moves.len());
            }
            _ => {}
        }
        self.replay.on_event(event);
    }
}

fn parse_args() -> Result<(Option<String>, Option<u64>), String> {
    let mut config_path = None;
    let mut seed = None;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--seed" {
            let raw = args.next().ok_or("--seed needs a value")?;
            seed = Some(raw.parse::<u64>().map_err(|e| format!("bad seed: {e}"))?);
        } else {
            config_path = Some(arg);
        }
    }
    Ok((config_path, seed))
}

fn main() -> ExitCode {
    println!("mtt_sim_cli: прогоняем турнир фоновой симуляцией…");

    let (config_path, seed) = match parse_args() {
        Ok(v) => v,
        Err(err) => {
            eprintln!("usage: mtt_sim_cli [config.json] [--seed N]: {err}");
            return ExitCode::FAILURE;
        }
    };

    // 1. Конфиг: из файла или "магазинный" по умолчанию.
    let config = match config_path {
        Some(path) => match fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|raw| TournamentConfig::from_json(&raw).map_err(|e| e.to_string()))
        {
            Ok(cfg) => cfg,
            Err(err) => {
                eprintln!("cannot load config {path}: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => TournamentConfig::store_default(),
    };

    // 2. Состав и жеребьёвка.
    let mut entrants = build_entrants(&config, None);
    if let Some(seed) = seed {
        entrants = seat_draw(&entrants, &mut DeterministicRng::from_seed(seed));
    }

    let mut state = match create_tournament_state(config, &entrants) {
        Ok(s) => s,
        Err(err) => {
            eprintln!("cannot create tournament: {err}");
            return ExitCode::FAILURE;
        }
    };
    let mut observer = ConsoleObserver {
        replay: TournamentReplay::new(&state.config),
    };

    println!(
        "================ {} : {} entrants, {} tables =================",
        state.config.name,
        state.total_players,
        state.tables.len()
    );

    // 3. Гоняем все столы, включая стол героя: герой тут тоже CPU.
    let options = BackgroundOptions::with_hands(3);
    let mut rounds = 0;
    while !state.is_finished && rounds < MAX_ROUNDS {
        state = match simulate_background_tables_observed(&state, None, &options, &mut observer)
        {
            Ok(next) => next,
            Err(err) => {
                eprintln!("simulation failed: {err}");
                return ExitCode::FAILURE;
            }
        };
        rounds += 1;
    }

    let hud = build_hud_payload(&state, Some(HERO_PLAYER_ID), None);
    println!();
    println!("{}  |  {}", hud.level_label, hud.players_remaining_text);
    println!("Prize pool: {}", hud.prize_pool_total);
    println!();
    println!("================ STANDINGS =================");
    for row in build_standings(&state) {
        println!(
            "{:>3}. {:<12} {:<10} stack {:>6}  payout {:>6}",
            row.finish_place.map(|p| p.to_string()).unwrap_or_else(|| "-".into()),
            row.player_id,
            row.display_name,
            row.stack,
            row.payout.map(|c| c.to_string()).unwrap_or_else(|| "-".into()),
        );
    }
    println!(
        "\nrounds: {rounds}, hands recorded: {}",
        observer.replay.hands.len()
    );

    if state.is_finished {
        ExitCode::SUCCESS
    } else {
        eprintln!("tournament did not finish after {MAX_ROUNDS} rounds");
        ExitCode::FAILURE
    }
}
