//! Combat Sim - A scripted arena demonstrating enemy_core
//!
//! This binary shows:
//! - Loading enemy/projectile templates and combat constants from TOML
//! - Spawning enemies into an in-memory world
//! - Projectile fire with secondary effects, leech and bleeding
//! - Death notification and kill credit
//!
//! Usage: `combat_sim [config_dir] [seed]`

mod arena;

use arena::Arena;
use enemy_core::prelude::*;
use enemy_core::ConfigError;
use std::path::{Path, PathBuf};

const DEFAULT_SEED: u64 = 42;
const MAX_STEPS: u32 = 600;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        tracing::error!(error = %e, "combat sim failed");
        std::process::exit(1);
    }
}

fn run() -> Result<(), ConfigError> {
    let mut args = std::env::args().skip(1);
    let config_dir = match args.next() {
        Some(dir) => PathBuf::from(dir),
        None => find_config_dir()?,
    };
    let seed = match args.next() {
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::ValidationError(format!("seed '{}' is not a number", raw)))?,
        None => DEFAULT_SEED,
    };

    let store = TemplateStore::load(&config_dir.join("templates.toml"))?;
    let constants = CombatConstants::load(&config_dir.join("constants.toml"))?;
    tracing::info!(config = %config_dir.display(), seed, "config loaded");

    let player = PlayerState::new(ObjectId(1000), 700, 250)
        .with_resources(420, 180)
        .with_steal(StealRates::new(0.34, 2.0));
    let mut arena = Arena::new(store, constants, player, seed);

    let spawns = [
        ("Sand Crab", Position::new(3.0, 1.0)),
        ("Sand Crab", Position::new(6.0, -2.0)),
        ("Sand Tomb", Position::new(1.0, 1.0)),
        ("Tomb Warden", Position::new(12.0, 4.0)),
    ];
    for (name, position) in spawns {
        if arena.spawn(name, position).is_none() {
            return Err(ConfigError::ValidationError(format!("no enemy template named '{}'", name)));
        }
    }

    // Open on the warden with a stasis attempt that its immunity rejects
    if let Some(warden) = arena.enemies.iter().find(|e| e.template().stasis_immune).map(|e| e.id()) {
        let stasis = ConditionEffect::new(ConditionEffectKind::Stasis, 3000);
        let dealt = arena.strike(warden, 150, &[stasis]);
        tracing::info!(?dealt, "opening strike on the warden");
    }

    let report = arena.run("Serrated Arrow", MAX_STEPS);
    print_report(&arena, &report);
    Ok(())
}

/// Look for the config directory relative to the usual working directories
fn find_config_dir() -> Result<PathBuf, ConfigError> {
    let candidates = ["combat_sim/config", "config"];
    candidates
        .iter()
        .map(Path::new)
        .find(|path| path.join("templates.toml").exists())
        .map(Path::to_path_buf)
        .ok_or_else(|| {
            ConfigError::ValidationError(format!(
                "could not find a config directory (looked in {})",
                candidates.join(", ")
            ))
        })
}

fn print_report(arena: &Arena, report: &arena::ArenaReport) {
    println!("Steps: {} ({} ms)", report.steps, arena.time.total_elapsed_ms);
    println!(
        "Shots: {} fired, {} accepted, {} damage dealt",
        report.shots, report.accepted_hits, report.damage_dealt
    );
    println!("Bleeding: {} HP", report.hp_bled);
    println!(
        "Player: {}/{} HP, {}/{} MP ({} life stolen)",
        arena.player.hp, arena.player.max_hp, arena.player.mp, arena.player.max_mp, report.life_stolen
    );
    println!("Broadcasts queued: {}", report.broadcasts);

    for death in &report.deaths {
        let credit = death.kill_credit.as_ref();
        println!(
            "  {} died at {} ms, top damager {:?}, last hit {:?}",
            death.enemy,
            death.time.total_elapsed_ms,
            credit.and_then(|c| c.top_damager()),
            credit.and_then(|c| c.last_hitter),
        );
    }

    for enemy in arena.enemies.iter().filter(|e| e.in_world()) {
        println!(
            "  {} ({}) still standing at {}/{} HP",
            enemy.id(),
            enemy.template().name,
            enemy.hp(),
            enemy.max_hp()
        );
    }
}
