//! Arena - One in-memory world stepped on a fixed clock

use enemy_core::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::{Arc, Mutex};

/// Milliseconds per arena step
pub const STEP_MS: i32 = 200;

/// A world, its enemies and one player shooting at them
pub struct Arena {
    pub world: LocalWorld,
    pub time: WorldTime,
    pub player: PlayerState,
    pub enemies: Vec<Enemy>,
    store: TemplateStore,
    constants: Arc<CombatConstants>,
    rng: ChaCha8Rng,
    next_id: i32,
    next_bullet: u8,
    deaths: Arc<Mutex<Vec<DeathEvent>>>,
}

/// Totals for one arena run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArenaReport {
    pub steps: u32,
    pub shots: u32,
    pub accepted_hits: u32,
    pub damage_dealt: i64,
    pub hp_bled: i64,
    pub life_stolen: i32,
    pub broadcasts: usize,
    pub deaths: Vec<DeathEvent>,
}

impl Arena {
    pub fn new(store: TemplateStore, constants: CombatConstants, player: PlayerState, seed: u64) -> Self {
        Arena {
            world: LocalWorld::new(WorldId(1)),
            time: WorldTime::default(),
            player,
            enemies: Vec::new(),
            store,
            constants: Arc::new(constants),
            rng: ChaCha8Rng::seed_from_u64(seed),
            next_id: 1,
            next_bullet: 0,
            deaths: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Spawn an enemy by template name. Returns its id, or None for an unknown name.
    pub fn spawn(&mut self, name: &str, position: Position) -> Option<ObjectId> {
        let template = self.store.enemy_by_name(name)?;
        let id = ObjectId(self.next_id);
        self.next_id += 1;

        let mut enemy = Enemy::new(id, template, Arc::clone(&self.constants), position);
        let deaths = Arc::clone(&self.deaths);
        enemy.add_death_listener(move |event: &DeathEvent| {
            if let Ok(mut deaths) = deaths.lock() {
                deaths.push(event.clone());
            }
        });
        enemy.enter_world(self.world.id());
        self.enemies.push(enemy);
        Some(id)
    }

    /// Advance the clock one step and tick every live enemy
    pub fn step(&mut self) -> i32 {
        self.time = self.time.advance(STEP_MS);
        let mut bled = 0;
        for enemy in self.enemies.iter_mut().filter(|e| e.in_world()) {
            let outcome = enemy.tick(&self.time);
            bled += outcome.bled;
            if !outcome.expired.is_empty() {
                tracing::debug!(enemy = %enemy.id(), expired = ?outcome.expired, "conditions expired");
            }
        }
        bled
    }

    /// Fire one projectile at an enemy
    pub fn shoot(&mut self, target: ObjectId, projectile: &str) -> Option<HitReport> {
        let desc = self.store.projectile(projectile)?;
        let enemy = self.enemies.iter_mut().find(|e| e.id() == target)?;

        let bullet = Projectile::fire(self.next_bullet, self.player.id, desc, &mut self.rng);
        self.next_bullet = self.next_bullet.wrapping_add(1);

        let mut ctx = CombatContext::new(&mut self.world, self.time, &mut self.rng);
        Some(enemy.projectile_damage_detailed(&mut ctx, &bullet, &mut self.player))
    }

    /// Swing at an enemy in melee range
    pub fn strike(&mut self, target: ObjectId, raw_damage: i32, effects: &[ConditionEffect]) -> Option<i32> {
        let attacker = self.player.id;
        let enemy = self.enemies.iter_mut().find(|e| e.id() == target)?;
        let mut ctx = CombatContext::new(&mut self.world, self.time, &mut self.rng);
        Some(enemy.direct_damage(&mut ctx, attacker, raw_damage, false, effects))
    }

    /// Closest live, damageable enemy to the player's position
    pub fn nearest_target(&self, from: Position) -> Option<ObjectId> {
        self.enemies
            .iter()
            .filter(|e| e.in_world() && !e.is_static())
            .min_by(|a, b| {
                a.position()
                    .distance_to(&from)
                    .total_cmp(&b.position().distance_to(&from))
            })
            .map(|e| e.id())
    }

    /// Shoot the nearest enemy every step until everything is dead or `max_steps` pass
    pub fn run(&mut self, projectile: &str, max_steps: u32) -> ArenaReport {
        let mut report = ArenaReport::default();
        let origin = Position::default();

        while report.steps < max_steps {
            report.steps += 1;
            report.hp_bled += i64::from(self.step());

            let Some(target) = self.nearest_target(origin) else {
                break;
            };
            let Some(hit) = self.shoot(target, projectile) else {
                tracing::warn!(projectile, "unknown projectile");
                break;
            };

            report.shots += 1;
            if hit.accepted() {
                report.accepted_hits += 1;
                report.damage_dealt += i64::from(hit.effective_damage);
                report.life_stolen += hit.life_stolen;
            }
        }

        report.broadcasts = self.world.broadcasts.len();
        report.deaths = self.deaths();
        report
    }

    pub fn deaths(&self) -> Vec<DeathEvent> {
        self.deaths.lock().map(|d| d.clone()).unwrap_or_default()
    }
}
