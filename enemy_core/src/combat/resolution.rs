//! Damage resolution - Gate, mitigate, apply, broadcast, attribute, and check death

use super::projectile::Projectile;
use super::result::{DamageNotification, HitReport};
use super::CombatContext;
use crate::attacker::Attacker;
use crate::condition::{ConditionEffect, ConditionEffectKind, ConditionEffects, DamageGate};
use crate::defense::{effective_defense, mitigate};
use crate::enemy::Enemy;
use crate::leech::LeechResource;
use crate::types::ObjectId;
use crate::world::PacketPriority;

/// Resolve a direct (melee-style) hit against an enemy
///
/// 1. Static, removed, dead or Invincible enemies ignore the hit entirely
/// 2. Paused or Stasis suppresses the hit and every side effect
/// 3. Defense (zero when `ignore_defense`) mitigates raw damage
/// 4. HP drops by the unclamped mitigated amount unless Invulnerable
/// 5. Hit effects land, the hit is broadcast and credited to the attacker
/// 6. Dropping below zero HP runs the death transition once
pub fn resolve_direct_hit(
    enemy: &mut Enemy,
    ctx: &mut CombatContext<'_>,
    attacker: ObjectId,
    raw_damage: i32,
    ignore_defense: bool,
    effects: &[ConditionEffect],
) -> HitReport {
    let gate = enemy.damage_gate();
    if !gate.passes() {
        tracing::debug!(enemy = %enemy.id(), attacker = %attacker, ?gate, "direct hit gated");
        return HitReport::blocked(gate, raw_damage, enemy.hp());
    }

    let mut report = land_hit(enemy, gate, raw_damage, ignore_defense, effects);

    ctx.world.broadcast_nearby(
        DamageNotification {
            target_id: enemy.id(),
            effects: ConditionEffects::empty(),
            damage_amount: DamageNotification::wire_amount(report.mitigated_damage),
            kill: report.is_killing_blow,
            bullet_id: 0,
            object_id: attacker,
        },
        enemy.id(),
        None,
        PacketPriority::Low,
    );

    enemy
        .ledger_mut()
        .hit_by(attacker, &ctx.time, None, report.mitigated_damage);

    tracing::debug!(
        enemy = %enemy.id(),
        attacker = %attacker,
        "direct hit: {}",
        report.summary()
    );

    report.death_fired = check_death(enemy, ctx);
    report
}

/// Resolve a projectile impact against an enemy
///
/// Gating and mitigation match [`resolve_direct_hit`]; armor-piercing shots
/// ignore defense. Secondary effects are rolled from the world's RNG, and
/// the owner may leech life and mana through the enemy's own counters.
pub fn resolve_projectile_hit(
    enemy: &mut Enemy,
    ctx: &mut CombatContext<'_>,
    projectile: &Projectile,
    owner: &mut dyn Attacker,
) -> HitReport {
    let gate = enemy.damage_gate();
    if !gate.passes() {
        tracing::debug!(
            enemy = %enemy.id(),
            bullet = projectile.id,
            ?gate,
            "projectile hit gated"
        );
        return HitReport::blocked(gate, projectile.damage, enemy.hp());
    }
    if owner.id() != projectile.owner {
        tracing::warn!(
            owner = %owner.id(),
            projectile_owner = %projectile.owner,
            "projectile resolved against a different owner"
        );
    }

    let effects = projectile.effects_for_hit(&mut *ctx.rng);
    let mut report = land_hit(
        enemy,
        gate,
        projectile.damage,
        projectile.desc.armor_piercing,
        &effects,
    );

    ctx.world.broadcast_nearby(
        DamageNotification {
            target_id: enemy.id(),
            effects: projectile.condition_effects(),
            damage_amount: DamageNotification::wire_amount(report.mitigated_damage),
            kill: report.is_killing_blow,
            bullet_id: projectile.id,
            object_id: owner.id(),
        },
        enemy.id(),
        Some(owner.id()),
        PacketPriority::Low,
    );

    apply_leech(enemy, owner, &mut report);

    enemy
        .ledger_mut()
        .hit_by(owner.id(), &ctx.time, Some(projectile.id), report.mitigated_damage);

    tracing::debug!(
        enemy = %enemy.id(),
        attacker = %owner.id(),
        bullet = projectile.id,
        "projectile hit: {}",
        report.summary()
    );

    report.death_fired = check_death(enemy, ctx);
    report
}

/// Mitigate, subtract HP and apply hit effects
fn land_hit(
    enemy: &mut Enemy,
    gate: DamageGate,
    raw_damage: i32,
    ignore_defense: bool,
    effects: &[ConditionEffect],
) -> HitReport {
    let defense = effective_defense(enemy.template().defense, enemy.conditions(), ignore_defense);
    let mitigated = mitigate(raw_damage, defense, enemy.constants().mitigation.model);

    let hp_before = enemy.hp();
    let effective = mitigated.min(hp_before.max(0));
    if gate != DamageGate::Invulnerable {
        enemy.set_hp(hp_before.saturating_sub(mitigated));
    }
    let effects_applied = enemy.conditions_mut().apply_all(effects);
    let hp_after = enemy.hp();

    HitReport {
        gate,
        raw_damage,
        defense,
        mitigated_damage: mitigated,
        effective_damage: effective,
        hp_before,
        hp_after,
        effects_applied,
        life_stolen: 0,
        mana_stolen: 0,
        is_killing_blow: hp_after < 0,
        death_fired: false,
    }
}

/// Run the owner's life and mana steal through this enemy's counters
fn apply_leech(enemy: &mut Enemy, owner: &mut dyn Attacker, report: &mut HitReport) {
    let Some(rates) = owner.steal_rates() else {
        return;
    };
    let policy = enemy.constants().leech.policy;

    if rates.life != 0.0 && !owner.has_condition(ConditionEffectKind::Sick) {
        let before = owner.hp();
        let after = enemy
            .leech_mut()
            .grant(LeechResource::Life, rates.life, before, owner.max_hp(), policy);
        if after != before {
            owner.set_hp(after);
            report.life_stolen = after - before;
        }
    }

    if rates.mana != 0.0 && !owner.has_condition(ConditionEffectKind::Quiet) {
        let before = owner.mp();
        let after = enemy
            .leech_mut()
            .grant(LeechResource::Mana, rates.mana, before, owner.max_mp(), policy);
        if after != before {
            owner.set_mp(after);
            report.mana_stolen = after - before;
        }
    }
}

fn check_death(enemy: &mut Enemy, ctx: &mut CombatContext<'_>) -> bool {
    if enemy.hp() < 0 && enemy.in_world() {
        return enemy.death(&mut *ctx.world, &ctx.time);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attacker::PlayerState;
    use crate::condition::PERMANENT;
    use crate::config::CombatConstants;
    use crate::defense::MitigationModel;
    use crate::leech::{LeechPolicy, StealRates};
    use crate::template::{EnemyTemplate, ProjectileDesc};
    use crate::types::{ObjectType, Position, WorldId};
    use crate::world::{LocalWorld, World, WorldTime};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn linear_constants() -> Arc<CombatConstants> {
        let mut constants = CombatConstants::default();
        constants.mitigation.model = MitigationModel::Linear;
        Arc::new(constants)
    }

    fn spawn(world: &LocalWorld, max_hp: i32, defense: i32) -> Enemy {
        let template = Arc::new(EnemyTemplate::new(ObjectType(1), "Crab", max_hp, defense));
        let mut enemy = Enemy::new(ObjectId(1), template, linear_constants(), Position::default());
        enemy.enter_world(world.id());
        enemy
    }

    fn effect(kind: ConditionEffectKind) -> ConditionEffect {
        ConditionEffect::new(kind, 1000)
    }

    const PLAYER: ObjectId = ObjectId(100);

    #[test]
    fn test_direct_hit_linear_defense() {
        let mut world = LocalWorld::new(WorldId(1));
        let mut enemy = spawn(&world, 50, 10);
        let mut rng = StdRng::seed_from_u64(0);
        let mut ctx = CombatContext::new(&mut world, WorldTime::default(), &mut rng);

        let report = resolve_direct_hit(&mut enemy, &mut ctx, PLAYER, 30, false, &[]);

        assert_eq!(report.mitigated_damage, 20);
        assert_eq!(report.effective_damage, 20);
        assert_eq!(enemy.hp(), 30);
        assert!(!report.is_killing_blow);
        assert!(!report.death_fired);
        assert_eq!(world.broadcasts.len(), 1);
        assert!(!world.broadcasts[0].notification.kill);
        assert_eq!(world.broadcasts[0].notification.damage_amount, 20);
    }

    #[test]
    fn test_direct_hit_ignore_defense() {
        let mut world = LocalWorld::new(WorldId(1));
        let mut enemy = spawn(&world, 50, 10);
        let mut rng = StdRng::seed_from_u64(0);
        let mut ctx = CombatContext::new(&mut world, WorldTime::default(), &mut rng);

        let report = resolve_direct_hit(&mut enemy, &mut ctx, PLAYER, 30, true, &[]);
        assert_eq!(report.mitigated_damage, 30);
        assert_eq!(enemy.hp(), 20);
    }

    #[test]
    fn test_overkill_clamps_return_and_kills() {
        let mut world = LocalWorld::new(WorldId(1));
        let mut enemy = spawn(&world, 50, 10);
        enemy.set_hp(15);
        let mut rng = StdRng::seed_from_u64(0);
        let mut ctx = CombatContext::new(&mut world, WorldTime::default(), &mut rng);

        let report = resolve_direct_hit(&mut enemy, &mut ctx, PLAYER, 30, false, &[]);

        assert_eq!(report.mitigated_damage, 20);
        assert_eq!(report.effective_damage, 15);
        assert_eq!(enemy.hp(), -5);
        assert!(report.is_killing_blow);
        assert!(report.death_fired);
        assert!(world.broadcasts[0].notification.kill);
        assert_eq!(world.departed, vec![ObjectId(1)]);
    }

    #[test]
    fn test_invulnerable_still_broadcasts_records_and_applies() {
        let mut world = LocalWorld::new(WorldId(1));
        let mut enemy = spawn(&world, 50, 0);
        enemy
            .conditions_mut()
            .apply(effect(ConditionEffectKind::Invulnerable));
        let mut rng = StdRng::seed_from_u64(0);
        let mut ctx = CombatContext::new(&mut world, WorldTime::default(), &mut rng);

        let report = resolve_direct_hit(
            &mut enemy,
            &mut ctx,
            PLAYER,
            80,
            false,
            &[effect(ConditionEffectKind::Slowed)],
        );

        assert_eq!(enemy.hp(), 50);
        assert_eq!(report.mitigated_damage, 80);
        assert!(!report.death_fired);
        assert_eq!(world.broadcasts.len(), 1);
        assert_eq!(enemy.ledger().damage_by(PLAYER), 80);
        assert!(enemy.conditions().has(ConditionEffectKind::Slowed));
    }

    #[test]
    fn test_suppressed_has_no_side_effects() {
        for kind in [ConditionEffectKind::Paused, ConditionEffectKind::Stasis] {
            let mut world = LocalWorld::new(WorldId(1));
            let mut enemy = spawn(&world, 50, 0);
            enemy.conditions_mut().apply(effect(kind));
            let mut rng = StdRng::seed_from_u64(0);
            let mut ctx = CombatContext::new(&mut world, WorldTime::default(), &mut rng);

            let report = resolve_direct_hit(
                &mut enemy,
                &mut ctx,
                PLAYER,
                30,
                false,
                &[effect(ConditionEffectKind::Slowed)],
            );

            assert_eq!(report.effective_damage, 0);
            assert_eq!(report.gate, DamageGate::Suppressed);
            assert_eq!(enemy.hp(), 50);
            assert!(world.broadcasts.is_empty());
            assert_eq!(enemy.ledger().total_damage(), 0);
            assert!(!enemy.conditions().has(ConditionEffectKind::Slowed));
        }
    }

    #[test]
    fn test_invincible_ignored() {
        let mut world = LocalWorld::new(WorldId(1));
        let mut enemy = spawn(&world, 50, 0);
        enemy
            .conditions_mut()
            .apply(effect(ConditionEffectKind::Invincible));
        let mut rng = StdRng::seed_from_u64(0);
        let mut ctx = CombatContext::new(&mut world, WorldTime::default(), &mut rng);

        let report = resolve_direct_hit(&mut enemy, &mut ctx, PLAYER, 30, false, &[]);
        assert_eq!(report.gate, DamageGate::Immune);
        assert_eq!(enemy.hp(), 50);
        assert!(world.broadcasts.is_empty());
    }

    #[test]
    fn test_projectile_piercing_and_broadcast_fields() {
        let mut world = LocalWorld::new(WorldId(1));
        let mut enemy = spawn(&world, 100, 25);
        let desc = Arc::new(
            ProjectileDesc::new("Lance", 40, 40)
                .armor_piercing()
                .with_effect(effect(ConditionEffectKind::Bleeding)),
        );
        let projectile = Projectile::new(7, PLAYER, 40, desc);
        let mut owner = PlayerState::new(PLAYER, 200, 100);
        let mut rng = StdRng::seed_from_u64(0);
        let mut ctx = CombatContext::new(&mut world, WorldTime::default(), &mut rng);

        let report = resolve_projectile_hit(&mut enemy, &mut ctx, &projectile, &mut owner);

        assert!(report.accepted());
        assert_eq!(report.defense, 0);
        assert_eq!(enemy.hp(), 60);
        assert!(enemy.conditions().has(ConditionEffectKind::Bleeding));

        let sent = &world.broadcasts[0];
        assert_eq!(sent.notification.bullet_id, 7);
        assert_eq!(sent.notification.effects, ConditionEffects::BLEEDING);
        assert_eq!(sent.notification.object_id, PLAYER);
        assert_eq!(sent.excluded, Some(PLAYER));
        assert_eq!(enemy.ledger().last_projectile(), Some(7));
    }

    #[test]
    fn test_projectile_leech_gated_by_sick_and_quiet() {
        let mut world = LocalWorld::new(WorldId(1));
        let mut enemy = spawn(&world, 1000, 0);
        let desc = Arc::new(ProjectileDesc::new("Fang", 5, 5));
        let projectile = Projectile::new(1, PLAYER, 5, desc);
        let mut owner = PlayerState::new(PLAYER, 100, 100)
            .with_resources(50, 50)
            .with_steal(StealRates::new(2.0, 3.0))
            .with_condition(ConditionEffect::new(ConditionEffectKind::Sick, PERMANENT));
        let mut rng = StdRng::seed_from_u64(0);
        let mut ctx = CombatContext::new(&mut world, WorldTime::default(), &mut rng);

        let report = resolve_projectile_hit(&mut enemy, &mut ctx, &projectile, &mut owner);

        assert_eq!(owner.hp, 50);
        assert_eq!(owner.mp, 53);
        assert_eq!(report.life_stolen, 0);
        assert_eq!(report.mana_stolen, 3);

        owner.conditions.remove(ConditionEffectKind::Sick);
        owner
            .conditions
            .apply(ConditionEffect::new(ConditionEffectKind::Quiet, PERMANENT));
        resolve_projectile_hit(&mut enemy, &mut ctx, &projectile, &mut owner);
        assert_eq!(owner.hp, 52);
        assert_eq!(owner.mp, 53);
    }

    #[test]
    fn test_projectile_fractional_leech_counts_per_enemy() {
        let mut world = LocalWorld::new(WorldId(1));
        let mut first = spawn(&world, 1000, 0);
        let mut second = spawn(&world, 1000, 0);
        let desc = Arc::new(ProjectileDesc::new("Fang", 5, 5));
        let projectile = Projectile::new(1, PLAYER, 5, desc);
        let mut owner = PlayerState::new(PLAYER, 100, 100)
            .with_resources(10, 10)
            .with_steal(StealRates::new(0.25, 0.0));
        let mut rng = StdRng::seed_from_u64(0);
        let mut ctx = CombatContext::new(&mut world, WorldTime::default(), &mut rng);

        for _ in 0..3 {
            resolve_projectile_hit(&mut first, &mut ctx, &projectile, &mut owner);
        }
        // Switching targets starts a fresh counter
        resolve_projectile_hit(&mut second, &mut ctx, &projectile, &mut owner);
        assert_eq!(owner.hp, 10);

        resolve_projectile_hit(&mut first, &mut ctx, &projectile, &mut owner);
        assert_eq!(owner.hp, 11);
        assert_eq!(first.leech().hits(LeechResource::Life), 0);
        assert_eq!(first.constants().leech.policy, LeechPolicy::ResetOnGrant);
    }

    #[test]
    fn test_projectile_gated_returns_blocked() {
        let mut world = LocalWorld::new(WorldId(1));
        let mut enemy = spawn(&world, 100, 0);
        enemy.conditions_mut().apply(effect(ConditionEffectKind::Paused));
        let desc = Arc::new(ProjectileDesc::new("Bolt", 10, 10));
        let projectile = Projectile::new(1, PLAYER, 10, desc);
        let mut owner = PlayerState::new(PLAYER, 100, 100)
            .with_resources(10, 10)
            .with_steal(StealRates::new(5.0, 5.0));
        let mut rng = StdRng::seed_from_u64(0);
        let mut ctx = CombatContext::new(&mut world, WorldTime::default(), &mut rng);

        let report = resolve_projectile_hit(&mut enemy, &mut ctx, &projectile, &mut owner);
        assert!(!report.accepted());
        assert_eq!(owner.hp, 10);
        assert!(world.broadcasts.is_empty());
    }
}
