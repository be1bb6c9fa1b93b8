//! Templates - Static per-kind data for enemies and projectiles

use crate::condition::{ConditionEffect, ConditionEffects};
use crate::config::{load_toml, parse_toml, ConfigError};
use crate::types::ObjectType;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Static description of an enemy kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyTemplate {
    pub object_type: ObjectType,
    pub name: String,
    /// Zero marks a static object that can never be damaged
    pub max_hp: i32,
    #[serde(default)]
    pub defense: i32,
    #[serde(default)]
    pub stasis_immune: bool,
}

impl EnemyTemplate {
    pub fn new(object_type: ObjectType, name: &str, max_hp: i32, defense: i32) -> Self {
        EnemyTemplate {
            object_type,
            name: name.to_string(),
            max_hp,
            defense,
            stasis_immune: false,
        }
    }

    pub fn stasis_immune(mut self) -> Self {
        self.stasis_immune = true;
        self
    }

    pub fn is_static(&self) -> bool {
        self.max_hp == 0
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_hp < 0 {
            return Err(ConfigError::ValidationError(format!(
                "enemy '{}' has negative max_hp {}",
                self.name, self.max_hp
            )));
        }
        if self.defense < 0 {
            return Err(ConfigError::ValidationError(format!(
                "enemy '{}' has negative defense {}",
                self.name, self.defense
            )));
        }
        Ok(())
    }
}

/// One row of a projectile's secondary-effect table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CondChance {
    pub effect: ConditionEffect,
    /// Percent chance in `0..=100`
    pub chance: u8,
}

/// Static description of a projectile kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileDesc {
    pub name: String,
    pub min_damage: i32,
    pub max_damage: i32,
    #[serde(default)]
    pub armor_piercing: bool,
    /// Applied on every hit
    #[serde(default)]
    pub effects: Vec<ConditionEffect>,
    /// Rolled independently per hit
    #[serde(default)]
    pub cond_chance: Vec<CondChance>,
}

impl ProjectileDesc {
    pub fn new(name: &str, min_damage: i32, max_damage: i32) -> Self {
        ProjectileDesc {
            name: name.to_string(),
            min_damage,
            max_damage,
            armor_piercing: false,
            effects: Vec::new(),
            cond_chance: Vec::new(),
        }
    }

    pub fn armor_piercing(mut self) -> Self {
        self.armor_piercing = true;
        self
    }

    pub fn with_effect(mut self, effect: ConditionEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_chance(mut self, effect: ConditionEffect, chance: u8) -> Self {
        self.cond_chance.push(CondChance { effect, chance });
        self
    }

    /// Bitmask of the guaranteed effects, as sent on the wire
    pub fn effect_mask(&self) -> ConditionEffects {
        self.effects
            .iter()
            .filter(|effect| !effect.is_noop())
            .map(|effect| effect.kind)
            .collect()
    }

    /// Roll shot damage uniformly in `min_damage..=max_damage`
    pub fn roll_damage(&self, rng: &mut impl Rng) -> i32 {
        if self.max_damage <= self.min_damage {
            return self.min_damage;
        }
        rng.gen_range(self.min_damage..=self.max_damage)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.min_damage < 0 || self.max_damage < self.min_damage {
            return Err(ConfigError::ValidationError(format!(
                "projectile '{}' has invalid damage range {}..={}",
                self.name, self.min_damage, self.max_damage
            )));
        }
        if let Some(row) = self.cond_chance.iter().find(|row| row.chance > 100) {
            return Err(ConfigError::ValidationError(format!(
                "projectile '{}' has {}% chance for {:?}",
                self.name, row.chance, row.effect.kind
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
struct TemplateFile {
    #[serde(default)]
    enemies: Vec<EnemyTemplate>,
    #[serde(default)]
    projectiles: Vec<ProjectileDesc>,
}

/// Loaded templates, shared by every live entity of a kind
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    enemies: HashMap<ObjectType, Arc<EnemyTemplate>>,
    projectiles: HashMap<String, Arc<ProjectileDesc>>,
}

impl TemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load templates from a TOML file with `[[enemies]]` and `[[projectiles]]` tables
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file: TemplateFile = load_toml(path)?;
        Self::from_file(file)
    }

    /// Load templates from a TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let file: TemplateFile = parse_toml(content)?;
        Self::from_file(file)
    }

    fn from_file(file: TemplateFile) -> Result<Self, ConfigError> {
        let mut store = TemplateStore::new();
        for enemy in file.enemies {
            store.register_enemy(enemy)?;
        }
        for projectile in file.projectiles {
            store.register_projectile(projectile)?;
        }
        tracing::debug!(
            enemies = store.enemies.len(),
            projectiles = store.projectiles.len(),
            "templates loaded"
        );
        Ok(store)
    }

    pub fn register_enemy(&mut self, template: EnemyTemplate) -> Result<(), ConfigError> {
        template.validate()?;
        if self.enemies.contains_key(&template.object_type) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate enemy object type {}",
                template.object_type.0
            )));
        }
        self.enemies.insert(template.object_type, Arc::new(template));
        Ok(())
    }

    pub fn register_projectile(&mut self, desc: ProjectileDesc) -> Result<(), ConfigError> {
        desc.validate()?;
        self.projectiles.insert(desc.name.clone(), Arc::new(desc));
        Ok(())
    }

    pub fn enemy(&self, object_type: ObjectType) -> Option<Arc<EnemyTemplate>> {
        self.enemies.get(&object_type).cloned()
    }

    pub fn enemy_by_name(&self, name: &str) -> Option<Arc<EnemyTemplate>> {
        self.enemies.values().find(|t| t.name == name).cloned()
    }

    pub fn projectile(&self, name: &str) -> Option<Arc<ProjectileDesc>> {
        self.projectiles.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::ConditionEffectKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const TEMPLATES: &str = r#"
[[enemies]]
object_type = 1
name = "Sand Crab"
max_hp = 50
defense = 10

[[enemies]]
object_type = 2
name = "Obelisk"
max_hp = 0

[[enemies]]
object_type = 3
name = "Warden"
max_hp = 4000
defense = 25
stasis_immune = true

[[projectiles]]
name = "Venom Dart"
min_damage = 20
max_damage = 30
armor_piercing = true
effects = [{ kind = "slowed", duration_ms = 2000 }]

[[projectiles.cond_chance]]
effect = { kind = "bleeding", duration_ms = 3000 }
chance = 25
"#;

    #[test]
    fn test_parse_templates() {
        let store = TemplateStore::parse(TEMPLATES).unwrap();

        let crab = store.enemy(ObjectType(1)).unwrap();
        assert_eq!(crab.defense, 10);
        assert!(!crab.is_static());

        assert!(store.enemy_by_name("Obelisk").unwrap().is_static());
        assert!(store.enemy(ObjectType(3)).unwrap().stasis_immune);

        let dart = store.projectile("Venom Dart").unwrap();
        assert!(dart.armor_piercing);
        assert_eq!(dart.cond_chance.len(), 1);
        assert_eq!(dart.cond_chance[0].effect.kind, ConditionEffectKind::Bleeding);
        assert_eq!(dart.effect_mask(), ConditionEffects::SLOWED);
    }

    #[test]
    fn test_rejects_bad_chance() {
        let toml = r#"
[[projectiles]]
name = "Broken"
min_damage = 1
max_damage = 2

[[projectiles.cond_chance]]
effect = { kind = "sick", duration_ms = 1000 }
chance = 150
"#;
        let err = TemplateStore::parse(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_rejects_negative_max_hp() {
        let toml = r#"
[[enemies]]
object_type = 9
name = "Void"
max_hp = -1
"#;
        assert!(TemplateStore::parse(toml).is_err());
    }

    #[test]
    fn test_rejects_duplicate_enemy() {
        let mut store = TemplateStore::new();
        store
            .register_enemy(EnemyTemplate::new(ObjectType(1), "A", 10, 0))
            .unwrap();
        assert!(store
            .register_enemy(EnemyTemplate::new(ObjectType(1), "B", 10, 0))
            .is_err());
    }

    #[test]
    fn test_roll_damage_in_range() {
        let desc = ProjectileDesc::new("Bolt", 10, 20);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let damage = desc.roll_damage(&mut rng);
            assert!((10..=20).contains(&damage));
        }
        assert_eq!(ProjectileDesc::new("Flat", 5, 5).roll_damage(&mut rng), 5);
    }
}
