use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Index into the projectile def table. Fits in one wire byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectileDefId(pub u8);

/// Index into the team table. Fits in one wire byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamId(pub u8);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusEffect {
    #[default]
    None,
    Burning,
    Freezing,
    Shocked,
    Corroded,
}

/// Visual effect hook. The simulation only names effects; drawing them
/// is an external concern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    #[default]
    None,
    HitSpark,
    Explosion,
    Flash,
    Smoke,
}

/// Immutable ballistic and effect configuration shared by every
/// projectile of one kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileDef {
    pub name: String,
    pub speed: f32,
    pub lifetime: f32,
    pub damage: f32,
    #[serde(default)]
    pub splash_damage: f32,
    #[serde(default)]
    pub knockback: f32,
    #[serde(default)]
    pub status: StatusEffect,
    #[serde(default = "default_one")]
    pub status_intensity: f32,
    #[serde(default = "default_draw_size")]
    pub draw_size: f32,
    #[serde(default = "default_true")]
    pub keep_velocity: bool,
    #[serde(default = "default_true")]
    pub collides: bool,
    #[serde(default = "default_true")]
    pub collides_tiles: bool,
    #[serde(default = "default_true")]
    pub hit_tiles: bool,
    #[serde(default = "default_true")]
    pub collides_air: bool,
    #[serde(default)]
    pub collides_team: bool,
    #[serde(default)]
    pub pierce: bool,
    #[serde(default = "default_true")]
    pub syncable: bool,
    #[serde(default)]
    pub hit_effect: EffectKind,
    #[serde(default)]
    pub despawn_effect: EffectKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamDef {
    pub name: String,
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read definition file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse definitions: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to parse definitions at {json_path}: {source}")]
    ParseAt {
        json_path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("definition file declares no teams")]
    NoTeams,
    #[error("too many projectile defs for one-byte ids: {count} (max {max})")]
    TooManyProjectiles { count: usize, max: usize },
    #[error("too many teams for one-byte ids: {count} (max {max})")]
    TooManyTeams { count: usize, max: usize },
    #[error("duplicate projectile def name: {name}")]
    DuplicateProjectileName { name: String },
    #[error("duplicate team name: {name}")]
    DuplicateTeamName { name: String },
    #[error("projectile def '{name}': {field} must be finite and non-negative, got {value}")]
    InvalidField {
        name: String,
        field: &'static str,
        value: f32,
    },
    #[error("projectile def '{name}': lifetime must be finite and positive, got {value}")]
    InvalidLifetime { name: String, value: f32 },
}

const MAX_ONE_BYTE_IDS: usize = u8::MAX as usize + 1;

/// Read-only lookup tables for projectile and team descriptors.
///
/// Passed explicitly wherever ids must be resolved; there is no global
/// registry.
#[derive(Debug, Clone, PartialEq)]
pub struct DefDatabase {
    projectiles: Vec<ProjectileDef>,
    teams: Vec<TeamDef>,
}

impl DefDatabase {
    pub fn new(
        projectiles: Vec<ProjectileDef>,
        teams: Vec<TeamDef>,
    ) -> Result<Self, ContentError> {
        if teams.is_empty() {
            return Err(ContentError::NoTeams);
        }
        if projectiles.len() > MAX_ONE_BYTE_IDS {
            return Err(ContentError::TooManyProjectiles {
                count: projectiles.len(),
                max: MAX_ONE_BYTE_IDS,
            });
        }
        if teams.len() > MAX_ONE_BYTE_IDS {
            return Err(ContentError::TooManyTeams {
                count: teams.len(),
                max: MAX_ONE_BYTE_IDS,
            });
        }
        for (index, def) in projectiles.iter().enumerate() {
            if projectiles[..index].iter().any(|other| other.name == def.name) {
                return Err(ContentError::DuplicateProjectileName {
                    name: def.name.clone(),
                });
            }
            validate_projectile_def(def)?;
        }
        for (index, team) in teams.iter().enumerate() {
            if teams[..index].iter().any(|other| other.name == team.name) {
                return Err(ContentError::DuplicateTeamName {
                    name: team.name.clone(),
                });
            }
        }
        Ok(Self { projectiles, teams })
    }

    pub fn projectile(&self, id: ProjectileDefId) -> Option<&ProjectileDef> {
        self.projectiles.get(id.0 as usize)
    }

    pub fn projectile_id_by_name(&self, name: &str) -> Option<ProjectileDefId> {
        self.projectiles
            .iter()
            .position(|def| def.name == name)
            .map(|index| ProjectileDefId(index as u8))
    }

    pub fn team(&self, id: TeamId) -> Option<&TeamDef> {
        self.teams.get(id.0 as usize)
    }

    pub fn team_id_by_name(&self, name: &str) -> Option<TeamId> {
        self.teams
            .iter()
            .position(|team| team.name == name)
            .map(|index| TeamId(index as u8))
    }

    pub fn projectile_count(&self) -> usize {
        self.projectiles.len()
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }
}

fn validate_projectile_def(def: &ProjectileDef) -> Result<(), ContentError> {
    let non_negative: [(&'static str, f32); 4] = [
        ("speed", def.speed),
        ("damage", def.damage),
        ("splash_damage", def.splash_damage),
        ("knockback", def.knockback),
    ];
    for (field, value) in non_negative {
        if !value.is_finite() || value < 0.0 {
            return Err(ContentError::InvalidField {
                name: def.name.clone(),
                field,
                value,
            });
        }
    }
    if !def.lifetime.is_finite() || def.lifetime <= 0.0 {
        return Err(ContentError::InvalidLifetime {
            name: def.name.clone(),
            value: def.lifetime,
        });
    }
    Ok(())
}

fn default_true() -> bool {
    true
}

fn default_one() -> f32 {
    1.0
}

fn default_draw_size() -> f32 {
    8.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic_def(name: &str) -> ProjectileDef {
        ProjectileDef {
            name: name.to_string(),
            speed: 5.0,
            lifetime: 10.0,
            damage: 9.0,
            splash_damage: 0.0,
            knockback: 0.0,
            status: StatusEffect::None,
            status_intensity: 1.0,
            draw_size: 8.0,
            keep_velocity: true,
            collides: true,
            collides_tiles: true,
            hit_tiles: true,
            collides_air: true,
            collides_team: false,
            pierce: false,
            syncable: true,
            hit_effect: EffectKind::HitSpark,
            despawn_effect: EffectKind::Flash,
        }
    }

    fn two_teams() -> Vec<TeamDef> {
        vec![
            TeamDef {
                name: "crux".to_string(),
            },
            TeamDef {
                name: "verdant".to_string(),
            },
        ]
    }

    #[test]
    fn lookups_resolve_by_index_and_name() {
        let db = DefDatabase::new(
            vec![basic_def("standard"), basic_def("heavy")],
            two_teams(),
        )
        .expect("db");

        assert_eq!(db.projectile_count(), 2);
        assert_eq!(db.team_count(), 2);
        assert_eq!(
            db.projectile(ProjectileDefId(1)).map(|d| d.name.as_str()),
            Some("heavy")
        );
        assert_eq!(db.projectile_id_by_name("heavy"), Some(ProjectileDefId(1)));
        assert_eq!(db.projectile(ProjectileDefId(2)), None);
        assert_eq!(db.team(TeamId(0)).map(|t| t.name.as_str()), Some("crux"));
        assert_eq!(db.team_id_by_name("verdant"), Some(TeamId(1)));
        assert_eq!(db.team(TeamId(9)), None);
    }

    #[test]
    fn rejects_empty_team_table() {
        let err = DefDatabase::new(vec![basic_def("standard")], Vec::new()).expect_err("err");
        assert!(matches!(err, ContentError::NoTeams));
    }

    #[test]
    fn rejects_duplicate_projectile_names() {
        let err = DefDatabase::new(
            vec![basic_def("standard"), basic_def("standard")],
            two_teams(),
        )
        .expect_err("err");
        assert!(matches!(
            err,
            ContentError::DuplicateProjectileName { name } if name == "standard"
        ));
    }

    #[test]
    fn rejects_non_positive_lifetime() {
        let mut def = basic_def("standard");
        def.lifetime = 0.0;
        let err = DefDatabase::new(vec![def], two_teams()).expect_err("err");
        assert!(matches!(err, ContentError::InvalidLifetime { .. }));
    }

    #[test]
    fn rejects_negative_speed() {
        let mut def = basic_def("standard");
        def.speed = -1.0;
        let err = DefDatabase::new(vec![def], two_teams()).expect_err("err");
        assert!(matches!(
            err,
            ContentError::InvalidField { field: "speed", .. }
        ));
    }
}
