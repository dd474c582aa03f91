use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use super::types::{ContentError, DefDatabase, ProjectileDef, TeamDef};

#[derive(Debug, Deserialize)]
struct DefDocument {
    #[serde(default)]
    projectiles: Vec<ProjectileDef>,
    teams: Vec<TeamDef>,
}

pub fn load_def_database(path: &Path) -> Result<DefDatabase, ContentError> {
    let raw = fs::read_to_string(path).map_err(|source| ContentError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let db = parse_def_database(&raw)?;
    info!(
        path = %path.display(),
        projectiles = db.projectile_count(),
        teams = db.team_count(),
        "definition database loaded"
    );
    Ok(db)
}

pub fn parse_def_database(raw: &str) -> Result<DefDatabase, ContentError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let document = match serde_path_to_error::deserialize::<_, DefDocument>(&mut deserializer) {
        Ok(document) => document,
        Err(error) => {
            let json_path = error.path().to_string();
            let source = error.into_inner();
            if json_path.is_empty() || json_path == "." {
                return Err(ContentError::Parse { source });
            }
            return Err(ContentError::ParseAt { json_path, source });
        }
    };
    DefDatabase::new(document.projectiles, document.teams)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::content::types::{EffectKind, ProjectileDefId, StatusEffect};

    const SAMPLE_DEFS: &str = r#"{
        "teams": [{"name": "crux"}, {"name": "verdant"}],
        "projectiles": [
            {
                "name": "standard",
                "speed": 5.0,
                "lifetime": 10.0,
                "damage": 9.0,
                "hit_effect": "hit_spark",
                "despawn_effect": "flash"
            },
            {
                "name": "missile",
                "speed": 2.5,
                "lifetime": 90.0,
                "damage": 20.0,
                "splash_damage": 30.0,
                "knockback": 2.0,
                "status": "burning",
                "status_intensity": 0.5,
                "collides_air": false,
                "keep_velocity": false
            }
        ]
    }"#;

    #[test]
    fn parses_sample_document_with_defaults() {
        let db = parse_def_database(SAMPLE_DEFS).expect("db");
        assert_eq!(db.projectile_count(), 2);
        assert_eq!(db.team_count(), 2);

        let standard = db.projectile(ProjectileDefId(0)).expect("standard");
        assert_eq!(standard.hit_effect, EffectKind::HitSpark);
        assert!(standard.keep_velocity);
        assert!(standard.collides_air);
        assert!(!standard.pierce);
        assert_eq!(standard.status, StatusEffect::None);

        let missile = db.projectile(ProjectileDefId(1)).expect("missile");
        assert_eq!(missile.status, StatusEffect::Burning);
        assert!(!missile.collides_air);
        assert!(!missile.keep_velocity);
        assert_eq!(missile.splash_damage, 30.0);
    }

    #[test]
    fn parse_error_reports_json_path() {
        let raw = r#"{
            "teams": [{"name": "crux"}],
            "projectiles": [{"name": "bad", "speed": "fast", "lifetime": 1.0, "damage": 0.0}]
        }"#;
        let err = parse_def_database(raw).expect_err("err");
        match err {
            ContentError::ParseAt { json_path, .. } => {
                assert!(
                    json_path.contains("projectiles"),
                    "unexpected path: {json_path}"
                );
            }
            other => panic!("expected ParseAt, got {other:?}"),
        }
    }

    #[test]
    fn missing_teams_key_is_a_parse_error() {
        let err = parse_def_database(r#"{"projectiles": []}"#).expect_err("err");
        assert!(matches!(
            err,
            ContentError::Parse { .. } | ContentError::ParseAt { .. }
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(SAMPLE_DEFS.as_bytes()).expect("write");
        let db = load_def_database(file.path()).expect("db");
        assert_eq!(db.projectile_id_by_name("missile"), Some(ProjectileDefId(1)));
    }

    #[test]
    fn read_error_carries_path() {
        let err = load_def_database(Path::new("/definitely/not/here.json")).expect_err("err");
        match err {
            ContentError::ReadFile { path, .. } => {
                assert_eq!(path, Path::new("/definitely/not/here.json"));
            }
            other => panic!("expected ReadFile, got {other:?}"),
        }
    }
}
