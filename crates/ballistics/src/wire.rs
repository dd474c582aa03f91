use thiserror::Error;

use crate::content::{DefDatabase, ProjectileDefId, TeamId};
use crate::math::Vec2;

/// Fixed projectile sync record: four little-endian f32 fields followed
/// by the team and def ids as single bytes.
pub const SNAPSHOT_LEN: usize = 18;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSnapshot {
    pub position: Vec2,
    pub velocity: Vec2,
    pub team: TeamId,
    pub def: ProjectileDefId,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("snapshot must be {SNAPSHOT_LEN} bytes, got {actual}")]
    WrongLength { actual: usize },
    #[error("snapshot references unknown projectile def {id}")]
    UnknownProjectileDef { id: u8 },
    #[error("snapshot references unknown team {id}")]
    UnknownTeam { id: u8 },
}

pub fn encode_snapshot(snapshot: &ProjectileSnapshot) -> [u8; SNAPSHOT_LEN] {
    let mut bytes = [0u8; SNAPSHOT_LEN];
    bytes[0..4].copy_from_slice(&snapshot.position.x.to_le_bytes());
    bytes[4..8].copy_from_slice(&snapshot.position.y.to_le_bytes());
    bytes[8..12].copy_from_slice(&snapshot.velocity.x.to_le_bytes());
    bytes[12..16].copy_from_slice(&snapshot.velocity.y.to_le_bytes());
    bytes[16] = snapshot.team.0;
    bytes[17] = snapshot.def.0;
    bytes
}

/// Decodes a snapshot, rejecting records whose ids are not present in
/// the local def database.
pub fn decode_snapshot(
    bytes: &[u8],
    defs: &DefDatabase,
) -> Result<ProjectileSnapshot, SnapshotError> {
    if bytes.len() != SNAPSHOT_LEN {
        return Err(SnapshotError::WrongLength {
            actual: bytes.len(),
        });
    }
    let read_f32 = |offset: usize| {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(&bytes[offset..offset + 4]);
        f32::from_le_bytes(buf)
    };
    let team = TeamId(bytes[16]);
    let def = ProjectileDefId(bytes[17]);
    if defs.projectile(def).is_none() {
        return Err(SnapshotError::UnknownProjectileDef { id: def.0 });
    }
    if defs.team(team).is_none() {
        return Err(SnapshotError::UnknownTeam { id: team.0 });
    }
    Ok(ProjectileSnapshot {
        position: Vec2::new(read_f32(0), read_f32(4)),
        velocity: Vec2::new(read_f32(8), read_f32(12)),
        team,
        def,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ProjectileDef, TeamDef};

    fn test_defs() -> DefDatabase {
        let def: ProjectileDef = serde_json::from_str(
            r#"{"name": "test", "speed": 4.0, "lifetime": 10.0, "damage": 1.0}"#,
        )
        .expect("test def");
        DefDatabase::new(
            vec![def],
            vec![TeamDef {
                name: "crux".to_string(),
            }],
        )
        .expect("test defs")
    }

    #[test]
    fn round_trip_preserves_every_field() {
        let defs = test_defs();
        let snapshot = ProjectileSnapshot {
            position: Vec2::new(-12.5, 300.25),
            velocity: Vec2::new(0.75, -4.0),
            team: TeamId(0),
            def: ProjectileDefId(0),
        };
        let bytes = encode_snapshot(&snapshot);
        assert_eq!(bytes.len(), SNAPSHOT_LEN);
        assert_eq!(decode_snapshot(&bytes, &defs), Ok(snapshot));
    }

    #[test]
    fn layout_is_little_endian_with_trailing_ids() {
        let snapshot = ProjectileSnapshot {
            position: Vec2::new(1.0, 2.0),
            velocity: Vec2::ZERO,
            team: TeamId(0),
            def: ProjectileDefId(0),
        };
        let bytes = encode_snapshot(&snapshot);
        assert_eq!(&bytes[0..4], &1.0f32.to_le_bytes());
        assert_eq!(&bytes[4..8], &2.0f32.to_le_bytes());
        assert_eq!(bytes[16], 0);
        assert_eq!(bytes[17], 0);
    }

    #[test]
    fn wrong_length_is_rejected() {
        let defs = test_defs();
        assert_eq!(
            decode_snapshot(&[0u8; 17], &defs),
            Err(SnapshotError::WrongLength { actual: 17 })
        );
        assert_eq!(
            decode_snapshot(&[0u8; 19], &defs),
            Err(SnapshotError::WrongLength { actual: 19 })
        );
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let defs = test_defs();
        let mut bytes = encode_snapshot(&ProjectileSnapshot {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            team: TeamId(0),
            def: ProjectileDefId(0),
        });
        bytes[17] = 9;
        assert_eq!(
            decode_snapshot(&bytes, &defs),
            Err(SnapshotError::UnknownProjectileDef { id: 9 })
        );
        bytes[17] = 0;
        bytes[16] = 3;
        assert_eq!(
            decode_snapshot(&bytes, &defs),
            Err(SnapshotError::UnknownTeam { id: 3 })
        );
    }
}
