mod loader;
mod types;

pub use loader::{load_def_database, parse_def_database};
pub use types::{
    ContentError, DefDatabase, EffectKind, ProjectileDef, ProjectileDefId, StatusEffect, TeamDef,
    TeamId,
};
