pub mod content;
pub mod math;
pub mod sim;
pub mod wire;
pub mod world;

pub use content::{
    load_def_database, parse_def_database, ContentError, DefDatabase, EffectKind, ProjectileDef,
    ProjectileDefId, StatusEffect, TeamDef, TeamId,
};
pub use math::Vec2;
pub use sim::{
    AppliedStatus, ArcId, Payload, Projectile, ProjectileId, ProjectileOwner, ProjectileSim,
    SimEvent, SimEventBus, SimEventCounts, SimEventKind, SpawnRequest, Unit, UnitArena, UnitId,
    DEFAULT_PROJECTILE_CAPACITY,
};
pub use wire::{
    decode_snapshot, encode_snapshot, ProjectileSnapshot, SnapshotError, SNAPSHOT_LEN,
};
pub use world::{raycast_tiles, Block, TileGrid, TileGridError};
