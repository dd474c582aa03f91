mod events;
mod projectile;
mod units;

pub use events::{SimEvent, SimEventBus, SimEventCounts, SimEventKind};
pub use projectile::{
    ArcId, Payload, Projectile, ProjectileArena, ProjectileId, ProjectileOwner,
};
pub use units::{AppliedStatus, Unit, UnitArena, UnitId};

use tracing::{debug, warn};

use crate::content::{DefDatabase, ProjectileDef, ProjectileDefId, StatusEffect, TeamId};
use crate::math::Vec2;
use crate::wire::ProjectileSnapshot;
use crate::world::{raycast_tiles, TileGrid};

pub const DEFAULT_PROJECTILE_CAPACITY: usize = 1024;

/// One spawn call's worth of parameters. Optional parts default the
/// way the shorter spawn forms of the original do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    pub def: ProjectileDefId,
    pub owner: ProjectileOwner,
    pub team: TeamId,
    pub position: Vec2,
    pub angle: f32,
    pub velocity_scale: f32,
    pub lifetime_scale: f32,
    pub payload: Option<Payload>,
}

impl SpawnRequest {
    pub fn new(def: ProjectileDefId, team: TeamId, position: Vec2, angle: f32) -> Self {
        Self {
            def,
            owner: ProjectileOwner::None,
            team,
            position,
            angle,
            velocity_scale: 1.0,
            lifetime_scale: 1.0,
            payload: None,
        }
    }

    pub fn with_owner(mut self, owner: ProjectileOwner) -> Self {
        self.owner = owner;
        self
    }

    pub fn with_velocity_scale(mut self, velocity_scale: f32) -> Self {
        self.velocity_scale = velocity_scale;
        self
    }

    pub fn with_lifetime_scale(mut self, lifetime_scale: f32) -> Self {
        self.lifetime_scale = lifetime_scale;
        self
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// Owns the projectile pool and advances every active projectile one
/// fixed simulation step at a time. Callers hold `ProjectileId`
/// handles; a handle into a removed slot is a no-op everywhere.
pub struct ProjectileSim {
    arena: ProjectileArena,
    fixed_dt: f32,
}

impl ProjectileSim {
    pub fn new(capacity: usize, fixed_dt: f32) -> Self {
        Self {
            arena: ProjectileArena::with_capacity(capacity),
            fixed_dt,
        }
    }

    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    pub fn active_count(&self) -> usize {
        self.arena.len()
    }

    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    pub fn projectile(&self, id: ProjectileId) -> Option<&Projectile> {
        self.arena.get(id)
    }

    pub fn contains(&self, id: ProjectileId) -> bool {
        self.arena.contains(id)
    }

    pub fn ids(&self) -> Vec<ProjectileId> {
        self.arena.ids()
    }

    /// Spawns a projectile. Returns None only when the pool is full or
    /// the def id is unknown; both are silent no-ops. The caller
    /// contract requires finite coordinates and a positive lifetime
    /// scale.
    pub fn spawn(
        &mut self,
        defs: &DefDatabase,
        units: &UnitArena,
        request: SpawnRequest,
        events: &mut SimEventBus,
    ) -> Option<ProjectileId> {
        debug_assert!(request.position.x.is_finite() && request.position.y.is_finite());
        debug_assert!(request.lifetime_scale > 0.0);

        let Some(def) = defs.projectile(request.def) else {
            warn!(
                def = request.def.0,
                "spawn request references unknown projectile def"
            );
            return None;
        };
        let id = self.arena.allocate()?;

        let mut velocity = Vec2::from_angle(request.angle, def.speed * request.velocity_scale);
        if def.keep_velocity {
            if let ProjectileOwner::Unit(unit_id) = request.owner {
                if let Some(unit) = units.get(unit_id) {
                    velocity = velocity.add(unit.velocity);
                }
            }
        }
        // Back-date by one tick of travel so the first tile raycast has
        // a real previous position.
        let position = request.position.sub(velocity.scaled(self.fixed_dt));

        let proj = self.arena.get_mut(id).expect("slot just allocated");
        proj.def = request.def;
        proj.position = position;
        proj.last_position = position;
        proj.velocity = velocity;
        proj.owner = request.owner;
        proj.team = request.team;
        proj.life_scale = request.lifetime_scale;
        proj.payload = request.payload;

        debug!(?id, def = def.name.as_str(), "projectile spawned");
        events.emit(SimEvent::ProjectileSpawned { id });
        Some(id)
    }

    /// Spawns inheriting the parent's owner and team, e.g. frag
    /// submunitions.
    pub fn spawn_from_parent(
        &mut self,
        defs: &DefDatabase,
        units: &UnitArena,
        parent: ProjectileId,
        def: ProjectileDefId,
        position: Vec2,
        angle: f32,
        events: &mut SimEventBus,
    ) -> Option<ProjectileId> {
        let parent = self.arena.get(parent)?;
        let request =
            SpawnRequest::new(def, parent.team, position, angle).with_owner(parent.owner);
        self.spawn(defs, units, request, events)
    }

    /// Advances every active projectile by one fixed step. Projectiles
    /// are independent; iteration order carries no gameplay meaning.
    pub fn update(
        &mut self,
        defs: &DefDatabase,
        grid: &mut TileGrid,
        units: &mut UnitArena,
        events: &mut SimEventBus,
    ) {
        let dt = self.fixed_dt;
        for id in self.arena.ids() {
            let Some(def_id) = self.arena.get(id).map(|proj| proj.def) else {
                continue;
            };
            let Some(def) = defs.projectile(def_id) else {
                warn!(?id, def = def_id.0, "removing projectile with unknown def");
                self.arena.free(id);
                continue;
            };
            let Some(proj) = self.arena.get_mut(id) else {
                continue;
            };

            proj.last_position = proj.position;
            proj.position = proj.position.add(proj.velocity.scaled(dt));

            let team = proj.team;
            let owner = proj.owner;
            let direct_damage = projectile_damage(proj, def, units);
            let mut removed = false;

            if def.hit_tiles
                && def.collides_tiles
                && !proj.suppress_collision
                && proj.initialized
            {
                let from_x = grid.world_to_tile(proj.last_position.x);
                let from_y = grid.world_to_tile(proj.last_position.y);
                let to_x = grid.world_to_tile(proj.position.x);
                let to_y = grid.world_to_tile(proj.position.y);
                raycast_tiles(from_x, from_y, to_x, to_y, |tile_x, tile_y| {
                    let Some(block) = grid.block_at_mut(tile_x, tile_y) else {
                        return false;
                    };
                    let qualifies = block.accepts_collision
                        && def.collides
                        && block.is_alive()
                        && (def.collides_team || block.team != team);
                    if !qualifies {
                        return false;
                    }
                    // Same-team hits (only reachable with collides_team)
                    // apply the tile effect but skip direct damage.
                    if block.team != team {
                        block.apply_damage(direct_damage);
                        events.emit(SimEvent::BlockDamaged {
                            tile_x,
                            tile_y,
                            amount: direct_damage,
                        });
                        if block.deflects {
                            proj.suppress_collision = true;
                            proj.suppress_once = true;
                        }
                    }
                    if !proj.suppress_collision {
                        events.emit(SimEvent::ProjectileHitTile {
                            id,
                            tile_x,
                            tile_y,
                            effect: def.hit_effect,
                        });
                        removed = true;
                    }
                    true
                });
            }

            if !removed && def.collides && !proj.suppress_collision {
                for unit_id in units.ids() {
                    let Some(unit) = units.get_mut(unit_id) else {
                        continue;
                    };
                    if !unit.is_alive() || unit.team == team {
                        continue;
                    }
                    if owner == ProjectileOwner::Unit(unit_id) {
                        continue;
                    }
                    if unit.flying && !def.collides_air {
                        continue;
                    }
                    let radius_sq = unit.hit_radius * unit.hit_radius;
                    if proj.position.distance_sq(unit.position) > radius_sq {
                        continue;
                    }

                    let impact = proj.position;
                    unit.velocity = unit.velocity.add(
                        unit.position
                            .sub(impact)
                            .with_length(def.knockback / unit.mass),
                    );
                    unit.apply_damage(direct_damage);
                    events.emit(SimEvent::ProjectileHitUnit {
                        id,
                        unit: unit_id,
                        damage: direct_damage,
                    });
                    if def.status != StatusEffect::None {
                        unit.apply_status(def.status, def.status_intensity);
                        events.emit(SimEvent::StatusApplied {
                            unit: unit_id,
                            effect: def.status,
                        });
                    }
                    if !def.pierce {
                        removed = true;
                    }
                    break;
                }
            }

            // One-shot pass-through: consumed after exactly one tick.
            if proj.suppress_once {
                proj.suppress_collision = false;
                proj.suppress_once = false;
            }
            proj.initialized = true;

            if !removed {
                proj.time = (proj.time + dt / proj.life_scale).clamp(0.0, def.lifetime);
                if proj.time >= def.lifetime {
                    if !proj.suppress_collision {
                        events.emit(SimEvent::ProjectileDespawned {
                            id,
                            effect: def.despawn_effect,
                            at: proj.position,
                        });
                    }
                    removed = true;
                }
            }

            if removed {
                debug!(?id, def = def.name.as_str(), "projectile removed");
                self.arena.free(id);
            }
        }
    }

    /// Immediate idempotent removal with no side effects.
    pub fn remove(&mut self, id: ProjectileId) -> bool {
        self.arena.free(id)
    }

    /// Shield-style forced removal: suppressed first so no despawn or
    /// hit-tile effects fire.
    pub fn absorb(&mut self, id: ProjectileId, events: &mut SimEventBus) -> bool {
        let Some(proj) = self.arena.get_mut(id) else {
            return false;
        };
        proj.suppress_collision = true;
        events.emit(SimEvent::ProjectileAbsorbed { id });
        self.arena.free(id)
    }

    /// Skips collision resolution for exactly the next tick.
    pub fn suppress(&mut self, id: ProjectileId) -> bool {
        let Some(proj) = self.arena.get_mut(id) else {
            return false;
        };
        proj.suppress_collision = true;
        proj.suppress_once = true;
        true
    }

    /// Re-homes the projectile without respawning it.
    pub fn reset_owner(&mut self, id: ProjectileId, owner: ProjectileOwner, team: TeamId) -> bool {
        let Some(proj) = self.arena.get_mut(id) else {
            return false;
        };
        proj.owner = owner;
        proj.team = team;
        true
    }

    /// Advances the life clock by a raw amount; clamping happens on the
    /// next tick.
    pub fn scale_time(&mut self, id: ProjectileId, add: f32) -> bool {
        let Some(proj) = self.arena.get_mut(id) else {
            return false;
        };
        proj.time += add;
        true
    }

    pub fn damage(&self, id: ProjectileId, defs: &DefDatabase, units: &UnitArena) -> Option<f32> {
        let proj = self.arena.get(id)?;
        let def = defs.projectile(proj.def)?;
        Some(projectile_damage(proj, def, units))
    }

    /// Splash-capable projectiles always deal at least their splash
    /// value to shields.
    pub fn shield_damage(
        &self,
        id: ProjectileId,
        defs: &DefDatabase,
        units: &UnitArena,
    ) -> Option<f32> {
        let proj = self.arena.get(id)?;
        let def = defs.projectile(proj.def)?;
        Some(projectile_damage(proj, def, units).max(def.splash_damage))
    }

    pub fn draw_size(&self, id: ProjectileId, defs: &DefDatabase) -> Option<f32> {
        let proj = self.arena.get(id)?;
        defs.projectile(proj.def).map(|def| def.draw_size)
    }

    /// Sync snapshot, or None for stale handles and non-syncable defs.
    pub fn snapshot(&self, id: ProjectileId, defs: &DefDatabase) -> Option<ProjectileSnapshot> {
        let proj = self.arena.get(id)?;
        let def = defs.projectile(proj.def)?;
        if !def.syncable {
            return None;
        }
        Some(ProjectileSnapshot {
            position: proj.position,
            velocity: proj.velocity,
            team: proj.team,
            def: proj.def,
        })
    }

    /// Instantiates a remotely-read snapshot. Age, payload, and
    /// suppression are not carried on the wire; the projectile resumes
    /// with default life-tracking state.
    pub fn apply_snapshot(
        &mut self,
        defs: &DefDatabase,
        snapshot: ProjectileSnapshot,
        events: &mut SimEventBus,
    ) -> Option<ProjectileId> {
        if defs.projectile(snapshot.def).is_none() {
            warn!(def = snapshot.def.0, "snapshot references unknown projectile def");
            return None;
        }
        let id = self.arena.allocate()?;
        let proj = self.arena.get_mut(id).expect("slot just allocated");
        proj.def = snapshot.def;
        proj.position = snapshot.position;
        proj.last_position = snapshot.position;
        proj.velocity = snapshot.velocity;
        proj.team = snapshot.team;
        events.emit(SimEvent::ProjectileSpawned { id });
        Some(id)
    }

    /// Session reset: every slot back to the pool.
    pub fn clear(&mut self) {
        self.arena.clear();
    }
}

fn projectile_damage(proj: &Projectile, def: &ProjectileDef, units: &UnitArena) -> f32 {
    match proj.owner {
        ProjectileOwner::Unit(unit_id) => match units.get(unit_id) {
            Some(unit) => def.damage * unit.damage_multiplier,
            None => def.damage,
        },
        ProjectileOwner::Arc(_) => match proj.payload {
            Some(Payload::DamageOverride(value)) => value,
            None => def.damage,
        },
        ProjectileOwner::None => def.damage,
    }
}
