use crate::content::{EffectKind, StatusEffect};
use crate::math::Vec2;
use crate::sim::projectile::ProjectileId;
use crate::sim::units::UnitId;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    ProjectileSpawned {
        id: ProjectileId,
    },
    ProjectileHitTile {
        id: ProjectileId,
        tile_x: i32,
        tile_y: i32,
        effect: EffectKind,
    },
    ProjectileHitUnit {
        id: ProjectileId,
        unit: UnitId,
        damage: f32,
    },
    ProjectileDespawned {
        id: ProjectileId,
        effect: EffectKind,
        at: Vec2,
    },
    ProjectileAbsorbed {
        id: ProjectileId,
    },
    BlockDamaged {
        tile_x: i32,
        tile_y: i32,
        amount: f32,
    },
    StatusApplied {
        unit: UnitId,
        effect: StatusEffect,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEventKind {
    ProjectileSpawned,
    ProjectileHitTile,
    ProjectileHitUnit,
    ProjectileDespawned,
    ProjectileAbsorbed,
    BlockDamaged,
    StatusApplied,
}

impl SimEvent {
    pub fn kind(self) -> SimEventKind {
        match self {
            Self::ProjectileSpawned { .. } => SimEventKind::ProjectileSpawned,
            Self::ProjectileHitTile { .. } => SimEventKind::ProjectileHitTile,
            Self::ProjectileHitUnit { .. } => SimEventKind::ProjectileHitUnit,
            Self::ProjectileDespawned { .. } => SimEventKind::ProjectileDespawned,
            Self::ProjectileAbsorbed { .. } => SimEventKind::ProjectileAbsorbed,
            Self::BlockDamaged { .. } => SimEventKind::BlockDamaged,
            Self::StatusApplied { .. } => SimEventKind::StatusApplied,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimEventCounts {
    pub total: u32,
    pub spawned: u32,
    pub hit_tile: u32,
    pub hit_unit: u32,
    pub despawned: u32,
    pub absorbed: u32,
    pub block_damaged: u32,
    pub status_applied: u32,
}

impl SimEventCounts {
    fn record(&mut self, kind: SimEventKind) {
        self.total = self.total.saturating_add(1);
        match kind {
            SimEventKind::ProjectileSpawned => self.spawned = self.spawned.saturating_add(1),
            SimEventKind::ProjectileHitTile => self.hit_tile = self.hit_tile.saturating_add(1),
            SimEventKind::ProjectileHitUnit => self.hit_unit = self.hit_unit.saturating_add(1),
            SimEventKind::ProjectileDespawned => {
                self.despawned = self.despawned.saturating_add(1)
            }
            SimEventKind::ProjectileAbsorbed => self.absorbed = self.absorbed.saturating_add(1),
            SimEventKind::BlockDamaged => {
                self.block_damaged = self.block_damaged.saturating_add(1)
            }
            SimEventKind::StatusApplied => {
                self.status_applied = self.status_applied.saturating_add(1)
            }
        }
    }
}

/// Collects the side effects of one simulation tick. Rendering, audio,
/// and replication are external consumers of these events.
#[derive(Default)]
pub struct SimEventBus {
    current_tick_events: Vec<SimEvent>,
    last_tick_counts: SimEventCounts,
}

impl SimEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: SimEvent) {
        self.current_tick_events.push(event);
    }

    pub fn iter_emitted_so_far(&self) -> impl Iterator<Item = &SimEvent> {
        self.current_tick_events.iter()
    }

    pub fn finish_tick_rollover(&mut self) {
        let mut counts = SimEventCounts::default();
        for event in &self.current_tick_events {
            counts.record(event.kind());
        }
        self.last_tick_counts = counts;
        self.current_tick_events.clear();
    }

    pub fn last_tick_counts(&self) -> SimEventCounts {
        self.last_tick_counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rollover_counts_by_kind_and_clears() {
        let mut arena = crate::sim::projectile::ProjectileArena::with_capacity(1);
        let id = arena.allocate().expect("slot");

        let mut bus = SimEventBus::new();
        bus.emit(SimEvent::ProjectileHitUnit {
            id,
            unit: UnitId(0),
            damage: 5.0,
        });
        bus.emit(SimEvent::BlockDamaged {
            tile_x: 1,
            tile_y: 2,
            amount: 2.0,
        });
        bus.emit(SimEvent::StatusApplied {
            unit: UnitId(1),
            effect: StatusEffect::Burning,
        });
        assert_eq!(bus.iter_emitted_so_far().count(), 3);

        bus.finish_tick_rollover();
        let counts = bus.last_tick_counts();
        assert_eq!(counts.total, 3);
        assert_eq!(counts.hit_unit, 1);
        assert_eq!(counts.block_damaged, 1);
        assert_eq!(counts.status_applied, 1);
        assert_eq!(counts.despawned, 0);
        assert_eq!(bus.iter_emitted_so_far().count(), 0);
    }
}
