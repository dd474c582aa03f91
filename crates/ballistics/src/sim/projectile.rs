use crate::content::{ProjectileDefId, TeamId};
use crate::math::Vec2;
use crate::sim::units::UnitId;

/// Handle to a chain-lightning-style effect instance. The effect
/// itself lives outside this crate; the handle only tags ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArcId(pub u32);

/// Who fired the projectile. Read for velocity inheritance and damage
/// multipliers; never keeps the owner alive.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum ProjectileOwner {
    #[default]
    None,
    Unit(UnitId),
    Arc(ArcId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payload {
    DamageOverride(f32),
}

/// Stable handle to an arena slot. Stale handles (freed or reused
/// slots) are rejected by every lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProjectileId {
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub(crate) def: ProjectileDefId,
    pub(crate) position: Vec2,
    pub(crate) last_position: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) owner: ProjectileOwner,
    pub(crate) team: TeamId,
    pub(crate) time: f32,
    pub(crate) life_scale: f32,
    pub(crate) payload: Option<Payload>,
    pub(crate) suppress_collision: bool,
    pub(crate) suppress_once: bool,
    pub(crate) initialized: bool,
}

impl Default for Projectile {
    fn default() -> Self {
        Self {
            def: ProjectileDefId(0),
            position: Vec2::ZERO,
            last_position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            owner: ProjectileOwner::None,
            team: TeamId(0),
            time: 0.0,
            life_scale: 1.0,
            payload: None,
            suppress_collision: false,
            suppress_once: false,
            initialized: false,
        }
    }
}

impl Projectile {
    pub fn def(&self) -> ProjectileDefId {
        self.def
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn owner(&self) -> ProjectileOwner {
        self.owner
    }

    pub fn team(&self) -> TeamId {
        self.team
    }

    pub fn age(&self) -> f32 {
        self.time
    }

    pub fn payload(&self) -> Option<Payload> {
        self.payload
    }

    pub fn set_payload(&mut self, payload: Option<Payload>) {
        self.payload = payload;
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppress_collision
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    active: bool,
    projectile: Projectile,
}

/// Pool of reusable projectile slots with an explicit free list.
/// Liveness is index validity: a freed slot bumps its generation, so
/// handles into it go stale instead of aliasing the next occupant.
#[derive(Debug)]
pub struct ProjectileArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    capacity: usize,
    active_count: usize,
}

impl ProjectileArena {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            capacity,
            active_count: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.active_count
    }

    pub fn is_empty(&self) -> bool {
        self.active_count == 0
    }

    /// Claims a reset slot. Returns None only when the pool is full.
    pub(crate) fn allocate(&mut self) -> Option<ProjectileId> {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.active = true;
            self.active_count += 1;
            return Some(ProjectileId {
                index,
                generation: slot.generation,
            });
        }
        if self.slots.len() >= self.capacity {
            return None;
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            active: true,
            projectile: Projectile::default(),
        });
        self.active_count += 1;
        Some(ProjectileId {
            index,
            generation: 0,
        })
    }

    /// Returns the slot to the pool, resetting every field. Idempotent:
    /// freeing a stale handle is a no-op returning false.
    pub(crate) fn free(&mut self, id: ProjectileId) -> bool {
        let Some(slot) = self.slot_mut(id) else {
            return false;
        };
        slot.active = false;
        slot.generation = slot.generation.wrapping_add(1);
        slot.projectile.reset();
        self.free.push(id.index);
        self.active_count -= 1;
        true
    }

    pub fn contains(&self, id: ProjectileId) -> bool {
        self.slot(id).is_some()
    }

    pub fn get(&self, id: ProjectileId) -> Option<&Projectile> {
        self.slot(id).map(|slot| &slot.projectile)
    }

    pub(crate) fn get_mut(&mut self, id: ProjectileId) -> Option<&mut Projectile> {
        self.slot_mut(id).map(|slot| &mut slot.projectile)
    }

    /// Active handles in slot order. Collected up front so the caller
    /// can free slots while walking them.
    pub fn ids(&self) -> Vec<ProjectileId> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.active)
            .map(|(index, slot)| ProjectileId {
                index: index as u32,
                generation: slot.generation,
            })
            .collect()
    }

    fn slot(&self, id: ProjectileId) -> Option<&Slot> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.active && slot.generation == id.generation)
    }

    fn slot_mut(&mut self, id: ProjectileId) -> Option<&mut Slot> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.active && slot.generation == id.generation)
    }

    pub(crate) fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.active {
                slot.active = false;
                slot.generation = slot.generation.wrapping_add(1);
                slot.projectile.reset();
                self.free.push(index as u32);
            }
        }
        self.active_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_up_to_capacity_then_silent_none() {
        let mut arena = ProjectileArena::with_capacity(2);
        let a = arena.allocate().expect("first");
        let _b = arena.allocate().expect("second");
        assert_eq!(arena.len(), 2);
        assert!(arena.allocate().is_none());

        assert!(arena.free(a));
        assert!(arena.allocate().is_some());
    }

    #[test]
    fn free_is_idempotent_and_invalidates_handle() {
        let mut arena = ProjectileArena::with_capacity(4);
        let id = arena.allocate().expect("id");
        assert!(arena.contains(id));

        assert!(arena.free(id));
        assert!(!arena.free(id));
        assert!(!arena.contains(id));
        assert!(arena.get(id).is_none());
    }

    #[test]
    fn reused_slot_gets_a_fresh_generation() {
        let mut arena = ProjectileArena::with_capacity(1);
        let first = arena.allocate().expect("first");
        arena.get_mut(first).expect("proj").time = 5.0;
        arena.free(first);

        let second = arena.allocate().expect("second");
        assert_ne!(first, second);
        assert!(!arena.contains(first));
        // reset leaves the reused slot indistinguishable from new
        assert_eq!(arena.get(second).expect("proj"), &Projectile::default());
    }

    #[test]
    fn ids_lists_only_active_slots() {
        let mut arena = ProjectileArena::with_capacity(8);
        let a = arena.allocate().expect("a");
        let b = arena.allocate().expect("b");
        let c = arena.allocate().expect("c");
        arena.free(b);

        let ids = arena.ids();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn clear_frees_everything() {
        let mut arena = ProjectileArena::with_capacity(4);
        let a = arena.allocate().expect("a");
        let _b = arena.allocate().expect("b");
        arena.clear();
        assert!(arena.is_empty());
        assert!(!arena.contains(a));
        assert_eq!(arena.ids(), Vec::new());
    }
}
