use crate::content::{StatusEffect, TeamId};
use crate::math::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnitId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppliedStatus {
    pub effect: StatusEffect,
    pub intensity: f32,
}

/// Explicit capability data for one unit: everything the projectile
/// contract reads or writes, no trait objects.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    pub position: Vec2,
    pub velocity: Vec2,
    pub team: TeamId,
    pub mass: f32,
    pub hit_radius: f32,
    pub flying: bool,
    pub health: f32,
    pub damage_multiplier: f32,
    pub statuses: Vec<AppliedStatus>,
}

impl Unit {
    pub fn grounded(team: TeamId, position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            team,
            mass: 1.0,
            hit_radius: 4.0,
            flying: false,
            health: 100.0,
            damage_multiplier: 1.0,
            statuses: Vec::new(),
        }
    }

    pub fn airborne(team: TeamId, position: Vec2) -> Self {
        Self {
            flying: true,
            ..Self::grounded(team, position)
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn apply_damage(&mut self, amount: f32) {
        self.health = (self.health - amount).max(0.0);
    }

    /// Re-applying an effect keeps the stronger intensity.
    pub fn apply_status(&mut self, effect: StatusEffect, intensity: f32) {
        if effect == StatusEffect::None {
            return;
        }
        if let Some(existing) = self
            .statuses
            .iter_mut()
            .find(|applied| applied.effect == effect)
        {
            existing.intensity = existing.intensity.max(intensity);
            return;
        }
        self.statuses.push(AppliedStatus { effect, intensity });
    }

    pub fn has_status(&self, effect: StatusEffect) -> bool {
        self.statuses.iter().any(|applied| applied.effect == effect)
    }
}

/// Grow-only arena; units keep their id for the whole session and are
/// marked dead rather than removed.
#[derive(Debug, Default)]
pub struct UnitArena {
    units: Vec<Unit>,
}

impl UnitArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, unit: Unit) -> UnitId {
        let id = UnitId(self.units.len() as u32);
        self.units.push(unit);
        id
    }

    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = UnitId> {
        (0..self.units.len() as u32).map(UnitId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_assigns_sequential_ids() {
        let mut arena = UnitArena::new();
        let a = arena.spawn(Unit::grounded(TeamId(0), Vec2::ZERO));
        let b = arena.spawn(Unit::airborne(TeamId(1), Vec2::new(1.0, 2.0)));
        assert_eq!(a, UnitId(0));
        assert_eq!(b, UnitId(1));
        assert!(arena.get(b).expect("unit").flying);
        assert!(arena.get(UnitId(2)).is_none());
    }

    #[test]
    fn status_reapplication_keeps_stronger_intensity() {
        let mut unit = Unit::grounded(TeamId(0), Vec2::ZERO);
        unit.apply_status(StatusEffect::Burning, 0.5);
        unit.apply_status(StatusEffect::Burning, 0.2);
        unit.apply_status(StatusEffect::Freezing, 1.0);

        assert_eq!(unit.statuses.len(), 2);
        let burning = unit
            .statuses
            .iter()
            .find(|applied| applied.effect == StatusEffect::Burning)
            .expect("burning");
        assert_eq!(burning.intensity, 0.5);
    }

    #[test]
    fn none_status_is_never_recorded() {
        let mut unit = Unit::grounded(TeamId(0), Vec2::ZERO);
        unit.apply_status(StatusEffect::None, 1.0);
        assert!(unit.statuses.is_empty());
    }

    #[test]
    fn damage_floors_at_zero() {
        let mut unit = Unit::grounded(TeamId(0), Vec2::ZERO);
        unit.apply_damage(250.0);
        assert_eq!(unit.health, 0.0);
        assert!(!unit.is_alive());
    }
}
