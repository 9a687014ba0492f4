//! Entity storage
//!
//! Entities live in insertion order, which is also draw order. Removal only
//! marks a slot; the slot disappears at [`EntityStore::sweep`], so systems can
//! keep walking the store for the rest of the tick without invalidating anything.

use super::state::{Entity, EntityId, EntityKind};

#[derive(Debug, Clone)]
struct Slot {
    id: EntityId,
    entity: Entity,
    removed: bool,
}

/// Owns every live entity
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    /// Sorted by id (ids only grow and sweeping keeps order)
    slots: Vec<Slot>,
    next_id: u32,
}

impl EntityStore {
    pub fn add(&mut self, entity: Entity) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.slots.push(Slot {
            id,
            entity,
            removed: false,
        });
        id
    }

    /// Mark an entity for removal at the next sweep. Returns false if it was
    /// already gone or marked.
    pub fn remove(&mut self, id: EntityId) -> bool {
        match self.slot_mut(id) {
            Some(slot) if !slot.removed => {
                slot.removed = true;
                true
            }
            _ => false,
        }
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.slot(id).is_some_and(|s| !s.removed)
    }

    /// Live entity by id (marked entities are hidden)
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.slot(id).filter(|s| !s.removed).map(|s| &s.entity)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.slot_mut(id)
            .filter(|s| !s.removed)
            .map(|s| &mut s.entity)
    }

    /// Visit every live entity of `kind` in insertion order
    pub fn for_each_of_kind(&self, kind: EntityKind, mut f: impl FnMut(EntityId, &Entity)) {
        for slot in self.live_of_kind(kind) {
            f(slot.id, &slot.entity);
        }
    }

    pub fn for_each_of_kind_mut(
        &mut self,
        kind: EntityKind,
        mut f: impl FnMut(EntityId, &mut Entity),
    ) {
        for slot in self
            .slots
            .iter_mut()
            .filter(|s| !s.removed && s.entity.kind() == kind)
        {
            f(slot.id, &mut slot.entity);
        }
    }

    /// Ids of live entities of `kind`, for loops that need to mutate the store
    pub fn ids_of_kind(&self, kind: EntityKind) -> Vec<EntityId> {
        self.live_of_kind(kind).map(|s| s.id).collect()
    }

    pub fn count_of_kind(&self, kind: EntityKind) -> usize {
        self.live_of_kind(kind).count()
    }

    /// All live entities in draw order
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.slots
            .iter()
            .filter(|s| !s.removed)
            .map(|s| (s.id, &s.entity))
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| !s.removed).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all marked slots. Returns how many were dropped.
    pub fn sweep(&mut self) -> usize {
        let before = self.slots.len();
        self.slots.retain(|s| !s.removed);
        before - self.slots.len()
    }

    /// Remove everything immediately (session reset)
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    fn live_of_kind(&self, kind: EntityKind) -> impl Iterator<Item = &Slot> {
        self.slots
            .iter()
            .filter(move |s| !s.removed && s.entity.kind() == kind)
    }

    fn slot(&self, id: EntityId) -> Option<&Slot> {
        self.slots
            .binary_search_by_key(&id, |s| s.id)
            .ok()
            .map(|i| &self.slots[i])
    }

    fn slot_mut(&mut self, id: EntityId) -> Option<&mut Slot> {
        self.slots
            .binary_search_by_key(&id, |s| s.id)
            .ok()
            .map(|i| &mut self.slots[i])
    }
}
