use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A generational entity identifier.
///
/// Layout: `u32 index` + `u32 generation`.
///
/// - **index**: slot index in the entity allocator
/// - **generation**: incremented every time the slot is recycled, so a handle
///   held across a despawn never validates against the slot's new occupant
///
/// # Identity
///
/// Two entities are equal if they have the same `(index, generation)`.
#[derive(Clone, Copy, Serialize, Deserialize)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Returns the slot index of this entity.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Returns the generation of this entity.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl Eq for Entity {}

impl Hash for Entity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({}@{})", self.index, self.generation)
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({}@{})", self.index, self.generation)
    }
}

/// Allocates and recycles entity slots with generation tracking.
///
/// When an entity is despawned, its slot goes onto a free list and its
/// generation is bumped. The next spawn reuses the slot under the new
/// generation, invalidating any old `Entity` handles.
pub(crate) struct EntityAllocator {
    /// Generation for each slot. Index = entity index.
    generations: Vec<u32>,
    /// Alive flag per slot.
    alive: Vec<bool>,
    /// Free list of recyclable indices (LIFO stack).
    free_list: Vec<u32>,
    /// Total number of currently alive entities.
    count: u32,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self {
            generations: Vec::new(),
            alive: Vec::new(),
            free_list: Vec::new(),
            count: 0,
        }
    }

    /// Allocates a new entity, reusing a recycled slot if available.
    pub fn allocate(&mut self) -> Entity {
        self.count += 1;

        if let Some(index) = self.free_list.pop() {
            let idx = index as usize;
            self.alive[idx] = true;
            Entity::new(index, self.generations[idx])
        } else {
            let index = self.generations.len() as u32;
            self.generations.push(0);
            self.alive.push(true);
            Entity::new(index, 0)
        }
    }

    /// Deallocates an entity. Returns false if already dead or generation mismatch.
    pub fn deallocate(&mut self, entity: Entity) -> bool {
        let idx = entity.index() as usize;
        if idx >= self.alive.len()
            || !self.alive[idx]
            || self.generations[idx] != entity.generation()
        {
            return false;
        }

        self.alive[idx] = false;
        // Bump the generation so any old handles are invalidated on reuse
        self.generations[idx] = self.generations[idx].wrapping_add(1);
        self.free_list.push(entity.index());
        self.count -= 1;
        true
    }

    /// Returns whether the entity is currently alive.
    pub fn is_alive(&self, entity: Entity) -> bool {
        let idx = entity.index() as usize;
        idx < self.alive.len() && self.alive[idx] && self.generations[idx] == entity.generation()
    }

    /// Returns the number of alive entities.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Iterates over all currently alive entity IDs.
    pub fn iter_alive(&self) -> impl Iterator<Item = Entity> + '_ {
        self.alive
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(|(idx, _)| Entity::new(idx as u32, self.generations[idx]))
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}
