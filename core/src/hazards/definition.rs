//! Hazard descriptor types
//!
//! Descriptors are built either in code or from TOML encounter files (see
//! `crate::dsl`). Once installed in the registry they are never mutated.

use std::fmt;
use std::sync::Arc;

use hashbrown::HashSet;
use warden_types::Priority;

use crate::geometry::{Anchor, HazardShape, Vec3};
use crate::world::{EntityKind, EntitySnapshot, WorldSnapshot};

// ═══════════════════════════════════════════════════════════════════════════
// Predicate
// ═══════════════════════════════════════════════════════════════════════════

/// Function of the current world state, e.g. "the agent is in combat" or
/// "the boss is casting Geocrush".
#[derive(Clone)]
pub struct Predicate(Arc<dyn Fn(&WorldSnapshot) -> bool + Send + Sync>);

impl Predicate {
    pub fn new(f: impl Fn(&WorldSnapshot) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn always() -> Self {
        Self::new(|_| true)
    }

    pub fn in_combat() -> Self {
        Self::new(|world| world.player.in_combat)
    }

    pub fn evaluate(&self, world: &WorldSnapshot) -> bool {
        (self.0)(world)
    }

    /// Both predicates must hold
    pub fn and(self, other: Predicate) -> Self {
        Self::new(move |world| self.evaluate(world) && other.evaluate(world))
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Origin
// ═══════════════════════════════════════════════════════════════════════════

/// Which entities anchor an entity-bound hazard.
///
/// Every living entity matching all set fields yields an anchor, so a
/// single descriptor covers every caster of the same ability.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityMatcher {
    pub npc_id: Option<u32>,
    /// Entity must be casting one of these (empty = don't care)
    pub casting: HashSet<u32>,
    pub kind: Option<EntityKind>,
    pub targetable_only: bool,
}

impl EntityMatcher {
    pub fn npc(npc_id: u32) -> Self {
        Self {
            npc_id: Some(npc_id),
            ..Self::default()
        }
    }

    pub fn casting(ability_ids: impl IntoIterator<Item = u32>) -> Self {
        Self {
            casting: ability_ids.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn targetable(mut self) -> Self {
        self.targetable_only = true;
        self
    }

    pub fn matches(&self, entity: &EntitySnapshot) -> bool {
        entity.is_alive
            && self.npc_id.is_none_or(|id| entity.npc_id == id)
            && self.kind.is_none_or(|kind| entity.kind == kind)
            && (!self.targetable_only || entity.is_targetable)
            && (self.casting.is_empty() || entity.is_casting_any(&self.casting))
    }
}

type DynamicOrigin = Arc<dyn Fn(&WorldSnapshot) -> Option<Anchor> + Send + Sync>;

/// Where a hazard sits
#[derive(Clone)]
pub enum OriginProvider {
    /// A fixed world coordinate (arena centres, ground markers)
    Fixed(Vec3),
    /// The live position and facing of every matching entity
    Entity(EntityMatcher),
    /// Anything else
    Dynamic(DynamicOrigin),
}

impl OriginProvider {
    pub fn dynamic(f: impl Fn(&WorldSnapshot) -> Option<Anchor> + Send + Sync + 'static) -> Self {
        Self::Dynamic(Arc::new(f))
    }

    /// Resolve this tick's anchors
    pub fn anchors(&self, world: &WorldSnapshot) -> Vec<Anchor> {
        match self {
            OriginProvider::Fixed(point) => vec![Anchor::at(*point)],
            OriginProvider::Entity(matcher) => world
                .entities
                .iter()
                .filter(|e| matcher.matches(e))
                .map(EntitySnapshot::anchor)
                .collect(),
            OriginProvider::Dynamic(f) => f(world).into_iter().collect(),
        }
    }
}

impl fmt::Debug for OriginProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OriginProvider::Fixed(point) => f.debug_tuple("Fixed").field(point).finish(),
            OriginProvider::Entity(matcher) => f.debug_tuple("Entity").field(matcher).finish(),
            OriginProvider::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Descriptor
// ═══════════════════════════════════════════════════════════════════════════

/// A declared hazard
#[derive(Debug, Clone)]
pub struct HazardDescriptor {
    /// Unique within an encounter
    pub id: String,
    /// Human readable name for logs
    pub label: String,
    pub shape: HazardShape,
    pub origin: OriginProvider,
    pub activation: Predicate,
    pub priority: Priority,
}

impl HazardDescriptor {
    /// New hazard that is active whenever the agent is in combat, at
    /// medium priority.
    pub fn new(id: impl Into<String>, shape: HazardShape, origin: OriginProvider) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            shape,
            origin,
            activation: Predicate::in_combat(),
            priority: Priority::default(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn when(mut self, activation: Predicate) -> Self {
        self.activation = activation;
        self
    }

    /// Anchors of this hazard if it threatens this tick
    pub fn activate(&self, world: &WorldSnapshot) -> Option<Vec<Anchor>> {
        if !self.activation.evaluate(world) {
            return None;
        }
        let anchors = self.origin.anchors(world);
        (!anchors.is_empty()).then_some(anchors)
    }
}
