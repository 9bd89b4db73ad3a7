use crate::geo::Coordinate;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;


/// Fence geometry, tagged by `type` on the wire.
///
/// Only circles are evaluated for containment. Polygons are valid
/// catalog entries awaiting future shape support: they are stored,
/// listed, and round-tripped, but never contain anything.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FenceShape {
    Circle {
        center: Coordinate,
        /// Radius in meters. A circle with no radius never contains.
        #[serde(skip_serializing_if = "Option::is_none")]
        radius: Option<f64>,
    },
    Polygon {
        coordinates: Vec<Coordinate>,
    },
}

/// GeoFence is a named region with alerting configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeoFence {
    /// Unique fence identifier
    pub id: String,

    /// Display name, referenced in notification messages
    pub name: String,

    /// Geometry (`type` + shape fields on the wire)
    #[serde(flatten)]
    pub shape: FenceShape,

    /// Presentation-only display color, stored verbatim
    pub color: String,

    /// Inactive fences are never evaluated
    pub active: bool,

    /// Emit an `info` notification on outside → inside
    #[serde(rename = "notifyOnEnter")]
    pub notify_on_enter: bool,

    /// Emit an `alert` notification on inside → outside
    #[serde(rename = "notifyOnExit")]
    pub notify_on_exit: bool,

    /// Entity ids this fence applies to
    #[serde(rename = "appliesTo")]
    pub applies_to: Vec<String>,
}

impl GeoFence {
    /// Whether this fence applies to the given entity.
    pub fn applies_to_entity(&self, entity_id: &str) -> bool {
        self.applies_to.iter().any(|id| id == entity_id)
    }
}

/// Insertion-ordered catalog of geo-fences.
///
/// Catalog order is insertion order (no priority ranking), which is why
/// this is a locked Vec rather than a keyed map. Reads hand out cloned
/// snapshots, so an evaluation in flight never observes a fence half
/// deleted or half updated.
pub struct FenceCatalog {
    fences: RwLock<Vec<GeoFence>>,
}

impl FenceCatalog {
    pub fn new() -> Self {
        Self {
            fences: RwLock::new(Vec::new()),
        }
    }

    /// Insert or replace a fence. An existing id is updated in place,
    /// keeping its catalog position; a new id appends.
    pub fn upsert(&self, fence: GeoFence) {
        let mut fences = self.fences.write().unwrap();
        match fences.iter_mut().find(|f| f.id == fence.id) {
            Some(existing) => *existing = fence,
            None => fences.push(fence),
        }
    }

    /// Remove a fence by id. Absent ids are a no-op.
    pub fn delete(&self, id: &str) -> Option<GeoFence> {
        let mut fences = self.fences.write().unwrap();
        let index = fences.iter().position(|f| f.id == id)?;
        Some(fences.remove(index))
    }

    /// Fence by id, if present.
    pub fn get(&self, id: &str) -> Option<GeoFence> {
        self.fences.read().unwrap().iter().find(|f| f.id == id).cloned()
    }

    /// All fences in catalog order.
    pub fn all(&self) -> Vec<GeoFence> {
        self.fences.read().unwrap().clone()
    }

    /// All *active* fences applying to the entity, in catalog order.
    /// Returns a snapshot; concurrent catalog mutation cannot affect an
    /// evaluation already holding the result.
    pub fn applicable_to(&self, entity_id: &str) -> Vec<GeoFence> {
        self.fences
            .read()
            .unwrap()
            .iter()
            .filter(|f| f.active && f.applies_to_entity(entity_id))
            .cloned()
            .collect()
    }
}

impl Default for FenceCatalog {
    fn default() -> Self {
        Self::new()
    }
}
