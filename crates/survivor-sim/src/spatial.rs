//! Spatial queries over hostiles.
//!
//! Weapons never read the ECS world directly for targeting. Each pass builds a
//! `HostileIndex` snapshot first and mutates the world afterwards, so queries
//! never observe a half-applied volley.

use glam::DVec3;
use hecs::{Entity, World};

use survivor_core::components::{Collider, Health, Hostile};
use survivor_core::types::Position;

/// A ray intersection.
#[derive(Debug, Clone, Copy)]
pub struct Hit {
    pub entity: Entity,
    /// Entry point on the body surface.
    pub point: Position,
    /// Distance from the ray origin to `point`.
    pub distance: f64,
}

/// Hostile lookups consumed by the weapon systems.
pub trait SpatialQuery {
    /// Hostiles whose body overlaps the sphere at `center`.
    fn query_radius(&self, center: &Position, radius: f64) -> Vec<Entity>;

    /// Hostiles touched by a sphere of `radius` moving from `from` to `to`,
    /// in the order the sphere reaches them.
    fn sweep(&self, from: &Position, to: &Position, radius: f64) -> Vec<Entity>;

    /// Hostiles hit by a ray, ordered by distance from `origin`.
    fn raycast(&self, origin: &Position, direction: DVec3, max_range: f64) -> Vec<Hit>;

    /// Closest hostile to `from`. Ties go to the first one found.
    fn nearest(&self, from: &Position) -> Option<(Entity, Position)>;
}

#[derive(Debug, Clone, Copy)]
struct IndexedBody {
    entity: Entity,
    position: Position,
    radius: f64,
}

/// Flat snapshot of living hostiles.
#[derive(Debug, Default)]
pub struct HostileIndex {
    bodies: Vec<IndexedBody>,
}

impl HostileIndex {
    /// Snapshot every living hostile in the world.
    pub fn build(world: &World) -> Self {
        let bodies = world
            .query::<(&Hostile, &Position, &Collider, &Health)>()
            .iter()
            .filter(|(_, (_, _, _, health))| health.current > 0)
            .map(|(entity, (_, pos, collider, _))| IndexedBody {
                entity,
                position: *pos,
                radius: collider.radius,
            })
            .collect();
        Self { bodies }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

impl SpatialQuery for HostileIndex {
    fn query_radius(&self, center: &Position, radius: f64) -> Vec<Entity> {
        self.bodies
            .iter()
            .filter(|b| center.range_to(&b.position) <= radius + b.radius)
            .map(|b| b.entity)
            .collect()
    }

    fn sweep(&self, from: &Position, to: &Position, radius: f64) -> Vec<Entity> {
        let path = to.0 - from.0;
        let length = path.length();
        if length <= f64::EPSILON {
            return self.query_radius(to, radius);
        }
        let dir = path / length;

        let mut hits: Vec<(f64, Entity)> = self
            .bodies
            .iter()
            .filter_map(|b| {
                let distance = ray_sphere_entry(from.0, dir, b.position.0, b.radius + radius)?;
                (distance <= length).then_some((distance, b.entity))
            })
            .collect();
        hits.sort_by(|a, b| a.0.total_cmp(&b.0));
        hits.into_iter().map(|(_, entity)| entity).collect()
    }

    fn raycast(&self, origin: &Position, direction: DVec3, max_range: f64) -> Vec<Hit> {
        let dir = direction.normalize_or_zero();
        if dir == DVec3::ZERO {
            return Vec::new();
        }

        let mut hits: Vec<Hit> = self
            .bodies
            .iter()
            .filter_map(|b| {
                let distance = ray_sphere_entry(origin.0, dir, b.position.0, b.radius)?;
                (distance <= max_range).then(|| Hit {
                    entity: b.entity,
                    point: Position(origin.0 + dir * distance),
                    distance,
                })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn nearest(&self, from: &Position) -> Option<(Entity, Position)> {
        let mut best: Option<(f64, &IndexedBody)> = None;
        for body in &self.bodies {
            let distance = from.range_to(&body.position);
            if best.map_or(true, |(d, _)| distance < d) {
                best = Some((distance, body));
            }
        }
        best.map(|(_, b)| (b.entity, b.position))
    }
}

/// Distance along a unit ray to where it enters a sphere. An origin already
/// inside the sphere counts as a hit at distance zero.
fn ray_sphere_entry(origin: DVec3, dir: DVec3, center: DVec3, radius: f64) -> Option<f64> {
    let to_center = center - origin;
    let r2 = radius * radius;
    if to_center.length_squared() <= r2 {
        return Some(0.0);
    }

    let t_closest = to_center.dot(dir);
    if t_closest < 0.0 {
        return None;
    }
    let d2 = to_center.length_squared() - t_closest * t_closest;
    if d2 > r2 {
        return None;
    }
    Some(t_closest - (r2 - d2).sqrt())
}
