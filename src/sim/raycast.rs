//! Raycast primitive for the avoidance probes
//!
//! The arena is planar, so colliders are circles in the XZ plane and rays
//! are cast flat. Hits report collider identity so callers can exclude the
//! target chair (and themselves) from repulsion.

use glam::Vec3;

use super::state::{AgentId, ChairId};
use crate::flatten;

/// Identity of a scene collider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColliderId {
    Agent(AgentId),
    Chair(ChairId),
}

/// A circular collider in the XZ plane
#[derive(Debug, Clone, Copy)]
pub struct Collider {
    pub id: ColliderId,
    /// Flattened center (y = 0)
    pub center: Vec3,
    pub radius: f32,
}

/// A single raycast hit
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    pub collider: ColliderId,
    /// Contact point on the collider surface (flattened)
    pub point: Vec3,
    pub distance: f32,
}

/// Intersect a flat ray with a circle. Returns the entry distance and
/// contact point; a ray starting inside the circle hits at distance zero.
fn ray_circle(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<(f32, Vec3)> {
    let to_center = flatten(center - origin);
    let proj = to_center.dot(dir);
    let closest_sq = to_center.length_squared() - proj * proj;
    let radius_sq = radius * radius;

    if closest_sq > radius_sq {
        return None;
    }

    let half_chord = (radius_sq - closest_sq).sqrt();
    let t_near = proj - half_chord;
    let t_far = proj + half_chord;

    if t_far < 0.0 {
        // Circle entirely behind the ray
        return None;
    }

    let t = t_near.max(0.0);
    Some((t, origin + dir * t))
}

/// Cast a flat ray and return the nearest hit within `max_distance`,
/// skipping any collider in `exclude`
pub fn raycast(
    colliders: &[Collider],
    origin: Vec3,
    dir: Vec3,
    max_distance: f32,
    exclude: &[ColliderId],
) -> Option<RayHit> {
    let origin = flatten(origin);
    let dir = flatten(dir).normalize_or_zero();
    if dir == Vec3::ZERO {
        return None;
    }

    let mut nearest: Option<RayHit> = None;
    for collider in colliders {
        if exclude.contains(&collider.id) {
            continue;
        }
        if let Some((distance, point)) = ray_circle(origin, dir, collider.center, collider.radius) {
            if distance > max_distance {
                continue;
            }
            if nearest.as_ref().is_none_or(|hit| distance < hit.distance) {
                nearest = Some(RayHit {
                    collider: collider.id,
                    point,
                    distance,
                });
            }
        }
    }
    nearest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(id: u32, x: f32, z: f32, radius: f32) -> Collider {
        Collider {
            id: ColliderId::Agent(AgentId(id)),
            center: Vec3::new(x, 0.0, z),
            radius,
        }
    }

    #[test]
    fn test_ray_hits_circle_ahead() {
        let colliders = [agent(1, 0.0, 5.0, 1.0)];
        let hit = raycast(&colliders, Vec3::ZERO, Vec3::Z, 10.0, &[]).unwrap();
        assert_eq!(hit.collider, ColliderId::Agent(AgentId(1)));
        assert!((hit.distance - 4.0).abs() < 1e-4);
        assert!((hit.point.z - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_ray_misses_circle_behind() {
        let colliders = [agent(1, 0.0, -5.0, 1.0)];
        assert!(raycast(&colliders, Vec3::ZERO, Vec3::Z, 10.0, &[]).is_none());
    }

    #[test]
    fn test_ray_respects_max_distance() {
        let colliders = [agent(1, 0.0, 5.0, 1.0)];
        assert!(raycast(&colliders, Vec3::ZERO, Vec3::Z, 3.0, &[]).is_none());
    }

    #[test]
    fn test_ray_skips_excluded_and_reports_next() {
        let colliders = [agent(1, 0.0, 2.0, 0.5), agent(2, 0.0, 6.0, 0.5)];
        let hit = raycast(
            &colliders,
            Vec3::ZERO,
            Vec3::Z,
            10.0,
            &[ColliderId::Agent(AgentId(1))],
        )
        .unwrap();
        assert_eq!(hit.collider, ColliderId::Agent(AgentId(2)));
    }

    #[test]
    fn test_nearest_of_several() {
        let colliders = [agent(1, 0.0, 8.0, 1.0), agent(2, 0.0, 3.0, 1.0)];
        let hit = raycast(&colliders, Vec3::ZERO, Vec3::Z, 20.0, &[]).unwrap();
        assert_eq!(hit.collider, ColliderId::Agent(AgentId(2)));
    }

    #[test]
    fn test_origin_inside_collider_hits_at_zero() {
        let colliders = [agent(1, 0.0, 0.2, 1.0)];
        let hit = raycast(&colliders, Vec3::ZERO, Vec3::Z, 5.0, &[]).unwrap();
        assert_eq!(hit.distance, 0.0);
    }

    #[test]
    fn test_vertical_component_ignored() {
        // Ray origin above the plane still probes the flat scene
        let colliders = [agent(1, 0.0, 5.0, 1.0)];
        let origin = Vec3::new(0.0, 0.5, 0.0);
        assert!(raycast(&colliders, origin, Vec3::Z, 10.0, &[]).is_some());
    }
}
