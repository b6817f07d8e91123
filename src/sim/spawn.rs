//! Level population
//!
//! Chairs and NPCs spawn on rings built by rotating a base offset around
//! the arena center. Powerups and hazards land at random points in an
//! annulus; powerup placement rejection-samples for clearance and gives up
//! loudly after a bounded number of attempts.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;

use super::raycast::Collider;
use super::registry::Chair;
use super::state::{ChairId, Hazard, HazardKind, Powerup};
use crate::consts::{CHAIR_SPAWN_OFFSET, PLAYER_SPAWN, POWERUP_RADIUS};
use crate::tuning::SpawnTuning;
use crate::{dir_to_yaw, flatten, rotate_y};

/// Evenly spaced chair ring, each chair facing outward
pub fn chair_ring(count: u32) -> Vec<Chair> {
    let step = TAU / count as f32;
    let mut offset = CHAIR_SPAWN_OFFSET;
    let mut chairs = Vec::with_capacity(count as usize);
    for i in 0..count {
        chairs.push(Chair {
            id: ChairId(i),
            position: offset,
            facing: dir_to_yaw(flatten(offset)),
            occupant: None,
        });
        offset = rotate_y(offset, step);
    }
    chairs
}

/// NPC spawn positions: the player keeps the base slot, NPCs take the
/// remaining evenly spaced slots on the same ring
pub fn npc_ring(count: u32) -> Vec<Vec3> {
    let step = TAU / (count + 1) as f32;
    let mut pos = PLAYER_SPAWN;
    let mut out = Vec::with_capacity(count as usize);
    for _ in 0..count {
        pos = rotate_y(pos, step);
        out.push(pos);
    }
    out
}

/// Escape handedness for a fresh agent: -2, -1, 1 or 2, never 0
pub fn sample_bias(rng: &mut Pcg32) -> i8 {
    const BIASES: [i8; 4] = [-2, -1, 1, 2];
    BIASES[rng.random_range(0..BIASES.len())]
}

/// Uniform random point in the spawn annulus
fn annulus_point(rng: &mut Pcg32, inner: f32, outer: f32) -> Vec3 {
    let angle = rng.random_range(0.0..TAU);
    let radius = rng.random_range(inner..outer);
    Vec3::new(angle.sin() * radius, 0.0, angle.cos() * radius)
}

fn has_clearance(pos: Vec3, clearance: f32, colliders: &[Collider], placed: &[Powerup]) -> bool {
    let blocked = colliders
        .iter()
        .any(|c| c.center.distance(pos) < clearance + c.radius)
        || placed
            .iter()
            .any(|p| flatten(p.pos).distance(pos) < clearance + POWERUP_RADIUS);
    !blocked
}

/// Scatter powerups with clearance from the scene and each other. A spawn
/// that cannot find room within the attempt cap is skipped, not retried
/// forever.
pub fn place_powerups(
    rng: &mut Pcg32,
    tuning: &SpawnTuning,
    colliders: &[Collider],
    next_id: &mut u32,
) -> Vec<Powerup> {
    let mut placed = Vec::with_capacity(tuning.power_count as usize);
    for _ in 0..tuning.power_count {
        let mut spawned = false;
        for _ in 0..tuning.iteration_limit {
            let pos = annulus_point(rng, tuning.inner_radius, tuning.outer_radius);
            if has_clearance(pos, tuning.avoid_distance, colliders, &placed) {
                let id = *next_id;
                *next_id += 1;
                placed.push(Powerup { id, pos });
                spawned = true;
                break;
            }
        }
        if !spawned {
            log::warn!(
                "No clear powerup spot after {} attempts, skipping one",
                tuning.iteration_limit
            );
        }
    }
    placed
}

/// Timed hazard drops. The countdown only advances while hazards are
/// allowed: always once the music stops, and during the music only when
/// `music_hazard` is set.
#[derive(Debug, Clone)]
pub struct HazardSpawner {
    timer: f32,
}

impl HazardSpawner {
    pub fn new() -> Self {
        Self { timer: 0.0 }
    }

    pub fn tick(
        &mut self,
        dt: f32,
        music_playing: bool,
        tuning: &SpawnTuning,
        rng: &mut Pcg32,
        next_id: &mut u32,
    ) -> Option<Hazard> {
        if music_playing && !tuning.music_hazard {
            return None;
        }
        self.timer += dt;
        if self.timer < tuning.hazard_time_gap {
            return None;
        }
        self.timer = 0.0;

        let kind = if rng.random_range(0..2u32) == 0 {
            HazardKind::Slow
        } else {
            HazardKind::Stun
        };
        let pos = annulus_point(rng, tuning.inner_radius, tuning.outer_radius);
        let id = *next_id;
        *next_id += 1;
        log::debug!("Hazard {id} ({kind:?}) dropped at {pos:?}");
        Some(Hazard {
            id,
            kind,
            pos,
            ttl: tuning.hazard_duration,
        })
    }
}

impl Default for HazardSpawner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::raycast::ColliderId;
    use crate::sim::state::AgentId;
    use rand::SeedableRng;

    #[test]
    fn test_chair_ring_radius_and_spacing() {
        let chairs = chair_ring(4);
        assert_eq!(chairs.len(), 4);
        let radius = CHAIR_SPAWN_OFFSET.length();
        for chair in &chairs {
            assert!((flatten(chair.position).length() - radius).abs() < 1e-4);
            assert!(chair.occupant.is_none());
        }
        // Quarter-turn spacing
        let spacing = flatten(chairs[0].position).distance(flatten(chairs[1].position));
        assert!((spacing - radius * (TAU / 8.0).sin() * 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_npc_ring_leaves_player_slot() {
        let positions = npc_ring(3);
        assert_eq!(positions.len(), 3);
        for pos in &positions {
            assert!((flatten(*pos).length() - PLAYER_SPAWN.length()).abs() < 1e-4);
            assert!(pos.distance(PLAYER_SPAWN) > 1.0, "NPC overlaps the player slot");
        }
    }

    #[test]
    fn test_bias_never_zero() {
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..64 {
            let bias = sample_bias(&mut rng);
            assert!(matches!(bias, -2 | -1 | 1 | 2));
        }
    }

    #[test]
    fn test_powerups_inside_annulus_with_clearance() {
        let mut rng = Pcg32::seed_from_u64(21);
        let tuning = SpawnTuning::default();
        let mut next_id = 100;
        let powerups = place_powerups(&mut rng, &tuning, &[], &mut next_id);
        assert_eq!(powerups.len(), tuning.power_count as usize);
        for (i, p) in powerups.iter().enumerate() {
            let r = flatten(p.pos).length();
            assert!(r >= tuning.inner_radius && r <= tuning.outer_radius);
            for other in &powerups[..i] {
                assert!(flatten(p.pos).distance(flatten(other.pos)) >= tuning.avoid_distance);
            }
        }
        assert_eq!(next_id, 100 + tuning.power_count);
    }

    #[test]
    fn test_crowded_arena_skips_powerups() {
        let mut rng = Pcg32::seed_from_u64(3);
        let tuning = SpawnTuning::default();
        // One huge collider covers the whole annulus
        let blocker = Collider {
            id: ColliderId::Agent(AgentId(0)),
            center: Vec3::ZERO,
            radius: tuning.outer_radius + tuning.avoid_distance,
        };
        let mut next_id = 0;
        let powerups = place_powerups(&mut rng, &tuning, &[blocker], &mut next_id);
        assert!(powerups.is_empty());
    }

    #[test]
    fn test_hazard_spawner_honors_time_gap() {
        let mut rng = Pcg32::seed_from_u64(7);
        let tuning = SpawnTuning::default();
        let mut spawner = HazardSpawner::new();
        let mut next_id = 0;
        let dt = 1.0 / 60.0;

        let mut elapsed = 0.0;
        let mut first = None;
        while first.is_none() {
            first = spawner.tick(dt, false, &tuning, &mut rng, &mut next_id);
            elapsed += dt;
            assert!(elapsed < tuning.hazard_time_gap * 2.0, "never spawned");
        }
        assert!(elapsed >= tuning.hazard_time_gap);
        let hazard = first.unwrap();
        assert!((hazard.ttl - tuning.hazard_duration).abs() < 1e-5);
        let r = flatten(hazard.pos).length();
        assert!(r >= tuning.inner_radius && r <= tuning.outer_radius);
    }

    #[test]
    fn test_no_hazards_during_music_by_default() {
        let mut rng = Pcg32::seed_from_u64(7);
        let tuning = SpawnTuning::default();
        let mut spawner = HazardSpawner::new();
        let mut next_id = 0;
        for _ in 0..(60.0 * tuning.hazard_time_gap * 3.0) as u32 {
            assert!(spawner.tick(1.0 / 60.0, true, &tuning, &mut rng, &mut next_id).is_none());
        }
    }

    #[test]
    fn test_music_hazard_flag_allows_spawns() {
        let mut rng = Pcg32::seed_from_u64(7);
        let tuning = SpawnTuning {
            music_hazard: true,
            ..Default::default()
        };
        let mut spawner = HazardSpawner::new();
        let mut next_id = 0;
        let mut spawned = false;
        for _ in 0..(60.0 * tuning.hazard_time_gap * 2.0) as u32 {
            if spawner.tick(1.0 / 60.0, true, &tuning, &mut rng, &mut next_id).is_some() {
                spawned = true;
                break;
            }
        }
        assert!(spawned);
    }
}
