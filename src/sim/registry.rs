//! Chair occupancy registry
//!
//! Single authority over which chairs are free. Claims go through
//! [`ChairRegistry::try_claim`], which either atomically flips a free chair
//! to occupied or rejects; the unoccupied tally can never go stale because
//! it only moves inside a successful claim.

use glam::Vec3;

use super::state::{AgentId, ChairId};
use crate::flatten;

/// A single chair in the arena
#[derive(Debug, Clone)]
pub struct Chair {
    pub id: ChairId,
    pub position: Vec3,
    /// Yaw the chair faces, pointing away from the arena center
    pub facing: f32,
    pub occupant: Option<AgentId>,
}

impl Chair {
    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct ChairRegistry {
    chairs: Vec<Chair>,
    unoccupied: u32,
}

impl ChairRegistry {
    pub fn new(chairs: Vec<Chair>) -> Self {
        let unoccupied = chairs.iter().filter(|c| !c.is_occupied()).count() as u32;
        Self { chairs, unoccupied }
    }

    pub fn chairs(&self) -> &[Chair] {
        &self.chairs
    }

    pub fn get(&self, id: ChairId) -> Option<&Chair> {
        self.chairs.iter().find(|c| c.id == id)
    }

    pub fn unoccupied_chairs(&self) -> u32 {
        self.unoccupied
    }

    pub fn total_chairs(&self) -> u32 {
        self.chairs.len() as u32
    }

    /// Nearest unoccupied chair by flattened distance. Ties resolve to the
    /// lower chair id so every caller sees the same answer.
    pub fn closest_unoccupied(&self, from: Vec3) -> Option<ChairId> {
        let from = flatten(from);
        let mut best: Option<(f32, ChairId)> = None;
        for chair in &self.chairs {
            if chair.is_occupied() {
                continue;
            }
            let dist = flatten(chair.position).distance_squared(from);
            if best.is_none_or(|(best_dist, _)| dist < best_dist) {
                best = Some((dist, chair.id));
            }
        }
        best.map(|(_, id)| id)
    }

    /// Attempt to claim `chair` for `agent`. Succeeds only if the chair is
    /// unoccupied; the occupancy flip and the tally decrement happen
    /// together or not at all.
    pub fn try_claim(&mut self, agent: AgentId, chair: ChairId) -> bool {
        let Some(chair) = self.chairs.iter_mut().find(|c| c.id == chair) else {
            log::error!("Claim against unknown chair {chair:?} by {agent:?}");
            return false;
        };
        if let Some(holder) = chair.occupant {
            log::debug!(
                "{agent:?} lost the race for {:?} (held by {holder:?})",
                chair.id
            );
            return false;
        }
        chair.occupant = Some(agent);
        assert!(self.unoccupied > 0, "claim succeeded with zero free tally");
        self.unoccupied -= 1;
        log::debug!("{agent:?} claimed {:?}", chair.id);
        true
    }

    /// Loud consistency check: the free tally must match the per-chair flags
    pub fn assert_consistent(&self) {
        let counted = self.chairs.iter().filter(|c| !c.is_occupied()).count() as u32;
        if counted != self.unoccupied {
            log::error!(
                "Chair tally out of sync: counted {counted}, tracked {}",
                self.unoccupied
            );
        }
        assert_eq!(counted, self.unoccupied, "chair tally out of sync");
    }
}
