//! Campaign map - named locations joined by roads
//!
//! The strategic layer is a graph of named places. Marshals march along
//! roads one location per movement point; the planner finds shortest
//! routes, optionally refusing to route through hostile-held ground.

use ahash::{AHashMap, AHashSet};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::core::types::LocationId;

/// Ground class of a location, granting a defensive edge to a holding force
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroundKind {
    Open,
    Forest,
    Hills,
    Ford,
    Fortress,
}

impl GroundKind {
    /// Defense bonus when holding this ground
    pub fn defense_bonus(&self) -> f32 {
        match self {
            Self::Open => 0.0,
            Self::Forest => 0.2,
            Self::Hills => 0.3,
            Self::Ford => -0.1, // crossings are bad ground to defend
            Self::Fortress => 0.5,
        }
    }
}

impl Default for GroundKind {
    fn default() -> Self {
        Self::Open
    }
}

/// A named place on the campaign map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    pub ground: GroundKind,
}

/// The campaign map: locations and the roads between them
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CampaignMap {
    locations: AHashMap<LocationId, Location>,
    // Adjacency lists are kept sorted so iteration order is stable.
    roads: AHashMap<LocationId, Vec<LocationId>>,
}

impl CampaignMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a location. Returns its id for convenience.
    pub fn add_location(&mut self, id: LocationId, name: &str, ground: GroundKind) -> LocationId {
        self.locations.insert(
            id,
            Location {
                id,
                name: name.to_string(),
                ground,
            },
        );
        self.roads.entry(id).or_default();
        id
    }

    /// Lay a two-way road between two locations
    pub fn link(&mut self, a: LocationId, b: LocationId) {
        let forward = self.roads.entry(a).or_default();
        if !forward.contains(&b) {
            forward.push(b);
            forward.sort();
        }
        let back = self.roads.entry(b).or_default();
        if !back.contains(&a) {
            back.push(a);
            back.sort();
        }
    }

    pub fn get(&self, id: LocationId) -> Option<&Location> {
        self.locations.get(&id)
    }

    pub fn contains(&self, id: LocationId) -> bool {
        self.locations.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Display name for a location, or a placeholder for unknown ids
    pub fn name_of(&self, id: LocationId) -> &str {
        self.locations
            .get(&id)
            .map(|l| l.name.as_str())
            .unwrap_or("unknown ground")
    }

    pub fn neighbors(&self, id: LocationId) -> &[LocationId] {
        self.roads.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn adjacent(&self, a: LocationId, b: LocationId) -> bool {
        self.neighbors(a).contains(&b)
    }

    /// Road distance in hops, if the two locations are connected
    pub fn distance(&self, a: LocationId, b: LocationId) -> Option<u32> {
        self.shortest_path(a, b).map(|p| (p.len() - 1) as u32)
    }

    /// Shortest route from start to goal, inclusive of both ends
    ///
    /// The returned path begins with `start`; callers pop the head once
    /// they stand on it.
    pub fn shortest_path(&self, start: LocationId, goal: LocationId) -> Option<Vec<LocationId>> {
        self.shortest_path_avoiding(start, goal, &AHashSet::new())
    }

    /// Shortest route that refuses to pass through any location in `avoid`
    ///
    /// Start and goal are exempt from the avoid set: a marshal can always
    /// leave where it stands, and a route to a contested goal is the
    /// caller's problem to finish.
    pub fn shortest_path_avoiding(
        &self,
        start: LocationId,
        goal: LocationId,
        avoid: &AHashSet<LocationId>,
    ) -> Option<Vec<LocationId>> {
        if !self.contains(start) || !self.contains(goal) {
            return None;
        }
        if start == goal {
            return Some(vec![start]);
        }

        let mut open: BinaryHeap<Reverse<(u32, LocationId)>> = BinaryHeap::new();
        let mut came_from: AHashMap<LocationId, LocationId> = AHashMap::new();
        let mut cost: AHashMap<LocationId, u32> = AHashMap::new();

        cost.insert(start, 0);
        open.push(Reverse((0, start)));

        while let Some(Reverse((dist, current))) = open.pop() {
            if current == goal {
                let mut path = vec![goal];
                let mut walk = goal;
                while let Some(&prev) = came_from.get(&walk) {
                    path.push(prev);
                    walk = prev;
                }
                path.reverse();
                return Some(path);
            }

            if dist > *cost.get(&current).unwrap_or(&u32::MAX) {
                continue;
            }

            for &next in self.neighbors(current) {
                if next != goal && avoid.contains(&next) {
                    continue;
                }
                let tentative = dist + 1;
                if tentative < *cost.get(&next).unwrap_or(&u32::MAX) {
                    came_from.insert(next, current);
                    cost.insert(next, tentative);
                    open.push(Reverse((tentative, next)));
                }
            }
        }

        None
    }

    /// Generate a connected demo map: a ring of marches with spur roads
    ///
    /// Used by the demo binary and stress scenarios; real campaigns load
    /// authored maps.
    pub fn generate_marches(regions: u32, seed: u64) -> Self {
        const PREFIXES: &[&str] = &[
            "East", "West", "High", "Low", "Old", "New", "Stone", "Black", "White", "Red",
        ];
        const SUFFIXES: &[&str] = &[
            "gate", "ford", "bridge", "march", "field", "holt", "burg", "keep", "cross", "mere",
        ];
        const GROUNDS: &[GroundKind] = &[
            GroundKind::Open,
            GroundKind::Open,
            GroundKind::Forest,
            GroundKind::Hills,
            GroundKind::Ford,
            GroundKind::Fortress,
        ];

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut map = Self::new();

        for i in 0..regions {
            let prefix = PREFIXES[(i as usize) % PREFIXES.len()];
            let suffix = SUFFIXES[(i as usize / PREFIXES.len()) % SUFFIXES.len()];
            let ground = *GROUNDS.choose(&mut rng).unwrap_or(&GroundKind::Open);
            map.add_location(LocationId(i), &format!("{}{}", prefix, suffix), ground);
        }

        // Ring road keeps the map connected.
        if regions > 1 {
            for i in 0..regions {
                map.link(LocationId(i), LocationId((i + 1) % regions));
            }
        }

        // Spur roads cut across the ring.
        let spurs = regions / 3;
        for _ in 0..spurs {
            let a = LocationId(rng.gen_range(0..regions));
            let b = LocationId(rng.gen_range(0..regions));
            if a != b {
                map.link(a, b);
            }
        }

        map
    }
}
