//! Sweep-and-prune broad phase.
//!
//! Consumes a snapshot of body AABBs and produces a superset of colliding
//! pairs. Static-static pairs are filtered out (two immovable bodies never
//! produce useful constraint work).

use crate::data::arena::Index;
use crate::geometry::aabb::Aabb;

/// One body's bounding box, as seen by the broad phase. `dynamic` is
/// `true` when the body's inverse mass is non-zero; purely static-static
/// pairs are dropped before the candidate list leaves this module.
#[derive(Copy, Clone, Debug)]
pub struct BroadPhaseProxy {
    pub handle: Index,
    pub aabb: Aabb,
    pub dynamic: bool,
}

/// Sweep-and-prune broad phase. Re-sorts its proxy list every call; this
/// crate does not attempt incremental maintenance (permitted, not
/// required, per the contract), trading a little CPU for a much simpler
/// and more obviously-correct implementation.
#[derive(Default)]
pub struct BroadPhase {
    proxies: Vec<BroadPhaseProxy>,
}

impl BroadPhase {
    pub fn new() -> Self {
        Self {
            proxies: Vec::new(),
        }
    }

    /// Rebuilds the candidate pair set from scratch given the current
    /// proxies. The input order does not affect the output (the proxies
    /// are sorted internally before sweeping).
    pub fn find_pairs(&mut self, proxies: Vec<BroadPhaseProxy>) -> Vec<(Index, Index)> {
        self.proxies = proxies;
        self.proxies
            .sort_by(|a, b| a.aabb.lower.x.partial_cmp(&b.aabb.lower.x).unwrap());

        let mut pairs = Vec::new();
        for i in 0..self.proxies.len() {
            let a = &self.proxies[i];
            for b in &self.proxies[i + 1..] {
                if b.aabb.lower.x > a.aabb.upper.x {
                    // Sorted by lower.x: everything further along the
                    // sweep only moves further away on the x axis.
                    break;
                }
                if !a.dynamic && !b.dynamic {
                    continue;
                }
                if a.aabb.overlaps(b.aabb) {
                    pairs.push(order_pair(a.handle, b.handle));
                }
            }
        }
        pairs
    }
}

#[inline]
fn order_pair(a: Index, b: Index) -> (Index, Index) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::arena::Arena;
    use crate::math::Vec2;

    fn handle(arena: &mut Arena<()>) -> Index {
        arena.insert(())
    }

    #[test]
    fn overlapping_dynamic_pair_is_reported() {
        let mut arena = Arena::new();
        let h1 = handle(&mut arena);
        let h2 = handle(&mut arena);
        let mut bp = BroadPhase::new();
        let pairs = bp.find_pairs(vec![
            BroadPhaseProxy {
                handle: h1,
                aabb: Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0)),
                dynamic: true,
            },
            BroadPhaseProxy {
                handle: h2,
                aabb: Aabb::new(Vec2::new(1.0, 1.0), Vec2::new(3.0, 3.0)),
                dynamic: true,
            },
        ]);
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn static_static_pair_is_filtered() {
        let mut arena = Arena::new();
        let h1 = handle(&mut arena);
        let h2 = handle(&mut arena);
        let mut bp = BroadPhase::new();
        let pairs = bp.find_pairs(vec![
            BroadPhaseProxy {
                handle: h1,
                aabb: Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0)),
                dynamic: false,
            },
            BroadPhaseProxy {
                handle: h2,
                aabb: Aabb::new(Vec2::new(1.0, 1.0), Vec2::new(3.0, 3.0)),
                dynamic: false,
            },
        ]);
        assert!(pairs.is_empty());
    }

    #[test]
    fn disjoint_pair_is_not_reported() {
        let mut arena = Arena::new();
        let h1 = handle(&mut arena);
        let h2 = handle(&mut arena);
        let mut bp = BroadPhase::new();
        let pairs = bp.find_pairs(vec![
            BroadPhaseProxy {
                handle: h1,
                aabb: Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0)),
                dynamic: true,
            },
            BroadPhaseProxy {
                handle: h2,
                aabb: Aabb::new(Vec2::new(5.0, 5.0), Vec2::new(6.0, 6.0)),
                dynamic: true,
            },
        ]);
        assert!(pairs.is_empty());
    }

    #[test]
    fn output_independent_of_insertion_order() {
        let mut arena = Arena::new();
        let h1 = handle(&mut arena);
        let h2 = handle(&mut arena);
        let h3 = handle(&mut arena);
        let proxies_a = vec![
            BroadPhaseProxy {
                handle: h1,
                aabb: Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0)),
                dynamic: true,
            },
            BroadPhaseProxy {
                handle: h2,
                aabb: Aabb::new(Vec2::new(0.5, 0.5), Vec2::new(1.5, 1.5)),
                dynamic: true,
            },
            BroadPhaseProxy {
                handle: h3,
                aabb: Aabb::new(Vec2::new(10.0, 10.0), Vec2::new(11.0, 11.0)),
                dynamic: true,
            },
        ];
        let mut proxies_b = proxies_a.clone();
        proxies_b.reverse();

        let mut bp1 = BroadPhase::new();
        let mut bp2 = BroadPhase::new();
        let mut pairs_a = bp1.find_pairs(proxies_a);
        let mut pairs_b = bp2.find_pairs(proxies_b);
        pairs_a.sort();
        pairs_b.sort();
        assert_eq!(pairs_a, pairs_b);
    }
}
