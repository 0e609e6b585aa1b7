//! Island builder: partitions the body/contact/joint graph into connected
//! components so each can be solved independently (§4.6).
//!
//! A static (fixed) or sleeping body never propagates traversal — it is
//! recorded in every island that touches it, as a boundary, but BFS never
//! continues through it. This mirrors how rapier prevents one static
//! "floor" body from merging every island that rests on it into one giant
//! island.

use crate::data::arena::Index;
use crate::dynamics::joint::JointSet;
use crate::dynamics::rigid_body_set::RigidBodySet;
use crate::geometry::contact::ContactPairSet;
use rustc_hash::{FxHashMap, FxHashSet};

/// One edge touching a body: either a persistent contact (keyed by the
/// pair's unordered key) or a joint handle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IslandEdge {
    Contact(Index, Index),
    Joint(Index),
}

/// A connected component of the interaction graph, solved independently.
#[derive(Default, Debug)]
pub struct Island {
    pub bodies: Vec<Index>,
    pub contacts: Vec<(Index, Index)>,
    pub joints: Vec<Index>,
}

/// Before building islands, wake any sleeping dynamic body that is
/// touching, via a contact or joint, a dynamic body that is awake. A
/// sleeping body connected only to other sleeping/static bodies stays
/// asleep.
pub fn wake_connected_bodies(bodies: &mut RigidBodySet, joints: &JointSet, contacts: &ContactPairSet) {
    loop {
        let mut to_wake = Vec::new();
        for contact in contacts.iter() {
            wake_pair_if_needed(bodies, contact.body_a, contact.body_b, &mut to_wake);
        }
        for (_, joint) in joints.iter() {
            let (a, b) = joint.bodies();
            wake_pair_if_needed(bodies, a, b, &mut to_wake);
        }
        if to_wake.is_empty() {
            break;
        }
        for handle in to_wake {
            if let Ok(body) = bodies.get_mut(handle) {
                body.wake_up();
            }
        }
    }
}

fn wake_pair_if_needed(bodies: &RigidBodySet, a: Index, b: Index, to_wake: &mut Vec<Index>) {
    let (Ok(body_a), Ok(body_b)) = (bodies.get(a), bodies.get(b)) else {
        return;
    };
    if body_a.is_fixed() || body_b.is_fixed() {
        return;
    }
    if body_a.is_sleeping() != body_b.is_sleeping() {
        if body_a.is_sleeping() {
            to_wake.push(a);
        }
        if body_b.is_sleeping() {
            to_wake.push(b);
        }
    }
}

/// A dynamic, awake body is a traversal node; a fixed or sleeping body is
/// only ever a boundary.
fn is_propagating(bodies: &RigidBodySet, handle: Index) -> bool {
    bodies
        .get(handle)
        .map(|b| !b.is_fixed() && !b.is_sleeping())
        .unwrap_or(false)
}

/// Builds the islands for one step. Every propagating (dynamic, awake)
/// body appears in exactly one island; fixed/sleeping bodies appear in
/// every island that touches them.
pub fn build_islands(bodies: &RigidBodySet, joints: &JointSet, contacts: &ContactPairSet) -> Vec<Island> {
    let mut adjacency: FxHashMap<Index, Vec<(IslandEdge, Index)>> = FxHashMap::default();
    for contact in contacts.iter() {
        let edge = IslandEdge::Contact(contact.body_a, contact.body_b);
        adjacency
            .entry(contact.body_a)
            .or_default()
            .push((edge, contact.body_b));
        adjacency
            .entry(contact.body_b)
            .or_default()
            .push((edge, contact.body_a));
    }
    for (handle, joint) in joints.iter() {
        let (a, b) = joint.bodies();
        adjacency.entry(a).or_default().push((IslandEdge::Joint(handle), b));
        adjacency.entry(b).or_default().push((IslandEdge::Joint(handle), a));
    }

    let mut visited: FxHashSet<Index> = FxHashSet::default();
    let mut islands = Vec::new();

    for (handle, body) in bodies.iter() {
        if body.is_fixed() || body.is_sleeping() || visited.contains(&handle) {
            continue;
        }

        let mut island = Island::default();
        let mut island_edges: FxHashSet<IslandEdge> = FxHashSet::default();
        let mut island_bodies: FxHashSet<Index> = FxHashSet::default();
        let mut queue = std::collections::VecDeque::new();
        queue.push_back(handle);
        visited.insert(handle);
        island_bodies.insert(handle);

        while let Some(current) = queue.pop_front() {
            let Some(neighbors) = adjacency.get(&current) else {
                continue;
            };
            for (edge, other) in neighbors {
                island_edges.insert(*edge);
                if island_bodies.insert(*other) {
                    // first time this island has seen `other`
                }
                if is_propagating(bodies, *other) && visited.insert(*other) {
                    queue.push_back(*other);
                }
            }
        }

        island.bodies = island_bodies.into_iter().collect();
        for edge in island_edges {
            match edge {
                IslandEdge::Contact(a, b) => island.contacts.push((a, b)),
                IslandEdge::Joint(h) => island.joints.push(h),
            }
        }
        islands.push(island);
    }

    islands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::rigid_body::RigidBodyBuilder;
    use crate::geometry::Shape;

    #[test]
    fn two_disjoint_bodies_form_two_islands() {
        let mut bodies = RigidBodySet::new();
        let shape = Shape::circle(1.0).unwrap();
        let a = bodies.insert(RigidBodyBuilder::new(shape.clone()).build().unwrap());
        let b = bodies.insert(RigidBodyBuilder::new(shape).build().unwrap());
        let joints = JointSet::new();
        let contacts = ContactPairSet::new();

        let islands = build_islands(&bodies, &joints, &contacts);
        assert_eq!(islands.len(), 2);
        let mut all: Vec<Index> = islands.iter().flat_map(|i| i.bodies.clone()).collect();
        all.sort();
        let mut expect = vec![a, b];
        expect.sort();
        assert_eq!(all, expect);
    }

    #[test]
    fn static_body_does_not_merge_two_islands() {
        let mut bodies = RigidBodySet::new();
        let ground_shape = Shape::box_shape(10.0, 1.0).unwrap();
        let ground = bodies.insert(RigidBodyBuilder::new(ground_shape).fixed().build().unwrap());

        let circle_shape = Shape::circle(1.0).unwrap();
        let a = bodies.insert(RigidBodyBuilder::new(circle_shape.clone()).build().unwrap());
        let b = bodies.insert(RigidBodyBuilder::new(circle_shape).build().unwrap());

        let joints = JointSet::new();
        let mut contacts = ContactPairSet::new();
        // Synthesize both resting on the same static ground: two separate
        // contacts, both touching `ground`, none touching each other.
        use crate::geometry::contact::Manifold;
        use crate::math::Vec2;
        let manifold = Manifold {
            normal: Vec2::new(0.0, 1.0),
            depth: 0.01,
            points: arrayvec::ArrayVec::new(),
        };
        contacts.sync(&[(ground, a, manifold.clone()), (ground, b, manifold)], |_, _| (0.0, 0.5));

        let islands = build_islands(&bodies, &joints, &contacts);
        assert_eq!(islands.len(), 2);
    }
}
