//! Contact manifolds (transient, one per step) and persistent contacts
//! (carried across steps to warm-start the solver).

use crate::data::arena::Index;
use crate::math::{Real, Vec2};
use rustc_hash::FxHashMap;
use std::cmp::Ordering;

/// Maximum number of points the narrowphase ever produces for one pair.
pub const MAX_MANIFOLD_POINTS: usize = 2;

/// One world-space contact point, tagged with an `id` stable across frames
/// for the same physical feature (e.g. "incident vertex 2 against
/// reference edge 0"), so warm-starting can match old and new points
/// without relying on point coordinates, which shift every step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ContactPoint {
    pub point: Vec2,
    pub id: u32,
}

/// The result of a narrowphase test between two shapes. `normal` always
/// points from body A into body B. An absent manifold means "no
/// collision"; callers never see an explicitly-empty `Manifold` value.
#[derive(Clone, Debug, PartialEq)]
pub struct Manifold {
    pub normal: Vec2,
    pub depth: Real,
    pub points: arrayvec::ArrayVec<ContactPoint, MAX_MANIFOLD_POINTS>,
}

/// An unordered, order-independent key for a body pair, used both as the
/// broad phase's pair identity and the persistent-contact map key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PairKey(Index, Index);

impl PairKey {
    pub fn new(a: Index, b: Index) -> Self {
        match a.cmp(&b) {
            Ordering::Less | Ordering::Equal => PairKey(a, b),
            Ordering::Greater => PairKey(b, a),
        }
    }

    pub fn bodies(self) -> (Index, Index) {
        (self.0, self.1)
    }
}

/// One persisted accumulated-impulse slot per contact point, matched
/// across frames by the point's feature `id`.
#[derive(Copy, Clone, Debug, Default)]
pub struct PersistentPoint {
    pub id: u32,
    /// World-space location, refreshed from the narrowphase's manifold
    /// every step. Only the accumulated impulses below survive a refresh
    /// (matched by `id`); the location itself is never warm-started.
    pub point: Vec2,
    pub normal_impulse: Real,
    pub tangent_impulse: Real,
}

/// A persistent record for a colliding body pair: the current manifold
/// plus the accumulated impulses carried over from the previous step.
pub struct PersistentContact {
    pub body_a: Index,
    pub body_b: Index,
    pub normal: Vec2,
    pub depth: Real,
    pub points: arrayvec::ArrayVec<PersistentPoint, MAX_MANIFOLD_POINTS>,
    pub restitution: Real,
    pub friction: Real,
}

impl PersistentContact {
    fn new(body_a: Index, body_b: Index, manifold: &Manifold, restitution: Real, friction: Real) -> Self {
        let points = manifold
            .points
            .iter()
            .map(|p| PersistentPoint {
                id: p.id,
                point: p.point,
                normal_impulse: 0.0,
                tangent_impulse: 0.0,
            })
            .collect();
        Self {
            body_a,
            body_b,
            normal: manifold.normal,
            depth: manifold.depth,
            points,
            restitution,
            friction,
        }
    }

    /// Refreshes this contact with a new manifold, carrying over
    /// accumulated impulses for points whose feature `id` survives.
    fn update(&mut self, manifold: &Manifold) {
        let old_points = std::mem::take(&mut self.points);
        self.normal = manifold.normal;
        self.depth = manifold.depth;
        self.points = manifold
            .points
            .iter()
            .map(|p| {
                let warm = old_points.iter().find(|old| old.id == p.id);
                PersistentPoint {
                    id: p.id,
                    point: p.point,
                    normal_impulse: warm.map_or(0.0, |w| w.normal_impulse),
                    tangent_impulse: warm.map_or(0.0, |w| w.tangent_impulse),
                }
            })
            .collect();
    }
}

/// All persistent contacts in the world, keyed by unordered body pair.
#[derive(Default)]
pub struct ContactPairSet {
    contacts: FxHashMap<PairKey, PersistentContact>,
}

impl ContactPairSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconciles the persistent map against this step's narrowphase
    /// output: updates surviving pairs (preserving impulses), inserts new
    /// ones, and drops pairs no longer reported.
    pub fn sync(
        &mut self,
        manifolds: &[(Index, Index, Manifold)],
        combine: impl Fn(Index, Index) -> (Real, Real),
    ) {
        let mut seen = rustc_hash::FxHashSet::default();
        for (a, b, manifold) in manifolds {
            let key = PairKey::new(*a, *b);
            seen.insert(key);
            match self.contacts.get_mut(&key) {
                Some(existing) => existing.update(manifold),
                None => {
                    let (restitution, friction) = combine(*a, *b);
                    self.contacts
                        .insert(key, PersistentContact::new(*a, *b, manifold, restitution, friction));
                }
            }
        }
        self.contacts.retain(|key, _| seen.contains(key));
    }

    pub fn get_mut(&mut self, key: PairKey) -> Option<&mut PersistentContact> {
        self.contacts.get_mut(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PersistentContact> {
        self.contacts.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut PersistentContact> {
        self.contacts.values_mut()
    }

    pub fn remove_touching(&mut self, handle: Index) {
        self.contacts
            .retain(|key, _| key.0 != handle && key.1 != handle);
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}
