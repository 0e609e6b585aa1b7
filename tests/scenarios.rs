//! End-to-end scenarios from spec.md §8.

use approx::assert_relative_eq;
use impulse2d::dynamics::joint::{DistanceJoint, JointParams};
use impulse2d::dynamics::{IntegrationParameters, RigidBodyBuilder};
use impulse2d::geometry::Shape;
use impulse2d::math::{Real, Vec2};
use impulse2d::world::World;

fn new_world(gravity: Vec2) -> World {
    World::new(gravity, IntegrationParameters::default()).unwrap()
}

#[test]
fn free_fall() {
    let mut world = new_world(Vec2::new(0.0, -9.81));
    let circle = Shape::circle(1.0).unwrap();
    let handle = world
        .add_body(RigidBodyBuilder::new(circle).mass(1.0).position(Vec2::new(0.0, 10.0)).build().unwrap());

    for _ in 0..60 {
        world.step(1.0 / 60.0).unwrap();
    }

    let body = world.body(handle).unwrap();
    assert_relative_eq!(body.translation().y, 10.0 - 0.5 * 9.81, epsilon = 0.06);
    assert_relative_eq!(body.linear_velocity().y, -9.81, epsilon = 0.1);
}

#[test]
fn resting_contact() {
    let mut world = new_world(Vec2::ZERO);
    let ground_shape = Shape::box_shape(10.0, 1.0).unwrap();
    world.add_body(RigidBodyBuilder::new(ground_shape).fixed().position(Vec2::new(0.0, -1.0)).build().unwrap());

    let circle_shape = Shape::circle(1.0).unwrap();
    let handle = world.add_body(
        RigidBodyBuilder::new(circle_shape)
            .mass(1.0)
            .position(Vec2::new(0.0, 1.0))
            .linear_velocity(Vec2::new(0.0, -1.0))
            .restitution(0.0)
            .build()
            .unwrap(),
    );

    for _ in 0..10 {
        world.step(1.0 / 60.0).unwrap();
    }

    let body = world.body(handle).unwrap();
    assert!(body.linear_velocity().y.abs() < 0.1, "y velocity = {}", body.linear_velocity().y);
    assert!(
        (0.99..=1.02).contains(&body.translation().y),
        "y position = {}",
        body.translation().y
    );
}

#[test]
fn elastic_bounce() {
    let mut world = new_world(Vec2::ZERO);
    let ground_shape = Shape::box_shape(10.0, 1.0).unwrap();
    world.add_body(RigidBodyBuilder::new(ground_shape).fixed().position(Vec2::new(0.0, -1.0)).build().unwrap());

    let circle_shape = Shape::circle(1.0).unwrap();
    let handle = world.add_body(
        RigidBodyBuilder::new(circle_shape)
            .mass(1.0)
            .position(Vec2::new(0.0, 2.0))
            .linear_velocity(Vec2::new(0.0, -5.0))
            .restitution(0.5)
            .build()
            .unwrap(),
    );

    let mut max_upward_speed: Real = 0.0;
    for _ in 0..120 {
        world.step(1.0 / 60.0).unwrap();
        let v = world.body(handle).unwrap().linear_velocity().y;
        if v > max_upward_speed {
            max_upward_speed = v;
        }
    }

    assert!(
        (2.25..=2.75).contains(&max_upward_speed),
        "peak rebound speed = {max_upward_speed}"
    );
}

#[test]
fn sat_squares_overlap_and_separation() {
    use impulse2d::math::Transform;
    let a = Shape::box_shape(1.0, 1.0).unwrap();
    let b = Shape::box_shape(1.0, 1.0).unwrap();

    let overlapping = impulse2d::geometry::sat_collide(
        &a,
        Transform::new(Vec2::new(1.0, 1.0), 0.0),
        &b,
        Transform::new(Vec2::new(2.0, 2.0), 0.0),
    );
    let manifold = overlapping.expect("overlapping squares should collide");
    assert_relative_eq!(manifold.depth, 1.0, epsilon = 1.0e-2);

    let separated = impulse2d::geometry::sat_collide(
        &Shape::box_shape(0.5, 0.5).unwrap(),
        Transform::new(Vec2::new(0.5, 0.5), 0.0),
        &Shape::box_shape(0.5, 0.5).unwrap(),
        Transform::new(Vec2::new(2.5, 2.5), 0.0),
    );
    assert!(separated.is_none());
}

#[test]
fn distance_joint_holds_length() {
    let mut world = new_world(Vec2::ZERO);
    let circle_shape = Shape::circle(0.5).unwrap();
    let a = world.add_body(RigidBodyBuilder::new(circle_shape.clone()).mass(1.0).position(Vec2::new(0.0, 0.0)).build().unwrap());
    let b = world.add_body(
        RigidBodyBuilder::new(circle_shape)
            .mass(1.0)
            .position(Vec2::new(2.0, 0.0))
            .linear_velocity(Vec2::new(0.0, 5.0))
            .build()
            .unwrap(),
    );

    let joint = DistanceJoint::new(world.bodies_set(), a, b, Vec2::ZERO, Vec2::ZERO, 2.0).unwrap();
    world.add_joint(JointParams::Distance(joint)).unwrap();

    for _ in 0..60 {
        world.step(1.0 / 60.0).unwrap();
    }

    let pa = world.body(a).unwrap().translation();
    let pb = world.body(b).unwrap().translation();
    let dist = (pb - pa).length();
    assert!((dist - 2.0).abs() < 0.1, "distance = {dist}");
}

#[test]
fn warm_start_continuity() {
    let mut world = new_world(Vec2::new(0.0, -9.81));
    let ground_shape = Shape::box_shape(10.0, 1.0).unwrap();
    world.add_body(RigidBodyBuilder::new(ground_shape).fixed().position(Vec2::new(0.0, -1.0)).build().unwrap());

    let circle_shape = Shape::circle(1.0).unwrap();
    let mass = 1.0;
    world.add_body(
        RigidBodyBuilder::new(circle_shape)
            .mass(mass)
            .position(Vec2::new(0.0, 1.0))
            .restitution(0.0)
            .build()
            .unwrap(),
    );

    for _ in 0..100 {
        world.step(1.0 / 60.0).unwrap();
    }

    let expected_jn = mass * 9.81 * (1.0 / 60.0);
    let contact = world.contacts().next().expect("should have a steady-state contact");
    let total_jn: Real = contact.points.iter().map(|p| p.normal_impulse).sum();
    assert!(
        (total_jn - expected_jn).abs() / expected_jn < 0.25,
        "steady state J_n = {total_jn}, expected ~{expected_jn}"
    );
}

#[test]
fn static_bodies_never_move() {
    let mut world = new_world(Vec2::new(0.0, -9.81));
    let ground_shape = Shape::box_shape(10.0, 1.0).unwrap();
    let ground = world.add_body(RigidBodyBuilder::new(ground_shape).fixed().position(Vec2::new(0.0, -1.0)).build().unwrap());
    let circle_shape = Shape::circle(1.0).unwrap();
    world.add_body(RigidBodyBuilder::new(circle_shape).mass(1.0).position(Vec2::new(0.0, 0.5)).build().unwrap());

    for _ in 0..30 {
        world.step(1.0 / 60.0).unwrap();
    }

    let ground_body = world.body(ground).unwrap();
    assert_eq!(ground_body.linear_velocity(), Vec2::ZERO);
    assert_eq!(ground_body.angular_velocity(), 0.0);
}

#[test]
fn touching_edge_squares_produce_manifold() {
    let mut world = new_world(Vec2::ZERO);
    let a_shape = Shape::box_shape(0.5, 0.5).unwrap();
    world.add_body(RigidBodyBuilder::new(a_shape).fixed().position(Vec2::new(0.0, 0.0)).build().unwrap());
    let b_shape = Shape::box_shape(0.5, 0.5).unwrap();
    world.add_body(RigidBodyBuilder::new(b_shape).mass(1.0).position(Vec2::new(1.0, 0.0)).build().unwrap());

    world.step(1.0 / 60.0).unwrap();
    assert_eq!(world.contacts().count(), 1);
}
