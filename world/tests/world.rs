use glam::{Quat, Vec3};
use mazewright_core::{
    ColliderShape, Command, Difficulty, Event, FloorSurface, GenerationError, GenerationState,
    GridCoord, GridSize, LevelSizes, WallPrototype,
};
use mazewright_system_randomness::SeededSource;
use mazewright_world::{self as world, query, Frame, GeneratorConfig, World};

fn new_world(config: GeneratorConfig, root: Frame, seed: u64) -> World {
    World::new(config, root, Box::new(SeededSource::new(seed)))
}

fn bind_prototype(world: &mut World, prototype: WallPrototype) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::BindWallPrototype { prototype }, &mut events);
    events
}

fn generate(world: &mut World, difficulty: Difficulty) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Generate { difficulty }, &mut events);
    events
}

fn ready_world(seed: u64) -> World {
    let mut world = new_world(GeneratorConfig::default(), Frame::IDENTITY, seed);
    let _ = bind_prototype(&mut world, WallPrototype::default());
    world
}

#[test]
fn simple_maze_matches_default_dimensions_and_anchors() {
    let mut world = ready_world(1);
    let _ = generate(&mut world, Difficulty::Simple);

    let grid = query::grid(&world).expect("maze generated");
    assert_eq!(grid.size(), GridSize::normalized(15, 15));
    assert_eq!(query::start_cell(&world), Some(GridCoord::new(1, 1)));
    assert_eq!(query::exit_cell(&world), Some(GridCoord::new(13, 13)));
    assert!(grid.is_walkable(GridCoord::new(0, 1)), "entrance must be open");
    assert!(grid.is_walkable(GridCoord::new(14, 13)), "exit must be open");
    assert_eq!(query::state(&world), GenerationState::Generated);
    assert_eq!(query::difficulty(&world), Some(Difficulty::Simple));
}

#[test]
fn hard_maze_uses_hard_dimensions() {
    let mut world = ready_world(2);
    let _ = generate(&mut world, Difficulty::Hard);

    let grid = query::grid(&world).expect("maze generated");
    assert_eq!(grid.size(), GridSize::normalized(31, 31));
    assert!(grid.is_walkable(GridCoord::new(30, 29)));
}

#[test]
fn repeated_generation_keeps_dimensions() {
    let mut world = ready_world(3);
    let _ = generate(&mut world, Difficulty::Simple);
    let first = query::grid(&world).expect("first maze").size();
    let _ = generate(&mut world, Difficulty::Simple);
    let second = query::grid(&world).expect("second maze").size();

    assert_eq!(first, second);
    assert_eq!(second.width(), 15);
    assert_eq!(second.height(), 15);
}

#[test]
fn even_configured_width_is_rounded_up() {
    let config = GeneratorConfig {
        sizes: LevelSizes {
            simple_width: 14,
            simple_height: 4,
            ..LevelSizes::default()
        },
        ..GeneratorConfig::default()
    };
    let mut world = new_world(config, Frame::IDENTITY, 4);
    let _ = bind_prototype(&mut world, WallPrototype::default());
    let _ = generate(&mut world, Difficulty::Simple);

    let size = query::grid(&world).expect("maze generated").size();
    assert_eq!(size.width(), 15);
    assert_eq!(size.height(), 5);
}

#[test]
fn events_clear_then_place_every_wall_then_confirm() {
    let mut world = ready_world(5);
    let events = generate(&mut world, Difficulty::Simple);

    assert_eq!(events.first(), Some(&Event::GeneratedGeometryCleared));
    let placed = events
        .iter()
        .filter(|event| matches!(event, Event::WallPlaced { .. }))
        .count();
    let grid = query::grid(&world).expect("maze generated");
    assert_eq!(placed, grid.wall_cells().count());
    assert_eq!(placed, query::wall_placements(&world).len());

    match events.last() {
        Some(Event::MazeGenerated {
            size,
            start,
            exit,
            walls,
        }) => {
            assert_eq!(*size, GridSize::normalized(15, 15));
            assert_eq!(*start, GridCoord::new(1, 1));
            assert_eq!(*exit, GridCoord::new(13, 13));
            assert_eq!(*walls, placed);
        }
        other => panic!("expected MazeGenerated as final event, got {other:?}"),
    }
}

#[test]
fn placements_cover_only_wall_cells_on_the_tile_lattice() {
    let mut world = new_world(GeneratorConfig::default(), Frame::IDENTITY, 6);
    let prototype = WallPrototype {
        bounds: Some(Vec3::new(2.0, 3.0, 4.0)),
        rotation: Quat::from_rotation_y(0.5),
        scale: Vec3::new(1.0, 2.0, 1.0),
        collider: None,
    };
    let _ = bind_prototype(&mut world, prototype);
    let _ = generate(&mut world, Difficulty::Simple);

    let grid = query::grid(&world).expect("maze generated").clone();
    for placement in query::wall_placements(&world) {
        let cell = placement.cell;
        assert!(!grid.is_walkable(cell), "wall placed on walkable {cell:?}");
        let expected = Vec3::new(cell.x() as f32 * 2.0, 0.0, cell.y() as f32 * 4.0);
        assert!(
            placement.local_position.abs_diff_eq(expected, 1e-4),
            "cell {cell:?} placed at {}",
            placement.local_position
        );
        assert_eq!(placement.rotation, prototype.rotation);
        assert_eq!(placement.scale, prototype.scale);
        assert_eq!(placement.collider, ColliderShape::Box);
    }
}

#[test]
fn prototype_collider_is_copied_onto_instances() {
    let mut world = new_world(GeneratorConfig::default(), Frame::IDENTITY, 7);
    let prototype = WallPrototype {
        collider: Some(ColliderShape::Mesh { convex: true }),
        ..WallPrototype::default()
    };
    let _ = bind_prototype(&mut world, prototype);
    let _ = generate(&mut world, Difficulty::Simple);

    assert!(query::wall_placements(&world)
        .iter()
        .all(|placement| placement.collider == ColliderShape::Mesh { convex: true }));
}

#[test]
fn anchors_follow_root_frame_and_tile_size() {
    let root = Frame::from_translation(Vec3::new(10.0, 0.0, 5.0));
    let mut world = new_world(GeneratorConfig::default(), root, 8);
    let _ = bind_prototype(&mut world, WallPrototype::with_bounds(Vec3::new(2.0, 1.0, 2.0)));
    let _ = generate(&mut world, Difficulty::Simple);

    let start = query::start_world_position(&world, 0.5).expect("start anchor");
    let exit = query::exit_world_position(&world, 0.5).expect("exit anchor");
    assert!(start.abs_diff_eq(Vec3::new(12.0, 0.5, 7.0), 1e-4), "start at {start}");
    assert!(exit.abs_diff_eq(Vec3::new(36.0, 0.5, 31.0), 1e-4), "exit at {exit}");

    let first_wall = query::wall_placements(&world)
        .first()
        .expect("walls placed");
    assert_eq!(first_wall.cell, GridCoord::new(0, 0));
    assert!(first_wall
        .world_position
        .abs_diff_eq(Vec3::new(10.0, 0.0, 5.0), 1e-4));
}

#[test]
fn rebinding_prototype_keeps_anchors_on_generated_lattice() {
    let mut world = ready_world(12);
    let _ = generate(&mut world, Difficulty::Simple);
    let start_before = query::start_world_position(&world, 0.0).expect("start anchor");
    let exit_before = query::exit_world_position(&world, 0.0).expect("exit anchor");

    let events = bind_prototype(&mut world, WallPrototype::with_bounds(Vec3::splat(4.0)));
    assert_eq!(
        events,
        vec![Event::WallPrototypeBound {
            tile_size_x: 4.0,
            tile_size_z: 4.0,
        }]
    );

    let start_after = query::start_world_position(&world, 0.0).expect("start anchor");
    let exit_after = query::exit_world_position(&world, 0.0).expect("exit anchor");
    assert_eq!(start_after, start_before, "start moved without regenerating");
    assert_eq!(exit_after, exit_before, "exit moved without regenerating");
    assert!(start_after.abs_diff_eq(Vec3::new(1.0, 0.0, 1.0), 1e-4));
    assert!(exit_after.abs_diff_eq(Vec3::new(13.0, 0.0, 13.0), 1e-4));

    let _ = generate(&mut world, Difficulty::Simple);
    let regenerated = query::start_world_position(&world, 0.0).expect("start anchor");
    assert!(
        regenerated.abs_diff_eq(Vec3::new(4.0, 0.0, 4.0), 1e-4),
        "regenerated start at {regenerated}"
    );
}

#[test]
fn raised_floor_mode_lifts_walls_and_anchors() {
    let config = GeneratorConfig {
        place_at_ground: false,
        ..GeneratorConfig::default()
    };
    let mut world = new_world(config, Frame::IDENTITY, 9);
    let _ = bind_prototype(&mut world, WallPrototype::default());
    let _ = generate(&mut world, Difficulty::Simple);

    assert!((query::floor_y(&world) - 13.75).abs() < f32::EPSILON);
    assert!(query::wall_placements(&world)
        .iter()
        .all(|placement| (placement.local_position.y - 13.75).abs() < 1e-4));
    let start = query::start_world_position(&world, 0.6).expect("start anchor");
    assert!((start.y - 14.35).abs() < 1e-4);
}

#[test]
fn empty_world_has_no_anchors() {
    let world = ready_world(10);
    assert_eq!(query::state(&world), GenerationState::Empty);
    assert_eq!(query::start_world_position(&world, 0.5), None);
    assert_eq!(query::exit_world_position(&world, 0.5), None);
    assert!(query::grid(&world).is_none());
    assert!(query::wall_placements(&world).is_empty());
}

#[test]
fn generation_without_prototype_is_rejected() {
    let mut world = new_world(GeneratorConfig::default(), Frame::IDENTITY, 11);
    let events = generate(&mut world, Difficulty::Simple);

    assert_eq!(
        events,
        vec![Event::GenerationRejected {
            reason: GenerationError::MissingWallPrototype,
        }],
        "rejection must not emit a clear signal",
    );
    assert_eq!(query::state(&world), GenerationState::Empty);
}

#[test]
fn rejected_generation_preserves_previous_maze() {
    let mut world = ready_world(12);
    let _ = generate(&mut world, Difficulty::Simple);
    let grid = query::grid(&world).cloned().expect("maze generated");
    let placements = query::wall_placements(&world).to_vec();
    let start = query::start_world_position(&world, 0.5);

    let mut events = Vec::new();
    world::apply(&mut world, Command::ReleaseWallPrototype, &mut events);
    assert_eq!(events, vec![Event::WallPrototypeReleased]);

    let events = generate(&mut world, Difficulty::Hard);
    assert!(matches!(
        events.as_slice(),
        [Event::GenerationRejected { .. }]
    ));
    assert_eq!(query::grid(&world), Some(&grid));
    assert_eq!(query::wall_placements(&world), placements.as_slice());
    assert_eq!(query::start_world_position(&world, 0.5), start);
    assert_eq!(query::difficulty(&world), Some(Difficulty::Simple));
}

#[test]
fn binding_prototype_reports_derived_tile_size() {
    let mut world = new_world(GeneratorConfig::default(), Frame::IDENTITY, 13);
    let events = bind_prototype(&mut world, WallPrototype::with_bounds(Vec3::new(2.5, 4.0, 0.0)));

    assert_eq!(
        events,
        vec![Event::WallPrototypeBound {
            tile_size_x: 2.5,
            tile_size_z: 0.01,
        }]
    );
    assert!(query::wall_prototype(&world).is_some());
}

#[test]
fn floor_without_collider_is_repaired_on_binding() {
    let mut world = ready_world(14);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::BindFloor {
            floor: FloorSurface::default(),
        },
        &mut events,
    );

    assert_eq!(
        events,
        vec![Event::FloorColliderAttached {
            collider: ColliderShape::Mesh { convex: false },
        }]
    );
    assert_eq!(
        query::floor(&world).and_then(|floor| floor.collider),
        Some(ColliderShape::Mesh { convex: false })
    );
}

#[test]
fn floor_with_collider_is_left_alone() {
    let mut world = ready_world(15);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::BindFloor {
            floor: FloorSurface {
                collider: Some(ColliderShape::Box),
            },
        },
        &mut events,
    );

    assert!(events.is_empty());
    assert_eq!(
        query::floor(&world).and_then(|floor| floor.collider),
        Some(ColliderShape::Box)
    );
}

#[test]
fn seeded_replay_emits_identical_event_streams() {
    let replay = |seed| {
        let mut world = ready_world(seed);
        let mut log = generate(&mut world, Difficulty::Simple);
        log.extend(generate(&mut world, Difficulty::Hard));
        log
    };

    assert_eq!(replay(77), replay(77), "replay diverged between runs");
}
