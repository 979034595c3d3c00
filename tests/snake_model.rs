// tests/snake_model.rs
use tensegrity_creator::{
    BlueprintWorld, CreatorError, LinearString, Model, Observer, Prismatic, PrismaticConfig, Rod,
    RodConfig, SnakeConfig, SnakeModel, StringConfig, MUSCLE_KEYS,
};

fn snake_config(segments: usize) -> SnakeConfig {
    let edge = 30.0_f32;
    let height = (3.0_f32.sqrt() / 2.0 * edge * 1e5).round() / 1e5;
    let rod = RodConfig::new(0.5, 4.2 / 300.0).unwrap();
    let muscle = StringConfig::new(1000.0, 10.0).unwrap();
    let prismatic = PrismaticConfig::new(2, rod, rod, 15.0).unwrap();
    SnakeConfig::new(segments, edge, height, rod, muscle, prismatic).unwrap()
}

#[test]
fn two_segment_snake_maps_eight_muscles() {
    let mut snake = SnakeModel::new();
    let mut world = BlueprintWorld::new();
    snake.setup(&snake_config(2), &mut world).unwrap();

    // 6 rods per tetra, 8 inter-segment muscles between the two.
    assert_eq!(snake.model().find::<Rod>("rod").len(), 12);
    assert_eq!(snake.model().find::<LinearString>("muscle").len(), 8);
    assert_eq!(world.body_count(), 12);
    assert_eq!(world.constraint_count(), 8);

    assert_eq!(snake.model().mapped_keys().len(), 8);
    for key in MUSCLE_KEYS {
        let components = snake.get_components(key).unwrap();
        assert_eq!(components.len(), 1, "key '{key}'");
        assert_eq!(snake.muscles(key).unwrap().len(), 1, "key '{key}'");
    }
    assert!(matches!(
        snake.get_components("nonexistent"),
        Err(CreatorError::UnknownKey(_))
    ));

    snake.teardown(&mut world);
    assert_eq!(world.body_count(), 0);
    assert_eq!(world.constraint_count(), 0);
}

#[test]
fn three_segment_snake_doubles_the_muscles() {
    let mut snake = SnakeModel::new();
    let mut world = BlueprintWorld::new();
    snake.setup(&snake_config(3), &mut world).unwrap();

    assert_eq!(snake.model().find::<Rod>("rod").len(), 18);
    assert_eq!(snake.model().find::<LinearString>("muscle").len(), 16);
    for key in MUSCLE_KEYS {
        assert_eq!(snake.get_components(key).unwrap().len(), 2, "key '{key}'");
    }
}

#[test]
fn prismatic_spine_realizes_telescoping_members() {
    let mut snake = SnakeModel::new();
    let mut world = BlueprintWorld::new();
    let config = snake_config(2).with_prismatic_spine();
    snake.setup(&config, &mut world).unwrap();

    let actuators = snake.model().find::<Prismatic>("prismatic");
    assert_eq!(actuators.len(), 4);
    for actuator in &actuators {
        assert!(actuator.mass() > 0.0);
        assert!(actuator.rest_length() >= actuator.config().min_total_length);
    }
    // 4 plain rods per tetra plus 2 sub-rods per actuator.
    assert_eq!(world.body_count(), 8 + 8);
    // 8 muscles plus one slider per actuator.
    assert_eq!(world.constraint_count(), 8 + 4);
}

struct TopRightController {
    target: f32,
}

impl Observer for TopRightController {
    fn on_step(&mut self, model: &mut Model, _dt: f32) {
        for muscle in model.find_mut::<LinearString>("top right muscle") {
            muscle.set_target_rest_length(self.target);
        }
    }
}

#[test]
fn observers_run_before_components_are_stepped() {
    let mut snake = SnakeModel::new();
    let mut world = BlueprintWorld::new();
    snake.setup(&snake_config(2), &mut world).unwrap();
    snake.add_observer(Box::new(TopRightController { target: 5.0 }));

    let initial = snake.muscles("top right").unwrap()[0].rest_length();
    assert!(initial > 5.0);

    snake.step(0.01).unwrap();

    // The motor consumed the target set by the observer within the same
    // tick, so notification must have preceded the component steps.
    let muscle = snake.muscles("top right").unwrap()[0];
    assert_eq!(muscle.rest_length(), 5.0);
    // Setup sample plus one step sample, logged before the motor update.
    assert_eq!(muscle.history().len(), 2);
    assert_eq!(muscle.history()[1].rest_length, initial);
}

#[test]
fn bad_dt_is_rejected_without_mutation() {
    let mut snake = SnakeModel::new();
    let mut world = BlueprintWorld::new();
    snake.setup(&snake_config(2), &mut world).unwrap();

    let history_before: Vec<usize> = MUSCLE_KEYS
        .iter()
        .map(|key| snake.muscles(key).unwrap()[0].history().len())
        .collect();

    assert!(matches!(
        snake.step(0.0),
        Err(CreatorError::InvalidTimeStep(_))
    ));
    assert!(matches!(
        snake.step(-1.0),
        Err(CreatorError::InvalidTimeStep(_))
    ));

    for (key, before) in MUSCLE_KEYS.iter().zip(history_before) {
        assert_eq!(snake.muscles(key).unwrap()[0].history().len(), before);
    }
}
