use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use snake::{Cell, Collision, Config, Direction, GameState, GameStatus, Snake, SnakeSimulation, TickOutcome};

fn cells(sim: &SnakeSimulation) -> Vec<(i32, i32)> {
    sim.snake().cells().map(|c| (c.x, c.y)).collect()
}

fn resume(config: Config, body: &[(i32, i32)], direction: Direction, food: (i32, i32)) -> SnakeSimulation {
    let state = GameState {
        snake: Snake::from_cells(body.iter().copied().map(Cell::from)),
        direction,
        food: food.into(),
        game_over: false,
        pending_growth: false,
    };
    SnakeSimulation::from_state(config, state, StdRng::seed_from_u64(99)).unwrap()
}

#[test]
fn first_step_from_spawn() {
    let mut sim = SnakeSimulation::seeded(Config::default(), 3).unwrap();
    assert_eq!(cells(&sim), vec![(300, 300), (285, 300), (270, 300)]);
    assert_eq!(sim.direction(), Direction::Right);

    // The freshly placed food may sit right in front of the snake
    let ahead = Cell::new(315, 300);
    if sim.food() == ahead {
        let state = GameState { food: Cell::new(0, 0), ..sim.state().clone() };
        sim = SnakeSimulation::from_state(Config::default(), state, StdRng::seed_from_u64(3)).unwrap();
    }

    sim.tick();
    assert_eq!(cells(&sim), vec![(315, 300), (300, 300), (285, 300)]);
    assert!(!sim.is_game_over());
}

#[test]
fn left_wall_ends_the_game() {
    let mut sim = resume(Config::default(), &[(0, 300), (15, 300), (30, 300)], Direction::Left, (450, 450));

    let outcome = sim.tick();
    assert_eq!(sim.head(), Cell::new(-15, 300));
    assert!(sim.is_game_over());
    assert_eq!(
        outcome,
        TickOutcome::Crashed {
            collision: Collision::Wall,
            new_head: Cell::new(-15, 300),
            old_tail: Some(Cell::new(30, 300)),
        }
    );
    // Everything behind the head is where a normal move would have put it
    assert_eq!(cells(&sim)[1..], [(0, 300), (15, 300)]);
}

#[test]
fn wall_on_every_side() {
    let config = Config::for_grid(12, 8, 10).unwrap();
    let cases = [
        (vec![(50, 0), (50, 10), (50, 20)], Direction::Up),
        (vec![(50, 70), (50, 60), (50, 50)], Direction::Down),
        (vec![(0, 40), (10, 40), (20, 40)], Direction::Left),
        (vec![(110, 40), (100, 40), (90, 40)], Direction::Right),
    ];

    for (body, direction) in cases {
        let mut sim = resume(config, &body, direction, (0, 0));
        assert!(matches!(sim.tick(), TickOutcome::Crashed { collision: Collision::Wall, .. }));
        assert_eq!(sim.status(), GameStatus::GameOver);
    }
}

#[test]
fn food_growth_is_deferred_by_one_tick() {
    let mut sim = resume(Config::default(), &[(300, 300), (285, 300), (270, 300)], Direction::Right, (315, 300));
    let before = sim.snake().len();

    sim.tick();
    assert!(sim.has_pending_growth());
    assert!(!sim.snake().contains(&sim.food()));
    assert_eq!(sim.snake().len(), before);

    sim.tick();
    assert_eq!(sim.snake().len(), before + 1);
    assert!(!sim.has_pending_growth());
}

#[test]
fn turning_back_is_ignored() {
    let mut sim = resume(Config::default(), &[(300, 300), (285, 300), (270, 300)], Direction::Right, (0, 0));
    let pairs = [
        (Direction::Up, Direction::Down),
        (Direction::Left, Direction::Right),
        (Direction::Down, Direction::Up),
        (Direction::Right, Direction::Left),
    ];

    for (turn, back) in pairs {
        assert!(sim.set_direction(turn));
        sim.tick();
        assert!(!sim.set_direction(back));
        assert_eq!(sim.direction(), turn);
    }
}

#[test]
fn running_into_the_body_ends_the_game() {
    let config = Config::for_grid(10, 10, 1).unwrap();
    let mut sim = resume(config, &[(5, 5), (4, 5), (3, 5), (2, 5), (1, 5)], Direction::Right, (9, 9));

    sim.set_direction(Direction::Down);
    sim.tick();
    sim.set_direction(Direction::Left);
    sim.tick();
    sim.set_direction(Direction::Up);
    let outcome = sim.tick();

    assert!(matches!(outcome, TickOutcome::Crashed { collision: Collision::SelfCollision, .. }));
    assert_eq!(sim.head(), Cell::new(4, 5));
}

#[test]
fn reset_restores_spawn() {
    let mut sim = resume(Config::default(), &[(0, 300), (15, 300), (30, 300)], Direction::Left, (450, 450));
    sim.tick();
    assert!(sim.is_game_over());

    sim.reset();
    assert!(!sim.is_game_over());
    assert_eq!(sim.direction(), Direction::Right);
    assert_eq!(sim.snake().len(), 3);
    assert_eq!(sim.score(), 0);
    assert!(!sim.snake().contains(&sim.food()));
}

#[test]
fn same_seed_same_food() {
    let mut a = SnakeSimulation::seeded(Config::default(), 42).unwrap();
    let mut b = SnakeSimulation::seeded(Config::default(), 42).unwrap();

    for _ in 0..20 {
        assert_eq!(a.food(), b.food());
        a.generate_food();
        b.generate_food();
    }
}

// Wander around a small board and check the invariants after every step
#[test]
fn random_walk_keeps_invariants() {
    let config = Config::for_grid(8, 8, 1).unwrap();
    let mut driver = StdRng::seed_from_u64(2024);
    let dirs = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    for seed in 0..20 {
        let mut sim = SnakeSimulation::seeded(config, seed).unwrap();

        while !sim.is_game_over() {
            sim.set_direction(dirs[driver.gen_range(0..dirs.len())]);
            let len = sim.snake().len();
            let pending = sim.has_pending_growth();

            match sim.tick() {
                TickOutcome::Moved { ate_food, .. } => {
                    let expected = if pending { len + 1 } else { len };
                    assert_eq!(sim.snake().len(), expected);
                    if sim.snake().len() < 64 {
                        assert!(!sim.snake().contains(&sim.food()));
                    }
                    assert_eq!(sim.has_pending_growth(), ate_food);

                    let mut seen: Vec<Cell> = sim.snake().cells().copied().collect();
                    seen.sort_by_key(|c| (c.x, c.y));
                    seen.dedup();
                    assert_eq!(seen.len(), sim.snake().len());
                }
                TickOutcome::Crashed { .. } => assert!(sim.is_game_over()),
                TickOutcome::Halted => unreachable!("ticked after game over"),
            }
        }

        assert_eq!(sim.tick(), TickOutcome::Halted);
    }
}
