use std::str::FromStr;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Side length of the square play field.
pub const GRID_SIZE: i32 = 20;
/// Milliseconds between ticks when a game starts.
pub const SPEED_START_MS: u32 = 150;
/// The tick interval never drops below this.
pub const SPEED_FLOOR_MS: u32 = 50;
/// How much each piece of food shortens the tick interval.
pub const SPEED_STEP_MS: u32 = 5;

const SNAKE_START: Point = Point { x: 8, y: 8 };
const FOOD_START: Point = Point { x: 12, y: 12 };

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    fn delta(self) -> Point {
        match self {
            Direction::Up => Point { x: 0, y: -1 },
            Direction::Down => Point { x: 0, y: 1 },
            Direction::Left => Point { x: -1, y: 0 },
            Direction::Right => Point { x: 1, y: 0 },
        }
    }
}

impl FromStr for Direction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" | "arrowup" => Ok(Direction::Up),
            "down" | "arrowdown" => Ok(Direction::Down),
            "left" | "arrowleft" => Ok(Direction::Left),
            "right" | "arrowright" => Ok(Direction::Right),
            _ => Err(()),
        }
    }
}

/// Snapshot of a running game, serialized to the UI after every tick.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnakeState {
    pub snake: Vec<Point>,
    pub food: Point,
    pub direction: Direction,
    pub speed_ms: u32,
    pub score: u32,
    pub high_score: u32,
    pub paused: bool,
    pub game_over: bool,
}

impl SnakeState {
    fn fresh(high_score: u32) -> Self {
        Self {
            snake: vec![SNAKE_START],
            food: FOOD_START,
            direction: Direction::Right,
            speed_ms: SPEED_START_MS,
            score: 0,
            high_score,
            paused: false,
            game_over: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum SnakeEvent {
    Moved {
        head: Point,
    },
    FoodEaten {
        score: u32,
        speed_ms: u32,
    },
    GameOver {
        score: u32,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        new_high_score: bool,
    },
}

/// Grid-collision simulation advanced by discrete [`tick`](SnakeEngine::tick)
/// calls; the UI owns the interval timer and feeds direction changes in
/// between ticks.
pub struct SnakeEngine {
    state: SnakeState,
    rng: SmallRng,
    record_broken: bool,
}

impl SnakeEngine {
    pub fn new() -> Self {
        Self {
            state: SnakeState::fresh(0),
            rng: SmallRng::from_entropy(),
            record_broken: false,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            state: SnakeState::fresh(0),
            rng: SmallRng::seed_from_u64(seed),
            record_broken: false,
        }
    }

    pub fn state(&self) -> &SnakeState {
        &self.state
    }

    /// Steer the snake. Reversing into itself is ignored, as is any input
    /// after the game has ended.
    pub fn set_direction(&mut self, direction: Direction) {
        if self.state.game_over || direction == self.state.direction.opposite() {
            return;
        }
        self.state.direction = direction;
    }

    pub fn toggle_pause(&mut self) {
        if !self.state.game_over {
            self.state.paused = !self.state.paused;
        }
    }

    /// Start over, keeping the session's high score.
    pub fn reset(&mut self) {
        self.state = SnakeState::fresh(self.state.high_score);
        self.record_broken = false;
    }

    /// Advance the simulation by one step. A paused or finished game is left
    /// untouched.
    pub fn tick(&mut self) -> Vec<SnakeEvent> {
        if self.state.game_over || self.state.paused {
            return Vec::new();
        }

        let delta = self.state.direction.delta();
        let head = Point {
            x: self.state.snake[0].x + delta.x,
            y: self.state.snake[0].y + delta.y,
        };

        if self.is_collision(head) {
            self.state.game_over = true;
            return vec![SnakeEvent::GameOver {
                score: self.state.score,
                new_high_score: self.record_broken,
            }];
        }

        self.state.snake.insert(0, head);

        if head == self.state.food {
            self.state.score += 1;
            if self.state.score > self.state.high_score {
                self.state.high_score = self.state.score;
                self.record_broken = true;
            }
            self.state.food = self.spawn_food();
            self.state.speed_ms =
                (self.state.speed_ms.saturating_sub(SPEED_STEP_MS)).max(SPEED_FLOOR_MS);
            vec![
                SnakeEvent::Moved { head },
                SnakeEvent::FoodEaten {
                    score: self.state.score,
                    speed_ms: self.state.speed_ms,
                },
            ]
        } else {
            self.state.snake.pop();
            vec![SnakeEvent::Moved { head }]
        }
    }

    fn is_collision(&self, head: Point) -> bool {
        if head.x < 0 || head.x >= GRID_SIZE || head.y < 0 || head.y >= GRID_SIZE {
            return true;
        }
        // The tail cell is vacated this tick only when no food is eaten, but
        // it still counts as solid, so the whole body blocks.
        self.state.snake.iter().skip(1).any(|segment| *segment == head)
    }

    fn spawn_food(&mut self) -> Point {
        loop {
            let candidate = Point {
                x: self.rng.gen_range(0..GRID_SIZE),
                y: self.rng.gen_range(0..GRID_SIZE),
            };
            if !self.state.snake.contains(&candidate) {
                return candidate;
            }
        }
    }
}

impl Default for SnakeEngine {
    fn default() -> Self {
        Self::new()
    }
}
