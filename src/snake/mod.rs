//! Snake core: tick-driven grid-collision simulation.

pub mod state;

pub use state::{
    Direction, Point, SnakeEngine, SnakeEvent, SnakeState, GRID_SIZE, SPEED_FLOOR_MS,
    SPEED_START_MS, SPEED_STEP_MS,
};
