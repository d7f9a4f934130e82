use std::fmt;
use rand::Rng;
use crate::env::{Action, Environment, Observation};
use crate::error::{Error, Result};

pub const NUM_ROWS: usize = 5;
pub const NUM_COLS: usize = 5;
pub const NUM_ACTIONS: usize = 4;
pub const NUM_PRIZES: usize = 4;
/// Number of distinct linear states: cell, prize slot (or none), damaged.
pub const NUM_STATES: usize = NUM_ROWS * NUM_COLS * (NUM_PRIZES + 1) * 2;
/// Steps after which an episode ends.
pub const EPISODE_LENGTH: u32 = 1000;

const MONSTER_POSITIONS: [Position; 5] = [
    Position { row: 1, col: 2 },
    Position { row: 2, col: 4 },
    Position { row: 3, col: 0 },
    Position { row: 3, col: 1 },
    Position { row: 3, col: 3 },
];
const PRIZE_POSITIONS: [Position; NUM_PRIZES] = [
    Position { row: 1, col: 2 },
    Position { row: 2, col: 4 },
    Position { row: 3, col: 0 },
    Position { row: 3, col: 1 },
];
const REPAIR_POSITION: Position = Position { row: 0, col: 1 };
const MONSTER_PROB: f64 = 0.4;
const PRIZE_PROB: f64 = 0.3;
/// One step in `1 / SLIP_DIVISOR` of each action is replaced by a random one.
const SLIP_DIVISOR: f64 = 20.0;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(row: {}, col: {})", self.row, self.col)
    }
}

/// Full game state. Agents only see its linear encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameState {
    pub position: Position,
    /// Index into the prize positions, `NUM_PRIZES` when no prize is out.
    pub prize_idx: usize,
    pub damaged: bool,
}

impl GameState {
    /// Encode as a single index in `0..NUM_STATES`.
    pub fn linear(&self) -> usize {
        ((self.position.row * NUM_COLS + self.position.col) * (NUM_PRIZES + 1)
            + self.prize_idx) * 2 + usize::from(self.damaged)
    }
}


/// Grid world with prizes, monsters and a repair shop.
///
/// Moves are right, down, left and up (actions 0 to 3). Bumping into a wall
/// costs 1. Prizes appear at random in one of four cells and are worth 10.
/// Monsters lurk in five cells; the first bite damages the agent and bites
/// while damaged cost 10. Visiting the repair shop fixes the damage.
#[derive(Debug, Clone)]
pub struct GridWorldGame {
    state: GameState,
    num_steps: u32,
}

impl Default for GridWorldGame {
    fn default() -> Self {
        GridWorldGame::new()
    }
}

impl GridWorldGame {
    pub fn new() -> GridWorldGame {
        GridWorldGame {
            state: GameState {
                position: Position { row: 0, col: 0 },
                prize_idx: NUM_PRIZES,
                damaged: false,
            },
            num_steps: 0,
        }
    }

    fn hits_wall(position: Position, action: Action) -> bool {
        match action {
            0 => position.col == NUM_COLS - 1
                || (position.row <= 1 && position.col == 0)
                || (position.row == 1 && position.col == 1),
            1 => position.row == NUM_ROWS - 1,
            2 => position.col == 0,
            _ => position.row == 0,
        }
    }

    fn moved(position: Position, action: Action) -> Position {
        let Position { row, col } = position;
        match action {
            0 => Position { row, col: col + 1 },
            1 => Position { row: row + 1, col },
            2 => Position { row, col: col - 1 },
            _ => Position { row: row - 1, col },
        }
    }
}

impl Environment for GridWorldGame {
    type State = usize;

    fn num_actions(&self) -> usize {
        NUM_ACTIONS
    }

    fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Observation<usize> {
        self.num_steps = 1;
        self.state.position = Position {
            row: rng.random_range(0..NUM_ROWS),
            col: rng.random_range(0..NUM_COLS),
        };
        self.state.prize_idx = NUM_PRIZES;
        Observation::new(0.0, self.state.linear(), false)
    }

    fn step<R: Rng + ?Sized>(
        &mut self, action: Action, rng: &mut R
    ) -> Result<Observation<usize>> {
        if action >= NUM_ACTIONS {
            return Err(Error::InvalidAction { action, num_actions: NUM_ACTIONS });
        }
        let slip = (rng.random::<f64>() * SLIP_DIVISOR) as usize;
        let action = if slip < NUM_ACTIONS { slip } else { action };

        let mut reward = 0.0;
        let mut position = self.state.position;
        if GridWorldGame::hits_wall(position, action) {
            reward = -1.0;
        } else {
            position = GridWorldGame::moved(position, action);
        }

        if self.state.prize_idx == NUM_PRIZES && rng.random::<f64>() < PRIZE_PROB {
            self.state.prize_idx = rng.random_range(0..NUM_PRIZES);
        }
        if self.state.prize_idx < NUM_PRIZES
            && position == PRIZE_POSITIONS[self.state.prize_idx] {
            reward += 10.0;
            self.state.prize_idx = NUM_PRIZES;
        }

        for monster in MONSTER_POSITIONS.iter() {
            if rng.random::<f64>() < MONSTER_PROB && position == *monster {
                if self.state.damaged {
                    reward += -10.0;
                } else {
                    self.state.damaged = true;
                }
                break;
            }
        }

        if position == REPAIR_POSITION {
            self.state.damaged = false;
        }
        self.state.position = position;

        let terminal = self.num_steps > EPISODE_LENGTH;
        if !terminal {
            self.num_steps += 1;
        }
        Ok(Observation::new(reward, self.state.linear(), terminal))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use test_case::test_case;

    #[test]
    fn linear_states_are_unique() {
        // Arrange
        let mut states = HashSet::new();
        // Act
        for row in 0..NUM_ROWS {
            for col in 0..NUM_COLS {
                for prize_idx in 0..=NUM_PRIZES {
                    for damaged in [false, true] {
                        let s = GameState {
                            position: Position { row, col }, prize_idx, damaged };
                        states.insert(s.linear());
                    }
                }
            }
        }
        // Assert
        assert_eq!(states.len(), NUM_STATES);
        assert!(states.iter().all(|&s| s < NUM_STATES));
    }

    #[test_case(Position { row: 2, col: 4 }, 0, true; "right outer wall")]
    #[test_case(Position { row: 0, col: 0 }, 0, true; "right internal wall row 0")]
    #[test_case(Position { row: 1, col: 1 }, 0, true; "right internal wall row 1")]
    #[test_case(Position { row: 2, col: 0 }, 0, false; "right open")]
    #[test_case(Position { row: 4, col: 2 }, 1, true; "bottom wall")]
    #[test_case(Position { row: 3, col: 0 }, 2, true; "left wall")]
    #[test_case(Position { row: 0, col: 3 }, 3, true; "top wall")]
    #[test_case(Position { row: 2, col: 2 }, 3, false; "up open")]
    fn walls(position: Position, action: Action, blocked: bool) {
        assert_eq!(GridWorldGame::hits_wall(position, action), blocked);
    }

    #[test]
    fn invalid_action_rejected() {
        let mut env = GridWorldGame::new();
        let mut rng = StdRng::seed_from_u64(3);
        env.start(&mut rng);
        let result = env.step(4, &mut rng);
        assert!(matches!(result, Err(Error::InvalidAction { action: 4, num_actions: 4 })));
    }

    #[test]
    fn episode_ends_after_fixed_length() {
        // Arrange
        let mut env = GridWorldGame::new();
        let mut rng = StdRng::seed_from_u64(11);
        env.start(&mut rng);
        let mut steps = 0;
        // Act
        loop {
            steps += 1;
            let obs = env.step(steps % NUM_ACTIONS, &mut rng).unwrap();
            assert!(obs.state < NUM_STATES);
            if obs.terminal {
                break;
            }
        }
        // Assert
        assert_eq!(steps, EPISODE_LENGTH as usize + 1);
    }

    #[test]
    fn same_seed_same_trajectory() {
        let run = |seed| {
            let mut env = GridWorldGame::new();
            let mut rng = StdRng::seed_from_u64(seed);
            let mut trace = vec![env.start(&mut rng).state];
            for step in 0..50 {
                let obs = env.step(step % NUM_ACTIONS, &mut rng).unwrap();
                trace.push(obs.state);
            }
            trace
        };
        assert_eq!(run(5), run(5));
    }
}
