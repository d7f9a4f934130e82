use rand::rngs::StdRng;
use rand::SeedableRng;
use crate::agent::Agent;
use crate::env::{Action, Environment, Observation};
use crate::error::Result;


/// Drives one agent through one environment.
///
/// Owns a separately seeded random generator for each side, so a run is
/// reproduced exactly by reusing the two seeds.
pub struct Rl<E, A> {
    env: E,
    agent: A,
    env_rng: StdRng,
    agent_rng: StdRng,
    total_reward: f64,
    last_action: Action,
    num_steps: u32,
    num_episodes: u32,
}

impl<E, A> Rl<E, A>
where
    E: Environment,
    A: Agent<State = E::State>,
{
    pub fn new(env: E, agent: A, env_seed: u64, agent_seed: u64) -> Rl<E, A> {
        Rl {
            env,
            agent,
            env_rng: StdRng::seed_from_u64(env_seed),
            agent_rng: StdRng::seed_from_u64(agent_seed),
            total_reward: 0.0,
            last_action: 0,
            num_steps: 0,
            num_episodes: 0,
        }
    }

    /// Start an episode. Returns the first state and the agent's first action.
    pub fn start(&mut self) -> Result<(E::State, Action)> {
        self.total_reward = 0.0;
        self.num_steps = 1;
        let obs = self.env.start(&mut self.env_rng);
        self.last_action = self.agent.start(&obs.state, &mut self.agent_rng)?;
        Ok((obs.state, self.last_action))
    }

    /// Apply the last action to the environment and let the agent learn from
    /// the result. Returns `None` for the action when the episode ended.
    pub fn step(&mut self) -> Result<(Observation<E::State>, Option<Action>)> {
        let obs = self.env.step(self.last_action, &mut self.env_rng)?;
        self.total_reward += obs.reward;

        if obs.terminal {
            self.num_episodes += 1;
            self.agent.end(obs.reward);
            return Ok((obs, None));
        }
        self.num_steps += 1;
        self.last_action = self.agent.step(obs.reward, &obs.state, &mut self.agent_rng)?;
        Ok((obs, Some(self.last_action)))
    }

    /// Run a full episode, or stop after `max_steps` steps when it is
    /// non-zero.
    pub fn episode(&mut self, max_steps: u32) -> Result<()> {
        self.start()?;
        loop {
            if max_steps != 0 && self.num_steps >= max_steps {
                log::debug!("Episode cut off after {} steps", self.num_steps);
                return Ok(());
            }
            let (obs, _) = self.step()?;
            if obs.terminal {
                return Ok(());
            }
        }
    }

    /// Sum of rewards since the episode started.
    pub fn total_reward(&self) -> f64 {
        self.total_reward
    }

    pub fn num_steps(&self) -> u32 {
        self.num_steps
    }

    pub fn num_episodes(&self) -> u32 {
        self.num_episodes
    }

    pub fn agent(&self) -> &A {
        &self.agent
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::coders::{MountainCarTileCoder, PendulumTileCoder};
    use crate::gridworld::{self, GridWorldGame};
    use crate::mountain_car::MountainCar;
    use crate::pendulum::Pendulum;
    use crate::sarsa::{SarsaAgent, SarsaParams};
    use crate::actor_critic::{ActorCriticAgent, ActorCriticParams};
    use crate::tabular::{TabularAgent, TabularParams, TabularRule};

    fn grid_rl(seed: u64) -> Rl<GridWorldGame, TabularAgent> {
        let params = TabularParams {
            num_states: gridworld::NUM_STATES,
            num_actions: gridworld::NUM_ACTIONS,
            epsilon: 0.1,
            step_size: 0.1,
            discount: 0.8,
        };
        let agent = TabularAgent::new(TabularRule::QLearning, params).unwrap();
        Rl::new(GridWorldGame::new(), agent, seed, seed)
    }

    fn car_rl(num_tilings: u32, num_tiles: u32) -> Rl<MountainCar, SarsaAgent<MountainCarTileCoder>> {
        let params = SarsaParams {
            num_actions: 3,
            epsilon: 0.0,
            step_size: 0.5 / num_tilings as f64,
            discount: 1.0,
        };
        let coder = MountainCarTileCoder::new(4096, num_tilings, num_tiles).unwrap();
        Rl::new(MountainCar::new(), SarsaAgent::new(params, coder).unwrap(), 1, 1)
    }

    #[test]
    fn gridworld_episode_counts() {
        // Arrange
        let mut rl = grid_rl(0);
        // Act
        rl.episode(0).unwrap();
        // Assert
        assert_eq!(rl.num_episodes(), 1);
        assert_eq!(rl.num_steps(), gridworld::EPISODE_LENGTH + 1);
    }

    #[test]
    fn gridworld_runs_are_reproducible() {
        let returns = |seed| {
            let mut rl = grid_rl(seed);
            (0..3).map(|_| {
                rl.episode(0).unwrap();
                rl.total_reward()
            }).collect::<Vec<f64>>()
        };
        assert_eq!(returns(7), returns(7));
    }

    #[test]
    fn episode_respects_step_limit() {
        let mut rl = car_rl(8, 8);
        rl.episode(50).unwrap();
        assert!(rl.num_steps() <= 50);
        assert!(rl.num_episodes() <= 1);
    }

    #[test]
    fn mountain_car_reaches_goal() {
        // Arrange
        let mut rl = car_rl(8, 8);
        // Act
        for _ in 0..5 {
            rl.episode(15000).unwrap();
        }
        // Assert
        assert_eq!(rl.num_episodes(), 5);
        assert!(rl.agent().coder().size() <= 4096);
    }

    #[test]
    fn undersized_table_is_fatal() {
        // Arrange
        let params = SarsaParams { num_actions: 3, epsilon: 0.0, step_size: 0.1, discount: 1.0 };
        let coder = MountainCarTileCoder::new(16, 8, 8).unwrap();
        let mut rl = Rl::new(MountainCar::new(), SarsaAgent::new(params, coder).unwrap(), 1, 1);
        // Act
        let result = rl.episode(15000);
        // Assert
        assert!(matches!(result, Err(crate::Error::CapacityExceeded { capacity: 16 })));
    }

    #[test]
    fn pendulum_step_returns_action() {
        let params = ActorCriticParams {
            num_actions: 3,
            actor_step_size: 0.25 / 32.0,
            critic_step_size: 2.0 / 32.0,
            avg_reward_step_size: 2f64.powi(-6),
        };
        let coder = PendulumTileCoder::new(4096, 32, 8).unwrap();
        let agent = ActorCriticAgent::new(params, coder).unwrap();
        let mut rl = Rl::new(Pendulum::new(), agent, 0, 0);
        rl.start().unwrap();
        for _ in 0..100 {
            let (obs, action) = rl.step().unwrap();
            assert!(!obs.terminal);
            assert!(action.is_some());
        }
        assert!(rl.agent().avg_reward() < 0.0);
        assert_eq!(rl.num_steps(), 101);
    }
}
