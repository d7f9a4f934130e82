use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use crate::agent::Agent;
use crate::env::Action;
use crate::error::{Error, Result};
use crate::policy;


/// Bootstrap target used by a tabular agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabularRule {
    /// Value of the greedy action in the next state
    QLearning,
    /// Expected value of the next state under the epsilon-greedy policy
    ExpectedSarsa,
}

impl TabularRule {
    pub fn name(&self) -> &'static str {
        match self {
            TabularRule::QLearning => "q_learning",
            TabularRule::ExpectedSarsa => "expected_sarsa",
        }
    }
}


#[derive(Debug, Clone)]
pub struct TabularParams {
    pub num_states: usize,
    pub num_actions: usize,
    pub epsilon: f64,
    pub step_size: f64,
    pub discount: f64,
}


/// Epsilon-greedy agent with a table of action values.
pub struct TabularAgent {
    pub rule: TabularRule,
    params: TabularParams,
    /// Action values. Indexes: state, action
    pub q_values: Array2<f64>,
    prev_state: usize,
    prev_action: Action,
}

impl TabularAgent {
    pub fn new(rule: TabularRule, params: TabularParams) -> Result<TabularAgent> {
        if params.num_states == 0 || params.num_actions == 0 {
            return Err(Error::InvalidConfig(
                String::from("tabular agent needs at least one state and one action")));
        }
        let q_values = Array2::<f64>::zeros((params.num_states, params.num_actions));
        Ok(TabularAgent { rule, params, q_values, prev_state: 0, prev_action: 0 })
    }

    pub fn prev_action(&self) -> Action {
        self.prev_action
    }

    fn check_state(&self, state: usize) -> Result<()> {
        if state >= self.params.num_states {
            return Err(Error::InvalidConfig(format!(
                "state {} outside table of {} states", state, self.params.num_states)));
        }
        Ok(())
    }

    fn next_value(&self, current_q: &[f64]) -> f64 {
        match self.rule {
            TabularRule::QLearning => current_q.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            TabularRule::ExpectedSarsa => {
                policy::epsilon_greedy_probs(current_q, self.params.epsilon)
                    .iter()
                    .zip(current_q.iter())
                    .map(|(p, q)| p * q)
                    .sum()
            }
        }
    }

    fn update(&mut self, target: f64) {
        let q = &mut self.q_values[[self.prev_state, self.prev_action]];
        *q += self.params.step_size * (target - *q);
    }
}

impl Agent for TabularAgent {
    type State = usize;

    fn start<R: Rng + ?Sized>(&mut self, state: &usize, rng: &mut R) -> Result<Action> {
        self.check_state(*state)?;
        let current_q = self.q_values.row(*state).to_vec();
        let action = policy::epsilon_greedy(&current_q, self.params.epsilon, rng);
        self.prev_state = *state;
        self.prev_action = action;
        Ok(action)
    }

    fn step<R: Rng + ?Sized>(
        &mut self, reward: f64, state: &usize, rng: &mut R
    ) -> Result<Action> {
        self.check_state(*state)?;
        let current_q = self.q_values.row(*state).to_vec();
        let action = policy::epsilon_greedy(&current_q, self.params.epsilon, rng);

        let target = reward + self.params.discount * self.next_value(&current_q);
        self.update(target);

        self.prev_state = *state;
        self.prev_action = action;
        Ok(action)
    }

    fn end(&mut self, reward: f64) {
        self.update(reward);
    }
}
