use super::*;
use crate::cards::*;
use crate::evaluation::*;
use crate::hands::*;
use crate::players::Strategy;
use crate::*;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use std::collections::HashMap;

/// Tunables for an [`Agent`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentConfig {
    pub learning_rate: f64,
    pub exploration: Probability,
    pub hidden: usize,
    pub scheme: KeyScheme,
    /// Interior nodes one training call may expand before falling back to rollouts.
    pub budget: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            learning_rate: LEARNING_RATE,
            exploration: EXPLORATION_FACTOR,
            hidden: HIDDEN_SIZE,
            scheme: KeyScheme::default(),
            budget: MAX_TRAINING_NODES,
        }
    }
}

/// Regret-matching self-play agent with a learned policy for live play.
///
/// # Training
///
/// [`Agent::train`] walks every placement sequence reachable from a state
/// with an explicit stack, valuing leaves by [`Agent::utility`] and
/// updating the regret tables bottom-up:
///
/// - node value is the strategy-weighted mean of child values
/// - each action's regret grows by `child value - node value`
/// - each action's strategy weight grows by its current probability
///
/// Subtrees are shared within one call through a memo keyed by exact card
/// sets. The stack never exceeds the 13 placements of a board, and once
/// the node budget is spent remaining children are valued by a uniform
/// random playout instead.
///
/// # Live play
///
/// [`Agent::get_action`] asks the [`PolicyNetwork`] for a distribution over
/// all 676 placements, keeps the mass on legal ones, and plays the most
/// likely, except with probability `exploration` where it plays uniformly.
pub struct Agent {
    player: String,
    config: AgentConfig,
    profile: Profile,
    network: PolicyNetwork,
    iterations: usize,
    exploration: Probability,
    rng: SmallRng,
    store: Option<Box<dyn Persistence + Send + Sync>>,
}

/// One interior node on the training stack.
struct Frame {
    state: GameStateInfo,
    info: InfoKey,
    exact: InfoKey,
    actions: Vec<Placement>,
    strategy: Vec<Probability>,
    values: Vec<Utility>,
}

impl Frame {
    fn next(&self) -> Option<GameStateInfo> {
        self.actions
            .get(self.values.len())
            .and_then(|action| self.state.apply(action))
    }
}

impl Agent {
    pub fn new(player: &str, config: AgentConfig) -> anyhow::Result<Self> {
        Ok(Self {
            player: player.to_string(),
            network: PolicyNetwork::new(config.hidden, config.learning_rate)?,
            profile: Profile::default(),
            iterations: 0,
            exploration: config.exploration,
            rng: SmallRng::from_os_rng(),
            store: None,
            config,
        })
    }
    /// Attaches a checkpoint store and resumes from its latest checkpoint, if any.
    pub fn with_store(mut self, store: Box<dyn Persistence + Send + Sync>) -> Self {
        self.store = Some(store);
        self.load_saved_state();
        self
    }
    /// Overrides the live-play exploration rate, e.g. to 0 for evaluation.
    pub fn with_exploration(mut self, exploration: Probability) -> Self {
        self.exploration = exploration.clamp(0.0, 1.0);
        self
    }
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }
    pub fn player(&self) -> &str {
        &self.player
    }
    pub fn iterations(&self) -> usize {
        self.iterations
    }
    pub fn exploration(&self) -> Probability {
        self.exploration
    }
    pub fn profile(&self) -> &Profile {
        &self.profile
    }
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Legal placements in canonical order. Strategy vectors index into this.
    pub fn actions(state: &GameStateInfo) -> Vec<Placement> {
        let mut actions = ActionSpace::get_valid_actions(state);
        actions.sort();
        actions
    }

    /// Current strategy over [`Agent::actions`], blended with Dirichlet noise
    /// during the exploration warmup.
    pub fn get_strategy(&mut self, state: &GameStateInfo) -> Vec<Probability> {
        let n = Self::actions(state).len();
        let info = self.config.scheme.key(state);
        self.strategy(&info, n)
    }

    /// Long-run average strategy over [`Agent::actions`], if the state was ever trained.
    pub fn average_strategy(&self, state: &GameStateInfo) -> Option<Vec<Probability>> {
        let n = Self::actions(state).len();
        let info = self.config.scheme.key(state);
        self.profile.advice(&info, n)
    }

    /// One training iteration rooted at `state`. Returns the root's value.
    pub fn train(&mut self, state: &GameStateInfo) -> Utility {
        let value = self.search(state);
        self.iterations += 1;
        if self.iterations % CHECKPOINT_INTERVAL == 0 {
            self.save_state();
        }
        value
    }

    /// Validity-checked sum of line strengths plus royalties, or the foul penalty.
    pub fn utility(state: &GameStateInfo) -> Utility {
        Self::score(state.hand())
    }

    /// Picks a legal placement from the learned policy.
    pub fn get_action(&self, state: &GameStateInfo) -> Option<Placement> {
        let actions = Self::actions(state);
        if actions.is_empty() {
            return None;
        }
        let ref mut rng = rand::rng();
        if rng.random::<Probability>() < self.exploration {
            return actions.choose(rng).copied();
        }
        let probabilities = match self.network.probabilities(&state.encode()) {
            Ok(p) => p,
            Err(e) => {
                log::warn!("[agent] policy unavailable, playing uniformly: {}", e);
                return actions.choose(rng).copied();
            }
        };
        let masked = actions
            .iter()
            .map(|a| ActionSpace::index(a).map_or(0.0, |i| probabilities[i]))
            .collect::<Vec<_>>();
        let total = masked.iter().sum::<Probability>();
        if total <= 0.0 {
            return actions.choose(rng).copied();
        }
        masked
            .iter()
            .map(|p| p / total)
            .enumerate()
            .fold(None, |best: Option<(usize, Probability)>, (i, p)| match best {
                Some((_, q)) if q >= p => best,
                _ => Some((i, p)),
            })
            .map(|(i, _)| actions[i])
    }

    /// One policy-gradient step on the realized `reward` for playing `action` in `state`.
    pub fn update_policy_network(
        &mut self,
        state: &GameStateInfo,
        action: &Placement,
        reward: Utility,
    ) -> Option<f32> {
        let index = ActionSpace::index(action)?;
        match self.network.reinforce(&state.encode(), index, reward) {
            Ok(loss) => Some(loss),
            Err(e) => {
                log::warn!("[agent] policy update failed: {}", e);
                None
            }
        }
    }

    /// Fits the policy network toward the average strategy at `state`.
    pub fn distill(&mut self, state: &GameStateInfo) -> Option<f32> {
        let advice = self.average_strategy(state)?;
        let target = Self::actions(state)
            .iter()
            .zip(advice)
            .filter_map(|(a, p)| ActionSpace::index(a).map(|i| (i, p)))
            .collect::<Vec<_>>();
        match self.network.distill(&state.encode(), &target) {
            Ok(loss) => Some(loss),
            Err(e) => {
                log::warn!("[agent] distillation failed: {}", e);
                None
            }
        }
    }

    /// Trains on `epochs` randomly dealt situations, distilling the policy
    /// network after each. Returns the mean root value.
    pub fn self_play(&mut self, epochs: usize) -> Utility {
        let start = std::time::Instant::now();
        let mut last = start;
        let mut total = 0.0;
        let mut played = 0;
        for _ in 0..epochs {
            if interrupted() {
                log::warn!("[agent] training deadline reached");
                break;
            }
            let root = self.root();
            total += self.train(&root);
            self.distill(&root);
            played += 1;
            if last.elapsed() >= TRAINING_LOG_INTERVAL {
                last = std::time::Instant::now();
                log::info!(
                    "[agent] {:<16}{:<16}{:<16}",
                    format!("epoch {}", self.iterations),
                    format!("infos {}", self.profile.len()),
                    format!("value {:.2}", total / played as Utility),
                );
            }
        }
        log::info!(
            "[agent] trained {} epochs in {:?}, {} infos",
            played,
            start.elapsed(),
            self.profile.len()
        );
        match played {
            0 => 0.0,
            n => total / n as Utility,
        }
    }

    /// Everything needed to resume this agent.
    pub fn checkpoint(&self) -> anyhow::Result<Checkpoint> {
        Ok(Checkpoint {
            player: self.player.clone(),
            timestamp: now(),
            iterations: self.iterations,
            exploration: self.exploration,
            profile: self.profile.clone(),
            weights: self.network.weights()?,
        })
    }
    /// Replaces this agent's learned state. On error nothing is changed.
    pub fn restore(&mut self, checkpoint: Checkpoint) -> anyhow::Result<()> {
        self.network.load(&checkpoint.weights)?;
        self.profile = checkpoint.profile;
        self.iterations = checkpoint.iterations;
        self.exploration = checkpoint.exploration;
        Ok(())
    }
    /// Writes a checkpoint through the attached store. Never fatal.
    pub fn save_state(&self) -> bool {
        let Some(store) = self.store.as_ref() else {
            return false;
        };
        match self.checkpoint() {
            Ok(checkpoint) => {
                let saved = store.save_progress(&checkpoint);
                log::debug!("[agent] checkpoint at {} saved: {}", self.iterations, saved);
                saved
            }
            Err(e) => {
                log::warn!("[agent] failed to build checkpoint: {}", e);
                false
            }
        }
    }
    /// Resumes from the store's latest checkpoint for this player. Never fatal.
    pub fn load_saved_state(&mut self) -> bool {
        let Some(checkpoint) = self
            .store
            .as_ref()
            .and_then(|store| store.load_progress(&self.player))
        else {
            return false;
        };
        match self.restore(checkpoint) {
            Ok(()) => {
                log::info!("[agent] resumed {} at {}", self.player, self.iterations);
                true
            }
            Err(e) => {
                log::warn!("[agent] ignoring unusable checkpoint: {}", e);
                false
            }
        }
    }
}

impl Agent {
    fn search(&mut self, root: &GameStateInfo) -> Utility {
        let actions = Self::actions(root);
        if actions.is_empty() {
            return Self::utility(root);
        }
        let mut memo = HashMap::<InfoKey, Utility>::new();
        let mut expanded = 1;
        let mut stack = vec![self.frame(root.clone(), actions)];
        loop {
            let depth = stack.len();
            let Some(frame) = stack.last_mut() else {
                break;
            };
            match frame.next() {
                Some(child) => {
                    let exact = KeyScheme::Cards.key(&child);
                    if let Some(value) = memo.get(&exact) {
                        frame.values.push(*value);
                        continue;
                    }
                    let actions = Self::actions(&child);
                    let value = if actions.is_empty() {
                        Some(Self::utility(&child))
                    } else if depth >= MAX_TRAINING_DEPTH || expanded >= self.config.budget {
                        Some(Self::rollout(&child, &mut self.rng))
                    } else {
                        None
                    };
                    match value {
                        Some(value) => {
                            memo.insert(exact, value);
                            frame.values.push(value);
                        }
                        None => {
                            expanded += 1;
                            let next = self.frame(child, actions);
                            stack.push(next);
                        }
                    }
                }
                None => {
                    let Some(done) = stack.pop() else {
                        break;
                    };
                    let exact = done.exact;
                    let value = self.update(done);
                    memo.insert(exact, value);
                    match stack.last_mut() {
                        Some(parent) => parent.values.push(value),
                        None => return value,
                    }
                }
            }
        }
        0.0
    }
    fn frame(&mut self, state: GameStateInfo, actions: Vec<Placement>) -> Frame {
        let info = self.config.scheme.key(&state);
        let exact = KeyScheme::Cards.key(&state);
        let strategy = self.strategy(&info, actions.len());
        Frame {
            values: Vec::with_capacity(actions.len()),
            state,
            info,
            exact,
            actions,
            strategy,
        }
    }
    fn update(&mut self, frame: Frame) -> Utility {
        let node = frame
            .strategy
            .iter()
            .zip(frame.values.iter())
            .map(|(p, v)| p * v)
            .sum::<Utility>();
        let regrets = frame.values.iter().map(|v| v - node).collect::<Vec<_>>();
        self.profile.accumulate(frame.info, &regrets, &frame.strategy);
        node
    }
    fn strategy(&mut self, info: &InfoKey, n: usize) -> Vec<Probability> {
        let policy = self.profile.policy(info, n);
        if self.iterations >= EXPLORATION_WARMUP {
            return policy;
        }
        let e = self.exploration;
        policy
            .into_iter()
            .zip(self.noise(n))
            .map(|(p, d)| (1.0 - e) * p + e * d)
            .collect()
    }
    /// Symmetric Dirichlet(1) sample: normalized unit exponentials.
    fn noise(&mut self, n: usize) -> Vec<Probability> {
        let draws = (0..n)
            .map(|_| -(1.0 - self.rng.random::<Probability>()).ln())
            .collect::<Vec<_>>();
        let sum = draws.iter().sum::<Probability>();
        match sum > 0.0 {
            true => draws.into_iter().map(|d| d / sum).collect(),
            false => vec![1.0 / n as Probability; n],
        }
    }
    fn rollout(state: &GameStateInfo, rng: &mut SmallRng) -> Utility {
        let mut hand = state.hand().clone();
        Self::scatter(&mut hand, usize::MAX, rng);
        Self::score(&hand)
    }
    /// Places up to `n` pool cards by uniformly random legal placements.
    fn scatter(hand: &mut Hand, n: usize, rng: &mut SmallRng) {
        for _ in 0..n {
            match ActionSpace::enumerate(hand).choose(rng).copied() {
                Some(p) => hand.place_card(p.card, p.line, p.index),
                None => break,
            };
        }
    }
    fn score(hand: &Hand) -> Utility {
        let [top, middle, bottom] = Evaluator::line_scores(hand);
        match top <= middle && middle <= bottom {
            true => (top + middle + bottom) as Utility + Evaluator::royalties(hand) as Utility,
            false => FOUL_PENALTY,
        }
    }
    /// A random decision point: earlier streets played out at random,
    /// then the current street's cards dealt into the pool.
    fn root(&mut self) -> GameStateInfo {
        let mut deck = Deck::from(SmallRng::seed_from_u64(self.rng.random()));
        let street = self.rng.random_range(1..=FINAL_STREET);
        let mut hand = Hand::default();
        hand.add_cards(deck.draw(FIRST_STREET_CARDS));
        if street > 1 {
            Self::scatter(&mut hand, FIRST_STREET_CARDS, &mut self.rng);
            for _ in 2..street {
                hand.add_cards(deck.draw(LATER_STREET_CARDS));
                Self::scatter(&mut hand, LATER_STREET_CARDS - 1, &mut self.rng);
                hand.discard();
            }
            hand.add_cards(deck.draw(LATER_STREET_CARDS));
        }
        let seen = hand
            .placed()
            .chain(hand.pool())
            .chain(hand.discards())
            .copied()
            .collect::<Vec<_>>();
        let available = (0..DECK_SIZE as u8)
            .map(Card::from)
            .filter(|c| !seen.contains(c))
            .collect();
        GameStateInfo::new(hand, available, Vec::new(), street, false)
    }
}

impl Strategy for Agent {
    fn get_action(&self, state: &GameStateInfo) -> Option<Placement> {
        Agent::get_action(self, state)
    }
    fn name(&self) -> &'static str {
        "agent"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn config() -> AgentConfig {
        AgentConfig {
            hidden: 16,
            ..AgentConfig::default()
        }
    }
    fn agent() -> Agent {
        Agent::new("test", config()).unwrap().with_seed(11)
    }
    fn state(cards: &str) -> GameStateInfo {
        GameStateInfo::deal(Card::parse(cards).unwrap(), 1, false)
    }
    /// Twelve cards placed validly, one left in the pool for the last top slot.
    fn last_card() -> GameStateInfo {
        let hand = {
            let mut hand = Hand::from_lines(
                Card::parse("2c 3d").unwrap(),
                Card::parse("7c 7d Kh Ks 2d").unwrap(),
                Card::parse("9c 9d 9h 2s 2h").unwrap(),
            );
            hand.add_cards(Card::parse("4h").unwrap());
            hand
        };
        GameStateInfo::new(hand, Vec::new(), Vec::new(), 5, false)
    }

    #[test]
    fn utility_of_complete_boards() {
        let valid = Hand::from_lines(
            Card::parse("2c 3d 4h").unwrap(),
            Card::parse("7c 7d Kh Ks 2d").unwrap(),
            Card::parse("9c 9d 9h 2s 2h").unwrap(),
        );
        let valid = GameStateInfo::new(valid, Vec::new(), Vec::new(), 5, false);
        assert_eq!(Agent::utility(&valid), (0 + 2 + 6) as Utility + 6.0);
        let fouled = Hand::from_lines(
            Card::parse("Qc Qd Qh").unwrap(),
            Card::parse("7c 7d Kh Ks 2d").unwrap(),
            Card::parse("9c 8d 9h 2s 3h").unwrap(),
        );
        let fouled = GameStateInfo::new(fouled, Vec::new(), Vec::new(), 5, false);
        assert_eq!(Agent::utility(&fouled), FOUL_PENALTY);
    }

    #[test]
    fn train_fills_the_root() {
        let mut agent = agent();
        let root = state("As Kd Qh Jc Ts");
        let value = agent.train(&root);
        assert!(value.is_finite());
        assert_eq!(agent.iterations(), 1);
        let info = KeyScheme::Cards.key(&root);
        assert_eq!(agent.profile().advice(&info, 15).map(|a| a.len()), Some(15));
        assert!(agent.profile().len() > 1);
    }

    #[test]
    fn root_regrets_balance_against_strategy() {
        let mut agent = agent();
        let root = state("As Ad 7h 7c 2s");
        agent.train(&root);
        let info = KeyScheme::Cards.key(&root);
        let n = Agent::actions(&root).len();
        let weighted = (0..n)
            .map(|i| agent.profile().cum_weight(&info, i) * agent.profile().cum_regret(&info, i))
            .sum::<Utility>();
        assert!(weighted.abs() < 1e-3);
    }

    #[test]
    fn last_card_prefers_the_legal_top() {
        let mut agent = agent();
        let root = last_card();
        assert_eq!(Agent::actions(&root).len(), 3);
        let value = agent.train(&root);
        let strategy = agent.get_strategy(&root);
        assert_eq!(strategy.len(), 3);
        assert!((strategy.iter().sum::<Probability>() - 1.0).abs() < 1e-4);
        assert!(value > FOUL_PENALTY);
    }

    #[test]
    fn warm_strategy_is_pure_regret_matching() {
        let mut agent = agent();
        let root = last_card();
        let info = KeyScheme::Cards.key(&root);
        agent.profile.accumulate(info, &[3.0, 1.0, -2.0], &[0.0; 3]);
        agent.iterations = EXPLORATION_WARMUP;
        let policy = agent.profile().policy(&info, 3);
        assert_eq!(policy, vec![0.75, 0.25, 0.0]);
        assert_eq!(agent.get_strategy(&root), policy);
        assert_eq!(agent.get_strategy(&root), policy);
    }

    #[test]
    fn warmup_blends_in_noise() {
        let mut agent = agent();
        let root = last_card();
        let info = KeyScheme::Cards.key(&root);
        agent.profile.accumulate(info, &[3.0, 1.0, -2.0], &[0.0; 3]);
        agent.iterations = EXPLORATION_WARMUP - 1;
        let policy = agent.profile().policy(&info, 3);
        let strategy = agent.get_strategy(&root);
        assert_ne!(strategy, policy);
        assert!((strategy.iter().sum::<Probability>() - 1.0).abs() < 1e-4);
        assert!(strategy[2] > 0.0);
        assert!(strategy[2] <= EXPLORATION_FACTOR);
        assert!(strategy[0] >= (1.0 - EXPLORATION_FACTOR) * policy[0]);
    }

    #[test]
    fn leaf_roots_are_valued_directly() {
        let mut agent = agent();
        let done = GameStateInfo::new(
            Hand::from_lines(
                Card::parse("2c 3d 4h").unwrap(),
                Card::parse("7c 7d Kh Ks 2d").unwrap(),
                Card::parse("9c 9d 9h 2s 2h").unwrap(),
            ),
            Vec::new(),
            Vec::new(),
            5,
            false,
        );
        assert_eq!(agent.train(&done), Agent::utility(&done));
        assert!(agent.profile().is_empty());
    }

    #[test]
    fn small_budget_still_terminates() {
        let mut agent = Agent::new(
            "budget",
            AgentConfig {
                budget: 4,
                ..config()
            },
        )
        .unwrap();
        let value = agent.train(&state("As Kd Qh Jc Ts"));
        assert!(value.is_finite());
        assert!(agent.profile().len() <= 4);
    }

    #[test]
    fn live_action_is_legal() {
        let agent = agent();
        let root = state("As Kd Qh Jc Ts");
        for _ in 0..20 {
            let action = agent.get_action(&root).unwrap();
            assert!(root.apply(&action).is_some());
        }
        assert_eq!(agent.get_action(&GameStateInfo::deal(Vec::new(), 1, false)), None);
    }

    #[test]
    fn policy_updates_run() {
        let mut agent = agent();
        let root = state("As Kd Qh Jc Ts");
        let action = Agent::actions(&root)[0];
        assert!(agent.update_policy_network(&root, &action, 2.0).is_some());
        assert!(agent.distill(&root).is_none());
        agent.train(&root);
        assert!(agent.distill(&root).is_some());
    }

    #[test]
    fn checkpoints_every_interval() {
        let store = Arc::new(MemoryStore::default());
        let mut agent = agent().with_store(Box::new(store.clone()));
        let root = last_card();
        for _ in 0..CHECKPOINT_INTERVAL {
            agent.train(&root);
        }
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.load_progress("test").map(|c| c.iterations),
            Some(CHECKPOINT_INTERVAL)
        );
    }

    #[test]
    fn resumes_from_store() {
        let store = Arc::new(MemoryStore::default());
        let mut first = agent().with_store(Box::new(store.clone()));
        first.train(&state("As Kd Qh Jc Ts"));
        assert!(first.save_state());
        let second = agent().with_store(Box::new(store.clone()));
        assert_eq!(second.iterations(), 1);
        assert_eq!(second.profile(), first.profile());
        let x = state("2c 3c 4c 5c 6c").encode();
        assert_eq!(
            first.network.probabilities(&x).unwrap(),
            second.network.probabilities(&x).unwrap()
        );
    }

    #[test]
    fn missing_store_is_not_fatal() {
        let agent = agent();
        assert!(!agent.save_state());
    }

    #[test]
    fn count_keys_alias_boards() {
        let mut agent = Agent::new(
            "counts",
            AgentConfig {
                scheme: KeyScheme::Counts,
                ..config()
            },
        )
        .unwrap();
        agent.train(&state("As Kd Qh Jc Ts"));
        let other = state("2c 3d 4h 5s 7c");
        assert!(agent.average_strategy(&other).is_some());
    }

    #[test]
    fn self_play_runs() {
        let mut agent = agent();
        let value = agent.self_play(3);
        assert!(value.is_finite());
        assert_eq!(agent.iterations(), 3);
    }
}
