use super::*;
use crate::cards::*;
use crate::evaluation::*;
use crate::hands::*;
use crate::mccfr::*;
use crate::players::Strategy;
use crate::*;
use std::collections::HashMap;

/// The state machine for one match.
///
/// Seats are kept in join order, which is also the rotation order. On
/// every street each player places cards on their own turn until their
/// pool is down to the street's leftover (none on street one, the single
/// discard afterwards). A player who is done is skipped by the rotation,
/// and once every player is done the street advances.
///
/// After street five the round is scored. Boards that qualify for
/// fantasy get a 14-card deal placed in one go while everyone else plays
/// a normal round alongside, and that round is scored as well.
///
/// Every state change appends an [`Event`]; callers collect them with
/// [`Game::drain`]. The turn token from [`Game::turn`] increments on every
/// hand-off, so a deadline armed for an old turn can be told apart from
/// one for the current turn.
pub struct Game {
    players: Vec<Player>,
    strategies: HashMap<ID<Player>, Box<dyn Strategy>>,
    deck: Deck,
    phase: Phase,
    street: Street,
    active: Option<ID<Player>>,
    fantasy: Vec<ID<Player>>,
    turn: u64,
    events: Vec<Event>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(Deck::new())
    }
}

impl Game {
    pub fn new(deck: Deck) -> Self {
        Self {
            players: Vec::new(),
            strategies: HashMap::new(),
            deck,
            phase: Phase::Waiting,
            street: 0,
            active: None,
            fantasy: Vec::new(),
            turn: 0,
            events: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn street(&self) -> Street {
        self.street
    }
    pub fn active(&self) -> Option<ID<Player>> {
        self.active
    }
    pub fn turn(&self) -> u64 {
        self.turn
    }
    pub fn players(&self) -> &[Player] {
        &self.players
    }
    pub fn player(&self, id: ID<Player>) -> Option<&Player> {
        self.players.iter().find(|p| p.id() == id)
    }
    pub fn fantasy(&self) -> &[ID<Player>] {
        &self.fantasy
    }
    /// Allowance for the current turn, if one is running.
    pub fn time_bank(&self) -> Option<std::time::Duration> {
        self.active
            .filter(|_| self.phase.is_live())
            .and_then(|id| self.player(id))
            .map(|p| p.time_bank())
    }
    /// Whether the current turn belongs to an AI seat.
    pub fn is_ai_turn(&self) -> bool {
        self.phase.is_live()
            && self
                .active
                .map_or(false, |id| self.strategies.contains_key(&id))
    }
    /// Takes every event recorded since the last call.
    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

impl Game {
    /// Seats a human player. Only possible between games.
    pub fn join(&mut self, name: &str) -> Option<ID<Player>> {
        self.seat(Player::new(name, false), None)
    }
    /// Seats an AI player whose moves come from `strategy`.
    pub fn join_ai(&mut self, name: &str, strategy: Box<dyn Strategy>) -> Option<ID<Player>> {
        self.seat(Player::new(name, true), Some(strategy))
    }
    /// Seats an already-built player, e.g. one with a custom time bank.
    pub fn seat(&mut self, player: Player, strategy: Option<Box<dyn Strategy>>) -> Option<ID<Player>> {
        if !self.phase.is_open() {
            log::warn!("[game] {} cannot join while {}", player.name(), self.phase);
            return None;
        }
        let id = player.id();
        log::info!("[game] {} joined as {}", player.name(), id);
        self.events.push(Event::Joined {
            player: id,
            name: player.name().to_string(),
        });
        if let Some(strategy) = strategy {
            self.strategies.insert(id, strategy);
        }
        self.players.push(player);
        Some(id)
    }
    /// Removes a player between games.
    pub fn leave(&mut self, id: ID<Player>) -> bool {
        if !self.phase.is_open() {
            return false;
        }
        let before = self.players.len();
        self.players.retain(|p| p.id() != id);
        self.strategies.remove(&id);
        match self.players.len() < before {
            true => {
                self.events.push(Event::Left { player: id });
                true
            }
            false => false,
        }
    }
    /// Back to `Waiting` with empty boards. Scores are kept.
    pub fn reset(&mut self) {
        self.players.iter_mut().for_each(|p| p.reset());
        self.deck.reset();
        self.phase = Phase::Waiting;
        self.street = 0;
        self.active = None;
        self.fantasy.clear();
        self.turn += 1;
    }

    /// Deals street one and hands the first turn to the first seat.
    pub fn start_game(&mut self) -> anyhow::Result<()> {
        if !self.phase.is_open() {
            anyhow::bail!("a game is already {}", self.phase);
        }
        if self.players.len() < 2 {
            anyhow::bail!(
                "at least 2 players are required to start, {} registered",
                self.players.len()
            );
        }
        self.deck.reset();
        self.fantasy.clear();
        self.phase = Phase::Dealing;
        self.street = 1;
        for player in self.players.iter_mut() {
            player.reset();
            player.hand_mut().add_cards(self.deck.draw(FIRST_STREET_CARDS));
            player.set_ready(true);
        }
        self.phase = Phase::Playing;
        self.events.push(Event::Started {
            players: self.players.iter().map(|p| p.id()).collect(),
        });
        self.events.push(Event::Street { street: 1 });
        log::info!("[game] started with {} players", self.players.len());
        let first = self.players.first().map(|p| p.id());
        self.hand_off(first);
        Ok(())
    }

    /// Whether `id` holds the current turn.
    pub fn can_player_move(&self, id: ID<Player>) -> bool {
        self.phase.is_live() && self.active == Some(id)
    }

    /// Applies a move from `id`. Illegal moves change nothing and return false.
    pub fn handle_player_action(&mut self, id: ID<Player>, action: &Action) -> bool {
        if !self.can_player_move(id) {
            return false;
        }
        let done = match action {
            Action::Place(placement) => self.place(id, placement),
            Action::Remove { line, index } => self.remove(id, *line, *index),
        };
        if done && self.is_done(id) {
            self.next_turn();
        }
        done
    }

    pub fn get_game_state(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            street: self.street,
            active: self.active,
            turn: self.turn,
            fantasy: self.fantasy.clone(),
            players: self.players.clone(),
        }
    }

    /// What `id` can see: their own board, every opponent's placed cards,
    /// and the cards they have not seen anywhere.
    pub fn info(&self, id: ID<Player>) -> Option<GameStateInfo> {
        let player = self.player(id)?;
        let opponents = self
            .players
            .iter()
            .filter(|p| p.id() != id)
            .flat_map(|p| p.hand().placed().copied())
            .collect::<Vec<_>>();
        let hand = player.hand();
        let seen = hand
            .placed()
            .chain(hand.pool())
            .chain(hand.discards())
            .chain(opponents.iter())
            .map(|c| u64::from(*c))
            .fold(0u64, |a, b| a | b);
        let available = (0..DECK_SIZE as u8)
            .map(Card::from)
            .filter(|c| u64::from(*c) & seen == 0)
            .collect();
        Some(GameStateInfo::new(
            hand.clone(),
            available,
            opponents,
            self.street,
            self.fantasy.contains(&id),
        ))
    }

    /// Forces the turn identified by `turn` to finish. Returns false when
    /// that turn is already over, so a late deadline never touches a newer
    /// turn.
    pub fn expire(&mut self, turn: u64) -> bool {
        if turn != self.turn || !self.phase.is_live() {
            return false;
        }
        let Some(id) = self.active else {
            return false;
        };
        log::debug!("[game] turn {} expired for {}", turn, id);
        self.events.push(Event::Expired { player: id });
        match self.strategies.contains_key(&id) {
            true => self.play_ai(id),
            false => self.auto_fill(id),
        }
        if self.turn == turn {
            self.next_turn();
        }
        self.resolve_ai();
        true
    }

    /// Plays out consecutive AI turns until a human is to act or the game
    /// leaves a live phase. Returns the number of turns played.
    pub fn resolve_ai(&mut self) -> usize {
        let mut turns = 0;
        while let Some(id) = self.active.filter(|_| self.is_ai_turn()) {
            let turn = self.turn;
            self.play_ai(id);
            if self.turn == turn {
                break;
            }
            turns += 1;
        }
        turns
    }
}

impl Game {
    fn index(&self, id: ID<Player>) -> Option<usize> {
        self.players.iter().position(|p| p.id() == id)
    }
    fn hand_mut(&mut self, id: ID<Player>) -> Option<&mut Hand> {
        self.players
            .iter_mut()
            .find(|p| p.id() == id)
            .map(|p| p.hand_mut())
    }
    fn place(&mut self, id: ID<Player>, placement: &Placement) -> bool {
        let placed = self
            .hand_mut(id)
            .map_or(false, |h| h.place_card(placement.card, placement.line, placement.index));
        if placed {
            self.events.push(Event::Placed {
                player: id,
                placement: *placement,
            });
        }
        placed
    }
    fn remove(&mut self, id: ID<Player>, line: Line, index: usize) -> bool {
        let removed = self
            .hand_mut(id)
            .and_then(|h| h.remove_card(line, index))
            .is_some();
        if removed {
            self.events.push(Event::Removed {
                player: id,
                line,
                index,
            });
        }
        removed
    }

    /// Whether `player` has nothing left to do this street.
    fn is_street_completed(&self, player: &Player) -> bool {
        match self.fantasy.contains(&player.id()) {
            true => player.hand().is_complete(),
            false => match self.street {
                1 => player.hand().pool().is_empty(),
                _ => player.hand().pool().len() <= 1,
            },
        }
    }
    fn is_done(&self, id: ID<Player>) -> bool {
        self.player(id).map_or(true, |p| self.is_street_completed(p))
    }

    fn hand_off(&mut self, to: Option<ID<Player>>) {
        self.turn += 1;
        self.active = to;
        if let Some(player) = to {
            self.events.push(Event::Turn {
                player,
                turn: self.turn,
            });
        }
    }
    /// Passes the turn to the next seat with work left, or advances the street.
    fn next_turn(&mut self) {
        if self.players.iter().all(|p| self.is_street_completed(p)) {
            return self.next_street();
        }
        let n = self.players.len();
        let from = self.active.and_then(|id| self.index(id)).unwrap_or(n.saturating_sub(1));
        let next = (1..=n)
            .map(|k| (from + k) % n)
            .find(|i| !self.is_street_completed(&self.players[*i]))
            .map(|i| self.players[i].id());
        self.hand_off(next);
    }
    fn next_street(&mut self) {
        for player in self.players.iter_mut() {
            player.hand_mut().discard();
        }
        self.street += 1;
        let dealing = self
            .players
            .iter()
            .any(|p| !self.fantasy.contains(&p.id()));
        if self.street > FINAL_STREET || !dealing {
            return self.finish_round();
        }
        for player in self
            .players
            .iter_mut()
            .filter(|p| !self.fantasy.contains(&p.id()))
        {
            player.hand_mut().add_cards(self.deck.draw(LATER_STREET_CARDS));
        }
        log::debug!("[game] street {}", self.street);
        self.events.push(Event::Street {
            street: self.street,
        });
        let first = self
            .players
            .iter()
            .find(|p| !self.is_street_completed(p))
            .map(|p| p.id());
        self.hand_off(first);
    }

    /// Scores the round just played and either deals fantasy or ends the game.
    fn finish_round(&mut self) {
        let regular = self.phase == Phase::Playing;
        self.phase = Phase::Scoring;
        self.hand_off(None);
        self.score_round();
        let qualified = match regular {
            true => self
                .players
                .iter()
                .filter(|p| Scorer::is_fantasy_qualified(p.hand()))
                .map(|p| p.id())
                .collect::<Vec<_>>(),
            false => Vec::new(),
        };
        match qualified.is_empty() {
            true => {
                self.phase = Phase::Finished;
                self.events.push(Event::Finished);
                log::info!(
                    "[game] finished: {}",
                    self.players
                        .iter()
                        .map(|p| p.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
            false => self.start_fantasy(qualified),
        }
    }
    fn start_fantasy(&mut self, qualified: Vec<ID<Player>>) {
        log::info!("[game] {} player(s) enter fantasy", qualified.len());
        self.deck.reset();
        self.street = 1;
        for player in self.players.iter_mut() {
            player.clear();
            match qualified.contains(&player.id()) {
                true => {
                    player.enter_fantasy();
                    player.hand_mut().add_cards(self.deck.draw(FANTASY_CARDS));
                }
                false => player.hand_mut().add_cards(self.deck.draw(FIRST_STREET_CARDS)),
            }
        }
        self.phase = Phase::Fantasy;
        self.events.push(Event::Fantasy {
            players: qualified.clone(),
        });
        self.events.push(Event::Street { street: 1 });
        let first = self
            .players
            .iter()
            .find(|p| !qualified.contains(&p.id()))
            .or_else(|| self.players.first())
            .map(|p| p.id());
        self.fantasy = qualified;
        self.hand_off(first);
    }
    /// Every pair of players settles once; the winner's gain is the loser's loss.
    fn score_round(&mut self) {
        let n = self.players.len();
        let mut deltas = vec![0 as Points; n];
        for i in 0..n {
            for j in i + 1..n {
                let points = Scorer::calculate_hand_score(
                    self.players[i].hand(),
                    self.players[j].hand(),
                );
                deltas[i] += points;
                deltas[j] -= points;
            }
        }
        for (player, delta) in self.players.iter_mut().zip(deltas.iter()) {
            player.settle(*delta);
        }
        log::info!("[game] round scored: {:?}", deltas);
        self.events.push(Event::Scored {
            deltas: self
                .players
                .iter()
                .map(|p| p.id())
                .zip(deltas)
                .collect(),
        });
    }

    /// Lets the seat's strategy place until its street is done, filling in
    /// mechanically if the strategy gives up or answers illegally.
    fn play_ai(&mut self, id: ID<Player>) {
        while !self.is_done(id) {
            let choice = self
                .info(id)
                .and_then(|info| self.strategies.get(&id).and_then(|s| s.get_action(&info)));
            let placed = match choice {
                Some(placement) => self.place(id, &placement),
                None => false,
            };
            if !placed {
                log::warn!("[game] strategy for {} gave no legal move", id);
                break;
            }
        }
        self.auto_fill(id);
        if self.is_done(id) {
            self.next_turn();
        }
    }
    /// Places pool cards in order at the end of bottom, then middle, then
    /// top, until the street is done.
    fn auto_fill(&mut self, id: ID<Player>) {
        while !self.is_done(id) {
            let next = self.player(id).and_then(|p| Self::fill(p.hand()));
            match next {
                Some(placement) if self.place(id, &placement) => continue,
                _ => break,
            }
        }
    }
    fn fill(hand: &Hand) -> Option<Placement> {
        let card = *hand.pool().first()?;
        [Line::Bottom, Line::Middle, Line::Top]
            .into_iter()
            .find(|line| hand.line(*line).len() < line.capacity())
            .map(|line| Placement::new(card, line, hand.line(line).len()))
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("phase", &self.phase)
            .field("street", &self.street)
            .field("active", &self.active)
            .field("turn", &self.turn)
            .field("players", &self.players)
            .finish()
    }
}
