//! Pineapple command line.
//!
//! - `train` runs self-play and checkpoints the agent
//! - `simulate` pits the agent against a fixed strategy and reports scores
use clap::Parser;
use pineapple::game::*;
use pineapple::mccfr::*;
use pineapple::players::*;
use pineapple::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Pineapple open-face poker", long_about = None)]
enum Command {
    #[command(about = "Train the agent by self-play")]
    Train {
        #[arg(long, default_value_t = 1000)]
        epochs: usize,
        #[arg(long, help = "Checkpoint directory (default: $PINEAPPLE_CHECKPOINTS or checkpoints/)")]
        checkpoints: Option<PathBuf>,
        #[arg(long, default_value = "agent")]
        player: String,
        #[arg(long, help = "Key regret tables by zone sizes instead of exact cards")]
        counts: bool,
        #[arg(long)]
        seed: Option<u64>,
    },
    #[command(about = "Play headless games between the agent and a fixed strategy")]
    Simulate {
        #[arg(long, default_value_t = 100)]
        games: usize,
        #[arg(long, value_enum, default_value = "random")]
        opponent: Opponent,
        #[arg(long, help = "Checkpoint directory (default: $PINEAPPLE_CHECKPOINTS or checkpoints/)")]
        checkpoints: Option<PathBuf>,
        #[arg(long, default_value = "agent")]
        player: String,
        #[arg(long, default_value_t = 0.0)]
        exploration: Probability,
    },
}

impl Command {
    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Train {
                epochs,
                checkpoints,
                player,
                counts,
                seed,
            } => {
                let config = AgentConfig {
                    scheme: match counts {
                        true => KeyScheme::Counts,
                        false => KeyScheme::Cards,
                    },
                    ..AgentConfig::default()
                };
                let mut agent = Agent::new(&player, config)?.with_store(Self::store(checkpoints));
                if let Some(seed) = seed {
                    agent = agent.with_seed(seed);
                }
                let value = agent.self_play(epochs);
                log::info!("[agent] mean root value {:.3}", value);
                if !agent.save_state() {
                    log::warn!("[agent] final checkpoint was not saved");
                }
                Ok(())
            }
            Command::Simulate {
                games,
                opponent,
                checkpoints,
                player,
                exploration,
            } => {
                let agent = Agent::new(&player, AgentConfig::default())?
                    .with_store(Self::store(checkpoints))
                    .with_exploration(exploration);
                let mut game = Game::default();
                let us = game
                    .join_ai(&player, Box::new(agent))
                    .ok_or_else(|| anyhow::anyhow!("could not seat {}", player))?;
                let them = game
                    .join_ai(opponent.strategy().name(), opponent.strategy())
                    .ok_or_else(|| anyhow::anyhow!("could not seat the opponent"))?;
                for i in 0..games {
                    if interrupted() {
                        log::warn!("[game] stopping early after {} games", i);
                        break;
                    }
                    game.reset();
                    game.start_game()?;
                    game.resolve_ai();
                    game.drain();
                    if (i + 1) % 10 == 0 || i + 1 == games {
                        log::info!(
                            "[game] {:>6} games  {:>+8} vs {}",
                            i + 1,
                            game.player(us).map_or(0, |p| p.score()),
                            game.player(them).map_or(0, |p| p.score()),
                        );
                    }
                }
                Ok(())
            }
        }
    }
    fn store(checkpoints: Option<PathBuf>) -> Box<dyn Persistence + Send + Sync> {
        Box::new(checkpoints.map(FileStore::new).unwrap_or_else(FileStore::from_env))
    }
}

fn main() -> anyhow::Result<()> {
    pineapple::log()?;
    pineapple::deadline();
    Command::parse().run()
}
