//! Scripted pursuit session.
//!
//! The game master starts the pursuit and rolls for the pursuers; a player
//! rolls for the quarry, so every quarry roll travels through the relay.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use clap::Parser;

use pursuit_core::{ChatMessage, Participant, PursuitCommand, Side, User, UserId};
use pursuit_runtime::{FileMessageRepository, PursuitHandle, Runtime, RuntimeConfig};

const GM_ID: &str = "gm";
const PLAYER_ID: &str = "player";

/// Start a pursuit and resolve rounds with seeded dice
#[derive(Parser)]
pub struct Simulate {
    /// Pursuit command as typed in chat: `distance [type] [skill] [fallback]`
    #[arg(short, long, value_name = "COMMAND", default_value = "5")]
    command: String,

    /// Quarry participant as `id:name:target` (repeatable)
    #[arg(short, long = "quarry", value_name = "PARTICIPANT", required = true)]
    quarry: Vec<ParticipantArg>,

    /// Pursuing participant as `id:name:target` (repeatable)
    #[arg(short, long = "pursuer", value_name = "PARTICIPANT", required = true)]
    pursuers: Vec<ParticipantArg>,

    /// Number of rounds to resolve
    #[arg(short, long, default_value_t = 1)]
    rounds: u32,

    /// Dice seed (overrides PURSUIT_SEED)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Persist chat messages as JSON files in this directory
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Print every chat message as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

/// `id:name:target` participant description.
#[derive(Clone, Debug)]
struct ParticipantArg(Participant);

impl FromStr for ParticipantArg {
    type Err = String;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        let mut parts = raw.splitn(3, ':');
        let (Some(id), Some(name), Some(target)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(format!("expected id:name:target, got '{raw}'"));
        };
        let target = target
            .parse::<u32>()
            .map_err(|_| format!("target must be a whole number, got '{target}'"))?;
        if id.is_empty() {
            return Err("participant id must not be empty".to_owned());
        }

        Ok(Self(Participant::new(id, name, target)))
    }
}

impl Simulate {
    pub async fn execute(self) -> Result<()> {
        let mut config = RuntimeConfig::from_env();
        if let Some(seed) = self.seed {
            config.seed = seed;
        }

        let mut builder = Runtime::builder()
            .config(config)
            .user(User::game_master(GM_ID, "Game Master"))
            .user(User::player(PLAYER_ID, "Player"));
        if let Some(dir) = &self.data_dir {
            let repository = FileMessageRepository::new(dir)
                .with_context(|| format!("opening message store at {}", dir.display()))?;
            builder = builder.repository(repository);
        }
        let runtime = builder.build().await?;

        let outcome = self.play(&runtime).await;
        runtime.shutdown().await?;
        outcome
    }

    async fn play(&self, runtime: &Runtime) -> Result<()> {
        let gm = runtime.handle_for(&UserId::new(GM_ID))?;
        let player = runtime.handle_for(&UserId::new(PLAYER_ID))?;
        let dice = runtime.roll_provider();

        let command = PursuitCommand::parse(&self.command)?;
        let Some(mut card) = gm.start_pursuit(&command).await? else {
            bail!("'{}' names a contest type that cannot be resolved yet", self.command);
        };

        let quarry: Vec<Participant> = self.quarry.iter().map(|p| p.0.clone()).collect();
        let pursuers: Vec<Participant> = self.pursuers.iter().map(|p| p.0.clone()).collect();

        for _ in 0..self.rounds {
            player.roll(card.id, Side::Quarry, &quarry, &dice).await?;
            let rolled = gm.roll(card.id, Side::Pursuers, &pursuers, &dice).await?;
            self.print(&rolled)?;

            card = gm.resolve_round(card.id).await?;
        }
        self.print(&card)?;

        report_messages(&player).await
    }

    fn print(&self, message: &ChatMessage) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(message)?);
        } else {
            // The state summary ends with its own newline.
            print!("[{}] {}", message.id, message.system);
        }
        Ok(())
    }
}

async fn report_messages(handle: &PursuitHandle) -> Result<()> {
    let messages = handle.messages().await?;
    tracing::info!(count = messages.len(), "session finished");
    Ok(())
}
