mod command;
mod render;
mod session;

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{debug, info};
use mochi_engine::{Game, Rules};
use rand::SeedableRng;
use rand::rngs::StdRng;

use command::Command;
use session::{Flow, Session};

#[derive(Parser, Debug)]
#[command(author, version, about = "Merge tiles to make the mochi sleepy")]
struct Args {
    /// Path to a rules TOML file (defaults to the built-in rules)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Save file holding healing points and furniture
    #[arg(long, value_name = "FILE", default_value = "nemui-mochi.json")]
    save: PathBuf,

    /// Seed for tile spawns (random if omitted)
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// Log filter, e.g. "info", "debug"
    #[arg(long, default_value = "warn")]
    log: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log.as_str())).init();

    let rules = match &args.config {
        Some(path) => Rules::from_toml(path)
            .with_context(|| format!("failed to load rules from {}", path.display()))?,
        None => Rules::default(),
    };
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let save = session::load_save(&args.save);
    info!("loaded {} healing points from {}", save.healing_points, args.save.display());
    let game = Game::from_save(rules, save, rng).context("failed to start game")?;
    let mut session = Session::new(game, args.save);

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let mut out = render::status(session.game());
    out.push_str("type help for commands\n");
    let mut last = Instant::now();

    loop {
        write!(stdout, "{out}> ")?;
        stdout.flush()?;
        out.clear();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            session.persist()?;
            break;
        }
        let idle = last.elapsed().as_secs();
        last += Duration::from_secs(idle);

        let cmd = match Command::parse(&line) {
            Ok(cmd) => cmd,
            Err(e) => {
                out = format!("{e:#}\n");
                continue;
            }
        };
        debug!("{cmd:?} after {idle}s idle");
        if session.handle(cmd, idle, &mut out)? == Flow::Quit {
            break;
        }
    }
    writeln!(stdout, "oyasumi")?;
    Ok(())
}
