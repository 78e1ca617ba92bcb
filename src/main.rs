//! Text front end: explore a grid, fight wild encounters, or run a two-player duel.

use clap::{Parser, Subcommand};
use log::{info, warn};
use pokemon_explorer::{
    choose_starter, run_exploration, starter_options, Behavior, BattleEngine, BattleSnapshot, Combatant, Command,
    Direction, Game, GameConfig, GameData, GameError, GameEvent, GameResult, LoopTiming, Mode, MoveChoice, Presenter,
    Side, ValidationError,
};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread;

/// Pokemon Explorer - wander, battle, and collect
#[derive(Parser, Debug)]
#[command(name = "pokemon-explorer")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Game configuration file (RON)
    #[arg(short, long, default_value = "config/game.ron")]
    config: PathBuf,

    /// Random seed, overriding the configuration
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print events and battle snapshots as JSON lines
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pick a starter and explore (default)
    Explore,
    /// Two players pick a combatant each and fight one battle
    Duel,
    /// Print a species by catalog number
    Species { index: u16 },
    /// Print a move by catalog number
    Move { index: u16 },
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> GameResult<()> {
    let mut config = if args.config.exists() {
        GameConfig::load(&args.config)?
    } else {
        warn!("{} not found; using default settings", args.config.display());
        GameConfig::default()
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    let data = Arc::new(GameData::load(&config.data_dir, &config.fallback_move)?);

    match args.command.unwrap_or(Commands::Explore) {
        Commands::Explore => explore(&config, data, args.json),
        Commands::Duel => duel(&config, &data, args.json),
        Commands::Species { index } => {
            println!("{}", data.catalog.species_by_index(index)?);
            Ok(())
        }
        Commands::Move { index } => {
            println!("{}", data.catalog.move_by_index(index)?);
            Ok(())
        }
    }
}

// --- Exploration ---

fn explore(config: &GameConfig, data: Arc<GameData>, json: bool) -> GameResult<()> {
    let Some(starter) = prompt_starter(config, &data)? else {
        return Ok(());
    };
    let mut game = Game::from_config(config, data, starter)?;
    let mut presenter = TextPresenter {
        view_radius: config.view_radius,
        json,
    };
    println!("Move with w/a/s/d, pick who fights with c <slot>, quit with q.");
    println!("{}", game.viewport(config.view_radius));

    let (tx, rx) = mpsc::channel();
    spawn_input_thread(tx);
    let timing = LoopTiming {
        tick_delay: config.tick_delay(),
        input_poll: config.input_poll(),
    };
    let ticks = run_exploration(&mut game, &rx, &mut presenter, timing)?;
    info!("Exploration ended after {} ticks with {} in the inventory", ticks, game.inventory().len());
    println!("{}", game.inventory());
    Ok(())
}

fn prompt_starter(config: &GameConfig, data: &GameData) -> GameResult<Option<Combatant>> {
    let catalog = &data.catalog;
    loop {
        println!("Choose your starter:");
        for species in starter_options(catalog, &config.starter_indices) {
            println!("  {}", species);
        }
        let Some(query) = read_line("Starter (name or number): ") else {
            return Ok(None);
        };
        let Some(moves) = read_line("Up to four moves, comma separated (blank for none): ") else {
            return Ok(None);
        };
        match choose_starter(catalog, &config.starter_indices, &query, &split_moves(&moves)) {
            Ok(starter) => {
                println!("{} joins you!", starter);
                return Ok(Some(starter));
            }
            Err(e) => println!("{}", e),
        }
    }
}

/// Turn raw stdin lines into commands on a helper thread. No game state lives here.
fn spawn_input_thread(tx: Sender<Command>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            match parse_command(&line) {
                Some(command) => {
                    if tx.send(command).is_err() {
                        break;
                    }
                }
                None => println!("Unrecognised input {:?}", line.trim()),
            }
        }
    });
}

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "q" | "quit" => Some(Command::Quit),
        "" | "f" | "fight" | "y" | "yes" => Some(Command::Confirm),
        "r" | "run" | "flee" | "n" | "no" => Some(Command::Flee),
        other => {
            if let Some(slot) = other.strip_prefix("choose").or_else(|| other.strip_prefix('c')) {
                return slot.trim().parse::<usize>().ok().map(Command::Choose);
            }
            match other.parse::<usize>() {
                Ok(slot) => Some(Command::SelectMove(slot)),
                Err(_) => Direction::from_str(other).ok().map(Command::Step),
            }
        }
    }
}

struct TextPresenter {
    view_radius: usize,
    json: bool,
}

impl TextPresenter {
    fn print_battle_prompt(&self, snapshot: &BattleSnapshot) {
        if self.json {
            print_json(snapshot);
            return;
        }
        let opponent = snapshot.combatant(Side::Opponent);
        let player = snapshot.combatant(Side::Player);
        println!("Wild {} HP {}/{}", opponent.name, opponent.current_hp, opponent.max_hp);
        println!("Your {} HP {}/{}", player.name, player.current_hp, player.max_hp);
        for slot in &player.moves {
            println!("  {}. {} ({}) PP {}/{}", slot.slot, slot.name, slot.move_type, slot.pp, slot.max_pp);
        }
        if player.usable_slots().is_empty() {
            println!("No PP left! Enter any number to struggle.");
        } else {
            println!("Choose a move:");
        }
    }
}

impl Presenter for TextPresenter {
    fn present(&mut self, game: &Game, events: &[GameEvent]) {
        if self.json {
            print_json(&events);
        } else {
            for line in events.iter().filter_map(GameEvent::format) {
                println!("{}", line);
            }
        }
        match game.mode() {
            Mode::Exploring => {
                if !self.json {
                    println!("{}", game.viewport(self.view_radius));
                }
            }
            Mode::Battling => {
                if let Some(snapshot) = game.battle_snapshot() {
                    self.print_battle_prompt(&snapshot);
                }
            }
            Mode::EncounterPending => {
                if !self.json {
                    print!("{}", game.inventory());
                }
            }
            Mode::Finished => {}
        }
    }

    fn rejected(&mut self, game: &Game, error: &ValidationError) {
        println!("{}", error);
        if let Some(snapshot) = game.battle_snapshot() {
            self.print_battle_prompt(&snapshot);
        }
    }
}

// --- Duel ---

fn duel(config: &GameConfig, data: &GameData, json: bool) -> GameResult<()> {
    let Some(first) = prompt_combatant(data, "Player 1")? else {
        return Ok(());
    };
    let Some(second) = prompt_combatant(data, "Player 2")? else {
        return Ok(());
    };
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut engine = BattleEngine::start(
        first,
        second,
        Arc::clone(&data.chart),
        Arc::clone(data.catalog.fallback_move()),
        &mut rng,
    )?;
    let mut drivers = [StdinBehavior::new("Player 1", json), StdinBehavior::new("Player 2", json)];

    loop {
        for line in engine.take_events().iter().filter_map(|e| e.format()) {
            println!("{}", line);
        }
        if engine.winner().is_some() {
            break;
        }
        let Some(side) = engine.acting_side() else {
            break;
        };
        let snapshot = engine.snapshot();
        let driver = &mut drivers[side.index()];
        let choice = driver.choose_move(side, &snapshot, &mut rng);
        match engine.submit(side, choice) {
            Ok(resolution) => driver.resolved(&resolution),
            Err(GameError::Validation(e)) => driver.rejected(&e),
            Err(other) => return Err(other),
        }
    }
    Ok(())
}

fn prompt_combatant(data: &GameData, label: &str) -> GameResult<Option<Combatant>> {
    let catalog = &data.catalog;
    loop {
        let Some(query) = read_line(&format!("{}, choose a combatant (name or number): ", label)) else {
            return Ok(None);
        };
        let species = match catalog.find_species(&query) {
            Ok(species) => species,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };
        let Some(moves) = read_line("Up to four moves, comma separated (blank for none): ") else {
            return Ok(None);
        };
        match Combatant::assemble(catalog, species, &split_moves(&moves)) {
            Ok(combatant) => return Ok(Some(combatant)),
            Err(e) => println!("{}", e),
        }
    }
}

/// Reads move choices for one side from stdin.
struct StdinBehavior {
    label: &'static str,
    json: bool,
}

impl StdinBehavior {
    fn new(label: &'static str, json: bool) -> Self {
        Self { label, json }
    }
}

impl Behavior for StdinBehavior {
    fn choose_move(&mut self, side: Side, snapshot: &BattleSnapshot, rng: &mut dyn RngCore) -> MoveChoice {
        let me = snapshot.combatant(side);
        if self.json {
            print_json(snapshot);
        } else {
            let foe = snapshot.combatant(side.opponent());
            println!("{} vs {} (HP {}/{})", me.name, foe.name, foe.current_hp, foe.max_hp);
            for slot in &me.moves {
                println!("  {}. {} PP {}/{}", slot.slot, slot.name, slot.pp, slot.max_pp);
            }
        }
        if me.usable_slots().is_empty() {
            return MoveChoice::Struggle;
        }
        loop {
            let Some(line) = read_line(&format!("{} ({}), choose a move: ", self.label, me.name)) else {
                // Input closed: let the fight finish on its own.
                return pokemon_explorer::RandomBehavior.choose_move(side, snapshot, rng);
            };
            match line.trim().parse::<usize>() {
                Ok(slot) => return MoveChoice::Slot(slot),
                Err(_) => println!("Enter a slot number."),
            }
        }
    }

    fn rejected(&mut self, error: &ValidationError) {
        println!("{}", error);
    }
}

// --- Helpers ---

fn read_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    if let Err(e) = io::stdout().flush() {
        warn!("Could not flush stdout: {}", e);
    }
    let mut line = String::new();
    match io::stdin().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

fn split_moves(line: &str) -> Vec<String> {
    line.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string(value) {
        Ok(text) => println!("{}", text),
        Err(e) => warn!("Could not serialize output: {}", e),
    }
}
