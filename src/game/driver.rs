//! The tick loop that feeds commands from a channel into a `Game`.

use crate::errors::{GameError, GameResult, ValidationError};
use crate::game::{Command, Game, GameEvent, Mode};
use log::{debug, info};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

/// Anything that shows the game to a player.
pub trait Presenter {
    /// Called after every accepted command with the events it produced.
    fn present(&mut self, game: &Game, events: &[GameEvent]);

    /// Called when a command was rejected; the game state is unchanged.
    fn rejected(&mut self, game: &Game, error: &ValidationError);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopTiming {
    /// Sleep between exploration ticks.
    pub tick_delay: Duration,
    /// Longest wait for a command during one exploration tick.
    pub input_poll: Duration,
}

impl Default for LoopTiming {
    fn default() -> Self {
        Self {
            tick_delay: Duration::from_millis(50),
            input_poll: Duration::from_millis(200),
        }
    }
}

/// Run until the player quits or the command channel closes.
///
/// While exploring, each tick waits at most `input_poll` for a command and then
/// sleeps `tick_delay`; a tick with no input does nothing. While an encounter is
/// pending or a battle is running, the loop blocks until a command arrives.
/// Returns the number of ticks run.
pub fn run_exploration(
    game: &mut Game,
    commands: &Receiver<Command>,
    presenter: &mut dyn Presenter,
    timing: LoopTiming,
) -> GameResult<u64> {
    let mut ticks = 0u64;
    loop {
        let mode = game.mode();
        if mode == Mode::Finished {
            break;
        }
        ticks += 1;

        let command = if mode == Mode::Exploring {
            match commands.recv_timeout(timing.input_poll) {
                Ok(command) => Some(command),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => {
                    info!("Command channel closed while exploring");
                    break;
                }
            }
        } else {
            match commands.recv() {
                Ok(command) => Some(command),
                Err(_) => {
                    info!("Command channel closed while {}", mode);
                    break;
                }
            }
        };

        if let Some(command) = command {
            match game.handle(command) {
                Ok(events) => presenter.present(game, &events),
                Err(GameError::Validation(error)) => {
                    debug!("Rejected {:?}: {}", command, error);
                    presenter.rejected(game, &error);
                }
                Err(other) => return Err(other),
            }
        }

        if game.mode() == Mode::Exploring {
            thread::sleep(timing.tick_delay);
        }
    }
    Ok(ticks)
}
