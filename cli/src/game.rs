use std::io::{self, Write};
use std::str::FromStr;

use anyhow::Result;
use rand::Rng;
use sapper_core::{
    CellCount, Coord, Coord2, GameConfig, GameError, GameOutcome, GameSession, MineFieldGenerator,
    RandomMineFieldGenerator, RevealOutcome, StatsLog,
};

use crate::view;

enum Action {
    Reveal(Coord2),
    Flag(Coord2),
    Quit,
    Help,
}

/// One full game: setup prompts, the render/act loop, and the statistics
/// append at the end. `Ok` even when the player abandons the game or stdin
/// closes; only real I/O trouble bubbles up.
pub fn play(stats: &StatsLog) -> Result<()> {
    let Some(config) = prompt_config()? else {
        return Ok(());
    };

    let seed = rand::rng().random();
    let field = RandomMineFieldGenerator::new(seed).generate(config);
    let mut session = GameSession::start(field);
    log::info!(
        "new game: {}x{} with {} mines (seed {seed})",
        config.size.0,
        config.size.1,
        config.mines
    );

    loop {
        println!();
        view::draw_board(&session);

        if session.is_finished() {
            break;
        }

        let Some(action) = prompt_action()? else {
            return Ok(());
        };
        match action {
            Action::Reveal(coords) => match session.reveal_at(coords) {
                Ok(RevealOutcome::NoChange) => {
                    println!("Nothing to reveal there. Flagged cells must be unflagged first.")
                }
                Ok(_) => {}
                Err(GameError::InvalidCoords) => println!("That cell is outside the board."),
                Err(err) => log::warn!("reveal rejected: {err}"),
            },
            Action::Flag(coords) => match session.toggle_flag_at(coords) {
                Ok(_) => {}
                Err(GameError::InvalidCoords) => println!("That cell is outside the board."),
                Err(err) => log::warn!("flag rejected: {err}"),
            },
            Action::Quit => {
                println!("Game abandoned.");
                return Ok(());
            }
            Action::Help => print_help(),
        }
    }

    match session.outcome() {
        Some(GameOutcome::Win) => println!("\nYou won! You cleared every safe cell."),
        Some(GameOutcome::Loss) => println!("\nYou lost, you stepped on a mine!"),
        None => {}
    }

    if let Some(record) = session.into_record() {
        if let Err(err) = stats.append(&record) {
            log::error!("could not record the game: {err}");
            println!("Ran into a problem while saving the statistics file.");
        }
    }

    Ok(())
}

/// Asks for width, height and mine count, reprompting until the values make
/// a valid game. `None` when stdin closes.
fn prompt_config() -> Result<Option<GameConfig>> {
    println!("Choose the board size and the number of mines.");

    let Some(width) = prompt_number::<Coord>("Board width: ")? else {
        return Ok(None);
    };
    let Some(height) = prompt_number::<Coord>("Board height: ")? else {
        return Ok(None);
    };

    loop {
        let Some(mines) = prompt_number::<CellCount>("Number of mines: ")? else {
            return Ok(None);
        };
        match GameConfig::new((width, height), mines) {
            Ok(config) => return Ok(Some(config)),
            Err(err) => println!("{err}."),
        }
    }
}

fn prompt_number<T: FromStr + Default + PartialEq>(prompt: &str) -> Result<Option<T>> {
    loop {
        let Some(line) = read_line(prompt)? else {
            return Ok(None);
        };
        match line.trim().parse::<T>() {
            Ok(value) if value != T::default() => return Ok(Some(value)),
            _ => println!("Please give a whole number greater than 0 (boards go up to 255x255)."),
        }
    }
}

fn prompt_action() -> Result<Option<Action>> {
    loop {
        let Some(line) = read_line("Action (h for help): ")? else {
            return Ok(None);
        };
        let tokens: Vec<&str> = line.split_whitespace().collect();

        match tokens.as_slice() {
            [] => continue,
            ["h"] | ["help"] => return Ok(Some(Action::Help)),
            ["q"] | ["quit"] => return Ok(Some(Action::Quit)),
            [verb @ ("r" | "reveal" | "f" | "flag"), x, y] => {
                let (Ok(x), Ok(y)) = (x.parse::<Coord>(), y.parse::<Coord>()) else {
                    println!("Coordinates must be whole numbers, e.g. `r 2 3`.");
                    continue;
                };
                return Ok(Some(match *verb {
                    "r" | "reveal" => Action::Reveal((x, y)),
                    _ => Action::Flag((x, y)),
                }));
            }
            _ => println!("Unknown action; `h` lists the commands."),
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  r X Y   reveal the cell at column X, row Y");
    println!("  f X Y   place or remove a flag at column X, row Y");
    println!("  q       abandon the game and return to the menu");
    println!("  h       show this help");
}

/// Prompts and reads one line from stdin; `None` once stdin is closed.
pub fn read_line(prompt: &str) -> Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}
