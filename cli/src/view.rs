use std::io;

use sapper_core::{CellView, GameSession, StatsError, StatsLog};

/// Character vocabulary of the renderer. The engine never produces display
/// strings; everything the player sees is derived here.
fn cell_char(view: CellView) -> char {
    match view {
        CellView::Hidden => '.',
        CellView::Flagged => 'F',
        CellView::Revealed(0) => ' ',
        CellView::Revealed(count) => char::from_digit(count.into(), 10).unwrap_or('?'),
        CellView::Mine => '*',
        CellView::TriggeredMine => 'X',
        CellView::Misflagged => '#',
    }
}

pub fn draw_board(session: &GameSession) {
    let (width, height) = session.board().size();
    println!(
        "{} mines left, {} moves",
        session.board().mines_left(),
        session.move_count()
    );

    // column labels, ones digit only; rows carry the full index
    print!("    ");
    for x in 0..width {
        print!("{} ", x % 10);
    }
    println!();

    for y in 0..height {
        print!("{y:>3} ");
        for x in 0..width {
            print!("{} ", cell_char(session.cell_view((x, y))));
        }
        println!();
    }
}

/// Prints every recorded game in file order. A damaged or unreadable file
/// aborts the listing with a message; the session keeps running.
pub fn show_statistics(stats: &StatsLog) {
    let records = match stats.load_all() {
        Ok(records) => records,
        Err(StatsError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
            println!("No games have been recorded yet.");
            return;
        }
        Err(err) => {
            log::error!("could not open statistics: {err}");
            println!("Ran into a problem while opening the statistics file.");
            return;
        }
    };

    println!(
        "{:<20} {:>10} {:>7} {:>8} {:>7} {:>7} {:>8}",
        "date", "seconds", "moves", "outcome", "mines", "width", "height"
    );
    for record in records {
        match record {
            Ok(record) => println!(
                "{:<20} {:>10.2} {:>7} {:>8} {:>7} {:>7} {:>8}",
                record.started_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                record.elapsed_secs,
                record.moves,
                record.outcome,
                record.mines,
                record.width,
                record.height
            ),
            Err(err) => {
                log::error!("statistics listing aborted: {err}");
                println!("The statistics file is damaged: {err}");
                return;
            }
        }
    }
}
