use pairflip_core::{Board, Hud};
use std::io::{self, Write};

const CELL_WIDTH: usize = 6;

/// Draws the HUD and the grid as plain text.
pub(crate) fn render<I: AsRef<str>>(
    out: &mut impl Write,
    board: &Board<I>,
    hud: &Hud,
) -> io::Result<()> {
    writeln!(out)?;
    write!(
        out,
        "Moves: {}   Time: {}   Hints left (H): {}",
        hud.moves,
        hud.elapsed_label(),
        hud.hints_remaining
    )?;
    if let Some(best_moves) = hud.best.best_moves {
        write!(out, "   Best Moves: {}", best_moves)?;
    }
    if let Some(best_time) = hud.best_time_label() {
        write!(out, "   Best Time: {}", best_time)?;
    }
    writeln!(out)?;

    let (_, cols) = board.size();
    write!(out, "   ")?;
    for col in 1..=cols {
        write!(out, " {:^width$} ", col, width = CELL_WIDTH)?;
    }
    writeln!(out)?;

    for ((row, col), card) in board.cards() {
        if col == 0 {
            write!(out, "{:>2} ", row + 1)?;
        }
        let label = fit(board.image_for(card).as_ref());
        write!(out, "[{:^width$}]", label, width = CELL_WIDTH)?;
        if col + 1 == cols {
            writeln!(out)?;
        }
    }

    if hud.finished {
        writeln!(out)?;
        writeln!(out, "*** You Win! ***")?;
    }
    out.flush()
}

fn fit(label: &str) -> String {
    label.chars().take(CELL_WIDTH).collect()
}
