use super::theme::Theme;
use crossterm::{
    ExecutableCommand,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode, size},
    tty::IsTty,
};
use std::io::{self, stdout};

/// Minimum size the month view lays out cleanly in.
pub const MIN_COLUMNS: u16 = 80;
pub const MIN_ROWS: u16 = 20;

/// Walks through everything the calendar view needs from the terminal.
pub fn check_terminal(theme: &Theme) -> io::Result<()> {
    let ok = |text: &str| println!("{}", theme.palette.success.paint(&format!("✓ {text}")));
    let fail = |text: &str| println!("{}", theme.palette.error.paint(&format!("✗ {text}")));

    println!("Testing terminal capabilities...");

    if IsTty::is_tty(&stdout()) {
        ok("Running in a TTY");
    } else {
        fail("Not running in a TTY");
        return Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "Terminal interface requires a TTY",
        ));
    }

    let (columns, rows) = size()?;
    if columns >= MIN_COLUMNS && rows >= MIN_ROWS {
        ok(&format!("Terminal is {columns}x{rows}"));
    } else {
        fail(&format!(
            "Terminal is {columns}x{rows}, the calendar needs at least {MIN_COLUMNS}x{MIN_ROWS}"
        ));
    }

    enable_raw_mode()?;
    if let Err(e) = stdout().execute(EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e);
    }
    stdout().execute(LeaveAlternateScreen)?;
    disable_raw_mode()?;
    ok("Raw mode and alternate screen work");

    println!("Mood glyphs should look like faces: {}", mood_sample());
    Ok(())
}

fn mood_sample() -> String {
    crate::domain::Mood::ALL
        .iter()
        .map(|mood| mood.glyph())
        .collect::<Vec<_>>()
        .join(" ")
}
