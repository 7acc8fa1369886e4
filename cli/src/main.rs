//! # slide48
//!
//! Terminal front end for the 2048 board engine: colored rendering, raw-mode
//! keystroke input, one-level undo and a persistent high-score list.

use clap::Parser;
use log::{info, warn};
use slide48_core::scoreboard::Scoreboard;
use slide48_core::{Direction, Game, SIZE, WINNING_TILE};
use std::io::{self, Read, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "slide48")]
#[command(author, version, about = "Play 2048 in the terminal")]
struct Args {
    /// Random seed for a reproducible game
    #[arg(short, long)]
    seed: Option<u64>,

    /// High-score file
    #[arg(long, default_value = "scores.txt")]
    scores: PathBuf,
}

/// One user command per turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Move(Direction),
    Undo,
    Quit,
    Unknown,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(rand::random);
    info!("new game, seed {}", seed);

    let scoreboard = Scoreboard::new(&args.scores);
    let mut game = Game::new(seed);

    enable_raw_mode();
    show_welcome();
    play(&mut game);
    disable_raw_mode();

    info!(
        "game ended: score {}, max tile {}",
        game.score(),
        game.max_tile()
    );
    finish(&game, &scoreboard);
}

/// Turn loop: render, announce the win once, stop on a terminal board,
/// otherwise read one command and dispatch it.
fn play(game: &mut Game) {
    let mut stdin = io::stdin();
    let mut buffer = [0u8; 3];
    let mut won_announced = false;
    let mut notice: Option<String> = None;

    loop {
        draw(game, notice.take().as_deref());

        if !won_announced && game.has_reached(WINNING_TILE) {
            won_announced = true;
            println!(
                "\n  {}{}You reached {}! Keep going!{}",
                YELLOW, BOLD, WINNING_TILE, RESET
            );
        }

        if game.is_terminal() {
            println!(
                "\n  GAME OVER! Final score: {}{}{}{}",
                BOLD,
                YELLOW,
                game.score(),
                RESET
            );
            return;
        }

        let bytes_read = stdin.read(&mut buffer).unwrap_or(0);
        if bytes_read == 0 {
            continue;
        }

        match parse_input(&buffer[..bytes_read]) {
            Command::Move(direction) => {
                let result = game.step(direction);
                if !result.changed {
                    notice = Some("No movement!".to_string());
                } else if result.gain > 0 {
                    notice = Some(format!("+{} points!", result.gain));
                }
            }
            Command::Undo => {
                if !game.undo() {
                    notice = Some("Nothing to undo!".to_string());
                }
            }
            Command::Quit => return,
            Command::Unknown => {
                notice = Some("Invalid key! Use w/a/s/d, arrows, u, q.".to_string());
            }
        }
    }
}

/// Prompt for a name on a cooked-mode line read and persist the score, then
/// show the ranked scoreboard. All failures are notices, never fatal.
fn finish(game: &Game, scoreboard: &Scoreboard) {
    println!(
        "\n  Final score: {}{}{}{}",
        BOLD,
        YELLOW,
        game.score(),
        RESET
    );
    print!("  Enter your name to save (blank to skip): ");
    io::stdout().flush().unwrap();

    let mut name = String::new();
    if io::stdin().read_line(&mut name).is_ok() {
        let name = name.trim();
        if !name.is_empty() {
            if let Err(err) = scoreboard.append(name, game.score()) {
                warn!("could not save score to {:?}: {}", scoreboard.path(), err);
                println!("  Could not save score: {}", err);
            }
        }
    }

    show_scores(scoreboard);
    println!("\n  Thanks for playing!");
}

fn show_scores(scoreboard: &Scoreboard) {
    println!("\n  {}{}== SCOREBOARD =={}", YELLOW, BOLD, RESET);
    let ranked = match scoreboard.ranked() {
        Ok(entries) => entries,
        Err(err) => {
            warn!("could not read scoreboard {:?}: {}", scoreboard.path(), err);
            println!("  Could not read scores: {}", err);
            return;
        }
    };

    if ranked.is_empty() {
        println!("  No scores yet.");
        return;
    }

    const MEDALS: [&str; 3] = ["🥇", "🥈", "🥉"];
    for (i, entry) in ranked.iter().take(10).enumerate() {
        let medal = MEDALS.get(i).copied().unwrap_or("  ");
        println!(
            "  {} {:<15}  {}{}{}{}",
            medal, entry.name, BOLD, YELLOW, entry.score, RESET
        );
    }
}

fn parse_input(bytes: &[u8]) -> Command {
    match bytes {
        // Arrow keys (escape sequences)
        [27, 91, 65] => Command::Move(Direction::Up),
        [27, 91, 66] => Command::Move(Direction::Down),
        [27, 91, 67] => Command::Move(Direction::Right),
        [27, 91, 68] => Command::Move(Direction::Left),

        // WASD keys
        [b'w'] | [b'W'] => Command::Move(Direction::Up),
        [b's'] | [b'S'] => Command::Move(Direction::Down),
        [b'a'] | [b'A'] => Command::Move(Direction::Left),
        [b'd'] | [b'D'] => Command::Move(Direction::Right),

        [b'u'] | [b'U'] => Command::Undo,

        // q, Q, Ctrl+C, Esc
        [b'q'] | [b'Q'] | [3] | [27] => Command::Quit,

        _ => Command::Unknown,
    }
}

// =============================================================================
// Rendering
// =============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const YELLOW: &str = "\x1b[38;5;226m";

/// Inner width of one board cell, in columns.
const CELL_WIDTH: usize = 7;

const BANNER: &str = "\
  ██████╗ ██████╗ ██╗  ██╗ █████╗
  ╚════██╗██╔═══██╗██║  ██║██╔══██╗
   █████╔╝██║   ██║███████║╚█████╔╝
  ██╔═══╝ ██║   ██║╚════██║██╔══██╗
  ███████╗╚██████╔╝     ██║╚█████╔╝
  ╚══════╝ ╚═════╝      ╚═╝ ╚════╝ ";

/// ANSI style for one tile value.
struct TileStyle {
    bg: &'static str,
    fg: &'static str,
}

/// Pure mapping from tile value to display style; the engine knows nothing
/// about presentation.
fn tile_style(value: u16) -> TileStyle {
    let (bg, fg) = match value {
        2 => ("\x1b[48;5;229m", "\x1b[30m"),
        4 => ("\x1b[48;5;223m", "\x1b[30m"),
        8 => ("\x1b[48;5;214m", "\x1b[30m"),
        16 => ("\x1b[48;5;202m", "\x1b[97m"),
        32 => ("\x1b[48;5;196m", "\x1b[97m"),
        64 => ("\x1b[48;5;200m", "\x1b[97m"),
        128 => ("\x1b[48;5;135m", "\x1b[97m"),
        256 => ("\x1b[48;5;63m", "\x1b[97m"),
        512 => ("\x1b[48;5;45m", "\x1b[30m"),
        1024 => ("\x1b[48;5;42m", "\x1b[30m"),
        2048 => ("\x1b[48;5;226m", "\x1b[30m"),
        _ => ("\x1b[48;5;240m", "\x1b[37m"),
    };
    TileStyle { bg, fg }
}

/// Clear the screen and draw the banner, score bar, board and key hints,
/// plus an optional one-turn notice under the board.
fn draw(game: &Game, notice: Option<&str>) {
    let mut screen = String::from("\x1b[2J\x1b[H\n");
    screen.push_str(&format!("{}{}{}{}\n\n", BOLD, YELLOW, BANNER, RESET));
    screen.push_str(&format!(
        "  {}SCORE{}  {}{}{:>6}{}\n\n",
        BOLD,
        RESET,
        YELLOW,
        BOLD,
        game.score(),
        RESET
    ));

    screen.push_str(&grid_rule("╔", "╦", "╗"));
    for row in 0..SIZE {
        screen.push_str("  ║");
        for col in 0..SIZE {
            screen.push_str(&cell(game.board()[row * SIZE + col]));
            screen.push('║');
        }
        screen.push('\n');
        if row + 1 < SIZE {
            screen.push_str(&grid_rule("╠", "╬", "╣"));
        }
    }
    screen.push_str(&grid_rule("╚", "╩", "╝"));

    screen.push_str(&format!(
        "\n  {}w/↑=Up  a/←=Left  s/↓=Down  d/→=Right  u=Undo  q=Quit{}\n",
        DIM, RESET
    ));
    if let Some(notice) = notice {
        screen.push_str(&format!("\n  {}\n", notice));
    }

    print!("{}", screen);
    io::stdout().flush().unwrap();
}

/// One horizontal border line of the board.
fn grid_rule(left: &str, mid: &str, right: &str) -> String {
    let mut line = String::from("  ");
    line.push_str(left);
    for col in 0..SIZE {
        line.push_str(&"═".repeat(CELL_WIDTH));
        line.push_str(if col + 1 < SIZE { mid } else { right });
    }
    line.push('\n');
    line
}

/// The styled interior of one cell.
fn cell(value: u16) -> String {
    if value == 0 {
        return format!("   {}·{}   ", DIM, RESET);
    }
    let style = tile_style(value);
    format!(
        "{}{}{}{:^width$}{}",
        style.bg,
        style.fg,
        BOLD,
        value,
        RESET,
        width = CELL_WIDTH
    )
}

fn show_welcome() {
    print!("\x1b[2J\x1b[H\n");
    println!("{}{}{}{}\n", BOLD, YELLOW, BANNER, RESET);
    println!(
        "  Combine tiles to reach {}{}{}{}.\n",
        YELLOW, BOLD, WINNING_TILE, RESET
    );
    println!("  Controls:");
    println!("    w / ↑   Move Up");
    println!("    s / ↓   Move Down");
    println!("    a / ←   Move Left");
    println!("    d / →   Move Right");
    println!("    u       Undo last move");
    println!("    q       Quit");
    print!("\n  Press any key to start...");
    io::stdout().flush().unwrap();

    let mut byte = [0u8; 1];
    let _ = io::stdin().read(&mut byte);
}

// =============================================================================
// Terminal raw mode (platform-specific)
// =============================================================================

#[cfg(unix)]
fn enable_raw_mode() {
    use std::os::unix::io::AsRawFd;
    unsafe {
        let fd = io::stdin().as_raw_fd();
        let mut termios: libc::termios = std::mem::zeroed();
        libc::tcgetattr(fd, &mut termios);
        termios.c_lflag &= !(libc::ICANON | libc::ECHO);
        termios.c_cc[libc::VMIN] = 1;
        termios.c_cc[libc::VTIME] = 0;
        libc::tcsetattr(fd, libc::TCSANOW, &termios);
    }
}

#[cfg(unix)]
fn disable_raw_mode() {
    use std::os::unix::io::AsRawFd;
    unsafe {
        let fd = io::stdin().as_raw_fd();
        let mut termios: libc::termios = std::mem::zeroed();
        libc::tcgetattr(fd, &mut termios);
        termios.c_lflag |= libc::ICANON | libc::ECHO;
        libc::tcsetattr(fd, libc::TCSANOW, &termios);
    }
}

#[cfg(not(unix))]
fn enable_raw_mode() {
    // Without raw mode, interactive play requires Enter after each key
}

#[cfg(not(unix))]
fn disable_raw_mode() {}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arrows() {
        assert_eq!(parse_input(&[27, 91, 65]), Command::Move(Direction::Up));
        assert_eq!(parse_input(&[27, 91, 66]), Command::Move(Direction::Down));
        assert_eq!(parse_input(&[27, 91, 67]), Command::Move(Direction::Right));
        assert_eq!(parse_input(&[27, 91, 68]), Command::Move(Direction::Left));
    }

    #[test]
    fn test_parse_letters_case_insensitive() {
        assert_eq!(parse_input(b"w"), Command::Move(Direction::Up));
        assert_eq!(parse_input(b"S"), Command::Move(Direction::Down));
        assert_eq!(parse_input(b"a"), Command::Move(Direction::Left));
        assert_eq!(parse_input(b"D"), Command::Move(Direction::Right));
        assert_eq!(parse_input(b"u"), Command::Undo);
        assert_eq!(parse_input(b"U"), Command::Undo);
        assert_eq!(parse_input(b"q"), Command::Quit);
        assert_eq!(parse_input(b"Q"), Command::Quit);
    }

    #[test]
    fn test_parse_rejects_everything_else() {
        assert_eq!(parse_input(b"x"), Command::Unknown);
        assert_eq!(parse_input(b"1"), Command::Unknown);
        assert_eq!(parse_input(&[27, 91, 90]), Command::Unknown);
    }

    #[test]
    fn test_every_tile_value_has_a_style() {
        for value in [2u16, 4, 8, 16, 32, 64, 128, 256, 512, 1024, 2048, 4096] {
            let style = tile_style(value);
            assert!(style.bg.starts_with("\x1b["));
            assert!(style.fg.starts_with("\x1b["));
        }
    }
}
