use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseEventKind, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use chaser_game::display::{ScoreDisplay, TerminalSurface};
use chaser_game::entities::KeyState;
use chaser_game::{GameError, Session, Settings};

// ── Held-key tracking ─────────────────────────────────────────────────────────

/// A key counts as held if its last press/repeat event arrived within this
/// many ticks. Covers terminals that never send release events: OS key
/// repeat fires at 15 Hz or faster, so ~8 ticks at 60 Hz (≈133 ms) is
/// always refreshed before it runs out.
const HOLD_WINDOW: u64 = 8;

/// Returns true if any of `keys` was seen within the last `HOLD_WINDOW` ticks.
fn is_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|key| {
        key_frame
            .get(key)
            .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    })
}

fn key_state(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> KeyState {
    KeyState {
        up: is_held(key_frame, &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')], frame),
        down: is_held(key_frame, &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')], frame),
        left: is_held(key_frame, &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')], frame),
        right: is_held(key_frame, &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')], frame),
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.
///
/// Input model: rather than acting on each key event, keep the frame each
/// key was last seen and rebuild a `KeyState` snapshot once per tick, so the
/// simulation only ever reads plain flags.
fn game_loop<W: Write>(
    surface: &mut TerminalSurface<W>,
    session: &mut Session,
    settings: &Settings,
    rx: &mpsc::Receiver<Event>,
) -> Result<(), GameError> {
    let mut rng = match settings.seed {
        Some(seed) => {
            info!("Seeding RNG with {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };
    let interval = settings.tick_interval();

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    surface.show_scores(&session.scoreboard)?;
    session.reset_session(surface)?;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => match kind {
                    KeyEventKind::Press => {
                        key_frame.insert(code, frame);
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                return Ok(());
                            }
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(());
                            }
                            KeyCode::Char(' ') | KeyCode::Char('p') | KeyCode::Char('P') => {
                                session.toggle();
                            }
                            KeyCode::Char('r') | KeyCode::Char('R') => {
                                session.reset_session(surface)?;
                            }
                            _ => {}
                        }
                    }
                    KeyEventKind::Repeat => {
                        key_frame.insert(code, frame);
                    }
                    KeyEventKind::Release => {
                        key_frame.remove(&code);
                    }
                },
                Event::Mouse(mouse) if matches!(mouse.kind, MouseEventKind::Down(_)) => {
                    session.toggle();
                }
                Event::Resize(cols, rows) => {
                    surface.resize(cols, rows);
                    chaser_game::display::render(surface, &session.board, &session.entities)?;
                }
                _ => {}
            }
        }

        if session.is_running() {
            let keys = key_state(&key_frame, frame);
            if let Err(e) = session.tick(&keys, &mut rng, surface) {
                warn!("Tick {} skipped: {}", session.frame, e);
            }
        }
        surface.show_running(session.is_running())?;

        let elapsed = frame_start.elapsed();
        if elapsed < interval {
            thread::sleep(interval - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<(), GameError> {
    env_logger::init();

    let settings = Settings::from_env(std::env::args().nth(1))?;
    let mut session = Session::new(&settings)?;

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Ask for key-release events; terminals without the kitty protocol
    // fall back to the hold window.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking event reads live on their own thread so a tick never waits on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let (cols, rows) = terminal::size()?;
    let mut surface = TerminalSurface::new(out, cols, rows);
    let result = game_loop(&mut surface, &mut session, &settings, &rx);
    if let Err(e) = &result {
        error!("Game loop failed: {}", e);
    }

    // Always restore the terminal
    let out = surface.writer();
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!(
        "Final score: {} wins, {} losses",
        session.scoreboard.win, session.scoreboard.lose
    );
    result
}
