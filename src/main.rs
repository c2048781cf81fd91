// Defensive programming lints - prevent panics and unsafe patterns
#![deny(clippy::indexing_slicing)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::fallible_impl_from)]
#![warn(clippy::wildcard_enum_match_arm)]
#![warn(clippy::fn_params_excessive_bools)]
// Idiomatic Rust lints
#![warn(clippy::needless_return)]
#![warn(clippy::let_and_return)]
#![warn(clippy::must_use_candidate)]
#![warn(clippy::redundant_closure_for_method_calls)]
#![warn(clippy::map_unwrap_or)]
#![warn(clippy::explicit_iter_loop)]

mod app;
mod config;
mod logging;
mod pane;
mod services;
mod storage;
mod ui;

use app::{App, AppMode, AuthField, AuthStep, Focus};
use color_eyre::Result;
use crossterm::{
    event::{
        self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
        Event, KeyCode, KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
    layout::Rect,
};
use std::{
    io,
    time::{Duration, Instant},
};

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const WHEEL_LINES: usize = 3;

fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    // Load config
    let config = config::Config::load()?;

    match config.data_dir() {
        Ok(data_dir) => {
            if let Err(error) = logging::init(&config.logging, &data_dir) {
                eprintln!("Logging disabled: {}", error);
            }
        }
        Err(error) => eprintln!("Logging disabled: {}", error),
    }
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "parlor starting");

    // Check for command-line arguments
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 {
        return handle_cli_args(&args, &config);
    }

    let countries = services::countries::load_countries(config.auth.countries_url.as_deref());
    let mut app = App::new(config, countries);
    app.init_storage();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "event loop failed");
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn handle_cli_args(args: &[String], config: &config::Config) -> Result<()> {
    let cmd = args
        .get(1)
        .ok_or_else(|| color_eyre::eyre::eyre!("No command provided"))?;
    let program_name = args.first().map_or("parlor", String::as_str);

    match cmd.as_str() {
        "--help" | "-h" | "help" => print_help(program_name),
        "--version" | "-v" => println!("Parlor v{}", env!("CARGO_PKG_VERSION")),
        "countries" => {
            let countries =
                services::countries::load_countries(config.auth.countries_url.as_deref());
            for country in &countries {
                println!("{:<4} {}", country.code, country.label());
            }
        }
        "config-path" => println!("{}", config::Config::config_path()?.display()),
        cmd_str => {
            eprintln!("Unknown command: {}", cmd_str);
            eprintln!("Run with --help for available commands.");
            std::process::exit(1);
        }
    }
    Ok(())
}

fn print_help(program_name: &str) {
    println!("Parlor - terminal chatrooms with a simulated assistant");
    println!();
    println!("Usage: {} [command]", program_name);
    println!();
    println!("Commands:");
    println!("  countries    - Print the country list used at sign-in");
    println!("  config-path  - Print the configuration file location");
    println!("  --help       - Show this help");
    println!("  --version    - Show version");
    println!();
    println!("Run without arguments to start interactive mode.");
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        app.tick(Instant::now());

        let size = terminal.size()?;
        let areas = ui::ChatAreas::new(Rect::new(0, 0, size.width, size.height));
        let transcript = areas.transcript_inner();
        app.resize_transcript(transcript.width, transcript.height);

        terminal.draw(|f| ui::render(f, app))?;

        if app.should_quit {
            break;
        }

        // Poll for events with a timeout
        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle KeyPress events to avoid duplicate handling
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    let control_pressed = key.modifiers.contains(KeyModifiers::CONTROL);
                    if control_pressed && key.code == KeyCode::Char('c') {
                        app.should_quit = true;
                        continue;
                    }
                    if control_pressed && key.code == KeyCode::Char('d') {
                        app.toggle_dark_mode();
                        continue;
                    }

                    let now = Instant::now();
                    match app.mode {
                        AppMode::Auth => handle_auth_mode(app, key.code, now),
                        AppMode::Chat => handle_chat_mode(app, key.code, key.modifiers, now),
                        AppMode::CreateRoom => handle_create_room_mode(app, key.code),
                        AppMode::DeleteRoom => handle_delete_room_mode(app, key.code),
                        AppMode::Help => handle_help_mode(app, key.code),
                    }
                }
                Event::Mouse(mouse) => {
                    handle_mouse_event(app, mouse, areas);
                }
                Event::Paste(paste) => {
                    handle_paste(app, &paste);
                }
                Event::FocusGained | Event::FocusLost | Event::Resize(_, _) => {}
            }
        }
    }

    Ok(())
}

fn handle_auth_mode(app: &mut App, key_code: KeyCode, now: Instant) {
    match key_code {
        KeyCode::Enter => match app.auth.step {
            AuthStep::Phone => app.submit_phone(now),
            AuthStep::Otp => app.submit_otp(now),
            AuthStep::SendingOtp | AuthStep::Verifying | AuthStep::Verified => {}
        },
        KeyCode::Esc => app.back_to_phone(),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => app.toggle_auth_field(),
        KeyCode::Left if app.auth.field == AuthField::Country => app.previous_country(),
        KeyCode::Right if app.auth.field == AuthField::Country => app.next_country(),
        KeyCode::Char(character) => app.add_auth_char(character),
        KeyCode::Backspace => app.remove_auth_char(),
        KeyCode::Left
        | KeyCode::Right
        | KeyCode::Home
        | KeyCode::End
        | KeyCode::PageUp
        | KeyCode::PageDown
        | KeyCode::Delete
        | KeyCode::Insert
        | KeyCode::F(_)
        | KeyCode::Null
        | KeyCode::CapsLock
        | KeyCode::ScrollLock
        | KeyCode::NumLock
        | KeyCode::PrintScreen
        | KeyCode::Pause
        | KeyCode::Menu
        | KeyCode::KeypadBegin
        | KeyCode::Media(_)
        | KeyCode::Modifier(_) => {}
    }
}

fn handle_chat_mode(app: &mut App, key_code: KeyCode, modifiers: KeyModifiers, now: Instant) {
    let control_pressed = modifiers.contains(KeyModifiers::CONTROL);
    if control_pressed && key_code == KeyCode::Char('l') {
        app.logout();
        return;
    }

    // Transcript scrolling works from every focus
    match key_code {
        KeyCode::PageUp => {
            app.scroll_chat_up_page(now);
            return;
        }
        KeyCode::PageDown => {
            app.scroll_chat_down_page(now);
            return;
        }
        KeyCode::Up if control_pressed => {
            app.scroll_chat_up_lines(1, now);
            return;
        }
        KeyCode::Down if control_pressed => {
            app.scroll_chat_down_lines(1, now);
            return;
        }
        _ => {}
    }

    match app.focus {
        Focus::Sidebar => handle_sidebar_keys(app, key_code, now),
        Focus::Search => handle_search_keys(app, key_code),
        Focus::Composer => handle_composer_keys(app, key_code, modifiers, now),
    }
}

fn handle_sidebar_keys(app: &mut App, key_code: KeyCode, now: Instant) {
    match key_code {
        KeyCode::Up => app.previous_room(),
        KeyCode::Down => app.next_room(),
        KeyCode::Enter => app.open_highlighted_room(),
        KeyCode::Tab | KeyCode::Right => {
            if app.pane.active().is_some() {
                app.focus = Focus::Composer;
            }
        }
        KeyCode::Char('n') => app.open_create_room(),
        KeyCode::Char('d') | KeyCode::Delete => app.open_delete_room(),
        KeyCode::Char('/') => app.focus_search(),
        KeyCode::Char('?') => app.open_help(),
        KeyCode::Home => app.jump_to_top(now),
        KeyCode::End => app.jump_to_bottom(now),
        KeyCode::Esc => app.clear_search(),
        KeyCode::Char(_)
        | KeyCode::Backspace
        | KeyCode::Left
        | KeyCode::PageUp
        | KeyCode::PageDown
        | KeyCode::BackTab
        | KeyCode::Insert
        | KeyCode::F(_)
        | KeyCode::Null
        | KeyCode::CapsLock
        | KeyCode::ScrollLock
        | KeyCode::NumLock
        | KeyCode::PrintScreen
        | KeyCode::Pause
        | KeyCode::Menu
        | KeyCode::KeypadBegin
        | KeyCode::Media(_)
        | KeyCode::Modifier(_) => {}
    }
}

fn handle_search_keys(app: &mut App, key_code: KeyCode) {
    match key_code {
        KeyCode::Esc => app.clear_search(),
        KeyCode::Enter | KeyCode::Tab => app.focus = Focus::Sidebar,
        KeyCode::Up => app.previous_room(),
        KeyCode::Down => app.next_room(),
        KeyCode::Char(character) => app.add_search_char(character),
        KeyCode::Backspace => app.remove_search_char(),
        KeyCode::Left => app.room_search.move_left(),
        KeyCode::Right => app.room_search.move_right(),
        KeyCode::Home
        | KeyCode::End
        | KeyCode::PageUp
        | KeyCode::PageDown
        | KeyCode::BackTab
        | KeyCode::Delete
        | KeyCode::Insert
        | KeyCode::F(_)
        | KeyCode::Null
        | KeyCode::CapsLock
        | KeyCode::ScrollLock
        | KeyCode::NumLock
        | KeyCode::PrintScreen
        | KeyCode::Pause
        | KeyCode::Menu
        | KeyCode::KeypadBegin
        | KeyCode::Media(_)
        | KeyCode::Modifier(_) => {}
    }
}

fn handle_composer_keys(app: &mut App, key_code: KeyCode, modifiers: KeyModifiers, now: Instant) {
    match (key_code, modifiers) {
        (KeyCode::Char('v'), key_modifiers) if key_modifiers.contains(KeyModifiers::CONTROL) => {
            app.handle_chat_clipboard_image();
        }
        (KeyCode::Char('a'), key_modifiers) if key_modifiers.contains(KeyModifiers::CONTROL) => {
            app.composer.move_to_start();
        }
        (KeyCode::Char('e'), key_modifiers) if key_modifiers.contains(KeyModifiers::CONTROL) => {
            app.composer.move_to_end();
        }
        (KeyCode::Up, _) if app.composer.is_empty() => app.scroll_chat_up_lines(WHEEL_LINES, now),
        (KeyCode::Down, _) if app.composer.is_empty() => {
            app.scroll_chat_down_lines(WHEEL_LINES, now);
        }
        (KeyCode::Home, _) => app.jump_to_top(now),
        (KeyCode::End, _) => app.jump_to_bottom(now),
        (KeyCode::Esc, _) | (KeyCode::Tab, _) => app.focus = Focus::Sidebar,
        (KeyCode::Enter, _) => app.submit_composer(now),
        (KeyCode::Char(character), _) => app.add_composer_char(character),
        (KeyCode::Backspace, _) => app.remove_composer_char(),
        (KeyCode::Delete, _) => app.composer.delete_char(),
        (KeyCode::Left, _) => app.composer.move_left(),
        (KeyCode::Right, _) => app.composer.move_right(),
        (KeyCode::Up, _)
        | (KeyCode::Down, _)
        | (KeyCode::PageUp, _)
        | (KeyCode::PageDown, _)
        | (KeyCode::BackTab, _)
        | (KeyCode::Insert, _)
        | (KeyCode::F(_), _)
        | (KeyCode::Null, _)
        | (KeyCode::CapsLock, _)
        | (KeyCode::ScrollLock, _)
        | (KeyCode::NumLock, _)
        | (KeyCode::PrintScreen, _)
        | (KeyCode::Pause, _)
        | (KeyCode::Menu, _)
        | (KeyCode::KeypadBegin, _)
        | (KeyCode::Media(_), _)
        | (KeyCode::Modifier(_), _) => {}
    }
}

fn handle_create_room_mode(app: &mut App, key_code: KeyCode) {
    match key_code {
        KeyCode::Esc => app.cancel_create_room(),
        KeyCode::Enter => app.create_room(),
        KeyCode::Char(character) => app.add_title_char(character),
        KeyCode::Backspace => app.remove_title_char(),
        KeyCode::Left => app.room_title_input.move_left(),
        KeyCode::Right => app.room_title_input.move_right(),
        KeyCode::Delete => app.room_title_input.delete_char(),
        KeyCode::Up
        | KeyCode::Down
        | KeyCode::Home
        | KeyCode::End
        | KeyCode::PageUp
        | KeyCode::PageDown
        | KeyCode::Tab
        | KeyCode::BackTab
        | KeyCode::Insert
        | KeyCode::F(_)
        | KeyCode::Null
        | KeyCode::CapsLock
        | KeyCode::ScrollLock
        | KeyCode::NumLock
        | KeyCode::PrintScreen
        | KeyCode::Pause
        | KeyCode::Menu
        | KeyCode::KeypadBegin
        | KeyCode::Media(_)
        | KeyCode::Modifier(_) => {}
    }
}

fn handle_delete_room_mode(app: &mut App, key_code: KeyCode) {
    match key_code {
        KeyCode::Esc => app.cancel_delete_room(),
        KeyCode::Enter => app.submit_delete_dialog(),
        KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
            app.toggle_delete_choice();
        }
        KeyCode::Char(_)
        | KeyCode::Backspace
        | KeyCode::Up
        | KeyCode::Down
        | KeyCode::Home
        | KeyCode::End
        | KeyCode::PageUp
        | KeyCode::PageDown
        | KeyCode::Delete
        | KeyCode::Insert
        | KeyCode::F(_)
        | KeyCode::Null
        | KeyCode::CapsLock
        | KeyCode::ScrollLock
        | KeyCode::NumLock
        | KeyCode::PrintScreen
        | KeyCode::Pause
        | KeyCode::Menu
        | KeyCode::KeypadBegin
        | KeyCode::Media(_)
        | KeyCode::Modifier(_) => {}
    }
}

fn handle_help_mode(app: &mut App, key_code: KeyCode) {
    match key_code {
        KeyCode::Esc => app.close_help(),
        KeyCode::Char('q') | KeyCode::Char('?') => app.close_help(),
        KeyCode::Enter
        | KeyCode::Backspace
        | KeyCode::Up
        | KeyCode::Down
        | KeyCode::Left
        | KeyCode::Right
        | KeyCode::Home
        | KeyCode::End
        | KeyCode::PageUp
        | KeyCode::PageDown
        | KeyCode::Tab
        | KeyCode::BackTab
        | KeyCode::Delete
        | KeyCode::Insert
        | KeyCode::F(_)
        | KeyCode::Char(_)
        | KeyCode::Null
        | KeyCode::CapsLock
        | KeyCode::ScrollLock
        | KeyCode::NumLock
        | KeyCode::PrintScreen
        | KeyCode::Pause
        | KeyCode::Menu
        | KeyCode::KeypadBegin
        | KeyCode::Media(_)
        | KeyCode::Modifier(_) => {}
    }
}

fn handle_mouse_event(app: &mut App, mouse: event::MouseEvent, areas: ui::ChatAreas) {
    if app.mode != AppMode::Chat {
        return;
    }

    let now = Instant::now();
    let over_transcript = ui::contains(areas.transcript, mouse.column, mouse.row);
    match mouse.kind {
        event::MouseEventKind::Down(event::MouseButton::Left) => {
            if over_transcript {
                app.copy_latest_reply();
            }
        }
        event::MouseEventKind::ScrollUp => {
            if over_transcript {
                app.scroll_chat_up_lines(WHEEL_LINES, now);
            } else {
                app.previous_room();
            }
        }
        event::MouseEventKind::ScrollDown => {
            if over_transcript {
                app.scroll_chat_down_lines(WHEEL_LINES, now);
            } else {
                app.next_room();
            }
        }
        event::MouseEventKind::ScrollLeft | event::MouseEventKind::ScrollRight => {
            // Ignore horizontal scrolling
        }
        event::MouseEventKind::Down(_)
        | event::MouseEventKind::Up(_)
        | event::MouseEventKind::Drag(_)
        | event::MouseEventKind::Moved => {}
    }
}

fn handle_paste(app: &mut App, paste: &str) {
    let text = paste.replace(['\n', '\r'], "");
    if text.is_empty() {
        return;
    }

    match app.mode {
        AppMode::Auth => {
            for character in text.chars() {
                app.add_auth_char(character);
            }
        }
        AppMode::Chat => match app.focus {
            Focus::Composer => app.handle_chat_paste(&text),
            Focus::Search => {
                for character in text.chars() {
                    app.add_search_char(character);
                }
            }
            Focus::Sidebar => {}
        },
        AppMode::CreateRoom => {
            for character in text.chars() {
                app.add_title_char(character);
            }
        }
        AppMode::DeleteRoom | AppMode::Help => {}
    }
}
