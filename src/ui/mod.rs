pub mod app;
mod draw;

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;

use self::app::{App, Outcome};
use crate::services::github::GitHubClient;
use crate::services::store::CriteriaStore;

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

pub async fn run(client: GitHubClient, store: CriteriaStore) -> Result<()> {
    let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
    let mut app = App::new(client, store, outcome_tx);

    let mut terminal = enter_terminal()?;
    let result = event_loop(&mut terminal, &mut app, outcome_rx).await;
    exit_terminal(&mut terminal)?;
    result
}

async fn event_loop(
    terminal: &mut Tui,
    app: &mut App,
    mut outcome_rx: mpsc::UnboundedReceiver<Outcome>,
) -> Result<()> {
    // crossterm's blocking read runs on its own thread and feeds the async
    // loop through a channel.
    let (input_tx, mut input_rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        while let Ok(event) = crossterm::event::read() {
            if input_tx.send(event).is_err() {
                break;
            }
        }
    });

    let mut tick = tokio::time::interval(Duration::from_millis(100));
    let mut spinner_frame = 0usize;

    loop {
        terminal.draw(|f| draw::draw(f, app, spinner_frame))?;

        tokio::select! {
            Some(event) = input_rx.recv() => {
                if let Event::Key(key) = event {
                    if key.kind == KeyEventKind::Press {
                        app.handle_key(key);
                    }
                }
            }
            Some(outcome) = outcome_rx.recv() => app.apply_outcome(outcome),
            _ = tick.tick() => spinner_frame = spinner_frame.wrapping_add(1),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn enter_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    Ok(terminal)
}

fn exit_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
