use std::io;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::Result;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    crossterm::{
        event::Event,
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
};

use gst::app::{App, Command};
use gst::config::{Args, Config};
use gst::git::GitClient;
use gst::worker::GitTasks;
use gst::{logging, ui};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load()?;

    logging::init_logging(config.debug.unwrap_or(false))?;
    color_eyre::install()?;

    let dir = args.working_dir();
    log::info!("starting gst in {dir:?}");

    let client = GitClient::new(dir, config.deadlines());
    let mut tasks = GitTasks::new(client);
    let mut app = App::new(config.keymap()?);
    tasks.spawn_status();

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;
    let _ = terminal.clear();

    let result = run(&mut terminal, &mut app, &mut tasks).await;

    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    let _ = terminal.clear();

    log::info!("shutdown complete");
    result
}

/// The cooperative event loop: drain task completions, draw, then poll the
/// terminal briefly so worker events keep flowing while the user is idle.
async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tasks: &mut GitTasks,
) -> Result<()> {
    loop {
        while let Some(event) = tasks.try_next_event() {
            if let Some(command) = app.apply_event(event) {
                tasks.dispatch(command);
            }
        }

        terminal.draw(|f| ui::render(f, app))?;

        if crossterm::event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = crossterm::event::read()? {
                match app.handle_key(key) {
                    Some(Command::Quit) => return Ok(()),
                    Some(command) => tasks.dispatch(command),
                    None => {}
                }
            }
        }
    }
}
