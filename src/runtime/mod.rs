use std::env;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::app::App;
use crate::audio::StreamingPlayer;
use crate::error::Result;
use crate::library::LibraryClient;
use crate::logging;

mod event_loop;
mod settings;
mod shortcuts;
mod startup;

use startup::LaunchTarget;

pub fn run() -> Result<()> {
    let target = startup::parse_args(env::args().skip(1))?;
    let settings = settings::load_settings();

    match target {
        LaunchTarget::Help => {
            println!("{}", startup::USAGE);
            return Ok(());
        }
        LaunchTarget::PrintConfig => {
            print!("{}", settings.to_toml()?);
            return Ok(());
        }
        _ => {}
    }

    if let Some(path) = logging::init(&settings.logging)? {
        info!(log = %path.display(), server = %settings.server.base_url, "starting encore");
    }

    let client = LibraryClient::new(&settings.server);
    let mut player = StreamingPlayer::open(&client, &settings)?;
    startup::start_playback(&target, &client, player.engine_mut())?;

    let mut app = App::new(settings.ui.follow_playback);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut app, &mut player);

    player.shutdown();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
