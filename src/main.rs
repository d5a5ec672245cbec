use anyhow::Result;
use console::{Term, style};
use log::{info, warn};
use short_video_mover::component::short_video_mover::Controller;
use short_video_mover::config::Config;
use short_video_mover::init;
use short_video_mover::menu::show_main_menu;
use short_video_mover::signal::setup_stop_signal;
use short_video_mover::tools::{DurationProbe, ProbeBackend};
use std::process;
use std::sync::Arc;

fn main() -> Result<()> {
    init::init();

    let Some(backend) = ProbeBackend::detect() else {
        eprintln!(
            "{} no duration probing tool found (ffprobe or mediainfo).",
            style("Error:").red().bold()
        );
        eprintln!("{}", ProbeBackend::install_hint());
        process::exit(1);
    };
    info!("Using duration backend: {backend}");

    let config = Config::new()?;
    let probe: Arc<dyn DurationProbe> = Arc::from(backend.into_probe());
    let controller = Arc::new(Controller::new(config.file_type_table.clone()));
    setup_stop_signal(&controller);

    let term = Term::stdout();
    loop {
        match show_main_menu(&term, &config, &controller, &probe, backend) {
            Ok(true) => {}
            Ok(false) => {
                term.clear_screen()?;
                println!("\n{}", style("Goodbye!").green().bold());
                info!("Program exited normally");
                break;
            }
            Err(e) => {
                warn!("Program error: {e}");
                eprintln!("{} {}", style("Error:").red().bold(), e);
                break;
            }
        }
    }

    Ok(())
}
