use crate::component::ShortVideoMover;
use crate::component::short_video_mover::Controller;
use crate::config::Config;
use crate::pause;
use crate::tools::DurationProbe;
use anyhow::Result;
use console::{Term, style};
use std::sync::Arc;

pub fn run_short_video_mover(
    term: &Term,
    config: &Config,
    controller: &Arc<Controller>,
    probe: &Arc<dyn DurationProbe>,
) -> Result<()> {
    let mover = ShortVideoMover::new(config.clone(), Arc::clone(controller), Arc::clone(probe));

    if let Err(e) = mover.run() {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
    }

    pause(term)?;
    Ok(())
}
