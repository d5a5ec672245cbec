use crate::component::short_video_mover::Controller;
use crate::config::Config;
use crate::menu::handlers::run_short_video_mover;
use crate::tools::{DurationProbe, ProbeBackend};
use anyhow::Result;
use console::{Term, style};
use dialoguer::Select;
use dialoguer::theme::ColorfulTheme;
use std::sync::Arc;

pub fn show_main_menu(
    term: &Term,
    config: &Config,
    controller: &Arc<Controller>,
    probe: &Arc<dyn DurationProbe>,
    backend: ProbeBackend,
) -> Result<bool> {
    term.clear_screen()?;

    println!("{}", style("=== Short Video Mover ===").cyan().bold());
    println!(
        "{}",
        style(format!("Duration backend: {backend} | Esc to exit")).dim()
    );

    let options = vec!["Move short videos", "Exit"];

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Choose an action")
        .items(&options)
        .default(0)
        .interact_on_opt(term)?;

    match selection {
        Some(0) => {
            run_short_video_mover(term, config, controller, probe)?;
            Ok(true)
        }
        Some(1) | None => Ok(false),
        _ => unreachable!(),
    }
}
