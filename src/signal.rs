use crate::component::short_video_mover::Controller;
use console::Term;
use std::process;
use std::sync::Arc;

/// Ctrl-C 在執行中（包含停止中）會請求停止，閒置或已完成時才結束程式
pub fn setup_stop_signal(controller: &Arc<Controller>) {
    let controller = Arc::clone(controller);

    ctrlc::set_handler(move || {
        if controller.request_stop() {
            eprintln!("\nStop requested, finishing the current file...");
        } else if !controller.is_running() {
            let _ = Term::stdout().show_cursor();
            process::exit(130);
        }
    })
    .expect("failed to install Ctrl-C handler");
}
