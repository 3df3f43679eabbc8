pub mod render;
pub mod state;

use crate::controller::Controller;
use crate::error::PipelineError;
use anyhow::Result;
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use futures_util::StreamExt;
use ratatui::prelude::*;
use state::{AppState, ViewState};
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;

/// Commands the TUI can send back to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuiCommand {
    RunMock,
    RunReal,
    ShowEnv,
    ClearLogs,
    Quit,
}

/// Run the TUI. Reads state from `state_rx`, sends commands on `cmd_tx`.
pub async fn run_tui(
    state_rx: watch::Receiver<AppState>,
    cmd_tx: mpsc::Sender<TuiCommand>,
) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = tui_loop(&mut terminal, state_rx, cmd_tx).await;

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn tui_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    mut state_rx: watch::Receiver<AppState>,
    cmd_tx: mpsc::Sender<TuiCommand>,
) -> Result<()> {
    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(Duration::from_millis(100));
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut view = ViewState::default();

    loop {
        {
            let state = state_rx.borrow();
            terminal.draw(|f| render::draw(f, &state, &mut view))?;
        }

        tokio::select! {
            _ = tick.tick() => {
                view.spinner_frame = view.spinner_frame.wrapping_add(1);
            }
            changed = state_rx.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
            }
            event = events.next() => {
                let Some(event) = event else { return Ok(()) };
                if let Event::Key(key) = event? {
                    if key.kind == KeyEventKind::Press {
                        match key_command(key.code, &mut view) {
                            Some(TuiCommand::Quit) => {
                                let _ = cmd_tx.send(TuiCommand::Quit).await;
                                return Ok(());
                            }
                            Some(cmd) => {
                                let _ = cmd_tx.send(cmd).await;
                            }
                            None => {}
                        }
                    }
                }
            }
        }
    }
}

/// Map a key press to a controller command; scrolling is handled in place.
fn key_command(code: KeyCode, view: &mut ViewState) -> Option<TuiCommand> {
    match code {
        KeyCode::Char('q') => Some(TuiCommand::Quit),
        KeyCode::Char('m') => Some(TuiCommand::RunMock),
        KeyCode::Char('r') => Some(TuiCommand::RunReal),
        KeyCode::Char('e') => Some(TuiCommand::ShowEnv),
        KeyCode::Char('c') => {
            view.log_scroll_offset = 0;
            Some(TuiCommand::ClearLogs)
        }
        KeyCode::Char('k') | KeyCode::Up => {
            view.scroll_up(1);
            None
        }
        KeyCode::Char('j') | KeyCode::Down => {
            view.scroll_down(1);
            None
        }
        KeyCode::PageUp => {
            view.scroll_up(10);
            None
        }
        KeyCode::PageDown => {
            view.scroll_down(10);
            None
        }
        KeyCode::Char('g') => {
            view.log_scroll_offset = usize::MAX;
            None
        }
        KeyCode::Char('G') => {
            view.log_scroll_offset = 0;
            None
        }
        _ => None,
    }
}

/// Apply TUI commands to the controller until `Quit` or the channel closes.
///
/// Runs execute on their own tasks so the dashboard keeps redrawing while
/// they are suspended. Runs cannot be cancelled, so in-flight runs are
/// awaited before returning.
pub async fn dispatch_commands(controller: Arc<Controller>, mut cmd_rx: mpsc::Receiver<TuiCommand>) {
    let mut runs = JoinSet::new();

    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            TuiCommand::RunMock => {
                let c = controller.clone();
                runs.spawn(async move {
                    if let Err(PipelineError::RunInProgress) = c.run_mock_pipeline().await {
                        tracing::debug!("mock run ignored: already running");
                    }
                });
            }
            TuiCommand::RunReal => {
                let c = controller.clone();
                runs.spawn(async move {
                    if let Err(PipelineError::RunInProgress) = c.run_with_real_credentials().await {
                        tracing::debug!("credential run ignored: already running");
                    }
                });
            }
            TuiCommand::ShowEnv => {
                controller.show_config_status();
            }
            TuiCommand::ClearLogs => controller.clear_logs(),
            TuiCommand::Quit => break,
        }

        // Reap finished runs so the set does not grow.
        while let Some(done) = runs.try_join_next() {
            if let Err(e) = done {
                tracing::error!(error = %e, "run task panicked");
            }
        }
    }

    while let Some(done) = runs.join_next().await {
        if let Err(e) = done {
            tracing::error!(error = %e, "run task panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_keys() {
        let mut view = ViewState::default();
        assert_eq!(key_command(KeyCode::Char('m'), &mut view), Some(TuiCommand::RunMock));
        assert_eq!(key_command(KeyCode::Char('r'), &mut view), Some(TuiCommand::RunReal));
        assert_eq!(key_command(KeyCode::Char('e'), &mut view), Some(TuiCommand::ShowEnv));
        assert_eq!(key_command(KeyCode::Char('q'), &mut view), Some(TuiCommand::Quit));
        assert_eq!(key_command(KeyCode::Char('x'), &mut view), None);
    }

    #[test]
    fn test_scroll_keys_stay_local() {
        let mut view = ViewState::default();
        assert_eq!(key_command(KeyCode::Char('k'), &mut view), None);
        assert_eq!(key_command(KeyCode::Char('k'), &mut view), None);
        assert_eq!(view.log_scroll_offset, 2);
        key_command(KeyCode::Char('G'), &mut view);
        assert_eq!(view.log_scroll_offset, 0);
    }

    #[test]
    fn test_jump_to_top_then_down() {
        let mut view = ViewState::default();
        key_command(KeyCode::Char('g'), &mut view);
        // The next redraw pins the offset to the oldest page.
        view.clamp_scroll(30);
        for _ in 0..5 {
            key_command(KeyCode::Char('j'), &mut view);
        }
        assert_eq!(view.log_scroll_offset, 25);
        key_command(KeyCode::PageDown, &mut view);
        assert_eq!(view.log_scroll_offset, 15);
    }

    #[test]
    fn test_clear_resets_scroll() {
        let mut view = ViewState::default();
        view.scroll_up(4);
        assert_eq!(key_command(KeyCode::Char('c'), &mut view), Some(TuiCommand::ClearLogs));
        assert_eq!(view.log_scroll_offset, 0);
    }
}
