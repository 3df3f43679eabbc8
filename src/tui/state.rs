use crate::activity::{LogStore, SystemStatus};
use crate::config::ScheduleConfig;
use std::time::Instant;

/// Session state shared between the controller and the dashboard.
#[derive(Debug, Clone)]
pub struct AppState {
    pub logs: LogStore,
    pub status: SystemStatus,
    /// A run is in flight.
    pub busy: bool,
    /// At least one primary credential was present at startup.
    pub env_loaded: bool,
    pub schedule: ScheduleConfig,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(schedule: ScheduleConfig) -> Self {
        Self {
            logs: LogStore::new(),
            status: SystemStatus::Inactive,
            busy: false,
            env_loaded: false,
            schedule,
            start_time: Instant::now(),
        }
    }

    /// Back to an empty log and inactive status. `busy` is left alone: it
    /// is owned by the guard of the run in flight and clears when that run ends.
    pub fn reset(&mut self) {
        self.logs.clear();
        self.status = SystemStatus::Inactive;
    }

    pub fn uptime(&self) -> String {
        let secs = self.start_time.elapsed().as_secs();
        let h = secs / 3600;
        let m = (secs % 3600) / 60;
        format!("{}h {:02}m", h, m)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ScheduleConfig::default())
    }
}

/// Dashboard-local view state; never shared with the controller.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// Lines scrolled up from the newest log entry.
    pub log_scroll_offset: usize,
    pub spinner_frame: u8,
}

impl ViewState {
    pub fn scroll_up(&mut self, by: usize) {
        self.log_scroll_offset = self.log_scroll_offset.saturating_add(by);
    }

    pub fn scroll_down(&mut self, by: usize) {
        self.log_scroll_offset = self.log_scroll_offset.saturating_sub(by);
    }

    /// Pin the offset to the oldest full page; called on every redraw.
    pub fn clamp_scroll(&mut self, max_offset: usize) {
        self.log_scroll_offset = self.log_scroll_offset.min(max_offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::LogKind;

    #[test]
    fn test_reset_clears_session_fields() {
        let mut state = AppState::default();
        state.logs.append("x", LogKind::Info);
        state.status = SystemStatus::Error;
        state.busy = true;
        state.env_loaded = true;

        state.reset();
        assert!(state.logs.is_empty());
        assert_eq!(state.status, SystemStatus::Inactive);
        assert!(state.busy);
        assert!(state.env_loaded);
    }

    #[test]
    fn test_clamp_scroll() {
        let mut view = ViewState {
            log_scroll_offset: usize::MAX,
            spinner_frame: 0,
        };
        view.clamp_scroll(30);
        assert_eq!(view.log_scroll_offset, 30);
        view.scroll_down(1);
        assert_eq!(view.log_scroll_offset, 29);
        view.clamp_scroll(40);
        assert_eq!(view.log_scroll_offset, 29);
    }

    #[test]
    fn test_scroll_saturates_at_bottom() {
        let mut view = ViewState::default();
        view.scroll_down(5);
        assert_eq!(view.log_scroll_offset, 0);
        view.scroll_up(3);
        view.scroll_down(1);
        assert_eq!(view.log_scroll_offset, 2);
    }
}
