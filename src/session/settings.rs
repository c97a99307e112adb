/// Who is taking the attempt, as entered on the start form.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Candidate {
    pub name: String,
    pub email: String,
}

/// Caller-supplied parameters for one attempt.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub requested_count: usize,
    pub time_limit_minutes: u32,
    pub candidate: Candidate,
}

impl SessionConfig {
    pub fn time_limit_seconds(&self) -> u64 {
        u64::from(self.time_limit_minutes.max(1)) * 60
    }
}

/// Behavior switches covering what used to be forked copies of the widget
/// script: one controller, three toggles.
#[derive(Clone, Copy, Debug)]
pub struct Features {
    pub enable_gate_window: bool,
    pub enable_admin_password: bool,
    pub csv_fallback_on_error: bool,
}

impl Default for Features {
    fn default() -> Self {
        Features {
            enable_gate_window: true,
            enable_admin_password: true,
            csv_fallback_on_error: false,
        }
    }
}
