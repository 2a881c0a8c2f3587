use dayboard_core::Planner;

/// Shared application state: the session's planner. The planner is
/// internally shared, so cloning the state per request is cheap.
#[derive(Clone)]
pub struct AppState {
    planner: Planner,
}

impl AppState {
    pub fn new(planner: Planner) -> Self {
        AppState { planner }
    }

    pub fn planner(&self) -> &Planner {
        &self.planner
    }
}
