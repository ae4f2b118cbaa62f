use std::sync::Mutex;

use tracing::debug;

/// Where forced de-authentication sends the user.
pub const LOGIN_ROUTE: &str = "/login";

/// Navigation sink. The embedding UI routes; the session core only asks.
pub trait Navigator: Send + Sync {
    fn go(&self, path: &str);
}

/// A navigator for headless embedders; it only logs the request.
pub struct NullNavigator;

impl Navigator for NullNavigator {
    fn go(&self, path: &str) {
        debug!("Navigation to '{}' requested", path);
    }
}

/// Records requested paths instead of navigating. A test double for
/// embedders and for this crate's own tests.
#[derive(Default)]
pub struct RecordingNavigator {
    visited: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn go(&self, path: &str) {
        self.visited.lock().unwrap().push(path.to_string());
    }
}
