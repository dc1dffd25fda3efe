use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};

use crate::resources::Resources;
use crate::view::ViewState;

/// Shared state handed to every warp filter.
///
/// The view record itself is immutable; handlers build a replacement via its
/// copy-with-update constructors and swap it in under the lock. The console
/// receiver is the drain side of the bounded log queue and is never replaced.
#[derive(Clone)]
pub struct AppState {
    pub view: Arc<Mutex<ViewState>>,
    pub console: Arc<Mutex<mpsc::Receiver<String>>>,
    pub resources: Arc<Resources>,
}

impl AppState {
    pub fn new(resources: Resources, console_rx: mpsc::Receiver<String>) -> Self {
        Self {
            view: Arc::new(Mutex::new(ViewState::new())),
            console: Arc::new(Mutex::new(console_rx)),
            resources: Arc::new(resources),
        }
    }
}
