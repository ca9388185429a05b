use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub fn argv(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|token| token.to_string()).collect()
}

/// Shared probe recording whether the callback ran and in what order the
/// lifecycle touched it.
#[derive(Clone, Default)]
pub struct Probe {
    invoked: Arc<AtomicBool>,
    events: Arc<Mutex<Vec<&'static str>>>,
}

impl Probe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_invoked(&self) {
        self.invoked.store(true, Ordering::SeqCst);
    }

    pub fn was_invoked(&self) -> bool {
        self.invoked.load(Ordering::SeqCst)
    }

    pub fn record(&self, event: &'static str) {
        self.events.lock().unwrap().push(event);
    }

    pub fn recorder(&self, event: &'static str) -> Box<dyn FnOnce() + Send> {
        let probe = self.clone();
        Box::new(move || probe.record(event))
    }

    pub fn events(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().clone()
    }
}
