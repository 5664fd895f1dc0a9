use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use log::{debug, trace};

pub type ObserverId = u64;

type Observer = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
pub struct ChangeNotifier {
    observers: Mutex<Vec<(ObserverId, Observer)>>,
    next_id: AtomicU64,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, observer: F) -> ObserverId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock().push((id, Arc::new(observer)));
        trace!("Observer {id} subscribed");
        id
    }

    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut observers = self.lock();
        let before = observers.len();
        observers.retain(|(i, _)| *i != id);
        before != observers.len()
    }

    /// Runs on the calling thread. Returns how many observers were called.
    pub fn publish(&self) -> usize {
        // run observers without the lock so they can (un)subscribe
        let observers: Vec<Observer> = self.lock().iter().map(|(_, o)| o.clone()).collect();
        for observer in &observers {
            observer();
        }
        debug!("Published telephony change to {} observers", observers.len());
        observers.len()
    }

    pub fn backend_changed(&self, reason: &str) -> usize {
        debug!("Backend reported a change: {reason}");
        self.publish()
    }

    pub fn observer_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(ObserverId, Observer)>> {
        match self.observers.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
