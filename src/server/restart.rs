use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Notify;

/// Asks the server to shut down once it has served a fixed number of
/// feeds, leaving the restart to the process supervisor.
#[derive(Debug)]
pub struct RestartValve {
  limit: usize,
  served: AtomicUsize,
  notify: Notify,
}

impl RestartValve {
  pub fn new(limit: NonZeroUsize) -> Self {
    Self {
      limit: limit.get(),
      served: AtomicUsize::new(0),
      notify: Notify::new(),
    }
  }

  /// Count one served feed. Returns true for the request that reaches
  /// the limit.
  pub fn record_served(&self) -> bool {
    let served = self.served.fetch_add(1, Ordering::SeqCst) + 1;
    if served != self.limit {
      return false;
    }

    self.notify.notify_one();
    true
  }

  pub fn served(&self) -> usize {
    self.served.load(Ordering::SeqCst)
  }

  pub fn is_tripped(&self) -> bool {
    self.served() >= self.limit
  }

  /// Resolves once the limit is reached, even if that happened before
  /// this was called.
  pub async fn tripped(&self) {
    self.notify.notified().await
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_trips_exactly_once() {
    let valve = RestartValve::new(NonZeroUsize::new(3).unwrap());

    assert!(!valve.record_served());
    assert!(!valve.record_served());
    assert!(!valve.is_tripped());
    assert!(valve.record_served());
    assert!(!valve.record_served());
    assert!(valve.is_tripped());
    assert_eq!(valve.served(), 4);

    // the permit from the trip is waiting
    valve.tripped().await;
  }
}
