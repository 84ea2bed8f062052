//! Global permit pool bounding in-flight requests
//!
//! Every logical request holds one permit for its whole lifetime, retries and
//! backoff sleeps included. The limiter also keeps an in-flight gauge and the
//! highest value it ever reached, so the concurrency bound is observable.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};

/// Counting permit pool shared by every request of a batch
#[derive(Debug, Clone)]
pub struct RequestLimiter {
    semaphore: Arc<Semaphore>,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
    capacity: usize,
}

/// A held permit; dropping it frees the slot
#[derive(Debug)]
pub struct InFlightPermit {
    _permit: OwnedSemaphorePermit,
    in_flight: Arc<AtomicUsize>,
}

impl RequestLimiter {
    /// Creates a pool with `capacity` permits (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
            capacity,
        }
    }

    /// Waits for a free slot
    ///
    /// # Returns
    ///
    /// * `Ok(InFlightPermit)` - A slot was acquired
    /// * `Err(AcquireError)` - The pool was closed while waiting
    pub async fn acquire(&self) -> Result<InFlightPermit, AcquireError> {
        let permit = Arc::clone(&self.semaphore).acquire_owned().await?;

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        Ok(InFlightPermit {
            _permit: permit,
            in_flight: Arc::clone(&self.in_flight),
        })
    }

    /// Closes the pool; pending and future `acquire` calls fail
    pub fn close(&self) {
        self.semaphore.close();
    }

    pub fn is_closed(&self) -> bool {
        self.semaphore.is_closed()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of permits currently held
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of permits ever held at the same time
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

impl Drop for InFlightPermit {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
