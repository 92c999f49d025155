//! Bounding how many records are looked up at once

use crate::error::PipelineError;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use yprice_http::CancelToken;

/// Counting semaphore with a fixed capacity
///
/// Waiters are not served in any guaranteed order relative to the input.
#[derive(Debug, Clone)]
pub struct ConcurrencyGate {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

/// A slot in the gate, released when dropped
#[derive(Debug)]
pub struct GatePermit {
    _permit: OwnedSemaphorePermit,
}

impl ConcurrencyGate {
    /// Create a gate admitting `capacity` holders at a time
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Config`] for a capacity of zero, which would
    /// never admit anything.
    pub fn new(capacity: usize) -> Result<Self, PipelineError> {
        if capacity == 0 {
            return Err(PipelineError::Config(
                "concurrency must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        })
    }

    /// Wait for a free slot
    ///
    /// Returns [`PipelineError::Cancelled`] as soon as `cancel` fires, even
    /// while waiting.
    pub async fn acquire(&self, cancel: &CancelToken) -> Result<GatePermit, PipelineError> {
        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(PipelineError::Cancelled),
            permit = self.semaphore.clone().acquire_owned() => permit
                .map(|permit| GatePermit { _permit: permit })
                .map_err(|e| PipelineError::Task(format!("Gate closed: {}", e))),
        }
    }

    /// Maximum number of concurrent holders
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of permits currently held
    pub fn in_flight(&self) -> usize {
        self.capacity - self.semaphore.available_permits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_zero_capacity_is_rejected() {
        assert!(matches!(
            ConcurrencyGate::new(0),
            Err(PipelineError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_permits_are_counted_and_released() {
        let gate = ConcurrencyGate::new(2).unwrap();
        let cancel = CancelToken::new();

        let first = gate.acquire(&cancel).await.unwrap();
        let second = gate.acquire(&cancel).await.unwrap();
        assert_eq!(gate.in_flight(), 2);

        drop(first);
        assert_eq!(gate.in_flight(), 1);
        drop(second);
        assert_eq!(gate.in_flight(), 0);
        assert_eq!(gate.capacity(), 2);
    }

    #[tokio::test]
    async fn test_acquire_blocks_when_full() {
        let gate = ConcurrencyGate::new(1).unwrap();
        let cancel = CancelToken::new();
        let _held = gate.acquire(&cancel).await.unwrap();

        let waited = tokio::time::timeout(Duration::from_millis(50), gate.acquire(&cancel)).await;
        assert!(waited.is_err(), "second acquire should still be waiting");
    }

    #[tokio::test]
    async fn test_cancel_wakes_waiter() {
        let gate = ConcurrencyGate::new(1).unwrap();
        let cancel = CancelToken::new();
        let _held = gate.acquire(&cancel).await.unwrap();

        let waiter = {
            let gate = gate.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move { gate.acquire(&cancel).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel.cancel();

        let result = waiter.await.unwrap();
        assert!(matches!(result, Err(PipelineError::Cancelled)));
    }

    #[tokio::test]
    async fn test_permit_released_when_holder_fails() {
        let gate = ConcurrencyGate::new(1).unwrap();
        let cancel = CancelToken::new();

        let task = {
            let permit = gate.acquire(&cancel).await.unwrap();
            tokio::spawn(async move {
                let _permit = permit;
                Err::<(), _>("lookup failed")
            })
        };
        assert!(task.await.unwrap().is_err());
        assert_eq!(gate.in_flight(), 0);
    }
}
