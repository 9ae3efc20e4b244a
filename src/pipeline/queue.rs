//! Bounded blocking queue connecting two adjacent stages.
//!
//! One producer, one consumer. `put` blocks while the queue is full, `take` blocks while it is
//! empty, and `mark_finished` is the one-way end-of-stream signal. All waiting is done on
//! condition variables under the queue's own lock; nothing polls.
//!
//! `close` is the consumer-side counterpart: the consumer has stopped for good, so buffered
//! items are dropped and further `put`s are refused instead of blocking or piling up.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use crate::QueueOrder;

struct QueueState<T> {
    items: VecDeque<T>,
    /// Set by the producer: no more items will be put.
    finished: bool,
    /// Set by the consumer: no more items will be taken.
    closed: bool,
}

pub struct BoundedQueue<T> {
    state: Mutex<QueueState<T>>,
    /// Producer waits here while the queue is full.
    not_full: Condvar,
    /// Consumer waits here while the queue is empty.
    not_empty: Condvar,
    capacity: usize,
    order: QueueOrder,
}

impl<T> BoundedQueue<T> {
    /// Create a queue holding at most `capacity` items (a capacity of 0 is treated as 1).
    pub fn new(capacity: usize, order: QueueOrder) -> Self {
        let capacity = capacity.max(1);
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::with_capacity(capacity),
                finished: false,
                closed: false,
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            capacity,
            order,
        }
    }

    // A stage that panicked mid-section cannot leave the state half-written (push/pop are
    // single calls), so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, QueueState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert `item`, blocking while the queue is full. Wakes one waiting consumer.
    ///
    /// Returns `false` (and drops `item`) when the consumer has closed the queue; the producer
    /// should stop then. Never grows past capacity.
    pub fn put(&self, item: T) -> bool {
        let guard = self.lock();
        let mut state = self
            .not_full
            .wait_while(guard, |s| s.items.len() >= self.capacity && !s.closed)
            .unwrap_or_else(PoisonError::into_inner);
        if state.closed {
            return false;
        }
        state.items.push_back(item);
        drop(state);
        self.not_empty.notify_one();
        true
    }

    /// Remove one item, blocking while the queue is empty and not finished.
    ///
    /// Returns `None` at end of stream (finished and empty) and never blocks in that case.
    /// Also `None` once the queue is closed.
    /// Wakes one waiting producer after a removal.
    pub fn take(&self) -> Option<T> {
        let guard = self.lock();
        let mut state = self
            .not_empty
            .wait_while(guard, |s| s.items.is_empty() && !s.finished && !s.closed)
            .unwrap_or_else(PoisonError::into_inner);
        if state.closed {
            return None;
        }
        let item = match self.order {
            QueueOrder::Fifo => state.items.pop_front(),
            QueueOrder::Lifo => state.items.pop_back(),
        };
        drop(state);
        if item.is_some() {
            self.not_full.notify_one();
        }
        item
    }

    /// Signal that the producer is done. Wakes every waiter on both sides. Idempotent.
    pub fn mark_finished(&self) {
        self.lock().finished = true;
        self.not_empty.notify_all();
        self.not_full.notify_all();
    }

    /// Consumer is gone: drop buffered items, refuse further puts, wake a blocked producer.
    /// Idempotent.
    pub fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        state.items.clear();
        drop(state);
        self.not_full.notify_all();
        self.not_empty.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub fn is_finished(&self) -> bool {
        self.lock().finished
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn order(&self) -> QueueOrder {
        self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_fifo_order() {
        let q = BoundedQueue::new(4, QueueOrder::Fifo);
        for i in 0..4 {
            assert!(q.put(i));
        }
        q.mark_finished();
        let got: Vec<_> = std::iter::from_fn(|| q.take()).collect();
        assert_eq!(got, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_lifo_order() {
        let q = BoundedQueue::new(4, QueueOrder::Lifo);
        for i in 0..4 {
            q.put(i);
        }
        q.mark_finished();
        let got: Vec<_> = std::iter::from_fn(|| q.take()).collect();
        assert_eq!(got, vec![3, 2, 1, 0]);
    }

    #[test]
    fn test_take_on_finished_empty_returns_none() {
        let q: BoundedQueue<u32> = BoundedQueue::new(2, QueueOrder::Fifo);
        q.mark_finished();
        assert_eq!(q.take(), None);
        assert_eq!(q.take(), None);
    }

    #[test]
    fn test_finished_queue_still_drains() {
        let q = BoundedQueue::new(2, QueueOrder::Fifo);
        q.put("a");
        q.put("b");
        q.mark_finished();
        assert_eq!(q.take(), Some("a"));
        assert_eq!(q.take(), Some("b"));
        assert_eq!(q.take(), None);
    }

    #[test]
    fn test_mark_finished_idempotent() {
        let q: BoundedQueue<u8> = BoundedQueue::new(1, QueueOrder::Fifo);
        assert!(!q.is_finished());
        q.mark_finished();
        q.mark_finished();
        assert!(q.is_finished());
        assert_eq!(q.take(), None);
    }

    #[test]
    fn test_put_after_close_is_refused_and_bounded() {
        let q = BoundedQueue::new(2, QueueOrder::Fifo);
        assert!(q.put(0));
        q.close();
        assert!(q.is_empty());
        for i in 0..100 {
            assert!(!q.put(i));
        }
        assert_eq!(q.len(), 0);
        assert!(!q.is_finished());
        assert_eq!(q.take(), None);
    }

    #[test]
    fn test_close_wakes_blocked_producer() {
        let q = Arc::new(BoundedQueue::new(1, QueueOrder::Fifo));
        assert!(q.put(1));
        let producer = {
            let q = Arc::clone(&q);
            thread::spawn(move || q.put(2))
        };
        thread::sleep(Duration::from_millis(50));
        assert!(!producer.is_finished());
        q.close();
        assert!(!producer.join().unwrap());
        assert!(q.len() <= q.capacity());
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let q: BoundedQueue<u8> = BoundedQueue::new(0, QueueOrder::Fifo);
        assert_eq!(q.capacity(), 1);
    }

    #[test]
    fn test_put_blocks_when_full_until_take() {
        let q = Arc::new(BoundedQueue::new(1, QueueOrder::Fifo));
        q.put(1);
        let producer = {
            let q = Arc::clone(&q);
            thread::spawn(move || q.put(2))
        };
        thread::sleep(Duration::from_millis(50));
        assert!(!producer.is_finished());
        assert_eq!(q.len(), 1);
        assert_eq!(q.take(), Some(1));
        assert!(producer.join().unwrap());
        assert_eq!(q.take(), Some(2));
    }

    #[test]
    fn test_mark_finished_wakes_blocked_consumer() {
        let q: Arc<BoundedQueue<u32>> = Arc::new(BoundedQueue::new(1, QueueOrder::Fifo));
        let consumer = {
            let q = Arc::clone(&q);
            thread::spawn(move || q.take())
        };
        thread::sleep(Duration::from_millis(50));
        q.mark_finished();
        assert_eq!(consumer.join().unwrap(), None);
    }

    #[test]
    fn test_capacity_never_exceeded() {
        const CAP: usize = 3;
        const N: usize = 2_000;
        let q = Arc::new(BoundedQueue::new(CAP, QueueOrder::Fifo));
        let producer = {
            let q = Arc::clone(&q);
            thread::spawn(move || {
                for i in 0..N {
                    q.put(i);
                    assert!(q.len() <= CAP);
                }
                q.mark_finished();
            })
        };
        let mut received = Vec::with_capacity(N);
        while let Some(i) = q.take() {
            assert!(q.len() <= CAP);
            received.push(i);
        }
        producer.join().unwrap();
        assert_eq!(received, (0..N).collect::<Vec<_>>());
    }
}
