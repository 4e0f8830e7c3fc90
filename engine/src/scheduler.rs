//! Deferred actions: run something some milliseconds after it was requested, without blocking
//! the tick loop.

use crate::key::Timestamp;

/// A pending task.
#[derive(Debug)]
pub struct DeferredTask<T> {
    scheduled_at: Timestamp,
    delay: u32,
    action: T,
}

impl<T> DeferredTask<T> {
    /// The earliest timestamp at which the task runs.
    pub fn due_time(&self) -> Timestamp {
        self.scheduled_at.wrapping_add(self.delay)
    }

    fn is_due(&self, now: Timestamp) -> bool {
        now.wrapping_sub(self.scheduled_at) >= self.delay
    }
}

/// An ordered list of `(due time, action)` pairs, serviced once per tick.
///
/// The scheduler is generic over the action type so that it knows nothing about what running an
/// action means; the caller supplies that to [`DeferredScheduler::service`].
#[derive(Debug)]
pub struct DeferredScheduler<T> {
    pending: Vec<DeferredTask<T>>,
    last_serviced: Option<Timestamp>,
}

impl<T> Default for DeferredScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DeferredScheduler<T> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            last_serviced: None,
        }
    }

    /// Registers `action` to run no earlier than `now + delay`. Tasks due at the same time run
    /// in registration order. There is no way to cancel a task.
    pub fn schedule(&mut self, now: Timestamp, delay: u32, action: T) {
        log::trace!("deferring task by {delay}ms at {now}");
        self.pending.push(DeferredTask {
            scheduled_at: now,
            delay,
            action,
        });
    }

    /// Runs every task that is due at `now`, in registration order, and returns how many ran.
    ///
    /// Only the first call for a given millisecond does anything. Each due task is removed
    /// before it runs, so `run` may schedule more tasks through the `&mut Self` it receives;
    /// those are never visited by this call, even with a zero delay.
    pub fn service(&mut self, now: Timestamp, mut run: impl FnMut(T, &mut Self)) -> usize {
        if self.last_serviced == Some(now) {
            return 0;
        }
        self.last_serviced = Some(now);

        let mut executed = 0;
        let mut i = 0;
        let mut unvisited = self.pending.len();
        while i < unvisited {
            if !self.pending[i].is_due(now) {
                i += 1;
                continue;
            }
            let task = self.pending.remove(i);
            unvisited -= 1;
            log::trace!("running task due at {}", task.due_time());
            run(task.action, self);
            executed += 1;
        }
        executed
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn pending(&self) -> impl Iterator<Item = &DeferredTask<T>> {
        self.pending.iter()
    }
}
