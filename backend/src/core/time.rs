//! Virtual-time scheduling for the simulation
//!
//! Simulated time is a continuous `f64` measured in days. Tasks are parked on
//! the clock with a delay; the clock wakes them in time order, and tasks that
//! share a wake time run in the order they were scheduled. Nothing here looks
//! at wall-clock time, so a run is fully reproducible from its seed.

use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// A task parked on the clock until `time`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Wakeup<T> {
    time: f64,
    /// Insertion counter, breaks ties between equal wake times (FIFO)
    seq: u64,
    task: T,
}

impl<T> PartialEq for Wakeup<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Wakeup<T> {}

impl<T> PartialOrd for Wakeup<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Wakeup<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .total_cmp(&other.time)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Discrete-event clock keyed by task handles of type `T`
///
/// # Example
/// ```
/// use t5sim_core::Clock;
///
/// let mut clock = Clock::new();
/// clock.schedule(2.0, "b");
/// clock.schedule(1.0, "a");
///
/// let mut woken = Vec::new();
/// clock
///     .run(10.0, |now, task| {
///         woken.push((now, *task));
///         Ok::<_, ()>(None)
///     })
///     .unwrap();
///
/// assert_eq!(woken, vec![(1.0, "a"), (2.0, "b")]);
/// assert_eq!(clock.now(), 10.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clock<T> {
    /// Current simulated time in days
    now: f64,
    next_seq: u64,
    queue: BinaryHeap<Reverse<Wakeup<T>>>,
}

impl<T> Default for Clock<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clock<T> {
    /// Create a clock at time zero with nothing scheduled
    pub fn new() -> Self {
        Self {
            now: 0.0,
            next_seq: 0,
            queue: BinaryHeap::new(),
        }
    }

    /// Current simulated time in days
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Number of tasks waiting to be woken
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Wake time of the earliest parked task
    pub fn peek_time(&self) -> Option<f64> {
        self.queue.peek().map(|Reverse(w)| w.time)
    }

    /// Park `task` until `delay` days from now
    ///
    /// # Panics
    /// Panics if `delay` is negative or not finite
    ///
    /// # Example
    /// ```
    /// use t5sim_core::Clock;
    ///
    /// let mut clock = Clock::new();
    /// clock.schedule(0.5, 7u32);
    /// assert_eq!(clock.pending(), 1);
    /// assert_eq!(clock.peek_time(), Some(0.5));
    /// ```
    pub fn schedule(&mut self, delay: f64, task: T) {
        assert!(
            delay.is_finite() && delay >= 0.0,
            "delay must be a finite, non-negative number of days"
        );
        let wakeup = Wakeup {
            time: self.now + delay,
            seq: self.next_seq,
            task,
        };
        self.next_seq += 1;
        self.queue.push(Reverse(wakeup));
    }

    /// Pop the next task if it wakes strictly before `until`
    ///
    /// Advances `now` to the task's wake time. Returns `None` (leaving the
    /// queue untouched) when the queue is empty or the next wake time is at or
    /// past `until`.
    pub fn pop_until(&mut self, until: f64) -> Option<T> {
        let due = matches!(self.queue.peek(), Some(Reverse(w)) if w.time < until);
        if !due {
            return None;
        }
        self.queue.pop().map(|Reverse(wakeup)| {
            self.now = wakeup.time;
            wakeup.task
        })
    }

    /// Run the clock until `until` days
    ///
    /// Each woken task is handed to `resume` together with the current time.
    /// `resume` answers with the delay until the task should wake again, or
    /// `None` when the task has finished. An error from `resume` stops the run
    /// immediately and is returned; the failing task is dropped.
    ///
    /// On a clean finish `now` equals `until`, even if the queue drained
    /// earlier. Calling `run` again with a later horizon continues where the
    /// previous call stopped.
    pub fn run<E, F>(&mut self, until: f64, mut resume: F) -> Result<(), E>
    where
        F: FnMut(f64, &T) -> Result<Option<f64>, E>,
    {
        while let Some(task) = self.pop_until(until) {
            if let Some(delay) = resume(self.now, &task)? {
                self.schedule(delay, task);
            }
        }
        if self.now < until {
            self.now = until;
        }
        Ok(())
    }
}
