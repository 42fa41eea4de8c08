//! Time-driven scheduling without blocking.
//!
//! The host hands in monotonic millisecond timestamps. [`FixedStepClock`]
//! turns them into whole simulation steps; [`TimerQueue`] holds
//! fire-and-forget callbacks payloads until they are due.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

// =============================================================================
// FIXED-STEP CLOCK
// =============================================================================

/// Accumulates frame time and releases it in fixed steps.
#[derive(Debug, Clone)]
pub struct FixedStepClock {
    step_ms: f64,
    max_steps_per_frame: u32,
    accumulator: f64,
    last_ms: Option<u64>,
}

impl FixedStepClock {
    /// Frames that fall further behind than this many steps drop the excess.
    pub const DEFAULT_MAX_STEPS: u32 = 5;

    pub fn new(step_ms: f64) -> Self {
        Self::with_max_steps(step_ms, Self::DEFAULT_MAX_STEPS)
    }

    pub fn with_max_steps(step_ms: f64, max_steps_per_frame: u32) -> Self {
        Self {
            step_ms: step_ms.max(f64::EPSILON),
            max_steps_per_frame: max_steps_per_frame.max(1),
            accumulator: 0.0,
            last_ms: None,
        }
    }

    /// Number of steps to run for a frame at `now_ms`. The first call only
    /// establishes the time base.
    pub fn advance(&mut self, now_ms: u64) -> u32 {
        let Some(last) = self.last_ms.replace(now_ms) else {
            return 0;
        };
        // Clocks that go backwards contribute nothing
        self.accumulator += now_ms.saturating_sub(last) as f64;

        let mut steps = 0;
        while self.accumulator >= self.step_ms && steps < self.max_steps_per_frame {
            self.accumulator -= self.step_ms;
            steps += 1;
        }
        if steps == self.max_steps_per_frame {
            self.accumulator = self.accumulator.min(self.step_ms);
        }
        steps
    }

    /// Forget the time base, e.g. after the simulation was rebuilt.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_ms = None;
    }

    pub fn step_ms(&self) -> f64 {
        self.step_ms
    }
}

// =============================================================================
// TIMER QUEUE
// =============================================================================

#[derive(Debug)]
struct Timer<T> {
    due_ms: u64,
    seq: u64,
    payload: T,
}

impl<T> PartialEq for Timer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due_ms == other.due_ms && self.seq == other.seq
    }
}

impl<T> Eq for Timer<T> {}

impl<T> PartialOrd for Timer<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Timer<T> {
    // Reversed: BinaryHeap is a max-heap and the earliest timer must surface first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due_ms
            .cmp(&self.due_ms)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Payloads released in due-time order, ties broken by scheduling order.
#[derive(Debug)]
pub struct TimerQueue<T> {
    heap: BinaryHeap<Timer<T>>,
    next_seq: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_ms: u64, payload: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Timer {
            due_ms,
            seq,
            payload,
        });
    }

    /// Remove and return every payload due at or before `now_ms`.
    pub fn drain_due(&mut self, now_ms: u64) -> Vec<T> {
        let mut due = Vec::new();
        while self.heap.peek().is_some_and(|t| t.due_ms <= now_ms) {
            if let Some(timer) = self.heap.pop() {
                due.push(timer.payload);
            }
        }
        due
    }

    pub fn next_due(&self) -> Option<u64> {
        self.heap.peek().map(|t| t.due_ms)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
