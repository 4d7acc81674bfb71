//! Timer-driven poll scheduler.
//!
//! The scheduler owns the recurring timer and the active [`QuerySelection`].
//! On every tick it hands the current selection to a callback; it never waits
//! for the work the callback starts, so fetches may overlap.

use log::{debug, warn};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tokio::task::{self, JoinHandle};
use tokio::time::{interval, MissedTickBehavior};
use wqm_feed::QuerySelection;

#[derive(Debug)]
enum TimerState {
    Idle,
    Running(JoinHandle<()>),
    Stopped,
}

/// Drives periodic fetches in live or historical mode.
pub struct PollScheduler {
    period: Duration,
    collection: String,
    selection: Rc<RefCell<QuerySelection>>,
    timer: TimerState,
}

impl PollScheduler {
    pub fn new(period: Duration, collection: impl Into<String>) -> Self {
        PollScheduler {
            // tokio intervals reject a zero period
            period: period.max(Duration::from_millis(1)),
            collection: collection.into(),
            selection: Rc::new(RefCell::new(QuerySelection::Live)),
            timer: TimerState::Idle,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn selection(&self) -> QuerySelection {
        self.selection.borrow().clone()
    }

    /// Switch to historical mode for `date`. An empty date returns to live mode.
    pub fn select_date(&self, date: &str) {
        let selection = QuerySelection::for_date(&self.collection, Some(date));
        debug!("Poll mode -> {}", selection);
        *self.selection.borrow_mut() = selection;
    }

    /// Return to live mode.
    pub fn clear_date(&self) {
        debug!("Poll mode -> live");
        *self.selection.borrow_mut() = QuerySelection::Live;
    }

    /// Start the timer. The first tick fires immediately.
    ///
    /// Must be called from within a `tokio::task::LocalSet`.
    pub fn start<T>(&mut self, mut on_tick: T)
    where
        T: FnMut(QuerySelection) + 'static,
    {
        match self.timer {
            TimerState::Idle => {}
            TimerState::Running(_) => {
                warn!("Poll scheduler already running");
                return;
            }
            TimerState::Stopped => {
                warn!("Poll scheduler was stopped; not restarting");
                return;
            }
        }
        let selection = Rc::clone(&self.selection);
        let period = self.period;
        let handle = task::spawn_local(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let query = selection.borrow().clone();
                on_tick(query);
            }
        });
        self.timer = TimerState::Running(handle);
    }

    /// Cancel the timer. Returns `true` only for the call that actually stopped it.
    pub fn stop(&mut self) -> bool {
        match std::mem::replace(&mut self.timer, TimerState::Stopped) {
            TimerState::Running(handle) => {
                handle.abort();
                debug!("Poll scheduler stopped");
                true
            }
            TimerState::Idle | TimerState::Stopped => false,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(&self.timer, TimerState::Running(handle) if !handle.is_finished())
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
