//! The dashboard controller: fetch, classify the latest reading, render.
//!
//! All state lives behind one `Rc<RefCell<_>>` and is only touched from tasks
//! spawned on the caller's `LocalSet`, so there is a single writer at any
//! point in time. Borrows are never held across an `.await`.

use crate::charts::{ChartFocus, ChartSink, ChartStateManager, ChartStats};
use crate::config::{DashboardConfig, StaleResponsePolicy};
use crate::scheduler::PollScheduler;
use log::{debug, error, info};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tokio::task;
use tokio::time::sleep;
use wqm_data::{ChartSlot, StatusBoard};
use wqm_feed::{FetchError, QuerySelection, Reading, ReadingSeries, ReadingSource};

struct DashboardState<S: ChartSink> {
    series: Rc<ReadingSeries>,
    statuses: StatusBoard,
    charts: ChartStateManager<S>,
    focus: ChartFocus,
    last_error: Option<String>,
    /// Sequence number of the most recently issued request.
    issued: u64,
    /// Sequence number of the request whose response is displayed.
    applied: u64,
    torn_down: bool,
}

/// Everything a fetch task needs, detached from the controller itself.
struct FetchPipeline<F, S: ChartSink> {
    source: Rc<F>,
    state: Rc<RefCell<DashboardState<S>>>,
    policy: StaleResponsePolicy,
    render_delay: Duration,
}

impl<F, S: ChartSink> Clone for FetchPipeline<F, S> {
    fn clone(&self) -> Self {
        FetchPipeline {
            source: Rc::clone(&self.source),
            state: Rc::clone(&self.state),
            policy: self.policy,
            render_delay: self.render_delay,
        }
    }
}

impl<F, S> FetchPipeline<F, S>
where
    F: ReadingSource + 'static,
    S: ChartSink + 'static,
{
    /// Issue one fetch without waiting for it.
    fn issue(&self, query: QuerySelection) {
        let seq = {
            let mut state = self.state.borrow_mut();
            if state.torn_down {
                return;
            }
            state.issued += 1;
            state.issued
        };
        let pipeline = self.clone();
        task::spawn_local(async move {
            let result = pipeline.source.fetch(&query).await;
            if pipeline.apply(&query, seq, result) {
                schedule_render(Rc::clone(&pipeline.state), pipeline.render_delay);
            }
        });
    }

    /// Replace the series with a successful response. Returns whether anything changed.
    fn apply(
        &self,
        query: &QuerySelection,
        seq: u64,
        result: Result<ReadingSeries, FetchError>,
    ) -> bool {
        let mut state = self.state.borrow_mut();
        if state.torn_down {
            debug!("Discarding {} response that arrived after teardown", query);
            return false;
        }
        if self.policy == StaleResponsePolicy::LatestRequestWins && seq < state.applied {
            debug!(
                "Discarding stale {} response (request {}, showing {})",
                query, seq, state.applied
            );
            return false;
        }
        match result {
            Ok(series) => {
                info!("Received {} readings ({})", series.len(), query);
                let statuses = StatusBoard::from_series(&series);
                info!(
                    "pH {:.2} ({}), turbidity {:.2} ({}), TDS {:.0} ({}), residue {:.1}%",
                    statuses.ph.value,
                    statuses.ph.status,
                    statuses.turbidity.value,
                    statuses.turbidity.status,
                    statuses.tds.value,
                    statuses.tds.status,
                    statuses.residue
                );
                state.statuses = statuses;
                state.series = Rc::new(series);
                state.applied = seq;
                state.last_error = None;
                true
            }
            Err(e) => {
                error!("Failed to load {} readings: {}", query, e);
                state.last_error = Some(e.to_string());
                false
            }
        }
    }
}

/// Rebuild the charts from the current series after `delay`, unless torn down by then.
fn schedule_render<S: ChartSink + 'static>(state: Rc<RefCell<DashboardState<S>>>, delay: Duration) {
    task::spawn_local(async move {
        sleep(delay).await;
        let mut state = state.borrow_mut();
        if state.torn_down {
            return;
        }
        let series = Rc::clone(&state.series);
        let built = state.charts.render(&series);
        debug!("Rebuilt {} chart(s) from {} readings", built, series.len());
    });
}

/// Composes the poll scheduler, the classifier and the chart manager.
///
/// `start`, `refresh`, `toggle_chart` and `request_render` spawn local tasks
/// and must be called from within a `tokio::task::LocalSet`.
pub struct DashboardController<F, S>
where
    F: ReadingSource + 'static,
    S: ChartSink + 'static,
{
    pipeline: FetchPipeline<F, S>,
    scheduler: PollScheduler,
}

impl<F, S> DashboardController<F, S>
where
    F: ReadingSource + 'static,
    S: ChartSink + 'static,
{
    pub fn new(config: DashboardConfig, source: F, sink: S) -> Self {
        let state = DashboardState {
            series: Rc::new(ReadingSeries::default()),
            statuses: StatusBoard::no_data(),
            charts: ChartStateManager::new(sink),
            focus: ChartFocus::All,
            last_error: None,
            issued: 0,
            applied: 0,
            torn_down: false,
        };
        DashboardController {
            pipeline: FetchPipeline {
                source: Rc::new(source),
                state: Rc::new(RefCell::new(state)),
                policy: config.stale_responses,
                render_delay: config.render_delay,
            },
            scheduler: PollScheduler::new(config.poll_interval, config.collection),
        }
    }

    /// Begin polling. The first fetch is issued immediately.
    pub fn start(&mut self) {
        if self.is_torn_down() {
            return;
        }
        info!(
            "Polling every {:?} ({})",
            self.scheduler.period(),
            self.scheduler.selection()
        );
        let pipeline = self.pipeline.clone();
        self.scheduler.start(move |query| pipeline.issue(query));
    }

    /// Fetch once now for the active selection, outside the timer.
    pub fn refresh(&self) {
        self.pipeline.issue(self.scheduler.selection());
    }

    /// Poll readings for `date` from now on. An empty date returns to live mode.
    pub fn select_date(&self, date: &str) {
        self.scheduler.select_date(date);
    }

    pub fn clear_date(&self) {
        self.scheduler.clear_date();
    }

    /// Focus a single chart, or show all of them again if it was already focused.
    pub fn toggle_chart(&self, slot: ChartSlot) {
        {
            let mut state = self.pipeline.state.borrow_mut();
            if state.torn_down {
                return;
            }
            let focus = state.focus.toggled(slot);
            state.focus = focus;
            state.charts.sink_mut().set_focus(focus);
            debug!("Chart focus -> {:?}", focus);
        }
        self.request_render();
    }

    /// Schedule a render pass if there is data to draw.
    pub fn request_render(&self) {
        let ready = {
            let state = self.pipeline.state.borrow();
            !state.torn_down && !state.series.is_empty()
        };
        if ready {
            schedule_render(Rc::clone(&self.pipeline.state), self.pipeline.render_delay);
        }
    }

    /// Stop the timer, then release every chart. Later calls do nothing.
    pub fn teardown(&mut self) {
        if self.is_torn_down() {
            return;
        }
        self.scheduler.stop();
        let mut state = self.pipeline.state.borrow_mut();
        state.torn_down = true;
        let released = state.charts.destroy_all();
        info!("Dashboard stopped; released {} chart(s)", released);
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn is_torn_down(&self) -> bool {
        self.pipeline.state.borrow().torn_down
    }

    pub fn series(&self) -> Rc<ReadingSeries> {
        Rc::clone(&self.pipeline.state.borrow().series)
    }

    pub fn current_reading(&self) -> Reading {
        self.pipeline.state.borrow().series.current()
    }

    pub fn statuses(&self) -> StatusBoard {
        self.pipeline.state.borrow().statuses.clone()
    }

    pub fn selection(&self) -> QuerySelection {
        self.scheduler.selection()
    }

    /// The selected date; `None` means live mode.
    pub fn selected_date(&self) -> Option<String> {
        self.scheduler.selection().date().map(str::to_string)
    }

    pub fn focus(&self) -> ChartFocus {
        self.pipeline.state.borrow().focus
    }

    /// Message of the last failed fetch, cleared by the next successful one.
    pub fn last_error(&self) -> Option<String> {
        self.pipeline.state.borrow().last_error.clone()
    }

    pub fn chart_stats(&self) -> ChartStats {
        self.pipeline.state.borrow().charts.stats()
    }

    /// Inspect the chart sink.
    pub fn with_sink<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(self.pipeline.state.borrow().charts.sink())
    }
}

impl<F, S> Drop for DashboardController<F, S>
where
    F: ReadingSource + 'static,
    S: ChartSink + 'static,
{
    fn drop(&mut self) {
        self.teardown();
    }
}
