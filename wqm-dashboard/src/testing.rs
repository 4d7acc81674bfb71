//! Test doubles shared by the scheduler, chart and controller tests.

use crate::charts::{ChartError, ChartFocus, ChartSink};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;
use wqm_data::{ChartData, ChartSlot};
use wqm_feed::{FetchError, QuerySelection, Reading, ReadingSeries, ReadingSource};

pub fn sample_series(len: usize) -> ReadingSeries {
    ReadingSeries::new(
        (0..len)
            .map(|i| Reading {
                timestamp: Some(format!("10:{:02}", i)),
                ph: 7.0 + i as f64 * 0.1,
                turbidity: 0.0,
                tds: 200.0 + i as f64,
                residue: 10.0,
                suspect: Vec::new(),
            })
            .collect(),
    )
}

#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Constructed { slot: ChartSlot, id: u64, points: usize },
    Destroyed { slot: ChartSlot, id: u64 },
}

impl SinkEvent {
    pub fn slot(&self) -> ChartSlot {
        match self {
            SinkEvent::Constructed { slot, .. } | SinkEvent::Destroyed { slot, .. } => *slot,
        }
    }
}

#[derive(Debug, Default)]
pub struct SinkLog {
    pub events: Vec<SinkEvent>,
    /// (chart id, point count) of the live chart per slot
    live: [Option<(u64, usize)>; 3],
}

impl SinkLog {
    pub fn live_count(&self) -> usize {
        self.live.iter().filter(|c| c.is_some()).count()
    }

    pub fn points(&self, slot: ChartSlot) -> Option<usize> {
        self.live[slot.index()].map(|(_, points)| points)
    }

    pub fn constructed(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, SinkEvent::Constructed { .. }))
            .count()
    }

    pub fn destroyed(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, SinkEvent::Destroyed { .. }))
            .count()
    }
}

#[derive(Debug, PartialEq)]
pub struct MockChart {
    id: u64,
}

/// Records every construct/destroy and panics if two charts share a canvas.
pub struct MockSink {
    log: Rc<RefCell<SinkLog>>,
    targets: [bool; 3],
    next_id: u64,
    pub fail_on: Option<ChartSlot>,
}

impl MockSink {
    pub fn new() -> (MockSink, Rc<RefCell<SinkLog>>) {
        let log = Rc::new(RefCell::new(SinkLog::default()));
        let sink = MockSink {
            log: Rc::clone(&log),
            targets: [true; 3],
            next_id: 0,
            fail_on: None,
        };
        (sink, log)
    }
}

impl ChartSink for MockSink {
    type Chart = MockChart;

    fn target_exists(&self, slot: ChartSlot) -> bool {
        self.targets[slot.index()]
    }

    fn construct(&mut self, slot: ChartSlot, data: &ChartData) -> Result<MockChart, ChartError> {
        if self.fail_on == Some(slot) {
            return Err(ChartError(format!("{} canvas has no context", slot)));
        }
        let mut log = self.log.borrow_mut();
        assert!(
            log.live[slot.index()].is_none(),
            "two live charts bound to the {} canvas",
            slot
        );
        self.next_id += 1;
        let id = self.next_id;
        log.live[slot.index()] = Some((id, data.len()));
        log.events.push(SinkEvent::Constructed {
            slot,
            id,
            points: data.len(),
        });
        Ok(MockChart { id })
    }

    fn destroy(&mut self, slot: ChartSlot, chart: MockChart) {
        let mut log = self.log.borrow_mut();
        assert_eq!(log.live[slot.index()].map(|(id, _)| id), Some(chart.id));
        log.live[slot.index()] = None;
        log.events.push(SinkEvent::Destroyed { slot, id: chart.id });
    }

    fn set_focus(&mut self, focus: ChartFocus) {
        for slot in ChartSlot::ALL {
            self.targets[slot.index()] = focus.is_visible(slot);
        }
    }
}

struct Scripted {
    delay: Duration,
    result: Result<ReadingSeries, FetchError>,
}

/// Handle kept by the test to script responses and inspect calls.
#[derive(Clone)]
pub struct SourceHandle {
    calls: Rc<RefCell<Vec<QuerySelection>>>,
    script: Rc<RefCell<VecDeque<Scripted>>>,
}

impl SourceHandle {
    pub fn calls(&self) -> Vec<QuerySelection> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn push_ok(&self, delay: Duration, series: ReadingSeries) {
        self.script.borrow_mut().push_back(Scripted {
            delay,
            result: Ok(series),
        });
    }

    pub fn push_err(&self, delay: Duration, error: FetchError) {
        self.script.borrow_mut().push_back(Scripted {
            delay,
            result: Err(error),
        });
    }
}

/// Answers queries from a script; unscripted calls return a series of `default_len` readings at once.
pub struct ScriptedSource {
    handle: SourceHandle,
    default_len: usize,
}

impl ScriptedSource {
    pub fn new(default_len: usize) -> (ScriptedSource, SourceHandle) {
        let handle = SourceHandle {
            calls: Rc::new(RefCell::new(Vec::new())),
            script: Rc::new(RefCell::new(VecDeque::new())),
        };
        let source = ScriptedSource {
            handle: handle.clone(),
            default_len,
        };
        (source, handle)
    }

    async fn respond(&self, query: QuerySelection) -> Result<ReadingSeries, FetchError> {
        self.handle.calls.borrow_mut().push(query);
        let next = self.handle.script.borrow_mut().pop_front();
        match next {
            Some(scripted) => {
                if !scripted.delay.is_zero() {
                    tokio::time::sleep(scripted.delay).await;
                }
                scripted.result
            }
            None => Ok(sample_series(self.default_len)),
        }
    }
}

impl ReadingSource for ScriptedSource {
    async fn fetch_live(&self) -> Result<ReadingSeries, FetchError> {
        self.respond(QuerySelection::Live).await
    }

    async fn fetch_historical(
        &self,
        collection: &str,
        date: &str,
    ) -> Result<ReadingSeries, FetchError> {
        self.respond(QuerySelection::HistoricalByDate {
            collection: collection.to_string(),
            date: date.to_string(),
        })
        .await
    }
}
