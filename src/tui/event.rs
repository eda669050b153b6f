//! Terminal event handling
//!
//! Runs a dedicated thread polling crossterm for input and emitting
//! periodic ticks. Background workers push their results through the
//! same channel so the main loop has a single event source.

use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, MouseEvent};

use crate::api::AuditPage;
use crate::error::TrailError;

/// Result of a completed CSV export
#[derive(Debug)]
pub struct ExportOutcome {
    /// Number of exported rows
    pub rows: usize,
    /// File the export was written to
    pub path: PathBuf,
}

/// Events consumed by the main loop
#[derive(Debug)]
pub enum Event {
    /// Periodic tick
    Tick,
    /// Key press
    Key(KeyEvent),
    /// Mouse action
    Mouse(MouseEvent),
    /// Terminal resize
    Resize(u16, u16),
    /// A page of audit history fetched in the background
    AuditPage {
        /// Generation the request was issued under
        generation: u64,
        /// Fetched page or the error that prevented it
        result: Result<AuditPage, TrailError>,
    },
    /// A background export finished
    ExportDone {
        /// Outcome or the error that prevented it
        result: Result<ExportOutcome, TrailError>,
    },
}

/// Event handler running a polling thread
pub struct EventHandler {
    /// Sender cloned out to background workers
    sender: mpsc::Sender<Event>,
    /// Receiver drained by the main loop
    receiver: mpsc::Receiver<Event>,
    /// Polling thread handle
    #[allow(dead_code)]
    handler: thread::JoinHandle<()>,
}

impl EventHandler {
    /// Start the polling thread with the given tick rate
    pub fn new(tick_rate_ms: u64) -> Self {
        let tick_rate = Duration::from_millis(tick_rate_ms);
        let (sender, receiver) = mpsc::channel();

        let handler = {
            let sender = sender.clone();
            thread::spawn(move || {
                let mut last_tick = Instant::now();
                loop {
                    let timeout = tick_rate
                        .checked_sub(last_tick.elapsed())
                        .unwrap_or(tick_rate);

                    if event::poll(timeout).expect("failed to poll terminal events") {
                        let event = match event::read().expect("failed to read terminal event") {
                            CrosstermEvent::Key(e) => Some(Event::Key(e)),
                            CrosstermEvent::Mouse(e) => Some(Event::Mouse(e)),
                            CrosstermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
                            _ => None,
                        };
                        if let Some(event) = event {
                            if sender.send(event).is_err() {
                                break;
                            }
                        }
                    }

                    if last_tick.elapsed() >= tick_rate {
                        if sender.send(Event::Tick).is_err() {
                            break;
                        }
                        last_tick = Instant::now();
                    }
                }
            })
        };

        Self {
            sender,
            receiver,
            handler,
        }
    }

    /// Block until the next event arrives
    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Sender handle for background workers
    pub fn sender(&self) -> mpsc::Sender<Event> {
        self.sender.clone()
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new(250)
    }
}
