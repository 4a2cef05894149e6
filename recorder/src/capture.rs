use interactflow_common::platform::{button_id, key_id};
use interactflow_common::{ButtonId, Clock, Event, KeyId, Result, SystemClock};
use rdev::EventType as RdevEventType;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::listener::{InputSource, RdevSource};

/// Minimum travel on either axis before a pointer move is recorded.
pub const MOVE_THRESHOLD: u32 = 5;

struct CaptureBuffer {
    recording: bool,
    started_at: Duration,
    events: Vec<Event>,
    // Baseline for move filtering; only updated when a move is recorded.
    last_recorded_move: Option<(i32, i32)>,
    // Latest raw pointer position, used to place clicks and scrolls. Unknown
    // until the listener has seen a move.
    cursor: Option<(i32, i32)>,
}

struct Shared<C> {
    clock: C,
    buffer: Mutex<CaptureBuffer>,
}

impl<C> Shared<C> {
    fn lock(&self) -> MutexGuard<'_, CaptureBuffer> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The receiving end handed to an [`InputSource`]. Every platform
/// notification goes through here; it is cheap to clone and safe to call from
/// any number of delivery threads.
pub struct CaptureSink<C> {
    shared: Arc<Shared<C>>,
}

impl<C> Clone for CaptureSink<C> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<C: Clock> CaptureSink<C> {
    pub fn dispatch(&self, event: &RdevEventType) {
        match event {
            RdevEventType::MouseMove { x, y } => {
                self.mouse_moved(x.round() as i32, y.round() as i32)
            }
            RdevEventType::ButtonPress(button) => self.mouse_button(button_id(*button), true),
            RdevEventType::ButtonRelease(button) => self.mouse_button(button_id(*button), false),
            RdevEventType::Wheel { delta_x, delta_y } => self.mouse_scrolled(*delta_x, *delta_y),
            RdevEventType::KeyPress(key) => self.key(key_id(*key), true),
            RdevEventType::KeyRelease(key) => self.key(key_id(*key), false),
        }
    }

    pub fn mouse_moved(&self, x: i32, y: i32) {
        let mut buffer = self.shared.lock();
        buffer.cursor = Some((x, y));
        if !buffer.recording {
            return;
        }

        if let Some((last_x, last_y)) = buffer.last_recorded_move {
            if x.abs_diff(last_x) < MOVE_THRESHOLD && y.abs_diff(last_y) < MOVE_THRESHOLD {
                return;
            }
        }
        buffer.last_recorded_move = Some((x, y));

        let timestamp = self.elapsed(&buffer);
        buffer.events.push(Event::MouseMove { timestamp, x, y });
    }

    pub fn mouse_button(&self, button: ButtonId, pressed: bool) {
        self.append(|timestamp, cursor| Event::MouseClick {
            timestamp,
            x: cursor.map(|(x, _)| x),
            y: cursor.map(|(_, y)| y),
            button,
            pressed,
        });
    }

    pub fn mouse_scrolled(&self, dx: i64, dy: i64) {
        self.append(|timestamp, cursor| Event::MouseScroll {
            timestamp,
            x: cursor.map(|(x, _)| x),
            y: cursor.map(|(_, y)| y),
            dx,
            dy,
        });
    }

    pub fn key(&self, key: KeyId, pressed: bool) {
        self.append(|timestamp, _| {
            if pressed {
                Event::KeyPress { timestamp, key }
            } else {
                Event::KeyRelease { timestamp, key }
            }
        });
    }

    // Stamping happens under the lock, so buffer order is timestamp order
    // no matter which thread delivered the notification.
    fn append(&self, build: impl FnOnce(f64, Option<(i32, i32)>) -> Event) {
        let mut buffer = self.shared.lock();
        if !buffer.recording {
            return;
        }
        let timestamp = self.elapsed(&buffer);
        let event = build(timestamp, buffer.cursor);
        if matches!(event, Event::MouseClick { .. } | Event::MouseScroll { .. })
            && buffer.cursor.is_none()
        {
            debug!("Pointer position not known yet, {} stored without one", event.kind());
        }
        buffer.events.push(event);
    }

    fn elapsed(&self, buffer: &CaptureBuffer) -> f64 {
        self.shared
            .clock
            .now()
            .saturating_sub(buffer.started_at)
            .as_secs_f64()
    }
}

/// Turns live input notifications into a filtered, timestamped, ordered
/// event buffer.
pub struct EventCapture<S = RdevSource, C = SystemClock> {
    shared: Arc<Shared<C>>,
    source: S,
    attached: bool,
}

impl EventCapture {
    /// Captures from the real pointer and keyboard.
    pub fn new() -> Self {
        Self::with_source(RdevSource::new(), SystemClock::new())
    }
}

impl Default for EventCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: InputSource<C>, C: Clock + 'static> EventCapture<S, C> {
    pub fn with_source(source: S, clock: C) -> Self {
        EventCapture {
            shared: Arc::new(Shared {
                clock,
                buffer: Mutex::new(CaptureBuffer {
                    recording: false,
                    started_at: Duration::ZERO,
                    events: Vec::new(),
                    last_recorded_move: None,
                    cursor: None,
                }),
            }),
            source,
            attached: false,
        }
    }

    pub fn sink(&self) -> CaptureSink<C> {
        CaptureSink {
            shared: self.shared.clone(),
        }
    }

    pub fn start(&mut self) -> Result<()> {
        if self.is_recording() {
            warn!("Recording is already in progress");
            return Ok(());
        }

        // The platform listener cannot be detached again, so it is attached
        // once and gated by the recording flag afterwards.
        if !self.attached {
            self.source.attach(self.sink())?;
            self.attached = true;
        }

        let mut buffer = self.shared.lock();
        buffer.events.clear();
        buffer.last_recorded_move = None;
        buffer.started_at = self.shared.clock.now();
        buffer.recording = true;
        drop(buffer);

        info!("Recording started...");
        Ok(())
    }

    pub fn stop(&mut self) {
        let mut buffer = self.shared.lock();
        if !buffer.recording {
            warn!("No recording in progress");
            return;
        }
        buffer.recording = false;
        let captured = buffer.events.len();
        drop(buffer);

        info!("Recording stopped ({} events captured)", captured);
    }

    pub fn is_recording(&self) -> bool {
        self.shared.lock().recording
    }

    pub fn len(&self) -> usize {
        self.shared.lock().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A copy of everything captured so far.
    pub fn events(&self) -> Vec<Event> {
        self.shared.lock().events.clone()
    }

    /// Moves the captured events out, leaving the buffer empty.
    pub fn take_events(&mut self) -> Vec<Event> {
        let events = std::mem::take(&mut self.shared.lock().events);
        debug!("Handing over {} captured events", events.len());
        events
    }
}
