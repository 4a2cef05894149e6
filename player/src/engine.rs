use interactflow_common::platform::{platform_button, platform_key};
use interactflow_common::{Clock, Error, Event, Recording, Result, SystemClock};
use rdev::EventType as RdevEventType;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::injector::{InputInjector, RdevInjector};

/// What happened to the events of one `play` call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackReport {
    pub injected: usize,
    /// Events with a key that has no platform equivalent.
    pub skipped: usize,
    /// Events whose injection returned an error.
    pub failed: usize,
    pub cancelled: bool,
}

/// Stops a running playback from another thread or a signal task.
#[derive(Debug, Clone)]
pub struct PlaybackHandle {
    playing: Arc<AtomicBool>,
}

impl PlaybackHandle {
    pub fn stop(&self) {
        if self.playing.swap(false, Ordering::SeqCst) {
            info!("Playback stopped");
        } else {
            warn!("No playback in progress");
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }
}

enum Outcome {
    Injected,
    Skipped(String),
}

// Clears the playing flag however the play loop exits, unwinding included.
struct PlayingGuard<'a> {
    playing: &'a AtomicBool,
}

impl Drop for PlayingGuard<'_> {
    fn drop(&mut self) {
        self.playing.store(false, Ordering::SeqCst);
        info!("Playback finished");
    }
}

pub struct PlaybackEngine<I = RdevInjector, C = SystemClock> {
    injector: I,
    clock: C,
    events: Vec<Event>,
    playing: Arc<AtomicBool>,
    position: AtomicUsize,
}

impl PlaybackEngine {
    /// Replays into the real pointer and keyboard.
    pub fn new() -> Self {
        Self::with_injector(RdevInjector::new(), SystemClock::new())
    }
}

impl Default for PlaybackEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: InputInjector, C: Clock> PlaybackEngine<I, C> {
    pub fn with_injector(injector: I, clock: C) -> Self {
        PlaybackEngine {
            injector,
            clock,
            events: Vec::new(),
            playing: Arc::new(AtomicBool::new(false)),
            position: AtomicUsize::new(0),
        }
    }

    pub fn load(&mut self, recording: Recording) {
        self.events = recording.events;
        self.position.store(0, Ordering::SeqCst);
        info!("Loaded {} events for playback", self.events.len());
    }

    pub fn injector(&self) -> &I {
        &self.injector
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Index of the next event to replay.
    pub fn position(&self) -> usize {
        self.position.load(Ordering::SeqCst)
    }

    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    pub fn stop_handle(&self) -> PlaybackHandle {
        PlaybackHandle {
            playing: self.playing.clone(),
        }
    }

    /// Requests cancellation. Takes effect before the next event is injected.
    pub fn stop(&self) {
        self.stop_handle().stop();
    }

    /// Replays the loaded events on the calling thread, keeping their
    /// relative timing divided by `speed`.
    pub fn play(&self, speed: f64) -> Result<PlaybackReport> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(Error::InvalidSpeed(speed));
        }

        let mut report = PlaybackReport::default();
        if self.events.is_empty() {
            warn!("No events to play");
            return Ok(report);
        }

        if self.playing.swap(true, Ordering::SeqCst) {
            warn!("Playback is already in progress");
            return Ok(report);
        }
        let _guard = PlayingGuard {
            playing: &self.playing,
        };

        let total = self.events.len();
        info!("Playing {} events at {}x speed", total, speed);
        self.position.store(0, Ordering::SeqCst);

        let mut previous = 0.0;
        for (index, event) in self.events.iter().enumerate() {
            if !self.is_playing() {
                report.cancelled = true;
                break;
            }

            let timestamp = event.timestamp();
            self.wait((timestamp - previous) / speed);
            previous = timestamp;

            // A stop that arrived during the wait wins over this event.
            if !self.is_playing() {
                report.cancelled = true;
                break;
            }

            match self.inject(event) {
                Ok(Outcome::Injected) => report.injected += 1,
                Ok(Outcome::Skipped(reason)) => {
                    warn!("Skipping {} event #{}: {}", event.kind(), index, reason);
                    report.skipped += 1;
                }
                Err(err) => {
                    error!("Error playing {} event #{}: {}", event.kind(), index, err);
                    debug!("Failed event: {:?}", event);
                    report.failed += 1;
                }
            }
            self.position.store(index + 1, Ordering::SeqCst);
        }

        if report.cancelled {
            info!("Playback cancelled after {} of {} events", self.position(), total);
        }
        debug!("{:?}", report);
        Ok(report)
    }

    fn wait(&self, delay_secs: f64) {
        if delay_secs <= 0.0 {
            return;
        }
        match Duration::try_from_secs_f64(delay_secs) {
            Ok(delay) => self.clock.sleep(delay),
            Err(err) => warn!("Not waiting for invalid delay {}s: {}", delay_secs, err),
        }
    }

    fn inject(&self, event: &Event) -> Result<Outcome> {
        match event {
            Event::MouseMove { x, y, .. } => self.move_to(*x, *y)?,
            Event::MouseClick { button, pressed, .. } => {
                let button = platform_button(button)
                    .ok_or_else(|| Error::injection(format!("unknown mouse button {}", button)))?;
                // Without a recorded position the click lands wherever the pointer is.
                if let Some((x, y)) = event.position() {
                    self.move_to(x, y)?;
                }
                if *pressed {
                    self.injector.send(&RdevEventType::ButtonPress(button))?;
                } else {
                    self.injector.send(&RdevEventType::ButtonRelease(button))?;
                }
            }
            Event::MouseScroll { dx, dy, .. } => {
                self.injector.send(&RdevEventType::Wheel {
                    delta_x: *dx,
                    delta_y: *dy,
                })?;
            }
            Event::KeyPress { key, .. } => match platform_key(key) {
                Some(key) => self.injector.send(&RdevEventType::KeyPress(key))?,
                None => return Ok(Outcome::Skipped(format!("unrecognized key {}", key))),
            },
            Event::KeyRelease { key, .. } => match platform_key(key) {
                Some(key) => self.injector.send(&RdevEventType::KeyRelease(key))?,
                None => return Ok(Outcome::Skipped(format!("unrecognized key {}", key))),
            },
        }
        Ok(Outcome::Injected)
    }

    fn move_to(&self, x: i32, y: i32) -> Result<()> {
        self.injector.send(&RdevEventType::MouseMove {
            x: f64::from(x),
            y: f64::from(y),
        })
    }
}
