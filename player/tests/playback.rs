use interactflow_common::{
    ButtonId, Event, JsonRecordingStore, KeyId, NamedKey, Recording, RecordingStore, Result,
    SystemClock,
};
use interactflow_player::{InputInjector, PlaybackEngine};
use rdev::{Button, EventType, Key};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Default)]
struct CollectingInjector {
    sent: Mutex<Vec<EventType>>,
}

impl CollectingInjector {
    fn sent(&self) -> Vec<EventType> {
        self.sent.lock().unwrap().clone()
    }
}

impl InputInjector for CollectingInjector {
    fn send(&self, event: &EventType) -> Result<()> {
        self.sent.lock().unwrap().push(event.clone());
        Ok(())
    }
}

fn evenly_spaced(count: usize, step: f64) -> Recording {
    Recording::new(
        (0..count)
            .map(|i| Event::MouseMove {
                timestamp: i as f64 * step,
                x: i as i32,
                y: i as i32,
            })
            .collect(),
    )
}

fn timed_play(speed: f64) -> Duration {
    let mut engine = PlaybackEngine::with_injector(CollectingInjector::default(), SystemClock::new());
    // Last event at 0.3s.
    engine.load(evenly_spaced(4, 0.1));

    let started = Instant::now();
    let report = engine.play(speed).unwrap();
    assert_eq!(report.injected, 4);
    started.elapsed()
}

#[test]
fn test_wall_clock_duration_follows_speed() {
    let normal = timed_play(1.0);
    assert!(normal >= Duration::from_millis(295), "{:?}", normal);
    assert!(normal < Duration::from_millis(450), "{:?}", normal);

    let double = timed_play(2.0);
    assert!(double >= Duration::from_millis(145), "{:?}", double);
    assert!(double < Duration::from_millis(300), "{:?}", double);
}

#[test]
fn test_stop_from_another_thread() {
    let mut engine = PlaybackEngine::with_injector(CollectingInjector::default(), SystemClock::new());
    // One event immediately, then one every 200ms.
    engine.load(evenly_spaced(10, 0.2));
    let engine = Arc::new(engine);

    let player = {
        let engine = engine.clone();
        thread::spawn(move || engine.play(1.0).unwrap())
    };

    // Lands during the wait before the second event.
    thread::sleep(Duration::from_millis(100));
    engine.stop_handle().stop();

    let report = player.join().unwrap();
    assert!(report.cancelled);
    assert_eq!(report.injected, 1);
    assert!(!engine.is_playing());
}

#[test]
fn test_saved_recording_replays_identically() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonRecordingStore::new(dir.path());
    let events = vec![
        Event::MouseMove {
            timestamp: 0.0,
            x: 40,
            y: 60,
        },
        Event::MouseClick {
            timestamp: 0.01,
            x: Some(40),
            y: Some(60),
            button: ButtonId::Right,
            pressed: true,
        },
        Event::MouseClick {
            timestamp: 0.02,
            x: Some(40),
            y: Some(60),
            button: ButtonId::Right,
            pressed: false,
        },
        Event::KeyPress {
            timestamp: 0.03,
            key: KeyId::Named(NamedKey::Shift),
        },
        Event::KeyPress {
            timestamp: 0.04,
            key: KeyId::Char('a'),
        },
        Event::KeyRelease {
            timestamp: 0.05,
            key: KeyId::Char('a'),
        },
        Event::KeyRelease {
            timestamp: 0.06,
            key: KeyId::Named(NamedKey::Shift),
        },
    ];

    let path = store.save(&events, Some("replay")).unwrap().unwrap();
    let recording = store.load(&path).unwrap();
    assert_eq!(recording.events, events);

    let mut engine = PlaybackEngine::with_injector(CollectingInjector::default(), SystemClock::new());
    engine.load(recording);
    let report = engine.play(10.0).unwrap();
    assert_eq!(report.injected, events.len());

    let expected = vec![
        EventType::MouseMove { x: 40.0, y: 60.0 },
        EventType::MouseMove { x: 40.0, y: 60.0 },
        EventType::ButtonPress(Button::Right),
        EventType::MouseMove { x: 40.0, y: 60.0 },
        EventType::ButtonRelease(Button::Right),
        EventType::KeyPress(Key::ShiftLeft),
        EventType::KeyPress(Key::KeyA),
        EventType::KeyRelease(Key::KeyA),
        EventType::KeyRelease(Key::ShiftLeft),
    ];
    assert_eq!(engine.injector().sent(), expected);
}
