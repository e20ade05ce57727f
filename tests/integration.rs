// Integration tests (native) for the `spaghetti-strings` crate.
// Everything here goes through the public API only and never touches the
// browser: a memory store, a recording note sink and a counting surface
// stand in for localStorage, Web Audio and the canvas.

use std::cell::RefCell;
use std::rc::Rc;

use spaghetti_strings::{
    MemoryStore, NoteSink, NullSink, Point, PointerState, PointerTracker, Settings, Spaghetti,
    SpaghettiError, StringStore, Surface,
};

#[derive(Clone, Default)]
struct Notes(Rc<RefCell<Vec<String>>>);

impl NoteSink for Notes {
    fn trigger(&mut self, note: &str, _duration: &str) {
        self.0.borrow_mut().push(note.to_string());
    }
}

#[derive(Default)]
struct CountingSurface {
    curves: usize,
    lines: usize,
}

impl Surface for CountingSurface {
    fn clear(&mut self, _width: f64, _height: f64) {
        self.curves = 0;
        self.lines = 0;
    }
    fn set_stroke(&mut self, _color: &str, _width: f64) {}
    fn begin_path(&mut self) {}
    fn move_to(&mut self, _p: Point) {}
    fn line_to(&mut self, _p: Point) {
        self.lines += 1;
    }
    fn bezier_curve_to(&mut self, _c1: Point, _c2: Point, _end: Point) {
        self.curves += 1;
    }
    fn close_path(&mut self) {}
    fn stroke(&mut self) {}
    fn fill_rect(&mut self, _x: f64, _y: f64, _width: f64, _height: f64, _color: &str) {}
    fn fill_text(&mut self, _text: &str, _at: Point, _color: &str) {}
}

fn settings(json: &str) -> Settings {
    Settings::from_json(json).unwrap()
}

#[test]
fn six_point_string_from_origin() {
    let mut board = Spaghetti::new(settings(r#"{"totalPoints": 6}"#), MemoryStore::new(), NullSink).unwrap();
    let string = board
        .add_new_string(Point::new(0.0, 0.0), Point::new(200.0, 0.0))
        .unwrap();

    assert_eq!(string.length(), 200.0);
    assert_eq!(string.angle(), 0.0);
    assert_eq!(string.note(), "E4");
    let xs: Vec<f64> = string.vertices().iter().map(|v| v.initial().x).collect();
    assert_eq!(xs, [0.0, 40.0, 80.0, 120.0, 160.0, 200.0]);
    assert!(string.vertices()[0].is_anchor());
    assert!(string.vertices()[5].is_anchor());
    assert!(string.vertices()[1..5].iter().all(|v| !v.is_anchor()));
}

#[test]
fn mouse_drag_creates_string_and_short_drag_does_not() {
    let mut board = Spaghetti::new(Settings::default(), MemoryStore::new(), NullSink).unwrap();
    let mut pointer = PointerTracker::new();

    pointer.mouse_down(Point::new(10.0, 10.0));
    pointer.mouse_move(Point::new(100.0, 10.0), 0.0);
    assert!(pointer.snapshot().drawing);
    let gesture = pointer.mouse_up(Point::new(200.0, 10.0)).unwrap();
    assert!(!pointer.snapshot().drawing);
    assert!(board.add_new_string(gesture.start, gesture.end).is_some());

    pointer.mouse_down(Point::new(50.0, 50.0));
    let gesture = pointer.mouse_up(Point::new(60.0, 55.0)).unwrap();
    assert!(board.add_new_string(gesture.start, gesture.end).is_none());

    assert_eq!(board.strings().len(), 1);
    assert_eq!(board.strings()[0].length(), 190.0);
}

#[test]
fn sweeping_through_a_string_plays_its_note_then_it_settles() {
    let notes = Notes::default();
    let mut board = Spaghetti::new(settings(r#"{"totalPoints": 6}"#), MemoryStore::new(), notes.clone()).unwrap();
    board.resize(400.0, 300.0);
    board.add_new_string(Point::new(0.0, 100.0), Point::new(200.0, 100.0));

    let mut surface = CountingSurface::default();
    let mut pointer = PointerTracker::new();

    pointer.mouse_move(Point::new(80.0, 60.0), 0.0);
    pointer.sample(0.0);
    pointer.mouse_move(Point::new(80.0, 105.0), 50.0);
    pointer.sample(100.0);
    assert_eq!(pointer.speed(), 450.0);
    board.frame(&mut surface, &pointer.snapshot(), 100.0);
    assert!(notes.0.borrow().is_empty());

    pointer.mouse_move(Point::new(80.0, 180.0), 120.0);
    pointer.sample(120.0);
    board.frame(&mut surface, &pointer.snapshot(), 120.0);
    assert_eq!(*notes.0.borrow(), ["E4"]);
    assert_eq!(surface.curves, 6);

    let plucked = &board.strings()[0].vertices()[2];
    assert_eq!(plucked.velocity(), Point::new(22.5, 22.5));

    for frame in 0..3_000 {
        board.frame(&mut surface, &PointerState::default(), 136.0 + frame as f64 * 16.0);
    }
    for vertex in board.strings()[0].vertices() {
        assert_eq!(vertex.current(), vertex.initial());
        assert_eq!(vertex.velocity(), Point::new(0.0, 0.0));
    }
    assert_eq!(notes.0.borrow().len(), 1);
}

#[test]
fn stored_strings_survive_a_remount() {
    let store = MemoryStore::new();
    let persisted = settings(r#"{"withLocalStorage": true, "totalPoints": 4}"#);

    let mut board = Spaghetti::new(persisted.clone(), store.clone(), NullSink).unwrap();
    board.add_new_string(Point::new(20.0, 20.0), Point::new(20.0, 220.0));
    board.add_new_string(Point::new(300.0, 40.0), Point::new(100.0, 40.0));
    drop(board);

    assert_eq!(
        store.raw().as_deref(),
        Some(r#"[{"a":{"x":20.0,"y":20.0},"b":{"x":20.0,"y":220.0}},{"a":{"x":300.0,"y":40.0},"b":{"x":100.0,"y":40.0}}]"#)
    );

    let restored = Spaghetti::new(persisted, store.clone(), NullSink).unwrap();
    assert_eq!(restored.strings().len(), 2);
    assert_eq!(restored.strings()[1].a(), Point::new(300.0, 40.0));
    assert_eq!(restored.strings()[1].vertices().len(), 4);
    assert_eq!(store.load().len(), 2);
}

#[test]
fn two_finger_touch_previews_then_creates() {
    use spaghetti_strings::TouchPoint;

    let mut board = Spaghetti::new(Settings::default(), MemoryStore::new(), NullSink).unwrap();
    let mut pointer = PointerTracker::new();
    let mut surface = CountingSurface::default();

    pointer.touch_start(&[TouchPoint::new(1, 10.0, 10.0)]);
    pointer.touch_start(&[TouchPoint::new(2, 90.0, 10.0)]);
    pointer.touch_move(&[TouchPoint::new(2, 150.0, 60.0)], 0.0);
    let state = pointer.snapshot();
    assert!(state.drawing);
    assert_eq!(state.preview_end(), Some(Point::new(150.0, 60.0)));
    board.frame(&mut surface, &state, 0.0);
    assert_eq!(surface.lines, 1);

    assert!(pointer.touch_end(&[TouchPoint::new(1, 10.0, 10.0)]).is_none());
    let gesture = pointer.touch_end(&[TouchPoint::new(2, 150.0, 60.0)]).unwrap();
    assert_eq!(gesture.start, Point::new(10.0, 10.0));
    assert_eq!(gesture.end, Point::new(150.0, 60.0));
    assert!(board.add_new_string(gesture.start, gesture.end).is_some());
}

#[test]
fn lifting_a_finger_inside_a_string_lets_it_go() {
    use spaghetti_strings::TouchPoint;

    let notes = Notes::default();
    let mut board = Spaghetti::new(settings(r#"{"totalPoints": 6}"#), MemoryStore::new(), notes.clone()).unwrap();
    board.add_new_string(Point::new(0.0, 100.0), Point::new(200.0, 100.0));
    let mut surface = CountingSurface::default();
    let mut pointer = PointerTracker::new();

    pointer.sample(0.0);
    pointer.touch_start(&[TouchPoint::new(1, 80.0, 60.0)]);
    pointer.touch_move(&[TouchPoint::new(1, 80.0, 60.0)], 0.0);
    pointer.touch_move(&[TouchPoint::new(1, 80.0, 115.0)], 50.0);
    pointer.sample(100.0);
    board.frame(&mut surface, &pointer.snapshot(), 100.0);
    let held = &board.strings()[0].vertices()[2];
    assert_eq!(held.current(), Point::new(80.0, 112.0));
    assert!(held.hitbox().is_some_and(|h| h.hitting()));

    assert!(pointer.touch_end(&[TouchPoint::new(1, 80.0, 115.0)]).is_none());
    assert_eq!(pointer.snapshot().current, None);
    for frame in 0..3_000 {
        let now = 116.0 + frame as f64 * 16.0;
        pointer.sample(now);
        board.frame(&mut surface, &pointer.snapshot(), now);
    }

    assert_eq!(*notes.0.borrow(), ["E4"]);
    for vertex in board.strings()[0].vertices() {
        assert_eq!(vertex.current(), vertex.initial());
        assert!(!vertex.hitbox().is_some_and(|h| h.hitting()));
    }
}

#[test]
fn settings_reject_bad_values() {
    assert!(matches!(
        Settings::from_json(r#"{"totalPoints": 1}"#),
        Err(SpaghettiError::InvalidSetting { name: "totalPoints", .. })
    ));
    assert!(matches!(
        Settings::from_json(r#"{"totalPoints": "five"}"#),
        Err(SpaghettiError::SettingsJson(_))
    ));
    assert!(matches!(
        Settings::from_json(r#"{"viscosity": 0.2}"#),
        Err(SpaghettiError::InvalidSetting { name: "viscosity", .. })
    ));
    let custom = settings(r#"{"tonic": "D", "scale": "major", "lowPitch": 4, "highPitch": 4}"#);
    assert_eq!(custom.keyboard().unwrap(), ["C#4", "B4", "A4", "G4", "F#4", "E4", "D4"]);
}
