//! Browser mount: owns the canvas, the event listeners and the frame loop,
//! and feeds DOM events into the pointer tracker and the board.
//!
//! At most one mount exists per page. It lives in a thread-local so event
//! closures can reach it; each callback borrows it only for its own duration.

mod dom;
mod frame_loop;
mod listener;

use std::cell::RefCell;

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use web_sys::{Event, MouseEvent, TouchEvent};

use crate::audio::WebAudioSink;
use crate::error::{Result, SpaghettiError};
use crate::geometry::Point;
use crate::pointer::{Gesture, PointerTracker, TouchPoint};
use crate::settings::Settings;
use crate::spaghetti::{Cursor, Spaghetti};
use crate::store::LocalStorageStore;

use dom::DomNodes;
use frame_loop::FrameLoop;
use listener::Listener;

/// Quiet period after the last `resize` event before the canvas is refitted.
pub const RESIZE_DEBOUNCE_MS: u32 = 300;

thread_local! {
    static MOUNT: RefCell<Option<Mount>> = const { RefCell::new(None) };
}

// --- Public entry points -----------------------------------------------------

/// Mounts a board built from `options` (JSON), replacing any existing one.
pub fn start(options: Option<&str>) -> Result<()> {
    let settings = Settings::from_json(options.unwrap_or_default())?;
    stop();

    log::set_max_level(if settings.debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    });

    let mount = Mount::create(settings)?;
    MOUNT.with(|cell| *cell.borrow_mut() = Some(mount));
    log::info!("spaghetti mounted");
    Ok(())
}

/// Tears the board down: no frame, listener or timer survives this call.
pub fn stop() {
    let previous = MOUNT.with(|cell| cell.try_borrow_mut().ok().and_then(|mut m| m.take()));
    if previous.is_some() {
        drop(previous);
        log::info!("spaghetti stopped");
    }
}

pub fn clear() {
    with_mount(|mount| mount.spaghetti.clear());
}

/// Flips the mute state; `false` when nothing is mounted.
pub fn toggle_mute() -> bool {
    with_mount(Mount::toggle_mute).unwrap_or(false)
}

pub fn string_count() -> u32 {
    with_mount(|mount| mount.spaghetti.strings().len() as u32).unwrap_or(0)
}

fn with_mount<R>(f: impl FnOnce(&mut Mount) -> R) -> Option<R> {
    MOUNT.with(|cell| {
        let mut guard = cell.try_borrow_mut().ok()?;
        guard.as_mut().map(f)
    })
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

// --- Mount -------------------------------------------------------------------

/// Field order is teardown order: the loop stops first, listeners and the
/// pending resize go next, DOM nodes last.
struct Mount {
    frame_loop: Option<FrameLoop>,
    listeners: Vec<Listener>,
    resize: Option<Timeout>, // pending refit
    spaghetti: Spaghetti,
    pointer: PointerTracker,
    cursor: Option<Cursor>,
    nodes: DomNodes,
}

impl Mount {
    fn create(settings: Settings) -> Result<Self> {
        let nodes = DomNodes::create(&settings)?;
        let store = LocalStorageStore::new(settings.local_storage_key.clone());
        let mut spaghetti = Spaghetti::new(settings, store, WebAudioSink::new())?;
        let (width, height) = nodes.fit();
        spaghetti.resize(width, height);
        let mut mount = Self {
            frame_loop: None,
            listeners: Vec::new(),
            resize: None,
            spaghetti,
            pointer: PointerTracker::new(),
            cursor: None,
            nodes,
        };
        mount.attach()?;
        Ok(mount)
    }

    /// Registers listeners and starts the loop. Handlers and frames reach
    /// the mount through [`MOUNT`], so none of them runs before it is stored.
    fn attach(&mut self) -> Result<()> {
        let canvas = self.nodes.canvas.clone();
        let document = self
            .nodes
            .window
            .document()
            .ok_or_else(|| SpaghettiError::Dom("no document".into()))?;

        let mut listeners = vec![
            on(&canvas, "mousedown", |m, e: MouseEvent| m.mouse_down(&e))?,
            on(&canvas, "mousemove", |m, e: MouseEvent| m.mouse_move(&e))?,
            on(&canvas, "mouseup", |m, e: MouseEvent| m.mouse_up(&e))?,
            on(&canvas, "touchstart", |m, e: TouchEvent| m.touch_start(&e))?,
            on(&canvas, "touchmove", |m, e: TouchEvent| m.touch_move(&e))?,
            on(&canvas, "touchend", |m, e: TouchEvent| m.touch_end(&e))?,
            on(&canvas, "touchcancel", |m, e: TouchEvent| m.touch_end(&e))?,
            on(&document, "mouseout", |m, e: MouseEvent| m.mouse_out(&e))?,
            on(&self.nodes.window, "resize", |m, _: Event| m.schedule_resize())?,
        ];
        if let Some(button) = &self.nodes.clear_button {
            listeners.push(on(button, "click", |m, _: Event| m.spaghetti.clear())?);
        }
        if let Some(button) = &self.nodes.mute_button {
            listeners.push(on(button, "click", |m, _: Event| {
                m.toggle_mute();
            })?);
        }
        self.listeners = listeners;

        self.frame_loop = Some(FrameLoop::start(|ts| {
            with_mount(|m| m.tick(ts));
        }));
        Ok(())
    }

    fn tick(&mut self, now: f64) {
        self.pointer.sample(now);
        let pointer = self.pointer.snapshot();
        let cursor = self.spaghetti.frame(&mut self.nodes.context, &pointer, now);
        if self.cursor != Some(cursor) {
            self.nodes.set_cursor(cursor.as_css());
            self.cursor = Some(cursor);
        }
    }

    fn toggle_mute(&mut self) -> bool {
        let muted = self.spaghetti.toggle_muted();
        if let Some(button) = &self.nodes.mute_button {
            let label = if muted { dom::UNMUTE_LABEL } else { dom::MUTE_LABEL };
            button.set_text_content(Some(label));
        }
        muted
    }

    /// Restarts the quiet period; the replaced timeout is cancelled on drop.
    fn schedule_resize(&mut self) {
        self.resize = Some(Timeout::new(RESIZE_DEBOUNCE_MS, || {
            with_mount(Mount::refit);
        }));
    }

    /// Debounced resize: refit the canvas and restart the loop.
    fn refit(&mut self) {
        let (width, height) = self.nodes.fit();
        self.spaghetti.resize(width, height);
        if let Some(frame_loop) = &self.frame_loop {
            frame_loop.restart();
        }
    }

    // --- Input ---------------------------------------------------------------

    fn canvas_point(&self, client_x: i32, client_y: i32) -> Point {
        let rect = self.nodes.canvas.get_bounding_client_rect();
        Point::new(f64::from(client_x) - rect.left(), f64::from(client_y) - rect.top())
    }

    fn mouse_point(&self, event: &MouseEvent) -> Point {
        self.canvas_point(event.client_x(), event.client_y())
    }

    fn touch_points(&self, event: &TouchEvent) -> Vec<TouchPoint> {
        let touches = event.changed_touches();
        (0..touches.length())
            .filter_map(|i| touches.get(i))
            .map(|touch| TouchPoint {
                id: touch.identifier(),
                position: self.canvas_point(touch.client_x(), touch.client_y()),
            })
            .collect()
    }

    fn finish(&mut self, gesture: Option<Gesture>) {
        if let Some(Gesture { start, end }) = gesture {
            self.spaghetti.add_new_string(start, end);
        }
    }

    fn mouse_down(&mut self, event: &MouseEvent) {
        self.spaghetti.wake_audio();
        let p = self.mouse_point(event);
        self.pointer.mouse_down(p);
    }

    fn mouse_move(&mut self, event: &MouseEvent) {
        let p = self.mouse_point(event);
        self.pointer.mouse_move(p, now_ms());
    }

    fn mouse_up(&mut self, event: &MouseEvent) {
        let p = self.mouse_point(event);
        let gesture = self.pointer.mouse_up(p);
        self.finish(gesture);
    }

    /// `mouseout` with no related target means the pointer left the page.
    fn mouse_out(&mut self, event: &MouseEvent) {
        if event.related_target().is_none() {
            let gesture = self.pointer.leave_document();
            self.finish(gesture);
        }
    }

    fn touch_start(&mut self, event: &TouchEvent) {
        event.prevent_default();
        self.spaghetti.wake_audio();
        let touches = self.touch_points(event);
        self.pointer.touch_start(&touches);
    }

    fn touch_move(&mut self, event: &TouchEvent) {
        event.prevent_default();
        let touches = self.touch_points(event);
        self.pointer.touch_move(&touches, now_ms());
    }

    fn touch_end(&mut self, event: &TouchEvent) {
        event.prevent_default();
        let touches = self.touch_points(event);
        let gesture = self.pointer.touch_end(&touches);
        self.finish(gesture);
    }
}

/// Listener whose handler runs against the mounted board.
fn on<E: JsCast + 'static>(
    target: &web_sys::EventTarget,
    kind: &'static str,
    handler: impl Fn(&mut Mount, E) + 'static,
) -> Result<Listener> {
    Listener::new(target, kind, move |event: Event| {
        if let Ok(event) = event.dyn_into::<E>() {
            with_mount(|mount| handler(mount, event));
        }
    })
}
