use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::window;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Self-rescheduling `requestAnimationFrame` loop. Dropping it cancels the
/// pending frame, so no tick runs after teardown.
pub(crate) struct FrameLoop {
    running: Rc<Cell<bool>>,
    handle: Rc<Cell<Option<i32>>>,
    callback: FrameCallback,
}

impl FrameLoop {
    pub(crate) fn start(mut tick: impl FnMut(f64) + 'static) -> Self {
        let running = Rc::new(Cell::new(true));
        let handle = Rc::new(Cell::new(None));
        let f: FrameCallback = Rc::new(RefCell::new(None));
        let g = f.clone();

        let (still_running, next_handle) = (running.clone(), handle.clone());
        *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
            next_handle.set(None);
            if !still_running.get() {
                return;
            }
            tick(ts);
            if still_running.get() {
                schedule(&f, &next_handle);
            }
        }) as Box<dyn FnMut(f64)>));

        let frame_loop = Self { running, handle, callback: g };
        schedule(&frame_loop.callback, &frame_loop.handle);
        frame_loop
    }

    /// Cancels the pending frame and schedules a fresh one.
    pub(crate) fn restart(&self) {
        self.cancel();
        self.running.set(true);
        schedule(&self.callback, &self.handle);
    }

    fn cancel(&self) {
        if let (Some(id), Some(w)) = (self.handle.take(), window()) {
            let _ = w.cancel_animation_frame(id);
        }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.running.set(false);
        self.cancel();
        // Breaks the closure <-> callback cycle.
        self.callback.borrow_mut().take();
    }
}

fn schedule(callback: &FrameCallback, handle: &Cell<Option<i32>>) {
    let Some(w) = window() else {
        return;
    };
    if let Some(closure) = callback.borrow().as_ref() {
        match w.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => handle.set(Some(id)),
            Err(err) => log::warn!("requestAnimationFrame failed: {:?}", err),
        }
    }
}
