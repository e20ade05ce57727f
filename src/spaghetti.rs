//! The board: every drawn string, its notes, and the per-frame step.

use crate::audio::NoteSink;
use crate::error::Result;
use crate::geometry::{angle_between, length, lerp, Point};
use crate::pointer::PointerState;
use crate::settings::{HiRange, Settings};
use crate::store::{StoredString, StringStore};
use crate::surface::Surface;
use crate::vertex::InteractiveVertex;

const NOTE_LABEL_COLOR: &str = "#424242";
const VERTEX_COLOR: &str = "#000";
const CONTROL_COLOR: &str = "#fff";
const HITBOX_COLOR: &str = "rgba(0, 0, 255, 0.2)";

/// One string between two fixed anchors. Topology never changes after creation.
#[derive(Clone, Debug)]
pub struct SpaghettiString {
    a: Point,
    b: Point,
    length: f64,
    angle: f64,
    vertex_separation: f64,
    note: String,
    vertices: Vec<InteractiveVertex>,
}

impl SpaghettiString {
    pub fn a(&self) -> Point {
        self.a
    }

    pub fn b(&self) -> Point {
        self.b
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn vertex_separation(&self) -> f64 {
        self.vertex_separation
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn vertices(&self) -> &[InteractiveVertex] {
        &self.vertices
    }

    /// Moves the interior vertices one frame and refreshes the control
    /// points. Returns true when any vertex was strummed.
    fn step(&mut self, pointer: &PointerState, now_ms: f64) -> bool {
        let mut strummed = false;
        let last = self.vertices.len() - 1;
        for vertex in &mut self.vertices[1..last] {
            strummed |= vertex.render(pointer, now_ms);
        }
        for i in 0..last {
            let (head, tail) = self.vertices.split_at_mut(i + 1);
            head[i].set_control_point(&tail[0]);
        }
        self.vertices[last].reset_control_point();
        strummed
    }

    fn draw<S: Surface + ?Sized>(&self, surface: &mut S, color: &str, width: f64) {
        surface.set_stroke(color, width);
        surface.begin_path();
        surface.move_to(self.vertices[0].current());
        for vertex in &self.vertices {
            surface.bezier_curve_to(vertex.current(), vertex.control(), vertex.control());
        }
        surface.stroke();
    }

    fn draw_debug<S: Surface + ?Sized>(&self, surface: &mut S) {
        let label = Point::new(self.a.x - 20.0, self.a.y - 10.0);
        surface.fill_text(&self.note, label, NOTE_LABEL_COLOR);

        for vertex in &self.vertices {
            let p = vertex.current();
            let control = vertex.control();
            surface.fill_rect(p.x - 2.0, p.y - 2.0, 4.0, 4.0, VERTEX_COLOR);
            surface.fill_rect(control.x - 1.0, control.y - 1.0, 2.0, 2.0, CONTROL_COLOR);

            let Some(hitbox) = vertex.hitbox() else {
                continue;
            };
            let [a, b, c, d] = hitbox.coords().corners();
            surface.set_stroke(HITBOX_COLOR, 1.0);
            surface.begin_path();
            surface.move_to(a);
            surface.line_to(b);
            surface.line_to(c);
            surface.line_to(d);
            surface.close_path();
            surface.stroke();

            let v = vertex.velocity();
            let readout = format!("{:.0},{:.0} v{:.1},{:.1}", p.x, p.y, v.x, v.y);
            surface.fill_text(&readout, Point::new(p.x + 6.0, p.y + 18.0), NOTE_LABEL_COLOR);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cursor {
    Crosshair,
    Grabbing,
}

impl Cursor {
    pub fn as_css(self) -> &'static str {
        match self {
            Cursor::Crosshair => "crosshair",
            Cursor::Grabbing => "grabbing",
        }
    }
}

/// Keyboard slot for a string of `length`: short strings land at the start
/// of the keyboard, strings at or past `range.end` on the last slot.
pub fn note_index(length: f64, keyboard_len: usize, range: HiRange) -> usize {
    if keyboard_len == 0 {
        return 0;
    }
    let t = ((length - range.start) / (range.end - range.start)).clamp(0.0, 1.0);
    let index = (keyboard_len as f64 * t).round() as usize;
    index.min(keyboard_len - 1)
}

pub struct Spaghetti {
    settings: Settings,
    keyboard: Vec<String>,
    strings: Vec<SpaghettiString>,
    store: Box<dyn StringStore>,
    sink: Box<dyn NoteSink>,
    muted: bool,
    width: f64,
    height: f64,
}

impl Spaghetti {
    /// Builds the board and, with persistence on, replays the stored strings.
    pub fn new(
        settings: Settings,
        store: impl StringStore + 'static,
        sink: impl NoteSink + 'static,
    ) -> Result<Self> {
        let settings = settings.validate()?;
        let keyboard = settings.keyboard()?;
        let mut spaghetti = Self {
            settings,
            keyboard,
            strings: Vec::new(),
            store: Box::new(store),
            sink: Box::new(sink),
            muted: false,
            width: 0.0,
            height: 0.0,
        };
        if spaghetti.settings.with_local_storage {
            for StoredString { a, b } in spaghetti.store.load() {
                spaghetti.build_string(a, b);
            }
            log::info!("restored {} strings", spaghetti.strings.len());
        }
        Ok(spaghetti)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn keyboard(&self) -> &[String] {
        &self.keyboard
    }

    pub fn strings(&self) -> &[SpaghettiString] {
        &self.strings
    }

    pub fn note_for_length(&self, length: f64) -> &str {
        let index = note_index(length, self.keyboard.len(), self.settings.hi_range);
        self.keyboard.get(index).map(String::as_str).unwrap_or_default()
    }

    /// Adds a string without persisting it. `None` when `a` and `b` are
    /// closer than the minimum string length.
    pub fn build_string(&mut self, a: Point, b: Point) -> Option<&SpaghettiString> {
        let length = length(a, b);
        if length < self.settings.min_string_length {
            log::debug!("discarding string of length {:.1}", length);
            return None;
        }

        let angle = angle_between(a, b);
        let segments = self.settings.total_points - 1;
        let vertex_separation = length / segments as f64;
        let note = self.note_for_length(length).to_string();
        let physics = self.settings.physics();
        let vertices = (0..=segments)
            .map(|i| {
                let position = lerp(a, b, i as f64 / segments as f64);
                if i == 0 || i == segments {
                    InteractiveVertex::anchor(position, physics)
                } else {
                    InteractiveVertex::free(
                        position,
                        angle,
                        vertex_separation,
                        self.settings.hitbox_size,
                        physics,
                    )
                }
            })
            .collect();

        log::debug!("Angle: {} Length: {} Note: {}", angle, length, note);
        self.strings.push(SpaghettiString {
            a,
            b,
            length,
            angle,
            vertex_separation,
            note,
            vertices,
        });
        self.strings.last()
    }

    /// A finished gesture: builds the string and persists it when enabled.
    pub fn add_new_string(&mut self, a: Point, b: Point) -> Option<&SpaghettiString> {
        let persist = self.settings.with_local_storage;
        let index = self.strings.len();
        self.build_string(a, b)?;
        if persist {
            self.store.append(StoredString { a, b });
        }
        self.strings.get(index)
    }

    pub fn clear(&mut self) {
        if self.settings.with_local_storage {
            self.store.clear();
        }
        self.strings.clear();
        log::info!("strings cleared");
    }

    /// Steps and draws every string, plus the live drag preview.
    pub fn frame<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        pointer: &PointerState,
        now_ms: f64,
    ) -> Cursor {
        surface.clear(self.width, self.height);

        let color = self.settings.spaghetti_color.as_str();
        let width = self.settings.spaghetti_width;
        for string in &mut self.strings {
            if string.step(pointer, now_ms) && !self.muted {
                self.sink.trigger(&string.note, &self.settings.note_duration);
            }
            string.draw(surface, color, width);
            if self.settings.debug {
                string.draw_debug(surface);
            }
        }

        if !pointer.drawing {
            return Cursor::Crosshair;
        }
        if let (Some(start), Some(end)) = (pointer.start_pos, pointer.preview_end()) {
            surface.set_stroke(color, width);
            surface.begin_path();
            surface.move_to(start);
            surface.line_to(end);
            surface.stroke();
        }
        Cursor::Grabbing
    }

    /// New drawing extent. String coordinates are left as they are.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn wake_audio(&mut self) {
        self.sink.wake();
    }

    pub fn toggle_muted(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }
}
