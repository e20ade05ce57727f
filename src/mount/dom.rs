//! Canvas and button bar creation, and sizing against the wrapper or window.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlElement, Window};

use crate::error::{Result, SpaghettiError};
use crate::settings::Settings;

const CANVAS_STYLE: &str = "position:absolute; top:0; right:0; bottom:0; left:0;";
const UI_STYLE: &str = "position:fixed; top:0; right:0; z-index:10;";
const BUTTON_STYLE: &str = "display:inline-block;";

pub(crate) const CLEAR_LABEL: &str = "Clear";
pub(crate) const MUTE_LABEL: &str = "Mute";
pub(crate) const UNMUTE_LABEL: &str = "Unmute";

/// Everything the mount added to the page; removed again on drop.
pub(crate) struct DomNodes {
    pub(crate) window: Window,
    pub(crate) canvas: HtmlCanvasElement,
    pub(crate) context: CanvasRenderingContext2d,
    pub(crate) ui: HtmlElement,
    pub(crate) clear_button: Option<HtmlElement>,
    pub(crate) mute_button: Option<HtmlElement>,
    wrapper: Option<HtmlElement>,
}

impl DomNodes {
    pub(crate) fn create(settings: &Settings) -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| SpaghettiError::Dom("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| SpaghettiError::Dom("no document".into()))?;
        let body = document
            .body()
            .ok_or_else(|| SpaghettiError::Dom("no body".into()))?;

        let wrapper = match settings.wrapper.as_deref() {
            Some(id) => Some(
                document
                    .get_element_by_id(id)
                    .ok_or_else(|| SpaghettiError::Dom(format!("no element with id '{}'", id)))?
                    .dyn_into::<HtmlElement>()
                    .map_err(|_| SpaghettiError::Dom(format!("'{}' is not an HTML element", id)))?,
            ),
            None => None,
        };

        let canvas: HtmlCanvasElement = create(&document, "canvas")?;
        canvas
            .set_attribute("style", CANVAS_STYLE)
            .map_err(SpaghettiError::dom)?;
        let context: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(SpaghettiError::dom)?
            .ok_or_else(|| SpaghettiError::Dom("2d context unavailable".into()))?
            .dyn_into()
            .map_err(|_| SpaghettiError::Dom("2d context has an unexpected type".into()))?;

        let ui: HtmlElement = create(&document, "div")?;
        ui.set_attribute("style", UI_STYLE).map_err(SpaghettiError::dom)?;
        let clear_button = settings
            .with_clear_button
            .then(|| button(&document, &ui, CLEAR_LABEL))
            .transpose()?;
        let mute_button = settings
            .with_mute_button
            .then(|| button(&document, &ui, MUTE_LABEL))
            .transpose()?;

        let host: &HtmlElement = wrapper.as_ref().unwrap_or(&body);
        host.append_child(&canvas).map_err(SpaghettiError::dom)?;
        body.append_child(&ui).map_err(SpaghettiError::dom)?;

        Ok(Self { window, canvas, context, ui, clear_button, mute_button, wrapper })
    }

    /// Extent of the wrapper element, or of the window when there is none.
    pub(crate) fn measure(&self) -> (u32, u32) {
        match &self.wrapper {
            Some(wrapper) => (
                wrapper.client_width().max(0) as u32,
                wrapper.client_height().max(0) as u32,
            ),
            None => (
                dimension(self.window.inner_width()),
                dimension(self.window.inner_height()),
            ),
        }
    }

    /// Sizes the canvas to [`measure`](Self::measure) and returns the new extent.
    pub(crate) fn fit(&self) -> (f64, f64) {
        let (width, height) = self.measure();
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        (f64::from(width), f64::from(height))
    }

    pub(crate) fn set_cursor(&self, css: &str) {
        let _ = self.canvas.style().set_property("cursor", css);
    }
}

impl Drop for DomNodes {
    fn drop(&mut self) {
        self.canvas.remove();
        self.ui.remove();
    }
}

fn create<T: JsCast>(document: &Document, tag: &str) -> Result<T> {
    document
        .create_element(tag)
        .map_err(SpaghettiError::dom)?
        .dyn_into::<T>()
        .map_err(|_| SpaghettiError::Dom(format!("<{}> has an unexpected type", tag)))
}

fn button(document: &Document, ui: &Element, label: &str) -> Result<HtmlElement> {
    let button: HtmlElement = create(document, "button")?;
    button
        .set_attribute("style", BUTTON_STYLE)
        .map_err(SpaghettiError::dom)?;
    button.set_text_content(Some(label));
    ui.append_child(&button).map_err(SpaghettiError::dom)?;
    Ok(button)
}

fn dimension(value: std::result::Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>) -> u32 {
    value
        .ok()
        .and_then(|v| v.as_f64())
        .map_or(0, |v| v.max(0.0) as u32)
}
