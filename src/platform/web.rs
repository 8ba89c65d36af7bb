//! Browser glue: animation frames, the 2D canvas surface, listeners, mounting

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, Event, EventTarget, HtmlCanvasElement,
    KeyboardEvent, MouseEvent, PointerEvent, VisibilityState, Window,
};

use super::{FrameCallback, FrameHandle, FrameScheduler};
use crate::input::{InputEvent, Key};
use crate::persistence::{BestScoreStore, LocalStorageBackend, ScoreStore};
use crate::renderer::{Color, Font, Surface};
use crate::session::{FrameLoop, Session, readout_line};
use crate::settings::Settings;
use crate::sim::{
    AsteroidState, DodgeState, Playfield, ReactionState, Rect, RunnerState, Simulation,
    SnakeState,
};

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

/// Monotonic clock shared with `requestAnimationFrame` timestamps
fn performance_now(window: &Window) -> f64 {
    window.performance().map(|p| p.now()).unwrap_or(0.0)
}

/// `requestAnimationFrame`-backed scheduler
pub struct BrowserScheduler {
    window: Window,
}

impl BrowserScheduler {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl FrameScheduler for BrowserScheduler {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        let closure = Closure::once_into_js(move |time: f64| callback(time));
        match self.window.request_animation_frame(closure.unchecked_ref()) {
            Ok(id) => FrameHandle(id),
            Err(err) => {
                log::error!("requestAnimationFrame failed: {err:?}");
                FrameHandle(0)
            }
        }
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        let _ = self.window.cancel_animation_frame(handle.0);
    }
}

/// [`Surface`] over a 2D canvas context in device-independent pixels
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    fn circle_path(&self, center: Vec2, radius: f32) {
        self.ctx.begin_path();
        let _ = self.ctx.arc(
            f64::from(center.x),
            f64::from(center.y),
            f64::from(radius.max(0.0)),
            0.0,
            TAU,
        );
    }
}

impl Surface for CanvasSurface {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ctx.set_fill_style_str(color.0);
        self.ctx.fill_rect(
            f64::from(rect.x),
            f64::from(rect.y),
            f64::from(rect.w),
            f64::from(rect.h),
        );
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.ctx.set_fill_style_str(color.0);
        self.circle_path(center, radius);
        self.ctx.fill();
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, line_width: f32, color: Color) {
        self.ctx.set_stroke_style_str(color.0);
        self.ctx.set_line_width(f64::from(line_width));
        self.circle_path(center, radius);
        self.ctx.stroke();
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, font: Font, color: Color) {
        self.ctx.set_font(&font.css());
        self.ctx.set_fill_style_str(color.0);
        let _ = self.ctx.fill_text(text, f64::from(pos.x), f64::from(pos.y));
    }
}

pub fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(JsValue::from)
}

/// Size the backing store for the device pixel ratio and draw in CSS pixels
pub fn fit_canvas(
    window: &Window,
    canvas: &HtmlCanvasElement,
    ctx: &CanvasRenderingContext2d,
    field: Playfield,
) -> Result<(), JsValue> {
    let dpr = window.device_pixel_ratio().max(1.0);
    let width = f64::from(field.width);
    let height = f64::from(field.height);
    canvas.set_width((width * dpr).round() as u32);
    canvas.set_height((height * dpr).round() as u32);

    let style = canvas.style();
    style.set_property("width", &format!("{width}px"))?;
    style.set_property("height", &format!("{height}px"))?;

    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    log::debug!("canvas fitted to {width}x{height} at dpr {dpr}");
    Ok(())
}

/// Available width for the canvas: its parent's client width
fn container_width(canvas: &HtmlCanvasElement, fallback: f32) -> f32 {
    canvas
        .parent_element()
        .map(|parent| parent.client_width() as f32)
        .filter(|w| *w > 0.0)
        .unwrap_or(fallback)
}

/// Pointer position relative to the canvas' top-left corner
fn local_point(canvas: &HtmlCanvasElement, event: &MouseEvent) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    Vec2::new(
        (f64::from(event.client_x()) - rect.left()) as f32,
        (f64::from(event.client_y()) - rect.top()) as f32,
    )
}

/// A DOM listener that removes itself when dropped
pub struct EventListener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl EventListener {
    pub fn new(
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

/// A game attached to a canvas. Dropping it (or calling `unmount`) removes
/// every listener and cancels the pending frame.
#[wasm_bindgen]
pub struct MountedGame {
    game_id: &'static str,
    listeners: Vec<EventListener>,
    frame_loop: FrameLoop,
}

#[wasm_bindgen]
impl MountedGame {
    #[wasm_bindgen(getter, js_name = gameId)]
    pub fn game_id(&self) -> String {
        self.game_id.to_string()
    }

    pub fn unmount(self) {
        drop(self);
    }
}

impl Drop for MountedGame {
    fn drop(&mut self) {
        self.frame_loop.stop();
        self.listeners.clear();
        log::info!("{} unmounted", self.game_id);
    }
}

/// Mount the game named `game_id` on the canvas with id `canvas_id`
#[wasm_bindgen]
pub fn mount(game_id: &str, canvas_id: &str) -> Result<MountedGame, JsValue> {
    if game_id == AsteroidState::ID {
        mount_game::<AsteroidState>(canvas_id)
    } else if game_id == DodgeState::ID {
        mount_game::<DodgeState>(canvas_id)
    } else if game_id == ReactionState::ID {
        mount_game::<ReactionState>(canvas_id)
    } else if game_id == SnakeState::ID {
        mount_game::<SnakeState>(canvas_id)
    } else if game_id == RunnerState::ID {
        mount_game::<RunnerState>(canvas_id)
    } else {
        Err(JsValue::from_str(&format!("unknown game: {game_id}")))
    }
}

fn find_canvas(document: &Document, canvas_id: &str) -> Result<HtmlCanvasElement, JsValue> {
    document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| JsValue::from_str(&format!("no element #{canvas_id}")))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(JsValue::from)
}

fn optional_element(document: &Document, id: &str) -> Option<Element> {
    document.get_element_by_id(id)
}

pub fn mount_game<G: Simulation>(canvas_id: &str) -> Result<MountedGame, JsValue> {
    let window = window()?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas = find_canvas(&document, canvas_id)?;
    let ctx = context_2d(&canvas)?;

    let settings = Settings::load();
    let store: Rc<dyn ScoreStore> = Rc::new(BestScoreStore::new(
        LocalStorageBackend,
        settings.storage_namespace.clone(),
    ));
    let seed = settings.seed_or(js_sys::Date::now() as u64);
    let width = container_width(&canvas, G::DESIGN_SIZE.0);
    let session = Rc::new(RefCell::new(Session::<G>::new(width, store, seed)));
    fit_canvas(&window, &canvas, &ctx, session.borrow().field())?;
    log::info!("Mounted {} on #{canvas_id} (seed {seed})", G::ID);

    let mut listeners = Vec::new();

    // Keyboard
    {
        let session = session.clone();
        let win = window.clone();
        listeners.push(EventListener::new(&window, "keydown", move |event| {
            let event: KeyboardEvent = event.unchecked_into();
            let Some(key) = Key::from_dom(&event.key(), &event.code()) else {
                return;
            };
            let chorded = event.ctrl_key() || event.meta_key() || event.alt_key();
            let now = performance_now(&win);
            if session.borrow_mut().key_down(key, chorded, now) {
                event.prevent_default();
            }
        })?);
    }
    {
        let session = session.clone();
        let win = window.clone();
        listeners.push(EventListener::new(&window, "keyup", move |event| {
            let event: KeyboardEvent = event.unchecked_into();
            if let Some(key) = Key::from_dom(&event.key(), &event.code()) {
                let now = performance_now(&win);
                session.borrow_mut().handle_input(&InputEvent::KeyUp(key), now);
            }
        })?);
    }

    // Pointer
    {
        let session = session.clone();
        let win = window.clone();
        let target = canvas.clone();
        listeners.push(EventListener::new(&canvas, "pointerdown", move |event| {
            let event: PointerEvent = event.unchecked_into();
            let _ = target.set_pointer_capture(event.pointer_id());
            let pos = local_point(&target, &event);
            let now = performance_now(&win);
            session.borrow_mut().handle_input(&InputEvent::PointerDown(pos), now);
        })?);
    }
    {
        let session = session.clone();
        let win = window.clone();
        let target = canvas.clone();
        listeners.push(EventListener::new(&canvas, "pointermove", move |event| {
            let event: PointerEvent = event.unchecked_into();
            let pos = local_point(&target, &event);
            let primary = event.buttons() & 1 == 1;
            let now = performance_now(&win);
            session
                .borrow_mut()
                .handle_input(&InputEvent::PointerMove { pos, primary }, now);
        })?);
    }
    {
        let session = session.clone();
        let win = window.clone();
        let target = canvas.clone();
        listeners.push(EventListener::new(&canvas, "pointerup", move |event| {
            let event: PointerEvent = event.unchecked_into();
            let pos = local_point(&target, &event);
            let now = performance_now(&win);
            session.borrow_mut().handle_input(&InputEvent::PointerUp(pos), now);
        })?);
    }
    {
        let session = session.clone();
        let win = window.clone();
        listeners.push(EventListener::new(&canvas, "pointercancel", move |_event| {
            let now = performance_now(&win);
            session.borrow_mut().handle_input(&InputEvent::PointerCancel, now);
        })?);
    }

    // Auto-pause
    {
        let session = session.clone();
        let doc = document.clone();
        listeners.push(EventListener::new(&document, "visibilitychange", move |_event| {
            let hidden = doc.visibility_state() == VisibilityState::Hidden;
            if hidden {
                log::info!("Auto-paused (tab hidden)");
            }
            session.borrow_mut().on_visibility_change(hidden);
        })?);
    }
    if settings.pause_on_blur {
        let session = session.clone();
        listeners.push(EventListener::new(&window, "blur", move |_event| {
            log::info!("Auto-paused (window blur)");
            session.borrow_mut().pause();
        })?);
    }

    // Resize rebuilds the playfield
    {
        let session = session.clone();
        let win = window.clone();
        let target = canvas.clone();
        let ctx = ctx.clone();
        listeners.push(EventListener::new(&window, "resize", move |_event| {
            let mut session = session.borrow_mut();
            let width = container_width(&target, G::DESIGN_SIZE.0);
            session.resize(width);
            if let Err(err) = fit_canvas(&win, &target, &ctx, session.field()) {
                log::warn!("Canvas refit failed: {err:?}");
            }
        })?);
    }

    // Optional control buttons: #<canvas>-restart, #<canvas>-pause
    if let Some(button) = optional_element(&document, &format!("{canvas_id}-restart")) {
        let session = session.clone();
        listeners.push(EventListener::new(&button, "click", move |_event| {
            session.borrow_mut().restart();
        })?);
    }
    if let Some(button) = optional_element(&document, &format!("{canvas_id}-pause")) {
        let session = session.clone();
        listeners.push(EventListener::new(&button, "click", move |_event| {
            session.borrow_mut().toggle_pause();
        })?);
    }

    // Frame loop, mirroring readouts into #<canvas>-hud when present
    let hud = optional_element(&document, &format!("{canvas_id}-hud"));
    let mut surface = CanvasSurface::new(ctx);
    let mut last_hud = String::new();
    let scheduler = Rc::new(BrowserScheduler::new(window.clone()));
    let frame_loop = FrameLoop::start(scheduler, move |now| {
        let mut session = session.borrow_mut();
        session.frame(now, &mut surface);
        if let Some(hud) = &hud {
            let line = readout_line(&session.readouts());
            if line != last_hud {
                hud.set_text_content(Some(&line));
                last_hud = line;
            }
        }
    });

    Ok(MountedGame {
        game_id: G::ID,
        listeners,
        frame_loop,
    })
}

/// Mount every `<canvas data-game="...">` found by id in `canvas_ids`
pub fn mount_from_attributes(canvas_ids: &[&str]) -> Result<Vec<MountedGame>, JsValue> {
    let document = window()?
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let mut mounted = Vec::new();
    for canvas_id in canvas_ids {
        let Some(element) = document.get_element_by_id(canvas_id) else {
            continue;
        };
        match element.get_attribute("data-game") {
            Some(game_id) => mounted.push(mount(&game_id, canvas_id)?),
            None => log::warn!("#{canvas_id} has no data-game attribute"),
        }
    }
    Ok(mounted)
}
