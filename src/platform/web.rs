//! Browser host
//!
//! `run` wires a page that has a `<canvas id="canvas">`: keyboard listeners,
//! auto-pause on blur or hidden tab, and a `requestAnimationFrame` loop that
//! ticks the game once per display frame and draws it with the canvas 2D API.
//! Pages that prefer their own loop can drive `WebGame` from JavaScript
//! instead and draw the JSON snapshot themselves.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement};

use super::keys::{KeyAction, Keyboard};
use super::{Notification, NotificationSink, RenderSink};
use crate::audio::AudioManager;
use crate::consts::*;
use crate::runner::{Runner, Sinks};
use crate::sim::{GamePhase, Snapshot};
use crate::tuning::Tuning;

/// Elapsed time assumed for the very first animation frame
const FIRST_FRAME_MS: f64 = 1000.0 / 60.0;

#[derive(Default)]
struct MessageQueue(Vec<Notification>);

impl NotificationSink for MessageQueue {
    fn notify(&mut self, note: Notification) {
        self.0.push(note);
    }
}

#[derive(Default)]
struct JsonFrame(String);

impl RenderSink for JsonFrame {
    fn render(&mut self, snapshot: &Snapshot) {
        self.0 = snapshot.to_json();
    }
}

#[wasm_bindgen]
pub struct WebGame {
    runner: Runner,
    audio: AudioManager,
    keys: Keyboard,
    messages: MessageQueue,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WebGame, JsValue> {
        console_error_panic_hook::set_once();
        // `run` may already have installed the logger
        let _ = console_log::init_with_level(log::Level::Info);

        let seed = js_sys::Date::now() as u64;
        log::info!("Centipede starting with seed: {}", seed);

        let runner = Runner::new(seed, Tuning::default())
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        Ok(WebGame {
            runner,
            audio: AudioManager::new(),
            keys: Keyboard::new(),
            messages: MessageQueue::default(),
        })
    }

    /// Key event from the page (`KeyboardEvent.code`). Returns true when the
    /// key belongs to the game so the page can prevent the default action.
    pub fn key(&mut self, code: &str, down: bool) -> bool {
        self.apply_key(code, down) != KeyAction::Ignored
    }

    pub fn start_game(&mut self) {
        self.runner.start_game();
    }

    pub fn toggle_pause(&mut self) {
        self.runner.toggle_pause();
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.audio.set_muted(muted);
    }

    /// Advance one animation frame and return the snapshot as JSON
    pub fn frame(&mut self, elapsed_ms: f64) -> String {
        let mut frame = JsonFrame::default();
        self.advance(elapsed_ms, &mut frame);
        frame.0
    }

    /// Pending notification texts as a JSON array of strings
    pub fn take_notifications(&mut self) -> String {
        let texts: Vec<String> = self.messages.0.drain(..).map(|n| n.message()).collect();
        serde_json::to_string(&texts).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn score(&self) -> u64 {
        self.runner.state.score
    }
}

impl WebGame {
    fn apply_key(&mut self, code: &str, down: bool) -> KeyAction {
        if down {
            // Browsers only allow audio after a user gesture
            self.audio.resume();
        }
        let action = self.keys.handle(code, down);
        match action {
            KeyAction::TogglePause => self.runner.toggle_pause(),
            KeyAction::Restart => self.runner.start_game(),
            KeyAction::Held | KeyAction::Ignored => {}
        }
        action
    }

    fn advance(&mut self, elapsed_ms: f64, render: &mut dyn RenderSink) {
        self.runner.frame(
            elapsed_ms,
            &mut self.keys,
            &mut Sinks {
                audio: &mut self.audio,
                notifications: &mut self.messages,
                render,
            },
        );
    }

    /// Pause a running game when the player can no longer see or steer it
    fn auto_pause(&mut self, reason: &str) {
        self.keys.release_all();
        if self.runner.pause() {
            log::info!("Auto-paused ({})", reason);
        }
    }
}

/// Draws snapshots onto a 2D canvas sized to the logical playfield
struct CanvasRender {
    ctx: CanvasRenderingContext2d,
}

impl CanvasRender {
    fn rect(&self, color: &str, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(x, y, w, h);
    }

    fn caption(&self, text: &str, x: f64, y: f64) {
        self.ctx.set_fill_style_str("#e6e6e6");
        let _ = self.ctx.fill_text(text, x, y);
    }
}

impl RenderSink for CanvasRender {
    fn render(&mut self, snap: &Snapshot) {
        const MUSHROOM_COLORS: [&str; 4] = ["#2a3a2a", "#3b5f3b", "#4f8a4f", "#6cd061"];
        let cell = CELL as f64;

        self.rect("#0e1117", 0.0, 0.0, CANVAS_WIDTH as f64, CANVAS_HEIGHT as f64);

        for m in &snap.mushrooms {
            let (x, y) = (m.x as f64 * cell, m.y as f64 * cell);
            let color = MUSHROOM_COLORS[(m.hp.clamp(MUSHROOM_MIN_HP, MUSHROOM_MAX_HP) - 1) as usize];
            self.rect(color, x + 2.0, y + 2.0, cell - 4.0, cell - 4.0);
            self.rect("#223333", x + 4.0, y + 4.0, cell - 8.0, cell - 8.0);
        }

        for chain in &snap.centipedes {
            for seg in chain.iter().rev() {
                let (x, y) = (seg.x as f64 * cell, seg.y as f64 * cell);
                let color = if seg.head { "#ffcc66" } else { "#6cd061" };
                self.rect(color, x + 2.0, y + 2.0, cell - 4.0, cell - 4.0);
                self.rect("#2a3040", x + 1.0, y + cell - 3.0, cell - 2.0, 2.0);
            }
        }

        for b in &snap.bullets {
            self.rect("#a9d1ff", b.x as f64, b.y as f64, 2.0, 8.0);
        }

        let p = &snap.player;
        let (px, py, pw, ph) = (p.pos.x as f64, p.pos.y as f64, p.width as f64, p.height as f64);
        self.rect("#e6e6e6", px, py, pw, ph);
        self.rect("#6cd061", px + 2.0, py + 2.0, pw - 4.0, ph - 4.0);

        if let Some(spider) = &snap.spider {
            self.ctx.set_fill_style_str("#ff6b6b");
            self.ctx.begin_path();
            let _ = self.ctx.arc(
                spider.pos.x as f64,
                spider.pos.y as f64,
                spider.radius as f64 * 0.5,
                0.0,
                std::f64::consts::TAU,
            );
            self.ctx.fill();
        }

        self.ctx.set_font("12px monospace");
        self.caption(
            &format!("SCORE {}   LIVES {}   LEVEL {}", snap.score, snap.lives, snap.level),
            4.0,
            12.0,
        );
        let banner = match snap.phase {
            GamePhase::Playing => None,
            GamePhase::Paused => Some("PAUSED - P to resume"),
            GamePhase::GameOver => Some("GAME OVER - R to restart"),
        };
        if let Some(text) = banner {
            self.caption(text, cell * 6.0, CANVAS_HEIGHT as f64 / 2.0);
        }
    }
}

/// State owned by the animation loop
struct Host {
    game: WebGame,
    canvas: CanvasRender,
    toast: Option<Element>,
    last_time: Option<f64>,
}

impl Host {
    fn step(&mut self, time: f64) {
        let elapsed = self.last_time.map_or(FIRST_FRAME_MS, |last| time - last);
        self.last_time = Some(time);

        self.game.advance(elapsed, &mut self.canvas);
        for note in self.game.messages.0.drain(..) {
            log::info!("{}", note);
            if let Some(toast) = &self.toast {
                toast.set_text_content(Some(&note.message()));
            }
        }
    }
}

/// Attach the game to the page's `#canvas` and start the frame loop. Does
/// nothing on pages without one.
pub fn run() -> Result<(), JsValue> {
    let Some(window) = web_sys::window() else {
        return Ok(());
    };
    let Some(document) = window.document() else {
        return Ok(());
    };
    let Some(canvas) = document.get_element_by_id("canvas") else {
        return Ok(());
    };
    let canvas: HtmlCanvasElement = canvas.dyn_into()?;
    canvas.set_width(CANVAS_WIDTH as u32);
    canvas.set_height(CANVAS_HEIGHT as u32);
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
        .dyn_into()?;

    let game = WebGame::new()?;
    let host = Rc::new(RefCell::new(Host {
        game,
        canvas: CanvasRender { ctx },
        toast: document.get_element_by_id("toast"),
        last_time: None,
    }));

    setup_keyboard(&window, host.clone());
    setup_auto_pause(&window, &document, host.clone());
    request_animation_frame(host);

    log::info!("Centipede running!");
    Ok(())
}

fn setup_keyboard(window: &web_sys::Window, host: Rc<RefCell<Host>>) {
    for (kind, down) in [("keydown", true), ("keyup", false)] {
        let host = host.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            // Held state is already set; repeats would re-toggle pause
            if event.repeat() {
                return;
            }
            let action = host.borrow_mut().game.apply_key(&event.code(), down);
            if action != KeyAction::Ignored {
                event.prevent_default();
            }
        });
        let _ = window.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

fn setup_auto_pause(window: &web_sys::Window, document: &web_sys::Document, host: Rc<RefCell<Host>>) {
    // Visibility change (tab switch, minimize)
    {
        let host = host.clone();
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                host.borrow_mut().game.auto_pause("tab hidden");
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // Window blur (click outside)
    {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            host.borrow_mut().game.auto_pause("window blur");
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

fn request_animation_frame(host: Rc<RefCell<Host>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once(move |time: f64| {
        game_loop(host, time);
    });
    let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    closure.forget();
}

fn game_loop(host: Rc<RefCell<Host>>, time: f64) {
    host.borrow_mut().step(time);
    request_animation_frame(host);
}
