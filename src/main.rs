//! Cache Crafter entry point
//!
//! Handles platform-specific initialization and runs the event loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::DVec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent};

    use cache_crafter::GameConfig;
    use cache_crafter::platform::{action_for_key, dom};
    use cache_crafter::renderer::MapRenderState;
    use cache_crafter::sim::{self, Action, Direction, GameEvent, GameState};

    /// Pointer travel (CSS px) below which a press counts as a click
    const CLICK_SLOP: f64 = 4.0;

    struct Drag {
        last: DVec2,
        travelled: f64,
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<MapRenderState>,
        drag: Option<Drag>,
    }

    impl Game {
        fn new(config: GameConfig, width: f64, height: f64) -> Self {
            Self {
                state: GameState::new(config, width, height),
                render_state: None,
                drag: None,
            }
        }

        /// Apply an action, log what happened and refresh the HUD
        fn act(&mut self, action: Action) {
            for event in sim::apply(&mut self.state, action) {
                log_event(&event);
            }
            self.update_hud();
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.state, time) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1, device_pixel_ratio());
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            dom::set_text("status-panel", &self.state.status_text());
            dom::toggle_class("status-panel", "won", self.state.won);
        }

        fn press(&mut self, pos: DVec2) {
            self.drag = Some(Drag {
                last: pos,
                travelled: 0.0,
            });
        }

        fn drag_to(&mut self, pos: DVec2) {
            let Some(drag) = self.drag.as_mut() else {
                return;
            };
            let delta = pos - drag.last;
            drag.last = pos;
            drag.travelled += delta.length();
            self.act(Action::Pan(delta));
        }

        /// Finish a press; a short one interacts with the cell under the pointer
        fn release(&mut self, pos: DVec2) {
            let Some(drag) = self.drag.take() else {
                return;
            };
            if drag.travelled < CLICK_SLOP {
                let cell = self.state.grid.cell_at(self.state.view.screen_to_latlng(pos));
                self.act(Action::Interact(cell));
            }
        }
    }

    fn log_event(event: &GameEvent) {
        match event {
            GameEvent::Collected { cell, value } => log::info!("Collected {} at {}", value, cell),
            GameEvent::Crafted { cell, value } => log::info!("Crafted {} at {}", value, cell),
            GameEvent::Deposited { cell, value } => log::info!("Deposited {} at {}", value, cell),
            GameEvent::Won { value } => log::info!("Won with a {}!", value),
            GameEvent::Rejected { cell, reason } => log::debug!("Nothing to do at {}: {:?}", cell, reason),
            GameEvent::PlayerMoved { from, to } => log::debug!("Moved {} -> {}", from, to),
            GameEvent::ViewSynced(report) => log::debug!("{:?}", report),
        }
    }

    fn device_pixel_ratio() -> f64 {
        web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0)
    }

    fn mouse_pos(event: &MouseEvent) -> DVec2 {
        DVec2::new(f64::from(event.offset_x()), f64::from(event.offset_y()))
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Cache Crafter starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        dom::toggle_class("loading", "hidden", true);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Canvas backing store in device pixels, game logic in CSS pixels
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let config = GameConfig::load();
        log::info!("World seed: {:?}, start: {:?}", config.seed, config.start);
        let game = Rc::new(RefCell::new(Game::new(config, client_w as f64, client_h as f64)));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = MapRenderState::new(surface, &adapter, width, height, dpr).await;
        game.borrow_mut().render_state = Some(render_state);

        setup_buttons(game.clone());
        setup_keyboard(game.clone());
        setup_pointer(&canvas, game.clone());
        setup_resize(canvas.clone(), game.clone());

        game.borrow().update_hud();
        request_animation_frame(game);

        log::info!("Cache Crafter running!");
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        for direction in Direction::ALL {
            let game = game.clone();
            dom::on_click(&format!("btn-{}", direction.as_str()), move || {
                game.borrow_mut().act(Action::Move(direction));
            });
        }
        dom::on_click("btn-recenter", move || {
            game.borrow_mut().act(Action::Recenter);
        });
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            if let Some(action) = action_for_key(&event.key()) {
                // Arrow keys would otherwise scroll the page
                event.prevent_default();
                game.borrow_mut().act(action);
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_pointer(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Press
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut().press(mouse_pos(&event));
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Drag to pan
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut().drag_to(mouse_pos(&event));
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Release (click = interact)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut().release(mouse_pos(&event));
            });
            let _ = canvas
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Leaving the canvas cancels a drag
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().drag = None;
            });
            let _ = canvas
                .add_event_listener_with_callback("mouseleave", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let dpr = device_pixel_ratio();
            let client_w = canvas.client_width();
            let client_h = canvas.client_height();
            let width = (client_w as f64 * dpr) as u32;
            let height = (client_h as f64 * dpr) as u32;
            canvas.set_width(width);
            canvas.set_height(height);

            let mut g = game.borrow_mut();
            if let Some(ref mut render_state) = g.render_state {
                render_state.resize(width, height, dpr);
            }
            g.act(Action::Resize {
                width: client_w as f64,
                height: client_h as f64,
            });
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            frame(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().render(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use cache_crafter::GameConfig;
    use cache_crafter::sim::{GameState, ascii_map};

    env_logger::init();
    log::info!("Cache Crafter (native) starting...");
    log::info!("Native mode prints a text preview - run with `trunk serve` for the web version");

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let loaded = std::fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|json| GameConfig::from_json(&json).map_err(|e| e.to_string()));
            match loaded {
                Ok(config) => {
                    log::info!("Loaded config from {}", path);
                    config
                }
                Err(e) => {
                    log::error!("Could not load {}: {}", path, e);
                    std::process::exit(1);
                }
            }
        }
        None => GameConfig::load(),
    };

    let state = GameState::new(config, 800.0, 600.0);
    log::info!(
        "Player at cell {}, {} cells in view",
        state.player_cell(),
        state.overlays.len()
    );

    println!("Cache Crafter - world seed {:?}", state.config.seed);
    print!("{}", ascii_map(&state, 8));
    println!("{}", state.status_text());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
