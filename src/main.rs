//! Neon Pinball entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

    use neon_pinball::consts::*;
    use neon_pinball::engine::{PhysicsWorld, RapierWorld};
    use neon_pinball::haptics::{HapticFeedback, VibrationHaptics};
    use neon_pinball::hud::{HudView, debug_line};
    use neon_pinball::input::{canvas_to_playfield, first_touch};
    use neon_pinball::renderer::{RenderState, tessellate};
    use neon_pinball::scene::PinballScene;
    use neon_pinball::stage::Stage;
    use neon_pinball::{Bounds, Settings};

    /// Game instance holding all state
    struct Game {
        stage: Stage,
        settings: Settings,
        render_state: Option<RenderState>,
        accumulator: f32,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        /// Last HUD pushed to the DOM
        shown_hud: Option<HudView>,
    }

    impl Game {
        fn new(seed: u64, settings: Settings) -> Self {
            let bounds = Bounds::default();
            let scene = PinballScene::new(bounds, settings.clone(), seed);
            let stage = Stage::new(
                Box::new(|| -> Box<dyn PhysicsWorld> {
                    Box::new(RapierWorld::new(Vec2::new(0.0, GRAVITY_Y)))
                }),
                HapticFeedback::new(Box::new(VibrationHaptics::new())),
                Box::new(scene),
            );
            Self {
                stage,
                settings,
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                shown_hud: None,
            }
        }

        /// Run simulation steps
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                self.stage.frame(SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                let vertices = tessellate(&self.stage.draw());
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            let hud = self.stage.hud();
            if self.shown_hud.as_ref() != Some(&hud) {
                if let Some(el) = document.get_element_by_id("hud-score") {
                    el.set_text_content(Some(&hud.score));
                }
                if let Some(el) = document.get_element_by_id("hud-lives") {
                    el.set_text_content(Some(&hud.lives));
                }
                if let Some(el) = document.get_element_by_id("game-over") {
                    el.set_text_content(hud.banner);
                    let class = if hud.banner.is_some() { "" } else { "hidden" };
                    let _ = el.set_attribute("class", class);
                }
                self.shown_hud = Some(hud);
            }

            if let Some(el) = document.get_element_by_id("hud-debug") {
                let line = debug_line(
                    self.settings.show_fps.then_some(self.fps),
                    self.settings
                        .show_node_count
                        .then(|| self.stage.node_count()),
                );
                el.set_text_content(line.as_deref());
            }
        }

        /// Forward a canvas-space press to the stage
        fn press(&mut self, x: f32, y: f32, canvas: &HtmlCanvasElement) {
            let size = Vec2::new(canvas.client_width() as f32, canvas.client_height() as f32);
            let point = canvas_to_playfield(x, y, size, &self.stage.bounds());
            self.stage.touch(point);
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Logger init failed: {}", e).into());
        }

        log::info!("Neon Pinball starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No canvas element");
            return;
        };

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let mut settings = Settings::load();
        if let Ok(query) = window.location().search() {
            if settings.apply_query(&query) {
                settings.save();
            }
        }
        log::info!("Drain mode: {}", settings.drain_mode.as_str());
        let game = Rc::new(RefCell::new(Game::new(seed, settings)));
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {}", e);
                return;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let bounds = game.borrow().stage.bounds();
        match RenderState::new(surface, &adapter, width, height, bounds).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Failed to create device: {}", e),
        }

        setup_input_handlers(&canvas, game.clone());
        setup_teardown(game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        // Start game loop
        request_animation_frame(game);

        log::info!("Neon Pinball running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse down
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = canvas_clone.get_bounding_client_rect();
                let x = event.client_x() as f32 - rect.left() as f32;
                let y = event.client_y() as f32 - rect.top() as f32;
                game.borrow_mut().press(x, y, &canvas_clone);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start: first touch only
        {
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let rect = canvas_clone.get_bounding_client_rect();
                let touches = event.changed_touches();
                let points: Vec<Vec2> = (0..touches.length())
                    .filter_map(|i| touches.get(i))
                    .map(|t| {
                        Vec2::new(
                            t.client_x() as f32 - rect.left() as f32,
                            t.client_y() as f32 - rect.top() as f32,
                        )
                    })
                    .collect();
                if let Some(p) = first_touch(&points) {
                    game.borrow_mut().press(p.x, p.y, &canvas_clone);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Page going away: detach the stage so pending timers do nothing
    fn setup_teardown(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().stage.detach();
            log::info!("Stage detached");
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            g.update_hud();

            if !g.stage.is_attached() {
                return;
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// Headless table: real physics, no window, flippers worked on a timer
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;
    use neon_pinball::consts::*;
    use neon_pinball::engine::{PhysicsWorld, RapierWorld};
    use neon_pinball::haptics::HapticFeedback;
    use neon_pinball::hud::{GAME_OVER_BANNER, debug_line};
    use neon_pinball::scene::PinballScene;
    use neon_pinball::stage::Stage;
    use neon_pinball::{Bounds, Settings};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Neon Pinball (native) starting...");
    log::info!("Native mode runs headless - use the wasm build to play");

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let settings = Settings::load();
    let bounds = Bounds::default();

    let mut stage = Stage::new(
        Box::new(|| -> Box<dyn PhysicsWorld> {
            Box::new(RapierWorld::new(Vec2::new(0.0, GRAVITY_Y)))
        }),
        HapticFeedback::none(),
        Box::new(PinballScene::new(bounds, settings.clone(), seed)),
    );

    // Alternate flippers twice a second
    let flip_every = (0.5 / SIM_DT) as u32;
    let max_steps = (300.0 / SIM_DT) as u32;
    let mut last_hud = stage.hud();
    log::info!("{} | {}", last_hud.score, last_hud.lives);

    for step in 0..max_steps {
        if step % flip_every == 0 {
            let x = if (step / flip_every) % 2 == 0 {
                bounds.min.x + 1.0
            } else {
                bounds.max.x - 1.0
            };
            stage.touch(Vec2::new(x, bounds.min.y + 1.0));
        }

        stage.frame(SIM_DT);

        let hud = stage.hud();
        if hud != last_hud {
            log::info!("{} | {}", hud.score, hud.lives);
            if hud.banner == Some(GAME_OVER_BANNER) {
                log::info!("{}", GAME_OVER_BANNER);
            }
            last_hud = hud;
        }

        // Stop once the replacement session is up
        if stage.sessions() > 1 {
            break;
        }
    }

    if let Some(line) = debug_line(None, settings.show_node_count.then(|| stage.node_count())) {
        log::info!("{}", line);
    }
    log::info!("Played {} session(s)", stage.sessions());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
