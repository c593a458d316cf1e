//! Drop Dodge entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use web_sys::HtmlElement;

    use drop_dodge::consts::*;
    use drop_dodge::render::DomRenderer;
    use drop_dodge::sim::snapshot::display_score;
    use drop_dodge::sim::{tick, GamePhase, GameState, InputState, Snapshot};
    use drop_dodge::{ScoreBoard, Settings};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        input: InputState,
        renderer: Option<DomRenderer>,
        scores: ScoreBoard,
        settings: Settings,
        accumulator: f32,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        // Track phase for score submission on death
        last_phase: GamePhase,
        new_best: bool,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            Self {
                state: GameState::new(seed),
                input: InputState::new(),
                renderer: None,
                scores: ScoreBoard::load(),
                settings: Settings::load(),
                accumulator: 0.0,
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                last_phase: GamePhase::NotStarted,
                new_best: false,
            }
        }

        /// Run simulation ticks behind a fixed-timestep accumulator. Wall
        /// clock only feeds the FPS counter; physics advances per tick.
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.state, &mut self.input);
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

            // Submit the score once per death transition
            let phase = self.state.phase;
            if phase != self.last_phase {
                if phase == GamePhase::Dead {
                    self.submit_score();
                }
                self.last_phase = phase;
            }
        }

        fn submit_score(&mut self) {
            let score = display_score(self.state.score);
            let outcome = self.scores.submit(
                &self.settings.player_name,
                score,
                self.state.elapsed_secs(),
                js_sys::Date::now(),
            );
            self.new_best = outcome.new_best;
            self.scores.save();
            if outcome.new_best {
                log::info!(
                    "New personal best: {} (previous: {:?})",
                    score,
                    outcome.previous_best
                );
            } else {
                log::info!("Run over, score {}", score);
            }
        }

        /// Render the current frame
        fn render(&mut self, snap: &Snapshot) {
            if let Some(ref mut renderer) = self.renderer {
                if let Err(e) = renderer.apply(snap) {
                    log::warn!("Render error: {:?}", e);
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, snap: &Snapshot) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.get_element_by_id("hud-score") {
                el.set_text_content(Some(&display_score(snap.score).to_string()));
            }
            if let Some(el) = document.get_element_by_id("hud-time") {
                let mins = snap.elapsed_secs / 60;
                let secs = snap.elapsed_secs % 60;
                el.set_text_content(Some(&format!("{}:{:02}", mins, secs)));
            }
            if let Some(el) = document.get_element_by_id("hud-difficulty") {
                el.set_text_content(Some(&snap.difficulty_level.to_string()));
            }
            if let Some(el) = document.get_element_by_id("hud-deaths") {
                el.set_text_content(Some(&snap.death_count.to_string()));
            }
            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    el.set_text_content(Some(&snap.fps.to_string()));
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }

            // Game over overlay
            if let Some(el) = document.get_element_by_id("game-over") {
                if snap.game_over {
                    let _ = el.set_attribute("class", "");
                    if let Some(score_el) = document.get_element_by_id("final-score") {
                        score_el.set_text_content(Some(&display_score(snap.score).to_string()));
                    }
                    if let Some(time_el) = document.get_element_by_id("final-time") {
                        time_el.set_text_content(Some(&format!(
                            "{}:{:02}",
                            snap.elapsed_secs / 60,
                            snap.elapsed_secs % 60
                        )));
                    }
                    if let Some(best_el) = document.get_element_by_id("new-best") {
                        let class = if self.new_best { "" } else { "hidden" };
                        let _ = best_el.set_attribute("class", class);
                    }
                    if let Some(top_el) = document.get_element_by_id("best-score") {
                        if let Some(top) = self.scores.top_score() {
                            top_el.set_text_content(Some(&top.to_string()));
                        }
                    }
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Drop Dodge starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let arena: HtmlElement = document
            .get_element_by_id("arena")
            .expect("no arena element")
            .dyn_into()
            .expect("arena is not an HtmlElement");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        {
            let g = game.borrow();
            if g.settings.dark_mode {
                if let Some(body) = document.body() {
                    let _ = body.style().set_property("background", "#1a1a1a");
                }
            }
            if !g.settings.show_hud {
                if let Some(el) = document.get_element_by_id("hud") {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }

        setup_input_handlers(game.clone());
        setup_settings_handlers(game.clone());
        setup_start_button(&arena, game.clone());

        // Start the frame loop
        request_animation_frame(game);

        log::info!("Drop Dodge running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Keyboard: the engine keeps its own held/just-pressed sets
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                game.borrow_mut().input.key_down(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                game.borrow_mut().input.key_up(&event.key());
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur: drop held keys so nothing sticks across focus loss
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().input.reset();
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_settings_handlers(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        // HUD visibility toggle; the choice persists across sessions
        if let Some(btn) = document.get_element_by_id("toggle-hud") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                g.settings.show_hud = !g.settings.show_hud;
                g.settings.save();

                let class = if g.settings.show_hud { "" } else { "hidden" };
                if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                    if let Some(el) = document.get_element_by_id("hud") {
                        let _ = el.set_attribute("class", class);
                    }
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_start_button(arena: &HtmlElement, game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        if let Some(btn) = document.get_element_by_id("start-btn") {
            let arena = arena.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                if g.state.phase != GamePhase::NotStarted {
                    return;
                }

                let width = arena.client_width() as f32;
                let height = arena.client_height() as f32;
                g.state.start(width, height);

                match DomRenderer::new(arena.clone()) {
                    Ok(renderer) => g.renderer = Some(renderer),
                    Err(e) => log::error!("Failed to create renderer: {:?}", e),
                }

                let document = web_sys::window().unwrap().document().unwrap();
                if let Some(el) = document.get_element_by_id("info-screen") {
                    let _ = el.set_attribute("class", "hidden");
                }
                if g.settings.show_hud {
                    if let Some(el) = document.get_element_by_id("hud") {
                        let _ = el.set_attribute("class", "");
                    }
                }

                log::info!("Game started ({}x{})", width, height);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            let snap = g.state.snapshot(g.fps);
            g.render(&snap);
            g.update_hud(&snap);
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use drop_dodge::consts::TICK_HZ;
    use drop_dodge::sim::snapshot::display_score;
    use drop_dodge::sim::{tick, GamePhase, GameState, InputState};

    env_logger::init();
    log::info!("Drop Dodge (native) starting...");
    log::info!("Native mode runs a headless demo - build for wasm32 for the playable game");

    let mut state = GameState::new(0xD0D6E);
    state.start(400.0, 400.0);
    let mut input = InputState::new();

    // Scripted session: run back and forth, jumping periodically, until a
    // hazard wins or a minute of simulated time passes
    let mut ticks = 0u64;
    while state.phase == GamePhase::Playing && ticks < 60 * TICK_HZ as u64 {
        match (ticks / 90) % 4 {
            0 => {
                input.key_up("a");
                input.key_down("d");
            }
            2 => {
                input.key_up("d");
                input.key_down("a");
            }
            _ => {}
        }
        if ticks % 45 == 0 {
            input.key_up("w");
            input.key_down("w");
        }
        tick(&mut state, &mut input);
        ticks += 1;
    }

    let snap = state.snapshot(0);
    println!(
        "Demo over after {}s: score {}, difficulty {}, {} hazards live, game_over={}",
        snap.elapsed_secs,
        display_score(snap.score),
        snap.difficulty_level,
        snap.falling.len(),
        snap.game_over
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
