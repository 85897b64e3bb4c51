//! Tap Rush entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement, PointerEvent};

    use tap_rush::audio::AudioManager;
    use tap_rush::consts::*;
    use tap_rush::sim::{EffectKind, GamePhase, GameState, ObjectKind, TickInput, tick};
    use tap_rush::ui::RenderView;
    use tap_rush::{Settings, platform};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        audio: Option<AudioManager>,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        document: Document,
        play_area: HtmlElement,
        /// DOM nodes for live objects, keyed by object id
        object_nodes: HashMap<u32, HtmlElement>,
        /// DOM nodes for effects, keyed by originating object id
        effect_nodes: HashMap<u32, HtmlElement>,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        last_phase: GamePhase,
    }

    impl Game {
        fn new(settings: Settings, document: Document, play_area: HtmlElement) -> Self {
            let seed = platform::fresh_seed();
            log::info!("Game initialized with seed: {}", seed);
            let audio = settings
                .sound
                .then(|| AudioManager::new(settings.effective_volume()));
            Self {
                state: GameState::new(seed, settings.game_config()),
                settings,
                audio,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                document,
                play_area,
                object_nodes: HashMap::new(),
                effect_nodes: HashMap::new(),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                last_phase: GamePhase::Start,
            }
        }

        /// Queue the current play-area size for the next tick
        fn measure(&mut self) {
            let w = self.play_area.client_width() as f32;
            let h = self.play_area.client_height() as f32;
            self.input.resize = Some((w, h));
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.state, &self.input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.taps.clear();
                self.input.start = false;
                self.input.restart = false;
                self.input.resize = None;
            }

            let events = self.state.drain_events();
            if let Some(audio) = &self.audio {
                audio.play_events(&events);
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

            if self.state.phase != self.last_phase {
                log::info!("Phase {:?} -> {:?}", self.last_phase, self.state.phase);
                self.last_phase = self.state.phase;
            }
        }

        /// Create a positioned node inside the play area
        fn create_node(&self, class: &str, text: &str) -> Option<HtmlElement> {
            let el: HtmlElement = self.document.create_element("div").ok()?.dyn_into().ok()?;
            let _ = el.set_attribute("class", class);
            el.set_text_content(Some(text));
            self.play_area.append_child(&el).ok()?;
            Some(el)
        }

        /// Bring the DOM in line with the current render snapshot
        fn render(&mut self) {
            let view = RenderView::from_state(&self.state);

            for obj in &view.objects {
                let node = match self.object_nodes.get(&obj.id) {
                    Some(node) => node.clone(),
                    None => {
                        let Some(node) = self.create_node("falling", obj.glyph) else {
                            continue;
                        };
                        let _ = node.set_attribute("data-id", &obj.id.to_string());
                        self.object_nodes.insert(obj.id, node.clone());
                        node
                    }
                };
                let style = node.style();
                let _ = style.set_property(
                    "transform",
                    &format!(
                        "translate({:.1}px, {:.1}px) rotate({:.1}deg)",
                        obj.left, obj.top, obj.rotation
                    ),
                );
                let _ = style.set_property("width", &format!("{:.0}px", obj.size));
                let _ = style.set_property("height", &format!("{:.0}px", obj.size));
                let _ = style.set_property("font-size", &format!("{:.0}px", obj.size * 0.8));
                if obj.tapped {
                    let _ = node.set_attribute("class", "falling tapped");
                }
            }
            self.object_nodes.retain(|id, node| {
                let live = view.objects.iter().any(|o| o.id == *id);
                if !live {
                    node.remove();
                }
                live
            });

            for effect in &view.effects {
                let node = match self.effect_nodes.get(&effect.origin) {
                    Some(node) => node.clone(),
                    None => {
                        let (class, text) = match effect.kind {
                            EffectKind::Splash(ObjectKind::Target) => {
                                ("effect splash miss", "💥")
                            }
                            EffectKind::Splash(ObjectKind::Decoy) => ("effect splash", "💦"),
                            EffectKind::Catch => ("effect catch", "+1"),
                            EffectKind::Blunder => ("effect blunder", "✖"),
                        };
                        let Some(node) = self.create_node(class, text) else {
                            continue;
                        };
                        self.effect_nodes.insert(effect.origin, node.clone());
                        node
                    }
                };
                let style = node.style();
                let _ = style.set_property(
                    "transform",
                    &format!(
                        "translate({:.1}px, {:.1}px) translate(-50%, -50%)",
                        effect.x, effect.y
                    ),
                );
                let _ = style.set_property("opacity", &format!("{:.2}", effect.opacity));
            }
            self.effect_nodes.retain(|origin, node| {
                let live = view.effects.iter().any(|e| e.origin == *origin);
                if !live {
                    node.remove();
                }
                live
            });

            if let Some(line) = self.document.get_element_by_id("boundary") {
                let _ = line.set_attribute("style", &format!("top: {:.0}px", view.boundary_y));
            }

            self.update_hud(&view);
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, view: &RenderView) {
            let hud = &view.hud;
            set_text(&self.document, "hud-score", &hud.score.to_string());
            set_text(&self.document, "hud-level", &hud.level.to_string());
            set_text(&self.document, "hud-best", &hud.high_score.to_string());

            match (hud.lives, hud.max_lives) {
                (Some(lives), Some(max)) => {
                    let hearts = "❤️".repeat(usize::from(lives))
                        + &"🖤".repeat(usize::from(max.saturating_sub(lives)));
                    set_text(&self.document, "hud-lives", &hearts);
                    set_visible(&self.document, "hud-lives", true);
                }
                _ => set_visible(&self.document, "hud-lives", false),
            }

            set_visible(&self.document, "hud-fps", self.settings.show_fps);
            if self.settings.show_fps {
                set_text(&self.document, "hud-fps", &format!("{} fps", self.fps));
            }

            set_visible(&self.document, "start-screen", hud.phase == GamePhase::Start);
            set_visible(&self.document, "game-over", hud.phase == GamePhase::GameOver);

            if let Some(summary) = &view.summary {
                set_text(&self.document, "final-score", &summary.final_score.to_string());
                set_text(&self.document, "final-best", &summary.high_score.to_string());
                set_text(&self.document, "final-grade", summary.grade);
                set_visible(&self.document, "new-high", summary.new_high);
                match summary.rank {
                    Some(rank) => {
                        set_text(&self.document, "final-rank", &format!("#{rank}"));
                        set_visible(&self.document, "final-rank", true);
                    }
                    None => set_visible(&self.document, "final-rank", false),
                }
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    /// Settings embedded in the page as `<script id="game-config" type="application/json">`
    fn load_settings(document: &Document) -> Settings {
        document
            .get_element_by_id("game-config")
            .and_then(|el| el.text_content())
            .map(|json| Settings::from_json_or_default(&json))
            .unwrap_or_else(|| {
                log::info!("Using default settings");
                Settings::default()
            })
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(|e| e.to_string())?;

        log::info!("Tap Rush starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let play_area: HtmlElement = document
            .get_element_by_id("play-area")
            .ok_or("no #play-area element")?
            .dyn_into()?;

        let settings = load_settings(&document);
        log::info!("Variant: {}", settings.variant.as_str());

        let game = Rc::new(RefCell::new(Game::new(settings, document, play_area.clone())));
        game.borrow_mut().measure();

        setup_tap_handler(&play_area, game.clone())?;
        setup_buttons(game.clone())?;
        setup_resize(game.clone())?;

        request_animation_frame(game);

        log::info!("Tap Rush running!");
        Ok(())
    }

    fn setup_tap_handler(play_area: &HtmlElement, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
            let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                return;
            };
            let Ok(Some(hit)) = target.closest("[data-id]") else {
                return;
            };
            let Some(id) = hit.get_attribute("data-id").and_then(|s| s.parse::<u32>().ok()) else {
                return;
            };
            event.prevent_default();
            game.borrow_mut().input.taps.push(id);
        });
        play_area
            .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let document = game.borrow().document.clone();

        if let Some(btn) = document.get_element_by_id("start-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().input.start = true;
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().input.restart = true;
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn setup_resize(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().measure();
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
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
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use anyhow::{Context, anyhow};
    use clap::Parser;

    use tap_rush::consts::SIM_DT;
    use tap_rush::sim::{GamePhase, GameState, TickInput, tick};
    use tap_rush::ui::RenderView;
    use tap_rush::{Settings, Variant, platform};

    /// Headless autoplay runner for balance checks
    #[derive(Debug, Parser)]
    #[command(name = "tap-rush", version, about)]
    struct Args {
        /// Game variant: classic or sudden-death
        #[arg(long)]
        variant: Option<String>,
        /// Run seed (defaults to the clock)
        #[arg(long)]
        seed: Option<u64>,
        /// Settings JSON file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Number of sessions to play back to back
        #[arg(long, default_value_t = 3)]
        sessions: u32,
        /// Give up on a session after this many simulated seconds
        #[arg(long, default_value_t = 300.0)]
        max_seconds: f32,
    }

    pub fn run() -> anyhow::Result<()> {
        let args = Args::parse();

        let mut settings = match &args.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                Settings::from_json(&json).with_context(|| format!("loading {}", path.display()))?
            }
            None => Settings::default(),
        };
        if let Some(name) = &args.variant {
            settings.variant =
                Variant::from_str(name).ok_or_else(|| anyhow!("unknown variant `{name}`"))?;
        }

        let seed = args.seed.unwrap_or_else(platform::fresh_seed);
        log::info!(
            "Tap Rush (native) autoplay: {} with seed {}",
            settings.variant.as_str(),
            seed
        );

        let mut state = GameState::new(seed, settings.game_config());
        let max_ticks = (args.max_seconds / SIM_DT) as u64;

        for session in 0..args.sessions {
            let kickoff = TickInput {
                start: session == 0,
                restart: session > 0,
                autoplay: true,
                ..Default::default()
            };
            tick(&mut state, &kickoff, SIM_DT);

            let input = TickInput {
                autoplay: true,
                ..Default::default()
            };
            while state.phase == GamePhase::Playing && state.time_ticks < max_ticks {
                tick(&mut state, &input, SIM_DT);
            }
            for event in state.drain_events() {
                log::debug!("{:?}", event);
            }

            match RenderView::from_state(&state).summary {
                Some(summary) => log::info!(
                    "Session {}: score {} ({}), best {}, rank {}{}",
                    state.sessions,
                    summary.final_score,
                    summary.grade,
                    summary.high_score,
                    summary.rank.map_or("-".to_string(), |r| format!("#{r}")),
                    if summary.new_high { " - new high score!" } else { "" }
                ),
                None => {
                    log::warn!(
                        "Session {} still alive after {}s with score {}; stopping",
                        state.sessions,
                        args.max_seconds,
                        state.score
                    );
                    break;
                }
            }
        }

        println!("{}", serde_json::to_string_pretty(&state.high_scores)?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
