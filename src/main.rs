//! Shake Dice entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{DeviceMotionEvent, HtmlInputElement};

    use shake_dice::audio::{AudioCues, AudioManager};
    use shake_dice::consts::*;
    use shake_dice::ledger::RECENT_RESULTS;
    use shake_dice::persistence::LocalStore;
    use shake_dice::sim::{
        Acceleration, DampedBody, GameEvent, GamePhase, GameState, MotionPermission, MotionSignal,
        PRESET_BETS, TickInput, tick,
    };
    use shake_dice::{Settings, spawn_position};

    // iOS 13+ gates motion events behind an explicit prompt
    #[wasm_bindgen(inline_js = "
        export async function request_motion_permission() {
            if (typeof DeviceMotionEvent === 'undefined') {
                return 'unavailable';
            }
            if (typeof DeviceMotionEvent.requestPermission === 'function') {
                try {
                    return await DeviceMotionEvent.requestPermission();
                } catch (e) {
                    console.error('Error requesting device motion permission:', e);
                    return 'denied';
                }
            }
            return 'granted';
        }
    ")]
    extern "C" {
        fn request_motion_permission() -> js_sys::Promise;
    }

    /// Game instance holding all state
    struct Game {
        state: GameState<DampedBody, LocalStore>,
        audio: AudioManager,
        settings: Settings,
        settings_store: LocalStore,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let settings_store = LocalStore;
            let settings = Settings::load(&settings_store);
            let mut audio = AudioManager::new();
            audio.apply_settings(&settings);

            let bodies = [0, 1].map(|i| DampedBody::new(spawn_position(i), glam::Quat::IDENTITY));
            Self {
                state: GameState::new(bodies, LocalStore, settings.tuning, seed),
                audio,
                settings,
                settings_store,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
            }
        }

        /// Step physics at a fixed rate, then run the round loop once
        fn update(&mut self, dt: f32, now_ms: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                for die in self.state.dice.iter_mut() {
                    die.body.step(SIM_DT);
                }
                self.accumulator -= SIM_DT;
                substeps += 1;
            }

            self.input.now_ms = now_ms;
            let input = self.input.clone();
            if let Some(event) = tick(&mut self.state, &input, &self.audio) {
                match event {
                    GameEvent::BetPlaced { amount } => {
                        log::info!("Rolling for {} points - shake to roll!", amount);
                    }
                    GameEvent::Settled(score) => {
                        log::info!("Result: {:?} -> {:?}", score.dice, score.outcome);
                    }
                    GameEvent::NewRound => {}
                }
            }

            // Clear one-shot inputs after processing
            self.input.place_bet = false;
            self.input.reset = false;
        }

        fn toggle_mute(&mut self) {
            let muted = self.settings.toggle_mute();
            self.audio.set_muted(muted);
            if let Err(e) = self.settings.save(&mut self.settings_store) {
                log::warn!("Failed to save settings: {}", e);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let engine = &self.state.engine;
            let phase = engine.phase();

            set_text(&document, "points", &engine.total_points().to_string());
            set_text(&document, "bet-amount", &engine.bet_amount().to_string());
            set_text(&document, "mute-btn", if self.audio.is_muted() { "🔇" } else { "🔊" });

            show(&document, "betting-panel", phase == GamePhase::Betting);
            show(&document, "rolling-hint", phase == GamePhase::Rolling);
            show(&document, "result-panel", phase == GamePhase::Result);

            for preset in PRESET_BETS {
                if let Some(el) = document.get_element_by_id(&format!("preset-{}", preset)) {
                    let class = if engine.bet_amount() == preset {
                        "preset selected"
                    } else {
                        "preset"
                    };
                    let _ = el.set_attribute("class", class);
                    if engine.preset_enabled(preset) {
                        let _ = el.remove_attribute("disabled");
                    } else {
                        let _ = el.set_attribute("disabled", "");
                    }
                }
            }

            if let Some(el) = document.get_element_by_id("place-bet-btn") {
                if engine.can_bet(engine.bet_amount()) {
                    let _ = el.remove_attribute("disabled");
                } else {
                    let _ = el.set_attribute("disabled", "");
                }
            }

            if let Some(score) = engine.score() {
                set_text(
                    &document,
                    "result-title",
                    if score.is_win() { "You Won!" } else { "You Lost" },
                );
                set_text(
                    &document,
                    "dice-values",
                    &format!("{} + {} = {}", score.dice[0], score.dice[1], score.total),
                );
                set_text(&document, "payout", &score.payout.to_string());
            }

            let recent: Vec<String> = engine
                .ledger()
                .recent(RECENT_RESULTS)
                .iter()
                .map(|item| {
                    let outcome = if item.win {
                        format!("Won {}", item.payout)
                    } else {
                        "Lost".to_string()
                    };
                    format!(
                        "Bet: {}, Dice: {} + {}, {}",
                        item.amount, item.dice[0], item.dice[1], outcome
                    )
                })
                .collect();
            set_text(&document, "history-list", &recent.join("\n"));
        }
    }

    fn set_text(document: &web_sys::Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn show(document: &web_sys::Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    fn on_click(id: &str, game: Rc<RefCell<Game>>, handler: fn(&mut Game)) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                handler(&mut g);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            return;
        }

        log::info!("Shake Dice starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document - cannot start");
            return;
        };

        // Hide loading indicator
        show(&document, "loading", false);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        show(&document, "permission-screen", true);
        setup_permission_buttons(game.clone());
        setup_betting_controls(game.clone());
        setup_motion_listener(game.clone());
        setup_focus_handlers(game.clone());

        request_animation_frame(game);
    }

    /// Permission tri-state gates the whole UI: unknown -> prompt, denied -> retry
    async fn ask_permission(game: Rc<RefCell<Game>>) {
        let answer = JsFuture::from(request_motion_permission())
            .await
            .ok()
            .and_then(|v| v.as_string())
            .unwrap_or_default();

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let mut g = game.borrow_mut();
        match answer.as_str() {
            "granted" => g.state.motion.set_permission(MotionPermission::Granted),
            "unavailable" => {
                log::warn!("No motion API on this device");
                g.state.motion = MotionSignal::unavailable();
            }
            _ => g.state.motion.set_permission(MotionPermission::Denied),
        }

        let granted = g.state.motion.permission() == MotionPermission::Granted;
        show(&document, "permission-screen", false);
        show(&document, "denied-screen", !granted);
        show(&document, "game", granted);
    }

    fn setup_permission_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        for id in ["start-btn", "retry-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    game.borrow().audio.resume();
                    wasm_bindgen_futures::spawn_local(ask_permission(game.clone()));
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_betting_controls(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        for preset in PRESET_BETS {
            if let Some(btn) = document.get_element_by_id(&format!("preset-{}", preset)) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    game.borrow_mut().state.engine.select_preset(preset);
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        // Custom bet: Apply button or Enter
        let apply = {
            let game = game.clone();
            move || {
                let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                    return;
                };
                let Some(input) = document
                    .get_element_by_id("custom-bet")
                    .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                else {
                    return;
                };
                if game.borrow_mut().state.engine.apply_custom_bet(&input.value()) {
                    input.set_value("");
                }
            }
        };
        if let Some(btn) = document.get_element_by_id("apply-bet-btn") {
            let apply = apply.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| apply());
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        if let Some(input) = document.get_element_by_id("custom-bet") {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if event.key() == "Enter" {
                    apply();
                }
            });
            let _ =
                input.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        on_click("place-bet-btn", game.clone(), |g| g.input.place_bet = true);
        on_click("continue-btn", game.clone(), |g| g.input.reset = true);
        on_click("mute-btn", game, |g| g.toggle_mute());
    }

    fn setup_motion_listener(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: DeviceMotionEvent| {
            let Some(accl) = event.acceleration_including_gravity() else {
                return;
            };
            let sample = Acceleration::from_axes(accl.x(), accl.y(), accl.z());
            let mut g = game.borrow_mut();
            let g = &mut *g;
            g.state.on_motion(sample, js_sys::Date::now(), &g.audio as &dyn AudioCues);
        });
        let _ =
            window.add_event_listener_with_callback("devicemotion", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Silence cues while the window is in the background
    fn setup_focus_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Window blur (click outside / tab switch)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                let muted = g.settings.muted;
                g.audio.set_muted(muted);
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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

            g.update(dt, js_sys::Date::now());
            g.update_hud();
        }

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
    env_logger::init();
    log::info!("Shake Dice (native) starting...");
    log::info!("Native mode plays one scripted round - run with `trunk serve` for the web version");

    run_scripted_round();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drop the dice, place the default bet, shake for a second and a half, then
/// wait for the dice to settle
#[cfg(not(target_arch = "wasm32"))]
fn run_scripted_round() {
    use glam::Quat;
    use shake_dice::audio::NullAudio;
    use shake_dice::consts::SIM_DT;
    use shake_dice::persistence::MemoryStore;
    use shake_dice::sim::{
        Acceleration, DampedBody, GameEvent, GameState, MotionPermission, TickInput, tick,
    };
    use shake_dice::{Tuning, spawn_position};

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let bodies = [0, 1].map(|i| DampedBody::new(spawn_position(i), Quat::IDENTITY));
    let mut state = GameState::new(bodies, MemoryStore::new(), Tuning::default(), seed);
    state.motion.set_permission(MotionPermission::Granted);
    let audio = NullAudio;

    let frame_ms = f64::from(SIM_DT) * 1000.0;
    let mut now = 0.0;
    let frame = |state: &mut GameState<DampedBody, MemoryStore>, input: &TickInput| {
        for die in state.dice.iter_mut() {
            die.body.step(SIM_DT);
        }
        tick(state, input, &audio)
    };

    // Let the dice land
    for _ in 0..120 {
        now += frame_ms;
        frame(&mut state, &TickInput { now_ms: now, ..Default::default() });
    }

    let placed = frame(
        &mut state,
        &TickInput {
            now_ms: now,
            place_bet: true,
            ..Default::default()
        },
    );
    println!("Bet placed: {:?}", placed);

    // Shake: one sample per frame, swinging side to side
    for i in 0..90 {
        now += frame_ms;
        let swing = if (i / 6) % 2 == 0 { 11.0 } else { -11.0 };
        state.on_motion(Acceleration::new(swing, 9.8, swing * 0.5), now, &audio);
        frame(&mut state, &TickInput { now_ms: now, ..Default::default() });
    }

    for _ in 0..3600 {
        now += frame_ms;
        if let Some(GameEvent::Settled(score)) =
            frame(&mut state, &TickInput { now_ms: now, ..Default::default() })
        {
            println!(
                "Dice {} + {} = {}: {:?}, payout {} (balance {})",
                score.dice[0],
                score.dice[1],
                score.total,
                score.outcome,
                score.payout,
                state.engine.total_points()
            );
            return;
        }
    }
    println!("Dice never settled");
}
