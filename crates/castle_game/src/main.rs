//! Castle platformer: main loop and application entry point.
//!
//! winit drives the event loop via `ApplicationHandler`. All simulation runs
//! inside `RedrawRequested` on a fixed timestep (see `TimeState`):
//!
//!   1. `begin_frame()` -- measure wall-clock delta, feed accumulator
//!   2. `run_frame()` -- one `Game::step` per owed tick, consuming input edges
//!   3. snapshot the finished tick and draw it as flat-coloured rectangles
//!
//! Rendering reads state only; it never feeds back into the simulation.

mod camera;
mod collision;
mod config;
mod frame;
mod menu;
mod parallax;
mod player;
#[cfg(test)]
mod replay;
mod stage;
mod transform;
mod world;

use std::path::PathBuf;
use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use castle_core::input::{Action, InputState};
use castle_core::time::TimeState;
use castle_render::{GpuContext, RectRenderer};
use config::{load_config, GameConfig};
use stage::load_stage_from_path;
use world::{run_frame, Game, StepOutcome};

/// Everything that needs the window to exist. Built in `resumed`.
struct EngineState {
    window: Arc<Window>,
    gpu: GpuContext,
    renderer: RectRenderer,
    time: TimeState,
    input: InputState,
    game: Game,
}

impl EngineState {
    fn new(window: Arc<Window>, config: &GameConfig) -> Result<Self, String> {
        let gpu = GpuContext::new(window.clone(), config.window.vsync)?;
        let renderer = RectRenderer::new(&gpu.device, gpu.surface_format);
        let stage = load_stage_from_path(&config.stage_path)?;
        let (w, h) = gpu.size();
        let game = Game::new(stage, config, w, h);
        Ok(Self {
            window,
            gpu,
            renderer,
            time: TimeState::new(),
            input: InputState::new(),
            game,
        })
    }

    /// Returns false when the game asked to quit.
    fn redraw(&mut self) -> bool {
        self.time.begin_frame();
        if run_frame(&mut self.game, &mut self.time, &mut self.input) == StepOutcome::Quit {
            return false;
        }
        if self.time.steps_this_frame > 1 {
            log::trace!("Caught up {} ticks", self.time.steps_this_frame);
        }

        let size = self.window.inner_size();
        if size.width == 0 || size.height == 0 {
            // Minimized: keep simulating, skip drawing.
            return true;
        }
        let snapshot = self.game.snapshot();
        self.renderer
            .render(&self.gpu, snapshot.clear_color(), &snapshot.draw_list());
        true
    }
}

struct App {
    config: GameConfig,
    state: Option<EngineState>,
    startup_failed: bool,
}

impl App {
    fn new(config: GameConfig) -> Self {
        Self {
            config,
            state: None,
            startup_failed: false,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window = match castle_platform::create_window(event_loop, &self.config.window) {
            Ok(window) => window,
            Err(err) => {
                log::error!("{err}");
                self.startup_failed = true;
                event_loop.exit();
                return;
            }
        };
        log::info!(
            "Window created: {}x{}",
            self.config.window.width,
            self.config.window.height
        );
        match EngineState::new(window, &self.config) {
            Ok(state) => self.state = Some(state),
            Err(err) => {
                log::error!("Startup failed: {err}");
                self.startup_failed = true;
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.gpu.resize(w, h);
                    state.game.resize(w, h);
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::Focused(false) => {
                // Key-up events for keys held now will never arrive.
                state.input.release_all();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.repeat {
                    return;
                }
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    for &action in map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => state.input.press(action),
                            ElementState::Released => state.input.release(action),
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if !state.redraw() {
                    event_loop.exit();
                }
            }

            _ => {}
        }
    }
}

/// Physical key to logical actions. One key may drive several actions, e.g.
/// the up arrow jumps in play and moves the menu cursor.
fn map_key(key_code: KeyCode) -> &'static [Action] {
    match key_code {
        KeyCode::ArrowLeft | KeyCode::KeyA => &[Action::MoveLeft],
        KeyCode::ArrowRight | KeyCode::KeyD => &[Action::MoveRight],
        KeyCode::ArrowUp | KeyCode::KeyW => &[Action::Jump, Action::MenuUp],
        KeyCode::Space => &[Action::Jump, Action::MenuConfirm],
        KeyCode::ArrowDown | KeyCode::KeyS => &[Action::MenuDown],
        KeyCode::Enter | KeyCode::NumpadEnter => &[Action::MenuConfirm],
        KeyCode::Escape => &[Action::Pause],
        KeyCode::KeyQ => &[Action::Quit],
        KeyCode::KeyP => &[Action::DebugPrintPosition],
        _ => &[],
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Castle platformer starting...");

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = match load_config(config_path.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            log::error!("{err}");
            std::process::exit(1);
        }
    };

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            log::error!("Failed to create event loop: {err}");
            std::process::exit(1);
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    if let Err(err) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {err}");
        std::process::exit(1);
    }
    if app.startup_failed {
        std::process::exit(1);
    }
}
