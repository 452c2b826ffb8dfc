//! Main menu and pause overlay state machine.
//!
//! ```text
//!   MainMenu --Start--> Playing --Pause--> Paused --Pause/Resume--> Playing
//!      ^                                     |
//!      +------------- Quit to menu ----------+
//! ```
//!
//! Navigation reads edge-triggered actions only, so holding a key moves the
//! cursor once.

use castle_core::input::{Action, InputState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    MainMenu,
    Playing,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Start,
    Resume,
    QuitToMenu,
    Quit,
}

impl MenuItem {
    pub fn label(self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::Resume => "Resume",
            Self::QuitToMenu => "Quit to menu",
            Self::Quit => "Quit",
        }
    }
}

const MAIN_MENU_ITEMS: &[MenuItem] = &[MenuItem::Start, MenuItem::Quit];
const PAUSE_MENU_ITEMS: &[MenuItem] = &[MenuItem::Resume, MenuItem::QuitToMenu];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEvent {
    None,
    StartGame,
    Paused,
    Resumed,
    ReturnedToMenu,
    Quit,
}

#[derive(Debug, Clone)]
pub struct Menu {
    phase: GamePhase,
    cursor: usize,
}

impl Menu {
    pub fn new() -> Self {
        Self {
            phase: GamePhase::MainMenu,
            cursor: 0,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Items shown in the current phase; empty while playing.
    pub fn items(&self) -> &'static [MenuItem] {
        match self.phase {
            GamePhase::MainMenu => MAIN_MENU_ITEMS,
            GamePhase::Paused => PAUSE_MENU_ITEMS,
            GamePhase::Playing => &[],
        }
    }

    pub fn selected(&self) -> Option<MenuItem> {
        self.items().get(self.cursor).copied()
    }

    pub fn update(&mut self, input: &InputState) -> MenuEvent {
        if input.is_just_pressed(Action::Quit) {
            return MenuEvent::Quit;
        }

        match self.phase {
            GamePhase::Playing => {
                if input.is_just_pressed(Action::Pause) {
                    self.enter(GamePhase::Paused);
                    return MenuEvent::Paused;
                }
                MenuEvent::None
            }
            GamePhase::Paused if input.is_just_pressed(Action::Pause) => {
                self.enter(GamePhase::Playing);
                MenuEvent::Resumed
            }
            GamePhase::MainMenu | GamePhase::Paused => {
                self.navigate(input);
                if input.is_just_pressed(Action::MenuConfirm) {
                    self.activate()
                } else {
                    MenuEvent::None
                }
            }
        }
    }

    fn navigate(&mut self, input: &InputState) {
        let len = self.items().len();
        if len == 0 {
            return;
        }
        if input.is_just_pressed(Action::MenuUp) {
            self.cursor = (self.cursor + len - 1) % len;
        }
        if input.is_just_pressed(Action::MenuDown) {
            self.cursor = (self.cursor + 1) % len;
        }
    }

    fn activate(&mut self) -> MenuEvent {
        if let Some(item) = self.selected() {
            log::debug!("Menu item selected: {}", item.label());
        }
        match self.selected() {
            Some(MenuItem::Start) => {
                self.enter(GamePhase::Playing);
                MenuEvent::StartGame
            }
            Some(MenuItem::Resume) => {
                self.enter(GamePhase::Playing);
                MenuEvent::Resumed
            }
            Some(MenuItem::QuitToMenu) => {
                self.enter(GamePhase::MainMenu);
                MenuEvent::ReturnedToMenu
            }
            Some(MenuItem::Quit) => MenuEvent::Quit,
            None => MenuEvent::None,
        }
    }

    fn enter(&mut self, phase: GamePhase) {
        log::info!("Game phase: {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        self.cursor = 0;
    }
}

impl Default for Menu {
    fn default() -> Self {
        Self::new()
    }
}
