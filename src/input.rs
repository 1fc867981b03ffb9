use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use winit::event::{DeviceEvent, ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{Key, NamedKey};

/// Seconds of pointer inactivity before the cursor is hidden.
pub const CURSOR_HIDE_AFTER_SECONDS: f32 = 5.0;

/// Per-frame input snapshot. The embedding shell pushes translated window and
/// device events in; the engine consumes edges and accumulated deltas and
/// never owns device state itself.
pub struct Input {
    bindings: InputBindings,
    pub mouse_delta: (f32, f32),
    wheel: (f32, f32),
    cursor_pos: Option<(f32, f32)>,
    primary_pressed: bool,
    primary_clicked: bool,
    primary_released: bool,
    secondary_pressed: bool,
    ctrl_held: bool,
    toggle_panel_pressed: bool,
    toggle_end_screen_pressed: bool,
    reset_rotation_pressed: bool,
    pointer_over_ui: bool,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(path: impl AsRef<Path>) -> Self {
        let bindings = InputBindings::load_or_default(path);
        Self::with_bindings(bindings)
    }

    fn with_bindings(bindings: InputBindings) -> Self {
        Self {
            bindings,
            mouse_delta: (0.0, 0.0),
            wheel: (0.0, 0.0),
            cursor_pos: None,
            primary_pressed: false,
            primary_clicked: false,
            primary_released: false,
            secondary_pressed: false,
            ctrl_held: false,
            toggle_panel_pressed: false,
            toggle_end_screen_pressed: false,
            reset_rotation_pressed: false,
            pointer_over_ui: false,
        }
    }

    pub fn push(&mut self, ev: InputEvent) {
        match &ev {
            InputEvent::Key { key, pressed } => {
                self.apply_key_binding(key, *pressed);
            }
            InputEvent::MouseMove { dx, dy } => {
                self.mouse_delta.0 += *dx;
                self.mouse_delta.1 += *dy;
            }
            InputEvent::Wheel { dx, dy } => {
                self.wheel.0 += *dx;
                self.wheel.1 += *dy;
            }
            InputEvent::MouseButton { button, pressed } => match button {
                MouseButton::Left => {
                    if *pressed {
                        self.primary_clicked = true;
                        self.primary_pressed = true;
                    } else {
                        self.primary_released = true;
                        self.primary_pressed = false;
                    }
                }
                MouseButton::Right => {
                    self.secondary_pressed = *pressed;
                }
                _ => {}
            },
            InputEvent::CursorPos { x, y } => {
                self.cursor_pos = Some((*x, *y));
            }
            InputEvent::Other => {}
        }
    }

    /// Clear per-frame edges and accumulators. Held state persists.
    pub fn clear_frame(&mut self) {
        self.mouse_delta = (0.0, 0.0);
        self.wheel = (0.0, 0.0);
        self.primary_clicked = false;
        self.primary_released = false;
        self.toggle_panel_pressed = false;
        self.toggle_end_screen_pressed = false;
        self.reset_rotation_pressed = false;
    }

    pub fn take_primary_press(&mut self) -> bool {
        let was = self.primary_clicked;
        self.primary_clicked = false;
        was
    }

    pub fn take_primary_release(&mut self) -> bool {
        let was = self.primary_released;
        self.primary_released = false;
        was
    }

    pub fn primary_held(&self) -> bool {
        self.primary_pressed
    }

    pub fn secondary_held(&self) -> bool {
        self.secondary_pressed
    }

    pub fn ctrl_held(&self) -> bool {
        self.ctrl_held
    }

    pub fn take_wheel(&mut self) -> (f32, f32) {
        let delta = self.wheel;
        self.wheel = (0.0, 0.0);
        delta
    }

    pub fn take_toggle_panel(&mut self) -> bool {
        let was = self.toggle_panel_pressed;
        self.toggle_panel_pressed = false;
        was
    }

    pub fn take_toggle_end_screen(&mut self) -> bool {
        let was = self.toggle_end_screen_pressed;
        self.toggle_end_screen_pressed = false;
        was
    }

    pub fn take_reset_rotation(&mut self) -> bool {
        let was = self.reset_rotation_pressed;
        self.reset_rotation_pressed = false;
        was
    }

    pub fn cursor_position(&self) -> Option<(f32, f32)> {
        self.cursor_pos
    }

    /// Set by the shell when the cursor sits on its own chrome, so clicks and
    /// scrolls there never reach the scene.
    pub fn set_pointer_over_ui(&mut self, over: bool) {
        self.pointer_over_ui = over;
    }

    pub fn pointer_over_ui(&self) -> bool {
        self.pointer_over_ui
    }

    /// Whether anything happened this frame that should keep the cursor
    /// visible.
    pub fn pointer_activity(&self) -> bool {
        self.mouse_delta != (0.0, 0.0) || self.primary_pressed || self.secondary_pressed
    }

    fn apply_key_binding(&mut self, key: &Key, pressed: bool) {
        if let Some(binding_key) = InputKeyBinding::from_event_key(key) {
            let actions: Vec<_> = self.bindings.actions_for_key(&binding_key).collect();
            for action in actions {
                self.update_action_state(action, pressed);
            }
        }
    }

    fn update_action_state(&mut self, action: InputAction, pressed: bool) {
        match action {
            InputAction::TogglePanel => {
                if pressed {
                    self.toggle_panel_pressed = true;
                }
            }
            InputAction::ToggleEndScreen => {
                if pressed {
                    self.toggle_end_screen_pressed = true;
                }
            }
            InputAction::ResetRotation => {
                // chorded with the modifier key
                if pressed && self.ctrl_held {
                    self.reset_rotation_pressed = true;
                }
            }
            InputAction::ModifierCtrl => self.ctrl_held = pressed,
        }
    }
}

impl Default for Input {
    fn default() -> Self {
        Self::with_bindings(InputBindings::default())
    }
}

/// Hides the cursor after a few seconds without pointer activity.
#[derive(Debug)]
pub struct CursorAutohide {
    timer: f32,
}

impl CursorAutohide {
    pub fn new() -> Self {
        Self { timer: CURSOR_HIDE_AFTER_SECONDS }
    }

    /// Returns whether the cursor should be visible.
    pub fn update(&mut self, active: bool, dt: f32) -> bool {
        if active {
            self.timer = CURSOR_HIDE_AFTER_SECONDS;
        } else if self.timer > 0.0 {
            self.timer -= dt;
        }
        self.timer > 0.0
    }
}

impl Default for CursorAutohide {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
struct InputBindings {
    key_to_actions: HashMap<InputKeyBinding, Vec<InputAction>>,
}

impl InputBindings {
    fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<InputConfigFile>(&contents) {
                Ok(config) => Self::from_config(config, &path.display().to_string()),
                Err(err) => {
                    eprintln!(
                        "[input] Failed to parse {}: {err}. Falling back to default bindings.",
                        path.display()
                    );
                    Self::default()
                }
            },
            Err(err) => {
                eprintln!(
                    "[input] Failed to read {}: {err}. Falling back to default bindings.",
                    path.display()
                );
                Self::default()
            }
        }
    }

    fn from_config(config: InputConfigFile, origin: &str) -> Self {
        let overrides = config.into_overrides(origin);
        Self::with_overrides(overrides)
    }

    fn with_overrides(overrides: HashMap<InputAction, Vec<InputKeyBinding>>) -> Self {
        let mut action_map = Self::default_action_map();
        for (action, keys) in overrides {
            if keys.is_empty() {
                continue;
            }
            action_map.insert(action, keys);
        }
        Self::from_action_map(action_map)
    }

    fn default_action_map() -> HashMap<InputAction, Vec<InputKeyBinding>> {
        use InputAction::*;
        let mut map = HashMap::new();
        map.insert(TogglePanel, vec![InputKeyBinding::named(NamedKeyCode::F9)]);
        map.insert(ToggleEndScreen, vec![InputKeyBinding::named(NamedKeyCode::Escape)]);
        map.insert(ResetRotation, vec![InputKeyBinding::character("z")]);
        map.insert(ModifierCtrl, vec![InputKeyBinding::named(NamedKeyCode::Control)]);
        map
    }

    fn from_action_map(action_map: HashMap<InputAction, Vec<InputKeyBinding>>) -> Self {
        let mut key_to_actions: HashMap<InputKeyBinding, Vec<InputAction>> = HashMap::new();
        for (action, keys) in action_map {
            for key in keys {
                key_to_actions.entry(key).or_default().push(action);
            }
        }
        Self { key_to_actions }
    }

    fn actions_for_key(&self, key: &InputKeyBinding) -> impl Iterator<Item = InputAction> + '_ {
        self.key_to_actions.get(key).into_iter().flatten().copied()
    }
}

impl Default for InputBindings {
    fn default() -> Self {
        Self::from_action_map(Self::default_action_map())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum InputKeyBinding {
    Character(String),
    Named(NamedKeyCode),
}

impl InputKeyBinding {
    fn character(ch: &str) -> Self {
        Self::Character(ch.to_lowercase())
    }

    fn named(named: NamedKeyCode) -> Self {
        Self::Named(named)
    }

    fn from_event_key(key: &Key) -> Option<Self> {
        match key {
            Key::Character(ch) => {
                let s = ch.to_string();
                if s.is_empty() {
                    None
                } else {
                    Some(Self::Character(s.to_lowercase()))
                }
            }
            Key::Named(named) => NamedKeyCode::from_named_key(named).map(Self::Named),
            _ => None,
        }
    }

    fn from_config_value(raw: &str) -> Result<Self, ()> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(());
        }
        if let Some(named) = NamedKeyCode::from_str(&normalized) {
            return Ok(Self::Named(named));
        }
        if normalized.chars().count() == 1 {
            return Ok(Self::Character(normalized));
        }
        Err(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum NamedKeyCode {
    F9,
    Escape,
    Control,
}

impl NamedKeyCode {
    fn from_named_key(key: &NamedKey) -> Option<Self> {
        match key {
            NamedKey::F9 => Some(Self::F9),
            NamedKey::Escape => Some(Self::Escape),
            NamedKey::Control => Some(Self::Control),
            _ => None,
        }
    }

    fn from_str(value: &str) -> Option<Self> {
        match value {
            "f9" => Some(Self::F9),
            "escape" | "esc" => Some(Self::Escape),
            "ctrl" | "control" | "left_ctrl" | "right_ctrl" => Some(Self::Control),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum InputAction {
    TogglePanel,
    ToggleEndScreen,
    ResetRotation,
    ModifierCtrl,
}

impl InputAction {
    fn from_str(value: &str) -> Option<Self> {
        match value {
            "toggle_panel" => Some(Self::TogglePanel),
            "toggle_end_screen" => Some(Self::ToggleEndScreen),
            "reset_rotation" => Some(Self::ResetRotation),
            "modifier_ctrl" => Some(Self::ModifierCtrl),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct InputConfigFile {
    #[serde(default)]
    bindings: HashMap<String, Vec<String>>,
}

impl InputConfigFile {
    fn into_overrides(self, origin: &str) -> HashMap<InputAction, Vec<InputKeyBinding>> {
        let mut overrides = HashMap::new();
        for (action_name, keys) in self.bindings {
            let action_key = action_name.trim().to_lowercase();
            match InputAction::from_str(&action_key) {
                Some(action) => {
                    let mut parsed = Vec::new();
                    for key in keys {
                        match InputKeyBinding::from_config_value(&key) {
                            Ok(binding) => parsed.push(binding),
                            Err(_) => eprintln!(
                                "[input] {origin}: unknown key '{key}' for action '{action_name}', ignoring."
                            ),
                        }
                    }
                    if parsed.is_empty() {
                        eprintln!(
                            "[input] {origin}: action '{action_name}' has no valid keys, keeping defaults."
                        );
                        continue;
                    }
                    overrides.insert(action, parsed);
                }
                None => eprintln!("[input] {origin}: unknown action '{action_name}', ignoring."),
            }
        }
        overrides
    }
}

pub enum InputEvent {
    Key { key: Key, pressed: bool },
    MouseMove { dx: f32, dy: f32 },
    Wheel { dx: f32, dy: f32 },
    MouseButton { button: MouseButton, pressed: bool },
    CursorPos { x: f32, y: f32 },
    Other,
}

impl InputEvent {
    pub fn from_window_event(ev: &WindowEvent) -> Self {
        match ev {
            WindowEvent::MouseWheel { delta, .. } => {
                let (dx, dy) = match delta {
                    MouseScrollDelta::LineDelta(x, y) => (*x, *y),
                    MouseScrollDelta::PixelDelta(p) => (p.x as f32, p.y as f32),
                };
                InputEvent::Wheel { dx, dy }
            }
            WindowEvent::CursorMoved { position, .. } => {
                InputEvent::CursorPos { x: position.x as f32, y: position.y as f32 }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                InputEvent::MouseButton { button: *button, pressed: *state == ElementState::Pressed }
            }
            WindowEvent::KeyboardInput { event, .. } => InputEvent::Key {
                key: event.logical_key.clone(),
                pressed: event.state == ElementState::Pressed,
            },
            _ => InputEvent::Other,
        }
    }

    pub fn from_device_event(ev: &DeviceEvent) -> Self {
        match ev {
            DeviceEvent::MouseMotion { delta: (dx, dy) } => {
                InputEvent::MouseMove { dx: *dx as f32, dy: *dy as f32 }
            }
            _ => InputEvent::Other,
        }
    }
}
