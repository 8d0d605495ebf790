/// Keyboard-driven camera movement
use crate::camera::Camera;
use crate::config::ControlConfig;

/// Keys that drive the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    W,
    A,
    S,
    D,
    F,
    G,
}

impl Key {
    pub const ALL: [Key; 10] = [
        Key::Up,
        Key::Down,
        Key::Left,
        Key::Right,
        Key::W,
        Key::A,
        Key::S,
        Key::D,
        Key::F,
        Key::G,
    ];
}

/// Per-frame snapshot of which keys are held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pressed: [bool; Key::ALL.len()],
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        self.pressed[key as usize] = true;
    }

    pub fn release(&mut self, key: Key) {
        self.pressed[key as usize] = false;
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed[key as usize]
    }

    pub fn clear(&mut self) {
        self.pressed = [false; Key::ALL.len()];
    }
}

impl FromIterator<Key> for KeyState {
    fn from_iter<I: IntoIterator<Item = Key>>(keys: I) -> Self {
        let mut state = Self::new();
        for key in keys {
            state.press(key);
        }
        state
    }
}

/// Move the camera fields according to `keys`, scaled by `seconds`.
///
/// Arrows move the eye, WASD move the look-at center, F/G widen and narrow
/// the field of view while it stays strictly inside `(fov_min, fov_max)`.
/// Only the fields change; the caller rebuilds the matrices.
pub fn apply_controls(camera: &mut Camera, keys: &KeyState, seconds: f32, config: &ControlConfig) {
    let step = config.move_speed * seconds;

    if keys.is_pressed(Key::Up) {
        camera.eye.y += step;
    }
    if keys.is_pressed(Key::Down) {
        camera.eye.y -= step;
    }
    if keys.is_pressed(Key::Left) {
        camera.eye.x -= step;
    }
    if keys.is_pressed(Key::Right) {
        camera.eye.x += step;
    }

    if keys.is_pressed(Key::A) {
        camera.center.x -= step;
    }
    if keys.is_pressed(Key::D) {
        camera.center.x += step;
    }
    if keys.is_pressed(Key::W) {
        camera.center.y += step;
    }
    if keys.is_pressed(Key::S) {
        camera.center.y -= step;
    }

    let fov_step = config.fov_speed * seconds;
    let fov_in_range = |fov: f32| config.fov_min < fov && fov < config.fov_max;

    if keys.is_pressed(Key::F) && fov_in_range(camera.fov + fov_step) {
        camera.fov += fov_step;
    }
    if keys.is_pressed(Key::G) && fov_in_range(camera.fov - fov_step) {
        camera.fov -= fov_step;
    }
}
