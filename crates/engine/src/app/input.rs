use std::slice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Q,
    E,
    Z,
    X,
    P,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Space,
    Enter,
    Escape,
}

const KEY_COUNT: usize = 16;

impl Key {
    pub const ALL: [Key; KEY_COUNT] = [
        Key::W,
        Key::A,
        Key::S,
        Key::D,
        Key::Q,
        Key::E,
        Key::Z,
        Key::X,
        Key::P,
        Key::ArrowUp,
        Key::ArrowDown,
        Key::ArrowLeft,
        Key::ArrowRight,
        Key::Space,
        Key::Enter,
        Key::Escape,
    ];

    const fn index(self) -> usize {
        match self {
            Key::W => 0,
            Key::A => 1,
            Key::S => 2,
            Key::D => 3,
            Key::Q => 4,
            Key::E => 5,
            Key::Z => 6,
            Key::X => 7,
            Key::P => 8,
            Key::ArrowUp => 9,
            Key::ArrowDown => 10,
            Key::ArrowLeft => 11,
            Key::ArrowRight => 12,
            Key::Space => 13,
            Key::Enter => 14,
            Key::Escape => 15,
        }
    }
}

/// One key or a group of keys; a group matches when any member matches.
pub trait KeySet {
    fn keys(&self) -> &[Key];
}

impl KeySet for Key {
    fn keys(&self) -> &[Key] {
        slice::from_ref(self)
    }
}

impl<const N: usize> KeySet for [Key; N] {
    fn keys(&self) -> &[Key] {
        self
    }
}

impl KeySet for [Key] {
    fn keys(&self) -> &[Key] {
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct KeyStates {
    down: [bool; KEY_COUNT],
}

impl KeyStates {
    pub(crate) fn set(&mut self, key: Key, is_down: bool) {
        self.down[key.index()] = is_down;
    }

    pub(crate) fn is_down(&self, key: Key) -> bool {
        self.down[key.index()]
    }

    pub(crate) fn clear(&mut self) {
        self.down = [false; KEY_COUNT];
    }
}

/// Keyboard state sampled once per tick, before any scene update runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    held: KeyStates,
    pressed: KeyStates,
    quit_requested: bool,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(held: KeyStates, pressed: KeyStates, quit_requested: bool) -> Self {
        Self {
            held,
            pressed,
            quit_requested,
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// True while any of `keys` is held down.
    pub fn key_check<K: KeySet + ?Sized>(&self, keys: &K) -> bool {
        keys.keys().iter().any(|key| self.held.is_down(*key))
    }

    /// True on the single tick a physical press of any of `keys` began.
    pub fn key_pressed<K: KeySet + ?Sized>(&self, keys: &K) -> bool {
        keys.keys().iter().any(|key| self.pressed.is_down(*key))
    }

    pub fn with_key_down(mut self, key: Key) -> Self {
        self.held.set(key, true);
        self
    }

    /// A fresh press also counts as held for the same tick.
    pub fn with_key_pressed(mut self, key: Key) -> Self {
        self.held.set(key, true);
        self.pressed.set(key, true);
        self
    }

    pub fn with_quit_requested(mut self, quit_requested: bool) -> Self {
        self.quit_requested = quit_requested;
        self
    }
}
