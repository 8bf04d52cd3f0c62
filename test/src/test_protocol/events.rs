use tether_shared::Event;

/// Per-frame update carrying the seconds elapsed since the previous frame
pub struct FrameEvent {
    pub dt: f64,
}

impl Event for FrameEvent {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Back,
    Return,
    Delete,
    Char(char),
}

pub struct KeyEvent {
    pub key: Key,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self { key }
    }
}

impl Event for KeyEvent {}

/// Posted by `TextBox` after every edit of its content
pub struct ChangeContentEvent {
    pub content: String,
}

impl Event for ChangeContentEvent {}

/// Posted by `TextBox` when input is confirmed with `Key::Return`
pub struct ConfirmInputEvent {
    pub content: String,
}

impl Event for ConfirmInputEvent {}
