//! Keyboard input: raw events, normalisation, and the keystroke source
//! contract consumed by the router and the mode controller.

pub mod key;
pub mod keycode;

pub use key::{normalize, Key, KeyToken, Modifiers, NamedKey};

/// Identifier for a keystroke subscription. Allocation is monotonic and
/// never reused while the process lives.
pub type SubscriptionId = u64;

/// A platform key event as delivered by the OS hook.
#[derive(Debug, Clone)]
pub struct KeyEvent {
    /// Platform virtual keycode.
    pub code: u16,
    /// Characters as typed (already shifted), possibly empty.
    pub characters: String,
    pub modifiers: Modifiers,
    pub is_key_down: bool,
}

/// What the subscriber wants done with the OS event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    /// Suppress the event; the OS never sees it.
    Swallow,
    /// Deliver the event to the focused application as usual.
    PassThrough,
}

/// Callback invoked on the input thread for every normalised token.
/// Handlers must return promptly and never call back into the OS input API.
pub type KeyCallback = std::sync::Arc<dyn Fn(&KeyToken) -> KeyDisposition + Send + Sync>;

/// Global keystroke source. Implementations own the OS event tap and
/// deliver normalised tokens, in OS order, to every live subscriber.
pub trait KeystrokeSource: Send + Sync {
    fn subscribe(&self, cb: KeyCallback) -> SubscriptionId;
    fn unsubscribe(&self, id: SubscriptionId);
}
