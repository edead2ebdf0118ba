/// Navigation requested by a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Next,
    Prev,
}

/// Map a key name (DOM `KeyboardEvent.key` spelling) to a navigation intent.
///
/// `"Space"` is accepted alongside the DOM's literal `" "`.
pub fn intent_for(key: &str) -> Option<Intent> {
    match key {
        "ArrowDown" | "ArrowRight" | "PageDown" | " " | "Space" => Some(Intent::Next),
        "ArrowUp" | "ArrowLeft" | "PageUp" => Some(Intent::Prev),
        _ => None,
    }
}
