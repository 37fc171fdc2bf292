use crate::host::Focus;
use crate::keys::Key;

/// Part of the control bar that received a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarTarget {
    Decrease,
    Increase,
    Close,
    /// The readout or the bar background.
    Bar,
}

/// Input delivered to a control by its host.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    Click(BarTarget),
    DoubleClick,
    /// Drag of the bar ended at page coordinates `(x, y)`.
    DragEnd { x: f64, y: f64 },
    /// Document-wide keydown; `focus` is where focus sat when the key was pressed.
    Key { key: Key, focus: Focus },
    /// The video's own `ratechange` notification.
    RateChanged,
}

/// What the host should do with the native event after the control handled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// Let the page see it.
    Continue,
    /// `preventDefault()` only.
    PreventDefault,
    /// `preventDefault()` and `stopPropagation()`.
    Swallow,
}
