//! UI actions. Every state change in the app loop goes through one.

use pidash_core::{DisplayState, PowerAction};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Tick,
    Render,
    Resize(u16, u16),
    Quit,

    /// Terminal focus changed; `false` means the dashboard is hidden.
    FocusChanged(bool),
    /// New snapshot from the session's presenter.
    DisplayUpdated(Box<DisplayState>),
    /// The power sequencer asked for the view to be reloaded.
    Reload,

    SplashFinished,
    StartSession,

    Refresh,
    RequestPower(PowerAction),
    ConfirmPower(bool),
}
