//! Data bridge: forwards presenter snapshots into the TUI action loop.
//!
//! Every change on the session's `watch` channel becomes an
//! [`Action::DisplayUpdated`]; a bumped reload generation additionally
//! becomes an [`Action::Reload`].

use pidash_core::DisplayState;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::action::Action;

pub async fn spawn_display_bridge(
    mut display: watch::Receiver<DisplayState>,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let initial = display.borrow_and_update().clone();
    let mut generation = initial.reload_generation;
    if action_tx
        .send(Action::DisplayUpdated(Box::new(initial)))
        .is_err()
    {
        return;
    }

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            changed = display.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = display.borrow_and_update().clone();
                if state.reload_generation != generation {
                    generation = state.reload_generation;
                    debug!(generation, "reload requested");
                    if action_tx.send(Action::Reload).is_err() {
                        break;
                    }
                }
                if action_tx.send(Action::DisplayUpdated(Box::new(state))).is_err() {
                    break;
                }
            }
        }
    }
    debug!("display bridge stopped");
}
