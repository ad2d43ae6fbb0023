#![forbid(unsafe_code)]

//! Form ⇄ mirror synchronization with undo/redo.
//!
//! [`FormSync::mount`] wires the pieces together:
//!
//! ```text
//!  FormHolder ──watch──► Debouncer ──settle──► mirror (Observable)
//!      ▲                                          │
//!      │                                          ▼
//!      └──reset◄── Bridge write ◄── HistoryTracker (commit on settle)
//! ```
//!
//! Keystrokes flow left to right and become history points once they settle.
//! Every settle also reaches the history directly, so a value that settles
//! onto an unchanged mirror (typed back within the window after an undo) is
//! still committed.
//! Programmatic sets and undo/redo enter on the bottom edge: the bridge resets
//! the form, and the resulting watch burst flows around the loop like any
//! other edit. The bridge never writes the mirror itself.
//!
//! [`FormSync::unmount`] (also run on drop) unsubscribes from the form and
//! cancels any pending debounced write. After that, programmatic sets and
//! history navigation are refused.

use std::fmt;
use std::sync::Arc;

use mirrorform_core::{FormHolder, FormValues, WatchEvent, WatchSubscription};
use tracing::{debug, info};

use crate::config::SyncConfig;
use crate::debounce::Debouncer;
use crate::reactive::{Bridge, Observable, Subscription};
use crate::timer::Scheduler;
use crate::undo::{HistoryAction, HistoryStatus, HistoryTracker};

/// A mounted form/mirror/history loop.
pub struct FormSync {
    form: FormHolder,
    mirror: Observable<FormValues>,
    history: HistoryTracker<FormValues>,
    debouncer: Debouncer<FormValues>,
    watch: Option<WatchSubscription>,
    config: SyncConfig,
}

impl fmt::Debug for FormSync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormSync")
            .field("mirror", &self.mirror)
            .field("history", &self.history.status())
            .field("debouncer", &self.debouncer)
            .field("mounted", &self.watch.is_some())
            .finish()
    }
}

impl FormSync {
    /// Mirror `form` into a fresh store and start tracking its history.
    ///
    /// The form's current values seed the mirror and the first history entry.
    #[must_use]
    pub fn mount(form: FormHolder, scheduler: Scheduler, config: SyncConfig) -> Self {
        let mirror =
            Observable::new(form.get_values()).with_label(config.mirror_label.as_str());

        let reset_target = form.clone();
        let bridge = Bridge::new(mirror.clone(), move |values: FormValues| {
            reset_target.reset(values);
        });
        let history = HistoryTracker::new(bridge, config.history_limit);

        let settle_into = mirror.clone();
        let commit = history.settle_hook();
        let debouncer = Debouncer::new(scheduler, config.debounce(), move |values: FormValues| {
            settle_into.set(values.clone());
            commit(&values);
        });

        let pending = debouncer.clone();
        let watch = form.watch(move |event: &WatchEvent| {
            debug!(kind = ?event.kind, name = ?event.name, "update mirror");
            pending.call(event.values.clone());
        });

        info!(
            debounce_ms = config.debounce_ms,
            history_limit = config.history_limit,
            "form sync mounted"
        );

        Self {
            form,
            mirror,
            history,
            debouncer,
            watch: Some(watch),
            config,
        }
    }

    /// Programmatically replace every field through the bridge.
    ///
    /// The form updates immediately; the mirror and history follow once the
    /// debounce window settles. Returns `false` (and writes nothing) once
    /// unmounted.
    pub fn set_values(&self, values: FormValues) -> bool {
        if !self.accepts("set values") {
            return false;
        }
        self.history.bridge().write(values);
        true
    }

    pub fn undo(&self) -> bool {
        self.dispatch(HistoryAction::Undo)
    }

    pub fn redo(&self) -> bool {
        self.dispatch(HistoryAction::Redo)
    }

    /// Navigate history. Refused at a boundary or once unmounted.
    pub fn dispatch(&self, action: HistoryAction) -> bool {
        self.accepts("navigate") && self.history.dispatch(action)
    }

    #[must_use]
    pub fn status(&self) -> HistoryStatus {
        self.history.status()
    }

    /// Called with the new status after each history transition.
    pub fn subscribe_status(&self, callback: impl Fn(&HistoryStatus) + 'static) -> Subscription {
        self.history.subscribe_status(callback)
    }

    /// Active history snapshot.
    #[must_use]
    pub fn current(&self) -> Arc<FormValues> {
        self.history.current()
    }

    /// Settle a pending debounced write now.
    pub fn flush(&self) -> bool {
        self.debouncer.flush()
    }

    /// Whether a debounced write is waiting.
    #[must_use]
    pub fn has_pending_write(&self) -> bool {
        self.debouncer.is_pending()
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.watch.is_some()
    }

    /// Stop listening to the form and drop any pending write. Idempotent.
    pub fn unmount(&mut self) {
        let Some(watch) = self.watch.take() else {
            return;
        };
        watch.unsubscribe();
        let dropped = self.debouncer.cancel();
        info!(dropped_pending = dropped, "form sync unmounted");
    }

    fn accepts(&self, what: &'static str) -> bool {
        if self.is_mounted() {
            return true;
        }
        debug!(what, "ignored after unmount");
        false
    }

    #[must_use]
    pub fn form(&self) -> &FormHolder {
        &self.form
    }

    /// The mirror store.
    #[must_use]
    pub fn mirror(&self) -> &Observable<FormValues> {
        &self.mirror
    }

    #[must_use]
    pub fn history(&self) -> &HistoryTracker<FormValues> {
        &self.history
    }

    #[must_use]
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }
}

impl Drop for FormSync {
    fn drop(&mut self) {
        self.unmount();
    }
}
