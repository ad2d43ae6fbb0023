#![forbid(unsafe_code)]

//! The form screen as a headless application.

use mirrorform_core::{FieldBinding, FieldPath, FormHolder, FormValues};
use mirrorform_runtime::{FormSync, HistoryAction, Scheduler, SyncConfig};
use tracing::debug;
use web_time::Duration;

use crate::view::{Button, ButtonView, FieldView, FormView};

/// Four registered inputs, three buttons, and the mounted sync loop.
#[derive(Debug)]
pub struct App {
    fields: Vec<FieldBinding>,
    sync: FormSync,
    scheduler: Scheduler,
}

impl App {
    /// Mount a fresh, empty form on `scheduler`.
    #[must_use]
    pub fn new(scheduler: Scheduler, config: SyncConfig) -> Self {
        let form = FormHolder::new(FormValues::default());
        let fields = FieldPath::ALL.into_iter().map(|p| form.register(p)).collect();
        let sync = FormSync::mount(form, scheduler.clone(), config);
        Self {
            fields,
            sync,
            scheduler,
        }
    }

    /// Replace the text of one input, as a keystroke would.
    pub fn type_into(&self, path: FieldPath, text: &str) {
        self.fields[path.index()].input(text);
    }

    /// Press `button`. Disabled buttons ignore the click and return `false`.
    pub fn click(&self, button: Button) -> bool {
        if !self.view_enabled(button) {
            debug!(button = button.label(), "click on disabled button");
            return false;
        }
        match button {
            Button::SetTest => self.sync.set_values(FormValues::filled("test")),
            Button::Undo => self.sync.dispatch(HistoryAction::Undo),
            Button::Redo => self.sync.dispatch(HistoryAction::Redo),
        }
    }

    /// Run every timer that is due. Returns how many fired.
    pub fn tick(&self) -> usize {
        self.scheduler.run_due()
    }

    /// Time until the next pending timer, if any.
    #[must_use]
    pub fn until_next_timer(&self) -> Option<Duration> {
        let now = self.scheduler.now();
        self.scheduler
            .next_deadline()
            .map(|deadline| deadline.saturating_sub(now))
    }

    #[must_use]
    pub fn view(&self) -> FormView {
        let status = self.sync.status();
        FormView {
            fields: self
                .fields
                .iter()
                .map(|f| FieldView {
                    path: f.path(),
                    value: f.value(),
                })
                .collect(),
            buttons: Button::ALL
                .into_iter()
                .map(|button| ButtonView {
                    button,
                    enabled: self.view_enabled(button),
                })
                .collect(),
            mirror: self.sync.mirror().get(),
            mirror_version: self.sync.mirror().version(),
            history: status,
            pending_write: self.sync.has_pending_write(),
        }
    }

    #[must_use]
    pub fn sync(&self) -> &FormSync {
        &self.sync
    }

    /// Tear the screen down; pending writes are dropped.
    pub fn unmount(&mut self) {
        self.sync.unmount();
    }

    fn view_enabled(&self, button: Button) -> bool {
        let status = self.sync.status();
        match button {
            Button::SetTest => self.sync.is_mounted(),
            Button::Undo => self.sync.is_mounted() && status.can_undo,
            Button::Redo => self.sync.is_mounted() && status.can_redo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirrorform_runtime::ManualClock;

    fn app() -> (App, ManualClock) {
        let (scheduler, clock) = Scheduler::manual();
        (App::new(scheduler, SyncConfig::default()), clock)
    }

    fn settle(app: &App, clock: &ManualClock) {
        clock.advance(Duration::from_millis(50));
        app.tick();
    }

    #[test]
    fn fresh_screen_has_only_test_button_enabled() {
        let (app, _clock) = app();
        let view = app.view();
        assert!(view.is_enabled(Button::SetTest));
        assert!(!view.is_enabled(Button::Undo));
        assert!(!view.is_enabled(Button::Redo));
        assert_eq!(view.field(FieldPath::A), Some(""));
    }

    #[test]
    fn disabled_click_is_ignored() {
        let (app, _clock) = app();
        assert!(!app.click(Button::Undo));
        assert!(!app.click(Button::Redo));
        assert_eq!(app.view().history.len, 1);
    }

    #[test]
    fn typing_settles_and_enables_undo() {
        let (app, clock) = app();
        app.type_into(FieldPath::CB, "hi");
        assert!(app.view().pending_write);
        assert_eq!(app.until_next_timer(), Some(Duration::from_millis(50)));

        settle(&app, &clock);

        let view = app.view();
        assert!(!view.pending_write);
        assert_eq!(view.mirror.c.b, "hi");
        assert!(view.is_enabled(Button::Undo));
        assert_eq!(app.until_next_timer(), None);
    }

    #[test]
    fn set_test_then_undo_redo() {
        let (app, clock) = app();
        assert!(app.click(Button::SetTest));
        assert_eq!(app.view().field(FieldPath::CA), Some("test"));
        settle(&app, &clock);

        assert!(app.click(Button::Undo));
        settle(&app, &clock);
        assert_eq!(app.view().field(FieldPath::CA), Some(""));
        assert!(app.view().is_enabled(Button::Redo));

        assert!(app.click(Button::Redo));
        settle(&app, &clock);
        assert_eq!(app.view().mirror, FormValues::filled("test"));
    }

    #[test]
    fn unmounted_screen_disables_everything() {
        let (mut app, clock) = app();
        app.type_into(FieldPath::A, "x");
        app.unmount();
        settle(&app, &clock);

        let view = app.view();
        assert!(view.buttons.iter().all(|b| !b.enabled));
        assert_eq!(view.mirror_version, 0);
    }
}
