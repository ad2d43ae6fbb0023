#![forbid(unsafe_code)]

//! End-to-end behavior of the mounted form/mirror/history loop.
//!
//! Organized by concern:
//! 1. `settle` – keystrokes and programmatic sets reaching the mirror
//! 2. `navigate` – undo/redo through the bridge and back
//! 3. `bounds` – history cap and boundary no-ops
//! 4. `teardown` – unmount mid-debounce, refusals afterwards

use mirrorform_core::{FieldBinding, FieldPath, FormHolder, FormValues};
use mirrorform_runtime::{FormSync, HistoryAction, ManualClock, Scheduler, SyncConfig};
use web_time::Duration;

struct Harness {
    sync: FormSync,
    scheduler: Scheduler,
    clock: ManualClock,
    fields: Vec<FieldBinding>,
}

impl Harness {
    fn new() -> Self {
        Self::with_config(SyncConfig::default())
    }

    fn with_config(config: SyncConfig) -> Self {
        let (scheduler, clock) = Scheduler::manual();
        let form = FormHolder::default();
        let fields = FieldPath::ALL.into_iter().map(|p| form.register(p)).collect();
        let sync = FormSync::mount(form, scheduler.clone(), config);
        Self {
            sync,
            scheduler,
            clock,
            fields,
        }
    }

    fn field(&self, path: FieldPath) -> &FieldBinding {
        &self.fields[path.index()]
    }

    fn wait(&self, ms: u64) {
        self.clock.advance(Duration::from_millis(ms));
        self.scheduler.run_due();
    }

    fn settle(&self) {
        self.wait(self.sync.config().debounce_ms);
    }

    /// Type `text` into `path` and let it settle.
    fn commit(&self, path: FieldPath, text: &str) {
        self.field(path).input(text);
        self.settle();
    }

    fn undo_settled(&self) -> bool {
        let moved = self.sync.undo();
        self.settle();
        moved
    }

    fn displayed(&self) -> Vec<String> {
        self.fields.iter().map(FieldBinding::value).collect()
    }
}

mod settle {
    use super::*;

    #[test]
    fn settled_mirror_equals_form() {
        let h = Harness::new();
        h.field(FieldPath::A).input("a");
        h.wait(10);
        h.field(FieldPath::CA).input("nested");
        h.wait(10);
        h.field(FieldPath::A).input("ab");
        h.settle();

        assert_eq!(h.sync.mirror().get(), h.sync.form().get_values());
    }

    #[test]
    fn intermediate_keystrokes_are_superseded() {
        let h = Harness::new();
        for text in ["t", "te", "tes", "test"] {
            h.field(FieldPath::B).input(text);
            h.wait(20);
        }
        h.settle();

        assert_eq!(h.sync.mirror().version(), 1);
        assert_eq!(h.sync.mirror().get().b, "test");
        assert_eq!(h.sync.status().len, 2);
    }

    #[test]
    fn mirror_lags_until_window_elapses() {
        let h = Harness::new();
        h.field(FieldPath::A).input("x");
        h.wait(49);
        assert_eq!(h.sync.mirror().get(), FormValues::default());
        h.wait(1);
        assert_eq!(h.sync.mirror().get().a, "x");
    }

    #[test]
    fn programmatic_test_set_shows_everywhere_and_commits() {
        let h = Harness::new();

        h.sync.set_values(FormValues::filled("test"));
        assert_eq!(h.displayed(), vec!["test"; 4]);

        h.settle();
        let status = h.sync.status();
        assert!(status.can_undo);
        assert_eq!(status.len, 2);
        assert_eq!(*h.sync.current(), FormValues::filled("test"));
    }

    #[test]
    fn same_snapshot_twice_commits_once() {
        let h = Harness::new();
        h.sync.set_values(FormValues::filled("test"));
        h.settle();
        h.sync.set_values(FormValues::filled("test"));
        h.settle();
        assert_eq!(h.sync.status().len, 2);
    }

    #[test]
    fn typing_back_to_current_value_commits_nothing() {
        let h = Harness::new();
        h.field(FieldPath::A).input("x");
        h.field(FieldPath::A).input("");
        h.settle();
        assert_eq!(h.sync.status().len, 1);
        assert!(!h.sync.status().can_undo);
    }
}

mod navigate {
    use super::*;

    #[test]
    fn undo_restores_prior_snapshot_exactly() {
        let h = Harness::new();
        h.commit(FieldPath::A, "first");
        let prior = h.sync.form().get_values();
        h.commit(FieldPath::CB, "second");

        assert!(h.undo_settled());

        assert_eq!(h.sync.form().get_values(), prior);
        assert_eq!(h.sync.mirror().get(), prior);
        assert!(h.sync.status().can_redo);
    }

    #[test]
    fn redo_survives_the_undo_round_trip() {
        let h = Harness::new();
        h.commit(FieldPath::A, "one");
        h.commit(FieldPath::A, "two");
        h.undo_settled();

        assert!(h.sync.dispatch(HistoryAction::Redo));
        h.settle();

        assert_eq!(h.field(FieldPath::A).value(), "two");
        assert!(!h.sync.status().can_redo);
        assert_eq!(h.sync.status().len, 3);
    }

    #[test]
    fn new_commit_after_undo_discards_redo() {
        let h = Harness::new();
        h.commit(FieldPath::A, "one");
        h.commit(FieldPath::A, "two");
        h.undo_settled();

        h.commit(FieldPath::B, "fresh");

        assert!(!h.sync.status().can_redo);
        assert!(!h.sync.redo());
        assert_eq!(h.field(FieldPath::A).value(), "one");
    }

    #[test]
    fn set_back_within_window_after_undo_commits() {
        let h = Harness::new();
        h.commit(FieldPath::A, "x");
        h.sync.set_values(FormValues::filled("test"));
        h.settle();

        assert!(h.sync.undo());
        h.wait(10);
        h.sync.set_values(FormValues::filled("test"));
        h.settle();

        // The mirror never changed, yet the history follows the form.
        assert_eq!(*h.sync.current(), h.sync.mirror().get());
        assert_eq!(h.sync.mirror().get(), FormValues::filled("test"));
        let status = h.sync.status();
        assert_eq!(status.position, 2);
        assert_eq!(status.len, 3);
        assert!(!status.can_redo);

        assert!(h.undo_settled());
        assert_eq!(h.field(FieldPath::A).value(), "x");
        assert_eq!(h.field(FieldPath::B).value(), "");
    }

    #[test]
    fn retyping_the_undone_value_commits_it_again() {
        let h = Harness::new();
        h.commit(FieldPath::A, "x");
        h.commit(FieldPath::A, "y");

        h.sync.undo();
        h.field(FieldPath::A).input("y");
        h.settle();

        assert_eq!(h.sync.current().a, "y");
        assert_eq!(h.sync.status().position, 2);
        assert!(!h.sync.status().can_redo);
    }

    #[test]
    fn undo_of_programmatic_set_returns_to_empty_form() {
        let h = Harness::new();
        h.sync.set_values(FormValues::filled("test"));
        h.settle();

        h.undo_settled();

        assert_eq!(h.displayed(), vec![""; 4]);
        assert!(!h.sync.status().can_undo);
        assert!(h.sync.status().can_redo);
    }

    #[test]
    fn rapid_double_undo_settles_on_target() {
        let h = Harness::new();
        h.commit(FieldPath::A, "1");
        h.commit(FieldPath::A, "2");
        h.commit(FieldPath::A, "3");

        h.sync.undo();
        h.sync.undo();
        h.settle();

        assert_eq!(h.sync.mirror().get().a, "1");
        assert_eq!(h.sync.status().position, 1);
        assert_eq!(h.sync.status().len, 4);
    }

    #[test]
    fn undo_updates_flags_before_settling() {
        let h = Harness::new();
        h.commit(FieldPath::A, "1");
        h.sync.undo();
        let status = h.sync.status();
        assert!(!status.can_undo);
        assert!(status.can_redo);
    }
}

mod bounds {
    use super::*;

    #[test]
    fn undo_without_history_is_noop() {
        let h = Harness::new();
        let before = h.sync.status();

        assert!(!h.sync.undo());
        h.settle();

        assert_eq!(h.sync.status(), before);
        assert_eq!(h.sync.mirror().version(), 0);
        assert_eq!(h.sync.form().get_values(), FormValues::default());
    }

    #[test]
    fn twenty_five_commits_allow_nineteen_undos() {
        let h = Harness::new();
        for i in 1..=25 {
            h.commit(FieldPath::A, &format!("v{i}"));
        }
        assert_eq!(h.sync.status().len, 20);

        let undone = (0..21).filter(|_| h.undo_settled()).count();

        assert_eq!(undone, 19);
        assert_eq!(h.field(FieldPath::A).value(), "v6");
        assert!(!h.sync.status().can_undo);
    }

    #[test]
    fn custom_limit_is_respected() {
        let h = Harness::with_config(SyncConfig::default().with_history_limit(3));
        for i in 0..5 {
            h.commit(FieldPath::B, &i.to_string());
        }
        assert_eq!(h.sync.status().len, 3);
    }
}

mod teardown {
    use super::*;

    #[test]
    fn unmount_mid_debounce_never_writes() {
        let mut h = Harness::new();
        h.field(FieldPath::A).input("pending");
        h.wait(25);

        h.sync.unmount();
        h.wait(100);

        assert_eq!(h.sync.mirror().get(), FormValues::default());
        assert_eq!(h.sync.mirror().version(), 0);
        assert!(!h.sync.status().can_undo);
    }

    #[test]
    fn drop_mid_debounce_leaves_timer_inert() {
        let h = Harness::new();
        let mirror = h.sync.mirror().clone();
        h.field(FieldPath::A).input("pending");

        let Harness {
            sync,
            scheduler,
            clock,
            fields,
        } = h;
        drop(sync);
        clock.advance(Duration::from_millis(100));
        assert_eq!(scheduler.run_due(), 0);

        assert_eq!(mirror.version(), 0);
        fields[0].input("after drop");
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn unmounted_loop_refuses_sets_and_navigation() {
        let mut h = Harness::new();
        h.commit(FieldPath::A, "one");
        h.commit(FieldPath::A, "two");
        h.undo_settled();
        let before = h.sync.status();

        h.sync.unmount();

        assert!(!h.sync.set_values(FormValues::filled("test")));
        assert!(!h.sync.undo());
        assert!(!h.sync.dispatch(HistoryAction::Redo));
        assert_eq!(h.sync.status(), before);
        assert_eq!(h.displayed(), vec!["one", "", "", ""]);
        assert_eq!(h.scheduler.pending(), 0);
    }
}
