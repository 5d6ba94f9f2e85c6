// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! End-to-end behaviour of the display preferences panel against the
//! in-memory store.

use std::sync::atomic::{AtomicUsize, Ordering};

use prefs_core::form::{Control, FormView};
use prefs_core::panel::INVALID_FIELD;
use prefs_core::{
    ConfigError, DisplayPreferencesPanel, MemoryPreferenceStore, PanelConfig, PanelError,
    PanelRequest, PanelResponse, PreferenceKey, PreferenceSet, PreferenceStore, StorageError,
    Submission, UserId,
};

fn panel(protocols: &[&str]) -> DisplayPreferencesPanel<MemoryPreferenceStore> {
    DisplayPreferencesPanel::new(
        PanelConfig::default().with_allowed_protocols(protocols.iter().copied()),
        MemoryPreferenceStore::new(),
        "/settings/",
    )
}

fn user() -> UserId {
    UserId::parse("alice").expect("valid user id")
}

fn submission(editor: &str) -> Submission {
    Submission {
        titles: "text".into(),
        editor: editor.into(),
        multiedit: "disable".into(),
        monospaced: "Menlo".into(),
        monospaced_textareas: "enabled".into(),
    }
}

fn expect_form(resp: PanelResponse) -> FormView {
    match resp {
        PanelResponse::Form(form) => form,
        PanelResponse::Redirect(to) => panic!("expected form, got redirect to {to}"),
    }
}

#[test]
fn empty_editor_always_saves() {
    for protocols in [&[][..], &["editor"][..]] {
        let p = panel(protocols);
        let resp = p
            .process(&user(), PanelRequest::Submit(submission("")))
            .expect("submit");
        assert_eq!(
            resp,
            PanelResponse::Redirect("/settings/panel/display/?saved=true".into())
        );
        assert_eq!(p.store().save_count(), 1);
    }
}

#[test]
fn disallowed_protocol_is_not_persisted() {
    let p = panel(&["editor"]);
    let mut before = PreferenceSet::new(user());
    before.set_key(PreferenceKey::Titles, "glyph");
    p.store().insert(before.clone()).expect("seed");

    let mut sub = submission("badscheme://x");
    sub.monospaced = "Menlo; }".into();
    let form = expect_form(
        p.process(&user(), PanelRequest::Submit(sub))
            .expect("submit"),
    );

    assert_eq!(p.store().save_count(), 0);
    assert_eq!(p.store().load(&user()).expect("load"), before);

    assert_eq!(form.errors.len(), 1);
    assert!(form.errors[0].contains("editor://"), "{}", form.errors[0]);
    assert!(form.errors[0].contains("uri.allowed-editor-protocols"));
    assert!(!form.saved);

    let editor = form.control("editor").expect("editor control");
    assert_eq!(editor.error(), Some(INVALID_FIELD));
    assert_eq!(editor.value(), Some("badscheme://x"));
    // Submitted values are retained, sanitized where applicable.
    assert_eq!(form.value_of("titles"), Some("text"));
    assert_eq!(form.value_of("monospaced"), Some("Menlo "));
    assert_eq!(form.value_of("monospaced-textareas"), Some("enabled"));
}

#[test]
fn missing_protocol_is_rejected() {
    let p = panel(&["editor"]);
    let form = expect_form(
        p.process(&user(), PanelRequest::Submit(submission("/usr/bin/vim %f")))
            .expect("submit"),
    );
    assert_eq!(form.errors.len(), 1);
    assert_eq!(p.store().save_count(), 0);
}

#[test]
fn allowed_protocol_stores_literal_pattern() {
    let p = panel(&["editor", "vscode"]);
    let resp = p
        .process(
            &user(),
            PanelRequest::Submit(submission("editor://open?f=%f&l=%l")),
        )
        .expect("submit");
    assert!(matches!(resp, PanelResponse::Redirect(ref to) if to.ends_with("?saved=true")));

    let stored = p.store().load(&user()).expect("load");
    assert_eq!(stored.get_key(PreferenceKey::Editor), "editor://open?f=%f&l=%l");
    assert_eq!(stored.get_key(PreferenceKey::Titles), "text");
    assert_eq!(stored.get_key(PreferenceKey::MultiEdit), "disable");
    assert_eq!(stored.get_key(PreferenceKey::Monospaced), "Menlo");
    assert_eq!(stored.get_key(PreferenceKey::MonospacedTextareas), "enabled");
}

#[test]
fn submit_sanitizes_font_before_saving() {
    let p = panel(&[]);
    let mut sub = submission("");
    sub.monospaced = r#"12px "Fira Code"; background: url(x)"#.into();
    p.process(&user(), PanelRequest::Submit(sub)).expect("submit");
    let stored = p.store().load(&user()).expect("load");
    assert_eq!(
        stored.get_key(PreferenceKey::Monospaced),
        r#"12px "Fira Code" background urlx"#
    );
}

#[test]
fn out_of_range_choices_are_stored_as_given() {
    let p = panel(&[]);
    let mut sub = submission("");
    sub.titles = "sparkles".into();
    sub.multiedit = "maybe".into();
    p.process(&user(), PanelRequest::Submit(sub)).expect("submit");
    let stored = p.store().load(&user()).expect("load");
    assert_eq!(stored.get_key(PreferenceKey::Titles), "sparkles");
    assert_eq!(stored.get_key(PreferenceKey::MultiEdit), "maybe");
}

#[test]
fn unknown_keys_survive_a_submit() {
    let p = panel(&[]);
    let mut before = PreferenceSet::new(user());
    before.set("timezone", "UTC");
    p.store().insert(before).expect("seed");
    p.process(&user(), PanelRequest::Submit(submission("")))
        .expect("submit");
    let stored = p.store().load(&user()).expect("load");
    assert_eq!(stored.get("timezone"), Some("UTC"));
}

#[test]
fn first_view_defaults_textareas_to_disabled() {
    let p = panel(&[]);
    let form = expect_form(
        p.process(&user(), PanelRequest::View { saved: false })
            .expect("view"),
    );
    assert_eq!(form.value_of("monospaced-textareas"), Some("disabled"));
    assert_eq!(form.value_of("editor"), Some(""));
    assert_eq!(p.store().save_count(), 0);
}

#[test]
fn view_reflects_saved_values() {
    let p = panel(&["vscode"]);
    p.process(
        &user(),
        PanelRequest::Submit(submission("vscode://file/%f:%l")),
    )
    .expect("submit");
    let form = expect_form(
        p.process(&user(), PanelRequest::View { saved: true })
            .expect("view"),
    );
    assert!(form.saved);
    assert_eq!(form.value_of("editor"), Some("vscode://file/%f:%l"));
    assert_eq!(form.value_of("titles"), Some("text"));
    let Some(Control::Radio { buttons, .. }) = form.control("monospaced-textareas") else {
        panic!("radio control missing");
    };
    assert_eq!(buttons.len(), 2);
}

/// Store whose `load` and/or `save` fail with a config error.
#[derive(Default)]
struct FailingStore {
    fail_load: bool,
    fail_save: bool,
    saves: AtomicUsize,
}

impl PreferenceStore for FailingStore {
    fn load(&self, user: &UserId) -> Result<PreferenceSet, StorageError> {
        if self.fail_load {
            return Err(ConfigError::Other("disk unavailable".into()).into());
        }
        Ok(PreferenceSet::new(user.clone()))
    }

    fn save(&self, _prefs: &PreferenceSet) -> Result<(), StorageError> {
        if self.fail_save {
            return Err(ConfigError::Other("disk full".into()).into());
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn failing_panel(fail_load: bool, fail_save: bool) -> DisplayPreferencesPanel<FailingStore> {
    DisplayPreferencesPanel::new(
        PanelConfig::default(),
        FailingStore {
            fail_load,
            fail_save,
            ..FailingStore::default()
        },
        "/settings/",
    )
}

#[test]
fn load_failure_propagates_on_view_and_submit() {
    let p = failing_panel(true, false);
    assert!(matches!(
        p.process(&user(), PanelRequest::View { saved: false }),
        Err(PanelError::Storage(StorageError::Config(_)))
    ));
    assert!(matches!(
        p.process(&user(), PanelRequest::Submit(submission(""))),
        Err(PanelError::Storage(_))
    ));
    assert_eq!(p.store().saves.load(Ordering::SeqCst), 0);
}

#[test]
fn save_failure_propagates_instead_of_redirecting() {
    let p = failing_panel(false, true);
    let err = p
        .process(&user(), PanelRequest::Submit(submission("")))
        .expect_err("save fails");
    assert!(matches!(err, PanelError::Storage(StorageError::Config(ConfigError::Other(_)))));
    assert!(err.to_string().contains("disk full"), "{err}");
}

#[test]
fn rejected_submit_never_reaches_a_failing_save() {
    let p = failing_panel(false, true);
    let resp = p
        .process(&user(), PanelRequest::Submit(submission("badscheme://x")))
        .expect("validation errors render inline");
    assert!(matches!(resp, PanelResponse::Form(_)));
}
