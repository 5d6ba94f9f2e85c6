// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The "Display Preferences" settings panel.
//!
//! A view request renders the form from stored preferences. A submit writes
//! every field into the loaded set, then either saves and redirects back with
//! `saved=true`, or (editor link with a disallowed protocol) re-renders the
//! submitted values with the error and saves nothing.

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::PanelConfig;
use crate::editor::{expand_editor_link, has_allowed_protocol, validate_editor_pattern, EditorTarget};
use crate::form::{CaptionPart, Control, FormView, RadioButton, SelectOption};
use crate::prefs::{
    DisplayPrefs, MultiEditMode, PageTitleStyle, PreferenceKey, PreferenceSet, TextareaFont,
};
use crate::sanitize::sanitize_monospaced_font;
use crate::store::{PreferenceStore, StorageError};
use crate::user::UserId;

/// Stable panel key, used in URIs.
pub const PANEL_KEY: &str = "display";
/// Panel title.
pub const PANEL_NAME: &str = "Display Preferences";
/// Settings group the panel is listed under.
pub const PANEL_GROUP: &str = "Application Settings";

/// Inline error shown on the editor field.
pub const INVALID_FIELD: &str = "Invalid";

const MONOSPACE_SAMPLE: &str = "\
// This is what your monospaced font currently looks like.
function helloWorld() {
  alert(\"Hello world!\");
}";

/// Submitted form fields. Absent fields read as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Submission {
    /// `titles`
    pub titles: String,
    /// `editor`
    pub editor: String,
    /// `multiedit`
    pub multiedit: String,
    /// `monospaced`
    pub monospaced: String,
    /// `monospaced-textareas`
    #[serde(rename = "monospaced-textareas")]
    pub monospaced_textareas: String,
}

/// What the client asked the panel to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelRequest {
    /// Plain view; `saved` is the `?saved=true` flag.
    View {
        /// Show the saved notice.
        saved: bool,
    },
    /// Form post.
    Submit(Submission),
}

/// Outcome of handling a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelResponse {
    /// Preferences were saved; send the client here.
    Redirect(String),
    /// Show this form.
    Form(FormView),
}

/// Errors that escape the panel. Validation problems never do; they are
/// rendered on the form instead.
#[derive(Debug, Error)]
pub enum PanelError {
    /// Loading or saving preferences failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Request handler for the display preferences panel.
pub struct DisplayPreferencesPanel<S> {
    config: PanelConfig,
    store: S,
    base_uri: String,
}

impl<S> DisplayPreferencesPanel<S> {
    /// Create the panel. `base_uri` is the settings application root, e.g.
    /// `/settings/`; a missing leading or trailing `/` is added.
    pub fn new(config: PanelConfig, store: S, base_uri: impl Into<String>) -> Self {
        let mut base_uri = base_uri.into();
        if !base_uri.starts_with('/') {
            base_uri.insert(0, '/');
        }
        if !base_uri.ends_with('/') {
            base_uri.push('/');
        }
        Self {
            config,
            store,
            base_uri,
        }
    }

    /// Configuration the panel was built with.
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Borrow the preference store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// URI of this panel with `suffix` appended (`""` or `?saved=true`).
    pub fn panel_uri(&self, suffix: &str) -> String {
        format!("{}panel/{PANEL_KEY}/{suffix}", self.base_uri)
    }
}

impl<S: PreferenceStore> DisplayPreferencesPanel<S> {
    /// Handle one request on behalf of `user`.
    pub fn process(&self, user: &UserId, request: PanelRequest) -> Result<PanelResponse, PanelError> {
        let mut prefs = self.store.load(user)?;
        match request {
            PanelRequest::View { saved } => {
                debug!(%user, saved, "rendering display preferences");
                Ok(PanelResponse::Form(self.build_form(&prefs, Vec::new(), None, saved)))
            }
            PanelRequest::Submit(submission) => self.submit(&mut prefs, submission),
        }
    }

    fn submit(&self, prefs: &mut PreferenceSet, submission: Submission) -> Result<PanelResponse, PanelError> {
        let monospaced = sanitize_monospaced_font(&submission.monospaced);

        prefs.set_key(PreferenceKey::Titles, submission.titles);
        prefs.set_key(PreferenceKey::Editor, submission.editor);
        prefs.set_key(PreferenceKey::MultiEdit, submission.multiedit);
        prefs.set_key(PreferenceKey::Monospaced, monospaced);
        prefs.set_key(PreferenceKey::MonospacedTextareas, submission.monospaced_textareas);

        let editor = prefs.get_key(PreferenceKey::Editor);
        if let Err(err) = validate_editor_pattern(editor, &self.config) {
            warn!(user = %prefs.user(), editor, "rejected editor link protocol");
            let form = self.build_form(prefs, vec![err.to_string()], Some(INVALID_FIELD), false);
            return Ok(PanelResponse::Form(form));
        }

        self.store.save(prefs)?;
        info!(user = %prefs.user(), "saved display preferences");
        Ok(PanelResponse::Redirect(self.panel_uri("?saved=true")))
    }

    fn build_form(
        &self,
        prefs: &PreferenceSet,
        errors: Vec<String>,
        editor_error: Option<&str>,
        saved: bool,
    ) -> FormView {
        let current = DisplayPrefs::from_set(prefs);

        let mut editor_caption = vec![
            CaptionPart::Text(
                "Link to edit files in external editor. %f is replaced by filename, %l by line \
                 number, %r by repository callsign, %% by literal %. For documentation, see: "
                    .to_owned(),
            ),
            CaptionPart::Link {
                href: self.config.editor_doc_link.clone(),
                text: "User Guide: Configuring an External Editor".to_owned(),
            },
        ];
        if editor_error.is_none() && has_allowed_protocol(&current.editor, &self.config) {
            let example = expand_editor_link(
                &current.editor,
                &EditorTarget {
                    path: "src/main.rs".to_owned(),
                    line: 12,
                    repository: "P".to_owned(),
                },
            );
            editor_caption.push(CaptionPart::Break);
            editor_caption.push(CaptionPart::Text("Example: ".to_owned()));
            editor_caption.push(CaptionPart::Code(example));
        }

        let controls = vec![
            Control::Select {
                label: "Page Titles".to_owned(),
                name: PreferenceKey::Titles.as_str().to_owned(),
                value: current.titles,
                options: PageTitleStyle::ALL
                    .iter()
                    .map(|s| option(s.value(), s.label()))
                    .collect(),
            },
            Control::Text {
                label: "Editor Link".to_owned(),
                name: PreferenceKey::Editor.as_str().to_owned(),
                value: current.editor,
                caption: editor_caption,
                error: editor_error.map(str::to_owned),
            },
            Control::Select {
                label: "Edit Multiple Files".to_owned(),
                name: PreferenceKey::MultiEdit.as_str().to_owned(),
                value: current.multiedit,
                options: MultiEditMode::ALL
                    .iter()
                    .map(|m| option(m.value(), m.label()))
                    .collect(),
            },
            Control::Text {
                label: "Monospaced Font".to_owned(),
                name: PreferenceKey::Monospaced.as_str().to_owned(),
                value: current.monospaced,
                caption: vec![
                    CaptionPart::Text(
                        "Overrides default fonts in tools like Differential.".to_owned(),
                    ),
                    CaptionPart::Break,
                    CaptionPart::Text(format!(
                        "(Default: {})",
                        self.config.default_monospace_font
                    )),
                ],
                error: None,
            },
            Control::Markup {
                class: "monospaced".to_owned(),
                content: MONOSPACE_SAMPLE.to_owned(),
            },
            Control::Radio {
                label: "Monospaced Textareas".to_owned(),
                name: PreferenceKey::MonospacedTextareas.as_str().to_owned(),
                value: current.monospaced_textareas,
                buttons: TextareaFont::ALL
                    .iter()
                    .map(|t| RadioButton {
                        value: t.value().to_owned(),
                        label: t.label().to_owned(),
                        caption: t.caption().map(str::to_owned),
                    })
                    .collect(),
            },
        ];

        FormView {
            header: PANEL_NAME.to_owned(),
            controls,
            errors,
            saved,
            submit_label: "Save Preferences".to_owned(),
        }
    }
}

fn option(value: &str, label: &str) -> SelectOption {
    SelectOption {
        value: value.to_owned(),
        label: label.to_owned(),
    }
}
