// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! HTML page for a [`FormView`], rendered through the `templates/panel.html`
//! askama template (auto-escaped).

use askama::Template;
use prefs_core::form::{CaptionPart, Control, FormView};

#[derive(Template)]
#[template(path = "panel.html")]
struct PanelPage<'a> {
    header: &'a str,
    action: &'a str,
    errors: &'a [String],
    saved: bool,
    controls: Vec<ControlView<'a>>,
    submit_label: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ControlKind {
    Select,
    Text,
    Markup,
    Radio,
}

/// One control, flattened so the template needs no pattern matching on
/// struct variants.
struct ControlView<'a> {
    kind: ControlKind,
    label: &'a str,
    name: &'a str,
    value: &'a str,
    class: &'a str,
    error: Option<&'a str>,
    caption: Vec<CaptionView<'a>>,
    choices: Vec<ChoiceView<'a>>,
}

struct ChoiceView<'a> {
    value: &'a str,
    label: &'a str,
    caption: Option<&'a str>,
    selected: bool,
}

struct CaptionView<'a> {
    text: &'a str,
    href: Option<&'a str>,
    code: bool,
    line_break: bool,
}

impl<'a> ControlView<'a> {
    fn blank(kind: ControlKind) -> Self {
        Self {
            kind,
            label: "",
            name: "",
            value: "",
            class: "",
            error: None,
            caption: Vec::new(),
            choices: Vec::new(),
        }
    }

    fn from_control(control: &'a Control) -> Self {
        match control {
            Control::Select {
                label,
                name,
                value,
                options,
            } => Self {
                label,
                name,
                value,
                choices: options
                    .iter()
                    .map(|o| ChoiceView {
                        value: &o.value,
                        label: &o.label,
                        caption: None,
                        selected: o.value == *value,
                    })
                    .collect(),
                ..Self::blank(ControlKind::Select)
            },
            Control::Text {
                label,
                name,
                value,
                caption,
                error,
            } => Self {
                label,
                name,
                value,
                error: error.as_deref(),
                caption: caption.iter().map(CaptionView::from_part).collect(),
                ..Self::blank(ControlKind::Text)
            },
            Control::Markup { class, content } => Self {
                class,
                value: content,
                ..Self::blank(ControlKind::Markup)
            },
            Control::Radio {
                label,
                name,
                value,
                buttons,
            } => Self {
                label,
                name,
                value,
                choices: buttons
                    .iter()
                    .map(|b| ChoiceView {
                        value: &b.value,
                        label: &b.label,
                        caption: b.caption.as_deref(),
                        selected: b.value == *value,
                    })
                    .collect(),
                ..Self::blank(ControlKind::Radio)
            },
        }
    }
}

impl<'a> CaptionView<'a> {
    fn from_part(part: &'a CaptionPart) -> Self {
        let plain = |text: &'a str| Self {
            text,
            href: None,
            code: false,
            line_break: false,
        };
        match part {
            CaptionPart::Text(text) => plain(text.as_str()),
            CaptionPart::Link { href, text } => Self {
                href: Some(href.as_str()),
                ..plain(text.as_str())
            },
            CaptionPart::Code(code) => Self {
                code: true,
                ..plain(code.as_str())
            },
            CaptionPart::Break => Self {
                line_break: true,
                ..plain("")
            },
        }
    }
}

/// Render `form` as a standalone HTML page that posts back to `action`.
pub fn render_page(form: &FormView, action: &str) -> Result<String, askama::Error> {
    PanelPage {
        header: &form.header,
        action,
        errors: &form.errors,
        saved: form.saved,
        controls: form.controls.iter().map(ControlView::from_control).collect(),
        submit_label: &form.submit_label,
    }
    .render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use prefs_core::form::{RadioButton, SelectOption};

    fn page(controls: Vec<Control>) -> String {
        let form = FormView {
            header: "Display Preferences".into(),
            controls,
            submit_label: "Save Preferences".into(),
            ..FormView::default()
        };
        render_page(&form, "/settings/panel/display/").unwrap()
    }

    #[test]
    fn marks_current_option_selected() {
        let html = page(vec![Control::Select {
            label: "Page Titles".into(),
            name: "titles".into(),
            value: "text".into(),
            options: vec![
                SelectOption {
                    value: "glyph".into(),
                    label: "Glyph".into(),
                },
                SelectOption {
                    value: "text".into(),
                    label: "Text".into(),
                },
            ],
        }]);
        assert!(html.contains("<option value=\"text\" selected>Text</option>"), "{html}");
        assert!(html.contains("<option value=\"glyph\">Glyph</option>"), "{html}");
    }

    #[test]
    fn radio_marks_current_button_checked() {
        let html = page(vec![Control::Radio {
            label: "Monospaced Textareas".into(),
            name: "monospaced-textareas".into(),
            value: "enabled".into(),
            buttons: vec![
                RadioButton {
                    value: "enabled".into(),
                    label: "Enabled".into(),
                    caption: Some("Use the monospaced font.".into()),
                },
                RadioButton {
                    value: "disabled".into(),
                    label: "Disabled".into(),
                    caption: None,
                },
            ],
        }]);
        assert!(html.contains("value=\"enabled\" checked>"), "{html}");
        assert!(html.contains("value=\"disabled\">"), "{html}");
        assert!(html.contains("<span class=\"caption\">Use the monospaced font.</span>"));
    }

    #[test]
    fn text_values_cannot_break_out_of_attributes() {
        let html = page(vec![Control::Text {
            label: "Editor Link".into(),
            name: "editor".into(),
            value: "x\"><script>alert(1)</script>".into(),
            caption: vec![CaptionPart::Code("<b>".into())],
            error: Some("Invalid".into()),
        }]);
        assert!(!html.contains("<script>"), "{html}");
        assert!(html.contains("value=\"x&quot;&gt;&lt;script&gt;"), "{html}");
        assert!(html.contains("<tt>&lt;b&gt;</tt>"), "{html}");
        assert!(html.contains("<span class=\"field-error\">Invalid</span>"));
    }

    #[test]
    fn page_shows_errors_and_saved_notice() {
        let form = FormView {
            header: "Display Preferences".into(),
            errors: vec!["bad <thing>".into()],
            saved: true,
            submit_label: "Save Preferences".into(),
            ..FormView::default()
        };
        let html = render_page(&form, "/settings/panel/display/").unwrap();
        assert!(html.contains("<li>bad &lt;thing&gt;</li>"), "{html}");
        assert!(html.contains("Your changes have been saved."));
        assert!(html.contains("<h1>Display Preferences</h1>"));
    }

    #[test]
    fn markup_block_is_escaped_verbatim() {
        let html = page(vec![Control::Markup {
            class: "monospaced".into(),
            content: "a < b && c".into(),
        }]);
        assert!(html.contains("<pre class=\"monospaced\">a &lt; b &amp;&amp; c</pre>"), "{html}");
    }
}
