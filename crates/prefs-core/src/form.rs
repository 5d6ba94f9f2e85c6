// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Render-agnostic description of a settings form.
//!
//! Front ends walk [`FormView::controls`] in order; nothing here knows about
//! HTML.

/// One `<option>`-style choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Submitted value.
    pub value: String,
    /// Visible label.
    pub label: String,
}

/// One radio choice with an optional explanation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioButton {
    /// Submitted value.
    pub value: String,
    /// Visible label.
    pub label: String,
    /// Explanation shown beside the label.
    pub caption: Option<String>,
}

/// A piece of caption text; links render as anchors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptionPart {
    /// Plain text.
    Text(String),
    /// Hyperlink.
    Link {
        /// Target URI.
        href: String,
        /// Link text.
        text: String,
    },
    /// Fixed-width text.
    Code(String),
    /// Line break.
    Break,
}

/// Caption under a control.
pub type Caption = Vec<CaptionPart>;

/// Form controls the settings panels use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    /// Drop-down select.
    Select {
        /// Field label.
        label: String,
        /// Form field name.
        name: String,
        /// Currently selected value.
        value: String,
        /// Choices in display order.
        options: Vec<SelectOption>,
    },
    /// Single-line text input.
    Text {
        /// Field label.
        label: String,
        /// Form field name.
        name: String,
        /// Current value.
        value: String,
        /// Help text under the input.
        caption: Caption,
        /// Short inline error, e.g. `Invalid`.
        error: Option<String>,
    },
    /// Preformatted sample block.
    Markup {
        /// CSS class applied to the block.
        class: String,
        /// Block contents.
        content: String,
    },
    /// Radio group.
    Radio {
        /// Field label.
        label: String,
        /// Form field name.
        name: String,
        /// Currently selected value.
        value: String,
        /// Choices in display order.
        buttons: Vec<RadioButton>,
    },
}

impl Control {
    /// Form field name, if the control submits one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Select { name, .. } | Self::Text { name, .. } | Self::Radio { name, .. } => {
                Some(name)
            }
            Self::Markup { .. } => None,
        }
    }

    /// Current value, if the control submits one.
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Select { value, .. } | Self::Text { value, .. } | Self::Radio { value, .. } => {
                Some(value)
            }
            Self::Markup { .. } => None,
        }
    }

    /// Inline error, if any.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Text { error, .. } => error.as_deref(),
            _ => None,
        }
    }
}

/// A complete form inside a titled box.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormView {
    /// Box header.
    pub header: String,
    /// Controls in display order.
    pub controls: Vec<Control>,
    /// Form-level error messages.
    pub errors: Vec<String>,
    /// Show the "saved" notice.
    pub saved: bool,
    /// Submit button text.
    pub submit_label: String,
}

impl FormView {
    /// Find a submitting control by field name.
    pub fn control(&self, name: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.name() == Some(name))
    }

    /// Value of the named field, if present.
    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.control(name).and_then(Control::value)
    }
}
