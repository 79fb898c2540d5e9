//! The destination page's authoring form, as seen by the mapper.
//!
//! The mapper only talks to [`DestinationForm`], so the same mapping code
//! drives a live browser page or the in-memory [`HtmlForm`].

mod commit;
mod html;

use std::fmt;

use serde::Serialize;

use crate::error::Result;

pub use self::commit::{
    Checkbox, CommitStrategy, PlainInput, RichText, SelectBox, TagAutocomplete, ensure_checked,
};
pub use self::html::{FieldSnapshot, HtmlForm};

/// Handle to one form control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(pub usize);

/// What sort of control a widget is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    Text,
    Checkbox,
    Select,
    TextArea,
}

impl fmt::Display for ControlKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl ControlKind {
    pub(crate) fn name(self) -> &'static str {
        match self {
            ControlKind::Text => "text input",
            ControlKind::Checkbox => "checkbox",
            ControlKind::Select => "select",
            ControlKind::TextArea => "textarea",
        }
    }
}

/// Events the host page's own scripts listen for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    Input { data: String },
    KeyDown { key: String },
    Change,
    Click,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Text shown to the user.
    pub label: String,
    /// Value submitted with the form.
    pub value: String,
}

/// A live form that widgets can be looked up in and mutated.
pub trait DestinationForm {
    /// First control matched by a CSS selector.
    fn find(&self, selector: &str) -> Result<Option<WidgetId>>;

    /// Every control matched by a CSS selector, in document order.
    fn find_all(&self, selector: &str) -> Result<Vec<WidgetId>>;

    fn kind(&self, widget: WidgetId) -> Result<ControlKind>;

    fn value(&self, widget: WidgetId) -> Result<String>;

    fn is_checked(&self, widget: WidgetId) -> Result<bool>;

    /// Options of a select control. Empty for every other kind.
    fn options(&self, widget: WidgetId) -> Result<Vec<SelectOption>>;

    /// Sets the value without notifying anyone.
    fn set_value(&mut self, widget: WidgetId, value: &str) -> Result<()>;

    /// Sets the checked state without notifying anyone.
    fn set_checked(&mut self, widget: WidgetId, checked: bool) -> Result<()>;

    /// Clicks the control the way a user would, including its side effects.
    fn click(&mut self, widget: WidgetId) -> Result<()>;

    fn dispatch(&mut self, widget: WidgetId, event: WidgetEvent) -> Result<()>;
}
