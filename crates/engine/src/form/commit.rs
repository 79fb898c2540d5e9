//! Committing values so the host page notices them.
//!
//! Setting a control's value from script is invisible to the page's own
//! listeners, so each kind of widget gets the event sequence a person
//! editing it would have produced.

use super::{ControlKind, DestinationForm, WidgetEvent, WidgetId};
use crate::error::{FormError, Result};

pub trait CommitStrategy {
    type Value: ?Sized;

    fn commit(
        &self,
        form: &mut dyn DestinationForm,
        widget: WidgetId,
        value: &Self::Value,
    ) -> Result<()>;
}

/// Text inputs and text areas: input, then change as focus leaves.
pub struct PlainInput;

/// Tag autocomplete inputs commit their tags when a comma is typed.
pub struct TagAutocomplete;

pub struct Checkbox;

pub struct SelectBox;

/// The rich-text editor mirrors its backing text area on input.
pub struct RichText;

impl CommitStrategy for PlainInput {
    type Value = str;

    fn commit(&self, form: &mut dyn DestinationForm, widget: WidgetId, value: &str) -> Result<()> {
        form.set_value(widget, value)?;
        form.dispatch(
            widget,
            WidgetEvent::Input {
                data: value.to_string(),
            },
        )?;
        form.dispatch(widget, WidgetEvent::Change)
    }
}

impl CommitStrategy for TagAutocomplete {
    type Value = str;

    fn commit(&self, form: &mut dyn DestinationForm, widget: WidgetId, value: &str) -> Result<()> {
        form.set_value(widget, value)?;
        form.dispatch(
            widget,
            WidgetEvent::Input {
                data: value.to_string(),
            },
        )?;
        form.dispatch(
            widget,
            WidgetEvent::KeyDown {
                key: ",".to_string(),
            },
        )
    }
}

impl CommitStrategy for Checkbox {
    type Value = bool;

    fn commit(&self, form: &mut dyn DestinationForm, widget: WidgetId, value: &bool) -> Result<()> {
        expect_kind(form, widget, ControlKind::Checkbox)?;
        form.set_checked(widget, *value)?;
        form.dispatch(widget, WidgetEvent::Change)
    }
}

impl CommitStrategy for SelectBox {
    type Value = str;

    fn commit(&self, form: &mut dyn DestinationForm, widget: WidgetId, value: &str) -> Result<()> {
        expect_kind(form, widget, ControlKind::Select)?;
        form.set_value(widget, value)?;
        form.dispatch(widget, WidgetEvent::Change)
    }
}

impl CommitStrategy for RichText {
    type Value = str;

    fn commit(&self, form: &mut dyn DestinationForm, widget: WidgetId, value: &str) -> Result<()> {
        form.set_value(widget, value)?;
        form.dispatch(
            widget,
            WidgetEvent::Input {
                data: value.to_string(),
            },
        )
    }
}

/// Clicks a toggle unless it is already on.
///
/// Clicking rather than setting the state runs the page's own handler,
/// which is what reveals the controls the toggle guards.
pub fn ensure_checked(form: &mut dyn DestinationForm, toggle: WidgetId) -> Result<()> {
    if !form.is_checked(toggle)? {
        form.click(toggle)?;
    }
    Ok(())
}

fn expect_kind(form: &dyn DestinationForm, widget: WidgetId, expected: ControlKind) -> Result<()> {
    let actual = form.kind(widget)?;
    if actual != expected {
        return Err(FormError::KindMismatch {
            widget: widget.0,
            expected: expected.name(),
            actual: actual.name(),
        }
        .into());
    }
    Ok(())
}
