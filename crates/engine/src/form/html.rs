use std::collections::HashMap;

use ego_tree::NodeId;
use scraper::{ElementRef, Html};
use serde::Serialize;

use super::{ControlKind, DestinationForm, SelectOption, WidgetEvent, WidgetId};
use crate::error::{FormError, Result};
use crate::parser::dom::{self, ElementExt, Scope};

const CONTROLS: &str = "input, select, textarea";

#[derive(Debug, Clone)]
struct Control {
    kind: ControlKind,
    /// The control's `id`, falling back to its `name`.
    key: Option<String>,
    value: String,
    checked: bool,
    options: Vec<SelectOption>,
}

impl Control {
    fn from_element(element: ElementRef<'_>) -> Result<Self> {
        let key = element.attr_opt("id").or_else(|| element.attr_opt("name"));
        let mut control = Control {
            kind: ControlKind::Text,
            key,
            value: String::new(),
            checked: false,
            options: Vec::new(),
        };

        match element.value().name() {
            "select" => {
                let mut selected = None;
                for option in element.select_all("option")? {
                    let label = option.text_or_empty();
                    let value = option.attr_opt("value").unwrap_or_else(|| label.clone());
                    if selected.is_none() && option.attr_opt("selected").is_some() {
                        selected = Some(value.clone());
                    }
                    control.options.push(SelectOption { label, value });
                }

                control.kind = ControlKind::Select;
                control.value = selected
                    .or_else(|| control.options.first().map(|o| o.value.clone()))
                    .unwrap_or_default();
            }
            "textarea" => {
                control.kind = ControlKind::TextArea;
                control.value = element.text().collect();
            }
            _ => {
                let input_type = element
                    .attr_opt("type")
                    .unwrap_or_default()
                    .to_ascii_lowercase();
                if input_type == "checkbox" || input_type == "radio" {
                    control.kind = ControlKind::Checkbox;
                    control.value = element.attr_opt("value").unwrap_or_else(|| "on".to_string());
                    control.checked = element.attr_opt("checked").is_some();
                } else {
                    control.value = element.attr_opt("value").unwrap_or_default();
                }
            }
        }

        Ok(control)
    }
}

/// Current state of one control, for reporting what an import filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSnapshot {
    pub key: String,
    pub kind: ControlKind,
    pub value: String,
    pub checked: bool,
}

/// A destination page held in memory.
///
/// Every form control in the page is registered when the page is loaded and
/// its state is seeded from the markup. Mutations and dispatched events are
/// recorded instead of running any page script.
pub struct HtmlForm {
    document: Html,
    controls: Vec<Control>,
    index: HashMap<NodeId, usize>,
    events: Vec<(WidgetId, WidgetEvent)>,
    touched: bool,
}

impl HtmlForm {
    pub fn parse(html: &str) -> Result<Self> {
        let document = Html::parse_document(html);

        let mut controls = Vec::new();
        let mut index = HashMap::new();
        for element in document.select_all(CONTROLS)? {
            index.insert(element.id(), controls.len());
            controls.push(Control::from_element(element)?);
        }

        Ok(Self {
            document,
            controls,
            index,
            events: Vec::new(),
            touched: false,
        })
    }

    /// No value, checked state or event has been applied since loading.
    pub fn is_pristine(&self) -> bool {
        !self.touched
    }

    pub fn events(&self) -> &[(WidgetId, WidgetEvent)] {
        &self.events
    }

    pub fn events_for(&self, widget: WidgetId) -> Vec<&WidgetEvent> {
        self.events
            .iter()
            .filter(|(id, _)| *id == widget)
            .map(|(_, event)| event)
            .collect()
    }

    /// Every control that has an `id` or `name`, in document order.
    pub fn fields(&self) -> Vec<FieldSnapshot> {
        self.controls
            .iter()
            .filter_map(|control| {
                control.key.as_ref().map(|key| FieldSnapshot {
                    key: key.clone(),
                    kind: control.kind,
                    value: control.value.clone(),
                    checked: control.checked,
                })
            })
            .collect()
    }

    fn matches(&self, selector: &str) -> Result<Vec<WidgetId>> {
        let selector = dom::compile(selector)?;
        Ok(self
            .document
            .select(&selector)
            .filter_map(|element| self.index.get(&element.id()).copied())
            .map(WidgetId)
            .collect())
    }

    fn control(&self, widget: WidgetId) -> Result<&Control> {
        Ok(self
            .controls
            .get(widget.0)
            .ok_or(FormError::UnknownWidget(widget.0))?)
    }

    fn control_mut(&mut self, widget: WidgetId) -> Result<&mut Control> {
        let control = self
            .controls
            .get_mut(widget.0)
            .ok_or(FormError::UnknownWidget(widget.0))?;
        self.touched = true;
        Ok(control)
    }
}

impl DestinationForm for HtmlForm {
    fn find(&self, selector: &str) -> Result<Option<WidgetId>> {
        Ok(self.matches(selector)?.into_iter().next())
    }

    fn find_all(&self, selector: &str) -> Result<Vec<WidgetId>> {
        self.matches(selector)
    }

    fn kind(&self, widget: WidgetId) -> Result<ControlKind> {
        Ok(self.control(widget)?.kind)
    }

    fn value(&self, widget: WidgetId) -> Result<String> {
        Ok(self.control(widget)?.value.clone())
    }

    fn is_checked(&self, widget: WidgetId) -> Result<bool> {
        Ok(self.control(widget)?.checked)
    }

    fn options(&self, widget: WidgetId) -> Result<Vec<SelectOption>> {
        Ok(self.control(widget)?.options.clone())
    }

    fn set_value(&mut self, widget: WidgetId, value: &str) -> Result<()> {
        let control = self.control_mut(widget)?;
        // A select only takes values it has an option for.
        control.value = if control.kind == ControlKind::Select
            && !control.options.iter().any(|o| o.value == value)
        {
            String::new()
        } else {
            value.to_string()
        };
        Ok(())
    }

    fn set_checked(&mut self, widget: WidgetId, checked: bool) -> Result<()> {
        let control = self.control_mut(widget)?;
        if control.kind != ControlKind::Checkbox {
            return Err(FormError::KindMismatch {
                widget: widget.0,
                expected: ControlKind::Checkbox.name(),
                actual: control.kind.name(),
            }
            .into());
        }
        control.checked = checked;
        Ok(())
    }

    fn click(&mut self, widget: WidgetId) -> Result<()> {
        let control = self.control_mut(widget)?;
        let toggles = control.kind == ControlKind::Checkbox;
        if toggles {
            control.checked = !control.checked;
        }

        self.events.push((widget, WidgetEvent::Click));
        if toggles {
            self.events.push((widget, WidgetEvent::Change));
        }
        Ok(())
    }

    fn dispatch(&mut self, widget: WidgetId, event: WidgetEvent) -> Result<()> {
        self.control_mut(widget)?;
        self.events.push((widget, event));
        Ok(())
    }
}
