use crate::browser;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::fmt::Display;
use web_sys::{Element, Node};

mod html {
    pub const CONTAINER_CLASS: &str = "debugger-container";
    pub const CONTAINER_SELECTOR: &str = ".debugger-container";
    pub const LABEL_CLASS: &str = "debugger-label";
}

/// Anything that can show the value half of a debug row
pub trait LabelView {
    fn show(&self, value: &str);
}

impl LabelView for Element {
    fn show(&self, value: &str) {
        self.set_text_content(Some(value));
    }
}

/// On screen `<text>: <value>` readouts, keyed by label id
#[derive(Default)]
pub struct DebugUi {
    labels: HashMap<String, Box<dyn LabelView>>,
}

impl DebugUi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a `"<text>: "` row to the debugger container and track its value
    /// node under `id`
    pub fn add_label(&mut self, id: &str, text: &str) -> Result<()> {
        let container = container()?;

        let label = browser::create_element("span")?;
        label.set_class_name(html::LABEL_CLASS);
        label.set_text_content(Some(&format!("{}: ", text)));

        let value = browser::create_element("span")?;
        value.set_id(id);

        append(&container, &label)?;
        append(&container, &value)?;
        let line_break = browser::create_element("br")?;
        append(&container, &line_break)?;

        self.attach(id, value);
        Ok(())
    }

    /// Track an existing view under `id`, replacing any previous one
    pub fn attach(&mut self, id: &str, view: impl LabelView + 'static) {
        self.labels.insert(id.to_string(), Box::new(view));
    }

    /// Overwrite the value shown for `id`, unknown ids are ignored
    pub fn update_value(&self, id: &str, value: impl Display) {
        if let Some(view) = self.labels.get(id) {
            view.show(&value.to_string());
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.labels.contains_key(id)
    }
}

fn container() -> Result<Element> {
    if let Some(container) = browser::query_selector(html::CONTAINER_SELECTOR)? {
        return Ok(container);
    }
    let container = browser::create_element("div")?;
    container.set_class_name(html::CONTAINER_CLASS);
    let body = browser::body()?;
    append(&body, &container)?;
    Ok(container)
}

fn append(parent: &Node, child: &Node) -> Result<()> {
    parent
        .append_child(child)
        .map(|_| ())
        .map_err(|err| anyhow!("Could not append debug element : {:#?}", err))
}
