use crate::browser;
use anyhow::{anyhow, Result};
use futures::channel::mpsc::{unbounded, UnboundedReceiver};
use std::collections::HashMap;
use wasm_bindgen::JsCast;

/// Key transition as reported by the browser, keyed by `KeyboardEvent.key`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPress {
    Down(String),
    Up(String),
}

type Action = Box<dyn FnMut()>;

/// Callbacks bound to key transitions
/// - every registration for a key fires, in registration order
/// - there is no de-duplication, binding the same key twice fires twice
#[derive(Default)]
pub struct InputHandler {
    key_down: HashMap<String, Vec<Action>>,
    key_up: HashMap<String, Vec<Action>>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_key_down(&mut self, key: &str, action: impl FnMut() + 'static) {
        self.key_down
            .entry(key.to_string())
            .or_default()
            .push(Box::new(action));
    }

    pub fn on_key_up(&mut self, key: &str, action: impl FnMut() + 'static) {
        self.key_up
            .entry(key.to_string())
            .or_default()
            .push(Box::new(action));
    }

    /// Run every action bound to the transition, returns how many fired
    pub fn dispatch(&mut self, press: &KeyPress) -> usize {
        let (bindings, key) = match press {
            KeyPress::Down(key) => (&mut self.key_down, key),
            KeyPress::Up(key) => (&mut self.key_up, key),
        };
        match bindings.get_mut(key) {
            Some(actions) => {
                actions.iter_mut().for_each(|action| action());
                actions.len()
            }
            None => 0,
        }
    }
}

/// Listen to keydown / keyup on the document
/// - events are queued and drained once per animation frame
pub fn prepare_input() -> Result<UnboundedReceiver<KeyPress>> {
    let (keydown_sender, receiver) = unbounded();
    let keyup_sender = keydown_sender.clone();

    let onkeydown = browser::closure_wrap(Box::new(move |event: web_sys::KeyboardEvent| {
        let _ = keydown_sender.unbounded_send(KeyPress::Down(event.key()));
    }) as Box<dyn FnMut(web_sys::KeyboardEvent)>);

    let onkeyup = browser::closure_wrap(Box::new(move |event: web_sys::KeyboardEvent| {
        let _ = keyup_sender.unbounded_send(KeyPress::Up(event.key()));
    }) as Box<dyn FnMut(web_sys::KeyboardEvent)>);

    let document = browser::document()?;
    document
        .add_event_listener_with_callback("keydown", onkeydown.as_ref().unchecked_ref())
        .map_err(|err| anyhow!("Could not listen to keydown : {:#?}", err))?;
    document
        .add_event_listener_with_callback("keyup", onkeyup.as_ref().unchecked_ref())
        .map_err(|err| anyhow!("Could not listen to keyup : {:#?}", err))?;

    // listeners live as long as the page
    onkeydown.forget();
    onkeyup.forget();

    Ok(receiver)
}

/// Hand every queued key transition to `handle`, oldest first
pub fn process_input(receiver: &mut UnboundedReceiver<KeyPress>, mut handle: impl FnMut(&KeyPress)) {
    // Err : queue empty or every sender dropped
    while let Ok(press) = receiver.try_recv() {
        handle(&press);
    }
}
