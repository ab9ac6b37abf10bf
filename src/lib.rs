// ==================== Imports ====================
use wasm_bindgen::prelude::*;

#[macro_use]
mod browser;
pub mod config;
pub mod engine;
pub mod game;

use engine::GameLoop;
use game::FlappyBird;

// ==================== Main Functions ====================
/// Main entry for Webassembly module
/// - installs the panic hook
/// - hands the game to the loop, which sizes the canvas, loads assets and
///   starts requesting animation frames
#[wasm_bindgen]
pub fn main_js() -> Result<(), JsValue> {
    // setup better panic messages for debugging
    console_error_panic_hook::set_once();

    browser::spawn_local(async move {
        if let Err(err) = GameLoop::start(FlappyBird::new()).await {
            error!("Could not start the game : {:#?}", err);
        }
    });

    Ok(())
}
