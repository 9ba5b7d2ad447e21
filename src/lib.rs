use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() {
    iggo_app::app::launch();
}
