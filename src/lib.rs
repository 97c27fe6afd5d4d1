#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

// The mesh model is target-independent so it can be unit-tested on the host;
// only the DOM glue is compiled for wasm32.

pub mod mesh;

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use wasm_bindgen::prelude::*;

    pub mod render;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        render::start()?;
        Ok(())
    }
}

// When compiling for non-wasm targets (e.g., `cargo test` on host),
// provide an empty stub so the crate still builds.
#[cfg(not(target_arch = "wasm32"))]
pub fn main() {}
