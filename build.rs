//! Retrieves information about the version of the game from Git and the build
//! environment. The generated `shadow.rs` is included by `src/lib.rs` and
//! printed in the startup banner.

fn main() -> shadow_rs::SdResult<()> {
    shadow_rs::new()
}
