//! Retrieves information about the version of the game from Git and the build
//! environment. The generated module is exposed as `hotseat::build` and printed
//! by the console on start-up.

fn main() -> shadow_rs::SdResult<()> {
    shadow_rs::new()
}
