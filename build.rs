use std::{env, path::PathBuf};

use anyhow::Result;
use fs_extra::dir::CopyOptions;

/// Ship `assets/` (matcaps, the door texture, the typeface) next to the build output.
fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=assets");

    let assets = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?).join("assets");
    if !assets.is_dir() {
        println!("cargo:warning=no assets directory, scenes fall back to a generated matcap and the bundled typeface");
        return Ok(());
    }
    let options = CopyOptions {
        overwrite: true,
        ..CopyOptions::new()
    };
    fs_extra::copy_items(&[assets], env::var("OUT_DIR")?, &options)?;
    Ok(())
}
