use anyhow::*;
use fs_extra::copy_items;
use fs_extra::dir::CopyOptions;
use std::env;
use std::path::PathBuf;

fn main() -> Result<()> {
    // Rerun when the scene textures change.
    println!("cargo:rerun-if-changed=textures/*");

    let out_dir = env::var("OUT_DIR")?;
    let mut copy_options = CopyOptions::new();
    copy_options.overwrite = true;
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let textures_src = manifest_dir.join("textures");
    if textures_src.exists() {
        copy_items(&[textures_src], out_dir, &copy_options)?;
    }

    Ok(())
}
