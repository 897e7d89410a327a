// Embeds the service version as LISTINGS_VERSION.
// Release pipelines may stamp the patch segment via LISTINGS_PATCH_VERSION.

use std::env;

fn main() {
    let version = env::var("CARGO_PKG_VERSION").expect("CARGO_PKG_VERSION not set");

    let parts: Vec<&str> = version.split('.').collect();
    let [major, minor, patch] = parts.as_slice() else {
        panic!("listing-search: package version must be MAJOR.MINOR.PATCH, got {version:?}");
    };

    let patch = match env::var("LISTINGS_PATCH_VERSION") {
        Ok(stamped) if stamped.parse::<u32>().is_ok() => stamped,
        Ok(stamped) => {
            panic!("listing-search: LISTINGS_PATCH_VERSION must be a number, got {stamped:?}")
        }
        Err(_) => patch.to_string(),
    };

    println!("cargo:rustc-env=LISTINGS_VERSION={major}.{minor}.{patch}");
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-env-changed=LISTINGS_PATCH_VERSION");
}
