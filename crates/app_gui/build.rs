use std::env;

fn main() {
    println!("cargo:rerun-if-env-changed=LABELER_VERSION");
    let version =
        env::var("LABELER_VERSION").unwrap_or_else(|_| env::var("CARGO_PKG_VERSION").unwrap());
    println!("cargo:rustc-env=LABELER_VERSION={version}");
}
