//! Checks on the workspace crate manifests.

#![allow(clippy::expect_used)]

use std::path::Path;

const CRATES: [&str; 4] = ["core", "server", "cli", "integration-tests"];

#[test]
fn test_declared_readmes_exist() {
    let crates_dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("integration-tests lives under crates/");

    for name in CRATES {
        let dir = crates_dir.join(name);
        let manifest =
            std::fs::read_to_string(dir.join("Cargo.toml")).expect("manifest should be readable");

        for line in manifest.lines() {
            let Some(value) = line.trim().strip_prefix("readme") else {
                continue;
            };
            let file = value.trim_start_matches([' ', '=']).trim_matches('"');
            assert!(
                dir.join(file).is_file(),
                "{name}/Cargo.toml declares readme {file} but it does not exist"
            );
        }
    }
}
