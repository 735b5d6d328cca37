// Shared build script utilities for README-to-rustdoc transformation.
// Include this in build.rs files with: include!("../build_common.rs");
//
// Required imports in the including file:
//   use std::env;
//   use std::fs;
//   use std::path::Path;

/// Render a crate's README.md into `OUT_DIR/README_GENERATED.md` for rustdoc.
///
/// Links written for GitHub browsing are rewritten so rustdoc can resolve them:
/// 1. `](src/` prefixes are stripped so links point at modules
/// 2. `.rs)` suffixes are stripped so links go to modules, not files
/// 3. `](../../README.md` is replaced with the workspace repository URL
///
/// A crate without a README still gets an (empty) generated file so the
/// `include_str!` in lib.rs always resolves.
fn process_readme_for_rustdoc(crate_dir: &str) {
    println!("cargo:rerun-if-changed=README.md");
    println!("cargo:rerun-if-changed=../../Cargo.toml");

    let readme_path = Path::new(crate_dir).join("README.md");
    let content = fs::read_to_string(&readme_path).unwrap_or_default();

    let mut rustdoc_content = content.replace("](src/", "](").replace(".rs)", ")");

    if let Some(url) = workspace_repository_url(crate_dir) {
        rustdoc_content = rustdoc_content.replace("](../../README.md", &format!("]({url}"));
    }

    let out_dir = env::var("OUT_DIR").expect("cargo sets OUT_DIR for build scripts");
    let dest_path = Path::new(&out_dir).join("README_GENERATED.md");
    fs::write(dest_path, rustdoc_content).expect("failed to write README_GENERATED.md");
}

/// Read `repository = "..."` from the workspace Cargo.toml.
fn workspace_repository_url(crate_dir: &str) -> Option<String> {
    let workspace_toml = Path::new(crate_dir).parent()?.parent()?.join("Cargo.toml");
    let content = fs::read_to_string(workspace_toml).ok()?;

    content.lines().map(str::trim).find_map(|line| {
        let value = line.strip_prefix("repository")?.trim_start().strip_prefix('=')?;
        let value = value.trim().trim_matches('"');
        (!value.is_empty()).then(|| value.to_string())
    })
}
