use std::process::Command;

fn main() {
    // Seconds since epoch; formatted at runtime by the version string.
    let now = std::time::SystemTime::now();
    let build_timestamp = now
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    println!("cargo:rustc-env=BUILD_TIMESTAMP={}", build_timestamp);

    if let Ok(output) = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
    {
        if output.status.success() {
            let git_hash =
                String::from_utf8_lossy(&output.stdout).trim().to_string();
            println!("cargo:rustc-env=GIT_HASH={}", git_hash);
        }
    }
    println!("cargo:rerun-if-changed=build.rs");
}
