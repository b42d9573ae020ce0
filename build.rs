//! Build script: embeds the release version in the binary.

use std::process::Command;

fn main() {
    // Release builds export GLOBLINK_VERSION; local builds use git describe.
    if let Ok(version) = std::env::var("GLOBLINK_VERSION") {
        println!("cargo:rustc-env=GLOBLINK_VERSION={version}");
    } else if let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        && output.status.success()
    {
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !version.is_empty() {
            println!("cargo:rustc-env=GLOBLINK_VERSION={version}");
        }
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-env-changed=GLOBLINK_VERSION");
}
