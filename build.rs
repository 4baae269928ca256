//! Build script for detecting system dependencies and providing installation guidance.
//!
//! Checks for OpenCV and pkg-config, which the `opencv` crate needs to link,
//! and for the Python MediaPipe runtime used by the hand detector helper at
//! run time. Missing pieces only produce warnings.

use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    check_pkg_config();
    check_opencv();
    check_mediapipe();
}

fn command_output(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn check_opencv() {
    println!("cargo:rerun-if-env-changed=PKG_CONFIG_PATH");
    println!("cargo:rerun-if-env-changed=OPENCV_LINK_PATHS");
    println!("cargo:rerun-if-env-changed=OPENCV_INCLUDE_PATHS");

    let found = ["opencv4", "opencv"]
        .iter()
        .any(|name| command_output("pkg-config", &["--modversion", name]).is_some());

    if !found {
        println!("cargo:warning=OpenCV not found via pkg-config. Make sure OpenCV is installed.");
        println!("cargo:warning=On Ubuntu: sudo apt-get install libopencv-dev");
        println!("cargo:warning=On macOS: brew install opencv");
    }
}

fn check_pkg_config() {
    if command_output("pkg-config", &["--version"]).is_none() {
        println!("cargo:warning=pkg-config not found. This is required to find system libraries.");
        println!("cargo:warning=On Ubuntu: sudo apt-get install pkg-config");
        println!("cargo:warning=On macOS: brew install pkg-config");
    }
}

fn check_mediapipe() {
    if command_output("python3", &["-c", "import mediapipe"]).is_none() {
        println!("cargo:warning=Python mediapipe module not found; the hand detector helper will not start.");
        println!("cargo:warning=Install it with: python3 -m pip install mediapipe numpy");
    }
}
