//! Starts real processes, so it lives alone in its own test binary.

#![cfg(unix)]

use aruco_tune_launch::{aruco_launch, process, PackageIndex};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

fn script(path: &Path, body: &str) {
    fs::write(path, format!("#!/bin/sh\n{body}\n")).expect("write script");
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).expect("chmod");
}

#[test]
fn nodes_run_to_completion_and_report_status() {
    let prefix = tempfile::tempdir().expect("tempdir");
    let root = prefix.path();
    for pkg in ["v4l2_camera", "aruco_py"] {
        fs::create_dir_all(root.join("share").join(pkg)).expect("share");
        fs::create_dir_all(root.join("lib").join(pkg)).expect("lib");
    }
    // the camera checks it got its parameter file; the detector fails
    script(
        &root.join("lib/v4l2_camera/v4l2_camera_node"),
        r#"[ "$4" = "--params-file" ] && exit 0; exit 3"#,
    );
    script(&root.join("lib/aruco_py/aruco_node"), "exit 2");

    let index = PackageIndex::new(vec![root.to_path_buf()]);
    let nodes = aruco_launch().resolve([], &index).expect("resolve");
    let exits = process::run(&nodes).expect("run");

    assert_eq!(exits.len(), 2);
    assert_eq!(exits[0].name, "camera");
    assert!(exits[0].status.success());
    assert_eq!(exits[1].name, "aruco_node");
    assert_eq!(exits[1].status.code(), Some(2));
}
