use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

fn netview(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_netview"))
        .args(args)
        .env_remove("NETVIEW_VIEW_ALL_RANKS")
        .env_remove("NETVIEW_VIEW_RANK_RANGE")
        .env_remove("NETVIEW_VIEW_NO_VERTICES")
        .env_remove("NETVIEW_VIEW_NO_NUMBERING")
        .env_remove("NETVIEW_VIEW_TMPDIR")
        .output()
        .expect("run netview")
}

fn demo_network(dir: &Path) -> String {
    let path = dir.join("chain.json");
    let path_str = path.to_str().expect("utf8 path").to_string();
    let output = netview(&["demo", "--subnets", "3", "--vertices", "4", "--out", &path_str]);
    assert!(output.status.success(), "demo failed: {output:?}");
    path_str
}

#[test]
fn demo_prints_a_description() {
    let output = netview(&["demo", "--subnets", "2", "--vertices", "3"]);
    assert!(output.status.success());
    let value: Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["vertices"].as_array().map(Vec::len), Some(5));
    assert_eq!(value["subnetworks"].as_array().map(Vec::len), Some(2));
}

#[test]
fn csv_view_over_two_ranks() {
    let dir = TempDir::new().expect("tempdir");
    let network = demo_network(dir.path());
    let output = netview(&["view", "--network", &network, "--ranks", "2", "--viewer", "csv"]);
    assert!(output.status.success(), "view failed: {output:?}");
    let body = String::from_utf8(output.stdout).expect("utf8");
    let mut lines = body.lines();
    assert_eq!(lines.next(), Some("Type,Rank,ID,X,Y,Z,Name,Color"));
    let rows: Vec<&str> = lines.collect();
    assert_eq!(rows.iter().filter(|row| row.starts_with("Node,")).count(), 10);
    assert_eq!(rows.iter().filter(|row| row.starts_with("Edge,")).count(), 9);
    assert!(rows.iter().any(|row| row.starts_with("Node,1,")));
}

#[test]
fn ascii_view_starts_with_totals() {
    let dir = TempDir::new().expect("tempdir");
    let network = demo_network(dir.path());
    let output = netview(&["view", "--network", &network]);
    assert!(output.status.success(), "view failed: {output:?}");
    let body = String::from_utf8(output.stdout).expect("utf8");
    assert!(body.starts_with("  NSubnets: 3; NEdges: 9; NVertices: 10; NSharedVertices: 2.\n"));
}

#[test]
fn unknown_viewer_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let network = demo_network(dir.path());
    let output = netview(&["view", "--network", &network, "--viewer", "vtk"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("viewer type vtk not supported"), "{stderr}");
}
