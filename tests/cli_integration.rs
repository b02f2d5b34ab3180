// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Integration tests for the proddb CLI commands

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::collections::HashSet;
use tempfile::TempDir;
use tokio::runtime::Runtime;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// proddb bound to an isolated data directory and config file
fn proddb(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("proddb").unwrap();
    cmd.env("PRODDB_DATA_DIR", dir.path())
        .env("PRODDB_CONFIG", dir.path().join("config.toml"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

/// Acme → Widget → 1.0, 2.0
fn seed(dir: &TempDir) {
    proddb(dir).args(["vendor", "create", "Acme"]).assert().success();
    proddb(dir)
        .args(["product", "create", "Widget", "--vendor", "Acme"])
        .assert()
        .success();
    for version in ["1.0", "2.0"] {
        proddb(dir)
            .args(["version", "create", version, "--product", "Widget"])
            .assert()
            .success();
    }
}

/// Catalog API serving the given vendors and products, nothing else
fn mock_api(vendors: serde_json::Value, products: serde_json::Value) -> (Runtime, MockServer) {
    let runtime = Runtime::new().unwrap();
    let server = runtime.block_on(async {
        let server = MockServer::start().await;
        let routes = [
            ("/api/v1/vendors", vendors),
            ("/api/v1/products", products),
            ("/api/v1/product-versions", json!([])),
            ("/api/v1/relationships", json!([])),
            ("/api/v1/identification-helpers", json!([])),
        ];
        for (route, body) in routes {
            Mock::given(method("GET"))
                .and(path(route))
                .respond_with(ResponseTemplate::new(200).set_body_json(body))
                .mount(&server)
                .await;
        }
        server
    });
    (runtime, server)
}

fn selected_ids(output: &[u8]) -> HashSet<String> {
    let json: serde_json::Value = serde_json::from_slice(output).unwrap();
    json["selected"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_catalog_lifecycle() {
    let dir = TempDir::new().unwrap();

    proddb(&dir)
        .args(["vendor", "create", "Acme"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vendor:acme"));

    proddb(&dir)
        .args(["product", "create", "Widget", "--vendor", "Acme", "--type", "hardware"])
        .assert()
        .success()
        .stdout(predicate::str::contains("product:acme/widget"));

    proddb(&dir)
        .args(["version", "create", "1.0", "--product", "Widget", "--released", "2024-03-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("version:acme/widget@1.0"));

    assert!(dir.path().join("catalog.json").exists());

    proddb(&dir)
        .args(["product", "show", "Widget"])
        .assert()
        .success()
        .stdout(predicate::str::contains("type: hardware"))
        .stdout(predicate::str::contains("versions (1)"));

    proddb(&dir)
        .args(["vendor", "delete", "Acme"])
        .assert()
        .success();

    proddb(&dir)
        .args(["product", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No products defined"));
    proddb(&dir)
        .args(["version", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No versions defined"));
}

#[test]
fn test_duplicate_vendor_rejected() {
    let dir = TempDir::new().unwrap();
    proddb(&dir).args(["vendor", "create", "Acme"]).assert().success();
    proddb(&dir).args(["vendor", "create", "acme"]).assert().failure();
}

#[test]
fn test_unknown_action_fails() {
    let dir = TempDir::new().unwrap();
    proddb(&dir)
        .args(["vendor", "frobnicate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown action"));
}

#[test]
fn test_tree_renders_checkboxes() {
    let dir = TempDir::new().unwrap();
    seed(&dir);

    proddb(&dir)
        .args(["tree"])
        .assert()
        .success()
        .stdout("[ ] Acme\n  [ ] Widget\n    [ ] 1.0\n    [ ] 2.0\n");

    proddb(&dir)
        .args(["tree", "--select", "1.0"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "[-] Acme\n  [-] Widget\n    [x] 1.0\n    [ ] 2.0\n",
        ));
}

#[test]
fn test_tree_selecting_every_version_selects_ancestors() {
    let dir = TempDir::new().unwrap();
    seed(&dir);

    let output = proddb(&dir)
        .args(["--json", "tree", "--select", "1.0", "--select", "2.0"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let expected: HashSet<String> = [
        "vendor:acme",
        "product:acme/widget",
        "version:acme/widget@1.0",
        "version:acme/widget@2.0",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    assert_eq!(selected_ids(&output.stdout), expected);
}

#[test]
fn test_tree_deselect_clears_ancestors() {
    let dir = TempDir::new().unwrap();
    seed(&dir);

    // select the product, then untick one of its versions
    let output = proddb(&dir)
        .args(["--json", "tree", "--select", "Widget", "--select", "version:acme/widget@1.0"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let expected: HashSet<String> = ["version:acme/widget@2.0".to_string()].into_iter().collect();
    assert_eq!(selected_ids(&output.stdout), expected);
}

#[test]
fn test_tree_unknown_node_fails() {
    let dir = TempDir::new().unwrap();
    seed(&dir);
    proddb(&dir)
        .args(["tree", "--select", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No tree node matches"));
}

#[test]
fn test_helper_lifecycle() {
    let dir = TempDir::new().unwrap();
    seed(&dir);

    proddb(&dir)
        .args([
            "helper",
            "add",
            "--for",
            "version:acme/widget@1.0",
            "--category",
            "cpe",
            "--data",
            "cpe:2.3:a:acme:widget:1.0:*:*:*:*:*:*:*",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("helper:"));

    proddb(&dir)
        .args([
            "helper",
            "add",
            "--for",
            "version:acme/widget@1.0",
            "--category",
            "purl",
            "--data",
            "not-a-purl",
        ])
        .assert()
        .failure();

    proddb(&dir)
        .args(["version", "show", "version:acme/widget@1.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("identification helpers (1)"));

    let output = proddb(&dir).args(["--json", "helper", "list"]).output().unwrap();
    let helpers: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(helpers.as_array().unwrap().len(), 1);
    assert_eq!(helpers[0]["metadata"]["category"], "cpe");
}

#[test]
fn test_relationship_lifecycle() {
    let dir = TempDir::new().unwrap();
    seed(&dir);

    proddb(&dir)
        .args([
            "relationship",
            "add",
            "--from",
            "version:acme/widget@2.0",
            "--to",
            "version:acme/widget@1.0",
            "--category",
            "installed_on",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Widget 2.0 --[installed_on]--> Widget 1.0"));

    proddb(&dir)
        .args(["export", "--format", "dot"])
        .assert()
        .success()
        .stdout(predicate::str::contains("digraph catalog"));

    proddb(&dir)
        .args([
            "relationship",
            "remove",
            "--from",
            "version:acme/widget@2.0",
            "--to",
            "version:acme/widget@1.0",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1 relationship(s)"));
}

#[test]
fn test_product_export_selected() {
    let dir = TempDir::new().unwrap();
    seed(&dir);
    let out = dir.path().join("widget.json");

    proddb(&dir)
        .args(["product", "export", "--select", "Widget", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 products (2 versions)"));

    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["products"][0]["id"], "product:acme/widget");
}

#[test]
fn test_config_set_then_get() {
    let dir = TempDir::new().unwrap();

    proddb(&dir)
        .args(["config", "set-me", "x"])
        .assert()
        .failure();

    proddb(&dir)
        .args(["config", "api_url", "http://catalog.test:9000"])
        .assert()
        .success();

    proddb(&dir)
        .args(["config", "api_url"])
        .assert()
        .success()
        .stdout("http://catalog.test:9000\n");
}

#[test]
fn test_completions_generated() {
    let dir = TempDir::new().unwrap();
    proddb(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("proddb"));
}

#[test]
fn test_no_color_accepts_any_value() {
    let dir = TempDir::new().unwrap();
    for value in ["1", "yes", "please"] {
        proddb(&dir)
            .env("NO_COLOR", value)
            .args(["vendor", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No vendors defined"));
    }
}

#[test]
fn test_helper_add_requires_for() {
    let dir = TempDir::new().unwrap();
    seed(&dir);
    proddb(&dir)
        .args(["helper", "add", "--category", "skus", "--data", "W-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--for is required"));
}

#[test]
fn test_verbose_logs_loaded_configuration() {
    let dir = TempDir::new().unwrap();
    proddb(&dir)
        .args(["-v", "vendor", "list"])
        .assert()
        .success()
        .stderr(predicate::str::contains("configuration loaded"));
}

#[test]
fn test_pull_replaces_catalog() {
    let dir = TempDir::new().unwrap();
    seed(&dir);
    let (_runtime, server) = mock_api(
        json!([{"id": "vendor:globex", "name": "Globex", "created_at": "2025-01-01T00:00:00Z"}]),
        json!([{
            "id": "product:globex/router",
            "vendor_id": "vendor:globex",
            "name": "Router",
            "type": "firmware",
            "created_at": "2025-01-01T00:00:00Z"
        }]),
    );

    let uri = server.uri();
    proddb(&dir)
        .env_remove("HTTP_PROXY")
        .env_remove("http_proxy")
        .env_remove("ALL_PROXY")
        .env_remove("all_proxy")
        .args(["pull", "--api-url", uri.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pulled 1 vendors, 1 products, 0 versions"));

    proddb(&dir)
        .args(["tree"])
        .assert()
        .success()
        .stdout("[ ] Globex\n  [ ] Router\n");
}

#[test]
fn test_pull_rejects_ids_shared_across_tables() {
    let dir = TempDir::new().unwrap();
    seed(&dir);
    let (_runtime, server) = mock_api(
        json!([{"id": "1", "name": "Globex", "created_at": "2025-01-01T00:00:00Z"}]),
        json!([{
            "id": "1",
            "vendor_id": "1",
            "name": "Router",
            "type": "firmware",
            "created_at": "2025-01-01T00:00:00Z"
        }]),
    );

    let uri = server.uri();
    proddb(&dir)
        .env_remove("HTTP_PROXY")
        .env_remove("http_proxy")
        .env_remove("ALL_PROXY")
        .env_remove("all_proxy")
        .args(["pull", "--api-url", uri.as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("used by more than one"));

    // the local catalog is untouched
    proddb(&dir)
        .args(["tree"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[ ] Acme\n"));
}
