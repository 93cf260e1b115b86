use super::*;

#[test]
fn generate_writes_output_file() {
    let ctx = TestContext::new();
    let result = ctx.run_ssl_config(&[
        "generate",
        "-s",
        "apache",
        "-c",
        "old",
        "--server-version",
        "2.4.41",
        "--openssl-version",
        "1.1.1k",
        "-o",
        "ssl.conf",
    ]);

    assert_success(&result);
    ctx.assert_file_exists("ssl.conf");
    ctx.assert_file_contains("ssl.conf", "SSLProtocol             -all +TLSv1 +TLSv1.1 +TLSv1.2 +TLSv1.3");
    ctx.assert_file_contains("ssl.conf", "SSLHonorCipherOrder     on");
    ctx.assert_file_contains("ssl.conf", "Apache 2.4.41; Old configuration");
}

#[test]
fn generate_old_openssl_drops_tls13() {
    let ctx = TestContext::new();
    let result = ctx.run_ssl_config(&[
        "generate",
        "--server",
        "haproxy",
        "--openssl-version",
        "1.0.2u",
    ]);

    assert_success(&result);
    assert!(!result.stdout.contains("TLSv1.3"), "{}", result.stdout);
}

#[test]
fn generate_without_hsts_and_ocsp() {
    let ctx = TestContext::new();
    let result = ctx.run_ssl_config(&[
        "generate",
        "--server",
        "nginx",
        "--hsts-disable",
        "--ocsp-disable",
    ]);

    assert_success(&result);
    assert!(!result.stdout.contains("Strict-Transport-Security"));
    assert!(!result.stdout.contains("ssl_stapling on;"));
}

#[test]
fn generate_prints_state() {
    let ctx = TestContext::new();
    let result = ctx.run_ssl_config(&["generate", "--server", "awselb", "--state"]);

    assert_success(&result);

    let state: serde_json::Value = serde_json::from_str(&result.stdout).unwrap();

    assert_eq!(state["form"]["serverName"], "AWS ELB");
    assert_eq!(state["form"]["hsts"], false);
    assert_eq!(state["output"]["protocols"], serde_json::json!(["TLSv1.2"]));
    assert_eq!(state["output"]["usesDhe"], false);
    assert_eq!(state["sstls"]["version"], 5.7);
}

#[test]
fn settings_defaults_apply() {
    let ctx = TestContext::new();
    ctx.write_file(
        "home/config.toml",
        "[defaults]\nconfig = \"old\"\nocsp = false\n",
    );

    let result = ctx.run_ssl_config(&["generate", "--server", "nginx"]);

    assert_success(&result);
    assert_output_contains(&result, "# old configuration");
    assert!(!result.stdout.contains("ssl_stapling on;"));
}

#[test]
fn list_prints_json() {
    let ctx = TestContext::new();
    let result = ctx.run_ssl_config(&["list", "--json"]);

    assert_success(&result);

    let view: serde_json::Value = serde_json::from_str(&result.stdout).unwrap();

    assert_eq!(view["dataset"], "embedded");
    assert_eq!(view["servers"].as_array().unwrap().len(), 11);
    assert_eq!(view["levels"].as_array().unwrap().len(), 3);
}

#[test]
fn dataset_use_show_reset() {
    let ctx = TestContext::new();
    let dataset = ctx.write_dataset("dataset");

    let result = ctx.run_ssl_config(&["dataset", "use", "dataset"]);
    assert_success(&result);
    ctx.assert_file_contains("home/config.toml", "dataset");

    let result = ctx.run_ssl_config(&["dataset", "show"]);
    assert_success(&result);
    assert_output_contains(&result, &dataset.display().to_string());
    assert_output_contains(&result, "Guidelines: 5.7");

    let result = ctx.run_ssl_config(&["generate", "--server", "nginx"]);
    assert_success(&result);
    assert_output_contains(
        &result,
        &format!("# cat {} > /path/to/dhparam", dataset.join("ffdhe2048.txt").display()),
    );

    let result = ctx.run_ssl_config(&["dataset", "reset"]);
    assert_success(&result);

    let result = ctx.run_ssl_config(&["dataset", "show"]);
    assert_success(&result);
    assert_output_contains(&result, "Dataset: embedded");
}

#[test]
fn sync_then_generate_from_dataset() {
    let ctx = TestContext::new();
    let upstream = ctx.write_upstream("upstream/src");

    let result = ctx.run_ssl_config(&[
        "sync",
        "--source",
        upstream.to_str().unwrap(),
        "--dest",
        "dataset",
    ]);

    assert_success(&result);
    assert_output_contains(&result, "guidelines.json : created");
    assert_output_contains(&result, "templates/nginx.hbs : created");
    assert!(!result.stdout.contains("header.hbs"));
    ctx.assert_file_contains("dataset/ffdhe2048.txt", "ffdhe2048");

    let result = ctx.run_ssl_config(&["sync", "--source", upstream.to_str().unwrap(), "--dest", "dataset"]);
    assert_success(&result);
    assert_output_contains(&result, "Dataset is up to date");

    let result = ctx.run_ssl_config(&["--data-dir", "dataset", "generate", "--server", "caddy"]);
    assert_success(&result);
    assert_output_contains(&result, "protocols tls1.2 tls1.3");
}
