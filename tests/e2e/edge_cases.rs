use super::*;

#[test]
fn unknown_server_is_rejected() {
    let ctx = TestContext::new();
    let result = ctx.run_ssl_config(&["generate", "--server", "iis"]);

    assert_failure(&result);
    assert_error_contains(&result, "unknown server 'iis'");
}

#[test]
fn unknown_configuration_is_rejected() {
    let ctx = TestContext::new();
    let result = ctx.run_ssl_config(&["generate", "--server", "nginx", "--config", "paranoid"]);

    assert_failure(&result);
    assert_error_contains(&result, "unknown configuration 'paranoid'");
}

#[test]
fn modern_on_aws_elb_is_unsupported() {
    let ctx = TestContext::new();
    let result = ctx.run_ssl_config(&["generate", "--server", "awselb", "--config", "modern"]);

    assert_failure(&result);
    assert_error_contains(&result, "AWS ELB 2024.10 does not support TLSv1.3");
}

#[test]
fn modern_on_old_server_is_unsupported() {
    let ctx = TestContext::new();
    let result = ctx.run_ssl_config(&[
        "generate",
        "--server",
        "nginx",
        "--config",
        "modern",
        "--server-version",
        "1.12.2",
    ]);

    assert_failure(&result);
    assert_error_contains(&result, "unable to generate Mozilla \"modern\" SSL configuration");
}

#[test]
fn garbage_versions_are_tolerated() {
    let ctx = TestContext::new();
    let result = ctx.run_ssl_config(&[
        "generate",
        "--server",
        "nginx",
        "--server-version",
        "latest",
        "--openssl-version",
        "3.0.2 (Ubuntu)",
    ]);

    assert_success(&result);
    assert_output_contains(&result, "ssl_protocols TLSv1.2;");
}

#[test]
fn missing_server_without_terminal_fails() {
    let ctx = TestContext::new();
    let result = ctx.run_ssl_config(&["generate"]);

    assert_failure(&result);
    assert_error_contains(&result, "no server specified");
}

#[test]
fn sync_needs_a_destination() {
    let ctx = TestContext::new();
    let upstream = ctx.write_upstream("upstream/src");

    let result = ctx.run_ssl_config(&["sync", "--source", upstream.to_str().unwrap()]);

    assert_failure(&result);
    assert_error_contains(&result, "no dataset directory to update");
}

#[test]
fn sync_rejects_non_upstream_source() {
    let ctx = TestContext::new();
    ctx.write_file("elsewhere/readme.txt", "nothing here");

    let result = ctx.run_ssl_config(&["sync", "--source", "elsewhere", "--dest", "dataset"]);

    assert_failure(&result);
    assert_error_contains(&result, "no guideline document");
}

#[test]
fn dataset_use_rejects_incomplete_directory() {
    let ctx = TestContext::new();
    ctx.write_file("dataset/configs.js", "module.exports = {};");

    let result = ctx.run_ssl_config(&["dataset", "use", "dataset"]);

    assert_failure(&result);
    assert_error_contains(&result, "can't read dataset file");
    assert!(!ctx.file_path("home/config.toml").exists());
}

#[test]
fn broken_settings_file_is_reported() {
    let ctx = TestContext::new();
    ctx.write_file("home/config.toml", "[defaults\n");

    let result = ctx.run_ssl_config(&["list"]);

    assert_failure(&result);
    assert_error_contains(&result, "config.toml");
}
