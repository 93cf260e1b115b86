use super::*;

#[test]
fn help_lists_commands() {
    let ctx = TestContext::new();
    let result = ctx.run_ssl_config(&["--help"]);

    assert_success(&result);
    assert_output_contains(&result, "generate");
    assert_output_contains(&result, "dataset");
    assert_output_contains(&result, "sync");
}

#[test]
fn version_runs_without_error() {
    let ctx = TestContext::new();
    let result = ctx.run_ssl_config(&["--version"]);

    assert_success(&result);
    assert_output_contains(&result, env!("CARGO_PKG_VERSION"));
}

#[test]
fn list_runs_without_error() {
    let ctx = TestContext::new();
    let result = ctx.run_ssl_config(&["list"]);

    assert_success(&result);
    assert_output_contains(&result, "nginx");
    assert_output_contains(&result, "intermediate");
}

#[test]
fn generate_runs_without_error() {
    let ctx = TestContext::new();
    let result = ctx.run_ssl_config(&["generate", "--server", "nginx"]);

    assert_success(&result);
    assert_output_contains(&result, "ssl_protocols TLSv1.2 TLSv1.3;");
}

#[test]
fn list_shows_guidelines_version() {
    let ctx = TestContext::new();

    Command::cargo_bin("ssl-config")
        .unwrap()
        .args(["list"])
        .current_dir(ctx.path())
        .env("SSL_CONFIG_HOME", ctx.home())
        .assert()
        .success()
        .stdout(predicates::str::contains("5.7"));
}
