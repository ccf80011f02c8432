#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use druidscope_core::registry::Daemon;
use druidscope_exporter::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
exporter:
  listten: "0.0.0.0:8000" # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("invalid yaml"));
}

#[test]
fn ok_minimal_config() {
    let ok = r#"
version: 1
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.exporter.listen, "0.0.0.0:8000");
    assert_eq!(
        cfg.enabled_daemons(),
        vec![Daemon::Coordinator, Daemon::Historical, Daemon::Broker]
    );
}

#[test]
fn daemons_can_be_narrowed() {
    let ok = r#"
version: 1
daemons: [historical]
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.enabled_daemons(), vec![Daemon::Historical]);
}

#[test]
fn unknown_daemon_role_fails_validation() {
    let bad = r#"
version: 1
daemons: [historical, middlemanager]
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("unknown daemon role"));
}

#[test]
fn empty_daemon_list_fails_validation() {
    let bad = r#"
version: 1
daemons: []
"#;
    config::load_from_str(bad).expect_err("must fail");
}

#[test]
fn bad_version_fails_validation() {
    let bad = r#"
version: 2
"#;
    config::load_from_str(bad).expect_err("must fail");
}

#[test]
fn bad_listen_address_fails_validation() {
    let bad = r#"
version: 1
exporter:
  listen: "not-an-address"
"#;
    config::load_from_str(bad).expect_err("must fail");
}
