// tests/config_layering.rs

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use gcalcron::config::{RawSettings, build_settings, load_from_path, load_settings};
use gcalcron::errors::GcalcronError;
use gcalcron::exec::ExecOptions;
use gcalcron::types::{ListOrder, StreamTarget};
use gcalcron_test_utils::builders::{settings_with, test_settings};

fn override_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn compiled_in_defaults() {
    let settings = test_settings();

    assert_eq!(
        settings.credentials_path(),
        Path::new("/home/tester/client_secret.json")
    );
    assert_eq!(
        settings.token_path(),
        Path::new("/home/tester/calendar_api_token.json")
    );
    assert_eq!(settings.calendar_id(), "primary");
    assert_eq!(settings.list_order(), ListOrder::StartTime);
    assert_eq!(settings.shell(), None);
    assert_eq!(settings.output(), None);
    assert_eq!(settings.error(), None);
}

#[test]
fn override_file_replaces_only_present_keys() {
    let file = override_file(
        r#"
calendar_id = "team@group.calendar.google.com"
list_order = "updated"
output = "logs/out.log"
error = "/var/log/gcalcron.err"
"#,
    );

    let raw = load_from_path(file.path()).unwrap();
    let settings = build_settings(test_settings(), raw, Path::new("/work")).unwrap();

    assert_eq!(settings.calendar_id(), "team@group.calendar.google.com");
    assert_eq!(settings.list_order(), ListOrder::Updated);
    assert_eq!(settings.output(), Some(Path::new("/work/logs/out.log")));
    assert_eq!(settings.error(), Some(Path::new("/var/log/gcalcron.err")));

    // Untouched keys keep their defaults.
    assert_eq!(
        settings.credentials_path(),
        Path::new("/home/tester/client_secret.json")
    );
    assert_eq!(settings.shell(), None);
}

#[test]
fn load_settings_reads_override_from_disk() {
    let file = override_file("shell = \"/bin/bash\"\n");

    let settings = load_settings(Some(file.path())).unwrap();

    assert_eq!(settings.shell(), Some("/bin/bash"));
    assert_eq!(settings.calendar_id(), "primary");
}

#[test]
fn missing_override_file_is_an_io_error() {
    let result = load_settings(Some(Path::new("/definitely/not/here.toml")));

    match result {
        Err(e @ GcalcronError::IoError(_)) => assert_eq!(e.code(), "E_IO"),
        other => panic!("Expected IoError, got: {:?}", other),
    }
}

#[test]
fn unknown_keys_are_rejected() {
    let file = override_file("calender_id = \"typo\"\n");

    match load_from_path(file.path()) {
        Err(e @ GcalcronError::TomlError(_)) => assert!(e.is_fatal()),
        other => panic!("Expected TomlError, got: {:?}", other),
    }
}

#[test]
fn invalid_list_order_is_rejected() {
    let file = override_file("list_order = \"random\"\n");

    assert!(matches!(
        load_from_path(file.path()),
        Err(GcalcronError::TomlError(_))
    ));
}

#[test]
fn empty_calendar_id_fails_validation() {
    let raw = RawSettings {
        calendar_id: Some("  ".to_string()),
        ..RawSettings::default()
    };

    match build_settings(test_settings(), raw, Path::new("/work")) {
        Err(e @ GcalcronError::ConfigError(_)) => {
            assert_eq!(e.code(), "E_CONFIG");
            assert!(e.is_fatal());
            assert!(e.to_string().contains("calendar_id"));
        }
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn empty_shell_fails_validation() {
    let raw = RawSettings {
        shell: Some(String::new()),
        ..RawSettings::default()
    };

    assert!(matches!(
        build_settings(test_settings(), raw, Path::new("/work")),
        Err(GcalcronError::ConfigError(_))
    ));
}

#[test]
fn directory_as_redirect_target_fails_validation() {
    let dir = tempfile::tempdir().unwrap();
    let raw = RawSettings {
        output: Some(dir.path().to_path_buf()),
        ..RawSettings::default()
    };

    assert!(matches!(
        build_settings(test_settings(), raw, Path::new("/work")),
        Err(GcalcronError::ConfigError(_))
    ));
}

#[test]
fn cli_redirects_override_settings_defaults() {
    let cwd = Path::new("/work");
    let settings = settings_with(
        RawSettings {
            output: Some(PathBuf::from("default.out")),
            error: Some(PathBuf::from("default.err")),
            shell: Some("/bin/zsh".to_string()),
            ..RawSettings::default()
        },
        cwd,
    );

    let options = ExecOptions::resolve(&settings, Some(Path::new("cli.out")), None, cwd);

    assert_eq!(
        options.stdout,
        StreamTarget::AppendFile(PathBuf::from("/work/cli.out"))
    );
    assert_eq!(
        options.stderr,
        StreamTarget::AppendFile(PathBuf::from("/work/default.err"))
    );
    assert_eq!(options.shell.as_deref(), Some("/bin/zsh"));
    assert_eq!(options.redirect_files().len(), 2);
}

#[test]
fn no_redirects_inherit_streams() {
    let options = ExecOptions::resolve(&test_settings(), None, None, Path::new("/work"));

    assert_eq!(options.stdout, StreamTarget::Inherit);
    assert_eq!(options.stderr, StreamTarget::Inherit);
    assert!(options.redirect_files().is_empty());
}
