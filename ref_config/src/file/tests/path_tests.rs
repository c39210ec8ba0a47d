//! Tests covering lexical joins and relative-path expansion.

use super::super::*;
use anyhow::{Result, ensure};
use rstest::rstest;
use std::path::{Path, PathBuf};

#[rstest]
#[case("/cfg", "./a.yaml", "/cfg/a.yaml")]
#[case("/cfg/sub", "../a.yaml", "/cfg/a.yaml")]
#[case("/cfg", "./x/./y/../z.json", "/cfg/x/z.json")]
#[case("/", "../../a.yaml", "/a.yaml")]
#[case("/cfg", "plain/name.yaml", "/cfg/plain/name.yaml")]
fn join_lexical_normalises(#[case] base: &str, #[case] rel: &str, #[case] expected: &str) {
    assert_eq!(
        join_lexical(Path::new(base), Path::new(rel)),
        PathBuf::from(expected)
    );
}

#[test]
fn join_lexical_keeps_leading_parent_dirs_for_relative_bases() {
    assert_eq!(
        join_lexical(Path::new("cfg"), Path::new("../../x")),
        PathBuf::from("../x")
    );
}

#[rstest]
#[case("./c.txt", true)]
#[case("../c.txt", true)]
#[case(".hidden", false)]
#[case("..", false)]
#[case("c.txt", false)]
#[case("/abs/c.txt", false)]
fn relative_specifiers_are_detected(#[case] value: &str, #[case] expected: bool) {
    assert_eq!(is_relative_specifier(value), expected);
}

#[test]
fn expand_relative_is_idempotent() -> Result<()> {
    let base = Path::new("/cfg/sub");
    let once = expand_relative("./c.txt", base).into_owned();
    ensure!(once == "/cfg/sub/c.txt", "unexpected expansion {once}");
    let twice = expand_relative(&once, base);
    ensure!(twice == once, "re-expansion changed {once} into {twice}");
    Ok(())
}

#[test]
fn parent_dir_falls_back_to_current_directory() {
    assert_eq!(parent_dir(Path::new("/cfg/a.yaml")), PathBuf::from("/cfg"));
    assert_eq!(parent_dir(Path::new("a.yaml")), PathBuf::from("."));
}

#[cfg(not(any(windows, target_os = "macos")))]
#[test]
fn normalise_cycle_key_is_noop_on_case_sensitive_platforms() {
    let path = PathBuf::from("/tmp/Config.yaml");
    assert_eq!(normalise_cycle_key(&path), "/tmp/Config.yaml");
}

#[cfg(any(windows, target_os = "macos"))]
#[test]
fn normalise_cycle_key_folds_case() {
    let path = PathBuf::from("/tmp/Config.yaml");
    assert_eq!(normalise_cycle_key(&path), "/tmp/config.yaml");
}
