//! File references, back-references and base directory propagation.

use anyhow::{Result, ensure};
use ref_config::{NoModules, ResolvedConfig, SearchPathModules, resolve_reference_path};
use rstest::rstest;
use serde_json::json;
use std::path::Path;

use test_utils::{jail_root, to_anyhow, under, with_jail, write_documents};

#[test]
fn file_reference_siblings_override_loaded_values() -> Result<()> {
    with_jail(|j| {
        write_documents(
            j,
            &[
                ("a.yaml", "name: A\nvalue: 1\n"),
                ("main.yaml", "$ref: ./a.yaml\nvalue: 2\n"),
            ],
        )?;
        let config = to_anyhow(ResolvedConfig::from_file("main.yaml"))?;
        ensure!(
            config.clone().into_value() == json!({"name": "A", "value": 2}),
            "unexpected {config:?}"
        );
        Ok(())
    })
}

#[test]
fn referenced_sequences_drop_sibling_keys() -> Result<()> {
    with_jail(|j| {
        write_documents(
            j,
            &[
                ("list.yaml", "- 1\n- 2\n- 3\n"),
                ("main.yaml", "items:\n  $ref: ./list.yaml\n  extra: ignored\n"),
            ],
        )?;
        let config = to_anyhow(ResolvedConfig::from_file("main.yaml"))?;
        ensure!(config["items"] == json!([1, 2, 3]), "unexpected {config:?}");
        Ok(())
    })
}

#[test]
fn back_reference_overrides_leave_target_untouched() -> Result<()> {
    let config = to_anyhow(ResolvedConfig::from_json_str(
        r#"{"defaults": {"port": 80}, "server": {"$ref": "$defaults", "port": 8080}}"#,
    ))?;
    ensure!(config["server"] == json!({"port": 8080}), "unexpected server");
    ensure!(config["defaults"] == json!({"port": 80}), "unexpected defaults");
    Ok(())
}

#[test]
fn base_directory_rebinds_for_each_loaded_file() -> Result<()> {
    with_jail(|j| {
        write_documents(
            j,
            &[
                ("cfg/a.yaml", "$ref: ./sub/b.yaml\n"),
                ("cfg/sub/b.yaml", "path: ./c.txt\n"),
            ],
        )?;
        let root = jail_root()?;
        let config = to_anyhow(ResolvedConfig::from_file("cfg/a.yaml"))?;
        ensure!(
            config["path"] == under(&root, "cfg/sub/c.txt"),
            "unexpected {:?}",
            config["path"]
        );
        Ok(())
    })
}

#[test]
fn sibling_overrides_resolve_against_the_referenced_directory() -> Result<()> {
    with_jail(|j| {
        write_documents(
            j,
            &[
                ("cfg/main.yaml", "log:\n  $ref: ./shared/log.yaml\n  file: ./main.log\n"),
                ("cfg/shared/log.yaml", "file: ./shared.log\nlevel: info\n"),
            ],
        )?;
        let root = jail_root()?;
        let config = to_anyhow(ResolvedConfig::from_file("cfg/main.yaml"))?;
        ensure!(
            config["log"] == json!({"file": under(&root, "cfg/shared/main.log"), "level": "info"}),
            "unexpected {:?}",
            config["log"]
        );
        Ok(())
    })
}

#[test]
fn overridden_references_in_shared_files_are_never_loaded() -> Result<()> {
    with_jail(|j| {
        write_documents(
            j,
            &[
                ("shared/base.yaml", "plugin:\n  $ref: ./plugins/missing.yaml\nworkers: 4\n"),
                ("main.yaml", "$ref: ./shared/base.yaml\nplugin: none\n"),
            ],
        )?;
        let config = to_anyhow(ResolvedConfig::from_file("main.yaml"))?;
        ensure!(
            config.clone().into_value() == json!({"plugin": "none", "workers": 4}),
            "unexpected {config:?}"
        );
        Ok(())
    })
}

#[rstest]
#[case("defaults.yaml")]
#[case("nested/defaults.yaml")]
fn unknown_module_names_join_the_base(#[case] reference: &str) {
    let base = Path::new("/srv/app");
    let modules = SearchPathModules::new().search_ancestors(false);
    assert_eq!(
        resolve_reference_path(reference, base, &modules),
        base.join(reference)
    );
    assert_eq!(
        resolve_reference_path(reference, base, &NoModules),
        base.join(reference)
    );
}

#[test]
fn module_fallback_loads_file_beside_document() -> Result<()> {
    with_jail(|j| {
        write_documents(
            j,
            &[
                ("app/main.yaml", "db:\n  $ref: db.yaml\n"),
                ("app/db.yaml", "host: local\n"),
            ],
        )?;
        let config = to_anyhow(ResolvedConfig::from_file("app/main.yaml"))?;
        ensure!(config["db"] == json!({"host": "local"}), "unexpected {config:?}");
        Ok(())
    })
}

#[test]
fn modules_are_found_in_ancestor_directories() -> Result<()> {
    with_jail(|j| {
        write_documents(
            j,
            &[
                ("config_modules/logging/index.yaml", "level: warn\nformat: text\n"),
                ("app/conf/main.yaml", "log:\n  $ref: logging\n  format: json\n"),
            ],
        )?;
        let config = to_anyhow(
            ResolvedConfig::builder()
                .modules(SearchPathModules::new())
                .from_file("app/conf/main.yaml"),
        )?;
        ensure!(
            config["log"] == json!({"level": "warn", "format": "json"}),
            "unexpected {config:?}"
        );
        Ok(())
    })
}

#[test]
fn explicit_module_roots_take_precedence() -> Result<()> {
    with_jail(|j| {
        write_documents(
            j,
            &[
                ("vendor/db.json", r#"{"source": "vendor"}"#),
                ("config_modules/db.json", r#"{"source": "ancestor"}"#),
                ("main.yaml", "db:\n  $ref: db\n"),
            ],
        )?;
        let vendor = jail_root()?.join("vendor");
        let config = to_anyhow(
            ResolvedConfig::builder()
                .modules(SearchPathModules::new().with_root(vendor))
                .from_file("main.yaml"),
        )?;
        ensure!(
            config["db"] == json!({"source": "vendor"}),
            "unexpected {config:?}"
        );
        Ok(())
    })
}
