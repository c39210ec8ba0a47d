//! Reference cycles fail fast instead of recursing forever.

use anyhow::{Result, anyhow, ensure};
use ref_config::{RefConfigError, ResolvedConfig};

use test_utils::{to_anyhow, with_jail, write_documents};

#[test]
fn self_referencing_document_is_a_cycle() -> Result<()> {
    with_jail(|j| {
        write_documents(j, &[("loop.yaml", "inner:\n  $ref: ./loop.yaml\n")])?;
        let err = ResolvedConfig::from_file("loop.yaml")
            .err()
            .ok_or_else(|| anyhow!("expected a cycle"))?;
        let RefConfigError::CyclicReference { cycle } = err.as_ref() else {
            return Err(anyhow!("unexpected error {err}"));
        };
        ensure!(
            cycle.matches("loop.yaml").count() == 2 && cycle.contains(" -> "),
            "unexpected cycle {cycle}"
        );
        Ok(())
    })
}

#[test]
fn three_file_cycle_names_every_document() -> Result<()> {
    with_jail(|j| {
        write_documents(
            j,
            &[
                ("a.json", r#"{"$ref": "./b.json"}"#),
                ("b.json", r#"{"next": {"$ref": "./c.json"}}"#),
                ("c.json", r#"{"$ref": "./a.json"}"#),
            ],
        )?;
        let err = ResolvedConfig::from_file("a.json")
            .err()
            .ok_or_else(|| anyhow!("expected a cycle"))?;
        let message = err.to_string();
        ensure!(
            message.starts_with("cyclic reference detected:")
                && ["a.json", "b.json", "c.json"].iter().all(|f| message.contains(f)),
            "unexpected message {message}"
        );
        Ok(())
    })
}

#[test]
fn self_back_reference_is_a_cycle() -> Result<()> {
    let err = ResolvedConfig::from_json_str(r#"{"a": {"$ref": "$a"}}"#)
        .err()
        .ok_or_else(|| anyhow!("expected a cycle"))?;
    ensure!(
        matches!(err.as_ref(), RefConfigError::CyclicReference { cycle }
            if cycle == "<properties>#/a -> <properties>#/a"),
        "unexpected error {err}"
    );
    Ok(())
}

#[test]
fn diamond_references_are_not_cycles() -> Result<()> {
    with_jail(|j| {
        write_documents(
            j,
            &[
                ("common.yaml", "timeout: 5\n"),
                ("left.yaml", "$ref: ./common.yaml\nside: left\n"),
                ("right.yaml", "$ref: ./common.yaml\nside: right\n"),
                ("main.yaml", "l:\n  $ref: ./left.yaml\nr:\n  $ref: ./right.yaml\n"),
            ],
        )?;
        let config = to_anyhow(ResolvedConfig::from_file("main.yaml"))?;
        ensure!(
            config["l"]["timeout"] == 5 && config["r"]["side"] == "right",
            "unexpected {config:?}"
        );
        Ok(())
    })
}

#[test]
fn disabled_detection_hits_the_depth_limit() -> Result<()> {
    with_jail(|j| {
        write_documents(j, &[("loop.yaml", "$ref: ./loop.yaml\n")])?;
        let err = ResolvedConfig::builder()
            .detect_cycles(false)
            .max_depth(16)
            .from_file("loop.yaml")
            .err()
            .ok_or_else(|| anyhow!("expected depth failure"))?;
        ensure!(
            matches!(err.as_ref(), RefConfigError::DepthExceeded { limit: 16, .. }),
            "unexpected error {err}"
        );
        Ok(())
    })
}
