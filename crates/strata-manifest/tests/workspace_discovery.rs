//! Integration tests for discovering and reading a workspace on disk.

use rstest::rstest;
use std::path::Path;
use strata_manifest::{FsSource, ManifestSource, MemberPatterns};
use tempfile::TempDir;

fn write_manifest(root: &Path, rel_dir: &str, json: &str) {
    let dir = root.join(rel_dir);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("package.json"), json).unwrap();
}

fn sample_workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_manifest(
        dir.path(),
        ".",
        r#"{ "name": "root", "private": true, "workspaces": ["packages/*", "apps/**", "!packages/legacy"] }"#,
    );
    write_manifest(dir.path(), "packages/core", r#"{ "name": "@acme/core", "version": "1.0.0" }"#);
    write_manifest(
        dir.path(),
        "packages/ui",
        r#"{ "name": "@acme/ui", "dependencies": { "@acme/core": "^1.0.0", "react": "^18" } }"#,
    );
    write_manifest(dir.path(), "packages/legacy", r#"{ "name": "@acme/legacy" }"#);
    write_manifest(
        dir.path(),
        "apps/web/admin",
        r#"{ "name": "admin", "private": true, "devDependencies": { "@acme/ui": "*" } }"#,
    );
    write_manifest(dir.path(), "tools/scripts", r#"{ "name": "scripts" }"#);
    dir
}

#[tokio::test]
async fn root_patterns_select_members() {
    let dir = sample_workspace();
    let source = FsSource::new();
    let base = source.canonicalize(dir.path()).await.unwrap();

    let root = source.read(&base.join("package.json")).await.unwrap();
    let patterns = MemberPatterns::parse(root.member_patterns());
    let found = source.discover(&base, &patterns).await.unwrap();

    let relative: Vec<String> = found
        .iter()
        .map(|p| {
            p.strip_prefix(&base)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    assert_eq!(
        relative,
        vec![
            "apps/web/admin/package.json",
            "packages/core/package.json",
            "packages/ui/package.json",
        ]
    );
}

#[rstest]
#[case::core("packages/core", "@acme/core", 0)]
#[case::ui("packages/ui", "@acme/ui", 2)]
#[case::admin("apps/web/admin", "admin", 1)]
#[tokio::test]
async fn member_records_expose_dependency_names(
    #[case] rel_dir: &str,
    #[case] name: &str,
    #[case] dependency_count: usize,
) {
    let dir = sample_workspace();
    let source = FsSource::new();

    let record = source
        .read(&dir.path().join(rel_dir).join("package.json"))
        .await
        .unwrap();
    assert_eq!(record.name.as_deref(), Some(name));
    assert_eq!(record.dependency_names().len(), dependency_count);
}

#[tokio::test]
async fn invalid_member_pattern_is_fatal() {
    let dir = sample_workspace();
    let source = FsSource::new();

    let result = source
        .discover(dir.path(), &MemberPatterns::parse(&["packages/[oops"]))
        .await;
    assert!(result.is_err());
}
