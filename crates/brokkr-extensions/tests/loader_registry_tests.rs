//! Loader and registry integration tests
//!
//! Builds real pack archives, loads them through the extension loader, and
//! checks registry construction: profile visibility, first-registration
//! dedup across packs and against built-ins, bundled-pack overlay, and
//! end-to-end execution of a pack command.

mod common;

use brokkr_core::command::{Command, CommandContext, CommandRegistration};
use brokkr_core::schema::{OptionsSchema, ParsedOptions};
use brokkr_extensions::{
    build_registry, BundledPacks, CommandSource, ExtensionLoader, ProfileFilter,
};
use camino::Utf8PathBuf;
use common::{manifest_yaml, write_pack};

struct NoopCommand;

impl Command for NoopCommand {
    fn execute(&self, _ctx: &CommandContext) -> anyhow::Result<()> {
        Ok(())
    }
}

fn utf8(path: &std::path::Path) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(path.to_path_buf()).unwrap()
}

fn loader_over(dir: &std::path::Path) -> ExtensionLoader {
    ExtensionLoader::new(utf8(dir)).with_bundled(None)
}

#[test]
fn pack_commands_register_with_their_archive_as_source() {
    let ext_dir = tempfile::TempDir::new().unwrap();
    write_pack(
        ext_dir.path(),
        "hello-pack.tar.gz",
        &manifest_yaml("hello-pack", "greet", "Say hello", &[], "bin/greet.sh"),
        &[("bin/greet.sh", "#!/bin/sh\nexit 0\n")],
    );

    let mut loader = loader_over(ext_dir.path());
    let context = loader.acquire().unwrap();
    let registry = build_registry(Vec::new(), context, &ProfileFilter::Active(String::new()));

    let descriptor = registry.get("greet").expect("pack command registered");
    assert_eq!(
        descriptor.source,
        CommandSource::Extension("hello-pack.tar.gz".to_string())
    );
    // Pack schemas are merged with the base flags like built-in schemas
    assert!(descriptor.schema.find_flag("profile").is_some());
}

#[test]
fn colliding_commands_keep_the_lexicographically_first_archive() {
    let ext_dir = tempfile::TempDir::new().unwrap();
    write_pack(
        ext_dir.path(),
        "b-pack.tar.gz",
        &manifest_yaml("b-pack", "extra", "from b", &[], "run.sh"),
        &[("run.sh", "#!/bin/sh\nexit 0\n")],
    );
    write_pack(
        ext_dir.path(),
        "a-pack.tar.gz",
        &manifest_yaml("a-pack", "extra", "from a", &[], "run.sh"),
        &[("run.sh", "#!/bin/sh\nexit 0\n")],
    );

    let mut loader = loader_over(ext_dir.path());
    let context = loader.acquire().unwrap();
    let registry = build_registry(Vec::new(), context, &ProfileFilter::Any);

    let extras: Vec<_> = registry
        .descriptors()
        .iter()
        .filter(|d| d.name == "extra")
        .collect();
    assert_eq!(extras.len(), 1);
    assert_eq!(extras[0].schema.description, "from a");
}

#[test]
fn builtin_wins_over_pack_command_with_the_same_name() {
    let ext_dir = tempfile::TempDir::new().unwrap();
    write_pack(
        ext_dir.path(),
        "shadow-pack.tar.gz",
        &manifest_yaml("shadow-pack", "extra", "from pack", &[], "run.sh"),
        &[("run.sh", "#!/bin/sh\nexit 0\n")],
    );

    let host = vec![CommandRegistration::new(
        OptionsSchema::new("extra", "built in"),
        Box::new(NoopCommand),
    )];

    let mut loader = loader_over(ext_dir.path());
    let context = loader.acquire().unwrap();
    let registry = build_registry(host, context, &ProfileFilter::Any);

    assert_eq!(registry.get("extra").unwrap().source, CommandSource::Builtin);
}

#[test]
fn tagged_pack_command_is_visible_only_under_its_profile() {
    let ext_dir = tempfile::TempDir::new().unwrap();
    write_pack(
        ext_dir.path(),
        "maven-pack.tar.gz",
        &manifest_yaml("maven-pack", "server start", "Maven start", &["maven"], "run.sh"),
        &[("run.sh", "#!/bin/sh\nexit 0\n")],
    );

    let mut loader = loader_over(ext_dir.path());
    let context = loader.acquire().unwrap();

    for (profile, expected) in [
        (ProfileFilter::Active("gradle".to_string()), false),
        (ProfileFilter::Active(String::new()), false),
        (ProfileFilter::Active("maven".to_string()), true),
    ] {
        let registry = build_registry(Vec::new(), context, &profile);
        assert_eq!(registry.get("server start").is_some(), expected, "{:?}", profile);
    }
}

#[test]
fn bundled_pack_overwrites_stale_user_copy() {
    let ext_dir = tempfile::TempDir::new().unwrap();
    let bundled_dir = tempfile::TempDir::new().unwrap();

    write_pack(
        ext_dir.path(),
        "tools-1.0.0.tar.gz",
        &manifest_yaml("tools", "lint", "stale copy", &[], "run.sh"),
        &[("run.sh", "#!/bin/sh\nexit 0\n")],
    );
    write_pack(
        bundled_dir.path(),
        "tools-1.0.0.tar.gz",
        &manifest_yaml("tools", "lint", "bundled copy", &[], "run.sh"),
        &[("run.sh", "#!/bin/sh\nexit 0\n")],
    );
    std::fs::write(
        bundled_dir.path().join("extensions.toml"),
        "[extensions]\ntools = \"1.0.0\"\n",
    )
    .unwrap();

    let bundled = BundledPacks::new(
        utf8(bundled_dir.path()).join("extensions.toml"),
        utf8(bundled_dir.path()),
    );
    let mut loader = ExtensionLoader::new(utf8(ext_dir.path())).with_bundled(Some(bundled));

    let context = loader.acquire().unwrap();
    let registry = build_registry(Vec::new(), context, &ProfileFilter::Any);

    assert_eq!(registry.get("lint").unwrap().schema.description, "bundled copy");
}

#[test]
fn malformed_pack_is_skipped_while_others_load() {
    let ext_dir = tempfile::TempDir::new().unwrap();
    write_pack(
        ext_dir.path(),
        "broken-pack.tar.gz",
        "metadata: [this is not a manifest",
        &[],
    );
    write_pack(
        ext_dir.path(),
        "good-pack.tar.gz",
        &manifest_yaml("good-pack", "greet", "Say hello", &[], "run.sh"),
        &[("run.sh", "#!/bin/sh\nexit 0\n")],
    );

    let mut loader = loader_over(ext_dir.path());
    let context = loader.acquire().unwrap();

    assert_eq!(context.extensions().len(), 1);
    assert_eq!(context.extensions()[0].manifest.metadata.name, "good-pack");
}

#[test]
fn registry_is_a_snapshot_of_load_time_packs() {
    let ext_dir = tempfile::TempDir::new().unwrap();

    let mut loader = loader_over(ext_dir.path());
    let context = loader.acquire().unwrap();
    let registry = build_registry(Vec::new(), context, &ProfileFilter::Any);
    assert!(registry.is_empty());

    // A pack installed after the context was materialized is invisible to
    // both the context and registries built from it
    write_pack(
        ext_dir.path(),
        "late-pack.tar.gz",
        &manifest_yaml("late-pack", "late", "too late", &[], "run.sh"),
        &[("run.sh", "#!/bin/sh\nexit 0\n")],
    );

    let context = loader.acquire().unwrap();
    assert!(context.extensions().is_empty());
}

#[cfg(unix)]
#[test]
fn pack_command_executes_in_the_invocation_context() {
    let ext_dir = tempfile::TempDir::new().unwrap();
    let workspace = tempfile::TempDir::new().unwrap();

    write_pack(
        ext_dir.path(),
        "mark-pack.tar.gz",
        &manifest_yaml("mark-pack", "mark", "Touch a marker", &[], "bin/mark.sh"),
        &[(
            "bin/mark.sh",
            "#!/bin/sh\necho \"$BROKKR_PROFILE\" > \"$BROKKR_BASE/marker.txt\"\n",
        )],
    );

    let mut loader = loader_over(ext_dir.path());
    let context = loader.acquire().unwrap();
    let registry = build_registry(Vec::new(), context, &ProfileFilter::Any);

    let ctx = CommandContext {
        base_dir: utf8(workspace.path()),
        profile: "gradle".to_string(),
        options: ParsedOptions::default(),
    };
    registry.get("mark").unwrap().command().execute(&ctx).unwrap();

    let marker = std::fs::read_to_string(workspace.path().join("marker.txt")).unwrap();
    assert_eq!(marker.trim(), "gradle");
}
