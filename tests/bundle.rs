use assignmentctl::bundler::{self, Backend, BundleOutcome, Bundler, BundlerOptions};
use assignmentctl::config::{self, Configuration};
use assignmentctl::{AppContext, Error};
use flate2::read::GzDecoder;
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use tempfile::TempDir;

/// Workspace with one exported PDF and some source files next to it.
fn workspace() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(config::CONFIG_FILE), "").unwrap();

    let dist = dir.path().join("dist");
    fs::create_dir(&dist).unwrap();
    fs::write(dist.join("assignment-01.pdf"), "%PDF-1.5 first").unwrap();

    let code = dir.path().join("assignment-01/code");
    fs::create_dir_all(code.join("nested")).unwrap();
    fs::write(code.join("main.go"), "package main").unwrap();
    fs::write(code.join("util.go"), "package main").unwrap();
    fs::write(code.join("notes.txt"), "ignored").unwrap();
    fs::write(code.join("nested/deep.go"), "package nested").unwrap();
    dir
}

fn options(target: &str, backend: Backend) -> BundlerOptions {
    BundlerOptions {
        backend,
        target: target.to_string(),
        includes: vec!["code/*.go".to_string()],
        ..BundlerOptions::default()
    }
}

fn context(root: &Path) -> AppContext {
    AppContext::new(root, Configuration::default())
}

fn tar_entries<R: Read>(reader: R) -> BTreeSet<String> {
    let mut archive = tar::Archive::new(reader);
    archive
        .entries()
        .unwrap()
        .map(|entry| entry.unwrap().path().unwrap().to_string_lossy().into_owned())
        .collect()
}

fn expected_entries() -> BTreeSet<String> {
    ["assignment-01.pdf", "code/main.go", "code/util.go"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[test]
fn zip_contains_pdf_and_includes() {
    let dir = workspace();
    let ctx = context(dir.path());

    let bundler = Bundler::new(&ctx, &options("assignment-01.pdf", Backend::Zip)).unwrap();
    assert_eq!(bundler.archive_name(), "assignment-01.zip");
    let bundled = bundler.bundle().unwrap();
    assert_eq!(bundled.assets.len(), 3);

    let mut archive = zip::ZipArchive::new(File::open(&bundled.path).unwrap()).unwrap();
    let names: BTreeSet<String> = archive.file_names().map(String::from).collect();
    assert_eq!(names, expected_entries());

    let mut pdf = String::new();
    archive
        .by_name("assignment-01.pdf")
        .unwrap()
        .read_to_string(&mut pdf)
        .unwrap();
    assert_eq!(pdf, "%PDF-1.5 first");
}

#[test]
fn tar_and_tar_gz_contain_the_same_entries() {
    let dir = workspace();
    let ctx = context(dir.path());

    let tar = Bundler::new(&ctx, &options("assignment-01.pdf", Backend::Tar))
        .unwrap()
        .bundle()
        .unwrap();
    assert_eq!(tar.path, dir.path().join("dist/assignment-01.tar"));
    assert_eq!(tar_entries(File::open(&tar.path).unwrap()), expected_entries());

    let gz = Bundler::new(&ctx, &options("assignment-01.pdf", Backend::TarGz))
        .unwrap()
        .bundle()
        .unwrap();
    assert_eq!(gz.path, dir.path().join("dist/assignment-01.tar.gz"));
    assert_eq!(
        tar_entries(GzDecoder::new(File::open(&gz.path).unwrap())),
        expected_entries()
    );
}

#[test]
fn template_data_shapes_the_archive_name() {
    let dir = workspace();
    let mut configuration = Configuration::default();
    configuration.bundle.template =
        Some(r#"{{_id}}-{{#each members}}{{last (split this " ")}}{{#unless @last}}-{{/unless}}{{/each}}.{{format}}"#.into());
    configuration.bundle.data.insert(
        "members".into(),
        serde_json::json!(["Ada Lovelace", "Alan Turing"]),
    );
    let ctx = AppContext::new(dir.path(), configuration.clone());

    let options = BundlerOptions {
        template: configuration.bundle.template.clone(),
        data: configuration.bundle.data.clone(),
        ..options("assignment-01.pdf", Backend::Zip)
    };
    let bundler = Bundler::new(&ctx, &options).unwrap();
    assert_eq!(bundler.archive_name(), "01-Lovelace-Turing.zip");
}

#[test]
fn existing_archive_is_skipped_without_force() {
    let dir = workspace();
    fs::write(dir.path().join("dist/assignment-02.pdf"), "%PDF-1.5 second").unwrap();
    fs::write(dir.path().join("dist/assignment-01.zip"), "old").unwrap();
    let ctx = context(dir.path());

    let err = Bundler::new(&ctx, &options("assignment-01.pdf", Backend::Zip)).unwrap_err();
    assert!(matches!(err, Error::ArchiveExists { .. }));

    let targets = bundler::discover_artifacts(&dir.path().join("dist")).unwrap();
    assert_eq!(targets, vec!["assignment-01.pdf", "assignment-02.pdf"]);

    let outcomes = bundler::bundle_all(&ctx, &options("", Backend::Zip), &targets).unwrap();
    assert_eq!(outcomes.len(), 2);
    assert!(matches!(&outcomes[0], BundleOutcome::Skipped(path) if path.ends_with("assignment-01.zip")));
    assert!(matches!(&outcomes[1], BundleOutcome::Bundled(archive) if archive.path.ends_with("assignment-02.zip")));
    assert_eq!(
        fs::read_to_string(dir.path().join("dist/assignment-01.zip")).unwrap(),
        "old"
    );

    let forced = BundlerOptions {
        force: true,
        ..options("", Backend::Zip)
    };
    let outcomes = bundler::bundle_all(&ctx, &forced, &targets[..1]).unwrap();
    assert!(matches!(&outcomes[0], BundleOutcome::Bundled(_)));
    assert_ne!(
        fs::read(dir.path().join("dist/assignment-01.zip")).unwrap(),
        b"old"
    );
}

#[test]
fn missing_pdf_fails_and_leaves_no_archive() {
    let dir = workspace();
    let ctx = context(dir.path());

    let err = bundler::bundle_all(&ctx, &options("", Backend::Tar), &["assignment-09.pdf".into()])
        .unwrap_err();
    assert!(matches!(err, Error::Target { .. }));
    assert!(!dir.path().join("dist/assignment-09.tar").exists());
}

#[test]
fn includes_above_the_source_directory_stay_inside_the_zip() {
    let dir = workspace();
    fs::create_dir(dir.path().join("shared")).unwrap();
    fs::write(dir.path().join("shared/macros.sty"), "\\newcommand").unwrap();
    let ctx = context(dir.path());

    let options = BundlerOptions {
        includes: vec!["../shared/*.sty".to_string(), "code/*.go".to_string()],
        ..options("assignment-01.pdf", Backend::Zip)
    };
    let bundled = Bundler::new(&ctx, &options).unwrap().bundle().unwrap();

    let archive = zip::ZipArchive::new(File::open(&bundled.path).unwrap()).unwrap();
    let names: BTreeSet<String> = archive.file_names().map(String::from).collect();
    let mut expected = expected_entries();
    expected.insert("macros.sty".to_string());
    assert_eq!(names, expected);
    assert!(names.iter().all(|name| !name.contains("..")));
}

#[test]
fn unreadable_include_aborts_the_pass_and_discards_the_archive() {
    for backend in [Backend::Zip, Backend::Tar, Backend::TarGz] {
        let dir = workspace();
        let ctx = context(dir.path());

        let bundler = Bundler::new(&ctx, &options("assignment-01.pdf", backend)).unwrap();
        assert_eq!(bundler.files().len(), 2);
        // resolved, then gone before it is streamed
        fs::remove_file(dir.path().join("assignment-01/code/util.go")).unwrap();

        let err = bundler.bundle().unwrap_err();
        assert!(
            matches!(&err, Error::Fs { path, .. } if path.ends_with("code/util.go")),
            "{backend}: {err:?}"
        );
        assert!(!bundler.archive_path().exists(), "{backend}");
    }
}
