use std::{
    collections::HashMap,
    fs,
    path::PathBuf,
};

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use textpack::{Config, RunSummary, bundle_writer::bundle_file_name, collect_files, run};

struct Fixture {
    _temp: TempDir,
    root: PathBuf,
    base: String,
}

impl Fixture {
    /// Source tree under `<tmp>/tree`, bundles under `<tmp>/out`
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("tree");
        fs::create_dir_all(&root).unwrap();
        let base = temp.path().join("out").to_string_lossy().into_owned();
        Self {
            _temp: temp,
            root,
            base,
        }
    }

    fn write(&self, relative: &str, content: impl AsRef<[u8]>) {
        let path = self.root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn bundle(&self, index: usize) -> String {
        fs::read_to_string(bundle_file_name(&self.base, index)).unwrap()
    }

    fn run(&self, extensions: Option<&[&str]>, line_limit: usize) -> RunSummary {
        let extensions = extensions.map(|exts| exts.iter().map(|ext| (*ext).to_owned()).collect());
        collect_files(&self.root, self.base.as_str(), extensions, line_limit).unwrap()
    }
}

fn lines(n: usize) -> String {
    (0..n).map(|i| format!("{i}\n")).collect()
}

fn header(relative: &str) -> String {
    format!(
        "--- File: {} ---",
        relative.replace('/', std::path::MAIN_SEPARATOR_STR)
    )
}

/// Relative path of every written file, mapped to the bundle holding it
fn placement(summary: &RunSummary) -> HashMap<String, usize> {
    let mut placed = HashMap::new();
    for bundle in &summary.bundles {
        for file in &bundle.files {
            let key = file.to_string_lossy().replace('\\', "/");
            assert!(placed.insert(key, bundle.index).is_none(), "file placed twice");
        }
    }
    placed
}

#[test]
fn test_two_large_files_split_into_two_bundles() {
    let fixture = Fixture::new();
    fixture.write("a.txt", lines(4000));
    fixture.write("b.txt", lines(4000));

    let summary = fixture.run(None, 7000);

    assert_eq!(summary.bundle_count(), 2);
    assert_eq!(summary.bundles[0].files, vec![PathBuf::from("a.txt")]);
    assert_eq!(summary.bundles[1].files, vec![PathBuf::from("b.txt")]);
    assert_eq!(summary.bundles[0].line_count, 4003);
    assert_eq!(
        fixture.bundle(1),
        format!("\n\n{}\n\n{}\n", header("a.txt"), lines(4000))
    );
    assert_eq!(
        fixture.bundle(2),
        format!("\n\n{}\n\n{}\n", header("b.txt"), lines(4000))
    );
}

#[test]
fn test_empty_directory_creates_one_empty_bundle() {
    let fixture = Fixture::new();
    let summary = fixture.run(None, 7000);
    assert_eq!(summary.bundle_count(), 1);
    assert_eq!(fixture.bundle(1), "");
    assert!(!bundle_file_name(&fixture.base, 2).exists());
}

#[test]
fn test_extension_filter_selects_suffixes() {
    let fixture = Fixture::new();
    fixture.write("x.py", "print('x')\n");
    fixture.write("x.txt", "plain text\n");

    let summary = fixture.run(Some(&[".py"]), 7000);

    let bundle = fixture.bundle(1);
    assert!(bundle.contains("print('x')"));
    assert!(!bundle.contains("plain text"));
    assert_eq!(summary.files_written(), 1);
}

#[test]
fn test_node_modules_is_never_visited() {
    let fixture = Fixture::new();
    fixture.write("index.js", "main\n");
    fixture.write("node_modules/dep/index.js", "DEPENDENCY\n");
    fixture.write("packages/app/node_modules/dep/lib.js", "NESTED DEPENDENCY\n");
    fixture.write("packages/app/app.js", "app\n");

    let summary = fixture.run(None, 7000);

    let bundle = fixture.bundle(1);
    assert!(!bundle.contains("DEPENDENCY"));
    let mut placed: Vec<_> = placement(&summary).into_keys().collect();
    placed.sort();
    assert_eq!(placed, vec!["index.js", "packages/app/app.js"]);
}

#[test]
fn test_every_file_lands_in_exactly_one_contiguous_bundle() {
    let fixture = Fixture::new();
    let sizes = [5, 40, 1, 0, 25, 60, 3, 12, 18, 7];
    for (i, size) in sizes.iter().enumerate() {
        fixture.write(&format!("dir{}/file{i}.txt", i % 3), lines(*size));
    }

    let summary = fixture.run(None, 50);

    let placed = placement(&summary);
    assert_eq!(placed.len(), sizes.len());

    let indices: Vec<_> = summary.bundles.iter().map(|b| b.index).collect();
    assert_eq!(indices, (1..=summary.bundle_count()).collect::<Vec<_>>());

    for bundle in &summary.bundles {
        let text = fixture.bundle(bundle.index);
        for file in &bundle.files {
            let (i, size) = file
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| stem.strip_prefix("file"))
                .and_then(|i| i.parse::<usize>().ok())
                .map(|i| (i, sizes[i]))
                .unwrap();
            let relative = format!("dir{}/file{i}.txt", i % 3);
            let block = format!("\n\n{}\n\n{}\n", header(&relative), lines(size));
            assert!(
                text.contains(&block),
                "block for {} is not contiguous",
                file.display()
            );
        }
        if bundle.files.len() > 1 {
            assert!(bundle.line_count <= 50);
        }
    }
}

#[test]
fn test_oversized_file_gets_its_own_bundle() {
    let fixture = Fixture::new();
    fixture.write("a_small.txt", lines(2));
    fixture.write("b_huge.txt", lines(500));
    fixture.write("c_small.txt", lines(2));

    let summary = fixture.run(None, 100);

    assert_eq!(summary.bundle_count(), 3);
    assert_eq!(summary.bundles[1].files, vec![PathBuf::from("b_huge.txt")]);
    assert_eq!(summary.bundles[1].line_count, 503);
}

#[test]
fn test_undecodable_file_becomes_error_line() {
    let fixture = Fixture::new();
    fixture.write("blob.bin", [0xff, 0xfe, 0x00, 0x81]);
    fixture.write("ok.txt", "fine\n");

    let summary = fixture.run(None, 7000);

    assert_eq!(summary.bundle_count(), 1);
    assert_eq!(summary.files_failed(), 1);
    let bundle = fixture.bundle(1);
    let error_lines: Vec<_> = bundle
        .lines()
        .filter(|line| line.starts_with("Error reading file"))
        .collect();
    assert_eq!(error_lines.len(), 1);
    assert!(error_lines[0].starts_with("Error reading file blob.bin: "));
    assert!(bundle.contains("fine"));
}

#[cfg(unix)]
#[test]
fn test_permission_denied_file_becomes_error_line() {
    use std::os::unix::fs::PermissionsExt;

    let fixture = Fixture::new();
    fixture.write("secret.txt", "hidden\n");
    let secret = fixture.root.join("secret.txt");
    fs::set_permissions(&secret, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::read(&secret).is_ok() {
        // Privileged users bypass file modes
        return;
    }

    let summary = fixture.run(None, 7000);

    assert_eq!(summary.bundle_count(), 1);
    let bundle = fixture.bundle(1);
    assert_eq!(bundle.lines().count(), 1);
    assert!(bundle.starts_with("Error reading file secret.txt: "));
}

#[cfg(unix)]
#[test]
fn test_dangling_symlink_becomes_error_line() {
    let fixture = Fixture::new();
    std::os::unix::fs::symlink("/nonexistent/target", fixture.root.join("dangling")).unwrap();
    fixture.write("ok.txt", "x\n");

    let summary = fixture.run(None, 7000);

    assert_eq!(summary.files_failed(), 1);
    assert_eq!(summary.bundles[0].failed, vec![PathBuf::from("dangling")]);
    let bundle = fixture.bundle(1);
    assert!(bundle.starts_with("Error reading file dangling: "));
    assert!(bundle.ends_with("\n\n--- File: ok.txt ---\n\nx\n\n"));
}

#[test]
fn test_rerun_overwrites_existing_bundles() {
    let fixture = Fixture::new();
    fs::write(bundle_file_name(&fixture.base, 1), "stale").unwrap();
    fixture.write("a.txt", "fresh\n");

    fixture.run(None, 7000);

    assert!(!fixture.bundle(1).contains("stale"));
    assert!(fixture.bundle(1).contains("fresh"));
}

#[test]
fn test_output_inside_tree_does_not_read_itself() {
    let fixture = Fixture::new();
    fixture.write("a.txt", "alpha\n");
    fixture.write("b.txt", "beta\n");
    let base = fixture.root.join("collected_files").to_string_lossy().into_owned();

    let summary = run(&Config {
        directory: fixture.root.clone(),
        output: base.clone(),
        ..Config::default()
    })
    .unwrap();

    assert_eq!(summary.files_written(), 2);
    let bundle = fs::read_to_string(bundle_file_name(&base, 1)).unwrap();
    assert!(!bundle.contains("collected_files_1.txt"));
}

#[test]
fn test_configured_exclusions_prune_directories() {
    let fixture = Fixture::new();
    fixture.write("src/main.rs", "fn main() {}\n");
    fixture.write("target/debug/build.log", "BUILD LOG\n");

    let summary = run(&Config {
        directory: fixture.root.clone(),
        output: fixture.base.clone(),
        exclude: vec!["target".to_owned()],
        ..Config::default()
    })
    .unwrap();

    assert_eq!(summary.files_written(), 1);
    assert!(!fixture.bundle(1).contains("BUILD LOG"));
}
