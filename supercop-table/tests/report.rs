use std::fs;
use std::path::Path;

use supercop_table::config::{Host, Implementation, Section};
use supercop_table::{Config, Error, build_matrix, generate_report};
use tempfile::TempDir;

const DONNA: &str = "crypto_scalarmult/curve25519/donna_c64";
const REF10: &str = "crypto_scalarmult/curve25519/ref10";

fn config() -> Config {
    let mut config = Config::builtin();
    config.hosts = vec![
        Host::new("kivsa", "Intel Skylake"),
        Host::new("nakhash", "AMD Zen"),
    ];
    config.sections = vec![Section::new("Curve25519", "25519", [DONNA, REF10])];
    config.implementations = [
        (DONNA, Implementation::new("donna-c64", Some("c"))),
        (REF10, Implementation::new("ref10", Some("c"))),
    ]
    .into_iter()
    .map(|(id, implementation)| (id.to_owned(), implementation))
    .collect();
    config
}

fn line(host: &str, implementation: &str, cycles: u64, compiler: &str) -> String {
    format!(
        "20190110 {host} amd64 20190116 crypto_scalarmult/curve25519 try 6d3f0a ok \
         {cycles} {cycles} 3000000000 {implementation} {compiler}_-O3_-fomit-frame-pointer\n"
    )
}

fn write_host(root: &Path, host: &str, lines: &[String]) {
    let dir = root.join(host);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("data"), lines.concat()).unwrap();
}

/// kivsa: 5000 and 5200 for donna, nakhash: 2000
fn scenario() -> TempDir {
    let root = TempDir::new().unwrap();
    write_host(
        root.path(),
        "kivsa",
        &[
            "compiling crypto_scalarmult/curve25519/donna_c64\n".to_owned(),
            line("kivsa", DONNA, 5200, "gcc"),
            line("kivsa", DONNA, 5000, "clang"),
            "20190110 kivsa amd64 20190116 crypto_scalarmult/curve25519 objsize 3312 0 0 ok 1 1 1 crypto_scalarmult/curve25519/donna_c64 gcc_-O3\n".to_owned(),
        ],
    );
    write_host(root.path(), "nakhash", &[line("nakhash", DONNA, 2000, "gcc")]);
    root
}

#[test]
fn best_cycles_and_geometric_mean() {
    let root = scenario();
    let config = config();

    let matrix = build_matrix(root.path(), &config).unwrap();
    assert_eq!(matrix.get(DONNA, "kivsa"), Some(5000));
    assert_eq!(matrix.get(DONNA, "nakhash"), Some(2000));
    assert_eq!(matrix.len(), 1);

    let report = generate_report(root.path(), &config).unwrap();
    let row = report
        .lines()
        .find(|line| line.contains("donna-c64"))
        .unwrap();
    assert!(row.contains("\\textbf{5.0k} (1.00x)"), "{row}");
    assert!(row.contains("\\textbf{2.0k} (1.00x)"), "{row}");
    // sqrt(5000 * 2000) = 3162.28
    assert!(row.contains("\\textbf{3.2k} (1.00x)"), "{row}");
    assert!(row.contains(" & C "), "{row}");
}

#[test]
fn implementations_without_measurements_are_omitted() {
    let root = scenario();
    let report = generate_report(root.path(), &config()).unwrap();
    assert!(!report.contains("ref10"));
    assert!(report.contains("\\multirow{1}{*}"));
}

#[test]
fn output_is_idempotent() {
    let root = scenario();
    let config = config();
    let first = generate_report(root.path(), &config).unwrap();
    let second = generate_report(root.path(), &config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn unlisted_hosts_are_ignored() {
    let root = scenario();
    write_host(root.path(), "stranger", &[line("stranger", DONNA, 10, "gcc")]);

    let matrix = build_matrix(root.path(), &config()).unwrap();
    assert_eq!(matrix.get(DONNA, "kivsa"), Some(5000));
    assert_eq!(matrix.get(DONNA, "stranger"), None);
}

#[test]
fn missing_host_coverage_is_fatal() {
    let root = TempDir::new().unwrap();
    write_host(root.path(), "kivsa", &[line("kivsa", DONNA, 5000, "gcc")]);

    match generate_report(root.path(), &config()) {
        Err(Error::IncompleteData {
            implementation,
            host,
        }) => {
            assert_eq!(implementation, DONNA);
            assert_eq!(host, "nakhash");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn section_without_metadata_is_fatal() {
    let root = scenario();
    let mut config = config();
    config.sections[0]
        .implementations
        .push("crypto_scalarmult/curve25519/mystery".to_owned());

    assert!(matches!(
        generate_report(root.path(), &config),
        Err(Error::UnknownImplementation(_))
    ));
}

#[test]
fn builtin_configuration_renders() {
    let root = TempDir::new().unwrap();
    let sandy2x = "crypto_scalarmult/curve25519/sandy2x";
    write_host(
        root.path(),
        "kivsa",
        &[line("kivsa", sandy2x, 156052, "gcc"), line("kivsa", DONNA, 180000, "gcc")],
    );
    write_host(
        root.path(),
        "nakhash",
        &[line("nakhash", sandy2x, 120116, "gcc"), line("nakhash", DONNA, 150000, "clang")],
    );

    let report = generate_report(root.path(), &Config::builtin()).unwrap();
    assert!(report.contains("\\label{tab:supercop}"));
    assert!(report.contains("\\rotatebox[origin=c]{90}{Curve25519}"));
    assert!(!report.contains("P-256}"));
    let sandy = report
        .lines()
        .find(|line| line.contains("sandy2x"))
        .unwrap();
    assert!(sandy.contains("asm (AVX)"), "{sandy}");
    assert!(sandy.contains("\\textbf{156.1k} (1.00x)"), "{sandy}");
}

#[test]
fn unlisted_implementations_stay_in_the_matrix_only() {
    let root = scenario();
    let sandy = "crypto_scalarmult/curve25519/sandy2x";
    write_host(
        root.path(),
        "nakhash",
        &[
            line("nakhash", DONNA, 2000, "gcc"),
            line("nakhash", sandy, 1500, "clang"),
        ],
    );
    let config = config();

    let matrix = build_matrix(root.path(), &config).unwrap();
    assert_eq!(
        matrix.implementations().collect::<Vec<_>>(),
        [DONNA, sandy]
    );
    let best = matrix
        .row(DONNA)
        .and_then(|row| row.best("kivsa"))
        .unwrap();
    assert_eq!((best.cycles, best.compiler.as_str()), (5000, "clang"));

    let report = generate_report(root.path(), &config).unwrap();
    assert!(!report.contains("sandy2x"));
}

#[test]
fn empty_root_gives_empty_matrix() {
    let root = TempDir::new().unwrap();
    let matrix = build_matrix(&root.path().join("missing"), &config()).unwrap();
    assert!(matrix.is_empty());
}
