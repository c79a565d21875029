use std::fs;
use std::path::Path;

use test_support::load_cases;

/// Fixture programs flagged with `bench: true`, as `(label, source)`.
pub fn workloads() -> Vec<(String, String)> {
    let cases = load_cases(Path::new("tests/programs")).expect("load fixture cases");
    cases
        .into_iter()
        .filter(|case| case.spec.bench)
        .map(|case| {
            let source = fs::read_to_string(&case.program_path)
                .unwrap_or_else(|err| panic!("read {}: {err}", case.program_path.display()));
            (case.name, source)
        })
        .collect()
}

/// Repeats `source` so timings are not dominated by setup.
pub fn scaled(source: &str, copies: usize) -> String {
    let mut out = String::with_capacity(source.len() * copies + copies);
    for _ in 0..copies {
        out.push_str(source);
        if !source.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}
