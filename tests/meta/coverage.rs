//! Checks that every source file has a mirrored unit test file and vice versa

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;
    use std::io;
    use std::path::Path;

    const SRC_DIR: &str = "src";
    const UNIT_DIR: &str = "tests/unit";

    // Harness roots and module declarations carry no logic of their own
    fn is_structural(relative: &str) -> bool {
        relative == "lib.rs" || relative.ends_with("main.rs") || relative.ends_with("mod.rs")
    }

    fn relative_rust_paths(dir: &Path, base: &Path) -> io::Result<BTreeSet<String>> {
        let mut paths = BTreeSet::new();
        if !dir.is_dir() {
            return Ok(paths);
        }

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let relative = path
                .strip_prefix(base)
                .map_err(|_stripped| io::Error::other("path outside base directory"))?
                .to_string_lossy()
                .replace('\\', "/");

            if path.is_dir() {
                paths.extend(relative_rust_paths(&path, base)?);
                paths.insert(relative);
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                paths.insert(relative);
            }
        }
        Ok(paths)
    }

    fn unmatched(from: &str, against: &str) -> Vec<String> {
        let from_paths = relative_rust_paths(Path::new(from), Path::new(from)).unwrap_or_default();
        let against_paths =
            relative_rust_paths(Path::new(against), Path::new(against)).unwrap_or_default();

        from_paths
            .into_iter()
            .filter(|p| !is_structural(p) && !against_paths.contains(p))
            .collect()
    }

    // Ensures each source module has a unit test file at the same relative path
    // Verified by adding a source file without tests
    #[test]
    fn test_every_source_file_has_unit_tests() {
        assert!(Path::new(SRC_DIR).is_dir(), "src directory not found");

        let missing = unmatched(SRC_DIR, UNIT_DIR);
        assert!(
            missing.is_empty(),
            "Source files without unit tests:\n{}",
            missing
                .iter()
                .map(|p| format!("  - src/{p} -> {UNIT_DIR}/{p}"))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    // Ensures no unit test file outlives its source module
    // Verified by adding an orphaned test file
    #[test]
    fn test_every_unit_test_has_source() {
        let orphaned = unmatched(UNIT_DIR, SRC_DIR);
        assert!(
            orphaned.is_empty(),
            "Unit test files without source:\n{}",
            orphaned
                .iter()
                .map(|p| format!("  - {UNIT_DIR}/{p}"))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    // Ensures every non-structural test file declares at least one test
    // Verified by removing the only test from a file
    #[test]
    fn test_all_test_files_contain_tests() {
        let tests_dir = Path::new("tests");
        let files = relative_rust_paths(tests_dir, tests_dir).unwrap_or_default();

        let empty: Vec<&String> = files
            .iter()
            .filter(|p| p.ends_with(".rs") && !is_structural(p))
            .filter(|p| {
                fs::read_to_string(tests_dir.join(p))
                    .map(|content| !content.contains("#[test]"))
                    .unwrap_or(true)
            })
            .collect();

        assert!(
            empty.is_empty(),
            "Test files without #[test] functions:\n{}",
            empty
                .iter()
                .map(|p| format!("  - tests/{p}"))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }
}
