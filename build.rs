use grep::regex::RegexMatcher;
use grep::searcher::{Searcher, Sink, SinkMatch};
use std::error::Error;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use walkdir::WalkDir;

// The crate's own source directories. Nothing outside these is scanned.
const SOURCE_DIRS: [&str; 6] = ["engine", "report", "batch", "cli", "tests", "benches"];

/// Lines in one source file that silence the dead-code lint.
#[derive(Default)]
struct AllowDeadCodeHits {
    lines: Vec<(u64, String)>,
}

impl AllowDeadCodeHits {
    fn into_report(self, path: &Path) -> Option<String> {
        if self.lines.is_empty() {
            return None;
        }
        let listing: String = self
            .lines
            .iter()
            .map(|(number, text)| format!("   {number}:{text}\n"))
            .collect();
        Some(format!(
            "\n❌ ERROR: {} has {} dead-code allowance(s):\n{listing}\n\
             Unused items must be deleted, not silenced.\n",
            path.display(),
            self.lines.len()
        ))
    }
}

impl Sink for AllowDeadCodeHits {
    type Error = std::io::Error;

    fn matched(&mut self, _: &Searcher, mat: &SinkMatch) -> Result<bool, Self::Error> {
        let text = String::from_utf8_lossy(mat.bytes()).trim_end().to_string();
        self.lines.push((mat.line_number().unwrap_or(0), text));
        Ok(true)
    }
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    for dir in SOURCE_DIRS {
        println!("cargo:rerun-if-changed={dir}");
    }

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    println!("cargo:rustc-env=HBS_BUILD_TIMESTAMP={timestamp}");

    if let Err(e) = scan_for_allow_dead_code() {
        // `eprintln!` is what makes the message visible in cargo's output.
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn scan_for_allow_dead_code() -> Result<(), Box<dyn Error>> {
    let pattern = r"#\s*\[\s*allow\s*\(\s*dead_code\s*\)\s*\]";
    let matcher = RegexMatcher::new_line_matcher(pattern)?;
    let mut searcher = Searcher::new();

    for dir in SOURCE_DIRS {
        for entry in WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "rs"))
        {
            let path = entry.path();
            let mut hits = AllowDeadCodeHits::default();
            searcher.search_path(&matcher, path, &mut hits)?;

            if let Some(report) = hits.into_report(path) {
                return Err(report.into());
            }
        }
    }

    Ok(())
}
