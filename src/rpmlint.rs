//! rpmlint session script and transcript scraping.
//!
//! The linter runs inside `mock --shell`, whose prompt echoes interleave
//! with rpmlint's own output. The `rpmlint:` / `rpmlint-done:` sentinel lines
//! delimit the payload; lines starting with `<mock-` lose their prompt prefix.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

pub const START_SENTINEL: &str = "rpmlint:";
pub const DONE_SENTINEL: &str = "rpmlint-done:";
const PROMPT_PREFIX: &str = "<mock-";

const SCRIPT_TEMPLATE: &str = "
mock  @config@ --shell << 'EOF'
echo 'rpmlint:'
rpmlint @rpm_names@
echo 'rpmlint-done:'
EOF
";

/// Fill in the session script for `config_flag` and the package `names`.
pub fn render_script(config_flag: &str, names: &[String]) -> String {
    SCRIPT_TEMPLATE
        .replace("@config@", config_flag)
        .replace("@rpm_names@", &names.join(" "))
}

/// Detects scaffolding failures in a session transcript.
///
/// Returns the extracted error message when the session itself broke, as
/// opposed to rpmlint reporting findings.
pub trait LintErrorCheck: Send + Sync {
    fn check(&self, output: &str) -> Option<String>;
}

/// Default check: mock/rpm error lines, missing commands and Python tracebacks.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScaffoldErrorScan;

impl LintErrorCheck for ScaffoldErrorScan {
    fn check(&self, output: &str) -> Option<String> {
        let hits: Vec<&str> = output
            .lines()
            .filter(|line| {
                line.starts_with("ERROR:")
                    || line.starts_with("error:")
                    || line.starts_with("Traceback (most recent call last)")
                    || line.contains("command not found")
            })
            .collect();

        if hits.is_empty() {
            None
        } else {
            Some(hits.join("\n"))
        }
    }
}

/// Extract the report body between the sentinels.
pub fn extract_report(output: &str) -> String {
    let mut lines = output.split('\n');

    for line in lines.by_ref() {
        if line.starts_with(START_SENTINEL) {
            break;
        }
    }

    let mut text = String::new();
    for line in lines {
        let line = strip_prompt(line);
        if line.starts_with(DONE_SENTINEL) {
            break;
        }
        text.push_str(line);
        text.push('\n');
    }
    text
}

/// `<mock-chroot> sh-5.2# cmd` becomes `# cmd`; other lines pass through.
fn strip_prompt(line: &str) -> &str {
    if !line.starts_with(PROMPT_PREFIX) {
        return line;
    }
    match line.find('#') {
        Some(pos) => &line[pos..],
        None => line,
    }
}

/// rpmlint's closing tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LintSummary {
    pub packages: u32,
    pub specfiles: u32,
    pub errors: u32,
    pub warnings: u32,
}

impl LintSummary {
    /// Parse the last `N packages and M specfiles checked; E errors, W warnings.` line.
    pub fn parse(report: &str) -> Option<Self> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| {
            Regex::new(
                r"(\d+) packages? and (\d+) specfiles? checked; (\d+) errors?, (\d+) warnings?",
            )
            .expect("valid summary regex")
        });

        let caps = re.captures_iter(report).last()?;
        Some(Self {
            packages: caps[1].parse().ok()?,
            specfiles: caps[2].parse().ok()?,
            errors: caps[3].parse().ok()?,
            warnings: caps[4].parse().ok()?,
        })
    }
}

/// Outcome of a lint run. `success` is false only when the session
/// scaffolding failed; rpmlint findings still give `success == true`.
#[derive(Debug, Clone, Serialize)]
pub struct LintReport {
    pub success: bool,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<LintSummary>,
}

impl LintReport {
    pub fn failed(text: impl Into<String>) -> Self {
        Self {
            success: false,
            text: text.into(),
            summary: None,
        }
    }

    pub fn passed(text: String) -> Self {
        let summary = LintSummary::parse(&text);
        Self {
            success: true,
            text,
            summary,
        }
    }

    /// True when rpmlint ran and reported neither errors nor warnings.
    pub fn is_clean(&self) -> bool {
        self.success
            && self
                .summary
                .is_some_and(|s| s.errors == 0 && s.warnings == 0)
    }
}
