use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Serialize;
use similar::{ChangeTag, TextDiff};
use tracing::{debug, warn};

use crate::report::MARK_FAIL;

pub const DEFAULT_INJECT_TARGET: &str = "app/solutions/marketResearch/page.tsx";

/// One literal landmark edit. Every occurrence of `before` is replaced by `after`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Replacement {
    pub name: &'static str,
    pub before: &'static str,
    pub after: &'static str,
}

const SUBMIT_START: Replacement = Replacement {
    name: "submit-start",
    before: r#"  const handleSubmit = async (e: React.FormEvent) => {
    e.preventDefault();
    setError(null);
    setIsSubmitting(true);"#,
    after: r#"  const handleSubmit = async (e: React.FormEvent) => {
    e.preventDefault();
    setError(null);
    setIsSubmitting(true);
    console.log("[Market Research] Starting research submission...");
    console.log("[Market Research] Form data:", formData);"#,
};

const FETCH_CALL: Replacement = Replacement {
    name: "fetch-call",
    before: r#"      const response = await fetch("http://localhost:8002/api/v1/research/from-onboarding", {
        method: "POST",
        headers: { "Content-Type": "application/json" },
        body: JSON.stringify(requestData),
      });"#,
    after: r#"      console.log("[Market Research] Sending request to market-research-service...");
      console.log("[Market Research] Request data:", requestData);

      const response = await fetch("http://localhost:8002/api/v1/research/from-onboarding", {
        method: "POST",
        headers: { "Content-Type": "application/json" },
        body: JSON.stringify(requestData),
      });

      console.log("[Market Research] Response status:", response.status);"#,
};

const RESEARCH_RESULT: Replacement = Replacement {
    name: "research-result",
    before: r#"      const result = await response.json();
      setResearchId(result.research_id);
      setResearchStatus(result);
      pollResearchStatus(result.research_id);"#,
    after: r#"      const result = await response.json();
      console.log("[Market Research] Research started with ID:", result.research_id);
      console.log("[Market Research] Initial status:", result);
      setResearchId(result.research_id);
      setResearchStatus(result);
      pollResearchStatus(result.research_id);"#,
};

const POLL_START: Replacement = Replacement {
    name: "poll-start",
    before: r#"  const pollResearchStatus = async (id: string) => {
    const interval = setInterval(async () => {
      try {
        const response = await fetch(`http://localhost:8002/api/v1/research/${id}`);
        const status: ResearchStatus = await response.json();
        setResearchStatus(status);"#,
    after: r#"  const pollResearchStatus = async (id: string) => {
    console.log("[Market Research] Starting status polling for ID:", id);
    const interval = setInterval(async () => {
      try {
        const response = await fetch(`http://localhost:8002/api/v1/research/${id}`);
        const status: ResearchStatus = await response.json();
        console.log("[Market Research] Status update:", {
          status: status.status,
          progress: status.progress,
          current_stage: status.current_stage
        });
        setResearchStatus(status);"#,
};

const RESEARCH_COMPLETED: Replacement = Replacement {
    name: "research-completed",
    before: r#"        if (status.status === "completed") {
          clearInterval(interval);
          setIsSubmitting(false);
          fetchResearchReport(id);"#,
    after: r#"        if (status.status === "completed") {
          console.log("[Market Research] Research completed! Fetching report...");
          clearInterval(interval);
          setIsSubmitting(false);
          fetchResearchReport(id);"#,
};

const FETCH_REPORT: Replacement = Replacement {
    name: "fetch-report",
    before: r#"  const fetchResearchReport = async (id: string) => {
    try {
      const response = await fetch(`http://localhost:8002/api/v1/research/${id}/report`);
      const report: ResearchReport = await response.json();
      setResearchReport(report);"#,
    after: r#"  const fetchResearchReport = async (id: string) => {
    console.log("[Market Research] Fetching research report for ID:", id);
    try {
      const response = await fetch(`http://localhost:8002/api/v1/research/${id}/report`);
      const report: ResearchReport = await response.json();
      console.log("[Market Research] Report received:", {
        has_executive_summary: !!report.executive_summary,
        has_market_size: !!report.market_size,
        has_competitive_landscape: !!report.competitive_landscape,
        segments_count: report.target_segments?.length || 0
      });
      setResearchReport(report);"#,
};

/// Applied in order; later landmarks never overlap earlier replacements.
pub const MARKET_RESEARCH_REPLACEMENTS: &[Replacement] = &[
    SUBMIT_START,
    FETCH_CALL,
    RESEARCH_RESULT,
    POLL_START,
    RESEARCH_COMPLETED,
    FETCH_REPORT,
];

#[derive(Debug, Clone, Default)]
pub struct InjectOptions {
    /// Refuse to write when any replacement finds no landmark.
    pub strict: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplacementOutcome {
    pub name: String,
    pub occurrences: usize,
}

impl ReplacementOutcome {
    pub fn matched(&self) -> bool {
        self.occurrences > 0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InjectReport {
    pub target: PathBuf,
    pub replacements: Vec<ReplacementOutcome>,
    pub inserted_lines: usize,
    pub removed_lines: usize,
}

impl InjectReport {
    pub fn unmatched(&self) -> Vec<&str> {
        self.replacements
            .iter()
            .filter(|outcome| !outcome.matched())
            .map(|outcome| outcome.name.as_str())
            .collect()
    }

    pub fn applied(&self) -> usize {
        self.replacements
            .iter()
            .filter(|outcome| outcome.matched())
            .count()
    }

    /// Closing status line. Success is only claimed when every landmark matched.
    pub fn summary_line(&self) -> String {
        let missing = self.replacements.len() - self.applied();
        if missing == 0 {
            "Logging added successfully!".to_string()
        } else {
            format!(
                "{MARK_FAIL} Logging partially applied: {missing} of {} landmarks not found",
                self.replacements.len()
            )
        }
    }
}

/// Apply `replacements` in sequence. Replacements without a match leave the text untouched.
pub fn apply_replacements(
    content: &str,
    replacements: &[Replacement],
) -> (String, Vec<ReplacementOutcome>) {
    let mut current = content.to_string();
    let mut outcomes = Vec::with_capacity(replacements.len());
    for replacement in replacements {
        let occurrences = current.matches(replacement.before).count();
        if occurrences > 0 {
            current = current.replace(replacement.before, replacement.after);
        }
        debug!(landmark = replacement.name, occurrences, "applied replacement");
        outcomes.push(ReplacementOutcome {
            name: replacement.name.to_string(),
            occurrences,
        });
    }
    (current, outcomes)
}

/// Rewrite `target` in place. No backup is kept.
pub fn inject_logging(
    target: &Path,
    replacements: &[Replacement],
    options: &InjectOptions,
) -> Result<InjectReport> {
    let original = fs::read_to_string(target)
        .with_context(|| format!("failed to read {}", target.display()))?;
    let (updated, outcomes) = apply_replacements(&original, replacements);

    let unmatched: Vec<&str> = outcomes
        .iter()
        .filter(|outcome| !outcome.matched())
        .map(|outcome| outcome.name.as_str())
        .collect();
    for name in &unmatched {
        warn!(path = %target.display(), landmark = *name, "landmark not found");
    }
    if options.strict && !unmatched.is_empty() {
        bail!(
            "{} landmark(s) not found in {}: {}; file left unchanged",
            unmatched.len(),
            target.display(),
            unmatched.join(", ")
        );
    }

    let (inserted_lines, removed_lines) = count_line_changes(&original, &updated);
    fs::write(target, &updated).with_context(|| format!("failed to write {}", target.display()))?;

    Ok(InjectReport {
        target: target.to_path_buf(),
        replacements: outcomes,
        inserted_lines,
        removed_lines,
    })
}

fn count_line_changes(old: &str, new: &str) -> (usize, usize) {
    let diff = TextDiff::from_lines(old, new);
    let mut inserted = 0usize;
    let mut removed = 0usize;
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => inserted += 1,
            ChangeTag::Delete => removed += 1,
            ChangeTag::Equal => {}
        }
    }
    (inserted, removed)
}
