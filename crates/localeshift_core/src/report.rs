use serde::Serialize;

pub const MARK_OK: &str = "✓";
pub const MARK_SKIP: &str = "-";
pub const MARK_FAIL: &str = "✗";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    WrapParams,
    WrapPathname,
    Move,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WrapParams => "wrap-params",
            Self::WrapPathname => "wrap-pathname",
            Self::Move => "move",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Created,
    Updated,
    Moved,
    AlreadyExists,
    MissingLocaleFiles,
    FolderMissing,
    SourceMissing,
    Failed,
}

/// Result of one batch entry. `subject` is the folder or source path,
/// `target` the wrapper or destination path, both project-relative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemReport {
    pub subject: String,
    pub target: String,
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ItemReport {
    pub fn new(subject: impl Into<String>, target: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            subject: subject.into(),
            target: target.into(),
            outcome,
            missing: Vec::new(),
            reason: None,
        }
    }

    pub fn failed(
        subject: impl Into<String>,
        target: impl Into<String>,
        error: &anyhow::Error,
    ) -> Self {
        Self {
            reason: Some(format!("{error:#}")),
            ..Self::new(subject, target, Outcome::Failed)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub operation: Operation,
    pub items: Vec<ItemReport>,
}

impl BatchReport {
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, item: ItemReport) {
        self.items.push(item);
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.items
            .iter()
            .filter(|item| item.outcome == outcome)
            .count()
    }

    /// Folders that exist but did not receive a wrapper.
    pub fn skipped(&self) -> usize {
        self.items
            .iter()
            .filter(|item| {
                matches!(
                    item.outcome,
                    Outcome::AlreadyExists | Outcome::MissingLocaleFiles | Outcome::Failed
                )
            })
            .count()
    }

    /// Status lines for one entry, in print order.
    pub fn item_lines(&self, item: &ItemReport) -> Vec<String> {
        match item.outcome {
            Outcome::Created => vec![format!("{MARK_OK} Created {}", item.target)],
            Outcome::Updated => vec![format!("{MARK_OK} Updated {}", item.target)],
            Outcome::Moved => vec![format!("{MARK_OK} Moved {} -> {}", item.subject, item.target)],
            Outcome::AlreadyExists => vec![format!("{MARK_SKIP} Already exists: {}", item.target)],
            Outcome::MissingLocaleFiles => item
                .missing
                .iter()
                .map(|path| format!("{MARK_FAIL} Missing: {path}"))
                .collect(),
            Outcome::FolderMissing => {
                vec![format!("{MARK_FAIL} Folder not found: {}", item.subject)]
            }
            Outcome::SourceMissing => {
                vec![format!("{MARK_SKIP} Skipping {} (not found)", item.subject)]
            }
            Outcome::Failed => {
                let reason = item.reason.as_deref().unwrap_or("unknown error");
                match self.operation {
                    Operation::Move => {
                        vec![format!("{MARK_FAIL} Error moving {}: {reason}", item.subject)]
                    }
                    Operation::WrapParams | Operation::WrapPathname => {
                        vec![format!("{MARK_FAIL} Failed {}: {reason}", item.target)]
                    }
                }
            }
        }
    }

    pub fn summary_lines(&self) -> Vec<String> {
        match self.operation {
            Operation::WrapParams => vec![
                format!(
                    "{MARK_OK} Created {} locale wrappers",
                    self.count(Outcome::Created)
                ),
                format!(
                    "{MARK_SKIP} Skipped {} (already exist or missing locale files)",
                    self.skipped()
                ),
            ],
            Operation::WrapPathname => vec![format!(
                "{MARK_OK} Updated {} locale wrappers",
                self.count(Outcome::Updated)
            )],
            Operation::Move => {
                let mut lines = vec![format!("{MARK_OK} Moved {} files", self.count(Outcome::Moved))];
                let failed = self.count(Outcome::Failed);
                if failed > 0 {
                    lines.push(format!("{MARK_FAIL} Failed to move {failed} files"));
                }
                lines
            }
        }
    }

    /// Full text rendering: every item line, a blank line, then the summary.
    pub fn render_text(&self) -> String {
        let mut lines: Vec<String> = self
            .items
            .iter()
            .flat_map(|item| self.item_lines(item))
            .collect();
        lines.push(String::new());
        lines.extend(self.summary_lines());
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}
