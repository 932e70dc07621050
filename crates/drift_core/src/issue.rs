use serde::Serialize;

use crate::device::DeviceKey;

/// Phrase an analyzer response contains when it found nothing to report.
pub const NO_ISSUE_SENTINEL: &str = "No localization issues detected";

/// True when `response` reports no drift (case-insensitive substring match).
pub fn is_no_issue(response: &str) -> bool {
    response
        .to_lowercase()
        .contains(&NO_ISSUE_SENTINEL.to_lowercase())
}

/// What was compared: a crawled route, or one screenshot of a test-farm device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum IssueContext {
    Route { route: String },
    Device { device: DeviceKey, filename: String },
}

impl IssueContext {
    /// Key issues are grouped under for presentation.
    pub fn group_key(&self) -> String {
        match self {
            IssueContext::Route { route } => route.clone(),
            IssueContext::Device { device, .. } => device.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    #[serde(flatten)]
    pub context: IssueContext,
    pub target_locale: String,
    pub analysis: String,
}

impl Issue {
    pub fn for_route(route: &str, target_locale: &str, analysis: impl Into<String>) -> Self {
        Self {
            context: IssueContext::Route {
                route: route.to_string(),
            },
            target_locale: target_locale.to_string(),
            analysis: analysis.into(),
        }
    }

    pub fn for_device(
        device: &DeviceKey,
        target_locale: &str,
        filename: &str,
        analysis: impl Into<String>,
    ) -> Self {
        Self {
            context: IssueContext::Device {
                device: device.clone(),
                filename: filename.to_string(),
            },
            target_locale: target_locale.to_string(),
            analysis: analysis.into(),
        }
    }
}

/// Append-only list of issues collected during one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IssueLog {
    issues: Vec<Issue>,
}

/// Issues sharing one group key, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueGroup<'a> {
    pub key: String,
    pub issues: Vec<&'a Issue>,
}

impl IssueLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    /// Record an analyzer response as an issue unless it reports no drift.
    /// Returns whether an issue was recorded.
    pub fn record(&mut self, context: IssueContext, target_locale: &str, response: String) -> bool {
        if is_no_issue(&response) {
            return false;
        }
        self.issues.push(Issue {
            context,
            target_locale: target_locale.to_string(),
            analysis: response,
        });
        true
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Issue> {
        self.issues.iter()
    }

    pub fn as_slice(&self) -> &[Issue] {
        &self.issues
    }

    pub fn into_vec(self) -> Vec<Issue> {
        self.issues
    }

    /// Groups by primary context key, in first-seen order. Issues with the same
    /// text are all kept.
    pub fn groups(&self) -> Vec<IssueGroup<'_>> {
        let mut groups: Vec<IssueGroup<'_>> = Vec::new();
        for issue in &self.issues {
            let key = issue.context.group_key();
            match groups.iter_mut().find(|group| group.key == key) {
                Some(group) => group.issues.push(issue),
                None => groups.push(IssueGroup {
                    key,
                    issues: vec![issue],
                }),
            }
        }
        groups
    }
}

impl<'a> IntoIterator for &'a IssueLog {
    type Item = &'a Issue;
    type IntoIter = std::slice::Iter<'a, Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.iter()
    }
}
