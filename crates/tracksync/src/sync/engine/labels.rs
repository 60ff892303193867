use std::collections::HashSet;

use crate::labels::{encode_labels, label_color};
use crate::store::IssueFilter;
use crate::tracker::{NewRemoteLabel, RemoteTracker};

use super::super::context::SyncContext;
use super::super::error::Result;
use super::super::progress::SyncProgress;
use super::Synchronizer;

/// Labels implied by a set of issues, de-duplicated case-insensitively.
///
/// The first spelling seen is kept.
pub(super) fn implied_labels<I>(encoded: I) -> Vec<String>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut seen = HashSet::new();
    let mut labels = Vec::new();
    for label in encoded.into_iter().flatten() {
        if seen.insert(label.to_lowercase()) {
            labels.push(label);
        }
    }
    labels
}

impl Synchronizer {
    /// Make sure every label used by the project's issues exists remotely.
    pub(super) async fn provision_labels(&self, ctx: &mut SyncContext<'_>) -> Result<()> {
        let issues = self
            .store
            .find_issues(&IssueFilter::project(ctx.project.id))
            .await;
        let Some(issues) = ctx.store_outcome(issues, || "Failed to load issues".to_string()) else {
            return Ok(());
        };

        let wanted = implied_labels(
            issues
                .iter()
                .map(|i| encode_labels(i.issue_type, i.priority, &i.labels)),
        );
        if wanted.is_empty() {
            return Ok(());
        }

        let remote = self.tracker.list_labels(&ctx.repo).await;
        let Some(remote) = ctx.tracker_outcome(remote, || "Failed to list remote labels".to_string())?
        else {
            return Ok(());
        };
        let existing: HashSet<String> = remote.iter().map(|l| l.name.to_lowercase()).collect();

        for name in wanted {
            if existing.contains(&name.to_lowercase()) {
                continue;
            }

            let label = NewRemoteLabel {
                color: label_color(&name).to_string(),
                name,
            };
            match self.tracker.create_label(&ctx.repo, &label).await {
                Ok(()) => {
                    tracing::debug!(label = %label.name, "Created label");
                    ctx.summary.labels_created += 1;
                    ctx.emit(SyncProgress::LabelCreated {
                        name: label.name.clone(),
                    });
                }
                Err(e) if e.is_already_exists() => {
                    tracing::debug!(label = %label.name, "Label already exists");
                }
                Err(e) => {
                    ctx.tracker_outcome::<()>(Err(e), || {
                        format!("Failed to create label \"{}\"", label.name)
                    })?;
                }
            }
        }

        Ok(())
    }
}
