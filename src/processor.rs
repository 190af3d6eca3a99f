use anyhow::{Context, Result};
use log::{info, warn};
use std::path::PathBuf;

use crate::config::Category;
use crate::extract;
use crate::mail::decode;
use crate::mail::gmail::MailApi;
use crate::output;

const UNREAD_LABEL: &str = "UNREAD";

/// Counts for one sweep.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Recognized-category messages handled (and labeled).
    pub processed: usize,
    /// Abstract/link pairs written across all messages.
    pub matched: usize,
}

/// One full sweep over the unread inbox: fetch, decode, extract, write,
/// label. Messages are handled strictly one at a time in listing order.
pub struct DigestProcessor<'a> {
    mail: &'a dyn MailApi,
    categories: &'a [Category],
    output_dir: PathBuf,
    processed_label_id: &'a str,
}

impl<'a> DigestProcessor<'a> {
    pub fn new(
        mail: &'a dyn MailApi,
        categories: &'a [Category],
        output_dir: PathBuf,
        processed_label_id: &'a str,
    ) -> Self {
        Self {
            mail,
            categories,
            output_dir,
            processed_label_id,
        }
    }

    /// Processes every currently-unread message once. Collaborator failures
    /// abort the run; undecodable or unrecognized messages are skipped and
    /// left unread.
    pub fn run(&self) -> Result<RunReport> {
        let refs = self
            .mail
            .list_unread()
            .context("listing unread messages")?;
        info!("{} unread message(s)", refs.len());

        let mut report = RunReport::default();
        let mut ordinal = 0usize;

        for msg_ref in &refs {
            let message = self
                .mail
                .get_message(&msg_ref.id)
                .with_context(|| format!("fetching message {}", msg_ref.id))?;

            let Some(subject) = decode::subject(&message) else {
                warn!("message {}: no subject, skipped", msg_ref.id);
                continue;
            };
            let Some(body) = decode::body_text(&message) else {
                warn!("message {}: no decodable body, skipped", msg_ref.id);
                continue;
            };

            let Some(category) = self.categories.iter().find(|c| subject.contains(&c.marker))
            else {
                continue;
            };

            // Run-scoped ordinal keeps same-subject digests apart.
            let file_stem = format!("{subject}_{ordinal}");
            ordinal += 1;
            info!("dealing with message: {file_stem}");

            let listings = extract::extract_listings(&body, &category.keywords);
            if listings.is_empty() {
                info!("{file_stem}: nothing matched");
            } else {
                report.matched += listings.len();
                output::append_listings(&self.output_dir, &file_stem, &listings)
                    .with_context(|| format!("writing output for {file_stem}"))?;
            }

            // Labeled read whether or not anything matched, so the digest
            // does not come back on the next sweep.
            self.mail
                .modify_labels(&msg_ref.id, &[self.processed_label_id], &[UNREAD_LABEL])
                .with_context(|| format!("labeling message {}", msg_ref.id))?;
            report.processed += 1;
        }

        info!(
            "sweep done: {} message(s) processed, {} abstract(s) written",
            report.processed, report.matched
        );
        Ok(report)
    }
}
