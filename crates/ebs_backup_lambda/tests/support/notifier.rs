use std::sync::Mutex;

use ebs_backup_lambda::adapters::notify::Notifier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    pub topic_arn: String,
    pub subject: String,
    pub message: String,
}

#[derive(Default)]
pub struct RecordingNotifier {
    publications: Mutex<Vec<Publication>>,
    failing_subject: Option<&'static str>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes with this subject are recorded and then rejected.
    pub fn failing_on(subject: &'static str) -> Self {
        Self {
            failing_subject: Some(subject),
            ..Self::default()
        }
    }

    pub fn publications(&self) -> Vec<Publication> {
        self.publications.lock().expect("poisoned mutex").clone()
    }

    pub fn with_subject(&self, subject: &str) -> Vec<Publication> {
        self.publications()
            .into_iter()
            .filter(|publication| publication.subject == subject)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn publish(&self, topic_arn: &str, subject: &str, message: &str) -> Result<(), String> {
        let publication = Publication {
            topic_arn: topic_arn.to_string(),
            subject: subject.to_string(),
            message: message.to_string(),
        };
        self.publications
            .lock()
            .expect("poisoned mutex")
            .push(publication);

        if self.failing_subject.is_some_and(|s| s == subject) {
            return Err(format!("simulated publish failure for subject: {subject}"));
        }
        Ok(())
    }
}
