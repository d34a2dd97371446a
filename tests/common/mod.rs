//! Shared test fixtures for integration tests.
//!
//! # Available Fixtures
//!
//! - `helpdesk_finder`: a [`KnowledgeBaseFinder`] over [`helpdesk_documents`]
//! - `helpdesk_state`: the same finder wrapped in [`KbState`] for tool handlers
//!
//! The corpus holds six documents so that terms found in one or two of them
//! get a positive inverse document frequency.

use kb_search::{Document, KbState, KnowledgeBaseFinder};
use rstest::fixture;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// A small IT helpdesk corpus.
#[allow(dead_code)] // Used across different integration test crates
pub fn helpdesk_documents() -> Vec<Document> {
    vec![
        Document::new("1", "How to reset your account password")
            .with_title("Password Reset")
            .with_tags(["account", "security"]),
        Document::new("2", "Configure your wireless network connection")
            .with_title("WiFi Setup")
            .with_tags(["network"]),
        Document::new("printer-jam", "Open the tray and remove the stuck paper")
            .with_title("Printer Jam")
            .with_tags(["hardware"])
            .with_category("hardware"),
        Document::new("vpn-access", "Install the VPN client and sign in from home")
            .with_title("VPN Access")
            .with_tags(["remote", "network"])
            .with_category("network"),
        Document::new("outage", "Escalate a building-wide network outage to the on-call engineer")
            .with_title("Network Outage")
            .with_tags(["urgent", "network"])
            .with_category("network"),
        Document::new("phishing", "Forward suspicious email to the security team")
            .with_title("Report Phishing")
            .with_tags(["security", "urgent"])
            .with_category("security"),
    ]
}

#[allow(dead_code)]
#[fixture]
pub fn helpdesk_finder() -> KnowledgeBaseFinder {
    kb_search::tracing::init();
    let mut finder = KnowledgeBaseFinder::default();
    finder.add_documents(helpdesk_documents());
    finder
}

#[allow(dead_code)]
#[fixture]
pub fn helpdesk_state(helpdesk_finder: KnowledgeBaseFinder) -> Arc<KbState> {
    Arc::new(KbState::new(helpdesk_finder))
}

/// A temporary directory for config and corpus files, removed on drop.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TempFiles {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TempFiles {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Writes `contents` to `name` and returns the path as a string.
    pub fn write(&self, name: &str, contents: &str) -> String {
        let path = self.root.join(name);
        std::fs::write(&path, contents)
            .unwrap_or_else(|e| panic!("Failed to write {}: {}", path.display(), e));
        path.display().to_string()
    }
}
