//! Adding, removing and fetching individual documents.

use super::search::unknown_id_message;
use crate::document::Document;
use crate::state::KbState;
use rmcp::schemars;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddDocumentRequest {
    /// Unique document id. An existing document with this id is replaced.
    pub id: String,
    /// Body text
    pub content: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// Extra fields. String values are searchable when a metadata weight is configured.
    #[serde(default)]
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

impl From<AddDocumentRequest> for Document {
    fn from(request: AddDocumentRequest) -> Self {
        Self {
            id: request.id,
            content: request.content,
            title: request.title,
            tags: request.tags,
            category: request.category,
            metadata: request.metadata.unwrap_or_default().into_iter().collect(),
        }
    }
}

/// Index a document, replacing any document with the same id.
pub async fn handle_add_document(
    state: &Arc<KbState>,
    request: AddDocumentRequest,
) -> Result<String, String> {
    if request.id.trim().is_empty() {
        return Err("Document id must not be empty.".to_string());
    }

    let document = Document::from(request);
    let id = document.id.clone();
    let mut finder = state.write().await;
    let replaced = finder.index().document(&id).is_some();
    finder.add_document(document);

    let terms = finder.index().document_terms(&id).map_or(0, <[String]>::len);
    let action = if replaced { "Replaced" } else { "Added" };
    Ok(format!(
        "{} document '{}' ({} terms). The index now holds {} documents.",
        action,
        id,
        terms,
        finder.index().document_count()
    ))
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DocumentIdRequest {
    /// Document id
    pub id: String,
}

/// Remove a document from the index.
pub async fn handle_remove_document(
    state: &Arc<KbState>,
    request: DocumentIdRequest,
) -> Result<String, String> {
    let mut finder = state.write().await;
    match finder.remove_document(&request.id) {
        Some(_) => Ok(format!(
            "Removed document '{}'. The index now holds {} documents.",
            request.id,
            finder.index().document_count()
        )),
        None => Err(unknown_id_message(&request.id, &known_ids(&finder))),
    }
}

/// Return a stored document as pretty-printed JSON.
pub async fn handle_get_document(
    state: &Arc<KbState>,
    request: DocumentIdRequest,
) -> Result<String, String> {
    let finder = state.read().await;
    match finder.index().document(&request.id) {
        Some(document) => serde_json::to_string_pretty(document)
            .map_err(|e| format!("Failed to serialize document '{}': {}", request.id, e)),
        None => Err(unknown_id_message(&request.id, &known_ids(&finder))),
    }
}

fn known_ids(finder: &crate::knowledge::KnowledgeBaseFinder) -> Vec<&str> {
    finder
        .index()
        .all_documents()
        .iter()
        .map(|doc| doc.id.as_str())
        .collect()
}
