//! MCP server exposing the knowledge base as tools.

use crate::knowledge::KnowledgeBaseFinder;
use crate::state::KbState;
use crate::tools::documents::{
    AddDocumentRequest, DocumentIdRequest, handle_add_document, handle_get_document,
    handle_remove_document,
};
use crate::tools::knowledge::{
    FindRelevantRequest, MatchNotesRequest, handle_find_relevant, handle_match_notes,
};
use crate::tools::search::{
    FindSimilarRequest, SearchRequest, handle_find_similar, handle_search,
};
use crate::tools::suggest::{AutocompleteRequest, handle_autocomplete};
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars::{self, JsonSchema, generate::SchemaSettings},
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

/// MCP server over a shared knowledge base.
#[derive(Clone)]
pub struct KbServer {
    /// Knowledge base shared across tool calls
    state: Arc<KbState>,

    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for KbServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KbServer")
            .field("state", &self.state)
            .finish()
    }
}

#[tool_router]
impl KbServer {
    pub fn new(finder: KnowledgeBaseFinder) -> Self {
        Self {
            state: Arc::new(KbState::new(finder)),
            tool_router: Self::tool_router(),
        }
    }

    pub fn state(&self) -> &Arc<KbState> {
        &self.state
    }

    #[tool(
        description = "Search the knowledge base with TF-IDF ranking. Titles, tags and categories weigh more than body text. Returns ranked documents with the fields each query term matched.",
        input_schema = inline_schema_for_type::<SearchRequest>()
    )]
    async fn search(
        &self,
        Parameters(request): Parameters<SearchRequest>,
    ) -> std::result::Result<String, String> {
        handle_search(&self.state, request).await
    }

    #[tool(
        description = "Find documents similar to a known document, using its title, content and tags as the query. Unknown ids return close id suggestions.",
        input_schema = inline_schema_for_type::<FindSimilarRequest>()
    )]
    async fn find_similar(
        &self,
        Parameters(request): Parameters<FindSimilarRequest>,
    ) -> std::result::Result<String, String> {
        handle_find_similar(&self.state, request).await
    }

    #[tool(
        description = "Search with knowledge-base preferences: preferred categories, tags every result must carry, and tags that raise a document's rank.",
        input_schema = inline_schema_for_type::<FindRelevantRequest>()
    )]
    async fn find_relevant(
        &self,
        Parameters(request): Parameters<FindRelevantRequest>,
    ) -> std::result::Result<String, String> {
        handle_find_relevant(&self.state, request).await
    }

    #[tool(
        description = "Match free-form notes (a ticket, a call transcript) to knowledge-base entries. Extracts the most frequent terms as a query and infers categories and tags from keywords.",
        input_schema = inline_schema_for_type::<MatchNotesRequest>()
    )]
    async fn match_notes(
        &self,
        Parameters(request): Parameters<MatchNotesRequest>,
    ) -> std::result::Result<String, String> {
        handle_match_notes(&self.state, request).await
    }

    #[tool(
        description = "Suggest completions for partial input. Completes against document titles unless candidates are given.",
        input_schema = inline_schema_for_type::<AutocompleteRequest>()
    )]
    async fn autocomplete(
        &self,
        Parameters(request): Parameters<AutocompleteRequest>,
    ) -> std::result::Result<String, String> {
        handle_autocomplete(&self.state, request).await
    }

    #[tool(
        description = "Add a document to the knowledge base, replacing any document with the same id.",
        input_schema = inline_schema_for_type::<AddDocumentRequest>()
    )]
    async fn add_document(
        &self,
        Parameters(request): Parameters<AddDocumentRequest>,
    ) -> std::result::Result<String, String> {
        handle_add_document(&self.state, request).await
    }

    #[tool(description = "Remove a document from the knowledge base by id.")]
    async fn remove_document(
        &self,
        Parameters(request): Parameters<DocumentIdRequest>,
    ) -> std::result::Result<String, String> {
        handle_remove_document(&self.state, request).await
    }

    #[tool(description = "Fetch a stored document by id as JSON.")]
    async fn get_document(
        &self,
        Parameters(request): Parameters<DocumentIdRequest>,
    ) -> std::result::Result<String, String> {
        handle_get_document(&self.state, request).await
    }
}

#[tool_handler]
impl ServerHandler for KbServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_server_info(Implementation::from_build_env())
            .with_instructions(
                "kb-search: full-text search over a knowledge base. \
                 Use search for plain queries, find_relevant to prefer categories or require tags, \
                 and match_notes to turn free-form notes into a query. \
                 Documents can be added and removed while the server runs.",
            )
    }
}

/// Generate an inline JSON schema for MCP tools
///
/// Unlike rmcp's default `schema_for_type()`, this sets `inline_subschemas = true`
/// so nested types are written inline instead of as `$ref` definitions.
pub fn inline_schema_for_type<T: JsonSchema>() -> Arc<JsonObject> {
    let mut settings = SchemaSettings::draft07();
    settings.transforms = vec![Box::new(schemars::transform::AddNullable::default())];
    settings.inline_subschemas = true;

    let generator = settings.into_generator();
    let schema = generator.into_root_schema_for::<T>();
    let object = serde_json::to_value(schema).expect("failed to serialize schema");

    let json_object = match object {
        serde_json::Value::Object(object) => object,
        _ => panic!("Schema serialization produced non-object value"),
    };

    Arc::new(json_object)
}
