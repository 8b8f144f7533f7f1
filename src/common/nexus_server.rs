use crate::common::security::audit_logger;
use crate::common::tool_registry::ToolRegistry;
use crate::config::Settings;
use crate::tools::{
    GetDockerTagsArgs, GetMavenVersionsArgs, GetPythonVersionsArgs, ListDockerImagesArgs,
    SearchMavenArtifactArgs, SearchPythonPackageArgs,
};
use axum::http::HeaderMap;
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    service::RequestContext,
    tool, tool_handler, tool_router, ErrorData as McpError, RoleServer, ServerHandler,
};
use std::sync::Arc;

const INSTRUCTIONS: &str = "Query Sonatype Nexus Repository Manager for Maven, Python (PyPI) and Docker artifacts.

Tools:
- search_maven_artifact: search by group_id, artifact_id and/or version
- get_maven_versions: paginated versions of one artifact, newest first
- search_python_package: search PyPI packages by name ('-' and '_' spellings both match)
- get_python_versions: paginated versions of one package, newest first
- list_docker_images: images in a Docker repository with tag counts
- get_docker_tags: tags of one image with digest and size

Credentials: over HTTP send X-Nexus-Url, X-Nexus-Username, X-Nexus-Password and optionally X-Nexus-Verify-SSL headers. Over stdio pass nexus_url, nexus_username, nexus_password and optionally nexus_verify_ssl with every call.

Pagination: version tools return hasMore and continuationToken; pass the token back unchanged with the same arguments to get the next page.";

/// HTTP headers of the request carrying this call, when served over HTTP.
fn request_headers(context: &RequestContext<RoleServer>) -> Option<&HeaderMap> {
    context
        .extensions
        .get::<axum::http::request::Parts>()
        .map(|parts| &parts.headers)
}

#[derive(Clone)]
pub struct NexusServer {
    tool_router: ToolRouter<NexusServer>,
    registry: ToolRegistry,
}

#[tool_router]
impl NexusServer {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            registry: ToolRegistry::new(audit_logger(), settings),
        }
    }

    #[tool(
        description = "Search Maven artifacts in Nexus by groupId, artifactId and/or version. At least one of group_id or artifact_id is required.",
        annotations(read_only_hint = true)
    )]
    async fn search_maven_artifact(
        &self,
        Parameters(args): Parameters<SearchMavenArtifactArgs>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.registry
            .maven
            .search_maven_artifact(args, request_headers(&context), &context.ct)
            .await
    }

    #[tool(
        description = "List versions of a Maven artifact, newest first. Paginated: pass continuation_token from the previous page to continue. Set simple=true for bare version strings.",
        annotations(read_only_hint = true)
    )]
    async fn get_maven_versions(
        &self,
        Parameters(args): Parameters<GetMavenVersionsArgs>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.registry
            .maven
            .get_maven_versions(args, request_headers(&context), &context.ct)
            .await
    }

    #[tool(
        description = "Search Python packages in Nexus PyPI repositories. Hyphen and underscore spellings of the name are treated as the same package.",
        annotations(read_only_hint = true)
    )]
    async fn search_python_package(
        &self,
        Parameters(args): Parameters<SearchPythonPackageArgs>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.registry
            .python
            .search_python_package(args, request_headers(&context), &context.ct)
            .await
    }

    #[tool(
        description = "List versions of a Python package, newest first. Paginated: pass continuation_token from the previous page to continue. Set simple=true for bare version strings.",
        annotations(read_only_hint = true)
    )]
    async fn get_python_versions(
        &self,
        Parameters(args): Parameters<GetPythonVersionsArgs>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.registry
            .python
            .get_python_versions(args, request_headers(&context), &context.ct)
            .await
    }

    #[tool(
        description = "List Docker images in a Nexus Docker repository with their tag counts",
        annotations(read_only_hint = true)
    )]
    async fn list_docker_images(
        &self,
        Parameters(args): Parameters<ListDockerImagesArgs>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.registry
            .docker
            .list_docker_images(args, request_headers(&context), &context.ct)
            .await
    }

    #[tool(
        description = "List tags of a Docker image, newest first, with digest and size where Nexus reports them",
        annotations(read_only_hint = true)
    )]
    async fn get_docker_tags(
        &self,
        Parameters(args): Parameters<GetDockerTagsArgs>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.registry
            .docker
            .get_docker_tags(args, request_headers(&context), &context.ct)
            .await
    }
}

#[tool_handler]
impl ServerHandler for NexusServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }

    async fn initialize(
        &self,
        _request: InitializeRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<InitializeResult, McpError> {
        if let Some(http_request_part) = context.extensions.get::<axum::http::request::Parts>() {
            let initialize_uri = &http_request_part.uri;
            let has_credentials = http_request_part
                .headers
                .contains_key(crate::nexus::credentials::HEADER_URL);
            tracing::info!(%initialize_uri, has_credentials, "initialize from http server");
        }
        Ok(self.get_info())
    }
}
