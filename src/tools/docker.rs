use crate::common::security::audit::AuditLogger;
use crate::common::security::{
    nexus_error_to_mcp, validate_audited, validate_image_name, validate_repository_name,
};
use crate::common::tool_module::ToolModule;
use crate::config::Settings;
use crate::nexus::executor::{DockerExecutor, DockerImage};
use crate::nexus::shaper::{render_assets, shape_list};
use crate::nexus::{normalize, NormalizedRecord, QueryExecutor};
use crate::secure_tool;
use axum::http::HeaderMap;
use rmcp::model::CallToolResult;
use rmcp::ErrorData as McpError;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::{output_header, text_result};
use super::types::{GetDockerTagsArgs, ListDockerImagesArgs};

/// Tools for querying Docker (`docker`) repositories.
pub struct DockerTools {
    audit: Arc<AuditLogger>,
    settings: Arc<Settings>,
    executor: DockerExecutor,
}

impl DockerTools {
    pub fn new(audit: Arc<AuditLogger>, settings: Arc<Settings>) -> Self {
        Self {
            audit,
            settings,
            executor: DockerExecutor,
        }
    }

    /// Every image in a repository with its tag count, ordered by name.
    pub async fn list_docker_images(
        &self,
        args: ListDockerImagesArgs,
        headers: Option<&HeaderMap>,
        ct: &CancellationToken,
    ) -> Result<CallToolResult, McpError> {
        const TOOL: &str = "list_docker_images";

        let ListDockerImagesArgs {
            repository,
            connection,
        } = args;
        let repository = repository.trim().to_string();

        let audit = &self.audit;
        secure_tool!(
            audit = audit,
            tool_name = TOOL,
            params = json!({"repository": &repository}),
            timeout = self.settings.tool_timeout_secs,
            ct = ct,
            {
                validate_audited(audit, validate_repository_name(&repository))?;

                let (params, client) = self.connect(&connection, headers)?;
                let records = self
                    .executor
                    .list_images(&client, &repository)
                    .await
                    .map_err(|e| self.pipeline_error(TOOL, params.instance(), e))?;

                let records = normalize(records);
                let header = output_header(&client, &[("repository", json!(repository))]);
                let shaped = shape_list(
                    &records,
                    "images",
                    header,
                    &self.settings.output,
                    render_image,
                )
                .map_err(nexus_error_to_mcp)?;

                self.log_tool_success(TOOL, Some(&format!("{} images", shaped.item_count)));
                Ok(text_result(shaped))
            }
        )
    }

    /// Every tag of one image, newest first.
    pub async fn get_docker_tags(
        &self,
        args: GetDockerTagsArgs,
        headers: Option<&HeaderMap>,
        ct: &CancellationToken,
    ) -> Result<CallToolResult, McpError> {
        const TOOL: &str = "get_docker_tags";

        let GetDockerTagsArgs {
            repository,
            image_name,
            connection,
        } = args;
        let repository = repository.trim().to_string();
        let image_name = image_name.trim().to_string();

        let audit = &self.audit;
        secure_tool!(
            audit = audit,
            tool_name = TOOL,
            params = json!({"repository": &repository, "image_name": &image_name}),
            timeout = self.settings.tool_timeout_secs,
            ct = ct,
            {
                validate_audited(audit, validate_repository_name(&repository))?;
                validate_audited(audit, validate_image_name(&image_name))?;

                let (params, client) = self.connect(&connection, headers)?;
                let image = DockerImage {
                    repository: repository.clone(),
                    image_name: image_name.clone(),
                };
                let records = self
                    .executor
                    .list_versions(&client, &image)
                    .await
                    .map_err(|e| self.pipeline_error(TOOL, params.instance(), e))?;

                let records = normalize(records);
                let header = output_header(
                    &client,
                    &[("repository", json!(repository)), ("imageName", json!(image_name))],
                );
                let shaped = shape_list(&records, "tags", header, &self.settings.output, render_tag)
                    .map_err(nexus_error_to_mcp)?;

                self.log_tool_success(TOOL, Some(&format!("{} tags", shaped.item_count)));
                Ok(text_result(shaped))
            }
        )
    }
}

fn render_image(record: &NormalizedRecord) -> Value {
    json!({
        "image": record.name,
        "repository": record.repository,
        "tagCount": record.tags.len(),
        "tags": record.tags,
    })
}

fn render_tag(record: &NormalizedRecord) -> Value {
    let mut tag = Map::new();
    tag.insert("tag".to_string(), json!(record.raw_version));
    tag.insert("repository".to_string(), json!(record.repository));
    if let Some(digest) = &record.digest {
        tag.insert("digest".to_string(), json!(digest));
    }
    if let Some(size) = record.size {
        tag.insert("size".to_string(), json!(size));
    }
    tag.insert("assets".to_string(), render_assets(&record.assets));
    Value::Object(tag)
}

impl ToolModule for DockerTools {
    fn audit_logger(&self) -> &Arc<AuditLogger> {
        &self.audit
    }

    fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    fn name(&self) -> &'static str {
        "DockerTools"
    }
}
