use crate::common::security::audit::AuditLogger;
use crate::common::security::{
    nexus_error_to_mcp, validate_audited, validate_continuation_token, validate_maven_coordinate,
    validate_repository_name, validate_version,
};
use crate::common::tool_module::ToolModule;
use crate::config::Settings;
use crate::nexus::executor::{MavenCoordinate, MavenCriteria, MavenExecutor};
use crate::nexus::shaper::{render_assets, shape_list, shape_page};
use crate::nexus::{check_request, fingerprint, normalize, paginate, Detail, NormalizedRecord, QueryExecutor};
use crate::secure_tool;
use axum::http::HeaderMap;
use rmcp::model::CallToolResult;
use rmcp::ErrorData as McpError;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::types::{GetMavenVersionsArgs, SearchMavenArtifactArgs};
use super::{non_blank, output_header, text_result, validate_optional};

/// Tools for querying Maven (`maven2`) repositories.
pub struct MavenTools {
    audit: Arc<AuditLogger>,
    settings: Arc<Settings>,
    executor: MavenExecutor,
}

impl MavenTools {
    pub fn new(audit: Arc<AuditLogger>, settings: Arc<Settings>) -> Self {
        Self {
            audit,
            settings,
            executor: MavenExecutor,
        }
    }

    /// Search components by groupId, artifactId and version.
    pub async fn search_maven_artifact(
        &self,
        args: SearchMavenArtifactArgs,
        headers: Option<&HeaderMap>,
        ct: &CancellationToken,
    ) -> Result<CallToolResult, McpError> {
        const TOOL: &str = "search_maven_artifact";

        let SearchMavenArtifactArgs {
            group_id,
            artifact_id,
            version,
            repository,
            connection,
        } = args;
        let group_id = non_blank(group_id);
        let artifact_id = non_blank(artifact_id);
        let version = non_blank(version);
        let repository = non_blank(repository);

        let audit = &self.audit;
        secure_tool!(
            audit = audit,
            tool_name = TOOL,
            params = json!({
                "group_id": &group_id,
                "artifact_id": &artifact_id,
                "version": &version,
                "repository": &repository,
            }),
            timeout = self.settings.tool_timeout_secs,
            ct = ct,
            {
                validate_optional(audit, group_id.as_deref(), |v| {
                    validate_maven_coordinate("group_id", v)
                })?;
                validate_optional(audit, artifact_id.as_deref(), |v| {
                    validate_maven_coordinate("artifact_id", v)
                })?;
                validate_optional(audit, version.as_deref(), validate_version)?;
                validate_optional(audit, repository.as_deref(), validate_repository_name)?;

                let (params, client) = self.connect(&connection, headers)?;
                let criteria = MavenCriteria {
                    group_id,
                    artifact_id,
                    version,
                    repository,
                };

                let records = self
                    .executor
                    .search(&client, &criteria)
                    .await
                    .map_err(|e| self.pipeline_error(TOOL, params.instance(), e))?;

                let records = normalize(records);
                let shaped = shape_list(
                    &records,
                    "artifacts",
                    output_header(&client, &[]),
                    &self.settings.output,
                    render_artifact,
                )
                .map_err(nexus_error_to_mcp)?;

                self.log_tool_success(TOOL, Some(&format!("{} artifacts", shaped.item_count)));
                Ok(text_result(shaped))
            }
        )
    }

    /// One page of an artifact's versions, newest first.
    pub async fn get_maven_versions(
        &self,
        args: GetMavenVersionsArgs,
        headers: Option<&HeaderMap>,
        ct: &CancellationToken,
    ) -> Result<CallToolResult, McpError> {
        const TOOL: &str = "get_maven_versions";

        let GetMavenVersionsArgs {
            group_id,
            artifact_id,
            repository,
            page_size,
            continuation_token,
            simple,
            connection,
        } = args;
        let repository = non_blank(repository);
        let continuation_token = non_blank(continuation_token);
        let page_size = page_size.unwrap_or(self.settings.default_page_size as i64);

        let audit = &self.audit;
        secure_tool!(
            audit = audit,
            tool_name = TOOL,
            params = json!({
                "group_id": &group_id,
                "artifact_id": &artifact_id,
                "repository": &repository,
                "page_size": page_size,
                "continued": continuation_token.is_some(),
            }),
            timeout = self.settings.tool_timeout_secs,
            ct = ct,
            {
                validate_audited(audit, validate_maven_coordinate("group_id", &group_id))?;
                validate_audited(audit, validate_maven_coordinate("artifact_id", &artifact_id))?;
                validate_optional(audit, repository.as_deref(), validate_repository_name)?;
                validate_optional(
                    audit,
                    continuation_token.as_deref(),
                    validate_continuation_token,
                )?;

                let (params, client) = self.connect(&connection, headers)?;
                let query_fingerprint = fingerprint(
                    TOOL,
                    params.instance(),
                    &[
                        ("group_id", Some(group_id.as_str())),
                        ("artifact_id", Some(artifact_id.as_str())),
                        ("repository", repository.as_deref()),
                    ],
                );
                check_request(
                    page_size,
                    continuation_token.as_deref(),
                    &query_fingerprint,
                    self.settings.max_page_size,
                )
                .map_err(nexus_error_to_mcp)?;

                let coordinate = MavenCoordinate {
                    group_id: group_id.clone(),
                    artifact_id: artifact_id.clone(),
                    repository,
                };
                let records = self
                    .executor
                    .list_versions(&client, &coordinate)
                    .await
                    .map_err(|e| self.pipeline_error(TOOL, params.instance(), e))?;

                let page = paginate(
                    records,
                    page_size,
                    continuation_token.as_deref(),
                    &query_fingerprint,
                    self.settings.max_page_size,
                )
                .map_err(nexus_error_to_mcp)?;

                let header = output_header(
                    &client,
                    &[("groupId", json!(group_id)), ("artifactId", json!(artifact_id))],
                );
                let shaped = shape_page(
                    &page,
                    Detail::from_simple_flag(simple.unwrap_or(false)),
                    header,
                    &self.settings.output,
                )
                .map_err(nexus_error_to_mcp)?;

                self.log_tool_success(
                    TOOL,
                    Some(&format!("{} of {} versions", shaped.item_count, page.total)),
                );
                Ok(text_result(shaped))
            }
        )
    }
}

fn render_artifact(record: &NormalizedRecord) -> Value {
    json!({
        "groupId": record.group.as_deref().unwrap_or_default(),
        "artifactId": record.name,
        "version": record.raw_version,
        "repository": record.repository,
        "assetCount": record.asset_count,
        "assets": render_assets(&record.assets),
    })
}

impl ToolModule for MavenTools {
    fn audit_logger(&self) -> &Arc<AuditLogger> {
        &self.audit
    }

    fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    fn name(&self) -> &'static str {
        "MavenTools"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::security::audit_logger;

    fn tools() -> MavenTools {
        MavenTools::new(audit_logger(), Arc::new(Settings::default()))
    }

    #[tokio::test]
    async fn test_search_requires_group_or_artifact() {
        let args = SearchMavenArtifactArgs {
            version: Some("1.0".to_string()),
            connection: crate::nexus::ConnectionArgs {
                nexus_url: Some("http://127.0.0.1:9".to_string()),
                nexus_username: Some("u".to_string()),
                nexus_password: Some("p".to_string()),
                nexus_verify_ssl: None,
            },
            ..Default::default()
        };

        let err = tools()
            .search_maven_artifact(args, None, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(err.message.contains("group_id or artifact_id"));
        assert_eq!(err.data.unwrap()["kind"], "InvalidArgument");
    }

    #[tokio::test]
    async fn test_versions_rejects_bad_group_before_credentials() {
        let args = GetMavenVersionsArgs {
            group_id: "org;rm".to_string(),
            artifact_id: "lib".to_string(),
            ..Default::default()
        };

        let err = tools()
            .get_maven_versions(args, None, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(err.message.contains("group_id"));
    }

    #[test]
    fn test_render_artifact() {
        let record = NormalizedRecord::new("org.example:lib:1.0", "releases", 2, "1.0")
            .with_name("lib")
            .with_group(Some("org.example".to_string()));
        let value = render_artifact(&record);
        assert_eq!(value["groupId"], "org.example");
        assert_eq!(value["artifactId"], "lib");
        assert_eq!(value["assetCount"], 2);
    }
}
