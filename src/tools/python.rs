use crate::common::security::audit::AuditLogger;
use crate::common::security::{
    nexus_error_to_mcp, validate_audited, validate_continuation_token,
    validate_python_package_name, validate_repository_name,
};
use crate::common::tool_module::ToolModule;
use crate::config::Settings;
use crate::nexus::executor::{PythonExecutor, PythonPackage};
use crate::nexus::shaper::{render_assets, shape_list, shape_page};
use crate::nexus::{check_request, fingerprint, normalize, paginate, Detail, NormalizedRecord, QueryExecutor};
use crate::secure_tool;
use axum::http::HeaderMap;
use rmcp::model::CallToolResult;
use rmcp::ErrorData as McpError;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::types::{GetPythonVersionsArgs, SearchPythonPackageArgs};
use super::{non_blank, output_header, text_result, validate_optional};

/// Tools for querying PyPI (`pypi`) repositories.
///
/// A name that finds nothing is retried with its other separator spelling
/// (`my-package` as `my_package`), and results are keyed by the PEP 503
/// normalized name. Version cursors stay bound to the spelling that issued
/// them.
pub struct PythonTools {
    audit: Arc<AuditLogger>,
    settings: Arc<Settings>,
    executor: PythonExecutor,
}

impl PythonTools {
    pub fn new(audit: Arc<AuditLogger>, settings: Arc<Settings>) -> Self {
        Self {
            audit,
            settings,
            executor: PythonExecutor,
        }
    }

    pub async fn search_python_package(
        &self,
        args: SearchPythonPackageArgs,
        headers: Option<&HeaderMap>,
        ct: &CancellationToken,
    ) -> Result<CallToolResult, McpError> {
        const TOOL: &str = "search_python_package";

        let SearchPythonPackageArgs {
            name,
            repository,
            connection,
        } = args;
        let name = name.trim().to_string();
        let repository = non_blank(repository);

        let audit = &self.audit;
        secure_tool!(
            audit = audit,
            tool_name = TOOL,
            params = json!({"name": &name, "repository": &repository}),
            timeout = self.settings.tool_timeout_secs,
            ct = ct,
            {
                validate_audited(audit, validate_python_package_name(&name))?;
                validate_optional(audit, repository.as_deref(), validate_repository_name)?;

                let (params, client) = self.connect(&connection, headers)?;
                let package = PythonPackage { name, repository };
                let records = self
                    .executor
                    .search(&client, &package)
                    .await
                    .map_err(|e| self.pipeline_error(TOOL, params.instance(), e))?;

                let records = normalize(records);
                let shaped = shape_list(
                    &records,
                    "packages",
                    output_header(&client, &[]),
                    &self.settings.output,
                    render_package,
                )
                .map_err(nexus_error_to_mcp)?;

                self.log_tool_success(TOOL, Some(&format!("{} packages", shaped.item_count)));
                Ok(text_result(shaped))
            }
        )
    }

    pub async fn get_python_versions(
        &self,
        args: GetPythonVersionsArgs,
        headers: Option<&HeaderMap>,
        ct: &CancellationToken,
    ) -> Result<CallToolResult, McpError> {
        const TOOL: &str = "get_python_versions";

        let GetPythonVersionsArgs {
            package_name,
            repository,
            page_size,
            continuation_token,
            simple,
            connection,
        } = args;
        let package_name = package_name.trim().to_string();
        let repository = non_blank(repository);
        let continuation_token = non_blank(continuation_token);
        let page_size = page_size.unwrap_or(self.settings.default_page_size as i64);

        let audit = &self.audit;
        secure_tool!(
            audit = audit,
            tool_name = TOOL,
            params = json!({
                "package_name": &package_name,
                "repository": &repository,
                "page_size": page_size,
                "continued": continuation_token.is_some(),
            }),
            timeout = self.settings.tool_timeout_secs,
            ct = ct,
            {
                validate_audited(audit, validate_python_package_name(&package_name))?;
                validate_optional(audit, repository.as_deref(), validate_repository_name)?;
                validate_optional(
                    audit,
                    continuation_token.as_deref(),
                    validate_continuation_token,
                )?;

                let (params, client) = self.connect(&connection, headers)?;
                // Keyed on the name as given: which spellings get queried
                // depends on it, so another spelling may see another set.
                let query_fingerprint = fingerprint(
                    TOOL,
                    params.instance(),
                    &[
                        ("package_name", Some(package_name.as_str())),
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

                let package = PythonPackage {
                    name: package_name.clone(),
                    repository,
                };
                let records = self
                    .executor
                    .list_versions(&client, &package)
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

                let header = output_header(&client, &[("packageName", json!(package_name))]);
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

fn render_package(record: &NormalizedRecord) -> Value {
    json!({
        "name": record.name,
        "version": record.raw_version,
        "format": record.format,
        "repository": record.repository,
        "assetCount": record.asset_count,
        "assets": render_assets(&record.assets),
    })
}

impl ToolModule for PythonTools {
    fn audit_logger(&self) -> &Arc<AuditLogger> {
        &self.audit
    }

    fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    fn name(&self) -> &'static str {
        "PythonTools"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::security::audit_logger;

    #[tokio::test]
    async fn test_rejects_invalid_package_name() {
        let tools = PythonTools::new(audit_logger(), Arc::new(Settings::default()));
        let args = GetPythonVersionsArgs {
            package_name: "-bad".to_string(),
            ..Default::default()
        };

        let err = tools
            .get_python_versions(args, None, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(err.message.contains("package_name"));
    }

    #[tokio::test]
    async fn test_missing_credentials_named() {
        let tools = PythonTools::new(audit_logger(), Arc::new(Settings::default()));
        let args = SearchPythonPackageArgs {
            name: "requests".to_string(),
            ..Default::default()
        };

        let err = tools
            .search_python_package(args, None, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(err.message.contains("nexus_url"));
        assert!(err.message.contains("nexus_password"));
    }
}
