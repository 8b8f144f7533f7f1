//! Parameter types for the Nexus MCP tools.
//!
//! Every type flattens [`ConnectionArgs`], so each tool also accepts
//! `nexus_url`, `nexus_username`, `nexus_password` and `nexus_verify_ssl`.
//! Those are only read when credentials come from parameters.

use crate::nexus::credentials::ConnectionArgs;
use rmcp::schemars;

/// Parameters for searching Maven artifacts.
///
/// Used by [`MavenTools::search_maven_artifact`](crate::tools::MavenTools::search_maven_artifact).
///
/// # Examples
///
/// ```
/// use nexus_mcp::tools::types::SearchMavenArtifactArgs;
///
/// let args = SearchMavenArtifactArgs {
///     group_id: Some("org.apache.commons".to_string()),
///     artifact_id: Some("commons-lang3".to_string()),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct SearchMavenArtifactArgs {
    /// Maven groupId (e.g., "org.apache.commons")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    /// Maven artifactId (e.g., "commons-lang3")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_id: Option<String>,
    /// Exact version to match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Repository to search (default: all repositories)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(flatten)]
    pub connection: ConnectionArgs,
}

/// Parameters for listing the versions of one Maven artifact.
///
/// Used by [`MavenTools::get_maven_versions`](crate::tools::MavenTools::get_maven_versions).
#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct GetMavenVersionsArgs {
    /// Maven groupId
    pub group_id: String,
    /// Maven artifactId
    pub artifact_id: String,
    /// Repository to search (default: all repositories)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    /// Versions per page (default: 20, capped at the server maximum)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i64>,
    /// Token from a previous page's "continuationToken"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continuation_token: Option<String>,
    /// Return bare version strings instead of version objects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simple: Option<bool>,
    #[serde(flatten)]
    pub connection: ConnectionArgs,
}

/// Parameters for searching Python packages.
///
/// Used by [`PythonTools::search_python_package`](crate::tools::PythonTools::search_python_package).
///
/// # Examples
///
/// ```
/// use nexus_mcp::tools::types::SearchPythonPackageArgs;
///
/// // Matches "my-package" and "my_package" alike
/// let args = SearchPythonPackageArgs {
///     name: "my-package".to_string(),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct SearchPythonPackageArgs {
    /// Package name; '-' and '_' spellings are both tried
    pub name: String,
    /// Repository to search (default: all repositories)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(flatten)]
    pub connection: ConnectionArgs,
}

/// Parameters for listing the versions of one Python package.
///
/// Used by [`PythonTools::get_python_versions`](crate::tools::PythonTools::get_python_versions).
#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct GetPythonVersionsArgs {
    /// Package name; '-' and '_' spellings are both tried
    pub package_name: String,
    /// Repository to search (default: all repositories)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    /// Versions per page (default: 20, capped at the server maximum)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i64>,
    /// Token from a previous page's "continuationToken"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continuation_token: Option<String>,
    /// Return bare version strings instead of version objects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simple: Option<bool>,
    #[serde(flatten)]
    pub connection: ConnectionArgs,
}

/// Parameters for listing Docker images.
///
/// Used by [`DockerTools::list_docker_images`](crate::tools::DockerTools::list_docker_images).
#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct ListDockerImagesArgs {
    /// Docker repository name (e.g., "docker-hosted")
    pub repository: String,
    #[serde(flatten)]
    pub connection: ConnectionArgs,
}

/// Parameters for listing the tags of one Docker image.
///
/// Used by [`DockerTools::get_docker_tags`](crate::tools::DockerTools::get_docker_tags).
///
/// # Examples
///
/// ```
/// use nexus_mcp::tools::types::GetDockerTagsArgs;
///
/// let args = GetDockerTagsArgs {
///     repository: "docker-hosted".to_string(),
///     image_name: "team/backend".to_string(),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct GetDockerTagsArgs {
    /// Docker repository name
    pub repository: String,
    /// Image name (e.g., "library/nginx")
    pub image_name: String,
    #[serde(flatten)]
    pub connection: ConnectionArgs,
}
