/// Error handling tests for MCP tools
/// These tests verify that tools reject bad input before contacting Nexus
/// and return appropriate error messages without panicking
use nexus_mcp::common::security::audit_logger;
use nexus_mcp::config::{CredentialMode, Settings};
use nexus_mcp::nexus::ConnectionArgs;
use nexus_mcp::tools::{
    DockerTools, GetDockerTagsArgs, GetMavenVersionsArgs, GetPythonVersionsArgs,
    ListDockerImagesArgs, MavenTools, PythonTools, SearchMavenArtifactArgs,
};
use rmcp::model::ErrorCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

// Nothing listens on the discard port; any request that slips through
// validation fails as BackendUnavailable instead of InvalidParams.
fn unreachable_connection() -> ConnectionArgs {
    ConnectionArgs {
        nexus_url: Some("http://127.0.0.1:9".to_string()),
        nexus_username: Some("user".to_string()),
        nexus_password: Some("do-not-leak".to_string()),
        nexus_verify_ssl: None,
    }
}

fn settings() -> Arc<Settings> {
    Arc::new(Settings::default())
}

// ========== Maven Tool Error Tests ==========

#[tokio::test]
async fn test_search_maven_without_coordinates() {
    let tools = MavenTools::new(audit_logger(), settings());

    let result = tools
        .search_maven_artifact(
            SearchMavenArtifactArgs {
                connection: unreachable_connection(),
                ..Default::default()
            },
            None,
            &CancellationToken::new(),
        )
        .await;

    let err = result.unwrap_err();
    assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    assert!(err.message.contains("group_id or artifact_id"));
}

#[tokio::test]
async fn test_maven_coordinate_injection_attempt() {
    let tools = MavenTools::new(audit_logger(), settings());

    let malicious = vec![
        "lib;rm -rf /",
        "lib$(whoami)",
        "lib`cat /etc/passwd`",
        "../../../etc/passwd",
        "lib&format=raw",
    ];

    for artifact in malicious {
        let result = tools
            .get_maven_versions(
                GetMavenVersionsArgs {
                    group_id: "com.example".to_string(),
                    artifact_id: artifact.to_string(),
                    connection: unreachable_connection(),
                    ..Default::default()
                },
                None,
                &CancellationToken::new(),
            )
            .await;

        let err = result.expect_err(artifact);
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS, "for {}", artifact);
        assert!(err.message.contains("artifact_id"), "for {}", artifact);
    }
}

#[tokio::test]
async fn test_negative_page_size() {
    let tools = MavenTools::new(audit_logger(), settings());

    let err = tools
        .get_maven_versions(
            GetMavenVersionsArgs {
                group_id: "com.example".to_string(),
                artifact_id: "lib".to_string(),
                page_size: Some(-5),
                connection: unreachable_connection(),
                ..Default::default()
            },
            None,
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    assert_eq!(err.data.unwrap()["kind"], "InvalidPageSize");
}

#[tokio::test]
async fn test_garbage_continuation_token() {
    let tools = MavenTools::new(audit_logger(), settings());

    let err = tools
        .get_maven_versions(
            GetMavenVersionsArgs {
                group_id: "com.example".to_string(),
                artifact_id: "lib".to_string(),
                continuation_token: Some("bm90LWEtY3Vyc29y".to_string()),
                connection: unreachable_connection(),
                ..Default::default()
            },
            None,
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.data.unwrap()["kind"], "InvalidCursor");
}

// ========== Credential Error Tests ==========

#[tokio::test]
async fn test_invalid_instance_url() {
    let tools = MavenTools::new(audit_logger(), settings());

    for url in ["ftp://nexus.example.com", "not a url", "https://user:pw@nexus.example.com"] {
        let mut connection = unreachable_connection();
        connection.nexus_url = Some(url.to_string());

        let err = tools
            .get_maven_versions(
                GetMavenVersionsArgs {
                    group_id: "com.example".to_string(),
                    artifact_id: "lib".to_string(),
                    connection,
                    ..Default::default()
                },
                None,
                &CancellationToken::new(),
            )
            .await
            .expect_err(url);

        assert_eq!(err.data.unwrap()["kind"], "InvalidCredentials", "for {}", url);
        assert!(!err.message.contains("do-not-leak"));
    }
}

#[tokio::test]
async fn test_all_missing_credentials_reported() {
    let tools = PythonTools::new(audit_logger(), settings());

    let err = tools
        .get_python_versions(
            GetPythonVersionsArgs {
                package_name: "requests".to_string(),
                ..Default::default()
            },
            None,
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    for field in ["nexus_url", "nexus_username", "nexus_password"] {
        assert!(err.message.contains(field), "missing {}", field);
    }
}

#[tokio::test]
async fn test_header_mode_ignores_parameters() {
    let settings = Arc::new(Settings {
        credential_mode: CredentialMode::Headers,
        ..Settings::default()
    });
    let tools = DockerTools::new(audit_logger(), settings);

    let err = tools
        .list_docker_images(
            ListDockerImagesArgs {
                repository: "docker-hosted".to_string(),
                connection: unreachable_connection(),
            },
            None,
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.data.unwrap()["kind"], "MissingCredentials");
    assert!(err.message.contains("X-Nexus-Username"));
}

// ========== Docker Tool Error Tests ==========

#[tokio::test]
async fn test_docker_image_name_validation() {
    let tools = DockerTools::new(audit_logger(), settings());

    for image in ["", "Upper/Case", "image:tag", "a/../b"] {
        let err = tools
            .get_docker_tags(
                GetDockerTagsArgs {
                    repository: "docker-hosted".to_string(),
                    image_name: image.to_string(),
                    connection: unreachable_connection(),
                },
                None,
                &CancellationToken::new(),
            )
            .await
            .expect_err(image);

        assert_eq!(err.code, ErrorCode::INVALID_PARAMS, "for {:?}", image);
    }
}

#[tokio::test]
async fn test_unreachable_backend() {
    let tools = DockerTools::new(audit_logger(), settings());

    let err = tools
        .list_docker_images(
            ListDockerImagesArgs {
                repository: "docker-hosted".to_string(),
                connection: unreachable_connection(),
            },
            None,
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
    let data = err.data.unwrap();
    assert_eq!(data["kind"], "BackendUnavailable");
    assert_eq!(data["retryable"], true);
}

#[tokio::test]
async fn test_cancelled_call() {
    let tools = DockerTools::new(audit_logger(), settings());
    let ct = CancellationToken::new();
    ct.cancel();

    let result = tools
        .list_docker_images(
            ListDockerImagesArgs {
                repository: "docker-hosted".to_string(),
                connection: unreachable_connection(),
            },
            None,
            &ct,
        )
        .await;

    assert!(result.is_err());
}
