use crate::common::security::AuditLogger;
use crate::config::Settings;
use std::sync::Arc;

/// Central registry for all tool modules in the MCP server.
///
/// Cloning the registry shares the tool instances; none of them hold
/// per-caller state.
#[derive(Clone)]
pub struct ToolRegistry {
    pub maven: Arc<crate::tools::MavenTools>,
    pub python: Arc<crate::tools::PythonTools>,
    pub docker: Arc<crate::tools::DockerTools>,
}

impl ToolRegistry {
    /// Creates a new ToolRegistry with all tool modules initialized.
    ///
    /// # Arguments
    /// * `audit` - Shared audit logger for security logging
    /// * `settings` - Read-only server settings
    pub fn new(audit: Arc<AuditLogger>, settings: Arc<Settings>) -> Self {
        Self {
            maven: Arc::new(crate::tools::MavenTools::new(audit.clone(), settings.clone())),
            python: Arc::new(crate::tools::PythonTools::new(audit.clone(), settings.clone())),
            docker: Arc::new(crate::tools::DockerTools::new(audit, settings)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::security::audit_logger;
    use crate::common::tool_module::ToolModule;

    #[test]
    fn test_tool_registry_creation() {
        let registry = ToolRegistry::new(audit_logger(), Arc::new(Settings::default()));

        assert_eq!(registry.maven.name(), "MavenTools");
        assert_eq!(registry.python.name(), "PythonTools");
        assert_eq!(registry.docker.name(), "DockerTools");
    }

    #[test]
    fn test_tool_registry_clone() {
        let settings = Arc::new(Settings::default());
        let registry1 = ToolRegistry::new(audit_logger(), settings.clone());
        let registry2 = registry1.clone();

        assert!(Arc::ptr_eq(&registry1.maven, &registry2.maven));
        assert!(Arc::ptr_eq(registry1.docker.settings(), &settings));
    }
}
