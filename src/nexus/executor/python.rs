use super::QueryExecutor;
use crate::nexus::client::{Component, NexusClient, SearchQuery};
use crate::nexus::error::NexusResult;
use crate::nexus::record::NormalizedRecord;
use tracing::debug;

pub const PYPI_FORMAT: &str = "pypi";

/// A package name plus optional repository; serves as both search criteria
/// and version-listing coordinate.
#[derive(Debug, Clone)]
pub struct PythonPackage {
    pub name: String,
    pub repository: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PythonExecutor;

/// PEP 503 normalization: lowercase, runs of `-`, `_` and `.` become `-`.
pub fn normalize_package_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_separator = false;
    for ch in name.trim().chars() {
        if matches!(ch, '-' | '_' | '.') {
            if !in_separator {
                out.push('-');
            }
            in_separator = true;
        } else {
            out.extend(ch.to_lowercase());
            in_separator = false;
        }
    }
    out
}

/// Alternative spellings to try when the name as given finds nothing.
///
/// Nexus indexes PyPI packages under whichever separator the upload used,
/// so `my-package` may only be found as `my_package` and vice versa.
pub fn package_name_variants(name: &str) -> Vec<String> {
    let mut variants = Vec::new();
    for candidate in [name.replace('-', "_"), name.replace('_', "-")] {
        if candidate != name && !variants.contains(&candidate) {
            variants.push(candidate);
        }
    }
    variants
}

impl PythonExecutor {
    fn record(component: Component) -> NormalizedRecord {
        let identity = format!(
            "{}:{}",
            normalize_package_name(component.name()),
            component.version()
        );
        NormalizedRecord::new(
            identity,
            component.repository(),
            component.assets.len(),
            component.version(),
        )
        .with_name(component.name())
        .with_format(PYPI_FORMAT)
        .with_size(component.total_size())
        .with_assets(component.asset_links())
    }

    async fn fetch(
        &self,
        client: &NexusClient,
        package: &PythonPackage,
    ) -> NexusResult<Vec<Component>> {
        let query = |name: &str| {
            SearchQuery::format(self.format())
                .repository(package.repository.as_deref())
                .name(Some(name))
        };

        let mut components = client.search_all(&query(&package.name)).await?;
        if !components.is_empty() {
            return Ok(components);
        }

        for variant in package_name_variants(&package.name) {
            debug!(package = %package.name, variant = %variant, "retrying PyPI search with alternate separator");
            components.extend(client.search_all(&query(&variant)).await?);
        }
        Ok(components)
    }
}

impl QueryExecutor for PythonExecutor {
    type Criteria = PythonPackage;
    type Coordinate = PythonPackage;

    fn format(&self) -> &'static str {
        PYPI_FORMAT
    }

    async fn search(
        &self,
        client: &NexusClient,
        criteria: &PythonPackage,
    ) -> NexusResult<Vec<NormalizedRecord>> {
        let components = self.fetch(client, criteria).await?;
        Ok(components.into_iter().map(Self::record).collect())
    }

    async fn list_versions(
        &self,
        client: &NexusClient,
        coordinate: &PythonPackage,
    ) -> NexusResult<Vec<NormalizedRecord>> {
        let components = self.fetch(client, coordinate).await?;
        Ok(components
            .into_iter()
            .filter(|c| !c.version().is_empty())
            .map(Self::record)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_package_name() {
        assert_eq!(normalize_package_name("My_Package"), "my-package");
        assert_eq!(normalize_package_name("my-package"), "my-package");
        assert_eq!(normalize_package_name("zope.interface"), "zope-interface");
        assert_eq!(normalize_package_name("a__-.b"), "a-b");
    }

    #[test]
    fn test_variants() {
        assert_eq!(package_name_variants("my-package"), vec!["my_package"]);
        assert_eq!(package_name_variants("my_package"), vec!["my-package"]);
        assert!(package_name_variants("requests").is_empty());
        assert_eq!(
            package_name_variants("a-b_c"),
            vec!["a_b_c".to_string(), "a-b-c".to_string()]
        );
    }
}
