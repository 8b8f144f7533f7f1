use super::QueryExecutor;
use crate::nexus::client::{Component, NexusClient, SearchQuery};
use crate::nexus::error::{NexusError, NexusResult};
use crate::nexus::record::NormalizedRecord;

pub const MAVEN_FORMAT: &str = "maven2";

#[derive(Debug, Clone, Default)]
pub struct MavenCriteria {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub repository: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MavenCoordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub repository: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MavenExecutor;

impl MavenExecutor {
    fn record(component: Component) -> NormalizedRecord {
        let group = component.group.clone().unwrap_or_default();
        let identity = format!("{}:{}:{}", group, component.name(), component.version());
        NormalizedRecord::new(
            identity,
            component.repository(),
            component.assets.len(),
            component.version(),
        )
        .with_name(component.name())
        .with_group(component.group.clone())
        .with_format(MAVEN_FORMAT)
        .with_size(component.total_size())
        .with_assets(component.asset_links())
    }
}

impl QueryExecutor for MavenExecutor {
    type Criteria = MavenCriteria;
    type Coordinate = MavenCoordinate;

    fn format(&self) -> &'static str {
        MAVEN_FORMAT
    }

    async fn search(
        &self,
        client: &NexusClient,
        criteria: &MavenCriteria,
    ) -> NexusResult<Vec<NormalizedRecord>> {
        if criteria.group_id.is_none() && criteria.artifact_id.is_none() {
            return Err(NexusError::InvalidArgument(
                "at least one of group_id or artifact_id must be provided".to_string(),
            ));
        }

        let query = SearchQuery::format(self.format())
            .repository(criteria.repository.as_deref())
            .group(criteria.group_id.as_deref())
            .name(criteria.artifact_id.as_deref())
            .version(criteria.version.as_deref());

        let components = client.search_all(&query).await?;
        Ok(components.into_iter().map(Self::record).collect())
    }

    async fn list_versions(
        &self,
        client: &NexusClient,
        coordinate: &MavenCoordinate,
    ) -> NexusResult<Vec<NormalizedRecord>> {
        let query = SearchQuery::format(self.format())
            .repository(coordinate.repository.as_deref())
            .group(Some(&coordinate.group_id))
            .name(Some(&coordinate.artifact_id));

        let components = client.search_all(&query).await?;
        Ok(components
            .into_iter()
            .filter(|c| !c.version().is_empty())
            .map(Self::record)
            .collect())
    }
}
