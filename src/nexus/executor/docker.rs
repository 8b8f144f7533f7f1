use super::QueryExecutor;
use crate::nexus::client::{Component, NexusClient, SearchQuery};
use crate::nexus::error::NexusResult;
use crate::nexus::record::NormalizedRecord;

pub const DOCKER_FORMAT: &str = "docker";

/// Images in a repository, optionally narrowed to one image name.
#[derive(Debug, Clone)]
pub struct DockerCriteria {
    pub repository: String,
    pub image_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DockerImage {
    pub repository: String,
    pub image_name: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DockerExecutor;

impl DockerExecutor {
    /// One record per tag component, keyed by image name so the pagination
    /// engine merges them into one record per image. `raw_version` stays
    /// empty so images order by name.
    fn image_record(component: &Component) -> NormalizedRecord {
        let tags = match component.version() {
            "" => Vec::new(),
            tag => vec![tag.to_string()],
        };
        NormalizedRecord::new(component.name(), component.repository(), 1, "")
            .with_name(component.name())
            .with_format(DOCKER_FORMAT)
            .with_tags(tags)
    }

    fn tag_record(component: &Component) -> NormalizedRecord {
        NormalizedRecord::new(
            format!("{}:{}", component.name(), component.version()),
            component.repository(),
            component.assets.len(),
            component.version(),
        )
        .with_name(component.name())
        .with_format(DOCKER_FORMAT)
        .with_digest(component.digest())
        .with_size(component.total_size())
        .with_assets(component.asset_links())
    }

    /// Every image in `repository`.
    pub async fn list_images(
        &self,
        client: &NexusClient,
        repository: &str,
    ) -> NexusResult<Vec<NormalizedRecord>> {
        let query = SearchQuery::format(self.format()).repository(Some(repository));
        let components = client.search_all(&query).await?;
        Ok(components
            .iter()
            .filter(|c| !c.name().is_empty())
            .map(Self::image_record)
            .collect())
    }

    /// Every tag of `image` in `repository`.
    pub async fn list_tags(
        &self,
        client: &NexusClient,
        repository: &str,
        image: &str,
    ) -> NexusResult<Vec<NormalizedRecord>> {
        let query = SearchQuery::format(self.format())
            .repository(Some(repository))
            .name(Some(image));
        let components = client.search_all(&query).await?;
        Ok(components
            .iter()
            .filter(|c| !c.version().is_empty())
            .map(Self::tag_record)
            .collect())
    }
}

impl QueryExecutor for DockerExecutor {
    type Criteria = DockerCriteria;
    type Coordinate = DockerImage;

    fn format(&self) -> &'static str {
        DOCKER_FORMAT
    }

    async fn search(
        &self,
        client: &NexusClient,
        criteria: &DockerCriteria,
    ) -> NexusResult<Vec<NormalizedRecord>> {
        match criteria.image_name.as_deref() {
            Some(image) => self.list_tags(client, &criteria.repository, image).await,
            None => self.list_images(client, &criteria.repository).await,
        }
    }

    async fn list_versions(
        &self,
        client: &NexusClient,
        coordinate: &DockerImage,
    ) -> NexusResult<Vec<NormalizedRecord>> {
        self.list_tags(client, &coordinate.repository, &coordinate.image_name)
            .await
    }
}
