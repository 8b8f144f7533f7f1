//! Per-ecosystem query executors.
//!
//! Each executor turns a tool request into one or more `/search` calls and
//! normalizes the components it gets back into [`NormalizedRecord`]s. The
//! set of executors is closed; tools pick theirs statically.
//!
//! Backend continuation tokens are exhausted inside
//! [`NexusClient::search_all`]; executors always hand back complete result
//! sets and never see or emit external cursors.

pub mod docker;
pub mod maven;
pub mod python;

pub use docker::{DockerCriteria, DockerExecutor, DockerImage};
pub use maven::{MavenCoordinate, MavenCriteria, MavenExecutor};
pub use python::{normalize_package_name, package_name_variants, PythonExecutor, PythonPackage};

use super::client::NexusClient;
use super::error::NexusResult;
use super::record::NormalizedRecord;

/// The capability every ecosystem executor provides.
#[allow(async_fn_in_trait)]
pub trait QueryExecutor {
    /// Search filters accepted by [`QueryExecutor::search`].
    type Criteria;
    /// Identifies one artifact/package/image for [`QueryExecutor::list_versions`].
    type Coordinate;

    /// Nexus repository format this executor queries (`maven2`, `pypi`, `docker`).
    fn format(&self) -> &'static str;

    /// Components matching `criteria`, one record per backend component.
    async fn search(
        &self,
        client: &NexusClient,
        criteria: &Self::Criteria,
    ) -> NexusResult<Vec<NormalizedRecord>>;

    /// Every version of one coordinate. Duplicates are left for the
    /// pagination engine to merge.
    async fn list_versions(
        &self,
        client: &NexusClient,
        coordinate: &Self::Coordinate,
    ) -> NexusResult<Vec<NormalizedRecord>>;
}
