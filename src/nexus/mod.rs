//! Nexus query pipeline.
//!
//! ```text
//! tool args / headers ─► credentials::resolve ─► ConnectionParams
//!                                                    │
//!                                  NexusClient::new ◄┘ (one per call)
//!                                        │
//!                        executor::*Executor (search / list_versions)
//!                                        │ Vec<NormalizedRecord>
//!                     pagination::paginate / pagination::normalize
//!                                        │
//!                         shaper::shape_page / shaper::shape_list
//! ```
//!
//! Nothing in this module holds state between calls.

pub mod client;
pub mod credentials;
pub mod error;
pub mod executor;
pub mod pagination;
pub mod record;
pub mod shaper;

pub use client::{ClientSettings, NexusClient, SearchQuery};
pub use credentials::{resolve, ConnectionArgs, ConnectionParams, CredentialSource};
pub use error::{NexusError, NexusResult};
pub use executor::QueryExecutor;
pub use pagination::{check_request, fingerprint, normalize, paginate, Page};
pub use record::{compare_versions, AssetLink, NormalizedRecord};
pub use shaper::{Detail, OutputLimits, OverflowPolicy, Shaped};
