use async_trait::async_trait;
use pkg_constants::state::{ORGANIZATIONS_PREFIX, organization_key};
use pkg_types::organization::{Organization, Plan};
use slatedb::Db;
use slatedb::object_store::local::LocalFileSystem;
use slatedb::object_store::path::Path;
use std::sync::Arc;
use tracing::info;

/// Organization record store.
///
/// The quota reconciler is the single writer of `plan`: `update_plan` must
/// never be called from request handlers, so a plan value in the store
/// always corresponds to a quota that was (or is about to be) applied to
/// the cluster.
#[async_trait]
pub trait OrganizationRecords: Send + Sync {
    async fn create(&self, org: &Organization) -> anyhow::Result<()>;
    async fn find(&self, id: &str) -> anyhow::Result<Option<Organization>>;
    async fn find_by_namespace(&self, namespace: &str) -> anyhow::Result<Option<Organization>>;
    async fn list(&self) -> anyhow::Result<Vec<Organization>>;
    async fn update_plan(&self, id: &str, plan: Plan) -> anyhow::Result<()>;
}

/// Organization store backed by SlateDB on a local filesystem.
/// In production this would use S3/R2/MinIO via the `object_store` crate.
#[derive(Clone)]
pub struct OrgStore {
    db: Db,
}

impl OrgStore {
    /// Open (or create) the store rooted at `path` on the local filesystem.
    pub async fn open(path: &str) -> anyhow::Result<Self> {
        info!("Opening organization store at {}", path);

        // Ensure the data directory exists before opening the object store
        std::fs::create_dir_all(path)
            .map_err(|e| anyhow::anyhow!("Failed to create data directory {}: {}", path, e))?;

        let object_store = Arc::new(
            LocalFileSystem::new_with_prefix(path)
                .map_err(|e| anyhow::anyhow!("Failed to create local object store: {}", e))?,
        );
        let db = Db::open(Path::from("/"), object_store)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to open SlateDB: {}", e))?;
        Ok(Self { db })
    }

    async fn get_record(&self, key: &str) -> anyhow::Result<Option<Organization>> {
        match self.db.get(key.as_bytes()).await {
            Ok(Some(bytes)) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(anyhow::anyhow!("SlateDB get failed: {}", e)),
        }
    }

    async fn put_record(&self, key: &str, org: &Organization) -> anyhow::Result<()> {
        let data = serde_json::to_vec(org)?;
        self.db
            .put(key.as_bytes(), &data)
            .await
            .map(|_| ())
            .map_err(|e| anyhow::anyhow!("SlateDB put failed: {}", e))
    }

    /// Gracefully close the store.
    pub async fn close(self) -> anyhow::Result<()> {
        info!("Closing organization store");
        self.db
            .close()
            .await
            .map_err(|e| anyhow::anyhow!("SlateDB close failed: {}", e))
    }
}

#[async_trait]
impl OrganizationRecords for OrgStore {
    async fn create(&self, org: &Organization) -> anyhow::Result<()> {
        let key = organization_key(&org.id);
        if self.get_record(&key).await?.is_some() {
            anyhow::bail!("organization {} already exists", org.id);
        }
        self.put_record(&key, org).await?;
        info!("Created organization {} (namespace {})", org.id, org.namespace);
        Ok(())
    }

    async fn find(&self, id: &str) -> anyhow::Result<Option<Organization>> {
        self.get_record(&organization_key(id)).await
    }

    async fn find_by_namespace(&self, namespace: &str) -> anyhow::Result<Option<Organization>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|org| org.namespace == namespace))
    }

    async fn list(&self) -> anyhow::Result<Vec<Organization>> {
        let mut orgs = Vec::new();
        let mut iter = self
            .db
            .scan_prefix(ORGANIZATIONS_PREFIX.as_bytes())
            .await
            .map_err(|e| anyhow::anyhow!("SlateDB scan_prefix failed: {}", e))?;

        while let Ok(Some(kv)) = iter.next().await {
            if let Ok(org) = serde_json::from_slice::<Organization>(&kv.value) {
                orgs.push(org);
            }
        }
        Ok(orgs)
    }

    async fn update_plan(&self, id: &str, plan: Plan) -> anyhow::Result<()> {
        let key = organization_key(id);
        let mut org = self
            .get_record(&key)
            .await?
            .ok_or_else(|| anyhow::anyhow!("organization {} not found", id))?;
        org.plan = plan;
        self.put_record(&key, &org).await?;
        info!("Organization {} plan set to {}", id, plan);
        Ok(())
    }
}
