#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::Notify;
use url::Url;
use vitrine_core::{
    FetchError, ImageAssetManager, InMemoryPreviewStore, PersistError,
    ProfileGateway, ProfileStateHolder, SaveOrchestrator, SelectedImage,
    SharedProfileStore, TransportError, UploadError,
};
use vitrine_model::{Address, RemoteProfile};

pub const LIMIT: u64 = 800 * 1024;

#[derive(Debug, Default)]
struct Inner {
    profile: RemoteProfile,
    fail_fetch: bool,
    fail_upload: bool,
    fail_persist: bool,
    upload_url: String,
    uploads: Vec<String>,
    persisted: Vec<RemoteProfile>,
    fetches: usize,
}

/// Scriptable in-memory profile service.
#[derive(Debug, Clone, Default)]
pub struct StubGateway {
    inner: Arc<RwLock<Inner>>,
    persist_gate: Arc<RwLock<Option<Arc<Notify>>>>,
    persist_entered: Arc<Notify>,
}

impl StubGateway {
    pub fn new(profile: RemoteProfile) -> Self {
        let stub = Self::default();
        {
            let mut inner = stub.inner.write();
            inner.profile = profile;
            inner.upload_url = "/uploads/new.png".to_string();
        }
        stub
    }

    pub fn fail_fetch(&self) {
        self.inner.write().fail_fetch = true;
    }

    pub fn fail_upload(&self) {
        self.inner.write().fail_upload = true;
    }

    pub fn fail_persist(&self) {
        self.inner.write().fail_persist = true;
    }

    /// Hold every persist call until the returned notifier fires.
    pub fn gate_persist(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.persist_gate.write() = Some(gate.clone());
        gate
    }

    /// Resolves once a persist call has reached the gate.
    pub async fn persist_started(&self) {
        self.persist_entered.notified().await;
    }

    pub fn uploads(&self) -> Vec<String> {
        self.inner.read().uploads.clone()
    }

    pub fn persisted(&self) -> Vec<RemoteProfile> {
        self.inner.read().persisted.clone()
    }

    pub fn fetches(&self) -> usize {
        self.inner.read().fetches
    }
}

#[async_trait]
impl ProfileGateway for StubGateway {
    async fn fetch_profile(&self) -> Result<RemoteProfile, FetchError> {
        let mut inner = self.inner.write();
        inner.fetches += 1;
        if inner.fail_fetch {
            return Err(TransportError::Rejected("fetch disabled".into()).into());
        }
        Ok(inner.profile.clone())
    }

    async fn upload_image(
        &self,
        image: &SelectedImage,
    ) -> Result<String, UploadError> {
        let mut inner = self.inner.write();
        inner.uploads.push(image.file_name().to_string());
        if inner.fail_upload {
            return Err(TransportError::Rejected("upload disabled".into()).into());
        }
        Ok(inner.upload_url.clone())
    }

    async fn persist_profile(
        &self,
        profile: &RemoteProfile,
    ) -> Result<(), PersistError> {
        self.inner.write().persisted.push(profile.clone());

        let gate = self.persist_gate.read().clone();
        if let Some(gate) = gate {
            self.persist_entered.notify_one();
            gate.notified().await;
        }

        let mut inner = self.inner.write();
        if inner.fail_persist {
            return Err(TransportError::Rejected("persist disabled".into()).into());
        }
        inner.profile = profile.clone();
        Ok(())
    }
}

pub struct Harness {
    pub gateway: StubGateway,
    pub previews: Arc<InMemoryPreviewStore>,
    pub shared: SharedProfileStore,
    pub holder: ProfileStateHolder,
    pub orchestrator: Arc<SaveOrchestrator>,
}

pub fn harness(profile: RemoteProfile) -> Harness {
    let gateway = StubGateway::new(profile);
    let previews = Arc::new(InMemoryPreviewStore::new());
    let shared = SharedProfileStore::new();
    let holder = ProfileStateHolder::new(
        Arc::new(gateway.clone()),
        ImageAssetManager::new(previews.clone(), LIMIT),
        Url::parse("https://api.example.com/").expect("origin"),
    );
    let orchestrator = Arc::new(SaveOrchestrator::new(
        Arc::new(gateway.clone()),
        Arc::new(shared.clone()),
    ));
    Harness {
        gateway,
        previews,
        shared,
        holder,
        orchestrator,
    }
}

pub fn stored_profile() -> RemoteProfile {
    RemoteProfile {
        name: "Ann".into(),
        email: "ann@old.example.com".into(),
        phone: "080 1234".into(),
        image: Some("/uploads/ann.png".into()),
        address: Address {
            kind: "home".into(),
            address_line1: "12 MG Road".into(),
            city: "Mysuru".into(),
            state: "Karnataka".into(),
            country: "India".into(),
            zip: "570001".into(),
        },
    }
}

pub fn image_of(size: usize) -> SelectedImage {
    SelectedImage::new("portrait.png", "image/png", vec![0u8; size])
        .expect("png mime")
}
