//! Validation, image upload and persistence, in that order.

use std::fmt;
use std::sync::Arc;

use tracing::{error, info, warn};
use vitrine_model::RemoteProfile;

use crate::error::SaveError;
use crate::gateway::ProfileGateway;
use crate::state::ProfileStateHolder;
use crate::sync::ProfilePublisher;

/// What happened to the profile picture during a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOutcome {
    /// No new image was selected.
    Unchanged,
    Uploaded,
    /// The upload failed and the previously stored image was kept.
    FellBack,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub profile: RemoteProfile,
    pub image: ImageOutcome,
}

pub struct SaveOrchestrator {
    gateway: Arc<dyn ProfileGateway>,
    publisher: Arc<dyn ProfilePublisher>,
}

impl fmt::Debug for SaveOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SaveOrchestrator").finish_non_exhaustive()
    }
}

impl SaveOrchestrator {
    pub fn new(
        gateway: Arc<dyn ProfileGateway>,
        publisher: Arc<dyn ProfilePublisher>,
    ) -> Self {
        Self { gateway, publisher }
    }

    /// Run one save attempt against `holder`.
    ///
    /// Validation finishes before any request is sent. A failed upload
    /// does not abort the save; the last stored image is persisted
    /// instead. Only a persisted profile is published.
    pub async fn save(
        &self,
        holder: &ProfileStateHolder,
    ) -> Result<SaveReport, SaveError> {
        let ticket = holder.begin_save()?;

        let selection = ticket.upload.as_ref().map(|upload| upload.preview_id);
        let (image, outcome) = match ticket.upload {
            None => (ticket.fallback_image, ImageOutcome::Unchanged),
            Some(upload) => {
                match self.gateway.upload_image(&upload.image).await {
                    Ok(url) => (Some(url), ImageOutcome::Uploaded),
                    Err(err) => {
                        warn!(
                            error = %err,
                            cause = %err.0,
                            fallback = ?ticket.fallback_image,
                            "image upload failed, keeping stored image"
                        );
                        (ticket.fallback_image, ImageOutcome::FellBack)
                    }
                }
            }
        };

        holder.mark_persisting();
        let profile = ticket.draft.to_remote(image);

        if let Err(err) = self.gateway.persist_profile(&profile).await {
            error!(error = %err, cause = %err.0, "profile persist failed");
            holder.fail_save();
            return Err(err.into());
        }

        self.publisher.publish(profile.clone());
        holder.complete_save(&profile, selection);
        info!(image = ?outcome, "profile saved");

        Ok(SaveReport {
            profile,
            image: outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{ImageAssetManager, InMemoryPreviewStore, SelectedImage};
    use crate::gateway::{MockProfileGateway, TransportError};
    use crate::state::DisplayedImage;
    use crate::sync::SharedProfileStore;
    use url::Url;
    use vitrine_model::{FailureKind, Notice, ProfileField, SaveStatus};

    struct Fixture {
        store: Arc<InMemoryPreviewStore>,
        shared: SharedProfileStore,
        holder: ProfileStateHolder,
        orchestrator: SaveOrchestrator,
    }

    fn fixture(gateway: MockProfileGateway) -> Fixture {
        let gateway: Arc<dyn ProfileGateway> = Arc::new(gateway);
        let store = Arc::new(InMemoryPreviewStore::new());
        let shared = SharedProfileStore::new();
        let holder = ProfileStateHolder::new(
            gateway.clone(),
            ImageAssetManager::new(store.clone(), 800 * 1024),
            Url::parse("https://api.example.com/").unwrap(),
        );
        let orchestrator = SaveOrchestrator::new(gateway, Arc::new(shared.clone()));
        Fixture {
            store,
            shared,
            holder,
            orchestrator,
        }
    }

    fn stored() -> RemoteProfile {
        RemoteProfile {
            name: "Ann".into(),
            email: "ann@x.com".into(),
            phone: "12345".into(),
            image: Some("/uploads/old.png".into()),
            address: vitrine_model::Address {
                kind: "home".into(),
                address_line1: "1 Main Rd".into(),
                city: "Bengaluru".into(),
                state: "Karnataka".into(),
                country: "India".into(),
                zip: "560001".into(),
            },
        }
    }

    fn expect_load(gateway: &mut MockProfileGateway) {
        gateway.expect_fetch_profile().times(1).returning(|| Ok(stored()));
    }

    fn png() -> SelectedImage {
        SelectedImage::new("new.png", "image/png", vec![9u8; 32]).unwrap()
    }

    #[tokio::test]
    async fn upload_then_persist_with_new_image() {
        let mut gateway = MockProfileGateway::new();
        expect_load(&mut gateway);
        gateway
            .expect_upload_image()
            .withf(|image| image.file_name() == "new.png")
            .times(1)
            .returning(|_| Ok("/uploads/new.png".to_string()));
        gateway
            .expect_persist_profile()
            .withf(|p| p.image.as_deref() == Some("/uploads/new.png"))
            .times(1)
            .returning(|_| Ok(()));

        let fx = fixture(gateway);
        fx.holder.load().await.unwrap();
        fx.holder.select_image(png()).unwrap();

        let report = fx.orchestrator.save(&fx.holder).await.unwrap();

        assert_eq!(report.image, ImageOutcome::Uploaded);
        assert_eq!(fx.holder.status(), SaveStatus::Done);
        assert_eq!(fx.store.released().len(), 1);
        assert_eq!(fx.shared.current(), Some(report.profile.clone()));
        assert_eq!(fx.holder.remote(), Some(report.profile));
    }

    #[tokio::test]
    async fn upload_failure_falls_back_to_stored_image() {
        let mut gateway = MockProfileGateway::new();
        expect_load(&mut gateway);
        gateway.expect_upload_image().times(1).returning(|_| {
            Err(TransportError::Rejected("too slow".into()).into())
        });
        gateway
            .expect_persist_profile()
            .withf(|p| p.image.as_deref() == Some("/uploads/old.png"))
            .times(1)
            .returning(|_| Ok(()));

        let fx = fixture(gateway);
        fx.holder.load().await.unwrap();
        fx.holder.select_image(png()).unwrap();

        let report = fx.orchestrator.save(&fx.holder).await.unwrap();

        assert_eq!(report.image, ImageOutcome::FellBack);
        assert_eq!(fx.holder.status(), SaveStatus::Done);
        assert!(fx.holder.notice().is_none());
        assert_eq!(fx.store.released().len(), 1);
        assert_eq!(fx.store.live_count(), 0);
        assert_eq!(
            fx.holder.displayed_image(),
            DisplayedImage::Remote(
                Url::parse("https://api.example.com/uploads/old.png").unwrap()
            )
        );
    }

    #[tokio::test]
    async fn validation_failure_sends_nothing() {
        let mut gateway = MockProfileGateway::new();
        expect_load(&mut gateway);
        gateway.expect_upload_image().never();
        gateway.expect_persist_profile().never();

        let fx = fixture(gateway);
        fx.holder.load().await.unwrap();
        fx.holder.edit(ProfileField::Email, "ann-at-x");

        let err = fx.orchestrator.save(&fx.holder).await.unwrap_err();

        assert!(matches!(err, SaveError::Validation(ref e) if e.contains(ProfileField::Email)));
        assert_eq!(fx.holder.notice(), Some(Notice::CorrectErrors));
        assert!(fx.shared.current().is_none());
    }

    #[tokio::test]
    async fn persist_failure_is_surfaced_and_not_published() {
        let mut gateway = MockProfileGateway::new();
        expect_load(&mut gateway);
        gateway.expect_persist_profile().times(1).returning(|_| {
            Err(TransportError::Rejected("nope".into()).into())
        });

        let fx = fixture(gateway);
        fx.holder.load().await.unwrap();
        fx.holder.edit(ProfileField::Name, "Ann Lee");

        let err = fx.orchestrator.save(&fx.holder).await.unwrap_err();

        assert!(matches!(err, SaveError::Persist(_)));
        assert_eq!(fx.holder.status(), SaveStatus::Failed(FailureKind::Persist));
        assert_eq!(fx.holder.notice(), Some(Notice::SaveFailed));
        assert!(fx.shared.current().is_none());
        assert_eq!(fx.holder.remote(), Some(stored()));
    }

    #[tokio::test]
    async fn published_profile_keeps_phone_and_unchanged_image() {
        let mut gateway = MockProfileGateway::new();
        expect_load(&mut gateway);
        gateway.expect_upload_image().never();
        gateway.expect_persist_profile().times(1).returning(|_| Ok(()));

        let fx = fixture(gateway);
        fx.holder.load().await.unwrap();

        let report = fx.orchestrator.save(&fx.holder).await.unwrap();

        assert_eq!(report.image, ImageOutcome::Unchanged);
        assert_eq!(report.profile, stored());
    }
}
