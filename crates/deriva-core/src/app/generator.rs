//! DerivativeGenerator: the derivative pipeline for one object.
//!
//! ```text
//! should_generate ──no──▶ Skipped
//!       │yes
//!   extract OBJ ──err──▶ NoSourceDatastream
//!       │
//!   copy + scale ──err──▶ ScaleFailure        (extracted file deleted)
//!       │
//!   write ──err──▶ WriteFailure               (extracted file deleted,
//!       │                                      scaled copy left on disk)
//!    Success                                  (both files deleted)
//! ```

use std::sync::Arc;

use tracing::{error, info, info_span, warn};

use crate::domain::{DerivativeKind, OutcomeRecord, Pid, UpscalePolicy, error_chain};
use crate::ports::{
    Clock, ConfigSource, CurrentUser, ImageCodec, MimeRegistry, ObjectStore, TempFileService,
};

use super::decision::should_generate;
use super::extractor::{ExtractError, ExtractedSource, SourceExtractor};
use super::scaler::ImageScaler;
use super::writer::DatastreamWriter;

/// Entry point used by the host to produce derivatives.
///
/// Built with [`GeneratorBuilder`](super::GeneratorBuilder). Never returns an
/// error: every failure is logged and folded into the `OutcomeRecord`.
pub struct DerivativeGenerator {
    pub(crate) store: Arc<dyn ObjectStore>,
    pub(crate) temp_files: Arc<dyn TempFileService>,
    pub(crate) codec: Arc<dyn ImageCodec>,
    pub(crate) mime: Arc<dyn MimeRegistry>,
    pub(crate) config: Arc<dyn ConfigSource>,
    pub(crate) user: Arc<dyn CurrentUser>,
    pub(crate) clock: Arc<dyn Clock>,
}

impl DerivativeGenerator {
    /// `TN`: 200x200, upscaling always allowed.
    pub fn create_thumbnail(&self, pid: &Pid, force: bool) -> OutcomeRecord {
        self.generate(DerivativeKind::Thumbnail, pid, force)
    }

    /// `MEDIUM_SIZE`: 500x700, upscaling gated by `basic_image.upscale_images`.
    pub fn create_medium_size(&self, pid: &Pid, force: bool) -> OutcomeRecord {
        self.generate(DerivativeKind::MediumSize, pid, force)
    }

    /// Every kind in turn, in [`DerivativeKind::ALL`] order.
    pub fn generate_all(&self, pid: &Pid, force: bool) -> Vec<(DerivativeKind, OutcomeRecord)> {
        DerivativeKind::ALL
            .into_iter()
            .map(|kind| (kind, self.generate(kind, pid, force)))
            .collect()
    }

    pub fn generate(&self, kind: DerivativeKind, pid: &Pid, force: bool) -> OutcomeRecord {
        let dsid = kind.datastream_id();
        let span = info_span!("derivative", pid = %pid, dsid = %dsid, force);
        let _entered = span.enter();

        if !should_generate(&*self.store, pid, &dsid, force) {
            info!("derivative already present, skipping");
            return OutcomeRecord::skipped();
        }

        let extracted = match self.extractor().extract(pid) {
            Ok(extracted) => extracted,
            Err(ExtractError::NoSource(_)) => {
                warn!("no OBJ datastream, nothing to derive from");
                return OutcomeRecord::no_source(pid);
            }
            Err(e) => {
                let reason = error_chain(&e);
                error!(error = %reason, "could not extract OBJ");
                return OutcomeRecord::source_unreadable(pid, reason);
            }
        };

        let outcome = self.derive(kind, pid, &extracted);

        let path = extracted.temp_file.path().to_path_buf();
        if let Err(e) = self.temp_files.delete(extracted.temp_file) {
            warn!(
                path = %path.display(),
                error = %error_chain(&e),
                "could not delete extracted OBJ"
            );
        }
        outcome
    }

    fn derive(
        &self,
        kind: DerivativeKind,
        pid: &Pid,
        extracted: &ExtractedSource,
    ) -> OutcomeRecord {
        let dsid = kind.datastream_id();

        // Both kinds share the `TN` working name.
        let working_name = format!("{}TN.{}", extracted.base_name, extracted.extension);
        let working = match self.temp_files.copy(&extracted.temp_file, &working_name) {
            Ok(file) => file,
            Err(e) => {
                error!(error = %error_chain(&e), "could not copy OBJ for scaling");
                return OutcomeRecord::scale_failure(pid, &dsid);
            }
        };

        let (width, height) = kind.target_size();
        let allow_upscale = match kind.upscale() {
            UpscalePolicy::Always => true,
            UpscalePolicy::FromConfig(key) => self.config.get_bool(key),
        };
        let scaler = ImageScaler {
            codec: &*self.codec,
        };
        if !scaler.scale(working.path(), width, height, allow_upscale) {
            let path = working.path().to_path_buf();
            if let Err(e) = self.temp_files.delete(working) {
                warn!(
                    path = %path.display(),
                    error = %error_chain(&e),
                    "could not delete working copy"
                );
            }
            return OutcomeRecord::scale_failure(pid, &dsid);
        }

        let writer = DatastreamWriter {
            store: &*self.store,
            temp_files: &*self.temp_files,
        };
        match writer.write(pid, &dsid, working) {
            Ok(()) => {
                info!(width, height, allow_upscale, "derivative written");
                OutcomeRecord::success(pid, &dsid)
            }
            Err(failure) => {
                warn!(path = %failure.source.path().display(), "scaled copy left on disk");
                OutcomeRecord::write_failure(failure.message)
            }
        }
    }

    fn extractor(&self) -> SourceExtractor<'_> {
        SourceExtractor {
            store: &*self.store,
            mime: &*self.mime,
            temp_files: &*self.temp_files,
            user: &*self.user,
            clock: &*self.clock,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::{
        FailingReads, FailingWrites, FaultyTempFiles, Fixture, TempFault, decoded_size, png_bytes,
    };
    use crate::domain::{
        Channel, ControlGroup, Datastream, DatastreamId, OutcomeKind, UPSCALE_IMAGES_KEY,
    };
    use crate::impls::MapConfig;
    use rstest::rstest;

    #[rstest]
    #[case::thumbnail(DerivativeKind::Thumbnail)]
    #[case::medium(DerivativeKind::MediumSize)]
    fn missing_obj_reports_no_source_and_writes_nothing(#[case] kind: DerivativeKind) {
        let fx = Fixture::without_obj();
        let outcome = fx.generator(MapConfig::new()).generate(kind, &fx.pid, false);

        assert_eq!(outcome.kind(), OutcomeKind::NoSourceDatastream);
        assert!(!outcome.is_success());
        assert!(fx.datastream(&kind.datastream_id()).is_none());
        assert_eq!(fx.temp_file_count(), 0);
    }

    #[rstest]
    #[case::thumbnail(DerivativeKind::Thumbnail)]
    #[case::medium(DerivativeKind::MediumSize)]
    fn existing_derivative_is_left_alone_without_force(#[case] kind: DerivativeKind) {
        // A corrupt OBJ would fail scaling if the pipeline ran at all.
        let fx = Fixture::with_obj("image/png", b"corrupt".to_vec());
        let existing = Datastream::new(kind.datastream_id(), ControlGroup::Managed)
            .with_content("image/jpeg", b"old".to_vec());
        fx.store.ingest(&fx.pid, existing.clone()).unwrap();

        let outcome = fx.generator(MapConfig::new()).generate(kind, &fx.pid, false);

        assert_eq!(outcome.kind(), OutcomeKind::Skipped);
        assert!(outcome.is_success());
        assert!(outcome.messages().is_empty());
        assert_eq!(fx.datastream(&kind.datastream_id()), Some(existing));
        assert_eq!(fx.temp_file_count(), 0);
    }

    #[test]
    fn force_overwrites_existing_derivative() {
        let fx = Fixture::with_obj("image/png", png_bytes(1000, 500));
        let existing = Datastream::new(DatastreamId::TN, ControlGroup::Managed)
            .with_content("image/png", b"old".to_vec());
        fx.store.ingest(&fx.pid, existing).unwrap();

        let outcome = fx.generator(MapConfig::new()).create_thumbnail(&fx.pid, true);

        assert_eq!(outcome.kind(), OutcomeKind::Success);
        let tn = fx.datastream(&DatastreamId::TN).unwrap();
        assert_eq!(tn.mime_type, "image/png");
        assert_eq!(decoded_size(&tn.content), (200, 100));
    }

    #[test]
    fn force_updates_changed_mime_type() {
        let fx = Fixture::with_obj("image/png", png_bytes(300, 300));
        let existing = Datastream::new(DatastreamId::TN, ControlGroup::Managed)
            .with_content("image/jpeg", b"old".to_vec());
        fx.store.ingest(&fx.pid, existing).unwrap();

        fx.generator(MapConfig::new()).create_thumbnail(&fx.pid, true);

        assert_eq!(fx.datastream(&DatastreamId::TN).unwrap().mime_type, "image/png");
    }

    #[test]
    fn thumbnail_success_writes_one_datastream_and_cleans_up() {
        let fx = Fixture::with_obj("image/png", png_bytes(1000, 500));
        let obj_before = fx.datastream(&DatastreamId::OBJ).unwrap();

        let outcome = fx.generator(MapConfig::new()).create_thumbnail(&fx.pid, false);

        assert_eq!(outcome.kind(), OutcomeKind::Success);
        let user: Vec<_> = outcome.messages_for(Channel::User).collect();
        assert_eq!(user.len(), 1);
        assert_eq!(user[0].render(), "Created TN derivative for demo:1.");

        let tn = fx.datastream(&DatastreamId::TN).unwrap();
        assert_eq!(tn.control_group, ControlGroup::Managed);
        assert_eq!(tn.label, "TN");
        assert_eq!(decoded_size(&tn.content), (200, 100));
        assert!(fx.datastream(&DatastreamId::MEDIUM_SIZE).is_none());
        assert_eq!(fx.datastream(&DatastreamId::OBJ).unwrap(), obj_before);
        assert_eq!(fx.temp_file_count(), 0);
    }

    #[test]
    fn small_thumbnail_source_is_upscaled() {
        let fx = Fixture::with_obj("image/png", png_bytes(50, 25));
        fx.generator(MapConfig::new()).create_thumbnail(&fx.pid, false);
        let tn = fx.datastream(&DatastreamId::TN).unwrap();
        assert_eq!(decoded_size(&tn.content), (200, 100));
    }

    #[rstest]
    #[case::upscale_disabled(false, (100, 140))]
    #[case::upscale_enabled(true, (500, 700))]
    fn medium_size_respects_upscale_flag(#[case] upscale: bool, #[case] expected: (u32, u32)) {
        let fx = Fixture::with_obj("image/png", png_bytes(100, 140));
        let config = MapConfig::new().with(UPSCALE_IMAGES_KEY, upscale);

        let outcome = fx.generator(config).create_medium_size(&fx.pid, false);

        assert_eq!(outcome.kind(), OutcomeKind::Success);
        let medium = fx.datastream(&DatastreamId::MEDIUM_SIZE).unwrap();
        assert_eq!(decoded_size(&medium.content), expected);
        assert!(fx.datastream(&DatastreamId::TN).is_none());
        assert_eq!(fx.temp_file_count(), 0);
    }

    #[test]
    fn medium_size_downscales_large_images_regardless_of_flag() {
        let fx = Fixture::with_obj("image/png", png_bytes(1200, 800));
        fx.generator(MapConfig::new()).create_medium_size(&fx.pid, false);
        let medium = fx.datastream(&DatastreamId::MEDIUM_SIZE).unwrap();
        assert_eq!(decoded_size(&medium.content), (500, 333));
    }

    #[rstest]
    #[case::thumbnail(DerivativeKind::Thumbnail)]
    #[case::medium(DerivativeKind::MediumSize)]
    fn undecodable_source_is_a_scale_failure(#[case] kind: DerivativeKind) {
        let fx = Fixture::with_obj("image/jpeg", b"\xff\xd8\xff\xe0 truncated".to_vec());

        let outcome = fx.generator(MapConfig::new()).generate(kind, &fx.pid, false);

        assert_eq!(outcome.kind(), OutcomeKind::ScaleFailure);
        assert!(!outcome.is_success());
        assert!(fx.datastream(&kind.datastream_id()).is_none());
        assert_eq!(fx.temp_file_count(), 0);
    }

    #[rstest]
    #[case::thumbnail(DerivativeKind::Thumbnail)]
    #[case::medium(DerivativeKind::MediumSize)]
    fn store_error_is_a_write_failure_and_leaves_the_scaled_copy(#[case] kind: DerivativeKind) {
        let fx = Fixture::with_obj("image/png", png_bytes(300, 300));
        let generator = fx
            .builder(MapConfig::new())
            .store(Arc::new(FailingWrites::new(fx.store.clone())))
            .build()
            .unwrap();

        let outcome = generator.generate(kind, &fx.pid, false);

        assert_eq!(outcome.kind(), OutcomeKind::WriteFailure);
        let log: Vec<_> = outcome.messages_for(Channel::Log).collect();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].render(), "store backend error: disk quota exceeded");
        assert!(fx.datastream(&kind.datastream_id()).is_none());
        // Both kinds scale into the `TN`-suffixed working copy.
        assert_eq!(fx.temp_file_names(), vec!["demo_1TN.png".to_string()]);
    }

    #[rstest]
    #[case::thumbnail(DerivativeKind::Thumbnail)]
    #[case::medium(DerivativeKind::MediumSize)]
    fn unreadable_obj_reports_no_source_with_the_read_error(#[case] kind: DerivativeKind) {
        let fx = Fixture::with_obj("image/png", png_bytes(300, 300));
        let generator = fx
            .builder(MapConfig::new())
            .store(Arc::new(FailingReads::new(fx.store.clone())))
            .build()
            .unwrap();

        let outcome = generator.generate(kind, &fx.pid, false);

        assert_eq!(outcome.kind(), OutcomeKind::NoSourceDatastream);
        assert!(!outcome.is_success());
        let user: Vec<_> = outcome.messages_for(Channel::User).collect();
        assert!(!user[0].render().contains("uploaded"));
        let log: Vec<_> = outcome.messages_for(Channel::Log).collect();
        assert_eq!(
            log[0].render(),
            "failed to read the OBJ datastream of demo:1: \
             store I/O failed at /repo/demo:1/OBJ.bin: permission denied"
        );
        assert!(fx.datastream(&kind.datastream_id()).is_none());
        assert_eq!(fx.temp_file_count(), 0);
    }

    #[test]
    fn temp_file_creation_failure_reports_no_source() {
        let fx = Fixture::with_obj("image/png", png_bytes(300, 300));
        let faulty = FaultyTempFiles::new(fx.temp_files.clone(), TempFault::Create);
        let generator = fx
            .builder(MapConfig::new())
            .temp_files(Arc::new(faulty))
            .build()
            .unwrap();

        let outcome = generator.create_thumbnail(&fx.pid, false);

        assert_eq!(outcome.kind(), OutcomeKind::NoSourceDatastream);
        let log: Vec<_> = outcome.messages_for(Channel::Log).collect();
        assert!(log[0].render().ends_with("demo_1OBJ.png: read-only volume"));
        assert!(fx.datastream(&DatastreamId::TN).is_none());
        assert_eq!(fx.temp_file_count(), 0);
    }

    #[rstest]
    #[case::thumbnail(DerivativeKind::Thumbnail)]
    #[case::medium(DerivativeKind::MediumSize)]
    fn working_copy_failure_is_a_scale_failure(#[case] kind: DerivativeKind) {
        let fx = Fixture::with_obj("image/png", png_bytes(300, 300));
        let faulty = FaultyTempFiles::new(fx.temp_files.clone(), TempFault::Copy);
        let generator = fx
            .builder(MapConfig::new())
            .temp_files(Arc::new(faulty))
            .build()
            .unwrap();

        let outcome = generator.generate(kind, &fx.pid, false);

        assert_eq!(outcome.kind(), OutcomeKind::ScaleFailure);
        assert!(fx.datastream(&kind.datastream_id()).is_none());
        // The extracted OBJ copy is still released.
        assert_eq!(fx.temp_file_count(), 0);
    }

    #[test]
    fn generate_all_produces_both_renditions() {
        let fx = Fixture::with_obj("image/png", png_bytes(1000, 1000));
        let results = fx.generator(MapConfig::new()).generate_all(&fx.pid, false);

        let kinds: Vec<_> = results.iter().map(|(k, o)| (*k, o.kind())).collect();
        assert_eq!(
            kinds,
            vec![
                (DerivativeKind::Thumbnail, OutcomeKind::Success),
                (DerivativeKind::MediumSize, OutcomeKind::Success),
            ]
        );
        assert_eq!(
            decoded_size(&fx.datastream(&DatastreamId::TN).unwrap().content),
            (200, 200)
        );
        assert_eq!(
            decoded_size(&fx.datastream(&DatastreamId::MEDIUM_SIZE).unwrap().content),
            (500, 500)
        );
        assert_eq!(fx.temp_file_count(), 0);
    }
}
