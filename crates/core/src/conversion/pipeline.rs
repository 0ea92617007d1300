//! Batch conversion: per-file fan-out with first-failure-wins semantics.

use futures::future::try_join_all;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::error::{BatchFailure, ConversionError, ConversionStage};
use super::types::{ConvertedFileResult, UploadedFile};
use crate::codec::{ConversionOptions, ImageCodec};
use crate::format::{AcceptedInputTypes, SupportedFormat};
use crate::metrics::{BATCHES_TOTAL, CONVERSIONS_TOTAL, CONVERSION_DURATION, CONVERTED_BYTES_TOTAL};

/// Converts every file of an upload through an [`ImageCodec`].
///
/// All files of a batch run concurrently. The first failure resolves the
/// batch; futures still pending at that point are dropped and their results
/// discarded, so callers get either every result or none.
pub struct ConversionPipeline {
    codec: Arc<dyn ImageCodec>,
    accepted: AcceptedInputTypes,
}

impl ConversionPipeline {
    pub fn new(codec: Arc<dyn ImageCodec>, accepted: AcceptedInputTypes) -> Self {
        Self { codec, accepted }
    }

    /// Name of the codec backing this pipeline.
    pub fn codec_name(&self) -> &str {
        self.codec.name()
    }

    pub fn accepted_input_types(&self) -> &AcceptedInputTypes {
        &self.accepted
    }

    /// Converts all files to `format`. Results keep submission order.
    pub async fn convert_batch(
        &self,
        files: Vec<UploadedFile>,
        format: SupportedFormat,
        options: ConversionOptions,
    ) -> Result<Vec<ConvertedFileResult>, BatchFailure> {
        let start = Instant::now();
        let file_count = files.len();

        let tasks = files
            .into_iter()
            .map(|file| self.convert_file(file, format, options));
        let outcome = try_join_all(tasks).await;

        let elapsed_ms = start.elapsed().as_millis() as u64;
        match &outcome {
            Ok(results) => {
                BATCHES_TOTAL.with_label_values(&["success"]).inc();
                info!(
                    files = results.len(),
                    format = %format,
                    quality = options.quality,
                    lossless = options.lossless,
                    elapsed_ms,
                    "Batch converted"
                );
            }
            Err(failure) => {
                BATCHES_TOTAL.with_label_values(&["failed"]).inc();
                warn!(
                    files = file_count,
                    format = %format,
                    file = %failure.file_name,
                    stage = %failure.stage,
                    error = %failure.error,
                    elapsed_ms,
                    "Batch aborted"
                );
            }
        }

        outcome
    }

    async fn convert_file(
        &self,
        file: UploadedFile,
        format: SupportedFormat,
        options: ConversionOptions,
    ) -> Result<ConvertedFileResult, BatchFailure> {
        let start = Instant::now();
        let result = self.run_stages(&file, format, &options).await;

        CONVERSION_DURATION
            .with_label_values(&[format.as_str()])
            .observe(start.elapsed().as_secs_f64());

        match &result {
            Ok(converted) => {
                CONVERSIONS_TOTAL
                    .with_label_values(&[format.as_str(), "success"])
                    .inc();
                CONVERTED_BYTES_TOTAL
                    .with_label_values(&[format.as_str()])
                    .inc_by(converted.size as u64);
                debug!(
                    file = %file.name,
                    output = %converted.name,
                    original_bytes = file.data.len(),
                    converted_bytes = converted.size,
                    "File converted"
                );
            }
            Err(failure) => {
                CONVERSIONS_TOTAL
                    .with_label_values(&[format.as_str(), "failed"])
                    .inc();
                warn!(
                    file = %file.name,
                    content_type = %file.content_type,
                    stage = %failure.stage,
                    error = %failure.error,
                    "File conversion failed"
                );
            }
        }

        result
    }

    async fn run_stages(
        &self,
        file: &UploadedFile,
        format: SupportedFormat,
        options: &ConversionOptions,
    ) -> Result<ConvertedFileResult, BatchFailure> {
        let fail = |stage: ConversionStage, error: ConversionError| {
            BatchFailure::new(file.name.clone(), stage, error)
        };

        if !self.accepted.is_acceptable(&file.content_type) {
            return Err(fail(
                ConversionStage::TypeCheck,
                ConversionError::UnsupportedFileType {
                    content_type: file.content_type.clone(),
                },
            ));
        }

        let original = self
            .codec
            .inspect(file.data.clone())
            .await
            .map_err(|e| fail(ConversionStage::InspectOriginal, e.into()))?;

        let output = self
            .codec
            .encode(file.data.clone(), format, options)
            .await
            .map_err(|e| fail(ConversionStage::Encode, e.into()))?;

        let converted = self
            .codec
            .inspect(output.clone())
            .await
            .map_err(|e| fail(ConversionStage::InspectConverted, e.into()))?;

        if converted.format != format.codec_name() {
            return Err(fail(
                ConversionStage::InspectConverted,
                ConversionError::internal(format!(
                    "codec produced {} instead of {}",
                    converted.format,
                    format.codec_name()
                )),
            ));
        }

        Ok(ConvertedFileResult::new(
            file, format, &output, original, converted,
        ))
    }
}
