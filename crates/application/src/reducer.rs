use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use facility_report_domain::{
    Bitmap, CompressionAttempt, CompressionStage, EncodedImage, ImageDimensions, RawImage,
    Reduction, ReductionPolicy,
};
use tracing::debug;

use crate::{ApplicationError, ImageCodec};

const JPEG_DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

/// Runs the fixed three-step compression ladder: the fitted image at the
/// initial quality, the same image at the fallback quality, then a
/// downscaled copy at the fallback quality. Stops at the first result under
/// the ceiling; the last step is accepted whatever its size.
pub struct ImageReducer {
    codec: Arc<dyn ImageCodec>,
    policy: ReductionPolicy,
}

impl ImageReducer {
    pub fn new(codec: Arc<dyn ImageCodec>, policy: ReductionPolicy) -> Self {
        Self { codec, policy }
    }

    pub fn reduce(&self, raw: &RawImage) -> Result<Reduction, ApplicationError> {
        raw.ensure_within(self.policy.max_input_bytes)?;

        let decoded = self.codec.decode(raw.bytes())?;
        let source = decoded.dimensions;
        let fitted_dimensions = source.fit_within(self.policy.max_dimension);
        let fitted = if fitted_dimensions == source {
            decoded
        } else {
            self.codec.resize(&decoded, fitted_dimensions)?
        };

        let mut attempts = Vec::with_capacity(CompressionStage::LADDER.len());

        let image = self.attempt(CompressionStage::Initial, &fitted, &mut attempts)?;
        if !image.exceeds(self.policy.ceiling_kb) {
            return Ok(finish(image, source, &fitted, attempts));
        }

        let image = self.attempt(CompressionStage::Requality, &fitted, &mut attempts)?;
        if !image.exceeds(self.policy.ceiling_kb) {
            return Ok(finish(image, source, &fitted, attempts));
        }

        let smaller = self.codec.resize(
            &fitted,
            fitted.dimensions.scale(self.policy.downscale_factor),
        )?;
        let image = self.attempt(CompressionStage::Downscale, &smaller, &mut attempts)?;
        Ok(finish(image, source, &smaller, attempts))
    }

    fn attempt(
        &self,
        stage: CompressionStage,
        bitmap: &Bitmap,
        attempts: &mut Vec<CompressionAttempt>,
    ) -> Result<EncodedImage, ApplicationError> {
        let quality = self.policy.quality_for(stage);
        let jpeg = self.codec.encode_jpeg(bitmap, quality)?;
        let image = EncodedImage::from_data_uri(format!(
            "{JPEG_DATA_URI_PREFIX}{}",
            STANDARD.encode(jpeg)
        ));

        debug!(
            stage = stage.label(),
            quality,
            width = bitmap.dimensions.width,
            height = bitmap.dimensions.height,
            size_kb = %format!("{:.2}", image.size_kb()),
            "photo compression attempt"
        );

        attempts.push(CompressionAttempt {
            stage,
            dimensions: bitmap.dimensions,
            quality,
            size_kb: image.size_kb(),
        });
        Ok(image)
    }
}

fn finish(
    image: EncodedImage,
    source: ImageDimensions,
    output: &Bitmap,
    attempts: Vec<CompressionAttempt>,
) -> Reduction {
    Reduction {
        image,
        source,
        output: output.dimensions,
        attempts,
    }
}
