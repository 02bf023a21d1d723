pub mod emailjs;
pub mod fs;
pub mod presenters;

pub use emailjs::{DryRunDelivery, EmailJsClient, EMAILJS_DEFAULT_URL};
pub use fs::{load_photo, write_jpeg, SystemClock};
pub use presenters::{present_options, present_reduction, present_status};

use std::io::Cursor;

use facility_report_application::{ApplicationError, ImageCodec};
use facility_report_domain::{Bitmap, ImageDimensions};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{ColorType, RgbImage};

#[derive(Debug, Default)]
pub struct ImageCrateCodec;

impl ImageCodec for ImageCrateCodec {
    fn decode(&self, bytes: &[u8]) -> Result<Bitmap, ApplicationError> {
        let image = image::io::Reader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|error| ApplicationError::Decode(error.to_string()))?
            .decode()
            .map_err(|error| ApplicationError::Decode(error.to_string()))?;

        let rgb = image.to_rgb8();
        Ok(Bitmap {
            dimensions: ImageDimensions::new(rgb.width(), rgb.height())?,
            rgb: rgb.into_raw(),
        })
    }

    fn resize(
        &self,
        bitmap: &Bitmap,
        target: ImageDimensions,
    ) -> Result<Bitmap, ApplicationError> {
        let source = to_buffer(bitmap)?;
        let resized = imageops::resize(&source, target.width, target.height, FilterType::Triangle);
        Ok(Bitmap {
            dimensions: target,
            rgb: resized.into_raw(),
        })
    }

    fn encode_jpeg(&self, bitmap: &Bitmap, quality: f32) -> Result<Vec<u8>, ApplicationError> {
        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, jpeg_quality(quality))
            .encode(
                &bitmap.rgb,
                bitmap.dimensions.width,
                bitmap.dimensions.height,
                ColorType::Rgb8,
            )
            .map_err(|error| ApplicationError::Encode(error.to_string()))?;
        Ok(jpeg)
    }
}

// Maps the 0..1 quality factor onto libjpeg's 1..=100 scale.
fn jpeg_quality(quality: f32) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

fn to_buffer(bitmap: &Bitmap) -> Result<RgbImage, ApplicationError> {
    let ImageDimensions { width, height } = bitmap.dimensions;
    RgbImage::from_raw(width, height, bitmap.rgb.clone()).ok_or_else(|| {
        ApplicationError::Decode(format!(
            "bitmap holds {} bytes, expected {} for {width}x{height}",
            bitmap.rgb.len(),
            bitmap.dimensions.pixel_count() * 3
        ))
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use facility_report_application::ImageReducer;
    use facility_report_domain::{encoded_size_kb, CompressionStage, RawImage, ReductionPolicy};
    use image::Rgb;

    use super::*;

    fn bitmap(width: u32, height: u32) -> Bitmap {
        let buffer = RgbImage::from_fn(width, height, |_x, _y| Rgb([90_u8, 120_u8, 150_u8]));
        Bitmap {
            dimensions: ImageDimensions::new(width, height).expect("dims"),
            rgb: buffer.into_raw(),
        }
    }

    #[test]
    fn quality_factor_maps_to_jpeg_scale() {
        assert_eq!(jpeg_quality(0.5), 50);
        assert_eq!(jpeg_quality(0.3), 30);
        assert_eq!(jpeg_quality(0.0), 1);
        assert_eq!(jpeg_quality(1.2), 100);
    }

    #[test]
    fn encoded_jpeg_decodes_back_to_same_dimensions() {
        let codec = ImageCrateCodec;
        let jpeg = codec.encode_jpeg(&bitmap(64, 48), 0.5).expect("encode");
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);

        let decoded = codec.decode(&jpeg).expect("decode");
        assert_eq!(decoded.dimensions, ImageDimensions { width: 64, height: 48 });
        assert_eq!(decoded.rgb.len(), 64 * 48 * 3);
    }

    #[test]
    fn resize_produces_requested_dimensions() {
        let codec = ImageCrateCodec;
        let target = ImageDimensions { width: 30, height: 20 };
        let resized = codec.resize(&bitmap(90, 60), target).expect("resize");
        assert_eq!(resized.dimensions, target);
        assert_eq!(resized.rgb.len(), 30 * 20 * 3);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let result = ImageCrateCodec.decode(b"definitely not an image");
        assert!(matches!(result, Err(ApplicationError::Decode(_))));
    }

    #[test]
    fn mismatched_bitmap_is_rejected() {
        let broken = Bitmap {
            dimensions: ImageDimensions { width: 10, height: 10 },
            rgb: vec![0_u8; 12],
        };
        let result = ImageCrateCodec.resize(&broken, ImageDimensions { width: 5, height: 5 });
        assert!(matches!(result, Err(ApplicationError::Decode(_))));
    }

    #[test]
    fn large_photo_is_fitted_and_compressed_end_to_end() {
        let codec = Arc::new(ImageCrateCodec);
        let source = codec.encode_jpeg(&bitmap(1200, 800), 0.9).expect("source jpeg");
        let reducer = ImageReducer::new(codec, ReductionPolicy::default());

        let reduction = reducer
            .reduce(&RawImage::new(source, "image/jpeg"))
            .expect("reduce");

        assert_eq!(reduction.source, ImageDimensions { width: 1200, height: 800 });
        assert_eq!(reduction.output, ImageDimensions { width: 600, height: 400 });
        assert_eq!(reduction.final_stage(), Some(CompressionStage::Initial));
        assert!(reduction.image.data_uri().starts_with("data:image/jpeg;base64,"));
        assert_eq!(
            reduction.image.size_kb(),
            encoded_size_kb(reduction.image.data_uri().len())
        );
        assert!(!reduction.image.exceeds(35.0));
    }
}
