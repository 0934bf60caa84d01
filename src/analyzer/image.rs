//! Image quality from precomputed blur, resolution and exposure metrics

use crate::{ImageInput, ImageMetrics, ImageQualityResult};

const BLUR_VARIANCE_THRESHOLD: f64 = 100.0;
const SHARP_POINTS: u8 = 4;
const MIN_PIXELS: u64 = 1_000_000;
const RESOLUTION_POINTS: u8 = 3;
const EXPOSURE_RANGE: (f64, f64) = (50.0, 200.0);
const EXPOSURE_POINTS: u8 = 3;
const MAX_QUALITY: u8 = 10;

impl ImageMetrics {
    pub fn is_blurry(&self) -> bool {
        self.laplacian_variance < BLUR_VARIANCE_THRESHOLD
    }

    pub fn resolution(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn well_exposed(&self) -> bool {
        self.brightness > EXPOSURE_RANGE.0 && self.brightness < EXPOSURE_RANGE.1
    }

    /// Quality points (0-10)
    pub fn quality_score(&self) -> u8 {
        let mut score = 0;
        if !self.is_blurry() {
            score += SHARP_POINTS;
        }
        if self.resolution() > MIN_PIXELS {
            score += RESOLUTION_POINTS;
        }
        if self.well_exposed() {
            score += EXPOSURE_POINTS;
        }
        score.min(MAX_QUALITY)
    }
}

/// Score the image attached to a product, if any
pub fn assess(image: Option<&ImageInput>) -> ImageQualityResult {
    match image {
        None => ImageQualityResult::absent(),
        Some(ImageInput::Score { quality_score }) => ImageQualityResult {
            has_image: true,
            quality_score: (*quality_score).clamp(0, MAX_QUALITY as i64) as u8,
            metrics: None,
        },
        Some(ImageInput::Metrics(metrics)) => ImageQualityResult {
            has_image: true,
            quality_score: metrics.quality_score(),
            metrics: Some(*metrics),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(width: u32, height: u32, variance: f64, brightness: f64) -> ImageMetrics {
        ImageMetrics {
            width,
            height,
            laplacian_variance: variance,
            brightness,
        }
    }

    #[test]
    fn test_sharp_large_well_exposed_scores_ten() {
        assert_eq!(metrics(1600, 1200, 250.0, 128.0).quality_score(), 10);
    }

    #[test]
    fn test_blurry_small_dark_scores_zero() {
        assert_eq!(metrics(640, 480, 20.0, 30.0).quality_score(), 0);
    }

    #[test]
    fn test_exactly_one_megapixel_does_not_count() {
        assert_eq!(metrics(1000, 1000, 100.0, 200.0).quality_score(), 4);
    }

    #[test]
    fn test_assess_absent_and_direct_score() {
        let absent = assess(None);
        assert!(!absent.has_image);
        assert_eq!(absent.quality_score, 0);

        let direct = assess(Some(&ImageInput::Score { quality_score: 14 }));
        assert!(direct.has_image);
        assert_eq!(direct.quality_score, 10);
    }

    #[test]
    fn test_direct_score_out_of_byte_range_is_clamped() {
        assert_eq!(assess(Some(&ImageInput::Score { quality_score: 1000 })).quality_score, 10);
        assert_eq!(assess(Some(&ImageInput::Score { quality_score: -3 })).quality_score, 0);
    }

    #[test]
    fn test_assess_metrics_keeps_metrics() {
        let m = metrics(800, 600, 150.0, 100.0);
        let result = assess(Some(&ImageInput::Metrics(m)));
        assert_eq!(result.quality_score, 7);
        assert_eq!(result.metrics, Some(m));
    }
}
