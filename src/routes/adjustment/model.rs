use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::optimizer::{AdjustmentPlan, RatingDistribution, rounded_rating};

// 调用方给出的评分与分布计算结果的允许误差
const RATING_TOLERANCE: f64 = 0.01;

/// 评分调整请求
#[derive(Debug, Deserialize)]
pub struct AdjustmentRequest {
    pub distribution: RatingDistribution,
    #[serde(default)]
    pub current_rating: Option<f64>,
    pub target_rating: f64,
}

/// 评分调整响应
#[derive(Debug, Serialize)]
pub struct AdjustmentResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_id: Option<String>,
    pub current_rating: f64,
    pub target_rating: f64,
    pub distribution: RatingDistribution,
    pub plan: AdjustmentPlan,
}

/// 校验调整请求，返回按分布重新计算的当前评分
///
/// 分布与调用方给出的评分不一致时以分布为准。
/// 评论总数超过 `max_total` 的分布直接拒绝。
pub fn validate_adjustment(
    distribution: &RatingDistribution,
    current_rating: Option<f64>,
    target_rating: f64,
    max_total: u64,
) -> Result<f64, ValidationError> {
    if !target_rating.is_finite() || target_rating <= 0.0 || target_rating > 5.0 {
        return Err(ValidationError::TargetOutOfRange(target_rating));
    }

    let total = distribution.total();
    if total == 0 {
        return Err(ValidationError::EmptyDistribution);
    }
    if total > max_total {
        return Err(ValidationError::DistributionTooLarge {
            total,
            max: max_total,
        });
    }

    let current = rounded_rating(distribution.score(), total);
    if let Some(reported) = current_rating {
        if (reported - current).abs() > RATING_TOLERANCE {
            tracing::warn!(
                "Reported rating {} disagrees with distribution ({}), using distribution",
                reported,
                current
            );
        }
    }

    if target_rating <= current {
        return Err(ValidationError::TargetNotAboveCurrent {
            target: target_rating,
            current,
        });
    }

    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::MAX_DISTRIBUTION_TOTAL;

    #[test]
    fn distribution_overrides_reported_rating() {
        let distribution = RatingDistribution::new(18, 28, 45, 67, 89);
        assert_eq!(validate_adjustment(&distribution, Some(3.8), 4.0, MAX_DISTRIBUTION_TOTAL), Ok(3.73));
    }

    #[test]
    fn rejects_target_not_above_current() {
        let distribution = RatingDistribution::new(0, 0, 0, 1, 1);
        assert_eq!(
            validate_adjustment(&distribution, None, 4.5, MAX_DISTRIBUTION_TOTAL),
            Err(ValidationError::TargetNotAboveCurrent {
                target: 4.5,
                current: 4.5
            })
        );
    }

    #[test]
    fn rejects_out_of_range_and_empty() {
        let distribution = RatingDistribution::new(1, 0, 0, 0, 0);
        assert!(matches!(
            validate_adjustment(&distribution, None, 5.5, MAX_DISTRIBUTION_TOTAL),
            Err(ValidationError::TargetOutOfRange(_))
        ));
        assert!(matches!(
            validate_adjustment(&distribution, None, f64::NAN, MAX_DISTRIBUTION_TOTAL),
            Err(ValidationError::TargetOutOfRange(_))
        ));
        assert_eq!(
            validate_adjustment(&RatingDistribution::default(), None, 4.0, MAX_DISTRIBUTION_TOTAL),
            Err(ValidationError::EmptyDistribution)
        );
    }

    #[test]
    fn rejects_distribution_above_limit() {
        let distribution = RatingDistribution::new(u32::MAX, u32::MAX, 0, 0, 1);
        assert_eq!(
            validate_adjustment(&distribution, None, 5.0, MAX_DISTRIBUTION_TOTAL),
            Err(ValidationError::DistributionTooLarge {
                total: 2 * u32::MAX as u64 + 1,
                max: MAX_DISTRIBUTION_TOTAL
            })
        );

        let distribution = RatingDistribution::new(60, 0, 0, 0, 40);
        assert!(matches!(
            validate_adjustment(&distribution, None, 4.0, 99),
            Err(ValidationError::DistributionTooLarge { total: 100, max: 99 })
        ));
        assert_eq!(validate_adjustment(&distribution, None, 4.0, 100), Ok(2.6));
    }
}
