// 评分调整计算
// 纯计算，不依赖缓存和节流，也不做输入校验

pub mod models;

pub use models::{
    AdjustmentPlan, AdjustmentStrategy, MAX_STARS, RatingDistribution, RemovalCounts,
};

/// 比较和展示用的小数位数
pub const RATING_PRECISION: i32 = 2;

/// 增加五星评论的最大尝试次数
pub const MAX_ADDITIONS: u32 = 1000;

/// 默认允许计算的评论总数上限，删除方案的计算量与评论数成正比
pub const MAX_DISTRIBUTION_TOTAL: u64 = 1_000_000;

/// 按指定小数位四舍五入
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// 保留两位小数的评分
pub fn rounded_rating(score: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_to(score as f64 / total as f64, RATING_PRECISION)
}

/// 计算达到目标评分的最少改动方案
///
/// 分别计算删除方案和增加方案，取改动数量更少的一个；
/// 删除方案未达到目标时使用增加方案。
/// 调用方需保证 `target_rating` 大于当前评分。
pub fn compute_adjustment(distribution: &RatingDistribution, target_rating: f64) -> AdjustmentPlan {
    if distribution.total() == 0 {
        return AdjustmentPlan {
            removals: RemovalCounts::default(),
            additions: 0,
            projected_rating: 0.0,
            strategy: AdjustmentStrategy::Remove,
            target_reached: false,
        };
    }

    let removal = removal_plan(distribution, target_rating);
    let addition = addition_plan(distribution, target_rating);

    tracing::debug!(
        "Adjustment candidates for target {}: remove {} ({}), add {} ({})",
        target_rating,
        removal.edit_count(),
        removal.projected_rating,
        addition.edit_count(),
        addition.projected_rating
    );

    match (removal.target_reached, addition.target_reached) {
        (true, true) if addition.edit_count() < removal.edit_count() => addition,
        (true, _) => removal,
        (false, _) => addition,
    }
}

/// 删除方案：从最低星级开始逐条删除，五星评论不删除
pub fn removal_plan(distribution: &RatingDistribution, target_rating: f64) -> AdjustmentPlan {
    let mut remaining = [
        distribution.one,
        distribution.two,
        distribution.three,
        distribution.four,
    ];
    let mut removals = RemovalCounts::default();
    let mut total = distribution.total();
    let mut score = distribution.score();

    while total > 0 && rounded_rating(score, total) < target_rating {
        // 只剩五星评论
        let Some(tier) = remaining.iter().position(|&count| count > 0) else {
            break;
        };

        remaining[tier] -= 1;
        let stars = tier as u32 + 1;
        removals.increment(stars);
        total -= 1;
        score -= stars as u64;
    }

    let projected_rating = rounded_rating(score, total);
    AdjustmentPlan {
        removals,
        additions: 0,
        projected_rating,
        strategy: AdjustmentStrategy::Remove,
        target_reached: total > 0 && projected_rating >= target_rating,
    }
}

/// 增加方案：逐条增加五星评论直到达到目标，最多 `MAX_ADDITIONS` 条
pub fn addition_plan(distribution: &RatingDistribution, target_rating: f64) -> AdjustmentPlan {
    let total = distribution.total();
    let score = distribution.score();
    let five = MAX_STARS as u64;

    let mut additions = 0u32;
    let mut projected_rating = rounded_rating(score, total);
    while projected_rating < target_rating && additions < MAX_ADDITIONS {
        additions += 1;
        let added = additions as u64;
        projected_rating = rounded_rating(score + added * five, total + added);
    }

    AdjustmentPlan {
        removals: RemovalCounts::default(),
        additions,
        projected_rating,
        strategy: AdjustmentStrategy::Add,
        target_reached: projected_rating >= target_rating,
    }
}
