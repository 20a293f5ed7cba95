use serde::{Deserialize, Serialize};

/// 最高星级
pub const MAX_STARS: u32 = 5;

/// 评分分布，1到5星各自的评论数量
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingDistribution {
    #[serde(rename = "1", alias = "one", default)]
    pub one: u32,
    #[serde(rename = "2", alias = "two", default)]
    pub two: u32,
    #[serde(rename = "3", alias = "three", default)]
    pub three: u32,
    #[serde(rename = "4", alias = "four", default)]
    pub four: u32,
    #[serde(rename = "5", alias = "five", default)]
    pub five: u32,
}

impl RatingDistribution {
    pub fn new(one: u32, two: u32, three: u32, four: u32, five: u32) -> Self {
        Self {
            one,
            two,
            three,
            four,
            five,
        }
    }

    /// 指定星级的评论数量，星级超出范围时为0
    pub fn count(&self, stars: u32) -> u32 {
        match stars {
            1 => self.one,
            2 => self.two,
            3 => self.three,
            4 => self.four,
            5 => self.five,
            _ => 0,
        }
    }

    /// 评论总数
    pub fn total(&self) -> u64 {
        (1..=MAX_STARS).map(|stars| self.count(stars) as u64).sum()
    }

    /// 总星数
    pub fn score(&self) -> u64 {
        (1..=MAX_STARS)
            .map(|stars| stars as u64 * self.count(stars) as u64)
            .sum()
    }

    /// 删除评论后的分布
    pub fn with_removals(&self, removals: &RemovalCounts) -> Self {
        Self {
            one: self.one.saturating_sub(removals.one),
            two: self.two.saturating_sub(removals.two),
            three: self.three.saturating_sub(removals.three),
            four: self.four.saturating_sub(removals.four),
            five: self.five,
        }
    }

    /// 增加五星评论后的分布
    pub fn with_five_star_additions(&self, additions: u32) -> Self {
        Self {
            five: self.five.saturating_add(additions),
            ..*self
        }
    }
}

/// 各星级删除数量，五星评论不会被删除
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalCounts {
    #[serde(rename = "1")]
    pub one: u32,
    #[serde(rename = "2")]
    pub two: u32,
    #[serde(rename = "3")]
    pub three: u32,
    #[serde(rename = "4")]
    pub four: u32,
}

impl RemovalCounts {
    pub fn get(&self, stars: u32) -> u32 {
        match stars {
            1 => self.one,
            2 => self.two,
            3 => self.three,
            4 => self.four,
            _ => 0,
        }
    }

    pub(crate) fn increment(&mut self, stars: u32) {
        match stars {
            1 => self.one += 1,
            2 => self.two += 1,
            3 => self.three += 1,
            4 => self.four += 1,
            _ => {}
        }
    }

    pub fn total(&self) -> u64 {
        [self.one, self.two, self.three, self.four]
            .iter()
            .map(|&count| count as u64)
            .sum()
    }
}

/// 调整策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentStrategy {
    /// 删除低星评论
    Remove,
    /// 增加五星评论
    Add,
}

/// 调整方案，每次请求重新计算，返回后不再修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentPlan {
    pub removals: RemovalCounts,
    pub additions: u32,
    /// 执行方案后的评分，保留两位小数；删光所有评论时为0
    pub projected_rating: f64,
    pub strategy: AdjustmentStrategy,
    /// 方案执行后是否达到目标评分
    pub target_reached: bool,
}

impl AdjustmentPlan {
    /// 需要改动的评论总数
    pub fn edit_count(&self) -> u64 {
        self.removals.total() + self.additions as u64
    }

    /// 对原分布执行方案
    pub fn apply(&self, distribution: &RatingDistribution) -> RatingDistribution {
        distribution
            .with_removals(&self.removals)
            .with_five_star_additions(self.additions)
    }
}
