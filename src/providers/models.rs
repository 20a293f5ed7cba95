// 上游数据模型
// 上游响应使用独立的结构体，经映射函数转换为内部类型，隔离上游格式变化

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, ValidationError};
use crate::optimizer::RatingDistribution;

/// 经纬度坐标
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// 校验坐标范围
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        if !valid {
            return Err(ValidationError::InvalidCoordinates {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// 地理编码结果
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeResult {
    pub coordinates: Coordinates,
    pub display_name: Option<String>,
}

/// 搜索区域：优先使用地理编码后的坐标，失败时使用原始地名
#[derive(Debug, Clone, PartialEq)]
pub enum SearchArea {
    Coordinates(Coordinates),
    Text(String),
}

/// 上游搜索方式
#[derive(Debug, Clone, PartialEq)]
pub enum SearchMode {
    /// 按商家名称匹配
    Name(String),
    /// 按描述全文匹配
    Term(String),
    /// 按分类ID匹配
    Categories(Vec<String>),
}

/// 商家搜索请求
#[derive(Debug, Clone, PartialEq)]
pub struct BusinessSearchRequest {
    pub mode: SearchMode,
    pub area: Option<SearchArea>,
    pub offset: u64,
    pub limit: u32,
}

/// 商家摘要信息
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BusinessSummary {
    pub id: String,
    pub name: String,
    pub rating: Option<f64>,
    pub review_count: u64,
    pub categories: Vec<String>,
    pub address: Option<String>,
    pub url: Option<String>,
    pub coordinates: Option<Coordinates>,
}

/// 一页搜索结果
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BusinessPage {
    pub businesses: Vec<BusinessSummary>,
    pub total: u64,
}

/// 商家评分及分布
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BusinessRating {
    pub business_id: String,
    /// 上游给出的评分，仅用于展示
    pub reported_rating: Option<f64>,
    pub distribution: RatingDistribution,
}

// ---------- 上游响应 ----------

/// 地理编码服务响应中的单个地点，经纬度为字符串
#[derive(Debug, Deserialize)]
pub struct UpstreamPlace {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// 商家搜索响应
#[derive(Debug, Deserialize)]
pub struct UpstreamSearchResponse {
    #[serde(default)]
    pub businesses: Vec<UpstreamBusiness>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Deserialize)]
pub struct UpstreamBusiness {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: Option<u64>,
    #[serde(default)]
    pub categories: Vec<UpstreamCategory>,
    #[serde(default)]
    pub location: Option<UpstreamLocation>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub coordinates: Option<UpstreamCoordinates>,
}

#[derive(Debug, Deserialize)]
pub struct UpstreamCategory {
    pub alias: String,
}

#[derive(Debug, Deserialize)]
pub struct UpstreamLocation {
    #[serde(default)]
    pub display_address: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpstreamCoordinates {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// 评分分布响应，分布的键为 "1" 到 "5"
#[derive(Debug, Deserialize)]
pub struct UpstreamRatingResponse {
    #[serde(default)]
    pub rating: Option<f64>,
    pub distribution: HashMap<String, u32>,
}

// ---------- 映射 ----------

/// 取第一个有效地点
pub fn map_places(places: Vec<UpstreamPlace>) -> Result<Option<GeocodeResult>, ProviderError> {
    let Some(place) = places.into_iter().next() else {
        return Ok(None);
    };

    let latitude = parse_degrees(&place.lat)?;
    let longitude = parse_degrees(&place.lon)?;
    let coordinates = Coordinates::new(latitude, longitude)
        .map_err(|e| ProviderError::Malformed(e.to_string()))?;

    Ok(Some(GeocodeResult {
        coordinates,
        display_name: place.display_name,
    }))
}

fn parse_degrees(raw: &str) -> Result<f64, ProviderError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ProviderError::Malformed(format!("无法解析坐标: {}", raw)))
}

pub fn map_search_response(response: UpstreamSearchResponse) -> BusinessPage {
    let businesses = response
        .businesses
        .into_iter()
        .filter(|business| !business.id.is_empty())
        .map(BusinessSummary::from)
        .collect();

    BusinessPage {
        businesses,
        total: response.total,
    }
}

impl From<UpstreamBusiness> for BusinessSummary {
    fn from(business: UpstreamBusiness) -> Self {
        let address = business
            .location
            .map(|location| location.display_address.join(", "))
            .filter(|address| !address.is_empty());
        let coordinates = business.coordinates.and_then(|c| {
            Coordinates::new(c.latitude?, c.longitude?).ok()
        });

        Self {
            id: business.id,
            name: business.name,
            rating: business.rating,
            review_count: business.review_count.unwrap_or(0),
            categories: business
                .categories
                .into_iter()
                .map(|category| category.alias)
                .collect(),
            address,
            url: business.url,
            coordinates,
        }
    }
}

pub fn map_rating_response(
    business_id: &str,
    response: UpstreamRatingResponse,
) -> Result<BusinessRating, ProviderError> {
    let mut distribution = RatingDistribution::default();
    for (stars, count) in response.distribution {
        let slot = match stars.trim() {
            "1" => &mut distribution.one,
            "2" => &mut distribution.two,
            "3" => &mut distribution.three,
            "4" => &mut distribution.four,
            "5" => &mut distribution.five,
            other => {
                return Err(ProviderError::Malformed(format!("未知星级: {}", other)));
            }
        };
        *slot = count;
    }

    Ok(BusinessRating {
        business_id: business_id.to_string(),
        reported_rating: response.rating,
        distribution,
    })
}
