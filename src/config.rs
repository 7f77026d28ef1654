use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::curve::FractureDetectionStrategy;
use crate::properties::YieldEstimationStrategy;

/// 파이프라인 설정을 표현한다. 전역 싱글톤 대신 명시적으로 전달된다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// 표준값 대비 허용 오차 [%]
    pub tolerance_percent: f64,
    /// 영률 회귀에 사용하는 선형 구간 최대 변형률
    pub max_linear_strain: f64,
    /// 회귀에 필요한 최소 점 수 (미달 시 곡선 앞쪽 점으로 대체)
    pub min_regression_points: usize,
    /// 이동 평균 윈도우 크기 (1 이하면 스무딩 없음)
    pub smoothing_window: usize,
    /// 다운샘플링 간격 (1 이하면 다운샘플링 없음)
    pub downsample_factor: usize,
    /// 파단 검출 전략
    pub fracture: FractureDetectionStrategy,
    /// 항복 강도 추정 전략
    pub yield_strategy: YieldEstimationStrategy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tolerance_percent: 5.0,
            max_linear_strain: 0.02,
            min_regression_points: 5,
            smoothing_window: 1,
            downsample_factor: 1,
            fracture: FractureDetectionStrategy::default(),
            yield_strategy: YieldEstimationStrategy::default(),
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug)]
pub enum ConfigError {
    /// 파일 입출력 오류
    Io(std::io::Error),
    /// TOML 역직렬화 오류
    Serde(toml::de::Error),
    /// TOML 직렬화 오류
    Serialize(toml::ser::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "파일 입출력 오류: {e}"),
            ConfigError::Serde(e) => write!(f, "설정 파싱 오류: {e}"),
            ConfigError::Serialize(e) => write!(f, "설정 직렬화 오류: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        ConfigError::Serde(value)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(value: toml::ser::Error) -> Self {
        ConfigError::Serialize(value)
    }
}

/// config.toml을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default() -> Result<Config, ConfigError> {
    let path = Path::new("config.toml");
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)?;
        Ok(cfg)
    } else {
        let cfg = Config::default();
        save_config(&cfg)?;
        Ok(cfg)
    }
}

fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(cfg)?;
    fs::write("config.toml", content)?;
    Ok(())
}

impl Config {
    /// 설정을 config.toml에 저장한다.
    pub fn save(&self) -> Result<(), ConfigError> {
        save_config(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_reference_constants() {
        let cfg = Config::default();
        assert_eq!(cfg.tolerance_percent, 5.0);
        assert_eq!(cfg.max_linear_strain, 0.02);
        assert_eq!(cfg.min_regression_points, 5);
    }

    #[test]
    fn toml_roundtrip() {
        let cfg = Config {
            smoothing_window: 11,
            fracture: FractureDetectionStrategy::ConsecutiveDrops(10),
            yield_strategy: YieldEstimationStrategy::SlopeApproximation,
            ..Config::default()
        };
        let text = toml::to_string_pretty(&cfg).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.smoothing_window, 11);
        assert_eq!(back.fracture, FractureDetectionStrategy::ConsecutiveDrops(10));
        assert_eq!(back.yield_strategy, YieldEstimationStrategy::SlopeApproximation);
    }
}
