use log::info;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::curve::StressStrainPoint;

/// 최대 응력 지점 탐색 시 사용하는 절대 허용 오차 [MPa].
pub const STRESS_MATCH_TOLERANCE: f64 = 0.01;

/// 0.2% offset 항복 강도 계산에 사용하는 변형률 오프셋.
pub const YIELD_OFFSET: f64 = 0.002;

/// 항복 강도 추정 방식을 표현한다.
/// 점별 곡선 데이터가 있으면 OffsetScan, 회귀 기울기만 있는 집계 입력에는
/// 정밀도가 떨어지는 SlopeApproximation을 사용한다. 두 방식은 병합하지 않는다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YieldEstimationStrategy {
    /// 0.2% offset 직선과 실곡선의 교차점을 탐색
    OffsetScan,
    /// yield ≈ slope × 0.002 근사 (교차점 탐색 불가능한 입력용)
    SlopeApproximation,
}

impl Default for YieldEstimationStrategy {
    fn default() -> Self {
        YieldEstimationStrategy::OffsetScan
    }
}

/// 한 곡선에서 추출된 기계적 물성값. 추출은 호출 단위로 전체가 한 번에 계산된다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputedProperties {
    /// 영률 [MPa]
    pub youngs_modulus_mpa: f64,
    /// 항복 강도 [MPa]. None은 offset 교차점을 찾지 못한 경우로,
    /// 실제 0 MPa 항복과 구분하기 위해 Option으로 둔다.
    pub yield_strength_mpa: Option<f64>,
    /// 인장 강도 [MPa]
    pub tensile_strength_mpa: f64,
    /// 최대 응력에서의 진변형률 [-]
    pub strain_at_max_stress: f64,
    /// 연신율 [%]
    pub elongation_percent: f64,
    /// 단면수축률 [%]
    pub reduction_of_area_percent: f64,
}

/// 곡선 전체에서 최대 진응력을 찾는다. 빈 곡선이면 0.0.
pub fn find_max_stress(data: &[StressStrainPoint]) -> f64 {
    data.iter()
        .map(|p| p.true_stress)
        .reduce(f64::max)
        .unwrap_or(0.0)
}

/// 최대 응력 지점의 진변형률을 찾는다. 허용 오차 내 중복 시 첫 번째 점을 택한다
/// (최대 응력 구간이 평탄할 때 "가장 큰 변형률"이 아닌 첫 도달점이 기준).
pub fn find_strain_at_max_stress(data: &[StressStrainPoint]) -> f64 {
    let max_stress = find_max_stress(data);
    data.iter()
        .find(|p| (p.true_stress - max_stress).abs() < STRESS_MATCH_TOLERANCE)
        .map(|p| p.true_strain)
        .unwrap_or(0.0)
}

/// 최소제곱법 기울기: slope = Σ(x-x̄)(y-ȳ) / Σ(x-x̄)².
/// 분모가 0이면 (모든 x가 동일) 0.0을 반환한다.
pub fn regression_slope(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n == 0 {
        return 0.0;
    }

    let mean_x: f64 = x[..n].iter().sum::<f64>() / n as f64;
    let mean_y: f64 = y[..n].iter().sum::<f64>() / n as f64;

    let mut num = 0.0;
    let mut den = 0.0;
    for i in 0..n {
        let dx = x[i] - mean_x;
        num += dx * (y[i] - mean_y);
        den += dx * dx;
    }

    if den == 0.0 {
        return 0.0;
    }
    num / den
}

/// 선형 구간(진변형률 ≤ max_linear_strain)에 대한 회귀로 영률 [MPa]을 계산한다.
/// 선형 구간의 점이 min_regression_points 미만이면 변형률과 무관하게
/// 곡선 앞쪽 min(n, min_regression_points)개 점으로 대체한다.
pub fn youngs_modulus(
    data: &[StressStrainPoint],
    max_linear_strain: f64,
    min_regression_points: usize,
) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let mut use_count = data
        .iter()
        .take_while(|p| p.true_strain <= max_linear_strain)
        .count();
    if use_count < min_regression_points {
        use_count = data.len().min(min_regression_points);
    }

    let x: Vec<f64> = data[..use_count].iter().map(|p| p.true_strain).collect();
    let y: Vec<f64> = data[..use_count].iter().map(|p| p.true_stress).collect();

    regression_slope(&x, &y)
}

/// 0.2% offset 방식의 항복 강도 [MPa].
/// offset 직선 `σ = E(ε - 0.002)` 아래로 실곡선 응력이 처음 떨어지는 점의
/// 실제 응력이 항복 강도가 된다. 교차점이 없으면 None (데이터 범위 내 항복 없음).
pub fn yield_strength_offset(data: &[StressStrainPoint], modulus_mpa: f64) -> Option<f64> {
    for p in data {
        let offset_stress = modulus_mpa * (p.true_strain - YIELD_OFFSET);
        if p.true_stress <= offset_stress {
            return Some(p.true_stress);
        }
    }
    None
}

/// 단순화된 항복 강도 근사 [MPa]: yield ≈ slope × 0.002.
/// 점별 탐색이 불가능한 집계/회귀 전용 입력에서만 사용한다.
pub fn yield_strength_approx(modulus_mpa: f64) -> f64 {
    modulus_mpa * YIELD_OFFSET
}

/// 곡선 하나에서 전체 물성값을 추출한다. 순수 함수이며 곡선이 비었거나
/// 점이 부족하면 예외 대신 0 기본값을 반환해 배치 실행이 중단되지 않게 한다.
pub fn compute_properties(data: &[StressStrainPoint], config: &Config) -> ComputedProperties {
    if data.is_empty() {
        return ComputedProperties::default();
    }

    let modulus = youngs_modulus(data, config.max_linear_strain, config.min_regression_points);

    let yield_strength = match config.yield_strategy {
        YieldEstimationStrategy::OffsetScan => {
            let found = yield_strength_offset(data, modulus);
            if found.is_none() {
                info!("offset 항복점 미발견: 데이터 범위 내에서 곡선이 offset 직선 아래로 떨어지지 않음");
            }
            found
        }
        YieldEstimationStrategy::SlopeApproximation => Some(yield_strength_approx(modulus)),
    };

    let last = data[data.len() - 1];

    ComputedProperties {
        youngs_modulus_mpa: modulus,
        yield_strength_mpa: yield_strength,
        tensile_strength_mpa: find_max_stress(data),
        strain_at_max_stress: find_strain_at_max_stress(data),
        elongation_percent: last.engineering_strain * 100.0,
        reduction_of_area_percent: reduction_of_area(last),
    }
}

/// 최종 점의 진응력/공칭 응력 비로부터 단면수축률 [%]를 유도한다.
/// σ_true = σ_eng × A₀/A 이므로 A/A₀ = σ_eng/σ_true.
fn reduction_of_area(last: StressStrainPoint) -> f64 {
    if last.true_stress <= 0.0 {
        return 0.0;
    }
    ((1.0 - last.engineering_stress / last.true_stress) * 100.0).max(0.0)
}
