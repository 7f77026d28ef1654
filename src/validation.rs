use crate::properties::ComputedProperties;
use crate::standards::MaterialStandard;

/// 비교 대상 물성 항목.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    YoungsModulus,
    YieldStrength,
    TensileStrength,
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Metric::YoungsModulus => write!(f, "Young"),
            Metric::YieldStrength => write!(f, "Yield"),
            Metric::TensileStrength => write!(f, "Tensile"),
        }
    }
}

/// 비교 판정 결과. 표준값이 0이거나 NaN이면 PASS/FAIL로 강제하지 않고
/// Undefined로 보고한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail,
    Undefined,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Pass => write!(f, "PASS"),
            Verdict::Fail => write!(f, "FAIL"),
            Verdict::Undefined => write!(f, "UNDEFINED"),
        }
    }
}

/// 항목별 비교 결과.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonResult {
    pub metric: Metric,
    /// 계산값 (영률은 GPa, 나머지는 MPa)
    pub computed: f64,
    /// 표준값 (영률은 GPa, 나머지는 MPa)
    pub standard: f64,
    /// 상대 오차 [%]. 비교 불가능하면 NaN.
    pub percent_error: f64,
    pub verdict: Verdict,
}

/// 실험 하나의 검증 결과. "비교했는데 실패"와 "비교 대상 표준이 없음"을 구분한다.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    Compared(Vec<ComparisonResult>),
    StandardNotFound { material_name: String },
}

/// 상대 오차 [%]: |계산값 - 표준값| / 표준값 × 100.
/// 표준값이 0이거나 어느 한쪽이 NaN이면 NaN을 반환한다.
pub fn percent_error(computed: f64, standard: f64) -> f64 {
    if computed.is_nan() || standard.is_nan() || standard == 0.0 {
        return f64::NAN;
    }
    ((computed - standard) / standard).abs() * 100.0
}

/// 단일 항목을 허용 오차와 비교한다. 경계값(오차 == 허용치)은 PASS.
pub fn compare(metric: Metric, computed: f64, standard: f64, tolerance_percent: f64) -> ComparisonResult {
    let error = percent_error(computed, standard);
    let verdict = if error.is_nan() {
        Verdict::Undefined
    } else if error <= tolerance_percent {
        Verdict::Pass
    } else {
        Verdict::Fail
    };

    ComparisonResult {
        metric,
        computed,
        standard,
        percent_error: error,
        verdict,
    }
}

/// 추출된 물성값 전체를 표준 레코드와 비교한다.
/// 영률은 계산값(MPa)을 GPa로 환산해 표준 단위와 맞춘다.
/// 항복 강도가 미발견(None)이면 NaN으로 비교되어 Undefined 판정이 된다.
pub fn compare_to_standard(
    computed: &ComputedProperties,
    standard: &MaterialStandard,
    tolerance_percent: f64,
) -> Vec<ComparisonResult> {
    vec![
        compare(
            Metric::YoungsModulus,
            computed.youngs_modulus_mpa / 1000.0,
            standard.youngs_modulus_gpa,
            tolerance_percent,
        ),
        compare(
            Metric::YieldStrength,
            computed.yield_strength_mpa.unwrap_or(f64::NAN),
            standard.yield_strength_mpa,
            tolerance_percent,
        ),
        compare(
            Metric::TensileStrength,
            computed.tensile_strength_mpa,
            standard.tensile_strength_mpa,
            tolerance_percent,
        ),
    ]
}
