use log::warn;

use crate::curve::StressStrainPoint;
use crate::parser::MeasurementRecord;

/// 면적이 0 이하일 때 대신 사용하는 안전값 [mm²].
/// 파이프라인을 중단하지 않기 위한 대체값이며 결과 왜곡이 있으므로 경고를 남긴다.
const AREA_EPSILON_MM2: f64 = 1e-9;

/// 하중-변위 기반 곡선 계산에 필요한 시편 형상.
#[derive(Debug, Clone, Copy)]
pub struct SpecimenGeometry {
    /// 초기 단면적 [mm²]
    pub area_mm2: f64,
    /// 초기 표점 거리 [mm]
    pub gauge_length_mm: f64,
}

/// 하중-변위 원시 샘플 한 점.
#[derive(Debug, Clone, Copy)]
pub struct RawSample {
    /// 하중 [N]
    pub load_n: f64,
    /// 변위 [mm]
    pub displacement_mm: f64,
}

/// 측정 레코드 리스트를 응력-변형률 곡선으로 변환한다.
/// 파일에 이미 응력/변형률 컬럼이 있으므로 재계산 없이 그대로 투영한다.
pub fn from_records(records: &[MeasurementRecord]) -> Vec<StressStrainPoint> {
    records
        .iter()
        .map(|r| {
            StressStrainPoint::new(
                r.engineering_stress,
                r.engineering_strain,
                r.true_stress,
                r.true_strain,
            )
        })
        .collect()
}

/// 하중-변위 샘플과 시편 형상으로부터 공칭 응력-변형률 곡선을 계산한다.
/// stress [MPa] = load [N] / area [mm²], strain = displacement / gauge length.
/// 점별 독립 계산이며 진응력/진변형률 컬럼에는 공칭값을 그대로 사용한다.
pub fn from_load_displacement(
    samples: &[RawSample],
    geometry: SpecimenGeometry,
) -> Vec<StressStrainPoint> {
    let area = if geometry.area_mm2 <= 0.0 {
        warn!(
            "단면적이 0 이하({})라 안전값 {AREA_EPSILON_MM2} mm²로 대체됨. 결과가 왜곡될 수 있음",
            geometry.area_mm2
        );
        AREA_EPSILON_MM2
    } else {
        geometry.area_mm2
    };

    samples
        .iter()
        .map(|s| {
            let stress = s.load_n / area;
            let strain = if geometry.gauge_length_mm == 0.0 {
                0.0
            } else {
                s.displacement_mm / geometry.gauge_length_mm
            };
            StressStrainPoint::new(stress, strain, stress, strain)
        })
        .collect()
}
