//! 응력-변형률 곡선 관련 모듈 모음.

pub mod builder;
pub mod cleaner;
pub mod resampler;

pub use builder::*;
pub use cleaner::*;
pub use resampler::*;

/// 응력-변형률 곡선의 기본 단위가 되는 한 점.
/// 응력은 MPa, 변형률은 무차원이며 곡선 내에서는 변형률이 비감소 순서로 정렬된다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StressStrainPoint {
    /// 공칭 응력 [MPa]
    pub engineering_stress: f64,
    /// 공칭 변형률 [-]
    pub engineering_strain: f64,
    /// 진응력 [MPa]
    pub true_stress: f64,
    /// 진변형률 [-]
    pub true_strain: f64,
}

impl StressStrainPoint {
    pub const fn new(
        engineering_stress: f64,
        engineering_strain: f64,
        true_stress: f64,
        true_strain: f64,
    ) -> Self {
        Self {
            engineering_stress,
            engineering_strain,
            true_stress,
            true_strain,
        }
    }
}
