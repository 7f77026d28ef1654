//! 곡선 변환의 대수적 성질 테스트 (항등, 부분 수열 보존).

use proptest::prelude::*;

use tensile_test_toolbox::curve::{clean_data, downsample, smooth_data, StressStrainPoint};

fn point_strategy() -> impl Strategy<Value = StressStrainPoint> {
    // 음수 응력과 파단 꼬리를 포함할 수 있는 임의 곡선
    (-100.0f64..1000.0, 0.0f64..0.5)
        .prop_map(|(stress, strain)| StressStrainPoint::new(stress, strain, stress, strain))
}

fn curve_strategy() -> impl Strategy<Value = Vec<StressStrainPoint>> {
    prop::collection::vec(point_strategy(), 0..64)
}

/// out이 data의 부분 수열인지 (순서 유지, 점 단위 동일성) 검사한다.
fn is_subsequence(out: &[StressStrainPoint], data: &[StressStrainPoint]) -> bool {
    let mut iter = data.iter();
    out.iter().all(|p| iter.any(|q| q == p))
}

proptest! {
    #[test]
    fn smooth_window_leq_one_is_identity(data in curve_strategy(), window in 0usize..2) {
        prop_assert_eq!(smooth_data(&data, window), data);
    }

    #[test]
    fn smooth_preserves_length(data in curve_strategy(), window in 2usize..16) {
        prop_assert_eq!(smooth_data(&data, window).len(), data.len());
    }

    #[test]
    fn downsample_factor_leq_one_is_identity(data in curve_strategy(), factor in 0usize..2) {
        prop_assert_eq!(downsample(&data, factor), data);
    }

    #[test]
    fn downsample_keeps_first_point(data in curve_strategy(), factor in 2usize..10) {
        let out = downsample(&data, factor);
        if let Some(first) = data.first() {
            prop_assert_eq!(out.first(), Some(first));
        } else {
            prop_assert!(out.is_empty());
        }
    }

    #[test]
    fn clean_data_never_lengthens(data in curve_strategy()) {
        prop_assert!(clean_data(&data).len() <= data.len());
    }

    #[test]
    fn clean_data_is_order_preserving_subsequence(data in curve_strategy()) {
        let out = clean_data(&data);
        prop_assert!(is_subsequence(&out, &data));
    }
}
