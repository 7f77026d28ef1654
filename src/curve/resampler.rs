use crate::curve::StressStrainPoint;

/// 이동 평균 필터로 곡선을 스무딩한다. 윈도우는 홀수 권장 (예: 5, 11, 21).
/// 양 끝에서는 윈도우를 곡선 범위로 잘라 비대칭 평균을 취한다.
/// 윈도우가 1 이하이거나 입력이 비어 있으면 입력을 그대로 반환한다.
pub fn smooth_data(data: &[StressStrainPoint], window_size: usize) -> Vec<StressStrainPoint> {
    if data.is_empty() || window_size <= 1 {
        return data.to_vec();
    }

    let half_window = window_size / 2;
    let mut smoothed = Vec::with_capacity(data.len());

    for i in 0..data.len() {
        let start = i.saturating_sub(half_window);
        let end = (i + half_window + 1).min(data.len());

        let mut sum_e_stress = 0.0;
        let mut sum_e_strain = 0.0;
        let mut sum_t_stress = 0.0;
        let mut sum_t_strain = 0.0;

        for p in &data[start..end] {
            sum_e_stress += p.engineering_stress;
            sum_e_strain += p.engineering_strain;
            sum_t_stress += p.true_stress;
            sum_t_strain += p.true_strain;
        }

        let count = (end - start) as f64;
        smoothed.push(StressStrainPoint::new(
            sum_e_stress / count,
            sum_e_strain / count,
            sum_t_stress / count,
            sum_t_strain / count,
        ));
    }

    smoothed
}

/// 곡선을 다운샘플링한다. 인덱스 0부터 `factor`개마다 1개를 선택한다 (보간 없음).
/// factor가 1 이하이거나 입력이 비어 있으면 입력을 그대로 반환한다.
pub fn downsample(data: &[StressStrainPoint], factor: usize) -> Vec<StressStrainPoint> {
    if data.is_empty() || factor <= 1 {
        return data.to_vec();
    }

    data.iter().copied().step_by(factor).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(stress: f64, strain: f64) -> StressStrainPoint {
        StressStrainPoint::new(stress, strain, stress, strain)
    }

    #[test]
    fn smooth_window_one_is_identity() {
        let data = vec![pt(1.0, 0.001), pt(5.0, 0.002), pt(3.0, 0.003)];
        assert_eq!(smooth_data(&data, 1), data);
        assert_eq!(smooth_data(&data, 0), data);
    }

    #[test]
    fn smooth_averages_centered_window() {
        let data = vec![pt(1.0, 0.0), pt(2.0, 0.0), pt(3.0, 0.0)];
        let out = smooth_data(&data, 3);
        // 양 끝은 2점 평균, 가운데는 3점 평균
        assert!((out[0].true_stress - 1.5).abs() < 1e-12);
        assert!((out[1].true_stress - 2.0).abs() < 1e-12);
        assert!((out[2].true_stress - 2.5).abs() < 1e-12);
    }

    #[test]
    fn smooth_preserves_length() {
        let data: Vec<_> = (0..37).map(|i| pt(i as f64, i as f64 * 0.001)).collect();
        assert_eq!(smooth_data(&data, 5).len(), data.len());
    }

    #[test]
    fn downsample_factor_one_is_identity() {
        let data = vec![pt(1.0, 0.001), pt(2.0, 0.002)];
        assert_eq!(downsample(&data, 1), data);
        assert_eq!(downsample(&data, 0), data);
    }

    #[test]
    fn downsample_keeps_every_nth_from_zero() {
        let data: Vec<_> = (0..7).map(|i| pt(i as f64, 0.0)).collect();
        let out = downsample(&data, 3);
        let kept: Vec<f64> = out.iter().map(|p| p.true_stress).collect();
        assert_eq!(kept, vec![0.0, 3.0, 6.0]);
    }

    #[test]
    fn empty_input_is_noop() {
        let empty: Vec<StressStrainPoint> = Vec::new();
        assert!(smooth_data(&empty, 5).is_empty());
        assert!(downsample(&empty, 10).is_empty());
    }
}
