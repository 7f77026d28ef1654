use log::info;
use serde::{Deserialize, Serialize};

use crate::curve::StressStrainPoint;
use crate::properties::{find_max_stress, STRESS_MATCH_TOLERANCE};

/// 파단 검출 방식을 표현한다.
/// 단순 임계값 방식이 잡음 많은 곡선에서 과도하게 잘라낼 때 연속 감소 방식을 사용한다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FractureDetectionStrategy {
    /// 최대 응력 대비 비율이 임계값 아래로 떨어지는 첫 지점에서 절단 (기본 0.5)
    Threshold(f64),
    /// 최대 응력 이후 연속 감소 샘플 수가 기준에 도달하면 감소 시작점으로 소급 절단
    ConsecutiveDrops(usize),
}

impl Default for FractureDetectionStrategy {
    fn default() -> Self {
        FractureDetectionStrategy::Threshold(0.5)
    }
}

/// 음수 응력 데이터를 제거한다. 시험 초기 압축/슬랙 구간 필터이며
/// 위치와 무관하게 진응력 또는 공칭 응력이 0 이하인 모든 점을 제거한다.
pub fn remove_negative_stress(data: &[StressStrainPoint]) -> Vec<StressStrainPoint> {
    if data.is_empty() {
        return data.to_vec();
    }

    let filtered: Vec<StressStrainPoint> = data
        .iter()
        .copied()
        .filter(|p| p.true_stress > 0.0 && p.engineering_stress > 0.0)
        .collect();

    info!("음수 응력 제거: {}개 포인트 제거됨", data.len() - filtered.len());

    filtered
}

/// 최대 진응력 지점(중복 시 첫 번째)의 인덱스를 찾는다.
fn max_stress_index(data: &[StressStrainPoint]) -> Option<usize> {
    let max_stress = find_max_stress(data);
    data.iter()
        .position(|p| (p.true_stress - max_stress).abs() < STRESS_MATCH_TOLERANCE)
}

/// 파단 후 데이터를 제거한다. 최대 응력까지는 모두 유지하고,
/// 이후에는 응력이 `max × drop_threshold` 이상인 동안만 유지하다가
/// 임계값 아래로 떨어지는 첫 지점에서 곡선을 절단한다 (필터가 아닌 1회성 절단).
pub fn remove_post_fracture(
    data: &[StressStrainPoint],
    drop_threshold: f64,
) -> Vec<StressStrainPoint> {
    if data.is_empty() {
        return data.to_vec();
    }

    let max_index = match max_stress_index(data) {
        Some(i) => i,
        None => return data.to_vec(),
    };

    let threshold_stress = data[max_index].true_stress * drop_threshold;
    let mut filtered: Vec<StressStrainPoint> = data[..=max_index].to_vec();

    for (i, point) in data.iter().enumerate().skip(max_index + 1) {
        if point.true_stress >= threshold_stress {
            filtered.push(*point);
        } else {
            info!("파단 후 데이터 제거: {}개 포인트 제거됨", data.len() - i);
            break;
        }
    }

    filtered
}

/// 연속 감소 기반의 파단 검출. 최대 응력 이후 `consecutive_drops`개의
/// 연속 감소가 관측되면 감소 시작점으로 소급하여 절단한다.
pub fn remove_post_fracture_advanced(
    data: &[StressStrainPoint],
    consecutive_drops: usize,
) -> Vec<StressStrainPoint> {
    if data.is_empty() || data.len() < consecutive_drops {
        return data.to_vec();
    }

    let max_index = match max_stress_index(data) {
        Some(i) => i,
        None => return data.to_vec(),
    };

    if max_index + consecutive_drops >= data.len() {
        return data.to_vec();
    }

    let mut drop_count = 0usize;
    let mut fracture_index = data.len();

    for i in (max_index + 1)..data.len() {
        if data[i].true_stress < data[i - 1].true_stress {
            drop_count += 1;
            if drop_count >= consecutive_drops {
                fracture_index = i - consecutive_drops + 1;
                info!("파단 지점 감지 (index: {fracture_index})");
                break;
            }
        } else {
            drop_count = 0;
        }
    }

    let filtered = data[..fracture_index].to_vec();
    info!(
        "고급 파단 제거: {}개 포인트 제거됨",
        data.len() - filtered.len()
    );

    filtered
}

/// 설정된 전략으로 파단 후 데이터를 제거한다.
pub fn remove_post_fracture_with(
    data: &[StressStrainPoint],
    strategy: FractureDetectionStrategy,
) -> Vec<StressStrainPoint> {
    match strategy {
        FractureDetectionStrategy::Threshold(t) => remove_post_fracture(data, t),
        FractureDetectionStrategy::ConsecutiveDrops(n) => remove_post_fracture_advanced(data, n),
    }
}

/// 포괄적 데이터 클리닝: 음수 응력 제거 후 임계값 0.5의 파단 후 제거를 적용한다.
pub fn clean_data(data: &[StressStrainPoint]) -> Vec<StressStrainPoint> {
    if data.is_empty() {
        return data.to_vec();
    }

    let cleaned = remove_negative_stress(data);
    let cleaned = remove_post_fracture(&cleaned, 0.5);

    info!(
        "데이터 클리닝 완료: 총 {}개 포인트 제거됨",
        data.len() - cleaned.len()
    );

    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(stress: f64, strain: f64) -> StressStrainPoint {
        StressStrainPoint::new(stress, strain, stress, strain)
    }

    #[test]
    fn negative_stress_removal_drops_only_nonpositive() {
        let data = vec![pt(-5.0, -0.001), pt(10.0, 0.001), pt(20.0, 0.002)];
        let out = remove_negative_stress(&data);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].true_stress, 10.0);
        assert_eq!(out[1].true_stress, 20.0);
    }

    #[test]
    fn negative_stress_removal_is_filter_not_prefix_trim() {
        // 중간에 끼어 있는 0 이하 점도 제거되어야 한다.
        let data = vec![pt(10.0, 0.001), pt(0.0, 0.002), pt(20.0, 0.003)];
        let out = remove_negative_stress(&data);
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].true_stress, 20.0);
    }

    #[test]
    fn post_fracture_trim_cuts_at_exact_point() {
        // peak=100 (index 2), 임계값 50: 90 유지, 40에서 절단
        let stresses = [10.0, 50.0, 100.0, 90.0, 40.0, 5.0];
        let data: Vec<_> = stresses
            .iter()
            .enumerate()
            .map(|(i, &s)| pt(s, i as f64 * 0.01))
            .collect();
        let out = remove_post_fracture(&data, 0.5);
        let kept: Vec<f64> = out.iter().map(|p| p.true_stress).collect();
        assert_eq!(kept, vec![10.0, 50.0, 100.0, 90.0]);
    }

    #[test]
    fn post_fracture_keeps_everything_before_peak() {
        // 임계값 미만이어도 peak 이전 점은 유지된다.
        let data = vec![pt(10.0, 0.0), pt(100.0, 0.01)];
        let out = remove_post_fracture(&data, 0.5);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn advanced_detection_backdates_cut() {
        // peak 이후 3회 연속 감소가 index 4에서 완성되면 절단은 index 2 (감소 시작점)
        let stresses = [50.0, 100.0, 99.0, 98.0, 97.0, 96.0];
        let data: Vec<_> = stresses
            .iter()
            .enumerate()
            .map(|(i, &s)| pt(s, i as f64 * 0.01))
            .collect();
        let out = remove_post_fracture_advanced(&data, 3);
        assert_eq!(out.len(), 2);
        assert_eq!(out.last().unwrap().true_stress, 100.0);
    }

    #[test]
    fn advanced_detection_resets_on_rise() {
        let stresses = [100.0, 99.0, 99.5, 99.0, 98.5, 99.6];
        let data: Vec<_> = stresses
            .iter()
            .enumerate()
            .map(|(i, &s)| pt(s, i as f64 * 0.01))
            .collect();
        // 3연속 감소가 한 번도 완성되지 않으므로 전체 유지
        let out = remove_post_fracture_advanced(&data, 3);
        assert_eq!(out.len(), data.len());
    }

    #[test]
    fn empty_input_is_noop() {
        let empty: Vec<StressStrainPoint> = Vec::new();
        assert!(remove_negative_stress(&empty).is_empty());
        assert!(remove_post_fracture(&empty, 0.5).is_empty());
        assert!(remove_post_fracture_advanced(&empty, 5).is_empty());
        assert!(clean_data(&empty).is_empty());
    }

    #[test]
    fn clean_data_composes_both_passes() {
        let data = vec![
            pt(-2.0, -0.001),
            pt(10.0, 0.001),
            pt(100.0, 0.05),
            pt(30.0, 0.06),
            pt(5.0, 0.07),
        ];
        let out = clean_data(&data);
        let kept: Vec<f64> = out.iter().map(|p| p.true_stress).collect();
        // 음수 제거 후 peak=100, 임계값 50: 30에서 절단
        assert_eq!(kept, vec![10.0, 100.0]);
    }
}
