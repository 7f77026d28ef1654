use std::path::Path;

use log::{info, warn};
use serde::Deserialize;

use crate::config::Config;
use crate::curve::{
    from_load_displacement, remove_negative_stress, remove_post_fracture_with, smooth_data,
    downsample, RawSample, SpecimenGeometry,
};
use crate::properties::{compute_properties, ComputedProperties};
use crate::standards::StandardsTable;
use crate::validation::{compare_to_standard, ValidationOutcome};

/// 몇 개 실험마다 진행 상황을 로그로 남길지.
const PROGRESS_INTERVAL: u64 = 100;

/// experiments.csv의 한 행. 동일 experiment_id의 행들은 연속으로 정렬되어 있어야 한다.
#[derive(Debug, Clone, Deserialize)]
pub struct ExperimentRow {
    pub experiment_id: String,
    pub material_name: String,
    /// 하중 [N]
    pub load_n: f64,
    /// 변위 [mm]
    pub delta_mm: f64,
    /// 표점 거리 [mm]
    pub gage_length_mm: f64,
    /// 단면적 [mm²]
    pub area_mm2: f64,
}

/// 실험 하나의 처리 결과.
#[derive(Debug, Clone)]
pub struct ExperimentReport {
    pub experiment_id: String,
    pub material_name: String,
    pub properties: ComputedProperties,
    pub outcome: ValidationOutcome,
}

/// 배치 실행 요약.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchSummary {
    pub experiments: u64,
    pub rows: u64,
}

/// 배치 처리 오류를 표현한다.
#[derive(Debug)]
pub enum BatchError {
    /// 파일 입출력 오류
    Io(std::io::Error),
    /// 실험 CSV 읽기 오류
    Csv(csv::Error),
}

impl std::fmt::Display for BatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchError::Io(e) => write!(f, "파일 입출력 오류: {e}"),
            BatchError::Csv(e) => write!(f, "실험 CSV 읽기 오류: {e}"),
        }
    }
}

impl std::error::Error for BatchError {}

impl From<std::io::Error> for BatchError {
    fn from(value: std::io::Error) -> Self {
        BatchError::Io(value)
    }
}

impl From<csv::Error> for BatchError {
    fn from(value: csv::Error) -> Self {
        BatchError::Csv(value)
    }
}

/// 한 실험 그룹의 행들로부터 곡선을 만들고 전체 파이프라인을 적용해 물성값을 추출한다.
/// 형상은 그룹 첫 행 기준이며, 곡선 단위로만 메모리를 사용한다.
pub fn process_group(rows: &[ExperimentRow], config: &Config) -> ComputedProperties {
    if rows.is_empty() {
        return ComputedProperties::default();
    }

    let geometry = SpecimenGeometry {
        area_mm2: rows[0].area_mm2,
        gauge_length_mm: rows[0].gage_length_mm,
    };
    let samples: Vec<RawSample> = rows
        .iter()
        .map(|r| RawSample {
            load_n: r.load_n,
            displacement_mm: r.delta_mm,
        })
        .collect();

    let curve = from_load_displacement(&samples, geometry);
    let curve = remove_negative_stress(&curve);
    let curve = remove_post_fracture_with(&curve, config.fracture);
    let curve = smooth_data(&curve, config.smoothing_window);
    let curve = downsample(&curve, config.downsample_factor);

    compute_properties(&curve, config)
}

/// 추출된 물성값을 표준과 비교해 실험 보고서를 만든다.
pub fn validate_group(
    experiment_id: &str,
    material_name: &str,
    properties: ComputedProperties,
    standards: &StandardsTable,
    config: &Config,
) -> ExperimentReport {
    let outcome = match standards.find(material_name) {
        Some(standard) => ValidationOutcome::Compared(compare_to_standard(
            &properties,
            standard,
            config.tolerance_percent,
        )),
        None => ValidationOutcome::StandardNotFound {
            material_name: material_name.to_string(),
        },
    };

    ExperimentReport {
        experiment_id: experiment_id.to_string(),
        material_name: material_name.to_string(),
        properties,
        outcome,
    }
}

/// experiments.csv를 스트리밍 처리한다. 한 번에 한 실험 그룹만 메모리에 유지하므로
/// 최대 메모리는 전체 데이터가 아닌 곡선 하나 크기에 비례한다.
/// 포맷이 깨진 행은 경고만 남기고 건너뛴다.
pub fn process_experiments(
    experiments_csv: &Path,
    standards: &StandardsTable,
    config: &Config,
    mut on_report: impl FnMut(&ExperimentReport),
) -> Result<BatchSummary, BatchError> {
    let mut reader = csv::Reader::from_path(experiments_csv)?;

    let mut summary = BatchSummary::default();
    let mut current_group: Vec<ExperimentRow> = Vec::new();

    for result in reader.deserialize::<ExperimentRow>() {
        let row = match result {
            Ok(row) => row,
            Err(err) => {
                warn!("실험 행 파싱 실패, 건너뜀: {err}");
                continue;
            }
        };
        summary.rows += 1;

        let group_changed = current_group
            .first()
            .is_some_and(|first| first.experiment_id != row.experiment_id);
        if group_changed {
            finish_group(&current_group, standards, config, &mut on_report, &mut summary);
            current_group.clear();
        }

        current_group.push(row);
    }

    if !current_group.is_empty() {
        finish_group(&current_group, standards, config, &mut on_report, &mut summary);
    }

    info!(
        "배치 처리 완료: 실험 {}건, 행 {}건",
        summary.experiments, summary.rows
    );

    Ok(summary)
}

fn finish_group(
    rows: &[ExperimentRow],
    standards: &StandardsTable,
    config: &Config,
    on_report: &mut impl FnMut(&ExperimentReport),
    summary: &mut BatchSummary,
) {
    let first = match rows.first() {
        Some(first) => first,
        None => return,
    };

    let properties = process_group(rows, config);
    let report = validate_group(
        &first.experiment_id,
        &first.material_name,
        properties,
        standards,
        config,
    );
    on_report(&report);

    summary.experiments += 1;
    if summary.experiments % PROGRESS_INTERVAL == 0 {
        info!(
            "진행: 실험 {}건, 행 {}건 처리됨",
            summary.experiments, summary.rows
        );
    }
}

/// 실험 보고서 한 건을 보고서 파일/콘솔용 한 줄 텍스트로 만든다.
pub fn format_report_line(report: &ExperimentReport) -> String {
    match &report.outcome {
        ValidationOutcome::StandardNotFound { material_name } => {
            format!("{} | {material_name} : STANDARD NOT FOUND", report.experiment_id)
        }
        ValidationOutcome::Compared(results) => {
            let metrics: Vec<String> = results
                .iter()
                .map(|r| {
                    let unit = match r.metric {
                        crate::validation::Metric::YoungsModulus => "GPa",
                        _ => "MPa",
                    };
                    format!(
                        "{}: calc={:.3} {unit} ref={:.3} {unit} err={:.2}% [{}]",
                        r.metric, r.computed, r.standard, r.percent_error, r.verdict
                    )
                })
                .collect();
            format!(
                "{} | {} | {}",
                report.experiment_id,
                report.material_name,
                metrics.join(" | ")
            )
        }
    }
}
