use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;

use crate::batch::{self, BatchError};
use crate::config::Config;
use crate::curve;
use crate::parser::{self, ParseError};
use crate::properties::{self, YieldEstimationStrategy};
use crate::standards::{StandardsError, StandardsTable};
use crate::validation::{compare_to_standard, Metric};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug)]
pub enum AppError {
    /// 파일 입출력 오류
    Io(std::io::Error),
    /// 설정 저장/로드 오류
    Config(crate::config::ConfigError),
    /// 시험 데이터 파싱 오류
    Parse(ParseError),
    /// 표준 DB 로드 오류
    Standards(StandardsError),
    /// 배치 처리 오류
    Batch(BatchError),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Io(e) => write!(f, "입출력 오류: {e}"),
            AppError::Config(e) => write!(f, "설정 오류: {e}"),
            AppError::Parse(e) => write!(f, "데이터 파싱 오류: {e}"),
            AppError::Standards(e) => write!(f, "표준 DB 오류: {e}"),
            AppError::Batch(e) => write!(f, "배치 처리 오류: {e}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        AppError::Io(value)
    }
}

impl From<crate::config::ConfigError> for AppError {
    fn from(value: crate::config::ConfigError) -> Self {
        AppError::Config(value)
    }
}

impl From<ParseError> for AppError {
    fn from(value: ParseError) -> Self {
        AppError::Parse(value)
    }
}

impl From<StandardsError> for AppError {
    fn from(value: StandardsError) -> Self {
        AppError::Standards(value)
    }
}

impl From<BatchError> for AppError {
    fn from(value: BatchError) -> Self {
        AppError::Batch(value)
    }
}

/// 표준 DB를 로드한다. 경로가 없으면 내장 샘플 테이블을 사용한다.
fn load_standards(path: Option<&Path>) -> Result<StandardsTable, AppError> {
    match path {
        Some(path) => Ok(StandardsTable::load_csv(path)?),
        None => {
            info!("표준 DB 경로가 없어 내장 샘플 테이블 사용");
            Ok(StandardsTable::sample())
        }
    }
}

fn metric_unit(metric: Metric) -> &'static str {
    match metric {
        Metric::YoungsModulus => "GPa",
        _ => "MPa",
    }
}

/// 배치 검증 실행: experiments.csv 전체를 스트리밍 처리하고
/// 실험별 판정 라인을 콘솔과 (지정 시) 보고서 파일에 기록한다.
pub fn run_validate(
    standards_path: Option<&Path>,
    experiments_path: &Path,
    report_path: Option<&Path>,
    config: &Config,
) -> Result<(), AppError> {
    let standards = load_standards(standards_path)?;
    info!("표준 재료 {}개 로드됨", standards.len());

    let mut report_writer = match report_path {
        Some(path) => Some(BufWriter::new(File::create(path)?)),
        None => None,
    };
    let mut write_error: Option<std::io::Error> = None;

    let summary = batch::process_experiments(experiments_path, &standards, config, |report| {
        let line = batch::format_report_line(report);
        println!("{line}");
        if let Some(writer) = report_writer.as_mut() {
            if let Err(err) = writeln!(writer, "{line}") {
                write_error.get_or_insert(err);
            }
        }
    })?;

    if let Some(err) = write_error {
        return Err(AppError::Io(err));
    }
    if let Some(mut writer) = report_writer {
        writer.flush()?;
    }

    println!(
        "=== 완료: 실험 {}건, 행 {}건 처리됨 ===",
        summary.experiments, summary.rows
    );

    Ok(())
}

/// 단일 시험 데이터 파일 분석: 파싱 → 곡선 변환 → 클리닝 → 리샘플링 →
/// 물성 추출 후 결과를 출력하고, 재료명이 주어지면 표준값과 비교한다.
pub fn run_analyze(
    data_path: &Path,
    material_name: Option<&str>,
    standards_path: Option<&Path>,
    config: &Config,
) -> Result<(), AppError> {
    let records = parser::parse_file(data_path)?;
    let raw_curve = curve::from_records(&records);

    let cleaned = curve::remove_negative_stress(&raw_curve);
    let cleaned = curve::remove_post_fracture_with(&cleaned, config.fracture);
    let resampled = curve::smooth_data(&cleaned, config.smoothing_window);
    let resampled = curve::downsample(&resampled, config.downsample_factor);

    let props = properties::compute_properties(&resampled, config);

    println!("\n=== 인장시험 분석 결과 ===");
    println!(
        "데이터 포인트: {}개 (클리닝/리샘플링 후 {}개)",
        raw_curve.len(),
        resampled.len()
    );
    println!("영률: {:.3} GPa", props.youngs_modulus_mpa / 1000.0);
    match props.yield_strength_mpa {
        Some(yield_mpa) => println!("항복 강도: {yield_mpa:.3} MPa"),
        None => match config.yield_strategy {
            YieldEstimationStrategy::OffsetScan => {
                println!("항복 강도: 미발견 (데이터 범위 내 0.2% offset 교차점 없음)")
            }
            YieldEstimationStrategy::SlopeApproximation => println!("항복 강도: 계산 불가"),
        },
    }
    println!("인장 강도: {:.3} MPa", props.tensile_strength_mpa);
    println!("최대 응력 변형률: {:.6}", props.strain_at_max_stress);
    println!("연신율: {:.2} %", props.elongation_percent);
    println!("단면수축률: {:.2} %", props.reduction_of_area_percent);

    if let Some(name) = material_name {
        let standards = load_standards(standards_path)?;
        match standards.find(name) {
            Some(standard) => {
                println!(
                    "\n--- 표준 비교 ({}, 허용 오차 {}%) ---",
                    standard.name, config.tolerance_percent
                );
                for result in compare_to_standard(&props, standard, config.tolerance_percent) {
                    let unit = metric_unit(result.metric);
                    println!(
                        "{}: calc={:.3} {unit} ref={:.3} {unit} err={:.2}% [{}]",
                        result.metric,
                        result.computed,
                        result.standard,
                        result.percent_error,
                        result.verdict
                    );
                }
            }
            None => println!("\n표준 DB에 재료가 없습니다: {name}"),
        }
    }

    Ok(())
}
