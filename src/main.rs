use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use tensile_test_toolbox::{app, config};

/// 인장시험 데이터 처리 및 재료 물성 검증 도구.
#[derive(Debug, Parser)]
#[command(name = "tensile_test_toolbox", version)]
struct Cli {
    /// 표준 재료 DB CSV 경로 (생략 시 내장 샘플 테이블 사용)
    #[arg(long, global = true)]
    standards: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// experiments.csv를 스트리밍 처리해 실험별 물성값을 표준과 비교한다
    Validate {
        /// 실험 데이터 CSV (experiment_id 기준 정렬 필수)
        experiments: PathBuf,
        /// 판정 결과를 기록할 보고서 파일
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// 시험기 출력 TXT 파일 하나를 분석해 물성값을 추출한다
    Analyze {
        /// 시험 데이터 파일 (TIME/LOAD/.../T.STRESS/T.STRAIN 형식)
        data: PathBuf,
        /// 비교할 표준 재료명
        #[arg(long)]
        material: Option<String>,
    },
}

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 선택된 서브커맨드를 실행한다.
fn main() -> ExitCode {
    env_logger::init();
    if let Err(err) = try_run() {
        eprintln!("오류: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn try_run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let cfg = config::load_or_default()?;

    match cli.command {
        Command::Validate {
            experiments,
            report,
        } => app::run_validate(
            cli.standards.as_deref(),
            &experiments,
            report.as_deref(),
            &cfg,
        )?,
        Command::Analyze { data, material } => app::run_analyze(
            &data,
            material.as_deref(),
            cli.standards.as_deref(),
            &cfg,
        )?,
    }

    Ok(())
}
