use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{info, warn};

/// 데이터 행에서 기대하는 최소 컬럼 수.
/// TIME, LOAD, DISPLACEMENT, STRAIN GAGE, θL, E.STRESS, E.STRAIN, T.STRESS, T.STRAIN
pub const MIN_COLUMNS: usize = 9;

/// 헤더 유효성 검사에 필요한 필수 컬럼명 토큰.
const REQUIRED_HEADER_TOKENS: [&str; 4] = ["TIME", "LOAD", "T.STRESS", "T.STRAIN"];

/// 시험 데이터 파싱 오류를 표현한다.
#[derive(Debug)]
pub enum ParseError {
    /// 파일 입출력 오류
    Io(std::io::Error),
    /// 헤더에 필수 컬럼명이 없는 파일
    InvalidFormat,
    /// 컬럼 수 부족
    TooFewColumns {
        line: String,
        expected: usize,
        actual: usize,
    },
    /// 숫자로 변환할 수 없는 필드
    InvalidNumber { line: String, token: String },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Io(e) => write!(f, "파일 입출력 오류: {e}"),
            ParseError::InvalidFormat => {
                write!(f, "헤더에 필수 컬럼명이 없습니다 (TIME, LOAD, T.STRESS, T.STRAIN)")
            }
            ParseError::TooFewColumns {
                line,
                expected,
                actual,
            } => write!(
                f,
                "컬럼 수 부족 (기대 {expected}, 실제 {actual}): {line}"
            ),
            ParseError::InvalidNumber { line, token } => {
                write!(f, "숫자가 아닌 필드 '{token}': {line}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

impl From<std::io::Error> for ParseError {
    fn from(value: std::io::Error) -> Self {
        ParseError::Io(value)
    }
}

/// 시험 데이터 파일의 한 측정 시점. 파싱 후에는 변경되지 않는다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementRecord {
    /// 시각 [s]
    pub time: f64,
    /// 하중 [N]
    pub load: f64,
    /// 변위 [mm]
    pub displacement: f64,
    /// 스트레인 게이지 값 [-]
    pub strain_gauge: f64,
    /// 회전각 θL [deg]
    pub theta: f64,
    /// 공칭 응력 [MPa]
    pub engineering_stress: f64,
    /// 공칭 변형률 [-]
    pub engineering_strain: f64,
    /// 진응력 [MPa]
    pub true_stress: f64,
    /// 진변형률 [-]
    pub true_strain: f64,
}

/// 공백 또는 쉼표로 구분된 한 줄을 파싱해 측정 레코드를 만든다.
pub fn parse_line(line: &str) -> Result<MeasurementRecord, ParseError> {
    let fields: Vec<&str> = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();

    if fields.len() < MIN_COLUMNS {
        return Err(ParseError::TooFewColumns {
            line: line.to_string(),
            expected: MIN_COLUMNS,
            actual: fields.len(),
        });
    }

    let mut values = [0.0f64; MIN_COLUMNS];
    for (i, token) in fields.iter().take(MIN_COLUMNS).enumerate() {
        values[i] = token.parse().map_err(|_| ParseError::InvalidNumber {
            line: line.to_string(),
            token: token.to_string(),
        })?;
    }

    Ok(MeasurementRecord {
        time: values[0],
        load: values[1],
        displacement: values[2],
        strain_gauge: values[3],
        theta: values[4],
        engineering_stress: values[5],
        engineering_strain: values[6],
        true_stress: values[7],
        true_strain: values[8],
    })
}

/// 헤더 줄에 필수 컬럼명 토큰이 모두 있는지 검사한다.
/// 본격적인 파싱 전에 잘못된 파일을 빠르게 걸러내기 위한 검사라 bool을 반환한다.
pub fn validate_header(header: &str) -> bool {
    REQUIRED_HEADER_TOKENS.iter().all(|t| header.contains(t))
}

/// 파일의 헤더만 읽어 형식이 맞는지 검사한다. 읽기 실패도 false로 취급한다.
pub fn validate_file(path: &Path) -> bool {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return false,
    };
    let mut reader = BufReader::new(file);
    let mut header = String::new();
    match reader.read_line(&mut header) {
        Ok(0) | Err(_) => false,
        Ok(_) => validate_header(&header),
    }
}

/// 시험 데이터 파일 전체를 읽어 측정 레코드 리스트로 변환한다.
/// 헤더가 형식 검사에 실패하면 파싱을 시작하지 않고 중단한다.
/// 파싱 불가능한 데이터 행은 경고만 남기고 건너뛴다.
pub fn parse_file(path: &Path) -> Result<Vec<MeasurementRecord>, ParseError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    let header = match lines.next() {
        Some(line) => line?,
        None => return Err(ParseError::InvalidFormat),
    };
    if !validate_header(&header) {
        return Err(ParseError::InvalidFormat);
    }

    let mut records = Vec::new();
    for line in lines {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match parse_line(trimmed) {
            Ok(record) => records.push(record),
            Err(err) => warn!("행 파싱 실패, 건너뜀: {err}"),
        }
    }

    info!("파싱 완료: {}개 레코드", records.len());

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD_LINE: &str = "0.1 1000.0 0.05 0.001 0.0 51.0 0.001 51.05 0.000999";

    #[test]
    fn parse_line_whitespace_delimited() {
        let rec = parse_line(GOOD_LINE).unwrap();
        assert_eq!(rec.time, 0.1);
        assert_eq!(rec.load, 1000.0);
        assert_eq!(rec.true_stress, 51.05);
        assert_eq!(rec.true_strain, 0.000999);
    }

    #[test]
    fn parse_line_comma_delimited() {
        let rec = parse_line("0.1,1000.0,0.05,0.001,0.0,51.0,0.001,51.05,0.000999").unwrap();
        assert_eq!(rec.engineering_stress, 51.0);
    }

    #[test]
    fn parse_line_rejects_short_line() {
        let err = parse_line("0.1 1000.0 0.05").unwrap_err();
        match err {
            ParseError::TooFewColumns {
                expected, actual, ..
            } => {
                assert_eq!(expected, MIN_COLUMNS);
                assert_eq!(actual, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parse_line_rejects_non_numeric_field() {
        let err = parse_line("0.1 abc 0.05 0.001 0.0 51.0 0.001 51.05 0.000999").unwrap_err();
        match err {
            ParseError::InvalidNumber { token, .. } => assert_eq!(token, "abc"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn header_validation_requires_all_tokens() {
        assert!(validate_header(
            "TIME LOAD DISPLACEMENT STRAIN_GAGE THETA E.STRESS E.STRAIN T.STRESS T.STRAIN"
        ));
        assert!(!validate_header("TIME LOAD E.STRESS E.STRAIN"));
        assert!(!validate_header(""));
    }
}
