use std::path::Path;

use log::{info, warn};
use serde::Deserialize;

/// 표준 재료의 참조 물성값. 파이프라인에서는 조회만 하고 변경하지 않는다.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MaterialStandard {
    /// 재료 ID (예: M001)
    #[serde(rename = "material_id")]
    pub id: String,
    /// 재료명. 대소문자 구분 없이 조회 키로 사용한다.
    #[serde(rename = "material_name")]
    pub name: String,
    /// 영률 [GPa]
    #[serde(rename = "young_modulus_gpa")]
    pub youngs_modulus_gpa: f64,
    /// 항복 강도 [MPa]
    #[serde(rename = "yield_strength_mpa")]
    pub yield_strength_mpa: f64,
    /// 인장 강도 [MPa]
    #[serde(rename = "tensile_strength_mpa")]
    pub tensile_strength_mpa: f64,
    /// 밀도 [kg/m³]
    #[serde(rename = "density_kgm3")]
    pub density_kg_m3: f64,
    /// 푸아송 비 [-]
    #[serde(rename = "poisson")]
    pub poisson_ratio: f64,
}

/// 표준 재료 조회 오류를 표현한다.
#[derive(Debug)]
pub enum StandardsError {
    /// 파일 입출력 오류
    Io(std::io::Error),
    /// CSV 파싱 오류
    Csv(csv::Error),
}

impl std::fmt::Display for StandardsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StandardsError::Io(e) => write!(f, "파일 입출력 오류: {e}"),
            StandardsError::Csv(e) => write!(f, "표준 DB CSV 파싱 오류: {e}"),
        }
    }
}

impl std::error::Error for StandardsError {}

impl From<std::io::Error> for StandardsError {
    fn from(value: std::io::Error) -> Self {
        StandardsError::Io(value)
    }
}

impl From<csv::Error> for StandardsError {
    fn from(value: csv::Error) -> Self {
        StandardsError::Csv(value)
    }
}

/// 표준 재료 테이블. 재료명 기반 대소문자 무시 조회를 제공한다.
#[derive(Debug, Clone, Default)]
pub struct StandardsTable {
    materials: Vec<MaterialStandard>,
}

impl StandardsTable {
    /// 테스트/데모용 내장 샘플 테이블 (Aluminum, Steel).
    pub fn sample() -> Self {
        Self {
            materials: vec![
                MaterialStandard {
                    id: "M001".to_string(),
                    name: "Aluminum".to_string(),
                    youngs_modulus_gpa: 70.0,
                    yield_strength_mpa: 276.0,
                    tensile_strength_mpa: 310.0,
                    density_kg_m3: 2700.0,
                    poisson_ratio: 0.33,
                },
                MaterialStandard {
                    id: "M002".to_string(),
                    name: "Steel".to_string(),
                    youngs_modulus_gpa: 200.0,
                    yield_strength_mpa: 250.0,
                    tensile_strength_mpa: 400.0,
                    density_kg_m3: 7850.0,
                    poisson_ratio: 0.30,
                },
            ],
        }
    }

    /// standards.csv를 로드한다. 포맷이 깨진 행은 경고만 남기고 건너뛴다.
    ///
    /// 기대 헤더:
    /// material_id,material_name,young_modulus_gpa,yield_strength_mpa,tensile_strength_mpa,density_kgm3,poisson
    pub fn load_csv(path: &Path) -> Result<Self, StandardsError> {
        let mut reader = csv::Reader::from_path(path).map_err(StandardsError::Csv)?;
        let mut materials = Vec::new();

        for result in reader.deserialize::<MaterialStandard>() {
            match result {
                Ok(standard) => materials.push(standard),
                Err(err) => warn!("표준 DB 행 파싱 실패, 건너뜀: {err}"),
            }
        }

        info!("표준 재료 로드 완료: {}개", materials.len());

        Ok(Self { materials })
    }

    /// 재료명으로 표준 물성값을 조회한다 (대소문자 무시).
    pub fn find(&self, name: &str) -> Option<&MaterialStandard> {
        let trimmed = name.trim();
        self.materials
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(trimmed))
    }

    /// 등록된 재료명 목록을 반환한다.
    pub fn material_names(&self) -> Vec<&str> {
        self.materials.iter().map(|m| m.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_is_case_insensitive() {
        let table = StandardsTable::sample();
        assert!(table.find("steel").is_some());
        assert!(table.find("STEEL").is_some());
        assert!(table.find(" Aluminum ").is_some());
        assert!(table.find("Titanium").is_none());
    }

    #[test]
    fn sample_table_reference_values() {
        let table = StandardsTable::sample();
        let steel = table.find("Steel").unwrap();
        assert_eq!(steel.youngs_modulus_gpa, 200.0);
        assert_eq!(steel.yield_strength_mpa, 250.0);
        assert_eq!(steel.tensile_strength_mpa, 400.0);
    }

    #[test]
    fn load_csv_skips_bad_rows() {
        use std::io::Write;
        let dir = std::env::temp_dir();
        let path = dir.join("tensile_test_toolbox_standards_test.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "material_id,material_name,young_modulus_gpa,yield_strength_mpa,tensile_strength_mpa,density_kgm3,poisson"
        )
        .unwrap();
        writeln!(file, "M001,AISI304,193,215,505,8000,0.29").unwrap();
        writeln!(file, "M002,Broken,not_a_number,1,2,3,0.3").unwrap();
        drop(file);

        let table = StandardsTable::load_csv(&path).unwrap();
        assert_eq!(table.len(), 1);
        let aisi = table.find("aisi304").unwrap();
        assert_eq!(aisi.youngs_modulus_gpa, 193.0);

        std::fs::remove_file(&path).ok();
    }
}
