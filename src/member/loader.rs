//! Load member profiles from CSV for batch projections

use super::PersonalProfile;
use crate::scheme::SchemeId;
use csv::Reader;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Errors raised while reading a member file
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read member file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed member CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("member {member_id}: {reason}")]
    InvalidRow { member_id: u32, reason: String },
}

/// A member profile tagged with its identifier
#[derive(Debug, Clone, PartialEq)]
pub struct MemberRecord {
    pub member_id: u32,
    pub profile: PersonalProfile,
}

/// Raw CSV row
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "MemberID")]
    member_id: u32,
    #[serde(rename = "Scheme")]
    scheme: String,
    #[serde(rename = "CurrentSalary")]
    current_salary: f64,
    #[serde(rename = "YearsOfService")]
    years_of_service: f64,
    #[serde(rename = "CurrentAge")]
    current_age: u32,
    #[serde(rename = "RetirementAge")]
    retirement_age: u32,
    #[serde(rename = "NormalPensionAge", default)]
    normal_pension_age: Option<u32>,
}

impl CsvRow {
    fn into_record(self) -> Result<MemberRecord, LoadError> {
        let scheme: SchemeId = self.scheme.parse().map_err(|e| LoadError::InvalidRow {
            member_id: self.member_id,
            reason: format!("{}", e),
        })?;

        Ok(MemberRecord {
            member_id: self.member_id,
            profile: PersonalProfile {
                current_salary: Some(self.current_salary),
                years_of_service: Some(self.years_of_service),
                scheme: Some(scheme),
                current_age: Some(self.current_age),
                retirement_age: Some(self.retirement_age),
                normal_pension_age: self.normal_pension_age,
            },
        })
    }
}

/// Load members from a CSV file
pub fn load_members(path: &Path) -> Result<Vec<MemberRecord>, LoadError> {
    let file = std::fs::File::open(path)?;
    load_members_from_reader(file)
}

/// Load members from any CSV reader
pub fn load_members_from_reader<R: Read>(reader: R) -> Result<Vec<MemberRecord>, LoadError> {
    let mut rdr = Reader::from_reader(reader);
    let mut members = Vec::new();

    for result in rdr.deserialize() {
        let row: CsvRow = result?;
        members.push(row.into_record()?);
    }

    log::debug!("Loaded {} members", members.len());
    Ok(members)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
MemberID,Scheme,CurrentSalary,YearsOfService,CurrentAge,RetirementAge,NormalPensionAge
1,1995 Section,50000,30,55,55,60
2,2015 Scheme (career average),40000,20,45,67,
";

    #[test]
    fn test_load_members_from_reader() {
        let members = load_members_from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(members.len(), 2);

        assert_eq!(members[0].member_id, 1);
        assert_eq!(members[0].profile.scheme, Some(SchemeId::Section1995));
        assert_eq!(members[0].profile.normal_pension_age, Some(60));

        // Blank NPA falls back to the scheme default
        assert_eq!(members[1].profile.normal_pension_age, None);
        assert_eq!(members[1].profile.effective_normal_pension_age(), Some(67));
    }

    #[test]
    fn test_unknown_scheme_is_rejected() {
        let csv = "\
MemberID,Scheme,CurrentSalary,YearsOfService,CurrentAge,RetirementAge,NormalPensionAge
7,Local Government,30000,10,40,65,65
";
        match load_members_from_reader(csv.as_bytes()) {
            Err(LoadError::InvalidRow { member_id, .. }) => assert_eq!(member_id, 7),
            other => panic!("expected InvalidRow, got {:?}", other),
        }
    }
}
