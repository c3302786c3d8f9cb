use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{ExportError, Result};

/// Closed reporting window over degree conferral dates. Both boundary dates
/// are included when selecting completions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    /// Validates and builds a window. The start date must fall strictly
    /// before the end date.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start >= end {
            return Err(ExportError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Human-readable description stamped into the submission header.
    pub fn describe(&self) -> String {
        format!("Degree Completions {} to {}", self.start, self.end)
    }
}

/// Identity of the reporting institution as it appears in the submission
/// header record. Values can be overridden from a JSON profile file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InstitutionProfile {
    pub school_code: String,
    pub branch_code: String,
    pub school_name: String,
}

impl Default for InstitutionProfile {
    fn default() -> Self {
        Self {
            school_code: "002795".to_string(),
            branch_code: "00".to_string(),
            school_name: "PAUL SMITH'S COLLEGE OF THE ADIRONDACKS".to_string(),
        }
    }
}

impl InstitutionProfile {
    /// Loads a profile from a JSON file. Missing keys keep their defaults.
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}

/// Credential levels recognised by the clearinghouse, keyed from the
/// institutional degree codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegreeLevel {
    Associate,
    Bachelor,
    Master,
    Certificate,
    GraduateCertificate,
}

impl DegreeLevel {
    /// Maps an institutional degree code onto a clearinghouse level. Codes
    /// without an agreed mapping report no level.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "BS" | "BA" | "BPS" => Some(DegreeLevel::Bachelor),
            "AS" | "AAS" | "AA" | "AOS" => Some(DegreeLevel::Associate),
            "MS" | "MPS" => Some(DegreeLevel::Master),
            "CERTIF" => Some(DegreeLevel::Certificate),
            "GCERT" => Some(DegreeLevel::GraduateCertificate),
            _ => None,
        }
    }

    /// Single-character level indicator used in the detail record.
    pub fn indicator(self) -> &'static str {
        match self {
            DegreeLevel::Associate => "A",
            DegreeLevel::Bachelor => "B",
            DegreeLevel::Master => "M",
            DegreeLevel::Certificate => "C",
            DegreeLevel::GraduateCertificate => "T",
        }
    }
}

/// Spelled-out honors designation for an institutional honors code.
pub fn honors_title(code: &str) -> Option<&'static str> {
    match code {
        "CUM" => Some("Cum Laude"),
        "MAGNA" => Some("Magna Cum Laude"),
        "SUMMA" => Some("Summa Cum Laude"),
        _ => None,
    }
}

/// One fully formatted detail record, ready for fixed-width rendering. All
/// values are already in their reported form; empty strings render as blank
/// fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRecord {
    pub ssn: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub name_suffix: String,
    pub previous_last_name: String,
    pub previous_first_name: String,
    pub date_of_birth: String,
    pub student_id: String,
    pub degree_level: String,
    pub degree_title: String,
    pub date_awarded: String,
    pub major: String,
    pub minors: Vec<String>,
    pub cip_code: String,
    pub academic_honors: String,
    pub attendance_from: String,
    pub attendance_to: String,
    pub ferpa_block: String,
    pub financial_block: String,
    pub certificate_type: String,
}

impl DetailRecord {
    /// Resolves a detail-layout field name to its reported value. Fields the
    /// institution does not report resolve to an empty value; names outside
    /// the layout resolve to `None`.
    pub fn field(&self, name: &str) -> Option<&str> {
        let value: &str = match name {
            "Record Type" => "DD1",
            "Student SSN" => &self.ssn,
            "First Name" => &self.first_name,
            "Middle Name" => &self.middle_name,
            "Last Name" => &self.last_name,
            "Name Suffix" => &self.name_suffix,
            "Previous Last Name" => &self.previous_last_name,
            "Previous First Name" => &self.previous_first_name,
            "Date of Birth" => &self.date_of_birth,
            "College Student ID" => &self.student_id,
            "Degree Level Indicator" => &self.degree_level,
            "Degree, Certificate, or Credential Title" => &self.degree_title,
            "Date Degree, Credential, or Certificate Awarded" => &self.date_awarded,
            "Major Course of Study 1" => &self.major,
            "Minor Course of Study 1" => self.minor(0),
            "Minor Course of Study 2" => self.minor(1),
            "Minor Course of Study 3" => self.minor(2),
            "Minor Course of Study 4" => self.minor(3),
            "NCES CIP Code for Major 1" => &self.cip_code,
            "Academic Honors" => &self.academic_honors,
            "Attendance From Date" => &self.attendance_from,
            "Attendance To Date" => &self.attendance_to,
            "FERPA Block" => &self.ferpa_block,
            "School Financial Block" => &self.financial_block,
            "Certificate Type" => &self.certificate_type,
            "School/College/Division Awarding Degree"
            | "Joint Institution/College/School/Division Name"
            | "Major Course of Study 2"
            | "Major Course of Study 3"
            | "Major Course of Study 4"
            | "Major Option 1"
            | "Major Option 2"
            | "Major Concentration 1"
            | "Major Concentration 2"
            | "Major Concentration 3"
            | "NCES CIP Code for Major 2"
            | "NCES CIP Code for Major 3"
            | "NCES CIP Code for Major 4"
            | "NCES CIP Code for Minor 1"
            | "NCES CIP Code for Minor 2"
            | "NCES CIP Code for Minor 3"
            | "NCES CIP Code for Minor 4"
            | "Honors Program"
            | "Other Honors"
            | "Name of Institution Granting Degree"
            | "Reverse Transfer Flag" => "",
            _ => return None,
        };
        Some(value)
    }

    fn minor(&self, index: usize) -> &str {
        self.minors.get(index).map(String::as_str).unwrap_or("")
    }
}
