//! Fixed-width field tables for the DegreeVerify submission format.
//!
//! Every record in a submission file is exactly [`RECORD_LENGTH`] characters.
//! The tables below carry the documented 1-based start and end position of
//! each column alongside its width so that a mistyped entry is caught by
//! [`validate`] instead of silently shifting every later column.

use crate::error::{ExportError, Result};

/// Total length of every record in a submission file.
pub const RECORD_LENGTH: usize = 3840;

/// One column of a fixed-width record. Positions are 1-based and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub width: usize,
    pub start: usize,
    pub end: usize,
}

const fn field(name: &'static str, width: usize, start: usize, end: usize) -> Field {
    Field {
        name,
        width,
        start,
        end,
    }
}

/// Columns of the `DH1` header record.
pub const HEADER_FIELDS: &[Field] = &[
    field("Record Type", 3, 1, 3),
    field("School Code", 6, 4, 9),
    field("Branch Code", 2, 10, 11),
    field("Official School Name", 80, 12, 91),
    field("Filler01", 15, 92, 106),
    field("Standard Report Flag", 1, 107, 107),
    field("Transmission Date", 8, 108, 115),
    field("Degree Period", 80, 116, 195),
    field("Filler02", 3645, 196, 3840),
];

/// Columns of the `DD1` student detail record.
pub const DETAIL_FIELDS: &[Field] = &[
    field("Record Type", 3, 1, 3),
    field("Student SSN", 9, 4, 12),
    field("First Name", 40, 13, 52),
    field("Middle Name", 40, 53, 92),
    field("Last Name", 40, 93, 132),
    field("Name Suffix", 5, 133, 137),
    field("Previous Last Name", 40, 138, 177),
    field("Previous First Name", 40, 178, 217),
    field("Date of Birth", 8, 218, 225),
    field("College Student ID", 20, 226, 245),
    field("Filler01", 59, 246, 304),
    field("Degree Level Indicator", 1, 305, 305),
    field("Degree, Certificate, or Credential Title", 80, 306, 385),
    field("School/College/Division Awarding Degree", 50, 386, 435),
    field("Joint Institution/College/School/Division Name", 60, 436, 495),
    field("Date Degree, Credential, or Certificate Awarded", 8, 496, 503),
    field("Filler02", 80, 504, 583),
    field("Major Course of Study 1", 80, 584, 663),
    field("Major Course of Study 2", 80, 664, 743),
    field("Major Course of Study 3", 80, 744, 823),
    field("Major Course of Study 4", 80, 824, 903),
    field("Filler03", 160, 904, 1063),
    field("Minor Course of Study 1", 80, 1064, 1143),
    field("Minor Course of Study 2", 80, 1144, 1223),
    field("Minor Course of Study 3", 80, 1224, 1303),
    field("Minor Course of Study 4", 80, 1304, 1383),
    field("Filler04", 160, 1384, 1543),
    field("Major Option 1", 80, 1544, 1623),
    field("Major Option 2", 80, 1624, 1703),
    field("Filler05", 160, 1704, 1863),
    field("Major Concentration 1", 80, 1864, 1943),
    field("Major Concentration 2", 80, 1944, 2023),
    field("Major Concentration 3", 80, 2024, 2103),
    field("Filler06", 280, 2104, 2383),
    field("NCES CIP Code for Major 1", 6, 2384, 2389),
    field("NCES CIP Code for Major 2", 6, 2390, 2395),
    field("NCES CIP Code for Major 3", 6, 2396, 2401),
    field("NCES CIP Code for Major 4", 6, 2402, 2407),
    field("Filler07", 20, 2408, 2427),
    field("NCES CIP Code for Minor 1", 6, 2428, 2433),
    field("NCES CIP Code for Minor 2", 6, 2434, 2439),
    field("NCES CIP Code for Minor 3", 6, 2440, 2445),
    field("NCES CIP Code for Minor 4", 6, 2446, 2451),
    field("Filler08", 120, 2452, 2571),
    field("Academic Honors", 50, 2572, 2621),
    field("Filler09", 196, 2622, 2817),
    field("Honors Program", 50, 2818, 2867),
    field("Filler10", 100, 2868, 2967),
    field("Other Honors", 150, 2968, 3117),
    field("Attendance From Date", 8, 3118, 3125),
    field("Attendance To Date", 8, 3126, 3133),
    field("FERPA Block", 1, 3134, 3134),
    field("School Financial Block", 1, 3135, 3135),
    field("Filler11", 100, 3136, 3235),
    field("Name of Institution Granting Degree", 50, 3236, 3285),
    field("Reverse Transfer Flag", 1, 3286, 3286),
    field("Certificate Type", 1, 3287, 3287),
    field("Filler12", 553, 3288, 3840),
];

/// Columns of the `DT1` trailer record.
pub const TRAILER_FIELDS: &[Field] = &[
    field("Record Type", 3, 1, 3),
    field("Total Record Count", 10, 4, 13),
    field("Filler01", 3827, 14, 3840),
];

/// Checks that a field table is internally consistent: widths agree with the
/// claimed positions, columns are contiguous from position 1, and the final
/// column ends at [`RECORD_LENGTH`].
pub fn validate(fields: &[Field]) -> Result<()> {
    let mut expected_start = 1;
    for field in fields {
        if field.start != expected_start {
            return Err(ExportError::InvalidLayout(format!(
                "field '{}' starts at {} but position {} is next",
                field.name, field.start, expected_start
            )));
        }
        if field.start + field.width - 1 != field.end {
            return Err(ExportError::InvalidLayout(format!(
                "field '{}' claims width {} over positions {}..{}",
                field.name, field.width, field.start, field.end
            )));
        }
        expected_start = field.end + 1;
    }
    if expected_start != RECORD_LENGTH + 1 {
        return Err(ExportError::InvalidLayout(format!(
            "layout covers {} positions, expected {}",
            expected_start - 1,
            RECORD_LENGTH
        )));
    }
    Ok(())
}

/// Renders one record using a field table and a value lookup. Values are
/// left-justified, space-padded to the field width, and truncated when over
/// long. `Filler` columns always render blank.
pub fn render_line(
    fields: &[Field],
    value_for: impl Fn(&str) -> Option<String>,
) -> Result<String> {
    let mut line = String::with_capacity(RECORD_LENGTH);
    for field in fields {
        let value = if field.name.starts_with("Filler") {
            String::new()
        } else {
            value_for(field.name).ok_or_else(|| ExportError::UnknownField(field.name.to_string()))?
        };
        push_padded(&mut line, &value, field.width);
    }
    Ok(line)
}

fn push_padded(line: &mut String, value: &str, width: usize) {
    let mut written = 0;
    for ch in value.chars().take(width) {
        line.push(ch);
        written += 1;
    }
    for _ in written..width {
        line.push(' ');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_layouts_are_consistent() {
        validate(HEADER_FIELDS).expect("header layout");
        validate(DETAIL_FIELDS).expect("detail layout");
        validate(TRAILER_FIELDS).expect("trailer layout");
    }

    #[test]
    fn validate_rejects_gaps_and_bad_widths() {
        let gap = [field("A", 3, 1, 3), field("B", 2, 5, 6)];
        assert!(validate(&gap).is_err());

        let bad_width = [field("A", 4, 1, 3)];
        assert!(validate(&bad_width).is_err());

        let short = [field("A", 3, 1, 3)];
        assert!(validate(&short).is_err());
    }

    #[test]
    fn render_pads_and_truncates() {
        let fields = [field("Name", 5, 1, 5), field("Code", 3, 6, 8)];
        let line = render_line(&fields, |name| {
            Some(match name {
                "Name" => "Amelia".to_string(),
                "Code" => "B".to_string(),
                _ => unreachable!(),
            })
        })
        .expect("rendered");
        assert_eq!(line, "AmeliB  ");
    }

    #[test]
    fn render_blanks_fillers_and_rejects_unknown_fields() {
        let fields = [field("Filler01", 4, 1, 4)];
        let line = render_line(&fields, |_| None).expect("rendered");
        assert_eq!(line, "    ");

        let fields = [field("Mystery", 4, 1, 4)];
        assert!(render_line(&fields, |_| None).is_err());
    }
}
