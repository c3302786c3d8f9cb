use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use tracing::warn;

use crate::db::{AttendanceSpan, CompletionRow, MinorRow};
use crate::model::{DegreeLevel, DetailRecord, honors_title};

const COMPACT_DATE: &str = "%Y%m%d";

/// The detail layout reports at most four minors per completion.
const MAX_MINORS: usize = 4;

/// Builds the sorted detail records for one submission: deduplication, SSN
/// masking, name fallbacks, code-to-indicator mappings, and date
/// reformatting. Rows without a government id cannot be verified by the
/// clearinghouse and are skipped (the count is logged).
pub fn build_records(
    completions: Vec<CompletionRow>,
    spans: &HashMap<String, AttendanceSpan>,
    minors: &[MinorRow],
) -> Vec<DetailRecord> {
    let completions = dedupe(completions);
    let minor_titles = minors_by_completion(minors);

    let mut skipped = 0usize;
    let mut records = Vec::with_capacity(completions.len());
    for row in completions {
        match reportable_ssn(row.government_id.as_deref()) {
            Some(ssn) => records.push(build_record(row, ssn, spans, &minor_titles)),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        warn!(skipped, "completions without a government id were not reported");
    }

    records.sort_by(|lhs, rhs| {
        lhs.ssn
            .cmp(&rhs.ssn)
            .then_with(|| lhs.date_awarded.cmp(&rhs.date_awarded))
    });
    records
}

/// Keeps the last row per (student, degree, curriculum, conferral date).
/// Rows arrive sorted on exactly that key, so a duplicate is always adjacent.
fn dedupe(rows: Vec<CompletionRow>) -> Vec<CompletionRow> {
    let mut deduped: Vec<CompletionRow> = Vec::with_capacity(rows.len());
    for row in rows {
        match deduped.last_mut() {
            Some(last) if same_completion(last, &row) => *last = row,
            _ => deduped.push(row),
        }
    }
    deduped
}

fn same_completion(lhs: &CompletionRow, rhs: &CompletionRow) -> bool {
    lhs.student_id == rhs.student_id
        && lhs.degree == rhs.degree
        && lhs.curriculum == rhs.curriculum
        && lhs.conferral_date == rhs.conferral_date
}

fn build_record(
    row: CompletionRow,
    ssn: String,
    spans: &HashMap<String, AttendanceSpan>,
    minor_titles: &HashMap<(String, NaiveDate), Vec<String>>,
) -> DetailRecord {
    let span = spans.get(&row.student_id);
    let minors = minor_titles
        .get(&(row.student_id.clone(), row.conferral_date))
        .cloned()
        .unwrap_or_default();

    DetailRecord {
        ssn,
        first_name: row
            .first_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| "NFN".to_string()),
        middle_name: strip_periods(row.middle_name),
        last_name: row.last_name.unwrap_or_default(),
        name_suffix: strip_periods(row.suffix),
        previous_last_name: row.previous_last_name.unwrap_or_default(),
        previous_first_name: row.previous_first_name.unwrap_or_default(),
        date_of_birth: birth_date_field(row.birth_date),
        student_id: row.student_id,
        degree_level: DegreeLevel::from_code(&row.degree)
            .map(|level| level.indicator().to_string())
            .unwrap_or_default(),
        degree_title: row.degree_title.unwrap_or_default(),
        date_awarded: row.conferral_date.format(COMPACT_DATE).to_string(),
        major: row.major_title.unwrap_or_default(),
        minors,
        cip_code: row
            .cip_code
            .map(|code| code.replace('.', ""))
            .unwrap_or_default(),
        academic_honors: row
            .honors
            .as_deref()
            .and_then(honors_title)
            .map(str::to_string)
            .unwrap_or_default(),
        attendance_from: span
            .map(|span| span.from_date.format(COMPACT_DATE).to_string())
            .unwrap_or_default(),
        attendance_to: span
            .map(|span| span.to_date.format(COMPACT_DATE).to_string())
            .unwrap_or_default(),
        ferpa_block: flag(row.release_info.as_deref() == Some("NORL")),
        financial_block: flag(row.financial_hold),
        certificate_type: if row.degree == "CERTIF" {
            "2".to_string()
        } else {
            String::new()
        },
    }
}

/// SSNs the institution assigns to students without one (the `000`, `888`,
/// and `999` prefixes) are reported as the clearinghouse `NO SSN` marker.
/// A missing or blank government id makes the row unreportable.
fn reportable_ssn(government_id: Option<&str>) -> Option<String> {
    let id = government_id?.trim();
    if id.is_empty() {
        return None;
    }
    if id.starts_with("000") || id.starts_with("888") || id.starts_with("999") {
        return Some("NO SSN".to_string());
    }
    Some(id.to_string())
}

/// Birth dates are reported only when plausibly real: the source system uses
/// 1900-01-01 as a placeholder, and anything outside 1800..2100 is noise.
fn birth_date_field(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) if plausible_birth_date(date) => date.format(COMPACT_DATE).to_string(),
        _ => String::new(),
    }
}

fn plausible_birth_date(date: NaiveDate) -> bool {
    let year = date.year();
    if !(1800..=2100).contains(&year) {
        return false;
    }
    (year, date.month(), date.day()) != (1900, 1, 1)
}

fn strip_periods(value: Option<String>) -> String {
    value
        .map(|value| value.replace('.', ""))
        .unwrap_or_default()
}

/// Groups minor titles by (student, conferral date), capped at the layout's
/// four minor columns, with the redundant " Minor" suffix removed.
fn minors_by_completion(minors: &[MinorRow]) -> HashMap<(String, NaiveDate), Vec<String>> {
    let mut titles: HashMap<(String, NaiveDate), Vec<String>> = HashMap::new();
    for minor in minors {
        let Some(title) = minor.title.as_deref() else {
            continue;
        };
        let entry = titles
            .entry((minor.student_id.clone(), minor.conferral_date))
            .or_default();
        if entry.len() < MAX_MINORS {
            entry.push(title.replace(" Minor", ""));
        }
    }
    titles
}

fn flag(value: bool) -> String {
    if value { "Y" } else { "N" }.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completion(student_id: &str, degree: &str, date: NaiveDate) -> CompletionRow {
        CompletionRow {
            student_id: student_id.to_string(),
            degree: degree.to_string(),
            curriculum: "FORS".to_string(),
            major_title: Some("Forestry".to_string()),
            conferral_date: date,
            government_id: Some("123456789".to_string()),
            first_name: Some("Avery".to_string()),
            middle_name: None,
            last_name: Some("Stone".to_string()),
            suffix: None,
            birth_date: None,
            release_info: None,
            degree_title: Some("Bachelor of Science".to_string()),
            cip_code: None,
            honors: None,
            previous_first_name: None,
            previous_last_name: None,
            financial_hold: false,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn masks_placeholder_ssns_and_skips_missing_ones() {
        assert_eq!(reportable_ssn(Some("123456789")), Some("123456789".into()));
        assert_eq!(reportable_ssn(Some("999123456")), Some("NO SSN".into()));
        assert_eq!(reportable_ssn(Some("888000000")), Some("NO SSN".into()));
        assert_eq!(reportable_ssn(Some("000120000")), Some("NO SSN".into()));
        assert_eq!(reportable_ssn(Some("   ")), None);
        assert_eq!(reportable_ssn(None), None);
    }

    #[test]
    fn blanks_placeholder_and_implausible_birth_dates() {
        assert_eq!(birth_date_field(Some(date(1999, 4, 12))), "19990412");
        assert_eq!(birth_date_field(Some(date(1900, 1, 1))), "");
        assert_eq!(birth_date_field(Some(date(1750, 6, 1))), "");
        assert_eq!(birth_date_field(None), "");
    }

    #[test]
    fn dedupe_keeps_the_last_of_adjacent_duplicates() {
        let graduation = date(2022, 5, 14);
        let mut first = completion("P000000001", "BS", graduation);
        first.major_title = Some("Forestry (old title)".to_string());
        let second = completion("P000000001", "BS", graduation);
        let other = completion("P000000002", "BS", graduation);

        let deduped = dedupe(vec![first, second.clone(), other]);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].major_title, second.major_title);
    }

    #[test]
    fn caps_minors_at_four_and_strips_the_suffix() {
        let graduation = date(2022, 5, 14);
        let minors: Vec<MinorRow> = ["Biology Minor", "Chemistry Minor", "Ecology", "Fisheries Minor", "Geology Minor"]
            .iter()
            .map(|title| MinorRow {
                student_id: "P000000001".to_string(),
                conferral_date: graduation,
                title: Some(title.to_string()),
            })
            .collect();

        let grouped = minors_by_completion(&minors);
        let titles = &grouped[&("P000000001".to_string(), graduation)];
        assert_eq!(
            titles,
            &vec!["Biology", "Chemistry", "Ecology", "Fisheries"]
        );
    }

    #[test]
    fn applies_name_fallbacks_and_level_indicator() {
        let graduation = date(2022, 5, 14);
        let mut row = completion("P000000001", "BS", graduation);
        row.first_name = None;
        row.middle_name = Some("J.".to_string());
        row.suffix = Some("Jr.".to_string());
        row.release_info = Some("NORL".to_string());

        let records = build_records(vec![row], &HashMap::new(), &[]);
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.first_name, "NFN");
        assert_eq!(record.middle_name, "J");
        assert_eq!(record.name_suffix, "Jr");
        assert_eq!(record.degree_level, "B");
        assert_eq!(record.date_awarded, "20220514");
        assert_eq!(record.ferpa_block, "Y");
        assert_eq!(record.financial_block, "N");
    }

    #[test]
    fn sorts_records_by_ssn_then_award_date() {
        let mut early = completion("P000000001", "BS", date(2022, 1, 20));
        early.government_id = Some("555443333".to_string());
        let mut late = completion("P000000001", "AS", date(2022, 5, 14));
        late.government_id = Some("555443333".to_string());
        let mut other = completion("P000000002", "BS", date(2022, 3, 1));
        other.government_id = Some("111223333".to_string());

        let records = build_records(vec![late, early, other], &HashMap::new(), &[]);
        let order: Vec<(&str, &str)> = records
            .iter()
            .map(|record| (record.ssn.as_str(), record.date_awarded.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("111223333", "20220301"),
                ("555443333", "20220120"),
                ("555443333", "20220514"),
            ]
        );
    }
}
