use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{Connection, OpenFlags, Row, params};

use crate::error::Result;
use crate::model::DateWindow;

/// Read-only handle over the student-records database. `TRANSCRIPTDEGREE`
/// holds conferred credentials, `PEOPLE` the biographic data, and the
/// remaining tables supply code translations, honors, former names, holds,
/// and term calendars. The connection is held for the duration of one export
/// run and released when dropped.
pub struct StudentDb {
    conn: Connection,
}

/// One degree completion joined with the person and code-table context the
/// clearinghouse detail record needs.
#[derive(Debug, Clone)]
pub struct CompletionRow {
    pub student_id: String,
    pub degree: String,
    pub curriculum: String,
    pub major_title: Option<String>,
    pub conferral_date: NaiveDate,
    pub government_id: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub suffix: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub release_info: Option<String>,
    pub degree_title: Option<String>,
    pub cip_code: Option<String>,
    pub honors: Option<String>,
    pub previous_first_name: Option<String>,
    pub previous_last_name: Option<String>,
    pub financial_hold: bool,
}

/// A minor conferred alongside a degree.
#[derive(Debug, Clone)]
pub struct MinorRow {
    pub student_id: String,
    pub conferral_date: NaiveDate,
    pub title: Option<String>,
}

/// First and last dates of attendance for one student.
#[derive(Debug, Clone, Copy)]
pub struct AttendanceSpan {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

impl StudentDb {
    /// Opens the database read-only. The export never writes to the source
    /// system.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }

    /// Degree completions with a conferral date inside the closed window,
    /// excluding non-degree (`NOND`) rows and minors. Each row carries the
    /// joined person, title, CIP, honors, former-name, and hold context.
    /// Ordered so downstream dedup and serialization are stable.
    pub fn completions(&self, window: &DateWindow) -> Result<Vec<CompletionRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT td.PEOPLE_CODE_ID AS student_id,
                    td.DEGREE AS degree,
                    td.CURRICULUM AS curriculum,
                    td.FORMAL_TITLE AS major_title,
                    date(td.GRADUATION_DATE) AS conferral_date,
                    p.GOVERNMENT_ID AS government_id,
                    p.FIRST_NAME AS first_name,
                    p.MIDDLE_NAME AS middle_name,
                    p.LAST_NAME AS last_name,
                    p.SUFFIX AS suffix,
                    date(p.BIRTH_DATE) AS birth_date,
                    p.RELEASE_INFO AS release_info,
                    (SELECT cd.LONG_DESC FROM CODE_DEGREE cd
                      WHERE cd.CODE_VALUE_KEY = td.DEGREE) AS degree_title,
                    (SELECT dm.CipCode FROM DegreeMappingNsc dm
                      WHERE dm.Degree = td.DEGREE AND dm.Curriculum = td.CURRICULUM
                      ORDER BY dm.AcademicYear DESC LIMIT 1) AS cip_code,
                    (SELECT th.HONORS FROM TRANSCRIPTHONORS th
                      WHERE th.PEOPLE_CODE_ID = td.PEOPLE_CODE_ID
                        AND th.DEGREE = td.DEGREE
                        AND th.CURRICULUM = td.CURRICULUM
                      ORDER BY th.HONORS LIMIT 1) AS honors,
                    (SELECT pf.FIRST_NAME FROM PEOPLEFORMERNAME pf
                      WHERE pf.PEOPLE_CODE_ID = td.PEOPLE_CODE_ID
                      ORDER BY pf.NAME_CHANGE_DATE DESC LIMIT 1) AS previous_first_name,
                    (SELECT pf.LAST_NAME FROM PEOPLEFORMERNAME pf
                      WHERE pf.PEOPLE_CODE_ID = td.PEOPLE_CODE_ID
                      ORDER BY pf.NAME_CHANGE_DATE DESC LIMIT 1) AS previous_last_name,
                    EXISTS(SELECT 1 FROM STOPLIST sl
                      WHERE sl.PEOPLE_CODE_ID = td.PEOPLE_CODE_ID
                        AND sl.STOP_REASON IN ('BURS', 'COLL', 'STAC')
                        AND sl.CLEARED = 'N') AS financial_hold
             FROM TRANSCRIPTDEGREE td
             LEFT JOIN PEOPLE p ON p.PEOPLE_CODE_ID = td.PEOPLE_CODE_ID
             WHERE td.GRADUATION_DATE IS NOT NULL
               AND date(td.GRADUATION_DATE) BETWEEN date(?1) AND date(?2)
               AND td.DEGREE NOT IN ('NOND', 'MINOR')
             ORDER BY td.PEOPLE_CODE_ID, td.DEGREE, td.CURRICULUM, td.GRADUATION_DATE",
        )?;
        let rows = stmt
            .query_map(params![window.start(), window.end()], completion_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Minors conferred inside the closed window, one row per distinct
    /// student, curriculum, and conferral date.
    pub fn minors(&self, window: &DateWindow) -> Result<Vec<MinorRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT PEOPLE_CODE_ID AS student_id,
                    date(GRADUATION_DATE) AS conferral_date,
                    CURRICULUM AS curriculum,
                    FORMAL_TITLE AS title
             FROM TRANSCRIPTDEGREE
             WHERE DEGREE = 'MINOR'
               AND GRADUATION_DATE IS NOT NULL
               AND date(GRADUATION_DATE) BETWEEN date(?1) AND date(?2)
             ORDER BY student_id, conferral_date, curriculum",
        )?;
        let rows = stmt
            .query_map(params![window.start(), window.end()], |row| {
                Ok(MinorRow {
                    student_id: row.get("student_id")?,
                    conferral_date: row.get("conferral_date")?,
                    title: row.get("title")?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Per-student attendance span: earliest term start to latest term end
    /// over enrolled primary academic rows, using the term calendar. The
    /// term end is the later of the scheduled and final end dates.
    pub fn attendance_spans(&self) -> Result<HashMap<String, AttendanceSpan>> {
        let mut stmt = self.conn.prepare(
            "SELECT a.PEOPLE_CODE_ID AS student_id,
                    MIN(date(c.START_DATE)) AS from_date,
                    MAX(date(MAX(c.END_DATE, COALESCE(c.FINAL_END_DATE, c.END_DATE)))) AS to_date
             FROM ACADEMIC a
             JOIN ACADEMICCALENDAR c
               ON c.ACADEMIC_YEAR = a.ACADEMIC_YEAR
              AND c.ACADEMIC_TERM = a.ACADEMIC_TERM
             WHERE a.ACADEMIC_SESSION = ''
               AND a.PRIMARY_FLAG = 'Y'
               AND a.CREDITS > 0
               AND a.ENROLL_SEPARATION = 'ENRL'
               AND a.ACADEMIC_TERM NOT IN ('Transfer', 'JTERM')
               AND CAST(a.ACADEMIC_YEAR AS INTEGER) > 1999
             GROUP BY a.PEOPLE_CODE_ID",
        )?;
        let mut spans = HashMap::new();
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let student_id: String = row.get("student_id")?;
            let from_date: Option<NaiveDate> = row.get("from_date")?;
            let to_date: Option<NaiveDate> = row.get("to_date")?;
            if let (Some(from_date), Some(to_date)) = (from_date, to_date) {
                spans.insert(
                    student_id,
                    AttendanceSpan {
                        from_date,
                        to_date,
                    },
                );
            }
        }
        Ok(spans)
    }
}

fn completion_from_row(row: &Row<'_>) -> rusqlite::Result<CompletionRow> {
    Ok(CompletionRow {
        student_id: row.get("student_id")?,
        degree: row.get("degree")?,
        curriculum: row.get("curriculum")?,
        major_title: row.get("major_title")?,
        conferral_date: row.get("conferral_date")?,
        government_id: row.get("government_id")?,
        first_name: row.get("first_name")?,
        middle_name: row.get("middle_name")?,
        last_name: row.get("last_name")?,
        suffix: row.get("suffix")?,
        birth_date: row.get("birth_date")?,
        release_info: row.get("release_info")?,
        degree_title: row.get("degree_title")?,
        cip_code: row.get("cip_code")?,
        honors: row.get("honors")?,
        previous_first_name: row.get("previous_first_name")?,
        previous_last_name: row.get("previous_last_name")?,
        financial_hold: row.get("financial_hold")?,
    })
}
