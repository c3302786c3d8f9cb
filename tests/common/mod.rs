use std::path::Path;

use rusqlite::{Connection, params};

/// Creates a student-records database with the tables the export queries.
pub fn create_database(path: &Path) -> Connection {
    let conn = Connection::open(path).expect("database created");
    conn.execute_batch(
        r#"
        CREATE TABLE PEOPLE (
            PEOPLE_CODE_ID TEXT PRIMARY KEY,
            GOVERNMENT_ID TEXT,
            FIRST_NAME TEXT,
            MIDDLE_NAME TEXT,
            LAST_NAME TEXT,
            SUFFIX TEXT,
            BIRTH_DATE TEXT,
            RELEASE_INFO TEXT
        );
        CREATE TABLE PEOPLEFORMERNAME (
            PEOPLE_CODE_ID TEXT,
            FIRST_NAME TEXT,
            MIDDLE_NAME TEXT,
            LAST_NAME TEXT,
            NAME_CHANGE_DATE TEXT
        );
        CREATE TABLE TRANSCRIPTDEGREE (
            PEOPLE_CODE_ID TEXT,
            PROGRAM TEXT,
            DEGREE TEXT,
            CURRICULUM TEXT,
            FORMAL_TITLE TEXT,
            GRADUATION_DATE TEXT
        );
        CREATE TABLE TRANSCRIPTHONORS (
            PEOPLE_CODE_ID TEXT,
            PROGRAM TEXT,
            DEGREE TEXT,
            CURRICULUM TEXT,
            HONORS TEXT
        );
        CREATE TABLE DegreeMappingNsc (
            AcademicYear TEXT,
            AcademicTerm TEXT,
            Degree TEXT,
            Curriculum TEXT,
            CipCode TEXT,
            CipYear TEXT
        );
        CREATE TABLE CODE_DEGREE (
            CODE_VALUE_KEY TEXT PRIMARY KEY,
            LONG_DESC TEXT
        );
        CREATE TABLE STOPLIST (
            PEOPLE_CODE_ID TEXT,
            STOP_REASON TEXT,
            STOP_DATE TEXT,
            CLEARED TEXT
        );
        CREATE TABLE ACADEMIC (
            PEOPLE_CODE_ID TEXT,
            ACADEMIC_YEAR TEXT,
            ACADEMIC_TERM TEXT,
            ACADEMIC_SESSION TEXT,
            ENROLL_SEPARATION TEXT,
            PRIMARY_FLAG TEXT,
            CREDITS REAL
        );
        CREATE TABLE ACADEMICCALENDAR (
            ACADEMIC_YEAR TEXT,
            ACADEMIC_TERM TEXT,
            ACADEMIC_SESSION TEXT,
            START_DATE TEXT,
            END_DATE TEXT,
            FINAL_END_DATE TEXT
        );
        "#,
    )
    .expect("schema created");
    conn
}

pub fn add_person(
    conn: &Connection,
    id: &str,
    government_id: Option<&str>,
    first: Option<&str>,
    last: &str,
    birth: Option<&str>,
    release: Option<&str>,
) {
    conn.execute(
        "INSERT INTO PEOPLE (PEOPLE_CODE_ID, GOVERNMENT_ID, FIRST_NAME, LAST_NAME, BIRTH_DATE, RELEASE_INFO)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![id, government_id, first, last, birth, release],
    )
    .expect("person inserted");
}

pub fn add_degree(
    conn: &Connection,
    id: &str,
    degree: &str,
    curriculum: &str,
    title: &str,
    graduation: &str,
) {
    conn.execute(
        "INSERT INTO TRANSCRIPTDEGREE (PEOPLE_CODE_ID, PROGRAM, DEGREE, CURRICULUM, FORMAL_TITLE, GRADUATION_DATE)
         VALUES (?1, 'UNDG', ?2, ?3, ?4, ?5)",
        params![id, degree, curriculum, title, graduation],
    )
    .expect("degree inserted");
}

pub fn add_degree_title(conn: &Connection, code: &str, title: &str) {
    conn.execute(
        "INSERT INTO CODE_DEGREE (CODE_VALUE_KEY, LONG_DESC) VALUES (?1, ?2)",
        params![code, title],
    )
    .expect("degree title inserted");
}

pub fn add_enrollment(conn: &Connection, id: &str, year: &str, term: &str) {
    conn.execute(
        "INSERT INTO ACADEMIC
           (PEOPLE_CODE_ID, ACADEMIC_YEAR, ACADEMIC_TERM, ACADEMIC_SESSION, ENROLL_SEPARATION, PRIMARY_FLAG, CREDITS)
         VALUES (?1, ?2, ?3, '', 'ENRL', 'Y', 15.0)",
        params![id, year, term],
    )
    .expect("enrollment inserted");
}

pub fn add_term(
    conn: &Connection,
    year: &str,
    term: &str,
    start: &str,
    end: &str,
    final_end: Option<&str>,
) {
    conn.execute(
        "INSERT INTO ACADEMICCALENDAR
           (ACADEMIC_YEAR, ACADEMIC_TERM, ACADEMIC_SESSION, START_DATE, END_DATE, FINAL_END_DATE)
         VALUES (?1, ?2, '', ?3, ?4, ?5)",
        params![year, term, start, end, final_end],
    )
    .expect("term inserted");
}
