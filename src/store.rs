use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: String,
    pub subject_name: String,
    pub subject_code: String,
}

/// One student's score record for one subject/term. Student and subject
/// display fields are copied in at write time and deliberately never kept in
/// sync afterwards: a result is a snapshot of the roster as it stood when the
/// mark was entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    pub roll_number: String,
    pub subject_id: String,
    pub subject_name: String,
    pub subject_code: String,
    pub academic_year: String,
    pub semester: String,
    pub marks_obtained: f64,
    pub total_marks: f64,
    pub grade: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Class,
    Subject,
    Student,
}

impl ReportType {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportType::Class => "class",
            ReportType::Subject => "subject",
            ReportType::Student => "student",
        }
    }
}

/// Metadata describing a generated report. No artifact is materialized;
/// `file_path` is a synthesized placeholder the UI displays as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub admin_id: String,
    pub report_type: ReportType,
    pub generated_on: String,
    pub file_path: String,
    pub title: String,
}

/// Optional equality predicates narrowing a result query. An unset field
/// imposes no constraint, so the empty filter is the identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultFilter {
    pub academic_year: Option<String>,
    pub semester: Option<String>,
    pub subject_id: Option<String>,
}

impl ResultFilter {
    /// The UI's selects use "ALL" (any case) and empty string as the unset
    /// sentinel; normalize those to None so matching stays plain equality.
    pub fn normalized(mut self) -> Self {
        fn scrub(v: Option<String>) -> Option<String> {
            match v {
                Some(s) if s.trim().is_empty() => None,
                Some(s) if s.trim().eq_ignore_ascii_case("ALL") => None,
                other => other,
            }
        }
        self.academic_year = scrub(self.academic_year);
        self.semester = scrub(self.semester);
        self.subject_id = scrub(self.subject_id);
        self
    }

    pub fn matches(&self, r: &ResultRecord) -> bool {
        let year_ok = self
            .academic_year
            .as_deref()
            .map(|y| r.academic_year == y)
            .unwrap_or(true);
        let sem_ok = self
            .semester
            .as_deref()
            .map(|s| r.semester == s)
            .unwrap_or(true);
        let subj_ok = self
            .subject_id
            .as_deref()
            .map(|s| r.subject_id == s)
            .unwrap_or(true);
        year_ok && sem_ok && subj_ok
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    NotFound,
}

/// Draft of a result as it arrives from the admin form: everything but the
/// assigned id.
#[derive(Debug, Clone)]
pub struct ResultDraft {
    pub student_id: String,
    pub student_name: String,
    pub roll_number: String,
    pub subject_id: String,
    pub subject_name: String,
    pub subject_code: String,
    pub academic_year: String,
    pub semester: String,
    pub marks_obtained: f64,
    pub total_marks: f64,
    pub grade: String,
}

/// In-memory ordered collection of result records. Insertion order is the
/// display order; filtering is stable and never re-sorts.
///
/// Ids are random UUIDs rather than `result<N>` counters so that deleting a
/// record can never cause a later insert to collide with a surviving id.
pub struct ResultStore {
    results: Vec<ResultRecord>,
}

impl ResultStore {
    pub fn new(results: Vec<ResultRecord>) -> Self {
        Self { results }
    }

    pub fn all(&self) -> &[ResultRecord] {
        &self.results
    }

    pub fn add(&mut self, draft: ResultDraft) -> ResultRecord {
        let record = ResultRecord {
            id: Uuid::new_v4().to_string(),
            student_id: draft.student_id,
            student_name: draft.student_name,
            roll_number: draft.roll_number,
            subject_id: draft.subject_id,
            subject_name: draft.subject_name,
            subject_code: draft.subject_code,
            academic_year: draft.academic_year,
            semester: draft.semester,
            marks_obtained: draft.marks_obtained,
            total_marks: draft.total_marks,
            grade: draft.grade,
        };
        self.results.push(record.clone());
        record
    }

    pub fn update(&mut self, record: ResultRecord) -> Result<ResultRecord, StoreError> {
        let slot = self
            .results
            .iter_mut()
            .find(|r| r.id == record.id)
            .ok_or(StoreError::NotFound)?;
        *slot = record.clone();
        Ok(record)
    }

    pub fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        let before = self.results.len();
        self.results.retain(|r| r.id != id);
        if self.results.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&ResultRecord> {
        self.results.iter().find(|r| r.id == id)
    }

    pub fn filter(&self, filter: &ResultFilter) -> Vec<ResultRecord> {
        self.results
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect()
    }

    pub fn by_student(&self, student_id: &str, filter: &ResultFilter) -> Vec<ResultRecord> {
        self.results
            .iter()
            .filter(|r| r.student_id == student_id && filter.matches(r))
            .cloned()
            .collect()
    }

    /// Distinct academic years in first-seen order (dropdown feed).
    pub fn academic_years(&self) -> Vec<String> {
        let mut years: Vec<String> = Vec::new();
        for r in &self.results {
            if !years.contains(&r.academic_year) {
                years.push(r.academic_year.clone());
            }
        }
        years
    }

    /// Distinct semesters in first-seen order (dropdown feed).
    pub fn semesters(&self) -> Vec<String> {
        let mut semesters: Vec<String> = Vec::new();
        for r in &self.results {
            if !semesters.contains(&r.semester) {
                semesters.push(r.semester.clone());
            }
        }
        semesters
    }
}

/// In-memory collection of report metadata. Reports are immutable once
/// created; the only operations are append and delete.
pub struct ReportStore {
    reports: Vec<Report>,
}

impl ReportStore {
    pub fn new(reports: Vec<Report>) -> Self {
        Self { reports }
    }

    pub fn all(&self) -> &[Report] {
        &self.reports
    }

    pub fn add(
        &mut self,
        admin_id: String,
        report_type: ReportType,
        file_path: String,
        title: String,
        generated_on: DateTime<Utc>,
    ) -> Report {
        let report = Report {
            id: Uuid::new_v4().to_string(),
            admin_id,
            report_type,
            generated_on: generated_on.to_rfc3339_opts(SecondsFormat::Secs, true),
            file_path,
            title,
        };
        self.reports.push(report.clone());
        report
    }

    pub fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        let before = self.reports.len();
        self.reports.retain(|r| r.id != id);
        if self.reports.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

pub fn seeded_subjects() -> Vec<Subject> {
    let rows = [
        ("subject1", "Mathematics", "MATH101"),
        ("subject2", "Computer Science", "CS101"),
        ("subject3", "Physics", "PHY101"),
        ("subject4", "Database Systems", "CS201"),
        ("subject5", "Data Structures", "CS202"),
    ];
    rows.iter()
        .map(|(id, name, code)| Subject {
            id: (*id).into(),
            subject_name: (*name).into(),
            subject_code: (*code).into(),
        })
        .collect()
}

pub fn seeded_results() -> Vec<ResultRecord> {
    // (student, subject, year, semester, marks, total, grade)
    let rows: [(&str, &str, &str, &str, f64, f64, &str); 9] = [
        ("student1", "subject1", "2023-2024", "Semester 1", 85.0, 100.0, "A"),
        ("student1", "subject2", "2023-2024", "Semester 1", 92.0, 100.0, "A+"),
        ("student1", "subject3", "2023-2024", "Semester 1", 78.0, 100.0, "B+"),
        ("student2", "subject1", "2023-2024", "Semester 1", 88.0, 100.0, "A"),
        ("student2", "subject2", "2023-2024", "Semester 1", 95.0, 100.0, "A+"),
        ("student3", "subject4", "2023-2024", "Semester 2", 84.0, 100.0, "B+"),
        ("student3", "subject5", "2023-2024", "Semester 2", 91.0, 100.0, "A+"),
        ("student4", "subject4", "2023-2024", "Semester 2", 89.0, 100.0, "A"),
        ("student4", "subject5", "2023-2024", "Semester 2", 88.0, 100.0, "A"),
    ];
    let students = crate::identity::IdentityStore::seeded();
    let subjects = seeded_subjects();

    rows.iter()
        .map(|(student_id, subject_id, year, semester, marks, total, grade)| {
            let student = students
                .student_by_id(student_id)
                .expect("seed student exists");
            let subject = subjects
                .iter()
                .find(|s| s.id == *subject_id)
                .expect("seed subject exists");
            ResultRecord {
                id: Uuid::new_v4().to_string(),
                student_id: (*student_id).into(),
                student_name: student.name.clone(),
                roll_number: student.roll_number.clone(),
                subject_id: (*subject_id).into(),
                subject_name: subject.subject_name.clone(),
                subject_code: subject.subject_code.clone(),
                academic_year: (*year).into(),
                semester: (*semester).into(),
                marks_obtained: *marks,
                total_marks: *total,
                grade: (*grade).into(),
            }
        })
        .collect()
}

pub fn seeded_reports() -> Vec<Report> {
    let rows = [
        (
            ReportType::Class,
            (2024, 4, 15),
            "/reports/class-report-2023-2024-sem1.pdf",
            "Class Performance Report - 2023-2024 Semester 1",
        ),
        (
            ReportType::Subject,
            (2024, 4, 16),
            "/reports/subject-report-math101.pdf",
            "Subject Performance Report - Mathematics (MATH101)",
        ),
        (
            ReportType::Student,
            (2024, 4, 17),
            "/reports/student-report-AP22110010489.pdf",
            "Student Performance Report - Jaswanth Kumar (AP22110010489)",
        ),
    ];
    rows.iter()
        .map(|(report_type, (y, m, d), path, title)| Report {
            id: Uuid::new_v4().to_string(),
            admin_id: "admin1".into(),
            report_type: *report_type,
            generated_on: Utc
                .with_ymd_and_hms(*y, *m, *d, 0, 0, 0)
                .single()
                .expect("valid seed date")
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            file_path: (*path).into(),
            title: (*title).into(),
        })
        .collect()
}
