use serde::Serialize;

use crate::store::{ResultRecord, Subject};

/// Canonical letter grades, best first. Doubles as the display order for
/// distribution charts.
pub const GRADE_ORDER: [&str; 8] = ["A+", "A", "B+", "B", "C+", "C", "D", "F"];

/// Fixed grade scale. Anything outside the canonical set is worth 0 points;
/// that fallback is silent by contract, not an error.
pub fn grade_points(grade: &str) -> i64 {
    match grade {
        "A+" => 10,
        "A" => 9,
        "B+" => 8,
        "B" => 7,
        "C+" => 6,
        "C" => 5,
        "D" => 4,
        _ => 0,
    }
}

/// Letter grade for a percentage, as derived at write time. The grade is
/// stored on the record and never recomputed afterwards.
pub fn grade_for_percentage(percentage: f64) -> &'static str {
    if percentage >= 90.0 {
        "A+"
    } else if percentage >= 80.0 {
        "A"
    } else if percentage >= 70.0 {
        "B+"
    } else if percentage >= 60.0 {
        "B"
    } else if percentage >= 50.0 {
        "C+"
    } else if percentage >= 40.0 {
        "C"
    } else if percentage >= 30.0 {
        "D"
    } else {
        "F"
    }
}

/// Round-half-up to two decimals: `floor(100x + 0.5) / 100`.
pub fn round_half_up_2(x: f64) -> f64 {
    ((100.0 * x) + 0.5).floor() / 100.0
}

/// Grade-point average over a result slice: 0 when empty, otherwise the mean
/// of each record's grade mapped through the scale, rounded to two decimals.
pub fn calculate_gpa(results: &[ResultRecord]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let total: i64 = results.iter().map(|r| grade_points(&r.grade)).sum();
    round_half_up_2(total as f64 / results.len() as f64)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeCount {
    pub grade: String,
    pub count: usize,
}

/// Per-grade counts in canonical grade order. Grades with no occurrences are
/// omitted; non-canonical grades (possible via the silent scale fallback)
/// trail the canonical ones in first-seen order.
pub fn grade_distribution(results: &[ResultRecord]) -> Vec<GradeCount> {
    let mut out: Vec<GradeCount> = Vec::new();
    for grade in GRADE_ORDER {
        let count = results.iter().filter(|r| r.grade == grade).count();
        if count > 0 {
            out.push(GradeCount {
                grade: grade.to_string(),
                count,
            });
        }
    }
    for r in results {
        if GRADE_ORDER.contains(&r.grade.as_str()) {
            continue;
        }
        if let Some(entry) = out.iter_mut().find(|g| g.grade == r.grade) {
            entry.count += 1;
        } else {
            out.push(GradeCount {
                grade: r.grade.clone(),
                count: 1,
            });
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectAverage {
    pub subject: Subject,
    pub average: f64,
}

/// Mean of marks obtained per subject, best subject first. Subjects with no
/// results report a 0 average, matching the dashboard widget.
pub fn subject_averages(results: &[ResultRecord], subjects: &[Subject]) -> Vec<SubjectAverage> {
    let mut out: Vec<SubjectAverage> = subjects
        .iter()
        .map(|subject| {
            let marks: Vec<f64> = results
                .iter()
                .filter(|r| r.subject_id == subject.id)
                .map(|r| r.marks_obtained)
                .collect();
            let average = if marks.is_empty() {
                0.0
            } else {
                round_half_up_2(marks.iter().sum::<f64>() / marks.len() as f64)
            };
            SubjectAverage {
                subject: subject.clone(),
                average,
            }
        })
        .collect();
    out.sort_by(|a, b| {
        b.average
            .partial_cmp(&a.average)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    out
}
