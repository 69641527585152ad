use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: String,
    pub username: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub username: String,
    pub name: String,
    pub email: String,
    pub roll_number: String,
    #[serde(default)]
    pub is_voice_over_enabled: bool,
}

/// Role-tagged identity record. The `role` tag is the discriminant the UI
/// switches on, so it doubles as the serialized field name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "camelCase")]
pub enum User {
    #[serde(rename = "admin")]
    Admin(Admin),
    #[serde(rename = "student")]
    Student(Student),
}

/// Fixed seed set of admins and students. No credential store exists:
/// resolution is an exact username match and the password is never inspected.
/// Records are created once at startup; the only mutation is the voice-over
/// flag rewrite on students.
pub struct IdentityStore {
    admins: Vec<Admin>,
    students: Vec<Student>,
}

impl IdentityStore {
    pub fn seeded() -> Self {
        Self {
            admins: vec![Admin {
                id: "admin1".into(),
                username: "admin".into(),
                name: "Admin User".into(),
                email: "admin@srm.edu".into(),
            }],
            students: vec![
                Student {
                    id: "student1".into(),
                    username: "jaswanth".into(),
                    name: "Jaswanth Kumar Addepalli".into(),
                    email: "jaswanth@srm.edu".into(),
                    roll_number: "AP22110010489".into(),
                    is_voice_over_enabled: false,
                },
                Student {
                    id: "student2".into(),
                    username: "raja".into(),
                    name: "Raja Venkat Venigalla".into(),
                    email: "raja@srm.edu".into(),
                    roll_number: "AP22110010376".into(),
                    is_voice_over_enabled: false,
                },
                Student {
                    id: "student3".into(),
                    username: "ravi".into(),
                    name: "Ravi Shankar Thota".into(),
                    email: "ravi@srm.edu".into(),
                    roll_number: "AP22110010466".into(),
                    is_voice_over_enabled: false,
                },
                Student {
                    id: "student4".into(),
                    username: "hasini".into(),
                    name: "Hasini Kallepalli".into(),
                    email: "hasini@srm.edu".into(),
                    roll_number: "AP22110010695".into(),
                    is_voice_over_enabled: true,
                },
            ],
        }
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    /// Admins are checked before students, matching the original login order.
    pub fn resolve(&self, username: &str) -> Option<User> {
        if let Some(a) = self.admins.iter().find(|a| a.username == username) {
            return Some(User::Admin(a.clone()));
        }
        self.students
            .iter()
            .find(|s| s.username == username)
            .map(|s| User::Student(s.clone()))
    }

    pub fn student_by_id(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    /// Rewrites the stored student record wholesale. Returns the new record,
    /// or None if the id is unknown.
    pub fn replace_student(&mut self, student: Student) -> Option<Student> {
        let slot = self.students.iter_mut().find(|s| s.id == student.id)?;
        *slot = student.clone();
        Some(student)
    }
}
