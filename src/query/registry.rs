//! Identifiers, descriptions and parameter shapes of the twelve catalog queries.

use crate::database::EntityKind;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryId {
    TopStudents,
    BestStudentInSubject,
    GroupAveragesForSubject,
    OverallAverage,
    TeacherCourses,
    GroupRoster,
    GroupSubjectGrades,
    TeacherSubjectAverages,
    StudentCourses,
    StudentCoursesByTeacher,
    TeacherStudentAverage,
    LastLessonGrades,
}

impl QueryId {
    pub const ALL: [QueryId; 12] = [
        QueryId::TopStudents,
        QueryId::BestStudentInSubject,
        QueryId::GroupAveragesForSubject,
        QueryId::OverallAverage,
        QueryId::TeacherCourses,
        QueryId::GroupRoster,
        QueryId::GroupSubjectGrades,
        QueryId::TeacherSubjectAverages,
        QueryId::StudentCourses,
        QueryId::StudentCoursesByTeacher,
        QueryId::TeacherStudentAverage,
        QueryId::LastLessonGrades,
    ];

    /// Catalog number, 1 to 12
    pub fn number(self) -> u8 {
        match self {
            QueryId::TopStudents => 1,
            QueryId::BestStudentInSubject => 2,
            QueryId::GroupAveragesForSubject => 3,
            QueryId::OverallAverage => 4,
            QueryId::TeacherCourses => 5,
            QueryId::GroupRoster => 6,
            QueryId::GroupSubjectGrades => 7,
            QueryId::TeacherSubjectAverages => 8,
            QueryId::StudentCourses => 9,
            QueryId::StudentCoursesByTeacher => 10,
            QueryId::TeacherStudentAverage => 11,
            QueryId::LastLessonGrades => 12,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|id| id.number() == number)
    }

    /// The question this query answers
    pub fn description(self) -> &'static str {
        match self {
            QueryId::TopStudents => "Find the 5 students with the highest average grade across all subjects.",
            QueryId::BestStudentInSubject => "Find the student with the highest average grade in a given subject.",
            QueryId::GroupAveragesForSubject => "Find the average grade of each group in a given subject.",
            QueryId::OverallAverage => "Find the average grade across the whole grade table.",
            QueryId::TeacherCourses => "Find which courses a given teacher teaches.",
            QueryId::GroupRoster => "Find the list of students in a given group.",
            QueryId::GroupSubjectGrades => "Find the grades of students in a given group for a given subject.",
            QueryId::TeacherSubjectAverages => "Find the average grade a given teacher gives in each of their subjects.",
            QueryId::StudentCourses => "Find the list of courses a given student attends.",
            QueryId::StudentCoursesByTeacher => "List the courses a given student attends that a given teacher teaches.",
            QueryId::TeacherStudentAverage => "Find the average grade a given teacher gives a given student.",
            QueryId::LastLessonGrades => "Find the grades of students in a given group for a given subject at the last lesson.",
        }
    }

    /// Parameter names and the entity each id refers to, in argument order
    pub fn params(self) -> &'static [(&'static str, EntityKind)] {
        match self {
            QueryId::TopStudents | QueryId::OverallAverage => &[],
            QueryId::BestStudentInSubject | QueryId::GroupAveragesForSubject => {
                &[("subject_id", EntityKind::Subject)]
            }
            QueryId::TeacherCourses | QueryId::TeacherSubjectAverages => {
                &[("teacher_id", EntityKind::Teacher)]
            }
            QueryId::GroupRoster => &[("group_id", EntityKind::Group)],
            QueryId::GroupSubjectGrades => &[
                ("group_id", EntityKind::Group),
                ("subject_id", EntityKind::Subject),
            ],
            QueryId::StudentCourses => &[("student_id", EntityKind::Student)],
            QueryId::StudentCoursesByTeacher | QueryId::TeacherStudentAverage => &[
                ("student_id", EntityKind::Student),
                ("teacher_id", EntityKind::Teacher),
            ],
            QueryId::LastLessonGrades => &[
                ("subject_id", EntityKind::Subject),
                ("group_id", EntityKind::Group),
            ],
        }
    }

    /// Arguments used by the demonstration report
    pub fn sample_args(self) -> &'static [i64] {
        match self {
            QueryId::TopStudents | QueryId::OverallAverage => &[],
            QueryId::BestStudentInSubject => &[1],
            QueryId::GroupAveragesForSubject => &[2],
            QueryId::TeacherCourses => &[2],
            QueryId::GroupRoster => &[2],
            QueryId::GroupSubjectGrades => &[1, 1],
            QueryId::TeacherSubjectAverages => &[1],
            QueryId::StudentCourses => &[1],
            QueryId::StudentCoursesByTeacher => &[3, 1],
            QueryId::TeacherStudentAverage => &[1, 1],
            QueryId::LastLessonGrades => &[1, 1],
        }
    }

    /// Usage string such as `7 <group_id> <subject_id>`
    pub fn usage(self) -> String {
        let mut usage = self.number().to_string();
        for (name, _) in self.params() {
            usage.push_str(&format!(" <{}>", name));
        }
        usage
    }
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}", self.number())
    }
}
