//! Query descriptions for the twelve catalog questions.
//!
//! Distinct results are expressed by grouping on the entity id so the
//! ordering can stay on that id. Every ranking carries an explicit id
//! tie-break after the average.

use super::plan::{Column, Direction, SelectQuery, SortKey, Table};

const AVG: &str = "avg_grade";

fn grade(name: &'static str) -> Column {
    Table::Grades.col(name)
}

fn student(name: &'static str) -> Column {
    Table::Students.col(name)
}

fn subject(name: &'static str) -> Column {
    Table::Subjects.col(name)
}

fn teacher(name: &'static str) -> Column {
    Table::Teachers.col(name)
}

fn group(name: &'static str) -> Column {
    Table::Groups.col(name)
}

fn grades_with_students() -> SelectQuery {
    SelectQuery::new(Table::Grades).join(Table::Students, grade("student_id"), student("id"))
}

/// Q1: five best students by overall average
pub fn top_students() -> SelectQuery {
    grades_with_students()
        .select(student("fullname"), "student")
        .select_avg(grade("grade"), AVG)
        .group_by(student("id"))
        .order_by(SortKey::Alias(AVG), Direction::Desc)
        .order_by(SortKey::Column(student("id")), Direction::Asc)
        .limit(5)
}

/// Q2: best student by average in one subject
pub fn best_student_in_subject(subject_id: i64) -> SelectQuery {
    grades_with_students()
        .select(student("fullname"), "student")
        .select_avg(grade("grade"), AVG)
        .filter_eq(grade("subject_id"), subject_id)
        .group_by(student("id"))
        .order_by(SortKey::Alias(AVG), Direction::Desc)
        .order_by(SortKey::Column(student("id")), Direction::Asc)
        .limit(1)
}

/// Q3: average per group in one subject
pub fn group_averages_for_subject(subject_id: i64) -> SelectQuery {
    grades_with_students()
        .join(Table::Groups, student("group_id"), group("id"))
        .select(group("name"), "group_name")
        .select_avg(grade("grade"), AVG)
        .filter_eq(grade("subject_id"), subject_id)
        .group_by(group("id"))
        .order_by(SortKey::Alias(AVG), Direction::Desc)
        .order_by(SortKey::Column(group("id")), Direction::Asc)
}

/// Q4: average over every grade
pub fn overall_average() -> SelectQuery {
    SelectQuery::new(Table::Grades).select_avg(grade("grade"), AVG)
}

/// Q5: subjects a teacher owns
pub fn teacher_courses(teacher_id: i64) -> SelectQuery {
    SelectQuery::new(Table::Subjects)
        .join(Table::Teachers, subject("teacher_id"), teacher("id"))
        .select(teacher("fullname"), "teacher")
        .select(subject("name"), "subject")
        .filter_eq(subject("teacher_id"), teacher_id)
        .group_by(subject("id"))
        .order_by(SortKey::Column(subject("id")), Direction::Asc)
}

/// Q6: first ten students of a group
pub fn group_roster(group_id: i64) -> SelectQuery {
    SelectQuery::new(Table::Students)
        .join(Table::Groups, student("group_id"), group("id"))
        .select(group("name"), "group_name")
        .select(student("fullname"), "student")
        .filter_eq(student("group_id"), group_id)
        .order_by(SortKey::Column(student("id")), Direction::Asc)
        .limit(10)
}

/// Q7: first five grade rows for a group in a subject
pub fn group_subject_grades(group_id: i64, subject_id: i64) -> SelectQuery {
    grades_with_students()
        .join(Table::Groups, student("group_id"), group("id"))
        .join(Table::Subjects, grade("subject_id"), subject("id"))
        .select(student("fullname"), "student")
        .select(group("name"), "group_name")
        .select(subject("name"), "subject")
        .select(grade("grade"), "grade")
        .filter_eq(student("group_id"), group_id)
        .filter_eq(grade("subject_id"), subject_id)
        .order_by(SortKey::Column(grade("id")), Direction::Asc)
        .limit(5)
}

/// Q8: a teacher's average per subject they teach
pub fn teacher_subject_averages(teacher_id: i64) -> SelectQuery {
    SelectQuery::new(Table::Grades)
        .join(Table::Subjects, grade("subject_id"), subject("id"))
        .join(Table::Teachers, subject("teacher_id"), teacher("id"))
        .select(teacher("fullname"), "teacher")
        .select(subject("name"), "subject")
        .select_avg(grade("grade"), AVG)
        .filter_eq(subject("teacher_id"), teacher_id)
        .group_by(subject("id"))
        .order_by(SortKey::Column(subject("id")), Direction::Asc)
}

/// Q9: subjects a student has any grade in
pub fn student_courses(student_id: i64) -> SelectQuery {
    grades_with_students()
        .join(Table::Subjects, grade("subject_id"), subject("id"))
        .select(student("fullname"), "student")
        .select(subject("name"), "subject")
        .filter_eq(student("id"), student_id)
        .group_by(subject("id"))
        .order_by(SortKey::Column(subject("id")), Direction::Asc)
}

/// Q10: subjects a student has from one teacher
pub fn student_courses_by_teacher(student_id: i64, teacher_id: i64) -> SelectQuery {
    grades_with_students()
        .join(Table::Subjects, grade("subject_id"), subject("id"))
        .join(Table::Teachers, subject("teacher_id"), teacher("id"))
        .select(student("fullname"), "student")
        .select(subject("name"), "subject")
        .select(teacher("fullname"), "teacher")
        .filter_eq(student("id"), student_id)
        .filter_eq(teacher("id"), teacher_id)
        .group_by(subject("id"))
        .order_by(SortKey::Column(subject("id")), Direction::Asc)
}

/// Q11: average a teacher has given one student
pub fn teacher_student_average(student_id: i64, teacher_id: i64) -> SelectQuery {
    grades_with_students()
        .join(Table::Subjects, grade("subject_id"), subject("id"))
        .join(Table::Teachers, subject("teacher_id"), teacher("id"))
        .select_avg(grade("grade"), AVG)
        .select(teacher("fullname"), "teacher")
        .select(student("fullname"), "student")
        .filter_eq(student("id"), student_id)
        .filter_eq(teacher("id"), teacher_id)
        .group_by(teacher("id"))
        .group_by(student("id"))
}

/// Latest grade date for a subject within a group, as a scalar
pub fn latest_lesson_date(subject_id: i64, group_id: i64) -> SelectQuery {
    grades_with_students()
        .select_max(grade("grade_date"), "latest")
        .filter_eq(grade("subject_id"), subject_id)
        .filter_eq(student("group_id"), group_id)
}

/// Q12: every grade given on the latest lesson date
pub fn last_lesson_grades(subject_id: i64, group_id: i64) -> SelectQuery {
    grades_with_students()
        .join(Table::Subjects, grade("subject_id"), subject("id"))
        .select(subject("name"), "subject")
        .select(student("fullname"), "student")
        .select(grade("grade_date"), "grade_date")
        .select(grade("grade"), "grade")
        .filter_eq(grade("subject_id"), subject_id)
        .filter_eq(student("group_id"), group_id)
        .filter_eq_scalar(grade("grade_date"), latest_lesson_date(subject_id, group_id))
        .order_by(SortKey::Column(grade("id")), Direction::Asc)
}
