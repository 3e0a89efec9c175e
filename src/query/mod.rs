/*!
 * The read-only query catalog.
 *
 * - `plan`: structured query descriptions rendered to parameterized SQL
 * - `plans`: the twelve catalog queries as descriptions
 * - `registry`: query ids, descriptions and parameter shapes
 * - `rows`: typed result rows
 * - `catalog`: executes the queries against a connection
 */

pub mod catalog;
pub mod plan;
pub mod plans;
pub mod registry;
pub mod rows;

pub use catalog::Catalog;
pub use plan::{RenderedQuery, SelectQuery};
pub use registry::QueryId;
pub use rows::{
    GroupAverage, GroupMember, GroupSubjectGrade, LastLessonGrade, QueryOutput, StudentAverage,
    StudentCourse, StudentTeacherCourse, TeacherCourse, TeacherStudentAverage,
    TeacherSubjectAverage,
};
