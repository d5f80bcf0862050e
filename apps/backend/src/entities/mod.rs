pub mod course_students;
pub mod courses;
pub mod students;

pub use course_students::Entity as CourseStudents;
pub use courses::Entity as Courses;
pub use courses::Model as Course;
pub use students::Entity as Students;
pub use students::Model as Student;
