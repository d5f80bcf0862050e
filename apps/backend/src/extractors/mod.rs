pub mod course_id;
pub mod validated_json;

pub use course_id::CourseId;
pub use validated_json::ValidatedJson;
