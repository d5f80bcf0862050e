//! DTOs for courses_sea adapter.

/// DTO for inserting a course row.
#[derive(Debug, Clone)]
pub struct CourseCreate {
    pub name: String,
}

impl CourseCreate {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Exact-match filters for listing courses. `None` means "don't filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseListFilter {
    pub id: Option<i64>,
    pub name: Option<String>,
}

impl CourseListFilter {
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
