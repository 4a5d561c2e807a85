use crate::error::AppError;

pub const DEFAULT_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(raw: Option<&str>) -> Result<Self, AppError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(SortOrder::default()),
            Some(v) if v.eq_ignore_ascii_case("asc") => Ok(SortOrder::Asc),
            Some(v) if v.eq_ignore_ascii_case("desc") => Ok(SortOrder::Desc),
            Some(v) => Err(AppError::Validation(format!("Invalid order '{}': expected 'asc' or 'desc'", v))),
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PatientSortField {
    #[default]
    CreatedAt,
    FirstName,
    LastName,
    Email,
    Status,
    LastSession,
}

impl PatientSortField {
    pub fn parse(raw: Option<&str>) -> Result<Self, AppError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some("created_at") | Some("createdAt") => Ok(Self::CreatedAt),
            Some("first_name") | Some("firstName") => Ok(Self::FirstName),
            Some("last_name") | Some("lastName") => Ok(Self::LastName),
            Some("email") => Ok(Self::Email),
            Some("status") => Ok(Self::Status),
            Some("last_session") | Some("lastSession") => Ok(Self::LastSession),
            Some(v) => Err(AppError::Validation(format!("Unsupported sortBy '{}' for patients", v))),
        }
    }

    /// Column the store orders by. `LastSession` is ordered after enrichment,
    /// so the store falls back to its default ordering.
    pub fn column(&self) -> Option<&'static str> {
        match self {
            Self::CreatedAt => Some("p.created_at"),
            Self::FirstName => Some("p.first_name"),
            Self::LastName => Some("p.last_name"),
            Self::Email => Some("p.email"),
            Self::Status => Some("p.status"),
            Self::LastSession => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompanySortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Name,
    Email,
    Industry,
}

impl CompanySortField {
    pub fn parse(raw: Option<&str>) -> Result<Self, AppError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some("created_at") | Some("createdAt") => Ok(Self::CreatedAt),
            Some("updated_at") | Some("updatedAt") => Ok(Self::UpdatedAt),
            Some("name") => Ok(Self::Name),
            Some("email") => Ok(Self::Email),
            Some("industry") => Ok(Self::Industry),
            Some(v) => Err(AppError::Validation(format!("Unsupported sortBy '{}' for companies", v))),
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Name => "name",
            Self::Email => "email",
            Self::Industry => "industry",
        }
    }
}

pub fn parse_limit(raw: Option<i64>) -> Result<i64, AppError> {
    match raw {
        None => Ok(DEFAULT_LIMIT),
        Some(l) if (1..=MAX_LIMIT).contains(&l) => Ok(l),
        Some(l) => Err(AppError::Validation(format!("limit must be between 1 and {}, got {}", MAX_LIMIT, l))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListParams<F> {
    pub limit: i64,
    pub sort_field: F,
    pub sort_order: SortOrder,
}
