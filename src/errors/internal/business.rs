use thiserror::Error;

/// Which catalog an association id points into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Service,
    Brand,
    Specialization,
}

impl CatalogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Service => "service",
            Self::Brand => "brand",
            Self::Specialization => "specialization",
        }
    }
}

impl std::fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum BusinessError {
    #[error("A business with the same name at this location already exists")]
    Duplicate { name: String },

    #[error("Business not found: {0}")]
    NotFound(i32),

    #[error("Unknown {kind} id: {id}")]
    UnknownCatalogEntry { kind: CatalogKind, id: i32 },

    #[error("Location {location_id} does not belong to business {business_id}")]
    UnknownLocation { business_id: i32, location_id: i32 },

    #[error("Location is missing required field: {0}")]
    IncompleteLocation(&'static str),

    #[error("Contact information is missing required field: {0}")]
    IncompleteContact(&'static str),

    #[error("Invalid time '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error("A {kind} named '{name}' already exists")]
    CatalogEntryExists { kind: CatalogKind, name: String },
}
