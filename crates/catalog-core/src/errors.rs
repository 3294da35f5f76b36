use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers (an HTTP layer, the
/// CLI, tests) can match on instead of parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    /// Malformed input or an invalid lifecycle transition
    DataValidation,
    NotFound,
    /// The store refused a value (e.g. price outside NUMERIC(10,2))
    ConstraintViolation,

    // Integration/IO
    Persistence,
    Config,
    Io,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::DataValidation => "ERR_DATA_VALIDATION",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::ConstraintViolation => "ERR_CONSTRAINT_VIOLATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Io => "ERR_IO",
        }
    }
}

/// Canonical structured error type
///
/// Built with the `with_*` methods; carries the kind, the operation that
/// failed and, when known, the product it concerned.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    product_id: Option<i64>,
    message: String,
    validation: Option<DataValidationError>,
}

impl ExError {
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            product_id: None,
            message: String::new(),
            validation: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    pub fn with_product_id(mut self, id: i64) -> Self {
        self.product_id = Some(id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn product_id(&self) -> Option<i64> {
        self.product_id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The validation sub-kind, for errors of kind `DataValidation`
    pub fn validation(&self) -> Option<&DataValidationError> {
        self.validation.as_ref()
    }

    pub fn is_validation(&self) -> bool {
        self.kind == ExErrorKind::DataValidation
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(id) = self.product_id {
            write!(f, " (product_id: {})", id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.validation
            .as_ref()
            .map(|v| v as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Validation failures for product input and lifecycle transitions
///
/// This is one error kind with structured sub-kinds. The `Display` text of
/// each variant is part of the contract: callers match on these strings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataValidationError {
    /// A required key is absent from the input mapping
    #[error("Invalid product: missing {field}")]
    MissingField { field: String },

    /// A boolean field holds some other JSON type
    #[error("Invalid type for boolean [{field}]: {found}")]
    InvalidBooleanType { field: String, found: String },

    /// An enumerated value is not a known name
    #[error("Invalid attribute: {token}")]
    InvalidAttribute { token: String },

    /// Input is not an object, or a field has an unusable type or value
    #[error("Invalid product: body of request contained bad or no data {detail}")]
    BadOrNoData { detail: String },

    /// A price lookup token is not a decimal number
    #[error("Invalid price: '{token}' is not a decimal value")]
    InvalidPrice { token: String },

    /// update/delete on a product that was never persisted
    #[error("{op} called with empty ID field")]
    MissingId { op: String },

    /// create on a product that already has a store-assigned id
    #[error("create called on a product that already has ID [{id}]")]
    AlreadyPersisted { id: i64 },
}

impl DataValidationError {
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    pub fn bad_or_no_data(detail: impl Into<String>) -> Self {
        Self::BadOrNoData {
            detail: detail.into(),
        }
    }

    pub fn missing_id(op: impl Into<String>) -> Self {
        Self::MissingId { op: op.into() }
    }
}

/// The message is kept verbatim so that string matching on
/// `err.message()` works the same as on the validation error itself.
impl From<DataValidationError> for ExError {
    fn from(err: DataValidationError) -> Self {
        let op = match &err {
            DataValidationError::MissingId { op } => op.clone(),
            DataValidationError::AlreadyPersisted { .. } => "create".to_string(),
            DataValidationError::InvalidPrice { .. } => "find_by_price".to_string(),
            _ => "deserialize".to_string(),
        };
        let mut ex = ExError::new(ExErrorKind::DataValidation)
            .with_op(op)
            .with_message(err.to_string());
        if let DataValidationError::AlreadyPersisted { id } = &err {
            ex = ex.with_product_id(*id);
        }
        ex.validation = Some(err);
        ex
    }
}
