use axum::http::StatusCode;

/// Failures produced by the menu engine.
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    #[error("invalid {field}: {value}")]
    InvalidInput { field: &'static str, value: String },
    #[error("no replacement dish found")]
    NotFound,
    #[error("catalog unavailable: {0}")]
    Catalog(#[from] anyhow::Error),
}

impl PlannerError {
    pub fn invalid(field: &'static str, value: impl ToString) -> Self {
        Self::InvalidInput {
            field,
            value: value.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            PlannerError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            PlannerError::NotFound => StatusCode::NOT_FOUND,
            PlannerError::Catalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PlannerError> for (StatusCode, String) {
    fn from(e: PlannerError) -> Self {
        match e {
            // storage details stay in the logs
            PlannerError::Catalog(_) => (e.status(), "Service unavailable".into()),
            _ => (e.status(), e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_to_http_status() {
        let (status, msg): (StatusCode, String) = PlannerError::invalid("gender", "other").into();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(msg, "invalid gender: other");

        let (status, _) = <(StatusCode, String)>::from(PlannerError::NotFound);
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, msg) =
            <(StatusCode, String)>::from(PlannerError::Catalog(anyhow::anyhow!("pool timed out")));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!msg.contains("pool"));
    }
}
