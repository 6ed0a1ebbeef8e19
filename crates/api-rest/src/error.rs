use axum::http::StatusCode;
use lmn_core::{CollaboratorError, LetterError};
use lmn_export::ExportError;

pub type ApiError = (StatusCode, String);
pub type ApiResult<T> = Result<T, ApiError>;

pub fn session_not_found(id: impl std::fmt::Display) -> ApiError {
    (StatusCode::NOT_FOUND, format!("session {id} not found"))
}

pub fn letter_error(err: LetterError) -> ApiError {
    let status = match &err {
        LetterError::InvalidInput(_)
        | LetterError::InvalidStep(_)
        | LetterError::UnknownField(_)
        | LetterError::UnknownTemplate(_)
        | LetterError::UnknownProvider(_) => StatusCode::BAD_REQUEST,
        LetterError::UnknownEntry(_) | LetterError::EntryIndexOutOfRange { .. } => {
            StatusCode::NOT_FOUND
        }
        LetterError::InvalidTransition { .. } => StatusCode::CONFLICT,
        LetterError::Collaborator(CollaboratorError::InvalidRequest(_)) => StatusCode::BAD_REQUEST,
        LetterError::IncompleteLetter(_) => StatusCode::UNPROCESSABLE_ENTITY,
        LetterError::Collaborator(_) => StatusCode::BAD_GATEWAY,
    };
    if status.is_server_error() {
        tracing::error!(error = %err, "request failed");
    }
    (status, err.to_string())
}

pub fn export_error(err: ExportError) -> ApiError {
    tracing::error!(error = %err, "letter export failed");
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".into())
}
