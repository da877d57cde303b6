use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    UnprocessableEntity(String),
    #[error("{0}")]
    EntityNotFound(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("トランザクションを実行できませんでした。")]
    TransactionError(#[source] sqlx::Error),
    #[error("データベース処理実行中にエラーが発生しました。")]
    SpecificOperationError(#[source] sqlx::Error),
    #[error("No rows affected: {0}")]
    NoRowsAffectedError(String),
    #[error("template not found: {0}")]
    TemplateNotFound(String),
    #[error("テンプレートファイルを読み込めませんでした。")]
    TemplateIo(#[source] std::io::Error),
    #[error("テンプレートの解析に失敗しました。")]
    TemplateParse(#[source] minijinja::Error),
    #[error("テンプレートの実行に失敗しました。")]
    TemplateExecution(#[source] minijinja::Error),
    #[error("レスポンスの書き込みに失敗しました。")]
    WriteFailure(#[source] std::io::Error),
    #[error("session value is missing or has a wrong type: {0}")]
    MissingOrWrongType(String),
    #[error(transparent)]
    SessionError(#[from] tower_sessions::session::Error),
    #[error("{0}")]
    ForbiddenOperation(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status_code = match self {
            AppError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::EntityNotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::ForbiddenOperation(_) => StatusCode::FORBIDDEN,
            e @ (AppError::TransactionError(_)
            | AppError::SpecificOperationError(_)
            | AppError::NoRowsAffectedError(_)
            | AppError::TemplateNotFound(_)
            | AppError::TemplateIo(_)
            | AppError::TemplateParse(_)
            | AppError::TemplateExecution(_)
            | AppError::WriteFailure(_)
            | AppError::MissingOrWrongType(_)
            | AppError::SessionError(_)) => {
                tracing::error!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "Unexpected error happened"
                );
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // 部分的なページは返さず、ステータスに対応する定型文のみを返す
        let body = status_code.canonical_reason().unwrap_or("Error");
        (status_code, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_session_value_is_opaque_server_error() {
        let res = AppError::MissingOrWrongType("reservation".into()).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn forged_form_is_forbidden() {
        let res = AppError::ForbiddenOperation("csrf".into()).into_response();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }
}
