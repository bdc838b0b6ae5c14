use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use moonlight_core::{AppError, AppResult, EditorIdentity};

use crate::error::ApiResult;
use crate::state::AppState;

/// Header naming the acting editor on editorial routes.
pub const EDITOR_SUBJECT_HEADER: &str = "x-editor-subject";

pub async fn require_editor(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let identity = editor_identity_from_headers(request.headers(), &state.editor_api_token)?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Checks the editorial bearer token and resolves the acting editor.
pub fn editor_identity_from_headers(
    headers: &HeaderMap,
    expected_token: &str,
) -> AppResult<EditorIdentity> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("editor bearer token required".to_owned()))?;

    if !constant_time_eq(token.trim().as_bytes(), expected_token.as_bytes()) {
        return Err(AppError::Unauthorized("invalid editor token".to_owned()));
    }

    let subject = headers
        .get(EDITOR_SUBJECT_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    EditorIdentity::new(subject).map_err(|_| {
        AppError::Unauthorized(format!("{EDITOR_SUBJECT_HEADER} header must name the editor"))
    })
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .zip(right)
            .fold(0_u8, |difference, (left, right)| difference | (left ^ right))
            == 0
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue, header};
    use moonlight_core::AppError;

    use super::{EDITOR_SUBJECT_HEADER, editor_identity_from_headers};

    const TOKEN: &str = "0123456789abcdef0123456789abcdef";

    fn headers(authorization: Option<&str>, subject: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(authorization) = authorization {
            headers.insert(
                header::AUTHORIZATION,
                HeaderValue::from_str(authorization).unwrap_or_else(|_| unreachable!()),
            );
        }
        if let Some(subject) = subject {
            headers.insert(
                EDITOR_SUBJECT_HEADER,
                HeaderValue::from_str(subject).unwrap_or_else(|_| unreachable!()),
            );
        }
        headers
    }

    #[test]
    fn accepts_matching_token_and_subject() {
        let identity = editor_identity_from_headers(
            &headers(Some(&format!("Bearer {TOKEN}")), Some(" editor@moonlight.test ")),
            TOKEN,
        );
        assert_eq!(
            identity.ok().map(|identity| identity.subject().to_owned()),
            Some("editor@moonlight.test".to_owned())
        );
    }

    #[test]
    fn rejects_missing_or_wrong_credentials() {
        let missing = editor_identity_from_headers(&headers(None, Some("editor")), TOKEN);
        assert!(matches!(missing, Err(AppError::Unauthorized(_))));

        let wrong = editor_identity_from_headers(
            &headers(Some("Bearer not-the-token"), Some("editor")),
            TOKEN,
        );
        assert!(matches!(wrong, Err(AppError::Unauthorized(_))));

        let basic = editor_identity_from_headers(&headers(Some(TOKEN), Some("editor")), TOKEN);
        assert!(matches!(basic, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn rejects_missing_subject() {
        let result = editor_identity_from_headers(
            &headers(Some(&format!("Bearer {TOKEN}")), None),
            TOKEN,
        );
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
}
