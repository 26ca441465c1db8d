use super::*;

/// Tests a request carrying the configured token.
///
/// Expected: Ok(())
#[test]
fn accepts_matching_token() {
    let headers = headers_with("Bearer producer-token");

    let result = AuthGuard::new("producer-token", &headers).require();

    assert!(result.is_ok());
}

/// Tests a request with no Authorization header.
///
/// Expected: Err(AuthErr(MissingToken))
#[test]
fn rejects_missing_header() {
    let headers = HeaderMap::new();

    let result = AuthGuard::new("producer-token", &headers).require();

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::MissingToken))
    ));
}

/// Tests a non-bearer scheme.
///
/// Expected: Err(AuthErr(MissingToken))
#[test]
fn rejects_other_schemes() {
    let headers = headers_with("Bot producer-token");

    let result = AuthGuard::new("producer-token", &headers).require();

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::MissingToken))
    ));
}

/// Tests a wrong token, including a prefix of the right one.
///
/// Expected: Err(AuthErr(InvalidToken))
#[test]
fn rejects_wrong_token() {
    for presented in ["Bearer other-token", "Bearer producer"] {
        let headers = headers_with(presented);

        let result = AuthGuard::new("producer-token", &headers).require();

        assert!(matches!(
            result,
            Err(AppError::AuthErr(AuthError::InvalidToken))
        ));
    }
}
