use crate::error::RemindError;
use actix_web::HttpRequest;
use remind_domain::ID;

/// Resolves the calling user from the `x-user-id` header set by the
/// upstream authentication layer. Authentication itself is an external
/// collaborator of this service; every query is still scoped to the
/// resolved owner.
pub fn protect_route(http_req: &HttpRequest) -> Result<ID, RemindError> {
    let header = http_req.headers().get("x-user-id").ok_or_else(|| {
        RemindError::Unauthorized("Request is missing the `x-user-id` header".into())
    })?;
    let value = header.to_str().map_err(|_| {
        RemindError::Unauthorized("The `x-user-id` header is not valid utf8".into())
    })?;
    value
        .parse::<ID>()
        .map_err(|_| RemindError::Unauthorized(format!("Malformed user id: {}", value)))
}

#[cfg(test)]
mod test {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn resolves_user_from_header() {
        let user_id = ID::new();
        let req = TestRequest::default()
            .insert_header(("x-user-id", user_id.as_string()))
            .to_http_request();
        assert_eq!(protect_route(&req).unwrap(), user_id);
    }

    #[test]
    fn rejects_missing_or_malformed_header() {
        let req = TestRequest::default().to_http_request();
        assert!(protect_route(&req).is_err());

        let req = TestRequest::default()
            .insert_header(("x-user-id", "not-an-id"))
            .to_http_request();
        assert!(protect_route(&req).is_err());
    }
}
