use std::future::{ready, Ready};

use actix_web::{http::header::AUTHORIZATION, web, FromRequest, HttpRequest};

use crate::auth::{Claims, JwtService};

/// Extractor resolving the caller's claims from the Authorization header,
/// if any. Requests without a valid bearer token resolve to `None`; the
/// service layer fails closed on missing identity, so a bad token is treated
/// the same as no token.
pub struct MaybeAuthenticated(pub Option<Claims>);

impl MaybeAuthenticated {
    pub fn into_claims(self) -> Option<Claims> {
        self.0
    }
}

impl FromRequest for MaybeAuthenticated {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let claims = req.app_data::<web::Data<JwtService>>().and_then(|jwt| {
            let token = req
                .headers()
                .get(AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.strip_prefix("Bearer "))?;

            match jwt.validate_token(token) {
                Ok(claims) => Some(claims),
                Err(e) => {
                    log::debug!("Rejected bearer token: {}", e);
                    None
                }
            }
        });

        ready(Ok(MaybeAuthenticated(claims)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, models::domain::UserRole};
    use actix_web::test::TestRequest;

    fn jwt_service() -> JwtService {
        let config = Config::test_config();
        JwtService::new(&config.jwt_secret, 1)
    }

    #[actix_web::test]
    async fn test_missing_header_resolves_to_none() {
        let req = TestRequest::default()
            .app_data(web::Data::new(jwt_service()))
            .to_http_request();

        let extracted = MaybeAuthenticated::extract(&req).await.unwrap();
        assert!(extracted.0.is_none());
    }

    #[actix_web::test]
    async fn test_valid_token_resolves_claims() {
        let jwt = jwt_service();
        let token = jwt.create_token("user-1", UserRole::Student).unwrap();

        let req = TestRequest::default()
            .app_data(web::Data::new(jwt))
            .insert_header((AUTHORIZATION, format!("Bearer {}", token)))
            .to_http_request();

        let extracted = MaybeAuthenticated::extract(&req).await.unwrap();
        let claims = extracted.0.expect("claims should be present");
        assert_eq!(claims.sub, "user-1");
    }

    #[actix_web::test]
    async fn test_garbage_token_resolves_to_none() {
        let req = TestRequest::default()
            .app_data(web::Data::new(jwt_service()))
            .insert_header((AUTHORIZATION, "Bearer not.a.token"))
            .to_http_request();

        let extracted = MaybeAuthenticated::extract(&req).await.unwrap();
        assert!(extracted.0.is_none());
    }
}
