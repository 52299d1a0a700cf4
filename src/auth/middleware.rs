use super::*;
use crate::core::ACCESS_COOKIE;
use crate::core::ID;
use actix_web::FromRequest;
use actix_web::HttpRequest;
use actix_web::dev::Payload;
use actix_web::web;
use std::future::Future;
use std::pin::Pin;

/// Extractor for authenticated requests.
///
/// Validation is stateless: signature plus expiry against the access
/// secret, never a store lookup. Revocation therefore takes effect at
/// the next renewal rather than mid-flight, which is why the access
/// lifetime stays short.
#[derive(Debug)]
pub struct Auth(pub AccessClaims);

impl Auth {
    pub fn claims(&self) -> &AccessClaims {
        &self.0
    }
    pub fn user(&self) -> ID<Account> {
        self.0.user()
    }
}

impl FromRequest for Auth {
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;
    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let crypto = req.app_data::<web::Data<Crypto>>().cloned();
        let cookie = req.cookie(ACCESS_COOKIE).map(|c| c.value().to_owned());
        Box::pin(async move {
            let token =
                cookie.ok_or_else(|| actix_web::error::ErrorUnauthorized("Missing Token"))?;
            let crypto = crypto.ok_or_else(|| {
                actix_web::error::ErrorInternalServerError("token service not configured")
            })?;
            let claims = crypto
                .decode_access(&token)
                .map_err(|_| actix_web::error::ErrorForbidden("Invalid Request"))?;
            if claims.expired() {
                log::debug!("expired access token {}", Crypto::fingerprint(&token));
                return Err(actix_web::error::ErrorForbidden("Invalid Request"));
            }
            Ok(Auth(claims))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;

    fn crypto() -> Crypto {
        Crypto::new(b"access-secret", b"refresh-secret")
    }

    async fn extract(req: HttpRequest) -> Result<Auth, actix_web::Error> {
        Auth::from_request(&req, &mut Payload::None).await
    }

    fn status(err: actix_web::Error) -> StatusCode {
        err.as_response_error().status_code()
    }

    #[actix_web::test]
    async fn bare_request_is_unauthorized() {
        let req = TestRequest::default()
            .app_data(web::Data::new(crypto()))
            .to_http_request();
        let denied = extract(req).await.unwrap_err();
        assert_eq!(status(denied), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn garbage_cookie_is_forbidden() {
        let req = TestRequest::default()
            .app_data(web::Data::new(crypto()))
            .cookie(Cookie::new(ACCESS_COOKIE, "not a token"))
            .to_http_request();
        let denied = extract(req).await.unwrap_err();
        assert_eq!(status(denied), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn foreign_signature_is_forbidden() {
        let forged = Crypto::new(b"other-secret", b"refresh-secret")
            .issue(ID::default())
            .unwrap();
        let req = TestRequest::default()
            .app_data(web::Data::new(crypto()))
            .cookie(Cookie::new(ACCESS_COOKIE, forged.access))
            .to_http_request();
        let denied = extract(req).await.unwrap_err();
        assert_eq!(status(denied), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn expired_cookie_is_forbidden() {
        let crypto = crypto();
        let now = crate::core::now();
        let stale = AccessClaims {
            sub: uuid::Uuid::now_v7(),
            iat: now - 900,
            exp: now - 10,
        };
        let token = crypto.encode_access(&stale).unwrap();
        let req = TestRequest::default()
            .app_data(web::Data::new(crypto))
            .cookie(Cookie::new(ACCESS_COOKIE, token))
            .to_http_request();
        let denied = extract(req).await.unwrap_err();
        assert_eq!(status(denied), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn fresh_cookie_admits_its_subject() {
        let crypto = crypto();
        let user = ID::default();
        let grant = crypto.issue(user).unwrap();
        let req = TestRequest::default()
            .app_data(web::Data::new(crypto))
            .cookie(Cookie::new(ACCESS_COOKIE, grant.access))
            .to_http_request();
        let auth = extract(req).await.unwrap();
        assert_eq!(auth.user(), user);
    }
}
