//! actix-web integration.
//!
//! The authentication middleware is expected to store an [`Identity`] in the
//! request extensions. Handlers then call [`check_permission`] (or the
//! [`require_permission!`](crate::require_permission) macro) before doing any
//! work, and [`check_object_permission`] once the target object is loaded.

use std::any::Any;

use actix_web::http::StatusCode;
use actix_web::{HttpMessage, HttpRequest, HttpResponse};
use anyhow::{Context, Result};
use log::{debug, error};
use serde::{Deserialize, Serialize};

use crate::header::HeaderMap;
use crate::permission::PermissionError;
use crate::policy::Policy;
use crate::types::identity::Identity;
use crate::types::method::Method;
use crate::types::request::Request;
use crate::types::view::View;

pub const PERMISSION_DENIED: &str = "Permission denied.";

/// JSON body of error responses.
#[derive(Debug, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

#[macro_export]
macro_rules! require_permission {
    ($policy:expr, $req:expr, $view:expr) => {
        if let Err(resp) = $crate::web::check_permission($policy, &$req, $view) {
            return resp;
        }
    };
}

#[macro_export]
macro_rules! require_object_permission {
    ($policy:expr, $req:expr, $view:expr, $obj:expr) => {
        if let Err(resp) = $crate::web::check_object_permission($policy, &$req, $view, $obj) {
            return resp;
        }
    };
}

/// Copies what permission checks need out of an actix request.
///
/// Header values that are not visible ASCII are skipped.
pub fn request_from_http(req: &HttpRequest) -> Result<Request> {
    let method: Method = req
        .method()
        .as_str()
        .parse()
        .context("parse request method")?;

    let mut headers = HeaderMap::new();
    for (key, value) in req.headers() {
        let value = match value.to_str() {
            Ok(value) => value,
            Err(_) => {
                debug!("Drop header '{key}': value is not visible ASCII");
                continue;
            }
        };
        headers.insert(key.as_str(), value);
    }

    let user = req.extensions().get::<Identity>().cloned();

    Ok(Request {
        method,
        user,
        headers,
    })
}

/// View level check. The error side is the response to send back.
pub fn check_permission<P>(policy: &P, req: &HttpRequest, view: &View) -> Result<(), HttpResponse>
where
    P: Policy + ?Sized,
{
    let request = parse_request(req)?;
    let result = policy.has_permission(&request, view);
    into_response(result, req, view)
}

/// Object level check. The error side is the response to send back.
pub fn check_object_permission<P>(
    policy: &P,
    req: &HttpRequest,
    view: &View,
    obj: &dyn Any,
) -> Result<(), HttpResponse>
where
    P: Policy + ?Sized,
{
    let request = parse_request(req)?;
    let result = policy.has_object_permission(&request, view, obj);
    into_response(result, req, view)
}

fn parse_request(req: &HttpRequest) -> Result<Request, HttpResponse> {
    match request_from_http(req) {
        Ok(request) => Ok(request),
        Err(err) => Err(error_response(
            StatusCode::BAD_REQUEST,
            format!("Bad request: {err:#}"),
        )),
    }
}

fn into_response(
    result: Result<bool, PermissionError>,
    req: &HttpRequest,
    view: &View,
) -> Result<(), HttpResponse> {
    match result {
        Ok(true) => Ok(()),
        Ok(false) => {
            debug!("{} {} forbidden on view '{}'", req.method(), req.path(), view.name);
            Err(error_response(
                StatusCode::FORBIDDEN,
                PERMISSION_DENIED.to_string(),
            ))
        }
        Err(err) => {
            error!(
                "Check permission for {} {} on view '{}' failed: {err:#}",
                req.method(),
                req.path(),
                view.name
            );
            Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Server error: {err}"),
            ))
        }
    }
}

fn error_response(code: StatusCode, message: String) -> HttpResponse {
    HttpResponse::build(code).json(ErrorResponse {
        code: code.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use actix_web::dev::Service;
    use actix_web::http::header::HeaderValue;
    use actix_web::test::{call_and_read_body, call_service, init_service, TestRequest};
    use actix_web::{web, App};

    use crate::permission::predicates::{allow_all, allow_authorized_key, allow_staff};
    use crate::permissions;
    use crate::policy::union::UnionPolicy;
    use crate::policy::{BasePolicy, CrudPolicy};

    use super::*;

    fn staff_request(req: TestRequest) -> HttpRequest {
        let req = req.to_http_request();
        req.extensions_mut()
            .insert(Identity::authenticated("staff").with_staff(true));
        req
    }

    #[test]
    fn test_request_from_http() {
        let req = TestRequest::patch()
            .insert_header(("Authorization", "K1"))
            .insert_header(("X-Request-Id", "42"))
            .to_http_request();
        let request = request_from_http(&req).unwrap();
        assert_eq!(request.method, Method::Patch);
        assert!(request.user.is_none());
        assert_eq!(request.authorization(), Some("K1"));
        assert_eq!(request.headers.get("x-request-id"), Some("42"));

        let req = staff_request(TestRequest::get());
        let request = request_from_http(&req).unwrap();
        assert_eq!(request.method, Method::Get);
        assert!(request.user.unwrap().is_staff);
    }

    #[test]
    fn test_request_from_http_opaque_header() {
        let req = TestRequest::get()
            .insert_header(("Authorization", HeaderValue::from_bytes(b"K\xff1").unwrap()))
            .insert_header(("X-Request-Id", "42"))
            .to_http_request();
        let request = request_from_http(&req).unwrap();
        assert!(request.authorization().is_none());
        assert_eq!(request.headers.get("X-Request-Id"), Some("42"));

        // The dropped key never matches, so the request is denied
        let mut policy = BasePolicy::default();
        policy.rw_permissions = permissions![allow_authorized_key];
        let view = View::new("sync").with_authorized_keys(["K\u{ff}1"]);
        let resp = check_permission(&policy, &req, &view).unwrap_err();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_check_permission() {
        let mut policy = CrudPolicy::default();
        policy.add_permissions = permissions![allow_staff];
        let view = View::new("orders");

        let req = staff_request(TestRequest::post());
        assert!(check_permission(&policy, &req, &view).is_ok());

        let req = staff_request(TestRequest::put());
        let resp = check_permission(&policy, &req, &view).unwrap_err();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        // No authentication middleware ran: misuse, not a denial
        let req = TestRequest::post().to_http_request();
        let resp = check_permission(&policy, &req, &view).unwrap_err();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_check_object_permission() {
        let mut policy = BasePolicy::default();
        policy.object_rw_permissions = permissions![|req| Ok(req.object::<u32>() == Some(&7))];
        let view = View::default();

        let req = TestRequest::delete().to_http_request();
        assert!(check_object_permission(&policy, &req, &view, &7_u32).is_ok());

        let resp = check_object_permission(&policy, &req, &view, &8_u32).unwrap_err();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_misconfigured_view() {
        let mut policy = BasePolicy::default();
        policy.rw_permissions = permissions![allow_authorized_key];
        let view = View::new("orders");

        let req = TestRequest::get()
            .insert_header(("Authorization", "K1"))
            .to_http_request();
        let resp = check_permission(&policy, &req, &view).unwrap_err();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    async fn orders(req: HttpRequest, policy: web::Data<UnionPolicy>) -> HttpResponse {
        let view = View::new("orders");
        require_permission!(policy.get_ref(), req, &view);

        let order_id = 7_u32;
        require_object_permission!(policy.get_ref(), req, &view, &order_id);

        HttpResponse::Ok().finish()
    }

    #[actix_web::test]
    async fn test_handler() {
        let mut policy = CrudPolicy::default();
        policy.read_permissions = permissions![allow_all];
        policy.object_read_permissions = permissions![allow_staff];

        let app = init_service(
            App::new()
                .app_data(web::Data::new(UnionPolicy::Crud(policy)))
                .wrap_fn(|req, srv| {
                    let user = match req.headers().get("X-User").and_then(|v| v.to_str().ok()) {
                        Some(name) => Identity::authenticated(name).with_staff(name == "staff"),
                        None => Identity::anonymous(),
                    };
                    req.extensions_mut().insert(user);
                    srv.call(req)
                })
                .route("/orders", web::get().to(orders))
                .route("/orders", web::post().to(orders)),
        )
        .await;

        let req = TestRequest::get()
            .uri("/orders")
            .insert_header(("X-User", "staff"))
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        // Passes the view check, fails on the object
        let req = TestRequest::get()
            .uri("/orders")
            .insert_header(("X-User", "alice"))
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = TestRequest::post()
            .uri("/orders")
            .insert_header(("X-User", "staff"))
            .to_request();
        let body = call_and_read_body(&app, req).await;
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"code": 403, "message": "Permission denied."})
        );
    }
}
