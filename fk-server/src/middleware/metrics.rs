use crate::server::FORMKEY_REQUESTS;
use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceRequest, ServiceResponse},
};
use futures::Future;
use futures_util::future::FutureExt;

pub(crate) fn collect_metrics<
    B: MessageBody,
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
>(
    req: ServiceRequest,
    srv: &S,
) -> impl Future<Output = Result<ServiceResponse<B>, actix_web::Error>> {
    let path = req.match_pattern().unwrap_or_else(|| "-".to_string());

    srv.call(req).map(move |res| {
        let status = match &res {
            Ok(resp) => resp.status(),
            Err(e) => e.as_response_error().status_code(),
        };

        FORMKEY_REQUESTS
            .with_label_values(&[path.as_str(), status.as_str()])
            .inc();

        res
    })
}

#[cfg(test)]
mod tests {
    use crate::config::tests::test_config;
    use crate::mail::tests::RecordingMailer;
    use crate::server::tests::setup_with;
    use crate::store::MemoryStore;
    use actix_web::{http::StatusCode, test};
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_get_metrics() {
        let app = setup_with(
            test_config(),
            Arc::new(MemoryStore::default()),
            Arc::new(RecordingMailer::default()),
        )
        .await;

        let req = test::TestRequest::post().uri("/v1/keys").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri("/v1/submissions")
            .set_json(serde_json::json!({ "secret": "" }))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::BAD_REQUEST
        );

        let req = test::TestRequest::get().uri("/metrics").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body = test::read_body(res).await;
        let body = std::str::from_utf8(&body).unwrap();

        // The registry is global and shared with concurrently running tests, so only check
        // for the presence of series.
        assert!(body.contains("# TYPE formkey_requests counter"));
        assert!(body.contains(r#"formkey_requests{path="/v1/keys",status="200"}"#));
        assert!(body.contains(r#"formkey_requests{path="/v1/submissions",status="400"}"#));
    }
}
