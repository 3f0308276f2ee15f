//! HTTP routes and handlers.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use plantclip_core::{Classification, ModelReport};
use serde::Serialize;
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::error::{status_error, ApiError};
use super::request::ClassifyRequest;
use super::SharedState;

pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/classify", post(classify))
        .route("/classify/zero-shot", post(classify_zero_shot))
        .route("/test", get(self_test))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// `{"success": true, ...classification}`
#[derive(Serialize)]
struct ClassifyResponse {
    success: bool,
    #[serde(flatten)]
    result: Classification,
}

impl From<Classification> for ClassifyResponse {
    fn from(result: Classification) -> Self {
        Self {
            success: true,
            result,
        }
    }
}

/// `{"status": "ok", "info": {...}, "plant_classes_count": n}`
#[derive(Serialize)]
struct SelfTestResponse {
    status: &'static str,
    #[serde(flatten)]
    report: ModelReport,
}

async fn health(State(service): State<SharedState>) -> Response {
    match service.health().await {
        Ok(model_loaded) => Json(json!({ "status": "ok", "model_loaded": model_loaded }))
            .into_response(),
        Err(e) => status_error(e),
    }
}

async fn classify(
    State(service): State<SharedState>,
    request: ClassifyRequest,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let result = service.classify(request.image_path()).await?;
    Ok(Json(result.into()))
}

async fn classify_zero_shot(
    State(service): State<SharedState>,
    request: ClassifyRequest,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let image_path = request.image_path().to_string();
    let result = service
        .classify_zero_shot(&image_path, request.prompts)
        .await?;
    Ok(Json(result.into()))
}

async fn self_test(State(service): State<SharedState>) -> Response {
    match service.model_report().await {
        Ok(report) => Json(SelfTestResponse {
            status: "ok",
            report,
        })
        .into_response(),
        Err(e) => status_error(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use image::DynamicImage;
    use plantclip_core::{
        ClassificationService, Classifications, Classifier, ClassifierError, ClassifyError,
        Config, LabelSet, LazyModel, ModelInfo, RawPrediction,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    /// Always ranks Orchid > Tulip > Aloe Vera.
    struct FixedScores;

    impl Classifier for FixedScores {
        fn predict_path(&self, _path: &Path) -> Result<RawPrediction, ClassifierError> {
            Ok(RawPrediction::Ranked(Box::new(Classifications::from_scores(
                vec![0.1, 0.7, 0.2],
            ))))
        }

        fn predict_image(&self, _image: &DynamicImage) -> Result<RawPrediction, ClassifierError> {
            self.predict_path(Path::new(""))
        }

        fn info(&self) -> ModelInfo {
            ModelInfo {
                model_type: "fixed".to_string(),
                runtime: "test".to_string(),
                device: "cpu".to_string(),
                label_count: 3,
            }
        }
    }

    /// Takes longer than any test timeout to answer.
    struct Stalled;

    impl Classifier for Stalled {
        fn predict_path(&self, path: &Path) -> Result<RawPrediction, ClassifierError> {
            std::thread::sleep(std::time::Duration::from_millis(300));
            FixedScores.predict_path(path)
        }

        fn predict_image(&self, image: &DynamicImage) -> Result<RawPrediction, ClassifierError> {
            std::thread::sleep(std::time::Duration::from_millis(300));
            FixedScores.predict_image(image)
        }

        fn info(&self) -> ModelInfo {
            FixedScores.info()
        }
    }

    fn labels() -> LabelSet {
        LabelSet::new(["Aloe Vera", "Orchid", "Tulip"])
    }

    fn app() -> Router {
        let service = ClassificationService::with_model(
            LazyModel::loaded(Arc::new(FixedScores)),
            labels(),
            &Config::default(),
        );
        create_router(Arc::new(service))
    }

    fn broken_app() -> Router {
        let model = LazyModel::new(|| Err(ClassifyError::Model {
            message: "Vision encoder not found".to_string(),
        }));
        let service = ClassificationService::with_model(model, labels(), &Config::default());
        create_router(Arc::new(service))
    }

    fn stalled_app() -> Router {
        let mut config = Config::default();
        config.limits.predict_timeout_ms = 50;
        let service = ClassificationService::with_model(
            LazyModel::loaded(Arc::new(Stalled)),
            labels(),
            &config,
        );
        create_router(Arc::new(service))
    }

    fn write_png(dir: &Path) -> String {
        let path = dir.join("plant.png");
        image::RgbImage::from_pixel(4, 4, image::Rgb([20, 160, 40]))
            .save(&path)
            .unwrap();
        path.to_string_lossy().into_owned()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health_ok() {
        let request = Request::get("/health").body(Body::empty()).unwrap();
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok", "model_loaded": true }));
    }

    #[tokio::test]
    async fn test_health_reports_load_failure() {
        let request = Request::get("/health").body(Body::empty()).unwrap();
        let (status, body) = send(broken_app(), request).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "error");
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("Vision encoder not found"));
    }

    #[tokio::test]
    async fn test_classify_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path());

        let (status, body) = send(app(), post_json("/classify", json!({ "image_path": path }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["prediction"], "Orchid");
        let top_k = body["top_k"].as_array().unwrap();
        assert_eq!(top_k.len(), 3);
        assert_eq!(top_k[0]["plant"], "Orchid");
        assert_eq!(top_k[2]["plant"], "Aloe Vera");
    }

    #[tokio::test]
    async fn test_classify_form_urlencoded() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path());

        let request = Request::builder()
            .method("POST")
            .uri("/classify")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!("image_path={path}")))
            .unwrap();
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["prediction"], "Orchid");
    }

    #[tokio::test]
    async fn test_classify_missing_image_path() {
        let (status, body) = send(app(), post_json("/classify", json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({ "success": false, "error": "image_path is required" })
        );
    }

    #[tokio::test]
    async fn test_classify_empty_body_without_content_type() {
        let request = Request::post("/classify").body(Body::empty()).unwrap();
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "image_path is required");
    }

    #[tokio::test]
    async fn test_classify_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nowhere.jpg");

        let (status, body) = send(
            app(),
            post_json("/classify", json!({ "image_path": missing })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Image file not found"));
    }

    #[tokio::test]
    async fn test_classify_malformed_json() {
        let request = Request::builder()
            .method("POST")
            .uri("/classify")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"image_path\": "))
            .unwrap();
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_classify_model_unavailable_is_500() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path());

        let (status, body) = send(
            broken_app(),
            post_json("/classify", json!({ "image_path": path })),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_zero_shot_json_with_prompts() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path());

        let (status, body) = send(
            app(),
            post_json(
                "/classify/zero-shot",
                json!({ "image_path": path, "prompts": ["Tulip", "Aloe Vera"] }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["prediction"], "Tulip");
        assert_eq!(body["top_k"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_zero_shot_no_matching_prompts() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path());

        let (status, body) = send(
            app(),
            post_json(
                "/classify/zero-shot",
                json!({ "image_path": path, "prompts": ["Venus Flytrap"] }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body["error"],
            "Unable to process classifier results or no matching predictions"
        );
    }

    #[tokio::test]
    async fn test_zero_shot_timeout_is_500() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path());

        let (status, body) = send(
            stalled_app(),
            post_json("/classify/zero-shot", json!({ "image_path": path })),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("predict"));
    }

    #[tokio::test]
    async fn test_classify_timeout_is_500() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path());

        let (status, body) = send(
            stalled_app(),
            post_json("/classify", json!({ "image_path": path })),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_zero_shot_multipart() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path());

        let boundary = "plantclip-boundary";
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"image_path\"\r\n\r\n{path}\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"prompts\"\r\n\r\nAloe Vera\r\n\
             --{b}--\r\n",
            b = boundary
        );
        let request = Request::builder()
            .method("POST")
            .uri("/classify/zero-shot")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["prediction"], "Aloe Vera");
    }

    #[tokio::test]
    async fn test_self_test_reports_model() {
        let request = Request::get("/test").body(Body::empty()).unwrap();
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["info"]["model_type"], "fixed");
        assert_eq!(body["plant_classes_count"], 3);
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let request = Request::get("/health")
            .header(header::ORIGIN, "http://backend.local")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }
}
