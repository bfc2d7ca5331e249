use std::net::SocketAddr;
use std::sync::Arc;
use axum::Router;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use log::{info, warn};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use crate::errors::{PredictError, ValidationError};
use crate::manager_model::ModelHandle;
use crate::models::api::{ErrorResponse, Health, ModelInfo, PredictionResponse};
use crate::models::feature_vector::FEATURE_ORDER;
use crate::predictor::predict_irradiance;

/// Process-wide immutable state: the artifact handle is loaded once before
/// the listener starts and only ever read afterwards, so requests share it
/// without locking. None means the startup load failed and predictions are
/// answered with a fixed server fault while health checks keep working.
pub struct AppState {
    pub model: Option<ModelHandle>,
}

/// Builds the service router. CORS is open for GET and POST since the
/// dashboard frontend calls the service directly from the browser.
///
/// # Arguments
///
/// * 'state' - the shared artifact state
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/", get(health))
        .route("/model-info", get(model_info))
        .route("/predict", post(predict))
        .layer(cors)
        .with_state(state)
}

/// Binds the listener and serves until the process is stopped
///
/// # Arguments
///
/// * 'state' - the shared artifact state
/// * 'port' - TCP port to listen on
pub async fn serve(state: Arc<AppState>, port: u16) -> Result<(), std::io::Error> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("prediction service listening on http://{}", addr);

    axum::serve(listener, build_router(state)).await
}

/// Liveness only, never fails
async fn health() -> Json<Health> {
    Json(Health {
        status: "running",
        service: "Solar Irradiance Prediction API",
        model: "Random Forest Regressor",
        version: "1.0",
    })
}

async fn model_info(State(state): State<Arc<AppState>>) -> Json<ModelInfo> {
    let (n_estimators, status) = match &state.model {
        Some(handle) => (handle.n_estimators(), "ready"),
        None => (0, "unavailable"),
    };

    Json(ModelInfo {
        model_type: "Random Forest Regressor",
        n_estimators,
        features: FEATURE_ORDER,
        target: "solar_irradiance",
        unit: "W/m²",
        status,
    })
}

async fn predict(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = body else {
        return error_response(StatusCode::BAD_REQUEST, &ValidationError::NotJson.to_string());
    };

    match predict_irradiance(state.model.as_ref(), &body) {
        Ok(prediction) => (
            StatusCode::OK,
            Json(PredictionResponse {
                predicted_solar_irradiance: prediction.irradiance,
                unit: "W/m²",
                status: "success",
                input_features: prediction.features,
            }),
        ).into_response(),
        Err(e) => {
            let status = match &e {
                PredictError::Validation(_) => StatusCode::BAD_REQUEST,
                PredictError::ModelUnavailable | PredictError::Failed(_) => {
                    warn!("prediction failed: {}", e);
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            error_response(status, &e.to_string())
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorResponse { error: message.to_string(), status: "failed" })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::json;
    use tower::ServiceExt;
    use crate::manager_model::{DecisionTree, RandomForest, Scaler};

    /// Identity scaler plus a single tree that returns 0 for hours up to 5
    /// and 600 for the rest of the day
    fn test_handle() -> ModelHandle {
        let scaler = Scaler {
            feature_names: FEATURE_ORDER.iter().map(|s| s.to_string()).collect(),
            mean: vec![0.0; 5],
            scale: vec![1.0; 5],
        };
        let tree = DecisionTree {
            children_left: vec![1, -1, -1],
            children_right: vec![2, -1, -1],
            feature: vec![3, -2, -2],
            threshold: vec![5.5, 0.0, 0.0],
            value: vec![0.0, 0.0, 600.0],
        };
        let forest = RandomForest { n_features: 5, trees: vec![tree] };

        ModelHandle::new(scaler, forest).unwrap()
    }

    fn router_with_model() -> Router {
        build_router(Arc::new(AppState { model: Some(test_handle()) }))
    }

    /// A structurally valid forest whose only leaf scores NaN
    fn router_with_nan_model() -> Router {
        let scaler = Scaler {
            feature_names: FEATURE_ORDER.iter().map(|s| s.to_string()).collect(),
            mean: vec![0.0; 5],
            scale: vec![1.0; 5],
        };
        let tree = DecisionTree {
            children_left: vec![-1],
            children_right: vec![-1],
            feature: vec![-2],
            threshold: vec![0.0],
            value: vec![f64::NAN],
        };
        let forest = RandomForest { n_features: 5, trees: vec![tree] };
        let handle = ModelHandle::new(scaler, forest).unwrap();

        build_router(Arc::new(AppState { model: Some(handle) }))
    }

    fn router_without_model() -> Router {
        build_router(Arc::new(AppState { model: None }))
    }

    fn post_json(body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/predict")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn response_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_check_always_answers() {
        let response = router_without_model()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["status"], "running");
        assert_eq!(json["service"], "Solar Irradiance Prediction API");
        assert_eq!(json["model"], "Random Forest Regressor");
        assert_eq!(json["version"], "1.0");
    }

    #[tokio::test]
    async fn model_info_reports_the_loaded_forest() {
        let response = router_with_model()
            .oneshot(Request::builder().uri("/model-info").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["model_type"], "Random Forest Regressor");
        assert_eq!(json["n_estimators"], 1);
        assert_eq!(json["features"], json!(["temperature", "cloud_cover", "humidity", "hour", "month"]));
        assert_eq!(json["target"], "solar_irradiance");
        assert_eq!(json["status"], "ready");
    }

    #[tokio::test]
    async fn model_info_reports_unavailable_without_artifacts() {
        let response = router_without_model()
            .oneshot(Request::builder().uri("/model-info").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let json = response_json(response).await;
        assert_eq!(json["status"], "unavailable");
    }

    #[tokio::test]
    async fn midday_prediction_succeeds() {
        let body = json!({"temperature": 35, "cloud_cover": 10, "humidity": 40, "hour": 12, "month": 6});
        let response = router_with_model().oneshot(post_json(&body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["status"], "success");
        assert_eq!(json["unit"], "W/m²");
        assert!(json["predicted_solar_irradiance"].as_f64().unwrap() >= 0.0);
        assert_eq!(json["input_features"]["temperature"], 35.0);
        assert_eq!(json["input_features"]["hour"], 12);
    }

    #[tokio::test]
    async fn night_prediction_is_near_zero() {
        let body = json!({"temperature": 20, "cloud_cover": 50, "humidity": 60, "hour": 0, "month": 5});
        let response = router_with_model().oneshot(post_json(&body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["predicted_solar_irradiance"], 0.0);
    }

    #[tokio::test]
    async fn missing_feature_is_a_400_naming_the_field() {
        let body = json!({"cloud_cover": 30, "humidity": 60, "hour": 12, "month": 6});
        let response = router_with_model().oneshot(post_json(&body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["status"], "failed");
        let error = json["error"].as_str().unwrap();
        assert!(error.contains("Missing required features"));
        assert!(error.contains("temperature"));
    }

    #[tokio::test]
    async fn non_numeric_feature_is_a_400() {
        let body = json!({"temperature": "hot", "cloud_cover": 30, "humidity": 60, "hour": 12, "month": 6});
        let response = router_with_model().oneshot(post_json(&body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("Invalid feature values"));
    }

    #[tokio::test]
    async fn out_of_range_hour_is_a_400() {
        let body = json!({"temperature": 20, "cloud_cover": 30, "humidity": 60, "hour": 24, "month": 6});
        let response = router_with_model().oneshot(post_json(&body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["error"], "Hour must be between 0 and 23");
    }

    #[tokio::test]
    async fn unparseable_body_is_a_400() {
        let request = Request::builder()
            .method("POST")
            .uri("/predict")
            .header("content-type", "application/json")
            .body(Body::from("this is not json"))
            .unwrap();
        let response = router_with_model().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["error"], "Request must be JSON");
    }

    #[tokio::test]
    async fn predictions_without_artifacts_are_a_500() {
        let body = json!({"temperature": 20, "cloud_cover": 30, "humidity": 60, "hour": 12, "month": 6});
        let response = router_without_model().oneshot(post_json(&body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = response_json(response).await;
        assert_eq!(json["status"], "failed");
    }

    #[tokio::test]
    async fn non_finite_score_is_a_500() {
        let body = json!({"temperature": 20, "cloud_cover": 30, "humidity": 60, "hour": 12, "month": 6});
        let response = router_with_nan_model().oneshot(post_json(&body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = response_json(response).await;
        assert_eq!(json["status"], "failed");
        assert!(json["error"].as_str().unwrap().starts_with("Prediction failed"));
    }

    #[tokio::test]
    async fn identical_requests_give_identical_responses() {
        let body = json!({"temperature": 35, "cloud_cover": 10, "humidity": 40, "hour": 12, "month": 6});

        let first = router_with_model().oneshot(post_json(&body)).await.unwrap();
        let second = router_with_model().oneshot(post_json(&body)).await.unwrap();

        assert_eq!(response_json(first).await, response_json(second).await);
    }
}
