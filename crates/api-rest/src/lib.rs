//! # API REST
//!
//! REST API implementation for CardioDx.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialisation, CORS, label resolution)
//!
//! Uses `api-shared` for common types and utilities.

#![warn(rust_2018_idioms)]

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{
    DiagnoseReq, DiagnoseRes, HealthRes, HealthService, ModelFailureRes, ModelInfo, ModelVerdict,
    ModelsRes,
};
use cardiodx_core::{
    ChestPainType, ClinicalInput, Diagnosis, DiagnosisError, DiagnosticService, RestingEcg, Sex,
    StSlope, Thalassemia, PRIMARY_MODEL_NAME,
};

/// Application state for the REST API
///
/// Contains shared state that needs to be accessible to all request handlers:
/// the diagnostic service holding the loaded model registry.
#[derive(Clone)]
pub struct AppState {
    pub diagnostic: DiagnosticService,
}

#[derive(OpenApi)]
#[openapi(
    paths(health, diagnose, list_models),
    components(schemas(
        HealthRes,
        DiagnoseReq,
        DiagnoseRes,
        ModelVerdict,
        ModelFailureRes,
        ModelsRes,
        ModelInfo
    ))
)]
struct ApiDoc;

/// Builds the REST router with all routes, documentation and CORS applied.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/diagnose", post(diagnose))
        .route("/models", get(list_models))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Returns the current health status of the CardioDx service. This endpoint
/// is used for monitoring and load balancer health checks.
///
/// # Returns
/// * `Json<HealthRes>` - Health status response containing service status
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/diagnose",
    request_body = DiagnoseReq,
    responses(
        (status = 200, description = "Diagnosis produced", body = DiagnoseRes),
        (status = 503, description = "No model available; no diagnosis produced"),
        (status = 500, description = "Internal server error")
    )
)]
/// Run one diagnostic request
///
/// Encodes the submitted clinical attributes, scores them against every
/// registered model and returns the consensus risk tier with the per-model
/// comparison table. Unrecognised categorical labels resolve to their
/// documented default codes rather than rejecting the request.
///
/// # Errors
/// Returns `503 Service Unavailable` with a non-technical message, and no
/// numeric diagnosis, if every model failed for this request.
#[axum::debug_handler]
async fn diagnose(
    State(state): State<AppState>,
    Json(req): Json<DiagnoseReq>,
) -> Result<Json<DiagnoseRes>, (StatusCode, &'static str)> {
    let input = clinical_input_from_req(&req);
    match state.diagnostic.diagnose(&input) {
        Ok(diagnosis) => Ok(Json(diagnose_res_from(&diagnosis))),
        Err(DiagnosisError::NoModelAvailable) => {
            tracing::error!("all models failed; withholding diagnosis");
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                "The diagnostic models are currently unavailable. No diagnosis was produced; please try again later.",
            ))
        }
        Err(e) => {
            tracing::error!("Diagnose error: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"))
        }
    }
}

#[utoipa::path(
    get,
    path = "/models",
    responses(
        (status = 200, description = "Registered models in registry order", body = ModelsRes)
    )
)]
/// List the registered models
///
/// Returns the name, family and training-time reported accuracy of every
/// registered model, in registry order, marking the designated primary model.
#[axum::debug_handler]
async fn list_models(State(state): State<AppState>) -> Json<ModelsRes> {
    let models = state
        .diagnostic
        .registry()
        .all()
        .map(|entry| ModelInfo {
            name: entry.name().to_string(),
            family: entry.family().to_string(),
            reported_accuracy: entry.reported_accuracy(),
            primary: entry.name() == PRIMARY_MODEL_NAME,
        })
        .collect();
    Json(ModelsRes { models })
}

/// Resolves the raw request labels into the clinical input record.
fn clinical_input_from_req(req: &DiagnoseReq) -> ClinicalInput {
    ClinicalInput {
        age: req.age,
        sex: Sex::from_label(&req.sex),
        chest_pain: ChestPainType::from_label(&req.chest_pain),
        resting_bp: req.resting_bp,
        cholesterol: req.cholesterol,
        fasting_blood_sugar: req.fasting_blood_sugar,
        resting_ecg: RestingEcg::from_label(&req.resting_ecg),
        max_heart_rate: req.max_heart_rate,
        exercise_angina: req.exercise_angina,
        st_depression: req.st_depression,
        st_slope: StSlope::from_label(&req.st_slope),
        major_vessels: req.major_vessels,
        thalassemia: Thalassemia::from_label(&req.thalassemia),
    }
}

fn diagnose_res_from(diagnosis: &Diagnosis) -> DiagnoseRes {
    DiagnoseRes {
        request_id: diagnosis.id.to_string(),
        generated_at: diagnosis.generated_at.to_rfc3339(),
        risk_tier: diagnosis.risk.tier.name().to_string(),
        risk_label: diagnosis.risk.tier.label().to_string(),
        recommendation: diagnosis.risk.recommendation.to_string(),
        guidance: diagnosis
            .risk
            .tier
            .guidance()
            .iter()
            .map(|s| s.to_string())
            .collect(),
        consensus_probability: diagnosis.ensemble.consensus_probability,
        confidence: diagnosis.ensemble.confidence,
        models: diagnosis
            .ensemble
            .outputs
            .iter()
            .map(|output| ModelVerdict {
                name: output.name.clone(),
                disease_predicted: output.predicted_class == 1,
                probability: output.probability,
            })
            .collect(),
        failures: diagnosis
            .ensemble
            .failures
            .iter()
            .map(|failure| ModelFailureRes {
                name: failure.name.clone(),
                reason: failure.error.to_string(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardiodx_core::RiskTier;

    fn request() -> DiagnoseReq {
        DiagnoseReq {
            age: 50,
            sex: "male".into(),
            chest_pain: "asymptomatic".into(),
            resting_bp: 120,
            cholesterol: 200,
            fasting_blood_sugar: false,
            resting_ecg: "normal".into(),
            max_heart_rate: 150,
            exercise_angina: false,
            st_depression: 0.0,
            st_slope: "flat".into(),
            major_vessels: 0,
            thalassemia: "reversible defect".into(),
        }
    }

    #[test]
    fn request_labels_resolve_into_their_domains() {
        let input = clinical_input_from_req(&request());
        assert_eq!(input.sex, Sex::Male);
        assert_eq!(input.chest_pain, ChestPainType::Asymptomatic);
        assert_eq!(input.thalassemia, Thalassemia::ReversibleDefect);
    }

    #[test]
    fn unknown_labels_degrade_to_defaults_instead_of_failing() {
        let mut req = request();
        req.sex = "other".into();
        req.st_slope = "diagonal".into();
        let input = clinical_input_from_req(&req);
        assert_eq!(input.sex, Sex::Female);
        assert_eq!(input.st_slope, StSlope::Upsloping);
    }

    #[test]
    fn risk_tier_serialises_to_its_snake_case_name() {
        let value = serde_json::to_value(RiskTier::High).expect("tier should serialise");
        assert_eq!(value.as_str(), Some(RiskTier::High.name()));
    }
}
