//! Request handlers.

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{Envelope, QuestionPayload, TextPayload};
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use lexlink_core::AppError;
use lexlink_knowledge::{
    answer_question, load_glossary, AnswerRequest, AnswerResult, EntityLinker, LinkingResult,
    Scenario, SourceMaterial,
};

/// Scenario used by `/api/sap/qa` when the body has none.
const SAP_DEFAULT_SCENARIO: i64 = 2;

/// Scenario used by `/api/docs/qa` when the form has none.
const DOCS_DEFAULT_SCENARIO: i64 = 0;

const NO_FILE_UPLOADED: &str = "No file uploaded.";

type ApiResult<T> = Result<Json<T>, ApiError>;

fn json_body<T>(payload: Result<Json<Envelope<T>>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(envelope)) => Ok(envelope.data),
        Err(rejection) => Err(AppError::Serialization(rejection.body_text()).into()),
    }
}

/// Liveness check.
pub async fn root() -> &'static str {
    "Hello World lexlink"
}

/// POST /api/sap/qa: answer from the fixed SAP documentation corpus.
pub async fn sap_qa(
    State(state): State<AppState>,
    payload: Result<Json<Envelope<QuestionPayload>>, JsonRejection>,
) -> ApiResult<AnswerResult> {
    let payload = json_body(payload)?;
    tracing::info!("POST /api/sap/qa: {}", payload.question);

    let rag = &state.config.rag;
    let request = AnswerRequest {
        question: payload.question,
        scenario: Scenario::from_selector(payload.scenario.unwrap_or(SAP_DEFAULT_SCENARIO)),
        source: SourceMaterial::Corpus(rag.corpus_path.clone()),
        top_k: rag.corpus_top_k,
        compress: rag.compress_context,
    };

    Ok(Json(answer_question(&state.pipeline, request).await?))
}

/// POST /api/sap/el: link entities against SAP Help plus the glossary.
pub async fn sap_el(
    State(state): State<AppState>,
    payload: Result<Json<Envelope<TextPayload>>, JsonRejection>,
) -> ApiResult<LinkingResult> {
    let payload = json_body(payload)?;
    tracing::info!("POST /api/sap/el");

    let glossary_path = state.config.linking.glossary_path.clone();
    let glossary = tokio::task::spawn_blocking(move || load_glossary(&glossary_path))
        .await
        .map_err(|e| AppError::Other(format!("Glossary loading task failed: {}", e)))??;
    let linker = EntityLinker::new(state.pipeline.clone(), state.sap_help.clone())
        .with_corpus(glossary)
        .with_empty_result_policy(state.config.linking.empty_result);

    Ok(Json(linker.link(&payload.text).await?))
}

/// POST /api/docs/qa: answer from an uploaded PDF.
///
/// Form fields: `file`, `question` and an optional `scenario`.
pub async fn docs_qa(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<AnswerResult> {
    let mut multipart =
        multipart.map_err(|_| AppError::MissingInput(NO_FILE_UPLOADED.to_string()))?;

    let mut upload = None;
    let mut question = None;
    let mut scenario = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Other(format!("Invalid multipart body: {}", e)))?
    {
        match field.name() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("blob").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Other(format!("Failed to read upload: {}", e)))?;
                upload = Some((file_name, bytes.to_vec()));
            }
            Some("question") => {
                question = Some(field_text(field).await?);
            }
            Some("scenario") => {
                scenario = field_text(field).await?.trim().parse::<i64>().ok();
            }
            _ => {}
        }
    }

    let (file_name, bytes) =
        upload.ok_or_else(|| AppError::MissingInput(NO_FILE_UPLOADED.to_string()))?;
    let question =
        question.ok_or_else(|| AppError::Other("Form field 'question' is missing".to_string()))?;

    tracing::info!(file = %file_name, size = bytes.len(), "POST /api/docs/qa: {}", question);

    let request = AnswerRequest {
        question,
        scenario: Scenario::from_selector(scenario.unwrap_or(DOCS_DEFAULT_SCENARIO)),
        source: SourceMaterial::Upload { file_name, bytes },
        top_k: state.config.rag.upload_top_k,
        compress: state.config.rag.compress_context,
    };

    Ok(Json(answer_question(&state.pipeline, request).await?))
}

async fn field_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Other(format!("Failed to read form field: {}", e)))
}

/// POST /api/docs/el: link entities against Wikipedia.
pub async fn docs_el(
    State(state): State<AppState>,
    payload: Result<Json<Envelope<TextPayload>>, JsonRejection>,
) -> ApiResult<LinkingResult> {
    let payload = json_body(payload)?;
    tracing::info!("POST /api/docs/el");

    let linker = EntityLinker::new(state.pipeline.clone(), state.wikipedia.clone())
        .with_empty_result_policy(state.config.linking.empty_result);

    Ok(Json(linker.link(&payload.text).await?))
}
