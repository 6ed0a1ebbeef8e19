use axum::{
    extract::{Path as AxumPath, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use lmn_core::steps::{
    DiagnosisField, DiagnosisInformation, FinalReview, HistoryField, InsuranceDetails,
    InsuranceField, LabResultField, ManualField, PatientDetails, PatientField, TemplateSelection,
    TreatmentField, TreatmentHistoryStep,
};
use lmn_core::{render_letter, DraftLetter, EntryId, LetterError, WizardSession};
use std::str::FromStr;
use uuid::Uuid;

use crate::dto::{
    AppliedRes, CreateSessionReq, EntryCreatedRes, FieldEditReq, HealthRes, LetterRes,
    ReviewRes, SelectProviderReq, SelectTemplateReq, SessionView, SetStepReq, TextReq,
    TransitionRes,
};
use crate::error::{export_error, letter_error, session_not_found, ApiResult};
use crate::AppState;

async fn with_session<T>(
    state: &AppState,
    id: Uuid,
    f: impl FnOnce(&mut WizardSession) -> Result<T, LetterError>,
) -> ApiResult<T> {
    let mut sessions = state.sessions.lock().await;
    let session = sessions.get_mut(&id).ok_or_else(|| session_not_found(id))?;
    f(session).map_err(letter_error)
}

async fn session_view(state: &AppState, id: Uuid) -> ApiResult<Json<SessionView>> {
    with_session(state, id, |session| Ok(Json(SessionView::from(&*session)))).await
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for load balancers and monitoring.
pub async fn health() -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Letter wizard REST API is alive".into(),
    })
}

#[utoipa::path(
    post,
    path = "/sessions",
    request_body = CreateSessionReq,
    responses(
        (status = 201, description = "Session started", body = SessionView)
    )
)]
/// Starts a wizard session for a product.
///
/// Templates and the provider roster are loaded before the session is returned. Fetch failures
/// leave the affected step empty rather than failing the request.
#[axum::debug_handler]
pub async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionReq>,
) -> (StatusCode, Json<SessionView>) {
    let mut session = WizardSession::start(req.product_id, state.cfg.wizard_policy());
    session
        .load_collaborator_data(state.backend.as_ref(), state.is_authenticated())
        .await;
    let view = SessionView::from(&session);
    state.sessions.lock().await.insert(session);
    (StatusCode::CREATED, Json(view))
}

#[utoipa::path(
    get,
    path = "/sessions/{id}",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 200, description = "Current session state", body = SessionView),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn get_session(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
) -> ApiResult<Json<SessionView>> {
    session_view(&state, id).await
}

#[utoipa::path(
    delete,
    path = "/sessions/{id}",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 200, description = "Letter reset to an empty draft at step 1", body = SessionView),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn reset_session(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
) -> ApiResult<Json<SessionView>> {
    with_session(&state, id, |session| {
        session.reset();
        Ok(())
    })
    .await?;
    session_view(&state, id).await
}

#[utoipa::path(
    patch,
    path = "/sessions/{id}/letter",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 200, description = "Draft after a shallow merge of the body", body = SessionView),
        (status = 404, description = "Unknown session")
    )
)]
/// Shallow-merges a partial draft. Every top-level slice present in the body replaces the
/// stored slice wholesale.
pub async fn patch_letter(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
    Json(patch): Json<DraftLetter>,
) -> ApiResult<Json<SessionView>> {
    with_session(&state, id, |session| {
        session.store.update_letter_data(patch);
        Ok(())
    })
    .await?;
    session_view(&state, id).await
}

#[utoipa::path(
    put,
    path = "/sessions/{id}/step",
    params(("id" = String, Path, description = "Session id")),
    request_body = SetStepReq,
    responses(
        (status = 200, description = "Step changed", body = TransitionRes),
        (status = 400, description = "Step out of range")
    )
)]
pub async fn set_step(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
    Json(req): Json<SetStepReq>,
) -> ApiResult<Json<TransitionRes>> {
    with_session(&state, id, |session| {
        let transition = session.controller.go_to(&mut session.store, req.step)?;
        Ok(Json(TransitionRes {
            transition,
            step: session.store.current_step().number(),
        }))
    })
    .await
}

#[utoipa::path(
    post,
    path = "/sessions/{id}/next",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 200, description = "Moved forward, or completed on the final step", body = TransitionRes),
        (status = 422, description = "Required fields missing under the strict policy")
    )
)]
pub async fn next_step(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
) -> ApiResult<Json<TransitionRes>> {
    with_session(&state, id, |session| {
        let transition = session.controller.next(&mut session.store)?;
        Ok(Json(TransitionRes {
            transition,
            step: session.store.current_step().number(),
        }))
    })
    .await
}

#[utoipa::path(
    post,
    path = "/sessions/{id}/previous",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 200, description = "Moved back, or stayed on step 1", body = TransitionRes)
    )
)]
pub async fn previous_step(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
) -> ApiResult<Json<TransitionRes>> {
    with_session(&state, id, |session| {
        let transition = session.controller.previous(&mut session.store);
        Ok(Json(TransitionRes {
            transition,
            step: session.store.current_step().number(),
        }))
    })
    .await
}

#[utoipa::path(
    post,
    path = "/sessions/{id}/template",
    params(("id" = String, Path, description = "Session id")),
    request_body = SelectTemplateReq,
    responses(
        (status = 200, description = "Template selected", body = SessionView),
        (status = 400, description = "Unknown template")
    )
)]
pub async fn select_template(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
    Json(req): Json<SelectTemplateReq>,
) -> ApiResult<Json<SessionView>> {
    with_session(&state, id, |session| {
        session
            .templates
            .select(&mut session.store, req.template_id.as_str())?;
        if let Some(date) = req.letter_date {
            TemplateSelection::set_letter_date(&mut session.store, date);
        }
        Ok(Json(SessionView::from(&*session)))
    })
    .await
}

#[utoipa::path(
    post,
    path = "/sessions/{id}/provider/select",
    params(("id" = String, Path, description = "Session id")),
    request_body = SelectProviderReq,
    responses(
        (status = 200, description = "Roster entry copied into the draft", body = SessionView),
        (status = 400, description = "Unknown provider"),
        (status = 409, description = "No roster loaded")
    )
)]
pub async fn select_provider(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
    Json(req): Json<SelectProviderReq>,
) -> ApiResult<Json<SessionView>> {
    with_session(&state, id, |session| {
        session
            .provider
            .select_provider(&mut session.store, &req.provider_id)?;
        Ok(Json(SessionView::from(&*session)))
    })
    .await
}

#[utoipa::path(
    post,
    path = "/sessions/{id}/provider/manual",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 200, description = "Provider step switched to manual entry", body = SessionView)
    )
)]
pub async fn enter_manual_entry(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
) -> ApiResult<Json<SessionView>> {
    with_session(&state, id, |session| {
        session.provider.enter_manual_entry(&session.store);
        Ok(Json(SessionView::from(&*session)))
    })
    .await
}

#[utoipa::path(
    put,
    path = "/sessions/{id}/provider/manual",
    params(("id" = String, Path, description = "Session id")),
    request_body = FieldEditReq,
    responses(
        (status = 200, description = "Manual field merged into the draft", body = SessionView),
        (status = 409, description = "Provider step is not in manual entry")
    )
)]
pub async fn set_manual_field(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
    Json(req): Json<FieldEditReq>,
) -> ApiResult<Json<SessionView>> {
    with_session(&state, id, |session| {
        let field = ManualField::from_str(&req.field)?;
        session
            .provider
            .set_manual_field(&mut session.store, field, req.value)?;
        Ok(Json(SessionView::from(&*session)))
    })
    .await
}

#[utoipa::path(
    put,
    path = "/sessions/{id}/patient",
    params(("id" = String, Path, description = "Session id")),
    request_body = FieldEditReq,
    responses(
        (status = 200, description = "Patient field updated", body = SessionView),
        (status = 400, description = "Unknown field")
    )
)]
pub async fn set_patient_field(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
    Json(req): Json<FieldEditReq>,
) -> ApiResult<Json<SessionView>> {
    with_session(&state, id, |session| {
        let field = PatientField::from_str(&req.field)?;
        PatientDetails::set_field(&mut session.store, field, req.value);
        Ok(Json(SessionView::from(&*session)))
    })
    .await
}

#[utoipa::path(
    put,
    path = "/sessions/{id}/insurance",
    params(("id" = String, Path, description = "Session id")),
    request_body = FieldEditReq,
    responses(
        (status = 200, description = "Insurance field updated", body = SessionView),
        (status = 400, description = "Unknown field")
    )
)]
pub async fn set_insurance_field(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
    Json(req): Json<FieldEditReq>,
) -> ApiResult<Json<SessionView>> {
    with_session(&state, id, |session| {
        let field = InsuranceField::from_str(&req.field)?;
        InsuranceDetails::set_field(&mut session.store, field, req.value);
        Ok(Json(SessionView::from(&*session)))
    })
    .await
}

#[utoipa::path(
    put,
    path = "/sessions/{id}/diagnosis",
    params(("id" = String, Path, description = "Session id")),
    request_body = FieldEditReq,
    responses(
        (status = 200, description = "Diagnosis field updated", body = SessionView),
        (status = 400, description = "Unknown field")
    )
)]
pub async fn set_diagnosis_field(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
    Json(req): Json<FieldEditReq>,
) -> ApiResult<Json<SessionView>> {
    with_session(&state, id, |session| {
        let field = DiagnosisField::from_str(&req.field)?;
        DiagnosisInformation::set_field(&mut session.store, field, req.value);
        Ok(Json(SessionView::from(&*session)))
    })
    .await
}

#[utoipa::path(
    put,
    path = "/sessions/{id}/treatment-history",
    params(("id" = String, Path, description = "Session id")),
    request_body = FieldEditReq,
    responses(
        (status = 200, description = "Treatment history field updated", body = SessionView),
        (status = 400, description = "Unknown field")
    )
)]
pub async fn set_history_field(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
    Json(req): Json<FieldEditReq>,
) -> ApiResult<Json<SessionView>> {
    with_session(&state, id, |session| {
        let field = HistoryField::from_str(&req.field)?;
        TreatmentHistoryStep::set_field(&mut session.store, field, req.value);
        Ok(Json(SessionView::from(&*session)))
    })
    .await
}

#[utoipa::path(
    post,
    path = "/sessions/{id}/lab-results",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 201, description = "Empty lab result appended", body = EntryCreatedRes)
    )
)]
pub async fn add_lab_result(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
) -> ApiResult<(StatusCode, Json<EntryCreatedRes>)> {
    with_session(&state, id, |session| {
        let entry = DiagnosisInformation::add_lab_result(&mut session.store);
        Ok((
            StatusCode::CREATED,
            Json(EntryCreatedRes {
                id: entry.to_string(),
            }),
        ))
    })
    .await
}

#[utoipa::path(
    put,
    path = "/sessions/{id}/lab-results/{entry_id}",
    params(
        ("id" = String, Path, description = "Session id"),
        ("entry_id" = String, Path, description = "Lab result id")
    ),
    request_body = FieldEditReq,
    responses(
        (status = 200, description = "Lab result updated", body = SessionView),
        (status = 404, description = "Unknown lab result")
    )
)]
pub async fn update_lab_result(
    State(state): State<AppState>,
    AxumPath((id, entry_id)): AxumPath<(Uuid, String)>,
    Json(req): Json<FieldEditReq>,
) -> ApiResult<Json<SessionView>> {
    with_session(&state, id, |session| {
        let field = LabResultField::from_str(&req.field)?;
        DiagnosisInformation::update_lab_result(
            &mut session.store,
            &EntryId::from(entry_id),
            field,
            req.value,
        )?;
        Ok(Json(SessionView::from(&*session)))
    })
    .await
}

#[utoipa::path(
    delete,
    path = "/sessions/{id}/lab-results/{entry_id}",
    params(
        ("id" = String, Path, description = "Session id"),
        ("entry_id" = String, Path, description = "Lab result id")
    ),
    responses(
        (status = 200, description = "Lab result removed", body = SessionView),
        (status = 404, description = "Unknown lab result")
    )
)]
pub async fn remove_lab_result(
    State(state): State<AppState>,
    AxumPath((id, entry_id)): AxumPath<(Uuid, String)>,
) -> ApiResult<Json<SessionView>> {
    with_session(&state, id, |session| {
        DiagnosisInformation::remove_lab_result(&mut session.store, &EntryId::from(entry_id))?;
        Ok(Json(SessionView::from(&*session)))
    })
    .await
}

#[utoipa::path(
    post,
    path = "/sessions/{id}/treatments",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 201, description = "Empty treatment appended", body = EntryCreatedRes)
    )
)]
pub async fn add_treatment(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
) -> ApiResult<(StatusCode, Json<EntryCreatedRes>)> {
    with_session(&state, id, |session| {
        let entry = TreatmentHistoryStep::add_treatment(&mut session.store);
        Ok((
            StatusCode::CREATED,
            Json(EntryCreatedRes {
                id: entry.to_string(),
            }),
        ))
    })
    .await
}

#[utoipa::path(
    put,
    path = "/sessions/{id}/treatments/{entry_id}",
    params(
        ("id" = String, Path, description = "Session id"),
        ("entry_id" = String, Path, description = "Treatment id")
    ),
    request_body = FieldEditReq,
    responses(
        (status = 200, description = "Treatment updated", body = SessionView),
        (status = 404, description = "Unknown treatment")
    )
)]
pub async fn update_treatment(
    State(state): State<AppState>,
    AxumPath((id, entry_id)): AxumPath<(Uuid, String)>,
    Json(req): Json<FieldEditReq>,
) -> ApiResult<Json<SessionView>> {
    with_session(&state, id, |session| {
        let field = TreatmentField::from_str(&req.field)?;
        TreatmentHistoryStep::update_treatment(
            &mut session.store,
            &EntryId::from(entry_id),
            field,
            req.value,
        )?;
        Ok(Json(SessionView::from(&*session)))
    })
    .await
}

#[utoipa::path(
    delete,
    path = "/sessions/{id}/treatments/{entry_id}",
    params(
        ("id" = String, Path, description = "Session id"),
        ("entry_id" = String, Path, description = "Treatment id")
    ),
    responses(
        (status = 200, description = "Treatment removed", body = SessionView),
        (status = 404, description = "Unknown treatment")
    )
)]
pub async fn remove_treatment(
    State(state): State<AppState>,
    AxumPath((id, entry_id)): AxumPath<(Uuid, String)>,
) -> ApiResult<Json<SessionView>> {
    with_session(&state, id, |session| {
        TreatmentHistoryStep::remove_treatment(&mut session.store, &EntryId::from(entry_id))?;
        Ok(Json(SessionView::from(&*session)))
    })
    .await
}

#[utoipa::path(
    put,
    path = "/sessions/{id}/review/introduction",
    params(("id" = String, Path, description = "Session id")),
    request_body = TextReq,
    responses(
        (status = 200, description = "Introduction replaced", body = SessionView)
    )
)]
pub async fn set_introduction(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
    Json(req): Json<TextReq>,
) -> ApiResult<Json<SessionView>> {
    with_session(&state, id, |session| {
        FinalReview::set_introduction(&mut session.store, req.text);
        Ok(Json(SessionView::from(&*session)))
    })
    .await
}

#[utoipa::path(
    put,
    path = "/sessions/{id}/review/rationale",
    params(("id" = String, Path, description = "Session id")),
    request_body = TextReq,
    responses(
        (status = 200, description = "Final rationale replaced", body = SessionView)
    )
)]
pub async fn set_final_rationale(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
    Json(req): Json<TextReq>,
) -> ApiResult<Json<SessionView>> {
    with_session(&state, id, |session| {
        FinalReview::set_final_rationale(&mut session.store, req.text);
        Ok(Json(SessionView::from(&*session)))
    })
    .await
}

#[utoipa::path(
    post,
    path = "/sessions/{id}/review/introduction/template",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 200, description = "Whether a template introduction was copied", body = AppliedRes)
    )
)]
pub async fn use_template_introduction(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
) -> ApiResult<Json<AppliedRes>> {
    with_session(&state, id, |session| {
        Ok(Json(AppliedRes {
            applied: FinalReview::use_template_introduction(&mut session.store),
        }))
    })
    .await
}

#[utoipa::path(
    post,
    path = "/sessions/{id}/review/rationale/template",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 200, description = "Whether a template rationale was copied", body = AppliedRes)
    )
)]
pub async fn use_template_rationale(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
) -> ApiResult<Json<AppliedRes>> {
    with_session(&state, id, |session| {
        Ok(Json(AppliedRes {
            applied: FinalReview::use_template_rationale(&mut session.store),
        }))
    })
    .await
}

#[utoipa::path(
    get,
    path = "/sessions/{id}/review",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 200, description = "Read-only summary and missing required fields", body = ReviewRes)
    )
)]
pub async fn get_review(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
) -> ApiResult<Json<ReviewRes>> {
    with_session(&state, id, |session| {
        Ok(Json(ReviewRes {
            summary: FinalReview::summary(session.store.letter()),
        }))
    })
    .await
}

#[utoipa::path(
    post,
    path = "/sessions/{id}/close",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 204, description = "Session discarded"),
        (status = 404, description = "Unknown session")
    )
)]
/// Ends a wizard run and frees its state. Later requests for the session answer 404.
pub async fn close_session(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
) -> ApiResult<StatusCode> {
    match state.sessions.lock().await.remove(&id) {
        Some(_) => {
            tracing::info!(session_id = %id, "session closed");
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(session_not_found(id)),
    }
}

#[utoipa::path(
    get,
    path = "/sessions/{id}/letter",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 200, description = "Rendered letter", body = LetterRes)
    )
)]
pub async fn get_letter(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
) -> ApiResult<Json<LetterRes>> {
    with_session(&state, id, |session| {
        let letter = render_letter(session.store.letter());
        Ok(Json(LetterRes {
            text: letter.to_plain_text(),
            markdown: letter.to_markdown(),
            letter,
        }))
    })
    .await
}

#[utoipa::path(
    get,
    path = "/sessions/{id}/export",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 200, description = "Letter as a PDF attachment", content_type = "application/pdf"),
        (status = 422, description = "Required fields missing under the strict policy")
    )
)]
pub async fn export_pdf(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let letter = with_session(&state, id, |session| session.render_for_export()).await?;
    let document = lmn_export::export_letter(Some(&letter))
        .map_err(export_error)?
        .ok_or_else(|| (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string()))?;

    tracing::info!(session_id = %id, pages = document.page_count, "letter exported");
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", document.filename),
            ),
        ],
        document.bytes,
    ))
}

#[utoipa::path(
    post,
    path = "/sessions/{id}/profile-notice/dismiss",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 200, description = "Profile notice hidden for this session", body = SessionView)
    )
)]
pub async fn dismiss_profile_notice(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
) -> ApiResult<Json<SessionView>> {
    with_session(&state, id, |session| {
        session.banner.dismiss();
        Ok(Json(SessionView::from(&*session)))
    })
    .await
}
