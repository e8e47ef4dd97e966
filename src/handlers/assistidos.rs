use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    common::paginacao::ParamsPaginacao,
    common::resposta::RespostaApi,
    config::AppState,
    middleware::rbac::{EscreverAssistidos, ExigePermissao, LerAssistidos},
    models::assistido::{AtualizarAssistido, CriarAssistido, FiltroAssistido},
    models::voluntario::AtualizarStatusPessoa,
};

#[utoipa::path(
    get,
    path = "/api/v1/assistidos",
    tag = "Assistidos",
    params(FiltroAssistido, ParamsPaginacao),
    responses((status = 200, description = "Listagem paginada de assistidos")),
    security(("api_jwt" = []))
)]
pub async fn listar(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerAssistidos>,
    Query(filtro): Query<FiltroAssistido>,
    Query(paginacao): Query<ParamsPaginacao>,
) -> Result<impl IntoResponse, AppError> {
    let pagina = estado.assistido_service.listar(filtro, paginacao).await?;
    Ok(Json(RespostaApi::de_pagina(pagina)))
}

#[utoipa::path(
    get,
    path = "/api/v1/assistidos/statistics",
    tag = "Assistidos",
    responses((status = 200, description = "Contagens por status e valor mensal total")),
    security(("api_jwt" = []))
)]
pub async fn estatisticas(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerAssistidos>,
) -> Result<impl IntoResponse, AppError> {
    let stats = estado.assistido_service.estatisticas().await?;
    Ok(Json(RespostaApi::dados(stats)))
}

#[utoipa::path(
    get,
    path = "/api/v1/assistidos/{id}",
    tag = "Assistidos",
    params(("id" = Uuid, Path, description = "ID do assistido")),
    responses((status = 200), (status = 404, description = "Assistido não encontrado")),
    security(("api_jwt" = []))
)]
pub async fn buscar(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerAssistidos>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let assistido = estado.assistido_service.buscar_por_id(id).await?;
    Ok(Json(RespostaApi::dados(assistido)))
}

#[utoipa::path(
    post,
    path = "/api/v1/assistidos",
    tag = "Assistidos",
    request_body = CriarAssistido,
    responses((status = 201, description = "Assistido criado")),
    security(("api_jwt" = []))
)]
pub async fn criar(
    State(estado): State<AppState>,
    _perm: ExigePermissao<EscreverAssistidos>,
    Json(payload): Json<CriarAssistido>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let assistido = estado.assistido_service.criar(payload).await?;
    Ok((StatusCode::CREATED, Json(RespostaApi::dados(assistido))))
}

#[utoipa::path(
    put,
    path = "/api/v1/assistidos/{id}",
    tag = "Assistidos",
    params(("id" = Uuid, Path, description = "ID do assistido")),
    request_body = AtualizarAssistido,
    responses((status = 200, description = "Assistido atualizado")),
    security(("api_jwt" = []))
)]
pub async fn atualizar(
    State(estado): State<AppState>,
    _perm: ExigePermissao<EscreverAssistidos>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AtualizarAssistido>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let assistido = estado.assistido_service.atualizar(id, payload).await?;
    Ok(Json(RespostaApi::dados(assistido)))
}

#[utoipa::path(
    patch,
    path = "/api/v1/assistidos/{id}/status",
    tag = "Assistidos",
    params(("id" = Uuid, Path, description = "ID do assistido")),
    request_body = AtualizarStatusPessoa,
    responses((status = 200, description = "Status atualizado")),
    security(("api_jwt" = []))
)]
pub async fn atualizar_status(
    State(estado): State<AppState>,
    _perm: ExigePermissao<EscreverAssistidos>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AtualizarStatusPessoa>,
) -> Result<impl IntoResponse, AppError> {
    let assistido = estado
        .assistido_service
        .atualizar_status(id, payload.status)
        .await?;
    Ok(Json(RespostaApi::dados(assistido)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/assistidos/{id}",
    tag = "Assistidos",
    params(("id" = Uuid, Path, description = "ID do assistido")),
    responses((status = 200, description = "Assistido excluído")),
    security(("api_jwt" = []))
)]
pub async fn excluir(
    State(estado): State<AppState>,
    _perm: ExigePermissao<EscreverAssistidos>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    estado.assistido_service.excluir(id).await?;
    Ok(Json(RespostaApi::mensagem("Assistido excluído com sucesso")))
}
