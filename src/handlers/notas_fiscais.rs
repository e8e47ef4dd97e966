use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    common::paginacao::{ParamsPaginacao, ParamsPeriodo},
    common::resposta::RespostaApi,
    config::AppState,
    middleware::rbac::{EscreverNotasFiscais, ExigePermissao, LerNotasFiscais},
    models::nota_fiscal::{
        AtualizarNotaFiscal, CancelarNotaFiscal, CriarNotaFiscal, FiltroNotaFiscal,
        GerarLotePayload,
    },
};

#[utoipa::path(
    get,
    path = "/api/v1/notas-fiscais",
    tag = "Notas Fiscais",
    params(FiltroNotaFiscal, ParamsPeriodo, ParamsPaginacao),
    responses((status = 200, description = "Listagem paginada de notas fiscais")),
    security(("api_jwt" = []))
)]
pub async fn listar(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerNotasFiscais>,
    Query(filtro): Query<FiltroNotaFiscal>,
    Query(periodo): Query<ParamsPeriodo>,
    Query(paginacao): Query<ParamsPaginacao>,
) -> Result<impl IntoResponse, AppError> {
    let pagina = estado
        .nota_fiscal_service
        .listar(filtro, periodo, paginacao)
        .await?;
    Ok(Json(RespostaApi::de_pagina(pagina)))
}

#[utoipa::path(
    get,
    path = "/api/v1/notas-fiscais/statistics",
    tag = "Notas Fiscais",
    params(ParamsPeriodo),
    responses((status = 200, description = "Contagens, valor emitido e série mensal")),
    security(("api_jwt" = []))
)]
pub async fn estatisticas(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerNotasFiscais>,
    Query(periodo): Query<ParamsPeriodo>,
) -> Result<impl IntoResponse, AppError> {
    let stats = estado.nota_fiscal_service.estatisticas(periodo).await?;
    Ok(Json(RespostaApi::dados(stats)))
}

#[utoipa::path(
    get,
    path = "/api/v1/notas-fiscais/contribuicoes-sem-nota",
    tag = "Notas Fiscais",
    responses((status = 200, description = "Contribuições pagas sem nota fiscal")),
    security(("api_jwt" = []))
)]
pub async fn contribuicoes_sem_nota(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerNotasFiscais>,
) -> Result<impl IntoResponse, AppError> {
    let contribuicoes = estado.nota_fiscal_service.contribuicoes_sem_nota().await?;
    Ok(Json(RespostaApi::dados(contribuicoes)))
}

#[utoipa::path(
    get,
    path = "/api/v1/notas-fiscais/relatorio-mensal",
    tag = "Notas Fiscais",
    params(ParamsPeriodo),
    responses((status = 200, description = "Quantidade e valor emitidos por mês")),
    security(("api_jwt" = []))
)]
pub async fn relatorio_mensal(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerNotasFiscais>,
    Query(periodo): Query<ParamsPeriodo>,
) -> Result<impl IntoResponse, AppError> {
    let relatorio = estado.nota_fiscal_service.relatorio_mensal(periodo).await?;
    Ok(Json(RespostaApi::dados(relatorio)))
}

#[utoipa::path(
    get,
    path = "/api/v1/notas-fiscais/numero/{numero}",
    tag = "Notas Fiscais",
    params(("numero" = String, Path, description = "Número da nota, ex.: NF2025000001")),
    responses((status = 200), (status = 404, description = "Nota fiscal não encontrada")),
    security(("api_jwt" = []))
)]
pub async fn buscar_por_numero(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerNotasFiscais>,
    Path(numero): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let nota = estado.nota_fiscal_service.buscar_por_numero(&numero).await?;
    Ok(Json(RespostaApi::dados(nota)))
}

#[utoipa::path(
    get,
    path = "/api/v1/notas-fiscais/{id}",
    tag = "Notas Fiscais",
    params(("id" = Uuid, Path, description = "ID da nota fiscal")),
    responses((status = 200), (status = 404, description = "Nota fiscal não encontrada")),
    security(("api_jwt" = []))
)]
pub async fn buscar(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerNotasFiscais>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let nota = estado.nota_fiscal_service.buscar_por_id(id).await?;
    Ok(Json(RespostaApi::dados(nota)))
}

#[utoipa::path(
    post,
    path = "/api/v1/notas-fiscais",
    tag = "Notas Fiscais",
    request_body = CriarNotaFiscal,
    responses(
        (status = 201, description = "Nota emitida com número sequencial"),
        (status = 400, description = "Contribuição não está paga"),
        (status = 409, description = "Contribuição já possui nota")
    ),
    security(("api_jwt" = []))
)]
pub async fn criar(
    State(estado): State<AppState>,
    _perm: ExigePermissao<EscreverNotasFiscais>,
    Json(payload): Json<CriarNotaFiscal>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let nota = estado.nota_fiscal_service.criar(payload).await?;
    Ok((StatusCode::CREATED, Json(RespostaApi::dados(nota))))
}

#[utoipa::path(
    put,
    path = "/api/v1/notas-fiscais/{id}",
    tag = "Notas Fiscais",
    params(("id" = Uuid, Path, description = "ID da nota fiscal")),
    request_body = AtualizarNotaFiscal,
    responses(
        (status = 200, description = "Nota atualizada"),
        (status = 400, description = "Nota cancelada não pode ser reativada")
    ),
    security(("api_jwt" = []))
)]
pub async fn atualizar(
    State(estado): State<AppState>,
    _perm: ExigePermissao<EscreverNotasFiscais>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AtualizarNotaFiscal>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let nota = estado.nota_fiscal_service.atualizar(id, payload).await?;
    Ok(Json(RespostaApi::dados(nota)))
}

#[utoipa::path(
    post,
    path = "/api/v1/notas-fiscais/gerar-lote",
    tag = "Notas Fiscais",
    request_body = GerarLotePayload,
    responses((status = 200, description = "Resultado do lote com erros por contribuição")),
    security(("api_jwt" = []))
)]
pub async fn gerar_lote(
    State(estado): State<AppState>,
    _perm: ExigePermissao<EscreverNotasFiscais>,
    Json(payload): Json<GerarLotePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let resultado = estado.nota_fiscal_service.gerar_lote(payload).await?;
    Ok(Json(RespostaApi::dados(resultado)))
}

#[utoipa::path(
    post,
    path = "/api/v1/notas-fiscais/{id}/cancelar",
    tag = "Notas Fiscais",
    params(("id" = Uuid, Path, description = "ID da nota fiscal")),
    request_body = CancelarNotaFiscal,
    responses(
        (status = 200, description = "Nota cancelada"),
        (status = 409, description = "Nota já estava cancelada")
    ),
    security(("api_jwt" = []))
)]
pub async fn cancelar(
    State(estado): State<AppState>,
    _perm: ExigePermissao<EscreverNotasFiscais>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CancelarNotaFiscal>,
) -> Result<impl IntoResponse, AppError> {
    let nota = estado
        .nota_fiscal_service
        .cancelar(id, payload.motivo)
        .await?;
    Ok(Json(RespostaApi::dados_com_mensagem(
        nota,
        "Nota fiscal cancelada com sucesso",
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/notas-fiscais/{id}/gerar-pdf",
    tag = "Notas Fiscais",
    params(("id" = Uuid, Path, description = "ID da nota fiscal")),
    responses(
        (status = 200, description = "PDF gerado e arquivo registrado"),
        (status = 400, description = "Nota cancelada")
    ),
    security(("api_jwt" = []))
)]
pub async fn gerar_pdf(
    State(estado): State<AppState>,
    _perm: ExigePermissao<EscreverNotasFiscais>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let resultado = estado.nota_fiscal_service.gerar_pdf(id).await?;
    Ok(Json(RespostaApi::dados_com_mensagem(
        resultado,
        "PDF gerado com sucesso",
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/notas-fiscais/{id}/download-pdf",
    tag = "Notas Fiscais",
    params(("id" = Uuid, Path, description = "ID da nota fiscal")),
    responses((status = 200, description = "Documento PDF para download")),
    security(("api_jwt" = []))
)]
pub async fn baixar_pdf(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerNotasFiscais>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (nome, bytes) = estado.nota_fiscal_service.baixar_pdf(id).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", nome),
            ),
        ],
        bytes,
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/notas-fiscais/{id}/reenviar-email",
    tag = "Notas Fiscais",
    params(("id" = Uuid, Path, description = "ID da nota fiscal")),
    responses((status = 200, description = "Nota reenviada ao pagador")),
    security(("api_jwt" = []))
)]
pub async fn reenviar_email(
    State(estado): State<AppState>,
    _perm: ExigePermissao<EscreverNotasFiscais>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    estado.nota_fiscal_service.reenviar_email(id).await?;
    Ok(Json(RespostaApi::mensagem(
        "Nota fiscal reenviada por e-mail",
    )))
}
