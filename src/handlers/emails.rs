use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    common::paginacao::ParamsPaginacao,
    common::resposta::RespostaApi,
    config::AppState,
    middleware::rbac::{EscreverEmails, ExigePermissao, LerEmails},
    models::email::{
        AtivarTemplatePayload, AtualizarTemplateEmail, CriarTemplateEmail, DuplicarTemplatePayload,
        EnviarEmailLotePayload, EnviarEmailPayload, FiltroLogEmail, FiltroTemplateEmail,
        RenderizarTemplatePayload, TipoTemplateEmail,
    },
};

// =========================================================================
//  ENVIO
// =========================================================================

#[utoipa::path(
    post,
    path = "/api/v1/emails/enviar",
    tag = "Emails",
    request_body = EnviarEmailPayload,
    responses((status = 200, description = "E-mail enviado ou agendado")),
    security(("api_jwt" = []))
)]
pub async fn enviar(
    State(estado): State<AppState>,
    _perm: ExigePermissao<EscreverEmails>,
    Json(payload): Json<EnviarEmailPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let log = estado.email_service.enviar_email(payload).await?;
    Ok(Json(RespostaApi::dados(log)))
}

#[utoipa::path(
    post,
    path = "/api/v1/emails/enviar-lote",
    tag = "Emails",
    request_body = EnviarEmailLotePayload,
    responses((status = 200, description = "Resultado do lote com erros por destinatário")),
    security(("api_jwt" = []))
)]
pub async fn enviar_lote(
    State(estado): State<AppState>,
    _perm: ExigePermissao<EscreverEmails>,
    Json(payload): Json<EnviarEmailLotePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let resultado = estado.email_service.enviar_email_lote(payload).await?;
    Ok(Json(RespostaApi::dados(resultado)))
}

#[utoipa::path(
    post,
    path = "/api/v1/emails/processar-agendados",
    tag = "Emails",
    responses((status = 200, description = "Agendados vencidos despachados")),
    security(("api_jwt" = []))
)]
pub async fn processar_agendados(
    State(estado): State<AppState>,
    _perm: ExigePermissao<EscreverEmails>,
) -> Result<impl IntoResponse, AppError> {
    let (enviados, falhas) = estado.email_service.processar_agendados().await?;
    Ok(Json(RespostaApi::dados(json!({
        "enviados": enviados,
        "falhas": falhas,
    }))))
}

#[utoipa::path(
    post,
    path = "/api/v1/emails/{id}/reenviar",
    tag = "Emails",
    params(("id" = Uuid, Path, description = "ID do log de e-mail")),
    responses((status = 200, description = "Nova tentativa registrada")),
    security(("api_jwt" = []))
)]
pub async fn reenviar(
    State(estado): State<AppState>,
    _perm: ExigePermissao<EscreverEmails>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let log = estado.email_service.reenviar_email(id).await?;
    Ok(Json(RespostaApi::dados(log)))
}

#[utoipa::path(
    get,
    path = "/api/v1/emails/testar-conexao",
    tag = "Emails",
    responses((status = 200, description = "Estado do transporte de e-mail")),
    security(("api_jwt" = []))
)]
pub async fn testar_conexao(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerEmails>,
) -> Result<impl IntoResponse, AppError> {
    let mensagem = estado.email_service.testar_conexao().await?;
    Ok(Json(RespostaApi::mensagem(mensagem)))
}

#[utoipa::path(
    get,
    path = "/api/v1/emails/logs",
    tag = "Emails",
    params(FiltroLogEmail, ParamsPaginacao),
    responses((status = 200, description = "Histórico de envios")),
    security(("api_jwt" = []))
)]
pub async fn logs(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerEmails>,
    Query(filtro): Query<FiltroLogEmail>,
    Query(paginacao): Query<ParamsPaginacao>,
) -> Result<impl IntoResponse, AppError> {
    let pagina = estado.email_service.obter_logs(filtro, paginacao).await?;
    Ok(Json(RespostaApi::de_pagina(pagina)))
}

// =========================================================================
//  TEMPLATES
// =========================================================================

#[utoipa::path(
    get,
    path = "/api/v1/emails/templates",
    tag = "Emails",
    params(FiltroTemplateEmail, ParamsPaginacao),
    responses((status = 200, description = "Listagem paginada de templates")),
    security(("api_jwt" = []))
)]
pub async fn listar_templates(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerEmails>,
    Query(filtro): Query<FiltroTemplateEmail>,
    Query(paginacao): Query<ParamsPaginacao>,
) -> Result<impl IntoResponse, AppError> {
    let pagina = estado
        .template_email_service
        .listar(filtro, paginacao)
        .await?;
    Ok(Json(RespostaApi::de_pagina(pagina)))
}

#[utoipa::path(
    get,
    path = "/api/v1/emails/templates/tipo/{tipo}",
    tag = "Emails",
    params(("tipo" = TipoTemplateEmail, Path, description = "Tipo do template")),
    responses((status = 200, description = "Templates ativos do tipo")),
    security(("api_jwt" = []))
)]
pub async fn templates_por_tipo(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerEmails>,
    Path(tipo): Path<TipoTemplateEmail>,
) -> Result<impl IntoResponse, AppError> {
    let templates = estado.template_email_service.listar_por_tipo(tipo).await?;
    Ok(Json(RespostaApi::dados(templates)))
}

#[utoipa::path(
    get,
    path = "/api/v1/emails/templates/{id}",
    tag = "Emails",
    params(("id" = Uuid, Path, description = "ID do template")),
    responses((status = 200), (status = 404, description = "Template não encontrado")),
    security(("api_jwt" = []))
)]
pub async fn buscar_template(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerEmails>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let template = estado.template_email_service.buscar_por_id(id).await?;
    Ok(Json(RespostaApi::dados(template)))
}

#[utoipa::path(
    post,
    path = "/api/v1/emails/templates",
    tag = "Emails",
    request_body = CriarTemplateEmail,
    responses((status = 201, description = "Template criado")),
    security(("api_jwt" = []))
)]
pub async fn criar_template(
    State(estado): State<AppState>,
    _perm: ExigePermissao<EscreverEmails>,
    Json(payload): Json<CriarTemplateEmail>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let template = estado.template_email_service.criar(payload).await?;
    Ok((StatusCode::CREATED, Json(RespostaApi::dados(template))))
}

#[utoipa::path(
    put,
    path = "/api/v1/emails/templates/{id}",
    tag = "Emails",
    params(("id" = Uuid, Path, description = "ID do template")),
    request_body = AtualizarTemplateEmail,
    responses((status = 200, description = "Template atualizado")),
    security(("api_jwt" = []))
)]
pub async fn atualizar_template(
    State(estado): State<AppState>,
    _perm: ExigePermissao<EscreverEmails>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AtualizarTemplateEmail>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let template = estado.template_email_service.atualizar(id, payload).await?;
    Ok(Json(RespostaApi::dados(template)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/emails/templates/{id}",
    tag = "Emails",
    params(("id" = Uuid, Path, description = "ID do template")),
    responses((status = 200, description = "Template excluído")),
    security(("api_jwt" = []))
)]
pub async fn excluir_template(
    State(estado): State<AppState>,
    _perm: ExigePermissao<EscreverEmails>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    estado.template_email_service.excluir(id).await?;
    Ok(Json(RespostaApi::mensagem(
        "Template de email excluído com sucesso",
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/emails/templates/{id}/ativar",
    tag = "Emails",
    params(("id" = Uuid, Path, description = "ID do template")),
    request_body = AtivarTemplatePayload,
    responses((status = 200, description = "Template ativado ou desativado")),
    security(("api_jwt" = []))
)]
pub async fn ativar_template(
    State(estado): State<AppState>,
    _perm: ExigePermissao<EscreverEmails>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AtivarTemplatePayload>,
) -> Result<impl IntoResponse, AppError> {
    let template = estado
        .template_email_service
        .ativar_desativar(id, payload.ativo)
        .await?;
    Ok(Json(RespostaApi::dados(template)))
}

#[utoipa::path(
    post,
    path = "/api/v1/emails/templates/{id}/duplicar",
    tag = "Emails",
    params(("id" = Uuid, Path, description = "ID do template")),
    request_body = DuplicarTemplatePayload,
    responses((status = 201, description = "Cópia criada desativada")),
    security(("api_jwt" = []))
)]
pub async fn duplicar_template(
    State(estado): State<AppState>,
    _perm: ExigePermissao<EscreverEmails>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DuplicarTemplatePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let template = estado
        .template_email_service
        .duplicar(id, &payload.novo_nome)
        .await?;
    Ok((StatusCode::CREATED, Json(RespostaApi::dados(template))))
}

#[utoipa::path(
    post,
    path = "/api/v1/emails/templates/{id}/renderizar",
    tag = "Emails",
    params(("id" = Uuid, Path, description = "ID do template")),
    request_body = RenderizarTemplatePayload,
    responses((status = 200, description = "Prévia com os marcadores substituídos")),
    security(("api_jwt" = []))
)]
pub async fn renderizar_template(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerEmails>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RenderizarTemplatePayload>,
) -> Result<impl IntoResponse, AppError> {
    let renderizado = estado
        .template_email_service
        .renderizar(id, &payload.dados)
        .await?;
    Ok(Json(RespostaApi::dados(renderizado)))
}
