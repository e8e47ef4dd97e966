use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::paginacao::{Paginado, ParamsPaginacao},
    db::EmailRepository,
    models::email::{
        EnviarEmailLotePayload, EnviarEmailPayload, ErroEnvioLote, FiltroLogEmail, LogEmail,
        ResultadoEnvioLote, StatusEnvioEmail,
    },
    services::template_email_service::{TemplateEmailService, substituir_marcadores},
};

/// Canal de entrega dos e-mails. A configuração de transporte real (SMTP)
/// fica fora do escopo do sistema; a implementação padrão registra a
/// entrega no log estruturado e o ciclo de vida completo fica persistido
/// em `logs_email`.
#[async_trait]
pub trait TransporteEmail: Send + Sync {
    async fn entregar(&self, destinatario: &str, assunto: &str, corpo: &str)
    -> Result<(), String>;

    fn descricao(&self) -> &'static str;
}

pub struct TransporteTracing;

#[async_trait]
impl TransporteEmail for TransporteTracing {
    async fn entregar(
        &self,
        destinatario: &str,
        assunto: &str,
        _corpo: &str,
    ) -> Result<(), String> {
        tracing::info!(destinatario, assunto, "e-mail entregue (transporte de log)");
        Ok(())
    }

    fn descricao(&self) -> &'static str {
        "transporte de log"
    }
}

#[derive(Clone)]
pub struct EmailService {
    repo: EmailRepository,
    templates: TemplateEmailService,
    transporte: Arc<dyn TransporteEmail>,
}

impl EmailService {
    pub fn new(
        repo: EmailRepository,
        templates: TemplateEmailService,
        transporte: Arc<dyn TransporteEmail>,
    ) -> Self {
        Self {
            repo,
            templates,
            transporte,
        }
    }

    /// Envia (ou agenda) um e-mail. Com `template_id`, o assunto e o corpo
    /// saem do template renderizado com `dados`; sem template, ambos são
    /// obrigatórios no payload.
    pub async fn enviar_email(&self, payload: EnviarEmailPayload) -> Result<LogEmail, AppError> {
        let (assunto, corpo, template_id) = self
            .resolver_conteudo(
                payload.template_id,
                payload.assunto,
                payload.corpo,
                &payload.dados,
            )
            .await?;

        // Agendamento: registra e deixa para o processamento periódico.
        if let Some(agendar_para) = payload.agendar_para {
            if agendar_para > Utc::now() {
                return self
                    .repo
                    .inserir_log(
                        &payload.destinatario,
                        &assunto,
                        &corpo,
                        template_id,
                        StatusEnvioEmail::Agendado,
                        Some(agendar_para),
                    )
                    .await;
            }
        }

        let log = self
            .repo
            .inserir_log(
                &payload.destinatario,
                &assunto,
                &corpo,
                template_id,
                StatusEnvioEmail::Pendente,
                None,
            )
            .await?;

        self.despachar(log).await
    }

    /// Envio em lote: cada destinatário é renderizado e enviado
    /// separadamente; falhas individuais não interrompem o restante.
    pub async fn enviar_email_lote(
        &self,
        payload: EnviarEmailLotePayload,
    ) -> Result<ResultadoEnvioLote, AppError> {
        let total_processados = payload.destinatarios.len();
        let mut enviados = Vec::new();
        let mut erros = Vec::new();

        for destinatario in payload.destinatarios {
            let mut dados = destinatario.dados.clone();
            if let Some(nome) = &destinatario.nome {
                dados
                    .entry("nomeCompleto".to_string())
                    .or_insert_with(|| serde_json::Value::String(nome.clone()));
            }

            let envio = EnviarEmailPayload {
                destinatario: destinatario.email.clone(),
                assunto: payload.assunto.clone(),
                corpo: payload.corpo.clone(),
                template_id: payload.template_id,
                dados,
                agendar_para: payload.agendar_para,
            };

            match self.enviar_email(envio).await {
                Ok(log) => enviados.push(log),
                Err(e) => erros.push(ErroEnvioLote {
                    destinatario: destinatario.email,
                    erro: e.to_string(),
                }),
            }
        }

        Ok(ResultadoEnvioLote {
            total_processados,
            total_enviados: enviados.len(),
            total_erros: erros.len(),
            enviados,
            erros,
        })
    }

    /// Despacha os e-mails agendados cuja hora já chegou.
    pub async fn processar_agendados(&self) -> Result<(usize, usize), AppError> {
        let vencidos = self.repo.listar_agendados_vencidos().await?;
        let mut sucesso = 0;
        let mut falha = 0;

        for log in vencidos {
            match self.despachar(log).await {
                Ok(atualizado) if atualizado.status == StatusEnvioEmail::Enviado => sucesso += 1,
                _ => falha += 1,
            }
        }

        tracing::info!(sucesso, falha, "e-mails agendados processados");
        Ok((sucesso, falha))
    }

    /// Nova tentativa de envio de um log existente.
    pub async fn reenviar_email(&self, log_id: Uuid) -> Result<LogEmail, AppError> {
        let log = self
            .repo
            .buscar_log_por_id(log_id)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Log de email não encontrado".to_string()))?;

        if log.status == StatusEnvioEmail::Enviado {
            return Err(AppError::Conflito("E-mail já foi enviado".to_string()));
        }

        self.despachar(log).await
    }

    pub async fn obter_logs(
        &self,
        filtro: FiltroLogEmail,
        paginacao: ParamsPaginacao,
    ) -> Result<Paginado<LogEmail>, AppError> {
        let (page, limit, _) = paginacao.normalizar();
        let (logs, total) = self.repo.listar_logs(&filtro, &paginacao).await?;
        Ok(Paginado::novo(logs, page, limit, total))
    }

    pub async fn testar_conexao(&self) -> Result<String, AppError> {
        Ok(format!(
            "Serviço de email operacional ({})",
            self.transporte.descricao()
        ))
    }

    async fn despachar(&self, log: LogEmail) -> Result<LogEmail, AppError> {
        match self
            .transporte
            .entregar(&log.destinatario, &log.assunto, &log.corpo)
            .await
        {
            Ok(()) => {
                self.repo
                    .registrar_tentativa(log.id, StatusEnvioEmail::Enviado, None)
                    .await
            }
            Err(erro) => {
                tracing::warn!(destinatario = %log.destinatario, erro = %erro, "falha no envio de e-mail");
                self.repo
                    .registrar_tentativa(log.id, StatusEnvioEmail::Erro, Some(&erro))
                    .await
            }
        }
    }

    async fn resolver_conteudo(
        &self,
        template_id: Option<Uuid>,
        assunto: Option<String>,
        corpo: Option<String>,
        dados: &HashMap<String, serde_json::Value>,
    ) -> Result<(String, String, Option<Uuid>), AppError> {
        match template_id {
            Some(id) => {
                let renderizado = self.templates.renderizar(id, dados).await?;
                Ok((renderizado.assunto, renderizado.corpo, Some(id)))
            }
            None => {
                let assunto = assunto.ok_or_else(|| {
                    AppError::Invalido("Assunto é obrigatório sem template".to_string())
                })?;
                let corpo = corpo.ok_or_else(|| {
                    AppError::Invalido("Corpo do email é obrigatório sem template".to_string())
                })?;
                Ok((
                    substituir_marcadores(&assunto, dados),
                    substituir_marcadores(&corpo, dados),
                    None,
                ))
            }
        }
    }
}
