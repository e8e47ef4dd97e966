use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::paginacao::ParamsPaginacao,
    models::email::{
        AtualizarTemplateEmail, CriarTemplateEmail, FiltroLogEmail, FiltroTemplateEmail, LogEmail,
        StatusEnvioEmail, TemplateEmail, TipoTemplateEmail,
    },
};

const COLUNAS_ORDENACAO_TEMPLATE: &[(&str, &str)] =
    &[("nome", "nome"), ("tipo", "tipo"), ("criadoEm", "criado_em")];

const COLUNAS_ORDENACAO_LOG: &[(&str, &str)] = &[
    ("criadoEm", "criado_em"),
    ("destinatario", "destinatario"),
    ("status", "status"),
];

#[derive(Clone)]
pub struct EmailRepository {
    pool: PgPool,
}

impl EmailRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  TEMPLATES
    // =========================================================================

    pub async fn criar_template(
        &self,
        dados: &CriarTemplateEmail,
        ativo: bool,
    ) -> Result<TemplateEmail, AppError> {
        sqlx::query_as::<_, TemplateEmail>(
            r#"
            INSERT INTO templates_email (nome, assunto, corpo, tipo, ativo)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&dados.nome)
        .bind(&dados.assunto)
        .bind(&dados.corpo)
        .bind(dados.tipo)
        .bind(ativo)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if super::unique_violada(&e) {
                AppError::Conflito("Já existe um template com este nome".to_string())
            } else {
                AppError::BancoDeDados(e)
            }
        })
    }

    pub async fn buscar_template_por_id(&self, id: Uuid) -> Result<Option<TemplateEmail>, AppError> {
        Ok(
            sqlx::query_as::<_, TemplateEmail>("SELECT * FROM templates_email WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    pub async fn buscar_template_por_nome(
        &self,
        nome: &str,
    ) -> Result<Option<TemplateEmail>, AppError> {
        Ok(
            sqlx::query_as::<_, TemplateEmail>("SELECT * FROM templates_email WHERE nome = $1")
                .bind(nome)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    pub async fn listar_templates(
        &self,
        filtro: &FiltroTemplateEmail,
        paginacao: &ParamsPaginacao,
    ) -> Result<(Vec<TemplateEmail>, i64), AppError> {
        let (_, limit, offset) = paginacao.normalizar();

        let total: i64 = {
            let mut qb =
                QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM templates_email WHERE 1=1");
            aplicar_filtros_template(&mut qb, filtro);
            qb.build_query_scalar().fetch_one(&self.pool).await?
        };

        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM templates_email WHERE 1=1");
        aplicar_filtros_template(&mut qb, filtro);
        let coluna = paginacao.coluna_ordenacao(COLUNAS_ORDENACAO_TEMPLATE, "nome");
        qb.push(format!(" ORDER BY {} {}", coluna, paginacao.direcao().sql()));
        qb.push(" LIMIT ").push_bind(limit);
        qb.push(" OFFSET ").push_bind(offset);

        let templates = qb
            .build_query_as::<TemplateEmail>()
            .fetch_all(&self.pool)
            .await?;

        Ok((templates, total))
    }

    pub async fn listar_templates_por_tipo(
        &self,
        tipo: TipoTemplateEmail,
    ) -> Result<Vec<TemplateEmail>, AppError> {
        Ok(sqlx::query_as::<_, TemplateEmail>(
            "SELECT * FROM templates_email WHERE tipo = $1 AND ativo ORDER BY nome ASC",
        )
        .bind(tipo)
        .fetch_all(&self.pool)
        .await?)
    }

    pub async fn atualizar_template(
        &self,
        id: Uuid,
        dados: &AtualizarTemplateEmail,
    ) -> Result<TemplateEmail, AppError> {
        let mut qb =
            QueryBuilder::<Postgres>::new("UPDATE templates_email SET atualizado_em = now()");
        if let Some(nome) = &dados.nome {
            qb.push(", nome = ").push_bind(nome.clone());
        }
        if let Some(assunto) = &dados.assunto {
            qb.push(", assunto = ").push_bind(assunto.clone());
        }
        if let Some(corpo) = &dados.corpo {
            qb.push(", corpo = ").push_bind(corpo.clone());
        }
        if let Some(tipo) = dados.tipo {
            qb.push(", tipo = ").push_bind(tipo);
        }
        if let Some(ativo) = dados.ativo {
            qb.push(", ativo = ").push_bind(ativo);
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" RETURNING *");

        Ok(qb
            .build_query_as::<TemplateEmail>()
            .fetch_one(&self.pool)
            .await?)
    }

    pub async fn definir_template_ativo(
        &self,
        id: Uuid,
        ativo: bool,
    ) -> Result<TemplateEmail, AppError> {
        Ok(sqlx::query_as::<_, TemplateEmail>(
            "UPDATE templates_email SET ativo = $2, atualizado_em = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(ativo)
        .fetch_one(&self.pool)
        .await?)
    }

    pub async fn excluir_template(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM templates_email WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // =========================================================================
    //  LOGS DE ENVIO
    // =========================================================================

    pub async fn inserir_log(
        &self,
        destinatario: &str,
        assunto: &str,
        corpo: &str,
        template_id: Option<Uuid>,
        status: StatusEnvioEmail,
        agendar_para: Option<DateTime<Utc>>,
    ) -> Result<LogEmail, AppError> {
        Ok(sqlx::query_as::<_, LogEmail>(
            r#"
            INSERT INTO logs_email (destinatario, assunto, corpo, template_id, status, agendar_para)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(destinatario)
        .bind(assunto)
        .bind(corpo)
        .bind(template_id)
        .bind(status)
        .bind(agendar_para)
        .fetch_one(&self.pool)
        .await?)
    }

    pub async fn buscar_log_por_id(&self, id: Uuid) -> Result<Option<LogEmail>, AppError> {
        Ok(
            sqlx::query_as::<_, LogEmail>("SELECT * FROM logs_email WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    /// Registra o desfecho de uma tentativa de envio.
    pub async fn registrar_tentativa(
        &self,
        id: Uuid,
        status: StatusEnvioEmail,
        erro: Option<&str>,
    ) -> Result<LogEmail, AppError> {
        Ok(sqlx::query_as::<_, LogEmail>(
            r#"
            UPDATE logs_email
            SET status = $2,
                tentativas = tentativas + 1,
                ultima_tentativa = now(),
                erro_envio = $3,
                enviado_em = CASE WHEN $2 = 'enviado' THEN now() ELSE enviado_em END,
                atualizado_em = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(erro)
        .fetch_one(&self.pool)
        .await?)
    }

    pub async fn listar_logs(
        &self,
        filtro: &FiltroLogEmail,
        paginacao: &ParamsPaginacao,
    ) -> Result<(Vec<LogEmail>, i64), AppError> {
        let (_, limit, offset) = paginacao.normalizar();

        let total: i64 = {
            let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM logs_email WHERE 1=1");
            aplicar_filtros_log(&mut qb, filtro);
            qb.build_query_scalar().fetch_one(&self.pool).await?
        };

        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM logs_email WHERE 1=1");
        aplicar_filtros_log(&mut qb, filtro);
        let coluna = paginacao.coluna_ordenacao(COLUNAS_ORDENACAO_LOG, "criado_em");
        qb.push(format!(" ORDER BY {} {}", coluna, paginacao.direcao().sql()));
        qb.push(" LIMIT ").push_bind(limit);
        qb.push(" OFFSET ").push_bind(offset);

        let logs = qb.build_query_as::<LogEmail>().fetch_all(&self.pool).await?;

        Ok((logs, total))
    }

    /// E-mails agendados cuja hora já chegou.
    pub async fn listar_agendados_vencidos(&self) -> Result<Vec<LogEmail>, AppError> {
        Ok(sqlx::query_as::<_, LogEmail>(
            r#"
            SELECT * FROM logs_email
            WHERE status = 'agendado' AND agendar_para <= now()
            ORDER BY agendar_para ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }
}

fn aplicar_filtros_template(qb: &mut QueryBuilder<'_, Postgres>, filtro: &FiltroTemplateEmail) {
    if let Some(tipo) = filtro.tipo {
        qb.push(" AND tipo = ").push_bind(tipo);
    }
    if let Some(ativo) = filtro.ativo {
        qb.push(" AND ativo = ").push_bind(ativo);
    }
}

fn aplicar_filtros_log(qb: &mut QueryBuilder<'_, Postgres>, filtro: &FiltroLogEmail) {
    if let Some(status) = filtro.status {
        qb.push(" AND status = ").push_bind(status);
    }
    if let Some(template_id) = filtro.template_id {
        qb.push(" AND template_id = ").push_bind(template_id);
    }
    if let Some(destinatario) = &filtro.destinatario {
        qb.push(" AND destinatario ILIKE ")
            .push_bind(format!("%{}%", destinatario));
    }
}
