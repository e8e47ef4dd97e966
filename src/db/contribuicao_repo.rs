use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::paginacao::{ParamsPaginacao, ParamsPeriodo},
    models::contribuicao::{
        AtualizarContribuicao, Contribuicao, ContribuicaoDetalhada, CriarContribuicao,
        DadosPagamento, FiltroContribuicao, StatusContribuicao,
    },
};

const COLUNAS_ORDENACAO: &[(&str, &str)] = &[
    ("dataVencimento", "data_vencimento"),
    ("dataPagamento", "data_pagamento"),
    ("valor", "valor"),
    ("criadoEm", "criado_em"),
];

const BASE_DETALHADA: &str = r#"
    SELECT c.*,
        COALESCE(v.nome_completo, a.nome_completo) AS pessoa_nome,
        COALESCE(v.email, a.email) AS pessoa_email,
        COALESCE(v.telefone, a.telefone) AS pessoa_telefone,
        CASE WHEN c.voluntario_id IS NOT NULL THEN 'voluntario' ELSE 'assistido' END AS tipo_pessoa
    FROM contribuicoes c
    LEFT JOIN voluntarios v ON v.id = c.voluntario_id
    LEFT JOIN assistidos a ON a.id = c.assistido_id
    WHERE 1=1
"#;

const BASE_CONTAGEM: &str = r#"
    SELECT COUNT(*)
    FROM contribuicoes c
    LEFT JOIN voluntarios v ON v.id = c.voluntario_id
    LEFT JOIN assistidos a ON a.id = c.assistido_id
    WHERE 1=1
"#;

#[derive(Clone)]
pub struct ContribuicaoRepository {
    pool: PgPool,
}

impl ContribuicaoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn criar(&self, dados: &CriarContribuicao) -> Result<Contribuicao, AppError> {
        Ok(sqlx::query_as::<_, Contribuicao>(
            r#"
            INSERT INTO contribuicoes
                (voluntario_id, assistido_id, valor, data_vencimento,
                 data_pagamento, forma_pagamento, observacoes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(dados.voluntario_id)
        .bind(dados.assistido_id)
        .bind(dados.valor)
        .bind(dados.data_vencimento)
        .bind(dados.data_pagamento)
        .bind(dados.forma_pagamento)
        .bind(&dados.observacoes)
        .fetch_one(&self.pool)
        .await?)
    }

    /// Criação usada pela geração mensal: sempre nasce `pendente`.
    pub async fn criar_pendente_para_assistido(
        &self,
        assistido_id: Uuid,
        valor: Decimal,
        data_vencimento: NaiveDate,
    ) -> Result<Contribuicao, AppError> {
        Ok(sqlx::query_as::<_, Contribuicao>(
            r#"
            INSERT INTO contribuicoes (assistido_id, valor, data_vencimento)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(assistido_id)
        .bind(valor)
        .bind(data_vencimento)
        .fetch_one(&self.pool)
        .await?)
    }

    pub async fn buscar_por_id(&self, id: Uuid) -> Result<Option<Contribuicao>, AppError> {
        Ok(
            sqlx::query_as::<_, Contribuicao>("SELECT * FROM contribuicoes WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    pub async fn buscar_detalhada_por_id(
        &self,
        id: Uuid,
    ) -> Result<Option<ContribuicaoDetalhada>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(BASE_DETALHADA);
        qb.push(" AND c.id = ").push_bind(id);
        Ok(qb
            .build_query_as::<ContribuicaoDetalhada>()
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn listar(
        &self,
        filtro: &FiltroContribuicao,
        periodo: &ParamsPeriodo,
        paginacao: &ParamsPaginacao,
    ) -> Result<(Vec<ContribuicaoDetalhada>, i64), AppError> {
        let (_, limit, offset) = paginacao.normalizar();

        let total: i64 = {
            let mut qb = QueryBuilder::<Postgres>::new(BASE_CONTAGEM);
            aplicar_filtros(&mut qb, filtro, periodo);
            qb.build_query_scalar().fetch_one(&self.pool).await?
        };

        let mut qb = QueryBuilder::<Postgres>::new(BASE_DETALHADA);
        aplicar_filtros(&mut qb, filtro, periodo);
        let coluna = paginacao.coluna_ordenacao(COLUNAS_ORDENACAO, "data_vencimento");
        qb.push(format!(" ORDER BY c.{} {}", coluna, paginacao.direcao().sql()));
        qb.push(" LIMIT ").push_bind(limit);
        qb.push(" OFFSET ").push_bind(offset);

        let contribuicoes = qb
            .build_query_as::<ContribuicaoDetalhada>()
            .fetch_all(&self.pool)
            .await?;

        Ok((contribuicoes, total))
    }

    pub async fn listar_pendentes(
        &self,
        periodo: &ParamsPeriodo,
    ) -> Result<Vec<ContribuicaoDetalhada>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(BASE_DETALHADA);
        qb.push(" AND c.status = 'pendente'");
        if let Some(inicio) = periodo.start_date {
            qb.push(" AND c.data_vencimento >= ").push_bind(inicio);
        }
        if let Some(fim) = periodo.end_date {
            qb.push(" AND c.data_vencimento <= ").push_bind(fim);
        }
        qb.push(" ORDER BY c.data_vencimento ASC");
        Ok(qb
            .build_query_as::<ContribuicaoDetalhada>()
            .fetch_all(&self.pool)
            .await?)
    }

    /// Contribuições vencidas e não pagas: as já marcadas como `atrasado`
    /// e as `pendente` cujo vencimento já passou (fim do dia corrente).
    pub async fn listar_atrasadas(&self) -> Result<Vec<ContribuicaoDetalhada>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(BASE_DETALHADA);
        qb.push(
            r#" AND (c.status = 'atrasado'
                 OR (c.status = 'pendente' AND c.data_vencimento <= CURRENT_DATE))
            ORDER BY c.data_vencimento ASC"#,
        );
        Ok(qb
            .build_query_as::<ContribuicaoDetalhada>()
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn listar_por_mes(
        &self,
        inicio: NaiveDate,
        fim: NaiveDate,
    ) -> Result<Vec<ContribuicaoDetalhada>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(BASE_DETALHADA);
        qb.push(" AND c.data_vencimento >= ").push_bind(inicio);
        qb.push(" AND c.data_vencimento <= ").push_bind(fim);
        qb.push(" ORDER BY c.data_vencimento ASC");
        Ok(qb
            .build_query_as::<ContribuicaoDetalhada>()
            .fetch_all(&self.pool)
            .await?)
    }

    /// Listagem sem paginação para os relatórios.
    pub async fn listar_para_relatorio(
        &self,
        status: Option<StatusContribuicao>,
        tipo_pessoa: Option<&str>,
        periodo: &ParamsPeriodo,
    ) -> Result<Vec<ContribuicaoDetalhada>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(BASE_DETALHADA);
        if let Some(status) = status {
            qb.push(" AND c.status = ").push_bind(status);
        }
        match tipo_pessoa {
            Some("voluntario") => {
                qb.push(" AND c.voluntario_id IS NOT NULL");
            }
            Some("assistido") => {
                qb.push(" AND c.assistido_id IS NOT NULL");
            }
            _ => {}
        }
        if let Some(inicio) = periodo.start_date {
            qb.push(" AND c.data_vencimento >= ").push_bind(inicio);
        }
        if let Some(fim) = periodo.end_date {
            qb.push(" AND c.data_vencimento <= ").push_bind(fim);
        }
        qb.push(" ORDER BY c.data_vencimento DESC");
        Ok(qb
            .build_query_as::<ContribuicaoDetalhada>()
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn atualizar(
        &self,
        id: Uuid,
        dados: &AtualizarContribuicao,
    ) -> Result<Contribuicao, AppError> {
        let mut qb =
            QueryBuilder::<Postgres>::new("UPDATE contribuicoes SET atualizado_em = now()");
        if let Some(valor) = dados.valor {
            qb.push(", valor = ").push_bind(valor);
        }
        if let Some(data) = dados.data_vencimento {
            qb.push(", data_vencimento = ").push_bind(data);
        }
        if let Some(data) = dados.data_pagamento {
            qb.push(", data_pagamento = ").push_bind(data);
        }
        if let Some(status) = dados.status {
            qb.push(", status = ").push_bind(status);
        }
        if let Some(forma) = dados.forma_pagamento {
            qb.push(", forma_pagamento = ").push_bind(forma);
        }
        if let Some(observacoes) = &dados.observacoes {
            qb.push(", observacoes = ").push_bind(observacoes.clone());
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" RETURNING *");

        Ok(qb
            .build_query_as::<Contribuicao>()
            .fetch_one(&self.pool)
            .await?)
    }

    /// Liquidação da contribuição. Participa da transação do serviço junto
    /// com o lançamento da movimentação.
    pub async fn registrar_pagamento<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        dados: &DadosPagamento,
    ) -> Result<Contribuicao, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        Ok(sqlx::query_as::<_, Contribuicao>(
            r#"
            UPDATE contribuicoes
            SET status = 'pago',
                data_pagamento = $2,
                forma_pagamento = $3,
                comprovante = COALESCE($4, comprovante),
                observacoes = COALESCE($5, observacoes),
                atualizado_em = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(dados.data_pagamento)
        .bind(dados.forma_pagamento)
        .bind(&dados.comprovante)
        .bind(&dados.observacoes)
        .fetch_one(executor)
        .await?)
    }

    /// Marca como atrasadas as pendentes já vencidas. Idempotente:
    /// rodar duas vezes não altera mais nada.
    pub async fn marcar_atrasadas(&self) -> Result<u64, AppError> {
        let resultado = sqlx::query(
            r#"
            UPDATE contribuicoes
            SET status = 'atrasado', atualizado_em = now()
            WHERE status = 'pendente' AND data_vencimento <= CURRENT_DATE
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(resultado.rows_affected())
    }

    /// Já existe contribuição do assistido com vencimento dentro do mês?
    pub async fn existe_no_mes(
        &self,
        assistido_id: Uuid,
        inicio: NaiveDate,
        fim_exclusivo: NaiveDate,
    ) -> Result<bool, AppError> {
        let existe: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM contribuicoes
                WHERE assistido_id = $1
                  AND data_vencimento >= $2
                  AND data_vencimento < $3
            )
            "#,
        )
        .bind(assistido_id)
        .bind(inicio)
        .bind(fim_exclusivo)
        .fetch_one(&self.pool)
        .await?;
        Ok(existe)
    }

    pub async fn contar_ativas_por_voluntario(&self, id: Uuid) -> Result<i64, AppError> {
        Ok(sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM contribuicoes
            WHERE voluntario_id = $1 AND status IN ('pendente', 'pago')
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?)
    }

    pub async fn excluir(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM contribuicoes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Contagens e somas por status para as estatísticas.
    pub async fn contagens(
        &self,
        periodo: &ParamsPeriodo,
    ) -> Result<(i64, i64, i64, i64, i64, Decimal, Decimal), AppError> {
        let (total, pendentes, pagas, atrasadas, canceladas, pago, pendente): (
            i64,
            i64,
            i64,
            i64,
            i64,
            Option<Decimal>,
            Option<Decimal>,
        ) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE status = 'pendente'),
                   COUNT(*) FILTER (WHERE status = 'pago'),
                   COUNT(*) FILTER (WHERE status = 'atrasado'),
                   COUNT(*) FILTER (WHERE status = 'cancelado'),
                   SUM(valor) FILTER (WHERE status = 'pago'),
                   SUM(valor) FILTER (WHERE status IN ('pendente', 'atrasado'))
            FROM contribuicoes
            WHERE ($1::date IS NULL OR data_vencimento >= $1)
              AND ($2::date IS NULL OR data_vencimento <= $2)
            "#,
        )
        .bind(periodo.start_date)
        .bind(periodo.end_date)
        .fetch_one(&self.pool)
        .await?;

        Ok((
            total,
            pendentes,
            pagas,
            atrasadas,
            canceladas,
            pago.unwrap_or(Decimal::ZERO),
            pendente.unwrap_or(Decimal::ZERO),
        ))
    }
}

fn aplicar_filtros(
    qb: &mut QueryBuilder<'_, Postgres>,
    filtro: &FiltroContribuicao,
    periodo: &ParamsPeriodo,
) {
    if let Some(status) = filtro.status {
        qb.push(" AND c.status = ").push_bind(status);
    }
    if let Some(id) = filtro.voluntario_id {
        qb.push(" AND c.voluntario_id = ").push_bind(id);
    }
    if let Some(id) = filtro.assistido_id {
        qb.push(" AND c.assistido_id = ").push_bind(id);
    }
    if let Some(search) = &filtro.search {
        let padrao = format!("%{}%", search);
        qb.push(" AND (v.nome_completo ILIKE ")
            .push_bind(padrao.clone())
            .push(" OR a.nome_completo ILIKE ")
            .push_bind(padrao.clone())
            .push(" OR c.forma_pagamento::text ILIKE ")
            .push_bind(padrao)
            .push(")");
    }
    if let Some(valor_min) = filtro.valor_min {
        qb.push(" AND c.valor >= ").push_bind(valor_min);
    }
    if let Some(valor_max) = filtro.valor_max {
        qb.push(" AND c.valor <= ").push_bind(valor_max);
    }
    if let Some(inicio) = periodo.start_date {
        qb.push(" AND c.data_vencimento >= ").push_bind(inicio);
    }
    if let Some(fim) = periodo.end_date {
        qb.push(" AND c.data_vencimento <= ").push_bind(fim);
    }
}
