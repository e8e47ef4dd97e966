use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::paginacao::{ParamsPaginacao, ParamsPeriodo},
    models::contribuicao::ContribuicaoDetalhada,
    models::nota_fiscal::{
        AtualizarNotaFiscal, FiltroNotaFiscal, NotaFiscal, NotaFiscalDetalhada, NotasPorMes,
    },
};

const COLUNAS_ORDENACAO: &[(&str, &str)] = &[
    ("numero", "numero"),
    ("dataEmissao", "data_emissao"),
    ("valor", "valor"),
    ("criadoEm", "criado_em"),
];

const BASE_DETALHADA: &str = r#"
    SELECT n.*,
        COALESCE(v.nome_completo, a.nome_completo) AS pessoa_nome,
        COALESCE(v.email, a.email) AS pessoa_email,
        COALESCE(v.telefone, a.telefone) AS pessoa_telefone,
        COALESCE(v.endereco, a.endereco) AS pessoa_endereco,
        CASE WHEN c.voluntario_id IS NOT NULL THEN 'voluntario' ELSE 'assistido' END AS tipo_pessoa,
        c.data_vencimento,
        c.data_pagamento,
        c.forma_pagamento
    FROM notas_fiscais n
    JOIN contribuicoes c ON c.id = n.contribuicao_id
    LEFT JOIN voluntarios v ON v.id = c.voluntario_id
    LEFT JOIN assistidos a ON a.id = c.assistido_id
    WHERE 1=1
"#;

#[derive(Clone)]
pub struct NotaFiscalRepository {
    pool: PgPool,
}

impl NotaFiscalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Último número emitido. Lido dentro da transação de emissão.
    pub async fn ultimo_numero<'e, E>(&self, executor: E) -> Result<Option<String>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        Ok(sqlx::query_scalar(
            "SELECT numero FROM notas_fiscais ORDER BY numero DESC LIMIT 1",
        )
        .fetch_optional(executor)
        .await?)
    }

    /// Inserção crua: devolve o erro sqlx sem mapear, para o serviço poder
    /// distinguir a violação de unicidade do número (retentável) da
    /// violação do vínculo 1:1 com a contribuição.
    pub async fn inserir<'e, E>(
        &self,
        executor: E,
        numero: &str,
        contribuicao_id: Uuid,
        valor: Decimal,
        observacoes: Option<&str>,
    ) -> Result<NotaFiscal, sqlx::Error>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, NotaFiscal>(
            r#"
            INSERT INTO notas_fiscais (numero, contribuicao_id, valor, observacoes)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(numero)
        .bind(contribuicao_id)
        .bind(valor)
        .bind(observacoes)
        .fetch_one(executor)
        .await
    }

    pub async fn buscar_por_id(&self, id: Uuid) -> Result<Option<NotaFiscal>, AppError> {
        Ok(
            sqlx::query_as::<_, NotaFiscal>("SELECT * FROM notas_fiscais WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    pub async fn buscar_detalhada_por_id(
        &self,
        id: Uuid,
    ) -> Result<Option<NotaFiscalDetalhada>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(BASE_DETALHADA);
        qb.push(" AND n.id = ").push_bind(id);
        Ok(qb
            .build_query_as::<NotaFiscalDetalhada>()
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn buscar_por_numero(
        &self,
        numero: &str,
    ) -> Result<Option<NotaFiscalDetalhada>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(BASE_DETALHADA);
        qb.push(" AND n.numero = ").push_bind(numero.to_string());
        Ok(qb
            .build_query_as::<NotaFiscalDetalhada>()
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn existe_para_contribuicao(&self, contribuicao_id: Uuid) -> Result<bool, AppError> {
        let existe: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM notas_fiscais WHERE contribuicao_id = $1)",
        )
        .bind(contribuicao_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(existe)
    }

    pub async fn listar(
        &self,
        filtro: &FiltroNotaFiscal,
        periodo: &ParamsPeriodo,
        paginacao: &ParamsPaginacao,
    ) -> Result<(Vec<NotaFiscalDetalhada>, i64), AppError> {
        let (_, limit, offset) = paginacao.normalizar();

        let total: i64 = {
            let mut qb =
                QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM notas_fiscais n WHERE 1=1");
            aplicar_filtros(&mut qb, filtro, periodo);
            qb.build_query_scalar().fetch_one(&self.pool).await?
        };

        let mut qb = QueryBuilder::<Postgres>::new(BASE_DETALHADA);
        aplicar_filtros(&mut qb, filtro, periodo);
        let coluna = paginacao.coluna_ordenacao(COLUNAS_ORDENACAO, "data_emissao");
        qb.push(format!(" ORDER BY n.{} {}", coluna, paginacao.direcao().sql()));
        qb.push(" LIMIT ").push_bind(limit);
        qb.push(" OFFSET ").push_bind(offset);

        let notas = qb
            .build_query_as::<NotaFiscalDetalhada>()
            .fetch_all(&self.pool)
            .await?;

        Ok((notas, total))
    }

    pub async fn atualizar(
        &self,
        id: Uuid,
        dados: &AtualizarNotaFiscal,
    ) -> Result<NotaFiscal, AppError> {
        let mut qb =
            QueryBuilder::<Postgres>::new("UPDATE notas_fiscais SET atualizado_em = now()");
        if let Some(status) = dados.status {
            qb.push(", status = ").push_bind(status);
        }
        if let Some(observacoes) = &dados.observacoes {
            qb.push(", observacoes = ").push_bind(observacoes.clone());
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" RETURNING *");

        Ok(qb
            .build_query_as::<NotaFiscal>()
            .fetch_one(&self.pool)
            .await?)
    }

    pub async fn cancelar(&self, id: Uuid, observacoes: &str) -> Result<NotaFiscal, AppError> {
        Ok(sqlx::query_as::<_, NotaFiscal>(
            r#"
            UPDATE notas_fiscais
            SET status = 'cancelada', observacoes = $2, atualizado_em = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(observacoes)
        .fetch_one(&self.pool)
        .await?)
    }

    pub async fn registrar_arquivo(&self, id: Uuid, arquivo: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE notas_fiscais SET arquivo = $2, atualizado_em = now() WHERE id = $1")
            .bind(id)
            .bind(arquivo)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn contagens(
        &self,
        periodo: &ParamsPeriodo,
    ) -> Result<(i64, i64, i64, Decimal), AppError> {
        let (total, emitidas, canceladas, valor): (i64, i64, i64, Option<Decimal>) =
            sqlx::query_as(
                r#"
                SELECT COUNT(*),
                       COUNT(*) FILTER (WHERE status = 'emitida'),
                       COUNT(*) FILTER (WHERE status = 'cancelada'),
                       SUM(valor) FILTER (WHERE status = 'emitida')
                FROM notas_fiscais
                WHERE ($1::date IS NULL OR data_emissao::date >= $1)
                  AND ($2::date IS NULL OR data_emissao::date <= $2)
                "#,
            )
            .bind(periodo.start_date)
            .bind(periodo.end_date)
            .fetch_one(&self.pool)
            .await?;

        Ok((total, emitidas, canceladas, valor.unwrap_or(Decimal::ZERO)))
    }

    /// Série mensal ordenada de quantidade e valor emitidos.
    pub async fn notas_por_mes(
        &self,
        periodo: &ParamsPeriodo,
    ) -> Result<Vec<NotasPorMes>, AppError> {
        Ok(sqlx::query_as::<_, NotasPorMes>(
            r#"
            SELECT to_char(data_emissao, 'YYYY-MM') AS mes,
                   COUNT(*) AS quantidade,
                   COALESCE(SUM(valor), 0) AS valor
            FROM notas_fiscais
            WHERE ($1::date IS NULL OR data_emissao::date >= $1)
              AND ($2::date IS NULL OR data_emissao::date <= $2)
            GROUP BY 1
            ORDER BY 1 ASC
            "#,
        )
        .bind(periodo.start_date)
        .bind(periodo.end_date)
        .fetch_all(&self.pool)
        .await?)
    }

    /// Contribuições pagas que ainda não têm nota fiscal.
    pub async fn contribuicoes_sem_nota(&self) -> Result<Vec<ContribuicaoDetalhada>, AppError> {
        Ok(sqlx::query_as::<_, ContribuicaoDetalhada>(
            r#"
            SELECT c.*,
                COALESCE(v.nome_completo, a.nome_completo) AS pessoa_nome,
                COALESCE(v.email, a.email) AS pessoa_email,
                COALESCE(v.telefone, a.telefone) AS pessoa_telefone,
                CASE WHEN c.voluntario_id IS NOT NULL THEN 'voluntario' ELSE 'assistido' END AS tipo_pessoa
            FROM contribuicoes c
            LEFT JOIN voluntarios v ON v.id = c.voluntario_id
            LEFT JOIN assistidos a ON a.id = c.assistido_id
            WHERE c.status = 'pago'
              AND NOT EXISTS (SELECT 1 FROM notas_fiscais n WHERE n.contribuicao_id = c.id)
            ORDER BY c.data_pagamento DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }
}

fn aplicar_filtros(
    qb: &mut QueryBuilder<'_, Postgres>,
    filtro: &FiltroNotaFiscal,
    periodo: &ParamsPeriodo,
) {
    if let Some(status) = filtro.status {
        qb.push(" AND n.status = ").push_bind(status);
    }
    if let Some(numero) = &filtro.numero_nota {
        qb.push(" AND n.numero ILIKE ").push_bind(format!("%{}%", numero));
    }
    if let Some(id) = filtro.contribuicao_id {
        qb.push(" AND n.contribuicao_id = ").push_bind(id);
    }
    if let Some(inicio) = periodo.start_date {
        qb.push(" AND n.data_emissao::date >= ").push_bind(inicio);
    }
    if let Some(fim) = periodo.end_date {
        qb.push(" AND n.data_emissao::date <= ").push_bind(fim);
    }
}
