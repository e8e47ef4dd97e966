use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    common::paginacao::ParamsPeriodo,
    models::relatorio::QuebraPorChave,
};

/// Consultas agregadas que alimentam o dashboard e os comparativos.
/// Totalmente determinístico dado o conteúdo do livro-caixa.
#[derive(Clone)]
pub struct RelatorioRepository {
    pool: PgPool,
}

impl RelatorioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn quebra_por_categoria(
        &self,
        periodo: &ParamsPeriodo,
    ) -> Result<Vec<QuebraPorChave>, AppError> {
        self.quebra_por("categoria", periodo).await
    }

    pub async fn quebra_por_conta(
        &self,
        periodo: &ParamsPeriodo,
    ) -> Result<Vec<QuebraPorChave>, AppError> {
        self.quebra_por("conta", periodo).await
    }

    async fn quebra_por(
        &self,
        coluna: &str,
        periodo: &ParamsPeriodo,
    ) -> Result<Vec<QuebraPorChave>, AppError> {
        // `coluna` vem de chamadas internas com valor fixo, nunca do cliente.
        let sql = format!(
            r#"
            SELECT {coluna} AS chave,
                   COALESCE(SUM(valor) FILTER (WHERE tipo = 'entrada'), 0) AS entradas,
                   COALESCE(SUM(valor) FILTER (WHERE tipo = 'saida'), 0) AS saidas
            FROM movimentacoes
            WHERE ($1::date IS NULL OR data >= $1)
              AND ($2::date IS NULL OR data <= $2)
            GROUP BY {coluna}
            ORDER BY {coluna} ASC
            "#
        );
        Ok(sqlx::query_as::<_, QuebraPorChave>(&sql)
            .bind(periodo.start_date)
            .bind(periodo.end_date)
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn contar_voluntarios_ativos(&self) -> Result<i64, AppError> {
        Ok(
            sqlx::query_scalar("SELECT COUNT(*) FROM voluntarios WHERE status = 'ativo'")
                .fetch_one(&self.pool)
                .await?,
        )
    }

    pub async fn contar_assistidos_ativos(&self) -> Result<i64, AppError> {
        Ok(
            sqlx::query_scalar("SELECT COUNT(*) FROM assistidos WHERE status = 'ativo'")
                .fetch_one(&self.pool)
                .await?,
        )
    }

    /// Contribuições pagas por mês de um ano (valor + quantidade),
    /// agrupadas pelo vencimento.
    pub async fn contribuicoes_pagas_por_mes(
        &self,
        ano: i32,
    ) -> Result<Vec<(i32, Decimal, i64)>, AppError> {
        let linhas: Vec<(i32, Decimal, i64)> = sqlx::query_as(
            r#"
            SELECT EXTRACT(MONTH FROM data_vencimento)::int AS mes,
                   COALESCE(SUM(valor), 0) AS total,
                   COUNT(*) AS quantidade
            FROM contribuicoes
            WHERE status = 'pago' AND EXTRACT(YEAR FROM data_vencimento)::int = $1
            GROUP BY 1
            ORDER BY 1 ASC
            "#,
        )
        .bind(ano)
        .fetch_all(&self.pool)
        .await?;
        Ok(linhas)
    }
}
