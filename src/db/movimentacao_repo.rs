use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::paginacao::{ParamsPaginacao, ParamsPeriodo},
    models::movimentacao::{
        AtualizarMovimentacao, CriarMovimentacao, FiltroMovimentacao, LadoResumo, Movimentacao,
        ResumoCategoria, ResumoConta, TipoMovimentacao,
    },
    models::relatorio::TotalMensal,
};

const COLUNAS_ORDENACAO: &[(&str, &str)] = &[
    ("data", "data"),
    ("valor", "valor"),
    ("categoria", "categoria"),
    ("conta", "conta"),
    ("criadoEm", "criado_em"),
];

#[derive(Clone)]
pub struct MovimentacaoRepository {
    pool: PgPool,
}

impl MovimentacaoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserção avulsa (fora de transação).
    pub async fn criar(&self, dados: &CriarMovimentacao) -> Result<Movimentacao, AppError> {
        self.criar_com(&self.pool, dados).await
    }

    /// Inserção que participa de uma transação do chamador — usada pelo
    /// pagamento de contribuição para lançar a entrada atomicamente.
    pub async fn criar_com<'e, E>(
        &self,
        executor: E,
        dados: &CriarMovimentacao,
    ) -> Result<Movimentacao, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        Ok(sqlx::query_as::<_, Movimentacao>(
            r#"
            INSERT INTO movimentacoes
                (data, descricao, valor, tipo, categoria, conta,
                 centro_de_custo, favorecido_pagador, contribuicao_id, observacoes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(dados.data)
        .bind(&dados.descricao)
        .bind(dados.valor)
        .bind(dados.tipo)
        .bind(&dados.categoria)
        .bind(&dados.conta)
        .bind(&dados.centro_de_custo)
        .bind(&dados.favorecido_pagador)
        .bind(dados.contribuicao_id)
        .bind(&dados.observacoes)
        .fetch_one(executor)
        .await?)
    }

    pub async fn buscar_por_id(&self, id: Uuid) -> Result<Option<Movimentacao>, AppError> {
        Ok(
            sqlx::query_as::<_, Movimentacao>("SELECT * FROM movimentacoes WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    pub async fn listar(
        &self,
        filtro: &FiltroMovimentacao,
        periodo: &ParamsPeriodo,
        paginacao: &ParamsPaginacao,
    ) -> Result<(Vec<Movimentacao>, i64), AppError> {
        let (_, limit, offset) = paginacao.normalizar();

        let total: i64 = {
            let mut qb =
                QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM movimentacoes WHERE 1=1");
            aplicar_filtros(&mut qb, filtro, periodo);
            qb.build_query_scalar().fetch_one(&self.pool).await?
        };

        let mut qb =
            QueryBuilder::<Postgres>::new("SELECT * FROM movimentacoes WHERE 1=1");
        aplicar_filtros(&mut qb, filtro, periodo);
        let coluna = paginacao.coluna_ordenacao(COLUNAS_ORDENACAO, "data");
        qb.push(format!(" ORDER BY {} {}", coluna, paginacao.direcao().sql()));
        qb.push(" LIMIT ").push_bind(limit);
        qb.push(" OFFSET ").push_bind(offset);

        let movimentacoes = qb
            .build_query_as::<Movimentacao>()
            .fetch_all(&self.pool)
            .await?;

        Ok((movimentacoes, total))
    }

    /// Listagem sem paginação para relatórios de receitas/despesas.
    pub async fn listar_por_tipo(
        &self,
        tipo: TipoMovimentacao,
        categoria: Option<&str>,
        conta: Option<&str>,
        periodo: &ParamsPeriodo,
    ) -> Result<Vec<Movimentacao>, AppError> {
        let mut qb =
            QueryBuilder::<Postgres>::new("SELECT * FROM movimentacoes WHERE tipo = ");
        qb.push_bind(tipo);
        if let Some(categoria) = categoria {
            qb.push(" AND categoria = ").push_bind(categoria.to_string());
        }
        if let Some(conta) = conta {
            qb.push(" AND conta = ").push_bind(conta.to_string());
        }
        if let Some(inicio) = periodo.start_date {
            qb.push(" AND data >= ").push_bind(inicio);
        }
        if let Some(fim) = periodo.end_date {
            qb.push(" AND data <= ").push_bind(fim);
        }
        qb.push(" ORDER BY data DESC");
        Ok(qb
            .build_query_as::<Movimentacao>()
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn atualizar(
        &self,
        id: Uuid,
        dados: &AtualizarMovimentacao,
    ) -> Result<Movimentacao, AppError> {
        let mut qb =
            QueryBuilder::<Postgres>::new("UPDATE movimentacoes SET atualizado_em = now()");
        if let Some(data) = dados.data {
            qb.push(", data = ").push_bind(data);
        }
        if let Some(descricao) = &dados.descricao {
            qb.push(", descricao = ").push_bind(descricao.clone());
        }
        if let Some(valor) = dados.valor {
            qb.push(", valor = ").push_bind(valor);
        }
        if let Some(tipo) = dados.tipo {
            qb.push(", tipo = ").push_bind(tipo);
        }
        if let Some(categoria) = &dados.categoria {
            qb.push(", categoria = ").push_bind(categoria.clone());
        }
        if let Some(conta) = &dados.conta {
            qb.push(", conta = ").push_bind(conta.clone());
        }
        if let Some(centro) = &dados.centro_de_custo {
            qb.push(", centro_de_custo = ").push_bind(centro.clone());
        }
        if let Some(favorecido) = &dados.favorecido_pagador {
            qb.push(", favorecido_pagador = ").push_bind(favorecido.clone());
        }
        if let Some(contribuicao_id) = dados.contribuicao_id {
            qb.push(", contribuicao_id = ").push_bind(contribuicao_id);
        }
        if let Some(observacoes) = &dados.observacoes {
            qb.push(", observacoes = ").push_bind(observacoes.clone());
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" RETURNING *");

        Ok(qb
            .build_query_as::<Movimentacao>()
            .fetch_one(&self.pool)
            .await?)
    }

    pub async fn excluir(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM movimentacoes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Totais de um tipo (entrada ou saída) no período/conta.
    pub async fn totais_por_tipo(
        &self,
        tipo: TipoMovimentacao,
        conta: Option<&str>,
        periodo: &ParamsPeriodo,
    ) -> Result<LadoResumo, AppError> {
        let (total, quantidade): (Option<Decimal>, i64) = sqlx::query_as(
            r#"
            SELECT SUM(valor), COUNT(*)
            FROM movimentacoes
            WHERE tipo = $1
              AND ($2::text IS NULL OR conta = $2)
              AND ($3::date IS NULL OR data >= $3)
              AND ($4::date IS NULL OR data <= $4)
            "#,
        )
        .bind(tipo)
        .bind(conta)
        .bind(periodo.start_date)
        .bind(periodo.end_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(LadoResumo {
            total: total.unwrap_or(Decimal::ZERO),
            quantidade,
        })
    }

    pub async fn relatorio_por_categoria(
        &self,
        tipo: Option<TipoMovimentacao>,
        periodo: &ParamsPeriodo,
    ) -> Result<Vec<ResumoCategoria>, AppError> {
        Ok(sqlx::query_as::<_, ResumoCategoria>(
            r#"
            SELECT categoria,
                   COALESCE(SUM(valor) FILTER (WHERE tipo = 'entrada'), 0) AS entradas,
                   COALESCE(SUM(valor) FILTER (WHERE tipo = 'saida'), 0) AS saidas,
                   COALESCE(SUM(valor) FILTER (WHERE tipo = 'entrada'), 0)
                       - COALESCE(SUM(valor) FILTER (WHERE tipo = 'saida'), 0) AS total
            FROM movimentacoes
            WHERE ($1::tipo_movimentacao IS NULL OR tipo = $1)
              AND ($2::date IS NULL OR data >= $2)
              AND ($3::date IS NULL OR data <= $3)
            GROUP BY categoria
            ORDER BY total DESC
            "#,
        )
        .bind(tipo)
        .bind(periodo.start_date)
        .bind(periodo.end_date)
        .fetch_all(&self.pool)
        .await?)
    }

    pub async fn relatorio_por_conta(
        &self,
        periodo: &ParamsPeriodo,
    ) -> Result<Vec<ResumoConta>, AppError> {
        Ok(sqlx::query_as::<_, ResumoConta>(
            r#"
            SELECT conta,
                   COALESCE(SUM(valor) FILTER (WHERE tipo = 'entrada'), 0) AS entradas,
                   COALESCE(SUM(valor) FILTER (WHERE tipo = 'saida'), 0) AS saidas,
                   COALESCE(SUM(valor) FILTER (WHERE tipo = 'entrada'), 0)
                       - COALESCE(SUM(valor) FILTER (WHERE tipo = 'saida'), 0) AS saldo
            FROM movimentacoes
            WHERE ($1::date IS NULL OR data >= $1)
              AND ($2::date IS NULL OR data <= $2)
            GROUP BY conta
            ORDER BY saldo DESC
            "#,
        )
        .bind(periodo.start_date)
        .bind(periodo.end_date)
        .fetch_all(&self.pool)
        .await?)
    }

    pub async fn categorias(&self) -> Result<Vec<String>, AppError> {
        Ok(sqlx::query_scalar(
            "SELECT DISTINCT categoria FROM movimentacoes ORDER BY categoria ASC",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    pub async fn contas(&self) -> Result<Vec<String>, AppError> {
        Ok(
            sqlx::query_scalar("SELECT DISTINCT conta FROM movimentacoes ORDER BY conta ASC")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    pub async fn contar(&self, periodo: &ParamsPeriodo) -> Result<i64, AppError> {
        Ok(sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM movimentacoes
            WHERE ($1::date IS NULL OR data >= $1)
              AND ($2::date IS NULL OR data <= $2)
            "#,
        )
        .bind(periodo.start_date)
        .bind(periodo.end_date)
        .fetch_one(&self.pool)
        .await?)
    }

    pub async fn recentes(
        &self,
        periodo: &ParamsPeriodo,
        quantidade: i64,
    ) -> Result<Vec<Movimentacao>, AppError> {
        Ok(sqlx::query_as::<_, Movimentacao>(
            r#"
            SELECT * FROM movimentacoes
            WHERE ($1::date IS NULL OR data >= $1)
              AND ($2::date IS NULL OR data <= $2)
            ORDER BY data DESC
            LIMIT $3
            "#,
        )
        .bind(periodo.start_date)
        .bind(periodo.end_date)
        .bind(quantidade)
        .fetch_all(&self.pool)
        .await?)
    }

    /// Soma mensal ("YYYY-MM") de um tipo a partir de uma data — base da
    /// projeção financeira.
    pub async fn totais_mensais(
        &self,
        tipo: TipoMovimentacao,
        desde: NaiveDate,
    ) -> Result<Vec<TotalMensal>, AppError> {
        Ok(sqlx::query_as::<_, TotalMensal>(
            r#"
            SELECT to_char(data, 'YYYY-MM') AS mes, COALESCE(SUM(valor), 0) AS total
            FROM movimentacoes
            WHERE tipo = $1 AND data >= $2
            GROUP BY 1
            ORDER BY 1 ASC
            "#,
        )
        .bind(tipo)
        .bind(desde)
        .fetch_all(&self.pool)
        .await?)
    }

    /// Total + quantidade de um tipo por mês do ano, para o comparativo.
    pub async fn totais_por_mes_do_ano(
        &self,
        tipo: TipoMovimentacao,
        ano: i32,
    ) -> Result<Vec<(i32, Decimal, i64)>, AppError> {
        let linhas: Vec<(i32, Decimal, i64)> = sqlx::query_as(
            r#"
            SELECT EXTRACT(MONTH FROM data)::int AS mes,
                   COALESCE(SUM(valor), 0) AS total,
                   COUNT(*) AS quantidade
            FROM movimentacoes
            WHERE tipo = $1 AND EXTRACT(YEAR FROM data)::int = $2
            GROUP BY 1
            ORDER BY 1 ASC
            "#,
        )
        .bind(tipo)
        .bind(ano)
        .fetch_all(&self.pool)
        .await?;
        Ok(linhas)
    }
}

fn aplicar_filtros(
    qb: &mut QueryBuilder<'_, Postgres>,
    filtro: &FiltroMovimentacao,
    periodo: &ParamsPeriodo,
) {
    if let Some(tipo) = filtro.tipo {
        qb.push(" AND tipo = ").push_bind(tipo);
    }
    if let Some(categoria) = &filtro.categoria {
        qb.push(" AND categoria = ").push_bind(categoria.clone());
    }
    if let Some(conta) = &filtro.conta {
        qb.push(" AND conta = ").push_bind(conta.clone());
    }
    if let Some(search) = &filtro.search {
        let padrao = format!("%{}%", search);
        qb.push(" AND (descricao ILIKE ")
            .push_bind(padrao.clone())
            .push(" OR favorecido_pagador ILIKE ")
            .push_bind(padrao.clone())
            .push(" OR categoria ILIKE ")
            .push_bind(padrao.clone())
            .push(" OR conta ILIKE ")
            .push_bind(padrao)
            .push(")");
    }
    if let Some(valor_min) = filtro.valor_min {
        qb.push(" AND valor >= ").push_bind(valor_min);
    }
    if let Some(valor_max) = filtro.valor_max {
        qb.push(" AND valor <= ").push_bind(valor_max);
    }
    if let Some(inicio) = periodo.start_date {
        qb.push(" AND data >= ").push_bind(inicio);
    }
    if let Some(fim) = periodo.end_date {
        qb.push(" AND data <= ").push_bind(fim);
    }
}
