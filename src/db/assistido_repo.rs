use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::paginacao::ParamsPaginacao,
    models::assistido::{
        Assistido, AssistidoComSede, AtualizarAssistido, CriarAssistido, EstatisticasAssistidos,
        FiltroAssistido,
    },
    models::voluntario::StatusPessoa,
};

const COLUNAS_ORDENACAO: &[(&str, &str)] = &[
    ("nomeCompleto", "nome_completo"),
    ("email", "email"),
    ("dataIngresso", "data_ingresso"),
    ("valorMensal", "valor_mensal"),
    ("criadoEm", "criado_em"),
];

const BASE_COM_SEDE: &str = r#"
    SELECT a.*, s.nome AS sede_nome
    FROM assistidos a
    JOIN sedes s ON s.id = a.sede_id
    WHERE 1=1
"#;

#[derive(Clone)]
pub struct AssistidoRepository {
    pool: PgPool,
}

impl AssistidoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn criar(&self, dados: &CriarAssistido) -> Result<Assistido, AppError> {
        let assistido = sqlx::query_as::<_, Assistido>(
            r#"
            INSERT INTO assistidos
                (nome_completo, cpf, telefone, email, endereco, data_ingresso,
                 valor_mensal, dia_vencimento, observacoes, sede_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&dados.nome_completo)
        .bind(&dados.cpf)
        .bind(&dados.telefone)
        .bind(&dados.email)
        .bind(&dados.endereco)
        .bind(dados.data_ingresso)
        .bind(dados.valor_mensal)
        .bind(dados.dia_vencimento)
        .bind(&dados.observacoes)
        .bind(dados.sede_id)
        .fetch_one(&self.pool)
        .await
        .map_err(mapear_unicidade)?;

        Ok(assistido)
    }

    pub async fn buscar_por_id(&self, id: Uuid) -> Result<Option<Assistido>, AppError> {
        Ok(
            sqlx::query_as::<_, Assistido>("SELECT * FROM assistidos WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    pub async fn existe_email(&self, email: &str, excluir: Option<Uuid>) -> Result<bool, AppError> {
        let existe: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM assistidos WHERE email = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(email)
        .bind(excluir)
        .fetch_one(&self.pool)
        .await?;
        Ok(existe)
    }

    pub async fn listar(
        &self,
        filtro: &FiltroAssistido,
        paginacao: &ParamsPaginacao,
    ) -> Result<(Vec<AssistidoComSede>, i64), AppError> {
        let (_, limit, offset) = paginacao.normalizar();

        let total: i64 = {
            let mut qb =
                QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM assistidos a WHERE 1=1");
            aplicar_filtros(&mut qb, filtro);
            qb.build_query_scalar().fetch_one(&self.pool).await?
        };

        let mut qb = QueryBuilder::<Postgres>::new(BASE_COM_SEDE);
        aplicar_filtros(&mut qb, filtro);
        let coluna = paginacao.coluna_ordenacao(COLUNAS_ORDENACAO, "nome_completo");
        qb.push(format!(" ORDER BY a.{} {}", coluna, paginacao.direcao().sql()));
        qb.push(" LIMIT ").push_bind(limit);
        qb.push(" OFFSET ").push_bind(offset);

        let assistidos = qb
            .build_query_as::<AssistidoComSede>()
            .fetch_all(&self.pool)
            .await?;

        Ok((assistidos, total))
    }

    /// Assistidos ativos, base da geração mensal de contribuições.
    pub async fn listar_ativos(&self) -> Result<Vec<Assistido>, AppError> {
        Ok(sqlx::query_as::<_, Assistido>(
            "SELECT * FROM assistidos WHERE status = 'ativo' ORDER BY nome_completo ASC",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    pub async fn soma_valor_mensal_ativos(&self) -> Result<Decimal, AppError> {
        let soma: Option<Decimal> = sqlx::query_scalar(
            "SELECT SUM(valor_mensal) FROM assistidos WHERE status = 'ativo'",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(soma.unwrap_or(Decimal::ZERO))
    }

    pub async fn atualizar(
        &self,
        id: Uuid,
        dados: &AtualizarAssistido,
    ) -> Result<Assistido, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE assistidos SET atualizado_em = now()");
        if let Some(nome) = &dados.nome_completo {
            qb.push(", nome_completo = ").push_bind(nome.clone());
        }
        if let Some(cpf) = &dados.cpf {
            qb.push(", cpf = ").push_bind(cpf.clone());
        }
        if let Some(telefone) = &dados.telefone {
            qb.push(", telefone = ").push_bind(telefone.clone());
        }
        if let Some(email) = &dados.email {
            qb.push(", email = ").push_bind(email.clone());
        }
        if let Some(endereco) = &dados.endereco {
            qb.push(", endereco = ").push_bind(endereco.clone());
        }
        if let Some(data) = dados.data_ingresso {
            qb.push(", data_ingresso = ").push_bind(data);
        }
        if let Some(valor) = dados.valor_mensal {
            qb.push(", valor_mensal = ").push_bind(valor);
        }
        if let Some(dia) = dados.dia_vencimento {
            qb.push(", dia_vencimento = ").push_bind(dia);
        }
        if let Some(observacoes) = &dados.observacoes {
            qb.push(", observacoes = ").push_bind(observacoes.clone());
        }
        if let Some(sede_id) = dados.sede_id {
            qb.push(", sede_id = ").push_bind(sede_id);
        }
        if let Some(ativo) = dados.ativo {
            qb.push(", ativo = ").push_bind(ativo);
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" RETURNING *");

        qb.build_query_as::<Assistido>()
            .fetch_one(&self.pool)
            .await
            .map_err(mapear_unicidade)
    }

    pub async fn atualizar_status(
        &self,
        id: Uuid,
        status: StatusPessoa,
    ) -> Result<Assistido, AppError> {
        Ok(sqlx::query_as::<_, Assistido>(
            r#"
            UPDATE assistidos
            SET status = $2, ativo = ($2 = 'ativo'), atualizado_em = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?)
    }

    pub async fn excluir(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM assistidos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn estatisticas(&self) -> Result<EstatisticasAssistidos, AppError> {
        let (total, ativos, inativos, suspensos, valor_mensal_total): (
            i64,
            i64,
            i64,
            i64,
            Option<Decimal>,
        ) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE status = 'ativo'),
                   COUNT(*) FILTER (WHERE status = 'inativo'),
                   COUNT(*) FILTER (WHERE status = 'suspenso'),
                   SUM(valor_mensal) FILTER (WHERE status = 'ativo')
            FROM assistidos
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(EstatisticasAssistidos {
            total,
            ativos,
            inativos,
            suspensos,
            valor_mensal_total: valor_mensal_total.unwrap_or(Decimal::ZERO),
        })
    }
}

fn aplicar_filtros(qb: &mut QueryBuilder<'_, Postgres>, filtro: &FiltroAssistido) {
    if let Some(status) = filtro.status {
        qb.push(" AND a.status = ").push_bind(status);
    }
    if let Some(search) = &filtro.search {
        let padrao = format!("%{}%", search);
        qb.push(" AND (a.nome_completo ILIKE ")
            .push_bind(padrao.clone())
            .push(" OR a.email ILIKE ")
            .push_bind(padrao.clone())
            .push(" OR a.cpf LIKE ")
            .push_bind(padrao)
            .push(")");
    }
    if let Some(sede_id) = filtro.sede_id {
        qb.push(" AND a.sede_id = ").push_bind(sede_id);
    }
    if let Some(valor_min) = filtro.valor_min {
        qb.push(" AND a.valor_mensal >= ").push_bind(valor_min);
    }
    if let Some(valor_max) = filtro.valor_max {
        qb.push(" AND a.valor_mensal <= ").push_bind(valor_max);
    }
}

fn mapear_unicidade(e: sqlx::Error) -> AppError {
    if let Some(db) = e.as_database_error() {
        if db.is_unique_violation() {
            return match db.constraint() {
                Some("assistidos_cpf_key") => AppError::Conflito("CPF já cadastrado".to_string()),
                _ => AppError::Conflito("Email já cadastrado".to_string()),
            };
        }
    }
    AppError::BancoDeDados(e)
}
