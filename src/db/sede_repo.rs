use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::paginacao::ParamsPaginacao,
    db::unique_violada,
    models::relatorio::SedeStats,
    models::sede::{AtualizarSede, CriarSede, EstatisticasSedes, Sede, SedeComContadores, SedeResumida, FiltroSede},
};

const COLUNAS_ORDENACAO: &[(&str, &str)] = &[
    ("nome", "nome"),
    ("criadoEm", "criado_em"),
    ("ativo", "ativo"),
];

const BASE_COM_CONTADORES: &str = r#"
    SELECT s.*,
        (SELECT COUNT(*) FROM voluntarios v WHERE v.sede_id = s.id) AS total_voluntarios,
        (SELECT COUNT(*) FROM assistidos a WHERE a.sede_id = s.id) AS total_assistidos
    FROM sedes s
    WHERE 1=1
"#;

#[derive(Clone)]
pub struct SedeRepository {
    pool: PgPool,
}

impl SedeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn criar(&self, dados: &CriarSede) -> Result<Sede, AppError> {
        let sede = sqlx::query_as::<_, Sede>(
            r#"
            INSERT INTO sedes (nome, endereco, cidade, cep, telefone, email)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&dados.nome)
        .bind(&dados.endereco)
        .bind(&dados.cidade)
        .bind(&dados.cep)
        .bind(&dados.telefone)
        .bind(&dados.email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match unique_violada(&e) {
            true => AppError::Conflito("Já existe uma sede com este nome".to_string()),
            false => AppError::BancoDeDados(e),
        })?;

        Ok(sede)
    }

    pub async fn buscar_por_id(&self, id: Uuid) -> Result<Option<SedeComContadores>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(BASE_COM_CONTADORES);
        qb.push(" AND s.id = ").push_bind(id);
        Ok(qb
            .build_query_as::<SedeComContadores>()
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn buscar_por_nome(&self, nome: &str) -> Result<Option<Sede>, AppError> {
        Ok(sqlx::query_as::<_, Sede>("SELECT * FROM sedes WHERE nome = $1")
            .bind(nome)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn listar(
        &self,
        filtro: &FiltroSede,
        paginacao: &ParamsPaginacao,
    ) -> Result<(Vec<SedeComContadores>, i64), AppError> {
        let (_, limit, offset) = paginacao.normalizar();

        let total: i64 = {
            let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM sedes s WHERE 1=1");
            aplicar_filtros(&mut qb, filtro);
            qb.build_query_scalar().fetch_one(&self.pool).await?
        };

        let mut qb = QueryBuilder::<Postgres>::new(BASE_COM_CONTADORES);
        aplicar_filtros(&mut qb, filtro);
        let coluna = paginacao.coluna_ordenacao(COLUNAS_ORDENACAO, "nome");
        qb.push(format!(" ORDER BY s.{} {}", coluna, paginacao.direcao().sql()));
        qb.push(" LIMIT ").push_bind(limit);
        qb.push(" OFFSET ").push_bind(offset);

        let sedes = qb
            .build_query_as::<SedeComContadores>()
            .fetch_all(&self.pool)
            .await?;

        Ok((sedes, total))
    }

    pub async fn atualizar(&self, id: Uuid, dados: &AtualizarSede) -> Result<Sede, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE sedes SET atualizado_em = now()");
        if let Some(nome) = &dados.nome {
            qb.push(", nome = ").push_bind(nome.clone());
        }
        if let Some(endereco) = &dados.endereco {
            qb.push(", endereco = ").push_bind(endereco.clone());
        }
        if let Some(cidade) = &dados.cidade {
            qb.push(", cidade = ").push_bind(cidade.clone());
        }
        if let Some(cep) = &dados.cep {
            qb.push(", cep = ").push_bind(cep.clone());
        }
        if let Some(telefone) = &dados.telefone {
            qb.push(", telefone = ").push_bind(telefone.clone());
        }
        if let Some(email) = &dados.email {
            qb.push(", email = ").push_bind(email.clone());
        }
        if let Some(ativo) = dados.ativo {
            qb.push(", ativo = ").push_bind(ativo);
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" RETURNING *");

        Ok(qb.build_query_as::<Sede>().fetch_one(&self.pool).await?)
    }

    pub async fn alternar_status(&self, id: Uuid, ativo: bool) -> Result<Sede, AppError> {
        Ok(sqlx::query_as::<_, Sede>(
            "UPDATE sedes SET ativo = $2, atualizado_em = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(ativo)
        .fetch_one(&self.pool)
        .await?)
    }

    pub async fn excluir(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM sedes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn contar_dependentes(&self, id: Uuid) -> Result<(i64, i64), AppError> {
        let voluntarios: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM voluntarios WHERE sede_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        let assistidos: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM assistidos WHERE sede_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok((voluntarios, assistidos))
    }

    pub async fn listar_ativas(&self) -> Result<Vec<SedeResumida>, AppError> {
        Ok(sqlx::query_as::<_, SedeResumida>(
            "SELECT id, nome FROM sedes WHERE ativo = TRUE ORDER BY nome ASC",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    pub async fn estatisticas(&self) -> Result<EstatisticasSedes, AppError> {
        let (total, ativas): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE ativo) FROM sedes",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(EstatisticasSedes {
            total,
            ativas,
            inativas: total - ativas,
        })
    }

    /// Contagem de pessoas ativas por sede, para o dashboard do super admin.
    pub async fn stats_por_sede(&self) -> Result<Vec<SedeStats>, AppError> {
        Ok(sqlx::query_as::<_, SedeStats>(
            r#"
            SELECT s.id, s.nome, s.ativo,
                (SELECT COUNT(*) FROM voluntarios v WHERE v.sede_id = s.id AND v.ativo) AS voluntarios,
                (SELECT COUNT(*) FROM assistidos a WHERE a.sede_id = s.id AND a.ativo) AS assistidos
            FROM sedes s
            ORDER BY s.nome ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }
}

fn aplicar_filtros(qb: &mut QueryBuilder<'_, Postgres>, filtro: &FiltroSede) {
    if let Some(search) = &filtro.search {
        let padrao = format!("%{}%", search);
        qb.push(" AND (s.nome ILIKE ")
            .push_bind(padrao.clone())
            .push(" OR s.endereco ILIKE ")
            .push_bind(padrao.clone())
            .push(" OR s.email ILIKE ")
            .push_bind(padrao)
            .push(")");
    }
    if let Some(nome) = &filtro.nome {
        qb.push(" AND s.nome ILIKE ").push_bind(format!("%{}%", nome));
    }
    if let Some(ativo) = filtro.ativo {
        qb.push(" AND s.ativo = ").push_bind(ativo);
    }
}
