use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::paginacao::ParamsPaginacao,
    models::voluntario::{
        AtualizarVoluntario, CriarVoluntario, EstatisticasVoluntarios, FiltroVoluntario,
        StatusPessoa, Voluntario, VoluntarioComSede,
    },
};

const COLUNAS_ORDENACAO: &[(&str, &str)] = &[
    ("nomeCompleto", "nome_completo"),
    ("email", "email"),
    ("dataIngresso", "data_ingresso"),
    ("criadoEm", "criado_em"),
];

const BASE_COM_SEDE: &str = r#"
    SELECT v.*, s.nome AS sede_nome
    FROM voluntarios v
    JOIN sedes s ON s.id = v.sede_id
    WHERE 1=1
"#;

#[derive(Clone)]
pub struct VoluntarioRepository {
    pool: PgPool,
}

impl VoluntarioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn criar(
        &self,
        dados: &CriarVoluntario,
        senha_hash: Option<String>,
    ) -> Result<Voluntario, AppError> {
        let voluntario = sqlx::query_as::<_, Voluntario>(
            r#"
            INSERT INTO voluntarios
                (nome_completo, cpf, telefone, email, endereco, data_ingresso,
                 observacoes, sede_id, cargo, senha)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, 'voluntario'), $10)
            RETURNING *
            "#,
        )
        .bind(&dados.nome_completo)
        .bind(&dados.cpf)
        .bind(&dados.telefone)
        .bind(&dados.email)
        .bind(&dados.endereco)
        .bind(dados.data_ingresso)
        .bind(&dados.observacoes)
        .bind(dados.sede_id)
        .bind(dados.cargo)
        .bind(senha_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(mapear_unicidade)?;

        Ok(voluntario)
    }

    pub async fn buscar_por_id(&self, id: Uuid) -> Result<Option<Voluntario>, AppError> {
        Ok(
            sqlx::query_as::<_, Voluntario>("SELECT * FROM voluntarios WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    pub async fn buscar_por_email(&self, email: &str) -> Result<Option<Voluntario>, AppError> {
        Ok(
            sqlx::query_as::<_, Voluntario>("SELECT * FROM voluntarios WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    pub async fn existe_email(&self, email: &str, excluir: Option<Uuid>) -> Result<bool, AppError> {
        let existe: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM voluntarios WHERE email = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(email)
        .bind(excluir)
        .fetch_one(&self.pool)
        .await?;
        Ok(existe)
    }

    pub async fn existe_cpf(&self, cpf: &str, excluir: Option<Uuid>) -> Result<bool, AppError> {
        let existe: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM voluntarios WHERE cpf = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(cpf)
        .bind(excluir)
        .fetch_one(&self.pool)
        .await?;
        Ok(existe)
    }

    pub async fn listar(
        &self,
        filtro: &FiltroVoluntario,
        paginacao: &ParamsPaginacao,
    ) -> Result<(Vec<VoluntarioComSede>, i64), AppError> {
        let (_, limit, offset) = paginacao.normalizar();

        let total: i64 = {
            let mut qb =
                QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM voluntarios v WHERE 1=1");
            aplicar_filtros(&mut qb, filtro);
            qb.build_query_scalar().fetch_one(&self.pool).await?
        };

        let mut qb = QueryBuilder::<Postgres>::new(BASE_COM_SEDE);
        aplicar_filtros(&mut qb, filtro);
        let coluna = paginacao.coluna_ordenacao(COLUNAS_ORDENACAO, "criado_em");
        qb.push(format!(" ORDER BY v.{} {}", coluna, paginacao.direcao().sql()));
        qb.push(" LIMIT ").push_bind(limit);
        qb.push(" OFFSET ").push_bind(offset);

        let voluntarios = qb
            .build_query_as::<VoluntarioComSede>()
            .fetch_all(&self.pool)
            .await?;

        Ok((voluntarios, total))
    }

    pub async fn atualizar(
        &self,
        id: Uuid,
        dados: &AtualizarVoluntario,
    ) -> Result<Voluntario, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE voluntarios SET atualizado_em = now()");
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
        if let Some(observacoes) = &dados.observacoes {
            qb.push(", observacoes = ").push_bind(observacoes.clone());
        }
        if let Some(sede_id) = dados.sede_id {
            qb.push(", sede_id = ").push_bind(sede_id);
        }
        if let Some(cargo) = dados.cargo {
            qb.push(", cargo = ").push_bind(cargo);
        }
        if let Some(ativo) = dados.ativo {
            qb.push(", ativo = ").push_bind(ativo);
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" RETURNING *");

        qb.build_query_as::<Voluntario>()
            .fetch_one(&self.pool)
            .await
            .map_err(mapear_unicidade)
    }

    pub async fn atualizar_status(
        &self,
        id: Uuid,
        status: StatusPessoa,
    ) -> Result<Voluntario, AppError> {
        Ok(sqlx::query_as::<_, Voluntario>(
            r#"
            UPDATE voluntarios
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

    pub async fn atualizar_senha(&self, id: Uuid, senha_hash: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE voluntarios SET senha = $2, atualizado_em = now() WHERE id = $1")
            .bind(id)
            .bind(senha_hash)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn excluir(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM voluntarios WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn estatisticas(&self) -> Result<EstatisticasVoluntarios, AppError> {
        let (total, ativos, inativos, suspensos): (i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE status = 'ativo'),
                   COUNT(*) FILTER (WHERE status = 'inativo'),
                   COUNT(*) FILTER (WHERE status = 'suspenso')
            FROM voluntarios
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(EstatisticasVoluntarios {
            total,
            ativos,
            inativos,
            suspensos,
        })
    }
}

fn aplicar_filtros(qb: &mut QueryBuilder<'_, Postgres>, filtro: &FiltroVoluntario) {
    if let Some(status) = filtro.status {
        qb.push(" AND v.status = ").push_bind(status);
    }
    if let Some(search) = &filtro.search {
        let padrao = format!("%{}%", search);
        qb.push(" AND (v.nome_completo ILIKE ")
            .push_bind(padrao.clone())
            .push(" OR v.email ILIKE ")
            .push_bind(padrao.clone())
            .push(" OR v.cpf LIKE ")
            .push_bind(padrao)
            .push(")");
    }
    if let Some(sede_id) = filtro.sede_id {
        qb.push(" AND v.sede_id = ").push_bind(sede_id);
    }
    if let Some(cargo) = filtro.cargo {
        qb.push(" AND v.cargo = ").push_bind(cargo);
    }
    if let Some(ativo) = filtro.ativo {
        qb.push(" AND v.ativo = ").push_bind(ativo);
    }
}

fn mapear_unicidade(e: sqlx::Error) -> AppError {
    if let Some(db) = e.as_database_error() {
        if db.is_unique_violation() {
            return match db.constraint() {
                Some("voluntarios_cpf_key") => {
                    AppError::Conflito("CPF já cadastrado".to_string())
                }
                _ => AppError::Conflito("Email já cadastrado".to_string()),
            };
        }
    }
    AppError::BancoDeDados(e)
}
