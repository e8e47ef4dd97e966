use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::configuracao::{Configuracao, DefinirConfiguracao, TipoConfiguracao},
};

#[derive(Clone)]
pub struct ConfiguracaoRepository {
    pool: PgPool,
}

impl ConfiguracaoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn buscar_por_chave(&self, chave: &str) -> Result<Option<Configuracao>, AppError> {
        Ok(
            sqlx::query_as::<_, Configuracao>("SELECT * FROM configuracoes WHERE chave = $1")
                .bind(chave)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    /// Upsert pela chave única.
    pub async fn definir(&self, dados: &DefinirConfiguracao) -> Result<Configuracao, AppError> {
        Ok(sqlx::query_as::<_, Configuracao>(
            r#"
            INSERT INTO configuracoes (chave, valor, descricao, tipo)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (chave) DO UPDATE
            SET valor = EXCLUDED.valor,
                descricao = COALESCE(EXCLUDED.descricao, configuracoes.descricao),
                tipo = EXCLUDED.tipo,
                atualizado_em = now()
            RETURNING *
            "#,
        )
        .bind(&dados.chave)
        .bind(&dados.valor)
        .bind(&dados.descricao)
        .bind(dados.tipo.unwrap_or(TipoConfiguracao::String))
        .fetch_one(&self.pool)
        .await?)
    }

    pub async fn listar(&self) -> Result<Vec<Configuracao>, AppError> {
        Ok(
            sqlx::query_as::<_, Configuracao>("SELECT * FROM configuracoes ORDER BY chave ASC")
                .fetch_all(&self.pool)
                .await?,
        )
    }
}
