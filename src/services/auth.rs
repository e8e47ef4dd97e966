use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::VoluntarioRepository,
    models::auth::{Claims, UsuarioLogado},
    models::voluntario::Voluntario,
};

const VALIDADE_TOKEN_DIAS: i64 = 1;

#[derive(Clone)]
pub struct AuthService {
    repo: VoluntarioRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(repo: VoluntarioRepository, jwt_secret: String) -> Self {
        Self { repo, jwt_secret }
    }

    pub async fn login(
        &self,
        email: &str,
        senha: &str,
    ) -> Result<(UsuarioLogado, String), AppError> {
        let voluntario = self
            .repo
            .buscar_por_email(&email.to_lowercase())
            .await?
            .filter(|v| v.ativo)
            .ok_or(AppError::CredenciaisInvalidas)?;

        // Sem hash cadastrado não há login: contas de cadastro puro não
        // têm acesso ao sistema.
        let hash_senha = voluntario
            .senha
            .clone()
            .ok_or(AppError::CredenciaisInvalidas)?;

        let senha_informada = senha.to_owned();
        // Verificação em thread separada: bcrypt é caro demais para o event loop.
        let senha_valida =
            tokio::task::spawn_blocking(move || verify(&senha_informada, &hash_senha))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !senha_valida {
            return Err(AppError::CredenciaisInvalidas);
        }

        let token = self.criar_token(&voluntario)?;
        Ok((montar_usuario(&voluntario), token))
    }

    pub async fn validar_token(&self, token: &str) -> Result<Voluntario, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::TokenInvalido)?;

        self.repo
            .buscar_por_id(token_data.claims.sub)
            .await?
            .filter(|v| v.ativo)
            .ok_or_else(|| AppError::NaoEncontrado("Usuário não encontrado ou inativo".to_string()))
    }

    pub async fn me(&self, usuario_id: Uuid) -> Result<UsuarioLogado, AppError> {
        let voluntario = self
            .repo
            .buscar_por_id(usuario_id)
            .await?
            .filter(|v| v.ativo)
            .ok_or_else(|| {
                AppError::NaoEncontrado("Usuário não encontrado ou inativo".to_string())
            })?;
        Ok(montar_usuario(&voluntario))
    }

    pub async fn refresh(&self, usuario_id: Uuid) -> Result<String, AppError> {
        let voluntario = self
            .repo
            .buscar_por_id(usuario_id)
            .await?
            .filter(|v| v.ativo)
            .ok_or_else(|| {
                AppError::NaoEncontrado("Usuário não encontrado ou inativo".to_string())
            })?;
        self.criar_token(&voluntario)
    }

    pub async fn alterar_senha(
        &self,
        usuario_id: Uuid,
        senha_atual: &str,
        nova_senha: &str,
    ) -> Result<(), AppError> {
        let voluntario = self
            .repo
            .buscar_por_id(usuario_id)
            .await?
            .filter(|v| v.ativo)
            .ok_or_else(|| AppError::NaoEncontrado("Usuário não encontrado".to_string()))?;

        let hash_senha = voluntario.senha.ok_or(AppError::CredenciaisInvalidas)?;

        let atual = senha_atual.to_owned();
        let senha_valida = tokio::task::spawn_blocking(move || verify(&atual, &hash_senha))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !senha_valida {
            return Err(AppError::Invalido("Senha atual incorreta".to_string()));
        }

        let nova = nova_senha.to_owned();
        let novo_hash = tokio::task::spawn_blocking(move || hash(&nova, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        self.repo.atualizar_senha(usuario_id, &novo_hash).await
    }

    fn criar_token(&self, voluntario: &Voluntario) -> Result<String, AppError> {
        let now = Utc::now();
        let expira_em = now + chrono::Duration::days(VALIDADE_TOKEN_DIAS);

        let claims = Claims {
            sub: voluntario.id,
            cargo: voluntario.cargo,
            sede_id: voluntario.sede_id,
            exp: expira_em.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

fn montar_usuario(voluntario: &Voluntario) -> UsuarioLogado {
    UsuarioLogado {
        id: voluntario.id,
        nome: voluntario.nome_completo.clone(),
        email: voluntario.email.clone(),
        sede_id: voluntario.sede_id,
        cargo: voluntario.cargo,
    }
}
